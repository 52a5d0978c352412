use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::i18n::DEFAULT_CACHE_CAPACITY;

#[derive(Debug, Clone)]
pub struct Config {
    // Prompt templates
    pub prompts_dir: PathBuf,
    pub template_cache_capacity: usize,

    // HTTP server
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            prompts_dir: prompts_dir_from_env(),
            template_cache_capacity: cache_capacity_from_env()?,

            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("PORT") {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("Invalid PORT: '{}'", value))?,
                Err(_) => 8080,
            },
        })
    }
}

/// `PROMPTS_DIR`, or the bundled prompts when unset.
pub fn prompts_dir_from_env() -> PathBuf {
    std::env::var("PROMPTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_prompts_dir())
}

/// `TEMPLATE_CACHE_CAPACITY`, or the default when unset. Zero is rejected.
pub fn cache_capacity_from_env() -> Result<usize> {
    let capacity = match std::env::var("TEMPLATE_CACHE_CAPACITY") {
        Ok(value) => value
            .parse()
            .with_context(|| format!("Invalid TEMPLATE_CACHE_CAPACITY: '{}'", value))?,
        Err(_) => DEFAULT_CACHE_CAPACITY,
    };
    if capacity == 0 {
        bail!("TEMPLATE_CACHE_CAPACITY must be greater than zero");
    }
    Ok(capacity)
}

/// Bundled prompt templates, relative to the crate root.
pub fn default_prompts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("prompts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = ["PROMPTS_DIR", "TEMPLATE_CACHE_CAPACITY", "HOST", "PORT"];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().expect("Defaults should load");

        assert_eq!(config.prompts_dir, default_prompts_dir());
        assert_eq!(config.template_cache_capacity, 128);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("PROMPTS_DIR", "/srv/prompts");
        std::env::set_var("TEMPLATE_CACHE_CAPACITY", "16");
        std::env::set_var("HOST", "127.0.0.1");
        std::env::set_var("PORT", "9000");

        let config = Config::from_env().expect("Overrides should load");
        clear_env();

        assert_eq!(config.prompts_dir, PathBuf::from("/srv/prompts"));
        assert_eq!(config.template_cache_capacity, 16);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_capacity() {
        clear_env();
        std::env::set_var("TEMPLATE_CACHE_CAPACITY", "lots");
        let result = Config::from_env();
        clear_env();

        assert!(result.unwrap_err().to_string().contains("TEMPLATE_CACHE_CAPACITY"));
    }

    #[test]
    #[serial]
    fn test_from_env_zero_capacity() {
        clear_env();
        std::env::set_var("TEMPLATE_CACHE_CAPACITY", "0");
        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        clear_env();
        std::env::set_var("PORT", "99999");
        let result = Config::from_env();
        clear_env();

        assert!(result.unwrap_err().to_string().contains("PORT"));
    }

    #[test]
    fn test_default_prompts_dir_ships_every_locale() {
        for locale in crate::i18n::Locale::ALL {
            assert!(default_prompts_dir().join(locale.fs_name()).is_dir());
        }
    }
}
