//! Prompt template loading with locale fallback and caching.
//!
//! Templates live under a prompts root, one directory per filesystem locale:
//!
//! ```text
//! prompts/
//!   zh_CN/outline_prompt.txt
//!   en_US/outline_prompt.txt
//!   zh_TW/outline_prompt.txt
//! ```
//!
//! A template missing from the requested locale's directory is served from
//! the default locale's directory. Successful loads are cached in a bounded
//! LRU keyed by template name and resolved locale; failures are never cached.

use crate::config::{cache_capacity_from_env, prompts_dir_from_env, Config};
use crate::i18n::locale::{resolve_locale, to_fs_locale, Locale, DEFAULT_LOCALE};
use crate::i18n::metrics::TemplateMetrics;
use lru::LruCache;
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of cached templates.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

type CacheKey = (String, Locale);

/// Errors returned by [`PromptLoader::load`].
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Neither the requested locale nor the default locale has the template.
    #[error(
        "Template {template_name} not found for locale {}",
        .locale.as_deref().unwrap_or("(unspecified)")
    )]
    NotFound {
        template_name: String,
        /// The locale as originally requested, before normalization
        locale: Option<String>,
    },

    /// The template file exists but could not be read as UTF-8 text.
    #[error("Failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads prompt templates from disk.
pub struct PromptLoader {
    root: PathBuf,
    cache: Mutex<LruCache<CacheKey, Arc<str>>>,
    metrics: TemplateMetrics,
}

/// Process-wide loader (installed explicitly or initialized lazily)
static GLOBAL_LOADER: OnceLock<Arc<PromptLoader>> = OnceLock::new();

impl PromptLoader {
    /// Create a loader rooted at `root` caching up to `capacity` templates.
    ///
    /// A capacity of zero falls back to [`DEFAULT_CACHE_CAPACITY`].
    pub fn new(root: impl Into<PathBuf>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);

        Self {
            root: root.into(),
            cache: Mutex::new(LruCache::new(capacity)),
            metrics: TemplateMetrics::new(),
        }
    }

    /// Create a loader from the prompt settings of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.prompts_dir, config.template_cache_capacity)
    }

    /// Create a loader from `PROMPTS_DIR` and `TEMPLATE_CACHE_CAPACITY` only.
    ///
    /// An invalid capacity falls back to [`DEFAULT_CACHE_CAPACITY`] without
    /// discarding the configured directory.
    pub fn from_env() -> Self {
        let capacity = cache_capacity_from_env().unwrap_or_else(|e| {
            warn!("{:#}, using {}", e, DEFAULT_CACHE_CAPACITY);
            DEFAULT_CACHE_CAPACITY
        });
        Self::new(prompts_dir_from_env(), capacity)
    }

    /// Make `loader` the process-wide loader used by [`load_prompt_template`].
    ///
    /// The caller keeps its own handle, so an HTTP server and the free
    /// function share one cache and one set of metrics.
    ///
    /// # Errors
    /// Returns `loader` back if a process-wide loader is already in place,
    /// either installed earlier or created lazily by [`PromptLoader::global`].
    pub fn install(loader: Arc<PromptLoader>) -> Result<&'static PromptLoader, Arc<PromptLoader>> {
        GLOBAL_LOADER.set(loader)?;
        Ok(Self::global())
    }

    /// Get the process-wide loader.
    ///
    /// If none was installed, one is created from the environment on first
    /// use (see [`PromptLoader::from_env`]).
    pub fn global() -> &'static PromptLoader {
        GLOBAL_LOADER.get_or_init(|| Arc::new(PromptLoader::from_env()))
    }

    /// Directory the loader reads locale subdirectories from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache and disk counters for this loader.
    pub fn metrics(&self) -> &TemplateMetrics {
        &self.metrics
    }

    /// Number of templates currently cached.
    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    /// Drop every cached template. The next load of each goes to disk.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Load a prompt template by file name.
    ///
    /// `locale` may be any spelling accepted by
    /// [`to_fs_locale`](crate::i18n::to_fs_locale); when absent the default
    /// locale is used. The locale is resolved before the cache key is built,
    /// so an absent locale and an explicit default tag share one entry.
    ///
    /// # Errors
    /// * [`TemplateError::NotFound`] if neither the requested nor the default
    ///   locale directory contains `template_name`
    /// * [`TemplateError::Read`] if a matching file exists but cannot be read
    pub fn load(&self, template_name: &str, locale: Option<&str>) -> Result<Arc<str>, TemplateError> {
        let fs_locale = to_fs_locale(locale.unwrap_or_else(|| resolve_locale(None).tag()));
        let key: CacheKey = (template_name.to_string(), fs_locale);

        let cached = self.lock_cache().get(&key).cloned();
        if let Some(content) = cached {
            self.metrics.record_cache_hit();
            debug!("Template cache hit: {} ({})", template_name, fs_locale.fs_name());
            return Ok(content);
        }
        self.metrics.record_cache_miss();

        if !is_valid_template_name(template_name) {
            warn!("Rejected template name: {:?}", template_name);
            return Err(self.not_found(template_name, locale));
        }

        for candidate in candidate_locales(fs_locale) {
            let path = self.template_path(candidate, template_name);
            let Some(content) = self.read_template(&path)? else {
                continue;
            };

            if candidate != fs_locale {
                self.metrics.record_fallback();
                debug!(
                    "Template {} missing for {}, using {}",
                    template_name,
                    fs_locale.fs_name(),
                    candidate.fs_name()
                );
            }

            let content: Arc<str> = Arc::from(content);
            // Concurrent first loads of one key write identical content
            self.lock_cache().put(key, Arc::clone(&content));
            return Ok(content);
        }

        Err(self.not_found(template_name, locale))
    }

    fn template_path(&self, locale: Locale, template_name: &str) -> PathBuf {
        self.root.join(locale.fs_name()).join(template_name)
    }

    fn read_template(&self, path: &Path) -> Result<Option<String>, TemplateError> {
        if !path.is_file() {
            return Ok(None);
        }

        self.metrics.record_disk_read();
        fs::read_to_string(path)
            .map(Some)
            .map_err(|source| {
                warn!("Failed to read template {}: {}", path.display(), source);
                TemplateError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            })
    }

    fn not_found(&self, template_name: &str, locale: Option<&str>) -> TemplateError {
        self.metrics.record_not_found();
        TemplateError::NotFound {
            template_name: template_name.to_string(),
            locale: locale.map(str::to_string),
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<CacheKey, Arc<str>>> {
        // Entries are inserted whole, so a poisoned cache is still consistent
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load a prompt template through the process-wide loader.
///
/// See [`PromptLoader::load`].
pub fn load_prompt_template(
    template_name: &str,
    locale: Option<&str>,
) -> Result<Arc<str>, TemplateError> {
    PromptLoader::global().load(template_name, locale)
}

fn candidate_locales(requested: Locale) -> Vec<Locale> {
    if requested == DEFAULT_LOCALE {
        vec![requested]
    } else {
        vec![requested, DEFAULT_LOCALE]
    }
}

/// A template name must be a single plain file name inside a locale directory.
fn is_valid_template_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
