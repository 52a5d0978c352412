//! Named placeholder substitution for message templates.
//!
//! Templates use `{name}` placeholders. A literal brace is written doubled
//! (`{{` or `}}`).

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a template could not be formatted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A placeholder has no corresponding parameter.
    #[error("missing format parameter: {0}")]
    MissingKey(String),

    /// The template contains a stray brace or an invalid placeholder name.
    #[error("malformed template: {0}")]
    Malformed(String),
}

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
static NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").unwrap())
}

fn name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// Substitute `{name}` placeholders in `template` with values from `params`.
///
/// Parameters not referenced by the template are ignored. When a key appears
/// more than once in `params`, the last value wins.
pub fn format_message(template: &str, params: &[(&str, &str)]) -> Result<String, FormatError> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for caps in token_regex().captures_iter(template) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        push_literal(&mut output, &template[last..token.start()])?;
        last = token.end();

        match token.as_str() {
            "{{" => output.push('{'),
            "}}" => output.push('}'),
            _ => {
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                if !name_regex().is_match(name) {
                    return Err(FormatError::Malformed(format!(
                        "invalid placeholder '{{{}}}'",
                        name
                    )));
                }
                let value = params
                    .iter()
                    .rev()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| FormatError::MissingKey(name.to_string()))?;
                output.push_str(value);
            }
        }
    }

    push_literal(&mut output, &template[last..])?;
    Ok(output)
}

/// Names of all placeholders referenced by `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    token_regex()
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn push_literal(output: &mut String, literal: &str) -> Result<(), FormatError> {
    if let Some(brace) = literal.chars().find(|c| *c == '{' || *c == '}') {
        return Err(FormatError::Malformed(format!("single '{}' encountered", brace)));
    }
    output.push_str(literal);
    Ok(())
}
