//! Internationalization (i18n) module for the RedInk backend.
//!
//! Resolves a client's preferred locale from request metadata and uses it to
//! produce localized content.
//!
//! # Architecture
//!
//! - `locale`: The closed set of supported locales, header resolution and alias normalization
//! - `catalog`: Embedded translation table and message lookup with fallback
//! - `format`: `{name}` placeholder substitution
//! - `templates`: Prompt template loading from disk with fallback and caching
//! - `validator`: Catalog consistency checks
//! - `metrics`: Template loader observability
//!
//! # Example
//!
//! ```rust,ignore
//! use redink_i18n::i18n::{load_prompt_template, resolve_locale, translate};
//!
//! let locale = resolve_locale(headers.get("accept-language"));
//! let message = translate("image_not_found", Some(locale.tag()), &[("task_id", id), ("filename", name)]);
//! let prompt = load_prompt_template("outline_prompt.txt", Some(locale.tag()))?;
//! ```

mod catalog;
mod format;
mod locale;
mod metrics;
mod templates;
mod validator;

pub use catalog::{t, translate, Catalog};
pub use format::{format_message, FormatError};
pub use locale::{resolve_locale, to_fs_locale, Locale, DEFAULT_LOCALE};
pub use metrics::{MetricsReport, TemplateMetrics};
pub use templates::{load_prompt_template, PromptLoader, TemplateError, DEFAULT_CACHE_CAPACITY};
pub use validator::{CatalogValidator, ValidationReport};
