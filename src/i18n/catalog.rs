//! Message catalog: the static translation table and message lookup.
//!
//! The table lives in `locales/messages.json` and is embedded into the binary
//! at compile time. It is parsed once, on first access, into a process-wide
//! singleton (`OnceLock`) and is immutable thereafter.

use crate::i18n::format::format_message;
use crate::i18n::locale::{resolve_locale, to_fs_locale, Locale, DEFAULT_LOCALE};
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::debug;

/// Embedded translation table, keyed by filesystem locale then message id.
const MESSAGES_JSON: &str = include_str!("../../locales/messages.json");

/// Global message catalog.
#[derive(Debug)]
pub struct Catalog {
    messages: HashMap<Locale, HashMap<String, String>>,
}

/// Global catalog instance (initialized lazily)
static CATALOG: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// Get the global catalog instance.
    ///
    /// # Panics
    /// Panics if the embedded table is not valid JSON or uses a locale key
    /// outside the supported set. Both are build-time data errors covered by
    /// the tests below.
    pub fn get() -> &'static Catalog {
        CATALOG.get_or_init(|| {
            Catalog::from_json(MESSAGES_JSON).expect("embedded message catalog should be valid")
        })
    }

    /// Build a catalog from a JSON document of the form
    /// `{ "<fs_locale>": { "<message_id>": "<template>" } }`.
    pub fn from_json(json: &str) -> anyhow::Result<Catalog> {
        let raw: BTreeMap<String, HashMap<String, String>> = serde_json::from_str(json)?;

        let mut messages = HashMap::with_capacity(raw.len());
        for (fs_name, table) in raw {
            let locale = Locale::from_fs_name(&fs_name)
                .ok_or_else(|| anyhow::anyhow!("Unsupported catalog locale: '{}'", fs_name))?;
            messages.insert(locale, table);
        }

        Ok(Catalog { messages })
    }

    /// Get the template string for a message id in exactly one locale.
    ///
    /// # Returns
    /// * `Some(&str)` if the locale's table has the id
    /// * `None` otherwise (no fallback is applied here)
    pub fn lookup(&self, locale: Locale, message_id: &str) -> Option<&str> {
        self.messages
            .get(&locale)
            .and_then(|table| table.get(message_id))
            .map(String::as_str)
    }

    /// All message ids defined for a locale, sorted.
    pub fn message_ids(&self, locale: Locale) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .messages
            .get(&locale)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Locales that have a table in this catalog, in canonical order.
    pub fn locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|locale| self.messages.contains_key(locale))
            .collect()
    }

    /// Select the template for a message id, applying the fallback chain:
    /// requested locale, then the default locale, then the id itself.
    pub fn select<'a>(&'a self, locale: Locale, message_id: &'a str) -> &'a str {
        if let Some(text) = self.lookup(locale, message_id) {
            return text;
        }

        if let Some(text) = self.lookup(DEFAULT_LOCALE, message_id) {
            debug!(
                "Message '{}' missing for {}, using {}",
                message_id, locale, DEFAULT_LOCALE
            );
            return text;
        }

        debug!("Message '{}' not found in any locale", message_id);
        message_id
    }
}

/// Translate a message id into the given locale.
///
/// `locale` may be any spelling accepted by [`to_fs_locale`]; when absent the
/// default locale is used. Placeholders are substituted only when `params`
/// is non-empty. If formatting fails (missing parameter or malformed
/// template) the unformatted template is returned instead.
///
/// # Example
/// ```
/// use redink_i18n::i18n::translate;
///
/// let text = translate(
///     "image_not_found",
///     Some("en-US"),
///     &[("task_id", "abc"), ("filename", "img.png")],
/// );
/// assert_eq!(text, "Image not found: abc/img.png");
/// ```
pub fn translate(message_id: &str, locale: Option<&str>, params: &[(&str, &str)]) -> String {
    let locale = match locale {
        Some(tag) => tag,
        None => resolve_locale(None).tag(),
    };
    let fs_locale = to_fs_locale(locale);
    let template = Catalog::get().select(fs_locale, message_id);

    if params.is_empty() {
        return template.to_string();
    }

    match format_message(template, params) {
        Ok(text) => text,
        Err(e) => {
            debug!("Returning unformatted message '{}': {}", message_id, e);
            template.to_string()
        }
    }
}

/// Translate a message id without parameters.
pub fn t(message_id: &str, locale: Option<&str>) -> String {
    translate(message_id, locale, &[])
}
