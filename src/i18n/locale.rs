//! Locale type: the closed set of supported locales and how raw language
//! preferences map onto it.
//!
//! Every locale exists in two spellings: the HTTP-style tag used on the wire
//! (`zh-CN`) and the filesystem-style name used for directories and catalog
//! keys (`zh_CN`). Both are derived from the same enum variant, so the two
//! can never disagree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    /// Simplified Chinese (`zh-CN`), the default.
    #[serde(rename = "zh-CN")]
    SimplifiedChinese,

    /// English (`en-US`).
    #[serde(rename = "en-US")]
    English,

    /// Traditional Chinese (`zh-TW`).
    #[serde(rename = "zh-TW")]
    TraditionalChinese,
}

/// The universal fallback locale.
///
/// Used when a header is absent or unrecognized, when an alias is unknown,
/// when a message id is missing from the requested locale, and when a prompt
/// template is missing from the requested locale's directory.
pub const DEFAULT_LOCALE: Locale = Locale::SimplifiedChinese;

/// Raw locale spellings accepted by [`to_fs_locale`].
const LOCALE_ALIASES: &[(&str, Locale)] = &[
    ("zh-CN", Locale::SimplifiedChinese),
    ("zh-cn", Locale::SimplifiedChinese),
    ("zh", Locale::SimplifiedChinese),
    ("en-US", Locale::English),
    ("en-us", Locale::English),
    ("en", Locale::English),
    ("zh-TW", Locale::TraditionalChinese),
    ("zh-tw", Locale::TraditionalChinese),
    ("zh-Hant", Locale::TraditionalChinese),
];

impl Locale {
    /// All supported locales, default first.
    pub const ALL: [Locale; 3] = [
        Locale::SimplifiedChinese,
        Locale::English,
        Locale::TraditionalChinese,
    ];

    /// HTTP-style tag (e.g., "en-US").
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::SimplifiedChinese => "zh-CN",
            Locale::English => "en-US",
            Locale::TraditionalChinese => "zh-TW",
        }
    }

    /// Filesystem-style name (e.g., "en_US"), used for prompt directories
    /// and translation table keys.
    pub fn fs_name(&self) -> &'static str {
        match self {
            Locale::SimplifiedChinese => "zh_CN",
            Locale::English => "en_US",
            Locale::TraditionalChinese => "zh_TW",
        }
    }

    /// Name of the locale in its own language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::SimplifiedChinese => "简体中文",
            Locale::English => "English",
            Locale::TraditionalChinese => "繁體中文",
        }
    }

    /// Exact, case-sensitive match against the canonical tags.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        Self::ALL.into_iter().find(|locale| locale.tag() == tag)
    }

    /// Exact match against the filesystem-style names.
    pub fn from_fs_name(name: &str) -> Option<Locale> {
        Self::ALL.into_iter().find(|locale| locale.fs_name() == name)
    }

    /// Check if this is the default locale.
    pub fn is_default(&self) -> bool {
        *self == DEFAULT_LOCALE
    }
}

impl Default for Locale {
    fn default() -> Self {
        DEFAULT_LOCALE
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Resolve a client's preferred locale from an `Accept-Language` style value.
///
/// Only the first entry of the list is honored and quality weights are
/// ignored. Resolution never fails: anything unrecognized maps to
/// [`DEFAULT_LOCALE`].
///
/// # Example
/// ```
/// use redink_i18n::i18n::{resolve_locale, Locale};
///
/// assert_eq!(resolve_locale(Some("en-US,en;q=0.9,zh-CN;q=0.8")), Locale::English);
/// assert_eq!(resolve_locale(Some("zh-Hant-TW")), Locale::TraditionalChinese);
/// assert_eq!(resolve_locale(None), Locale::SimplifiedChinese);
/// ```
pub fn resolve_locale(raw_header: Option<&str>) -> Locale {
    let raw = raw_header.unwrap_or(DEFAULT_LOCALE.tag());

    let first = raw.split(',').next().unwrap_or(raw);
    let first = first.split(';').next().unwrap_or(first);
    let value = first.trim();

    if let Some(locale) = Locale::from_tag(value) {
        return locale;
    }

    if has_prefix_ignore_case(value, "zh") {
        // Script/region markers are matched case-sensitively
        if value.contains("TW") || value.contains("Hant") {
            return Locale::TraditionalChinese;
        }
        return Locale::SimplifiedChinese;
    }

    if has_prefix_ignore_case(value, "en") {
        return Locale::English;
    }

    DEFAULT_LOCALE
}

/// Map a locale spelling onto its filesystem locale.
///
/// Unknown spellings map to the default locale's entry, so this never fails.
pub fn to_fs_locale(tag: &str) -> Locale {
    lookup_alias(tag)
        .or_else(|| lookup_alias(DEFAULT_LOCALE.tag()))
        .unwrap_or(DEFAULT_LOCALE)
}

fn lookup_alias(tag: &str) -> Option<Locale> {
    LOCALE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == tag)
        .map(|(_, locale)| *locale)
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
