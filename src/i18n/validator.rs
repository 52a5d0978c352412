//! Catalog consistency validation.
//!
//! The default locale is the universal fallback, so it must define every
//! message id that any other locale defines. Other locales may lag behind
//! (they fall back at lookup time), but should reference the same
//! placeholders as the default so formatting parameters line up.

use crate::i18n::catalog::Catalog;
use crate::i18n::format::{format_message, placeholders, FormatError};
use crate::i18n::locale::{Locale, DEFAULT_LOCALE};
use std::collections::BTreeSet;

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that break the fallback guarantees
    pub errors: Vec<String>,

    /// Gaps that degrade gracefully at lookup time
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for message catalogs.
pub struct CatalogValidator;

impl CatalogValidator {
    /// Validate a catalog.
    ///
    /// Errors:
    /// - the default locale has no table
    /// - a message id exists in some locale but not in the default locale
    /// - a template has malformed placeholder syntax
    ///
    /// Warnings:
    /// - a non-default locale is missing a message id
    /// - a translation's placeholder set differs from the default's
    pub fn validate(catalog: &Catalog) -> ValidationReport {
        let mut report = ValidationReport::new();

        if !catalog.locales().contains(&DEFAULT_LOCALE) {
            report
                .errors
                .push(format!("Default locale {} has no messages", DEFAULT_LOCALE));
        }

        let default_ids: BTreeSet<&str> = catalog.message_ids(DEFAULT_LOCALE).into_iter().collect();

        for locale in Locale::ALL {
            let ids: BTreeSet<&str> = catalog.message_ids(locale).into_iter().collect();

            for id in &ids {
                if let Some(template) = catalog.lookup(locale, id) {
                    Self::check_syntax(&mut report, locale, id, template);
                }
            }

            if locale == DEFAULT_LOCALE {
                continue;
            }

            for id in ids.difference(&default_ids) {
                report.errors.push(format!(
                    "Message '{}' exists in {} but not in default locale {}",
                    id, locale, DEFAULT_LOCALE
                ));
            }

            for id in default_ids.difference(&ids) {
                report
                    .warnings
                    .push(format!("Message '{}' missing for {}", id, locale));
            }

            for id in ids.intersection(&default_ids) {
                let (Some(default_text), Some(text)) =
                    (catalog.lookup(DEFAULT_LOCALE, id), catalog.lookup(locale, id))
                else {
                    continue;
                };
                let expected: BTreeSet<String> = placeholders(default_text).into_iter().collect();
                let actual: BTreeSet<String> = placeholders(text).into_iter().collect();
                if expected != actual {
                    report.warnings.push(format!(
                        "Placeholder mismatch for '{}' in {}: default has {:?}, translation has {:?}",
                        id, locale, expected, actual
                    ));
                }
            }
        }

        report
    }

    fn check_syntax(report: &mut ValidationReport, locale: Locale, id: &str, template: &str) {
        let names = placeholders(template);
        let params: Vec<(&str, &str)> = names.iter().map(|name| (name.as_str(), "")).collect();

        if let Err(FormatError::Malformed(detail)) = format_message(template, &params) {
            report.errors.push(format!(
                "Message '{}' in {} is malformed: {}",
                id, locale, detail
            ));
        }
    }
}
