//! Locale and translation provider.
//!
//! Translations arrive in the configuration payload as a map of locale
//! tag → Fluent (FTL) source. Bundles are built per locale on top of a
//! built-in en-US resource; lookup falls back current locale → default
//! locale → the key itself, so a sparse payload never breaks rendering.
//!
//! Unparsable locale tags or FTL sources are skipped with a warning -
//! a bad translation payload must never take the surfaces down.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use fluent_bundle::{FluentBundle, FluentResource};
use tracing::warn;
use unic_langid::LanguageIdentifier;

use crate::error::EmbedError;

/// Locale used when none is configured or the configured one is absent.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Built-in strings for the default locale.
const BUILTIN_EN_US: &str = "\
mark-all-read = Mark all as read
header-icon-alt = header image
";

// =============================================================================
// I18n
// =============================================================================

/// Translation bundles plus the active locale.
pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    current: LanguageIdentifier,
    default_locale: LanguageIdentifier,
}

impl I18n {
    /// Build the provider from a configured locale and the translation
    /// payload. Entries that fail to parse are skipped with a warning.
    pub fn new(locale: Option<&str>, translations: &HashMap<String, String>) -> Self {
        let default_locale: LanguageIdentifier = DEFAULT_LOCALE
            .parse()
            .expect("default locale tag is valid");

        let mut i18n = Self {
            bundles: HashMap::new(),
            current: default_locale.clone(),
            default_locale,
        };
        i18n.add_locale(DEFAULT_LOCALE, BUILTIN_EN_US)
            .expect("built-in translation resource is valid FTL");

        for (tag, source) in translations {
            if let Err(err) = i18n.add_locale(tag, source) {
                warn!("skipping translation entry: {err}");
            }
        }

        if let Some(tag) = locale {
            i18n.set_locale(tag);
        }
        i18n
    }

    fn add_locale(&mut self, tag: &str, source: &str) -> Result<(), EmbedError> {
        let locale: LanguageIdentifier = tag
            .parse()
            .map_err(|_| EmbedError::Locale(tag.to_string()))?;
        let resource = FluentResource::try_new(source.to_string())
            .map_err(|_| EmbedError::Translation(tag.to_string()))?;

        let bundle = self
            .bundles
            .entry(locale.clone())
            .or_insert_with(|| FluentBundle::new(vec![locale]));
        // Later entries (host payload) override earlier ones (built-ins).
        bundle.add_resource_overriding(resource);
        Ok(())
    }

    /// Switch the active locale if a bundle for it exists.
    pub fn set_locale(&mut self, tag: &str) {
        match tag.parse::<LanguageIdentifier>() {
            Ok(locale) if self.bundles.contains_key(&locale) => self.current = locale,
            Ok(_) => warn!("locale `{tag}` has no translation bundle; keeping current"),
            Err(_) => warn!("invalid locale tag `{tag}`; keeping current"),
        }
    }

    pub fn locale(&self) -> String {
        self.current.to_string()
    }

    /// Look up a message: current locale, then default, then the key.
    pub fn tr(&self, key: &str) -> String {
        if let Some(value) = self.format(&self.current, key) {
            return value;
        }
        if let Some(value) = self.format(&self.default_locale, key) {
            return value;
        }
        key.to_string()
    }

    fn format(&self, locale: &LanguageIdentifier, key: &str) -> Option<String> {
        let bundle = self.bundles.get(locale)?;
        let message = bundle.get_message(key)?;
        let pattern = message.value()?;
        let mut errors = Vec::new();
        let value = bundle.format_pattern(pattern, None, &mut errors);
        if errors.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    }
}

// =============================================================================
// Current provider
// =============================================================================

thread_local! {
    /// Provider installed by the active render tree, if any.
    static CURRENT: RefCell<Option<Rc<I18n>>> = const { RefCell::new(None) };
}

/// Install (or clear) the provider for the active tree.
pub(crate) fn set_current(i18n: Option<Rc<I18n>>) {
    CURRENT.with(|current| *current.borrow_mut() = i18n);
}

/// The provider installed by the active tree, if any.
pub fn current() -> Option<Rc<I18n>> {
    CURRENT.with(|current| current.borrow().clone())
}

/// Translate through the active provider; echoes the key when no tree
/// is mounted.
pub fn tr(key: &str) -> String {
    match current() {
        Some(i18n) => i18n.tr(key),
        None => key.to_string(),
    }
}

/// Reset provider state. Test helper.
pub fn reset_i18n_state() {
    set_current(None);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_payload_locale_is_used() {
        let i18n = I18n::new(
            Some("fr"),
            &payload(&[("fr", "mark-all-read = Tout marquer comme lu\n")]),
        );
        assert_eq!(i18n.locale(), "fr");
        assert_eq!(i18n.tr("mark-all-read"), "Tout marquer comme lu");
    }

    #[test]
    fn test_missing_key_falls_back_to_default_locale() {
        let i18n = I18n::new(Some("fr"), &payload(&[("fr", "greeting = Bonjour\n")]));
        assert_eq!(i18n.tr("mark-all-read"), "Mark all as read");
    }

    #[test]
    fn test_unknown_key_echoes() {
        let i18n = I18n::new(None, &HashMap::new());
        assert_eq!(i18n.tr("does-not-exist"), "does-not-exist");
    }

    #[test]
    fn test_invalid_locale_tag_is_skipped() {
        let i18n = I18n::new(
            Some("not a locale"),
            &payload(&[("also not!!", "x = y\n")]),
        );
        assert_eq!(i18n.locale(), DEFAULT_LOCALE);
    }

    #[test]
    fn test_set_locale_requires_bundle() {
        let mut i18n = I18n::new(None, &payload(&[("de", "mark-all-read = Alle gelesen\n")]));
        i18n.set_locale("de");
        assert_eq!(i18n.locale(), "de");
        i18n.set_locale("pt-BR");
        assert_eq!(i18n.locale(), "de");
    }

    #[test]
    fn test_module_tr_without_provider_echoes_key() {
        reset_i18n_state();
        assert_eq!(tr("mark-all-read"), "mark-all-read");

        set_current(Some(Rc::new(I18n::new(None, &HashMap::new()))));
        assert_eq!(tr("mark-all-read"), "Mark all as read");
        reset_i18n_state();
    }
}
