//! Translated labels for questions, options and messages.
//!
//! Translations are JSON documents addressed with dotted keys such as
//! `attributes.odor.question`. English and Turkish are built in; a file at
//! `<config dir>/translations/<locale>.json` adds a locale or replaces a
//! built-in one. A key missing from the active locale falls back to English
//! and then to the key itself.

use crate::error::{CliError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const ENGLISH: &str = include_str!("../translations/en.json");
const TURKISH: &str = include_str!("../translations/tr.json");

/// Locale used when nothing else is available.
pub const DEFAULT_LOCALE: &str = "en";

/// Dotted-key translation lookup.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    messages: Value,
    fallback: Option<Value>,
}

impl Translator {
    /// The built-in English translations.
    pub fn english() -> Result<Self> {
        Self::from_json(DEFAULT_LOCALE, ENGLISH)
    }

    /// Translations parsed from a JSON document, without fallback.
    pub fn from_json(locale: &str, json: &str) -> Result<Self> {
        let messages: Value = serde_json::from_str(json)?;
        if !messages.is_object() {
            return Err(CliError::Translation(format!(
                "translations for '{}' must be a JSON object",
                locale
            )));
        }
        Ok(Self {
            locale: locale.to_string(),
            messages,
            fallback: None,
        })
    }

    /// Translations for `locale`, looked up in `dir` and then among the
    /// built-in locales.
    ///
    /// Unknown locales fall back to English with a warning.
    pub fn load(locale: &str, dir: &Path) -> Result<Self> {
        let english = Self::english()?;
        let path = dir.join(format!("{}.json", locale));
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) if locale == DEFAULT_LOCALE => return Ok(english),
            Err(e) => match built_in(locale) {
                Some(json) => json.to_string(),
                None => {
                    warn!(
                        locale,
                        path = %path.display(),
                        error = %e,
                        "translation file not found, using English"
                    );
                    return Ok(english);
                }
            },
        };

        let mut translator = Self::from_json(locale, &contents)?;
        translator.fallback = Some(english.messages);
        debug!(locale, "loaded translations");
        Ok(translator)
    }

    /// Active locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translate `key`, or return the key itself when it is not found.
    pub fn t(&self, key: &str) -> String {
        lookup(&self.messages, key)
            .or_else(|| self.fallback.as_ref().and_then(|f| lookup(f, key)))
            .unwrap_or_else(|| key.to_string())
    }

    /// Translate `key` and substitute `{name}` placeholders.
    pub fn t_with<V: AsRef<str>>(&self, key: &str, params: &[(&str, V)]) -> String {
        params
            .iter()
            .fold(self.t(key), |text, (name, value)| {
                text.replace(&format!("{{{}}}", name), value.as_ref())
            })
    }
}

fn built_in(locale: &str) -> Option<&'static str> {
    match locale {
        "en" => Some(ENGLISH),
        "tr" => Some(TURKISH),
        _ => None,
    }
}

fn lookup(messages: &Value, key: &str) -> Option<String> {
    let value = key
        .split('.')
        .try_fold(messages, |node, part| node.as_object()?.get(part))?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_english_lookup() {
        let tr = Translator::english().unwrap();
        assert_eq!(tr.locale(), "en");
        assert_eq!(tr.t("attributes.odor.question"), "What is the odor of the mushroom?");
        assert_eq!(tr.t("attributes.stalk_root.options.MISSING"), "Missing/Not visible");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let tr = Translator::english().unwrap();
        assert_eq!(tr.t("attributes.veil_type.question"), "attributes.veil_type.question");
        // A key naming a table rather than a string is not a translation
        assert_eq!(tr.t("attributes.odor"), "attributes.odor");
    }

    #[test]
    fn test_parameters() {
        let tr = Translator::english().unwrap();
        assert_eq!(tr.t_with("interview.progress", &[("count", "5")]), "Questions answered: 5");
        assert_eq!(
            tr.t_with("result.matched_rule", &[("unused", "x")]),
            "Matched rule: {rule}"
        );
    }

    #[test]
    fn test_every_reference_attribute_is_translated() {
        let tr = Translator::english().unwrap();
        let engine = agaric_engine::Engine::reference(Default::default()).unwrap();
        for attribute in engine.catalog().attributes() {
            let question = engine.question_for(attribute.name(), |k| tr.t(k)).unwrap();
            assert_ne!(question.prompt, question.prompt_key);
            assert_ne!(question.description, question.description_key);
            for (code, label) in &question.options {
                assert!(!label.starts_with("attributes."), "{}.{}", attribute.name(), code);
            }
        }
    }

    #[test]
    fn test_locale_file_with_english_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("de.json"),
            r#"{"attributes": {"odor": {"question": "Wie riecht der Pilz?"}}}"#,
        )
        .unwrap();

        let tr = Translator::load("de", dir.path()).unwrap();
        assert_eq!(tr.locale(), "de");
        assert_eq!(tr.t("attributes.odor.question"), "Wie riecht der Pilz?");
        assert_eq!(tr.t("attributes.odor.options.f"), "Foul");
    }

    #[test]
    fn test_built_in_turkish() {
        let dir = TempDir::new().unwrap();
        let tr = Translator::load("tr", dir.path()).unwrap();
        assert_eq!(tr.locale(), "tr");
        assert_eq!(tr.t("attributes.odor.question"), "Mantarın kokusu nedir?");
        assert_eq!(tr.t("attributes.stalk_root.options.MISSING"), "Yok/Görünmüyor");
        assert_eq!(
            tr.t_with("interview.progress", &[("count", "2")]),
            "Yanıtlanan soru sayısı: 2"
        );
    }

    #[test]
    fn test_every_built_in_locale_covers_the_reference_catalog() {
        let dir = TempDir::new().unwrap();
        let engine = agaric_engine::Engine::reference(Default::default()).unwrap();
        for locale in ["en", "tr"] {
            let tr = Translator::load(locale, dir.path()).unwrap();
            assert_eq!(tr.locale(), locale);
            let own = Translator::from_json(locale, built_in(locale).unwrap()).unwrap();
            for attribute in engine.catalog().attributes() {
                let question = engine.question_for(attribute.name(), |k| own.t(k)).unwrap();
                assert_ne!(question.prompt, question.prompt_key, "{}", locale);
                for (code, label) in &question.options {
                    assert!(
                        !label.starts_with("attributes."),
                        "{} {}.{}",
                        locale,
                        attribute.name(),
                        code
                    );
                }
            }
        }
    }

    #[test]
    fn test_locale_file_replaces_built_in() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tr.json"),
            r#"{"attributes": {"odor": {"question": "Koku?"}}}"#,
        )
        .unwrap();

        let tr = Translator::load("tr", dir.path()).unwrap();
        assert_eq!(tr.t("attributes.odor.question"), "Koku?");
        assert_eq!(tr.t("attributes.odor.options.f"), "Foul");
    }

    #[test]
    fn test_unknown_locale_uses_english() {
        let dir = TempDir::new().unwrap();
        let tr = Translator::load("xx", dir.path()).unwrap();
        assert_eq!(tr.locale(), "en");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            Translator::from_json("en", "[1, 2]"),
            Err(CliError::Translation(_))
        ));
    }
}
