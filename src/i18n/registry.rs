//! Language registry: Single source of truth for all supported languages.
//!
//! Maps the human-readable names shown in the UI to the language+script tags
//! understood by the translation model, and the short codes produced by the
//! language detector to those same tags. Built once on first access and
//! immutable thereafter.

use std::sync::OnceLock;

use crate::error::TranslateError;
use crate::i18n::LanguageTag;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Name shown in the dropdowns (e.g., "English", "Urdu")
    pub name: &'static str,

    /// Model tag: ISO 639-3 code plus ISO 15924 script (e.g., "eng_Latn")
    pub tag: &'static str,

    /// Code reported by the detector for this language (e.g., "en")
    pub detected_code: &'static str,

    /// Whether this language is assumed when detection fails (only one should be true)
    pub is_fallback: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Resolve a display name to its model tag.
    ///
    /// # Errors
    /// `TranslateError::UnknownLanguage` when the name is not registered. The UI
    /// only offers registered names, so this guards hand-crafted requests.
    pub fn tag_for_name(&self, name: &str) -> Result<LanguageTag, TranslateError> {
        self.languages
            .iter()
            .find(|lang| lang.name == name)
            .map(|lang| LanguageTag::new(lang.tag))
            .ok_or_else(|| TranslateError::UnknownLanguage(name.to_string()))
    }

    /// Resolve a detector code to its model tag.
    ///
    /// Codes without an entry resolve to the fallback tag; this never fails.
    pub fn tag_for_detected_code(&self, code: &str) -> LanguageTag {
        self.languages
            .iter()
            .find(|lang| lang.detected_code == code)
            .map(|lang| LanguageTag::new(lang.tag))
            .unwrap_or_else(|| self.fallback())
    }

    /// The tag assumed when the source language cannot be determined.
    ///
    /// # Panics
    /// Panics if the table does not contain exactly one fallback entry, which is
    /// a configuration error in `default_languages`.
    pub fn fallback(&self) -> LanguageTag {
        let mut fallbacks = self.languages.iter().filter(|lang| lang.is_fallback);
        match (fallbacks.next(), fallbacks.next()) {
            (Some(lang), None) => LanguageTag::new(lang.tag),
            (None, _) => panic!("No fallback language found in registry"),
            (Some(_), Some(_)) => panic!("Multiple fallback languages found in registry"),
        }
    }

    /// Display names in dropdown order.
    pub fn names(&self) -> Vec<&'static str> {
        self.languages.iter().map(|lang| lang.name).collect()
    }

    /// Reverse lookup used for logging and notes.
    pub fn name_for_tag(&self, tag: LanguageTag) -> Option<&'static str> {
        self.languages
            .iter()
            .find(|lang| lang.tag == tag.as_str())
            .map(|lang| lang.name)
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            name: "English",
            tag: "eng_Latn",
            detected_code: "en",
            is_fallback: true,
        },
        LanguageConfig {
            name: "Urdu",
            tag: "urd_Arab",
            detected_code: "ur",
            is_fallback: false,
        },
        LanguageConfig {
            name: "Hindi",
            tag: "hin_Deva",
            detected_code: "hi",
            is_fallback: false,
        },
        LanguageConfig {
            name: "French",
            tag: "fra_Latn",
            detected_code: "fr",
            is_fallback: false,
        },
        LanguageConfig {
            name: "German",
            tag: "deu_Latn",
            detected_code: "de",
            is_fallback: false,
        },
        LanguageConfig {
            name: "Spanish",
            tag: "spa_Latn",
            detected_code: "es",
            is_fallback: false,
        },
        LanguageConfig {
            name: "Chinese",
            tag: "zho_Hans",
            detected_code: "zh",
            is_fallback: false,
        },
        LanguageConfig {
            name: "Arabic",
            tag: "ara_Arab",
            detected_code: "ar",
            is_fallback: false,
        },
    ]
}
