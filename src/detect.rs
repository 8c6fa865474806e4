//! Source language detection.
//!
//! The orchestrator only sees the [`LanguageDetector`] trait; the default
//! implementation wraps the `whatlang` trigram detector, which is
//! deterministic for a given input.

use whatlang::{Detector, Lang};

use crate::error::DetectionError;

/// Best-guess source language for a piece of text.
pub trait LanguageDetector: Send + Sync {
    /// Returns a short language code (ISO 639-1 where one exists).
    ///
    /// Guesses on a few words are unreliable: trigram statistics can report
    /// "Hello world" as Dutch, and a single letter as some arbitrary language.
    /// Codes outside the registry fall back to English downstream.
    fn detect(&self, text: &str) -> Result<String, DetectionError>;
}

/// Whatlang-based language detector
pub struct WhatlangDetector {
    detector: Detector,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        tracing::info!("Initializing Whatlang language detector");
        Self {
            detector: Detector::new(),
        }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String, DetectionError> {
        if text.trim().is_empty() {
            return Err(DetectionError::EmptyInput);
        }

        let info = self
            .detector
            .detect(text)
            .ok_or(DetectionError::Undetermined)?;

        tracing::debug!(
            lang = info.lang().code(),
            confidence = info.confidence(),
            reliable = info.is_reliable(),
            "Detected language"
        );

        Ok(iso_639_1(info.lang()).to_string())
    }
}

/// Two-letter code for the languages that have one in common use; the
/// three-letter whatlang code otherwise.
fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Urd => "ur",
        Lang::Hin => "hi",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Spa => "es",
        Lang::Cmn => "zh", // whatlang uses Cmn for Mandarin
        Lang::Ara => "ar",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Nld => "nl",
        Lang::Tur => "tr",
        Lang::Pol => "pl",
        Lang::Swe => "sv",
        Lang::Vie => "vi",
        Lang::Ukr => "uk",
        Lang::Pes => "fa",
        Lang::Ben => "bn",
        l => l.code(),
    }
}
