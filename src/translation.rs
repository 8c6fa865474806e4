use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::detect::LanguageDetector;
use crate::error::{DetectionError, TranslateError};
use crate::i18n::{LanguageRegistry, LanguageTag, TranslationMetrics};
use crate::translator::Translator;

/// Source selection meaning "infer the language from the text".
pub const AUTO_DETECT: &str = "Auto Detect";

/// How the source tag of a request was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceResolution {
    /// The user picked a language.
    Explicit(LanguageTag),
    /// The detector named a language; `code` is what it reported.
    Detected { code: String, tag: LanguageTag },
    /// Detection failed and the fallback language was assumed.
    FallbackAssumed { reason: DetectionError },
}

impl SourceResolution {
    pub fn tag(&self) -> LanguageTag {
        match self {
            SourceResolution::Explicit(tag) | SourceResolution::Detected { tag, .. } => *tag,
            SourceResolution::FallbackAssumed { .. } => LanguageRegistry::get().fallback(),
        }
    }

    /// Notice shown above the translation for auto-detected requests.
    pub fn note(&self) -> Option<String> {
        match self {
            SourceResolution::Explicit(_) => None,
            SourceResolution::Detected { code, tag } => {
                Some(format!("**[Detected: {} -> {}]**\n\n", code, tag))
            }
            SourceResolution::FallbackAssumed { .. } => Some(format!(
                "**[Detection failed, assuming {}]**\n\n",
                LanguageRegistry::get().fallback().name()
            )),
        }
    }
}

/// Output of one translation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationResult {
    pub display_text: String,
    pub detection_note: Option<String>,
}

impl TranslationResult {
    /// Text for the output box: the detection note (if any) followed by the translation.
    pub fn render(&self) -> String {
        match &self.detection_note {
            Some(note) => format!("{}{}", note, self.display_text),
            None => self.display_text.clone(),
        }
    }
}

/// Collapse newlines so the detector sees one line of text.
pub fn normalize(raw: &str) -> String {
    raw.replace('\n', " ").trim().to_string()
}

/// Resolves languages, detects when asked to, and calls the translator.
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    detector: Arc<dyn LanguageDetector>,
    metrics: TranslationMetrics,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>, detector: Arc<dyn LanguageDetector>) -> Self {
        Self {
            translator,
            detector,
            metrics: TranslationMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    /// Translate `raw` from `source_selection` (a language name or
    /// [`AUTO_DETECT`]) into `target_selection`.
    ///
    /// Empty input returns an empty result without touching the detector or
    /// the translator. The translator receives `raw` as entered; only
    /// detection works on the normalized text.
    ///
    /// # Errors
    /// `UnknownLanguage` for unregistered selections, `Translation` when the
    /// model call fails. Detection failures never surface here.
    pub async fn translate(
        &self,
        raw: &str,
        source_selection: &str,
        target_selection: &str,
    ) -> Result<TranslationResult, TranslateError> {
        self.metrics.record_request();

        if raw.is_empty() {
            self.metrics.record_empty_input();
            return Ok(TranslationResult::default());
        }

        let clean = normalize(raw);
        let registry = LanguageRegistry::get();

        let target = registry
            .tag_for_name(target_selection)
            .inspect_err(|_| self.metrics.record_unknown_language())?;
        let source = self
            .resolve_source(&clean, source_selection)
            .inspect_err(|_| self.metrics.record_unknown_language())?;

        debug!(
            source_lang = %source.tag(),
            target_lang = %target,
            chars = raw.chars().count(),
            "Translating"
        );

        self.metrics.record_translator_call();
        let translated = self
            .translator
            .translate(raw, source.tag(), target)
            .await
            .inspect_err(|e| {
                self.metrics.record_translator_failure();
                warn!("Translation {} -> {} failed: {}", source.tag(), target, e);
            })?;

        info!("Translated {} -> {}", source.tag(), target);

        Ok(TranslationResult {
            display_text: translated,
            detection_note: source.note(),
        })
    }

    /// Like [`translate`](Self::translate), but errors become an inline
    /// message so the output box always receives something.
    pub async fn translate_for_display(
        &self,
        raw: &str,
        source_selection: &str,
        target_selection: &str,
    ) -> String {
        match self.translate(raw, source_selection, target_selection).await {
            Ok(result) => result.render(),
            Err(e) => e.user_message(),
        }
    }

    /// Decide the source tag for already-normalized text.
    pub fn resolve_source(
        &self,
        clean: &str,
        selection: &str,
    ) -> Result<SourceResolution, TranslateError> {
        let registry = LanguageRegistry::get();

        if selection != AUTO_DETECT {
            return registry
                .tag_for_name(selection)
                .map(SourceResolution::Explicit);
        }

        match self.detector.detect(clean) {
            Ok(code) => {
                self.metrics.record_detection();
                let tag = registry.tag_for_detected_code(&code);
                debug!("Detected '{}' -> {}", code, tag);
                Ok(SourceResolution::Detected { code, tag })
            }
            Err(reason) => {
                self.metrics.record_detection_fallback();
                debug!("Detection failed ({}), assuming fallback", reason);
                Ok(SourceResolution::FallbackAssumed { reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ==================== Test Doubles ====================

    /// Echoes its arguments and records every call.
    #[derive(Default)]
    struct RecordingTranslator {
        calls: Mutex<Vec<(String, LanguageTag, LanguageTag)>>,
    }

    #[async_trait]
    impl Translator for RecordingTranslator {
        async fn translate(
            &self,
            text: &str,
            source: LanguageTag,
            target: LanguageTag,
        ) -> Result<String, TranslateError> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), source, target));
            Ok(format!("<{}>", target))
        }
    }

    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(
            &self,
            _: &str,
            _: LanguageTag,
            _: LanguageTag,
        ) -> Result<String, TranslateError> {
            Err(TranslateError::Translation("model crashed".to_string()))
        }
    }

    struct FixedDetector {
        result: Result<String, DetectionError>,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl FixedDetector {
        fn returning(result: Result<&str, DetectionError>) -> Self {
            Self {
                result: result.map(str::to_string),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl LanguageDetector for FixedDetector {
        fn detect(&self, text: &str) -> Result<String, DetectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(text.to_string());
            self.result.clone()
        }
    }

    fn service(
        detected: Result<&str, DetectionError>,
    ) -> (TranslationService, Arc<RecordingTranslator>, Arc<FixedDetector>) {
        let translator = Arc::new(RecordingTranslator::default());
        let detector = Arc::new(FixedDetector::returning(detected));
        let service = TranslationService::new(translator.clone(), detector.clone());
        (service, translator, detector)
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_replaces_newlines_and_trims() {
        assert_eq!(normalize("  Hello\nworld\n"), "Hello world");
        assert_eq!(normalize("\n"), "");
        assert_eq!(normalize("a\r\nb"), "a\r b");
    }

    // ==================== Empty Input Tests ====================

    #[tokio::test]
    async fn test_empty_input_skips_detector_and_translator() {
        let (service, translator, detector) = service(Ok("en"));

        let result = service.translate("", AUTO_DETECT, "French").await.unwrap();

        assert_eq!(result.render(), "");
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
        assert!(translator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_ignores_selections() {
        let (service, _, _) = service(Ok("en"));
        let output = service.translate_for_display("", "Klingon", "Vulcan").await;
        assert_eq!(output, "");
        assert_eq!(service.metrics().report().empty_inputs, 1);
    }

    #[tokio::test]
    async fn test_whitespace_only_input_is_not_empty() {
        let translator = Arc::new(RecordingTranslator::default());
        let service = TranslationService::new(
            translator.clone(),
            Arc::new(crate::detect::WhatlangDetector::new()),
        );

        let output = service
            .translate_for_display("  \n ", AUTO_DETECT, "French")
            .await;

        assert!(output.starts_with("**[Detection failed, assuming English]**\n\n"));
        let calls = translator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "  \n ");
        assert_eq!(calls[0].1.as_str(), "eng_Latn");
        assert_eq!(service.metrics().report().empty_inputs, 0);
    }

    // ==================== Explicit Source Tests ====================

    #[tokio::test]
    async fn test_explicit_source_has_no_note() {
        let (service, translator, detector) = service(Ok("de"));

        let result = service
            .translate("Hello world", "English", "French")
            .await
            .unwrap();

        assert_eq!(result.detection_note, None);
        assert_eq!(result.render(), "<fra_Latn>");
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);

        let calls = translator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.as_str(), "eng_Latn");
        assert_eq!(calls[0].2.as_str(), "fra_Latn");
    }

    // ==================== Auto Detect Tests ====================

    #[tokio::test]
    async fn test_auto_detect_prefixes_note() {
        let (service, translator, _) = service(Ok("en"));

        let output = service
            .translate_for_display("Hello world", AUTO_DETECT, "French")
            .await;

        assert!(output.starts_with("**[Detected: en -> eng_Latn]**\n\n"));
        assert!(output.ends_with("<fra_Latn>"));
        assert_eq!(translator.calls.lock().unwrap()[0].1.as_str(), "eng_Latn");
    }

    #[tokio::test]
    async fn test_auto_detect_maps_detected_code() {
        let (service, translator, _) = service(Ok("ur"));

        let result = service
            .translate("آپ کیسے ہیں", AUTO_DETECT, "English")
            .await
            .unwrap();

        assert_eq!(
            result.detection_note.as_deref(),
            Some("**[Detected: ur -> urd_Arab]**\n\n")
        );
        assert_eq!(translator.calls.lock().unwrap()[0].1.as_str(), "urd_Arab");
    }

    #[tokio::test]
    async fn test_auto_detect_unmapped_code_uses_fallback_tag() {
        let (service, translator, _) = service(Ok("ja"));

        let result = service
            .translate("こんにちは", AUTO_DETECT, "Spanish")
            .await
            .unwrap();

        assert_eq!(
            result.detection_note.as_deref(),
            Some("**[Detected: ja -> eng_Latn]**\n\n")
        );
        assert_eq!(translator.calls.lock().unwrap()[0].1.as_str(), "eng_Latn");
    }

    #[tokio::test]
    async fn test_detection_failure_assumes_english() {
        let (service, translator, _) = service(Err(DetectionError::Undetermined));

        let output = service.translate_for_display("x", AUTO_DETECT, "Hindi").await;

        assert!(output.contains("Detection failed, assuming English"));
        assert!(output.ends_with("<hin_Deva>"));
        let calls = translator.calls.lock().unwrap();
        assert_eq!(calls[0].1.as_str(), "eng_Latn");
        assert_eq!(calls[0].2.as_str(), "hin_Deva");
        assert_eq!(service.metrics().report().detection_fallbacks, 1);
    }

    #[tokio::test]
    async fn test_detector_sees_normalized_text_translator_sees_raw() {
        let (service, translator, detector) = service(Ok("en"));

        service
            .translate("  Hello\nworld  ", AUTO_DETECT, "German")
            .await
            .unwrap();

        assert_eq!(detector.seen.lock().unwrap()[0], "Hello world");
        assert_eq!(translator.calls.lock().unwrap()[0].0, "  Hello\nworld  ");
    }

    #[test]
    fn test_resolve_source_outcomes() {
        let (service, _, _) = service(Err(DetectionError::EmptyInput));

        let explicit = service.resolve_source("hola", "Spanish").unwrap();
        assert_eq!(explicit.tag().as_str(), "spa_Latn");
        assert!(explicit.note().is_none());

        let fallback = service.resolve_source("", AUTO_DETECT).unwrap();
        assert_eq!(
            fallback,
            SourceResolution::FallbackAssumed {
                reason: DetectionError::EmptyInput
            }
        );
        assert_eq!(fallback.tag().as_str(), "eng_Latn");
    }

    // ==================== Error Tests ====================

    #[tokio::test]
    async fn test_unknown_target_is_error() {
        let (service, translator, _) = service(Ok("en"));

        let err = service.translate("Hello", "English", "Klingon").await.unwrap_err();

        assert_eq!(err, TranslateError::UnknownLanguage("Klingon".to_string()));
        assert!(translator.calls.lock().unwrap().is_empty());
        assert_eq!(service.metrics().report().unknown_languages, 1);
    }

    #[tokio::test]
    async fn test_unknown_source_is_inline_error() {
        let (service, _, _) = service(Ok("en"));

        let output = service
            .translate_for_display("Hello", "Elvish", "French")
            .await;

        assert_eq!(output, "Error: Unknown language: 'Elvish'");
    }

    #[tokio::test]
    async fn test_translator_failure_is_inline_error() {
        let detector = Arc::new(FixedDetector::returning(Ok("en")));
        let service = TranslationService::new(Arc::new(FailingTranslator), detector);

        let output = service
            .translate_for_display("Hello", AUTO_DETECT, "French")
            .await;

        assert!(output.starts_with("Error: Translation failed"));
        assert!(output.contains("model crashed"));

        let report = service.metrics().report();
        assert_eq!(report.translator_calls, 1);
        assert_eq!(report.translator_failures, 1);
    }

    // ==================== Concurrency Tests ====================

    #[tokio::test]
    async fn test_concurrent_requests_keep_their_targets() {
        let (service, _, _) = service(Ok("en"));
        let service = Arc::new(service);

        let targets = ["French", "Chinese", "Urdu", "German", "Arabic", "Hindi"];
        let outputs = futures::future::join_all(targets.iter().map(|target| {
            let service = service.clone();
            async move {
                service
                    .translate("Good morning", "English", target)
                    .await
                    .unwrap()
                    .render()
            }
        }))
        .await;

        let registry = LanguageRegistry::get();
        for (target, output) in targets.iter().zip(outputs) {
            let expected = registry.tag_for_name(target).unwrap();
            assert_eq!(output, format!("<{}>", expected));
        }
    }
}
