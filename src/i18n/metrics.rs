//! Translation metrics and observability module.
//!
//! Counts requests, detection outcomes and translator calls. Each
//! `TranslationService` owns one instance; the server exposes its report.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of translate requests received
    requests: AtomicUsize,

    /// Requests answered immediately because the input was empty
    empty_inputs: AtomicUsize,

    /// Successful auto detections
    detections: AtomicUsize,

    /// Auto detections that fell back to English
    detection_fallbacks: AtomicUsize,

    /// Calls made to the translation model
    translator_calls: AtomicUsize,

    /// Translator calls that failed
    translator_failures: AtomicUsize,

    /// Requests rejected for naming an unregistered language
    unknown_languages: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_input(&self) {
        self.empty_inputs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection(&self) {
        self.detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection_fallback(&self) {
        self.detection_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translator_call(&self) {
        self.translator_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translator_failure(&self) {
        // Release pairs with the Acquire in `report`, publishing the earlier call
        self.translator_failures.fetch_add(1, Ordering::Release);
    }

    pub fn record_unknown_language(&self) {
        self.unknown_languages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn translator_calls(&self) -> usize {
        self.translator_calls.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        // Failures first: a failure is always recorded after its call, so a
        // later read of `calls` can never be smaller.
        let failures = self.translator_failures.load(Ordering::Acquire);
        let calls = self.translator_calls();
        let translator_success_rate = if calls > 0 {
            (calls.saturating_sub(failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            requests: self.requests(),
            empty_inputs: self.empty_inputs.load(Ordering::Relaxed),
            detections: self.detections.load(Ordering::Relaxed),
            detection_fallbacks: self.detection_fallbacks.load(Ordering::Relaxed),
            translator_calls: calls,
            translator_failures: failures,
            translator_success_rate,
            unknown_languages: self.unknown_languages.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of the translation counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub requests: usize,
    pub empty_inputs: usize,
    pub detections: usize,
    pub detection_fallbacks: usize,
    pub translator_calls: usize,
    pub translator_failures: usize,

    /// Translator success rate as a percentage (0-100)
    pub translator_success_rate: f64,

    pub unknown_languages: usize,
}
