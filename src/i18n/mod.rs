//! Supported languages and translation bookkeeping.
//!
//! - `registry`: the fixed table of supported languages and their model tags
//! - `language`: `LanguageTag`, the only way a tag reaches the translator
//! - `metrics`: counters for requests, detections and translator calls
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::LanguageRegistry;
//!
//! let registry = LanguageRegistry::get();
//! let french = registry.tag_for_name("French")?;
//! let detected = registry.tag_for_detected_code("ja"); // falls back to eng_Latn
//! ```

mod language;
mod metrics;
mod registry;

pub use language::LanguageTag;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::LanguageRegistry;
