//! Error types shared by the translation pipeline.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that reach the caller of a translation request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// A language selection outside the registry.
    #[error("Unknown language: '{0}'")]
    UnknownLanguage(String),

    /// The translation model failed or returned something unusable.
    #[error("Translation failed: {0}")]
    Translation(String),
}

impl TranslateError {
    /// Inline message written into the output box instead of a translation.
    pub fn user_message(&self) -> String {
        format!("Error: {}", self)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TranslateError::UnknownLanguage(_) => StatusCode::BAD_REQUEST,
            TranslateError::Translation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Reasons a detector could not name the input language.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("no text to detect")]
    EmptyInput,

    #[error("language could not be determined")]
    Undetermined,
}
