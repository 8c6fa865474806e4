//! Universal Translator: a single-page translator for English, Urdu, Hindi,
//! French, German, Spanish, Chinese and Arabic, backed by an NLLB-200
//! seq2seq model with optional source language detection.

pub mod config;
pub mod detect;
pub mod error;
pub mod i18n;
pub mod retry;
pub mod security;
pub mod server;
pub mod translation;
pub mod translator;
