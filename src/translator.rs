//! Translation model boundary.
//!
//! The target language is always an explicit argument of
//! [`Translator::translate`]. Engines that can only be steered through a
//! shared "forced output language" setting are wrapped in
//! [`LockedTranslator`], which holds one lock across configure, invoke and
//! read so concurrent requests cannot overwrite each other's target.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::TranslateError;
use crate::i18n::LanguageTag;
use crate::retry::{with_retry_if, RetryConfig};

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: LanguageTag,
        target: LanguageTag,
    ) -> Result<String, TranslateError>;
}

// ==================== Hosted inference endpoint ====================

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    src_lang: LanguageTag,
    tgt_lang: LanguageTag,
    /// First decoder token; pins the output language
    forced_bos_token: LanguageTag,
    max_length: u32,
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    translation_text: String,
}

/// Failure of a single inference call, before retries are exhausted
#[derive(Debug)]
struct CallError {
    status: Option<StatusCode>,
    message: String,
}

impl CallError {
    fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// 429 and 5xx are transient (rate limits, cold model loads); other 4xx are not.
    /// Network failures have no status and are always retried.
    fn is_retryable(&self) -> bool {
        match self.status {
            Some(status) => status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
            None => true,
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "inference API error ({}): {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Translator backed by a Hugging Face style translation endpoint serving an
/// NLLB-200 checkpoint.
pub struct HttpTranslator {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
    max_length: u32,
    retry: RetryConfig,
}

impl HttpTranslator {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client for translator")?;

        Ok(Self {
            client,
            api_url: config.translator_api_url.clone(),
            api_token: config.translator_api_token.clone(),
            max_length: config.translator_max_length,
            retry: RetryConfig::inference_call(),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn call(&self, request: &InferenceRequest<'_>) -> Result<String, CallError> {
        let mut builder = self.client.post(&self.api_url).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CallError::transport(format!("request to inference API failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(CallError {
                status: Some(status),
                message: body,
            });
        }

        let outputs: Vec<InferenceOutput> = response.json().await.map_err(|e| {
            CallError::transport(format!("failed to parse inference response: {}", e))
        })?;

        outputs
            .into_iter()
            .next()
            .map(|output| output.translation_text)
            .ok_or_else(|| CallError {
                status: Some(StatusCode::BAD_GATEWAY),
                message: "inference response contained no translations".to_string(),
            })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source: LanguageTag,
        target: LanguageTag,
    ) -> Result<String, TranslateError> {
        let request = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                src_lang: source,
                tgt_lang: target,
                forced_bos_token: target,
                max_length: self.max_length,
            },
        };

        with_retry_if(
            &self.retry,
            &format!("Translation {} -> {}", source, target),
            || self.call(&request),
            CallError::is_retryable,
        )
        .await
        .map_err(|e| TranslateError::Translation(e.to_string()))
    }
}

// ==================== Shared-configuration engines ====================

/// An engine whose output language is a mutable setting rather than a call
/// argument, like a loaded seq2seq pipeline with a forced BOS token.
#[async_trait]
pub trait ForcedOutputModel: Send {
    fn set_forced_output(&mut self, target: LanguageTag);

    async fn generate(&mut self, text: &str, source: LanguageTag)
        -> Result<String, TranslateError>;
}

/// Serializes access to a [`ForcedOutputModel`] so that setting the forced
/// output and generating happen as one step per request.
pub struct LockedTranslator<M> {
    model: Mutex<M>,
}

impl<M: ForcedOutputModel> LockedTranslator<M> {
    pub fn new(model: M) -> Self {
        Self {
            model: Mutex::new(model),
        }
    }
}

#[async_trait]
impl<M: ForcedOutputModel> Translator for LockedTranslator<M> {
    async fn translate(
        &self,
        text: &str,
        source: LanguageTag,
        target: LanguageTag,
    ) -> Result<String, TranslateError> {
        let mut model = self.model.lock().await;
        model.set_forced_output(target);
        model.generate(text, source).await
    }
}
