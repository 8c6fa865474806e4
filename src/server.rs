//! HTTP surface: the translator page and its JSON API.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::i18n::LanguageRegistry;
use crate::security::constant_time_compare;
use crate::translation::{TranslationService, AUTO_DETECT};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
    /// Bearer token required by /metrics when set
    pub api_key: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/languages", get(languages))
        .route("/api/translate", post(translate))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Translate ====================

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_source() -> String {
    AUTO_DETECT.to_string()
}

fn default_target() -> String {
    "English".to_string()
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    /// Text for the output box: translation, or an inline error message
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/translate
async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected translate request: {}", rejection.body_text());
            let body = TranslateResponse {
                output: format!("Error: Invalid request: {}", rejection.body_text()),
                error: Some(rejection.body_text()),
            };
            return (rejection.status(), Json(body)).into_response();
        }
    };

    match state
        .service
        .translate(&request.text, &request.source, &request.target)
        .await
    {
        Ok(result) => Json(TranslateResponse {
            output: result.render(),
            error: None,
        })
        .into_response(),
        Err(e) => {
            warn!(
                source_lang = %request.source,
                target_lang = %request.target,
                "Translate request failed: {}",
                e
            );
            let body = TranslateResponse {
                output: e.user_message(),
                error: Some(e.to_string()),
            };
            (e.status_code(), Json(body)).into_response()
        }
    }
}

// ==================== Languages ====================

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub sources: Vec<&'static str>,
    pub targets: Vec<&'static str>,
}

fn source_choices() -> Vec<&'static str> {
    std::iter::once(AUTO_DETECT)
        .chain(LanguageRegistry::get().names())
        .collect()
}

/// GET /api/languages
async fn languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        sources: source_choices(),
        targets: LanguageRegistry::get().names(),
    })
}

// ==================== Health & Metrics ====================

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /metrics
async fn metrics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(expected) = &state.api_key {
        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or("");
        if !constant_time_compare(provided, expected) {
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    }

    Json(state.service.metrics().report()).into_response()
}

// ==================== Page ====================

/// GET /
async fn index() -> Html<String> {
    Html(render_page())
}

fn options(choices: &[&str], selected: &str) -> String {
    choices
        .iter()
        .map(|choice| {
            let marker = if *choice == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, choice, marker)
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

fn render_page() -> String {
    let names = LanguageRegistry::get().names();
    let listed = match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => {
            format!("{}, and {}", rest.join(", "), last)
        }
        _ => names.join(", "),
    };

    PAGE_TEMPLATE
        .replace("{{LANGUAGES}}", &listed)
        .replace("{{SOURCE_OPTIONS}}", &options(&source_choices(), AUTO_DETECT))
        .replace("{{TARGET_OPTIONS}}", &options(&names, "English"))
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Universal Translator</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #1f2937; }
    .row { display: flex; gap: 1rem; }
    .row > label { flex: 1; }
    label { display: block; font-size: .9rem; font-weight: 600; margin-top: 1rem; }
    select, textarea { width: 100%; box-sizing: border-box; margin-top: .3rem; padding: .5rem; border: 1px solid #d1d5db; border-radius: 8px; font: inherit; }
    button { margin-top: 1rem; width: 100%; padding: .7rem; border: 0; border-radius: 8px; background: #6366f1; color: #fff; font-size: 1rem; cursor: pointer; }
    button:disabled { opacity: .6; }
  </style>
</head>
<body>
  <h1>&#127757; Universal Translator - Multilingual Seq2Seq Transformer</h1>
  <p>Translate between <strong>{{LANGUAGES}}</strong>.</p>

  <div class="row">
    <label>Source Language
      <select id="source">
          {{SOURCE_OPTIONS}}
      </select>
    </label>
    <label>Target Language
      <select id="target">
          {{TARGET_OPTIONS}}
      </select>
    </label>
  </div>

  <label>Input Text
    <textarea id="input" rows="3" placeholder="Type text here..."></textarea>
  </label>
  <label>Translated Text
    <textarea id="output" rows="3" readonly></textarea>
  </label>

  <button id="translate">Translate</button>

  <script>
    const button = document.getElementById("translate");
    button.addEventListener("click", async () => {
      const output = document.getElementById("output");
      button.disabled = true;
      try {
        const response = await fetch("/api/translate", {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify({
            text: document.getElementById("input").value,
            source: document.getElementById("source").value,
            target: document.getElementById("target").value,
          }),
        });
        const body = await response.json();
        output.value = body.output;
      } catch (err) {
        output.value = "Error: " + err;
      } finally {
        button.disabled = false;
      }
    });
  </script>
</body>
</html>
"#;
