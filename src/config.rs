use anyhow::Result;

/// Hosted inference endpoint for the distilled 600M NLLB-200 checkpoint
pub const DEFAULT_TRANSLATOR_API_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/nllb-200-distilled-600M";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Translation model
    pub translator_api_url: String,
    pub translator_api_token: Option<String>,
    pub translator_max_length: u32,
    pub request_timeout_secs: u64,

    // Protects /metrics when set
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: parse_or("PORT", 7860),

            translator_api_url: std::env::var("TRANSLATOR_API_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATOR_API_URL.to_string()),
            translator_api_token: non_empty_var("TRANSLATOR_API_TOKEN"),
            translator_max_length: parse_or("TRANSLATOR_MAX_LENGTH", 400),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 60),

            api_key: non_empty_var("API_KEY"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 7860,
            translator_api_url: DEFAULT_TRANSLATOR_API_URL.to_string(),
            translator_api_token: None,
            translator_max_length: 400,
            request_timeout_secs: 60,
            api_key: None,
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
