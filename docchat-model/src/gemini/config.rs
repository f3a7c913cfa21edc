use docchat_core::{CoreError, Result};

/// The default Generative Language API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Connection and sampling settings for [`GeminiModel`](super::GeminiModel).
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Read `GEMINI_API_KEY` (required), `GEMINI_MODEL` and
    /// `GEMINI_TEMPERATURE` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or_else(|| {
            CoreError::Config("GEMINI_API_KEY not set in environment.".to_string())
        })?;
        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let mut config = Self::new(api_key, model);

        if let Some(raw) = get("GEMINI_TEMPERATURE") {
            config.temperature = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("GEMINI_TEMPERATURE must be a number, got '{raw}'"))
            })?;
        }
        Ok(config)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
