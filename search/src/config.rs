use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_PDF_BYTES: usize = 2 * 1024 * 1024;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Process-wide settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` keeps the server up; every search then fails with a configuration error.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub max_pdf_bytes: usize,
    pub bind_addr: String,
    pub public_dir: String,
    pub expose_error_details: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            max_pdf_bytes: DEFAULT_MAX_PDF_BYTES,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            public_dir: DEFAULT_PUBLIC_DIR.to_string(),
            expose_error_details: false,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let request_timeout = match non_empty("GEMINI_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.parse::<u64>()
                    .with_context(|| format!("GEMINI_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"))?,
            )),
            None => None,
        };

        let max_pdf_bytes = match non_empty("MAX_PDF_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("MAX_PDF_BYTES must be a byte count, got {raw:?}"))?,
            None => defaults.max_pdf_bytes,
        };

        let expose_error_details = non_empty("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        Ok(Self {
            api_key: non_empty("GEMINI_API_KEY"),
            model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: non_empty("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            request_timeout,
            max_pdf_bytes,
            bind_addr: non_empty("BIND_ADDR").unwrap_or(defaults.bind_addr),
            public_dir: non_empty("PUBLIC_DIR").unwrap_or(defaults.public_dir),
            expose_error_details,
        })
    }
}
