use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{ANTHROPIC_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Every value has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory scanned for `*.css` style files.
    pub styles_dir: PathBuf,
    /// Generated PDFs are also written here.
    pub output_dir: PathBuf,
    /// Chromium/Chrome binary. `None` lets the driver auto-detect one.
    pub chrome_executable: Option<PathBuf>,
    pub browser_timeout_secs: u64,
    pub llm_api_url: String,
    pub llm_model: String,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            styles_dir: PathBuf::from("styles"),
            output_dir: PathBuf::from("helper_output"),
            chrome_executable: None,
            browser_timeout_secs: 60,
            llm_api_url: ANTHROPIC_API_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default = Self::default();
        Ok(Config {
            port: parse_env("PORT", default.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(default.rust_log),
            styles_dir: std::env::var("STYLES_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.styles_dir),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),
            chrome_executable: std::env::var("CHROME_EXECUTABLE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            browser_timeout_secs: parse_env("BROWSER_TIMEOUT_SECS", default.browser_timeout_secs)?,
            llm_api_url: std::env::var("LLM_API_URL").unwrap_or(default.llm_api_url),
            llm_model: std::env::var("LLM_MODEL").unwrap_or(default.llm_model),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", default.max_upload_bytes)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.output_dir, PathBuf::from("helper_output"));
        assert_eq!(config.styles_dir, PathBuf::from("styles"));
        assert!(config.chrome_executable.is_none());
        assert_eq!(config.max_upload_bytes, 5_242_880);
    }

    #[test]
    fn test_parse_env_falls_back_when_unset() {
        let value: u16 = parse_env("HELPER_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("HELPER_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = parse_env("HELPER_TEST_BAD_PORT", 8080);
        std::env::remove_var("HELPER_TEST_BAD_PORT");
        assert!(result.is_err());
    }
}
