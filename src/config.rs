//! Server configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::analysis::{ExtractionMode, ReportOptions};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT '{0}'")]
    InvalidPort(String),
    #[error("invalid EXTRACTION_MODE: {0}")]
    InvalidExtractionMode(String),
    #[error("invalid MODEL_TIMEOUT_SECS '{0}'")]
    InvalidTimeout(String),
    #[error("invalid ALLOWED_ORIGIN '{0}'")]
    InvalidOrigin(String),
    #[error("invalid {0} '{1}' (expected true or false)")]
    InvalidFlag(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// `None` leaves the analysis endpoints answering 503
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub model_timeout: Duration,
    /// Staging directory for uploads; files never outlive their request
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    /// `None` means permissive CORS
    pub allowed_origin: Option<String>,
    pub extraction_mode: ExtractionMode,
    /// Drop the colon a `HEADER:` line leaves in front of each section
    pub strip_header_colon: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
            allowed_origin: None,
            extraction_mode: ExtractionMode::default(),
            strip_header_colon: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let model_timeout = match get("MODEL_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => defaults.model_timeout,
        };

        let extraction_mode = match get("EXTRACTION_MODE") {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidExtractionMode)?,
            None => defaults.extraction_mode,
        };

        let strip_header_colon = match get("STRIP_HEADER_COLON") {
            Some(raw) => parse_flag("STRIP_HEADER_COLON", raw)?,
            None => defaults.strip_header_colon,
        };

        let allowed_origin = get("ALLOWED_ORIGIN");
        if let Some(origin) = &allowed_origin {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))?;
        }

        Ok(Self {
            port,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_api_base: get("GEMINI_API_BASE").unwrap_or(defaults.gemini_api_base),
            model_timeout,
            upload_dir: get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            allowed_origin,
            extraction_mode,
            strip_header_colon,
        })
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            mode: self.extraction_mode,
            strip_header_colon: self.strip_header_colon,
        }
    }
}

fn parse_flag(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(key, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert_eq!(config.extraction_mode, ExtractionMode::Sequential);
        assert!(!config.strip_header_colon);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("EXTRACTION_MODE", "positional"),
            ("STRIP_HEADER_COLON", "True"),
            ("MODEL_TIMEOUT_SECS", "30"),
            ("ALLOWED_ORIGIN", "https://contracts.example.com"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_model, "gemini-1.5-pro");
        assert_eq!(config.extraction_mode, ExtractionMode::Positional);
        assert!(config.strip_header_colon);
        assert_eq!(
            config.report_options(),
            ReportOptions {
                mode: ExtractionMode::Positional,
                strip_header_colon: true,
            }
        );
        assert_eq!(config.model_timeout, Duration::from_secs(30));
        assert_eq!(config.allowed_origin.as_deref(), Some("https://contracts.example.com"));
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "http")])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("MODEL_TIMEOUT_SECS", "0")])),
            Err(ConfigError::InvalidTimeout(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("EXTRACTION_MODE", "sorted")])),
            Err(ConfigError::InvalidExtractionMode(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("ALLOWED_ORIGIN", "bad\norigin")])),
            Err(ConfigError::InvalidOrigin(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("STRIP_HEADER_COLON", "maybe")])),
            Err(ConfigError::InvalidFlag("STRIP_HEADER_COLON", _))
        ));
    }
}
