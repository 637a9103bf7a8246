use std::path::PathBuf;
use std::time::Duration;

use kuvert_ocr::{ConfigError, ExtractionConfig, DEFAULT_LANG};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_CONCURRENT_SCANS: usize = 4;

#[derive(Debug, Error, PartialEq)]
pub enum ServerConfigError {
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Tesseract language code.
    pub ocr_lang: String,
    pub tessdata: Option<String>,
    pub ocr_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Scans allowed on the blocking pool at once.
    pub max_concurrent_scans: usize,
    /// TOML file overriding the German extraction defaults.
    pub extraction_config: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            ocr_lang: DEFAULT_LANG.to_string(),
            tessdata: None,
            ocr_timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_concurrent_scans: DEFAULT_MAX_CONCURRENT_SCANS,
            extraction_config: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Unset or empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(lang) = get("KUVERT_OCR_LANG") {
            config.ocr_lang = lang;
        }
        config.tessdata = get("KUVERT_TESSDATA");
        if let Some(secs) = get("KUVERT_OCR_TIMEOUT_SECS") {
            let secs: u64 = parse("KUVERT_OCR_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(ServerConfigError::Invalid {
                    var: "KUVERT_OCR_TIMEOUT_SECS",
                    value: "0".to_string(),
                });
            }
            config.ocr_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = get("KUVERT_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse("KUVERT_MAX_UPLOAD_BYTES", &bytes)?;
        }
        if let Some(scans) = get("KUVERT_MAX_CONCURRENT_SCANS") {
            let scans: usize = parse("KUVERT_MAX_CONCURRENT_SCANS", &scans)?;
            if scans == 0 {
                return Err(ServerConfigError::Invalid {
                    var: "KUVERT_MAX_CONCURRENT_SCANS",
                    value: "0".to_string(),
                });
            }
            config.max_concurrent_scans = scans;
        }
        config.extraction_config = get("KUVERT_EXTRACTION_CONFIG").map(PathBuf::from);

        Ok(config)
    }

    pub fn load_extraction_config(&self) -> Result<ExtractionConfig, ConfigError> {
        match &self.extraction_config {
            Some(path) => ExtractionConfig::from_file(path),
            None => Ok(ExtractionConfig::default()),
        }
    }
}

fn parse<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ServerConfigError> {
    value.trim().parse().map_err(|_| ServerConfigError::Invalid {
        var,
        value: value.to_string(),
    })
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
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.ocr_lang, "deu");
    }

    #[test]
    fn reads_overrides() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "8080"),
            ("KUVERT_OCR_LANG", "eng"),
            ("KUVERT_OCR_TIMEOUT_SECS", "5"),
            ("KUVERT_MAX_UPLOAD_BYTES", "1024"),
            ("KUVERT_MAX_CONCURRENT_SCANS", "2"),
            ("KUVERT_EXTRACTION_CONFIG", "/etc/kuvert/en.toml"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.ocr_lang, "eng");
        assert_eq!(cfg.ocr_timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_upload_bytes, 1024);
        assert_eq!(cfg.max_concurrent_scans, 2);
        assert_eq!(cfg.extraction_config, Some(PathBuf::from("/etc/kuvert/en.toml")));
    }

    #[test]
    fn empty_value_keeps_default() {
        let cfg = ServerConfig::from_lookup(lookup(&[("PORT", " ")])).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn rejects_bad_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err, ServerConfigError::Invalid { var: "PORT", value: "http".into() });
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(ServerConfig::from_lookup(lookup(&[("KUVERT_OCR_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn rejects_zero_scan_limit() {
        assert!(ServerConfig::from_lookup(lookup(&[("KUVERT_MAX_CONCURRENT_SCANS", "0")])).is_err());
    }

    #[test]
    fn missing_extraction_file_is_io_error() {
        let cfg = ServerConfig {
            extraction_config: Some(PathBuf::from("/nonexistent/kuvert.toml")),
            ..ServerConfig::default()
        };
        assert!(matches!(cfg.load_extraction_config(), Err(ConfigError::Io(_))));
    }
}
