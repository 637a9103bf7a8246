use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read extraction config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Extraction config has no total keywords")]
    NoKeywords,
    #[error("store_scan_lines must be at least 1")]
    ZeroScanLines,
}

/// Locale tuning for the extractors.
///
/// ```toml
/// keywords = ["total", "amount due"]
/// store_scan_lines = 10
/// unknown_store = "Unknown store"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Case-insensitive substrings that mark a line as carrying the total.
    pub keywords: Vec<String>,
    /// How many lines from the top are searched for the store name.
    pub store_scan_lines: usize,
    /// Returned when no line looks like a store name.
    pub unknown_store: String,
}

pub const GERMAN_KEYWORDS: [&str; 6] = ["gesamt", "summe", "total", "endbetrag", "zu zahlen", "betrag"];
pub const ENGLISH_KEYWORDS: [&str; 4] = ["total", "amount due", "balance due", "grand total"];
pub const DEFAULT_STORE_SCAN_LINES: usize = 10;

impl ExtractionConfig {
    pub fn german() -> Self {
        Self {
            keywords: GERMAN_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            store_scan_lines: DEFAULT_STORE_SCAN_LINES,
            unknown_store: "Unbekanntes Geschäft".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            keywords: ENGLISH_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            store_scan_lines: DEFAULT_STORE_SCAN_LINES,
            unknown_store: "Unknown store".to_string(),
        }
    }

    /// Fields missing from the document fall back to the German preset.
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let raw: Self = toml::from_str(toml_content)?;
        raw.validated()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Lowercases and trims keywords, drops blanks and duplicates.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let mut keywords: Vec<String> = Vec::with_capacity(self.keywords.len());
        for kw in self.keywords.iter().map(|k| k.trim().to_lowercase()) {
            if !kw.is_empty() && !keywords.contains(&kw) {
                keywords.push(kw);
            }
        }
        if keywords.is_empty() {
            return Err(ConfigError::NoKeywords);
        }
        if self.store_scan_lines == 0 {
            return Err(ConfigError::ZeroScanLines);
        }
        self.keywords = keywords;
        Ok(self)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::german()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_german() {
        let cfg = ExtractionConfig::default();
        assert!(cfg.keywords.iter().any(|k| k == "zu zahlen"));
        assert_eq!(cfg.store_scan_lines, 10);
        assert_eq!(cfg.unknown_store, "Unbekanntes Geschäft");
    }

    #[test]
    fn from_toml_normalizes_keywords() {
        let cfg = ExtractionConfig::from_toml(
            r#"
            keywords = ["  TOTAL ", "Amount Due", "total", ""]
            unknown_store = "Unknown store"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.keywords, vec!["total", "amount due"]);
        assert_eq!(cfg.store_scan_lines, DEFAULT_STORE_SCAN_LINES);
        assert_eq!(cfg.unknown_store, "Unknown store");
    }

    #[test]
    fn from_toml_rejects_empty_keyword_set() {
        let err = ExtractionConfig::from_toml("keywords = [\" \"]").unwrap_err();
        assert!(matches!(err, ConfigError::NoKeywords));
    }

    #[test]
    fn from_toml_rejects_zero_scan_lines() {
        let err = ExtractionConfig::from_toml("store_scan_lines = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroScanLines));
    }

    #[test]
    fn from_toml_reports_syntax_errors() {
        let err = ExtractionConfig::from_toml("keywords = [").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
