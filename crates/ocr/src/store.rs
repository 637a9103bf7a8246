use crate::config::ExtractionConfig;
use crate::text::{contains_digit, is_all_caps, is_mostly_capitalized};
use crate::types::{NameStyle, RawOcrText, StoreNameCandidate};

/// Picks the merchant name from the top of a receipt.
#[derive(Debug, Clone)]
pub struct StoreNameExtractor {
    scan_lines: usize,
    unknown_store: String,
}

impl StoreNameExtractor {
    pub fn new(scan_lines: usize, unknown_store: impl Into<String>) -> Self {
        Self { scan_lines, unknown_store: unknown_store.into() }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.store_scan_lines, config.unknown_store.clone())
    }

    /// The best candidate's name, or the sentinel.
    pub fn extract(&self, text: &RawOcrText<'_>) -> String {
        self.best_candidate(text)
            .map(|c| c.name)
            .unwrap_or_else(|| self.unknown_store.clone())
    }

    /// Longest qualifying line by character count; the earliest one on ties.
    pub fn best_candidate(&self, text: &RawOcrText<'_>) -> Option<StoreNameCandidate> {
        let mut best: Option<StoreNameCandidate> = None;
        for candidate in self.candidates(text) {
            let longer = best
                .as_ref()
                .map_or(true, |b| candidate.char_len() > b.char_len());
            if longer {
                best = Some(candidate);
            }
        }
        best
    }

    pub fn candidates<'t>(
        &self,
        text: &RawOcrText<'t>,
    ) -> impl Iterator<Item = StoreNameCandidate> + 't {
        text.as_str()
            .trim()
            .lines()
            .take(self.scan_lines)
            .enumerate()
            .filter_map(|(line, raw)| {
                let name = raw.trim();
                let style = classify(name)?;
                Some(StoreNameCandidate { name: name.to_string(), line, style })
            })
    }
}

impl Default for StoreNameExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

/// `None` for blank lines, lines with digits, and mostly lowercase lines.
pub fn classify(line: &str) -> Option<NameStyle> {
    if line.is_empty() || contains_digit(line) {
        return None;
    }
    if is_all_caps(line) {
        Some(NameStyle::AllCaps)
    } else if is_mostly_capitalized(line) {
        Some(NameStyle::TitleCase)
    } else {
        None
    }
}
