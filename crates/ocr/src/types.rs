use kuvert_core::Money;
use serde::{Deserialize, Serialize};

/// OCR output for one image, split into lines. Order is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOcrText<'a> {
    text: &'a str,
}

impl<'a> RawOcrText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.text.lines()
    }
}

/// Which amount strategy produced a candidate, in evaluation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
    /// Last token on the first total-keyword line that parses.
    KeywordLine,
    /// Last token anywhere in the text.
    LastMatch,
}

impl AmountSource {
    pub const ORDER: [AmountSource; 2] = [AmountSource::KeywordLine, AmountSource::LastMatch];

    /// Confidence in a candidate from this strategy (0.0–1.0).
    pub fn confidence(self) -> f32 {
        match self {
            AmountSource::KeywordLine => 0.90,
            AmountSource::LastMatch => 0.50,
        }
    }
}

impl std::fmt::Display for AmountSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountSource::KeywordLine => write!(f, "keyword_line"),
            AmountSource::LastMatch => write!(f, "last_match"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountCandidate {
    pub value: Money,
    /// The token as printed, before separator normalization.
    pub token: String,
    pub source: AmountSource,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NameStyle {
    AllCaps,
    TitleCase,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreNameCandidate {
    pub name: String,
    /// Zero-based index among the scanned lines.
    pub line: usize,
    pub style: NameStyle,
}

impl StoreNameCandidate {
    pub fn char_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// Everything the extractors recovered from one receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionResult {
    pub amount: Option<AmountCandidate>,
    /// The configured sentinel when no line qualified.
    pub store_name: String,
}

impl ExtractionResult {
    pub fn amount_value(&self) -> Option<Money> {
        self.amount.as_ref().map(|a| a.value)
    }
}
