use std::sync::OnceLock;

use kuvert_core::Money;

use crate::amount::AmountExtractor;
use crate::config::ExtractionConfig;
use crate::store::StoreNameExtractor;
use crate::types::{ExtractionResult, RawOcrText};

// ── Public extraction API ─────────────────────────────────────────────────────

/// Runs both extractors over one OCR text. Holds no per-call state, so a
/// single instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Extractor {
    amount: AmountExtractor,
    store: StoreNameExtractor,
}

impl Extractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            amount: AmountExtractor::from_config(config),
            store: StoreNameExtractor::from_config(config),
        }
    }

    pub fn extract(&self, ocr_text: &str) -> ExtractionResult {
        let text = RawOcrText::new(ocr_text);
        ExtractionResult {
            amount: self.amount.extract(&text),
            store_name: self.store.extract(&text),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

fn default_extractor() -> &'static Extractor {
    static E: OnceLock<Extractor> = OnceLock::new();
    E.get_or_init(Extractor::default)
}

/// Receipt total using the German keyword set.
pub fn extract_amount(text: &str) -> Option<Money> {
    default_extractor()
        .amount
        .extract(&RawOcrText::new(text))
        .map(|c| c.value)
}

/// Store name using the German defaults; `"Unbekanntes Geschäft"` if none.
pub fn extract_store_name(text: &str) -> String {
    default_extractor().store.extract(&RawOcrText::new(text))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
