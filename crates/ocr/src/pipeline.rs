use thiserror::Error;

use crate::extract::Extractor;
use crate::preprocess::{self, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ExtractionResult;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of a single receipt scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Raw OCR text output.
    pub ocr_text: String,
    /// Fields extracted from the OCR text.
    pub extracted: ExtractionResult,
}

/// Orchestrates: preprocess → OCR → extract.
///
/// Recognition is blocking; async callers should run [`process_bytes`] on a
/// blocking thread.
///
/// [`process_bytes`]: ReceiptPipeline::process_bytes
pub struct ReceiptPipeline<R: OcrBackend> {
    recognizer: R,
    extractor: Extractor,
}

impl<R: OcrBackend> ReceiptPipeline<R> {
    pub fn new(recognizer: R, extractor: Extractor) -> Self {
        Self { recognizer, extractor }
    }

    /// Process uploaded image bytes (PNG / JPEG).
    pub fn process_bytes(&self, data: &[u8]) -> Result<ScanOutcome, PipelineError> {
        let image_bytes = preprocess::prepare_for_ocr_from_bytes(data)?;
        tracing::debug!(input = data.len(), prepared = image_bytes.len(), "image preprocessed");

        let ocr_text = self.recognizer.recognize(&image_bytes)?;
        tracing::debug!(lines = ocr_text.lines().count(), "OCR finished");

        let extracted = self.extractor.extract(&ocr_text);
        match &extracted.amount {
            Some(amount) => tracing::info!(
                amount = %amount.value,
                source = %amount.source,
                confidence = amount.source.confidence(),
                store = %extracted.store_name,
                "receipt scanned"
            ),
            None => tracing::info!(store = %extracted.store_name, "receipt scanned without amount"),
        }

        Ok(ScanOutcome { ocr_text, extracted })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
