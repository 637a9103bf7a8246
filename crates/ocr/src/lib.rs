pub mod amount;
pub mod config;
pub mod extract;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod store;
pub mod text;
pub mod types;

pub use amount::AmountExtractor;
pub use config::{ConfigError, ExtractionConfig};
pub use extract::{extract_amount, extract_store_name, Extractor};
pub use pipeline::{PipelineError, ReceiptPipeline, ScanOutcome};
pub use preprocess::{prepare_for_ocr_from_bytes, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer, DEFAULT_LANG};
pub use store::StoreNameExtractor;
pub use types::{
    AmountCandidate, AmountSource, ExtractionResult, NameStyle, RawOcrText, StoreNameCandidate,
};
