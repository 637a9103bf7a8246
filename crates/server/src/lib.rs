//! axum HTTP server for receipt scanning.
//!
//! Exposes `POST /ocr`, which runs an uploaded receipt photo through
//! [`ReceiptPipeline`] and answers with the extracted total and store name.

pub mod config;
pub mod handlers;
pub mod response;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use kuvert_ocr::{OcrBackend, ReceiptPipeline};
use tokio::sync::Semaphore;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use config::{ServerConfig, ServerConfigError, DEFAULT_MAX_CONCURRENT_SCANS};
pub use response::{ApiError, ScanResponse};

pub type SharedPipeline = Arc<ReceiptPipeline<Box<dyn OcrBackend>>>;

/// Shared application state.
pub struct AppState {
    pub pipeline: SharedPipeline,
    /// Upper bound on one request: waiting for a scan slot, preprocess and OCR.
    pub ocr_timeout: Duration,
    pub max_upload_bytes: usize,
    /// One permit per running scan. A scan that outlives its timeout keeps
    /// its permit until the blocking work returns.
    pub scan_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(
        pipeline: ReceiptPipeline<Box<dyn OcrBackend>>,
        ocr_timeout: Duration,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            ocr_timeout,
            max_upload_bytes,
            scan_slots: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_SCANS)),
        }
    }

    /// Caps how many scans may occupy the blocking pool at once.
    pub fn with_scan_limit(mut self, max_concurrent_scans: usize) -> Self {
        self.scan_slots = Arc::new(Semaphore::new(max_concurrent_scans.max(1)));
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;
    Router::new()
        .route("/health", get(handlers::health))
        .route("/ocr", post(handlers::scan_receipt))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
