//! HTTP handler functions for the receipt API.

use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::response::{ApiError, ScanResponse, NO_AMOUNT_FOUND};
use crate::AppState;

/// Multipart field carrying the photo.
pub const RECEIPT_FIELD: &str = "receipt";
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /ocr`
///
/// Expects a multipart form with the image in the `receipt` field. A receipt
/// without a recognisable total is still a 200, with `success: false`.
pub async fn scan_receipt(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "request is not a multipart form");
        ApiError::NoFileUploaded
    })?;

    let (filename, data) = read_receipt_field(&mut multipart).await?;
    if filename.is_empty() {
        return Err(ApiError::NoFileSelected);
    }
    if !is_allowed_image(&filename) {
        tracing::info!(%filename, "rejected upload with disallowed extension");
        return Err(ApiError::InvalidFileType);
    }
    tracing::info!(%filename, bytes = data.len(), "scanning receipt");

    let pipeline = Arc::clone(&state.pipeline);
    let scan_slots = Arc::clone(&state.scan_slots);
    let scan = async move {
        let Ok(permit) = scan_slots.acquire_owned().await else {
            return Err("scan semaphore closed".to_string());
        };
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pipeline.process_bytes(&data)
        })
        .await
        .map_err(|e| e.to_string())
    };
    let outcome = match tokio::time::timeout(state.ocr_timeout, scan).await {
        Ok(Ok(Ok(outcome))) => outcome,
        Ok(Ok(Err(e))) => {
            tracing::error!(%filename, error = %e, "receipt pipeline error");
            return Err(ApiError::Processing);
        }
        Ok(Err(e)) => {
            tracing::error!(%filename, error = %e, "receipt scan task failed");
            return Err(ApiError::Processing);
        }
        Err(_) => {
            tracing::error!(%filename, timeout = ?state.ocr_timeout, "scan timed out");
            return Err(ApiError::Processing);
        }
    };

    let extracted = outcome.extracted;
    Ok(Json(match extracted.amount {
        Some(amount) => ScanResponse::found(amount.value, extracted.store_name),
        None => ScanResponse::failure(NO_AMOUNT_FOUND),
    }))
}

/// Returns the `receipt` field's filename (empty if none was sent) and bytes.
async fn read_receipt_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(RECEIPT_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(ApiError::NoFileUploaded)
}

fn upload_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge
    } else {
        tracing::debug!(error = %e, "failed to read multipart body");
        ApiError::NoFileUploaded
    }
}

/// Checks the text after the last `.`, case-insensitively.
pub fn is_allowed_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
