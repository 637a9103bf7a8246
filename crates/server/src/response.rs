//! JSON bodies returned by the receipt endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kuvert_core::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_AMOUNT_FOUND: &str = "no valid amount found";

/// `{"success": true, "amount": …, "storeName": …}` or
/// `{"success": false, "message": …}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScanResponse {
    pub fn found(amount: Money, store_name: String) -> Self {
        Self {
            success: true,
            amount: Some(amount),
            store_name: Some(store_name),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            amount: None,
            store_name: None,
            message: Some(message.into()),
        }
    }
}

/// Request failures. The display text is the user-facing message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("no file uploaded")]
    NoFileUploaded,
    #[error("no file selected")]
    NoFileSelected,
    #[error("invalid file type")]
    InvalidFileType,
    #[error("file too large")]
    TooLarge,
    #[error("image processing error")]
    Processing,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFileUploaded | ApiError::NoFileSelected | ApiError::InvalidFileType => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Processing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ScanResponse::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn found_shape() {
        let body = serde_json::to_value(ScanResponse::found(
            Money::from_cents(598),
            "ALDI SÜD".into(),
        ))
        .unwrap();
        assert_eq!(body, json!({"success": true, "amount": 5.98, "storeName": "ALDI SÜD"}));
    }

    #[test]
    fn failure_shape() {
        let body = serde_json::to_value(ScanResponse::failure(NO_AMOUNT_FOUND)).unwrap();
        assert_eq!(body, json!({"success": false, "message": "no valid amount found"}));
    }

    #[test]
    fn error_statuses() {
        assert_eq!(ApiError::NoFileUploaded.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidFileType.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Processing.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Processing.to_string(), "image processing error");
    }
}
