//! Shared response envelope for API handlers.
//!
//! Every response body, success or failure, has the shape
//! `{ "success": bool, "message": string, "data"?: T, "error"?: string }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Standard response envelope.
///
/// ```ignore
/// Ok(ApiResponse::success(product, "Product retrieved successfully"))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful envelope carrying `data`.
    pub fn success(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        })
    }
}

impl ApiResponse<()> {
    /// A successful envelope with no `data`.
    pub fn message_only(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        })
    }

    /// A failure envelope with the given status.
    pub fn failure(
        status: StatusCode,
        message: impl Into<String>,
        error: impl Into<String>,
    ) -> Response {
        let body = Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.into()),
        };
        (status, Json(body)).into_response()
    }
}
