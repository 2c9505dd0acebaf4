//! Root-level handlers: welcome message and the 404 fallback.

use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::response::ApiResponse;

/// Welcome payload served at `/`.
#[derive(Debug, Serialize)]
pub struct Welcome {
    pub message: &'static str,
    pub version: &'static str,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
}

/// GET /
pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the API",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    ApiResponse::<()>::failure(StatusCode::NOT_FOUND, "Route not found", "NOT_FOUND")
}
