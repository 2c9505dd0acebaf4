//! Service objects holding the business rules behind the handlers.
//!
//! Each service is built once from the pool (and the token issuer where
//! needed) and lives in [`AppState`](crate::state::AppState).

pub mod account;
pub mod product;
pub mod session_ledger;

use crate::error::AppError;

/// Log a failed service call: `warn` for caller mistakes, `error` otherwise.
pub(crate) fn log_failure(operation: &'static str, err: &AppError) {
    if err.is_client_error() {
        tracing::warn!(operation, error = %err, "Service call rejected");
    } else {
        tracing::error!(operation, error = %err, "Service call failed");
    }
}
