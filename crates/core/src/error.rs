use crate::types::DbId;

/// Domain-level failures raised by services and guards.
///
/// The HTTP crate maps each variant to a status code; nothing here knows
/// about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    /// Unknown email and wrong password share this variant so callers
    /// cannot tell which check failed.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    /// Missing, malformed, badly signed or expired bearer token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The acting user is authenticated but does not own the resource.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the failure was caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CoreError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_do_not_leak_which_check_failed() {
        assert_eq!(
            CoreError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Product",
            id: 9,
        };
        assert_eq!(err.to_string(), "Entity not found: Product with id 9");
    }

    #[test]
    fn only_internal_is_a_server_error() {
        assert!(CoreError::DuplicateEmail.is_client_error());
        assert!(CoreError::InvalidToken("expired".into()).is_client_error());
        assert!(!CoreError::Internal("boom".into()).is_client_error());
    }
}
