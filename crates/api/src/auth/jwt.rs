//! Bearer token issuance and validation.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload. The `jti`
//! claim is the join key to the `user_sessions` row written at login.
//!
//! Logging out marks that row `logged_out` but does not make the token's
//! signature invalid: [`TokenIssuer::verify`] keeps accepting it until `exp`.
//! Endpoints that must reject logged-out tokens check the session ledger as
//! well (see `middleware::session::RequireActiveSession`).

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use uuid::Uuid;

/// Claims embedded in every issued token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: DbId,
    pub email: String,
    /// Token identifier; omitted when the caller did not supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for token signing and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in seconds.
    pub expires_in_secs: i64,
}

/// Signs and checks bearer tokens with a single shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_in_secs: i64,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            expires_in_secs: config.expires_in_secs,
        }
    }

    /// A fresh random token identifier (UUID v4).
    pub fn mint_token_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn expires_in_secs(&self) -> i64 {
        self.expires_in_secs
    }

    /// Sign a token for `user_id` / `email`, expiring after the configured
    /// lifetime. When `token_id` is `None` no `jti` claim is written.
    pub fn issue(
        &self,
        user_id: DbId,
        email: &str,
        token_id: Option<&str>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            jti: token_id.map(str::to_string),
            iat: now,
            exp: now.saturating_add(self.expires_in_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, CoreError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CoreError::InvalidToken("Token has expired".into()),
                _ => CoreError::InvalidToken("Invalid or expired token".into()),
            })
    }

    /// Check the signature but accept tokens past their `exp`.
    ///
    /// Logout uses this so a client holding an expired token can still close
    /// its session, while a forged token cannot close anyone's.
    pub fn verify_ignoring_expiry(&self, token: &str) -> Result<Claims, CoreError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| CoreError::InvalidToken("Invalid token signature".into()))
    }

    /// Parse claims without checking the signature or expiry.
    ///
    /// Anyone can mint a token that decodes here. Never use the result to
    /// authorize anything.
    pub fn decode(token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims)
    }
}
