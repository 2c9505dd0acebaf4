//! Authentication extractors and request metadata.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`session::RequireActiveSession`] -- Also requires the token's session to be active.
//! - [`client::ClientMeta`] -- Client IP and user agent, for the session ledger.

pub mod auth;
pub mod client;
pub mod session;
