//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Bearer token issuance, verification, and claim decoding.

pub mod jwt;
pub mod password;
