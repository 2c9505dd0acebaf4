//! Domain primitives shared by the database and HTTP crates.
//!
//! Nothing in here performs I/O: ids and timestamps, the domain error
//! taxonomy, the ownership guard, pagination clamps, and the pure input
//! validation rules.

pub mod error;
pub mod ownership;
pub mod pagination;
pub mod session;
pub mod types;
pub mod validation;
