pub mod auth;
pub mod product;
pub mod root;
pub mod user;
