use std::sync::Arc;

use crate::auth::jwt::TokenIssuer;
use crate::config::ServerConfig;
use crate::services::account::AccountService;
use crate::services::product::ProductService;
use crate::services::session_ledger::SessionLedger;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: storefront_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Signs and verifies bearer tokens.
    pub tokens: TokenIssuer,
    pub accounts: AccountService,
    pub sessions: SessionLedger,
    pub products: ProductService,
}

impl AppState {
    /// Build every service from the pool and configuration.
    pub fn new(pool: storefront_db::DbPool, config: ServerConfig) -> Self {
        let tokens = TokenIssuer::new(&config.jwt);

        Self {
            accounts: AccountService::new(pool.clone(), tokens.clone()),
            sessions: SessionLedger::new(pool.clone()),
            products: ProductService::new(pool.clone()),
            tokens,
            pool,
            config: Arc::new(config),
        }
    }
}
