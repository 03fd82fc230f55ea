//! API Handlers
//!
//! Shared application state plus the operational endpoints (health, stats).

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::MetadataService;
use crate::config::Config;
use crate::models::{HealthResponse, StatsResponse};
use crate::store::{DocumentStore, StoreResult};

/// Application state shared across all handlers.
///
/// The metadata service and the meeting store share one document store.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aware metadata access
    pub metadata: Arc<MetadataService<DocumentStore>>,
    /// Meeting persistence
    pub meetings: DocumentStore,
    /// Bearer token required by admin routes, if any
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    /// Creates a new AppState over the given store with admin routes open.
    pub fn new(store: DocumentStore) -> Self {
        Self {
            metadata: Arc::new(MetadataService::new(store.clone())),
            meetings: store,
            admin_token: None,
        }
    }

    /// Requires `token` on admin routes.
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(Arc::from(token.into()));
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the configured document store.
    pub async fn from_config(config: &Config) -> StoreResult<Self> {
        let store = DocumentStore::open(config.database_url.as_deref()).await?;
        let state = Self::new(store);
        Ok(match &config.admin_token {
            Some(token) => state.with_admin_token(token.clone()),
            None => state,
        })
    }
}

/// Handler for GET /stats
///
/// Returns current metadata cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.metadata.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
