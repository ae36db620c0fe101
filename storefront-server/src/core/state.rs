//! Application state

use std::sync::Arc;

use crate::core::Config;
use crate::db::{DbService, Gateway, GatewayError, SurrealGateway};
use crate::services::CatalogService;

/// Shared handle for every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Open the embedded store under the configured work dir and build
    /// the service stack on top of it
    pub async fn initialize(config: &Config) -> Result<Self, GatewayError> {
        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| GatewayError::Unavailable(format!("cannot create data dir: {e}")))?;
        let db = DbService::new(&data_dir.to_string_lossy()).await?;
        let gateway: Arc<dyn Gateway> = Arc::new(SurrealGateway::new(db.db.clone()));
        Ok(Self::with_gateway(config.clone(), gateway))
    }

    /// Build state over an explicit gateway; tests use this with the
    /// in-memory implementation
    pub fn with_gateway(config: Config, gateway: Arc<dyn Gateway>) -> Self {
        let catalog = Arc::new(CatalogService::new(
            gateway,
            config.showcase_limit,
            config.default_featured_limit,
        ));
        Self { config, catalog }
    }
}
