//! Shared application state and the brand domain model.

pub mod brand;

use std::sync::Arc;

use crate::{
    config::AppConfig, dao::asset_store::AssetStore, services::brandbook_service::BrandbookService,
};

/// Handle to [`AppState`] shared by every handler.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration plus the collaborators built at startup.
pub struct AppState {
    config: AppConfig,
    brandbook: BrandbookService,
    assets: Arc<dyn AssetStore>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        brandbook: BrandbookService,
        assets: Arc<dyn AssetStore>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            brandbook,
            assets,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The derivation engine.
    pub fn brandbook(&self) -> &BrandbookService {
        &self.brandbook
    }

    /// Sink derived logos are written to.
    pub fn assets(&self) -> &Arc<dyn AssetStore> {
        &self.assets
    }
}
