//! HTTP route trees.

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::SharedState;

pub mod brandbook;
pub mod docs;
pub mod health;
pub mod styles;

/// Compose all route trees, wiring in shared state, documentation and the asset directory.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(brandbook::router())
        .merge(styles::router())
        .merge(docs::router());

    let assets = ServeDir::new(state.config().asset_dir.clone());

    api_router
        .nest_service("/assets", assets)
        .with_state(state)
}
