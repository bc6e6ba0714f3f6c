use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report `ok` while the asset store accepts writes, `degraded` otherwise.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.assets().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "asset storage health check failed");
            HealthResponse::degraded()
        }
    }
}
