//! Demo and full brandbook derivation endpoints.

use axum::{Json, Router, extract::State, routing::post};
use validator::Validate;

use crate::{
    dto::brandbook::{DemoBundleRequest, FullBundleRequest},
    error::AppError,
    state::{
        SharedState,
        brand::{BrandBundle, DemoBundle},
    },
};

/// Routes running the derivation engine.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/brandbooks/demo", post(derive_demo))
        .route("/brandbooks/full", post(derive_full))
}

/// Derive a slogan and the basic logo renditions.
#[utoipa::path(
    post,
    path = "/brandbooks/demo",
    tag = "brandbook",
    request_body = DemoBundleRequest,
    responses(
        (status = 200, description = "Demo bundle derived", body = DemoBundle),
        (status = 400, description = "Invalid payload"),
        (status = 422, description = "Source logo could not be decoded")
    )
)]
pub async fn derive_demo(
    State(state): State<SharedState>,
    Json(payload): Json<DemoBundleRequest>,
) -> Result<Json<DemoBundle>, AppError> {
    payload.validate()?;
    let bundle = state
        .brandbook()
        .derive_demo_bundle(&payload.name, &payload.keywords, &payload.logo_url)
        .await?;
    Ok(Json(bundle))
}

/// Derive the complete brand bundle.
#[utoipa::path(
    post,
    path = "/brandbooks/full",
    tag = "brandbook",
    request_body = FullBundleRequest,
    responses(
        (status = 200, description = "Brand bundle derived", body = BrandBundle),
        (status = 400, description = "Invalid payload"),
        (status = 422, description = "Source logo could not be decoded")
    )
)]
pub async fn derive_full(
    State(state): State<SharedState>,
    Json(payload): Json<FullBundleRequest>,
) -> Result<Json<BrandBundle>, AppError> {
    payload.validate()?;
    let (descriptor, logo_url, seed) = payload.into_parts();
    let bundle = state
        .brandbook()
        .derive_full_bundle(descriptor, &logo_url, seed)
        .await?;
    Ok(Json(bundle))
}
