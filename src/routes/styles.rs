//! Style bucket listing.

use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::brandbook::StyleSummary, state::SharedState};

/// Routes exposing the style buckets of the reference catalog.
pub fn router() -> Router<SharedState> {
    Router::new().route("/styles", get(list_styles))
}

#[utoipa::path(
    get,
    path = "/styles",
    tag = "brandbook",
    responses((status = 200, description = "Known style buckets", body = [StyleSummary]))
)]
/// List every style bucket with its display labels.
pub async fn list_styles(State(state): State<SharedState>) -> Json<Vec<StyleSummary>> {
    Json(StyleSummary::all(state.brandbook().catalog()))
}
