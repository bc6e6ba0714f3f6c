use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the brandbook backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::styles::list_styles,
        crate::routes::brandbook::derive_demo,
        crate::routes::brandbook::derive_full,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::brandbook::DemoBundleRequest,
            crate::dto::brandbook::FullBundleRequest,
            crate::dto::brandbook::StyleSummary,
            crate::state::brand::DemoBundle,
            crate::state::brand::BrandBundle,
            crate::state::brand::ColorEntry,
            crate::state::brand::FontEntry,
            crate::state::brand::IconEntry,
            crate::state::brand::LogoVariant,
            crate::services::guidelines::BrandGuidelines,
            crate::services::applications::ApplicationTemplate,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "brandbook", description = "Brand asset derivation"),
    )
)]
/// OpenAPI document covering every route and payload.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/healthcheck", "/styles", "/brandbooks/demo", "/brandbooks/full"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
