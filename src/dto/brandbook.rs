//! Brandbook derivation payloads and the style listing.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    catalog::{Catalog, StyleBucket},
    dto::validation::{validate_logo_source, validate_not_blank},
    state::brand::BusinessDescriptor,
};

/// Payload for the cheap demo derivation.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DemoBundleRequest {
    /// Business name, 1 to 120 characters.
    #[validate(length(min = 1, max = 120), custom(function = validate_not_blank))]
    pub name: String,
    /// Free-text description used for classification.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub keywords: String,
    /// `http(s)://` URL of the source logo.
    ///
    /// `file://` URLs and plain paths are only read below the configured logo root.
    #[validate(custom(function = validate_logo_source))]
    pub logo_url: String,
}

/// Payload for the full derivation.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct FullBundleRequest {
    /// Business name, 1 to 120 characters.
    #[validate(length(min = 1, max = 120), custom(function = validate_not_blank))]
    pub name: String,
    /// Free-text description used for classification and search terms.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub keywords: String,
    /// Source logo; same rules as [`DemoBundleRequest::logo_url`].
    #[validate(custom(function = validate_logo_source))]
    pub logo_url: String,
    /// Style label in English or Russian ("Modern", "Игривый"); scored with the keywords.
    #[serde(default)]
    #[validate(length(max = 120))]
    pub style: Option<String>,
    /// Optional industry hint, folded into classification and sphere matching.
    #[serde(default)]
    #[validate(length(max = 120))]
    pub industry: Option<String>,
    /// Fixes the palette and font-variant picks for reproducible bundles.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl FullBundleRequest {
    /// Split the payload into the engine input, the logo source and the seed.
    pub fn into_parts(self) -> (BusinessDescriptor, String, Option<u64>) {
        let descriptor = BusinessDescriptor {
            name: self.name.trim().to_string(),
            keywords: self.keywords.trim().to_string(),
            industry: self.industry.unwrap_or_default().trim().to_string(),
            style_label: self.style.unwrap_or_default().trim().to_string(),
        };
        (descriptor, self.logo_url.trim().to_string(), self.seed)
    }
}

/// Style bucket as listed by `GET /styles`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StyleSummary {
    /// Bucket identifier.
    pub id: StyleBucket,
    /// Display labels, English first.
    pub labels: Vec<String>,
    /// Tone-of-voice summary.
    pub tone: String,
}

impl StyleSummary {
    /// Every bucket of `catalog` in declaration order.
    pub fn all(catalog: &Catalog) -> Vec<Self> {
        StyleBucket::ALL
            .into_iter()
            .map(|bucket| {
                let style = catalog.style(bucket);
                Self {
                    id: bucket,
                    labels: style.labels.clone(),
                    tone: style.tone.tone.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request(name: &str, logo_url: &str) -> FullBundleRequest {
        FullBundleRequest {
            name: name.into(),
            keywords: "technology, startup".into(),
            logo_url: logo_url.into(),
            style: Some(" Modern ".into()),
            industry: None,
            seed: Some(7),
        }
    }

    #[test]
    fn blank_or_overlong_names_are_rejected() {
        assert!(full_request("Acme", "https://example.com/logo.png").validate().is_ok());
        assert!(full_request("   ", "https://example.com/logo.png").validate().is_err());
        let long = "x".repeat(121);
        assert!(full_request(&long, "https://example.com/logo.png").validate().is_err());
        assert!(full_request("Acme", "").validate().is_err());
    }

    #[test]
    fn demo_keywords_are_bounded() {
        let request = DemoBundleRequest {
            name: "Acme".into(),
            keywords: "k".repeat(1001),
            logo_url: "logo.png".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let request: FullBundleRequest = serde_json::from_str(
            r#"{ "name": " Acme ", "logo_url": "https://example.com/logo.png" }"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        let (descriptor, logo_url, seed) = request.into_parts();
        assert_eq!(descriptor.name, "Acme");
        assert!(descriptor.industry.is_empty());
        assert!(descriptor.style_label.is_empty());
        assert_eq!(logo_url, "https://example.com/logo.png");
        assert_eq!(seed, None);
    }

    #[test]
    fn style_list_covers_every_bucket() {
        let catalog = Catalog::bundled();
        let styles = StyleSummary::all(&catalog);
        assert_eq!(styles.len(), StyleBucket::ALL.len());
        assert!(styles.iter().all(|style| !style.labels.is_empty()));
    }
}
