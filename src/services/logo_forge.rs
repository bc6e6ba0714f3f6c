//! Logo variant derivation and persistence.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::{asset_store::AssetStore, image_fetch::ImageFetcher},
    error::{FallbackReason, Fallible, ServiceError},
    services::imaging::{self, Imaging, LogoColors},
    state::brand::{LogoVariant, LogoVariantKind},
};

const PNG: &str = "image/png";
const MAX_SLUG_CHARS: usize = 40;

/// Which renditions a derivation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeMode {
    /// Original, monochrome and inverted.
    Demo,
    /// The demo set plus the abbreviation mark and the wordmark lockup.
    Full,
}

impl ForgeMode {
    /// Variant kinds produced in this mode, in output order.
    pub fn kinds(self) -> &'static [LogoVariantKind] {
        match self {
            ForgeMode::Demo => &[
                LogoVariantKind::Original,
                LogoVariantKind::Monochrome,
                LogoVariantKind::Inverted,
            ],
            ForgeMode::Full => &[
                LogoVariantKind::Original,
                LogoVariantKind::Monochrome,
                LogoVariantKind::Inverted,
                LogoVariantKind::Abbreviation,
                LogoVariantKind::WordmarkLockup,
            ],
        }
    }
}

/// Derives logo renditions from one source image and writes them to asset storage.
#[derive(Clone)]
pub struct LogoForge {
    fetcher: Arc<dyn ImageFetcher>,
    assets: Arc<dyn AssetStore>,
    imaging: Imaging,
}

/// Encoded renditions, in the order of [`ForgeMode::kinds`].
type Renders = Vec<(LogoVariantKind, Fallible<Vec<u8>>)>;

impl LogoForge {
    /// Wire the forge to its collaborators.
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        assets: Arc<dyn AssetStore>,
        imaging: Imaging,
    ) -> Self {
        Self {
            fetcher,
            assets,
            imaging,
        }
    }

    /// Produce the variants of `mode` for the logo at `source_url`.
    ///
    /// A failed download degrades to the original referenced by its source URL, and any single
    /// rendition that fails is skipped. Only bytes that decode neither as raster nor as SVG abort
    /// the derivation.
    pub async fn forge(
        &self,
        source_url: &str,
        business_name: &str,
        bundle_id: Uuid,
        mode: ForgeMode,
    ) -> Result<Vec<LogoVariant>, ServiceError> {
        let bytes = match self.fetcher.fetch(source_url).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    url = %source_url,
                    error = %err,
                    "logo download failed; keeping source reference only"
                );
                let original = describe(
                    LogoVariantKind::Original,
                    source_url.to_string(),
                    business_name,
                );
                return Ok(vec![original]);
            }
        };

        let imaging = self.imaging.clone();
        let name = business_name.to_string();
        let span = tracing::Span::current();
        let renders = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            render_all(&imaging, &bytes, &name, mode)
        })
        .await
        .map_err(|err| ServiceError::Internal(format!("logo worker failed: {err}")))?
        .map_err(|reason| ServiceError::SourceImageUnreadable(reason.to_string()))?;

        let folder = asset_folder(business_name, bundle_id);
        let mut variants = Vec::with_capacity(renders.len());
        for (kind, encoded) in renders {
            let stored = match encoded {
                Ok(bytes) => self.store(&folder, kind, bytes).await,
                Err(reason) => Err(reason),
            };
            match stored {
                Ok(url) => variants.push(describe(kind, url, business_name)),
                Err(reason) if kind == LogoVariantKind::Original => {
                    warn!(%reason, "original rendition unavailable; referencing source URL");
                    variants.push(describe(kind, source_url.to_string(), business_name));
                }
                Err(reason) => {
                    warn!(variant = kind.file_stem(), %reason, "logo variant skipped");
                }
            }
        }
        Ok(variants)
    }

    async fn store(&self, folder: &str, kind: LogoVariantKind, bytes: Vec<u8>) -> Fallible<String> {
        let path = format!("{folder}/{}.png", kind.file_stem());
        let url = self
            .assets
            .put(&path, bytes, PNG)
            .await
            .map_err(|err| FallbackReason::Storage(err.to_string()))?;
        debug!(%path, %url, "stored logo variant");
        Ok(url)
    }
}

/// Decode the source and encode every rendition `mode` asks for.
fn render_all(
    imaging: &Imaging,
    bytes: &[u8],
    business_name: &str,
    mode: ForgeMode,
) -> Fallible<Renders> {
    let source = imaging.decode_source(bytes)?;

    let needs_colors = mode.kinds().iter().any(|kind| {
        matches!(
            kind,
            LogoVariantKind::Abbreviation | LogoVariantKind::WordmarkLockup
        )
    });
    let colors = if needs_colors {
        imaging::dominant_colors(&source).unwrap_or_else(|reason| {
            warn!(%reason, "colour sampling failed; using default blue pair");
            LogoColors::default()
        })
    } else {
        LogoColors::default()
    };

    Ok(mode
        .kinds()
        .iter()
        .map(|&kind| (kind, render(imaging, &source, business_name, colors, kind)))
        .collect())
}

fn render(
    imaging: &Imaging,
    source: &RgbaImage,
    business_name: &str,
    colors: LogoColors,
    kind: LogoVariantKind,
) -> Fallible<Vec<u8>> {
    let image = match kind {
        LogoVariantKind::Original => return imaging::encode_png(source),
        LogoVariantKind::Monochrome => imaging::grayscale(source),
        LogoVariantKind::Inverted => imaging::invert(source),
        LogoVariantKind::Abbreviation => imaging.abbreviation_mark(business_name, colors)?,
        LogoVariantKind::WordmarkLockup => imaging.wordmark_lockup(source, business_name, colors)?,
    };
    imaging::encode_png(&image)
}

/// Lowercase ASCII slug of the business name, `brand` when nothing survives.
pub fn sanitize_name(business_name: &str) -> String {
    let mut slug = String::new();
    for c in business_name.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_end_matches('-').chars().take(MAX_SLUG_CHARS).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "brand".into()
    } else {
        slug.into()
    }
}

/// `logos/{slug}_{timestamp}_{bundle}`: unique per bundle, readable per business.
fn asset_folder(business_name: &str, bundle_id: Uuid) -> String {
    let timestamp = time::OffsetDateTime::now_utc().unix_timestamp();
    let simple = bundle_id.simple().to_string();
    format!("logos/{}_{}_{}", sanitize_name(business_name), timestamp, &simple[..8])
}

fn describe(kind: LogoVariantKind, url: String, business_name: &str) -> LogoVariant {
    let (name, description, usage) = match kind {
        LogoVariantKind::Original => (
            "Original logo".to_string(),
            format!("{business_name} logo as supplied"),
            "Default rendition for light backgrounds, websites and documents.",
        ),
        LogoVariantKind::Monochrome => (
            "Monochrome".to_string(),
            "Grayscale rendition of the logo".to_string(),
            "Single-colour print, stamps, embossing and watermarks.",
        ),
        LogoVariantKind::Inverted => (
            "Inverted".to_string(),
            "Negative rendition of the logo".to_string(),
            "Dark backgrounds, photography overlays and night-mode interfaces.",
        ),
        LogoVariantKind::Abbreviation => (
            "Abbreviation mark".to_string(),
            format!(
                "Initials {} in a circular badge coloured from the logo",
                imaging::initials(business_name)
            ),
            "Favicons, app icons, avatars and social profile pictures.",
        ),
        LogoVariantKind::WordmarkLockup => (
            "Wordmark lockup".to_string(),
            format!("Logo above the {} wordmark on a rounded card", business_name.trim().to_uppercase()),
            "Letterheads, presentation covers, signage and merchandise.",
        ),
    };
    LogoVariant {
        name,
        url,
        description,
        kind,
        usage: usage.to_string(),
    }
}
