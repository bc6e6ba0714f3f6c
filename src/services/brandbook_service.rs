//! Derivation orchestrator: sequences classification, palette, typography, logos, icons and
//! the composers into demo and full bundles.

use std::{sync::Arc, time::Duration};

use rand::{SeedableRng, rngs::StdRng};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::{
    catalog::{Catalog, StyleBucket},
    dao::{
        asset_store::AssetStore, icon_search::IconSearch, image_fetch::ImageFetcher,
        slogan_writer::SloganWriter,
    },
    error::ServiceError,
    services::{
        BundleView, applications, guidelines,
        icon_sourcer::{IconContext, IconSourcer},
        imaging::Imaging,
        logo_forge::{ForgeMode, LogoForge},
        palette_deriver,
        slogan::SloganService,
        style_classifier, typography,
    },
    state::brand::{BrandBundle, BusinessDescriptor, ColorRole, DemoBundle},
};

/// External collaborators injected into the orchestrator at startup.
#[derive(Clone)]
pub struct Collaborators {
    /// Icon search and markup source.
    pub icon_search: Arc<dyn IconSearch>,
    /// Source-logo downloader.
    pub image_fetcher: Arc<dyn ImageFetcher>,
    /// Absent when no text-generation endpoint is configured.
    pub slogan_writer: Option<Arc<dyn SloganWriter>>,
    /// Sink for logo renditions.
    pub assets: Arc<dyn AssetStore>,
    /// Raster and SVG toolkit.
    pub imaging: Imaging,
}

/// Timeouts and limits applied to collaborator calls.
#[derive(Debug, Clone, Copy)]
pub struct LookupSettings {
    /// Bound on each icon or slogan call.
    pub lookup_timeout: Duration,
    /// Hits requested per icon search.
    pub search_limit: usize,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(4),
            search_limit: 32,
        }
    }
}

/// Entry point of the derivation engine.
#[derive(Clone)]
pub struct BrandbookService {
    catalog: Arc<Catalog>,
    icons: IconSourcer,
    logos: LogoForge,
    slogans: SloganService,
}

impl BrandbookService {
    /// Wire the engine over `catalog` and its collaborators.
    pub fn new(
        catalog: Arc<Catalog>,
        collaborators: Collaborators,
        settings: LookupSettings,
    ) -> Self {
        let Collaborators {
            icon_search,
            image_fetcher,
            slogan_writer,
            assets,
            imaging,
        } = collaborators;
        Self {
            catalog,
            icons: IconSourcer::new(icon_search, settings.lookup_timeout, settings.search_limit),
            logos: LogoForge::new(image_fetcher, assets, imaging),
            slogans: SloganService::new(slogan_writer, settings.lookup_timeout),
        }
    }

    /// Reference data the engine derives from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Cheap derivation: slogan plus the original, monochrome and inverted logos.
    pub async fn derive_demo_bundle(
        &self,
        name: &str,
        keywords: &str,
        logo_url: &str,
    ) -> Result<DemoBundle, ServiceError> {
        validate(name, logo_url)?;
        let descriptor = BusinessDescriptor {
            name: name.trim().to_string(),
            keywords: keywords.trim().to_string(),
            industry: String::new(),
            style_label: String::new(),
        };
        let request_id = Uuid::new_v4();
        let span = info_span!("derive_demo", %request_id, business = %descriptor.name);

        async move {
            let style = self.classify(&descriptor);
            let (slogan, logo_variants) = tokio::join!(
                self.slogans.slogan(&self.catalog, style, &descriptor),
                self.logos
                    .forge(logo_url.trim(), &descriptor.name, request_id, ForgeMode::Demo)
            );
            let logo_variants = logo_variants?;
            info!(%style, logos = logo_variants.len(), "demo bundle derived");

            Ok::<_, ServiceError>(DemoBundle {
                business_name: descriptor.name,
                style,
                slogan,
                logo_variants,
            })
        }
        .instrument(span)
        .await
    }

    /// Full derivation. `seed` fixes the palette and font-variant picks; without it the
    /// generator is seeded from the OS.
    pub async fn derive_full_bundle(
        &self,
        descriptor: BusinessDescriptor,
        logo_url: &str,
        seed: Option<u64>,
    ) -> Result<BrandBundle, ServiceError> {
        validate(&descriptor.name, logo_url)?;
        let descriptor = BusinessDescriptor {
            name: descriptor.name.trim().to_string(),
            ..descriptor
        };
        let id = Uuid::new_v4();
        let span = info_span!("derive_full", request_id = %id, business = %descriptor.name);

        async move {
            let catalog = self.catalog.as_ref();
            let style = self.classify(&descriptor);
            let definition = catalog.style(style);

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let subject = descriptor.subject_text();
            let palette = palette_deriver::derive_palette(catalog, style, &mut rng);
            let typography = typography::match_typography(catalog, style, &subject, &mut rng);
            debug!(
                palette = %palette.variant,
                fonts = %typography.variant,
                spheres = ?typography.spheres,
                "palette and typography resolved"
            );

            let slogan = self.slogans.slogan(catalog, style, &descriptor).await;
            let logo_variants = self
                .logos
                .forge(logo_url.trim(), &descriptor.name, id, ForgeMode::Full)
                .await?;

            let accent = palette.hex(ColorRole::Accent).to_string();
            let icons = self
                .icons
                .source(IconContext {
                    catalog,
                    bucket: style,
                    subject: &subject,
                    business_name: &descriptor.name,
                    accent_hex: &accent,
                })
                .await;

            let style_label = definition
                .labels
                .first()
                .map(String::as_str)
                .unwrap_or(style.as_str());
            let view = BundleView {
                business_name: &descriptor.name,
                slogan: &slogan,
                style,
                style_label,
                tone: &definition.tone,
                colors: &palette.colors,
                fonts: &typography.fonts,
                icons: &icons,
                logos: &logo_variants,
            };
            let guidelines = guidelines::compose_guidelines(&view);
            let applications = applications::compose_applications(&view);

            info!(
                %style,
                colors = palette.colors.len(),
                fonts = typography.fonts.len(),
                icons = icons.len(),
                logos = logo_variants.len(),
                "full bundle derived"
            );

            Ok::<_, ServiceError>(BrandBundle {
                id,
                business_name: descriptor.name.clone(),
                created_at: now_rfc3339(),
                style,
                palette_variant: palette.variant,
                font_variant: typography.variant,
                spheres: typography.spheres,
                slogan,
                colors: palette.colors,
                fonts: typography.fonts,
                icons,
                logo_variants,
                guidelines: Some(guidelines),
                applications: Some(applications),
            })
        }
        .instrument(span)
        .await
    }

    fn classify(&self, descriptor: &BusinessDescriptor) -> StyleBucket {
        let style = style_classifier::classify(&self.catalog, &descriptor.classification_text());
        let requested = style_classifier::bucket_for_label(&self.catalog, &descriptor.style_label);
        if let Some(requested) = requested
            && requested != style
        {
            debug!(%requested, resolved = %style, "keywords outweigh the requested style");
        }
        style
    }
}

fn validate(name: &str, logo_url: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("business name must not be empty".into()));
    }
    if logo_url.trim().is_empty() {
        return Err(ServiceError::InvalidInput("logo URL must not be empty".into()));
    }
    Ok(())
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
