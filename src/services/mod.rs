//! Derivation engine: classification, palettes, fonts, icons, logos, guidelines and applications.

use crate::{
    catalog::{FontCategory, StyleBucket, ToneOfVoice},
    state::brand::{
        ColorEntry, ColorRole, FontEntry, FontRole, IconEntry, LogoVariant,
        LogoVariantKind,
    },
};

/// Mock application templates rendered from the bundle.
pub mod applications;
/// Derivation orchestrator exposing the demo and full entry points.
pub mod brandbook_service;
/// Colour parsing, transforms and contrast maths.
pub mod color;
/// OpenAPI documentation generation.
pub mod documentation;
/// Brand usage guidelines composition.
pub mod guidelines;
/// Health check service.
pub mod health_service;
/// Brand icon and decorative element sourcing.
pub mod icon_sourcer;
/// Raster and vector image operations on logos.
pub mod imaging;
/// Logo variant derivation and persistence.
pub mod logo_forge;
/// Shared SVG/HTML helpers.
pub mod markup;
/// Palette variant selection and tint/shade derivation.
pub mod palette_deriver;
/// Slogan prompt and template fallback.
pub mod slogan;
/// Keyword scoring into style buckets.
pub mod style_classifier;
/// Keyword translation into icon search vocabulary.
pub mod translation;
/// Business sphere and font pairing resolution.
pub mod typography;

/// Read-only view of an assembled bundle consumed by the composers.
#[derive(Debug, Clone, Copy)]
pub struct BundleView<'a> {
    /// Trimmed business name.
    pub business_name: &'a str,
    /// Final slogan.
    pub slogan: &'a str,
    /// Classified bucket.
    pub style: StyleBucket,
    /// English display label of `style`.
    pub style_label: &'a str,
    /// Tone of voice of the bucket.
    pub tone: &'a ToneOfVoice,
    /// Palette entries.
    pub colors: &'a [ColorEntry],
    /// Font entries.
    pub fonts: &'a [FontEntry],
    /// Icons and decorative elements.
    pub icons: &'a [IconEntry],
    /// Persisted logo renditions.
    pub logos: &'a [LogoVariant],
}

impl<'a> BundleView<'a> {
    /// Hex of the first colour with `role`, or the neutral gray.
    pub fn hex(&self, role: ColorRole) -> &'a str {
        palette_deriver::hex_of(self.colors, role)
    }

    /// Font used for headlines: the primary font, or the first available.
    pub fn heading_font(&self) -> FontRef<'a> {
        self.font_with(&[FontRole::Primary, FontRole::PrimaryAlt])
    }

    /// Font used for body copy: the secondary font, or the heading font.
    pub fn body_font(&self) -> FontRef<'a> {
        self.font_with(&[FontRole::Secondary, FontRole::SecondaryAlt])
    }

    fn font_with(&self, roles: &[FontRole]) -> FontRef<'a> {
        roles
            .iter()
            .find_map(|role| self.fonts.iter().find(|font| font.role == *role))
            .or_else(|| self.fonts.first())
            .map(|font| FontRef {
                name: &font.name,
                family: &font.family,
                category: font.category,
            })
            .unwrap_or(FontRef {
                name: "Inter",
                family: "'Inter', sans-serif",
                category: FontCategory::SansSerif,
            })
    }

    /// URL of the first logo variant of `kind`, if any.
    pub fn logo_url(&self, kind: LogoVariantKind) -> Option<&'a str> {
        self.logos
            .iter()
            .find(|logo| logo.kind == kind)
            .map(|logo| logo.url.as_str())
    }
}

/// Borrowed font reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontRef<'a> {
    /// Family name.
    pub name: &'a str,
    /// CSS font stack.
    pub family: &'a str,
    /// Generic family.
    pub category: FontCategory,
}
