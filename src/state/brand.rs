//! Brand domain model produced by the derivation engine.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    catalog::{DecorSlot, FontCategory, StyleBucket},
    services::{applications::ApplicationTemplate, guidelines::BrandGuidelines},
};

/// Immutable input to the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessDescriptor {
    /// Trimmed business name.
    pub name: String,
    /// Free-text description.
    pub keywords: String,
    /// Optional industry hint; empty when absent.
    pub industry: String,
    /// Free-text style label ("Modern", "Игривый", ...), classified together with the keywords.
    pub style_label: String,
}

impl BusinessDescriptor {
    /// Text the style classifier scores: label, keywords and industry.
    pub fn classification_text(&self) -> String {
        [
            self.style_label.as_str(),
            self.keywords.as_str(),
            self.industry.as_str(),
        ]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Text describing what the business does: industry first, then keywords.
    pub fn subject_text(&self) -> String {
        format!("{} {}", self.industry, self.keywords)
            .trim()
            .to_string()
    }
}

/// Semantic role of a colour within the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    /// Dominant brand colour.
    Primary,
    /// Supporting colour.
    Secondary,
    /// Call-to-action colour.
    Accent,
    /// Borders and muted text.
    Neutral,
    /// Page background.
    Background,
    /// Body text.
    Text,
    /// Lightened, desaturated primary for surfaces and cards.
    Tint,
    /// Darkened, saturated primary for borders and emphasis.
    Shade,
}

impl ColorRole {
    /// The six roles every palette variant defines.
    pub const BASE: [ColorRole; 6] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::Neutral,
        ColorRole::Background,
        ColorRole::Text,
    ];
}

/// User-facing colour of the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ColorEntry {
    /// Human-readable name.
    pub name: String,
    /// Semantic role.
    pub role: ColorRole,
    /// `#RRGGBB`, upper case.
    pub hex: String,
    /// `rgb(r, g, b)`.
    pub rgb: String,
    /// Where the colour is meant to be used.
    pub usage: String,
}

/// Position of a font within the pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Headline font.
    Primary,
    /// Alternative headline font.
    PrimaryAlt,
    /// Body font.
    Secondary,
    /// Alternative body font.
    SecondaryAlt,
}

/// Resolved font reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FontEntry {
    /// Position in the pairing.
    pub role: FontRole,
    /// Family name as published ("Playfair Display").
    pub name: String,
    /// CSS font stack ("'Playfair Display', serif").
    pub family: String,
    /// Generic family.
    pub category: FontCategory,
    /// Available weights, ascending.
    pub weights: Vec<u16>,
    /// Stylesheet that serves the font.
    pub webfont_url: String,
}

/// Kind of visual element an icon entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    /// Brand icon.
    Icon,
    /// Frame or container shape.
    Frame,
    /// Repeating texture.
    Pattern,
    /// Section separator.
    Divider,
    /// Ornament.
    Decoration,
    /// Background motif.
    Background,
}

impl From<DecorSlot> for IconCategory {
    fn from(slot: DecorSlot) -> Self {
        match slot {
            DecorSlot::Pattern => IconCategory::Pattern,
            DecorSlot::Shape => IconCategory::Frame,
            DecorSlot::Background => IconCategory::Background,
            DecorSlot::Decoration => IconCategory::Decoration,
            DecorSlot::Divider => IconCategory::Divider,
        }
    }
}

/// Where an icon's markup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IconOrigin {
    /// Fetched from an icon library.
    Library,
    /// Generated locally after lookups failed.
    Synthesized,
}

/// Icon or decorative element of the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IconEntry {
    /// Source identifier (`prefix:name`, or `fallback:*` when synthesized).
    pub id: String,
    /// Display name.
    pub name: String,
    /// SVG markup recoloured to the accent.
    pub svg: String,
    /// What the element depicts.
    pub description: String,
    /// Where to use it.
    pub usage: String,
    /// Kind of element.
    pub category: IconCategory,
    /// Decorative slot filled by this entry; absent for brand icons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<DecorSlot>,
    /// Library hit or local synthesis.
    pub origin: IconOrigin,
}

/// Kind of logo rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LogoVariantKind {
    /// Source logo, re-encoded as PNG.
    Original,
    /// Grayscale rendition.
    Monochrome,
    /// Colour-inverted rendition for dark backgrounds.
    Inverted,
    /// Initials badge.
    Abbreviation,
    /// Logo above the business name on a card.
    WordmarkLockup,
}

impl LogoVariantKind {
    /// File stem used when persisting the rendition.
    pub fn file_stem(self) -> &'static str {
        match self {
            LogoVariantKind::Original => "original",
            LogoVariantKind::Monochrome => "monochrome",
            LogoVariantKind::Inverted => "inverted",
            LogoVariantKind::Abbreviation => "abbreviation",
            LogoVariantKind::WordmarkLockup => "wordmark-lockup",
        }
    }
}

/// Persisted logo rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogoVariant {
    /// Display name.
    pub name: String,
    /// Public URL, or the source URL when nothing was stored.
    pub url: String,
    /// What the rendition shows.
    pub description: String,
    /// Rendition kind.
    pub kind: LogoVariantKind,
    /// Where to use it.
    pub usage: String,
}

/// Full aggregate of derived brand artifacts for one request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrandBundle {
    /// Bundle identifier, also part of the asset paths.
    pub id: Uuid,
    /// Trimmed business name.
    pub business_name: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// Classified bucket.
    pub style: StyleBucket,
    /// Palette variant drawn.
    pub palette_variant: String,
    /// Font variant chosen, or `fallback`.
    pub font_variant: String,
    /// Business spheres resolved from the keywords.
    pub spheres: Vec<String>,
    /// Generated or template slogan.
    pub slogan: String,
    /// Palette entries.
    pub colors: Vec<ColorEntry>,
    /// Two to four font entries.
    pub fonts: Vec<FontEntry>,
    /// Five brand icons and five decorative elements.
    pub icons: Vec<IconEntry>,
    /// Logo renditions that were produced.
    pub logo_variants: Vec<LogoVariant>,
    /// Usage guidelines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<BrandGuidelines>,
    /// Mockup templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<ApplicationTemplate>>,
}

/// Cheap derivation: slogan and the basic logo renditions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DemoBundle {
    /// Trimmed business name.
    pub business_name: String,
    /// Classified bucket.
    pub style: StyleBucket,
    /// Generated or template slogan.
    pub slogan: String,
    /// Basic logo renditions.
    pub logo_variants: Vec<LogoVariant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(style: &str, keywords: &str, industry: &str) -> BusinessDescriptor {
        BusinessDescriptor {
            name: "Acme".into(),
            keywords: keywords.into(),
            industry: industry.into(),
            style_label: style.into(),
        }
    }

    #[test]
    fn classification_text_skips_blank_parts() {
        let text = descriptor("", "technology, startup", " ").classification_text();
        assert_eq!(text, "technology, startup");
        let text = descriptor("Modern", "tech", "saas").classification_text();
        assert_eq!(text, "Modern tech saas");
    }

    #[test]
    fn shape_slot_is_a_frame() {
        assert_eq!(IconCategory::from(DecorSlot::Shape), IconCategory::Frame);
        assert_eq!(
            IconCategory::from(DecorSlot::Divider),
            IconCategory::Divider
        );
    }
}
