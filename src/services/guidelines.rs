//! Structured "how to use this brand" document derived from the assembled bundle.

use palette::Srgb;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    catalog::{StyleBucket, ToneOfVoice},
    services::{
        BundleView,
        color::{self, NEUTRAL_GRAY_NAME},
    },
    state::brand::{ColorRole, FontRole, IconOrigin, LogoVariantKind},
};

/// Minimum contrast for body text (WCAG AA).
pub const BODY_TEXT_CONTRAST: f32 = 4.5;
/// Minimum contrast for large text and UI components (WCAG AA).
pub const LARGE_TEXT_CONTRAST: f32 = 3.0;

/// What a colour may carry on a given background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextSuitability {
    /// Any text size.
    BodyText,
    /// Headlines of 24 px and up, icons and UI strokes.
    LargeText,
    /// Fills and decoration only.
    DecorativeOnly,
}

impl TextSuitability {
    /// Classify a contrast ratio against the WCAG AA thresholds.
    pub fn from_contrast(ratio: f32) -> Self {
        if ratio >= BODY_TEXT_CONTRAST {
            TextSuitability::BodyText
        } else if ratio >= LARGE_TEXT_CONTRAST {
            TextSuitability::LargeText
        } else {
            TextSuitability::DecorativeOnly
        }
    }
}

/// Accessibility and usage rule for one colour.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ColorRule {
    /// Role of the colour in the palette.
    pub role: ColorRole,
    /// Human-readable name.
    pub name: String,
    /// `#RRGGBB`.
    pub hex: String,
    /// WCAG contrast ratio against white, two decimals.
    pub contrast_on_white: f32,
    /// WCAG contrast ratio against black, two decimals.
    pub contrast_on_black: f32,
    /// What the colour may be used for on white.
    pub on_white: TextSuitability,
    /// What the colour may be used for on black.
    pub on_black: TextSuitability,
    /// Text colour (`#FFFFFF` or `#111111`) that reads best on this colour.
    pub text_color: String,
    /// Usage sentence.
    pub note: String,
}

/// Typesetting rule for one font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FontRule {
    /// Position in the pairing.
    pub role: FontRole,
    /// Family name.
    pub name: String,
    /// CSS font stack.
    pub family: String,
    /// Where the font is set.
    pub usage: String,
    /// Smallest size allowed.
    pub min_size_px: u16,
    /// Largest size recommended.
    pub max_size_px: u16,
    /// Weights to use for this role.
    pub weights: Vec<u16>,
    /// Recommended line height, unitless.
    pub line_height: String,
    /// Things never to do with the font.
    pub prohibitions: Vec<String>,
}

/// Placement rule for one logo rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LogoRule {
    /// Rendition the rule applies to.
    pub kind: LogoVariantKind,
    /// Display name.
    pub name: String,
    /// Where the rendition lives.
    pub url: String,
    /// Smallest display width.
    pub min_width_px: u16,
    /// Empty margin required around the mark.
    pub clear_space: String,
    /// Backgrounds the rendition works on.
    pub backgrounds: String,
    /// Modifications that are not allowed.
    pub prohibitions: Vec<String>,
}

/// Rule shared by the icon set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IconRule {
    /// Entries in the icon set.
    pub count: usize,
    /// Entries fetched from an icon library.
    pub library_icons: usize,
    /// Entries generated locally.
    pub synthesized_icons: usize,
    /// Sizes the icons are drawn at.
    pub sizes_px: Vec<u16>,
    /// Fill colour, the bundle accent.
    pub color: String,
    /// Usage sentences.
    pub guidance: Vec<String>,
}

/// Complete guidelines document.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrandGuidelines {
    /// Business the guidelines belong to.
    pub business_name: String,
    /// Classified style bucket.
    pub style: StyleBucket,
    /// One-paragraph identity summary.
    pub summary: String,
    /// One rule per palette colour.
    pub colors: Vec<ColorRule>,
    /// One rule per font.
    pub fonts: Vec<FontRule>,
    /// One rule per logo rendition.
    pub logos: Vec<LogoRule>,
    /// Rule for the icon set.
    pub icons: IconRule,
    /// Tone of voice of the style.
    pub tone: ToneOfVoice,
    /// Recommended practices.
    pub dos: Vec<String>,
    /// Practices to avoid.
    pub donts: Vec<String>,
}

/// Compose the guidelines for `bundle`. Pure: reads nothing but its input.
pub fn compose_guidelines(bundle: &BundleView<'_>) -> BrandGuidelines {
    let colors: Vec<ColorRule> = bundle
        .colors
        .iter()
        .map(|entry| color_rule(entry.role, &entry.name, &entry.hex))
        .collect();
    let heading = bundle.heading_font();
    let body = bundle.body_font();

    let summary = format!(
        "{name} has a {style} identity. {primary} ({primary_hex}) leads every layout, {accent_hex} \
         marks calls to action, headlines are set in {heading} and running text in {body}.",
        name = bundle.business_name,
        style = bundle.style_label.to_lowercase(),
        primary = color_name(bundle, ColorRole::Primary),
        primary_hex = bundle.hex(ColorRole::Primary),
        accent_hex = bundle.hex(ColorRole::Accent),
        heading = heading.name,
        body = body.name,
    );

    let mut dos = vec![
        format!(
            "Use {} as the dominant colour and keep the accent for single calls to action",
            bundle.hex(ColorRole::Primary)
        ),
        format!("Pair {} headlines with {} body copy", heading.name, body.name),
        "Leave generous white space around the logo and headlines".to_string(),
    ];
    dos.extend(bundle.tone.dos.iter().cloned());

    let mut donts = vec![
        "Do not recolour, stretch, rotate or add effects to the logo".to_string(),
        "Do not introduce colours outside the palette".to_string(),
        "Do not use more than two typefaces in one layout".to_string(),
    ];
    for rule in &colors {
        let carries_text = matches!(
            rule.role,
            ColorRole::Primary | ColorRole::Accent | ColorRole::Secondary
        );
        if carries_text && rule.on_white == TextSuitability::DecorativeOnly {
            donts.push(format!(
                "Do not set text in {} ({}) on white: contrast is only {:.1}:1",
                rule.name, rule.hex, rule.contrast_on_white
            ));
        }
    }
    donts.extend(bundle.tone.donts.iter().cloned());

    BrandGuidelines {
        business_name: bundle.business_name.to_string(),
        style: bundle.style,
        summary,
        colors,
        fonts: bundle
            .fonts
            .iter()
            .map(|font| font_rule(font.role, &font.name, &font.family, &font.weights))
            .collect(),
        logos: bundle
            .logos
            .iter()
            .map(|logo| logo_rule(logo.kind, &logo.name, &logo.url))
            .collect(),
        icons: icon_rule(bundle),
        tone: bundle.tone.clone(),
        dos,
        donts,
    }
}

fn color_name(bundle: &BundleView<'_>, role: ColorRole) -> String {
    bundle
        .colors
        .iter()
        .find(|entry| entry.role == role)
        .map(|entry| entry.name.clone())
        .unwrap_or_else(|| NEUTRAL_GRAY_NAME.to_string())
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn color_rule(role: ColorRole, name: &str, hex: &str) -> ColorRule {
    let parsed = color::parse_hex(hex).unwrap_or(Srgb::new(0x80, 0x80, 0x80));
    let white = Srgb::new(0xFF, 0xFF, 0xFF);
    let black = Srgb::new(0x00, 0x00, 0x00);
    let on_white = color::contrast_ratio(parsed, white);
    let on_black = color::contrast_ratio(parsed, black);
    let text_color = if on_black >= on_white { "#111111" } else { "#FFFFFF" };

    let note = match TextSuitability::from_contrast(on_white) {
        TextSuitability::BodyText => format!("{hex} is safe for text of any size on white."),
        TextSuitability::LargeText => {
            format!("{hex} on white passes only for headlines of 24 px and up, icons and UI strokes.")
        }
        TextSuitability::DecorativeOnly => {
            format!("{hex} is too light for text on white; use it for fills with {text_color} text on top.")
        }
    };

    ColorRule {
        role,
        name: name.to_string(),
        hex: hex.to_string(),
        contrast_on_white: round2(on_white),
        contrast_on_black: round2(on_black),
        on_white: TextSuitability::from_contrast(on_white),
        on_black: TextSuitability::from_contrast(on_black),
        text_color: text_color.to_string(),
        note,
    }
}

fn font_rule(role: FontRole, name: &str, family: &str, weights: &[u16]) -> FontRule {
    let (usage, min, max, line_height) = match role {
        FontRole::Primary => ("Headlines, logotype accompaniment and covers", 28, 72, "1.1 to 1.2"),
        FontRole::PrimaryAlt => ("Subheadings, quotes and numbers", 20, 36, "1.2 to 1.3"),
        FontRole::Secondary => ("Body copy, forms and long reads", 14, 18, "1.5 to 1.6"),
        FontRole::SecondaryAlt => ("Captions, labels, tables and UI hints", 11, 14, "1.4"),
    };
    let weights: Vec<u16> = match role {
        FontRole::Primary | FontRole::PrimaryAlt => {
            weights.iter().copied().filter(|w| *w >= 500).collect()
        }
        FontRole::Secondary | FontRole::SecondaryAlt => {
            weights.iter().copied().filter(|w| *w <= 500).collect()
        }
    };

    FontRule {
        role,
        name: name.to_string(),
        family: family.to_string(),
        usage: usage.to_string(),
        min_size_px: min,
        max_size_px: max,
        weights,
        line_height: line_height.to_string(),
        prohibitions: vec![
            format!("Do not set {name} below {min} px"),
            "Do not stretch, outline or fake bold/italic styles".to_string(),
            "Do not use all caps for more than one line".to_string(),
        ],
    }
}

fn logo_rule(kind: LogoVariantKind, name: &str, url: &str) -> LogoRule {
    let (min_width, backgrounds) = match kind {
        LogoVariantKind::Original => (120, "White or very light backgrounds"),
        LogoVariantKind::Monochrome => (120, "Single-colour print, stamps and watermarks"),
        LogoVariantKind::Inverted => (120, "Dark backgrounds and photography with a dark overlay"),
        LogoVariantKind::Abbreviation => (32, "Square and round avatars, favicons and app icons"),
        LogoVariantKind::WordmarkLockup => (240, "Covers, letterheads and signage with ample space"),
    };
    LogoRule {
        kind,
        name: name.to_string(),
        url: url.to_string(),
        min_width_px: min_width,
        clear_space: "Keep free space of at least a quarter of the logo height on every side".into(),
        backgrounds: backgrounds.into(),
        prohibitions: vec![
            "Do not rotate, skew or change proportions".into(),
            "Do not place on busy backgrounds without a plate".into(),
            "Do not add shadows, glows or outlines".into(),
        ],
    }
}

fn icon_rule(bundle: &BundleView<'_>) -> IconRule {
    let library_icons = bundle
        .icons
        .iter()
        .filter(|icon| icon.origin == IconOrigin::Library)
        .count();
    let accent = bundle.hex(ColorRole::Accent).to_string();
    IconRule {
        count: bundle.icons.len(),
        library_icons,
        synthesized_icons: bundle.icons.len() - library_icons,
        sizes_px: vec![24, 32, 48, 64],
        guidance: vec![
            format!(
                "Colour icons with the accent {accent} or the text colour {}",
                bundle.hex(ColorRole::Text)
            ),
            "Keep one icon style per layout; do not mix sets".into(),
            "Align icons to the text baseline and keep equal spacing".into(),
        ],
        color: accent,
    }
}
