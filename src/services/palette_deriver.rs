//! Palette selection for a style bucket and derivation of the tint/shade pair.

use palette::Srgb;
use rand::{Rng, seq::IndexedRandom};
use tracing::warn;

use crate::{
    catalog::{Catalog, PaletteVariant, StyleBucket},
    services::color::{self, NEUTRAL_GRAY},
    state::brand::{ColorEntry, ColorRole},
};

/// Palette chosen for a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPalette {
    /// Name of the palette variant drawn.
    pub variant: String,
    /// Six base roles plus tint and shade.
    pub colors: Vec<ColorEntry>,
}

impl DerivedPalette {
    /// Hex of the first entry with `role`, or the neutral gray.
    pub fn hex(&self, role: ColorRole) -> &str {
        hex_of(&self.colors, role)
    }
}

/// Hex of the first entry with `role` in `colors`, or the neutral gray.
pub fn hex_of(colors: &[ColorEntry], role: ColorRole) -> &str {
    colors
        .iter()
        .find(|entry| entry.role == role)
        .map(|entry| entry.hex.as_str())
        .unwrap_or(NEUTRAL_GRAY)
}

/// Pick one of the bucket's palette variants uniformly at random and expand it.
pub fn derive_palette<R: Rng + ?Sized>(
    catalog: &Catalog,
    bucket: StyleBucket,
    rng: &mut R,
) -> DerivedPalette {
    match catalog.style(bucket).palettes.choose(rng) {
        Some(variant) => DerivedPalette {
            variant: variant.name.clone(),
            colors: expand_variant(variant),
        },
        None => {
            warn!(style = %bucket, "style has no palette variants; using neutral palette");
            let variant = neutral_variant();
            DerivedPalette {
                variant: variant.name.clone(),
                colors: expand_variant(&variant),
            }
        }
    }
}

/// Turn the six role colours into eight entries: the roles plus a tint and a shade of primary.
pub fn expand_variant(variant: &PaletteVariant) -> Vec<ColorEntry> {
    let base = [
        (ColorRole::Primary, variant.primary.as_str()),
        (ColorRole::Secondary, variant.secondary.as_str()),
        (ColorRole::Accent, variant.accent.as_str()),
        (ColorRole::Neutral, variant.neutral.as_str()),
        (ColorRole::Background, variant.background.as_str()),
        (ColorRole::Text, variant.text.as_str()),
    ];

    let mut entries: Vec<ColorEntry> = base
        .iter()
        .map(|(role, hex)| entry(*role, resolve(&variant.name, *role, hex)))
        .collect();

    let primary = resolve(&variant.name, ColorRole::Primary, &variant.primary);
    entries.push(entry(ColorRole::Tint, color::tint(primary)));
    entries.push(entry(ColorRole::Shade, color::shade(primary)));
    entries
}

fn resolve(variant: &str, role: ColorRole, hex: &str) -> Srgb<u8> {
    match color::parse_hex(hex) {
        Ok(parsed) => parsed,
        Err(reason) => {
            warn!(variant, ?role, %reason, "substituting neutral gray");
            neutral_gray()
        }
    }
}

fn neutral_gray() -> Srgb<u8> {
    Srgb::new(0x80, 0x80, 0x80)
}

fn entry(role: ColorRole, value: Srgb<u8>) -> ColorEntry {
    ColorEntry {
        name: format!("{} ({})", color::describe(value), role_title(role)),
        role,
        hex: color::to_hex(value),
        rgb: color::to_rgb_string(value),
        usage: role_usage(role).to_string(),
    }
}

fn role_title(role: ColorRole) -> &'static str {
    match role {
        ColorRole::Primary => "Primary",
        ColorRole::Secondary => "Secondary",
        ColorRole::Accent => "Accent",
        ColorRole::Neutral => "Neutral",
        ColorRole::Background => "Background",
        ColorRole::Text => "Text",
        ColorRole::Tint => "Tint",
        ColorRole::Shade => "Shade",
    }
}

fn role_usage(role: ColorRole) -> &'static str {
    match role {
        ColorRole::Primary => "Main brand colour: logo, key buttons and headline accents.",
        ColorRole::Secondary => "Supporting colour for secondary buttons, footers and large blocks.",
        ColorRole::Accent => "Highlights and calls to action; use sparingly on small areas.",
        ColorRole::Neutral => "Borders, captions, dividers and muted interface text.",
        ColorRole::Background => "Default page, slide and document background.",
        ColorRole::Text => "Body copy and headings on light backgrounds.",
        ColorRole::Tint => "Cards, panels and soft surfaces derived from the primary colour.",
        ColorRole::Shade => "Borders, hover states and emphasis derived from the primary colour.",
    }
}

fn neutral_variant() -> PaletteVariant {
    PaletteVariant {
        name: "neutral".into(),
        primary: "#4B5563".into(),
        secondary: "#1F2937".into(),
        accent: "#2563EB".into(),
        neutral: NEUTRAL_GRAY.into(),
        background: "#FFFFFF".into(),
        text: "#111827".into(),
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn is_hex6(value: &str) -> bool {
        value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn every_bucket_yields_all_roles_plus_tint_and_shade() {
        let catalog = Catalog::bundled();
        let mut rng = StdRng::seed_from_u64(7);
        for bucket in StyleBucket::ALL {
            let palette = derive_palette(&catalog, bucket, &mut rng);
            assert_eq!(palette.colors.len(), 8);
            for role in ColorRole::BASE {
                assert!(palette.colors.iter().any(|entry| entry.role == role));
            }
            assert!(palette.colors.iter().any(|e| e.role == ColorRole::Tint));
            assert!(palette.colors.iter().any(|e| e.role == ColorRole::Shade));
            assert!(palette.colors.iter().all(|entry| is_hex6(&entry.hex)));
        }
    }

    #[test]
    fn chosen_variant_is_one_of_the_bucket_candidates() {
        let catalog = Catalog::bundled();
        let names: Vec<_> = catalog
            .style(StyleBucket::Classic)
            .palettes
            .iter()
            .map(|variant| variant.name.clone())
            .collect();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let palette = derive_palette(&catalog, StyleBucket::Classic, &mut rng);
            assert!(names.contains(&palette.variant));
        }
    }

    #[test]
    fn same_seed_same_palette() {
        let catalog = Catalog::bundled();
        let a = derive_palette(&catalog, StyleBucket::Eco, &mut StdRng::seed_from_u64(42));
        let b = derive_palette(&catalog, StyleBucket::Eco, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_hex_becomes_neutral_gray() {
        let mut variant = neutral_variant();
        variant.accent = "not-a-colour".into();
        let colors = expand_variant(&variant);
        assert_eq!(hex_of(&colors, ColorRole::Accent), "#808080");
    }

    #[test]
    fn tint_and_shade_derive_from_primary() {
        let variant = neutral_variant();
        let colors = expand_variant(&variant);
        let primary = color::parse_hex(&variant.primary).unwrap();
        assert_eq!(
            hex_of(&colors, ColorRole::Tint),
            color::to_hex(color::tint(primary))
        );
        assert_eq!(
            hex_of(&colors, ColorRole::Shade),
            color::to_hex(color::shade(primary))
        );
    }
}
