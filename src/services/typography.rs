//! Business sphere resolution and font pairing selection.

use rand::{Rng, seq::IndexedRandom};
use tracing::warn;

use crate::{
    catalog::{Catalog, FontCategory, FontSpec, FontVariant, StyleBucket, StyleDefinition},
    state::brand::{FontEntry, FontRole},
};

const GOOGLE_FONTS_CSS: &str = "https://fonts.googleapis.com/css2";

/// Fonts chosen for a bundle together with the data that drove the choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypographyMatch {
    /// Name of the chosen font variant, or `fallback`.
    pub variant: String,
    /// Business spheres resolved from the description.
    pub spheres: Vec<String>,
    /// Two to four entries, primary roles first.
    pub fonts: Vec<FontEntry>,
}

/// Sphere tags whose stems occur anywhere in `text`, in catalog order.
pub fn resolve_spheres(catalog: &Catalog, text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    catalog
        .spheres
        .iter()
        .filter(|(_, stems)| {
            stems
                .iter()
                .any(|stem| !stem.is_empty() && haystack.contains(&stem.to_lowercase()))
        })
        .map(|(tag, _)| tag.clone())
        .collect()
}

/// Variant with the largest overlap between its business types and `spheres`.
///
/// Ties go to the variant declared first; with no spheres the pick is uniform at random.
pub fn choose_font_variant<'a, R: Rng + ?Sized>(
    style: &'a StyleDefinition,
    spheres: &[String],
    rng: &mut R,
) -> Option<&'a FontVariant> {
    if spheres.is_empty() {
        return style.fonts.choose(rng);
    }

    let mut best: Option<(&FontVariant, usize)> = None;
    for variant in &style.fonts {
        let overlap = variant
            .business_types
            .iter()
            .filter(|tag| spheres.contains(tag))
            .count();
        if best.is_none_or(|(_, score)| overlap > score) {
            best = Some((variant, overlap));
        }
    }
    best.map(|(variant, _)| variant)
}

/// Stylesheet URL serving `name` in `weights`.
pub fn webfont_url(name: &str, weights: &[u16]) -> String {
    let family = name.split_whitespace().collect::<Vec<_>>().join("+");
    if weights.is_empty() {
        return format!("{GOOGLE_FONTS_CSS}?family={family}&display=swap");
    }
    let weights = weights
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(";");
    format!("{GOOGLE_FONTS_CSS}?family={family}:wght@{weights}&display=swap")
}

/// Resolve one font name against the reference catalog.
pub fn resolve_font(catalog: &Catalog, name: &str, role: FontRole) -> Option<FontEntry> {
    catalog
        .fonts
        .get(name)
        .map(|spec| font_entry(name, spec, role))
}

fn font_entry(name: &str, spec: &FontSpec, role: FontRole) -> FontEntry {
    FontEntry {
        role,
        name: name.to_string(),
        family: format!("'{}', {}", name, spec.category.css_fallback()),
        category: spec.category,
        weights: spec.weights.clone(),
        webfont_url: spec
            .webfont
            .clone()
            .unwrap_or_else(|| webfont_url(name, &spec.weights)),
    }
}

/// Entry for a catalog fallback font, tolerating its absence from the reference entries.
fn fallback_font(catalog: &Catalog, name: &str, role: FontRole) -> FontEntry {
    resolve_font(catalog, name, role).unwrap_or_else(|| {
        let spec = FontSpec {
            category: FontCategory::SansSerif,
            weights: vec![400, 700],
            webfont: None,
        };
        font_entry(name, &spec, role)
    })
}

/// Resolve spheres, pick the variant of `bucket` and expand it into 2 to 4 font entries.
pub fn match_typography<R: Rng + ?Sized>(
    catalog: &Catalog,
    bucket: StyleBucket,
    text: &str,
    rng: &mut R,
) -> TypographyMatch {
    let spheres = resolve_spheres(catalog, text);
    let style = catalog.style(bucket);

    let Some(variant) = choose_font_variant(style, &spheres, rng) else {
        warn!(style = %bucket, "style has no font variants; using fallback fonts");
        return TypographyMatch {
            variant: "fallback".into(),
            fonts: fallback_pair(catalog).to_vec(),
            spheres,
        };
    };

    let slots = [
        (FontRole::Primary, variant.main.first()),
        (FontRole::PrimaryAlt, variant.main.get(1)),
        (FontRole::Secondary, variant.secondary.first()),
        (FontRole::SecondaryAlt, variant.secondary.get(1)),
    ];

    let mut fonts = Vec::with_capacity(slots.len());
    for (role, name) in slots {
        let Some(name) = name else { continue };
        match resolve_font(catalog, name, role) {
            Some(entry) => fonts.push(entry),
            None => warn!(font = %name, variant = %variant.name, "unknown font dropped"),
        }
    }

    let has_main = fonts
        .iter()
        .any(|font| matches!(font.role, FontRole::Primary | FontRole::PrimaryAlt));
    let has_secondary = fonts
        .iter()
        .any(|font| matches!(font.role, FontRole::Secondary | FontRole::SecondaryAlt));
    let fallbacks = fallback_pair(catalog);
    if !has_main {
        fonts.insert(0, fallbacks[0].clone());
    }
    if !has_secondary {
        fonts.push(fallbacks[1].clone());
    }

    TypographyMatch {
        variant: variant.name.clone(),
        spheres,
        fonts,
    }
}

fn fallback_pair(catalog: &Catalog) -> [FontEntry; 2] {
    let primary = catalog
        .fallback_fonts
        .first()
        .map(String::as_str)
        .unwrap_or("Inter");
    let secondary = catalog
        .fallback_fonts
        .get(1)
        .map(String::as_str)
        .unwrap_or(primary);
    [
        fallback_font(catalog, primary, FontRole::Primary),
        fallback_font(catalog, secondary, FontRole::Secondary),
    ]
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn spheres_come_from_stems() {
        let catalog = Catalog::bundled();
        let spheres = resolve_spheres(&catalog, "Technology startup with a banking app");
        assert!(spheres.contains(&"technology".to_string()));
        assert!(spheres.contains(&"finance".to_string()));
        assert!(resolve_spheres(&catalog, "zzzz").is_empty());
    }

    #[test]
    fn technology_picks_the_tech_pairing() {
        let catalog = Catalog::bundled();
        let mut rng = StdRng::seed_from_u64(1);
        let result =
            match_typography(&catalog, StyleBucket::Modern, "technology, startup", &mut rng);
        assert_eq!(result.variant, "tech");
        assert_eq!(result.fonts[0].name, "Inter");
        assert_eq!(result.fonts[0].role, FontRole::Primary);
        assert!((2..=4).contains(&result.fonts.len()));
    }

    #[test]
    fn no_spheres_picks_one_of_the_variants() {
        let catalog = Catalog::bundled();
        let names: Vec<_> = catalog
            .style(StyleBucket::Classic)
            .fonts
            .iter()
            .map(|variant| variant.name.clone())
            .collect();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = match_typography(&catalog, StyleBucket::Classic, "", &mut rng);
            assert!(names.contains(&result.variant));
            assert!(result.spheres.is_empty());
        }
    }

    #[test]
    fn unknown_fonts_are_dropped_and_backfilled() {
        let mut catalog = Catalog::bundled();
        catalog.styles.minimal.fonts = vec![FontVariant {
            name: "broken".into(),
            business_types: vec![],
            main: vec!["Nonexistent Grotesk".into()],
            secondary: vec!["Lato".into(), "Ghost Serif".into()],
        }];
        let mut rng = StdRng::seed_from_u64(3);
        let result = match_typography(&catalog, StyleBucket::Minimal, "", &mut rng);
        let names: Vec<_> = result.fonts.iter().map(|font| font.name.as_str()).collect();
        assert_eq!(names, vec!["Inter", "Lato"]);
        assert!(!names.contains(&"Ghost Serif"));
    }

    #[test]
    fn style_without_variants_uses_the_fallback_pair() {
        let mut catalog = Catalog::bundled();
        catalog.styles.eco.fonts.clear();
        let mut rng = StdRng::seed_from_u64(9);
        let result = match_typography(&catalog, StyleBucket::Eco, "organic farm", &mut rng);
        assert_eq!(result.variant, "fallback");
        let fonts: Vec<_> = result
            .fonts
            .iter()
            .map(|font| (font.role, font.name.as_str()))
            .collect();
        assert_eq!(
            fonts,
            vec![(FontRole::Primary, "Inter"), (FontRole::Secondary, "Lato")]
        );
    }

    #[test]
    fn webfont_url_joins_words_and_weights() {
        assert_eq!(
            webfont_url("Playfair Display", &[400, 700]),
            "https://fonts.googleapis.com/css2?family=Playfair+Display:wght@400;700&display=swap"
        );
    }

    #[test]
    fn family_is_a_css_stack() {
        let catalog = Catalog::bundled();
        let entry = resolve_font(&catalog, "Inter", FontRole::Primary).unwrap();
        assert_eq!(entry.family, "'Inter', sans-serif");
        assert!(resolve_font(&catalog, "Missing", FontRole::Primary).is_none());
    }
}
