//! Weighted keyword scoring of free text against the style buckets.

use crate::catalog::{Catalog, StyleBucket};

/// Points for a trigger keyword found verbatim inside the input.
const EXACT_MATCH_POINTS: u32 = 10;
/// Points for a token and a trigger keyword containing one another.
const PARTIAL_MATCH_POINTS: u32 = 5;
/// Tokens shorter than this (in characters) never take part in partial matching.
const MIN_TOKEN_CHARS: usize = 3;

/// Lowercase, split on anything that is not a letter or digit, drop duplicates.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in input
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
    {
        if !tokens.iter().any(|existing| existing == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Score every bucket for `input`, in declaration order.
pub fn score_styles(catalog: &Catalog, input: &str) -> Vec<(StyleBucket, u32)> {
    let haystack = input.to_lowercase();
    let tokens = tokenize(input);

    StyleBucket::ALL
        .iter()
        .map(|&bucket| {
            let style = catalog.style(bucket);
            let mut score = 0;

            for trigger in &style.triggers {
                let trigger = trigger.to_lowercase();
                if trigger.is_empty() {
                    continue;
                }
                if haystack.contains(&trigger) {
                    score += EXACT_MATCH_POINTS;
                }
                for token in &tokens {
                    if token.chars().count() < MIN_TOKEN_CHARS {
                        continue;
                    }
                    if trigger.contains(token.as_str()) || token.contains(trigger.as_str()) {
                        score += PARTIAL_MATCH_POINTS;
                    }
                }
            }

            for rule in catalog.bonus_rules.iter().filter(|rule| rule.style == bucket) {
                let fires = tokens.iter().any(|token| {
                    rule.stems
                        .iter()
                        .any(|stem| !stem.is_empty() && token.starts_with(stem.as_str()))
                });
                if fires {
                    score += rule.bonus;
                }
            }

            (bucket, score)
        })
        .collect()
}

/// Bucket with the strictly highest score; ties go to the catalog priority order and an
/// all-zero result falls back to the catalog default.
pub fn classify(catalog: &Catalog, input: &str) -> StyleBucket {
    let scores = score_styles(catalog, input);
    let best = scores.iter().map(|(_, score)| *score).max().unwrap_or(0);
    if best == 0 {
        return catalog.default_style;
    }

    scores
        .into_iter()
        .filter(|(_, score)| *score == best)
        .map(|(bucket, _)| bucket)
        .min_by_key(|bucket| catalog.priority_rank(*bucket))
        .unwrap_or(catalog.default_style)
}

/// Resolve an explicit label ("Playful", "Игривый", "eco") to its bucket.
pub fn bucket_for_label(catalog: &Catalog, label: &str) -> Option<StyleBucket> {
    let wanted = label.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    StyleBucket::ALL.into_iter().find(|&bucket| {
        bucket.as_str() == wanted
            || catalog
                .style(bucket)
                .labels
                .iter()
                .any(|candidate| candidate.to_lowercase() == wanted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::bundled()
    }

    #[test]
    fn tokenize_handles_cyrillic_and_punctuation() {
        assert_eq!(
            tokenize("Ресторан, еда;  уют! ресторан"),
            vec!["ресторан", "еда", "уют"]
        );
        assert_eq!(tokenize("  "), Vec::<String>::new());
    }

    #[test]
    fn technology_startup_is_modern() {
        let catalog = catalog();
        assert_eq!(
            classify(&catalog, "modern technology, startup"),
            StyleBucket::Modern
        );
        assert_eq!(classify(&catalog, "technology, startup"), StyleBucket::Modern);
    }

    #[test]
    fn russian_playful_restaurant_is_playful() {
        let catalog = catalog();
        let input = "Игривый ресторан, еда, уют ресторан";
        assert_eq!(classify(&catalog, input), StyleBucket::Playful);
    }

    #[test]
    fn eco_bonus_beats_generic_matches() {
        let catalog = catalog();
        assert_eq!(
            classify(&catalog, "organic farm shop, modern delivery"),
            StyleBucket::Eco
        );
    }

    #[test]
    fn empty_or_unknown_input_defaults_to_modern() {
        let catalog = catalog();
        assert_eq!(classify(&catalog, ""), StyleBucket::Modern);
        assert_eq!(classify(&catalog, "zzzz qqqq"), StyleBucket::Modern);
    }

    #[test]
    fn ties_follow_priority_order() {
        let mut catalog = catalog();
        catalog.bonus_rules.clear();
        for bucket in StyleBucket::ALL {
            let triggers = match bucket {
                StyleBucket::Classic | StyleBucket::Minimal => vec!["shared".to_string()],
                _ => Vec::new(),
            };
            match bucket {
                StyleBucket::Modern => catalog.styles.modern.triggers = triggers,
                StyleBucket::Classic => catalog.styles.classic.triggers = triggers,
                StyleBucket::Creative => catalog.styles.creative.triggers = triggers,
                StyleBucket::Professional => catalog.styles.professional.triggers = triggers,
                StyleBucket::Playful => catalog.styles.playful.triggers = triggers,
                StyleBucket::Minimal => catalog.styles.minimal.triggers = triggers,
                StyleBucket::Eco => catalog.styles.eco.triggers = triggers,
            }
        }
        // Both score 15; classic precedes minimal in the bundled priority list.
        assert_eq!(classify(&catalog, "shared"), StyleBucket::Classic);
    }

    #[test]
    fn classification_is_pure() {
        let catalog = catalog();
        let input = "luxury vintage jewelry boutique";
        let first = classify(&catalog, input);
        for _ in 0..10 {
            assert_eq!(classify(&catalog, input), first);
        }
        assert_eq!(first, StyleBucket::Classic);
    }

    #[test]
    fn labels_resolve_in_both_languages() {
        let catalog = catalog();
        assert_eq!(bucket_for_label(&catalog, "Игривый"), Some(StyleBucket::Playful));
        assert_eq!(bucket_for_label(&catalog, "eco"), Some(StyleBucket::Eco));
        assert_eq!(bucket_for_label(&catalog, "Professional"), Some(StyleBucket::Professional));
        assert_eq!(bucket_for_label(&catalog, "baroque"), None);
    }
}
