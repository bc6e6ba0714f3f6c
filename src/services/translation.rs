//! Bilingual keyword translation into English icon-search vocabulary.

use crate::{
    catalog::{Catalog, IndustryDecor},
    services::style_classifier::tokenize,
};

/// Dictionary keys shorter than this never match by substring.
const MIN_FUZZY_KEY_CHARS: usize = 4;
/// Untranslated tokens shorter than this are not useful search terms.
const MIN_TERM_CHARS: usize = 3;

/// Translate free text into English search terms, preserving first-seen order.
///
/// Each token is looked up exactly in the dictionary, then by stem/substring; untranslated
/// ASCII words are kept verbatim unless they are stop words.
pub fn translate_terms(catalog: &Catalog, text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    for token in tokenize(text) {
        if let Some(found) = catalog.dictionary.get(&token) {
            extend_unique(&mut terms, found);
            continue;
        }

        let fuzzy = catalog.dictionary.iter().find(|(key, _)| {
            key.chars().count() >= MIN_FUZZY_KEY_CHARS
                && (token.starts_with(key.as_str()) || token.contains(key.as_str()))
        });
        if let Some((_, found)) = fuzzy {
            extend_unique(&mut terms, found);
            continue;
        }

        let keep = token.is_ascii()
            && token.chars().count() >= MIN_TERM_CHARS
            && token.chars().all(|c| c.is_ascii_alphabetic())
            && !catalog.stop_words.iter().any(|stop| *stop == token);
        if keep {
            push_unique(&mut terms, token);
        }
    }
    terms
}

/// Search terms for brand icons: the translated terms followed by the generic catalog terms.
pub fn brand_terms(catalog: &Catalog, text: &str) -> Vec<String> {
    let mut terms = translate_terms(catalog, text);
    extend_unique(&mut terms, &catalog.generic_terms);
    terms
}

/// First industry vocabulary triggered by any of `terms`.
pub fn industry_decor<'a>(catalog: &'a Catalog, terms: &[String]) -> Option<&'a IndustryDecor> {
    catalog.decorative.industries.iter().find(|industry| {
        industry
            .triggers
            .iter()
            .any(|trigger| terms.iter().any(|term| term == trigger))
    })
}

fn extend_unique(terms: &mut Vec<String>, extra: &[String]) {
    for term in extra {
        push_unique(terms, term.to_lowercase());
    }
}

fn push_unique(terms: &mut Vec<String>, term: String) {
    if !term.is_empty() && !terms.contains(&term) {
        terms.push(term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_keywords_translate_through_dictionary() {
        let catalog = Catalog::bundled();
        let terms = translate_terms(&catalog, "ресторан, еда, уют");
        assert_eq!(terms[..3], ["restaurant", "food", "dish"]);
        assert!(terms.contains(&"cozy".to_string()));
    }

    #[test]
    fn inflected_words_fall_back_to_stems() {
        let catalog = Catalog::bundled();
        let terms = translate_terms(&catalog, "ресторанный");
        assert_eq!(terms, vec!["restaurant", "food"]);
    }

    #[test]
    fn english_words_pass_through_without_stop_words() {
        let catalog = Catalog::bundled();
        let terms = translate_terms(&catalog, "rocket and the cloud, ab");
        assert_eq!(terms, vec!["rocket", "cloud"]);
    }

    #[test]
    fn brand_terms_end_with_generic_terms() {
        let catalog = Catalog::bundled();
        let terms = brand_terms(&catalog, "");
        assert_eq!(terms, catalog.generic_terms);
    }

    #[test]
    fn restaurant_terms_select_restaurant_vocabulary() {
        let catalog = Catalog::bundled();
        let terms = translate_terms(&catalog, "ресторан, еда, уют");
        let industry = industry_decor(&catalog, &terms).unwrap();
        assert_eq!(industry.name, "restaurant");
        assert!(industry_decor(&catalog, &["zzz".to_string()]).is_none());
    }
}
