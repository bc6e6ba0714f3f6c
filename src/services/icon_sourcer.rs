//! Brand icon and decorative element sourcing with deterministic fallbacks.
//!
//! Two groups are filled concurrently: five brand icons and one element per decorative slot.
//! Every slot the external search cannot fill receives a synthesized SVG, so the result always
//! holds exactly ten entries with distinct identifiers.

use std::{collections::HashSet, sync::Arc, time::Duration};

use futures::future::BoxFuture;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::{
    catalog::{Catalog, DecorSlot, StyleAffinity, StyleBucket},
    dao::{
        error::LookupResult,
        icon_search::{IconSearch, split_icon_id},
    },
    error::{FallbackReason, Fallible},
    services::{
        color::{self, NEUTRAL_GRAY},
        translation,
    },
    state::brand::{IconCategory, IconEntry, IconOrigin},
};

/// Number of brand icons per bundle.
pub const BRAND_ICON_COUNT: usize = 5;
/// Consecutive failed lookups after which a group stops querying the collaborator.
const MAX_CONSECUTIVE_FAILURES: u32 = 3;
/// Ranked hits tried per term before moving to the next term.
const MAX_FETCH_ATTEMPTS: usize = 3;
/// Markup larger than this is not embedded in a bundle.
const MAX_MARKUP_BYTES: usize = 100 * 1024;

const EXACT_NAME_SCORE: i32 = 100;
const PREFIX_NAME_SCORE: i32 = 60;
const SUBSTRING_NAME_SCORE: i32 = 30;
const BASE_SCORE: i32 = 5;
const FAVORED_BONUS: i32 = 15;
const PENALIZED_MALUS: i32 = 10;

/// Everything the sourcer needs to know about the bundle being derived.
#[derive(Debug, Clone, Copy)]
pub struct IconContext<'a> {
    /// Reference data.
    pub catalog: &'a Catalog,
    /// Classified style.
    pub bucket: StyleBucket,
    /// Industry and keywords, in any language.
    pub subject: &'a str,
    /// Used for synthesized brand marks.
    pub business_name: &'a str,
    /// Accent colour used for synthesized elements and `currentColor` markup.
    pub accent_hex: &'a str,
}

/// Icon search front-end applying timeouts, ranking and fallback synthesis.
#[derive(Clone)]
pub struct IconSourcer {
    search: Arc<dyn IconSearch>,
    lookup_timeout: Duration,
    search_limit: usize,
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    id: String,
    score: i32,
    library_rank: usize,
}

/// A hit whose markup was fetched and accepted.
#[derive(Debug, Clone)]
struct SourcedIcon {
    id: String,
    term: String,
    svg: String,
}

/// Lookup bookkeeping for one group: used identifiers and the failure breaker.
#[derive(Debug, Default)]
struct GroupState {
    used: HashSet<String>,
    consecutive_failures: u32,
}

impl GroupState {
    fn breaker_open(&self) -> bool {
        self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES
    }

    fn record<T>(&mut self, outcome: &Fallible<T>) {
        match outcome {
            Ok(_) => self.consecutive_failures = 0,
            Err(FallbackReason::Timeout | FallbackReason::Lookup(_)) => {
                self.consecutive_failures += 1;
            }
            Err(_) => {}
        }
    }
}

impl IconSourcer {
    /// Build a sourcer over `search`, bounding each collaborator call by `lookup_timeout`.
    pub fn new(search: Arc<dyn IconSearch>, lookup_timeout: Duration, search_limit: usize) -> Self {
        Self {
            search,
            lookup_timeout,
            search_limit: search_limit.max(1),
        }
    }

    /// Source five brand icons and five decorative elements.
    ///
    /// Brand icons come first, then the decorative slots in their fixed order.
    pub async fn source(&self, ctx: IconContext<'_>) -> Vec<IconEntry> {
        let terms = translation::translate_terms(ctx.catalog, ctx.subject);
        debug!(?terms, "translated icon search terms");

        let (brand, decorative) =
            tokio::join!(self.brand_icons(ctx), self.decorative_elements(ctx, &terms));

        let taken: HashSet<String> = brand.iter().map(|entry| entry.id.clone()).collect();
        let mut entries = brand;
        for entry in decorative {
            match entry.slot {
                Some(slot) if taken.contains(&entry.id) => {
                    warn!(slot = slot.as_str(), id = %entry.id, "duplicate icon replaced by fallback");
                    entries.push(synthesize_decoration(slot, ctx.accent_hex));
                }
                _ => entries.push(entry),
            }
        }
        entries
    }

    async fn brand_icons(&self, ctx: IconContext<'_>) -> Vec<IconEntry> {
        let style = ctx.catalog.style(ctx.bucket);
        let terms = translation::brand_terms(ctx.catalog, ctx.subject);
        let mut state = GroupState::default();
        let mut entries = Vec::with_capacity(BRAND_ICON_COUNT);

        for term in &terms {
            if entries.len() == BRAND_ICON_COUNT || state.breaker_open() {
                break;
            }
            match self
                .find_icon(term, &style.icon_libraries, &style.affinity, &mut state)
                .await
            {
                Ok(icon) => entries.push(brand_entry(icon, ctx.accent_hex)),
                Err(reason) => debug!(term = %term, %reason, "no brand icon for term"),
            }
        }

        if state.breaker_open() {
            warn!(
                failures = state.consecutive_failures,
                "icon search unavailable; stopped querying brand icons"
            );
        }
        let initial = initial_letter(ctx.business_name);
        while entries.len() < BRAND_ICON_COUNT {
            let index = entries.len();
            warn!(index, "no library icon available; synthesizing brand icon");
            entries.push(synthesize_brand_icon(index, initial, ctx.accent_hex));
        }
        entries
    }

    async fn decorative_elements(&self, ctx: IconContext<'_>, terms: &[String]) -> Vec<IconEntry> {
        let style = ctx.catalog.style(ctx.bucket);
        let industry = translation::industry_decor(ctx.catalog, terms);
        if let Some(industry) = industry {
            debug!(industry = %industry.name, "using industry decorative vocabulary");
        }

        let mut state = GroupState::default();
        let mut entries = Vec::with_capacity(DecorSlot::ALL.len());

        for slot in DecorSlot::ALL {
            let mut slot_terms: Vec<&String> = Vec::new();
            if let Some(industry) = industry {
                slot_terms.extend(industry.slots.get(slot));
            }
            slot_terms.extend(ctx.catalog.decorative.default.get(slot));

            let mut last_reason = FallbackReason::NoCandidates;
            let mut found = None;
            for term in slot_terms {
                if state.breaker_open() {
                    last_reason = FallbackReason::Timeout;
                    break;
                }
                match self
                    .find_icon(term, &style.icon_libraries, &style.affinity, &mut state)
                    .await
                {
                    Ok(icon) => {
                        found = Some(icon);
                        break;
                    }
                    Err(reason) => last_reason = reason,
                }
            }

            match found {
                Some(icon) => entries.push(decorative_entry(slot, icon, ctx.accent_hex)),
                None => {
                    warn!(slot = slot.as_str(), reason = %last_reason, "synthesizing decorative element");
                    entries.push(synthesize_decoration(slot, ctx.accent_hex));
                }
            }
        }
        entries
    }

    /// Search `term`, rank the hits and fetch the best unused one with usable markup.
    async fn find_icon(
        &self,
        term: &str,
        prefixes: &[String],
        affinity: &StyleAffinity,
        state: &mut GroupState,
    ) -> Fallible<SourcedIcon> {
        let hits = bounded(
            self.lookup_timeout,
            self.search.search(term, prefixes, self.search_limit),
        )
        .await;
        state.record(&hits);
        let ranked = rank_candidates(term, hits?, prefixes, affinity, &state.used);
        if ranked.is_empty() {
            return Err(FallbackReason::NoCandidates);
        }

        let mut last_reason = FallbackReason::NoCandidates;
        for candidate in ranked.into_iter().take(MAX_FETCH_ATTEMPTS) {
            if state.breaker_open() {
                break;
            }
            let markup =
                bounded(self.lookup_timeout, self.search.fetch_markup(&candidate.id)).await;
            state.record(&markup);
            let svg = markup.and_then(|svg| {
                usable_markup(&svg)
                    .ok_or_else(|| FallbackReason::UnusableMarkup(candidate.id.clone()))
            });
            match svg {
                Ok(svg) => {
                    state.used.insert(candidate.id.clone());
                    return Ok(SourcedIcon {
                        id: candidate.id,
                        term: term.to_string(),
                        svg,
                    });
                }
                Err(reason) => {
                    debug!(id = %candidate.id, %reason, "icon candidate rejected");
                    last_reason = reason;
                }
            }
        }
        Err(last_reason)
    }
}

/// Await a collaborator call, mapping an elapsed deadline to [`FallbackReason::Timeout`].
async fn bounded<T>(limit: Duration, call: BoxFuture<'static, LookupResult<T>>) -> Fallible<T> {
    match timeout(limit, call).await {
        Ok(result) => result.map_err(FallbackReason::from),
        Err(_) => Err(FallbackReason::Timeout),
    }
}

fn name_score(term: &str, name: &str) -> i32 {
    if name == term {
        EXACT_NAME_SCORE
    } else if name.starts_with(term) {
        PREFIX_NAME_SCORE
    } else if name.contains(term) {
        SUBSTRING_NAME_SCORE
    } else {
        BASE_SCORE
    }
}

fn affinity_score(name: &str, affinity: &StyleAffinity) -> i32 {
    let mut score = 0;
    if affinity.favored.iter().any(|fragment| name.contains(fragment.as_str())) {
        score += FAVORED_BONUS;
    }
    if affinity
        .penalized
        .iter()
        .any(|fragment| name.contains(fragment.as_str()))
    {
        score -= PENALIZED_MALUS;
    }
    score
}

/// Score, filter and order search hits: score, then library priority, then identifier.
fn rank_candidates(
    term: &str,
    hits: Vec<String>,
    prefixes: &[String],
    affinity: &StyleAffinity,
    used: &HashSet<String>,
) -> Vec<Candidate> {
    let term = term.to_lowercase();
    let mut seen = HashSet::new();
    let mut ranked: Vec<Candidate> = hits
        .into_iter()
        .filter(|id| !used.contains(id) && seen.insert(id.clone()))
        .filter_map(|id| {
            let (prefix, name) = split_icon_id(&id)?;
            let name = name.to_lowercase();
            let library_rank = prefixes
                .iter()
                .position(|candidate| candidate == prefix)
                .unwrap_or(prefixes.len());
            let score = name_score(&term, &name) + affinity_score(&name, affinity);
            Some(Candidate {
                id: id.clone(),
                score,
                library_rank,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.library_rank.cmp(&b.library_rank))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

/// Accept markup that looks like a complete, reasonably small SVG document.
fn usable_markup(svg: &str) -> Option<String> {
    let trimmed = svg.trim();
    let complete = trimmed.starts_with("<svg")
        && (trimmed.ends_with("</svg>") || trimmed.ends_with("/>"));
    if complete && trimmed.len() <= MAX_MARKUP_BYTES {
        Some(trimmed.to_string())
    } else {
        None
    }
}

fn accent_or_gray(accent_hex: &str) -> String {
    color::normalize_hex(accent_hex).unwrap_or_else(|_| NEUTRAL_GRAY.to_string())
}

fn colorize(svg: &str, accent_hex: &str) -> String {
    svg.replace("currentColor", &accent_or_gray(accent_hex))
}

/// "coffee-cup-outline" → "Coffee cup outline".
fn humanize(icon_name: &str) -> String {
    let words = icon_name.replace(['-', '_'], " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_or_whole(id: &str) -> (&str, &str) {
    split_icon_id(id).unwrap_or(("library", id))
}

fn brand_entry(icon: SourcedIcon, accent_hex: &str) -> IconEntry {
    let (prefix, name) = split_or_whole(&icon.id);
    IconEntry {
        name: humanize(name),
        svg: colorize(&icon.svg, accent_hex),
        description: format!("`{}` icon from the {prefix} collection, matched for \"{}\"", name, icon.term),
        usage: "Feature lists, navigation and infographics at 24 to 64 px; keep the accent colour."
            .into(),
        category: IconCategory::Icon,
        slot: None,
        origin: IconOrigin::Library,
        id: icon.id,
    }
}

fn decorative_entry(slot: DecorSlot, icon: SourcedIcon, accent_hex: &str) -> IconEntry {
    let (prefix, name) = split_or_whole(&icon.id);
    IconEntry {
        name: humanize(name),
        svg: colorize(&icon.svg, accent_hex),
        description: format!(
            "{} element from the {prefix} collection, matched for \"{}\"",
            slot.as_str(),
            icon.term
        ),
        usage: slot_usage(slot).into(),
        category: slot.into(),
        slot: Some(slot),
        origin: IconOrigin::Library,
        id: icon.id,
    }
}

fn slot_usage(slot: DecorSlot) -> &'static str {
    match slot {
        DecorSlot::Pattern => "Repeat as a subtle texture behind content at 5 to 10% opacity.",
        DecorSlot::Shape => "Frame photos, avatars and highlighted figures.",
        DecorSlot::Background => "Large hero and cover backgrounds; keep text contrast readable.",
        DecorSlot::Decoration => "Accent headlines and empty corners; one per layout.",
        DecorSlot::Divider => "Separate sections in documents, slides and emails.",
    }
}

/// First letter or digit of the business name, upper-cased.
fn initial_letter(business_name: &str) -> char {
    business_name
        .chars()
        .find(|c| c.is_alphanumeric())
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('B')
}

/// Geometric placeholder icon: shape keyed by position, letter keyed by the business name.
pub fn synthesize_brand_icon(index: usize, initial: char, accent_hex: &str) -> IconEntry {
    let accent = accent_or_gray(accent_hex);
    let (shape_name, shape) = match index % BRAND_ICON_COUNT {
        0 => ("circle", format!(r#"<circle cx="32" cy="32" r="28" fill="{accent}"/>"#)),
        1 => (
            "rounded square",
            format!(r#"<rect x="6" y="6" width="52" height="52" rx="12" fill="{accent}"/>"#),
        ),
        2 => (
            "diamond",
            format!(r#"<polygon points="32,3 61,32 32,61 3,32" fill="{accent}"/>"#),
        ),
        3 => (
            "hexagon",
            format!(r#"<polygon points="32,3 58,18 58,46 32,61 6,46 6,18" fill="{accent}"/>"#),
        ),
        _ => (
            "shield",
            format!(r#"<path d="M32 4 L58 14 V32 C58 46 46 56 32 60 C18 56 6 46 6 32 V14 Z" fill="{accent}"/>"#),
        ),
    };
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64" width="64" height="64">{shape}<text x="32" y="41" text-anchor="middle" font-family="sans-serif" font-size="26" font-weight="700" fill="#FFFFFF">{initial}</text></svg>"##
    );

    IconEntry {
        id: format!("fallback:icon-{}", index + 1),
        name: format!("{initial} {shape_name}"),
        svg,
        description: format!("Synthesized {shape_name} mark with the letter {initial}"),
        usage: "Placeholder brand icon; replace with a custom pictogram when available.".into(),
        category: IconCategory::Icon,
        slot: None,
        origin: IconOrigin::Synthesized,
    }
}

/// Geometric placeholder for a decorative slot.
pub fn synthesize_decoration(slot: DecorSlot, accent_hex: &str) -> IconEntry {
    let accent = accent_or_gray(accent_hex);
    let body = match slot {
        DecorSlot::Pattern => format!(
            r#"<defs><pattern id="dots" width="16" height="16" patternUnits="userSpaceOnUse"><circle cx="8" cy="8" r="2.5" fill="{accent}"/></pattern></defs><rect width="64" height="64" fill="url(#dots)"/>"#
        ),
        DecorSlot::Shape => format!(
            r#"<rect x="6" y="6" width="52" height="52" rx="8" fill="none" stroke="{accent}" stroke-width="4"/>"#
        ),
        DecorSlot::Background => format!(
            r#"<rect width="64" height="64" fill="{accent}" opacity="0.15"/><path d="M0 44 C16 34 32 54 48 44 S64 38 64 38 V64 H0 Z" fill="{accent}"/>"#
        ),
        DecorSlot::Decoration => format!(
            r#"<polygon points="32,4 39,24 60,24 43,37 49,58 32,45 15,58 21,37 4,24 25,24" fill="{accent}"/>"#
        ),
        DecorSlot::Divider => format!(
            r#"<line x1="4" y1="32" x2="26" y2="32" stroke="{accent}" stroke-width="3"/><circle cx="32" cy="32" r="4" fill="{accent}"/><line x1="38" y1="32" x2="60" y2="32" stroke="{accent}" stroke-width="3"/>"#
        ),
    };
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64" width="64" height="64">{body}</svg>"#
    );

    IconEntry {
        id: format!("fallback:{}", slot.as_str()),
        name: humanize(&format!("{} placeholder", slot.as_str())),
        svg,
        description: format!("Synthesized {} element in the accent colour", slot.as_str()),
        usage: slot_usage(slot).into(),
        category: slot.into(),
        slot: Some(slot),
        origin: IconOrigin::Synthesized,
    }
}
