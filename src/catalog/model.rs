//! Serde model of the reference catalog: style buckets, palettes, fonts and icon vocabularies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of style buckets every request is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StyleBucket {
    /// Clean tech-forward look.
    Modern,
    /// Traditional, established look.
    Classic,
    /// Expressive, artistic look.
    Creative,
    /// Corporate and service-oriented look.
    Professional,
    /// Bright, friendly look.
    Playful,
    /// Sparse, restrained look.
    Minimal,
    /// Natural, sustainable look.
    Eco,
}

impl StyleBucket {
    /// Every bucket in declaration order.
    pub const ALL: [StyleBucket; 7] = [
        StyleBucket::Modern,
        StyleBucket::Classic,
        StyleBucket::Creative,
        StyleBucket::Professional,
        StyleBucket::Playful,
        StyleBucket::Minimal,
        StyleBucket::Eco,
    ];

    /// Stable lowercase identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleBucket::Modern => "modern",
            StyleBucket::Classic => "classic",
            StyleBucket::Creative => "creative",
            StyleBucket::Professional => "professional",
            StyleBucket::Playful => "playful",
            StyleBucket::Minimal => "minimal",
            StyleBucket::Eco => "eco",
        }
    }
}

impl std::fmt::Display for StyleBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-bucket reference data, one field per bucket so a catalog can never miss one.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleTable {
    /// Definition of the `modern` bucket.
    pub modern: StyleDefinition,
    /// Definition of the `classic` bucket.
    pub classic: StyleDefinition,
    /// Definition of the `creative` bucket.
    pub creative: StyleDefinition,
    /// Definition of the `professional` bucket.
    pub professional: StyleDefinition,
    /// Definition of the `playful` bucket.
    pub playful: StyleDefinition,
    /// Definition of the `minimal` bucket.
    pub minimal: StyleDefinition,
    /// Definition of the `eco` bucket.
    pub eco: StyleDefinition,
}

impl StyleTable {
    /// Borrow the definition of `bucket`.
    pub fn get(&self, bucket: StyleBucket) -> &StyleDefinition {
        match bucket {
            StyleBucket::Modern => &self.modern,
            StyleBucket::Classic => &self.classic,
            StyleBucket::Creative => &self.creative,
            StyleBucket::Professional => &self.professional,
            StyleBucket::Playful => &self.playful,
            StyleBucket::Minimal => &self.minimal,
            StyleBucket::Eco => &self.eco,
        }
    }
}

/// Everything the engine knows about one style bucket.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleDefinition {
    /// Display labels, English first.
    pub labels: Vec<String>,
    /// Lowercase keywords (or stems) that vote for this bucket.
    pub triggers: Vec<String>,
    /// Palette variants; one is drawn per bundle.
    pub palettes: Vec<PaletteVariant>,
    /// Font pairings scored against business spheres.
    pub fonts: Vec<FontVariant>,
    /// Iconify collection prefixes searched for this style, highest priority first.
    pub icon_libraries: Vec<String>,
    /// Icon-name fragments that rank search hits.
    pub affinity: StyleAffinity,
    /// Tone-of-voice guidance.
    pub tone: ToneOfVoice,
    /// Slogan templates; `{name}` is replaced by the business name.
    #[serde(default)]
    pub slogans: Vec<String>,
}

/// Six hex colours with fixed semantic roles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaletteVariant {
    /// Variant identifier reported in the bundle.
    pub name: String,
    /// Dominant brand colour.
    pub primary: String,
    /// Supporting colour.
    pub secondary: String,
    /// Call-to-action colour.
    pub accent: String,
    /// Borders and muted text.
    pub neutral: String,
    /// Page background.
    pub background: String,
    /// Body text colour.
    pub text: String,
}

/// Candidate font pairing tagged with the business spheres it suits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FontVariant {
    /// Variant identifier reported in the bundle.
    pub name: String,
    /// Sphere tags this pairing suits.
    #[serde(default)]
    pub business_types: Vec<String>,
    /// Heading fonts, preferred first.
    pub main: Vec<String>,
    /// Body fonts, preferred first.
    pub secondary: Vec<String>,
}

/// Icon-name fragments that push a search hit up or down for a style.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StyleAffinity {
    /// Fragments that raise a hit.
    #[serde(default)]
    pub favored: Vec<String>,
    /// Fragments that lower a hit.
    #[serde(default)]
    pub penalized: Vec<String>,
}

/// Tone-of-voice guidance attached to a style.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ToneOfVoice {
    /// One-line description of the voice.
    pub tone: String,
    /// Recommended phrasing habits.
    #[serde(default)]
    pub dos: Vec<String>,
    /// Phrasing to avoid.
    #[serde(default)]
    pub donts: Vec<String>,
}

/// Extra score granted to `style` when any token starts with one of `stems`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BonusRule {
    /// Bucket receiving the bonus.
    pub style: StyleBucket,
    /// Points added once per request.
    pub bonus: u32,
    /// Token prefixes that trigger the rule.
    pub stems: Vec<String>,
}

/// Generic CSS family a font belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FontCategory {
    /// Sans-serif text face.
    SansSerif,
    /// Serif text face.
    Serif,
    /// Decorative headline face.
    Display,
    /// Script or handwritten face.
    Handwriting,
    /// Fixed-width face.
    Monospace,
}

impl FontCategory {
    /// CSS generic family used as the last entry of a font stack.
    pub fn css_fallback(self) -> &'static str {
        match self {
            FontCategory::SansSerif | FontCategory::Display => "sans-serif",
            FontCategory::Serif => "serif",
            FontCategory::Handwriting => "cursive",
            FontCategory::Monospace => "monospace",
        }
    }
}

/// Font reference entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FontSpec {
    /// Generic family.
    pub category: FontCategory,
    /// Available weights, ascending.
    pub weights: Vec<u16>,
    /// Explicit stylesheet URL; derived from Google Fonts when absent.
    #[serde(default)]
    pub webfont: Option<String>,
}

/// The five decorative slots, each filled with exactly one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecorSlot {
    /// Repeating background texture.
    Pattern,
    /// Frame or container shape.
    Shape,
    /// Full-bleed background motif.
    Background,
    /// Ornament next to headings.
    Decoration,
    /// Section separator.
    Divider,
}

impl DecorSlot {
    /// Slots in the order they are filled.
    pub const ALL: [DecorSlot; 5] = [
        DecorSlot::Pattern,
        DecorSlot::Shape,
        DecorSlot::Background,
        DecorSlot::Decoration,
        DecorSlot::Divider,
    ];

    /// Lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            DecorSlot::Pattern => "pattern",
            DecorSlot::Shape => "shape",
            DecorSlot::Background => "background",
            DecorSlot::Decoration => "decoration",
            DecorSlot::Divider => "divider",
        }
    }
}

/// Search terms per decorative slot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlotTerms {
    /// Terms for the pattern slot.
    #[serde(default)]
    pub pattern: Vec<String>,
    /// Terms for the shape slot.
    #[serde(default)]
    pub shape: Vec<String>,
    /// Terms for the background slot.
    #[serde(default)]
    pub background: Vec<String>,
    /// Terms for the decoration slot.
    #[serde(default)]
    pub decoration: Vec<String>,
    /// Terms for the divider slot.
    #[serde(default)]
    pub divider: Vec<String>,
}

impl SlotTerms {
    /// Terms configured for `slot`.
    pub fn get(&self, slot: DecorSlot) -> &[String] {
        match slot {
            DecorSlot::Pattern => &self.pattern,
            DecorSlot::Shape => &self.shape,
            DecorSlot::Background => &self.background,
            DecorSlot::Decoration => &self.decoration,
            DecorSlot::Divider => &self.divider,
        }
    }
}

/// Industry-specific decorative vocabulary selected by translated search terms.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndustryDecor {
    /// Industry identifier.
    pub name: String,
    /// English terms selecting this industry.
    pub triggers: Vec<String>,
    /// Terms that replace the generic vocabulary.
    pub slots: SlotTerms,
}

/// Decorative vocabularies: a generic one plus industry overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DecorativeVocabulary {
    /// Generic terms used when no industry matches.
    pub default: SlotTerms,
    /// Industry overrides, first match wins.
    #[serde(default)]
    pub industries: Vec<IndustryDecor>,
}

/// Root of the reference data document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Catalog {
    /// Document version, logged at load.
    pub version: String,
    /// Bucket used when nothing scores.
    #[serde(default = "default_style")]
    pub default_style: StyleBucket,
    /// Tie-break order for the classifier; unlisted buckets rank last.
    #[serde(default)]
    pub priority: Vec<StyleBucket>,
    /// Extra classifier points per bucket.
    #[serde(default)]
    pub bonus_rules: Vec<BonusRule>,
    /// Reference data per bucket.
    pub styles: StyleTable,
    /// Business sphere tag to lowercase stems.
    #[serde(default)]
    pub spheres: IndexMap<String, Vec<String>>,
    /// Font name to reference entry.
    #[serde(default)]
    pub fonts: IndexMap<String, FontSpec>,
    /// Primary and secondary fonts used when a pairing resolves nothing.
    #[serde(default)]
    pub fallback_fonts: Vec<String>,
    /// Tokens ignored when building search terms.
    #[serde(default)]
    pub stop_words: Vec<String>,
    /// Lowercase source stem to English search terms.
    #[serde(default)]
    pub dictionary: IndexMap<String, Vec<String>>,
    /// Broad search terms appended after the translated ones.
    #[serde(default)]
    pub generic_terms: Vec<String>,
    /// Decorative element vocabularies.
    #[serde(default)]
    pub decorative: DecorativeVocabulary,
}

fn default_style() -> StyleBucket {
    StyleBucket::Modern
}
