//! Versioned reference data driving every derivation step.
//!
//! The bundled document ships inside the binary; an external JSON file with the same shape can
//! replace it at startup without touching derivation logic.

mod model;

use std::{fs, io::ErrorKind, path::Path};

use thiserror::Error;
use tracing::{info, warn};

pub use self::model::{
    BonusRule, Catalog, DecorSlot, DecorativeVocabulary, FontCategory, FontSpec, FontVariant,
    IndustryDecor, PaletteVariant, SlotTerms, StyleAffinity, StyleBucket, StyleDefinition,
    StyleTable, ToneOfVoice,
};

/// Catalog shipped with the binary.
const BUNDLED_CATALOG: &str = include_str!("../../config/catalog.json");

/// Reasons an external catalog is rejected.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not valid JSON for the catalog schema.
    #[error("failed to parse catalog")]
    Parse(#[source] serde_json::Error),
    /// A style bucket lacks the data every derivation needs.
    #[error("style `{style}` has no {what}")]
    EmptyStyle {
        /// Offending bucket.
        style: StyleBucket,
        /// Missing collection, `palettes` or `fonts`.
        what: &'static str,
    },
}

impl Catalog {
    /// Parse and validate a catalog document.
    pub fn from_json(contents: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(contents).map_err(CatalogError::Parse)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog embedded in the binary.
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_CATALOG).expect("bundled catalog is valid")
    }

    /// Load the catalog from `path`, falling back to the bundled copy on any failure.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("using bundled reference catalog");
            return Self::bundled();
        };

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(catalog) => {
                    info!(
                        path = %path.display(),
                        version = %catalog.version,
                        "loaded reference catalog"
                    );
                    catalog
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "invalid catalog; falling back to bundled copy"
                    );
                    Self::bundled()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "catalog file not found; using bundled copy");
                Self::bundled()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read catalog; falling back to bundled copy"
                );
                Self::bundled()
            }
        }
    }

    /// Reference data of one style bucket.
    pub fn style(&self, bucket: StyleBucket) -> &StyleDefinition {
        self.styles.get(bucket)
    }

    /// Position of `bucket` in the tie-break order (lower wins).
    pub fn priority_rank(&self, bucket: StyleBucket) -> usize {
        self.priority
            .iter()
            .position(|candidate| *candidate == bucket)
            .unwrap_or_else(|| {
                self.priority.len()
                    + StyleBucket::ALL
                        .iter()
                        .position(|candidate| *candidate == bucket)
                        .unwrap_or(StyleBucket::ALL.len())
            })
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for bucket in StyleBucket::ALL {
            let style = self.style(bucket);
            let missing = if style.palettes.is_empty() {
                Some("palette variants")
            } else if style.fonts.is_empty() {
                Some("font variants")
            } else if style.icon_libraries.is_empty() {
                Some("icon libraries")
            } else {
                None
            };
            if let Some(what) = missing {
                return Err(CatalogError::EmptyStyle {
                    style: bucket,
                    what,
                });
            }
        }
        Ok(())
    }
}
