//! Validation helpers for DTOs.

use std::path::{Component, Path};

use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is removed.
///
/// # Examples
///
/// ```ignore
/// validate_not_blank("Acme")  // Ok
/// validate_not_blank("   ")   // Err
/// ```
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("value must contain non-whitespace characters".into());
        return Err(err);
    }
    Ok(())
}

/// Accepts `http(s)://` and `file://` URLs as well as plain local paths.
///
/// Local sources may not climb out of their directory with `..`; whether they are read at all
/// depends on the fetcher's configured root.
pub fn validate_logo_source(value: &str) -> Result<(), ValidationError> {
    validate_not_blank(value)?;
    let value = value.trim();
    let scheme = value.split_once("://").map(|(scheme, _)| scheme);
    match scheme {
        Some("http" | "https") => Ok(()),
        None | Some("file") => {
            let path = value.strip_prefix("file://").unwrap_or(value);
            if Path::new(path)
                .components()
                .any(|component| component == Component::ParentDir)
            {
                let mut err = ValidationError::new("logo_url_traversal");
                err.message = Some("local logo paths may not contain `..`".into());
                return Err(err);
            }
            Ok(())
        }
        Some(other) => {
            let mut err = ValidationError::new("logo_url_scheme");
            err.message = Some(format!("unsupported logo URL scheme `{other}`").into());
            Err(err)
        }
    }
}
