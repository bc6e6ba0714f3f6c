//! Write-once storage for derived logo files.

mod local;
mod memory;

pub use self::local::LocalAssetStore;
pub use self::memory::MemoryAssetStore;

use std::path::{Component, Path};

use futures::future::BoxFuture;
use thiserror::Error;

/// Result alias for asset storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by asset sinks regardless of the backing medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Assets are write-once; the path is already taken.
    #[error("asset `{path}` already exists")]
    AlreadyExists {
        /// Relative asset path.
        path: String,
    },
    /// The path is absolute, empty or escapes the storage root.
    #[error("invalid asset path `{path}`")]
    InvalidPath {
        /// Path as requested.
        path: String,
    },
    /// The backing medium failed.
    #[error("asset storage I/O failed for `{path}`")]
    Io {
        /// Relative asset path.
        path: String,
        /// Filesystem failure.
        #[source]
        source: std::io::Error,
    },
}

/// Write-once sink for derived assets, returning a retrievable URL per asset.
pub trait AssetStore: Send + Sync {
    /// Persist `bytes` under the relative `path` and return its public URL.
    fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BoxFuture<'static, StorageResult<String>>;
    /// Verify the sink currently accepts writes.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Accept only non-empty relative paths made of plain components.
fn validate_path(path: &str) -> StorageResult<()> {
    let candidate = Path::new(path);
    let valid = !path.is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidPath { path: path.into() })
    }
}

fn public_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_path_rejects_escapes() {
        assert!(validate_path("logos/acme/original.png").is_ok());
        assert!(validate_path("").is_err());
        assert!(validate_path("/etc/passwd").is_err());
        assert!(validate_path("logos/../../secret").is_err());
    }
}
