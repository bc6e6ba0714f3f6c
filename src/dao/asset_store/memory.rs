use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;

use super::{AssetStore, StorageError, StorageResult, public_url, validate_path};

/// One asset held in memory.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type recorded at write time.
    pub content_type: String,
}

/// In-process asset sink, mostly useful for tests and dry runs.
#[derive(Clone)]
pub struct MemoryAssetStore {
    assets: Arc<DashMap<String, StoredAsset>>,
    public_base_url: Arc<str>,
}

impl MemoryAssetStore {
    /// Create an empty store whose URLs start with `public_base_url`.
    pub fn new(public_base_url: &str) -> Self {
        Self {
            assets: Arc::new(DashMap::new()),
            public_base_url: Arc::<str>::from(public_base_url),
        }
    }

    /// Copy of the asset stored at `path`.
    pub fn get(&self, path: &str) -> Option<StoredAsset> {
        self.assets.get(path).map(|entry| entry.value().clone())
    }

    /// Copy of the asset whose public URL is `url`.
    pub fn get_by_url(&self, url: &str) -> Option<StoredAsset> {
        let prefix = format!("{}/", self.public_base_url.trim_end_matches('/'));
        url.strip_prefix(&prefix).and_then(|path| self.get(path))
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetStore for MemoryAssetStore {
    fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BoxFuture<'static, StorageResult<String>> {
        let store = self.clone();
        let path = path.to_string();
        let content_type = content_type.to_string();
        Box::pin(async move {
            validate_path(&path)?;
            match store.assets.entry(path.clone()) {
                Entry::Occupied(_) => Err(StorageError::AlreadyExists { path }),
                Entry::Vacant(slot) => {
                    slot.insert(StoredAsset {
                        bytes,
                        content_type,
                    });
                    Ok(public_url(&store.public_base_url, &path))
                }
            }
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_once_and_resolves_by_url() {
        let store = MemoryAssetStore::new("mem://assets");
        let url = store
            .put("a/b.png", vec![9], "image/png")
            .await
            .unwrap();
        assert_eq!(url, "mem://assets/a/b.png");
        assert_eq!(store.get_by_url(&url).unwrap().bytes, vec![9]);
        assert!(store.put("a/b.png", vec![1], "image/png").await.is_err());
        assert_eq!(store.len(), 1);
    }
}
