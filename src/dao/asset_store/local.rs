use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use tokio::{fs, io::AsyncWriteExt};

use super::{AssetStore, StorageError, StorageResult, public_url, validate_path};

const PROBE_FILE: &str = ".healthcheck";

/// Filesystem-backed asset sink; files are served by the HTTP layer under `public_base_url`.
#[derive(Clone)]
pub struct LocalAssetStore {
    root: Arc<PathBuf>,
    public_base_url: Arc<str>,
}

impl LocalAssetStore {
    /// Store assets below `root`, addressable as `{public_base_url}/{path}`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: Arc::new(root.into()),
            public_base_url: Arc::<str>::from(public_base_url),
        }
    }

    /// Directory the assets are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write_once(&self, path: String, bytes: Vec<u8>) -> StorageResult<String> {
        validate_path(&path)?;
        let target = self.root.join(&path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Io {
                    path: path.clone(),
                    source,
                })?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|source| {
                if source.kind() == ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists { path: path.clone() }
                } else {
                    StorageError::Io {
                        path: path.clone(),
                        source,
                    }
                }
            })?;
        file.write_all(&bytes)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
        file.flush().await.map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(public_url(&self.public_base_url, &path))
    }

    async fn probe(&self) -> StorageResult<()> {
        let io_err = |source| StorageError::Io {
            path: PROBE_FILE.into(),
            source,
        };
        fs::create_dir_all(self.root.as_ref())
            .await
            .map_err(io_err)?;
        let probe = self.root.join(PROBE_FILE);
        fs::write(&probe, b"ok").await.map_err(io_err)?;
        fs::remove_file(&probe).await.map_err(io_err)
    }
}

impl AssetStore for LocalAssetStore {
    fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> BoxFuture<'static, StorageResult<String>> {
        let store = self.clone();
        let path = path.to_string();
        Box::pin(async move { store.write_once(path, bytes).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.probe().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_once_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "http://localhost:8080/assets/");

        let url = store
            .put("logos/acme/original.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:8080/assets/logos/acme/original.png");
        assert_eq!(
            std::fs::read(dir.path().join("logos/acme/original.png")).unwrap(),
            vec![1, 2, 3]
        );

        let err = store
            .put("logos/acme/original.png", vec![4], "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn health_check_probes_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path().join("nested"), "http://x/assets");
        store.health_check().await.unwrap();
        assert!(!dir.path().join("nested").join(PROBE_FILE).exists());
    }
}
