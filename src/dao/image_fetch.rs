//! Source-logo download over HTTP or from a configured local directory.

use std::{path::PathBuf, time::Duration};

use futures::future::BoxFuture;
use reqwest::Client;
use tokio::io::AsyncReadExt;

use crate::dao::error::{LookupError, LookupResult};

/// Abstraction over whatever serves the caller-supplied logo bytes.
pub trait ImageFetcher: Send + Sync {
    /// Download the raw bytes behind `url`.
    fn fetch(&self, url: &str) -> BoxFuture<'static, LookupResult<Vec<u8>>>;
}

/// Fetcher for `http(s)://` URLs, plus `file://` URLs and plain paths under an opt-in root.
///
/// Every fetch is bounded by the timeout and the byte cap, which are enforced while reading
/// rather than after buffering the whole source.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
    timeout: Duration,
    max_bytes: usize,
    local_root: Option<PathBuf>,
}

impl HttpImageFetcher {
    /// Build a fetcher with a per-request timeout and a response size cap.
    ///
    /// Local sources are refused until [`HttpImageFetcher::with_local_root`] is called.
    pub fn new(timeout: Duration, max_bytes: usize) -> LookupResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LookupError::ClientBuilder { source })?;
        Ok(Self {
            client,
            timeout,
            max_bytes,
            local_root: None,
        })
    }

    /// Allow regular files below `root` to be used as logo sources.
    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = Some(root.into());
        self
    }

    async fn download(&self, url: String) -> LookupResult<Vec<u8>> {
        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LookupError::RequestSend {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(LookupError::RequestStatus {
                url,
                status: response.status(),
            });
        }

        if response
            .content_length()
            .is_some_and(|length| length > self.max_bytes as u64)
        {
            return Err(self.too_large(&url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|source| {
            LookupError::DecodeResponse {
                url: url.clone(),
                source,
            }
        })? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(&url));
            }
            body.extend_from_slice(&chunk);
        }
        self.check_size(&url, body.len())?;
        Ok(body)
    }

    async fn read_local(&self, raw: &str) -> LookupResult<Vec<u8>> {
        let rejected = || LookupError::LocalSourceRejected { path: raw.into() };
        let io = |source| LookupError::Io {
            path: raw.into(),
            source,
        };
        let Some(root) = &self.local_root else {
            return Err(rejected());
        };

        let root = tokio::fs::canonicalize(root).await.map_err(io)?;
        let path = tokio::fs::canonicalize(root.join(raw)).await.map_err(io)?;
        if !path.starts_with(&root) {
            return Err(rejected());
        }
        // Devices and FIFOs never end; only regular files are read.
        let metadata = tokio::fs::metadata(&path).await.map_err(io)?;
        if !metadata.is_file() {
            return Err(rejected());
        }

        let file = tokio::fs::File::open(&path).await.map_err(io)?;
        let mut bytes = Vec::new();
        file.take(self.max_bytes as u64 + 1)
            .read_to_end(&mut bytes)
            .await
            .map_err(io)?;
        self.check_size(raw, bytes.len())?;
        Ok(bytes)
    }

    fn check_size(&self, url: &str, len: usize) -> LookupResult<()> {
        if len == 0 {
            return Err(LookupError::Empty { url: url.into() });
        }
        if len > self.max_bytes {
            return Err(self.too_large(url));
        }
        Ok(())
    }

    fn too_large(&self, url: &str) -> LookupError {
        LookupError::TooLarge {
            url: url.into(),
            limit: self.max_bytes,
        }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, LookupResult<Vec<u8>>> {
        let fetcher = self.clone();
        let url = url.trim().to_string();
        Box::pin(async move {
            let work = async {
                if url.starts_with("http://") || url.starts_with("https://") {
                    fetcher.download(url.clone()).await
                } else {
                    let path = url.strip_prefix("file://").unwrap_or(&url);
                    fetcher.read_local(path).await
                }
            };
            match tokio::time::timeout(fetcher.timeout, work).await {
                Ok(result) => result,
                Err(_) => Err(LookupError::Timeout { url: url.clone() }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, body::Bytes, routing::get};
    use futures::stream;

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn fetcher(max_bytes: usize) -> HttpImageFetcher {
        HttpImageFetcher::new(Duration::from_millis(500), max_bytes).unwrap()
    }

    #[tokio::test]
    async fn local_paths_are_refused_without_a_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let fetcher = fetcher(16);
        let plain = fetcher.fetch(path.to_str().unwrap()).await.unwrap_err();
        let scheme = fetcher
            .fetch(&format!("file://{}", path.display()))
            .await
            .unwrap_err();
        assert!(matches!(plain, LookupError::LocalSourceRejected { .. }));
        assert!(matches!(scheme, LookupError::LocalSourceRejected { .. }));
    }

    #[tokio::test]
    async fn reads_files_below_the_root_with_and_without_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let fetcher = fetcher(16).with_local_root(dir.path());
        let relative = fetcher.fetch("logo.bin").await.unwrap();
        let scheme = fetcher
            .fetch(&format!("file://{}", path.display()))
            .await
            .unwrap();
        assert_eq!(relative, vec![1, 2, 3]);
        assert_eq!(scheme, relative);
    }

    #[tokio::test]
    async fn paths_escaping_the_root_are_refused() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("logos");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.png"), [1u8, 2, 3]).unwrap();

        let fetcher = fetcher(16).with_local_root(&root);
        let err = fetcher.fetch("../secret.png").await.unwrap_err();
        assert!(matches!(err, LookupError::LocalSourceRejected { .. }));
        let err = fetcher.fetch("/etc/hostname").await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::LocalSourceRejected { .. } | LookupError::Io { .. }
        ));
    }

    #[tokio::test]
    async fn directories_below_the_root_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let fetcher = fetcher(16).with_local_root(dir.path());
        let err = fetcher.fetch("nested").await.unwrap_err();
        assert!(matches!(err, LookupError::LocalSourceRejected { .. }));
    }

    #[tokio::test]
    async fn rejects_files_over_the_size_cap() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.bin"), vec![0u8; 32]).unwrap();

        let fetcher = fetcher(16).with_local_root(dir.path());
        let err = fetcher.fetch("big.bin").await.unwrap_err();
        assert!(matches!(err, LookupError::TooLarge { limit: 16, .. }));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(16).with_local_root(dir.path());
        let err = fetcher.fetch("absent.png").await.unwrap_err();
        assert!(matches!(err, LookupError::Io { .. }));
    }

    #[tokio::test]
    async fn chunked_download_stops_at_the_size_cap() {
        let router = Router::new().route(
            "/logo.png",
            get(|| async {
                let chunks =
                    (0..64).map(|_| Ok::<_, std::io::Error>(Bytes::from(vec![7u8; 1024])));
                Body::from_stream(stream::iter(chunks))
            }),
        );
        let base = serve(router).await;

        let err = fetcher(16)
            .fetch(&format!("{base}/logo.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::TooLarge { limit: 16, .. }));
    }

    #[tokio::test]
    async fn small_download_is_returned_whole() {
        let router = Router::new().route("/logo.png", get(|| async { vec![1u8, 2, 3] }));
        let base = serve(router).await;

        let bytes = fetcher(16).fetch(&format!("{base}/logo.png")).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn stalled_body_is_cut_off_by_the_timeout() {
        let router = Router::new().route(
            "/logo.png",
            get(|| async {
                Body::from_stream(stream::pending::<Result<Bytes, std::io::Error>>())
            }),
        );
        let base = serve(router).await;

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            fetcher(16).fetch(&format!("{base}/logo.png")),
        )
        .await
        .expect("fetch must finish within its own timeout");
        assert!(outcome.is_err());
    }
}
