use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;

use super::{IconSearch, split_icon_id};
use crate::dao::error::{LookupError, LookupResult};

/// Iconify HTTP API client.
#[derive(Clone)]
pub struct IconifyClient {
    client: Client,
    base_url: Arc<str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    icons: Vec<String>,
}

impl IconifyClient {
    /// Build a client against `base_url` (e.g. `https://api.iconify.design`).
    pub fn new(base_url: &str, timeout: Duration) -> LookupResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LookupError::ClientBuilder { source })?;
        Ok(Self {
            client,
            base_url: Arc::<str>::from(base_url.trim_end_matches('/')),
        })
    }

    async fn search_icons(
        &self,
        query: String,
        prefixes: String,
        limit: usize,
    ) -> LookupResult<Vec<String>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("prefixes", prefixes),
                ("limit", limit.to_string()),
            ])
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

        let payload = response
            .json::<SearchResponse>()
            .await
            .map_err(|source| LookupError::DecodeResponse { url, source })?;
        Ok(payload.icons)
    }

    async fn download_svg(&self, prefix: String, name: String) -> LookupResult<String> {
        let url = format!("{}/{}/{}.svg", self.base_url, prefix, name);
        let response = self
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

        let body = response
            .text()
            .await
            .map_err(|source| LookupError::DecodeResponse {
                url: url.clone(),
                source,
            })?;
        if body.trim().is_empty() {
            return Err(LookupError::Empty { url });
        }
        Ok(body)
    }
}

impl IconSearch for IconifyClient {
    fn search(
        &self,
        query: &str,
        prefixes: &[String],
        limit: usize,
    ) -> BoxFuture<'static, LookupResult<Vec<String>>> {
        let client = self.clone();
        let query = query.to_string();
        let prefixes = prefixes.join(",");
        Box::pin(async move { client.search_icons(query, prefixes, limit).await })
    }

    fn fetch_markup(&self, icon_id: &str) -> BoxFuture<'static, LookupResult<String>> {
        let client = self.clone();
        let parts = split_icon_id(icon_id)
            .map(|(prefix, name)| (prefix.to_string(), name.to_string()));
        let icon_id = icon_id.to_string();
        Box::pin(async move {
            let Some((prefix, name)) = parts else {
                return Err(LookupError::InvalidIconId { id: icon_id });
            };
            client.download_svg(prefix, name).await
        })
    }
}
