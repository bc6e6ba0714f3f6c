//! Application-level configuration loading with environment overrides.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BRANDBOOK_CONFIG_PATH";

const PORT_ENV: &str = "PORT";
const ASSET_DIR_ENV: &str = "BRANDBOOK_ASSET_DIR";
const PUBLIC_URL_ENV: &str = "BRANDBOOK_PUBLIC_URL";
const ICON_API_ENV: &str = "BRANDBOOK_ICON_API";
const CATALOG_PATH_ENV: &str = "BRANDBOOK_CATALOG_PATH";
const LOGO_ROOT_ENV: &str = "BRANDBOOK_LOGO_ROOT";
const SLOGAN_API_ENV: &str = "BRANDBOOK_SLOGAN_API";
const SLOGAN_MODEL_ENV: &str = "BRANDBOOK_SLOGAN_MODEL";
const SLOGAN_API_KEY_ENV: &str = "BRANDBOOK_SLOGAN_API_KEY";

const DEFAULT_SLOGAN_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// TCP port the HTTP server binds to.
    pub port: u16,
    /// Directory the local asset store writes to and `/assets` serves from.
    pub asset_dir: PathBuf,
    /// Public base URL under which `asset_dir` is reachable.
    pub public_base_url: String,
    /// Base URL of the Iconify-compatible icon API.
    pub icon_api_url: String,
    /// Upper bound for each icon search, icon markup and slogan call.
    pub lookup_timeout: Duration,
    /// Upper bound for fetching the source logo.
    pub image_timeout: Duration,
    /// Largest source logo accepted, in bytes.
    pub max_image_bytes: usize,
    /// Hits requested per icon search.
    pub icon_search_limit: usize,
    /// Directory local logo paths are resolved against; local reads are refused when unset.
    pub logo_root: Option<PathBuf>,
    /// External reference catalog; the bundled one is used when absent.
    pub catalog_path: Option<PathBuf>,
    /// Slogan endpoint; catalog templates are used when absent.
    pub slogan: Option<SloganConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// OpenAI-compatible chat endpoint used for slogans.
pub struct SloganConfig {
    /// Chat-completions URL.
    pub endpoint: String,
    /// Model name sent with each request.
    pub model: String,
    /// Bearer token sent with each request.
    pub api_key: String,
}

impl AppConfig {
    /// Load the configuration from disk and apply environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let raw = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    RawConfig::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                RawConfig::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                RawConfig::default()
            }
        };

        raw.with_overrides(|key| env::var(key).ok()).into()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    port: u16,
    asset_dir: String,
    public_base_url: String,
    icon_api_url: String,
    lookup_timeout_ms: u64,
    image_timeout_ms: u64,
    max_image_bytes: usize,
    icon_search_limit: usize,
    logo_root: Option<String>,
    catalog_path: Option<String>,
    slogan_api_url: Option<String>,
    slogan_model: Option<String>,
    slogan_api_key: Option<String>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            asset_dir: "data/assets".into(),
            public_base_url: "http://localhost:8080/assets".into(),
            icon_api_url: "https://api.iconify.design".into(),
            lookup_timeout_ms: 4_000,
            image_timeout_ms: 10_000,
            max_image_bytes: 10 * 1024 * 1024,
            icon_search_limit: 32,
            logo_root: None,
            catalog_path: None,
            slogan_api_url: None,
            slogan_model: None,
            slogan_api_key: None,
        }
    }
}

impl RawConfig {
    /// Replace file values with non-empty variables returned by `lookup`.
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = lookup(PORT_ENV) {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %port, "ignoring invalid {PORT_ENV}"),
            }
        }
        if let Some(dir) = lookup(ASSET_DIR_ENV) {
            self.asset_dir = dir;
        }
        if let Some(url) = lookup(PUBLIC_URL_ENV) {
            self.public_base_url = url;
        }
        if let Some(url) = lookup(ICON_API_ENV) {
            self.icon_api_url = url;
        }
        if let Some(root) = lookup(LOGO_ROOT_ENV) {
            self.logo_root = Some(root);
        }
        if let Some(path) = lookup(CATALOG_PATH_ENV) {
            self.catalog_path = Some(path);
        }
        if let Some(url) = lookup(SLOGAN_API_ENV) {
            self.slogan_api_url = Some(url);
        }
        if let Some(model) = lookup(SLOGAN_MODEL_ENV) {
            self.slogan_model = Some(model);
        }
        if let Some(key) = lookup(SLOGAN_API_KEY_ENV) {
            self.slogan_api_key = Some(key);
        }
        self
    }
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let slogan = value.slogan_api_url.map(|endpoint| SloganConfig {
            endpoint,
            model: value
                .slogan_model
                .unwrap_or_else(|| DEFAULT_SLOGAN_MODEL.into()),
            api_key: value.slogan_api_key.unwrap_or_default(),
        });
        Self {
            port: value.port,
            asset_dir: PathBuf::from(value.asset_dir),
            public_base_url: value.public_base_url,
            icon_api_url: value.icon_api_url,
            lookup_timeout: Duration::from_millis(value.lookup_timeout_ms),
            image_timeout: Duration::from_millis(value.image_timeout_ms),
            max_image_bytes: value.max_image_bytes,
            icon_search_limit: value.icon_search_limit,
            logo_root: value.logo_root.map(PathBuf::from),
            catalog_path: value.catalog_path.map(PathBuf::from),
            slogan,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.asset_dir, PathBuf::from("data/assets"));
        assert_eq!(config.lookup_timeout, Duration::from_secs(4));
        assert_eq!(config.image_timeout, Duration::from_secs(10));
        assert_eq!(config.max_image_bytes, 10 * 1024 * 1024);
        assert_eq!(config.icon_search_limit, 32);
        assert!(config.slogan.is_none());
        assert!(config.catalog_path.is_none());
        assert!(config.logo_root.is_none());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{ "port": 9000, "lookup_timeout_ms": 1500 }"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.port, 9000);
        assert_eq!(config.lookup_timeout, Duration::from_millis(1500));
        assert_eq!(config.icon_api_url, "https://api.iconify.design");
    }

    #[test]
    fn environment_overrides_file_values() {
        let raw = RawConfig::default().with_overrides(env_of(&[
            (PORT_ENV, "7000"),
            (ASSET_DIR_ENV, "/tmp/brand"),
            (SLOGAN_API_ENV, "http://llm.local/v1/chat/completions"),
            (CATALOG_PATH_ENV, "  "),
            (LOGO_ROOT_ENV, "/srv/logos"),
        ]));
        let config = AppConfig::from(raw);
        assert_eq!(config.port, 7000);
        assert_eq!(config.asset_dir, PathBuf::from("/tmp/brand"));
        assert!(config.catalog_path.is_none());
        assert_eq!(config.logo_root, Some(PathBuf::from("/srv/logos")));
        let slogan = config.slogan.unwrap();
        assert_eq!(slogan.model, DEFAULT_SLOGAN_MODEL);
        assert!(slogan.api_key.is_empty());
    }

    #[test]
    fn invalid_port_is_ignored() {
        let config = AppConfig::from(RawConfig::default().with_overrides(env_of(&[(PORT_ENV, "http")])));
        assert_eq!(config.port, 8080);
    }
}
