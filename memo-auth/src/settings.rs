use config::{Config, ConfigError, File};
use serde::Deserialize;

const PROD_BASE_URL: &str = "https://simple-memo-app-backend-prod.azurewebsites.net";
const DEV_BASE_URL: &str = "https://simple-memo-app-backend-dev.azurewebsites.net";
const LOCAL_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub base_url: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("MEMO_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("MEMO").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.base_url {
            if url.is_empty() {
                return Err("base_url must not be empty when set".to_string());
            }
            if !url.starts_with("http") {
                return Err("base_url must be a valid HTTP(S) URL".to_string());
            }
        }
        Ok(())
    }

    /// Resolve the backend base URL for this run and log the choice.
    pub fn resolve_base_url(&self) -> String {
        let hostname = whoami::fallible::hostname().ok();
        let url = resolve(self.base_url.as_deref(), hostname.as_deref());
        tracing::info!("Resolved API base URL: {}", url);
        url
    }
}

/// Endpoint policy: explicit configuration wins, then hostname environment
/// markers, then the local development default. `prod` is checked before
/// `dev` so a hostname carrying both markers resolves to production.
pub(crate) fn resolve(configured: Option<&str>, hostname: Option<&str>) -> String {
    if let Some(url) = configured {
        if !url.is_empty() {
            return url.trim_end_matches('/').to_string();
        }
    }

    match hostname {
        Some(host) if host.contains("prod") => PROD_BASE_URL.to_string(),
        Some(host) if host.contains("dev") => DEV_BASE_URL.to_string(),
        _ => LOCAL_BASE_URL.to_string(),
    }
}
