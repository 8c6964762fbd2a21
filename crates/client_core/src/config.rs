use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const CLIENT_CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Parsed base URL, always ending in `/` so routes join underneath it.
    pub fn base_url(&self) -> anyhow::Result<Url> {
        let raw = self.api_base_url.trim();
        let with_slash = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Url::parse(&with_slash).with_context(|| format!("invalid api base url '{raw}'"))
    }
}

/// A zero timeout would fail every request, so it is not a valid setting.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[derive(Debug, Default, Deserialize)]
struct ClientFile {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn load_client_config() -> ClientConfig {
    let settings = load_client_config_from(Path::new(CLIENT_CONFIG_FILE));
    apply_env(settings, |key| std::env::var(key).ok())
}

pub fn load_client_config_from(path: &Path) -> ClientConfig {
    let mut settings = ClientConfig::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };
    match toml::from_str::<ClientFile>(&raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.api_base_url {
                settings.api_base_url = v;
            }
            match file_cfg.request_timeout_secs.map(timeout_from_secs) {
                Some(Some(timeout)) => settings.request_timeout = timeout,
                Some(None) => warn!(path = %path.display(), "ignoring zero request_timeout_secs"),
                None => {}
            }
        }
        Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable client config"),
    }

    settings
}

pub(crate) fn apply_env(
    mut settings: ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientConfig {
    if let Some(v) = lookup("NEUROCARE_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("NEUROCARE_TIMEOUT_SECS") {
        match v.parse::<u64>().ok().and_then(timeout_from_secs) {
            Some(timeout) => settings.request_timeout = timeout,
            None => warn!(value = %v, "ignoring invalid NEUROCARE_TIMEOUT_SECS"),
        }
    }
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
