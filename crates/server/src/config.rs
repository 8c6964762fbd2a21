use std::{collections::HashMap, fs, path::Path};

use tracing::warn;

pub const SERVER_CONFIG_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub seed_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            database_url: "sqlite://./data/neurocare.db".into(),
            seed_path: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let settings = load_settings_from(Path::new(SERVER_CONFIG_FILE));
    apply_env(settings, |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };
    match toml::from_str::<HashMap<String, String>>(&raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("database_url") {
                settings.database_url = v.clone();
            }
            if let Some(v) = file_cfg.get("seed_path") {
                settings.seed_path = Some(v.clone());
            }
        }
        Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable server config"),
    }

    settings
}

/// Later keys win: `APP__*` overrides the bare name.
pub(crate) fn apply_env(mut settings: Settings, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    for key in ["SERVER_BIND", "APP__BIND_ADDR"] {
        if let Some(v) = lookup(key) {
            settings.server_bind = v;
        }
    }
    for key in ["DATABASE_URL", "APP__DATABASE_URL"] {
        if let Some(v) = lookup(key) {
            settings.database_url = v;
        }
    }
    for key in ["SEED_PATH", "APP__SEED_PATH"] {
        if let Some(v) = lookup(key) {
            settings.seed_path = (!v.trim().is_empty()).then_some(v);
        }
    }
    settings
}

/// Turns a bare path or `sqlite:` path into a `sqlite://` URL. `Storage::new`
/// creates the parent directory.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    let path = raw_database_url
        .strip_prefix("sqlite:")
        .unwrap_or(raw_database_url)
        .replace('\\', "/");
    format!("sqlite://{path}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
