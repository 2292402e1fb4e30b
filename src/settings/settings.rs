use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub store: Store,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "file"
    pub path: Option<PathBuf>,
    #[serde(default = "default_slot_ttl_days")]
    pub slot_ttl_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

fn default_prefix() -> String {
    crate::domain_model::DEFAULT_API_PREFIX.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_slot_ttl_days() -> i64 {
    crate::infra_store::DEFAULT_SLOT_TTL_DAYS
}

impl Store {
    /// Token file location, defaulting to the platform data directory.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("flashcards-client").join("session.json"))
            .ok_or_else(|| anyhow!("no data directory available, set store.path"))
    }
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(
            &path,
            r#"
            [api]
            base_url = "http://localhost:4000"

            [store]
            backend = "memory"

            [log]
            filter = "debug"
            "#,
        )
        .unwrap();

        let settings = parse_settings(path.to_str()).unwrap();

        assert_eq!(settings.api.prefix, "/api/v0");
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.store.slot_ttl_days, 7);
        assert_eq!(settings.log.filter, "debug");
    }

    #[test]
    fn explicit_store_path_wins() {
        let store = Store {
            backend: "file".into(),
            path: Some(PathBuf::from("/tmp/session.json")),
            slot_ttl_days: 7,
        };
        assert_eq!(store.resolved_path().unwrap(), PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("")).is_err());
    }
}
