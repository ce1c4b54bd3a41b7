use std::path::PathBuf;

use medtrack_firebase::Endpoints;
use serde::Deserialize;

use crate::error::ToolError;
use crate::store::{DEFAULT_LOCAL_USER, StoreType, default_store_path};

const API_KEY_VAR: &str = "MEDTRACK_FIREBASE_API_KEY";
const PROJECT_VAR: &str = "MEDTRACK_FIREBASE_PROJECT";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct FirebaseConfig {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    /// e.g. `http://localhost:9099`; requires `firestore_emulator` too.
    pub auth_emulator: Option<String>,
    pub firestore_emulator: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub r#type: StoreType,
    pub path: Option<PathBuf>,
    /// Owner of records in the local store when nobody is logged in.
    #[serde(default = "default_local_user")]
    pub local_user: String,
}

fn default_local_user() -> String {
    DEFAULT_LOCAL_USER.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            r#type: StoreType::default(),
            path: None,
            local_user: default_local_user(),
        }
    }
}

/// Everything needed to build a `FirebaseClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseSettings {
    pub api_key: String,
    pub project_id: String,
    pub endpoints: Endpoints,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("medtrack").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<Config, ToolError> {
    Ok(toml::from_str(content)?)
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    match parse_config(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "ignoring unreadable config file");
            Config::default()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Environment variables win over the config file.
pub fn resolve_firebase(config: &FirebaseConfig) -> Result<FirebaseSettings, ToolError> {
    let api_key = non_empty(std::env::var(API_KEY_VAR).ok())
        .or_else(|| non_empty(config.api_key.clone()))
        .ok_or(ToolError::FirebaseNotConfigured)?;
    let project_id = non_empty(std::env::var(PROJECT_VAR).ok())
        .or_else(|| non_empty(config.project_id.clone()))
        .ok_or(ToolError::FirebaseNotConfigured)?;

    let endpoints = match (&config.auth_emulator, &config.firestore_emulator) {
        (Some(auth), Some(firestore)) => Endpoints::emulator(auth, firestore),
        _ => Endpoints::default(),
    };

    Ok(FirebaseSettings {
        api_key,
        project_id,
        endpoints,
    })
}

pub fn load_firebase_settings() -> Result<FirebaseSettings, ToolError> {
    resolve_firebase(&load_config().firebase)
}

/// Store selection: CLI flags, then config file, then defaults.
pub fn resolve_store_config(
    cli_type: Option<StoreType>,
    cli_path: Option<PathBuf>,
) -> (StoreType, PathBuf, String) {
    let config = load_config();

    let store_type = cli_type.unwrap_or(config.store.r#type);
    let store_path = cli_path
        .or(config.store.path)
        .unwrap_or_else(default_store_path);

    (store_type, store_path, config.store.local_user)
}
