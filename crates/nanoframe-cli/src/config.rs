use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use nanoframe_core::DEFAULT_PROXY_URL;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub proxy: Option<Proxy>,
    pub storage: Option<Storage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Proxy {
    /// Prefix the percent-encoded image URL is appended to
    pub url: Option<String>,
    /// Whole-request timeout for remote fetches; defaults to 30
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Storage {
    /// Where the key/value profile lives; defaults to `<config>/data`
    pub data_dir: Option<PathBuf>,
    /// Where fetched images are staged; defaults to `<config>/scratch`
    pub scratch_dir: Option<PathBuf>,
}

pub fn config_dir() -> PathBuf {
    if let Some(bd) = directories::BaseDirs::new() {
        bd.config_dir().join("nanoframe")
    } else {
        PathBuf::from("./.config/nanoframe")
    }
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if let Ok(s) = std::fs::read_to_string(&path) {
        toml::from_str(&s).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn proxy_url(settings: &Settings) -> String {
    settings
        .proxy
        .as_ref()
        .and_then(|p| p.url.clone())
        .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string())
}

pub fn fetch_timeout(settings: &Settings) -> Duration {
    let secs = settings
        .proxy
        .as_ref()
        .and_then(|p| p.timeout_secs)
        .unwrap_or(30);
    Duration::from_secs(secs)
}

pub fn data_dir(settings: &Settings) -> PathBuf {
    settings
        .storage
        .as_ref()
        .and_then(|s| s.data_dir.clone())
        .unwrap_or_else(|| config_dir().join("data"))
}

pub fn scratch_dir(settings: &Settings) -> PathBuf {
    settings
        .storage
        .as_ref()
        .and_then(|s| s.scratch_dir.clone())
        .unwrap_or_else(|| config_dir().join("scratch"))
}
