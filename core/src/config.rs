//! Client configuration: backend location, refresh cadence and on-disk locations.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://vivaldi.daffre.com:3030";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
pub const CONFIG_FILE_NAME: &str = "movies.json";
pub const API_URL_ENV: &str = "MOVIES_API_URL";

const APP_QUALIFIER: &str = "com";
const APP_ORGANISATION: &str = "Movies";
const APP_NAME: &str = "movies";

const MIN_REFRESH_SECS: u64 = 1;
const MAX_REFRESH_SECS: u64 = 3_600;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub refresh_interval: Duration,
    pub request_timeout: Option<Duration>,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        let log_dir = data_dir.join("logs");
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_timeout: None,
            data_dir,
            log_dir,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "api_url")]
    base_url: Option<String>,
    refresh_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    data_dir: Option<String>,
    log_dir: Option<String>,
}

impl ClientConfig {
    /// Path of the key-value storage file inside the data directory.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }

    /// Parse a JSON config document on top of the defaults. Bad values warn and keep defaults.
    pub fn from_json(raw: &str) -> Self {
        let mut cfg = Self::default();
        match serde_json::from_str::<RawConfig>(raw) {
            Ok(parsed) => cfg.apply(parsed),
            Err(err) => warn!("Failed to parse client config ({err}). Using defaults."),
        }
        cfg
    }

    fn apply(&mut self, parsed: RawConfig) {
        if let Some(url) = parsed.base_url {
            let trimmed = url.trim().trim_end_matches('/');
            if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                self.base_url = trimmed.to_string();
            } else {
                warn!("Ignoring base_url `{url}`; expected an http(s) URL.");
            }
        }
        if let Some(secs) = parsed.refresh_interval_secs {
            if (MIN_REFRESH_SECS..=MAX_REFRESH_SECS).contains(&secs) {
                self.refresh_interval = Duration::from_secs(secs);
            } else {
                warn!(
                    "refresh_interval_secs={secs} is outside {MIN_REFRESH_SECS}..={MAX_REFRESH_SECS}; keeping {}s.",
                    self.refresh_interval.as_secs()
                );
            }
        }
        match parsed.request_timeout_secs {
            Some(0) => self.request_timeout = None,
            Some(secs) => self.request_timeout = Some(Duration::from_secs(secs)),
            None => {}
        }
        if let Some(dir) = parsed.data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
            self.log_dir = self.data_dir.join("logs");
        }
        if let Some(dir) = parsed.log_dir.filter(|d| !d.trim().is_empty()) {
            self.log_dir = PathBuf::from(dir);
        }
    }

    fn apply_env_override(&mut self, value: Option<String>) {
        let Some(url) = value.filter(|v| !v.trim().is_empty()) else {
            return;
        };
        info!("Using backend from {API_URL_ENV}: {url}");
        self.base_url = url.trim().trim_end_matches('/').to_string();
    }
}

/// Load the config from `path` (or the default location), then apply env overrides.
///
/// A missing file is not an error; the defaults are used instead.
pub fn load_config(path: Option<&Path>) -> ClientConfig {
    let cfg_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let mut cfg = match fs::read_to_string(&cfg_path) {
        Ok(raw) => {
            let cfg = ClientConfig::from_json(&raw);
            info!("Loaded config from {}", cfg_path.display());
            cfg
        }
        Err(_) => {
            info!("No config at {}; using defaults", cfg_path.display());
            ClientConfig::default()
        }
    };
    cfg.apply_env_override(std::env::var(API_URL_ENV).ok());
    cfg
}

pub fn default_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("movies-data"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANISATION, APP_NAME)
}
