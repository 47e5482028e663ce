use crate::error::{Error, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "paper_uploader.toml";
pub const CONFIG_PATH_ENV: &str = "PAPER_UPLOADER_CONFIG";
pub const SERVER_ENV: &str = "PAPER_UPLOADER_SERVER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub upload_path: String,
    pub papers_path: String,
    /// Search against the built-in sample records instead of the server.
    pub demo_mode: bool,
    pub request_timeout_secs: u64,
    /// Pre-fills the "Your Name" field of every new form card.
    pub default_uploader: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            upload_path: "/upload".to_string(),
            papers_path: "/api/papers".to_string(),
            demo_mode: false,
            request_timeout_secs: 60,
            default_uploader: None,
        }
    }
}

impl AppConfig {
    /// Loads the config named by `PAPER_UPLOADER_CONFIG`, falling back to
    /// `paper_uploader.toml` in the working directory, then applies env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        let mut config = Self::load_from(&path)?;
        if let Ok(server) = std::env::var(SERVER_ENV) {
            config.apply_server_override(&server);
        }
        config.endpoint(&config.upload_path)?;
        Ok(config)
    }

    /// Reads `path`, or writes the defaults there when it does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            let config: AppConfig = toml::from_str(&contents)?;
            log::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        let config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&config)?;
        match fs::write(path, toml_string) {
            Ok(()) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Could not write default config to {}: {}", path.display(), e),
        }
        Ok(config)
    }

    pub fn apply_server_override(&mut self, server: &str) {
        let server = server.trim();
        if !server.is_empty() {
            log::info!("Using server from {}: {}", SERVER_ENV, server);
            self.server_url = server.to_string();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Joins a path such as `/upload` onto the configured server.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base =
            Url::parse(&self.server_url).map_err(|_| Error::InvalidUrl(self.server_url.clone()))?;
        base.join(path)
            .map_err(|_| Error::InvalidUrl(format!("{}{}", self.server_url, path)))
    }

    pub fn upload_url(&self) -> Result<Url> {
        self.endpoint(&self.upload_path)
    }

    pub fn papers_url(&self) -> Result<Url> {
        self.endpoint(&self.papers_path)
    }
}
