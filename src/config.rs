//! Application configuration.
//!
//! Values come from `<config_dir>/fitvoice/config.json`, then environment overrides:
//! - `FITVOICE_API_URL` - API base URL (default: `http://localhost:8081`)
//! - `FITVOICE_TIMEOUT_MS` - client-side request timeout (default: `10000`)
//! - `FITVOICE_SIMULATE_LATENCY` - `false`/`0` turns off assistant latency

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "fitvoice";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const LOGIN_ENDPOINT: &str = "/api/auth";
pub const REGISTER_ENDPOINT: &str = "/api/auth/register";

/// Profile lookup for a user id.
pub fn profile_endpoint(user_id: i64) -> String {
    format!("/api/auth/{}", user_id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    /// Whether assistant calls wait out their simulated round-trip.
    pub simulate_latency: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            simulate_latency: true,
        }
    }
}

impl AppConfig {
    /// Load the config file (defaults if missing or broken), then apply env overrides.
    pub fn load() -> Self {
        let mut config = Self::path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring fitvoice config: {:#}", e);
                Self::default()
            });
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    /// `<config_dir>/fitvoice/config.json`.
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
            .context("No user config directory on this platform")
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("{} is not a valid fitvoice config", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    /// Apply overrides from a variable lookup. Unparsable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FITVOICE_API_URL") {
            self.api_base_url = url;
        }
        if let Some(ms) = lookup("FITVOICE_TIMEOUT_MS").and_then(|s| s.parse::<u64>().ok()) {
            self.request_timeout_ms = ms;
        }
        if let Some(flag) = lookup("FITVOICE_SIMULATE_LATENCY") {
            self.simulate_latency = !matches!(flag.trim(), "0" | "false" | "no" | "off");
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Write to the user config file, returning where it went.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
    }
}
