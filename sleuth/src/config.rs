//! Client configuration.
//!
//! Settings that used to be process-wide (proxies, SSL verification, the
//! user-agent suffix) live here and are handed to the client explicitly. The
//! filter and query types never read configuration.
//!
//! Config file resolution order:
//! 1. Explicit path passed to `ClientConfig::load_from()`
//! 2. SLEUTH_CONFIG environment variable
//! 3. Platform config directory (via `directories`), e.g. ~/.config/sleuth/config.toml

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::query::{Dialect, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::{Error, Result};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the platform console, e.g. "https://console.example.com".
    #[serde(default)]
    pub base_url: String,

    /// Appended to the user-agent string.
    #[serde(default)]
    pub user_agent_suffix: String,

    /// Verify TLS certificates.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Wire dialect for new queries.
    #[serde(default)]
    pub dialect: Dialect,

    /// Page size for new queries.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Proxy URL per scheme ("http", "https").
    #[serde(default)]
    pub proxies: BTreeMap<String, String>,
}

fn default_verify_ssl() -> bool {
    true
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            user_agent_suffix: String::new(),
            verify_ssl: default_verify_ssl(),
            dialect: Dialect::default(),
            page_size: default_page_size(),
            proxies: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a default config pointing at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load config from the resolved location, or defaults if no file exists.
    pub fn load() -> Result<Self> {
        let path = resolve_config_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.is_empty() && !is_http_url(&self.base_url) {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        for (scheme, url) in &self.proxies {
            if !is_http_url(url) {
                return Err(Error::Config(format!(
                    "proxy for '{}' must be an http(s) URL, got '{}'",
                    scheme, url
                )));
            }
        }
        Ok(())
    }

    /// User-agent header value: `sleuth/<version> (<os>)` plus the configured suffix.
    pub fn user_agent(&self) -> String {
        let base = format!("sleuth/{} ({})", env!("CARGO_PKG_VERSION"), std::env::consts::OS);
        let suffix = self.user_agent_suffix.trim();
        if suffix.is_empty() {
            base
        } else {
            format!("{} {}", base, suffix)
        }
    }

    /// Proxy configured for a URL scheme.
    pub fn proxy_for(&self, scheme: &str) -> Option<&str> {
        self.proxies.get(scheme).map(String::as_str)
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Resolve the config file path using the standard resolution order.
pub fn resolve_config_path() -> Result<PathBuf> {
    // 1. Environment variable
    if let Ok(path) = std::env::var("SLEUTH_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    // 2. Platform config directory
    if let Some(proj_dirs) = ProjectDirs::from("", "", "sleuth") {
        return Ok(proj_dirs.config_dir().join("config.toml"));
    }

    // 3. Fallback to ~/.config/sleuth
    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".config/sleuth/config.toml"))
}
