//! Configuration management for PromptDeck
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `PROMPTDECK_` prefix, `__` for nesting)
//! 2. `PROMPTDECK_API_URL` as a shorthand for `api.base_url`
//! 3. `./config.toml` (development)
//! 4. `~/.config/promptdeck/config.toml` (user config, XDG)
//! 5. `/etc/promptdeck/config.toml` (system config)
//! 6. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! page_size = 20
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [ui]
//! copied_indicator_ms = 2000
//! view_idle_secs = 86400
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use promptdeck::config::PromptDeckConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = PromptDeckConfig::load()?;
//! println!("backend at {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "promptdeck";
const ENV_PREFIX: &str = "PROMPTDECK_";
const API_URL_ENV: &str = "PROMPTDECK_API_URL";

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL every backend path is appended to
    pub base_url: String,

    /// Items requested per catalog page
    pub page_size: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            page_size: 20,
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Largest accepted request body
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ServerSettings {
    /// `host:port` as a socket address
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// UI behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// How long the "copied" indicator stays visible
    pub copied_indicator_ms: u64,

    /// Idle time after which an open page's state is dropped
    pub view_idle_secs: u64,

    /// Category the catalog is scoped to on first load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            copied_indicator_ms: 2000,
            view_idle_secs: 86400, // 24 hours
            default_category: None,
        }
    }
}

impl UiSettings {
    /// Copied indicator window
    #[must_use]
    pub const fn copied_indicator(&self) -> Duration {
        Duration::from_millis(self.copied_indicator_ms)
    }

    /// View idle expiry
    #[must_use]
    pub const fn view_idle(&self) -> Duration {
        Duration::from_secs(self.view_idle_secs)
    }
}

/// Complete PromptDeck configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PromptDeckConfig {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiSettings,

    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerSettings,

    /// UI behaviour settings
    #[serde(default)]
    pub ui: UiSettings,
}

impl PromptDeckConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be read or parsed
    /// - Configuration values fail type conversion
    pub fn load() -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        // 5. System config: /etc/promptdeck/config.toml
        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        // 4. User config: ~/.config/promptdeck/config.toml
        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        // 3. Local config: ./config.toml
        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        Ok(Self::with_env(figment).extract()?)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file leaves the defaults in place. Environment variables
    /// still override the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values of the
    /// wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let figment = Self::defaults()?.merge(Toml::file(path.as_ref()));
        Ok(Self::with_env(figment).extract()?)
    }

    /// Get the recommended XDG config path
    ///
    /// ```rust
    /// use promptdeck::config::PromptDeckConfig;
    ///
    /// let path = PromptDeckConfig::recommended_path();
    /// assert!(path.ends_with("config.toml"));
    /// ```
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| config_dir.join(APP_DIR).join("config.toml"),
        )
    }

    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::raw().only(&[API_URL_ENV]).map(|_| "api.base_url".into()))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .ignore(&["API_URL"])
                    .split("__")
                    .lowercase(true),
            )
    }
}
