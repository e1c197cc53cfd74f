//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root page the traversal starts from
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Run the browser without a window
    #[serde(default)]
    pub headless: bool,

    /// Explicit Chromium executable (autodetected when unset)
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Extra command-line flags passed to Chromium
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Browser window width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Browser window height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Bound on subcategory and book list waits, in milliseconds
    #[serde(default = "default_selector_timeout_ms")]
    pub selector_timeout_ms: u64,

    /// Bound on the top-level menu wait, in milliseconds
    #[serde(default = "default_menu_timeout_ms")]
    pub menu_timeout_ms: u64,

    /// Bound on a single page load, in milliseconds
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
}

fn default_start_url() -> String {
    "https://www.al-islam.org".to_string()
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_selector_timeout_ms() -> u64 {
    5000
}

fn default_menu_timeout_ms() -> u64 {
    30000
}

fn default_navigation_timeout_ms() -> u64 {
    30000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            headless: false,
            chrome_path: None,
            chrome_args: Vec::new(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            selector_timeout_ms: default_selector_timeout_ms(),
            menu_timeout_ms: default_menu_timeout_ms(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("book-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("CRAWLER_START_URL") {
            self.start_url = url;
        }

        if let Ok(headless) = std::env::var("CRAWLER_HEADLESS") {
            if let Ok(h) = headless.parse() {
                self.headless = h;
            }
        }

        if let Ok(path) = std::env::var("CRAWLER_CHROME_PATH") {
            self.chrome_path = Some(PathBuf::from(path));
        }

        if let Ok(timeout) = std::env::var("CRAWLER_SELECTOR_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.selector_timeout_ms = t;
            }
        }

        self
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }

    pub fn menu_timeout(&self) -> Duration {
        Duration::from_millis(self.menu_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}
