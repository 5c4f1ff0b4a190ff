//! Browser manager type definitions and configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;
use webnav_config::BrowserConfig;

use crate::bridge::ScriptError;
use crate::engine::EngineError;

/// Browser manager errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to start browser engine: {0}")]
    EngineStart(#[from] EngineError),
}

impl From<BrowserError> for ScriptError {
    fn from(e: BrowserError) -> Self {
        ScriptError::EngineError(e.to_string())
    }
}

/// Browser configuration.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// Page opened when a session is first created.
    pub initial_page: Option<String>,
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Profile directory for persistent login state.
    pub profile_dir: Option<PathBuf>,
    /// Whether to run Chrome in headless mode.
    pub headless: bool,
    pub script_timeout: Duration,
    /// Overall deadline for a navigation to reach the loaded state.
    pub navigation_timeout: Duration,
    /// Time allowed for loading to begin before waiting for idle.
    pub load_grace: Duration,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self::from(&BrowserConfig::default())
    }
}

impl From<&BrowserConfig> for BrowserManagerConfig {
    fn from(config: &BrowserConfig) -> Self {
        let initial_page = config.initial_browser_page.trim();
        Self {
            initial_page: (!initial_page.is_empty()).then(|| initial_page.to_string()),
            debug_port: config.debug_port,
            profile_dir: config.profile_dir.clone(),
            headless: config.headless,
            script_timeout: Duration::from_millis(config.script_timeout_ms),
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            load_grace: Duration::from_millis(config.load_grace_ms),
        }
    }
}

impl BrowserManagerConfig {
    /// Get the profile directory, creating default if not specified.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".webnav")
                .join("browser-profile")
        })
    }

    /// Get the CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}

/// A page reached by a navigation.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// Resolved absolute location.
    pub url: Url,
    /// Markup present once loading finished or the deadline passed.
    pub html: String,
}

/// A visited page reduced to its content blob.
#[derive(Debug, Clone)]
pub struct VisitedContent {
    pub url: Url,
    pub content: String,
}
