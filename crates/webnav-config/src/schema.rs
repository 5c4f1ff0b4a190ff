//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============================================================================
// Browser
// ============================================================================

/// Browser session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Page opened when a session is first created. Empty means none.
    #[serde(default = "default_initial_browser_page")]
    pub initial_browser_page: String,

    #[serde(default)]
    pub headless: bool,

    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Persistent browser profile directory.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    /// Timeout for a single script execution.
    #[serde(default = "default_script_timeout_ms")]
    pub script_timeout_ms: u64,

    /// Overall deadline for a navigation to reach the loaded state.
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Grace period that lets loading begin before waiting for idle.
    #[serde(default = "default_load_grace_ms")]
    pub load_grace_ms: u64,
}

fn default_initial_browser_page() -> String {
    "https://duckduckgo.com".to_string()
}

fn default_debug_port() -> u16 {
    9222
}

fn default_script_timeout_ms() -> u64 {
    10_000
}

fn default_navigation_timeout_ms() -> u64 {
    15_000
}

fn default_load_grace_ms() -> u64 {
    500
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            initial_browser_page: default_initial_browser_page(),
            headless: false,
            debug_port: default_debug_port(),
            profile_dir: None,
            script_timeout_ms: default_script_timeout_ms(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            load_grace_ms: default_load_grace_ms(),
        }
    }
}

// ============================================================================
// Context retention
// ============================================================================

/// Visited-page retention and retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Replace old page content with a generated summary.
    #[serde(default)]
    pub page_summary: bool,

    /// Replace old page content with a placeholder. Wins over `page_summary`.
    #[serde(default)]
    pub remove_old_pages: bool,

    /// Inject retrieval results over visited pages into each turn.
    #[serde(default)]
    pub retrieve_information: bool,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    512
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            page_summary: false,
            remove_old_pages: false,
            retrieve_information: false,
            chunk_size: default_chunk_size(),
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files.
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".webnav").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".webnav/logs"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
