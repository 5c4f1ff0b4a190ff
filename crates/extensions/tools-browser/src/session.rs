//! The live browser session.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use url::Url;

use crate::bridge::{ScriptBridge, ScriptError};
use crate::engine::{EngineHost, LoadingState};

/// Owns exactly one live engine. All navigation and script execution for the
/// session goes through its bridge.
pub struct BrowserSession {
    host: Arc<EngineHost>,
    bridge: ScriptBridge,
    current_url: Mutex<Option<Url>>,
}

impl BrowserSession {
    pub fn new(host: EngineHost) -> Self {
        let host = Arc::new(host);
        Self {
            bridge: ScriptBridge::new(host.clone()),
            host,
            current_url: Mutex::new(None),
        }
    }

    pub fn bridge(&self) -> &ScriptBridge {
        &self.bridge
    }

    /// Last location a navigation was issued for.
    pub fn current_url(&self) -> Option<Url> {
        self.current_url.lock().clone()
    }

    pub(crate) fn set_current_url(&self, url: Url) {
        *self.current_url.lock() = Some(url);
    }

    pub fn loading_state(&self) -> LoadingState {
        *self.host.loading().borrow()
    }

    pub(crate) fn loading(&self) -> watch::Receiver<LoadingState> {
        self.host.loading()
    }

    /// Resolve `target` against the current URL. Absolute targets are
    /// returned as-is.
    pub fn resolve(&self, target: &str) -> Result<Url, ScriptError> {
        resolve_target(self.current_url().as_ref(), target)
    }

    pub(crate) async fn close(&self) {
        self.host.shutdown().await;
    }
}

/// Standard base + relative URL composition.
pub fn resolve_target(base: Option<&Url>, target: &str) -> Result<Url, ScriptError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ScriptError::NavigationFailed("empty URL".to_string()));
    }
    let resolved = match base {
        Some(base) => base.join(target),
        None => Url::parse(target),
    };
    resolved.map_err(|e| ScriptError::NavigationFailed(format!("{}: {}", target, e)))
}
