//! BrowserManager core: session lifecycle and script dispatch.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use super::{BrowserError, BrowserManagerConfig};
use crate::bridge::ScriptError;
use crate::context::VisitedPages;
use crate::engine::{EngineFactory, EngineHost};
use crate::scripts::PageScript;
use crate::session::BrowserSession;

/// Owns the browser session for one agent context and routes every
/// navigation and script through it.
pub struct BrowserManager {
    pub(super) config: BrowserManagerConfig,
    factory: EngineFactory,
    session: RwLock<Option<Arc<BrowserSession>>>,
    pub(super) visited: VisitedPages,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig, factory: EngineFactory) -> Self {
        Self::with_visited(config, factory, VisitedPages::new())
    }

    /// Create a manager recording visits into an existing store.
    pub fn with_visited(
        config: BrowserManagerConfig,
        factory: EngineFactory,
        visited: VisitedPages,
    ) -> Self {
        Self {
            config,
            factory,
            session: RwLock::new(None),
            visited,
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    pub fn visited(&self) -> &VisitedPages {
        &self.visited
    }

    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Current URL of the live session, if any.
    pub async fn current_url(&self) -> Option<Url> {
        self.session.read().await.as_ref()?.current_url()
    }

    /// Return the live session, creating it on first use.
    pub async fn ensure_session(&self) -> Result<Arc<BrowserSession>, BrowserError> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }

        let mut slot = self.session.write().await;
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        let host = EngineHost::spawn(self.factory.clone()).await?;
        let session = Arc::new(BrowserSession::new(host));
        self.open_initial_page(&session).await;
        *slot = Some(session.clone());

        info!("Browser session created");
        Ok(session)
    }

    /// Destroy the live session, if any.
    pub async fn close_session(&self) {
        let session = self.session.write().await.take();
        if let Some(session) = session {
            session.close().await;
            info!("Browser session closed");
        }
    }

    async fn open_initial_page(&self, session: &BrowserSession) {
        let Some(page) = &self.config.initial_page else {
            return;
        };
        let url = match session.resolve(page) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid initial page {}: {}", page, e);
                return;
            }
        };
        if let Err(e) = session
            .bridge()
            .navigate(url.as_str(), self.config.navigation_timeout)
            .await
        {
            warn!("Failed to open initial page {}: {}", url, e);
        }
        session.set_current_url(url);
    }

    /// Run a page script and return its structured result.
    ///
    /// Element scripts that report a missing element fail with
    /// [`ScriptError::ElementNotFound`].
    pub async fn run(&self, script: &PageScript) -> Result<Value, ScriptError> {
        let session = self.ensure_session().await?;
        debug!("Running page script {}", script.name());
        let value = session
            .bridge()
            .execute(&script.render(), self.config.script_timeout)
            .await?;

        let not_found = value
            .get("notFound")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if not_found {
            let selector = script.selector().unwrap_or_default();
            return Err(ScriptError::ElementNotFound(selector.to_string()));
        }
        Ok(value)
    }

    /// Run a page script and deserialize its result.
    pub async fn query<T: DeserializeOwned>(&self, script: &PageScript) -> Result<T, ScriptError> {
        let value = self.run(script).await?;
        serde_json::from_value(value).map_err(|e| {
            debug!("Unexpected {} result shape: {}", script.name(), e);
            ScriptError::MalformedResult
        })
    }

    /// Run arbitrary script text and return its raw result.
    pub async fn execute_raw(&self, script: &str) -> Result<String, ScriptError> {
        let session = self.ensure_session().await?;
        session
            .bridge()
            .execute_raw(script, self.config.script_timeout)
            .await
    }
}
