//! [`Engine`] implementation over a Chrome tab.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{Engine, EngineError, EngineFactory, LoadSignal, LoadingState};
use crate::manager::BrowserManagerConfig;

use super::client::CdpClient;
use super::error::CdpError;
use super::launcher;
use super::protocol::CdpResponse;
use super::session::PageSession;

/// One Chrome tab driven over CDP.
pub struct CdpEngine {
    client: CdpClient,
    page: PageSession,
    /// Chrome process, when this engine launched it.
    chrome: Option<Child>,
    signal: LoadSignal,
    load_events: JoinHandle<()>,
}

impl CdpEngine {
    /// Connect to (or launch) Chrome and open a dedicated tab.
    pub async fn launch(config: &BrowserManagerConfig, signal: LoadSignal) -> Result<Self, CdpError> {
        let chrome = launcher::ensure_chrome(config).await?;
        let client = CdpClient::connect(&config.endpoint()).await?;
        let mut page = client.new_page(None).await?;
        info!("Connected to Chrome at {}", config.endpoint());

        let events = page
            .take_events()
            .ok_or_else(|| CdpError::InvalidResponse("Page events already taken".to_string()))?;
        let load_events = tokio::spawn(track_loading(
            events,
            page.target_id().to_string(),
            signal.clone(),
        ));

        Ok(Self {
            client,
            page,
            chrome,
            signal,
            load_events,
        })
    }
}

#[async_trait(?Send)]
impl Engine for CdpEngine {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.signal.loading();
        match self.page.navigate(url).await {
            Ok(frame_id) => {
                debug!("Frame {} navigating to {}", frame_id, url);
                Ok(())
            }
            Err(e) => {
                self.signal.idle();
                Err(e.into())
            }
        }
    }

    async fn evaluate(&mut self, script: &str) -> Result<String, EngineError> {
        let value = self.page.evaluate(script).await?;
        Ok(match value {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        self.load_events.abort();
        if let Err(e) = self.client.close_page(self.page.target_id()).await {
            warn!("Failed to close page: {}", e);
        }
        if let Some(mut chrome) = self.chrome.take() {
            info!("Shutting down Chrome...");
            chrome
                .kill()
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?;
        }
        Ok(())
    }
}

/// Map Page events to load-state transitions.
async fn track_loading(
    mut events: mpsc::UnboundedReceiver<CdpResponse>,
    main_frame: String,
    signal: LoadSignal,
) {
    while let Some(event) = events.recv().await {
        if let Some(state) = load_transition(&event, &main_frame) {
            signal.set(state);
        }
    }
    debug!("Page event stream ended");
}

/// The main frame's id equals its target id.
fn load_transition(event: &CdpResponse, main_frame: &str) -> Option<LoadingState> {
    let on_main_frame = event.frame_id() == Some(main_frame);
    match event.method.as_deref()? {
        "Page.frameStartedLoading" if on_main_frame => Some(LoadingState::Loading),
        "Page.frameStoppedLoading" if on_main_frame => Some(LoadingState::Idle),
        "Page.loadEventFired" => Some(LoadingState::Idle),
        _ => None,
    }
}

/// Engine factory that launches Chrome per `config`.
pub fn cdp_engine_factory(config: BrowserManagerConfig) -> EngineFactory {
    Arc::new(move |signal: LoadSignal| launch_engine(config.clone(), signal).boxed_local())
}

async fn launch_engine(
    config: BrowserManagerConfig,
    signal: LoadSignal,
) -> Result<Box<dyn Engine>, EngineError> {
    let engine = CdpEngine::launch(&config, signal).await?;
    Ok(Box::new(engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(method: &str, frame: Option<&str>) -> CdpResponse {
        let params = frame.map(|f| serde_json::json!({"frameId": f}));
        CdpResponse {
            id: None,
            result: None,
            error: None,
            method: Some(method.to_string()),
            params,
            session_id: Some("S1".to_string()),
        }
    }

    #[test]
    fn test_main_frame_starts_loading() {
        let e = event("Page.frameStartedLoading", Some("T1"));
        assert_eq!(load_transition(&e, "T1"), Some(LoadingState::Loading));
    }

    #[test]
    fn test_subframe_is_ignored() {
        let started = event("Page.frameStartedLoading", Some("iframe"));
        let stopped = event("Page.frameStoppedLoading", Some("iframe"));
        assert_eq!(load_transition(&started, "T1"), None);
        assert_eq!(load_transition(&stopped, "T1"), None);
    }

    #[test]
    fn test_load_event_is_idle() {
        let e = event("Page.loadEventFired", None);
        assert_eq!(load_transition(&e, "T1"), Some(LoadingState::Idle));
        let e = event("Page.frameStoppedLoading", Some("T1"));
        assert_eq!(load_transition(&e, "T1"), Some(LoadingState::Idle));
    }

    #[test]
    fn test_unrelated_events() {
        let e = event("Runtime.consoleAPICalled", None);
        assert_eq!(load_transition(&e, "T1"), None);
    }

    #[tokio::test]
    async fn test_tracker_follows_events() {
        let (signal, rx) = LoadSignal::channel();
        let (tx, events) = mpsc::unbounded_channel();
        tx.send(event("Page.frameStartedLoading", Some("T1"))).unwrap();
        tx.send(event("Page.frameStartedLoading", Some("child"))).unwrap();
        drop(tx);

        track_loading(events, "T1".to_string(), signal).await;
        assert_eq!(*rx.borrow(), LoadingState::Loading);
    }
}
