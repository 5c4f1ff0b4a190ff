//! Browser engine abstraction.
//!
//! An [`Engine`] renders pages and runs in-page scripts. It is single-threaded:
//! it is constructed on, and only ever touched from, the engine thread owned by
//! an [`EngineHost`]. Everything else talks to it through the host's command
//! queue.

mod error;
mod host;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use tokio::sync::watch;

pub use error::EngineError;
pub use host::EngineHost;

/// Page load state reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Idle,
    Loading,
}

/// Write side of the engine's load-state channel.
#[derive(Clone)]
pub struct LoadSignal {
    tx: Arc<watch::Sender<LoadingState>>,
}

impl LoadSignal {
    pub(crate) fn channel() -> (Self, watch::Receiver<LoadingState>) {
        let (tx, rx) = watch::channel(LoadingState::Idle);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub fn set(&self, state: LoadingState) {
        self.tx.send_replace(state);
    }

    pub fn loading(&self) {
        self.set(LoadingState::Loading);
    }

    pub fn idle(&self) {
        self.set(LoadingState::Idle);
    }

    pub fn current(&self) -> LoadingState {
        *self.tx.borrow()
    }
}

/// A single-threaded browser engine.
#[async_trait(?Send)]
pub trait Engine {
    /// Start navigating to `url`. Returns once the navigation is issued; load
    /// progress is reported through the [`LoadSignal`].
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError>;

    /// Evaluate a script in the current page and return its result as text.
    async fn evaluate(&mut self, script: &str) -> Result<String, EngineError>;

    /// Release engine resources.
    async fn shutdown(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Builds an engine on the engine thread.
pub type EngineFactory = Arc<
    dyn Fn(LoadSignal) -> LocalBoxFuture<'static, Result<Box<dyn Engine>, EngineError>>
        + Send
        + Sync,
>;
