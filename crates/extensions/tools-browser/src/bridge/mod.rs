//! Script executor bridge.
//!
//! Lets any task run work on the single-threaded engine and wait for the
//! result. Calls are serialized: a second call waits in FIFO order until the
//! first one completes or times out. Every call carries its own timeout, which
//! the bridge enforces independently of whether the engine ever runs the work.

mod error;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{Mutex, oneshot};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::engine::{EngineError, EngineHost};

pub use error::ScriptError;

/// Serializes script execution and navigation onto an [`EngineHost`].
pub struct ScriptBridge {
    host: Arc<EngineHost>,
    turn: Mutex<()>,
}

impl ScriptBridge {
    pub fn new(host: Arc<EngineHost>) -> Self {
        Self {
            host,
            turn: Mutex::new(()),
        }
    }

    /// Run `script` and return its raw text result.
    pub async fn execute_raw(&self, script: &str, timeout: Duration) -> Result<String, ScriptError> {
        let _turn = self.turn.lock().await;
        let deadline = Instant::now() + timeout;
        let (id, reply) = self.host.post_evaluate(script, deadline)?;
        debug!("Posted script request {}", id);
        self.await_reply(id, deadline, reply).await
    }

    /// Run `script` and parse its result as JSON.
    ///
    /// Scripts are expected to produce serialized structured values; anything
    /// that does not parse is reported as [`ScriptError::MalformedResult`].
    pub async fn execute(&self, script: &str, timeout: Duration) -> Result<Value, ScriptError> {
        let raw = self.execute_raw(script, timeout).await?;
        serde_json::from_str(&raw).map_err(|e| {
            debug!("Script result is not JSON: {}", e);
            ScriptError::MalformedResult
        })
    }

    /// Issue a navigation. Returns once the engine has started it.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), ScriptError> {
        let _turn = self.turn.lock().await;
        let deadline = Instant::now() + timeout;
        let (id, reply) = self.host.post_navigate(url, deadline)?;
        debug!("Posted navigate request {} to {}", id, url);
        self.await_reply(id, deadline, reply).await.map(|_| ())
    }

    async fn await_reply(
        &self,
        id: u64,
        deadline: Instant,
        reply: oneshot::Receiver<Result<String, EngineError>>,
    ) -> Result<String, ScriptError> {
        match tokio::time::timeout_at(deadline, reply).await {
            Ok(Ok(result)) => result.map_err(ScriptError::from),
            Ok(Err(_)) if !self.host.is_running() => Err(EngineError::Disconnected.into()),
            // Dropped unexecuted: it expired while queued.
            Ok(Err(_)) => Err(ScriptError::Timeout),
            Err(_) => {
                warn!("Engine request {} timed out", id);
                Err(ScriptError::Timeout)
            }
        }
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
