//! Session struct and command dispatch.

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cdp::client::CdpChannel;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::CdpResponse;

/// A session attached to a single page/target.
pub struct PageSession {
    pub(super) target_id: String,
    pub(super) session_id: String,
    channel: CdpChannel,
    /// Events for this session, until someone takes them.
    events: Option<mpsc::UnboundedReceiver<CdpResponse>>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        channel: CdpChannel,
        events: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            channel,
            events: Some(events),
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Hand the event stream to a consumer. Returns `None` the second time.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<CdpResponse>> {
        self.events.take()
    }

    /// Send a CDP command to this page.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Page events drive load tracking; Runtime is needed for evaluation.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }
}
