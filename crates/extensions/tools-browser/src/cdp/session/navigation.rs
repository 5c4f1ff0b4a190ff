//! Navigation.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Issue a navigation and return the frame id. Does not wait for the load;
    /// load progress arrives as Page events.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            return Err(CdpError::NavigationFailed(format!("{}: {}", url, error)));
        }

        debug!("Navigation issued for {}", url);
        Ok(result["frameId"].as_str().unwrap_or(&self.target_id).to_string())
    }
}
