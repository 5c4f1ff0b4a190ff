//! Navigation controller.

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{BrowserManager, LoadedPage, VisitedContent};
use crate::bridge::ScriptError;
use crate::content::cleanse;
use crate::engine::LoadingState;
use crate::scripts::PageScript;

impl BrowserManager {
    /// Navigate to `target` and return the page markup once loaded.
    ///
    /// Relative targets resolve against the current URL, which is updated as
    /// soon as the navigation is issued. A page that never reports idle before
    /// the navigation deadline is read as-is.
    pub async fn navigate_and_wait(&self, target: &str) -> Result<LoadedPage, ScriptError> {
        let session = self.ensure_session().await?;
        let url = session.resolve(target)?;
        let deadline = Instant::now() + self.config.navigation_timeout;
        let mut loading = session.loading();

        info!("Navigating to {}", url);
        if let Err(e) = session
            .bridge()
            .navigate(url.as_str(), self.config.navigation_timeout)
            .await
        {
            warn!("Navigation to {} reported an error: {}", url, e);
        }
        session.set_current_url(url.clone());

        tokio::time::sleep(self.config.load_grace).await;
        let loaded = tokio::time::timeout_at(
            deadline,
            loading.wait_for(|state| *state == LoadingState::Idle),
        )
        .await
        .map(|waited| waited.is_ok());
        match loaded {
            Ok(true) => debug!("Page loaded: {}", url),
            Ok(false) => warn!("Load state unavailable for {}, reading page as-is", url),
            Err(_) => warn!("Page {} did not finish loading in time, reading page as-is", url),
        }

        let html = session
            .bridge()
            .execute(&PageScript::OuterHtml.render(), self.config.script_timeout)
            .await?;
        let html = html.as_str().ok_or(ScriptError::MalformedResult)?.to_string();
        Ok(LoadedPage { url, html })
    }

    /// Navigate, cleanse the page and record it as visited.
    pub async fn visit(&self, target: &str) -> Result<VisitedContent, ScriptError> {
        let page = self.navigate_and_wait(target).await?;
        let content = cleanse(&page.html).content();
        self.visited.record(page.url.as_str(), content.clone());
        Ok(VisitedContent {
            url: page.url,
            content,
        })
    }
}
