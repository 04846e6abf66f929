//! Chromium page handle over CDP, attached to an externally-running browser.
//!
//! Nothing here launches or closes a browser: the session (and its login
//! state) belongs to the user. We discover the WebSocket debugger URL from
//! the endpoint's `/json/version` document, connect, and drive whichever
//! tab is already showing the feed.

use super::FeedPage;
use crate::error::TrawlError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

/// JS predicate evaluated against a node to decide visibility.
const VISIBILITY_FN: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    if (rect.width === 0 && rect.height === 0) return false;
    const style = window.getComputedStyle(this);
    return style.visibility !== 'hidden' && style.display !== 'none';
}"#;

/// What the CDP endpoint reports about itself.
#[derive(Debug, Clone)]
pub struct EndpointInfo {
    /// Browser product string, e.g. `Chrome/131.0.0.0`.
    pub browser: Option<String>,
    /// WebSocket debugger URL to connect to.
    pub ws_url: String,
}

/// Query `{endpoint}/json/version` for the WebSocket debugger URL.
pub async fn probe_endpoint(endpoint: &str) -> Result<EndpointInfo> {
    let unreachable = |reason: String| TrawlError::BrowserUnreachable {
        endpoint: endpoint.to_string(),
        reason,
    };

    let base = url::Url::parse(endpoint).map_err(|e| unreachable(format!("invalid endpoint: {e}")))?;
    let version_url = base
        .join("json/version")
        .map_err(|e| unreachable(format!("invalid endpoint: {e}")))?;

    let response = reqwest::get(version_url.as_str())
        .await
        .map_err(|e| unreachable(e.to_string()))?;
    let json: serde_json::Value = response.json().await.map_err(|e| unreachable(e.to_string()))?;

    let ws_url = json["webSocketDebuggerUrl"]
        .as_str()
        .ok_or_else(|| unreachable("no webSocketDebuggerUrl in response".to_string()))?
        .to_string();

    Ok(EndpointInfo {
        browser: json["Browser"].as_str().map(String::from),
        ws_url,
    })
}

/// A live CDP connection to an externally-owned browser.
pub struct CdpSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl CdpSession {
    /// Attach to the browser behind `endpoint`.
    ///
    /// Connection failures are fatal to the run; retrying the connection
    /// is the caller's policy, not ours.
    pub async fn attach(endpoint: &str) -> Result<Self> {
        let info = probe_endpoint(endpoint).await?;
        tracing::debug!(ws_url = %info.ws_url, "discovered CDP endpoint");

        let (browser, mut handler) =
            Browser::connect(info.ws_url)
                .await
                .map_err(|e| TrawlError::BrowserUnreachable {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })?;

        // Drive the CDP event stream for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Locate the tab to read from: the first open page whose URL contains
    /// `marker`, else the first open page (the precondition check will then
    /// refuse the run with the actual URL in hand).
    pub async fn find_feed_tab(&self, marker: &str) -> Result<ChromiumTab> {
        let pages = self
            .browser
            .pages()
            .await
            .context("failed to list open tabs")?;
        if pages.is_empty() {
            return Err(TrawlError::NoOpenTab.into());
        }

        let marker_lower = marker.to_lowercase();
        for page in &pages {
            if page_url(page).await.to_lowercase().contains(&marker_lower) {
                return Ok(ChromiumTab { page: page.clone() });
            }
        }
        Ok(ChromiumTab {
            page: pages[0].clone(),
        })
    }

    /// Drop the CDP connection, leaving the browser running.
    pub fn detach(self) {
        self.handler_task.abort();
        drop(self.browser);
    }
}

async fn page_url(page: &Page) -> String {
    page.url()
        .await
        .unwrap_or_default()
        .map(|u| u.to_string())
        .unwrap_or_default()
}

/// One already-open tab, driven through CDP.
pub struct ChromiumTab {
    page: Page,
}

#[async_trait]
impl FeedPage for ChromiumTab {
    type Node = Element;

    async fn query_all(&self, probe: &str) -> Result<Vec<Element>> {
        Ok(self.page.find_elements(probe).await?)
    }

    async fn query_first(&self, scope: &Element, probe: &str) -> Result<Option<Element>> {
        // A selector with no match surfaces as an error from CDP; either
        // way it is a miss, not a fault.
        Ok(scope.find_element(probe).await.ok())
    }

    async fn is_visible(&self, node: &Element) -> Result<bool> {
        let ret = node.call_js_fn(VISIBILITY_FN, false).await?;
        Ok(ret
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn text_content(&self, node: &Element) -> Result<Option<String>> {
        Ok(node.inner_text().await?)
    }

    async fn attribute(&self, node: &Element, name: &str) -> Result<Option<String>> {
        Ok(node.attribute(name).await?)
    }

    async fn scroll_by(&self, amount: i64) -> Result<()> {
        self.page
            .evaluate(format!("window.scrollBy(0, {amount})"))
            .await
            .context("scroll failed")?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(page_url(&self.page).await)
    }
}
