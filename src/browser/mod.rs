//! Page-handle abstraction over the live browser tab.
//!
//! Defines the [`FeedPage`] trait that the loader and extractor drive.
//! The only production implementation is a Chromium tab reached over CDP
//! (see [`chromium`]); tests implement the trait over scripted in-memory
//! nodes.
//!
//! Node handles are transient: the document is live and may be mutated by
//! the page's own scripts at any time, so handles are re-queried every
//! pass and never cached across passes. Any method may fail on a stale
//! handle — callers treat such failures as a probe miss, not an error.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;

/// Capability surface of the externally-owned feed tab.
#[async_trait]
pub trait FeedPage {
    /// Opaque handle to one DOM node.
    type Node: Send + Sync;

    /// All nodes currently matching `probe`, in document order.
    async fn query_all(&self, probe: &str) -> Result<Vec<Self::Node>>;

    /// The first node matching `probe` *within* `scope`, if any.
    async fn query_first(&self, scope: &Self::Node, probe: &str) -> Result<Option<Self::Node>>;

    /// Whether the node currently occupies visible layout space.
    async fn is_visible(&self, node: &Self::Node) -> Result<bool>;

    /// The node's rendered text content.
    async fn text_content(&self, node: &Self::Node) -> Result<Option<String>>;

    /// A raw attribute value on the node.
    async fn attribute(&self, node: &Self::Node, name: &str) -> Result<Option<String>>;

    /// Issue one synthetic vertical scroll of `amount` pixels.
    async fn scroll_by(&self, amount: i64) -> Result<()>;

    /// The tab's current URL.
    async fn current_url(&self) -> Result<String>;
}
