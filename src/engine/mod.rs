// Copyright 2026 Trawl Contributors
// SPDX-License-Identifier: Apache-2.0

//! The incremental-load-and-resilient-extract engine.
//!
//! A strictly sequential pipeline over one shared, externally-owned tab:
//! the loader scrolls the live document until enough items render, then
//! the extractor walks the rendered items and builds records. No parallel
//! queries are ever issued against the tab — concurrent scroll/query
//! operations would race the page's own scripts and corrupt observed
//! counts.

pub mod enrich;
pub mod extractor;
pub mod loader;

use crate::browser::FeedPage;
use crate::error::TrawlError;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag.
///
/// Checked between scroll attempts and between extraction passes, never
/// mid-probe, so a cancelled run still winds down cleanly and keeps
/// whatever it extracted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Precondition check: refuse to run against an arbitrary page.
///
/// Returns the tab URL when it contains `marker` (case-insensitive);
/// otherwise the run is refused before any scrolling or extraction.
pub async fn confirm_feed_page<P: FeedPage + Sync>(page: &P, marker: &str) -> Result<String> {
    let url = page.current_url().await?;
    if url.to_lowercase().contains(&marker.to_lowercase()) {
        Ok(url)
    } else {
        Err(TrawlError::NotOnFeedPage {
            url,
            marker: marker.to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_shared_across_clones() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }
}
