// Copyright 2026 Trawl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Resilient extractor: turn currently-rendered items into records while
//! tolerating partial or shifted markup.
//!
//! Resolution policies per field:
//! - **body** — longest-match: every probe is tried and the longest
//!   non-empty visible text wins. Different post types surface the
//!   authoritative text under different structural patterns, and a short
//!   secondary label must never shadow a longer true body.
//! - **date / reactions / comments / reposts** — first-match: probes are
//!   tried in table order and the first non-empty visible text is
//!   accepted.
//!
//! Fault isolation is per probe: a throwing or malformed probe result is a
//! miss for that probe only, never an aborted item or pass.

use super::enrich;
use super::CancelFlag;
use crate::browser::FeedPage;
use crate::config::ScrapeConfig;
use crate::pacing::Pacer;
use crate::probes::{Field, ProbeTable};
use crate::progress::{emit, ProgressSender, ScrapeEventKind};
use crate::record::{Post, NO_COMMENTS, NO_REACTIONS, NO_REPOSTS, UNKNOWN_DATE};
use std::time::Instant;

/// Extract records from the rendered feed, retrying whole passes while
/// sub-content is still populating asynchronously.
///
/// Runs up to `cfg.retry_passes` passes; the first pass producing at least
/// one record ends the loop. Between failed passes the worker suspends for
/// a pacer-chosen backoff. Exhausting every pass yields an empty sequence
/// — a "no data" outcome, not an error; the caller decides whether that is
/// terminal.
pub async fn extract_posts<P: FeedPage + Sync>(
    page: &P,
    probes: &ProbeTable,
    cfg: &ScrapeConfig,
    pacer: &mut dyn Pacer,
    progress: &Option<ProgressSender>,
    seq: &mut u64,
    cancel: &CancelFlag,
) -> Vec<Post> {
    let started = Instant::now();
    let mut pass = 0u32;

    while pass < cfg.retry_passes {
        pass += 1;
        emit(
            progress,
            seq,
            ScrapeEventKind::PassStarted {
                pass,
                of: cfg.retry_passes,
            },
        );

        let posts = run_pass(page, probes, cfg, progress, seq).await;
        if !posts.is_empty() {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            emit(
                progress,
                seq,
                ScrapeEventKind::ExtractFinished {
                    records: posts.len(),
                    passes: pass,
                    elapsed_ms,
                },
            );
            tracing::info!(records = posts.len(), passes = pass, "extraction finished");
            return posts;
        }

        if cancel.is_cancelled() {
            break;
        }
        if pass < cfg.retry_passes {
            let backoff = pacer.delay(cfg.retry_backoff);
            emit(
                progress,
                seq,
                ScrapeEventKind::PassEmpty {
                    pass,
                    backoff_ms: backoff.as_millis() as u64,
                },
            );
            tracing::debug!(pass, "pass yielded no records, backing off");
            tokio::time::sleep(backoff).await;
        }
    }

    emit(
        progress,
        seq,
        ScrapeEventKind::ExtractFinished {
            records: 0,
            passes: pass,
            elapsed_ms: started.elapsed().as_millis() as u64,
        },
    );
    tracing::warn!(passes = pass, "no records extracted");
    Vec::new()
}

/// One full traversal of the currently-rendered items.
///
/// Container probes are re-queried fresh — the DOM is live and handles
/// from a previous pass may be stale. Probes are tried in table order; the
/// first one whose items yield any records wins the pass.
async fn run_pass<P: FeedPage + Sync>(
    page: &P,
    probes: &ProbeTable,
    cfg: &ScrapeConfig,
    progress: &Option<ProgressSender>,
    seq: &mut u64,
) -> Vec<Post> {
    for container in probes.probes(Field::ItemContainer) {
        let items = match page.query_all(container).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => continue,
            Err(e) => {
                tracing::trace!(probe = %container, error = %e, "container probe failed");
                continue;
            }
        };
        tracing::debug!(probe = %container, items = items.len(), "scanning rendered items");

        let capped = items.len().min(cfg.target_items);
        let mut posts = Vec::new();
        for (i, item) in items[..capped].iter().enumerate() {
            let index = i + 1;
            match build_post(page, probes, item, index).await {
                Some(post) => posts.push(post),
                None => {
                    emit(progress, seq, ScrapeEventKind::ItemSkipped { index });
                    tracing::debug!(index, "item has no body text, skipping");
                }
            }
        }
        if !posts.is_empty() {
            return posts;
        }
    }
    Vec::new()
}

/// Resolve one rendered item into a record.
///
/// Returns `None` only when no body probe yields visible text — every
/// other field degrades to its documented default, and a missing or
/// undecodable identifier just leaves the derived fields absent.
async fn build_post<P: FeedPage + Sync>(
    page: &P,
    probes: &ProbeTable,
    item: &P::Node,
    index: usize,
) -> Option<Post> {
    let text = longest_visible_text(page, item, probes.probes(Field::Body)).await?;

    let date = first_visible_text(page, item, probes.probes(Field::Date))
        .await
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());
    let reactions = first_visible_text(page, item, probes.probes(Field::Reactions))
        .await
        .unwrap_or_else(|| NO_REACTIONS.to_string());
    let comments = first_visible_text(page, item, probes.probes(Field::Comments))
        .await
        .unwrap_or_else(|| NO_COMMENTS.to_string());
    let reposts = first_visible_text(page, item, probes.probes(Field::Reposts))
        .await
        .unwrap_or_else(|| NO_REPOSTS.to_string());

    let raw_id = page
        .attribute(item, probes.identifier_attribute())
        .await
        .ok()
        .flatten();
    let (activity_permalink, estimated_upload_epoch) = match raw_id {
        Some(ref raw) => (
            Some(enrich::activity_permalink(raw)),
            enrich::decode_upload_epoch(raw),
        ),
        None => (None, None),
    };

    Some(Post {
        index,
        date,
        text,
        reactions,
        comments,
        reposts,
        activity_permalink,
        estimated_upload_epoch,
    })
}

/// Longest-match resolution: every probe is consulted and the longest
/// non-empty visible text wins. Ties resolve to the earliest probe that
/// achieved the maximum.
async fn longest_visible_text<P: FeedPage + Sync>(
    page: &P,
    scope: &P::Node,
    candidates: &[String],
) -> Option<String> {
    let mut best: Option<String> = None;
    for probe in candidates {
        let Some(text) = visible_text(page, scope, probe).await else {
            continue;
        };
        let longer = best
            .as_ref()
            .map_or(true, |b| text.chars().count() > b.chars().count());
        if longer {
            best = Some(text);
        }
    }
    best
}

/// First-match resolution: probes in order, first non-empty visible text
/// wins and later probes are not consulted.
async fn first_visible_text<P: FeedPage + Sync>(
    page: &P,
    scope: &P::Node,
    candidates: &[String],
) -> Option<String> {
    for probe in candidates {
        if let Some(text) = visible_text(page, scope, probe).await {
            return Some(text);
        }
    }
    None
}

/// Trimmed text of the first visible node matching `probe` inside `scope`.
///
/// Every failure mode — probe error, no match, hidden node, text read
/// error, blank text — collapses to `None`.
async fn visible_text<P: FeedPage + Sync>(
    page: &P,
    scope: &P::Node,
    probe: &str,
) -> Option<String> {
    let node = page.query_first(scope, probe).await.ok().flatten()?;
    if !page.is_visible(&node).await.unwrap_or(false) {
        return None;
    }
    let text = page.text_content(&node).await.ok().flatten()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
