//! Incremental loader: coax the lazily-rendered feed into materializing
//! items by issuing synthetic scrolls with human-like pacing.

use super::CancelFlag;
use crate::browser::FeedPage;
use crate::config::ScrapeConfig;
use crate::pacing::Pacer;
use crate::probes::{Field, ProbeTable};
use crate::progress::{emit, ProgressSender, ScrapeEventKind};
use std::time::Instant;

/// What a loading run achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Best rendered-item count observed across attempts.
    pub rendered: usize,
    /// Scroll attempts spent.
    pub attempts: u32,
}

/// Scroll the live document until at least `cfg.target_items` items are
/// rendered or `cfg.max_scroll_attempts` scrolls have been spent.
///
/// Degrade-not-fail: never errors. If the target is out of reach the best
/// observed count is returned and the caller decides what to do with a
/// partially-loaded feed. Termination is guaranteed by the attempt bound.
pub async fn load_feed<P: FeedPage + Sync>(
    page: &P,
    probes: &ProbeTable,
    cfg: &ScrapeConfig,
    pacer: &mut dyn Pacer,
    progress: &Option<ProgressSender>,
    seq: &mut u64,
    cancel: &CancelFlag,
) -> LoadOutcome {
    let started = Instant::now();
    let mut attempts = 0u32;
    let mut best = 0usize;

    loop {
        let rendered = rendered_count(page, probes).await;
        best = best.max(rendered);
        emit(
            progress,
            seq,
            ScrapeEventKind::ScrollPass {
                attempt: attempts,
                rendered,
                target: cfg.target_items,
            },
        );

        if rendered >= cfg.target_items {
            tracing::debug!(rendered, attempts, "target item count reached");
            break;
        }
        if attempts >= cfg.max_scroll_attempts || cancel.is_cancelled() {
            break;
        }

        // One synthetic scroll, then jittered pacing. A failed scroll is
        // reported and the attempt still counts against the budget.
        let step = pacer.scroll_amount(cfg.scroll_step);
        if let Err(e) = page.scroll_by(step).await {
            tracing::debug!(error = %e, "scroll failed, continuing");
            emit(
                progress,
                seq,
                ScrapeEventKind::Warning {
                    message: format!("scroll failed: {e}"),
                },
            );
        }
        tokio::time::sleep(pacer.delay(cfg.scroll_pause)).await;

        if pacer.chance(cfg.burst_chance) {
            let pause = pacer.delay(cfg.burst_pause);
            emit(
                progress,
                seq,
                ScrapeEventKind::ReadingPause {
                    ms: pause.as_millis() as u64,
                },
            );
            tokio::time::sleep(pause).await;
        }

        attempts += 1;
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    emit(
        progress,
        seq,
        ScrapeEventKind::LoadFinished {
            rendered: best,
            attempts,
            elapsed_ms,
        },
    );
    tracing::info!(rendered = best, attempts, elapsed_ms, "feed loading finished");

    LoadOutcome {
        rendered: best,
        attempts,
    }
}

/// Union-max item count across all container probes.
///
/// Probes are not assumed mutually exclusive or individually complete, so
/// each is queried independently and the largest count wins. A failing
/// probe contributes zero and never aborts the attempt.
async fn rendered_count<P: FeedPage + Sync>(page: &P, probes: &ProbeTable) -> usize {
    let mut best = 0;
    for probe in probes.probes(Field::ItemContainer) {
        match page.query_all(probe).await {
            Ok(items) => best = best.max(items.len()),
            Err(e) => tracing::trace!(probe = %probe, error = %e, "container probe failed"),
        }
    }
    best
}
