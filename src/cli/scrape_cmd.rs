//! `trawl scrape` — attach, load, extract, persist.

use crate::browser::chromium::CdpSession;
use crate::cli::output;
use crate::config::ScrapeConfig;
use crate::engine::extractor::extract_posts;
use crate::engine::loader::load_feed;
use crate::engine::{confirm_feed_page, CancelFlag};
use crate::pacing::{HumanPacer, Pacer};
use crate::probes::ProbeTable;
use crate::progress::{self, ProgressReceiver, ScrapeEventKind};
use crate::sink::DatasetSink;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::sync::broadcast::error::RecvError;

/// Run the full pipeline against the browser at `endpoint`.
pub async fn run(endpoint: &str, marker: &str, out_dir: &Path, cfg: ScrapeConfig) -> Result<()> {
    let cancel = CancelFlag::new();
    {
        // Ctrl-C winds the run down between attempts/passes; whatever was
        // extracted so far is still written.
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, finishing up");
                cancel.cancel();
            }
        });
    }

    let probes = ProbeTable::builtin();
    let mut pacer = HumanPacer::new();

    if !output::is_quiet() && !output::is_json() {
        println!("Attaching to browser at {endpoint}...");
    }
    let session = CdpSession::attach(endpoint).await?;
    let tab = session.find_feed_tab(marker).await?;

    // Let the externally-completed login/render settle before reading.
    let settle = pacer.delay(cfg.settle_delay);
    if !output::is_quiet() && !output::is_json() {
        println!("Waiting {:.1}s for the session to settle...", settle.as_secs_f64());
    }
    tokio::time::sleep(settle).await;

    let url = confirm_feed_page(&tab, marker).await?;
    tracing::info!(%url, "feed page confirmed");

    let (tx, rx) = progress::channel();
    let printer = tokio::spawn(print_progress(rx));
    let progress_tx = Some(tx);
    let mut seq = 0u64;
    progress::emit(
        &progress_tx,
        &mut seq,
        ScrapeEventKind::FeedConfirmed { url: url.clone() },
    );

    let outcome = load_feed(
        &tab,
        &probes,
        &cfg,
        &mut pacer,
        &progress_tx,
        &mut seq,
        &cancel,
    )
    .await;
    let posts = extract_posts(
        &tab,
        &probes,
        &cfg,
        &mut pacer,
        &progress_tx,
        &mut seq,
        &cancel,
    )
    .await;

    drop(progress_tx);
    let _ = printer.await;
    session.detach();

    if posts.is_empty() {
        // A non-fatal "no data" outcome: partial structural drift or an
        // unrendered feed, not an engine failure.
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "records": 0,
                "rendered": outcome.rendered,
                "scroll_attempts": outcome.attempts,
                "dataset": serde_json::Value::Null,
            }));
        } else if !output::is_quiet() {
            println!("No posts were extracted. The feed may not have rendered, or its markup may have drifted.");
        }
        return Ok(());
    }

    let sink = DatasetSink::new(out_dir);
    let path = sink.write(&posts)?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "records": posts.len(),
            "rendered": outcome.rendered,
            "scroll_attempts": outcome.attempts,
            "dataset": path,
        }));
    } else if !output::is_quiet() {
        println!("{} records written to {}", posts.len(), path.display());
    }
    Ok(())
}

/// Render progress events to the terminal: an indicatif bar while the
/// loader runs, plain lines for extraction passes.
async fn print_progress(mut rx: ProgressReceiver) {
    let silent = output::is_quiet() || output::is_json();
    let mut bar: Option<ProgressBar> = None;

    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        };
        if silent {
            continue;
        }
        match event.kind {
            ScrapeEventKind::ScrollPass {
                rendered, target, ..
            } => {
                let bar = bar.get_or_insert_with(|| {
                    let bar = ProgressBar::new(target as u64);
                    bar.set_style(
                        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} items")
                            .expect("progress template is valid")
                            .progress_chars("=> "),
                    );
                    bar.set_message("loading feed");
                    bar
                });
                bar.set_position(rendered.min(target) as u64);
            }
            ScrapeEventKind::LoadFinished {
                rendered, attempts, ..
            } => {
                if let Some(bar) = bar.take() {
                    bar.finish_and_clear();
                }
                println!("Loaded {rendered} items in {attempts} scroll attempts");
            }
            ScrapeEventKind::PassStarted { pass, of } => {
                println!("Extraction pass {pass}/{of}...");
            }
            ScrapeEventKind::ItemSkipped { index } => {
                println!("  item {index}: no body text, skipped");
            }
            ScrapeEventKind::PassEmpty { backoff_ms, .. } => {
                println!(
                    "  no records yet, retrying in {:.1}s",
                    backoff_ms as f64 / 1000.0
                );
            }
            ScrapeEventKind::ExtractFinished {
                records, passes, ..
            } => {
                println!("Extracted {records} record(s) in {passes} pass(es)");
            }
            ScrapeEventKind::Warning { message } => {
                println!("  warning: {message}");
            }
            ScrapeEventKind::FeedConfirmed { url } => {
                println!("Reading feed at {url}");
            }
            ScrapeEventKind::ReadingPause { .. } => {}
        }
    }

    if let Some(bar) = bar.take() {
        bar.finish_and_clear();
    }
}
