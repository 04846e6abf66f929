// Copyright 2026 Trawl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Progress event types and broadcast channel for run telemetry.
//!
//! The loader and extractor emit `ScrapeEvent`s which flow through a
//! `tokio::sync::broadcast` channel to all subscribers (terminal progress,
//! log sinks). When no subscriber exists, events are silently dropped.

use serde::{Deserialize, Serialize};

/// A progress event emitted during loading or extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeEvent {
    /// Monotonically increasing sequence number within one run.
    pub seq: u64,
    /// The kind of progress event.
    pub kind: ScrapeEventKind,
}

/// The specific kind of progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScrapeEventKind {
    /// The precondition check passed for this tab.
    FeedConfirmed { url: String },
    /// One scroll attempt finished; `rendered` items are now in the DOM.
    ScrollPass {
        attempt: u32,
        rendered: usize,
        target: usize,
    },
    /// The loader took an extra reading pause.
    ReadingPause { ms: u64 },
    /// Loading finished, successfully or by attempt exhaustion.
    LoadFinished {
        rendered: usize,
        attempts: u32,
        elapsed_ms: u64,
    },
    /// An extraction pass started.
    PassStarted { pass: u32, of: u32 },
    /// An item was skipped because no body probe matched.
    ItemSkipped { index: usize },
    /// An extraction pass produced no records and will be retried.
    PassEmpty { pass: u32, backoff_ms: u64 },
    /// Extraction finished.
    ExtractFinished {
        records: usize,
        passes: u32,
        elapsed_ms: u64,
    },
    /// A non-fatal warning occurred.
    Warning { message: String },
}

/// Sender handle for emitting progress events.
///
/// Backed by a `tokio::sync::broadcast` channel so multiple listeners can
/// subscribe independently. When no listener exists, `send()` returns an
/// error which we silently ignore (zero cost when nobody's watching).
pub type ProgressSender = tokio::sync::broadcast::Sender<ScrapeEvent>;

/// Receiver handle for consuming progress events.
pub type ProgressReceiver = tokio::sync::broadcast::Receiver<ScrapeEvent>;

/// Create a new progress broadcast channel with a bounded buffer.
///
/// 256 events is enough headroom for a long scroll session (one event per
/// attempt) plus the extraction pass events.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::broadcast::channel(256)
}

/// Emit a progress event, silently ignoring send errors (which occur when
/// no receivers are listening).
pub fn emit(tx: &Option<ProgressSender>, seq: &mut u64, kind: ScrapeEventKind) {
    if let Some(ref sender) = tx {
        *seq += 1;
        let _ = sender.send(ScrapeEvent { seq: *seq, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_roundtrip() {
        let event = ScrapeEvent {
            seq: 7,
            kind: ScrapeEventKind::ScrollPass {
                attempt: 3,
                rendered: 41,
                target: 500,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ScrollPass"));
        assert!(json.contains("41"));

        let parsed: ScrapeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.seq, 7);
    }

    #[test]
    fn test_channel_no_receivers() {
        let (tx, rx) = channel();
        drop(rx);
        // Should not panic
        emit(
            &Some(tx),
            &mut 0,
            ScrapeEventKind::Warning {
                message: "test".to_string(),
            },
        );
    }

    #[test]
    fn test_emit_none_sender_is_noop() {
        let mut seq = 0;
        emit(&None, &mut seq, ScrapeEventKind::ItemSkipped { index: 2 });
        assert_eq!(seq, 0);
    }

    #[test]
    fn test_subscribe_receive() {
        let (tx, mut rx) = channel();
        let mut seq = 0;
        emit(
            &Some(tx),
            &mut seq,
            ScrapeEventKind::FeedConfirmed {
                url: "https://example.com/company/acme/posts/".to_string(),
            },
        );
        let event = rx.try_recv().unwrap();
        assert_eq!(event.seq, 1);
        match event.kind {
            ScrapeEventKind::FeedConfirmed { url } => assert!(url.contains("acme")),
            _ => panic!("wrong event"),
        }
    }
}
