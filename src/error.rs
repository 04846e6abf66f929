//! Fatal error taxonomy.
//!
//! Only two classes of failure abort a run: not being able to reach the
//! external browser session, and not being on the expected feed page.
//! Everything below that granularity (a probe that does not match, a stale
//! node, an item with no body) is absorbed where it happens and degrades
//! the output instead of failing it.

use thiserror::Error;

/// Errors that terminate a run before or instead of extraction.
#[derive(Debug, Error)]
pub enum TrawlError {
    /// The CDP endpoint did not answer or did not expose a debugger URL.
    #[error("browser unreachable at {endpoint}: {reason}")]
    BrowserUnreachable { endpoint: String, reason: String },

    /// The connected browser has no open page to attach to.
    #[error("no open tab in the connected browser")]
    NoOpenTab,

    /// Precondition failure: the active tab is not the expected feed page.
    #[error("active tab is not a feed page (url: {url}, expected marker: {marker})")]
    NotOnFeedPage { url: String, marker: String },

    /// Configuration-integrity failure: a field has no probes to try.
    #[error("probe table has an empty candidate list for field {field}")]
    EmptyProbeList { field: &'static str },
}
