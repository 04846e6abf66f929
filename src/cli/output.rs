//! Output-mode helpers shared by all subcommands.
//!
//! The global `--json` and `--quiet` flags are mirrored into environment
//! variables by `main` so any module can check them without threading
//! flags through every call.

/// Whether machine-readable JSON output was requested.
pub fn is_json() -> bool {
    std::env::var("TRAWL_JSON").is_ok()
}

/// Whether non-essential output is suppressed.
pub fn is_quiet() -> bool {
    std::env::var("TRAWL_QUIET").is_ok()
}

/// Print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    println!("{value}");
}
