// Copyright 2026 Trawl Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use trawl::cli;
use trawl::config::ScrapeConfig;

#[derive(Parser)]
#[command(
    name = "trawl",
    about = "Trawl — resilient feed extraction from a live browser session",
    version,
    after_help = "Run 'trawl <command> --help' for details on each command.\nThe browser must already be running with --remote-debugging-port and logged in."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach to the running browser and extract feed posts
    Scrape {
        /// CDP endpoint of the running browser
        #[arg(long, default_value = "http://127.0.0.1:9222")]
        cdp: String,
        /// URL substring identifying the expected feed page
        #[arg(long, default_value = "linkedin.com/company/")]
        marker: String,
        /// Stop scrolling once this many items are rendered
        #[arg(long, default_value_t = 500)]
        target: usize,
        /// Pause after each scroll, seconds
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [1.0, 2.0])]
        scroll_pause: Vec<f64>,
        /// Magnitude of each scroll, pixels
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [500, 1200])]
        scroll_step: Vec<i64>,
        /// Give up loading after this many scroll attempts
        #[arg(long, default_value_t = 200)]
        max_scroll_attempts: u32,
        /// Probability of an extra reading pause after a scroll
        #[arg(long, default_value_t = 0.2)]
        burst_chance: f64,
        /// Length of the reading pause, seconds
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [0.5, 1.5])]
        burst_pause: Vec<f64>,
        /// Extraction passes to attempt before settling for no data
        #[arg(long, default_value_t = 5)]
        retry_passes: u32,
        /// Pause between failed extraction passes, seconds
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [3.0, 5.0])]
        retry_backoff: Vec<f64>,
        /// Pre-run pause letting the session settle, seconds
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [5.0, 8.0])]
        settle: Vec<f64>,
        /// Output directory for datasets
        #[arg(long, default_value = "feed_data")]
        out: PathBuf,
    },
    /// Check endpoint and environment readiness
    Doctor {
        /// CDP endpoint of the running browser
        #[arg(long, default_value = "http://127.0.0.1:9222")]
        cdp: String,
        /// Output directory to verify
        #[arg(long, default_value = "feed_data")]
        out: PathBuf,
    },
    /// Decode an item identifier into permalink and estimated upload time
    Decode {
        /// Raw identifier, e.g. "urn:li:activity:123456789012345"
        identifier: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn pair_f64(values: &[f64]) -> (f64, f64) {
    (values[0], values[1])
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Mirror global flags into environment variables so all modules can
    // check them without threading flags everywhere.
    if cli.json {
        std::env::set_var("TRAWL_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("TRAWL_QUIET", "1");
    }

    let default_filter = if cli.verbose { "trawl=debug" } else { "trawl=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Scrape {
            cdp,
            marker,
            target,
            scroll_pause,
            scroll_step,
            max_scroll_attempts,
            burst_chance,
            burst_pause,
            retry_passes,
            retry_backoff,
            settle,
            out,
        } => {
            let cfg = ScrapeConfig {
                target_items: target,
                scroll_pause: pair_f64(&scroll_pause),
                scroll_step: (scroll_step[0], scroll_step[1]),
                max_scroll_attempts,
                burst_chance,
                burst_pause: pair_f64(&burst_pause),
                retry_passes,
                retry_backoff: pair_f64(&retry_backoff),
                settle_delay: pair_f64(&settle),
            };
            cli::scrape_cmd::run(&cdp, &marker, &out, cfg).await
        }
        Commands::Doctor { cdp, out } => cli::doctor::run(&cdp, &out).await,
        Commands::Decode { identifier } => cli::decode_cmd::run(&identifier),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "trawl", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success (including a no-data run), 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
