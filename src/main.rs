#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result
    )
)]

use clap::Parser;
use color_eyre::eyre::Result;
use std::path::PathBuf;
use todosync::logging::{init_logging, LogConfig};
use todosync::{
    bootstrap_config, discover_repo_root, load_config, run_sync, scan_todos, LinearClient,
    RipgrepScanner, STATE_FILENAME,
};
use tracing::info;

/// todosync - keep Linear in sync with the TODO markers in a git repository
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scan and print canonical TODO titles without touching the tracker or
    /// the sync state
    #[arg(long)]
    dry_run: bool,

    /// Directory inside the repository to sync (defaults to the current
    /// directory)
    #[arg(long, env = "TODOSYNC_REPO")]
    repo: Option<PathBuf>,

    /// Enable JSON log format (for log aggregation)
    #[arg(long, env = "TODOSYNC_LOG_JSON", default_value = "false")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&LogConfig {
        json_format: args.log_json,
        ..LogConfig::default()
    });

    let start = match args.repo {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let root = discover_repo_root(&start)?;
    info!(root = %root.display(), "Resolved repository root");

    let scanner = RipgrepScanner;

    if args.dry_run {
        for item in scan_todos(&root, &scanner)? {
            println!("{}:{}: {}", item.path, item.line, item.title);
        }
        return Ok(());
    }

    let config = match load_config()? {
        Some(config) => config,
        None => {
            // First run: set up credentials, then stop so the operator can
            // gitignore the state file before anything is created.
            bootstrap_config().await?;
            println!("Make sure you add `{STATE_FILENAME}` to your global gitignore!");
            println!("Run again to process TODOs");
            return Ok(());
        }
    };

    let tracker = LinearClient::new(config.api_key.clone());
    let report = run_sync(&root, &scanner, &tracker, &config).await?;

    if report.parent_created {
        println!("Created umbrella issue for this repository");
    }
    println!(
        "TODOs updated and saved to {STATE_FILENAME} ({} created, {} resolved, {} unchanged)",
        report.created, report.resolved, report.matched
    );
    Ok(())
}
