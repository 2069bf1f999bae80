use std::fs::File;
use std::io::{BufReader, IsTerminal, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::application::{ExpenseService, parse_amount};

mod session;

pub use session::*;

/// Expensa - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "expensa")]
#[command(about = "Track expenses for one session and summarize them by category, month and day")]
#[command(version)]
pub struct Cli {
    /// Budget limit for the session (e.g., "5000" or "5000.00")
    #[arg(short, long)]
    pub budget: Option<String>,

    /// Currency symbol used when displaying totals
    #[arg(short, long, default_value = "₹")]
    pub currency: String,

    /// Read commands from a file instead of standard input
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Install the global log subscriber. Logs go to stderr so they never mix
/// with exported data.
/// Priority: RUST_LOG env var > --verbose flag > default (warn)
pub fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose);

        let service = match &self.budget {
            Some(budget) => {
                let limit = parse_amount(budget)
                    .with_context(|| format!("Invalid budget '{}'. Use '5000.00' or '5000'", budget))?;
                ExpenseService::with_budget(limit)
            }
            None => ExpenseService::new(),
        };

        let mut session = Session::new(service, self.currency, stdout().lock());

        match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open script: {}", path.display()))?;
                session.run(BufReader::new(file), false)
            }
            None => {
                let input = stdin();
                let interactive = input.is_terminal();
                session.run(input.lock(), interactive)
            }
        }
    }
}
