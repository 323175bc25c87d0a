mod session;

pub use session::*;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::domain::DEFAULT_CURRENCY_SYMBOL;

/// Expense Tracker - record, total and filter expenses for one session
#[derive(Parser)]
#[command(name = "expense-tracker")]
#[command(about = "An in-memory expense tracker. Type `help` once running to list commands.")]
#[command(version)]
pub struct Cli {
    /// Currency symbol shown in front of amounts
    #[arg(short, long, env = "EXPENSE_TRACKER_CURRENCY", default_value = DEFAULT_CURRENCY_SYMBOL)]
    pub currency: String,

    /// Read session commands from a file instead of stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not print a prompt before each command
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose)?;

        let settings = SessionSettings {
            currency: self.currency,
            prompt: !self.quiet && self.script.is_none() && io::stdin().is_terminal(),
        };
        let mut session = Session::new(settings);

        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.script {
            Some(path) => {
                let file = File::open(&path)
                    .with_context(|| format!("Cannot open script '{}'", path.display()))?;
                session.run(BufReader::new(file), &mut out)?;
            }
            None => {
                let stdin = io::stdin();
                session.run(stdin.lock(), &mut out)?;
            }
        }

        Ok(())
    }
}

/// Log to stderr so stdout carries only session output. `RUST_LOG` is honoured;
/// `--verbose` forces debug output for this crate.
fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive("expense_tracker=debug".parse()?)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("expense_tracker=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Cannot initialise logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["expense-tracker"]).unwrap();
        assert!(cli.script.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_flags() {
        let cli =
            Cli::try_parse_from(["expense-tracker", "-c", "$", "--script", "cmds.txt", "-q"])
                .unwrap();
        assert_eq!(cli.currency, "$");
        assert_eq!(cli.script, Some(PathBuf::from("cmds.txt")));
        assert!(cli.quiet);
    }
}
