//! Error Dojo - interactive error handling practice tool
//!
//! Runs failure-prone drills, catches every failure, and accumulates them in
//! a session-scoped log that can be viewed and exported as CSV.

mod output;
mod repl;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "dojo")]
#[command(about = "エラー処理の練習 - safe drills over failure-prone operations", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose diagnostics on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive practice session (default)
    Practice,

    /// Write the demonstration table (sample.csv) to disk
    Sample {
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("dojo v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Commands::Practice) {
        Commands::Practice => repl::run(),
        Commands::Sample { out } => write_sample(&out),
    }
}

/// The demonstration table is unconditional: unlike the error log it is
/// never gated on session state.
fn write_sample(dir: &Path) -> Result<()> {
    let path = dir.join(dojo_common::SAMPLE_FILENAME);
    std::fs::write(&path, dojo_common::sample_csv())
        .with_context(|| format!("サンプルを書き込めません: {}", path.display()))?;
    println!("{} を保存しました", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_lands_in_the_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path()).unwrap();

        let bytes = std::fs::read(dir.path().join("sample.csv")).unwrap();
        assert!(bytes.starts_with(&dojo_common::UTF8_BOM));
    }

    #[test]
    fn sample_into_missing_directory_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = write_sample(&missing).unwrap_err();
        assert!(err.to_string().contains("sample.csv"));
    }
}
