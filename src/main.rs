//! skillcheck - integration tests for voice skills
//!
//! Replays YAML utterance suites through the `ask simulate` command line and
//! checks the captions the skill answers with.

use std::path::PathBuf;

use clap::Parser;
use skillcheck::cli::{self, GlobalOptions};
use skillcheck::commands::Commands;
use skillcheck::common::logging;

#[derive(Parser)]
#[command(name = "skillcheck", about = "Integration-test harness for voice skills")]
#[command(version, long_about = None)]
struct Cli {
    /// Config file (default: platform config dir/skillcheck/config.toml)
    #[arg(long, global = true, env = "SKILLCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    let global = GlobalOptions {
        config: cli.config,
        verbose: cli.verbose,
    };

    match cli::dispatch(cli.command, global).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
