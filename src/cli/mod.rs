//! CLI command handling
//!
//! Loads configuration, builds the simulation client and formats output.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::commands::{Commands, FixtureArgs};
use crate::common::{Config, Result};
use crate::simulator::{Simulate, SimulationClient};
use crate::testing::{self, RunOptions, SuiteSet};

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Verbose output
    pub verbose: bool,
}

/// Dispatch a CLI command
///
/// Returns `Ok(false)` when the command ran but tests did not pass.
pub async fn dispatch(command: Commands, global: GlobalOptions) -> Result<bool> {
    let mut config = Config::load(global.config.as_deref())?;

    match command {
        Commands::Run {
            fixtures,
            suites,
            fail_fast,
            json,
            simulator,
        } => {
            // Fixture problems abort before any simulator process is started.
            let set = load(&config, &fixtures)?.select(&suites)?;

            config.apply_overrides(simulator.into());
            let client = SimulationClient::new(config.simulator)?;

            if set.is_empty() {
                tracing::warn!("No test suites found");
            }

            let options = RunOptions {
                verbose: global.verbose,
                fail_fast,
                quiet: json,
            };
            let summary = testing::run_suites(&client, set, options).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Ok(summary.success())
        }

        Commands::List { fixtures, json } => {
            let set = load(&config, &fixtures)?;

            if json {
                let listing: Vec<_> = set
                    .iter()
                    .map(|loaded| {
                        serde_json::json!({
                            "name": loaded.suite.name,
                            "source": loaded.source,
                            "cases": loaded.suite.test_cases.len(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(true);
            }

            if set.is_empty() {
                println!("No test suites found.");
                return Ok(true);
            }

            for loaded in set.iter() {
                println!(
                    "{}  {} cases  {}",
                    loaded.suite.name.white().bold(),
                    loaded.suite.test_cases.len(),
                    loaded.source.display().to_string().dimmed()
                );
                if global.verbose {
                    for case in &loaded.suite.test_cases {
                        println!("    {} → {}", case.input, case.output.dimmed());
                    }
                }
            }
            Ok(true)
        }

        Commands::Simulate {
            text,
            json,
            simulator,
        } => {
            config.apply_overrides(simulator.into());
            let client = SimulationClient::new(config.simulator)?;
            let response = client.simulate(&text).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                let status = if response.is_successful() {
                    response.status.green()
                } else {
                    response.status.yellow()
                };
                println!("Status:  {}", status);
                println!("Caption: {}", response.result);
            }
            Ok(response.is_successful())
        }
    }
}

/// Load suites using flag values over config values
fn load(config: &Config, args: &FixtureArgs) -> Result<SuiteSet> {
    let dir: &Path = args
        .fixtures
        .as_deref()
        .unwrap_or(config.fixtures.dir.as_path());
    let policy = args.on_duplicate.unwrap_or(config.fixtures.on_duplicate);
    tracing::debug!(dir = %dir.display(), ?policy, "Loading test suites");
    testing::load_suites(dir, policy)
}
