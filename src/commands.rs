//! CLI command definitions
//!
//! Defines the clap commands for the skillcheck CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::common::{DuplicatePolicy, SimulatorOverrides};

#[derive(Subcommand)]
pub enum Commands {
    /// Run test suites from the fixture directory against the skill
    Run {
        #[command(flatten)]
        fixtures: FixtureArgs,

        /// Only run the named suite(s)
        /// Can be specified multiple times: --suite greetings --suite weather
        #[arg(long = "suite", short = 's')]
        suites: Vec<String>,

        /// Stop after the first suite that fails
        #[arg(long)]
        fail_fast: bool,

        /// Print the run summary as JSON instead of colored text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        simulator: SimulatorArgs,
    },

    /// List the test suites found in the fixture directory
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        fixtures: FixtureArgs,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Simulate a single utterance and print the extracted response
    Simulate {
        /// Utterance text
        text: String,

        /// Output the response as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        simulator: SimulatorArgs,
    },
}

/// Where to find suites
#[derive(Args, Debug, Default, Clone)]
pub struct FixtureArgs {
    /// Directory containing one YAML test suite per file
    #[arg(long, env = "SKILLCHECK_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    /// How to handle two files declaring the same suite name
    #[arg(long, value_enum)]
    pub on_duplicate: Option<DuplicatePolicy>,
}

/// Simulator settings that override the config file
#[derive(Args, Debug, Default, Clone)]
pub struct SimulatorArgs {
    /// Skill identifier (amzn1.ask.skill.…)
    #[arg(long, env = "SKILLCHECK_SKILL_ID")]
    pub skill_id: Option<String>,

    /// Deployment stage (development, live)
    #[arg(long, env = "SKILLCHECK_STAGE")]
    pub stage: Option<String>,

    /// Locale of the utterances (e.g. en-US)
    #[arg(long, env = "SKILLCHECK_LOCALE")]
    pub locale: Option<String>,

    /// Credential profile of the simulator CLI
    #[arg(long, env = "SKILLCHECK_PROFILE")]
    pub profile: Option<String>,

    /// Simulator program to run instead of `ask`
    #[arg(long = "ask-bin", env = "SKILLCHECK_ASK_BIN")]
    pub binary: Option<String>,

    /// Seconds to wait for one simulation (0 waits forever)
    #[arg(long, env = "SKILLCHECK_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Pass the utterance to --text without wrapping it in literal quotes
    #[arg(long)]
    pub no_quote_text: bool,
}

impl From<SimulatorArgs> for SimulatorOverrides {
    fn from(args: SimulatorArgs) -> Self {
        Self {
            binary: args.binary,
            locale: args.locale,
            stage: args.stage,
            profile: args.profile,
            skill_id: args.skill_id,
            timeout_secs: args.timeout,
            no_quote_text: args.no_quote_text,
        }
    }
}
