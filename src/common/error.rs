//! Error types for skillcheck
//!
//! Messages are written to be actionable from a terminal: they name the file,
//! flag or environment variable to look at.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for skillcheck
#[derive(Error, Debug)]
pub enum Error {
    // === Fixture Errors ===
    #[error("Failed to read fixtures at '{}': {source}", path.display())]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid test suite '{}': {message}", path.display())]
    FixtureParse { path: PathBuf, message: String },

    #[error(
        "Test suite '{name}' is defined twice: '{}' and '{}'",
        first.display(),
        second.display()
    )]
    DuplicateSuite {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Test suite '{0}' not found. Use 'skillcheck list' to see available suites")]
    SuiteNotFound(String),

    // === Simulator Errors ===
    #[error("Missing simulator setting '{0}'. Pass it as a flag, environment variable or in config.toml")]
    MissingConfig(&'static str),

    #[error("Failed to run simulator '{program}': {source}")]
    SimulatorLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed while simulating skill with exit code: {code}\n{stderr}")]
    SimulatorFailed { code: i32, stderr: String },

    #[error("Simulator did not finish within {0} seconds")]
    SimulatorTimeout(u64),

    #[error("Missing required fields in response. Expected (status, caption), missing {missing}\n{output}")]
    MalformedResponse {
        missing: &'static str,
        output: String,
    },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a fixture I/O error for the given path
    pub fn fixture_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FixtureIo {
            path: path.into(),
            source,
        }
    }

    /// Create a simulator launch error
    pub fn launch(program: &str, source: io::Error) -> Self {
        Self::SimulatorLaunch {
            program: program.to_string(),
            source,
        }
    }
}
