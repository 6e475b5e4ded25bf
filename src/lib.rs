//! skillcheck - integration-test harness for voice skills
//!
//! This library loads declarative test suites from YAML files, runs each
//! utterance through the `ask simulate` command line, and compares the
//! caption the skill answers with against the expectation.

pub mod cli;
pub mod commands;
pub mod common;
pub mod simulator;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use simulator::{Simulate, SimulateSkillResponse, SimulationClient};
pub use testing::{TestCase, TestSuite};
