//! Skill test suites
//!
//! Loads YAML suites from a fixture directory and runs their cases against
//! the simulator, asserting on the extracted caption rather than on raw
//! command output.

pub mod runner;
pub mod suite;

pub use runner::{
    check_case, run_suite, run_suites, CaseOutcome, RunOptions, RunSummary, SuiteReport,
};
pub use suite::{
    load_suite_file, load_suites, parse_suite, LoadedSuite, SuiteSet, TestCase, TestSuite,
};
