//! Common utilities shared by the loader, simulator and CLI

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use config::{Config, DuplicatePolicy, FixturesConfig, SimulatorConfig, SimulatorOverrides};
pub use error::{Error, Result};
