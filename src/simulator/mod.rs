//! Skill simulation through the `ask simulate` CLI
//!
//! For now this is a wrapper around the command line tool. Responses are
//! read from the tool's stdout rather than from the skill management API.

mod client;
mod response;

pub use client::{Simulate, SimulationClient};
pub use response::{parse_output, Extraction, SimulateSkillResponse};
