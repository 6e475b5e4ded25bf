//! Simulation client
//!
//! Wraps the `ask simulate` command line. Each call spawns a fresh process,
//! waits for it (optionally bounded by a timeout) and extracts the response
//! from its standard output.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command as TokioCommand;

use crate::common::{Error, Result, SimulatorConfig};

use super::response::{parse_output, SimulateSkillResponse};

/// Anything that can run one utterance through the skill
#[async_trait]
pub trait Simulate: Send + Sync {
    /// Simulate a single utterance and return the extracted outcome
    async fn simulate(&self, text: &str) -> Result<SimulateSkillResponse>;
}

/// Client for the external simulator CLI
#[derive(Debug, Clone)]
pub struct SimulationClient {
    config: SimulatorConfig,
}

impl SimulationClient {
    /// Create a client, validating that every required setting is present
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        let required = [
            ("locale", &config.locale),
            ("stage", &config.stage),
            ("profile", &config.profile),
            ("skill_id", &config.skill_id),
            ("binary", &config.binary),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::MissingConfig(field));
            }
        }

        tracing::info!(
            locale = %config.locale,
            stage = %config.stage,
            profile = %config.profile,
            skill_id = %config.skill_id,
            "Creating skill simulation client"
        );

        Ok(Self { config })
    }

    /// Arguments passed to the simulator for `text`
    pub fn command_args(&self, text: &str) -> Vec<String> {
        let text = if self.config.quote_text {
            format!("\"{text}\"")
        } else {
            text.to_string()
        };

        vec![
            "simulate".to_string(),
            "--locale".to_string(),
            self.config.locale.clone(),
            "--stage".to_string(),
            self.config.stage.clone(),
            "--profile".to_string(),
            self.config.profile.clone(),
            "--skill-id".to_string(),
            self.config.skill_id.clone(),
            "--text".to_string(),
            text,
        ]
    }

    /// Run the simulator and collect its exit code and output streams
    async fn run_process(&self, text: &str) -> Result<std::process::Output> {
        let binary = &self.config.binary;
        let program = which::which(binary).map_err(|e| {
            Error::launch(
                binary,
                std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
            )
        })?;

        let child = TokioCommand::new(&program)
            .args(self.command_args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::launch(binary, e))?;

        tracing::debug!(program = %program.display(), pid = ?child.id(), text, "Spawned simulator");

        // wait_with_output drains stdout and stderr while waiting, and the
        // child is killed if the future is dropped on timeout.
        let output = if self.config.timeout_secs > 0 {
            let limit = Duration::from_secs(self.config.timeout_secs);
            match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(text, secs = self.config.timeout_secs, "Simulator timed out");
                    return Err(Error::SimulatorTimeout(self.config.timeout_secs));
                }
            }
        } else {
            child.wait_with_output().await
        };

        output.map_err(|e| Error::launch(binary, e))
    }
}

#[async_trait]
impl Simulate for SimulationClient {
    async fn simulate(&self, text: &str) -> Result<SimulateSkillResponse> {
        let output = self.run_process(text).await?;

        if !output.status.success() {
            return Err(Error::SimulatorFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (response, extraction) = parse_output(&stdout)?;
        tracing::debug!(
            status = %response.status,
            caption = %response.result,
            ?extraction,
            "Simulation finished"
        );
        Ok(response)
    }
}
