//! Configuration file handling
//!
//! Settings are layered: built-in defaults, then `config.toml`, then
//! environment variables and command-line flags (both arrive here as
//! [`SimulatorOverrides`] from clap).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Simulator invocation settings
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Fixture discovery settings
    #[serde(default)]
    pub fixtures: FixturesConfig,
}

/// Settings for the external simulator command
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Program to execute (looked up on PATH unless it is a path)
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Locale passed as `--locale`
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Deployment stage passed as `--stage`
    #[serde(default = "default_stage")]
    pub stage: String,

    /// Credential profile passed as `--profile`
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Skill identifier passed as `--skill-id`
    #[serde(default)]
    pub skill_id: String,

    /// Seconds to wait for one simulation; 0 waits forever
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Wrap the utterance in literal double quotes before passing `--text`
    #[serde(default = "default_quote_text")]
    pub quote_text: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            locale: default_locale(),
            stage: default_stage(),
            profile: default_profile(),
            skill_id: String::new(),
            timeout_secs: default_timeout(),
            quote_text: default_quote_text(),
        }
    }
}

fn default_binary() -> String {
    "ask".to_string()
}
fn default_locale() -> String {
    "en-US".to_string()
}
fn default_stage() -> String {
    "development".to_string()
}
fn default_profile() -> String {
    "default".to_string()
}
fn default_timeout() -> u64 {
    120
}
fn default_quote_text() -> bool {
    true
}

/// What to do when two fixture files declare the same suite name
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail fixture loading
    #[default]
    Reject,
    /// Keep the file that sorts last by path
    LastWins,
}

/// Fixture discovery settings
#[derive(Debug, Deserialize)]
pub struct FixturesConfig {
    /// Directory holding one YAML suite per file
    #[serde(default = "default_fixtures_dir")]
    pub dir: PathBuf,

    /// Collision policy for suite names
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            dir: default_fixtures_dir(),
            on_duplicate: DuplicatePolicy::default(),
        }
    }
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("fixtures")
}

/// Values supplied on the command line or through the environment
///
/// `None` leaves the configured value untouched.
#[derive(Debug, Default, Clone)]
pub struct SimulatorOverrides {
    pub binary: Option<String>,
    pub locale: Option<String>,
    pub stage: Option<String>,
    pub profile: Option<String>,
    pub skill_id: Option<String>,
    pub timeout_secs: Option<u64>,
    pub no_quote_text: bool,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// read if present, otherwise built-in defaults are returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Apply command-line and environment overrides on top of the file values
    pub fn apply_overrides(&mut self, overrides: SimulatorOverrides) {
        let sim = &mut self.simulator;
        if let Some(binary) = overrides.binary {
            sim.binary = binary;
        }
        if let Some(locale) = overrides.locale {
            sim.locale = locale;
        }
        if let Some(stage) = overrides.stage {
            sim.stage = stage;
        }
        if let Some(profile) = overrides.profile {
            sim.profile = profile;
        }
        if let Some(skill_id) = overrides.skill_id {
            sim.skill_id = skill_id;
        }
        if let Some(timeout) = overrides.timeout_secs {
            sim.timeout_secs = timeout;
        }
        if overrides.no_quote_text {
            sim.quote_text = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.simulator.binary, "ask");
        assert_eq!(config.simulator.locale, "en-US");
        assert_eq!(config.simulator.stage, "development");
        assert_eq!(config.simulator.profile, "default");
        assert!(config.simulator.skill_id.is_empty());
        assert!(config.simulator.quote_text);
        assert_eq!(config.fixtures.dir, PathBuf::from("fixtures"));
        assert_eq!(config.fixtures.on_duplicate, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(
            r#"
[simulator]
skill_id = "amzn1.ask.skill.abc"
stage = "live"
timeout_secs = 0

[fixtures]
dir = "suites"
on_duplicate = "last_wins"
"#,
        )
        .unwrap();

        assert_eq!(config.simulator.skill_id, "amzn1.ask.skill.abc");
        assert_eq!(config.simulator.stage, "live");
        assert_eq!(config.simulator.timeout_secs, 0);
        assert_eq!(config.simulator.locale, "en-US");
        assert_eq!(config.fixtures.dir, PathBuf::from("suites"));
        assert_eq!(config.fixtures.on_duplicate, DuplicatePolicy::LastWins);
    }

    #[test]
    fn test_parse_rejects_bad_policy() {
        let err = Config::parse("[fixtures]\non_duplicate = \"first_wins\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config =
            Config::parse("[simulator]\nskill_id = \"from-file\"\nlocale = \"de-DE\"\n")
                .unwrap();
        config.apply_overrides(SimulatorOverrides {
            skill_id: Some("from-flag".to_string()),
            timeout_secs: Some(5),
            no_quote_text: true,
            ..Default::default()
        });

        assert_eq!(config.simulator.skill_id, "from-flag");
        assert_eq!(config.simulator.locale, "de-DE");
        assert_eq!(config.simulator.timeout_secs, 5);
        assert!(!config.simulator.quote_text);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/skillcheck.toml"))).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
