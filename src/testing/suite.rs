//! Test suite fixtures
//!
//! Defines the data structures for deserializing YAML test suites and the
//! loader that collects every suite file in a directory.
//!
//! A suite file looks like:
//!
//! ```yaml
//! name: greetings
//! testCases:
//!   - input: open hello world
//!     output: Hello world
//! ```

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::path::{Path, PathBuf};

use crate::common::{DuplicatePolicy, Error, Result};

/// A named list of utterances and their expected captions
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestSuite {
    /// Name of the suite, unique within a fixture directory
    pub name: String,
    /// Cases in execution order
    pub test_cases: Vec<TestCase>,
}

/// One utterance and the caption the skill should answer with
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Utterance text sent to the simulator
    pub input: String,
    /// Expected caption
    pub output: String,
}

/// A loaded suite together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedSuite {
    pub suite: TestSuite,
    pub source: PathBuf,
}

/// Suites keyed by name
#[derive(Debug, Default)]
pub struct SuiteSet {
    suites: BTreeMap<String, LoadedSuite>,
}

impl SuiteSet {
    /// Number of suites
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Look up a suite by name
    pub fn get(&self, name: &str) -> Option<&LoadedSuite> {
        self.suites.get(name)
    }

    /// Iterate suites in name order
    pub fn iter(&self) -> impl Iterator<Item = &LoadedSuite> {
        self.suites.values()
    }

    /// Insert a suite, resolving name collisions with `policy`
    pub fn insert(&mut self, loaded: LoadedSuite, policy: DuplicatePolicy) -> Result<()> {
        match self.suites.entry(loaded.suite.name.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(loaded);
            }
            btree_map::Entry::Occupied(mut slot) => match policy {
                DuplicatePolicy::Reject => {
                    return Err(Error::DuplicateSuite {
                        name: loaded.suite.name,
                        first: slot.get().source.clone(),
                        second: loaded.source,
                    });
                }
                DuplicatePolicy::LastWins => {
                    tracing::warn!(
                        suite = %loaded.suite.name,
                        replaced = %slot.get().source.display(),
                        by = %loaded.source.display(),
                        "Duplicate suite name, keeping the later file"
                    );
                    slot.insert(loaded);
                }
            },
        }
        Ok(())
    }

    /// Keep only the named suites
    ///
    /// An empty selection keeps everything. Every requested name must exist.
    pub fn select(mut self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }
        let mut selected = BTreeMap::new();
        for name in names {
            let loaded = self
                .suites
                .remove(name)
                .or_else(|| selected.get(name).cloned())
                .ok_or_else(|| Error::SuiteNotFound(name.clone()))?;
            selected.insert(name.clone(), loaded);
        }
        Ok(Self { suites: selected })
    }
}

impl IntoIterator for SuiteSet {
    type Item = LoadedSuite;
    type IntoIter = btree_map::IntoValues<String, LoadedSuite>;

    fn into_iter(self) -> Self::IntoIter {
        self.suites.into_values()
    }
}

/// Parse one YAML document into a suite
pub fn parse_suite(content: &str) -> std::result::Result<TestSuite, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Read and parse a single suite file
pub fn load_suite_file(path: &Path) -> Result<TestSuite> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::fixture_io(path, e))?;
    parse_suite(&content).map_err(|e| Error::FixtureParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load every suite file directly inside `dir`
///
/// Files are visited in path order; subdirectories, and symlinks that
/// resolve to one, are skipped. Any read or parse failure aborts the whole
/// load.
pub fn load_suites(dir: &Path, policy: DuplicatePolicy) -> Result<SuiteSet> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::fixture_io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::fixture_io(dir, e))?;
        let path = entry.path();
        // fs::metadata follows symlinks, DirEntry::file_type does not
        let metadata = std::fs::metadata(&path).map_err(|e| Error::fixture_io(&path, e))?;
        if metadata.is_dir() {
            tracing::debug!(path = %path.display(), "Skipping subdirectory");
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    let mut set = SuiteSet::default();
    for path in paths {
        let suite = load_suite_file(&path)?;
        tracing::debug!(
            suite = %suite.name,
            cases = suite.test_cases.len(),
            path = %path.display(),
            "Loaded test suite"
        );
        set.insert(LoadedSuite { suite, source: path }, policy)?;
    }

    tracing::info!(count = set.len(), dir = %dir.display(), "Collected test suites");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GREETINGS: &str = r#"
name: greetings
testCases:
  - input: open hello world
    output: Hello world
  - input: say goodbye
    output: Goodbye!
"#;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_parse_suite_keeps_order_and_text() {
        let suite = parse_suite(GREETINGS).unwrap();
        assert_eq!(suite.name, "greetings");
        assert_eq!(suite.test_cases.len(), 2);
        assert_eq!(suite.test_cases[0].input, "open hello world");
        assert_eq!(suite.test_cases[0].output, "Hello world");
        assert_eq!(suite.test_cases[1].output, "Goodbye!");
    }

    #[test]
    fn test_parse_suite_requires_test_cases() {
        assert!(parse_suite("name: empty\n").is_err());
        assert!(parse_suite("name: x\ntestCases:\n  - input: only input\n").is_err());
    }

    #[test]
    fn test_load_one_suite_per_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "greetings.yaml", GREETINGS);
        write(
            dir.path(),
            "weather.yml",
            "name: weather\ntestCases:\n  - input: weather today\n    output: Sunny\n",
        );
        fs::create_dir(dir.path().join("nested")).unwrap();

        let set = load_suites(dir.path(), DuplicatePolicy::Reject).unwrap();
        assert_eq!(set.len(), 2);
        let names: Vec<_> = set.iter().map(|l| l.suite.name.as_str()).collect();
        assert_eq!(names, ["greetings", "weather"]);
        assert_eq!(
            set.get("weather").unwrap().source,
            dir.path().join("weather.yml")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let shared = tempfile::tempdir().unwrap();
        write(shared.path(), "other.yaml", GREETINGS);
        write(dir.path(), "greetings.yaml", GREETINGS);
        std::os::unix::fs::symlink(shared.path(), dir.path().join("shared")).unwrap();

        let set = load_suites(dir.path(), DuplicatePolicy::Reject).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("greetings").unwrap().source.ends_with("greetings.yaml"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_suite_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let shared = tempfile::tempdir().unwrap();
        write(shared.path(), "greetings.yaml", GREETINGS);
        std::os::unix::fs::symlink(
            shared.path().join("greetings.yaml"),
            dir.path().join("linked.yaml"),
        )
        .unwrap();

        let set = load_suites(dir.path(), DuplicatePolicy::Reject).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("greetings").is_some());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_suites(&dir.path().join("absent"), DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::FixtureIo { .. }));
    }

    #[test]
    fn test_one_bad_file_aborts_everything() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yaml", GREETINGS);
        write(dir.path(), "b.yaml", "name: [not, a, string\n");

        match load_suites(dir.path(), DuplicatePolicy::Reject) {
            Err(Error::FixtureParse { path, .. }) => assert!(path.ends_with("b.yaml")),
            other => panic!("Expected FixtureParse, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yaml", GREETINGS);
        write(dir.path(), "b.yaml", GREETINGS);

        match load_suites(dir.path(), DuplicatePolicy::Reject) {
            Err(Error::DuplicateSuite { name, first, second }) => {
                assert_eq!(name, "greetings");
                assert!(first.ends_with("a.yaml"));
                assert!(second.ends_with("b.yaml"));
            }
            other => panic!("Expected DuplicateSuite, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yaml", GREETINGS);
        write(
            dir.path(),
            "b.yaml",
            "name: greetings\ntestCases:\n  - input: hi\n    output: Hi there\n",
        );

        let set = load_suites(dir.path(), DuplicatePolicy::LastWins).unwrap();
        assert_eq!(set.len(), 1);
        let kept = set.get("greetings").unwrap();
        assert!(kept.source.ends_with("b.yaml"));
        assert_eq!(kept.suite.test_cases.len(), 1);
    }

    #[test]
    fn test_select_filters_and_reports_unknown() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yaml", GREETINGS);
        write(dir.path(), "b.yaml", "name: weather\ntestCases: []\n");

        let set = load_suites(dir.path(), DuplicatePolicy::Reject).unwrap();
        let selected = set.select(&["weather".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert!(selected.get("weather").is_some());

        let set = load_suites(dir.path(), DuplicatePolicy::Reject).unwrap();
        let err = set.select(&["nope".to_string()]).unwrap_err();
        assert!(matches!(err, Error::SuiteNotFound(name) if name == "nope"));
    }
}
