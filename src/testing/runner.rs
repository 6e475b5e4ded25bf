//! Test runner implementation
//!
//! Runs every case of a suite through a [`Simulate`] implementation and
//! compares captions. A caption mismatch or a non-successful status is a
//! test failure and the next case still runs; a simulator error (launch,
//! exit code, timeout, malformed output) aborts the rest of the suite.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::simulator::{Simulate, SimulateSkillResponse};

use super::suite::{LoadedSuite, TestCase};

/// Result of comparing one simulation against its expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Successful simulation with the expected caption
    Passed,
    /// Successful simulation with a different caption
    Mismatch { expected: String, actual: String },
    /// The simulation did not reach the successful status
    Unsuccessful { status: String, caption: String },
    /// The simulator could not produce a response; the suite stops here
    Error { message: String },
}

impl CaseOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }

    /// Failure description, `None` for a pass
    pub fn failure_message(&self) -> Option<String> {
        match self {
            CaseOutcome::Passed => None,
            CaseOutcome::Mismatch { expected, actual } => Some(format!(
                "expected caption '{}', got '{}'",
                expected, actual
            )),
            CaseOutcome::Unsuccessful { status, .. } => {
                Some(format!("Test case failed with status: {}", status))
            }
            CaseOutcome::Error { message } => Some(message.clone()),
        }
    }
}

/// Compare a simulation outcome with the case expectation
pub fn check_case(case: &TestCase, response: &SimulateSkillResponse) -> CaseOutcome {
    if !response.is_successful() {
        return CaseOutcome::Unsuccessful {
            status: response.status.clone(),
            caption: response.result.clone(),
        };
    }
    if response.result == case.output {
        CaseOutcome::Passed
    } else {
        CaseOutcome::Mismatch {
            expected: case.output.clone(),
            actual: response.result.clone(),
        }
    }
}

/// Report for one executed case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub input: String,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
}

/// Result of a suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub source: PathBuf,
    pub cases_total: usize,
    pub cases: Vec<CaseReport>,
    /// Simulator error that aborted the suite
    pub error: Option<String>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.error.is_none()
            && self.cases.len() == self.cases_total
            && self.cases.iter().all(|c| c.outcome.is_pass())
    }

    pub fn cases_passed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_pass()).count()
    }

    pub fn cases_failed(&self) -> usize {
        self.cases.len() - self.cases_passed()
    }
}

/// Aggregate result of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub suites: Vec<SuiteReport>,
    pub suites_passed: usize,
    pub suites_failed: usize,
    pub cases_passed: usize,
    pub cases_failed: usize,
    /// Suites left unrun because of `fail_fast`
    pub suites_skipped: usize,
}

impl RunSummary {
    /// True when at least one suite ran and none failed
    pub fn success(&self) -> bool {
        !self.suites.is_empty() && self.suites_failed == 0 && self.suites_skipped == 0
    }

    fn record(&mut self, report: SuiteReport) {
        if report.passed() {
            self.suites_passed += 1;
        } else {
            self.suites_failed += 1;
        }
        self.cases_passed += report.cases_passed();
        self.cases_failed += report.cases_failed();
        self.suites.push(report);
    }
}

/// Runner behavior switches
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print every case, not just failures
    pub verbose: bool,
    /// Stop after the first suite that does not pass
    pub fail_fast: bool,
    /// Suppress console output (used for `--json`)
    pub quiet: bool,
}

/// Run one suite, case by case
pub async fn run_suite<S>(simulator: &S, loaded: &LoadedSuite, options: RunOptions) -> SuiteReport
where
    S: Simulate + ?Sized,
{
    let suite = &loaded.suite;
    let cases_total = suite.test_cases.len();

    tracing::info!(suite = %suite.name, cases = cases_total, "Preparing to run test suite");
    if !options.quiet {
        println!(
            "\n{} {}",
            "Running Suite:".blue().bold(),
            suite.name.white().bold()
        );
        if options.verbose {
            println!("  {}", loaded.source.display().to_string().dimmed());
        }
    }

    let mut cases = Vec::with_capacity(cases_total);

    for (i, case) in suite.test_cases.iter().enumerate() {
        let case_num = i + 1;

        let response = match simulator.simulate(&case.input).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    suite = %suite.name,
                    case = case_num,
                    error = %e,
                    "Simulation failed"
                );
                if !options.quiet {
                    println!("  {} Case {}: {}", "✗".red(), case_num, case.input.dimmed());
                    println!("    {}", e.to_string().red());
                }
                cases.push(CaseReport {
                    input: case.input.clone(),
                    outcome: CaseOutcome::Error {
                        message: e.to_string(),
                    },
                });
                return SuiteReport {
                    name: suite.name.clone(),
                    source: loaded.source.clone(),
                    cases_total,
                    cases,
                    error: Some(format!("Case {} ('{}'): {}", case_num, case.input, e)),
                };
            }
        };

        let outcome = check_case(case, &response);
        if !options.quiet {
            match outcome.failure_message() {
                None => {
                    if options.verbose {
                        println!(
                            "  {} Case {}: {} → {}",
                            "✓".green(),
                            case_num,
                            case.input.dimmed(),
                            response.result.dimmed()
                        );
                    }
                }
                Some(message) => {
                    println!("  {} Case {}: {}", "✗".red(), case_num, case.input.dimmed());
                    println!("    {}", message.red());
                }
            }
        }

        cases.push(CaseReport {
            input: case.input.clone(),
            outcome,
        });
    }

    let report = SuiteReport {
        name: suite.name.clone(),
        source: loaded.source.clone(),
        cases_total,
        cases,
        error: None,
    };

    if !options.quiet {
        if report.passed() {
            println!(
                "  {} {} ({}/{})",
                "✓".green().bold(),
                "Suite Passed".green().bold(),
                report.cases_passed(),
                cases_total
            );
        } else {
            println!(
                "  {} {} ({}/{})",
                "✗".red().bold(),
                "Suite Failed".red().bold(),
                report.cases_passed(),
                cases_total
            );
        }
    }

    report
}

/// Run suites in order and collect a summary
pub async fn run_suites<S, I>(simulator: &S, suites: I, options: RunOptions) -> RunSummary
where
    S: Simulate + ?Sized,
    I: IntoIterator<Item = LoadedSuite>,
{
    let mut summary = RunSummary::default();
    let mut suites = suites.into_iter();

    while let Some(loaded) = suites.next() {
        let report = run_suite(simulator, &loaded, options).await;
        let failed = !report.passed();
        summary.record(report);

        if failed && options.fail_fast {
            summary.suites_skipped = suites.by_ref().count();
            if summary.suites_skipped > 0 {
                tracing::warn!(skipped = summary.suites_skipped, "Stopping after failed suite");
            }
            break;
        }
    }

    if !options.quiet {
        print_summary(&summary);
    }
    summary
}

fn print_summary(summary: &RunSummary) {
    let line = format!(
        "{} suites passed, {} failed; {} cases passed, {} failed",
        summary.suites_passed, summary.suites_failed, summary.cases_passed, summary.cases_failed
    );
    if summary.success() {
        println!("\n{} {}\n", "✓".green().bold(), line.green().bold());
    } else {
        println!("\n{} {}", "✗".red().bold(), line.red().bold());
        if summary.suites_skipped > 0 {
            println!("  {} suites not run (--fail-fast)", summary.suites_skipped);
        }
        println!();
    }
}
