//! Verifier harness: post-install check battery.
//!
//! Runs every configured check against the installed binary and reports all
//! failures at once; a failing check never short-circuits the rest. Each
//! check's expected substring is the recipe's explicit literal, compared
//! against the command's combined stdout+stderr.

use crate::recipe::Check;
use std::fmt;
use std::path::Path;
use std::process::Command;

/// One assertion that did not hold, with the expected and observed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCheck {
    pub label: String,
    pub expected: String,
    pub actual: String,
}

/// Outcome of the battery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestReport {
    AllPassed,
    Failed(Vec<FailedCheck>),
}

impl TestReport {
    pub fn passed(&self) -> bool {
        matches!(self, TestReport::AllPassed)
    }
}

/// Post-install assertion failures, carried as the pipeline's `Testing`
/// stage error. Does not roll back the install: by the time the harness
/// runs, files are already in place.
#[derive(Debug)]
pub struct VerificationError {
    pub failures: Vec<FailedCheck>,
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} check(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(
                f,
                " [{}: expected {:?} in output, got {:?}]",
                failure.label, failure.expected, failure.actual
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for VerificationError {}

fn run_check(binary: &Path, check: &Check) -> Option<FailedCheck> {
    let output = match Command::new(binary).args(&check.args).output() {
        Ok(out) => out,
        Err(e) => {
            return Some(FailedCheck {
                label: check.label.clone(),
                expected: check.expect.clone(),
                actual: format!("failed to run {}: {e}", binary.display()),
            })
        }
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if combined.contains(&check.expect) {
        None
    } else {
        Some(FailedCheck {
            label: check.label.clone(),
            expected: check.expect.clone(),
            actual: combined.trim_end().to_string(),
        })
    }
}

/// Run every check against the installed binary. Independent checks: all
/// run, all failures are reported.
pub fn run_battery(binary: &Path, checks: &[Check]) -> TestReport {
    let failures: Vec<FailedCheck> = checks
        .iter()
        .filter_map(|check| {
            let failure = run_check(binary, check);
            match &failure {
                None => tracing::debug!(label = %check.label, "check passed"),
                Some(f) => {
                    tracing::warn!(label = %f.label, expected = %f.expected, "check failed")
                }
            }
            failure
        })
        .collect();

    if failures.is_empty() {
        TestReport::AllPassed
    } else {
        TestReport::Failed(failures)
    }
}
