//! Sequential install pipeline: `Fetching -> Verifying -> Installing -> Testing`.
//!
//! One invocation drives one recipe, owns its own archive buffer, and
//! touches only its own destination paths. No stage is re-entered; the
//! first failure transitions to `Failed` with the stage and cause recorded.
//! Cancellation mid-install is not supported: once the installer starts
//! writing, the invocation either completes or reports
//! `Failed(Installing, ..)`.

use crate::caveat::CaveatSink;
use crate::fetch::{self, ArtifactSource, FetchError, IntegrityError};
use crate::harness::{self, TestReport, VerificationError};
use crate::install::{self, InstallError, InstallRoot, InstallState};
use crate::recipe::Recipe;
use std::fmt;
use thiserror::Error;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Verifying,
    Installing,
    Testing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Verifying => "verifying",
            Stage::Installing => "installing",
            Stage::Testing => "testing",
        };
        f.write_str(name)
    }
}

/// Everything that can sink a pipeline run, by stage taxonomy.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error("integrity: {0}")]
    Integrity(#[from] IntegrityError),
    #[error("install: {0}")]
    Install(#[from] InstallError),
    #[error("verification: {0}")]
    Verification(#[from] VerificationError),
}

/// A failed run: which stage sank it and why.
#[derive(Debug)]
pub struct PipelineFailure {
    pub stage: Stage,
    pub error: PipelineError,
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed while {}: {}", self.stage, self.error)
    }
}

impl std::error::Error for PipelineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A completed run: the resulting install state, with every check passed.
#[derive(Debug)]
pub struct PipelineSuccess {
    pub state: InstallState,
    pub checks_run: usize,
}

fn fail(stage: Stage, error: impl Into<PipelineError>) -> PipelineFailure {
    let failure = PipelineFailure {
        stage,
        error: error.into(),
    };
    tracing::warn!(stage = %failure.stage, "pipeline failed: {}", failure.error);
    failure
}

/// Run one recipe through the full pipeline against `root`.
///
/// The caveat, if any, is emitted exactly once, right after the install
/// stage succeeds — a later verification failure does not retract it, and
/// no caveat is shown when fetch, verify, or install fails.
pub fn run(
    recipe: &Recipe,
    source: &dyn ArtifactSource,
    root: &InstallRoot,
    caveats: &mut dyn CaveatSink,
) -> Result<PipelineSuccess, PipelineFailure> {
    let url = recipe.archive_url();
    tracing::info!(package = %recipe.name, version = %recipe.version, url, "install started");

    // Fetching: the archive lands in a buffer owned by this invocation.
    let archive = source
        .fetch(&url)
        .map_err(|e| fail(Stage::Fetching, e))?;

    // Verifying: digest gate first; nothing is extracted or written until
    // the archive proves out.
    fetch::verify_digest(&archive, &recipe.sha256).map_err(|e| fail(Stage::Verifying, e))?;
    let contents = fetch::unpack(&archive)
        .map_err(|e| fail(Stage::Verifying, FetchError::from(e)))?;

    // Installing.
    let state =
        install::install(&contents, recipe, root).map_err(|e| fail(Stage::Installing, e))?;

    if let Some(text) = &recipe.caveat {
        caveats.emit(text);
    }

    // Testing: every check runs; failures are reported together and do not
    // undo the install.
    let report = match &state.binary_path {
        Some(binary) => harness::run_battery(binary, &recipe.checks),
        None if recipe.checks.is_empty() => TestReport::AllPassed,
        None => {
            let failures = recipe
                .checks
                .iter()
                .map(|c| harness::FailedCheck {
                    label: c.label.clone(),
                    expected: c.expect.clone(),
                    actual: "recipe installed no executable to check".into(),
                })
                .collect();
            TestReport::Failed(failures)
        }
    };

    match report {
        TestReport::AllPassed => {
            tracing::info!(package = %recipe.name, version = %recipe.version, "install succeeded");
            Ok(PipelineSuccess {
                state,
                checks_run: recipe.checks.len(),
            })
        }
        TestReport::Failed(failures) => Err(fail(
            Stage::Testing,
            VerificationError { failures },
        )),
    }
}
