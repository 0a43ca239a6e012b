//! Verification driver
//!
//! Orchestrates one verification run: parse and check the input through the
//! frontend, hand the selected implementation to the verifier, and, when the
//! verifier disproves it, run every returned counterexample trace through the
//! symbolic analysis pipeline (desugar calls, execute forward, resolve
//! backward) and render the result.
//!
//! The driver's exit code is the number of counterexamples, so callers can
//! distinguish "verified" from "n errors" without parsing output. Timed-out,
//! out-of-memory, and unhandled outcomes exit zero; they are reported, not
//! counted as errors.

use std::path::Path;
use symtrace_core::{
    DriverConfig, ExternalFrontend, ExternalVerifier, Frontend, FrontendError, Verifier,
    VerifierError, VerifyOutcome,
};
use symtrace_ivl::Implementation;
use symtrace_symex::{desugar_trace, execute, resolve, SymExError, TraceDumper};
use thiserror::Error;
use tracing::{error, info, warn};

/// Fatal driver failure. Per-counterexample analysis failures are not fatal;
/// they are logged and counted in [`DriverReport::skipped`].
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Frontend(#[from] FrontendError),

    #[error(transparent)]
    Verifier(#[from] VerifierError),

    /// The program has nothing to verify.
    #[error("program contains no implementations")]
    NoImplementations,

    /// The requested implementation does not exist.
    #[error("no implementation named `{0}`")]
    UnknownImplementation(String),
}

/// What one driver run produced.
#[derive(Debug)]
pub struct DriverReport {
    /// Name of the verified implementation.
    pub implementation: String,

    /// The verifier's outcome.
    pub outcome: VerifyOutcome,

    /// One rendered symbolic trace per analyzed counterexample, in the
    /// verifier's order.
    pub renderings: Vec<String>,

    /// Counterexamples whose analysis failed and was skipped.
    pub skipped: usize,

    /// Process exit code: the number of counterexamples, zero otherwise.
    pub exit_code: i32,
}

/// Verification driver over pluggable collaborators.
pub struct Driver<F, V> {
    frontend: F,
    verifier: V,
    config: DriverConfig,
    dumper: TraceDumper,
}

impl Driver<ExternalFrontend, ExternalVerifier> {
    /// Driver over the configured external executables.
    #[must_use]
    pub fn from_config(config: DriverConfig) -> Self {
        let frontend = ExternalFrontend::from_config(&config);
        let verifier = ExternalVerifier::from_config(&config);
        Self::new(frontend, verifier, config)
    }
}

impl<F: Frontend, V: Verifier> Driver<F, V> {
    /// Driver over explicit collaborators.
    #[must_use]
    pub fn new(frontend: F, verifier: V, config: DriverConfig) -> Self {
        Self {
            frontend,
            verifier,
            config,
            dumper: TraceDumper::new(),
        }
    }

    /// Replace the trace renderer.
    #[must_use]
    pub fn with_dumper(self, dumper: TraceDumper) -> Self {
        Self { dumper, ..self }
    }

    /// Run the full pipeline on the file at `path`.
    pub fn run(&mut self, path: &Path) -> Result<DriverReport, DriverError> {
        let program = self.frontend.parse(path)?;
        self.frontend.resolve_and_typecheck(&program)?;

        let implementation = match &self.config.implementation {
            Some(name) => program
                .implementation(name)
                .ok_or_else(|| DriverError::UnknownImplementation(name.clone()))?,
            None => program
                .first_implementation()
                .ok_or(DriverError::NoImplementations)?,
        }
        .clone();

        info!(implementation = %implementation.name, "verifying");
        let outcome = self.verifier.verify(&program, &implementation.name)?;
        info!(%outcome, "verification finished");

        let (renderings, skipped, exit_code) = match &outcome {
            VerifyOutcome::Error {
                counterexamples,
                models,
            } => {
                if counterexamples.len() != models.len() {
                    // Seen in practice on timeouts: an error trace arrives
                    // without its model. Analysis would misattribute causes,
                    // so skip it entirely.
                    warn!(
                        counterexamples = counterexamples.len(),
                        models = models.len(),
                        "trace/model count mismatch, skipping counterexample analysis"
                    );
                    (Vec::new(), 0, 0)
                } else {
                    let (renderings, skipped) =
                        self.analyze_counterexamples(&program, &implementation, counterexamples);
                    (renderings, skipped, counterexamples.len() as i32)
                }
            }
            _ => (Vec::new(), 0, 0),
        };

        Ok(DriverReport {
            implementation: implementation.name,
            outcome,
            renderings,
            skipped,
            exit_code,
        })
    }

    /// Analyze each counterexample independently; a failure in one never
    /// suppresses the others.
    fn analyze_counterexamples(
        &self,
        program: &symtrace_ivl::Program,
        implementation: &Implementation,
        counterexamples: &[symtrace_ivl::Trace],
    ) -> (Vec<String>, usize) {
        let roots = implementation.symbolic_roots();
        let mut renderings = Vec::with_capacity(counterexamples.len());
        let mut skipped = 0;

        for (index, trace) in counterexamples.iter().enumerate() {
            match self.analyze_one(program, &roots, trace) {
                Ok(rendering) => renderings.push(rendering),
                Err(err) => {
                    error!(counterexample = index, %err, "counterexample analysis failed");
                    skipped += 1;
                }
            }
        }

        (renderings, skipped)
    }

    fn analyze_one(
        &self,
        program: &symtrace_ivl::Program,
        roots: &[symtrace_ivl::Variable],
        trace: &symtrace_ivl::Trace,
    ) -> Result<String, SymExError> {
        let desugared = desugar_trace(trace, program)?;
        let snapshots = execute(&desugared, roots)?;
        let resolved = resolve(&snapshots, roots)?;
        Ok(self.dumper.render(&resolved))
    }
}
