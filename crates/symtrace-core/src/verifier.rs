//! Verifier collaborator interface
//!
//! The verifier takes a checked program and one implementation name and
//! reports whether the implementation meets its specification. On failure it
//! returns the error traces together with the verifier's raw models, in
//! matching order. [`VerifierError`] covers transport problems only; a
//! verification timeout is an ordinary [`VerifyOutcome::TimeOut`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use symtrace_ivl::{Model, Trace};
use thiserror::Error;

/// Outcome of verifying one implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VerifyOutcome {
    /// The implementation meets its specification.
    Verified,

    /// One or more assertions can fail. Traces and models are paired by
    /// position; consumers must check that the lengths agree.
    Error {
        counterexamples: Vec<Trace>,
        models: Vec<Model>,
    },

    /// The verification budget ran out.
    TimeOut,

    /// The verifier exhausted its memory limit.
    OutOfMemory,

    /// The verifier gave up for another reason.
    Unhandled { reason: String },
}

impl VerifyOutcome {
    /// Whether the implementation was proven correct.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Number of counterexamples, zero for non-error outcomes.
    #[must_use]
    pub fn counterexample_count(&self) -> usize {
        match self {
            Self::Error {
                counterexamples, ..
            } => counterexamples.len(),
            _ => 0,
        }
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Verified => "Verified",
            Self::Error { .. } => "Error",
            Self::TimeOut => "TimeOut",
            Self::OutOfMemory => "OutOfMemory",
            Self::Unhandled { .. } => "Unhandled",
        };
        write!(f, "{label}")
    }
}

/// Failure launching or talking to the verifier. Never used for verification
/// outcomes themselves.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// The verifier executable could not be started.
    #[error("failed to launch verifier `{exe}`")]
    Spawn {
        exe: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The verifier process outlived its backstop deadline and was killed.
    /// Distinct from [`VerifyOutcome::TimeOut`], which the verifier reports
    /// itself within the budget.
    #[error("verifier unresponsive after {seconds}s, killed")]
    Unresponsive { seconds: u64 },

    /// The verifier exited abnormally instead of reporting an outcome.
    #[error("verifier exited with {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    /// The verifier produced output the driver could not understand.
    #[error("verifier protocol violation: {message}")]
    Protocol { message: String },

    /// Other i/o failure around the verifier session.
    #[error("verifier i/o failure")]
    Io(#[from] io::Error),
}

/// Verification service the driver depends on.
pub trait Verifier {
    /// Verify `implementation` within `program`.
    fn verify(
        &mut self,
        program: &symtrace_ivl::Program,
        implementation: &str,
    ) -> Result<VerifyOutcome, VerifierError>;
}
