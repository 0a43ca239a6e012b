//! Frontend collaborator interface
//!
//! The frontend owns the program text: it parses source files into the
//! in-memory program form and performs name resolution and type checking.
//! The driver only ever talks to it through the [`Frontend`] trait.

use std::path::{Path, PathBuf};
use symtrace_ivl::Program;
use thiserror::Error;

/// Failure reported by, or while talking to, the frontend.
#[derive(Debug, Error)]
pub enum FrontendError {
    /// The source file did not parse.
    #[error("failed to parse `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    /// Resolution or type checking rejected the program.
    #[error("type checking failed: {message}")]
    Type { message: String },

    /// The frontend produced output the driver could not understand.
    #[error("frontend protocol violation: {message}")]
    Protocol { message: String },

    /// Could not launch or communicate with the frontend process.
    #[error("frontend i/o failure")]
    Io(#[from] std::io::Error),
}

/// Parsing and checking services the driver depends on.
pub trait Frontend {
    /// Parse the file at `path` into a program.
    fn parse(&mut self, path: &Path) -> Result<Program, FrontendError>;

    /// Resolve names and type-check `program`. Must be called before the
    /// program is handed to a verifier.
    fn resolve_and_typecheck(&mut self, program: &Program) -> Result<(), FrontendError>;
}
