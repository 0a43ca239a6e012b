//! symtrace: verification driving with symbolic counterexample analysis
//!
//! symtrace wraps an external IVL frontend and verifier and turns raw
//! counterexample traces into readable symbolic explanations:
//!
//! - **Call desugaring** splices callee bodies into the error trace
//! - **Forward execution** snapshots the symbolic store at every step
//! - **Backward resolution** rewrites every binding over the input roots
//! - **Trace dumping** renders the result, marking the violated assertion
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use symtrace::{analyze, DriverConfig};
//! use std::path::Path;
//!
//! let report = analyze(Path::new("program.bpl"), DriverConfig::default())?;
//! println!("Result: {}", report.outcome);
//! for rendering in &report.renderings {
//!     println!("{rendering}");
//! }
//! std::process::exit(report.exit_code);
//! ```
//!
//! Collaborators are pluggable: [`Driver`] is generic over the
//! [`Frontend`] and [`Verifier`] traits, so tests can drive the whole
//! pipeline without spawning processes.

pub mod driver;

pub use driver::{Driver, DriverError, DriverReport};
pub use symtrace_core::*;
pub use symtrace_ivl as ivl;
pub use symtrace_symex as symex;

use std::path::Path;

/// Current version of symtrace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the full pipeline on one file using the configured external
/// collaborators.
///
/// Convenience wrapper over [`Driver::from_config`] for the common case.
pub fn analyze(path: &Path, config: DriverConfig) -> Result<DriverReport, DriverError> {
    Driver::from_config(config).run(path)
}
