//! Symbolic counterexample analysis for symtrace
//!
//! The pipeline turns one raw failing trace into a symbolic explanation:
//!
//! 1. [`desugar_trace`]: rewrite call commands into their primitive effects,
//!    so only assignment/assume/assert/havoc remain.
//! 2. [`execute`]: one forward pass over the desugared trace, producing a
//!    store snapshot per command (bindings reference earlier bindings by
//!    version; nothing is inlined yet).
//! 3. [`resolve`]: one backward pass over the snapshots, collapsing chains of
//!    temporaries so every expression mentions only symbolic roots, literals,
//!    and havoc placeholders.
//! 4. [`TraceDumper`]: render the resolved trace as a readable report.
//!
//! Each stage consumes its predecessor's output and builds a new value; no
//! stage mutates the input trace or the prover model.

mod backward;
mod desugar;
mod dump;
mod forward;
mod store;

pub use backward::*;
pub use desugar::*;
pub use dump::*;
pub use forward::*;
pub use store::*;

use thiserror::Error;

/// Failure analyzing a single counterexample. Local to that counterexample:
/// the driver reports it and moves on to the next one.
#[derive(Debug, Error)]
pub enum SymExError {
    #[error(transparent)]
    Desugar(#[from] DesugarError),
    #[error(transparent)]
    Forward(#[from] ForwardError),
    #[error(transparent)]
    Backward(#[from] BackwardError),
}
