//! IVL data model for symtrace
//!
//! This crate contains the types the analysis pipeline operates on:
//! - `Expr`: immutable symbolic expression trees
//! - `Command` / `Trace`: one linear counterexample path through a procedure
//! - `Program` / `Implementation` / `CalleeBody`: the program surface this
//!   subsystem consumes (produced by the external frontend)
//! - `Model`: the opaque per-counterexample prover artifact
//!
//! Everything here is pure data. Parsing the IVL grammar, typechecking, and
//! verification condition generation live in external collaborator tools.

mod command;
mod expr;
mod program;

pub use command::*;
pub use expr::*;
pub use program::*;
