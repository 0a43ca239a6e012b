//! Symbolic store, snapshots, and the resolved trace
//!
//! The forward executor maintains a `SymStore` (variable name → current
//! binding) and emits a `Snapshot` of it after every command. The backward
//! executor turns the snapshot sequence into a `ResolvedTrace` whose every
//! expression references only symbolic roots, literals, and havoc
//! placeholders.

use std::collections::BTreeMap;
use symtrace_ivl::{Command, ExprRef, Variable};

/// One binding in the symbolic store.
///
/// `version` counts how many times the variable has been bound; version 0 is
/// the self-referential binding of a symbolic root. `def` is the defining
/// expression as evaluated at bind time: variable occurrences in it are
/// versioned references to then-current bindings, not inlined definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreBinding {
    pub version: u32,
    pub def: ExprRef,
}

/// Mapping from variable name to its current symbolic binding.
///
/// Ordered map so snapshot iteration (and rendering) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymStore {
    bindings: BTreeMap<String, StoreBinding>,
}

impl SymStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` at `version` to `def`, shadowing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, version: u32, def: ExprRef) {
        self.bindings
            .insert(name.into(), StoreBinding { version, def });
    }

    /// Current binding of `name`, if any.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&StoreBinding> {
        self.bindings.get(name)
    }

    /// Iterate bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StoreBinding)> {
        self.bindings.iter()
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The symbolic store as of one program point, immediately after executing
/// the command at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Position of the command in the (desugared) trace.
    pub index: usize,
    /// Label of the block the command belongs to.
    pub block: String,
    /// The command executed at this point.
    pub command: Command,
    /// Evaluated condition for assume/assert commands.
    pub condition: Option<ExprRef>,
    /// The binding this command introduced (assignment or havoc).
    pub binding: Option<(String, StoreBinding)>,
    /// The full store after the command.
    pub store: SymStore,
}

/// A snapshot with all temporaries eliminated: every expression references
/// only symbolic roots, literals, and havoc placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSnapshot {
    pub index: usize,
    pub block: String,
    pub command: Command,
    pub condition: Option<ExprRef>,
    pub store: BTreeMap<String, ExprRef>,
}

/// The fully resolved counterexample trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrace {
    pub snapshots: Vec<ResolvedSnapshot>,
    /// The symbolic roots the resolution ran against, in root order.
    pub roots: Vec<Variable>,
}

impl ResolvedTrace {
    /// The last assert snapshot: the violated assertion of this
    /// counterexample (the trace ends at the failure).
    #[must_use]
    pub fn violated_assert(&self) -> Option<&ResolvedSnapshot> {
        self.snapshots.iter().rev().find(|s| s.command.is_assert())
    }
}
