//! Trace commands and counterexample traces
//!
//! A `Trace` is one concrete, linear path through the procedure as selected
//! by the verifier's counterexample: an ordered sequence of basic blocks,
//! each holding an ordered sequence of commands. It is produced once per
//! counterexample and read-only to the analysis pipeline; desugaring builds
//! a new trace rather than mutating its input.

use crate::{ExprRef, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive or call command inside a trace block.
///
/// Closed variant: every analysis component matches exhaustively so the
/// compiler flags any command kind a component fails to handle. After
/// desugaring no `Call` remains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    /// `target := value;`
    Assign { target: Variable, value: ExprRef },
    /// `assume cond;`
    Assume { cond: ExprRef },
    /// `assert cond;`
    Assert { cond: ExprRef },
    /// `havoc target;`
    Havoc { target: Variable },
    /// `call outs := callee(args);`
    Call {
        callee: String,
        args: Vec<ExprRef>,
        outs: Vec<Variable>,
    },
}

impl Command {
    /// Whether this is a `Call` command.
    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }

    /// Whether this is an `Assert` command.
    #[must_use]
    pub fn is_assert(&self) -> bool {
        matches!(self, Self::Assert { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { target, value } => write!(f, "{} := {value};", target.name),
            Self::Assume { cond } => write!(f, "assume {cond};"),
            Self::Assert { cond } => write!(f, "assert {cond};"),
            Self::Havoc { target } => write!(f, "havoc {};", target.name),
            Self::Call { callee, args, outs } => {
                write!(f, "call ")?;
                for (i, out) in outs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", out.name)?;
                }
                if !outs.is_empty() {
                    write!(f, " := ")?;
                }
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ");")
            }
        }
    }
}

/// One basic block on the counterexample path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceBlock {
    /// Block label as reported by the verifier.
    pub label: String,
    /// Commands of this block, in execution order.
    pub commands: Vec<Command>,
}

impl TraceBlock {
    /// Create a block with the given label and commands.
    #[must_use]
    pub fn new(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }
}

/// A concrete counterexample trace: an ordered, finite sequence of blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trace {
    pub blocks: Vec<TraceBlock>,
}

impl Trace {
    /// Create a trace from its blocks.
    #[must_use]
    pub fn new(blocks: Vec<TraceBlock>) -> Self {
        Self { blocks }
    }

    /// Single-block trace, for callee paths and tests.
    #[must_use]
    pub fn single_block(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Self::new(vec![TraceBlock::new(label, commands)])
    }

    /// Iterate all commands in trace order, with their block label.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.blocks
            .iter()
            .flat_map(|b| b.commands.iter().map(move |c| (b.label.as_str(), c)))
    }

    /// Total number of commands across all blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.commands.len()).sum()
    }

    /// Whether the trace holds no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any `Call` command remains in the trace.
    #[must_use]
    pub fn has_calls(&self) -> bool {
        self.commands().any(|(_, c)| c.is_call())
    }
}
