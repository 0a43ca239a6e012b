//! Program surface consumed by the analysis pipeline
//!
//! The external frontend produces a `Program`; this subsystem only reads it:
//! the driver selects an `Implementation` to verify, and the desugarer looks
//! up `CalleeBody` entries for the calls appearing in a counterexample trace.

use crate::Command;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The type of a program variable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Type {
    Int,
    Bool,
    /// Uninterpreted / user-declared type.
    Named(String),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Where a variable is declared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VarKind {
    /// Input parameter.
    In,
    /// Output parameter.
    Out,
    /// Procedure-local or trace temporary.
    Local,
    /// Global variable.
    Global,
}

/// A named, typed program identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: Type,
    pub kind: VarKind,
}

impl Variable {
    /// Create a variable.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type, kind: VarKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// The body of a called procedure, as a linear command sequence selected by
/// the counterexample. The desugarer splices this in place of each call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalleeBody {
    pub in_params: Vec<Variable>,
    pub out_params: Vec<Variable>,
    pub commands: Vec<Command>,
}

/// A procedure implementation eligible for verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Implementation {
    pub name: String,
    pub in_params: Vec<Variable>,
    pub out_params: Vec<Variable>,
    /// Globals in the procedure's modifies clause.
    pub modifies: Vec<Variable>,
}

impl Implementation {
    /// The symbolic roots of this implementation: input parameters followed
    /// by modified globals, in declaration order.
    #[must_use]
    pub fn symbolic_roots(&self) -> Vec<Variable> {
        let mut roots = self.in_params.clone();
        roots.extend(self.modifies.iter().cloned());
        roots
    }
}

/// A parsed, resolved IVL program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub implementations: Vec<Implementation>,
    /// Callee bodies available for desugaring, keyed by procedure name.
    pub callees: HashMap<String, CalleeBody>,
}

impl Program {
    /// The first implementation, the default verification target.
    #[must_use]
    pub fn first_implementation(&self) -> Option<&Implementation> {
        self.implementations.first()
    }

    /// Look up an implementation by name.
    #[must_use]
    pub fn implementation(&self, name: &str) -> Option<&Implementation> {
        self.implementations.iter().find(|i| i.name == name)
    }

    /// Look up a callee body by procedure name.
    #[must_use]
    pub fn callee(&self, name: &str) -> Option<&CalleeBody> {
        self.callees.get(name)
    }
}

/// Opaque per-counterexample prover artifact. Carried alongside each trace
/// for reporting; never consumed by the symbolic analysis itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Model {
    raw: String,
}

impl Model {
    /// Wrap the prover's raw model text.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The raw model text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Expr;

    fn var(name: &str, kind: VarKind) -> Variable {
        Variable::new(name, Type::Int, kind)
    }

    #[test]
    fn test_symbolic_roots_order() {
        let imp = Implementation {
            name: "p".to_string(),
            in_params: vec![var("in1", VarKind::In), var("in2", VarKind::In)],
            out_params: vec![var("r", VarKind::Out)],
            modifies: vec![var("g", VarKind::Global)],
        };
        let roots: Vec<_> = imp.symbolic_roots().into_iter().map(|v| v.name).collect();
        assert_eq!(roots, vec!["in1", "in2", "g"]);
    }

    #[test]
    fn test_program_lookup() {
        let mut program = Program::default();
        program.implementations.push(Implementation {
            name: "p".to_string(),
            in_params: vec![],
            out_params: vec![],
            modifies: vec![],
        });
        program.callees.insert(
            "f".to_string(),
            CalleeBody {
                in_params: vec![var("a", VarKind::In)],
                out_params: vec![var("r", VarKind::Out)],
                commands: vec![Command::Assign {
                    target: var("r", VarKind::Out),
                    value: Expr::var("a"),
                }],
            },
        );

        assert_eq!(program.first_implementation().unwrap().name, "p");
        assert!(program.implementation("p").is_some());
        assert!(program.implementation("q").is_none());
        assert!(program.callee("f").is_some());
        assert!(program.callee("g").is_none());
    }

    #[test]
    fn test_model_is_opaque_text() {
        let model = Model::from_raw("x -> 2\ny -> -5");
        assert_eq!(model.raw(), "x -> 2\ny -> -5");
        assert_eq!(model.to_string(), model.raw());
    }

    #[test]
    fn test_variable_display() {
        assert_eq!(var("x", VarKind::Local).to_string(), "x: int");
        assert_eq!(
            Variable::new("m", Type::Named("Map".to_string()), VarKind::Global).to_string(),
            "m: Map"
        );
    }
}
