//! Symbolic expression trees
//!
//! `Expr` is an immutable tree over variable references, literals, operator
//! applications, function applications, and havoc placeholders. Subtrees are
//! reference-counted so the forward/backward executors can share structure
//! freely; the tree is acyclic by construction since every node is built from
//! already-built children.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Shared handle to an expression node.
pub type ExprRef = Rc<Expr>;

/// A literal value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    /// Source rendering of the operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

/// Binary operators (arithmetic, logical, relational).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Implies,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    /// Source rendering of the operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::And => "&&",
            Self::Or => "||",
            Self::Implies => "==>",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A symbolic expression.
///
/// Variable references carry a version. Version 0 means "as written in the
/// source trace"; the forward executor rewrites occurrences into references
/// to the referenced variable's current store binding, after which version 0
/// occurs only on symbolic roots (which denote themselves). `Havoc` is the
/// unconstrained placeholder a havoc command binds: it carries a per-site
/// counter so two havocs of the same variable never alias, and it is never
/// resolved further.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Expr {
    /// Reference to a variable binding.
    Var { name: String, version: u32 },
    /// Literal constant.
    Literal(Literal),
    /// Unary operator application.
    Unary { op: UnaryOp, operand: ExprRef },
    /// Binary operator application.
    Binary {
        op: BinaryOp,
        lhs: ExprRef,
        rhs: ExprRef,
    },
    /// Uninterpreted function application.
    FnApp { name: String, args: Vec<ExprRef> },
    /// Unconstrained placeholder introduced by a havoc command.
    Havoc { name: String, site: u32 },
}

impl Expr {
    /// Source-level variable reference (version 0).
    #[must_use]
    pub fn var(name: impl Into<String>) -> ExprRef {
        Rc::new(Self::Var {
            name: name.into(),
            version: 0,
        })
    }

    /// Versioned reference to a store binding.
    #[must_use]
    pub fn var_at(name: impl Into<String>, version: u32) -> ExprRef {
        Rc::new(Self::Var {
            name: name.into(),
            version,
        })
    }

    /// Integer literal.
    #[must_use]
    pub fn int(value: i64) -> ExprRef {
        Rc::new(Self::Literal(Literal::Int(value)))
    }

    /// Boolean literal.
    #[must_use]
    pub fn boolean(value: bool) -> ExprRef {
        Rc::new(Self::Literal(Literal::Bool(value)))
    }

    /// Unary operator application.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: ExprRef) -> ExprRef {
        Rc::new(Self::Unary { op, operand })
    }

    /// Binary operator application.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Rc::new(Self::Binary { op, lhs, rhs })
    }

    /// Uninterpreted function application.
    #[must_use]
    pub fn fn_app(name: impl Into<String>, args: Vec<ExprRef>) -> ExprRef {
        Rc::new(Self::FnApp {
            name: name.into(),
            args,
        })
    }

    /// Havoc placeholder for `name` at havoc site `site`.
    #[must_use]
    pub fn havoc(name: impl Into<String>, site: u32) -> ExprRef {
        Rc::new(Self::Havoc {
            name: name.into(),
            site,
        })
    }

    /// Whether this node renders without surrounding parentheses.
    #[must_use]
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            Self::Var { .. } | Self::Literal(_) | Self::FnApp { .. } | Self::Havoc { .. }
        )
    }

    /// Visit every variable reference in the tree, in left-to-right order.
    pub fn for_each_var<F: FnMut(&str, u32)>(&self, f: &mut F) {
        match self {
            Self::Var { name, version } => f(name, *version),
            Self::Literal(_) | Self::Havoc { .. } => {}
            Self::Unary { operand, .. } => operand.for_each_var(f),
            Self::Binary { lhs, rhs, .. } => {
                lhs.for_each_var(f);
                rhs.for_each_var(f);
            }
            Self::FnApp { args, .. } => {
                for arg in args {
                    arg.for_each_var(f);
                }
            }
        }
    }

    /// Names of all variables referenced in the tree.
    #[must_use]
    pub fn referenced_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.for_each_var(&mut |name, _| {
            names.insert(name.to_string());
        });
        names
    }

    /// Names of the version-0 references in the tree. On an expression
    /// produced by backward resolution these are exactly the symbolic roots
    /// it depends on.
    #[must_use]
    pub fn root_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.for_each_var(&mut |name, version| {
            if version == 0 {
                names.insert(name.to_string());
            }
        });
        names
    }

    /// Whether the tree contains any non-root (version > 0) reference.
    #[must_use]
    pub fn has_unresolved_refs(&self) -> bool {
        let mut found = false;
        self.for_each_var(&mut |_, version| {
            if version > 0 {
                found = true;
            }
        });
        found
    }
}

fn fmt_operand(expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if expr.is_atomic() {
        write!(f, "{expr}")
    } else {
        write!(f, "({expr})")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var { name, version } => {
                if *version == 0 {
                    write!(f, "{name}")
                } else {
                    write!(f, "{name}@{version}")
                }
            }
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Unary { op, operand } => {
                write!(f, "{}", op.as_str())?;
                fmt_operand(operand, f)
            }
            Self::Binary { op, lhs, rhs } => {
                fmt_operand(lhs, f)?;
                write!(f, " {} ", op.as_str())?;
                fmt_operand(rhs, f)
            }
            Self::FnApp { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Havoc { name, site } => write!(f, "{name}#{site}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_var_display() {
        assert_eq!(Expr::var("x").to_string(), "x");
        assert_eq!(Expr::var_at("x", 2).to_string(), "x@2");
    }

    #[test]
    fn test_binary_display_flat() {
        let e = Expr::binary(BinaryOp::Add, Expr::var("in1"), Expr::var("in2"));
        assert_eq!(e.to_string(), "in1 + in2");
    }

    #[test]
    fn test_binary_display_nested_parenthesized() {
        let sum = Expr::binary(BinaryOp::Add, Expr::var("in1"), Expr::var("in2"));
        let cmp = Expr::binary(BinaryOp::Gt, sum, Expr::int(0));
        assert_eq!(cmp.to_string(), "(in1 + in2) > 0");
    }

    #[test]
    fn test_unary_display() {
        let e = Expr::unary(UnaryOp::Not, Expr::var("b"));
        assert_eq!(e.to_string(), "!b");
        let e = Expr::unary(
            UnaryOp::Neg,
            Expr::binary(BinaryOp::Sub, Expr::var("x"), Expr::int(1)),
        );
        assert_eq!(e.to_string(), "-(x - 1)");
    }

    #[test]
    fn test_fn_app_display() {
        let e = Expr::fn_app("len", vec![Expr::var("xs"), Expr::int(0)]);
        assert_eq!(e.to_string(), "len(xs, 0)");
    }

    #[test]
    fn test_havoc_display() {
        assert_eq!(Expr::havoc("x", 3).to_string(), "x#3");
    }

    #[test]
    fn test_havoc_identity_per_site() {
        assert_ne!(Expr::havoc("x", 0), Expr::havoc("x", 1));
        assert_eq!(Expr::havoc("x", 1), Expr::havoc("x", 1));
    }

    #[test]
    fn test_root_names_skips_versioned_refs() {
        let e = Expr::binary(BinaryOp::Add, Expr::var("in1"), Expr::var_at("t", 4));
        let roots = e.root_names();
        assert!(roots.contains("in1"));
        assert!(!roots.contains("t"));
    }

    #[test]
    fn test_has_unresolved_refs() {
        let resolved = Expr::binary(BinaryOp::Add, Expr::var("in1"), Expr::int(1));
        assert!(!resolved.has_unresolved_refs());
        let unresolved = Expr::binary(BinaryOp::Add, Expr::var_at("t", 1), Expr::int(1));
        assert!(unresolved.has_unresolved_refs());
    }

    #[test]
    fn test_referenced_names_in_order_collected() {
        let e = Expr::fn_app(
            "f",
            vec![Expr::var("b"), Expr::unary(UnaryOp::Neg, Expr::var("a"))],
        );
        let names = e.referenced_names();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_expr_json_roundtrip() {
        let e = Expr::binary(
            BinaryOp::Implies,
            Expr::boolean(true),
            Expr::fn_app("p", vec![Expr::havoc("x", 1)]),
        );
        let json = serde_json::to_string(&e).expect("serialize");
        let back: ExprRef = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, e);
    }
}
