//! Backward symbolic resolution
//!
//! Walks the forward pass's snapshots in reverse trace order and rewrites
//! every bound expression so that all non-root references are eliminated by
//! substitution with their defining expressions. Resolution is lazy and
//! memoized per `(variable, version)`: a temporary read many times in the
//! trace is resolved exactly once. This is a pure rewrite fixpoint: no
//! solving, no contradiction detection, no backtracking; the definitions form
//! a finite DAG (a reference always points at an earlier binding), so the
//! recursion terminates.

use crate::{ResolvedSnapshot, ResolvedTrace, Snapshot};
use std::collections::{BTreeMap, HashMap};
use symtrace_ivl::{Expr, ExprRef, Variable};
use thiserror::Error;

/// Internal-consistency failure during backward resolution.
#[derive(Debug, Error)]
pub enum BackwardError {
    /// A reference points at a binding no snapshot introduced. Cannot happen
    /// for snapshots produced by the forward pass; surfaced rather than
    /// defaulted if it does.
    #[error("reference `{var}@{version}` has no defining snapshot")]
    UndefinedVersion { var: String, version: u32 },
}

/// Memoizing resolver over one snapshot sequence.
pub struct Resolver {
    defs: HashMap<(String, u32), ExprRef>,
    cache: HashMap<(String, u32), ExprRef>,
}

impl Resolver {
    /// Build a resolver from the bindings the snapshots introduced.
    #[must_use]
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Self {
        let mut defs = HashMap::new();
        for snapshot in snapshots {
            if let Some((name, binding)) = &snapshot.binding {
                defs.insert((name.clone(), binding.version), binding.def.clone());
            }
        }
        Self {
            defs,
            cache: HashMap::new(),
        }
    }

    /// Fully resolve one reference, computing and memoizing on first use.
    pub fn resolve_binding(&mut self, name: &str, version: u32) -> Result<ExprRef, BackwardError> {
        debug_assert!(version > 0, "roots are never looked up by version");
        let key = (name.to_string(), version);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }
        let def = self
            .defs
            .get(&key)
            .cloned()
            .ok_or_else(|| BackwardError::UndefinedVersion {
                var: name.to_string(),
                version,
            })?;
        let resolved = self.resolve_expr(&def)?;
        self.cache.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Rewrite `expr` so it references only roots, literals, and havoc
    /// placeholders. A no-op (up to sharing) on already resolved input.
    pub fn resolve_expr(&mut self, expr: &ExprRef) -> Result<ExprRef, BackwardError> {
        Ok(match expr.as_ref() {
            Expr::Var { version: 0, .. } => expr.clone(),
            Expr::Var { name, version } => self.resolve_binding(name, *version)?,
            Expr::Literal(_) | Expr::Havoc { .. } => expr.clone(),
            Expr::Unary { op, operand } => Expr::unary(*op, self.resolve_expr(operand)?),
            Expr::Binary { op, lhs, rhs } => {
                Expr::binary(*op, self.resolve_expr(lhs)?, self.resolve_expr(rhs)?)
            }
            Expr::FnApp { name, args } => Expr::fn_app(
                name.clone(),
                args.iter()
                    .map(|a| self.resolve_expr(a))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }
}

/// Resolve the whole snapshot sequence into a [`ResolvedTrace`].
///
/// Snapshots are processed in reverse trace order so the deepest reference
/// chains are collapsed first and every earlier snapshot hits the memo cache.
pub fn resolve(snapshots: &[Snapshot], roots: &[Variable]) -> Result<ResolvedTrace, BackwardError> {
    let mut resolver = Resolver::from_snapshots(snapshots);
    let mut resolved = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots.iter().rev() {
        let condition = snapshot
            .condition
            .as_ref()
            .map(|c| resolver.resolve_expr(c))
            .transpose()?;

        let mut store = BTreeMap::new();
        for (name, binding) in snapshot.store.iter() {
            let expr = if binding.version == 0 {
                binding.def.clone()
            } else {
                resolver.resolve_binding(name, binding.version)?
            };
            store.insert(name.clone(), expr);
        }

        resolved.push(ResolvedSnapshot {
            index: snapshot.index,
            block: snapshot.block.clone(),
            command: snapshot.command.clone(),
            condition,
            store,
        });
    }

    resolved.reverse();
    tracing::debug!(snapshots = resolved.len(), "backward pass complete");
    Ok(ResolvedTrace {
        snapshots: resolved,
        roots: roots.to_vec(),
    })
}
