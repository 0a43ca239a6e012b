//! Forward symbolic execution
//!
//! One left-to-right pass over a desugared trace. The running store is seeded
//! with the symbolic roots (each bound to itself at version 0); every command
//! produces one snapshot. Evaluation is *shallow*: each variable occurrence
//! in a right-hand side becomes a versioned reference to the variable's
//! current binding, not the inlined definition. Collapsing reference chains
//! is the backward pass's job, so a temporary read many times is still
//! resolved only once.
//!
//! The trace is a fixed linear path: nothing here suspends, retries, or
//! branches.

use crate::{Snapshot, StoreBinding, SymStore};
use std::collections::BTreeMap;
use symtrace_ivl::{Command, Expr, ExprRef, Trace, Variable};
use thiserror::Error;

/// Internal-consistency failure during forward execution. Indicates a defect
/// in upstream trace construction, never silently patched.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// A command read a variable that was never bound and is not a root.
    #[error("command {command_index} references unbound variable `{var}`")]
    UnboundReference { var: String, command_index: usize },

    /// A call survived desugaring.
    #[error("command {command_index} is an undesugared call to `{callee}`")]
    UnexpectedCall { callee: String, command_index: usize },
}

/// Execute `trace` forward against the given symbolic roots, producing one
/// snapshot per command in trace order.
pub fn execute(trace: &Trace, roots: &[Variable]) -> Result<Vec<Snapshot>, ForwardError> {
    let mut store = SymStore::new();
    let mut versions: BTreeMap<String, u32> = BTreeMap::new();
    for root in roots {
        store.bind(root.name.clone(), 0, Expr::var_at(root.name.clone(), 0));
        versions.insert(root.name.clone(), 0);
    }

    let mut havoc_sites = 0u32;
    let mut snapshots = Vec::with_capacity(trace.len());

    for (index, (block, command)) in trace.commands().enumerate() {
        let snapshot = match command {
            Command::Assign { target, value } => {
                let value = substitute(value, &store, index)?;
                let version = next_version(&mut versions, &target.name);
                store.bind(target.name.clone(), version, value.clone());
                Snapshot {
                    index,
                    block: block.to_string(),
                    command: command.clone(),
                    condition: None,
                    binding: Some((
                        target.name.clone(),
                        StoreBinding { version, def: value },
                    )),
                    store: store.clone(),
                }
            }
            Command::Assume { cond } | Command::Assert { cond } => {
                let cond = substitute(cond, &store, index)?;
                Snapshot {
                    index,
                    block: block.to_string(),
                    command: command.clone(),
                    condition: Some(cond),
                    binding: None,
                    store: store.clone(),
                }
            }
            Command::Havoc { target } => {
                let site = havoc_sites;
                havoc_sites += 1;
                let placeholder = Expr::havoc(target.name.clone(), site);
                let version = next_version(&mut versions, &target.name);
                store.bind(target.name.clone(), version, placeholder.clone());
                Snapshot {
                    index,
                    block: block.to_string(),
                    command: command.clone(),
                    condition: None,
                    binding: Some((
                        target.name.clone(),
                        StoreBinding {
                            version,
                            def: placeholder,
                        },
                    )),
                    store: store.clone(),
                }
            }
            Command::Call { callee, .. } => {
                return Err(ForwardError::UnexpectedCall {
                    callee: callee.clone(),
                    command_index: index,
                });
            }
        };
        snapshots.push(snapshot);
    }

    tracing::debug!(commands = snapshots.len(), "forward pass complete");
    Ok(snapshots)
}

fn next_version(versions: &mut BTreeMap<String, u32>, name: &str) -> u32 {
    let counter = versions.entry(name.to_string()).or_insert(0);
    *counter += 1;
    *counter
}

/// Rewrite `expr` so every variable occurrence references its current store
/// binding. Roots stay at version 0 and denote themselves.
fn substitute(
    expr: &ExprRef,
    store: &SymStore,
    command_index: usize,
) -> Result<ExprRef, ForwardError> {
    Ok(match expr.as_ref() {
        Expr::Var { name, .. } => match store.lookup(name) {
            Some(binding) => Expr::var_at(name.clone(), binding.version),
            None => {
                return Err(ForwardError::UnboundReference {
                    var: name.clone(),
                    command_index,
                })
            }
        },
        Expr::Literal(_) | Expr::Havoc { .. } => expr.clone(),
        Expr::Unary { op, operand } => Expr::unary(*op, substitute(operand, store, command_index)?),
        Expr::Binary { op, lhs, rhs } => Expr::binary(
            *op,
            substitute(lhs, store, command_index)?,
            substitute(rhs, store, command_index)?,
        ),
        Expr::FnApp { name, args } => Expr::fn_app(
            name.clone(),
            args.iter()
                .map(|a| substitute(a, store, command_index))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    })
}
