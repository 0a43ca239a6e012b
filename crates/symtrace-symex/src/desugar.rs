//! Trace desugaring
//!
//! Rewrites a raw counterexample trace so that every call command is replaced
//! by the sequence of primitive effects it represents: bind each callee input
//! parameter to the evaluated actual, splice in the callee's own (recursively
//! desugared) body with its variables renamed to fresh trace-unique
//! temporaries, then bind each caller-visible output. The input trace is not
//! mutated; a new trace is built.

use std::collections::BTreeSet;
use symtrace_ivl::{
    CalleeBody, Command, Expr, ExprRef, Program, Trace, TraceBlock, VarKind, Variable,
};
use thiserror::Error;

/// Failure desugaring a counterexample trace. A defect in upstream trace
/// construction, fatal to this counterexample's symbolic analysis.
#[derive(Debug, Error)]
pub enum DesugarError {
    /// A call references a procedure whose body is unavailable.
    #[error("no body available for callee `{callee}`")]
    UnknownCallee { callee: String },

    /// Call arity disagrees with the callee signature.
    #[error(
        "call to `{callee}` has {got_ins} argument(s) and {got_outs} output(s), \
         expected {expected_ins} and {expected_outs}"
    )]
    ArityMismatch {
        callee: String,
        expected_ins: usize,
        got_ins: usize,
        expected_outs: usize,
        got_outs: usize,
    },
}

/// Desugar `trace` against the callee bodies in `program`.
///
/// The result contains no `Call` command and is observationally equivalent to
/// the input: the final bindings of all caller-visible variables match those
/// of executing the original call sequence.
pub fn desugar_trace(trace: &Trace, program: &Program) -> Result<Trace, DesugarError> {
    let mut site = 0u32;
    let mut blocks = Vec::with_capacity(trace.blocks.len());
    for block in &trace.blocks {
        let commands = desugar_commands(&block.commands, program, &mut site)?;
        blocks.push(TraceBlock::new(block.label.clone(), commands));
    }
    let out = Trace::new(blocks);
    debug_assert!(!out.has_calls());
    Ok(out)
}

fn desugar_commands(
    commands: &[Command],
    program: &Program,
    site: &mut u32,
) -> Result<Vec<Command>, DesugarError> {
    let mut out = Vec::with_capacity(commands.len());
    for command in commands {
        match command {
            Command::Call { callee, args, outs } => {
                let body = program
                    .callee(callee)
                    .ok_or_else(|| DesugarError::UnknownCallee {
                        callee: callee.clone(),
                    })?;
                check_arity(callee, body, args, outs)?;

                let call_site = *site;
                *site += 1;
                let prefix = format!("{callee}${call_site}");
                let renamed = rename_set(body);
                tracing::debug!(callee, call_site, "inlining call");

                // Parameter binding: one assignment per input formal, to a
                // fresh temporary, from the caller-side actual.
                for (formal, actual) in body.in_params.iter().zip(args) {
                    out.push(Command::Assign {
                        target: fresh_var(&prefix, formal),
                        value: actual.clone(),
                    });
                }

                // Callee body: rename its non-global variables to the fresh
                // temporaries, then desugar recursively so nested calls are
                // expanded with their own sites.
                let body_commands: Vec<Command> = body
                    .commands
                    .iter()
                    .map(|c| rename_command(c, &prefix, &renamed))
                    .collect();
                out.extend(desugar_commands(&body_commands, program, site)?);

                // Return-value binding: caller-visible outputs read the
                // callee's resolved output temporaries.
                for (formal, caller_out) in body.out_params.iter().zip(outs) {
                    out.push(Command::Assign {
                        target: caller_out.clone(),
                        value: Expr::var(fresh_name(&prefix, &formal.name)),
                    });
                }
            }
            other => out.push(other.clone()),
        }
    }
    Ok(out)
}

fn check_arity(
    callee: &str,
    body: &CalleeBody,
    args: &[ExprRef],
    outs: &[Variable],
) -> Result<(), DesugarError> {
    if body.in_params.len() != args.len() || body.out_params.len() != outs.len() {
        return Err(DesugarError::ArityMismatch {
            callee: callee.to_string(),
            expected_ins: body.in_params.len(),
            got_ins: args.len(),
            expected_outs: body.out_params.len(),
            got_outs: outs.len(),
        });
    }
    Ok(())
}

/// Every callee variable that must be renamed: formals plus any non-global
/// the body binds. Globals keep their names so their effects stay visible to
/// the caller.
fn rename_set(body: &CalleeBody) -> BTreeSet<String> {
    let mut set: BTreeSet<String> = body
        .in_params
        .iter()
        .chain(&body.out_params)
        .map(|v| v.name.clone())
        .collect();
    for command in &body.commands {
        match command {
            Command::Assign { target, .. } | Command::Havoc { target } => {
                if target.kind != VarKind::Global {
                    set.insert(target.name.clone());
                }
            }
            Command::Call { outs, .. } => {
                for out in outs {
                    if out.kind != VarKind::Global {
                        set.insert(out.name.clone());
                    }
                }
            }
            Command::Assume { .. } | Command::Assert { .. } => {}
        }
    }
    set
}

fn fresh_name(prefix: &str, name: &str) -> String {
    format!("{prefix}${name}")
}

fn fresh_var(prefix: &str, formal: &Variable) -> Variable {
    Variable::new(fresh_name(prefix, &formal.name), formal.ty.clone(), VarKind::Local)
}

fn rename_command(command: &Command, prefix: &str, renamed: &BTreeSet<String>) -> Command {
    match command {
        Command::Assign { target, value } => Command::Assign {
            target: rename_var(target, prefix, renamed),
            value: rename_expr(value, prefix, renamed),
        },
        Command::Assume { cond } => Command::Assume {
            cond: rename_expr(cond, prefix, renamed),
        },
        Command::Assert { cond } => Command::Assert {
            cond: rename_expr(cond, prefix, renamed),
        },
        Command::Havoc { target } => Command::Havoc {
            target: rename_var(target, prefix, renamed),
        },
        Command::Call { callee, args, outs } => Command::Call {
            callee: callee.clone(),
            args: args
                .iter()
                .map(|a| rename_expr(a, prefix, renamed))
                .collect(),
            outs: outs.iter().map(|o| rename_var(o, prefix, renamed)).collect(),
        },
    }
}

fn rename_var(var: &Variable, prefix: &str, renamed: &BTreeSet<String>) -> Variable {
    if renamed.contains(&var.name) {
        Variable::new(fresh_name(prefix, &var.name), var.ty.clone(), VarKind::Local)
    } else {
        var.clone()
    }
}

fn rename_expr(expr: &ExprRef, prefix: &str, renamed: &BTreeSet<String>) -> ExprRef {
    match expr.as_ref() {
        Expr::Var { name, version } => {
            if renamed.contains(name) {
                Expr::var_at(fresh_name(prefix, name), *version)
            } else {
                expr.clone()
            }
        }
        Expr::Literal(_) | Expr::Havoc { .. } => expr.clone(),
        Expr::Unary { op, operand } => Expr::unary(*op, rename_expr(operand, prefix, renamed)),
        Expr::Binary { op, lhs, rhs } => Expr::binary(
            *op,
            rename_expr(lhs, prefix, renamed),
            rename_expr(rhs, prefix, renamed),
        ),
        Expr::FnApp { name, args } => Expr::fn_app(
            name.clone(),
            args.iter()
                .map(|a| rename_expr(a, prefix, renamed))
                .collect(),
        ),
    }
}
