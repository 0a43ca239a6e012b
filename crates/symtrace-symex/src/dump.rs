//! Symbolic trace rendering
//!
//! Pure presentation of a [`ResolvedTrace`]: one section per program point
//! showing the command and the resolved root-only bindings relevant to it.
//! The violated assertion (the last assert on the path) additionally lists
//! the symbolic roots its resolved condition depends on.

use crate::{ResolvedSnapshot, ResolvedTrace};
use std::fmt::Write;
use symtrace_ivl::Command;

/// Renderer for resolved traces.
#[derive(Debug, Clone)]
pub struct TraceDumper {
    /// Print the whole store at every point instead of only the bindings the
    /// command touches.
    pub full_stores: bool,
}

impl Default for TraceDumper {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceDumper {
    /// Dumper with default settings (relevant bindings only).
    #[must_use]
    pub fn new() -> Self {
        Self { full_stores: false }
    }

    /// Dumper that prints the full store at every program point.
    #[must_use]
    pub fn verbose() -> Self {
        Self { full_stores: true }
    }

    /// Render the resolved trace as a textual report.
    #[must_use]
    pub fn render(&self, trace: &ResolvedTrace) -> String {
        let mut out = String::new();

        let root_names: Vec<&str> = trace.roots.iter().map(|r| r.name.as_str()).collect();
        let _ = writeln!(
            out,
            "=== Symbolic Trace ({} steps) ===",
            trace.snapshots.len()
        );
        let _ = writeln!(out, "Roots: {}", root_names.join(", "));

        let violated_index = trace.violated_assert().map(|s| s.index);

        for snapshot in &trace.snapshots {
            out.push('\n');
            let violated = violated_index == Some(snapshot.index);
            self.render_snapshot(&mut out, snapshot, violated);
        }

        out
    }

    fn render_snapshot(&self, out: &mut String, snapshot: &ResolvedSnapshot, violated: bool) {
        let marker = if violated { "   [VIOLATED]" } else { "" };
        let _ = writeln!(
            out,
            "[{}] {}: {}{}",
            snapshot.index, snapshot.block, snapshot.command, marker
        );

        match &snapshot.command {
            Command::Assign { target, .. } | Command::Havoc { target } => {
                if let Some(expr) = snapshot.store.get(&target.name) {
                    let _ = writeln!(out, "      {} = {}", target.name, expr);
                }
            }
            Command::Assume { cond } | Command::Assert { cond } => {
                if let Some(resolved) = &snapshot.condition {
                    let _ = writeln!(out, "      condition: {resolved}");
                    if violated {
                        let roots: Vec<String> = resolved.root_names().into_iter().collect();
                        let _ = writeln!(out, "      over roots: {}", roots.join(", "));
                    }
                }
                // Bindings the condition reads, as written in the source.
                for name in cond.referenced_names() {
                    if let Some(expr) = snapshot.store.get(&name) {
                        let _ = writeln!(out, "      {name} = {expr}");
                    }
                }
            }
            // Calls never reach rendering; desugaring precedes execution.
            Command::Call { callee, .. } => {
                let _ = writeln!(out, "      (undesugared call to {callee})");
            }
        }

        if self.full_stores {
            let _ = writeln!(out, "      store:");
            for (name, expr) in &snapshot.store {
                let _ = writeln!(out, "        {name} = {expr}");
            }
        }
    }
}
