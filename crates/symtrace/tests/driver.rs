//! Driver pipeline tests over in-process fake collaborators
//!
//! The fakes implement the `Frontend` and `Verifier` traits directly, so
//! these tests exercise implementation selection, outcome handling, and the
//! counterexample analysis pipeline without spawning any processes.

use std::path::Path;
use symtrace::{
    Driver, DriverConfig, DriverError, Frontend, FrontendError, Verifier, VerifierError,
    VerifyOutcome,
};
use symtrace_ivl::{
    BinaryOp, Command, Expr, Implementation, Model, Program, Trace, Type, VarKind, Variable,
};

struct FakeFrontend {
    program: Program,
}

impl Frontend for FakeFrontend {
    fn parse(&mut self, _path: &Path) -> Result<Program, FrontendError> {
        Ok(self.program.clone())
    }

    fn resolve_and_typecheck(&mut self, _program: &Program) -> Result<(), FrontendError> {
        Ok(())
    }
}

struct FakeVerifier {
    outcome: VerifyOutcome,
}

impl Verifier for FakeVerifier {
    fn verify(
        &mut self,
        _program: &Program,
        _implementation: &str,
    ) -> Result<VerifyOutcome, VerifierError> {
        Ok(self.outcome.clone())
    }
}

fn var(name: &str, kind: VarKind) -> Variable {
    Variable::new(name, Type::Int, kind)
}

/// `Main(in1, in2)` with no callees.
fn program() -> Program {
    Program {
        implementations: vec![Implementation {
            name: "Main".to_string(),
            in_params: vec![var("in1", VarKind::In), var("in2", VarKind::In)],
            out_params: vec![],
            modifies: vec![],
        }],
        callees: Default::default(),
    }
}

/// x := in1; y := x + in2; assert y > 0;
fn failing_trace() -> Trace {
    Trace::single_block(
        "entry",
        vec![
            Command::Assign {
                target: var("x", VarKind::Local),
                value: Expr::var("in1"),
            },
            Command::Assign {
                target: var("y", VarKind::Local),
                value: Expr::binary(BinaryOp::Add, Expr::var("x"), Expr::var("in2")),
            },
            Command::Assert {
                cond: Expr::binary(BinaryOp::Gt, Expr::var("y"), Expr::int(0)),
            },
        ],
    )
}

fn run(program: Program, outcome: VerifyOutcome, config: DriverConfig) -> Result<symtrace::DriverReport, DriverError> {
    let frontend = FakeFrontend { program };
    let verifier = FakeVerifier { outcome };
    Driver::new(frontend, verifier, config).run(Path::new("test.bpl"))
}

#[test]
fn test_verified_program_exits_zero() {
    let report = run(program(), VerifyOutcome::Verified, DriverConfig::default()).expect("run");
    assert_eq!(report.implementation, "Main");
    assert_eq!(report.exit_code, 0);
    assert!(report.renderings.is_empty());
    assert_eq!(report.skipped, 0);
}

#[test]
fn test_counterexamples_are_analyzed_and_counted() {
    let outcome = VerifyOutcome::Error {
        counterexamples: vec![failing_trace(), failing_trace()],
        models: vec![Model::from_raw("in1 -> 2"), Model::from_raw("in1 -> 7")],
    };
    let report = run(program(), outcome, DriverConfig::default()).expect("run");

    assert_eq!(report.exit_code, 2);
    assert_eq!(report.renderings.len(), 2);
    assert_eq!(report.skipped, 0);
    for rendering in &report.renderings {
        assert!(rendering.contains("=== Symbolic Trace (3 steps) ==="));
        assert!(rendering.contains("[VIOLATED]"));
        assert!(rendering.contains("over roots: in1, in2"));
    }
}

#[test]
fn test_model_count_mismatch_skips_analysis() {
    let outcome = VerifyOutcome::Error {
        counterexamples: vec![failing_trace(), failing_trace()],
        models: vec![Model::from_raw("in1 -> 2")],
    };
    let report = run(program(), outcome, DriverConfig::default()).expect("run");

    assert_eq!(report.exit_code, 0);
    assert!(report.renderings.is_empty());
    assert_eq!(report.skipped, 0);
    assert!(matches!(report.outcome, VerifyOutcome::Error { .. }));
}

#[test]
fn test_failing_counterexample_does_not_suppress_others() {
    // First trace calls a procedure the program does not define; desugaring
    // fails for it alone.
    let broken = Trace::single_block(
        "entry",
        vec![Command::Call {
            callee: "mystery".to_string(),
            args: vec![],
            outs: vec![],
        }],
    );
    let outcome = VerifyOutcome::Error {
        counterexamples: vec![broken, failing_trace()],
        models: vec![Model::from_raw("m0"), Model::from_raw("m1")],
    };
    let report = run(program(), outcome, DriverConfig::default()).expect("run");

    assert_eq!(report.exit_code, 2);
    assert_eq!(report.renderings.len(), 1);
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_non_error_outcomes_exit_zero() {
    for outcome in [
        VerifyOutcome::TimeOut,
        VerifyOutcome::OutOfMemory,
        VerifyOutcome::Unhandled {
            reason: "interrupted".to_string(),
        },
    ] {
        let report = run(program(), outcome.clone(), DriverConfig::default()).expect("run");
        assert_eq!(report.exit_code, 0);
        assert!(report.renderings.is_empty());
        assert_eq!(report.outcome, outcome);
    }
}

#[test]
fn test_named_implementation_is_selected() {
    let mut program = program();
    program.implementations.push(Implementation {
        name: "Aux".to_string(),
        in_params: vec![],
        out_params: vec![],
        modifies: vec![],
    });

    let config = DriverConfig {
        implementation: Some("Aux".to_string()),
        ..Default::default()
    };
    let report = run(program, VerifyOutcome::Verified, config).expect("run");
    assert_eq!(report.implementation, "Aux");
}

#[test]
fn test_unknown_implementation_is_rejected() {
    let config = DriverConfig {
        implementation: Some("Missing".to_string()),
        ..Default::default()
    };
    let err = run(program(), VerifyOutcome::Verified, config).unwrap_err();
    assert!(matches!(
        err,
        DriverError::UnknownImplementation(ref name) if name == "Missing"
    ));
}

#[test]
fn test_empty_program_is_rejected() {
    let err = run(
        Program::default(),
        VerifyOutcome::Verified,
        DriverConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DriverError::NoImplementations));
}
