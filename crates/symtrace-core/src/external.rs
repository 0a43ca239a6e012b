//! Subprocess-backed collaborators
//!
//! [`ExternalFrontend`] and [`ExternalVerifier`] run configured executables
//! and exchange JSON over files and standard streams. Each verifier run gets
//! its own scratch directory, removed when the session value is dropped.
//!
//! The verifier is trusted to enforce the verification budget and report
//! `TimeOut` itself; the adapter only applies a generous backstop deadline so
//! a hung process cannot stall the driver forever. Hitting the backstop is a
//! transport failure, not a verification outcome.

use crate::config::DriverConfig;
use crate::frontend::{Frontend, FrontendError};
use crate::verifier::{Verifier, VerifierError, VerifyOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use symtrace_ivl::Program;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Extra slack on top of twice the verification budget before a verifier
/// process is declared unresponsive.
const BACKSTOP_SLACK: Duration = Duration::from_secs(30);

/// Frontend driven as a child process.
///
/// Protocol: `<exe> parse <file>` prints the program as JSON on stdout;
/// `<exe> check <program.json>` exits zero when the program is well-typed.
/// Diagnostics go to stderr.
pub struct ExternalFrontend {
    exe: PathBuf,
}

impl ExternalFrontend {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    /// Frontend configured by `config` (executable path or PATH lookup).
    #[must_use]
    pub fn from_config(config: &DriverConfig) -> Self {
        Self::new(config.frontend_exe())
    }
}

impl Frontend for ExternalFrontend {
    fn parse(&mut self, path: &Path) -> Result<Program, FrontendError> {
        debug!(exe = %self.exe.display(), file = %path.display(), "parsing");
        let output = Command::new(&self.exe)
            .arg("parse")
            .arg(path)
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(FrontendError::Parse {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|err| FrontendError::Protocol {
            message: format!("malformed program output: {err}"),
        })
    }

    fn resolve_and_typecheck(&mut self, program: &Program) -> Result<(), FrontendError> {
        let scratch = tempfile::tempdir()?;
        let program_path = scratch.path().join("program.json");
        let json = serde_json::to_vec(program).map_err(|err| FrontendError::Protocol {
            message: format!("program not serializable: {err}"),
        })?;
        fs::write(&program_path, json)?;

        let output = Command::new(&self.exe)
            .arg("check")
            .arg(&program_path)
            .stdin(Stdio::null())
            .output()?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FrontendError::Type {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Verifier driven as a child process.
///
/// Protocol: `<exe> --impl <name> --time-limit <secs> [extra args]
/// <program.json>` prints a [`VerifyOutcome`] as JSON on stdout and exits
/// zero, for every outcome including `TimeOut`. A non-zero exit is a
/// transport failure.
pub struct ExternalVerifier {
    exe: PathBuf,
    budget: Duration,
    extra_args: Vec<String>,
}

impl ExternalVerifier {
    pub fn new(exe: impl Into<PathBuf>, budget: Duration) -> Self {
        Self {
            exe: exe.into(),
            budget,
            extra_args: Vec::new(),
        }
    }

    /// Verifier configured by `config` (executable, budget, extra args).
    #[must_use]
    pub fn from_config(config: &DriverConfig) -> Self {
        Self {
            exe: config.verifier_exe(),
            budget: config.timeout,
            extra_args: config.extra_args.clone(),
        }
    }

    fn backstop(&self) -> Duration {
        self.budget * 2 + BACKSTOP_SLACK
    }
}

impl Verifier for ExternalVerifier {
    fn verify(
        &mut self,
        program: &Program,
        implementation: &str,
    ) -> Result<VerifyOutcome, VerifierError> {
        let session = tempfile::tempdir()?;
        let program_path = session.path().join("program.json");
        let outcome_path = session.path().join("outcome.json");
        let stderr_path = session.path().join("stderr.log");

        let json = serde_json::to_vec(program).map_err(|err| VerifierError::Protocol {
            message: format!("program not serializable: {err}"),
        })?;
        fs::write(&program_path, json)?;

        debug!(
            exe = %self.exe.display(),
            implementation,
            budget_secs = self.budget.as_secs(),
            "launching verifier"
        );

        // Streams go to session files so a chatty verifier cannot deadlock
        // on a full pipe while we wait.
        let mut child = Command::new(&self.exe)
            .arg("--impl")
            .arg(implementation)
            .arg("--time-limit")
            .arg(self.budget.as_secs().to_string())
            .args(&self.extra_args)
            .arg(&program_path)
            .stdin(Stdio::null())
            .stdout(fs::File::create(&outcome_path)?)
            .stderr(fs::File::create(&stderr_path)?)
            .spawn()
            .map_err(|source| VerifierError::Spawn {
                exe: self.exe.clone(),
                source,
            })?;

        let backstop = self.backstop();
        let status = match child.wait_timeout(backstop)? {
            Some(status) => status,
            None => {
                warn!(
                    seconds = backstop.as_secs(),
                    "verifier passed its backstop deadline, killing"
                );
                let _ = child.kill();
                let _ = child.wait();
                return Err(VerifierError::Unresponsive {
                    seconds: backstop.as_secs(),
                });
            }
        };

        if !status.success() {
            let stderr = fs::read_to_string(&stderr_path).unwrap_or_default();
            return Err(VerifierError::Failed {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let raw = fs::read(&outcome_path)?;
        serde_json::from_slice(&raw).map_err(|err| VerifierError::Protocol {
            message: format!("malformed outcome output: {err}"),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    fn fake_exe(dir: &Path, name: &str, script: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("create script");
        writeln!(file, "#!/bin/sh").expect("shebang");
        file.write_all(script.as_bytes()).expect("body");
        drop(file);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    #[test]
    fn test_external_verifier_reads_outcome_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let exe = fake_exe(dir.path(), "verifier", "echo '\"Verified\"'\n");
        let mut verifier = ExternalVerifier::new(exe, Duration::from_secs(5));
        let outcome = verifier
            .verify(&Program::default(), "Main")
            .expect("verify");
        assert_eq!(outcome, VerifyOutcome::Verified);
    }

    #[test]
    fn test_external_verifier_surfaces_abnormal_exit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let exe = fake_exe(dir.path(), "verifier", "echo 'prover crashed' >&2\nexit 3\n");
        let mut verifier = ExternalVerifier::new(exe, Duration::from_secs(5));
        let err = verifier.verify(&Program::default(), "Main").unwrap_err();
        assert!(matches!(
            err,
            VerifierError::Failed { code: Some(3), ref stderr } if stderr == "prover crashed"
        ));
    }

    #[test]
    fn test_external_verifier_rejects_garbage_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let exe = fake_exe(dir.path(), "verifier", "echo 'not json'\n");
        let mut verifier = ExternalVerifier::new(exe, Duration::from_secs(5));
        let err = verifier.verify(&Program::default(), "Main").unwrap_err();
        assert!(matches!(err, VerifierError::Protocol { .. }));
    }

    #[test]
    fn test_external_frontend_reports_parse_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let exe = fake_exe(dir.path(), "frontend", "echo 'unexpected token' >&2\nexit 1\n");
        let mut frontend = ExternalFrontend::new(exe);
        let err = frontend.parse(Path::new("broken.bpl")).unwrap_err();
        assert!(matches!(
            err,
            FrontendError::Parse { ref message, .. } if message == "unexpected token"
        ));
    }

    #[test]
    fn test_external_frontend_typecheck_maps_exit_codes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ok = fake_exe(dir.path(), "ok", "exit 0\n");
        let bad = fake_exe(dir.path(), "bad", "echo 'int expected' >&2\nexit 1\n");

        let program = Program::default();
        assert!(ExternalFrontend::new(ok)
            .resolve_and_typecheck(&program)
            .is_ok());
        let err = ExternalFrontend::new(bad)
            .resolve_and_typecheck(&program)
            .unwrap_err();
        assert!(matches!(
            err,
            FrontendError::Type { ref message } if message == "int expected"
        ));
    }
}
