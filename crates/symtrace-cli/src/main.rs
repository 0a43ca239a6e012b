//! symtrace CLI
//!
//! Thin binary over the `symtrace` driver: parse arguments, set up logging,
//! run the pipeline, print the report, and exit with the counterexample
//! count. Report lines go to stdout; diagnostics go to stderr through
//! `tracing`.

use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;
use symtrace::symex::TraceDumper;
use symtrace::{Driver, DriverConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "symtrace")]
#[command(about = "Verification driver with symbolic counterexample analysis")]
#[command(version)]
struct Cli {
    /// IVL file to verify
    file: PathBuf,

    /// Implementation to verify (default: first in the program)
    #[arg(long = "impl", value_name = "NAME")]
    implementation: Option<String>,

    /// Print the PID and wait for Enter, to let a debugger attach
    #[arg(long = "break")]
    break_on_start: bool,

    /// Frontend executable (default: symtrace-frontend on PATH)
    #[arg(long, value_name = "PATH")]
    frontend: Option<PathBuf>,

    /// Verifier executable (default: symtrace-verifier on PATH)
    #[arg(long, value_name = "PATH")]
    verifier: Option<PathBuf>,

    /// Verification budget in seconds
    #[arg(long, value_name = "SECS", default_value = "20")]
    timeout: u64,

    /// Extra argument passed through to the verifier (repeatable)
    #[arg(long = "verifier-arg", value_name = "ARG")]
    verifier_args: Vec<String>,

    /// Print the full symbolic store at every trace step
    #[arg(long)]
    full_stores: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn wait_for_debugger() {
    println!("pid: {}", std::process::id());
    println!("press Enter to continue");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.break_on_start {
        wait_for_debugger();
    }

    let config = DriverConfig {
        timeout: Duration::from_secs(cli.timeout),
        frontend_path: cli.frontend,
        verifier_path: cli.verifier,
        implementation: cli.implementation,
        extra_args: cli.verifier_args,
    };

    let mut driver = Driver::from_config(config);
    if cli.full_stores {
        driver = driver.with_dumper(TraceDumper::verbose());
    }

    match driver.run(&cli.file) {
        Ok(report) => {
            println!("Result: {}", report.outcome);
            for rendering in &report.renderings {
                println!();
                print!("{rendering}");
            }
            std::process::exit(report.exit_code);
        }
        Err(err) => {
            error!(%err, "verification run failed");
            std::process::exit(1);
        }
    }
}
