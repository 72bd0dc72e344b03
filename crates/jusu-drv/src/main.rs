//! The `jusu` binary.
//!
//! CLI surface:
//!
//! ```text
//! jusu                      start the interactive shell
//! jusu run <file>           run with the tree-walking interpreter
//! jusu run --vm <file>      run with the stack VM
//! jusu run --regvm <file>   run with the register VM
//! jusu --help | -h          usage, exit 0
//! jusu --version | -v       version string, exit 0
//! ```
//!
//! Exit codes: 0 on success, non-zero on any unrecovered error. Errors are
//! printed to stderr as a single classified line; stdout carries only the
//! program's own output.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jusu_drv::{repl, run_source, Backend};
use jusu_runtime::stdout_sink;

/// The Jusu++ language: compiler, interpreter and virtual machines.
#[derive(Parser, Debug)]
#[command(name = "jusu")]
#[command(about = "The Jusu++ language", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue, global = true)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a Jusu++ program
    Run(RunCommand),
}

/// Arguments for the run subcommand.
#[derive(Args, Debug)]
struct RunCommand {
    /// Source file (conventionally .jusu)
    file: PathBuf,

    /// Execute with the stack VM instead of the interpreter
    #[arg(long, conflicts_with = "regvm")]
    vm: bool,

    /// Execute with the register VM (subset-limited)
    #[arg(long)]
    regvm: bool,
}

impl RunCommand {
    fn backend(&self) -> Backend {
        if self.vm {
            Backend::StackVm
        } else if self.regvm {
            Backend::RegisterVm
        } else {
            Backend::Interp
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    if cli.version {
        println!("Jusu++ Language v{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    match cli.command {
        Some(Commands::Run(cmd)) => run_command(&cmd),
        None => repl::start(),
    }
}

/// Logging goes to stderr and is off by default; `JUSU_LOG=debug` turns on
/// pipeline tracing without disturbing program output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("JUSU_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_command(cmd: &RunCommand) -> ExitCode {
    let source = match std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("cannot read '{}'", cmd.file.display()))
    {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_source(&source, cmd.backend(), stdout_sink()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", e.classification(), e);
            ExitCode::FAILURE
        }
    }
}
