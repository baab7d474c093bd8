//! `tiestate` command-line entry point.

use std::process::ExitCode;

use senone_diagnostic::{Diagnostic, DiagnosticEmitter, TerminalEmitter};
use tiestate::{example, init_tracing, parse_args, run, usage, Command};
use tracing::info;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        eprint!("{}", usage());
        return ExitCode::FAILURE;
    }

    let config = match parse_args(&args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Ok(Command::Example) => {
            print!("{}", example());
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("tiestate {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => return report(&e.diagnostic()),
    };

    init_tracing();
    match run(&config) {
        Ok(summary) => {
            info!(
                n_seno = summary.n_seno,
                n_tied_state = summary.n_tied_state,
                n_cd = summary.n_cd,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => report(&e.diagnostic()),
    }
}

fn report(diagnostic: &Diagnostic) -> ExitCode {
    let mut emitter = TerminalEmitter::stderr();
    emitter.emit(diagnostic);
    emitter.flush();
    ExitCode::FAILURE
}
