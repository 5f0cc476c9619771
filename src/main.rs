//! # rlox CLI
//!
//! Usage: `rlox [path]`. With a path, runs that file once and exits with a
//! code describing the outcome. With no arguments, drops into a REPL that
//! reads one line at a time, each evaluated against a fresh `VM`.

use std::io::{self, Write};
use std::process::ExitCode;

use rlox::utils::get_args;
use rlox::vm::InterpretError;

/// Prints the outcome's diagnostic, if any still needs printing.
///
/// A `CompileError`'s real per-statement messages were already printed as
/// they were found (see `compiler::compile`); its payload here is just the
/// generic "compilation failed" marker, so printing it again would be noise.
/// A `RuntimeError`'s message has not been printed anywhere yet.
fn report(result: &Result<(), InterpretError>) {
  match result {
    Ok(()) => {}
    Err(InterpretError::CompileError(_)) => {}
    Err(InterpretError::RuntimeError(message)) => eprintln!("{}", message),
  }
}

fn run_file(path: &str) -> ExitCode {
  let source = match std::fs::read_to_string(path) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("Could not read file \"{}\": {}", path, err);
      return ExitCode::from(74);
    }
  };

  let result = rlox::run_source(&source);
  report(&result);
  ExitCode::from(rlox::exit_code_for(&result) as u8)
}

fn repl() -> ExitCode {
  let mut line = String::new();
  loop {
    print!("> ");
    if io::stdout().flush().is_err() {
      return ExitCode::from(74);
    }

    line.clear();
    match io::stdin().read_line(&mut line) {
      Ok(0) => {
        println!();
        return ExitCode::SUCCESS;
      }
      Ok(_) => {
        report(&rlox::run_source(&line));
      }
      Err(err) => {
        eprintln!("Could not read from stdin: {}", err);
        return ExitCode::from(74);
      }
    }
  }
}

pub fn main() -> ExitCode {
  let args = get_args();
  match args.as_slice() {
    [] => repl(),
    [path] => run_file(path),
    _ => {
      eprintln!("Usage: rlox [path]");
      ExitCode::from(64)
    }
  }
}
