//! # rlox
//!
//! A tree-less, single-pass bytecode interpreter for a small
//! dynamically-typed scripting language: source text goes straight from the
//! scanner through the Pratt-parsing compiler into a `Chunk` of bytecode,
//! which the stack-based `VM` then executes. There is no AST and no
//! bytecode-level optimization pass.

pub mod chunk;
pub mod common;
pub mod compiler;
pub mod debug;
pub mod memory;
pub mod object;
pub mod scanner;
pub mod table;
pub mod utils;
pub mod value;
pub mod vm;

use utils::Init;
use vm::{InterpretError, VM};

/// Exit code a script's outcome should map to at the process boundary.
/// Matches the book's `main.c`: 65 for a compile-time error, 70 for a
/// runtime error, 0 otherwise.
pub fn exit_code_for(result: &Result<(), InterpretError>) -> i32 {
  match result {
    Ok(()) => 0,
    Err(InterpretError::CompileError(_)) => 65,
    Err(InterpretError::RuntimeError(_)) => 70,
  }
}

/// Runs `source` to completion in a fresh `VM`, freeing it afterward
/// regardless of outcome. Shared by the CLI driver and integration tests so
/// neither has to remember the init/interpret/free dance.
pub fn run_source(source: &str) -> Result<(), InterpretError> {
  let mut vm = VM::init();
  let result = vm.interpret(source);
  vm.free();
  result
}
