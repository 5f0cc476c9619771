//! # Compiler
//!
//! A tree-less, single-pass compiler: `parser::Parser` walks the token
//! stream with a Pratt/precedence-climbing expression parser and emits
//! bytecode directly into a `Chunk` as it goes — there is no intermediate
//! AST.
//!
//! This module owns the shared compiler-state types (`Precedence`, `Local`,
//! `Compiler`) and the public entry point, `compile`.

use crate::{
  chunk::Chunk,
  scanner::{Scanner, Token, TokenType},
  vm::{InterpretError, VM},
};

pub mod parser;
pub use parser::Parser;

/// ## Precedence
///
/// Ordered low-to-high; `parse_precedence` consumes every infix operator
/// whose rule precedence is at least the level it was called with.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Precedence {
  #[default]
  None,
  Assignment, // =
  Or,         // or
  And,        // and
  Equality,   // == !=
  Comparison, // < > <= >=
  Term,       // + -
  Factor,     // * /
  Unary,      // ! -
  Call,       // . ()
  Primary,
}

impl Precedence {
  /// The next tighter-binding precedence level. Used by `binary()` so a
  /// left-associative operator's operand parse doesn't also swallow another
  /// occurrence of itself.
  pub fn next(self) -> Self {
    match self {
      Precedence::None => Precedence::Assignment,
      Precedence::Assignment => Precedence::Or,
      Precedence::Or => Precedence::And,
      Precedence::And => Precedence::Equality,
      Precedence::Equality => Precedence::Comparison,
      Precedence::Comparison => Precedence::Term,
      Precedence::Term => Precedence::Factor,
      Precedence::Factor => Precedence::Unary,
      Precedence::Unary => Precedence::Call,
      Precedence::Call | Precedence::Primary => Precedence::Primary,
    }
  }
}

/// ## Local
///
/// One entry in the compiler's locals stack. `initialized` is `false` from
/// the moment the name is declared until its initializer finishes
/// compiling, so `resolve_local` can reject `var a = a;`.
#[derive(Default)]
pub(crate) struct Local<'a> {
  pub(crate) name: Token<'a>,
  pub(crate) depth: usize,
  pub(crate) initialized: bool,
}

/// ## Compiler
///
/// Tracks in-scope local variables for the single, flat, function-less
/// script this language compiles (see spec Non-goals: no user functions, so
/// there is only ever one `Compiler`/call frame).
#[derive(Default)]
pub(crate) struct Compiler<'a> {
  pub(crate) locals: Vec<Local<'a>>,
  pub(crate) local_count: usize,
  pub(crate) scope_depth: usize,
}

/// Compiles `source` into a `Chunk`, interning string constants and global
/// names through `vm`.
///
/// Never stops at the first error: every statement-level error is printed
/// and the parser resynchronizes at the next statement boundary, so a
/// source file with several unrelated mistakes gets all of them reported in
/// one pass (see `parser::Parser::declaration`).
pub fn compile(source: &str, vm: &mut VM) -> Result<Chunk, InterpretError> {
  let mut parser = Parser::init();
  parser.scanner = Scanner::init(source);

  if let Err(InterpretError::CompileError(message)) = parser.advance_token() {
    eprintln!("{}", message);
  }

  while !parser.is_at_eof() {
    if let Err(InterpretError::CompileError(message)) = parser.declaration(vm) {
      eprintln!("{}", message);
    }
  }

  if let Err(InterpretError::CompileError(message)) = parser.end_compiler() {
    eprintln!("{}", message);
  }

  if parser.had_error {
    Err(InterpretError::CompileError(
      "Compilation failed due to prior errors.".into(),
    ))
  } else {
    Ok(parser.chunk)
  }
}
