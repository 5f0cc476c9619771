//! # Parser
//!
//! Submodule of `compiler`: the Pratt parser that drives compilation. Each
//! `ParseFn` handler both consumes tokens and emits bytecode; there is no
//! separate tree-building pass.

use crate::{
  chunk::{Chunk, OpCode},
  compiler::{Compiler, Precedence},
  scanner::{Scanner, Token, TokenType},
  utils::Init,
  value::Value,
  vm::{InterpretError, VM},
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::*;

/// A prefix or infix parse handler. Takes the parser, the VM (needed to
/// intern string/identifier constants), and whether an `=` at this
/// precedence level would be a valid assignment target.
type ParseFn = for<'p> fn(&mut Parser<'p>, &mut VM, bool) -> Result<(), InterpretError>;

pub mod compile_time_error_handlers;
pub mod emit_methods;
pub mod ops_after_get_parse_rule;
pub mod statement_methods;
pub mod variable_methods;

/// ## ParseRule
///
/// The prefix handler, infix handler, and infix-binding precedence for one
/// token type.
#[derive(Default, Clone, Copy)]
pub struct ParseRule {
  pub prefix: Option<ParseFn>,
  pub infix: Option<ParseFn>,
  pub precedence: Precedence,
}

impl ParseRule {
  pub fn new(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> Self {
    Self {
      prefix,
      infix,
      precedence,
    }
  }
}

/// ## RULES_VEC
///
/// The ordered table of parse rules, one per token type.
static RULES_VEC: Lazy<Vec<(TokenType, ParseRule)>> = Lazy::new(|| {
  vec![
    (
      TokenType::LeftParen,
      ParseRule::new(Some(Parser::grouping_adapter), None, Precedence::None),
    ),
    (
      TokenType::RightParen,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::LeftBrace,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::RightBrace,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::Comma,
      ParseRule::new(None, None, Precedence::None),
    ),
    (TokenType::Dot, ParseRule::new(None, None, Precedence::None)),
    (
      TokenType::Minus,
      ParseRule::new(
        Some(Parser::unary_adapter),
        Some(Parser::binary_adapter),
        Precedence::Term,
      ),
    ),
    (
      TokenType::Plus,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Term),
    ),
    (
      TokenType::Semicolon,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::Slash,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Factor),
    ),
    (
      TokenType::Star,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Factor),
    ),
    (
      TokenType::Bang,
      ParseRule::new(Some(Parser::unary_adapter), None, Precedence::None),
    ),
    (
      TokenType::BangEqual,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Equality),
    ),
    (
      TokenType::Equal,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::EqualEqual,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Equality),
    ),
    (
      TokenType::Greater,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Comparison),
    ),
    (
      TokenType::GreaterEqual,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Comparison),
    ),
    (
      TokenType::Less,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Comparison),
    ),
    (
      TokenType::LessEqual,
      ParseRule::new(None, Some(Parser::binary_adapter), Precedence::Comparison),
    ),
    (
      TokenType::Identifier,
      ParseRule::new(Some(Parser::variable_adapter), None, Precedence::None),
    ),
    (
      TokenType::String,
      ParseRule::new(Some(Parser::string_adapter), None, Precedence::None),
    ),
    (
      TokenType::Number,
      ParseRule::new(Some(Parser::number_adapter), None, Precedence::None),
    ),
    (
      TokenType::And,
      ParseRule::new(None, Some(Parser::and_adapter), Precedence::And),
    ),
    (
      TokenType::Class,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::Else,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::False,
      ParseRule::new(Some(Parser::literal_adapter), None, Precedence::None),
    ),
    (TokenType::For, ParseRule::new(None, None, Precedence::None)),
    (TokenType::Fun, ParseRule::new(None, None, Precedence::None)),
    (TokenType::If, ParseRule::new(None, None, Precedence::None)),
    (
      TokenType::Nil,
      ParseRule::new(Some(Parser::literal_adapter), None, Precedence::None),
    ),
    (
      TokenType::Or,
      ParseRule::new(None, Some(Parser::or_adapter), Precedence::Or),
    ),
    (
      TokenType::Print,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::Return,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::Super,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::This,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::True,
      ParseRule::new(Some(Parser::literal_adapter), None, Precedence::None),
    ),
    (TokenType::Var, ParseRule::new(None, None, Precedence::None)),
    (
      TokenType::While,
      ParseRule::new(None, None, Precedence::None),
    ),
    (
      TokenType::Error,
      ParseRule::new(None, None, Precedence::None),
    ),
    (TokenType::Eof, ParseRule::new(None, None, Precedence::None)),
  ]
});

/// ## RULES
///
/// `RULES_VEC` as a lookup table.
static RULES: Lazy<HashMap<TokenType, ParseRule>> = Lazy::new(|| {
  let mut map = HashMap::new();
  for (token_type, rule) in RULES_VEC.iter() {
    map.insert(*token_type, *rule);
  }
  map
});

#[derive(Default)]
pub struct Parser<'a> {
  /// Chunk being compiled into.
  pub(crate) chunk: Chunk,
  pub(crate) scanner: Scanner<'a>,
  pub(crate) current: Token<'a>,
  pub(crate) previous: Token<'a>,
  pub(crate) had_error: bool,
  pub(crate) panic_mode: bool,
  pub(crate) compiler: Compiler<'a>,
}

impl<'a> Init for Parser<'a> {}

impl<'a> Parser<'a> {
  /// Parses any expression at `precedence` or higher, starting at the
  /// current token.
  fn parse_precedence(
    &mut self,
    vm: &mut VM,
    precedence: Precedence,
  ) -> Result<(), InterpretError> {
    let can_assign = precedence <= Precedence::Assignment;

    self.advance_token()?;
    let prefix_rule = self.get_rule(self.previous.token_type).prefix;
    if prefix_rule.is_none() {
      return Err(self.error("Expect expression.".into()).unwrap_err());
    }
    let prefix_rule = prefix_rule.unwrap();
    prefix_rule(self, vm, can_assign)?;

    while precedence <= self.get_rule(self.current.token_type).precedence {
      self.advance_token()?;
      let infix_rule = self.get_rule(self.previous.token_type).infix;
      if infix_rule.is_none() {
        break;
      }
      infix_rule.unwrap()(self, vm, can_assign)?;
    }

    // `a + b = c * d;` — the `=` wasn't consumed by anything above, so it's
    // not a valid assignment target.
    if can_assign && self.match_token(TokenType::Equal)? {
      return Err(self.error("Invalid assignment target.".into()).unwrap_err());
    }

    Ok(())
  }

  fn get_rule(&self, token_type: TokenType) -> ParseRule {
    *RULES.get(&token_type).unwrap()
  }
}

impl<'a> Parser<'a> {
  /// Advances past `current`, skipping (and reporting) any run of scanner
  /// error tokens along the way.
  pub(crate) fn advance_token(&mut self) -> Result<(), InterpretError> {
    self.previous = std::mem::take(&mut self.current);
    loop {
      self.current = self.scanner.scan_token();
      if self.current.token_type != TokenType::Error {
        break;
      }
      self.error_at_current(self.current.lexeme.to_owned())?;
    }
    Ok(())
  }

  fn consume_token(
    &mut self,
    token_type: TokenType,
    message: String,
  ) -> Result<(), InterpretError> {
    if self.current.token_type == token_type {
      self.advance_token()?;
      Ok(())
    } else {
      self.error_at_current(message)
    }
  }

  fn check_token(&mut self, expected_type: TokenType) -> bool {
    self.current.token_type == expected_type
  }

  pub(crate) fn is_at_eof(&self) -> bool {
    self.current.token_type == TokenType::Eof
  }

  /// If `current` matches `expected_type`, advances past it and returns
  /// `true`; otherwise leaves the parser untouched and returns `false`.
  pub(crate) fn match_token(&mut self, expected_type: TokenType) -> Result<bool, InterpretError> {
    if !self.check_token(expected_type) {
      Ok(false)
    } else {
      self.advance_token()?;
      Ok(true)
    }
  }

  fn expression(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    self.parse_precedence(vm, Precedence::Assignment)
  }

  fn begin_scope(&mut self) {
    self.compiler.scope_depth += 1;
  }

  fn end_scope(&mut self) -> Result<(), InterpretError> {
    self.compiler.scope_depth -= 1;
    while self.compiler.local_count > 0
      && self.compiler.locals.last().unwrap().depth > self.compiler.scope_depth
    {
      self.emit_byte(OpCode::Pop as u8)?;
      self.compiler.locals.pop();
      self.compiler.local_count -= 1;
    }
    Ok(())
  }

  fn block(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    while !self.check_token(TokenType::RightBrace) && !self.check_token(TokenType::Eof) {
      self.declaration(vm)?;
    }
    self.consume_token(TokenType::RightBrace, "Expect `}` after block.".into())
  }

  /// Compiles one declaration (or falls through to a statement), then
  /// resynchronizes if it failed. This is the sole catch point for a
  /// statement-level compile error: the error is reported here and parsing
  /// resumes at the next statement boundary rather than aborting the whole
  /// compile.
  pub(crate) fn declaration(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    let result = if self.match_token(TokenType::Var)? {
      self.var_declaration(vm)
    } else {
      self.statement(vm)
    };

    if let Err(InterpretError::CompileError(message)) = &result {
      eprintln!("{}", message);
    }

    if self.panic_mode {
      self.synchronize()
    } else {
      result
    }
  }

  fn statement(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    if self.match_token(TokenType::Print)? {
      self.print_statement(vm)
    } else if self.match_token(TokenType::If)? {
      self.if_statement(vm)
    } else if self.match_token(TokenType::While)? {
      self.while_statement(vm)
    } else if self.match_token(TokenType::For)? {
      self.for_statement(vm)
    } else if self.match_token(TokenType::LeftBrace)? {
      self.begin_scope();
      self.block(vm)?;
      self.end_scope()
    } else {
      self.expression_statement(vm)
    }
  }
}

impl<'a> Parser<'a> {
  /// Adds `value` to the chunk's constant pool and returns its index.
  ///
  /// # Errors
  /// A constant index is a single byte, so a chunk can only ever hold 256
  /// constants. Checked *before* writing, since `Chunk::add_constant` itself
  /// has no cap of its own to enforce.
  fn make_constant(&mut self, value: Value) -> Result<u8, InterpretError> {
    if self.chunk.constants.values.len() >= u8::MAX as usize + 1 {
      return Err(
        self
          .error("Too many constants in one chunk.".to_owned())
          .unwrap_err(),
      );
    }
    let index = self.chunk.add_constant(value);
    Ok(index as u8)
  }
}
