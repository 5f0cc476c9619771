use super::*;

impl<'a> Parser<'a> {
  pub(crate) fn print_statement(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    self.expression(vm)?;
    self.consume_token(TokenType::Semicolon, "Expect `;` after value.".into())?;
    self.emit_byte(OpCode::Print as u8)
  }

  pub(crate) fn if_statement(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    self.consume_token(TokenType::LeftParen, "Expect `(` after `if`.".into())?;
    self.expression(vm)?;
    self.consume_token(TokenType::RightParen, "Expect `)` after condition.".into())?;

    let then_jump = self.emit_jump(OpCode::JumpIfFalse as u8)?;
    // Pop the condition iff the `if` branch runs.
    self.emit_byte(OpCode::Pop as u8)?;
    self.statement(vm)?;

    let else_jump = self.emit_jump(OpCode::Jump as u8)?;
    self.patch_jump(then_jump)?;

    // Pop the condition iff the `else` branch runs (or there is none).
    self.emit_byte(OpCode::Pop as u8)?;
    if self.match_token(TokenType::Else)? {
      self.statement(vm)?;
    }

    self.patch_jump(else_jump)
  }

  pub(crate) fn while_statement(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    let loop_start = self.chunk.code.len();
    self.consume_token(TokenType::LeftParen, "Expect `(` after `while`.".into())?;
    self.expression(vm)?;
    self.consume_token(TokenType::RightParen, "Expect `)` after condition.".into())?;

    let exit_jump = self.emit_jump(OpCode::JumpIfFalse as u8)?;
    self.emit_byte(OpCode::Pop as u8)?;
    self.statement(vm)?;
    self.emit_loop(loop_start)?;

    self.patch_jump(exit_jump)?;
    self.emit_byte(OpCode::Pop as u8)
  }

  /// Desugars `for (init; cond; incr) body` into the equivalent
  /// `while`-shaped bytecode: the increment is compiled once, right after
  /// the initializer, then jumped over on the loop's first pass and jumped
  /// back into at the end of every subsequent pass.
  pub(crate) fn for_statement(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    self.begin_scope();
    self.consume_token(TokenType::LeftParen, "Expect `(` after `for`.".into())?;

    if self.match_token(TokenType::Semicolon)? {
      // No initializer.
    } else if self.match_token(TokenType::Var)? {
      self.var_declaration(vm)?;
    } else {
      self.expression_statement(vm)?;
    }

    let mut loop_start = self.chunk.code.len();
    let mut exit_jump = None;
    if !self.match_token(TokenType::Semicolon)? {
      self.expression(vm)?;
      self.consume_token(
        TokenType::Semicolon,
        "Expect `;` after loop condition.".into(),
      )?;

      exit_jump = Some(self.emit_jump(OpCode::JumpIfFalse as u8)?);
      self.emit_byte(OpCode::Pop as u8)?;
    }

    if !self.match_token(TokenType::RightParen)? {
      let body_jump = self.emit_jump(OpCode::Jump as u8)?;
      let increment_start = self.chunk.code.len();
      self.expression(vm)?;
      self.emit_byte(OpCode::Pop as u8)?;
      self.consume_token(TokenType::RightParen, "Expect `)` after for clauses.".into())?;

      self.emit_loop(loop_start)?;
      loop_start = increment_start;
      self.patch_jump(body_jump)?;
    }

    self.statement(vm)?;
    self.emit_loop(loop_start)?;

    if let Some(exit_jump) = exit_jump {
      self.patch_jump(exit_jump)?;
      self.emit_byte(OpCode::Pop as u8)?;
    }

    self.end_scope()
  }

  /// Skips tokens indiscriminately until something that looks like a
  /// statement boundary — a semicolon or a statement-starting keyword — so
  /// one bad statement doesn't cascade into spurious errors for the rest of
  /// the file.
  pub(crate) fn synchronize(&mut self) -> Result<(), InterpretError> {
    self.panic_mode = false;
    while self.current.token_type != TokenType::Eof {
      if self.previous.token_type == TokenType::Semicolon {
        return Ok(());
      }
      match self.current.token_type {
        TokenType::Class
        | TokenType::Fun
        | TokenType::Var
        | TokenType::For
        | TokenType::If
        | TokenType::While
        | TokenType::Print
        | TokenType::Return => return Ok(()),
        _ => {}
      }
      self.advance_token()?;
    }
    Ok(())
  }

  pub(crate) fn expression_statement(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    self.expression(vm)?;
    self.consume_token(TokenType::Semicolon, "Expect `;` after expression.".into())?;
    self.emit_byte(OpCode::Pop as u8)
  }
}
