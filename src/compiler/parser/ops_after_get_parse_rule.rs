use super::*;

impl<'a> Parser<'a> {
  pub(crate) fn number_adapter(
    &mut self,
    _vm: &mut VM,
    _can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.number()
  }

  fn number(&mut self) -> Result<(), InterpretError> {
    match self.previous.lexeme.parse::<f64>() {
      Ok(value) => self.emit_constant(value.into()),
      Err(_) => Err(InterpretError::CompileError(
        "Failed to parse number(value).".into(),
      )),
    }
  }

  pub(crate) fn string_adapter(
    &mut self,
    vm: &mut VM,
    _can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.string(vm)
  }

  /// Strips the surrounding quotes off the lexeme and interns the rest.
  fn string(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    let len = self.previous.lexeme.len();
    let contents = &self.previous.lexeme[1..len - 1];
    let ptr = vm.copy_string(contents);
    self.emit_constant(Value::obj_val(ptr.cast()))
  }

  pub(crate) fn variable_adapter(
    &mut self,
    vm: &mut VM,
    can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.named_variable(vm, can_assign)
  }

  fn named_variable(&mut self, vm: &mut VM, can_assign: bool) -> Result<(), InterpretError> {
    let arg = self.resolve_local()?;
    let (arg, get_op, set_op) = if let Some(arg) = arg {
      (arg as u8, OpCode::GetLocal, OpCode::SetLocal)
    } else {
      (
        self.identifier_constant(vm)?,
        OpCode::GetGlobal,
        OpCode::SetGlobal,
      )
    };
    if can_assign && self.match_token(TokenType::Equal)? {
      self.expression(vm)?;
      self.emit_bytes(&[set_op as u8, arg])
    } else {
      self.emit_bytes(&[get_op as u8, arg])
    }
  }

  pub(crate) fn unary_adapter(
    &mut self,
    vm: &mut VM,
    _can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.unary(vm)
  }

  fn unary(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    let operator_type = self.previous.token_type;

    // Compile the operand first so its value ends up on top of the stack.
    self.parse_precedence(vm, Precedence::Unary)?;

    match operator_type {
      TokenType::Bang => self.emit_byte(OpCode::Not as u8),
      TokenType::Minus => self.emit_byte(OpCode::Negate as u8),
      _ => Err(InterpretError::CompileError(
        "Unknown unary operator.".into(),
      )),
    }
  }

  pub(crate) fn binary_adapter(
    &mut self,
    vm: &mut VM,
    _can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.binary(vm)
  }

  /// No dedicated `!=`/`>=`/`<=` opcode exists: each is emitted as its
  /// complement followed by `OP_NOT` (`a != b` is `!(a == b)`, and so on).
  fn binary(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    let operator_type = self.previous.token_type;
    let rule = self.get_rule(operator_type);
    self.parse_precedence(vm, rule.precedence.next())?;

    match operator_type {
      TokenType::BangEqual => self.emit_bytes(&[OpCode::Equal as u8, OpCode::Not as u8]),
      TokenType::EqualEqual => self.emit_byte(OpCode::Equal as u8),
      TokenType::Greater => self.emit_byte(OpCode::Greater as u8),
      TokenType::GreaterEqual => self.emit_bytes(&[OpCode::Less as u8, OpCode::Not as u8]),
      TokenType::Less => self.emit_byte(OpCode::Less as u8),
      TokenType::LessEqual => self.emit_bytes(&[OpCode::Greater as u8, OpCode::Not as u8]),
      TokenType::Plus => self.emit_byte(OpCode::Add as u8),
      TokenType::Minus => self.emit_byte(OpCode::Subtract as u8),
      TokenType::Star => self.emit_byte(OpCode::Multiply as u8),
      TokenType::Slash => self.emit_byte(OpCode::Divide as u8),
      _ => Err(InterpretError::CompileError(
        "Unknown binary operator.".into(),
      )),
    }
  }

  pub(crate) fn literal_adapter(
    &mut self,
    _vm: &mut VM,
    _can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.literal()
  }

  fn literal(&mut self) -> Result<(), InterpretError> {
    match self.previous.token_type {
      TokenType::False => self.emit_byte(OpCode::False as u8),
      TokenType::Nil => self.emit_byte(OpCode::Nil as u8),
      TokenType::True => self.emit_byte(OpCode::True as u8),
      _ => Err(InterpretError::CompileError(
        "Unknown literal operator.".into(),
      )),
    }
  }

  pub(crate) fn grouping_adapter(
    &mut self,
    vm: &mut VM,
    _can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.grouping(vm)
  }

  fn grouping(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    self.expression(vm)?;
    self.consume_token(
      TokenType::RightParen,
      "Expect `)` after expression.".to_owned(),
    )
  }

  pub(crate) fn and_adapter(
    &mut self,
    vm: &mut VM,
    _can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.and(vm)
  }

  /// `a and b`: if `a` is falsey, skip `b` entirely and leave `a` as the
  /// result; otherwise discard `a` and evaluate `b`.
  fn and(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    let end_jump = self.emit_jump(OpCode::JumpIfFalse as u8)?;
    self.emit_byte(OpCode::Pop as u8)?;
    self.parse_precedence(vm, Precedence::And)?;
    self.patch_jump(end_jump)
  }

  pub(crate) fn or_adapter(
    &mut self,
    vm: &mut VM,
    _can_assign: bool,
  ) -> Result<(), InterpretError> {
    self.or(vm)
  }

  /// `a or b`: if `a` is truthy, skip `b` and leave `a` as the result;
  /// otherwise discard `a` and evaluate `b`.
  fn or(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    let else_jump = self.emit_jump(OpCode::JumpIfFalse as u8)?;
    let end_jump = self.emit_jump(OpCode::Jump as u8)?;

    self.patch_jump(else_jump)?;
    self.emit_byte(OpCode::Pop as u8)?;

    self.parse_precedence(vm, Precedence::Or)?;
    self.patch_jump(end_jump)
  }
}
