use super::*;

impl<'a> Parser<'a> {
  fn parse_variable(&mut self, vm: &mut VM, message: String) -> Result<u8, InterpretError> {
    self.consume_token(TokenType::Identifier, message)?;

    self.declare_variable()?;
    // Locals are addressed by stack slot, not a constant-pool index — the
    // index returned here is never used when `scope_depth > 0`.
    if self.compiler.scope_depth > 0 {
      return Ok(0);
    }

    self.identifier_constant(vm)
  }

  fn mark_initialized(&mut self) {
    self.compiler.locals.last_mut().unwrap().initialized = true;
  }

  fn define_variable(&mut self, global_index: u8) -> Result<(), InterpretError> {
    if self.compiler.scope_depth > 0 {
      self.mark_initialized();
      Ok(())
    } else {
      self.emit_bytes(&[OpCode::DefineGlobal as u8, global_index])
    }
  }

  /// Records the existence of a local variable (globals need no such
  /// bookkeeping — they live in the VM's globals table, not on the stack).
  fn declare_variable(&mut self) -> Result<(), InterpretError> {
    if self.compiler.scope_depth == 0 {
      return Ok(());
    }

    // Shadowing an outer scope's variable is fine; redeclaring one already
    // in *this* scope is an error.
    for local in self
      .compiler
      .locals
      .iter()
      .rev()
      .take(self.compiler.local_count)
    {
      if local.depth < self.compiler.scope_depth {
        break;
      }
      if local.name.lexeme == self.previous.lexeme {
        return Err(self
          .error("Already a variable with this name in this scope.".into())
          .unwrap_err());
      }
    }

    self.add_local()
  }

  fn add_local(&mut self) -> Result<(), InterpretError> {
    if self.compiler.local_count >= crate::common::LOCALS_MAX {
      return Err(self
        .error("Too many local variables in function.".into())
        .unwrap_err());
    }
    self.compiler.locals.push(Local {
      depth: self.compiler.scope_depth,
      name: self.previous,
      initialized: false,
    });
    self.compiler.local_count += 1;
    Ok(())
  }

  pub(crate) fn identifier_constant(&mut self, vm: &mut VM) -> Result<u8, InterpretError> {
    let ptr = vm.copy_string(self.previous.lexeme);
    self.make_constant(Value::obj_val(ptr.cast()))
  }

  /// Searches the locals stack innermost-first for an exact lexeme match —
  /// the most recently declared local with that name wins, so a shadowing
  /// redeclaration in a nested scope resolves to the inner one.
  pub(crate) fn resolve_local(&mut self) -> Result<Option<usize>, InterpretError> {
    let pos = self.compiler.locals[..self.compiler.local_count]
      .iter()
      .rposition(|local| local.name.lexeme == self.previous.lexeme);
    if let Some(pos) = pos {
      if !self.compiler.locals[pos].initialized {
        return Err(self
          .error("Can't read local variable in its own initializer.".into())
          .unwrap_err());
      }
    }
    Ok(pos)
  }

  pub(crate) fn var_declaration(&mut self, vm: &mut VM) -> Result<(), InterpretError> {
    let global_index = self.parse_variable(vm, "Expect variable name.".into())?;

    if self.match_token(TokenType::Equal)? {
      self.expression(vm)?;
    } else {
      self.emit_byte(OpCode::Nil as u8)?;
    }

    self.consume_token(
      TokenType::Semicolon,
      "Expect `;` after variable declaration.".into(),
    )?;

    self.define_variable(global_index)
  }
}
