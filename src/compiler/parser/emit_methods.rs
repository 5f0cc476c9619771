use super::*;

impl<'a> Parser<'a> {
  /// Emits a jump instruction with a placeholder 2-byte offset, returning
  /// the offset of that placeholder for `patch_jump` to fill in once the
  /// jump target is known.
  pub(crate) fn emit_jump(&mut self, instruction: u8) -> Result<usize, InterpretError> {
    self.emit_byte(instruction)?;
    self.emit_bytes(&[0xff, 0xff])?;
    Ok(self.chunk.code.len() - 2)
  }

  /// Back-patches the placeholder at `offset` with the distance from just
  /// past it to the current end of the chunk.
  pub(crate) fn patch_jump(&mut self, offset: usize) -> Result<(), InterpretError> {
    let jump = self.chunk.code.len() - offset - 2;

    if jump > u16::MAX as usize {
      return Err(self.error("Too much code to jump over.".into()).unwrap_err());
    }

    self.chunk.code[offset] = ((jump >> 8) & 0xff) as u8;
    self.chunk.code[offset + 1] = (jump & 0xff) as u8;

    Ok(())
  }

  /// Emits `OP_LOOP` plus the backward offset to `loop_start`, used by
  /// `while`/`for` to jump back to the top of the loop body.
  pub(crate) fn emit_loop(&mut self, loop_start: usize) -> Result<(), InterpretError> {
    self.emit_byte(OpCode::Loop as u8)?;

    let offset = self.chunk.code.len() - loop_start + 2;
    if offset > u16::MAX as usize {
      return Err(self.error("Loop body too large.".into()).unwrap_err());
    }

    self.emit_bytes(&[((offset >> 8) & 0xff) as u8, (offset & 0xff) as u8])
  }

  /// Appending a sequence of bytes to the chunk (in order).
  pub(crate) fn emit_bytes(&mut self, bytes: &[u8]) -> Result<(), InterpretError> {
    for &byte in bytes {
      self.emit_byte(byte)?;
    }
    Ok(())
  }

  /// Appending a single byte to the chunk.
  pub(crate) fn emit_byte(&mut self, byte: u8) -> Result<(), InterpretError> {
    self.chunk.write(byte, self.previous.line);
    Ok(())
  }

  /// Specifically appending the return instruction to the chunk.
  pub(crate) fn emit_return(&mut self) -> Result<(), InterpretError> {
    self.emit_byte(OpCode::Return as u8)
  }

  /// Wrapper for appending `constant` and `index` info to the chunk.
  pub(crate) fn emit_constant(&mut self, value: Value) -> Result<(), InterpretError> {
    let constant_index = self.make_constant(value)?;
    self.emit_bytes(&[OpCode::Constant as u8, constant_index])
  }

  /// Operations after end of compilation.
  pub(crate) fn end_compiler(&mut self) -> Result<(), InterpretError> {
    self.emit_return()
  }
}
