//! # Chunk
//!
//! A chunk is a sequence of bytecode plus the two side-tables every
//! instruction needs: `lines` (one entry per byte, for runtime error
//! reporting) and `constants` (the constant pool operands index into).

use crate::{utils::Init, value::ValueArray, value::Value};
use enum_repr::EnumU8;

/// ## OpCode
///
/// Every instruction this interpreter emits. There is no dedicated
/// not-equal/greater-equal/less-equal opcode: the compiler emits `EQUAL`
/// followed by `NOT` for `!=`, and the mirrored pair for `>=`/`<=` (see
/// `compiler::parser::emit_methods`).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumU8)]
pub enum OpCode {
  Constant,
  Nil,
  True,
  False,
  Pop,
  GetLocal,
  SetLocal,
  GetGlobal,
  DefineGlobal,
  SetGlobal,
  Equal,
  Greater,
  Less,
  Add,
  Subtract,
  Multiply,
  Divide,
  Not,
  Negate,
  Print,
  Jump,
  JumpIfFalse,
  Loop,
  Return,
}

/// ## Chunk
///
/// A sequence of bytecode with parallel per-byte line info and its own
/// constant pool.
#[derive(Debug, Default, Clone)]
pub struct Chunk {
  pub(crate) code: Vec<u8>,
  pub(crate) lines: Vec<usize>,
  pub(crate) constants: ValueArray,
}

impl Chunk {
  /// Write a byte (an opcode or a raw operand byte) to the chunk, recording
  /// the source line it came from.
  pub fn write(&mut self, byte: u8, line: usize) {
    self.code.push(byte);
    self.lines.push(line);
  }

  /// Add a constant to the chunk's pool, then return its index.
  ///
  /// A constant index is a single byte, so a chunk can only ever hold 256
  /// constants — callers that can't guarantee the pool is under that cap
  /// (the compiler's `make_constant`) must check `self.constants.values.len()`
  /// themselves before calling this and report a compile error instead of
  /// letting the pool silently grow unaddressable.
  pub fn add_constant(&mut self, value: Value) -> usize {
    self.constants.write(value);
    self.constants.values.len() - 1
  }

  /// Clear the given chunk.
  pub fn clear(&mut self) {
    self.code.clear();
    self.lines.clear();
    self.constants.clear();
  }
}

impl Init for Chunk {}
