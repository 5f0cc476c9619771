//! # Value
//!
//! This module contains the `Value` type, the tagged runtime value every
//! stack slot, constant, and global holds.
//!
//! Core implementation is about a tagged `union`, mirroring the book's
//! `Value` struct instead of a Rust `enum` so a bare numeric/boolean value
//! costs exactly one tag byte plus the widest payload, with no extra
//! discriminant bookkeeping on the hot path.
//!
//! `ValueArray` (the chunk's constant pool) also lives here.

use std::fmt::{Debug, Display};
use std::ptr::NonNull;

use crate::{
  object::{Obj, ObjType},
  utils::Init,
};

/// ## ValueType
///
/// The tag of a `Value`. `Obj` covers every heap-allocated payload (today,
/// only strings — see `object::ObjType`).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, enum_repr::EnumU8)]
pub enum ValueType {
  Bool,
  Nil,
  Number,
  Obj,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union ValUnion {
  pub(crate) boolean: bool,
  pub(crate) number: f64,
  pub(crate) obj: NonNull<Obj>,
}

/// ## Value
///
/// A tagged-union runtime value: `Nil`, `Bool`, `Number`, or `Obj` (a pointer
/// into the VM's heap-object list).
#[derive(Clone, Copy)]
pub struct Value {
  pub(crate) value_type: ValueType,
  pub(crate) val_union: ValUnion,
}

impl Debug for Value {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.value_type {
      ValueType::Bool => write!(f, "Value::Bool({})", self.as_bool()),
      ValueType::Nil => write!(f, "Value::Nil"),
      ValueType::Number => write!(f, "Value::Number({})", self.as_number()),
      ValueType::Obj => write!(f, "Value::Obj({:?})", self.as_obj()),
    }
  }
}

impl Display for Value {
  /// The textual form `OP_PRINT` writes to stdout: `nil`, `true`/`false`,
  /// numbers via Rust's default (shortest-round-trippable) `f64` formatting,
  /// and strings as their raw contents (no surrounding quotes).
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.value_type {
      ValueType::Bool => write!(f, "{}", self.as_bool()),
      ValueType::Nil => write!(f, "nil"),
      ValueType::Number => write!(f, "{}", self.as_number()),
      ValueType::Obj => match self.obj_type() {
        ObjType::String => write!(f, "{}", self.as_rust_str()),
      },
    }
  }
}

/// Same tag, and then: nil-always-equal | bool-equals | IEEE-number-equals |
/// heap-identity-equals. Strings compare by identity because they are
/// interned — two distinct allocations can never hold equal content (see
/// `vm::Vm::copy_string`/`take_string`).
impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    if self.value_type != other.value_type {
      return false;
    }
    match self.value_type {
      ValueType::Nil => true,
      ValueType::Bool => self.as_bool() == other.as_bool(),
      ValueType::Number => self.as_number() == other.as_number(),
      ValueType::Obj => self.as_obj() == other.as_obj(),
    }
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Self::number_val(value)
  }
}
impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Self::bool_val(value)
  }
}

impl Value {
  pub fn is_bool(&self) -> bool {
    self.value_type == ValueType::Bool
  }

  pub fn is_nil(&self) -> bool {
    self.value_type == ValueType::Nil
  }

  pub fn is_number(&self) -> bool {
    self.value_type == ValueType::Number
  }

  pub fn is_obj(&self) -> bool {
    self.value_type == ValueType::Obj
  }

  /// `nil` and `false` are falsey; everything else (including `0` and `""`)
  /// is truthy.
  pub fn is_falsey(&self) -> bool {
    self.is_nil() || (self.is_bool() && !self.as_bool())
  }
}

impl Value {
  pub fn as_bool(&self) -> bool {
    debug_assert!(self.is_bool());
    unsafe { self.val_union.boolean }
  }

  pub fn as_number(&self) -> f64 {
    debug_assert!(self.is_number());
    unsafe { self.val_union.number }
  }

  pub fn as_obj(&self) -> NonNull<Obj> {
    debug_assert!(self.is_obj());
    unsafe { self.val_union.obj }
  }

  pub(crate) fn obj_type(&self) -> ObjType {
    unsafe { self.as_obj().as_ref() }.obj_type
  }
}

impl Value {
  pub fn bool_val(value: bool) -> Self {
    Self {
      value_type: ValueType::Bool,
      val_union: ValUnion { boolean: value },
    }
  }

  pub fn nil_val() -> Self {
    Self {
      value_type: ValueType::Nil,
      val_union: ValUnion { number: 0.0 },
    }
  }

  pub fn number_val(value: f64) -> Self {
    Self {
      value_type: ValueType::Number,
      val_union: ValUnion { number: value },
    }
  }

  pub fn obj_val(obj: NonNull<Obj>) -> Self {
    Self {
      value_type: ValueType::Obj,
      val_union: ValUnion { obj },
    }
  }
}

/// ## ValueArray
///
/// A chunk's constant pool: an ordered sequence of Values referenced by
/// 1-byte indices in the bytecode.
#[derive(Debug, Default, Clone)]
pub struct ValueArray {
  pub(crate) values: Vec<Value>,
}

impl ValueArray {
  /// Write a value to the given value_array.
  pub fn write(&mut self, value: Value) {
    self.values.push(value);
  }

  /// Clear the given value_array.
  pub fn clear(&mut self) {
    self.values.clear();
  }
}

impl Init for ValueArray {}
