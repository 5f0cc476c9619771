//! # Object
//!
//! This module defines `Obj`, the meta type of every heap-allocated value,
//! and `ObjString`, the only concrete object kind this interpreter needs.
//!
//! Every object is threaded onto an intrusive singly-linked list (the
//! `next` field) so the VM can walk and free them all at shutdown without a
//! second container (see `vm::Vm::free`).

use std::fmt::{Debug, Display};
use std::ptr::NonNull;

use crate::value::Value;

/// ## Object Type
///
/// The kind of a heap object. Only strings exist in this language — no
/// closures, classes, or instances (see spec Non-goals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjType {
  String,
}

/// ## Object
///
/// The common header every heap object starts with. `ObjString` is laid out
/// `#[repr(C)]` with `Obj` as its first field, so a `NonNull<ObjString>` can
/// always be cast down to `NonNull<Obj>` and back.
#[derive(Debug)]
pub struct Obj {
  pub(crate) obj_type: ObjType,
  pub(crate) next: Option<NonNull<Obj>>,
}

impl Obj {
  pub fn new(obj_type: ObjType, next: Option<NonNull<Obj>>) -> Self {
    Self { obj_type, next }
  }
}

/// ## Object String
///
/// An interned, immutable string payload plus its cached FNV-1a hash.
#[repr(C)]
#[derive(Debug)]
pub struct ObjString {
  pub(crate) obj: Obj,
  pub(crate) data: String,
  pub(crate) hash: u32,
}

impl Display for ObjString {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.data)
  }
}

/// Interning invariant: two `ObjString`s are equal iff they are the same
/// allocation. Content equality never holds between distinct allocations
/// because every string is funneled through `Vm::copy_string`/`take_string`.
impl PartialEq for ObjString {
  fn eq(&self, other: &Self) -> bool {
    std::ptr::eq(self, other)
  }
}
impl Eq for ObjString {}

impl std::hash::Hash for ObjString {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.hash.hash(state);
  }
}

impl Value {
  pub fn is_string(&self) -> bool {
    self.is_obj() && self.obj_type() == ObjType::String
  }

  /// Casts an `Obj`-tagged Value to its `ObjString` pointer.
  ///
  /// # Panics
  /// Panics if the value is not a string — callers (the VM's opcode
  /// dispatch, the compiler's `identifier_constant`) only call this after
  /// `is_string()` already returned true, or on a Value just built as one.
  pub fn as_string(&self) -> NonNull<ObjString> {
    assert!(self.is_string(), "Value is not a string.");
    self.as_obj().cast()
  }

  pub fn as_rust_str(&self) -> &str {
    unsafe { self.as_string().as_ref() }.data.as_str()
  }
}
