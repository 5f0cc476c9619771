//! # Memory
//!
//! The object-heap subsystem: allocating heap objects onto the VM's
//! intrusive list and freeing that list wholesale at shutdown. There is no
//! tracing garbage collector — objects live until `Vm::free` walks the list
//! once and drops everything (see spec Non-goals: no reachability tracing).

use std::ptr::NonNull;

use crate::object::{Obj, ObjType, ObjString};

/// FNV-1a, 32-bit. Matches the book's `hashString`; used to hash every
/// string that gets interned, and cached on `ObjString` so lookups never
/// re-hash.
pub(crate) fn fnv1a_hash(bytes: &[u8]) -> u32 {
  const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
  const FNV_PRIME: u32 = 0x0100_0193;

  let mut hash = FNV_OFFSET_BASIS;
  for &byte in bytes {
    hash ^= byte as u32;
    hash = hash.wrapping_mul(FNV_PRIME);
  }
  hash
}

/// Allocates a new `ObjString` on the heap, links it onto the intrusive
/// object list headed by `objects_head`, and returns a pointer to it.
///
/// Ownership transfers to the list: the caller never drops the returned
/// pointer directly, only via `free_objects` at VM shutdown.
pub(crate) fn allocate_string(
  objects_head: &mut Option<NonNull<Obj>>,
  data: String,
  hash: u32,
) -> NonNull<ObjString> {
  let obj_string = Box::new(ObjString {
    obj: Obj::new(ObjType::String, *objects_head),
    data,
    hash,
  });
  let ptr = NonNull::new(Box::into_raw(obj_string)).expect("Box::into_raw is never null");
  *objects_head = Some(ptr.cast());
  ptr
}

/// Walks the intrusive heap-object list once, reconstructing and dropping
/// each `Box` that `allocate_string` leaked. Called exactly once, from
/// `Vm::free`, at interpreter shutdown.
///
/// # Safety
/// `head` must be the VM's own `objects` list: every node must have been
/// produced by `allocate_string` and not yet freed.
pub(crate) unsafe fn free_objects(head: Option<NonNull<Obj>>) {
  let mut current = head;
  while let Some(obj_ptr) = current {
    let next = obj_ptr.as_ref().next;
    match obj_ptr.as_ref().obj_type {
      ObjType::String => {
        drop(Box::from_raw(obj_ptr.cast::<ObjString>().as_ptr()));
      }
    }
    current = next;
  }
}
