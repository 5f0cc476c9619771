//! # Table
//!
//! An open-addressed hash table keyed by interned-string *identity*, used
//! for both the VM's globals table and its string-intern set (see spec
//! §4.5). A `std::collections::HashMap` cannot serve both roles: the intern
//! set needs `tableFindString`, a *content*-based probe that runs before a
//! string has been interned — i.e. before any `ObjString` identity exists to
//! hash on. Open addressing over the raw bytes gets us that for free.

use std::ptr::NonNull;

use crate::{common::TABLE_MIN_CAPACITY, object::ObjString, utils::Init, value::Value};

/// `key: None, value: Bool(true)` marks a tombstone (deleted but probes
/// must still skip over it); `key: None, value: Nil` marks a truly empty
/// slot where probing may stop.
#[derive(Clone, Copy)]
struct Entry {
  key: Option<NonNull<ObjString>>,
  value: Value,
}

impl Entry {
  fn empty() -> Self {
    Self {
      key: None,
      value: Value::nil_val(),
    }
  }
}

#[derive(Clone, Default)]
pub struct Table {
  entries: Vec<Entry>,
  count: usize,
}

impl Init for Table {}

fn key_hash(key: NonNull<ObjString>) -> u32 {
  unsafe { key.as_ref() }.hash
}

impl Table {
  fn capacity(&self) -> usize {
    self.entries.len()
  }

  /// Linear probe for `key`'s slot. Remembers the first tombstone seen so
  /// that, if the search runs to a truly-empty slot, an insertion can reuse
  /// the tombstone's slot instead of extending the probe chain further.
  fn find_entry_index(entries: &[Entry], key: NonNull<ObjString>) -> usize {
    let capacity = entries.len();
    let mut index = (key_hash(key) as usize) % capacity;
    let mut tombstone: Option<usize> = None;

    loop {
      let entry = &entries[index];
      match entry.key {
        None => {
          if entry.value.is_nil() {
            return tombstone.unwrap_or(index);
          } else if tombstone.is_none() {
            tombstone = Some(index);
          }
        }
        Some(entry_key) if entry_key == key => return index,
        Some(_) => {}
      }
      index = (index + 1) % capacity;
    }
  }

  fn adjust_capacity(&mut self, capacity: usize) {
    let mut fresh = vec![Entry::empty(); capacity];
    let mut new_count = 0;

    for entry in self.entries.iter().filter(|e| e.key.is_some()) {
      let index = Self::find_entry_index(&fresh, entry.key.unwrap());
      fresh[index] = *entry;
      new_count += 1;
    }

    self.entries = fresh;
    self.count = new_count;
  }

  /// Inserts or updates `key`. Returns `true` if `key` was not already
  /// present (including when its old slot was a tombstone).
  pub fn set(&mut self, key: NonNull<ObjString>, value: Value) -> bool {
    if self.count + 1 > (self.capacity() as f64 * crate::common::TABLE_MAX_LOAD) as usize {
      let new_capacity = if self.capacity() < TABLE_MIN_CAPACITY {
        TABLE_MIN_CAPACITY
      } else {
        self.capacity() * 2
      };
      self.adjust_capacity(new_capacity);
    }

    let index = Self::find_entry_index(&self.entries, key);
    let entry = &mut self.entries[index];
    let is_new_key = entry.key.is_none();

    if is_new_key && entry.value.is_nil() {
      self.count += 1;
    }

    entry.key = Some(key);
    entry.value = value;
    is_new_key
  }

  pub fn get(&self, key: NonNull<ObjString>) -> Option<Value> {
    if self.count == 0 {
      return None;
    }
    let index = Self::find_entry_index(&self.entries, key);
    self.entries[index].key.map(|_| self.entries[index].value)
  }

  pub fn get_mut(&mut self, key: NonNull<ObjString>) -> Option<&mut Value> {
    if self.count == 0 {
      return None;
    }
    let index = Self::find_entry_index(&self.entries, key);
    if self.entries[index].key.is_some() {
      Some(&mut self.entries[index].value)
    } else {
      None
    }
  }

  /// Deletes `key`, leaving a tombstone so later probes through this slot
  /// for a different key still find it.
  pub fn delete(&mut self, key: NonNull<ObjString>) -> bool {
    if self.count == 0 {
      return false;
    }
    let index = Self::find_entry_index(&self.entries, key);
    let entry = &mut self.entries[index];
    if entry.key.is_none() {
      return false;
    }
    entry.key = None;
    entry.value = Value::bool_val(true);
    true
  }

  /// The sole content-based lookup: probes by raw bytes + hash, used only
  /// by string interning (`Vm::copy_string`/`take_string`) before an
  /// `ObjString` identity exists to compare against.
  pub fn find_string(&self, chars: &str, hash: u32) -> Option<NonNull<ObjString>> {
    if self.count == 0 {
      return None;
    }
    let capacity = self.capacity();
    let mut index = (hash as usize) % capacity;
    loop {
      let entry = &self.entries[index];
      match entry.key {
        None if entry.value.is_nil() => return None,
        Some(key) => {
          let candidate = unsafe { key.as_ref() };
          if candidate.hash == hash && candidate.data == chars {
            return Some(key);
          }
        }
        _ => {}
      }
      index = (index + 1) % capacity;
    }
  }

  pub fn free(&mut self) {
    self.entries.clear();
    self.count = 0;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::object::{Obj, ObjType};

  fn leak_string(data: &str) -> NonNull<ObjString> {
    let hash = crate::memory::fnv1a_hash(data.as_bytes());
    let boxed = Box::new(ObjString {
      obj: Obj::new(ObjType::String, None),
      data: data.to_owned(),
      hash,
    });
    NonNull::new(Box::into_raw(boxed)).unwrap()
  }

  #[test]
  fn set_then_get_round_trips() {
    let mut table = Table::init();
    let key = leak_string("alpha");
    assert!(table.set(key, Value::number_val(1.0)));
    assert_eq!(table.get(key), Some(Value::number_val(1.0)));
  }

  #[test]
  fn set_existing_key_returns_false_and_updates() {
    let mut table = Table::init();
    let key = leak_string("alpha");
    table.set(key, Value::number_val(1.0));
    assert!(!table.set(key, Value::number_val(2.0)));
    assert_eq!(table.get(key), Some(Value::number_val(2.0)));
  }

  #[test]
  fn delete_then_get_is_absent() {
    let mut table = Table::init();
    let key = leak_string("alpha");
    table.set(key, Value::number_val(1.0));
    assert!(table.delete(key));
    assert_eq!(table.get(key), None);
  }

  #[test]
  fn delete_preserves_probe_chain_past_tombstone() {
    let mut table = Table::init();
    // Force a handful of entries into a small table so some collide.
    let keys: Vec<_> = (0..20).map(|i| leak_string(&format!("k{i}"))).collect();
    for (i, &k) in keys.iter().enumerate() {
      table.set(k, Value::number_val(i as f64));
    }
    table.delete(keys[0]);
    for (i, &k) in keys.iter().enumerate().skip(1) {
      assert_eq!(table.get(k), Some(Value::number_val(i as f64)));
    }
  }

  #[test]
  fn find_string_matches_by_content() {
    let mut table = Table::init();
    let key = leak_string("needle");
    table.set(key, Value::nil_val());
    let hash = crate::memory::fnv1a_hash(b"needle");
    assert_eq!(table.find_string("needle", hash), Some(key));
    assert_eq!(table.find_string("haystack", hash), None);
  }
}
