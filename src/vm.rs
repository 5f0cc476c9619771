//! # VM
//!
//! The stack-based bytecode virtual machine: a fetch-decode-execute loop
//! over a `Chunk`'s flat byte stream, plus the runtime state no single
//! instruction owns (the value stack, globals, the string-intern table, and
//! the heap-object list).

#[cfg(feature = "debug_trace_execution")]
use crate::debug::Debug;
use crate::{
  chunk::{Chunk, OpCode},
  common::STACK_MAX,
  compiler,
  memory,
  object::{Obj, ObjString},
  table::Table,
  utils::Init,
  value::Value,
};
use std::ptr::NonNull;

/// ## InterpretError
///
/// The two ways a source program can fail to run to completion. The CLI
/// driver (`main.rs`) maps these to process exit codes 65/70.
#[derive(Debug, Clone)]
pub enum InterpretError {
  CompileError(String),
  RuntimeError(String),
}

/// ## VM
///
/// The virtual machine: one fixed-size value stack, one chunk's worth of
/// bytecode, globals, the string-intern set, and the head of the heap's
/// intrusive object list.
pub struct VM {
  pub(crate) chunk: Chunk,
  /// Index of the next byte to execute in `chunk.code`.
  pub(crate) ip: usize,
  /// Fixed-capacity value stack. Overflow/underflow are fatal VM bugs, not
  /// recoverable runtime errors (see `push`/`pop`).
  pub(crate) stack: [Value; STACK_MAX],
  pub(crate) stack_top: usize,
  pub(crate) globals: Table,
  /// Every string ever created funnels through `copy_string`/`take_string`,
  /// which consult this table first — the single source of truth for
  /// "do two strings have the same content".
  pub(crate) strings: Table,
  /// Head of the intrusive singly-linked list of every heap object this VM
  /// has allocated. Walked once and dropped wholesale by `free`.
  pub(crate) objects: Option<NonNull<Obj>>,
}

impl Default for VM {
  fn default() -> Self {
    Self {
      chunk: Chunk::default(),
      ip: 0,
      stack: [Value::nil_val(); STACK_MAX],
      stack_top: 0,
      globals: Table::default(),
      strings: Table::default(),
      objects: None,
    }
  }
}

impl Init for VM {}

impl VM {
  /// Compile and run a source string from scratch.
  pub fn interpret(&mut self, source: &str) -> Result<(), InterpretError> {
    self.chunk = Chunk::init();
    let chunk = compiler::compile(source, self)?;
    self.chunk = chunk;
    self.ip = 0;
    self.run()
  }

  /// Free the chunk, drain the stack, and drop every heap object this VM
  /// ever allocated. Called once, when the VM goes out of scope.
  pub fn free(&mut self) {
    self.chunk.clear();
    self.stack_top = 0;
    self.globals.free();
    self.strings.free();
    unsafe { memory::free_objects(self.objects) };
    self.objects = None;
  }
}

impl VM {
  fn push(&mut self, value: Value) {
    assert!(self.stack_top < STACK_MAX, "Stack overflow.");
    self.stack[self.stack_top] = value;
    self.stack_top += 1;
  }

  fn pop(&mut self) -> Value {
    assert!(self.stack_top > 0, "Stack underflow.");
    self.stack_top -= 1;
    self.stack[self.stack_top]
  }

  fn peek(&self, distance: usize) -> Value {
    self.stack[self.stack_top - 1 - distance]
  }

  /// Intern a borrowed string, copying it only if no equal-content string
  /// has been interned yet.
  pub(crate) fn copy_string(&mut self, chars: &str) -> NonNull<ObjString> {
    let hash = memory::fnv1a_hash(chars.as_bytes());
    if let Some(interned) = self.strings.find_string(chars, hash) {
      return interned;
    }
    let ptr = memory::allocate_string(&mut self.objects, chars.to_owned(), hash);
    self.strings.set(ptr, Value::nil_val());
    ptr
  }

  /// Intern an owned string, taking ownership of the allocation if no
  /// equal-content string has been interned yet (used by concatenation,
  /// which has already built a fresh `String` that would otherwise be
  /// thrown away on an intern hit).
  pub(crate) fn take_string(&mut self, data: String) -> NonNull<ObjString> {
    let hash = memory::fnv1a_hash(data.as_bytes());
    if let Some(interned) = self.strings.find_string(&data, hash) {
      return interned;
    }
    let ptr = memory::allocate_string(&mut self.objects, data, hash);
    self.strings.set(ptr, Value::nil_val());
    ptr
  }

  fn concatenate(&mut self) {
    let b = self.pop();
    let a = self.pop();
    let mut joined = String::with_capacity(a.as_rust_str().len() + b.as_rust_str().len());
    joined.push_str(a.as_rust_str());
    joined.push_str(b.as_rust_str());
    let ptr = self.take_string(joined);
    self.push(Value::obj_val(ptr.cast()));
  }
}

impl VM {
  fn read_byte(&mut self) -> u8 {
    let byte = self.chunk.code[self.ip];
    self.ip += 1;
    byte
  }

  fn read_constant(&mut self) -> Value {
    let index = self.read_byte();
    self.chunk.constants.values[index as usize]
  }

  fn read_u16(&mut self) -> u16 {
    self.ip += 2;
    u16::from_be_bytes([self.chunk.code[self.ip - 2], self.chunk.code[self.ip - 1]])
  }
}

#[cfg(feature = "debug_trace_stack")]
impl VM {
  fn trace_stack(&self) {
    print!("        | ");
    print!("[");
    for i in 0..self.stack_top {
      print!("{}", self.stack[i]);
      if i + 1 != self.stack_top {
        print!(", ");
      }
    }
    println!("]")
  }
}

impl VM {
  /// Run to completion from the current `ip` over the current `chunk`.
  pub fn run(&mut self) -> Result<(), InterpretError> {
    loop {
      #[cfg(feature = "debug_trace_stack")]
      self.trace_stack();
      #[cfg(feature = "debug_trace_execution")]
      self.chunk.disassemble_instruction(self.ip);

      match self.run_one_step()? {
        Some(()) => continue,
        None => return Ok(()),
      }
    }
  }

  /// Execute one instruction. Returns `Ok(None)` on `OP_RETURN` (the signal
  /// to stop), `Ok(Some(()))` otherwise.
  #[inline]
  fn run_one_step(&mut self) -> Result<Option<()>, InterpretError> {
    let op: OpCode = self.read_byte().into();
    match op {
      OpCode::Constant => {
        let constant = self.read_constant();
        self.push(constant);
      }
      OpCode::Nil => self.push(Value::nil_val()),
      OpCode::True => self.push(Value::bool_val(true)),
      OpCode::False => self.push(Value::bool_val(false)),
      OpCode::Pop => {
        self.pop();
      }
      OpCode::GetLocal => {
        let slot = self.read_byte();
        self.push(self.stack[slot as usize]);
      }
      OpCode::SetLocal => {
        let slot = self.read_byte();
        self.stack[slot as usize] = self.peek(0);
      }
      OpCode::GetGlobal => {
        let name = self.read_constant().as_string();
        match self.globals.get(name) {
          Some(value) => self.push(value),
          None => {
            return Err(self.runtime_error(format!(
              "Undefined variable '{}'.",
              unsafe { name.as_ref() }
            )))
          }
        }
      }
      OpCode::DefineGlobal => {
        let name = self.read_constant().as_string();
        let value = self.peek(0);
        self.globals.set(name, value);
        self.pop();
      }
      OpCode::SetGlobal => {
        let name = self.read_constant().as_string();
        let value = self.peek(0);
        if self.globals.set(name, value) {
          self.globals.delete(name);
          return Err(self.runtime_error(format!(
            "Undefined variable '{}'.",
            unsafe { name.as_ref() }
          )));
        }
      }
      OpCode::Equal => {
        let b = self.pop();
        let a = self.pop();
        self.push(Value::bool_val(a == b));
      }
      OpCode::Greater => self.number_binary_op(|a, b| Value::bool_val(a > b))?,
      OpCode::Less => self.number_binary_op(|a, b| Value::bool_val(a < b))?,
      OpCode::Add => {
        if self.peek(0).is_string() && self.peek(1).is_string() {
          self.concatenate();
        } else if self.peek(0).is_number() && self.peek(1).is_number() {
          let b = self.pop().as_number();
          let a = self.pop().as_number();
          self.push(Value::number_val(a + b));
        } else {
          return Err(self.runtime_error("Operands must be two numbers or two strings.".into()));
        }
      }
      OpCode::Subtract => self.number_binary_op(|a, b| Value::number_val(a - b))?,
      OpCode::Multiply => self.number_binary_op(|a, b| Value::number_val(a * b))?,
      OpCode::Divide => self.number_binary_op(|a, b| Value::number_val(a / b))?,
      OpCode::Not => {
        let value = self.pop();
        self.push(Value::bool_val(value.is_falsey()));
      }
      OpCode::Negate => {
        if !self.peek(0).is_number() {
          return Err(self.runtime_error("Operand must be a number.".into()));
        }
        let value = self.pop().as_number();
        self.push(Value::number_val(-value));
      }
      OpCode::Print => {
        let value = self.pop();
        println!("{}", value);
      }
      OpCode::Jump => {
        let offset = self.read_u16();
        self.ip += offset as usize;
      }
      OpCode::JumpIfFalse => {
        let offset = self.read_u16();
        if self.peek(0).is_falsey() {
          self.ip += offset as usize;
        }
      }
      OpCode::Loop => {
        let offset = self.read_u16();
        self.ip -= offset as usize;
      }
      OpCode::Return => return Ok(None),
    }
    Ok(Some(()))
  }

  /// Shared body for every binary operator that requires both operands to
  /// be numbers (everything except `==` and `+`, which have their own
  /// string-aware handling).
  fn number_binary_op(&mut self, op: impl Fn(f64, f64) -> Value) -> Result<(), InterpretError> {
    if !self.peek(0).is_number() || !self.peek(1).is_number() {
      return Err(self.runtime_error("Operands must be numbers.".into()));
    }
    let b = self.pop().as_number();
    let a = self.pop().as_number();
    self.push(op(a, b));
    Ok(())
  }
}

impl VM {
  /// Builds a `RuntimeError` tagged with the source line of the instruction
  /// that just ran, then clears the stack (a runtime error aborts the whole
  /// program; there is no recovery to a known-good stack depth).
  ///
  /// Message first, then the `[line L] in script` location on its own line —
  /// matches the original `runtimeError`'s `vfprintf`/`fputs`/`fprintf` order.
  pub fn runtime_error(&mut self, message: String) -> InterpretError {
    let inst_index = self.ip - 1;
    let line = self.chunk.lines[inst_index];
    self.stack_top = 0;
    InterpretError::RuntimeError(format!("{}\n[line {}] in script", message, line))
  }
}
