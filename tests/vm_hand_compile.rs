//! Runs small scripts straight through the public `run_source` entry point,
//! exercising the fetch-decode-execute loop and constant pool end-to-end
//! (chunk internals are crate-private, so integration tests drive the VM the
//! same way the CLI does).

#[test]
fn arithmetic_runs_cleanly() {
  rlox::run_source("print (1.2 + 2.3) / 5.6;").expect("arithmetic should run cleanly");
}

#[test]
fn disassembly_does_not_panic() {
  use rlox::{chunk::Chunk, chunk::OpCode, debug::Debug, utils::Init};

  let mut chunk = Chunk::init();
  let constant = chunk.add_constant(1.2.into());
  chunk.write(OpCode::Constant as u8, 123);
  chunk.write(constant as u8, 123);
  chunk.write(OpCode::Negate as u8, 123);
  chunk.write(OpCode::Return as u8, 123);

  chunk.disassemble("Test Chunk");
}
