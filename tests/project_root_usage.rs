//! Loads real `.lox` fixtures from `demos/` (resolved relative to the
//! project root, not the test binary's working directory) and runs them
//! through the public interpreter entry point end-to-end.

use project_root::get_project_root;
use std::fs::read_to_string;

fn demo_path(name: &str) -> String {
  let project_root = get_project_root().expect("There is no project root");
  project_root.to_str().unwrap().to_owned() + "/demos/" + name
}

#[test]
fn arithmetic_demo_runs() {
  let source = read_to_string(demo_path("arithmetic.lox")).unwrap();
  rlox::run_source(&source).expect("arithmetic demo should run cleanly");
}

#[test]
fn scopes_and_loops_demo_runs() {
  let source = read_to_string(demo_path("scopes_and_loops.lox")).unwrap();
  rlox::run_source(&source).expect("scopes and loops demo should run cleanly");
}
