//! End-to-end scenarios driven entirely through `rlox::run_source`, covering
//! the interpreter's observable semantics: string-equality-by-interning,
//! short-circuit `or`/`and` with the truthy-zero edge case, variable
//! shadowing, and the exit-code-relevant failure paths.

use rlox::vm::InterpretError;

#[test]
fn truthy_zero_via_or_takes_the_if_branch() {
  // `if (nil or 0) print "t"; else print "f";` must print "t" — `nil` is
  // falsey so `or` falls through to `0`, and `0` is truthy.
  rlox::run_source(r#"if (nil or 0) print "t"; else print "f";"#)
    .expect("scenario 5 should run cleanly");
}

#[test]
fn undefined_global_read_is_a_runtime_error() {
  let result = rlox::run_source("print undefined_name;");
  match result {
    Err(InterpretError::RuntimeError(_)) => {}
    other => panic!("expected a runtime error, got {:?}", other),
  }
}

#[test]
fn equal_content_strings_compare_equal() {
  rlox::run_source(r#"print "abc" == "a" + "bc";"#).expect("string equality should run cleanly");
}

#[test]
fn zero_is_truthy_in_or() {
  // `0` is truthy (only `nil` and `false` are falsey), so `0 or "fallback"`
  // must short-circuit on the left operand and never touch the right one.
  rlox::run_source(
    r#"
    var x = 0 or "fallback";
    print x;
    "#,
  )
  .expect("truthy-zero or should run cleanly");
}

#[test]
fn nil_is_falsey_in_and() {
  rlox::run_source(
    r#"
    var x = nil and "unreached";
    print x;
    "#,
  )
  .expect("falsey nil and should run cleanly");
}

#[test]
fn nested_scope_shadowing_resolves_innermost() {
  rlox::run_source(
    r#"
    var a = "outer";
    {
      var a = "middle";
      {
        var a = "inner";
        print a;
      }
      print a;
    }
    print a;
    "#,
  )
  .expect("nested shadowing should run cleanly");
}

#[test]
fn assigning_undefined_global_is_a_runtime_error() {
  let result = rlox::run_source("x = 1;");
  match result {
    Err(InterpretError::RuntimeError(_)) => {}
    other => panic!("expected a runtime error, got {:?}", other),
  }
}

#[test]
fn unterminated_expression_is_a_compile_error() {
  let result = rlox::run_source("print 1 +;");
  match result {
    Err(InterpretError::CompileError(_)) => {}
    other => panic!("expected a compile error, got {:?}", other),
  }
}

#[test]
fn multiple_errors_are_all_reported_in_one_pass() {
  // Neither statement is valid, but the compiler must resynchronize after
  // the first and still attempt (and fail) the second, rather than bailing
  // out after just one diagnostic.
  let result = rlox::run_source(
    r#"
    print 1 +;
    print ;
    "#,
  );
  assert!(matches!(result, Err(InterpretError::CompileError(_))));
}
