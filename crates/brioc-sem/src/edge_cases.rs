//! Scenario tests driving the analyzer through real source text.
//!
//! These complement the unit tests inside each module: every test parses a
//! small program, runs a fresh checker, and inspects the collected
//! diagnostics end to end.

use brioc_par::parse;
use brioc_util::ErrorCode;

use crate::checker::{analyze, Analysis};

fn check_source(source: &str) -> Analysis {
    analyze(&parse(source).expect("syntax error in test source"))
}

fn codes(analysis: &Analysis) -> Vec<ErrorCode> {
    analysis.reporter.iter().map(|d| d.code).collect()
}

fn assert_clean(source: &str) {
    let analysis = check_source(source);
    assert!(
        !analysis.reporter.has_errors(),
        "esperaba sin errores, obtuve: {}",
        analysis.reporter
    );
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn array_index_and_element_type() {
    assert_clean(
        "let a: integer[] = [1, 2, 3];
         let x: integer = a[0];",
    );
}

#[test]
fn multidim_arrays_basics() {
    assert_clean(
        "let m: integer[][] = [[1,2],[3,4]];
         let t: integer[] = m[0];
         let v: integer = t[1];",
    );
}

#[test]
fn heterogeneous_array_literal() {
    let analysis = check_source("let a = [1, \"dos\", 3];");
    assert!(codes(&analysis).contains(&ErrorCode::ArrayElem));
}

#[test]
fn empty_array_literal_is_void_array() {
    // `void[]` does not match `integer[]`, so the initializer is rejected.
    let analysis = check_source("let a: integer[] = [];");
    assert_eq!(codes(&analysis), vec![ErrorCode::Assign]);
}

#[test]
fn chained_indexing_of_literal_matrix() {
    assert_clean("let v: integer = [[1,2],[3,4]][0][1];");
}

// ============================================================================
// Assignment and constants
// ============================================================================

#[test]
fn const_decl_initialization_ok() {
    assert_clean("const C: integer = 10;");
}

#[test]
fn const_type_mismatch() {
    let analysis = check_source("const C: integer = \"diez\";");
    assert_eq!(codes(&analysis), vec![ErrorCode::Assign]);
}

#[test]
fn assignment_result_type_is_lhs() {
    // `x = 1` has type integer, so chained assignment into y is fine.
    assert_clean(
        "let x: integer = 0;
         let y: integer = 0;
         y = x = 1;",
    );
}

#[test]
fn uninitialized_then_assigned() {
    assert_clean(
        "let s: string;
         s = \"hola\";",
    );
}

// ============================================================================
// Functions and returns
// ============================================================================

#[test]
fn function_decl_and_return_ok() {
    assert_clean(
        "function suma(a: integer, b: integer): integer {
           return a + b;
         }
         let z: integer = suma(1, 2);",
    );
}

#[test]
fn call_arity_mismatch() {
    let analysis = check_source(
        "function f(a: integer): integer { return a; }
         let x: integer = f(1, 2);",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Call]);
}

#[test]
fn call_argument_type_mismatch() {
    let analysis = check_source(
        "function f(a: integer): integer { return a; }
         let x: integer = f(\"uno\");",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Call]);
}

#[test]
fn calling_a_variable_is_an_error() {
    let analysis = check_source(
        "let v: integer = 1;
         v();",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Call]);
}

#[test]
fn void_function_with_return_value_mismatch() {
    let analysis = check_source("function f(): void { return 1; }");
    assert_eq!(codes(&analysis), vec![ErrorCode::Return]);
}

#[test]
fn bare_return_in_void_function_ok() {
    assert_clean("function f(): void { return; }");
}

#[test]
fn function_identifier_in_expression_position_has_function_type() {
    // The bare name types as a function, which no primitive accepts.
    let analysis = check_source(
        "function f(): integer { return 1; }
         let x: integer = f;",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Assign]);
}

// ============================================================================
// Closures and nested functions
// ============================================================================

#[test]
fn nested_functions_decl_ok() {
    assert_clean(
        "function outer(): integer {
           let base: integer = 5;
           function inner(): integer {
             return base + 1;
           }
           return inner();
         }",
    );
}

#[test]
fn nested_functions_capture_undeclared() {
    let analysis = check_source(
        "function outer(): integer {
           function inner(): integer {
             return base + 1;
           }
           return 0;
         }",
    );
    assert!(codes(&analysis).contains(&ErrorCode::Undef));
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn class_fields_and_constructor_decl_ok() {
    assert_clean(
        "class Point {
           let x: integer;
           let y: integer;
           function constructor(x: integer, y: integer) {
             this.x = x;
             this.y = y;
           }
           function touch(): void { }
         }
         let p: Point;",
    );
}

#[test]
fn unknown_property_access_stays_silent() {
    // Reading a property that does not exist resolves to void with no
    // diagnostic of its own; only downstream uses may complain.
    assert_clean(
        "class A { let v: integer; }
         let a: A = new A();
         a.nope;",
    );
}

#[test]
fn inherited_field_visible_through_base_chain() {
    assert_clean(
        "class Base { let n: integer; }
         class Derived : Base { }
         let d: Derived = new Derived();
         let n: integer = d.n;",
    );
}

#[test]
fn constructor_inherited_from_base() {
    assert_clean(
        "class Base {
           let n: integer;
           function constructor(n: integer) { this.n = n; }
         }
         class Derived : Base { }
         let d: Derived = new Derived(3);",
    );
}

#[test]
fn method_argument_mismatch() {
    let analysis = check_source(
        "class A {
           function set(v: integer): void { }
         }
         let a: A = new A();
         a.set(\"x\");",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Call]);
}

#[test]
fn method_on_later_declared_sibling() {
    // Member signatures are published before bodies are walked, so a
    // method may call a sibling declared after it.
    assert_clean(
        "class A {
           function first(): integer { return this.second(); }
           function second(): integer { return 1; }
         }",
    );
}

#[test]
fn duplicate_class_name_is_redeclaration() {
    let analysis = check_source("class A { } class A { }");
    assert_eq!(codes(&analysis), vec![ErrorCode::Redecl]);
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn conditions_must_be_boolean() {
    let analysis = check_source(
        "let x: integer = 1;
         if (x) { }
         while (x + 1) { }",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::If, ErrorCode::While]);
}

#[test]
fn do_while_condition_checked_after_body() {
    let analysis = check_source("do { } while (1);");
    assert_eq!(codes(&analysis), vec![ErrorCode::DoWhile]);
}

#[test]
fn for_condition_must_be_boolean() {
    let analysis = check_source("for (let i: integer = 0; i + 1; i = i + 1) { }");
    assert_eq!(codes(&analysis), vec![ErrorCode::For]);
}

#[test]
fn for_loop_full_form_ok() {
    assert_clean("for (let i: integer = 0; i < 10; i = i + 1) { }");
}

#[test]
fn foreach_defines_element_typed_variable() {
    assert_clean(
        "let xs: integer[] = [1, 2];
         foreach (x in xs) {
           let y: integer = x + 1;
         }",
    );
}

#[test]
fn foreach_over_non_array() {
    let analysis = check_source("foreach (x in 5) { }");
    assert_eq!(codes(&analysis), vec![ErrorCode::Foreach]);
}

#[test]
fn foreach_variable_lands_in_enclosing_scope() {
    // The iteration variable is defined before the loop scope is pushed,
    // so it survives the loop and collides with a later declaration.
    let analysis = check_source(
        "let xs: integer[] = [1];
         foreach (x in xs) { }
         let x: integer = 0;",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Redecl]);
}

#[test]
fn break_continue_context() {
    let analysis = check_source("break; continue;");
    assert_eq!(codes(&analysis), vec![ErrorCode::Break, ErrorCode::Continue]);
}

#[test]
fn break_allowed_in_switch_continue_not() {
    let analysis = check_source(
        "let x: integer = 1;
         switch (x) {
           case 1:
             break;
           case 2:
             continue;
         }",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Continue]);
}

#[test]
fn break_and_continue_inside_loop_ok() {
    assert_clean(
        "while (true) {
           continue;
         }
         while (true) {
           break;
         }",
    );
}

#[test]
fn switch_case_type_compatibility() {
    let analysis = check_source(
        "let x: integer = 1;
         switch (x) {
           case 1:
           case \"dos\":
           default:
         }",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Switch]);
}

#[test]
fn try_catch_binds_string_in_catch_scope() {
    assert_clean(
        "try {
           let a: integer = 1;
         } catch (err) {
           let msg: string = err;
         }",
    );
    // The catch variable does not leak outside its scope.
    let analysis = check_source(
        "try { } catch (err) { }
         let msg: string = err;",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::Undef, ErrorCode::Assign]);
}

// ============================================================================
// Dead code
// ============================================================================

#[test]
fn dead_code_after_return() {
    let analysis = check_source(
        "function f(): integer {
           return 1;
           let x: integer = 2;
         }",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::DeadCode]);
}

#[test]
fn dead_code_after_break_in_loop() {
    let analysis = check_source(
        "while (true) {
           break;
           let x: integer = 1;
         }",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::DeadCode]);
}

#[test]
fn dead_statements_are_still_checked() {
    // The unreachable statement also carries its own type error.
    let analysis = check_source(
        "function f(): integer {
           return 1;
           let x: integer = \"dos\";
         }",
    );
    assert_eq!(codes(&analysis), vec![ErrorCode::DeadCode, ErrorCode::Assign]);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn logical_operators_require_booleans() {
    let analysis = check_source("let a = 1 && true; let b = false || \"si\";");
    assert_eq!(codes(&analysis), vec![ErrorCode::And, ErrorCode::Or]);
}

#[test]
fn equality_requires_same_types() {
    let analysis = check_source("let a = 1 == \"uno\";");
    assert_eq!(codes(&analysis), vec![ErrorCode::Eq]);
}

#[test]
fn ordering_requires_integers() {
    let analysis = check_source("let a = \"a\" < \"b\";");
    assert_eq!(codes(&analysis), vec![ErrorCode::Rel]);
}

#[test]
fn unary_operator_rules() {
    let analysis = check_source("let a = -true; let b = !5;");
    assert_eq!(codes(&analysis), vec![ErrorCode::Unary, ErrorCode::Unary]);
    assert_clean("let a: integer = -5; let b: boolean = !false;");
}

#[test]
fn multiplicative_rule_miss_uses_its_own_code() {
    let analysis = check_source("let a = \"x\" * 2;");
    assert_eq!(codes(&analysis), vec![ErrorCode::Mul]);
}

#[test]
fn subtraction_of_strings_is_additive_error() {
    let analysis = check_source("let a = \"x\" - \"y\";");
    assert_eq!(codes(&analysis), vec![ErrorCode::Add]);
}
