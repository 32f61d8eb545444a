//! Integration tests for the ambiguous corners of the grammar: arrow heads,
//! destructuring targets, regex vs division and restricted productions.

use jsfront_parser::{parse, ErrorKind, ParserOptions};
use serde_json::Value;

fn parse_json(source: &str) -> Value {
    let program = parse(source, ParserOptions::default())
        .unwrap_or_else(|err| panic!("{source:?} failed to parse: {err}"));
    serde_json::to_value(&program).unwrap()
}

fn first_expr(source: &str) -> Value {
    let json = parse_json(source);
    json["body"][0]["expression"].clone()
}

fn error_kind(source: &str, options: ParserOptions) -> ErrorKind {
    parse(source, options)
        .expect_err(&format!("{source:?} should fail"))
        .kind
}

// ============================================================================
// Arrow heads
// ============================================================================

#[test]
fn test_empty_arrow_with_expression_body() {
    let arrow = first_expr("() => 42");
    assert_eq!(arrow["type"], "ArrowFunctionExpression");
    assert_eq!(arrow["params"].as_array().unwrap().len(), 0);
    assert_eq!(arrow["expression"], true);
    assert_eq!(arrow["body"]["type"], "Literal");
    assert_eq!(arrow["body"]["value"], 42);
}

#[test]
fn test_parenthesized_list_without_arrow_is_sequence() {
    let expr = first_expr("(a, b)");
    assert_eq!(expr["type"], "SequenceExpression");
    let items = expr["expressions"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "Identifier");
    assert_eq!(items[1]["name"], "b");
}

#[test]
fn test_arrow_params_become_patterns() {
    let arrow = first_expr("({a, b: [c]}, d = 1, ...rest) => a");
    let params = arrow["params"].as_array().unwrap();
    assert_eq!(params[0]["type"], "ObjectPattern");
    assert_eq!(params[0]["properties"][1]["value"]["type"], "ArrayPattern");
    assert_eq!(params[1]["type"], "AssignmentPattern");
    assert_eq!(params[1]["left"]["name"], "d");
    assert_eq!(params[2]["type"], "RestElement");
    assert_eq!(params[2]["argument"]["name"], "rest");
}

#[test]
fn test_single_param_arrow_and_block_body() {
    let arrow = first_expr("x => { return x }");
    assert_eq!(arrow["params"][0]["name"], "x");
    assert_eq!(arrow["expression"], false);
    assert_eq!(arrow["body"]["type"], "BlockStatement");
}

#[test]
fn test_async_arrow_vs_async_call() {
    let arrow = first_expr("async (a, b) => a");
    assert_eq!(arrow["type"], "ArrowFunctionExpression");
    assert_eq!(arrow["async"], true);

    let call = first_expr("async (a, b)");
    assert_eq!(call["type"], "CallExpression");
    assert_eq!(call["callee"]["name"], "async");

    let chained = first_expr("async(a).then(b)");
    assert_eq!(chained["type"], "CallExpression");
    assert_eq!(chained["callee"]["type"], "MemberExpression");

    let single = first_expr("async x => x");
    assert_eq!(single["async"], true);
    assert_eq!(single["params"][0]["name"], "x");
}

#[test]
fn test_rest_outside_arrow_params_is_rejected() {
    let kind = error_kind("(...a)", ParserOptions::default());
    assert_eq!(kind, ErrorKind::Syntax);
    assert!(parse("(a, b,) => a", ParserOptions::default()).is_ok());
    assert!(parse("(a, b,)", ParserOptions::default()).is_err());
}

#[test]
fn test_invalid_arrow_parameter() {
    assert!(parse("(a + b) => a", ParserOptions::default()).is_err());
    assert!(parse("(1) => 1", ParserOptions::default()).is_err());
}

#[test]
fn test_arrow_after_newline_is_rejected() {
    assert!(parse("(a)\n=> a", ParserOptions::default()).is_err());
}

// ============================================================================
// Destructuring
// ============================================================================

#[test]
fn test_array_literal_becomes_pattern_before_assign() {
    let assign = first_expr("[a, b] = [1, 2]");
    assert_eq!(assign["type"], "AssignmentExpression");
    assert_eq!(assign["left"]["type"], "ArrayPattern");
    let elements = assign["left"]["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 2);
    assert!(elements.iter().all(|e| e["type"] == "Identifier"));
    assert_eq!(assign["right"]["type"], "ArrayExpression");

    let literal = first_expr("[a, b]");
    assert_eq!(literal["type"], "ArrayExpression");
}

#[test]
fn test_holes_survive_reinterpretation() {
    let assign = first_expr("[, a, , b] = c");
    let elements = assign["left"]["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 4);
    assert!(elements[0].is_null());
    assert!(elements[2].is_null());
}

#[test]
fn test_object_shorthand_default_only_valid_as_pattern() {
    let assign = first_expr("({a = 1, b: {c}} = obj)");
    assert_eq!(assign["left"]["type"], "ObjectPattern");
    let first = &assign["left"]["properties"][0];
    assert_eq!(first["shorthand"], true);
    assert_eq!(first["value"]["type"], "AssignmentPattern");

    let err = parse("({a = 1})", ParserOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[test]
fn test_literal_target_is_early_error() {
    assert_eq!(error_kind("1 = 2", ParserOptions::default()), ErrorKind::Early);
    assert_eq!(error_kind("[1] = a", ParserOptions::default()), ErrorKind::Early);
    assert_eq!(error_kind("({a() {}} = b)", ParserOptions::default()), ErrorKind::Early);
    assert_eq!(error_kind("f() = 1", ParserOptions::default()), ErrorKind::Early);
}

#[test]
fn test_member_targets() {
    let assign = first_expr("a.b = c[d] = 1");
    assert_eq!(assign["left"]["type"], "MemberExpression");
    assert_eq!(assign["right"]["left"]["computed"], true);
    assert!(parse("a?.b = 1", ParserOptions::default()).is_err());
}

#[test]
fn test_for_of_head_reinterpreted() {
    let json = parse_json("for ([a, b] of pairs) ;");
    let stmt = &json["body"][0];
    assert_eq!(stmt["type"], "ForOfStatement");
    assert_eq!(stmt["left"]["type"], "ArrayPattern");
}

// ============================================================================
// Regex vs division
// ============================================================================

#[test]
fn test_regex_after_assign() {
    let assign = first_expr("x = /abc/g");
    let regex = &assign["right"];
    assert_eq!(regex["type"], "Literal");
    assert_eq!(regex["regex"]["pattern"], "abc");
    assert_eq!(regex["regex"]["flags"], "g");
    assert!(regex["value"].is_null());
}

#[test]
fn test_division_after_operand() {
    let expr = first_expr("a / b");
    assert_eq!(expr["type"], "BinaryExpression");
    assert_eq!(expr["operator"], "/");

    let chained = first_expr("(a) / b / c");
    assert_eq!(chained["operator"], "/");
    assert_eq!(chained["left"]["operator"], "/");
}

#[test]
fn test_regex_at_statement_start_and_after_brace() {
    let json = parse_json("{}\n/foo/.test(s)");
    assert_eq!(json["body"][1]["expression"]["callee"]["object"]["regex"]["pattern"], "foo");
}

// ============================================================================
// Restricted productions
// ============================================================================

#[test]
fn test_return_newline_inserts_semicolon() {
    let json = parse_json("function f() { return\n42 }");
    let body = &json["body"][0]["body"]["body"];
    assert_eq!(body[0]["type"], "ReturnStatement");
    assert!(body[0]["argument"].is_null());
    assert_eq!(body[1]["type"], "ExpressionStatement");
    assert_eq!(body[1]["expression"]["value"], 42);
}

#[test]
fn test_postfix_update_needs_same_line() {
    let json = parse_json("a\n++b");
    assert_eq!(json["body"].as_array().unwrap().len(), 2);
    assert_eq!(json["body"][0]["expression"]["type"], "Identifier");
    assert_eq!(json["body"][1]["expression"]["type"], "UpdateExpression");
    assert_eq!(json["body"][1]["expression"]["prefix"], true);
}

#[test]
fn test_throw_newline_is_error() {
    assert_eq!(
        error_kind("throw\nerr", ParserOptions::default()),
        ErrorKind::Syntax
    );
}

// ============================================================================
// Strictness of duplicate parameters
// ============================================================================

#[test]
fn test_duplicate_params_depend_on_strictness() {
    assert!(parse("function f(a, a) {}", ParserOptions::default()).is_ok());

    let strict = ParserOptions::default().with_strict(true);
    assert_eq!(error_kind("function f(a, a) {}", strict), ErrorKind::Early);

    assert_eq!(
        error_kind(
            "function f(a, a) { 'use strict' }",
            ParserOptions::default()
        ),
        ErrorKind::Early
    );
}

#[test]
fn test_duplicate_params_always_rejected_in_arrows() {
    assert_eq!(
        error_kind("(a, a) => 1", ParserOptions::default()),
        ErrorKind::Early
    );
}

// ============================================================================
// let
// ============================================================================

#[test]
fn test_let_as_identifier() {
    let json = parse_json("let = 1; let\n{}");
    assert_eq!(json["body"][0]["expression"]["left"]["name"], "let");
    assert_eq!(json["body"][1]["expression"]["name"], "let");
    assert_eq!(json["body"][2]["type"], "BlockStatement");
}

#[test]
fn test_let_declarations() {
    let json = parse_json("let [a] = b; let {c} = d; let e;");
    assert!(json["body"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["type"] == "VariableDeclaration" && s["kind"] == "let"));
}
