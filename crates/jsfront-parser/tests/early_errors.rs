//! Integration tests for strict mode, context and declaration errors.

use jsfront_parser::{parse, ErrorKind, ParseError, ParserOptions};

fn sloppy(source: &str) -> Result<(), ParseError> {
    parse(source, ParserOptions::script()).map(|_| ())
}

fn strict(source: &str) -> Result<(), ParseError> {
    parse(source, ParserOptions::script().with_strict(true)).map(|_| ())
}

fn kind_of(result: Result<(), ParseError>) -> ErrorKind {
    result.expect_err("expected a parse error").kind
}

// ============================================================================
// Strict mode
// ============================================================================

#[test]
fn test_strict_only_errors() {
    let cases = [
        "with (a) b",
        "delete x",
        "var eval = 1",
        "arguments = 1",
        "eval++",
        "function f(eval) {}",
        "var yield",
        "var let = 1",
        "try {} catch (arguments) {}",
    ];
    for source in cases {
        assert!(sloppy(source).is_ok(), "{source:?} should parse in sloppy mode");
        assert!(strict(source).is_err(), "{source:?} should fail in strict mode");
    }
}

#[test]
fn test_legacy_octal() {
    assert!(sloppy("x = 017 + 08").is_ok());
    assert!(sloppy("x = '\\07'").is_ok());
    assert_eq!(kind_of(strict("x = 017")), ErrorKind::Early);
    assert_eq!(kind_of(strict("x = '\\07'")), ErrorKind::Early);
    assert!(sloppy("x = `\\07`").is_err());

    let no_octal = ParserOptions {
        allow_legacy_octal: false,
        ..ParserOptions::default()
    };
    let err = parse("x = 017", no_octal).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unsupported);
}

#[test]
fn test_use_strict_directive_is_retroactive() {
    assert!(sloppy("function f() { 'use strict'; with (a) b }").is_err());
    assert!(sloppy("function f() { 'use strict' } with (a) b").is_ok());
    // A function name is checked under the body's strictness.
    assert!(sloppy("function eval() { 'use strict' }").is_err());
    // An escaped directive is not a use strict directive.
    assert!(sloppy("function f() { 'use\\x20strict'; with (a) b }").is_ok());
}

#[test]
fn test_use_strict_with_non_simple_params() {
    let err = sloppy("function f(a = 1) { 'use strict' }").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Early);
    assert!(sloppy("function f({a}) { 'use strict' }").is_err());
    assert!(sloppy("(a = 1) => { 'use strict' }").is_err());
    assert!(sloppy("function f(a, b) { 'use strict' }").is_ok());
}

#[test]
fn test_directive_is_recorded() {
    let program = parse("'use strict'; 'other'\nx", ParserOptions::default()).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["body"][0]["directive"], "use strict");
    assert_eq!(json["body"][1]["directive"], "other");
    assert!(json["body"][2].get("directive").is_none());
}

#[test]
fn test_module_is_strict() {
    let err = parse("with (a) b", ParserOptions::module()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Early);
    assert!(parse("var await", ParserOptions::module()).is_err());
    assert!(parse("var await", ParserOptions::script()).is_ok());
}

// ============================================================================
// Context-dependent keywords
// ============================================================================

#[test]
fn test_super_needs_a_method() {
    assert_eq!(kind_of(sloppy("super.x")), ErrorKind::Early);
    assert!(sloppy("function f() { super.x }").is_err());
    assert!(sloppy("({ m() { return super.x } })").is_ok());
    assert!(sloppy("({ m() { super() } })").is_err());
    assert!(sloppy("class A extends B { constructor() { super() } }").is_ok());
    assert!(sloppy("class A { constructor() { super() } }").is_err());
    assert!(sloppy("class A extends B { m() { super() } }").is_err());
    assert!(sloppy("class A extends B { m() { return () => super.m() } }").is_ok());
}

#[test]
fn test_new_target() {
    assert!(sloppy("new.target").is_err());
    assert!(sloppy("function f() { return new.target }").is_ok());
    assert!(sloppy("function f() { return () => new.target }").is_ok());
}

#[test]
fn test_yield_and_await_contexts() {
    assert!(sloppy("var yield = 1").is_ok());
    assert!(sloppy("function* g() { var yield }").is_err());
    assert!(sloppy("function* g(a = yield) {}").is_err());
    assert!(sloppy("function* g() { (a = yield) => a }").is_err());
    assert!(sloppy("async function f() { var await }").is_err());
    assert!(sloppy("async function f(a = await 1) {}").is_err());
    assert!(sloppy("async function f() { (a = await b) => a }").is_err());
    assert!(sloppy("async (await) => 1").is_err());
    assert!(sloppy("function f() { await x }").is_err());
    assert!(sloppy("await(1)").is_ok());
}

#[test]
fn test_return_outside_function() {
    assert_eq!(kind_of(sloppy("return 1")), ErrorKind::Syntax);
    let options = ParserOptions {
        allow_return_outside_function: true,
        ..ParserOptions::default()
    };
    assert!(parse("return 1", options).is_ok());
}

#[test]
fn test_exponent_after_unary() {
    assert!(sloppy("-a ** 2").is_err());
    assert!(sloppy("(-a) ** 2").is_ok());
    assert!(sloppy("++a ** 2").is_ok());
    assert!(sloppy("a ?? b || c").is_err());
    assert!(sloppy("(a ?? b) || c").is_ok());
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn test_label_resolution() {
    assert_eq!(kind_of(sloppy("break")), ErrorKind::Early);
    assert_eq!(kind_of(sloppy("while (1) { break missing }")), ErrorKind::Early);
    assert!(sloppy("a: while (1) { continue a }").is_ok());
    assert!(sloppy("a: { continue a }").is_err());
    assert!(sloppy("a: a: ;").is_err());
    assert!(sloppy("a: ; a: ;").is_ok());
    assert!(sloppy("switch (x) { case 1: break }").is_ok());
    assert!(sloppy("switch (x) { case 1: continue }").is_err());
    assert!(sloppy("while (1) { function f() { break } }").is_err());
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_redeclarations() {
    assert!(sloppy("var a; var a;").is_ok());
    assert!(sloppy("let a; var a;").is_err());
    assert!(sloppy("var a; let a;").is_err());
    assert!(sloppy("const a = 1; { let a; }").is_ok());
    assert!(sloppy("{ let a; var a; }").is_err());
    assert!(sloppy("function f(a) { let a }").is_err());
    assert!(sloppy("try {} catch (e) { let e }").is_err());
    assert!(sloppy("class C {} class C {}").is_err());
    assert!(sloppy("function f() {} function f() {}").is_ok());
    let err = sloppy("let a, a;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Early);
    assert!(err.message.contains("'a'"));
}

#[test]
fn test_declaration_positions() {
    assert!(sloppy("if (a) let b = 1").is_err());
    assert!(sloppy("while (a) const b = 1;").is_err());
    assert!(sloppy("if (a) class C {}").is_err());
    assert!(sloppy("if (a) function f() {}").is_ok());
    assert!(strict("if (a) function f() {}").is_err());
    assert!(sloppy("while (a) function f() {}").is_err());
    assert!(sloppy("l: function f() {}").is_ok());
    assert!(sloppy("if (a) async function f() {}").is_err());
}

#[test]
fn test_initializers() {
    assert!(sloppy("const a;").is_err());
    assert!(sloppy("let [a];").is_err());
    assert!(sloppy("for (const a of b) ;").is_ok());
    assert!(sloppy("for (let a = 1 of b) ;").is_err());
    assert!(sloppy("for (var a = 1 in b) ;").is_ok());
    assert!(strict("for (var a = 1 in b) ;").is_err());
    assert!(sloppy("for (async of b) ;").is_err());
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_disabled_features_report_unsupported() {
    let no_async = ParserOptions {
        allow_async: false,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse("async function f() {}", no_async.clone()).unwrap_err().kind,
        ErrorKind::Unsupported
    );
    assert_eq!(
        parse("async () => 1", no_async).unwrap_err().kind,
        ErrorKind::Unsupported
    );

    let no_generators = ParserOptions {
        allow_generators: false,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse("function* g() {}", no_generators).unwrap_err().kind,
        ErrorKind::Unsupported
    );

    let no_with = ParserOptions {
        allow_with: false,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse("with (a) b", no_with).unwrap_err().kind,
        ErrorKind::Unsupported
    );
}

#[test]
fn test_deep_nesting_is_a_resource_error() {
    let source = format!("x = {}1{};", "[".repeat(5000), "]".repeat(5000));
    let err = parse(&source, ParserOptions::default().with_max_depth(48)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resource);
}

/// Default options on a thread with the standard 2 MiB stack.
fn parse_on_small_stack(source: String) -> Result<(), ErrorKind> {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || parse(&source, ParserOptions::default()).map(|_| ()).map_err(|e| e.kind))
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_default_depth_limit_on_small_stack() {
    let nest = |open: &str, count: usize, close: &str| {
        format!("{}1{}", open.repeat(count), close.repeat(count))
    };
    let cases = [
        nest("(", 300, ")"),
        format!("x = {}", nest("[", 300, "]")),
        nest("{", 300, "}"),
        nest("function f() {", 300, "}"),
        format!("{}1", "-".repeat(600)),
        format!("{}x;", "if (a) ".repeat(300)),
    ];
    for source in cases {
        let prefix: String = source.chars().take(16).collect();
        assert_eq!(
            parse_on_small_stack(source),
            Err(ErrorKind::Resource),
            "{prefix:?}..."
        );
    }

    assert_eq!(parse_on_small_stack(nest("(", 100, ")")), Ok(()));
}

#[test]
fn test_error_position() {
    let err = sloppy("a = 1;\nb = );").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 4);
    assert_eq!(err.offset, 11);
    assert_eq!(err.to_string(), "Unexpected ')' (2:4)");
}
