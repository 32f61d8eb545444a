//! Integration tests for classes, object literal members and private names.

use jsfront_parser::{parse, ErrorKind, ParserOptions};
use serde_json::Value;

fn parse_json(source: &str) -> Value {
    let program = parse(source, ParserOptions::default())
        .unwrap_or_else(|err| panic!("{source:?} failed to parse: {err}"));
    serde_json::to_value(&program).unwrap()
}

fn fails(source: &str) -> bool {
    parse(source, ParserOptions::default()).is_err()
}

#[test]
fn test_class_elements() {
    let json = parse_json(
        "class A extends B {\n\
           static #count = 0;\n\
           name = 'a';\n\
           [key];\n\
           constructor(x) { super(x) }\n\
           get size() { return 1 }\n\
           set size(v) {}\n\
           static create() { return new A() }\n\
           async *stream() {}\n\
           #secret() { return A.#count }\n\
           static { A.#count = 1 }\n\
         }",
    );
    let class = &json["body"][0];
    assert_eq!(class["type"], "ClassDeclaration");
    assert_eq!(class["id"]["name"], "A");
    assert_eq!(class["superClass"]["name"], "B");

    let body = class["body"]["body"].as_array().unwrap();
    assert_eq!(body.len(), 10);

    assert_eq!(body[0]["type"], "PropertyDefinition");
    assert_eq!(body[0]["static"], true);
    assert_eq!(body[0]["key"]["type"], "PrivateIdentifier");
    assert_eq!(body[0]["key"]["name"], "count");

    assert_eq!(body[1]["value"]["value"], "a");
    assert_eq!(body[2]["computed"], true);
    assert!(body[2]["value"].is_null());

    assert_eq!(body[3]["type"], "MethodDefinition");
    assert_eq!(body[3]["kind"], "constructor");
    assert_eq!(body[3]["value"]["type"], "FunctionExpression");

    assert_eq!(body[4]["kind"], "get");
    assert_eq!(body[5]["kind"], "set");
    assert_eq!(body[6]["static"], true);
    assert_eq!(body[7]["value"]["async"], true);
    assert_eq!(body[7]["value"]["generator"], true);
    assert_eq!(body[8]["key"]["type"], "PrivateIdentifier");
    assert_eq!(body[9]["type"], "StaticBlock");
}

#[test]
fn test_modifier_words_as_member_names() {
    let json = parse_json("class A { static() {} get() {} set = 1; async\nfoo() {} static static() {} }");
    let body = json["body"][0]["body"]["body"].as_array().unwrap();
    assert_eq!(body[0]["key"]["name"], "static");
    assert_eq!(body[0]["static"], false);
    assert_eq!(body[1]["key"]["name"], "get");
    assert_eq!(body[1]["kind"], "method");
    assert_eq!(body[2]["type"], "PropertyDefinition");
    assert_eq!(body[2]["key"]["name"], "set");
    // A line break after `async` makes it a field.
    assert_eq!(body[3]["type"], "PropertyDefinition");
    assert_eq!(body[3]["key"]["name"], "async");
    assert_eq!(body[4]["key"]["name"], "foo");
    assert_eq!(body[5]["static"], true);
    assert_eq!(body[5]["key"]["name"], "static");
}

#[test]
fn test_constructor_rules() {
    assert!(fails("class A { constructor() {} constructor() {} }"));
    assert!(fails("class A { get constructor() {} }"));
    assert!(fails("class A { *constructor() {} }"));
    assert!(fails("class A { async constructor() {} }"));
    assert!(fails("class A { constructor = 1 }"));
    assert!(fails("class A { static prototype() {} }"));
    assert!(fails("class A { static prototype = 1 }"));
    assert!(fails("class A { #constructor() {} }"));
    assert!(!fails("class A { static constructor() {} prototype() {} }"));
    assert!(!fails("class A { 'constructor'() {} }"));
}

#[test]
fn test_private_names() {
    assert!(!fails("class A { #x; m() { return #x in this } }"));
    assert!(!fails("class A { #x; m() { class B { n(o) { return o.#x } } } }"));
    assert!(!fails("class A { m() { return this.#y } #y = 1 }"));

    let err = parse("class A { m() { this.#missing } }", ParserOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Early);

    assert!(fails("class A { #x; m(o) { return 1 + #x in o } }"));
    assert!(fails("class A { #x; m(o) { return #x + 1 } }"));
    assert!(fails("this.#x"));
    assert!(fails("class A { #x; #x; }"));
    assert!(!fails("class A { get #x() {} set #x(v) {} }"));
    assert!(fails("class A { #x; m() { delete this.#x } }"));
    assert!(fails("class A { #x; m() { this?.#x = 1 } }"));
}

#[test]
fn test_class_body_is_strict() {
    assert!(fails("class A { m() { with (a) b } }"));
    assert!(fails("class A { m(a, a) {} }"));
    assert!(fails("class let {}"));
    assert!(fails("class A extends (B, C) { m() { var yield } }"));
}

#[test]
fn test_field_initializer_context() {
    assert!(fails("class A { x = arguments }"));
    assert!(!fails("class A { x = () => this }"));
    assert!(!fails("class A extends B { x = super.y }"));
    assert!(fails("class A extends B { x = super() }"));
    assert!(fails("class A { static { await } }"));
    assert!(fails("class A { static { return } }"));
}

#[test]
fn test_class_expression() {
    let json = parse_json("const A = class Named extends Base {}; const B = class {};");
    let a = &json["body"][0]["declarations"][0]["init"];
    assert_eq!(a["type"], "ClassExpression");
    assert_eq!(a["id"]["name"], "Named");
    let b = &json["body"][1]["declarations"][0]["init"];
    assert!(b["id"].is_null());
    assert!(b["superClass"].is_null());
}

// ============================================================================
// Object literals
// ============================================================================

#[test]
fn test_object_members() {
    let json = parse_json(
        "x = { a, b: 1, 'c': 2, 3: 3, [d]: 4, e() {}, get f() { return 1 }, set f(v) {}, \
         async g() {}, *h() {}, async *i() {}, ...rest, get: 5, set() {} }",
    );
    let props = json["body"][0]["expression"]["right"]["properties"]
        .as_array()
        .unwrap();
    assert_eq!(props[0]["shorthand"], true);
    assert_eq!(props[1]["shorthand"], false);
    assert_eq!(props[2]["key"]["type"], "Literal");
    assert_eq!(props[3]["key"]["value"], 3);
    assert_eq!(props[4]["computed"], true);
    assert_eq!(props[5]["method"], true);
    assert_eq!(props[6]["kind"], "get");
    assert_eq!(props[7]["kind"], "set");
    assert_eq!(props[8]["value"]["async"], true);
    assert_eq!(props[9]["value"]["generator"], true);
    assert_eq!(props[11]["type"], "SpreadElement");
    assert_eq!(props[12]["key"]["name"], "get");
    assert_eq!(props[12]["kind"], "init");
    assert_eq!(props[13]["key"]["name"], "set");
    assert_eq!(props[13]["method"], true);
}

#[test]
fn test_accessor_arity() {
    assert!(fails("({ get a(x) {} })"));
    assert!(fails("({ set a() {} })"));
    assert!(fails("({ set a(x, y) {} })"));
    assert!(fails("({ set a(...x) {} })"));
    assert!(!fails("({ set a([x] = []) {} })"));
}

#[test]
fn test_proto_duplicates() {
    assert!(fails("({ __proto__: a, __proto__: b })"));
    assert!(fails("({ '__proto__': a, __proto__: b })"));
    assert!(!fails("({ __proto__: a, ['__proto__']: b, __proto__() {} })"));
    assert!(!fails("({ __proto__: a, __proto__: b } = c)"));
}
