//! Integration tests for `import` and `export`.

use jsfront_parser::{parse, ErrorKind, ParserOptions};
use serde_json::Value;

fn module(source: &str) -> Value {
    let program = parse(source, ParserOptions::module())
        .unwrap_or_else(|err| panic!("{source:?} failed to parse: {err}"));
    serde_json::to_value(&program).unwrap()
}

fn module_error(source: &str) -> ErrorKind {
    parse(source, ParserOptions::module())
        .expect_err(&format!("{source:?} should fail"))
        .kind
}

#[test]
fn test_import_forms() {
    let json = module(
        "import 'side';\n\
         import def from 'a';\n\
         import * as ns from 'b';\n\
         import def2, { x, y as z, 'str name' as w } from 'c';",
    );
    assert_eq!(json["sourceType"], "module");
    let body = json["body"].as_array().unwrap();
    assert_eq!(body[0]["type"], "ImportDeclaration");
    assert_eq!(body[0]["specifiers"].as_array().unwrap().len(), 0);
    assert_eq!(body[0]["source"]["value"], "side");

    assert_eq!(body[1]["specifiers"][0]["type"], "ImportDefaultSpecifier");
    assert_eq!(body[1]["specifiers"][0]["local"]["name"], "def");
    assert_eq!(body[2]["specifiers"][0]["type"], "ImportNamespaceSpecifier");

    let specifiers = body[3]["specifiers"].as_array().unwrap();
    assert_eq!(specifiers.len(), 4);
    assert_eq!(specifiers[1]["imported"]["name"], "x");
    assert_eq!(specifiers[1]["local"]["name"], "x");
    assert_eq!(specifiers[2]["imported"]["name"], "y");
    assert_eq!(specifiers[2]["local"]["name"], "z");
    assert_eq!(specifiers[3]["imported"]["type"], "Literal");
    assert_eq!(specifiers[3]["imported"]["value"], "str name");
}

#[test]
fn test_import_attributes() {
    let json = module("import data from './data.json' with { type: 'json' };");
    let attrs = json["body"][0]["attributes"].as_array().unwrap();
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0]["type"], "ImportAttribute");
    assert_eq!(attrs[0]["key"]["name"], "type");
    assert_eq!(attrs[0]["value"]["value"], "json");

    assert_eq!(
        module_error("import a from 'a' with { type: 'json', type: 'css' };"),
        ErrorKind::Early
    );
}

#[test]
fn test_export_forms() {
    let json = module(
        "export var a = 1;\n\
         export function f() {}\n\
         export class C {}\n\
         export { a as b, f as 'quoted' };\n\
         export * from 'all';\n\
         export * as ns from 'ns';\n\
         export { default as other } from 'other';",
    );
    let body = json["body"].as_array().unwrap();
    assert_eq!(body[0]["type"], "ExportNamedDeclaration");
    assert_eq!(body[0]["declaration"]["type"], "VariableDeclaration");
    assert!(body[0]["source"].is_null());
    assert_eq!(body[1]["declaration"]["type"], "FunctionDeclaration");
    assert_eq!(body[2]["declaration"]["id"]["name"], "C");

    assert!(body[3]["declaration"].is_null());
    assert_eq!(body[3]["specifiers"][0]["local"]["name"], "a");
    assert_eq!(body[3]["specifiers"][0]["exported"]["name"], "b");
    assert_eq!(body[3]["specifiers"][1]["exported"]["value"], "quoted");

    assert_eq!(body[4]["type"], "ExportAllDeclaration");
    assert!(body[4]["exported"].is_null());
    assert_eq!(body[5]["exported"]["name"], "ns");
    assert_eq!(body[6]["source"]["value"], "other");
}

#[test]
fn test_export_default() {
    let anonymous = module("export default function () {}");
    let decl = &anonymous["body"][0]["declaration"];
    assert_eq!(decl["type"], "FunctionDeclaration");
    assert!(decl["id"].is_null());

    let class = module("export default class Named {}");
    assert_eq!(class["body"][0]["declaration"]["type"], "ClassDeclaration");

    let expr = module("export default 1 + 2;");
    assert_eq!(expr["body"][0]["declaration"]["type"], "BinaryExpression");

    let asynchronous = module("export default async function () { await x }");
    assert_eq!(asynchronous["body"][0]["declaration"]["async"], true);
}

#[test]
fn test_export_errors() {
    assert_eq!(module_error("export { missing };"), ErrorKind::Early);
    assert_eq!(module_error("var a; export { a }; export { a };"), ErrorKind::Early);
    assert_eq!(
        module_error("export default 1; export default 2;"),
        ErrorKind::Early
    );
    assert_eq!(module_error("export function f() {} export { f }"), ErrorKind::Early);
    assert!(parse("export { a }; var a;", ParserOptions::module()).is_ok());
    assert!(parse("export { a as b, a as c }; let a;", ParserOptions::module()).is_ok());
}

#[test]
fn test_module_items_placement() {
    assert!(parse("import a from 'a'", ParserOptions::script()).is_err());
    assert!(parse("export var a", ParserOptions::script()).is_err());
    assert!(parse("{ import a from 'a' }", ParserOptions::module()).is_err());
    assert!(parse("function f() { export var a }", ParserOptions::module()).is_err());
}

#[test]
fn test_dynamic_import_and_meta() {
    let script = parse("import('mod').then(m => m)", ParserOptions::script()).unwrap();
    let json = serde_json::to_value(&script).unwrap();
    let callee = &json["body"][0]["expression"]["callee"];
    assert_eq!(callee["object"]["type"], "ImportExpression");
    assert_eq!(callee["object"]["source"]["value"], "mod");

    let with_options = module("const m = await import('./x.json', { with: { type: 'json' } });");
    let import = &with_options["body"][0]["declarations"][0]["init"]["argument"];
    assert_eq!(import["type"], "ImportExpression");
    assert_eq!(import["options"]["type"], "ObjectExpression");

    let meta = module("const url = import.meta.url;");
    let object = &meta["body"][0]["declarations"][0]["init"]["object"];
    assert_eq!(object["type"], "MetaProperty");
    assert_eq!(object["meta"]["name"], "import");
    assert_eq!(object["property"]["name"], "meta");

    assert!(parse("import.meta", ParserOptions::script()).is_err());
}

#[test]
fn test_top_level_await() {
    let json = module("await load();");
    assert_eq!(json["body"][0]["expression"]["type"], "AwaitExpression");

    let script = parse("await(load)", ParserOptions::script()).unwrap();
    let json = serde_json::to_value(&script).unwrap();
    assert_eq!(json["body"][0]["expression"]["type"], "CallExpression");
}

#[test]
fn test_imported_bindings_are_lexical() {
    assert_eq!(module_error("import a from 'a'; var a;"), ErrorKind::Early);
    assert_eq!(
        module_error("import { a, b as a } from 'a';"),
        ErrorKind::Early
    );
}
