//! Whole-tree properties checked over a corpus of snippets.

use jsfront_parser::{parse, ParserOptions};
use serde_json::Value;

const SCRIPTS: &[&str] = &[
    "var a = 1, b = [a, , 3], c = {a, b, [a + b]: c, get d() { return 1 }, ...e};",
    "function f(x, {y = 2, z: [w]} = {}, ...rest) { return x ? y : w }",
    "function s(a, b) { 'use strict'; return a }",
    "for (let i = 0; i < 10; i++) { if (i % 2) continue; else break }",
    "outer: for (const [k, v] of map) { for (k in v) continue outer }",
    "label: { break label }",
    "do x++; while (x < 5) y = 1",
    "switch (a) { case 1: b(); break; default: c() }",
    "try { a() } catch ({message}) { log(message) } finally { done() }",
    "try { a() } catch { }",
    "class A extends B { #x = 1; static y; constructor() { super(); this.#x++ } static { A.y = 2 } get x() { return this.#x } }",
    "const g = function* () { yield; yield* other(); const v = yield 1 }",
    "async function h() { for await (const x of xs) await x }",
    "x = a ?? b; y = (a || b) ?? c; z = a?.b?.[c]?.(d)",
    "tag`hello ${world} and ${`nested ${deep}`}`",
    "new Foo; new Foo.Bar(1); new (f())()",
    "a = b ? c => c : (d, e) => e",
    "({a, b} = c); [x, [y, ...z]] = w",
    "if (a) function f() {} else b()",
    "with (obj) { prop = 1 }",
    "a\n++b\nc\n--d",
    "x = 0x1F + 0o17 + 0b11 + 1_000 + .5e3 + 10n",
    "let x = 'a\\u0062\\x63' + \"\\u{1F600}\"",
];

const MODULES: &[&str] = &[
    "import a, { b as c, 'd e' as f } from 'mod'; export { a, c as default }",
    "import * as ns from 'ns' with { type: 'json' }; export * as all from 'x'",
    "export default class { m() { return import.meta.url } }",
    "export const [p, q] = r; export function s() {} export async function t() { await 1 }",
    "await Promise.resolve(1); export default (x) => x",
];

fn parse_value(source: &str, options: ParserOptions) -> Value {
    let program = parse(source, options)
        .unwrap_or_else(|err| panic!("{source:?} failed to parse: {err}"));
    serde_json::to_value(&program).unwrap()
}

fn corpus() -> Vec<(&'static str, ParserOptions)> {
    SCRIPTS
        .iter()
        .map(|s| (*s, ParserOptions::script()))
        .chain(MODULES.iter().map(|s| (*s, ParserOptions::module())))
        .collect()
}

/// `start` and `end` of a node, if the value is a node.
fn node_span(value: &Value) -> Option<(u64, u64)> {
    let object = value.as_object()?;
    object.get("type")?;
    Some((object.get("start")?.as_u64()?, object.get("end")?.as_u64()?))
}

fn check_containment(value: &Value, parent: Option<(u64, u64)>, source: &str) {
    let span = node_span(value);
    if let Some((start, end)) = span {
        assert!(start <= end, "inverted span {start}..{end} in {source:?}");
        if let Some((p_start, p_end)) = parent {
            assert!(
                start >= p_start && end <= p_end,
                "{} at {start}..{end} escapes parent {p_start}..{p_end} in {source:?}",
                value["type"]
            );
        }
    }
    let parent = span.or(parent);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key != "loc" {
                    check_containment(child, parent, source);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                check_containment(item, parent, source);
            }
        }
        _ => {}
    }
}

const TARGET_TYPES: &[&str] = &[
    "Identifier",
    "MemberExpression",
    "ArrayPattern",
    "ObjectPattern",
    "AssignmentPattern",
    "RestElement",
];

fn assert_target(value: &Value, source: &str) {
    let ty = value["type"].as_str().unwrap_or("<none>");
    assert!(
        TARGET_TYPES.contains(&ty),
        "{ty} used as a target in {source:?}"
    );
}

/// Every binding or assignment position holds a pattern-shaped node.
fn check_pattern_shape(value: &Value, source: &str) {
    match value {
        Value::Object(map) => {
            match map.get("type").and_then(Value::as_str) {
                Some("AssignmentExpression") if map["operator"] == "=" => {
                    assert_target(&map["left"], source)
                }
                Some("AssignmentPattern") => assert_target(&map["left"], source),
                Some("RestElement") => assert_target(&map["argument"], source),
                Some("VariableDeclarator") => assert_target(&map["id"], source),
                Some("ArrayPattern") => {
                    for elem in map["elements"].as_array().into_iter().flatten() {
                        if !elem.is_null() {
                            assert_target(elem, source);
                        }
                    }
                }
                Some("ObjectPattern") => {
                    for prop in map["properties"].as_array().into_iter().flatten() {
                        if prop["type"] == "Property" {
                            assert_eq!(prop["method"], false);
                            assert_target(&prop["value"], source);
                        }
                    }
                }
                Some(
                    "FunctionDeclaration" | "FunctionExpression" | "ArrowFunctionExpression",
                ) => {
                    for param in map["params"].as_array().into_iter().flatten() {
                        assert_target(param, source);
                    }
                }
                _ => {}
            }
            for (key, child) in map {
                if key != "loc" {
                    check_pattern_shape(child, source);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                check_pattern_shape(item, source);
            }
        }
        _ => {}
    }
}

/// Drop every position field so trees from different layouts compare.
fn strip_positions(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("start");
            map.remove("end");
            map.remove("loc");
            for child in map.values_mut() {
                strip_positions(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_positions),
        _ => {}
    }
}

#[test]
fn test_parse_is_deterministic() {
    for (source, options) in corpus() {
        let first = parse(source, options.clone());
        let second = parse(source, options);
        assert_eq!(first, second, "{source:?}");
    }

    let bad = "function (";
    assert_eq!(
        parse(bad, ParserOptions::default()),
        parse(bad, ParserOptions::default())
    );
}

#[test]
fn test_child_spans_within_parent() {
    for (source, options) in corpus() {
        let json = parse_value(source, options);
        assert_eq!(json["start"], 0);
        assert_eq!(json["end"].as_u64(), Some(source.len() as u64));
        check_containment(&json, None, source);
    }
}

#[test]
fn test_targets_are_patterns() {
    for (source, options) in corpus() {
        let json = parse_value(source, options);
        check_pattern_shape(&json, source);
    }
}

#[test]
fn test_asi_matches_explicit_semicolons() {
    let pairs = [
        ("a = 1\nb = 2", "a = 1;\nb = 2;"),
        ("let x = 1\nconst y = x\n", "let x = 1;\nconst y = x;\n"),
        ("function f() { return\nx }", "function f() { return;\nx; }"),
        ("do a(); while (b) c()", "do a(); while (b); c();"),
        ("i\n++\nj", "i;\n++\nj;"),
        ("x\n/re/g.test(y)", "x\n/re/g.test(y);"),
        ("var a = b\n(c)", "var a = b\n(c);"),
        ("for (;;) { break\nlabel }", "for (;;) { break;\nlabel; }"),
        ("throw e\n;[1, 2].map(f)", "throw e;\n[1, 2].map(f);"),
    ];
    for (implicit, explicit) in pairs {
        let mut left = parse_value(implicit, ParserOptions::default());
        let mut right = parse_value(explicit, ParserOptions::default());
        strip_positions(&mut left);
        strip_positions(&mut right);
        assert_eq!(left, right, "{implicit:?} vs {explicit:?}");
    }
}

#[test]
fn test_loc_counts_lines_and_utf16_columns() {
    let json = parse_value("a;\r\n'😀'; b", ParserOptions::default());
    let b = &json["body"][2]["expression"];
    assert_eq!(b["loc"]["start"]["line"], 2);
    // The emoji is two UTF-16 units, plus quotes, `;` and a space.
    assert_eq!(b["loc"]["start"]["column"], 6);
    assert_eq!(b["start"], 12);
}
