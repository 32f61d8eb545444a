//! ESTree shape of statements and expressions.

use jsfront_parser::{parse, ParserOptions};
use serde_json::{json, Value};

fn parse_json(source: &str) -> Value {
    let program = parse(source, ParserOptions::default())
        .unwrap_or_else(|err| panic!("{source:?} failed to parse: {err}"));
    serde_json::to_value(&program).unwrap()
}

fn stmt(source: &str) -> Value {
    parse_json(source)["body"][0].clone()
}

fn expr(source: &str) -> Value {
    stmt(source)["expression"].clone()
}

#[test]
fn test_program_and_locations() {
    let json = parse_json("var x = 1;\nx");
    assert_eq!(json["type"], "Program");
    assert_eq!(json["sourceType"], "script");
    assert_eq!(json["start"], 0);
    assert_eq!(json["end"], 12);

    let decl = &json["body"][0];
    assert_eq!(decl["kind"], "var");
    assert_eq!(
        decl["loc"],
        json!({"start": {"line": 1, "column": 0}, "end": {"line": 1, "column": 10}})
    );
    let declarator = &decl["declarations"][0];
    assert_eq!(declarator["type"], "VariableDeclarator");
    assert_eq!(declarator["id"]["start"], 4);
    assert_eq!(declarator["init"]["raw"], "1");
    assert_eq!(json["body"][1]["loc"]["start"]["line"], 2);
}

#[test]
fn test_precedence_and_associativity() {
    let sum = expr("a + b * c - d");
    assert_eq!(sum["operator"], "-");
    assert_eq!(sum["left"]["operator"], "+");
    assert_eq!(sum["left"]["right"]["operator"], "*");

    let pow = expr("a ** b ** c");
    assert_eq!(pow["left"]["name"], "a");
    assert_eq!(pow["right"]["operator"], "**");

    let cond = expr("a ? b : c ? d : e");
    assert_eq!(cond["type"], "ConditionalExpression");
    assert_eq!(cond["alternate"]["type"], "ConditionalExpression");

    let assign = expr("a = b += c ??= d");
    assert_eq!(assign["operator"], "=");
    assert_eq!(assign["right"]["operator"], "+=");
    assert_eq!(assign["right"]["right"]["operator"], "??=");

    let logical = expr("a || b && c");
    assert_eq!(logical["type"], "LogicalExpression");
    assert_eq!(logical["operator"], "||");
    assert_eq!(logical["right"]["operator"], "&&");

    let relational = expr("a in b instanceof c < d");
    assert_eq!(relational["operator"], "<");
    assert_eq!(relational["left"]["operator"], "instanceof");
}

#[test]
fn test_unary_and_update() {
    let unary = expr("typeof void !-x");
    assert_eq!(unary["operator"], "typeof");
    assert_eq!(unary["prefix"], true);
    assert_eq!(unary["argument"]["argument"]["operator"], "!");

    let postfix = expr("a.b++");
    assert_eq!(postfix["type"], "UpdateExpression");
    assert_eq!(postfix["prefix"], false);
    assert_eq!(postfix["argument"]["type"], "MemberExpression");
}

#[test]
fn test_optional_chain() {
    let chain = expr("a?.b.c(d)?.[e]");
    assert_eq!(chain["type"], "ChainExpression");
    let inner = &chain["expression"];
    assert_eq!(inner["type"], "MemberExpression");
    assert_eq!(inner["optional"], true);
    assert_eq!(inner["computed"], true);
    assert_eq!(inner["object"]["type"], "CallExpression");
    assert_eq!(inner["object"]["optional"], false);

    let paren = expr("(a?.b).c");
    assert_eq!(paren["type"], "MemberExpression");
    assert_eq!(paren["object"]["type"], "ChainExpression");

    assert!(parse("new a?.b()", ParserOptions::default()).is_err());
    assert!(parse("a?.b`t`", ParserOptions::default()).is_err());
}

#[test]
fn test_new_and_meta() {
    let new = expr("new a.b.C(1)");
    assert_eq!(new["type"], "NewExpression");
    assert_eq!(new["callee"]["type"], "MemberExpression");
    assert_eq!(new["arguments"][0]["value"], 1);

    let bare = expr("new C");
    assert_eq!(bare["arguments"], json!([]));

    let call_of_new = expr("new C()()");
    assert_eq!(call_of_new["type"], "CallExpression");
    assert_eq!(call_of_new["callee"]["type"], "NewExpression");
}

#[test]
fn test_literals() {
    let values = expr("[null, true, 'str', 0x10, 1e3, 10n, .5]");
    let elements = values["elements"].as_array().unwrap();
    assert!(elements[0]["value"].is_null());
    assert_eq!(elements[0]["raw"], "null");
    assert_eq!(elements[1]["value"], true);
    assert_eq!(elements[2]["value"], "str");
    assert_eq!(elements[2]["raw"], "'str'");
    assert_eq!(elements[3]["value"], 16);
    assert_eq!(elements[4]["value"], 1000);
    assert_eq!(elements[5]["bigint"], "10");
    assert!(elements[5]["value"].is_null());
    assert_eq!(elements[6]["value"], 0.5);
}

#[test]
fn test_templates() {
    let template = expr("`a${b}c${d}`");
    assert_eq!(template["type"], "TemplateLiteral");
    let quasis = template["quasis"].as_array().unwrap();
    assert_eq!(quasis.len(), 3);
    assert_eq!(quasis[0]["value"]["cooked"], "a");
    assert_eq!(quasis[2]["tail"], true);
    assert_eq!(quasis[2]["value"]["raw"], "");
    assert_eq!(template["expressions"].as_array().unwrap().len(), 2);

    let tagged = expr("tag`\\unicode`");
    assert_eq!(tagged["type"], "TaggedTemplateExpression");
    assert!(tagged["quasi"]["quasis"][0]["value"]["cooked"].is_null());
    assert_eq!(tagged["quasi"]["quasis"][0]["value"]["raw"], "\\unicode");

    assert!(parse("`\\unicode`", ParserOptions::default()).is_err());
}

#[test]
fn test_control_flow_statements() {
    let if_stmt = stmt("if (a) b; else c;");
    assert_eq!(if_stmt["type"], "IfStatement");
    assert_eq!(if_stmt["alternate"]["type"], "ExpressionStatement");

    let for_stmt = stmt("for (var i = 0, j; i < j; i++) ;");
    assert_eq!(for_stmt["init"]["type"], "VariableDeclaration");
    assert_eq!(for_stmt["init"]["declarations"].as_array().unwrap().len(), 2);
    assert_eq!(for_stmt["body"]["type"], "EmptyStatement");

    let empty_for = stmt("for (;;) {}");
    assert!(empty_for["init"].is_null());
    assert!(empty_for["test"].is_null());

    let for_in = stmt("for (const k in o) {}");
    assert_eq!(for_in["type"], "ForInStatement");
    assert_eq!(for_in["left"]["kind"], "const");

    let for_of = stmt("for (x.y of z) {}");
    assert_eq!(for_of["left"]["type"], "MemberExpression");
    assert_eq!(for_of["await"], false);

    let in_init = stmt("for (var a = (b in c); ;) break");
    assert_eq!(in_init["type"], "ForStatement");

    let switch = stmt("switch (x) { case 1: case 2: a(); break; default: }");
    let cases = switch["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0]["consequent"], json!([]));
    assert!(cases[2]["test"].is_null());

    let try_stmt = stmt("try {} catch (e) {} finally {}");
    assert_eq!(try_stmt["handler"]["type"], "CatchClause");
    assert_eq!(try_stmt["handler"]["param"]["name"], "e");
    assert_eq!(try_stmt["finalizer"]["type"], "BlockStatement");

    let optional_catch = stmt("try {} catch {}");
    assert!(optional_catch["handler"]["param"].is_null());

    let labeled = stmt("outer: while (true) break outer;");
    assert_eq!(labeled["type"], "LabeledStatement");
    assert_eq!(labeled["body"]["body"]["label"]["name"], "outer");

    let do_while = stmt("do ; while (0)");
    assert_eq!(do_while["type"], "DoWhileStatement");
    assert_eq!(do_while["test"]["value"], 0);
}

#[test]
fn test_functions() {
    let decl = stmt("function* gen(a, b = 1) { yield a }");
    assert_eq!(decl["type"], "FunctionDeclaration");
    assert_eq!(decl["generator"], true);
    assert_eq!(decl["async"], false);
    assert_eq!(decl["expression"], false);
    assert_eq!(decl["params"][1]["type"], "AssignmentPattern");
    let yield_expr = &decl["body"]["body"][0]["expression"];
    assert_eq!(yield_expr["type"], "YieldExpression");
    assert_eq!(yield_expr["delegate"], false);

    let delegate = stmt("function* g() { yield* inner() }");
    assert_eq!(delegate["body"]["body"][0]["expression"]["delegate"], true);

    let bare_yield = stmt("function* g() { f(yield, yield) }");
    let args = &bare_yield["body"]["body"][0]["expression"]["arguments"];
    assert!(args[0]["argument"].is_null());

    let func_expr = expr("(function named() {})");
    assert_eq!(func_expr["type"], "FunctionExpression");
    assert_eq!(func_expr["id"]["name"], "named");
}

#[test]
fn test_hashbang_and_html_comments() {
    let json = parse_json("#!/usr/bin/env node\nx <!-- comment\n--> also comment\ny");
    let body = json["body"].as_array().unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[1]["expression"]["name"], "y");

    assert!(parse("x\n--> y", ParserOptions::script()).is_ok());
    assert!(parse("x\n--> y", ParserOptions::module()).is_err());
}
