//! AST node types, shaped after ESTree.
//!
//! Serializing a [`Program`] with serde produces ESTree JSON: every node
//! carries `type`, `start`, `end` and `loc`. Expressions and statements are a
//! kind enum plus a span; nodes that appear in a fixed slot (identifiers,
//! patterns, specifiers) are standalone structs tagged with their ESTree type.

use serde::{Serialize, Serializer};

use crate::options::SourceType;
use crate::span::Span;

/// The root of a parsed script or module.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Program {
    pub body: Vec<Stmt>,
    #[serde(rename = "sourceType")]
    pub source_type: SourceType,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Expressions
// =============================================================================

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    #[serde(flatten)]
    pub span: Span,
    /// Wrapped in parentheses in the source. Not part of ESTree output.
    #[serde(skip)]
    pub parenthesized: bool,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            parenthesized: false,
        }
    }

    /// An identifier reference named `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, ExprKind::Ident { name: n } if n == name)
    }

    /// A string literal, for directive and `__proto__` checks.
    pub fn as_string_literal(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Literal(Literal {
                value: LiteralValue::String(s),
                ..
            }) => Some(s),
            _ => None,
        }
    }
}

/// Expression kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ExprKind {
    #[serde(rename = "Identifier")]
    Ident { name: String },
    #[serde(rename = "PrivateIdentifier")]
    PrivateName { name: String },
    #[serde(rename = "Literal")]
    Literal(Literal),
    #[serde(rename = "ThisExpression")]
    This,
    Super,
    #[serde(rename = "ArrayExpression")]
    Array {
        elements: Vec<Option<Expr>>,
        /// Offset of a comma after a spread element.
        #[serde(skip)]
        trailing_comma: Option<u32>,
    },
    #[serde(rename = "ObjectExpression")]
    Object {
        properties: Vec<ObjectMember>,
        /// Offset of a comma after a spread property.
        #[serde(skip)]
        trailing_comma: Option<u32>,
    },
    #[serde(rename = "FunctionExpression")]
    Function(Box<Function>),
    #[serde(rename = "ArrowFunctionExpression")]
    Arrow(Box<ArrowFunction>),
    #[serde(rename = "ClassExpression")]
    Class(Box<Class>),
    #[serde(rename = "TemplateLiteral")]
    Template {
        quasis: Vec<TemplateElement>,
        expressions: Vec<Expr>,
    },
    #[serde(rename = "TaggedTemplateExpression")]
    TaggedTemplate {
        tag: Box<Expr>,
        quasi: TemplateLiteral,
    },
    #[serde(rename = "UnaryExpression")]
    Unary {
        operator: UnaryOp,
        prefix: bool,
        argument: Box<Expr>,
    },
    #[serde(rename = "UpdateExpression")]
    Update {
        operator: UpdateOp,
        prefix: bool,
        argument: Box<Expr>,
    },
    #[serde(rename = "BinaryExpression")]
    Binary {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    #[serde(rename = "LogicalExpression")]
    Logical {
        operator: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    #[serde(rename = "AssignmentExpression")]
    Assign {
        operator: AssignOp,
        left: Box<Pattern>,
        right: Box<Expr>,
    },
    #[serde(rename = "ConditionalExpression")]
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    #[serde(rename = "CallExpression")]
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        optional: bool,
    },
    #[serde(rename = "NewExpression")]
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    #[serde(rename = "MemberExpression")]
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
        optional: bool,
    },
    #[serde(rename = "ChainExpression")]
    Chain { expression: Box<Expr> },
    #[serde(rename = "SequenceExpression")]
    Sequence { expressions: Vec<Expr> },
    #[serde(rename = "YieldExpression")]
    Yield {
        argument: Option<Box<Expr>>,
        delegate: bool,
    },
    #[serde(rename = "AwaitExpression")]
    Await { argument: Box<Expr> },
    #[serde(rename = "MetaProperty")]
    MetaProperty { meta: Identifier, property: Identifier },
    #[serde(rename = "ImportExpression")]
    Import {
        source: Box<Expr>,
        options: Option<Box<Expr>>,
    },
    /// Spread in array literals and argument lists.
    #[serde(rename = "SpreadElement")]
    Spread { argument: Box<Expr> },
}

/// A literal value with its source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub value: LiteralValue,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegExpLiteral>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bigint: Option<String>,
}

/// The `value` of a literal. Regex and BigInt values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    #[serde(serialize_with = "serialize_number")]
    Number(f64),
    String(String),
    RegExp,
    BigInt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegExpLiteral {
    pub pattern: String,
    pub flags: String,
}

/// Integral values print as JSON integers, like a JavaScript serializer would.
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_SAFE {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// A standalone identifier node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Identifier")]
pub struct Identifier {
    pub name: String,
    #[serde(flatten)]
    pub span: Span,
}

impl Identifier {
    pub fn into_expr(self) -> Expr {
        Expr::new(ExprKind::Ident { name: self.name }, self.span)
    }
}

/// A string literal in a fixed slot: module sources, attribute values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Literal")]
pub struct StringLiteral {
    pub value: String,
    pub raw: String,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TemplateLiteral")]
pub struct TemplateLiteral {
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TemplateElement")]
pub struct TemplateElement {
    pub value: TemplateValue,
    pub tail: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateValue {
    pub raw: String,
    /// `None` for an invalid escape in a tagged template.
    pub cooked: Option<String>,
}

/// A member of an object literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectMember {
    Property(Property),
    Spread(SpreadElement),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Property")]
pub struct Property {
    pub key: Expr,
    pub value: Expr,
    pub kind: PropertyKind,
    pub method: bool,
    pub shorthand: bool,
    pub computed: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "SpreadElement")]
pub struct SpreadElement {
    pub argument: Box<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Operators
// =============================================================================

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "~")]
    BitNot,
    #[serde(rename = "typeof")]
    Typeof,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "delete")]
    Delete,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    // Arithmetic
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "**")]
    Pow,

    // Comparison
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,

    // Bitwise
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "^")]
    BitXor,
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "<<")]
    Shl,
    #[serde(rename = ">>")]
    Shr,
    #[serde(rename = ">>>")]
    UShr,

    // Other
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    Instanceof,
}

/// Short-circuiting operators (`LogicalExpression`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "??")]
    NullishCoalesce,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    AddAssign,
    #[serde(rename = "-=")]
    SubAssign,
    #[serde(rename = "*=")]
    MulAssign,
    #[serde(rename = "/=")]
    DivAssign,
    #[serde(rename = "%=")]
    ModAssign,
    #[serde(rename = "**=")]
    PowAssign,
    #[serde(rename = "<<=")]
    ShlAssign,
    #[serde(rename = ">>=")]
    ShrAssign,
    #[serde(rename = ">>>=")]
    UShrAssign,
    #[serde(rename = "|=")]
    BitOrAssign,
    #[serde(rename = "^=")]
    BitXorAssign,
    #[serde(rename = "&=")]
    BitAndAssign,
    #[serde(rename = "&&=")]
    AndAssign,
    #[serde(rename = "||=")]
    OrAssign,
    #[serde(rename = "??=")]
    NullishAssign,
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOp {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

// =============================================================================
// Patterns
// =============================================================================

/// A binding or assignment target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Pattern {
    Ident(Identifier),
    /// Only valid as an assignment target.
    Member(Box<Expr>),
    Array(ArrayPattern),
    Object(ObjectPattern),
    Assign(AssignmentPattern),
    Rest(RestElement),
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Ident(id) => id.span,
            Pattern::Member(expr) => expr.span,
            Pattern::Array(p) => p.span,
            Pattern::Object(p) => p.span,
            Pattern::Assign(p) => p.span,
            Pattern::Rest(p) => p.span,
        }
    }

    /// Visit every identifier this pattern binds, in source order.
    pub fn for_each_binding<'p>(&'p self, f: &mut impl FnMut(&'p Identifier)) {
        match self {
            Pattern::Ident(id) => f(id),
            Pattern::Member(_) => {}
            Pattern::Array(p) => {
                for elem in p.elements.iter().flatten() {
                    elem.for_each_binding(f);
                }
            }
            Pattern::Object(p) => {
                for prop in &p.properties {
                    match prop {
                        ObjectPatternMember::Property(prop) => prop.value.for_each_binding(f),
                        ObjectPatternMember::Rest(rest) => rest.argument.for_each_binding(f),
                    }
                }
            }
            Pattern::Assign(p) => p.left.for_each_binding(f),
            Pattern::Rest(p) => p.argument.for_each_binding(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ArrayPattern")]
pub struct ArrayPattern {
    pub elements: Vec<Option<Pattern>>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ObjectPattern")]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternMember>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectPatternMember {
    Property(AssignmentProperty),
    Rest(RestElement),
}

/// A `key: target` entry of an object pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Property")]
pub struct AssignmentProperty {
    pub key: Expr,
    pub value: Pattern,
    pub kind: PropertyKind,
    pub method: bool,
    pub shorthand: bool,
    pub computed: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "AssignmentPattern")]
pub struct AssignmentPattern {
    pub left: Box<Pattern>,
    pub right: Box<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "RestElement")]
pub struct RestElement {
    pub argument: Box<Pattern>,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Statements
// =============================================================================

/// A statement node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    #[serde(flatten)]
    pub kind: StmtKind,
    #[serde(flatten)]
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum StmtKind {
    #[serde(rename = "ExpressionStatement")]
    Expr {
        expression: Expr,
        /// Raw text of a directive such as `"use strict"`, without quotes.
        #[serde(skip_serializing_if = "Option::is_none")]
        directive: Option<String>,
    },
    #[serde(rename = "BlockStatement")]
    Block { body: Vec<Stmt> },
    #[serde(rename = "EmptyStatement")]
    Empty,
    #[serde(rename = "DebuggerStatement")]
    Debugger,
    #[serde(rename = "WithStatement")]
    With { object: Expr, body: Box<Stmt> },
    #[serde(rename = "ReturnStatement")]
    Return { argument: Option<Expr> },
    #[serde(rename = "LabeledStatement")]
    Labeled { label: Identifier, body: Box<Stmt> },
    #[serde(rename = "BreakStatement")]
    Break { label: Option<Identifier> },
    #[serde(rename = "ContinueStatement")]
    Continue { label: Option<Identifier> },
    #[serde(rename = "IfStatement")]
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    #[serde(rename = "SwitchStatement")]
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    #[serde(rename = "ThrowStatement")]
    Throw { argument: Expr },
    #[serde(rename = "TryStatement")]
    Try {
        block: BlockStatement,
        handler: Option<CatchClause>,
        finalizer: Option<BlockStatement>,
    },
    #[serde(rename = "WhileStatement")]
    While { test: Expr, body: Box<Stmt> },
    #[serde(rename = "DoWhileStatement")]
    DoWhile { body: Box<Stmt>, test: Expr },
    #[serde(rename = "ForStatement")]
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    #[serde(rename = "ForInStatement")]
    ForIn {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
    },
    #[serde(rename = "ForOfStatement")]
    ForOf {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
        #[serde(rename = "await")]
        is_await: bool,
    },
    #[serde(rename = "FunctionDeclaration")]
    Function(Box<Function>),
    #[serde(rename = "VariableDeclaration")]
    Var {
        declarations: Vec<VariableDeclarator>,
        kind: VarKind,
    },
    #[serde(rename = "ClassDeclaration")]
    Class(Box<Class>),
    #[serde(rename = "ImportDeclaration")]
    Import(Box<ImportDeclaration>),
    #[serde(rename = "ExportNamedDeclaration")]
    ExportNamed(Box<ExportNamedDeclaration>),
    #[serde(rename = "ExportDefaultDeclaration")]
    ExportDefault { declaration: ExportDefaultKind },
    #[serde(rename = "ExportAllDeclaration")]
    ExportAll(Box<ExportAllDeclaration>),
}

/// A block in a fixed slot: function bodies, `try`, `catch`, `finally`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "BlockStatement")]
pub struct BlockStatement {
    pub body: Vec<Stmt>,
    #[serde(flatten)]
    pub span: Span,
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    Var,
    Let,
    Const,
}

/// Variable declarator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "VariableDeclarator")]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

/// A declaration in the head of a `for` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "VariableDeclaration")]
pub struct VariableDeclaration {
    pub declarations: Vec<VariableDeclarator>,
    pub kind: VarKind,
    #[serde(flatten)]
    pub span: Span,
}

/// `init` of a `for (init; test; update)` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForInit {
    Var(VariableDeclaration),
    Expr(Expr),
}

/// `left` of a `for-in` or `for-of` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForHead {
    Var(VariableDeclaration),
    Pattern(Pattern),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "SwitchCase")]
pub struct SwitchCase {
    /// `None` for `default:`.
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "CatchClause")]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: BlockStatement,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Functions and classes
// =============================================================================

/// A function declaration, expression or method value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub expression: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowFunction {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: ArrowBody,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    /// The body is a single expression.
    pub expression: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrowBody {
    Block(BlockStatement),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub id: Option<Identifier>,
    #[serde(rename = "superClass")]
    pub super_class: Option<Box<Expr>>,
    pub body: ClassBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ClassBody")]
pub struct ClassBody {
    pub body: Vec<ClassElement>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassElement {
    Method(MethodDefinition),
    Property(PropertyDefinition),
    StaticBlock(StaticBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "MethodDefinition")]
pub struct MethodDefinition {
    pub key: Expr,
    /// Always a `FunctionExpression`.
    pub value: Box<Expr>,
    pub kind: MethodKind,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "PropertyDefinition")]
pub struct PropertyDefinition {
    pub key: Expr,
    pub value: Option<Expr>,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "StaticBlock")]
pub struct StaticBlock {
    pub body: Vec<Stmt>,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Modules
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDeclaration {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StringLiteral,
    pub attributes: Vec<ImportAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportSpecifier {
    Named(ImportNamedSpecifier),
    Default(ImportDefaultSpecifier),
    Namespace(ImportNamespaceSpecifier),
}

/// `import { imported as local }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportSpecifier")]
pub struct ImportNamedSpecifier {
    pub imported: ModuleExportName,
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportDefaultSpecifier")]
pub struct ImportDefaultSpecifier {
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportNamespaceSpecifier")]
pub struct ImportNamespaceSpecifier {
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

/// An export name: identifier or string literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleExportName {
    Ident(Identifier),
    String(StringLiteral),
}

impl ModuleExportName {
    pub fn name(&self) -> &str {
        match self {
            ModuleExportName::Ident(id) => &id.name,
            ModuleExportName::String(s) => &s.value,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ModuleExportName::Ident(id) => id.span,
            ModuleExportName::String(s) => s.span,
        }
    }
}

/// `with { type: "json" }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportAttribute")]
pub struct ImportAttribute {
    pub key: ModuleExportName,
    pub value: StringLiteral,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportNamedDeclaration {
    pub declaration: Option<Box<Stmt>>,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<StringLiteral>,
    pub attributes: Vec<ImportAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ExportSpecifier")]
pub struct ExportSpecifier {
    pub local: ModuleExportName,
    pub exported: ModuleExportName,
    #[serde(flatten)]
    pub span: Span,
}

/// `export default` payload: a function/class declaration or an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportDefaultKind {
    Decl(Box<Stmt>),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportAllDeclaration {
    pub exported: Option<ModuleExportName>,
    pub source: StringLiteral,
    pub attributes: Vec<ImportAttribute>,
}
