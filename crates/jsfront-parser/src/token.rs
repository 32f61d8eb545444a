//! Token types for ECMAScript.
//!
//! Only reserved words get their own kinds. Contextual words such as `let`,
//! `async`, `of` or `yield` are plain identifiers; the parser decides what
//! they mean from where they appear.

use crate::span::Span;

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appeared between the previous token and this one.
    pub had_newline_before: bool,
    /// The source text of an identifier or keyword contained a `\u` escape.
    pub escaped: bool,
    /// A legacy octal number or octal escape sequence occurred in this literal.
    pub legacy_octal: bool,
}

impl Token {
    /// Create a new token.
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            had_newline_before: false,
            escaped: false,
            legacy_octal: false,
        }
    }

    /// Whether this is the identifier `name` written without escapes.
    #[inline]
    pub fn is_contextual(&self, name: &str) -> bool {
        !self.escaped && matches!(&self.kind, TokenKind::Identifier(n) if n == name)
    }
}

/// One piece of a template literal between its delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateChunk {
    /// Escape-processed text; `None` when an escape sequence was invalid.
    pub cooked: Option<String>,
    /// Source text with CR and CRLF normalized to LF.
    pub raw: String,
    /// Offset and message of the first invalid escape.
    pub invalid_escape: Option<(u32, &'static str)>,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Identifier or contextual keyword, escapes decoded: `foo`, `let`, `a`
    Identifier(String),
    /// Private name without the `#`: `#x`
    PrivateName(String),
    /// String literal, escapes decoded
    String(String),
    /// Number literal: `42`, `3.14`, `0xff`, `1_000`
    Number(f64),
    /// BigInt literal digits (separators removed, no `n`): `42n`
    BigInt(String),
    /// Regular expression: `/pattern/flags`
    Regex { pattern: String, flags: String },
    /// Template without substitutions: `` `hello` ``
    TemplateNoSub(TemplateChunk),
    /// Template head: `` `hello ${``
    TemplateHead(TemplateChunk),
    /// Template middle: `} middle ${`
    TemplateMiddle(TemplateChunk),
    /// Template tail: `` } end` ``
    TemplateTail(TemplateChunk),

    // === Keywords ===
    // Declarations
    Var,
    Const,
    Function,
    Class,
    Enum,

    // Control flow
    If,
    Else,
    Switch,
    Case,
    Default,
    For,
    While,
    Do,
    Break,
    Continue,
    Return,

    // Exception handling
    Try,
    Catch,
    Finally,
    Throw,

    // Operators as keywords
    New,
    Delete,
    Typeof,
    Void,
    In,
    Instanceof,

    // Values
    This,
    Super,
    Null,
    True,
    False,

    // Modules
    Import,
    Export,

    // Other
    Extends,
    With,
    Debugger,

    // === Punctuation ===
    // Brackets
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]

    // Delimiters
    Semicolon,  // ;
    Comma,      // ,
    Colon,      // :
    Dot,        // .
    Question,   // ?

    // Arrows and spreads
    Arrow,      // =>
    Spread,     // ...

    // Optional chaining
    QuestionDot, // ?.

    // === Operators ===
    // Assignment
    Eq,         // =
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    StarStarEq, // **=
    AmpEq,      // &=
    PipeEq,     // |=
    CaretEq,    // ^=
    LtLtEq,     // <<=
    GtGtEq,     // >>=
    GtGtGtEq,   // >>>=
    AmpAmpEq,   // &&=
    PipePipeEq, // ||=
    QuestionQuestionEq, // ??=

    // Comparison
    EqEq,       // ==
    EqEqEq,     // ===
    BangEq,     // !=
    BangEqEq,   // !==
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=

    // Arithmetic
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    StarStar,   // **
    PlusPlus,   // ++
    MinusMinus, // --

    // Bitwise
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    Tilde,      // ~
    LtLt,       // <<
    GtGt,       // >>
    GtGtGt,     // >>>

    // Logical
    AmpAmp,     // &&
    PipePipe,   // ||
    Bang,       // !
    QuestionQuestion, // ??

    // === Special ===
    /// End of file
    Eof,
}

impl TokenKind {
    /// Check if this token can start an expression.
    ///
    /// `/` and `/=` count: in operand position they begin a regex.
    pub fn can_start_expr(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier(_)
                | TokenKind::PrivateName(_)
                | TokenKind::String(_)
                | TokenKind::Number(_)
                | TokenKind::BigInt(_)
                | TokenKind::Regex { .. }
                | TokenKind::TemplateNoSub(_)
                | TokenKind::TemplateHead(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Function
                | TokenKind::Class
                | TokenKind::New
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Typeof
                | TokenKind::Void
                | TokenKind::Delete
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Slash
                | TokenKind::SlashEq
                | TokenKind::Import
        )
    }

    /// Whether a `/` directly after this token is a division operator.
    ///
    /// True for tokens that end an operand. Everything else leaves the
    /// lexer expecting an operand, where `/` starts a regex.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier(_)
                | TokenKind::PrivateName(_)
                | TokenKind::String(_)
                | TokenKind::Number(_)
                | TokenKind::BigInt(_)
                | TokenKind::Regex { .. }
                | TokenKind::TemplateNoSub(_)
                | TokenKind::TemplateTail(_)
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }

    /// Check if this is a keyword.
    pub fn is_keyword(&self) -> bool {
        self.keyword_str().is_some()
    }

    /// The source spelling of a keyword token.
    pub fn keyword_str(&self) -> Option<&'static str> {
        let s = match self {
            TokenKind::Var => "var",
            TokenKind::Const => "const",
            TokenKind::Function => "function",
            TokenKind::Class => "class",
            TokenKind::Enum => "enum",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Throw => "throw",
            TokenKind::New => "new",
            TokenKind::Delete => "delete",
            TokenKind::Typeof => "typeof",
            TokenKind::Void => "void",
            TokenKind::In => "in",
            TokenKind::Instanceof => "instanceof",
            TokenKind::This => "this",
            TokenKind::Super => "super",
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Import => "import",
            TokenKind::Export => "export",
            TokenKind::Extends => "extends",
            TokenKind::With => "with",
            TokenKind::Debugger => "debugger",
            _ => return None,
        };
        Some(s)
    }

    /// Check if this is an assignment operator.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::StarStarEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
                | TokenKind::LtLtEq
                | TokenKind::GtGtEq
                | TokenKind::GtGtGtEq
                | TokenKind::AmpAmpEq
                | TokenKind::PipePipeEq
                | TokenKind::QuestionQuestionEq
        )
    }

    /// Get the precedence of a binary operator (higher = binds tighter).
    /// Returns None if not a binary operator.
    pub fn binary_precedence(&self) -> Option<u8> {
        match self {
            TokenKind::QuestionQuestion => Some(1),
            TokenKind::PipePipe => Some(2),
            TokenKind::AmpAmp => Some(3),
            TokenKind::Pipe => Some(4),
            TokenKind::Caret => Some(5),
            TokenKind::Amp => Some(6),
            TokenKind::EqEq | TokenKind::EqEqEq | TokenKind::BangEq | TokenKind::BangEqEq => Some(7),
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq
            | TokenKind::In | TokenKind::Instanceof => Some(8),
            TokenKind::LtLt | TokenKind::GtGt | TokenKind::GtGtGt => Some(9),
            TokenKind::Plus | TokenKind::Minus => Some(10),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(11),
            TokenKind::StarStar => Some(12), // Right associative
            _ => None,
        }
    }

    /// Check if this binary operator is right associative.
    pub fn is_right_associative(&self) -> bool {
        matches!(self, TokenKind::StarStar)
    }

    /// Tokens that keep an expression going onto the next line, so a string
    /// followed by one of them is not a complete directive.
    pub fn continues_expression(&self) -> bool {
        self.binary_precedence().is_some()
            || self.is_assignment()
            || matches!(
                self,
                TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::Dot
                    | TokenKind::QuestionDot
                    | TokenKind::Question
                    | TokenKind::Comma
                    | TokenKind::TemplateNoSub(_)
                    | TokenKind::TemplateHead(_)
            )
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        if let Some(kw) = self.keyword_str() {
            return format!("keyword '{kw}'");
        }
        match self {
            TokenKind::Identifier(name) => format!("identifier '{name}'"),
            TokenKind::PrivateName(name) => format!("private name '#{name}'"),
            TokenKind::String(_) => "string".to_string(),
            TokenKind::Number(_) | TokenKind::BigInt(_) => "number".to_string(),
            TokenKind::Regex { .. } => "regular expression".to_string(),
            TokenKind::TemplateNoSub(_)
            | TokenKind::TemplateHead(_)
            | TokenKind::TemplateMiddle(_)
            | TokenKind::TemplateTail(_) => "template".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", punctuator_str(other)),
        }
    }
}

fn punctuator_str(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        TokenKind::LBrace => "{",
        TokenKind::RBrace => "}",
        TokenKind::LBracket => "[",
        TokenKind::RBracket => "]",
        TokenKind::Semicolon => ";",
        TokenKind::Comma => ",",
        TokenKind::Colon => ":",
        TokenKind::Dot => ".",
        TokenKind::Question => "?",
        TokenKind::Arrow => "=>",
        TokenKind::Spread => "...",
        TokenKind::QuestionDot => "?.",
        TokenKind::Eq => "=",
        TokenKind::PlusEq => "+=",
        TokenKind::MinusEq => "-=",
        TokenKind::StarEq => "*=",
        TokenKind::SlashEq => "/=",
        TokenKind::PercentEq => "%=",
        TokenKind::StarStarEq => "**=",
        TokenKind::AmpEq => "&=",
        TokenKind::PipeEq => "|=",
        TokenKind::CaretEq => "^=",
        TokenKind::LtLtEq => "<<=",
        TokenKind::GtGtEq => ">>=",
        TokenKind::GtGtGtEq => ">>>=",
        TokenKind::AmpAmpEq => "&&=",
        TokenKind::PipePipeEq => "||=",
        TokenKind::QuestionQuestionEq => "??=",
        TokenKind::EqEq => "==",
        TokenKind::EqEqEq => "===",
        TokenKind::BangEq => "!=",
        TokenKind::BangEqEq => "!==",
        TokenKind::Lt => "<",
        TokenKind::LtEq => "<=",
        TokenKind::Gt => ">",
        TokenKind::GtEq => ">=",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::StarStar => "**",
        TokenKind::PlusPlus => "++",
        TokenKind::MinusMinus => "--",
        TokenKind::Amp => "&",
        TokenKind::Pipe => "|",
        TokenKind::Caret => "^",
        TokenKind::Tilde => "~",
        TokenKind::LtLt => "<<",
        TokenKind::GtGt => ">>",
        TokenKind::GtGtGt => ">>>",
        TokenKind::AmpAmp => "&&",
        TokenKind::PipePipe => "||",
        TokenKind::Bang => "!",
        TokenKind::QuestionQuestion => "??",
        _ => "?",
    }
}

/// Look up a reserved word from an identifier string.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "var" => Some(TokenKind::Var),
        "const" => Some(TokenKind::Const),
        "function" => Some(TokenKind::Function),
        "class" => Some(TokenKind::Class),
        "enum" => Some(TokenKind::Enum),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "switch" => Some(TokenKind::Switch),
        "case" => Some(TokenKind::Case),
        "default" => Some(TokenKind::Default),
        "for" => Some(TokenKind::For),
        "while" => Some(TokenKind::While),
        "do" => Some(TokenKind::Do),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "return" => Some(TokenKind::Return),
        "try" => Some(TokenKind::Try),
        "catch" => Some(TokenKind::Catch),
        "finally" => Some(TokenKind::Finally),
        "throw" => Some(TokenKind::Throw),
        "new" => Some(TokenKind::New),
        "delete" => Some(TokenKind::Delete),
        "typeof" => Some(TokenKind::Typeof),
        "void" => Some(TokenKind::Void),
        "in" => Some(TokenKind::In),
        "instanceof" => Some(TokenKind::Instanceof),
        "this" => Some(TokenKind::This),
        "super" => Some(TokenKind::Super),
        "null" => Some(TokenKind::Null),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "import" => Some(TokenKind::Import),
        "export" => Some(TokenKind::Export),
        "extends" => Some(TokenKind::Extends),
        "with" => Some(TokenKind::With),
        "debugger" => Some(TokenKind::Debugger),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_round_trips() {
        for word in ["var", "enum", "instanceof", "debugger", "super"] {
            let kind = keyword_from_str(word).unwrap();
            assert_eq!(kind.keyword_str(), Some(word));
        }
        assert_eq!(keyword_from_str("let"), None);
        assert_eq!(keyword_from_str("async"), None);
    }

    #[test]
    fn test_precedence_table() {
        assert!(TokenKind::Star.binary_precedence() > TokenKind::Plus.binary_precedence());
        assert!(TokenKind::PipePipe.binary_precedence() > TokenKind::QuestionQuestion.binary_precedence());
        assert!(TokenKind::StarStar.is_right_associative());
        assert_eq!(TokenKind::Eq.binary_precedence(), None);
    }

    #[test]
    fn test_division_context() {
        assert!(TokenKind::RParen.ends_operand());
        assert!(TokenKind::Identifier("x".into()).ends_operand());
        assert!(!TokenKind::Typeof.ends_operand());
        assert!(!TokenKind::LParen.ends_operand());
    }
}
