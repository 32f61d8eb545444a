//! jsfront-parser: ECMAScript source to ESTree AST
//!
//! # Design
//!
//! 1. **Lexing on demand**
//!    - The lexer is driven by the parser one token at a time
//!    - `/` and `}` are rescanned by the parser when the grammar says they
//!      start a regular expression or continue a template
//!
//! 2. **Parse once, reinterpret**
//!    - Heads like `(a, b)` or `[x, y]` are parsed as expressions first
//!    - When `=>` or `=` follows they become patterns (see [`pattern`])
//!
//! 3. **Early errors during the parse**
//!    - A stack of scope frames tracks strictness, bindings and labels
//!    - The first error aborts the parse with its kind and position
//!
//! # Example
//!
//! ```
//! use jsfront_parser::{parse, ParserOptions};
//!
//! let program = parse("const x = 1 + 2;", ParserOptions::default()).unwrap();
//! let json = serde_json::to_value(&program).unwrap();
//! assert_eq!(json["body"][0]["type"], "VariableDeclaration");
//! ```

pub mod ast;
pub mod early;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod pattern;
pub mod scope;
pub mod span;
pub mod token;

pub use ast::Program;
pub use error::{ErrorKind, ParseError, ParseResult};
pub use lexer::Lexer;
pub use options::{ParserOptions, SourceType};
pub use parser::Parser;
pub use span::{Position, SourceLocation, Span};
pub use token::{Token, TokenKind};

/// Parse `source` into a [`Program`].
///
/// Offsets are `u32`: a source of 4 GiB or more fails with
/// [`ErrorKind::Resource`].
pub fn parse(source: &str, options: ParserOptions) -> ParseResult<Program> {
    let span = tracing::debug_span!(
        "parse",
        source_type = ?options.source_type,
        len = source.len()
    );
    let _guard = span.enter();

    let result = Parser::new(source, options).parse();
    match &result {
        Ok(program) => tracing::debug!(statements = program.body.len(), "parsed"),
        Err(err) => tracing::debug!(kind = %err.kind, offset = err.offset, "parse failed: {}", err.message),
    }
    result
}
