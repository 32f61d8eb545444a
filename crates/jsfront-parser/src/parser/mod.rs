//! Recursive descent parser for ECMAScript.
//!
//! Statements are parsed by recursive descent, expressions by precedence
//! climbing. Ambiguous heads (`(a, b)` before `=>`, `[a] = b`) are parsed
//! once as expressions and reinterpreted as patterns when the following
//! token confirms it; see [`crate::pattern`].
//!
//! The impl of [`Parser`] is split across this module's files:
//! - `statement.rs`: statements, declarations, directives
//! - `expression.rs`: expressions, literals, templates
//! - `function.rs`: functions, arrows, classes, parameters
//! - `module.rs`: `import` and `export`
//! - `validate.rs`: identifier, target and binding checks

mod expression;
mod function;
mod module;
mod statement;
mod validate;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{Program, Stmt};
use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::lexer::Lexer;
use crate::options::ParserOptions;
use crate::scope::{PrivateNameScope, ScopeFlags, ScopeStack};
use crate::span::{Marker, Position, Span};
use crate::token::{Token, TokenKind};

/// Errors in an expression that are only errors if it stays an expression.
///
/// `({a = 1})` is invalid, `({a = 1} = b)` is not. The offsets are
/// remembered while parsing and either raised or discarded once the parser
/// knows whether the expression becomes a pattern.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CoverErrors {
    /// `{a = 1}` shorthand with initializer.
    pub shorthand_assign: Option<u32>,
    /// A second `__proto__: x` property.
    pub double_proto: Option<u32>,
}

/// Remaining stack below which `nested` switches to a fresh segment.
/// Must cover the frames between two `nested` calls in debug builds.
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Offsets are `u32`, which bounds the source length.
fn check_source_len(len: usize) -> ParseResult<()> {
    if u32::try_from(len).is_err() {
        return Err(ParseError::new(
            ErrorKind::Resource,
            format!("Source of {len} bytes exceeds the 4 GiB limit"),
            Marker {
                offset: 0,
                pos: Position { line: 1, column: 0 },
            },
        ));
    }
    Ok(())
}

/// Where a statement appears, which decides what declarations it may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StmtContext {
    /// Directly in a script or module body.
    TopLevel,
    /// In a block, function body, case clause or static block.
    List,
    /// Body of `if` or `else`.
    If,
    /// Body of a labeled statement.
    Labeled,
    /// Any other single-statement position: loop bodies, `with`.
    Nested,
}

impl StmtContext {
    pub fn is_list(self) -> bool {
        matches!(self, StmtContext::TopLevel | StmtContext::List)
    }
}

/// The parser.
pub struct Parser<'a> {
    /// The lexer.
    pub(crate) lexer: Lexer<'a>,
    /// Current token.
    pub(crate) current: Token,
    /// End of the last consumed token.
    pub(crate) prev_end: Marker,
    /// Parser options.
    pub(crate) options: ParserOptions,
    pub(crate) source: &'a str,
    /// When false, `in` is not parsed as a binary operator (for-in init).
    pub(crate) allow_in: bool,
    pub(crate) scopes: ScopeStack,
    /// One entry per enclosing class body.
    pub(crate) private_names: Vec<PrivateNameScope>,
    /// Current nesting of the recursion guard.
    pub(crate) depth: u32,
    /// First `yield` in the current parameter list or arrow head.
    pub(crate) yield_pos: Option<u32>,
    /// First `await` expression in the current parameter list or arrow head.
    pub(crate) await_pos: Option<u32>,
    /// First `await` used as an identifier in the current arrow head.
    pub(crate) await_ident_pos: Option<u32>,
    /// Start offset of a token that may begin a single-parameter arrow.
    pub(crate) potential_arrow_at: Option<u32>,
    /// Names exported so far (module code).
    pub(crate) exported: FxHashSet<String>,
    /// Local names of `export { x }` not yet known to be declared.
    pub(crate) undefined_exports: FxHashMap<String, Span>,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(source: &'a str, options: ParserOptions) -> Self {
        let lexer = Lexer::for_options(source, &options);
        let start = lexer.marker(0);
        Self {
            lexer,
            current: Token::new(TokenKind::Eof, Span::between(start, start)),
            prev_end: start,
            scopes: ScopeStack::new(options.is_module()),
            options,
            source,
            allow_in: true,
            private_names: Vec::new(),
            depth: 0,
            yield_pos: None,
            await_pos: None,
            await_ident_pos: None,
            potential_arrow_at: None,
            exported: FxHashSet::default(),
            undefined_exports: FxHashMap::default(),
        }
    }

    /// Parse the entire source into a [`Program`].
    pub fn parse(mut self) -> ParseResult<Program> {
        check_source_len(self.source.len())?;
        self.current = self.lexer.next_token()?;
        let strict = self.options.strict || self.options.is_module();
        self.scopes.enter_strict(ScopeFlags::TOP, strict);

        let body = self.parse_program_body()?;

        if self.options.is_module() {
            if let Some((name, span)) = self.first_undefined_export() {
                return Err(ParseError::early_at(
                    format!("Export '{name}' is not defined"),
                    span,
                ));
            }
        }

        let start = self.lexer.marker(0);
        let end = self.lexer.marker(self.source.len() as u32);
        Ok(Program {
            body,
            source_type: self.options.source_type,
            span: Span::between(start, end),
        })
    }

    fn parse_program_body(&mut self) -> ParseResult<Vec<Stmt>> {
        if self.has_use_strict_directive()? {
            tracing::trace!("program opens with a use strict directive");
            self.scopes.set_strict();
        }
        let mut body = Vec::new();
        let mut prologue = true;
        while !self.is_eof() {
            let stmt = self.parse_stmt(StmtContext::TopLevel)?;
            body.push(self.directive(stmt, &mut prologue));
        }
        Ok(body)
    }

    fn first_undefined_export(&self) -> Option<(String, Span)> {
        let root = self.scopes.root()?;
        self.undefined_exports
            .iter()
            .filter(|(name, _)| !root.declares(name))
            .min_by_key(|(_, span)| span.start)
            .map(|(name, span)| (name.clone(), *span))
    }

    // =========================================================================
    // Token Handling
    // =========================================================================

    /// Get the current token kind.
    pub(crate) fn peek(&self) -> &TokenKind {
        &self.current.kind
    }

    /// Start marker of the current token.
    pub(crate) fn start(&self) -> Marker {
        self.current.span.start_marker()
    }

    /// Span from `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: Marker) -> Span {
        Span::between(start, self.prev_end)
    }

    /// Advance to the next token and return the previous.
    pub(crate) fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token()?;
        let prev = std::mem::replace(&mut self.current, next);
        self.prev_end = prev.span.end_marker();
        Ok(prev)
    }

    /// Check if the current token matches the given kind.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    /// Check if at end of file.
    pub(crate) fn is_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    /// Consume a token if it matches, returning true if consumed.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> ParseResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a token if it matches, otherwise return an error.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected())
        }
    }

    /// The current token is the unescaped contextual word `name`.
    pub(crate) fn is_contextual(&self, name: &str) -> bool {
        self.current.is_contextual(name)
    }

    pub(crate) fn eat_contextual(&mut self, name: &str) -> ParseResult<bool> {
        if self.is_contextual(name) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_contextual(&mut self, name: &str) -> ParseResult<()> {
        if self.eat_contextual(name)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// The token after the current one.
    pub(crate) fn lookahead(&self) -> ParseResult<Token> {
        self.lexer.peek()
    }

    /// The two tokens after the current one.
    pub(crate) fn lookahead2(&self) -> ParseResult<(Token, Token)> {
        let mut lexer = self.lexer.clone();
        let first = lexer.next_token()?;
        let second = lexer.next_token()?;
        Ok((first, second))
    }

    /// Error for the current token.
    pub(crate) fn unexpected(&self) -> ParseError {
        let message = match self.peek() {
            TokenKind::Eof => "Unexpected end of input".to_string(),
            kind => format!("Unexpected {}", kind.describe()),
        };
        ParseError::syntax(message, self.start())
    }

    /// Whether a semicolon may be inserted before the current token.
    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof | TokenKind::RBrace) || self.current.had_newline_before
    }

    /// Consume a semicolon (with ASI support).
    pub(crate) fn expect_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(&TokenKind::Semicolon)? || self.can_insert_semicolon() {
            return Ok(());
        }
        Err(ParseError::syntax("Missing semicolon", self.prev_end))
    }

    // =========================================================================
    // Context
    // =========================================================================

    pub(crate) fn strict(&self) -> bool {
        self.scopes.strict()
    }

    /// Run `f` one level deeper, failing once `max_depth` is exceeded.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::new(
                ErrorKind::Resource,
                format!("Maximum nesting depth of {} exceeded", self.options.max_depth),
                self.start(),
            ));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || f(self));
        self.depth -= 1;
        result
    }

    /// Run `f` with `allow_in` set, restoring the previous value after.
    pub(crate) fn with_in<T>(
        &mut self,
        allow_in: bool,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.allow_in, allow_in);
        let result = f(self);
        self.allow_in = saved;
        result
    }

    /// Error raised when an option switches off a construct.
    pub(crate) fn unsupported(&self, what: &str, at: Marker) -> ParseError {
        ParseError::new(ErrorKind::Unsupported, format!("{what} is disabled"), at)
    }

    /// Look ahead over the leading directives of a body for `"use strict"`.
    ///
    /// The current token must be the first token of the body.
    pub(crate) fn has_use_strict_directive(&self) -> ParseResult<bool> {
        let mut lexer = self.lexer.clone();
        let mut token = self.current.clone();
        loop {
            if !matches!(token.kind, TokenKind::String(_)) {
                return Ok(false);
            }
            let raw = &self.source[token.span.start as usize + 1..token.span.end as usize - 1];
            let next = lexer.next_token()?;
            let complete = match next.kind {
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => true,
                ref kind => next.had_newline_before && !kind.continues_expression(),
            };
            if !complete {
                return Ok(false);
            }
            if raw == "use strict" {
                return Ok(true);
            }
            token = if matches!(next.kind, TokenKind::Semicolon) {
                lexer.next_token()?
            } else {
                next
            };
        }
    }
}
