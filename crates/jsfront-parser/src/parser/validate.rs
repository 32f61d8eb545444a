//! Identifier, target and binding checks.

use super::Parser;
use crate::ast::{Expr, ExprKind, Identifier, Pattern};
use crate::early::{is_reserved_word, is_restricted_binding, is_strict_reserved_word};
use crate::error::{ParseError, ParseResult};
use crate::scope::BindingKind;
use crate::span::Span;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// Parse an identifier reference or binding identifier.
    pub(crate) fn parse_ident(&mut self) -> ParseResult<Identifier> {
        let escaped = self.current.escaped;
        let name = match self.peek() {
            TokenKind::Identifier(name) => name.clone(),
            _ => return Err(self.unexpected()),
        };
        let token = self.advance()?;
        if escaped && is_reserved_word(&name) {
            return Err(ParseError::syntax(
                format!("Escape sequence in keyword {name}"),
                token.span.start_marker(),
            ));
        }
        self.check_unreserved(&name, token.span)?;
        if name == "await" && self.await_ident_pos.is_none() {
            self.await_ident_pos = Some(token.span.start);
        }
        Ok(Identifier {
            name,
            span: token.span,
        })
    }

    /// Parse an IdentifierName: any identifier or reserved word.
    pub(crate) fn parse_ident_name(&mut self) -> ParseResult<Identifier> {
        let name = match self.peek() {
            TokenKind::Identifier(name) => name.clone(),
            kind => match kind.keyword_str() {
                Some(word) => word.to_string(),
                None => return Err(self.unexpected()),
            },
        };
        let token = self.advance()?;
        Ok(Identifier {
            name,
            span: token.span,
        })
    }

    /// Reject names that are reserved in the current context.
    pub(crate) fn check_unreserved(&self, name: &str, span: Span) -> ParseResult<()> {
        let fail = |message: String| Err(ParseError::early_at(message, span));
        if name == "yield" && self.scopes.in_generator() {
            return fail("Cannot use 'yield' as identifier inside a generator".into());
        }
        if name == "await" && self.scopes.in_async() {
            return fail("Cannot use 'await' as identifier inside an async function".into());
        }
        if name == "arguments" && self.scopes.in_class_field_init() {
            return fail("Cannot use 'arguments' in class field initializer".into());
        }
        if (name == "arguments" || name == "await") && self.scopes.in_class_static_block() {
            return fail(format!("Cannot use {name} in class static initialization block"));
        }
        if is_reserved_word(name) {
            return fail(format!("Unexpected keyword '{name}'"));
        }
        if name == "await" && self.options.is_module() {
            return fail("Cannot use keyword 'await' outside an async function".into());
        }
        if self.strict() && is_strict_reserved_word(name) {
            return fail(format!("The keyword '{name}' is reserved"));
        }
        Ok(())
    }

    /// Validate and declare every name bound by a declaration pattern.
    pub(crate) fn declare_pattern(&mut self, pattern: &Pattern, kind: BindingKind) -> ParseResult<()> {
        let mut result = Ok(());
        pattern.for_each_binding(&mut |id| {
            if result.is_ok() {
                result = self.declare_name(id, kind);
            }
        });
        result
    }

    pub(crate) fn declare_name(&mut self, id: &Identifier, kind: BindingKind) -> ParseResult<()> {
        self.check_binding_name(id)?;
        if kind == BindingKind::Lexical && id.name == "let" {
            return Err(ParseError::early_at(
                "let is disallowed as a lexically bound name",
                id.span,
            ));
        }
        if !self.scopes.declare(&id.name, kind) {
            return Err(redeclared(id));
        }
        Ok(())
    }

    /// Binding checks that do not touch the scope: `eval`/`arguments` in
    /// strict code.
    pub(crate) fn check_binding_name(&self, id: &Identifier) -> ParseResult<()> {
        if self.strict() && is_restricted_binding(&id.name) {
            return Err(ParseError::early_at(
                format!("Binding {} in strict mode", id.name),
                id.span,
            ));
        }
        Ok(())
    }

    /// Checks for a destructuring or simple assignment target.
    pub(crate) fn check_assign_target(&self, pattern: &Pattern) -> ParseResult<()> {
        let mut result = Ok(());
        pattern.for_each_binding(&mut |id| {
            if result.is_ok() && self.strict() && is_restricted_binding(&id.name) {
                result = Err(ParseError::early_at(
                    format!("Assigning to {} in strict mode", id.name),
                    id.span,
                ));
            }
        });
        result
    }

    /// Convert the operand of `++`, `--` or a compound assignment.
    pub(crate) fn simple_target(&self, expr: Expr, context: &str) -> ParseResult<Pattern> {
        match expr.kind {
            ExprKind::Ident { name } => {
                let id = Identifier {
                    name,
                    span: expr.span,
                };
                if self.strict() && is_restricted_binding(&id.name) {
                    return Err(ParseError::early_at(
                        format!("Assigning to {} in strict mode", id.name),
                        id.span,
                    ));
                }
                Ok(Pattern::Ident(id))
            }
            ExprKind::Member { optional: false, .. } => Ok(Pattern::Member(Box::new(expr))),
            ExprKind::Member { .. } | ExprKind::Chain { .. } => Err(ParseError::early_at(
                "Optional chaining cannot appear in left-hand side",
                expr.span,
            )),
            _ => Err(ParseError::early_at(
                format!("Invalid left-hand side in {context}"),
                expr.span,
            )),
        }
    }
}

pub(crate) fn redeclared(id: &Identifier) -> ParseError {
    ParseError::early_at(
        format!("Identifier '{}' has already been declared", id.name),
        id.span,
    )
}
