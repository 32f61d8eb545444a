//! Expressions: precedence climbing, primaries, literals, templates and the
//! parenthesized-list-or-arrow head.

use super::{CoverErrors, Parser};
use crate::ast::{
    AssignOp, BinaryOp, Expr, ExprKind, Identifier, Literal, LiteralValue, LogicalOp, ObjectMember,
    Pattern, Property, PropertyKind, RegExpLiteral, SpreadElement, TemplateElement, TemplateLiteral,
    TemplateValue, UnaryOp, UpdateOp,
};
use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::pattern::{reinterpret_as_pattern, PatternPosition};
use crate::span::{Marker, Span};
use crate::token::{TemplateChunk, TokenKind};

/// What an object literal member starts with, before its key.
struct MemberPrefix {
    is_async: bool,
    is_generator: bool,
    kind: PropertyKind,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // Expression Parsing
    // =========================================================================

    /// Parse an expression (with comma operator).
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_with(None)
    }

    pub(crate) fn parse_expr_with(&mut self, mut cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        let start = self.start();
        let first = self.parse_maybe_assign(cover.as_deref_mut())?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(&TokenKind::Comma)? {
            expressions.push(self.parse_maybe_assign(cover.as_deref_mut())?);
        }
        Ok(Expr::new(
            ExprKind::Sequence { expressions },
            self.span_from(start),
        ))
    }

    /// Parse an assignment expression.
    pub(crate) fn parse_assign_expr(&mut self) -> ParseResult<Expr> {
        self.parse_maybe_assign(None)
    }

    /// Parse an assignment expression, recording cover-grammar errors in
    /// `cover` when the caller may still turn it into a pattern.
    pub(crate) fn parse_maybe_assign(&mut self, cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        self.nested(|p| p.parse_maybe_assign_inner(cover))
    }

    fn parse_maybe_assign_inner(&mut self, cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        if self.is_contextual("yield") && self.scopes.in_generator() {
            return self.parse_yield();
        }

        let owns_cover = cover.is_none();
        let mut own = CoverErrors::default();
        let cover = match cover {
            Some(cover) => cover,
            None => &mut own,
        };

        let start = self.start();
        if matches!(self.peek(), TokenKind::LParen | TokenKind::Identifier(_)) {
            self.potential_arrow_at = Some(start.offset);
        }

        let left = self.parse_conditional(Some(&mut *cover))?;

        let Some(operator) = assign_op(self.peek()) else {
            if owns_cover {
                self.check_cover_errors(cover)?;
            }
            return Ok(left);
        };

        let target = if operator == AssignOp::Assign {
            if cover.shorthand_assign.is_some_and(|at| at >= left.span.start) {
                cover.shorthand_assign = None;
            }
            if cover.double_proto.is_some_and(|at| at >= left.span.start) {
                cover.double_proto = None;
            }
            let pattern = reinterpret_as_pattern(left, PatternPosition::Assignment)?;
            self.check_assign_target(&pattern)?;
            pattern
        } else {
            self.check_cover_errors(cover)?;
            self.simple_target(left, "assignment")?
        };
        if owns_cover {
            self.check_cover_errors(cover)?;
        }

        self.advance()?;
        let right = self.parse_maybe_assign(None)?;
        Ok(Expr::new(
            ExprKind::Assign {
                operator,
                left: Box::new(target),
                right: Box::new(right),
            },
            self.span_from(start),
        ))
    }

    fn parse_yield(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        if self.yield_pos.is_none() {
            self.yield_pos = Some(start.offset);
        }
        self.advance()?;
        let no_argument = self.check(&TokenKind::Semicolon)
            || self.can_insert_semicolon()
            || (!self.check(&TokenKind::Star) && !self.peek().can_start_expr());
        let (delegate, argument) = if no_argument {
            (false, None)
        } else {
            let delegate = self.eat(&TokenKind::Star)?;
            (delegate, Some(Box::new(self.parse_maybe_assign(None)?)))
        };
        Ok(Expr::new(
            ExprKind::Yield { argument, delegate },
            self.span_from(start),
        ))
    }

    /// Parse conditional expression (ternary).
    fn parse_conditional(&mut self, cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        let start = self.start();
        let test = self.parse_binary_ops(cover)?;
        if !self.eat(&TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = self.with_in(true, |p| p.parse_maybe_assign(None))?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_maybe_assign(None)?;
        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            self.span_from(start),
        ))
    }

    fn parse_binary_ops(&mut self, cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        let start = self.start();
        let left = self.parse_maybe_unary(cover, false, false)?;
        if is_bare_arrow(&left) {
            return Ok(left);
        }
        self.parse_binary_rhs(left, start, 0)
    }

    /// Binary operator precedence for the current token, honoring `allow_in`.
    fn current_binary_precedence(&self) -> Option<u8> {
        match self.peek() {
            TokenKind::In if !self.allow_in => None,
            TokenKind::StarStar => None,
            kind => kind.binary_precedence(),
        }
    }

    /// Parse binary expression using precedence climbing.
    fn parse_binary_rhs(&mut self, left: Expr, left_start: Marker, min_prec: u8) -> ParseResult<Expr> {
        let Some(prec) = self.current_binary_precedence() else {
            return Ok(left);
        };
        if prec <= min_prec {
            return Ok(left);
        }

        let op_token = self.advance()?;
        let is_logical = matches!(op_token.kind, TokenKind::AmpAmp | TokenKind::PipePipe);
        let is_coalesce = matches!(op_token.kind, TokenKind::QuestionQuestion);
        let right_prec = if is_coalesce {
            TokenKind::AmpAmp.binary_precedence().unwrap_or(prec)
        } else {
            prec
        };

        let right_start = self.start();
        let right = self.parse_maybe_unary(None, false, false)?;
        let right = self.parse_binary_rhs(right, right_start, right_prec)?;
        if let ExprKind::PrivateName { .. } = right.kind {
            return Err(ParseError::syntax(
                "Private identifier can only be left side of binary expression",
                right.span.start_marker(),
            ));
        }

        if (is_logical && self.check(&TokenKind::QuestionQuestion))
            || (is_coalesce && matches!(self.peek(), TokenKind::AmpAmp | TokenKind::PipePipe))
        {
            return Err(ParseError::syntax(
                "Logical expressions and coalesce expressions cannot be mixed. Wrap either by parentheses",
                self.start(),
            ));
        }

        let span = self.span_from(left_start);
        let kind = match logical_op(&op_token.kind) {
            Some(operator) => ExprKind::Logical {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            None => {
                let operator = binary_op(&op_token.kind).ok_or_else(|| {
                    ParseError::syntax("Unexpected binary operator", op_token.span.start_marker())
                })?;
                if let ExprKind::PrivateName { .. } = left.kind {
                    if operator != BinaryOp::In {
                        return Err(ParseError::syntax(
                            "Private identifier can only be left side of binary expression",
                            left.span.start_marker(),
                        ));
                    }
                }
                ExprKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
        };
        let node = Expr::new(kind, span);
        self.parse_binary_rhs(node, left_start, min_prec)
    }

    /// Parse unary expression.
    ///
    /// `**` is handled here: its left operand may not be an unparenthesized
    /// unary or `await` expression. `inc_dec` marks the operand of a prefix
    /// `++`/`--`, which does not take `**` itself.
    pub(crate) fn parse_maybe_unary(
        &mut self,
        cover: Option<&mut CoverErrors>,
        saw_unary: bool,
        inc_dec: bool,
    ) -> ParseResult<Expr> {
        self.nested(|p| p.parse_maybe_unary_inner(cover, saw_unary, inc_dec))
    }

    fn parse_maybe_unary_inner(
        &mut self,
        cover: Option<&mut CoverErrors>,
        mut saw_unary: bool,
        inc_dec: bool,
    ) -> ParseResult<Expr> {
        let start = self.start();

        let expr = if self.is_contextual("await") && self.scopes.can_await() {
            saw_unary = true;
            self.parse_await()?
        } else if let Some(operator) = unary_op(self.peek()) {
            self.advance()?;
            let argument = self.parse_maybe_unary(None, true, false)?;
            if operator == UnaryOp::Delete {
                self.check_delete(&argument)?;
            }
            saw_unary = true;
            Expr::new(
                ExprKind::Unary {
                    operator,
                    prefix: true,
                    argument: Box::new(argument),
                },
                self.span_from(start),
            )
        } else if let Some(operator) = update_op(self.peek()) {
            self.advance()?;
            let argument = self.parse_maybe_unary(None, true, true)?;
            let target = self.simple_target(argument, "prefix operation")?;
            Expr::new(
                ExprKind::Update {
                    operator,
                    prefix: true,
                    argument: Box::new(pattern_to_expr(target)),
                },
                self.span_from(start),
            )
        } else if let TokenKind::PrivateName(name) = self.peek() {
            // `#x in obj`
            let name = name.clone();
            if saw_unary || self.private_names.is_empty() || !self.allow_in {
                return Err(self.unexpected());
            }
            let token = self.advance()?;
            self.use_private_name(&name, token.span)?;
            if !self.check(&TokenKind::In) {
                return Err(self.unexpected());
            }
            Expr::new(ExprKind::PrivateName { name }, token.span)
        } else {
            let mut expr = self.parse_expr_subscripts(cover)?;
            while let Some(operator) = update_op(self.peek()) {
                // [no LineTerminator here] before postfix `++`/`--`.
                if self.current.had_newline_before {
                    break;
                }
                let target = self.simple_target(expr, "postfix operation")?;
                self.advance()?;
                expr = Expr::new(
                    ExprKind::Update {
                        operator,
                        prefix: false,
                        argument: Box::new(pattern_to_expr(target)),
                    },
                    self.span_from(start),
                );
            }
            expr
        };

        if !inc_dec && self.check(&TokenKind::StarStar) {
            if saw_unary {
                return Err(ParseError::syntax(
                    "Unary operator used immediately before exponentiation expression. Parenthesis must be used to disambiguate operator precedence",
                    self.start(),
                ));
            }
            self.advance()?;
            let right = self.parse_maybe_unary(None, false, false)?;
            return Ok(Expr::new(
                ExprKind::Binary {
                    operator: BinaryOp::Pow,
                    left: Box::new(expr),
                    right: Box::new(right),
                },
                self.span_from(start),
            ));
        }
        Ok(expr)
    }

    fn parse_await(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        if self.await_pos.is_none() {
            self.await_pos = Some(start.offset);
        }
        self.advance()?;
        let argument = self.parse_maybe_unary(None, true, false)?;
        Ok(Expr::new(
            ExprKind::Await {
                argument: Box::new(argument),
            },
            self.span_from(start),
        ))
    }

    fn check_delete(&self, argument: &Expr) -> ParseResult<()> {
        if self.strict() && matches!(argument.kind, ExprKind::Ident { .. }) {
            return Err(ParseError::early_at(
                "Deleting local variable in strict mode",
                argument.span,
            ));
        }
        if is_private_member(argument) {
            return Err(ParseError::early_at(
                "Private fields can not be deleted",
                argument.span,
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Member access and calls
    // =========================================================================

    pub(crate) fn parse_expr_subscripts(&mut self, cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        let start = self.start();
        let expr = self.parse_expr_atom(cover)?;
        if is_bare_arrow(&expr) {
            return Ok(expr);
        }
        self.parse_subscripts(expr, start, false)
    }

    /// Member accesses, calls and tagged templates after `base`.
    ///
    /// With `no_calls` (a `new` callee) the loop stops at the first `(`.
    pub(crate) fn parse_subscripts(&mut self, base: Expr, start: Marker, no_calls: bool) -> ParseResult<Expr> {
        let maybe_async_arrow = base.is_ident("async")
            && !base.parenthesized
            && base.span.end == self.prev_end.offset
            && base.span.len() == 5
            && !self.can_insert_semicolon()
            && self.potential_arrow_at == Some(base.span.start);

        let mut expr = base;
        if maybe_async_arrow && !no_calls && self.check(&TokenKind::LParen) {
            expr = self.parse_async_call_or_arrow(expr, start)?;
            if is_bare_arrow(&expr) {
                return Ok(expr);
            }
        }

        let mut chained = false;
        loop {
            let optional = self.check(&TokenKind::QuestionDot);
            if optional {
                if no_calls {
                    return Err(ParseError::syntax(
                        "Optional chaining cannot appear in the callee of new expressions",
                        self.start(),
                    ));
                }
                self.advance()?;
                chained = true;
            }

            if self.eat(&TokenKind::LBracket)? {
                let property = self.with_in(true, |p| p.parse_expr())?;
                self.expect(&TokenKind::RBracket)?;
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                        optional,
                    },
                    self.span_from(start),
                );
            } else if (optional && !matches!(self.peek(), TokenKind::LParen | TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_)))
                || (!optional && self.eat(&TokenKind::Dot)?)
            {
                if matches!(expr.kind, ExprKind::Super) && matches!(self.peek(), TokenKind::PrivateName(_)) {
                    return Err(self.unexpected());
                }
                let property = self.parse_member_property()?;
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                        optional,
                    },
                    self.span_from(start),
                );
            } else if !no_calls && self.check(&TokenKind::LParen) {
                let (arguments, _) = self.parse_call_args(None)?;
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        arguments,
                        optional,
                    },
                    self.span_from(start),
                );
            } else if matches!(self.peek(), TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_)) {
                if chained {
                    return Err(ParseError::syntax(
                        "Optional chaining cannot appear in the tag of tagged template expressions",
                        self.start(),
                    ));
                }
                let quasi = self.parse_template(true)?;
                expr = Expr::new(
                    ExprKind::TaggedTemplate {
                        tag: Box::new(expr),
                        quasi,
                    },
                    self.span_from(start),
                );
            } else {
                break;
            }
        }

        if chained {
            let span = expr.span;
            expr = Expr::new(
                ExprKind::Chain {
                    expression: Box::new(expr),
                },
                span,
            );
        }
        Ok(expr)
    }

    /// Property after `.` or `?.`: an IdentifierName or a private name.
    fn parse_member_property(&mut self) -> ParseResult<Expr> {
        if let TokenKind::PrivateName(name) = self.peek() {
            let name = name.clone();
            let token = self.advance()?;
            self.use_private_name(&name, token.span)?;
            return Ok(Expr::new(ExprKind::PrivateName { name }, token.span));
        }
        Ok(self.parse_ident_name()?.into_expr())
    }

    /// `async(...)`: a call, or the head of an async arrow if `=>` follows.
    fn parse_async_call_or_arrow(&mut self, callee: Expr, start: Marker) -> ParseResult<Expr> {
        let saved = self.take_arrow_positions();
        let mut cover = CoverErrors::default();
        let (arguments, rest_comma) = self.parse_call_args(Some(&mut cover))?;

        if !self.can_insert_semicolon() && self.check(&TokenKind::Arrow) {
            tracing::trace!(offset = start.offset, "async call head resolved as arrow parameters");
            self.check_arrow_positions()?;
            if let Some(at) = self.await_ident_pos {
                return Err(ParseError::early(
                    "Cannot use 'await' as identifier inside an async function",
                    self.lexer.marker(at),
                ));
            }
            self.restore_arrow_positions(saved);
            self.advance()?;
            let params = self.list_to_params(arguments, rest_comma, start)?;
            return self.parse_arrow_function(start, params, true);
        }

        self.check_cover_errors(&cover)?;
        self.merge_arrow_positions(saved);
        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                arguments,
                optional: false,
            },
            self.span_from(start),
        ))
    }

    /// `(args)`. Also returns the offset of a comma after a spread argument.
    pub(crate) fn parse_call_args(&mut self, mut cover: Option<&mut CoverErrors>) -> ParseResult<(Vec<Expr>, Option<u32>)> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        let mut rest_comma = None;
        let saved_in = std::mem::replace(&mut self.allow_in, true);
        while !self.check(&TokenKind::RParen) {
            let arg_start = self.start();
            let is_spread = self.eat(&TokenKind::Spread)?;
            let value = self.parse_maybe_assign(cover.as_deref_mut())?;
            let arg = if is_spread {
                Expr::new(
                    ExprKind::Spread {
                        argument: Box::new(value),
                    },
                    self.span_from(arg_start),
                )
            } else {
                value
            };
            args.push(arg);
            if self.check(&TokenKind::RParen) {
                break;
            }
            let comma = self.expect(&TokenKind::Comma)?;
            if is_spread && rest_comma.is_none() {
                rest_comma = Some(comma.span.start);
            }
        }
        self.allow_in = saved_in;
        self.expect(&TokenKind::RParen)?;
        Ok((args, rest_comma))
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_expr_atom(&mut self, cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        let start = self.start();
        match self.peek() {
            TokenKind::Super => self.parse_super(),
            TokenKind::This => {
                self.advance()?;
                Ok(Expr::new(ExprKind::This, self.span_from(start)))
            }
            TokenKind::Identifier(_) => self.parse_identifier_atom(start),
            TokenKind::Number(_)
            | TokenKind::BigInt(_)
            | TokenKind::String(_)
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => self.parse_literal(),
            TokenKind::Slash | TokenKind::SlashEq => {
                self.current = self.lexer.rescan_as_regex(&self.current)?;
                self.parse_literal()
            }
            TokenKind::Regex { .. } => self.parse_literal(),
            TokenKind::LParen => {
                let can_be_arrow = self.potential_arrow_at == Some(start.offset);
                self.parse_paren_and_distinguish(can_be_arrow)
            }
            TokenKind::LBracket => self.parse_array_literal(cover),
            TokenKind::LBrace => self.parse_object_literal(cover),
            TokenKind::Function => {
                self.advance()?;
                self.parse_function_expression(start, false)
            }
            TokenKind::Class => self.parse_class_expression(start),
            TokenKind::New => self.parse_new(),
            TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_) => {
                let template = self.parse_template(false)?;
                Ok(Expr::new(
                    ExprKind::Template {
                        quasis: template.quasis,
                        expressions: template.expressions,
                    },
                    template.span,
                ))
            }
            TokenKind::Import => self.parse_import_expr(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_super(&mut self) -> ParseResult<Expr> {
        let token = self.advance()?;
        let at = token.span.start_marker();
        match self.peek() {
            TokenKind::LParen => {
                if !self.scopes.allow_direct_super() {
                    return Err(ParseError::early(
                        "super() call outside constructor of a subclass",
                        at,
                    ));
                }
            }
            TokenKind::Dot | TokenKind::LBracket => {
                if !self.scopes.allow_super() {
                    return Err(ParseError::early("'super' keyword outside a method", at));
                }
            }
            _ => return Err(self.unexpected()),
        }
        Ok(Expr::new(ExprKind::Super, token.span))
    }

    /// An identifier, `async function`, or a single-parameter arrow head.
    fn parse_identifier_atom(&mut self, start: Marker) -> ParseResult<Expr> {
        let can_be_arrow = self.potential_arrow_at == Some(start.offset);

        if self.is_contextual("async") {
            let (next, after) = self.lookahead2()?;
            if matches!(next.kind, TokenKind::Function) && !next.had_newline_before {
                if !self.options.allow_async {
                    return Err(self.unsupported("Async function", start));
                }
                self.advance()?;
                self.advance()?;
                return self.parse_function_expression(start, true);
            }
            // `async x => ...`
            if can_be_arrow
                && matches!(next.kind, TokenKind::Identifier(_))
                && !next.had_newline_before
                && matches!(after.kind, TokenKind::Arrow)
                && !after.had_newline_before
            {
                if !self.options.allow_async {
                    return Err(self.unsupported("Async arrow function", start));
                }
                tracing::trace!(offset = start.offset, "async identifier arrow");
                self.advance()?;
                let param = self.parse_ident()?;
                self.expect(&TokenKind::Arrow)?;
                return self.parse_arrow_function(start, vec![Pattern::Ident(param)], true);
            }
        }

        let id = self.parse_ident()?;
        if can_be_arrow && !self.can_insert_semicolon() && self.check(&TokenKind::Arrow) {
            tracing::trace!(offset = start.offset, "identifier arrow");
            self.advance()?;
            return self.parse_arrow_function(start, vec![Pattern::Ident(id)], false);
        }
        Ok(id.into_expr())
    }

    /// A literal token, including a rescanned regex.
    pub(crate) fn parse_literal(&mut self) -> ParseResult<Expr> {
        let token = self.current.clone();
        let raw = self.source[token.span.start as usize..token.span.end as usize].to_string();
        if token.legacy_octal {
            self.check_legacy_octal(matches!(token.kind, TokenKind::String(_)), token.span)?;
        }
        let literal = match token.kind {
            TokenKind::Number(value) => Literal {
                value: LiteralValue::Number(value),
                raw,
                regex: None,
                bigint: None,
            },
            TokenKind::BigInt(digits) => Literal {
                value: LiteralValue::BigInt,
                raw,
                regex: None,
                bigint: Some(digits),
            },
            TokenKind::String(value) => Literal {
                value: LiteralValue::String(value),
                raw,
                regex: None,
                bigint: None,
            },
            TokenKind::Regex { pattern, flags } => Literal {
                value: LiteralValue::RegExp,
                raw,
                regex: Some(RegExpLiteral { pattern, flags }),
                bigint: None,
            },
            TokenKind::Null => Literal {
                value: LiteralValue::Null,
                raw,
                regex: None,
                bigint: None,
            },
            TokenKind::True | TokenKind::False => Literal {
                value: LiteralValue::Boolean(matches!(token.kind, TokenKind::True)),
                raw,
                regex: None,
                bigint: None,
            },
            _ => return Err(self.unexpected()),
        };
        self.advance()?;
        Ok(Expr::new(ExprKind::Literal(literal), token.span))
    }

    /// Legacy octal numbers and escapes: forbidden in strict code or when
    /// switched off.
    pub(crate) fn check_legacy_octal(&self, is_string: bool, span: Span) -> ParseResult<()> {
        let what = if is_string {
            "Octal escape sequences are not allowed in strict mode"
        } else {
            "Octal literal in strict mode"
        };
        if self.strict() {
            return Err(ParseError::early_at(what, span));
        }
        if !self.options.allow_legacy_octal {
            return Err(self.unsupported("Legacy octal syntax", span.start_marker()));
        }
        Ok(())
    }

    fn parse_new(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let new_token = self.advance()?;

        if self.check(&TokenKind::Dot) {
            self.advance()?;
            let escaped = self.current.escaped;
            let property = self.parse_ident_name()?;
            if property.name != "target" {
                return Err(ParseError::syntax(
                    "The only valid meta property for new is 'new.target'",
                    property.span.start_marker(),
                ));
            }
            if escaped {
                return Err(ParseError::syntax(
                    "'new.target' must not contain escaped characters",
                    property.span.start_marker(),
                ));
            }
            if !self.scopes.allow_new_target() {
                return Err(ParseError::early(
                    "'new.target' can only be used in functions and class static block",
                    start,
                ));
            }
            return Ok(Expr::new(
                ExprKind::MetaProperty {
                    meta: Identifier {
                        name: "new".into(),
                        span: new_token.span,
                    },
                    property,
                },
                self.span_from(start),
            ));
        }

        if self.check(&TokenKind::Import) {
            return Err(ParseError::syntax("Cannot use new with import()", self.start()));
        }

        let callee_start = self.start();
        let callee = self.parse_expr_atom(None)?;
        let callee = self.parse_subscripts(callee, callee_start, true)?;
        let arguments = if self.check(&TokenKind::LParen) {
            self.parse_call_args(None)?.0
        } else {
            Vec::new()
        };
        Ok(Expr::new(
            ExprKind::New {
                callee: Box::new(callee),
                arguments,
            },
            self.span_from(start),
        ))
    }

    /// `import(...)` or `import.meta`.
    fn parse_import_expr(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let import_token = self.advance()?;

        if self.eat(&TokenKind::Dot)? {
            let escaped = self.current.escaped;
            let property = self.parse_ident_name()?;
            if property.name != "meta" {
                return Err(ParseError::syntax(
                    "The only valid meta property for import is 'import.meta'",
                    property.span.start_marker(),
                ));
            }
            if escaped {
                return Err(ParseError::syntax(
                    "'import.meta' must not contain escaped characters",
                    property.span.start_marker(),
                ));
            }
            if !self.options.is_module() {
                return Err(ParseError::syntax(
                    "Cannot use 'import.meta' outside a module",
                    start,
                ));
            }
            return Ok(Expr::new(
                ExprKind::MetaProperty {
                    meta: Identifier {
                        name: "import".into(),
                        span: import_token.span,
                    },
                    property,
                },
                self.span_from(start),
            ));
        }

        if !self.check(&TokenKind::LParen) {
            return Err(self.unexpected());
        }
        self.advance()?;
        if self.check(&TokenKind::Spread) {
            return Err(ParseError::syntax("Unexpected token in import()", self.start()));
        }
        let saved_in = std::mem::replace(&mut self.allow_in, true);
        let source = self.parse_maybe_assign(None)?;
        let mut options = None;
        if self.eat(&TokenKind::Comma)? && !self.check(&TokenKind::RParen) {
            options = Some(Box::new(self.parse_maybe_assign(None)?));
            self.eat(&TokenKind::Comma)?;
        }
        self.allow_in = saved_in;
        self.expect(&TokenKind::RParen)?;
        Ok(Expr::new(
            ExprKind::Import {
                source: Box::new(source),
                options,
            },
            self.span_from(start),
        ))
    }

    // =========================================================================
    // Parenthesized expressions and arrow heads
    // =========================================================================

    /// `( ... )`: parsed once as a list, then either turned into arrow
    /// parameters (when `=>` follows) or checked as a parenthesized
    /// expression.
    fn parse_paren_and_distinguish(&mut self, can_be_arrow: bool) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        let saved = self.take_arrow_positions();
        let mut cover = CoverErrors::default();

        let inner_start = self.start();
        let mut exprs = Vec::new();
        let mut rest: Option<Pattern> = None;
        let mut trailing_comma: Option<Marker> = None;
        let saved_in = std::mem::replace(&mut self.allow_in, true);
        let mut first = true;
        while !self.check(&TokenKind::RParen) {
            if !first {
                let comma = self.expect(&TokenKind::Comma)?;
                if self.check(&TokenKind::RParen) {
                    trailing_comma = Some(comma.span.start_marker());
                    break;
                }
            }
            first = false;
            if self.check(&TokenKind::Spread) {
                let rest_start = self.start();
                self.advance()?;
                let argument = self.parse_binding_target()?;
                if self.check(&TokenKind::Comma) {
                    return Err(ParseError::syntax(
                        "Comma is not permitted after the rest element",
                        self.start(),
                    ));
                }
                rest = Some(Pattern::Rest(crate::ast::RestElement {
                    argument: Box::new(argument),
                    span: self.span_from(rest_start),
                }));
                break;
            }
            exprs.push(self.parse_maybe_assign(Some(&mut cover))?);
        }
        let inner_end = self.prev_end;
        self.allow_in = saved_in;
        self.expect(&TokenKind::RParen)?;

        if can_be_arrow && !self.can_insert_semicolon() && self.check(&TokenKind::Arrow) {
            tracing::trace!(offset = start.offset, params = exprs.len(), "parenthesized list resolved as arrow parameters");
            self.check_arrow_positions()?;
            self.restore_arrow_positions(saved);
            self.advance()?;
            let mut params = self.list_to_params(exprs, None, start)?;
            if let Some(rest) = rest {
                params.push(rest);
            }
            return self.parse_arrow_function(start, params, false);
        }

        if exprs.is_empty() {
            return Err(ParseError::syntax("Unexpected token ')'", self.prev_end_token_start()));
        }
        if let Some(at) = trailing_comma {
            return Err(ParseError::syntax("Unexpected trailing comma", at));
        }
        if let Some(rest) = rest {
            return Err(ParseError::syntax("Unexpected token '...'", rest.span().start_marker()));
        }
        self.check_cover_errors(&cover)?;
        self.merge_arrow_positions(saved);

        let mut expr = if exprs.len() > 1 {
            Expr::new(
                ExprKind::Sequence { expressions: exprs },
                Span::between(inner_start, inner_end),
            )
        } else {
            exprs.remove(0)
        };
        expr.parenthesized = true;
        Ok(expr)
    }

    fn prev_end_token_start(&self) -> Marker {
        let offset = self.prev_end.offset.saturating_sub(1);
        self.lexer.marker(offset)
    }

    /// Turn a parsed argument or parenthesized list into arrow parameters.
    pub(crate) fn list_to_params(&self, exprs: Vec<Expr>, rest_comma: Option<u32>, start: Marker) -> ParseResult<Vec<Pattern>> {
        let span = self.span_from(start);
        let list = Expr::new(
            ExprKind::Array {
                elements: exprs.into_iter().map(Some).collect(),
                trailing_comma: rest_comma,
            },
            span,
        );
        match reinterpret_as_pattern(list, PatternPosition::Binding)? {
            Pattern::Array(array) => Ok(array.elements.into_iter().flatten().collect()),
            other => Err(ParseError::early_at("Invalid arrow parameters", other.span())),
        }
    }

    /// Reset the `yield`/`await` trackers for a new arrow head, returning
    /// the outer values.
    pub(crate) fn take_arrow_positions(&mut self) -> (Option<u32>, Option<u32>, Option<u32>) {
        (
            self.yield_pos.take(),
            self.await_pos.take(),
            self.await_ident_pos.take(),
        )
    }

    pub(crate) fn restore_arrow_positions(&mut self, saved: (Option<u32>, Option<u32>, Option<u32>)) {
        self.yield_pos = saved.0;
        self.await_pos = saved.1;
        self.await_ident_pos = saved.2;
    }

    fn merge_arrow_positions(&mut self, saved: (Option<u32>, Option<u32>, Option<u32>)) {
        self.yield_pos = saved.0.or(self.yield_pos);
        self.await_pos = saved.1.or(self.await_pos);
        self.await_ident_pos = saved.2.or(self.await_ident_pos);
    }

    /// `yield` and `await` expressions may not appear in parameter defaults.
    pub(crate) fn check_arrow_positions(&self) -> ParseResult<()> {
        if let Some(at) = self.yield_pos {
            return Err(ParseError::early(
                "Yield expression cannot be a default value",
                self.lexer.marker(at),
            ));
        }
        if let Some(at) = self.await_pos {
            return Err(ParseError::early(
                "Await expression cannot be a default value",
                self.lexer.marker(at),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Array and object literals
    // =========================================================================

    fn parse_array_literal(&mut self, mut cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        let saved_in = std::mem::replace(&mut self.allow_in, true);
        let mut elements = Vec::new();
        let mut trailing_comma = None;
        while !self.check(&TokenKind::RBracket) {
            if self.check(&TokenKind::Comma) {
                self.advance()?;
                elements.push(None);
                continue;
            }
            let elem_start = self.start();
            let is_spread = self.eat(&TokenKind::Spread)?;
            let value = self.parse_maybe_assign(cover.as_deref_mut())?;
            let elem = if is_spread {
                Expr::new(
                    ExprKind::Spread {
                        argument: Box::new(value),
                    },
                    self.span_from(elem_start),
                )
            } else {
                value
            };
            elements.push(Some(elem));
            if !self.check(&TokenKind::RBracket) {
                let comma = self.expect(&TokenKind::Comma)?;
                if is_spread {
                    trailing_comma = Some(comma.span.start);
                }
            }
        }
        self.allow_in = saved_in;
        self.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(
            ExprKind::Array {
                elements,
                trailing_comma,
            },
            self.span_from(start),
        ))
    }

    fn parse_object_literal(&mut self, mut cover: Option<&mut CoverErrors>) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        let saved_in = std::mem::replace(&mut self.allow_in, true);
        let mut properties = Vec::new();
        let mut trailing_comma = None;
        let mut has_proto = false;
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Spread) {
                let spread_start = self.start();
                self.advance()?;
                let argument = self.parse_maybe_assign(cover.as_deref_mut())?;
                properties.push(ObjectMember::Spread(SpreadElement {
                    argument: Box::new(argument),
                    span: self.span_from(spread_start),
                }));
                if !self.check(&TokenKind::RBrace) {
                    let comma = self.expect(&TokenKind::Comma)?;
                    trailing_comma = Some(comma.span.start);
                }
                continue;
            }

            let prop = self.parse_object_property(cover.as_deref_mut())?;
            if is_proto_property(&prop) {
                if has_proto {
                    if let Some(cover) = cover.as_deref_mut() {
                        cover.double_proto.get_or_insert(prop.key.span.start);
                    } else {
                        return Err(ParseError::early_at(
                            "Redefinition of __proto__ property",
                            prop.key.span,
                        ));
                    }
                }
                has_proto = true;
            }
            properties.push(ObjectMember::Property(prop));
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.allow_in = saved_in;
        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(
            ExprKind::Object {
                properties,
                trailing_comma,
            },
            self.span_from(start),
        ))
    }

    /// `*`, `async`, `get` and `set` before an object literal key.
    fn parse_member_prefix(&mut self) -> ParseResult<MemberPrefix> {
        let mut prefix = MemberPrefix {
            is_async: false,
            is_generator: false,
            kind: PropertyKind::Init,
        };
        let next = self.lookahead()?;
        let starts_key = |kind: &TokenKind| {
            matches!(
                kind,
                TokenKind::Identifier(_)
                    | TokenKind::String(_)
                    | TokenKind::Number(_)
                    | TokenKind::BigInt(_)
                    | TokenKind::LBracket
                    | TokenKind::PrivateName(_)
            ) || kind.is_keyword()
        };
        if self.is_contextual("async") && !next.had_newline_before && (starts_key(&next.kind) || matches!(next.kind, TokenKind::Star)) {
            if !self.options.allow_async {
                return Err(self.unsupported("Async method", self.start()));
            }
            self.advance()?;
            prefix.is_async = true;
        } else if (self.is_contextual("get") || self.is_contextual("set")) && starts_key(&next.kind) {
            prefix.kind = if self.is_contextual("get") {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            self.advance()?;
            return Ok(prefix);
        }
        if self.check(&TokenKind::Star) {
            if !self.options.allow_generators {
                return Err(self.unsupported("Generator method", self.start()));
            }
            self.advance()?;
            prefix.is_generator = true;
        }
        Ok(prefix)
    }

    fn parse_object_property(&mut self, cover: Option<&mut CoverErrors>) -> ParseResult<Property> {
        let start = self.start();
        let prefix = self.parse_member_prefix()?;
        let key_is_plain_ident = matches!(self.peek(), TokenKind::Identifier(_));
        let (key, computed) = self.parse_property_name(false)?;

        // `key: value`
        if prefix.kind == PropertyKind::Init && !prefix.is_async && !prefix.is_generator && self.eat(&TokenKind::Colon)? {
            let value = self.parse_maybe_assign(cover)?;
            return Ok(Property {
                key,
                value,
                kind: PropertyKind::Init,
                method: false,
                shorthand: false,
                computed,
                span: self.span_from(start),
            });
        }

        // Methods and accessors.
        if self.check(&TokenKind::LParen) {
            let value = self.parse_method(prefix.is_generator, prefix.is_async, false)?;
            if prefix.kind != PropertyKind::Init {
                self.check_accessor_params(prefix.kind == PropertyKind::Get, &value)?;
            }
            return Ok(Property {
                key,
                value,
                kind: prefix.kind,
                method: prefix.kind == PropertyKind::Init,
                shorthand: false,
                computed,
                span: self.span_from(start),
            });
        }

        if prefix.kind != PropertyKind::Init || prefix.is_async || prefix.is_generator || computed || !key_is_plain_ident {
            return Err(self.unexpected());
        }

        // Shorthand `{ x }` or cover initializer `{ x = 1 }`.
        let ExprKind::Ident { name } = &key.kind else {
            return Err(self.unexpected());
        };
        let name = name.clone();
        if crate::early::is_reserved_word(&name) {
            return Err(ParseError::syntax(
                format!("Escape sequence in keyword {name}"),
                key.span.start_marker(),
            ));
        }
        self.check_unreserved(&name, key.span)?;
        if name == "await" && self.await_ident_pos.is_none() {
            self.await_ident_pos = Some(key.span.start);
        }

        let value = if self.check(&TokenKind::Eq) {
            let Some(cover) = cover else {
                return Err(self.unexpected());
            };
            cover.shorthand_assign.get_or_insert(self.current.span.start);
            self.advance()?;
            let default = self.parse_maybe_assign(None)?;
            let target = Identifier {
                name: name.clone(),
                span: key.span,
            };
            Expr::new(
                ExprKind::Assign {
                    operator: AssignOp::Assign,
                    left: Box::new(Pattern::Ident(target)),
                    right: Box::new(default),
                },
                self.span_from(start),
            )
        } else {
            key.clone()
        };
        Ok(Property {
            key,
            value,
            kind: PropertyKind::Init,
            method: false,
            shorthand: true,
            computed: false,
            span: self.span_from(start),
        })
    }

    /// A property key: identifier name, string, number, computed or (in
    /// classes) private name. Returns the key and whether it is computed.
    pub(crate) fn parse_property_name(&mut self, allow_private: bool) -> ParseResult<(Expr, bool)> {
        match self.peek() {
            TokenKind::LBracket => {
                self.advance()?;
                let key = self.with_in(true, |p| p.parse_maybe_assign(None))?;
                self.expect(&TokenKind::RBracket)?;
                Ok((key, true))
            }
            TokenKind::String(_) | TokenKind::Number(_) | TokenKind::BigInt(_) => Ok((self.parse_literal()?, false)),
            TokenKind::PrivateName(name) if allow_private => {
                let name = name.clone();
                let token = self.advance()?;
                Ok((Expr::new(ExprKind::PrivateName { name }, token.span), false))
            }
            _ => Ok((self.parse_ident_name()?.into_expr(), false)),
        }
    }

    // =========================================================================
    // Template literals
    // =========================================================================

    /// Parse a template starting at the current template token.
    ///
    /// Invalid escapes are errors unless `tagged`, where `cooked` becomes null.
    pub(crate) fn parse_template(&mut self, tagged: bool) -> ParseResult<TemplateLiteral> {
        let start = self.start();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let token = self.current.clone();
            let (chunk, tail, close_len): (&TemplateChunk, bool, u32) = match &token.kind {
                TokenKind::TemplateNoSub(chunk) | TokenKind::TemplateTail(chunk) => (chunk, true, 1),
                TokenKind::TemplateHead(chunk) | TokenKind::TemplateMiddle(chunk) => (chunk, false, 2),
                _ => return Err(self.unexpected()),
            };
            if let (false, Some((offset, message))) = (tagged, chunk.invalid_escape) {
                return Err(ParseError::new(
                    ErrorKind::Lexical,
                    message,
                    self.lexer.marker(offset),
                ));
            }
            let span = Span::between(
                self.lexer.marker(token.span.start + 1),
                self.lexer.marker(token.span.end.saturating_sub(close_len).max(token.span.start + 1)),
            );
            quasis.push(TemplateElement {
                value: TemplateValue {
                    raw: chunk.raw.clone(),
                    cooked: chunk.cooked.clone(),
                },
                tail,
                span,
            });
            self.advance()?;
            if tail {
                break;
            }
            expressions.push(self.with_in(true, |p| p.parse_expr())?);
            if !self.check(&TokenKind::RBrace) {
                return Err(self.unexpected());
            }
            self.current = self.lexer.scan_template_continuation(&self.current)?;
        }
        Ok(TemplateLiteral {
            quasis,
            expressions,
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Private names
    // =========================================================================

    /// Record a reference to `#name`, checked when the class body closes.
    pub(crate) fn use_private_name(&mut self, name: &str, span: Span) -> ParseResult<()> {
        match self.private_names.last_mut() {
            Some(scope) => {
                scope.used.push((name.to_string(), span.start));
                Ok(())
            }
            None => Err(ParseError::early_at(
                format!("Private field '#{name}' must be declared in an enclosing class"),
                span,
            )),
        }
    }
}

/// An arrow function that was not parenthesized: nothing may follow it.
fn is_bare_arrow(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Arrow(_)) && !expr.parenthesized
}

fn is_private_member(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Member { property, .. } => matches!(property.kind, ExprKind::PrivateName { .. }),
        ExprKind::Chain { expression } => is_private_member(expression),
        _ => false,
    }
}

fn is_proto_property(prop: &Property) -> bool {
    if prop.computed || prop.shorthand || prop.method || prop.kind != PropertyKind::Init {
        return false;
    }
    match &prop.key.kind {
        ExprKind::Ident { name } => name == "__proto__",
        _ => prop.key.as_string_literal() == Some("__proto__"),
    }
}

/// The expression form of a simple assignment target.
fn pattern_to_expr(pattern: Pattern) -> Expr {
    match pattern {
        Pattern::Ident(id) => id.into_expr(),
        Pattern::Member(expr) => *expr,
        other => Expr::new(ExprKind::This, other.span()),
    }
}

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::AddAssign,
        TokenKind::MinusEq => AssignOp::SubAssign,
        TokenKind::StarEq => AssignOp::MulAssign,
        TokenKind::SlashEq => AssignOp::DivAssign,
        TokenKind::PercentEq => AssignOp::ModAssign,
        TokenKind::StarStarEq => AssignOp::PowAssign,
        TokenKind::LtLtEq => AssignOp::ShlAssign,
        TokenKind::GtGtEq => AssignOp::ShrAssign,
        TokenKind::GtGtGtEq => AssignOp::UShrAssign,
        TokenKind::PipeEq => AssignOp::BitOrAssign,
        TokenKind::CaretEq => AssignOp::BitXorAssign,
        TokenKind::AmpEq => AssignOp::BitAndAssign,
        TokenKind::AmpAmpEq => AssignOp::AndAssign,
        TokenKind::PipePipeEq => AssignOp::OrAssign,
        TokenKind::QuestionQuestionEq => AssignOp::NullishAssign,
        _ => return None,
    };
    Some(op)
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::StarStar => BinaryOp::Pow,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::BangEq => BinaryOp::NotEq,
        TokenKind::EqEqEq => BinaryOp::StrictEq,
        TokenKind::BangEqEq => BinaryOp::StrictNotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::LtLt => BinaryOp::Shl,
        TokenKind::GtGt => BinaryOp::Shr,
        TokenKind::GtGtGt => BinaryOp::UShr,
        TokenKind::In => BinaryOp::In,
        TokenKind::Instanceof => BinaryOp::Instanceof,
        _ => return None,
    };
    Some(op)
}

fn logical_op(kind: &TokenKind) -> Option<LogicalOp> {
    match kind {
        TokenKind::AmpAmp => Some(LogicalOp::And),
        TokenKind::PipePipe => Some(LogicalOp::Or),
        TokenKind::QuestionQuestion => Some(LogicalOp::NullishCoalesce),
        _ => None,
    }
}

fn unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Minus),
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Bang => Some(UnaryOp::Not),
        TokenKind::Tilde => Some(UnaryOp::BitNot),
        TokenKind::Typeof => Some(UnaryOp::Typeof),
        TokenKind::Void => Some(UnaryOp::Void),
        TokenKind::Delete => Some(UnaryOp::Delete),
        _ => None,
    }
}

fn update_op(kind: &TokenKind) -> Option<UpdateOp> {
    match kind {
        TokenKind::PlusPlus => Some(UpdateOp::Increment),
        TokenKind::MinusMinus => Some(UpdateOp::Decrement),
        _ => None,
    }
}
