//! Binding patterns, functions, arrow functions and classes.

use super::{Parser, StmtContext};
use crate::ast::{
    ArrayPattern, ArrowBody, ArrowFunction, AssignmentPattern, AssignmentProperty, BlockStatement,
    Class, ClassBody, ClassElement, Expr, ExprKind, Function, Identifier, MethodDefinition,
    MethodKind, ObjectPattern, ObjectPatternMember, Pattern, PropertyDefinition, PropertyKind,
    RestElement, StaticBlock, Stmt, StmtKind,
};
use crate::early::{duplicate_parameter, is_restricted_binding, is_simple_parameter_list, is_strict_reserved_word};
use crate::error::{ParseError, ParseResult};
use crate::scope::{BindingKind, PrivateNameScope, PrivateSlot, ScopeFlags};
use crate::span::Marker;
use crate::token::TokenKind;

/// Which kind of function a parameter list and body belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionShape {
    Plain,
    Arrow,
    Method,
}

/// Modifiers seen before a class element key.
struct ElementHead {
    is_static: bool,
    is_async: bool,
    is_generator: bool,
    kind: PropertyKind,
    /// A modifier word that turned out to be the key itself (`static() {}`).
    word_key: Option<Identifier>,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// Parse a binding identifier, array pattern or object pattern.
    ///
    /// Names are not declared here; the caller decides the binding kind.
    pub(crate) fn parse_binding_target(&mut self) -> ParseResult<Pattern> {
        match self.peek() {
            TokenKind::LBracket => self.nested(|p| p.parse_array_binding()),
            TokenKind::LBrace => self.nested(|p| p.parse_object_binding()),
            _ => Ok(Pattern::Ident(self.parse_ident()?)),
        }
    }

    /// A binding target with an optional `= default`.
    pub(crate) fn parse_binding_element(&mut self) -> ParseResult<Pattern> {
        let start = self.start();
        let target = self.parse_binding_target()?;
        if !self.eat(&TokenKind::Eq)? {
            return Ok(target);
        }
        let default = self.parse_maybe_assign(None)?;
        Ok(Pattern::Assign(AssignmentPattern {
            left: Box::new(target),
            right: Box::new(default),
            span: self.span_from(start),
        }))
    }

    /// `...target`, which must be followed by `close`.
    fn parse_binding_rest(&mut self, close: &TokenKind) -> ParseResult<Pattern> {
        let start = self.start();
        self.expect(&TokenKind::Spread)?;
        let argument = self.parse_binding_target()?;
        let rest = Pattern::Rest(RestElement {
            argument: Box::new(argument),
            span: self.span_from(start),
        });
        if self.check(&TokenKind::Comma) {
            return Err(ParseError::syntax(
                "Comma is not permitted after the rest element",
                self.start(),
            ));
        }
        if !self.check(close) {
            return Err(self.unexpected());
        }
        Ok(rest)
    }

    fn parse_array_binding(&mut self) -> ParseResult<Pattern> {
        let start = self.start();
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            if self.eat(&TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            if self.check(&TokenKind::Spread) {
                elements.push(Some(self.parse_binding_rest(&TokenKind::RBracket)?));
                break;
            }
            elements.push(Some(self.parse_binding_element()?));
            if !self.check(&TokenKind::RBracket) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Pattern::Array(ArrayPattern {
            elements,
            span: self.span_from(start),
        }))
    }

    fn parse_object_binding(&mut self) -> ParseResult<Pattern> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Spread) {
                let rest = match self.parse_binding_rest(&TokenKind::RBrace)? {
                    Pattern::Rest(rest) => rest,
                    other => return Err(ParseError::syntax("Unexpected rest target", other.span().start_marker())),
                };
                if !matches!(*rest.argument, Pattern::Ident(_)) {
                    return Err(ParseError::syntax(
                        "`...` must be followed by an identifier in declaration contexts",
                        rest.argument.span().start_marker(),
                    ));
                }
                properties.push(ObjectPatternMember::Rest(rest));
                break;
            }

            let prop_start = self.start();
            let plain_ident = matches!(self.peek(), TokenKind::Identifier(_));
            let escaped = self.current.escaped;
            let (key, computed) = self.parse_property_name(false)?;

            let (value, shorthand) = if self.eat(&TokenKind::Colon)? {
                (self.parse_binding_element()?, false)
            } else {
                // `{ x }` and `{ x = 1 }`
                let ExprKind::Ident { name } = &key.kind else {
                    return Err(self.unexpected());
                };
                if !plain_ident || computed {
                    return Err(self.unexpected());
                }
                let id = Identifier {
                    name: name.clone(),
                    span: key.span,
                };
                if escaped && crate::early::is_reserved_word(&id.name) {
                    return Err(ParseError::syntax(
                        format!("Escape sequence in keyword {}", id.name),
                        id.span.start_marker(),
                    ));
                }
                self.check_unreserved(&id.name, id.span)?;
                let target = Pattern::Ident(id);
                let value = if self.eat(&TokenKind::Eq)? {
                    let default = self.parse_maybe_assign(None)?;
                    Pattern::Assign(AssignmentPattern {
                        left: Box::new(target),
                        right: Box::new(default),
                        span: self.span_from(prop_start),
                    })
                } else {
                    target
                };
                (value, true)
            };

            properties.push(ObjectPatternMember::Property(AssignmentProperty {
                key,
                value,
                kind: PropertyKind::Init,
                method: false,
                shorthand,
                computed,
                span: self.span_from(prop_start),
            }));
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Pattern::Object(ObjectPattern {
            properties,
            span: self.span_from(start),
        }))
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Parse a function declaration. The current token is `function`; for
    /// async functions `async` has been consumed and `start` points at it.
    pub(crate) fn parse_function_declaration(
        &mut self,
        start: Marker,
        is_async: bool,
        ctx: StmtContext,
        id_required: bool,
    ) -> ParseResult<Stmt> {
        match ctx {
            StmtContext::TopLevel | StmtContext::List => {}
            StmtContext::If | StmtContext::Labeled if !self.strict() => {}
            StmtContext::If | StmtContext::Labeled => {
                return Err(ParseError::syntax(
                    "In strict mode code, functions can only be declared at top level or inside a block",
                    start,
                ));
            }
            StmtContext::Nested => {
                return Err(ParseError::syntax(
                    "In non-strict mode code, functions can only be declared at top level, inside a block, or as the body of an if statement",
                    start,
                ));
            }
        }
        if is_async && !self.options.allow_async {
            return Err(self.unsupported("Async function", start));
        }
        self.expect(&TokenKind::Function)?;

        let generator = self.check(&TokenKind::Star);
        if generator {
            if !ctx.is_list() {
                return Err(self.unexpected());
            }
            if !self.options.allow_generators {
                return Err(self.unsupported("Generator function", self.start()));
            }
            self.advance()?;
        }

        let id = if id_required || matches!(self.peek(), TokenKind::Identifier(_)) {
            let id = self.parse_ident()?;
            let kind = if self.strict() || generator || is_async {
                if self.scopes.functions_act_as_var() {
                    BindingKind::Var
                } else {
                    BindingKind::Lexical
                }
            } else {
                BindingKind::Function
            };
            self.declare_name(&id, kind)?;
            Some(id)
        } else {
            None
        };
        tracing::trace!(
            offset = start.offset,
            name = id.as_ref().map(|id| id.name.as_str()),
            generator,
            is_async,
            "function declaration"
        );

        self.scopes.enter(function_flags(is_async, generator));
        let result = self.parse_function_rest(id.as_ref(), FunctionShape::Plain);
        self.scopes.exit();
        let (params, body) = result?;

        Ok(Stmt::new(
            StmtKind::Function(Box::new(Function {
                id,
                params,
                body,
                generator,
                is_async,
                expression: false,
            })),
            self.span_from(start),
        ))
    }

    /// Parse a function expression after the `function` keyword.
    pub(crate) fn parse_function_expression(&mut self, start: Marker, is_async: bool) -> ParseResult<Expr> {
        let generator = self.check(&TokenKind::Star);
        if generator {
            if !self.options.allow_generators {
                return Err(self.unsupported("Generator function", self.start()));
            }
            self.advance()?;
        }

        // The name of a function expression is scoped to its own body.
        self.scopes.enter(function_flags(is_async, generator));
        let result = self.parse_named_function_rest();
        self.scopes.exit();
        let (id, params, body) = result?;

        Ok(Expr::new(
            ExprKind::Function(Box::new(Function {
                id,
                params,
                body,
                generator,
                is_async,
                expression: false,
            })),
            self.span_from(start),
        ))
    }

    fn parse_named_function_rest(&mut self) -> ParseResult<(Option<Identifier>, Vec<Pattern>, BlockStatement)> {
        let id = if matches!(self.peek(), TokenKind::Identifier(_)) {
            Some(self.parse_ident()?)
        } else {
            None
        };
        let (params, body) = self.parse_function_rest(id.as_ref(), FunctionShape::Plain)?;
        Ok((id, params, body))
    }

    /// Parse a method value (params and body) as a function expression.
    ///
    /// The function starts at the opening parenthesis.
    pub(crate) fn parse_method(&mut self, generator: bool, is_async: bool, allow_direct_super: bool) -> ParseResult<Expr> {
        let start = self.start();
        let mut flags = function_flags(is_async, generator) | ScopeFlags::SUPER;
        if allow_direct_super {
            flags |= ScopeFlags::DIRECT_SUPER;
        }
        self.scopes.enter(flags);
        let result = self.parse_function_rest(None, FunctionShape::Method);
        self.scopes.exit();
        let (params, body) = result?;

        Ok(Expr::new(
            ExprKind::Function(Box::new(Function {
                id: None,
                params,
                body,
                generator,
                is_async,
                expression: false,
            })),
            self.span_from(start),
        ))
    }

    /// Getters take no parameters; setters exactly one, not a rest element.
    pub(crate) fn check_accessor_params(&self, is_getter: bool, value: &Expr) -> ParseResult<()> {
        let ExprKind::Function(func) = &value.kind else {
            return Ok(());
        };
        let at = value.span.start_marker();
        if is_getter {
            if !func.params.is_empty() {
                return Err(ParseError::early("getter should have no params", at));
            }
        } else {
            if func.params.len() != 1 {
                return Err(ParseError::early("setter should have exactly one param", at));
            }
            if matches!(func.params[0], Pattern::Rest(_)) {
                return Err(ParseError::early("Setter cannot use rest params", at));
            }
        }
        Ok(())
    }

    /// Parameters and block body of a function whose scope has been entered.
    fn parse_function_rest(
        &mut self,
        id: Option<&Identifier>,
        shape: FunctionShape,
    ) -> ParseResult<(Vec<Pattern>, BlockStatement)> {
        let saved = self.take_arrow_positions();
        let params = self.parse_params()?;
        self.check_arrow_positions()?;
        let body = self.parse_function_body(&params, id, shape)?;
        self.restore_arrow_positions(saved);
        Ok((params, body))
    }

    /// `( params )` of a function or method.
    fn parse_params(&mut self) -> ParseResult<Vec<Pattern>> {
        self.expect(&TokenKind::LParen)?;
        let saved_in = std::mem::replace(&mut self.allow_in, true);
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            if self.check(&TokenKind::Spread) {
                params.push(self.parse_binding_rest(&TokenKind::RParen)?);
                break;
            }
            params.push(self.parse_binding_element()?);
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.allow_in = saved_in;
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// `{ body }` of a function: a `"use strict"` directive applies to the
    /// parameters and name as well, so they are checked after the prologue
    /// has been looked at.
    fn parse_function_body(
        &mut self,
        params: &[Pattern],
        id: Option<&Identifier>,
        shape: FunctionShape,
    ) -> ParseResult<BlockStatement> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;

        if self.has_use_strict_directive()? {
            if !is_simple_parameter_list(params) {
                return Err(ParseError::early(
                    "Illegal 'use strict' directive in function with non-simple parameter list",
                    self.start(),
                ));
            }
            self.scopes.set_strict();
        }

        self.declare_params(params, shape)?;
        if let Some(id) = id {
            if self.strict() {
                self.check_strict_binding(id)?;
            }
        }

        let saved_in = std::mem::replace(&mut self.allow_in, true);
        let body = self.parse_directive_list();
        self.allow_in = saved_in;
        let body = body?;
        self.expect(&TokenKind::RBrace)?;
        Ok(BlockStatement {
            body,
            span: self.span_from(start),
        })
    }

    /// Check and declare parameters in the current function scope.
    fn declare_params(&mut self, params: &[Pattern], shape: FunctionShape) -> ParseResult<()> {
        let allow_duplicates = !self.strict() && shape == FunctionShape::Plain && is_simple_parameter_list(params);
        if !allow_duplicates {
            if let Some((_, offset)) = duplicate_parameter(params) {
                return Err(ParseError::early(
                    "Argument name clash",
                    self.lexer.marker(offset),
                ));
            }
        }
        for param in params {
            let mut result = Ok(());
            param.for_each_binding(&mut |id| {
                if result.is_ok() {
                    result = self.check_strict_binding(id);
                }
            });
            result?;
            self.declare_pattern(param, BindingKind::Var)?;
        }
        Ok(())
    }

    /// `eval`, `arguments` and strict-reserved words cannot be bound in
    /// strict code.
    fn check_strict_binding(&self, id: &Identifier) -> ParseResult<()> {
        if !self.strict() {
            return Ok(());
        }
        if is_restricted_binding(&id.name) {
            return Err(ParseError::early_at(
                format!("Binding {} in strict mode", id.name),
                id.span,
            ));
        }
        if is_strict_reserved_word(&id.name) {
            return Err(ParseError::early_at(
                format!("The keyword '{}' is reserved", id.name),
                id.span,
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// Parse an arrow body once the parameters and `=>` have been consumed.
    pub(crate) fn parse_arrow_function(&mut self, start: Marker, params: Vec<Pattern>, is_async: bool) -> ParseResult<Expr> {
        if is_async && !self.options.allow_async {
            return Err(self.unsupported("Async arrow function", start));
        }
        if is_async {
            let mut await_param = None;
            for param in &params {
                param.for_each_binding(&mut |id| {
                    if await_param.is_none() && id.name == "await" {
                        await_param = Some(id.span);
                    }
                });
            }
            if let Some(span) = await_param {
                return Err(ParseError::early_at(
                    "Cannot use 'await' as identifier inside an async function",
                    span,
                ));
            }
        }

        let saved = self.take_arrow_positions();
        let mut flags = ScopeFlags::FUNCTION | ScopeFlags::ARROW;
        if is_async {
            flags |= ScopeFlags::ASYNC;
        }
        self.scopes.enter(flags);
        let result = if self.check(&TokenKind::LBrace) {
            self.parse_function_body(&params, None, FunctionShape::Arrow)
                .map(ArrowBody::Block)
        } else {
            match self.declare_params(&params, FunctionShape::Arrow) {
                Ok(()) => self
                    .parse_maybe_assign(None)
                    .map(|expr| ArrowBody::Expr(Box::new(expr))),
                Err(err) => Err(err),
            }
        };
        self.scopes.exit();
        self.restore_arrow_positions(saved);
        let body = result?;

        let expression = matches!(body, ArrowBody::Expr(_));
        Ok(Expr::new(
            ExprKind::Arrow(Box::new(ArrowFunction {
                id: None,
                params,
                body,
                generator: false,
                is_async,
                expression,
            })),
            self.span_from(start),
        ))
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Parse a class declaration at the `class` keyword.
    pub(crate) fn parse_class_declaration(&mut self, start: Marker, id_required: bool) -> ParseResult<Stmt> {
        let class = self.parse_class(true, id_required)?;
        Ok(Stmt::new(
            StmtKind::Class(Box::new(class)),
            self.span_from(start),
        ))
    }

    /// Parse a class expression at the `class` keyword.
    pub(crate) fn parse_class_expression(&mut self, start: Marker) -> ParseResult<Expr> {
        let class = self.parse_class(false, false)?;
        Ok(Expr::new(
            ExprKind::Class(Box::new(class)),
            self.span_from(start),
        ))
    }

    /// Class code is strict from the name onwards.
    fn parse_class(&mut self, is_statement: bool, id_required: bool) -> ParseResult<Class> {
        self.expect(&TokenKind::Class)?;
        self.scopes.enter(ScopeFlags::CLASS);
        let result = self.parse_class_inner(is_statement, id_required);
        self.scopes.exit();
        result
    }

    fn parse_class_inner(&mut self, is_statement: bool, id_required: bool) -> ParseResult<Class> {
        let id = if matches!(self.peek(), TokenKind::Identifier(_)) {
            let id = self.parse_ident()?;
            self.check_binding_name(&id)?;
            if is_statement && !self.scopes.declare_outside_class(&id.name, BindingKind::Lexical) {
                return Err(super::validate::redeclared(&id));
            }
            Some(id)
        } else if id_required {
            return Err(self.unexpected());
        } else {
            None
        };

        let super_class = if self.eat(&TokenKind::Extends)? {
            Some(Box::new(self.parse_expr_subscripts(None)?))
        } else {
            None
        };

        let body = self.parse_class_body(super_class.is_some())?;
        Ok(Class {
            id,
            super_class,
            body,
        })
    }

    fn parse_class_body(&mut self, has_super: bool) -> ParseResult<ClassBody> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        self.private_names.push(PrivateNameScope::default());
        let result = self.parse_class_elements(has_super);
        let private_names = self.private_names.pop().unwrap_or_default();
        let body = result?;
        self.resolve_private_names(private_names)?;
        self.expect(&TokenKind::RBrace)?;
        Ok(ClassBody {
            body,
            span: self.span_from(start),
        })
    }

    fn parse_class_elements(&mut self, has_super: bool) -> ParseResult<Vec<ClassElement>> {
        let mut body = Vec::new();
        let mut has_constructor = false;
        while !self.check(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Semicolon)? {
                continue;
            }
            let element = self.nested(|p| p.parse_class_element(has_super))?;
            if let ClassElement::Method(MethodDefinition {
                kind: MethodKind::Constructor,
                span,
                ..
            }) = &element
            {
                if has_constructor {
                    return Err(ParseError::early_at(
                        "Duplicate constructor in the same class",
                        *span,
                    ));
                }
                has_constructor = true;
            }
            body.push(element);
        }
        Ok(body)
    }

    /// Check the private names used in a finished class body: undeclared ones
    /// must be declared by an enclosing class.
    fn resolve_private_names(&mut self, scope: PrivateNameScope) -> ParseResult<()> {
        for (name, offset) in scope.used.iter() {
            if scope.is_declared(name) {
                continue;
            }
            match self.private_names.last_mut() {
                Some(outer) => outer.used.push((name.clone(), *offset)),
                None => {
                    return Err(ParseError::early(
                        format!("Private field '#{name}' must be declared in an enclosing class"),
                        self.lexer.marker(*offset),
                    ));
                }
            }
        }
        Ok(())
    }

    fn is_class_element_name_start(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Identifier(_)
                | TokenKind::PrivateName(_)
                | TokenKind::Number(_)
                | TokenKind::BigInt(_)
                | TokenKind::String(_)
                | TokenKind::LBracket
        ) || self.peek().is_keyword()
    }

    /// `static`, `async`, `*`, `get` and `set` before an element key.
    fn parse_element_head(&mut self) -> ParseResult<ElementHead> {
        let mut head = ElementHead {
            is_static: false,
            is_async: false,
            is_generator: false,
            kind: PropertyKind::Init,
            word_key: None,
        };
        let word = |token: crate::token::Token, name: &str| Identifier {
            name: name.to_string(),
            span: token.span,
        };

        if self.is_contextual("static") {
            let token = self.advance()?;
            if self.is_class_element_name_start() || self.check(&TokenKind::Star) {
                head.is_static = true;
            } else {
                head.word_key = Some(word(token, "static"));
                return Ok(head);
            }
        }

        if self.is_contextual("async") {
            let token = self.advance()?;
            if (self.is_class_element_name_start() || self.check(&TokenKind::Star)) && !self.can_insert_semicolon() {
                if !self.options.allow_async {
                    return Err(self.unsupported("Async method", token.span.start_marker()));
                }
                head.is_async = true;
            } else {
                head.word_key = Some(word(token, "async"));
                return Ok(head);
            }
        }

        if self.check(&TokenKind::Star) {
            if !self.options.allow_generators {
                return Err(self.unsupported("Generator method", self.start()));
            }
            self.advance()?;
            head.is_generator = true;
            return Ok(head);
        }

        if !head.is_async && (self.is_contextual("get") || self.is_contextual("set")) {
            let is_get = self.is_contextual("get");
            let token = self.advance()?;
            if self.is_class_element_name_start() {
                head.kind = if is_get { PropertyKind::Get } else { PropertyKind::Set };
            } else {
                head.word_key = Some(word(token, if is_get { "get" } else { "set" }));
            }
        }
        Ok(head)
    }

    fn parse_class_element(&mut self, has_super: bool) -> ParseResult<ClassElement> {
        let start = self.start();

        if self.is_contextual("static") {
            let next = self.lookahead()?;
            if matches!(next.kind, TokenKind::LBrace) {
                return self.parse_static_block(start);
            }
        }

        let head = self.parse_element_head()?;
        let (key, computed) = match head.word_key.clone() {
            Some(id) => (id.into_expr(), false),
            None => self.parse_property_name(true)?,
        };

        let is_method = self.check(&TokenKind::LParen)
            || head.kind != PropertyKind::Init
            || head.is_generator
            || head.is_async;

        if let ExprKind::PrivateName { name } = &key.kind {
            if name == "constructor" {
                return Err(ParseError::early_at(
                    "Classes can't have an element named '#constructor'",
                    key.span,
                ));
            }
            let slot = match head.kind {
                PropertyKind::Get => PrivateSlot::Getter {
                    is_static: head.is_static,
                },
                PropertyKind::Set => PrivateSlot::Setter {
                    is_static: head.is_static,
                },
                PropertyKind::Init => PrivateSlot::Field,
            };
            let declared = self
                .private_names
                .last_mut()
                .is_some_and(|scope| scope.declare(name, slot));
            if !declared {
                return Err(ParseError::early_at(
                    format!("Identifier '#{name}' has already been declared"),
                    key.span,
                ));
            }
        }

        if is_method {
            self.parse_class_method(start, key, computed, head, has_super)
        } else {
            self.parse_class_field(start, key, computed, head.is_static)
        }
    }

    fn parse_class_method(
        &mut self,
        start: Marker,
        key: Expr,
        computed: bool,
        head: ElementHead,
        has_super: bool,
    ) -> ParseResult<ClassElement> {
        let is_constructor = !head.is_static && !computed && key_is(&key, "constructor");
        if is_constructor {
            if head.kind != PropertyKind::Init {
                return Err(ParseError::early_at("Constructor can't have get/set modifier", key.span));
            }
            if head.is_generator {
                return Err(ParseError::early_at("Constructor can't be a generator", key.span));
            }
            if head.is_async {
                return Err(ParseError::early_at("Constructor can't be an async method", key.span));
            }
        }
        if head.is_static && !computed && key_is(&key, "prototype") {
            return Err(ParseError::early_at(
                "Classes may not have a static property named prototype",
                key.span,
            ));
        }

        let value = self.parse_method(head.is_generator, head.is_async, is_constructor && has_super)?;
        let kind = match head.kind {
            _ if is_constructor => MethodKind::Constructor,
            PropertyKind::Get => MethodKind::Get,
            PropertyKind::Set => MethodKind::Set,
            PropertyKind::Init => MethodKind::Method,
        };
        if matches!(kind, MethodKind::Get | MethodKind::Set) {
            self.check_accessor_params(kind == MethodKind::Get, &value)?;
        }

        Ok(ClassElement::Method(MethodDefinition {
            key,
            value: Box::new(value),
            kind,
            computed,
            is_static: head.is_static,
            span: self.span_from(start),
        }))
    }

    fn parse_class_field(&mut self, start: Marker, key: Expr, computed: bool, is_static: bool) -> ParseResult<ClassElement> {
        if !computed && key_is(&key, "constructor") {
            return Err(ParseError::early_at(
                "Classes can't have a field named 'constructor'",
                key.span,
            ));
        }
        if is_static && !computed && key_is(&key, "prototype") {
            return Err(ParseError::early_at(
                "Classes can't have a static field named 'prototype'",
                key.span,
            ));
        }

        let value = if self.eat(&TokenKind::Eq)? {
            let saved = self.take_arrow_positions();
            self.scopes.enter(ScopeFlags::CLASS_FIELD_INIT | ScopeFlags::SUPER);
            let value = self.with_in(true, |p| p.parse_maybe_assign(None));
            self.scopes.exit();
            self.restore_arrow_positions(saved);
            Some(value?)
        } else {
            None
        };
        self.expect_semicolon()?;

        Ok(ClassElement::Property(PropertyDefinition {
            key,
            value,
            computed,
            is_static,
            span: self.span_from(start),
        }))
    }

    /// `static { ... }`
    fn parse_static_block(&mut self, start: Marker) -> ParseResult<ClassElement> {
        self.advance()?;
        self.expect(&TokenKind::LBrace)?;
        let saved = self.take_arrow_positions();
        self.scopes.enter(ScopeFlags::CLASS_STATIC_BLOCK | ScopeFlags::SUPER);
        let body = self.parse_stmt_list();
        self.scopes.exit();
        self.restore_arrow_positions(saved);
        let body = body?;
        self.expect(&TokenKind::RBrace)?;
        Ok(ClassElement::StaticBlock(StaticBlock {
            body,
            span: self.span_from(start),
        }))
    }
}

fn function_flags(is_async: bool, generator: bool) -> ScopeFlags {
    let mut flags = ScopeFlags::FUNCTION;
    if is_async {
        flags |= ScopeFlags::ASYNC;
    }
    if generator {
        flags |= ScopeFlags::GENERATOR;
    }
    flags
}

/// A non-computed key spelled `name`, as an identifier or string.
fn key_is(key: &Expr, name: &str) -> bool {
    key.is_ident(name) || key.as_string_literal() == Some(name)
}
