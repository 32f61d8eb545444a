//! Statements, declarations and directive prologues.

use super::{CoverErrors, Parser, StmtContext};
use crate::ast::{
    BlockStatement, CatchClause, Expr, ExprKind, ForHead, ForInit, Identifier, Pattern, Stmt,
    StmtKind, SwitchCase, VarKind, VariableDeclaration, VariableDeclarator,
};
use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::pattern::{reinterpret_as_pattern, PatternPosition};
use crate::scope::{BindingKind, Label, LabelKind, ScopeFlags};
use crate::span::{Marker, Span};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    // =========================================================================
    // Statement Parsing
    // =========================================================================

    /// Parse a statement.
    pub(crate) fn parse_stmt(&mut self, ctx: StmtContext) -> ParseResult<Stmt> {
        self.nested(|p| p.parse_stmt_inner(ctx))
    }

    fn parse_stmt_inner(&mut self, ctx: StmtContext) -> ParseResult<Stmt> {
        let start = self.start();
        let is_let = self.is_contextual("let") && self.is_let_declaration(ctx.is_list(), false)?;
        let is_async_function = self.is_async_function()?;

        match self.peek() {
            // Declarations
            TokenKind::Var => {
                self.advance()?;
                let decl = self.parse_var(start, VarKind::Var, false)?;
                self.expect_semicolon()?;
                Ok(var_stmt(decl, self.span_from(start)))
            }
            TokenKind::Const => {
                self.require_list(ctx, start)?;
                self.advance()?;
                let decl = self.parse_var(start, VarKind::Const, false)?;
                self.expect_semicolon()?;
                Ok(var_stmt(decl, self.span_from(start)))
            }
            TokenKind::Identifier(_) if is_let => {
                tracing::trace!(offset = start.offset, "let starts a lexical declaration");
                self.require_list(ctx, start)?;
                self.advance()?;
                let decl = self.parse_var(start, VarKind::Let, false)?;
                self.expect_semicolon()?;
                Ok(var_stmt(decl, self.span_from(start)))
            }
            TokenKind::Function => self.parse_function_declaration(start, false, ctx, true),
            TokenKind::Class => {
                self.require_list(ctx, start)?;
                self.parse_class_declaration(start, true)
            }
            TokenKind::Identifier(_) if is_async_function => {
                if !ctx.is_list() {
                    return Err(self.unexpected());
                }
                self.advance()?;
                self.parse_function_declaration(start, true, ctx, true)
            }

            // Control flow
            TokenKind::If => self.parse_if_stmt(start),
            TokenKind::Switch => self.parse_switch_stmt(start),
            TokenKind::For => self.parse_for_stmt(start),
            TokenKind::While => self.parse_while_stmt(start),
            TokenKind::Do => self.parse_do_while_stmt(start),
            TokenKind::Break => self.parse_break_continue(start, true),
            TokenKind::Continue => self.parse_break_continue(start, false),
            TokenKind::Return => self.parse_return_stmt(start),
            TokenKind::Throw => self.parse_throw_stmt(start),
            TokenKind::Try => self.parse_try_stmt(start),
            TokenKind::With => self.parse_with_stmt(start),
            TokenKind::Debugger => {
                self.advance()?;
                self.expect_semicolon()?;
                Ok(Stmt::new(StmtKind::Debugger, self.span_from(start)))
            }

            // Block
            TokenKind::LBrace => {
                let block = self.parse_block(true)?;
                Ok(Stmt::new(StmtKind::Block { body: block.body }, block.span))
            }

            // Empty statement
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Stmt::new(StmtKind::Empty, self.span_from(start)))
            }

            // Module declarations
            TokenKind::Import => {
                let next = self.lookahead()?;
                if matches!(next.kind, TokenKind::LParen | TokenKind::Dot) {
                    return self.parse_expr_stmt(start);
                }
                self.check_module_item(ctx, start)?;
                self.parse_import_decl(start)
            }
            TokenKind::Export => {
                self.check_module_item(ctx, start)?;
                self.parse_export_decl(start)
            }

            TokenKind::Enum => Err(ParseError::early(
                "The keyword 'enum' is reserved",
                start,
            )),

            TokenKind::Identifier(_) => self.parse_expr_or_labeled(start, ctx),

            // Expression statement
            _ => self.parse_expr_stmt(start),
        }
    }

    fn require_list(&self, ctx: StmtContext, start: Marker) -> ParseResult<()> {
        if ctx.is_list() {
            Ok(())
        } else {
            Err(ParseError::syntax(
                "Lexical declaration cannot appear in a single-statement context",
                start,
            ))
        }
    }

    fn check_module_item(&self, ctx: StmtContext, start: Marker) -> ParseResult<()> {
        if ctx != StmtContext::TopLevel {
            return Err(ParseError::syntax(
                "'import' and 'export' may only appear at the top level",
                start,
            ));
        }
        if !self.options.is_module() {
            return Err(ParseError::syntax(
                "'import' and 'export' may appear only with 'sourceType: module'",
                start,
            ));
        }
        Ok(())
    }

    /// Whether the current `let` begins a lexical declaration.
    ///
    /// `let [` always does. Outside statement lists nothing else does. In a
    /// list `let` followed by an identifier or `{` does, except that `{` on
    /// the next line leaves `let` an identifier ended by ASI.
    pub(crate) fn is_let_declaration(&self, in_list: bool, for_head: bool) -> ParseResult<bool> {
        let next = self.lookahead()?;
        let declaration = match next.kind {
            TokenKind::LBracket => true,
            _ if !in_list && !for_head => false,
            TokenKind::LBrace => for_head || !next.had_newline_before,
            TokenKind::Identifier(_) => true,
            TokenKind::In | TokenKind::Instanceof => false,
            ref kind => kind.is_keyword(),
        };
        Ok(declaration)
    }

    /// `async function` with no line break in between.
    pub(crate) fn is_async_function(&self) -> ParseResult<bool> {
        if !self.is_contextual("async") {
            return Ok(false);
        }
        let next = self.lookahead()?;
        Ok(matches!(next.kind, TokenKind::Function) && !next.had_newline_before)
    }

    // =========================================================================
    // Blocks and directives
    // =========================================================================

    /// Parse `{ ... }`, optionally in a fresh block scope.
    pub(crate) fn parse_block(&mut self, new_scope: bool) -> ParseResult<BlockStatement> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        if new_scope {
            self.scopes.enter(ScopeFlags::empty());
        }
        let body = self.parse_stmt_list()?;
        if new_scope {
            self.scopes.exit();
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(BlockStatement {
            body,
            span: self.span_from(start),
        })
    }

    /// Statements up to a closing `}` (not consumed).
    pub(crate) fn parse_stmt_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_eof() {
                return Err(self.unexpected());
            }
            body.push(self.parse_stmt(StmtContext::List)?);
        }
        Ok(body)
    }

    /// Statements of a function body up to `}`, with directives marked.
    pub(crate) fn parse_directive_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        let mut prologue = true;
        while !self.check(&TokenKind::RBrace) {
            if self.is_eof() {
                return Err(self.unexpected());
            }
            let stmt = self.parse_stmt(StmtContext::List)?;
            body.push(self.directive(stmt, &mut prologue));
        }
        Ok(body)
    }

    /// Mark `stmt` as a directive while still inside the prologue.
    pub(crate) fn directive(&self, mut stmt: Stmt, prologue: &mut bool) -> Stmt {
        if !*prologue {
            return stmt;
        }
        if let StmtKind::Expr {
            expression,
            directive,
        } = &mut stmt.kind
        {
            if expression.as_string_literal().is_some() && !expression.parenthesized {
                let span = expression.span;
                let raw = &self.source[span.start as usize + 1..span.end as usize - 1];
                *directive = Some(raw.to_string());
                return stmt;
            }
        }
        *prologue = false;
        stmt
    }

    // =========================================================================
    // Variable declarations
    // =========================================================================

    /// Parse the declarator list after `var`, `let` or `const`.
    pub(crate) fn parse_var(&mut self, start: Marker, kind: VarKind, is_for: bool) -> ParseResult<VariableDeclaration> {
        let binding = match kind {
            VarKind::Var => BindingKind::Var,
            VarKind::Let | VarKind::Const => BindingKind::Lexical,
        };
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.start();
            let id = self.parse_binding_target()?;
            self.declare_pattern(&id, binding)?;
            let init = if self.eat(&TokenKind::Eq)? {
                Some(self.parse_assign_expr()?)
            } else {
                let for_head = is_for && (self.check(&TokenKind::In) || self.is_contextual("of"));
                if kind == VarKind::Const && !for_head {
                    return Err(ParseError::early(
                        "Missing initializer in const declaration",
                        self.prev_end,
                    ));
                }
                if !matches!(id, Pattern::Ident(_)) && !for_head {
                    return Err(ParseError::early(
                        "Complex binding patterns require an initialization value",
                        self.prev_end,
                    ));
                }
                None
            };
            declarations.push(VariableDeclarator {
                id,
                init,
                span: self.span_from(decl_start),
            });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(VariableDeclaration {
            declarations,
            kind,
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Expression and labeled statements
    // =========================================================================

    fn parse_expr_or_labeled(&mut self, start: Marker, ctx: StmtContext) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        if let ExprKind::Ident { name } = &expr.kind {
            if !expr.parenthesized && self.check(&TokenKind::Colon) {
                let label = Identifier {
                    name: name.clone(),
                    span: expr.span,
                };
                return self.parse_labeled_stmt(start, label, ctx);
            }
        }
        self.finish_expr_stmt(start, expr)
    }

    pub(crate) fn parse_expr_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        self.finish_expr_stmt(start, expr)
    }

    fn finish_expr_stmt(&mut self, start: Marker, expression: Expr) -> ParseResult<Stmt> {
        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::Expr {
                expression,
                directive: None,
            },
            self.span_from(start),
        ))
    }

    fn parse_labeled_stmt(&mut self, start: Marker, label: Identifier, ctx: StmtContext) -> ParseResult<Stmt> {
        self.expect(&TokenKind::Colon)?;
        if self
            .scopes
            .labels()
            .iter()
            .any(|l| l.name.as_deref() == Some(label.name.as_str()))
        {
            return Err(ParseError::early_at(
                format!("Label '{}' is already declared", label.name),
                label.span,
            ));
        }
        let kind = match self.peek() {
            TokenKind::For | TokenKind::While | TokenKind::Do => LabelKind::Loop,
            TokenKind::Switch => LabelKind::Switch,
            _ => LabelKind::Plain,
        };
        let body_start = self.current.span.start;
        if let Some(labels) = self.scopes.labels_mut() {
            for existing in labels.iter_mut().rev() {
                if existing.statement_start != start.offset {
                    break;
                }
                existing.statement_start = body_start;
                existing.kind = kind;
            }
        }
        self.scopes.push_label(Label {
            name: Some(label.name.clone()),
            kind,
            statement_start: body_start,
        });
        let body_ctx = match ctx {
            StmtContext::TopLevel | StmtContext::List | StmtContext::Labeled => StmtContext::Labeled,
            StmtContext::If | StmtContext::Nested => StmtContext::Nested,
        };
        let body = self.parse_stmt(body_ctx)?;
        self.scopes.pop_label();
        Ok(Stmt::new(
            StmtKind::Labeled {
                label,
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_paren_expr(&mut self) -> ParseResult<Expr> {
        self.expect(&TokenKind::LParen)?;
        let expr = self.with_in(true, |p| p.parse_expr())?;
        self.expect(&TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.advance()?;
        let test = self.parse_paren_expr()?;
        let consequent = self.parse_if_body()?;
        let alternate = if self.eat(&TokenKind::Else)? {
            Some(Box::new(self.parse_if_body()?))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                test,
                consequent: Box::new(consequent),
                alternate,
            },
            self.span_from(start),
        ))
    }

    /// A function declaration directly under `if` gets its own block scope.
    fn parse_if_body(&mut self) -> ParseResult<Stmt> {
        if !self.check(&TokenKind::Function) {
            return self.parse_stmt(StmtContext::If);
        }
        self.scopes.enter(ScopeFlags::empty());
        let body = self.parse_stmt(StmtContext::If);
        self.scopes.exit();
        body
    }

    fn parse_switch_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.advance()?;
        let discriminant = self.parse_paren_expr()?;
        self.expect(&TokenKind::LBrace)?;
        self.scopes.push_label(Label {
            name: None,
            kind: LabelKind::Switch,
            statement_start: start.offset,
        });
        self.scopes.enter(ScopeFlags::empty());

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.check(&TokenKind::RBrace) {
            let case_start = self.start();
            let test = match self.peek() {
                TokenKind::Case => {
                    self.advance()?;
                    Some(self.with_in(true, |p| p.parse_expr())?)
                }
                TokenKind::Default => {
                    if seen_default {
                        return Err(ParseError::early("Multiple default clauses", case_start));
                    }
                    seen_default = true;
                    self.advance()?;
                    None
                }
                _ => return Err(self.unexpected()),
            };
            self.expect(&TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.peek(),
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                consequent.push(self.parse_stmt(StmtContext::List)?);
            }
            cases.push(SwitchCase {
                test,
                consequent,
                span: self.span_from(case_start),
            });
        }

        self.scopes.exit();
        self.scopes.pop_label();
        self.expect(&TokenKind::RBrace)?;
        Ok(Stmt::new(
            StmtKind::Switch {
                discriminant,
                cases,
            },
            self.span_from(start),
        ))
    }

    fn push_loop_label(&mut self, start: Marker) {
        self.scopes.push_label(Label {
            name: None,
            kind: LabelKind::Loop,
            statement_start: start.offset,
        });
    }

    fn parse_loop_body(&mut self) -> ParseResult<Stmt> {
        self.parse_stmt(StmtContext::Nested)
    }

    fn parse_while_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.advance()?;
        let test = self.parse_paren_expr()?;
        self.push_loop_label(start);
        let body = self.parse_loop_body()?;
        self.scopes.pop_label();
        Ok(Stmt::new(
            StmtKind::While {
                test,
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    fn parse_do_while_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.advance()?;
        self.push_loop_label(start);
        let body = self.parse_loop_body()?;
        self.scopes.pop_label();
        self.expect(&TokenKind::While)?;
        let test = self.parse_paren_expr()?;
        // The `;` after do-while is always optional.
        self.eat(&TokenKind::Semicolon)?;
        Ok(Stmt::new(
            StmtKind::DoWhile {
                body: Box::new(body),
                test,
            },
            self.span_from(start),
        ))
    }

    fn parse_for_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.advance()?;
        let await_at = if self.scopes.can_await() && self.is_contextual("await") {
            let at = self.start();
            self.advance()?;
            Some(at)
        } else {
            None
        };
        self.push_loop_label(start);
        self.scopes.enter(ScopeFlags::empty());
        self.expect(&TokenKind::LParen)?;

        let stmt = self.parse_for_rest(start, await_at);

        self.scopes.exit();
        self.scopes.pop_label();
        stmt
    }

    fn parse_for_rest(&mut self, start: Marker, await_at: Option<Marker>) -> ParseResult<Stmt> {
        let reject_await = |await_at: Option<Marker>| match await_at {
            Some(at) => Err(ParseError::syntax("Unexpected identifier 'await'", at)),
            None => Ok(()),
        };

        if self.check(&TokenKind::Semicolon) {
            reject_await(await_at)?;
            return self.parse_for_classic(start, None);
        }

        let init_start = self.start();
        let is_let = self.is_contextual("let") && self.is_let_declaration(false, true)?;
        if is_let || matches!(self.peek(), TokenKind::Var | TokenKind::Const) {
            let kind = match self.peek() {
                TokenKind::Var => VarKind::Var,
                TokenKind::Const => VarKind::Const,
                _ => VarKind::Let,
            };
            self.advance()?;
            let decl = self.with_in(false, |p| p.parse_var(init_start, kind, true))?;
            let is_in = self.check(&TokenKind::In);
            if (is_in || self.is_contextual("of")) && decl.declarations.len() == 1 {
                if is_in {
                    reject_await(await_at)?;
                }
                return self.parse_for_in_of(start, ForHead::Var(decl), await_at.is_some());
            }
            reject_await(await_at)?;
            return self.parse_for_classic(start, Some(ForInit::Var(decl)));
        }

        let starts_with_let = self.is_contextual("let");
        let starts_with_async = self.is_contextual("async");
        let mut cover = CoverErrors::default();
        let init = self.with_in(false, |p| p.parse_expr_with(Some(&mut cover)))?;

        let is_in = self.check(&TokenKind::In);
        let is_of = self.is_contextual("of");
        if is_in || is_of {
            if is_in {
                reject_await(await_at)?;
            } else if await_at.is_none()
                && starts_with_async
                && init.is_ident("async")
                && init.span.start == init_start.offset
                && !init.parenthesized
            {
                return Err(ParseError::syntax(
                    "The left-hand side of a for-of loop may not be 'async'",
                    init_start,
                ));
            }
            if starts_with_let && is_of {
                return Err(ParseError::early(
                    "The left-hand side of a for-of loop may not start with let.",
                    init_start,
                ));
            }
            let pattern = reinterpret_as_pattern(init, PatternPosition::Assignment)?;
            self.check_assign_target(&pattern)?;
            return self.parse_for_in_of(start, ForHead::Pattern(pattern), await_at.is_some());
        }

        self.check_cover_errors(&cover)?;
        reject_await(await_at)?;
        self.parse_for_classic(start, Some(ForInit::Expr(init)))
    }

    fn parse_for_classic(&mut self, start: Marker, init: Option<ForInit>) -> ParseResult<Stmt> {
        self.expect(&TokenKind::Semicolon)?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.with_in(true, |p| p.parse_expr())?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.with_in(true, |p| p.parse_expr())?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::new(
            StmtKind::For {
                init,
                test,
                update,
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    fn parse_for_in_of(&mut self, start: Marker, left: ForHead, is_await: bool) -> ParseResult<Stmt> {
        let is_in = self.check(&TokenKind::In);
        if let ForHead::Var(decl) = &left {
            if let Some(first) = decl.declarations.first() {
                let legacy_var_in = is_in
                    && !self.strict()
                    && decl.kind == VarKind::Var
                    && matches!(first.id, Pattern::Ident(_));
                if first.init.is_some() && !legacy_var_in {
                    return Err(ParseError::early_at(
                        format!(
                            "{} loop variable declaration may not have an initializer",
                            if is_in { "for-in" } else { "for-of" }
                        ),
                        decl.span,
                    ));
                }
            }
        }
        self.advance()?;
        let right = if is_in {
            self.with_in(true, |p| p.parse_expr())?
        } else {
            self.with_in(true, |p| p.parse_assign_expr())?
        };
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_loop_body()?);
        let kind = if is_in {
            StmtKind::ForIn { left, right, body }
        } else {
            StmtKind::ForOf {
                left,
                right,
                body,
                is_await,
            }
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn parse_break_continue(&mut self, start: Marker, is_break: bool) -> ParseResult<Stmt> {
        self.advance()?;
        let label = if self.check(&TokenKind::Semicolon) || self.can_insert_semicolon() {
            None
        } else if matches!(self.peek(), TokenKind::Identifier(_)) {
            Some(self.parse_ident()?)
        } else {
            return Err(self.unexpected());
        };

        let found = self.scopes.labels().iter().any(|l| match &label {
            None => match l.kind {
                LabelKind::Loop => l.name.is_none(),
                LabelKind::Switch => is_break && l.name.is_none(),
                LabelKind::Plain => false,
            },
            Some(id) => {
                l.name.as_deref() == Some(id.name.as_str()) && (is_break || l.kind == LabelKind::Loop)
            }
        });
        if !found {
            let keyword = if is_break { "break" } else { "continue" };
            return Err(ParseError::early(format!("Unsyntactic {keyword}"), start));
        }

        self.expect_semicolon()?;
        let kind = if is_break {
            StmtKind::Break { label }
        } else {
            StmtKind::Continue { label }
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn parse_return_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        if !self.scopes.in_function() && !self.options.allow_return_outside_function {
            return Err(ParseError::syntax("'return' outside of function", start));
        }
        self.advance()?;
        // [no LineTerminator here] after `return`.
        let argument = if self.eat(&TokenKind::Semicolon)? || self.can_insert_semicolon() {
            None
        } else {
            let argument = self.with_in(true, |p| p.parse_expr())?;
            self.expect_semicolon()?;
            Some(argument)
        };
        Ok(Stmt::new(StmtKind::Return { argument }, self.span_from(start)))
    }

    fn parse_throw_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.advance()?;
        if self.current.had_newline_before {
            return Err(ParseError::syntax("Illegal newline after throw", self.prev_end));
        }
        let argument = self.with_in(true, |p| p.parse_expr())?;
        self.expect_semicolon()?;
        Ok(Stmt::new(StmtKind::Throw { argument }, self.span_from(start)))
    }

    fn parse_try_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.advance()?;
        let block = self.parse_block(true)?;

        let handler = if self.check(&TokenKind::Catch) {
            let catch_start = self.start();
            self.advance()?;
            let clause = if self.eat(&TokenKind::LParen)? {
                let param = self.parse_binding_target()?;
                let simple = matches!(param, Pattern::Ident(_));
                self.scopes.enter(if simple {
                    ScopeFlags::SIMPLE_CATCH
                } else {
                    ScopeFlags::empty()
                });
                let kind = if simple {
                    BindingKind::SimpleCatch
                } else {
                    BindingKind::Lexical
                };
                self.declare_pattern(&param, kind)?;
                self.expect(&TokenKind::RParen)?;
                let body = self.parse_block(false)?;
                self.scopes.exit();
                (Some(param), body)
            } else {
                (None, self.parse_block(true)?)
            };
            Some(CatchClause {
                param: clause.0,
                body: clause.1,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.eat(&TokenKind::Finally)? {
            Some(self.parse_block(true)?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::syntax("Missing catch or finally clause", self.start()));
        }

        Ok(Stmt::new(
            StmtKind::Try {
                block,
                handler,
                finalizer,
            },
            self.span_from(start),
        ))
    }

    fn parse_with_stmt(&mut self, start: Marker) -> ParseResult<Stmt> {
        if self.strict() {
            return Err(ParseError::early("'with' in strict mode", start));
        }
        if !self.options.allow_with {
            return Err(self.unsupported("'with' statement", start));
        }
        self.advance()?;
        let object = self.parse_paren_expr()?;
        let body = self.parse_stmt(StmtContext::Nested)?;
        Ok(Stmt::new(
            StmtKind::With {
                object,
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    /// Raise the first pending cover-grammar error.
    pub(crate) fn check_cover_errors(&self, cover: &CoverErrors) -> ParseResult<()> {
        if let Some(offset) = cover.shorthand_assign {
            return Err(ParseError::new(
                ErrorKind::Syntax,
                "Shorthand property assignments are valid only in destructuring patterns",
                self.lexer.marker(offset),
            ));
        }
        if let Some(offset) = cover.double_proto {
            return Err(ParseError::early(
                "Redefinition of __proto__ property",
                self.lexer.marker(offset),
            ));
        }
        Ok(())
    }
}

fn var_stmt(decl: VariableDeclaration, span: Span) -> Stmt {
    Stmt::new(
        StmtKind::Var {
            declarations: decl.declarations,
            kind: decl.kind,
        },
        span,
    )
}
