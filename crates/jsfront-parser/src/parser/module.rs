//! `import` and `export` declarations.

use rustc_hash::FxHashSet;

use super::{Parser, StmtContext};
use crate::ast::{
    ExportAllDeclaration, ExportDefaultKind, ExportNamedDeclaration, ExportSpecifier, Identifier,
    ImportAttribute, ImportDeclaration, ImportDefaultSpecifier, ImportNamedSpecifier,
    ImportNamespaceSpecifier, ImportSpecifier, ModuleExportName, Stmt, StmtKind, StringLiteral,
};
use crate::error::{ParseError, ParseResult};
use crate::scope::BindingKind;
use crate::span::{Marker, Span};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    // =========================================================================
    // Import
    // =========================================================================

    /// Parse an import declaration at the `import` keyword.
    pub(crate) fn parse_import_decl(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.expect(&TokenKind::Import)?;

        let mut specifiers = Vec::new();
        if !matches!(self.peek(), TokenKind::String(_)) {
            self.parse_import_specifiers(&mut specifiers)?;
            self.expect_contextual("from")?;
        }
        let source = self.parse_module_source()?;
        let attributes = self.parse_import_attributes()?;
        self.expect_semicolon()?;

        for spec in &specifiers {
            let local = match spec {
                ImportSpecifier::Named(s) => &s.local,
                ImportSpecifier::Default(s) => &s.local,
                ImportSpecifier::Namespace(s) => &s.local,
            };
            self.declare_name(local, BindingKind::Lexical)?;
        }
        tracing::trace!(source = %source.value, specifiers = specifiers.len(), "import declaration");

        Ok(Stmt::new(
            StmtKind::Import(Box::new(ImportDeclaration {
                specifiers,
                source,
                attributes,
            })),
            self.span_from(start),
        ))
    }

    /// `x`, `* as ns`, `{ a, b as c }` and `x, ...` combinations.
    fn parse_import_specifiers(&mut self, specifiers: &mut Vec<ImportSpecifier>) -> ParseResult<()> {
        if matches!(self.peek(), TokenKind::Identifier(_)) {
            let local = self.parse_ident()?;
            specifiers.push(ImportSpecifier::Default(ImportDefaultSpecifier {
                span: local.span,
                local,
            }));
            if !self.eat(&TokenKind::Comma)? {
                return Ok(());
            }
        }

        if self.check(&TokenKind::Star) {
            let start = self.start();
            self.advance()?;
            self.expect_contextual("as")?;
            let local = self.parse_ident()?;
            specifiers.push(ImportSpecifier::Namespace(ImportNamespaceSpecifier {
                local,
                span: self.span_from(start),
            }));
            return Ok(());
        }

        self.expect(&TokenKind::LBrace)?;
        while !self.check(&TokenKind::RBrace) {
            let start = self.start();
            let imported = self.parse_module_export_name()?;
            let local = if self.eat_contextual("as")? {
                self.parse_ident()?
            } else {
                match &imported {
                    ModuleExportName::Ident(id) => {
                        self.check_unreserved(&id.name, id.span)?;
                        id.clone()
                    }
                    ModuleExportName::String(s) => {
                        return Err(ParseError::syntax(
                            "A string literal cannot be used as an imported binding",
                            s.span.start_marker(),
                        ));
                    }
                }
            };
            specifiers.push(ImportSpecifier::Named(ImportNamedSpecifier {
                imported,
                local,
                span: self.span_from(start),
            }));
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(())
    }

    /// An IdentifierName or a string literal naming an export.
    fn parse_module_export_name(&mut self) -> ParseResult<ModuleExportName> {
        if matches!(self.peek(), TokenKind::String(_)) {
            return Ok(ModuleExportName::String(self.parse_string_literal()?));
        }
        Ok(ModuleExportName::Ident(self.parse_ident_name()?))
    }

    fn parse_module_source(&mut self) -> ParseResult<StringLiteral> {
        if !matches!(self.peek(), TokenKind::String(_)) {
            return Err(self.unexpected());
        }
        self.parse_string_literal()
    }

    pub(crate) fn parse_string_literal(&mut self) -> ParseResult<StringLiteral> {
        let token = self.current.clone();
        let TokenKind::String(value) = token.kind else {
            return Err(self.unexpected());
        };
        if token.legacy_octal {
            self.check_legacy_octal(true, token.span)?;
        }
        self.advance()?;
        let raw = self.source[token.span.start as usize..token.span.end as usize].to_string();
        Ok(StringLiteral {
            value,
            raw,
            span: token.span,
        })
    }

    /// `with { type: "json" }` after a module source.
    fn parse_import_attributes(&mut self) -> ParseResult<Vec<ImportAttribute>> {
        if !self.eat(&TokenKind::With)? {
            return Ok(Vec::new());
        }
        self.expect(&TokenKind::LBrace)?;
        let mut attributes = Vec::new();
        let mut keys = FxHashSet::default();
        while !self.check(&TokenKind::RBrace) {
            let start = self.start();
            let key = self.parse_module_export_name()?;
            if !keys.insert(key.name().to_string()) {
                return Err(ParseError::early_at(
                    format!("Duplicate attribute key '{}'", key.name()),
                    key.span(),
                ));
            }
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_module_source()?;
            attributes.push(ImportAttribute {
                key,
                value,
                span: self.span_from(start),
            });
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(attributes)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Parse an export declaration at the `export` keyword.
    pub(crate) fn parse_export_decl(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.expect(&TokenKind::Export)?;

        match self.peek() {
            TokenKind::Star => self.parse_export_all(start),
            TokenKind::Default => self.parse_export_default(start),
            TokenKind::LBrace => self.parse_export_list(start),
            _ => self.parse_export_declaration(start),
        }
    }

    /// `export * from "m"` and `export * as name from "m"`.
    fn parse_export_all(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.expect(&TokenKind::Star)?;
        let exported = if self.eat_contextual("as")? {
            let name = self.parse_module_export_name()?;
            self.add_export(name.name(), name.span())?;
            Some(name)
        } else {
            None
        };
        self.expect_contextual("from")?;
        let source = self.parse_module_source()?;
        let attributes = self.parse_import_attributes()?;
        self.expect_semicolon()?;
        Ok(Stmt::new(
            StmtKind::ExportAll(Box::new(ExportAllDeclaration {
                exported,
                source,
                attributes,
            })),
            self.span_from(start),
        ))
    }

    fn parse_export_default(&mut self, start: Marker) -> ParseResult<Stmt> {
        let default = self.advance()?;
        self.add_export("default", default.span)?;

        let decl_start = self.start();
        let declaration = if self.check(&TokenKind::Function) {
            let stmt = self.parse_function_declaration(decl_start, false, StmtContext::TopLevel, false)?;
            ExportDefaultKind::Decl(Box::new(stmt))
        } else if self.is_async_function()? {
            self.advance()?;
            let stmt = self.parse_function_declaration(decl_start, true, StmtContext::TopLevel, false)?;
            ExportDefaultKind::Decl(Box::new(stmt))
        } else if self.check(&TokenKind::Class) {
            let stmt = self.parse_class_declaration(decl_start, false)?;
            ExportDefaultKind::Decl(Box::new(stmt))
        } else {
            let expr = self.parse_maybe_assign(None)?;
            self.expect_semicolon()?;
            ExportDefaultKind::Expr(Box::new(expr))
        };

        Ok(Stmt::new(
            StmtKind::ExportDefault { declaration },
            self.span_from(start),
        ))
    }

    /// `export { a, b as c }` with an optional `from "m"`.
    fn parse_export_list(&mut self, start: Marker) -> ParseResult<Stmt> {
        self.expect(&TokenKind::LBrace)?;
        let mut specifiers = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let spec_start = self.start();
            let local = self.parse_module_export_name()?;
            let exported = if self.eat_contextual("as")? {
                self.parse_module_export_name()?
            } else {
                local.clone()
            };
            specifiers.push(ExportSpecifier {
                local,
                exported,
                span: self.span_from(spec_start),
            });
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;

        let (source, attributes) = if self.eat_contextual("from")? {
            let source = self.parse_module_source()?;
            (Some(source), self.parse_import_attributes()?)
        } else {
            for spec in &specifiers {
                self.check_local_export(&spec.local)?;
            }
            (None, Vec::new())
        };
        self.expect_semicolon()?;

        for spec in &specifiers {
            self.add_export(spec.exported.name(), spec.exported.span())?;
        }

        Ok(Stmt::new(
            StmtKind::ExportNamed(Box::new(ExportNamedDeclaration {
                declaration: None,
                specifiers,
                source,
                attributes,
            })),
            self.span_from(start),
        ))
    }

    /// A local name in `export { x }` must be a declared identifier; whether
    /// it is declared is only known at the end of the module.
    fn check_local_export(&mut self, local: &ModuleExportName) -> ParseResult<()> {
        let id = match local {
            ModuleExportName::Ident(id) => id,
            ModuleExportName::String(s) => {
                return Err(ParseError::syntax(
                    "A string literal cannot be used as an exported binding without `from`",
                    s.span.start_marker(),
                ));
            }
        };
        self.check_unreserved(&id.name, id.span)?;
        self.undefined_exports
            .entry(id.name.clone())
            .or_insert(id.span);
        Ok(())
    }

    /// `export var|let|const|function|async function|class ...`
    fn parse_export_declaration(&mut self, start: Marker) -> ParseResult<Stmt> {
        let is_declaration = match self.peek() {
            TokenKind::Var | TokenKind::Const | TokenKind::Function | TokenKind::Class => true,
            TokenKind::Identifier(_) if self.is_contextual("let") => true,
            TokenKind::Identifier(_) => self.is_async_function()?,
            _ => false,
        };
        if !is_declaration {
            return Err(self.unexpected());
        }

        let declaration = self.parse_stmt(StmtContext::TopLevel)?;
        for id in declared_names(&declaration) {
            self.add_export(&id.name, id.span)?;
        }

        Ok(Stmt::new(
            StmtKind::ExportNamed(Box::new(ExportNamedDeclaration {
                declaration: Some(Box::new(declaration)),
                specifiers: Vec::new(),
                source: None,
                attributes: Vec::new(),
            })),
            self.span_from(start),
        ))
    }

    /// Record an exported name, rejecting duplicates.
    fn add_export(&mut self, name: &str, span: Span) -> ParseResult<()> {
        if !self.exported.insert(name.to_string()) {
            return Err(ParseError::early_at(
                format!("Duplicate export '{name}'"),
                span,
            ));
        }
        Ok(())
    }
}

/// Names bound by an exported declaration.
fn declared_names(stmt: &Stmt) -> Vec<Identifier> {
    let mut names = Vec::new();
    match &stmt.kind {
        StmtKind::Var { declarations, .. } => {
            for decl in declarations {
                decl.id.for_each_binding(&mut |id| names.push(id.clone()));
            }
        }
        StmtKind::Function(func) => names.extend(func.id.clone()),
        StmtKind::Class(class) => names.extend(class.id.clone()),
        _ => {}
    }
    names
}
