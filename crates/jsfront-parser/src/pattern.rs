//! Reinterpreting parsed expressions as patterns.
//!
//! `[a, b] = c`, `({x}) => x` and `for ([k, v] of m)` are only recognizable
//! as destructuring after the expression has been parsed. The conversion here
//! turns such an expression into the equivalent [`Pattern`], or reports why it
//! is not a valid target. It does not check names (`eval`, reserved words,
//! duplicates); the parser does that afterwards on the returned pattern.

use crate::ast::{
    ArrayPattern, AssignOp, AssignmentPattern, AssignmentProperty, Expr, ExprKind, Identifier,
    ObjectMember, ObjectPattern, ObjectPatternMember, Pattern, PropertyKind, RestElement,
};
use crate::error::{ParseError, ParseResult};

/// Where the pattern will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternPosition {
    /// Left side of `=` or of a `for-in`/`for-of` head: member expressions allowed.
    Assignment,
    /// Parameters of an arrow function: only names.
    Binding,
}

/// Convert an expression to a pattern.
pub fn reinterpret_as_pattern(expr: Expr, position: PatternPosition) -> ParseResult<Pattern> {
    let span = expr.span;
    if expr.parenthesized {
        let simple = matches!(expr.kind, ExprKind::Ident { .. })
            || matches!(expr.kind, ExprKind::Member { optional: false, .. });
        if position == PatternPosition::Binding {
            return Err(ParseError::early_at("Invalid destructuring target: parenthesized pattern", span));
        }
        if !simple {
            return Err(ParseError::early_at("Invalid parenthesized assignment pattern", span));
        }
    }

    match expr.kind {
        ExprKind::Ident { name } => Ok(Pattern::Ident(Identifier { name, span })),

        ExprKind::Member { optional: false, .. } => match position {
            PatternPosition::Assignment => Ok(Pattern::Member(Box::new(expr))),
            PatternPosition::Binding => Err(ParseError::early_at("Binding member expression", span)),
        },

        ExprKind::Member { .. } | ExprKind::Chain { .. } => Err(ParseError::early_at(
            "Optional chaining cannot appear in left-hand side",
            span,
        )),

        ExprKind::Array {
            elements,
            trailing_comma,
        } => {
            let count = elements.len();
            let mut patterns = Vec::with_capacity(count);
            for (i, elem) in elements.into_iter().enumerate() {
                let Some(elem) = elem else {
                    patterns.push(None);
                    continue;
                };
                let pattern = match elem.kind {
                    ExprKind::Spread { argument } if !elem.parenthesized => {
                        if i + 1 != count {
                            return Err(ParseError::early_at(
                                "Rest element must be last element",
                                elem.span,
                            ));
                        }
                        if trailing_comma.is_some() {
                            return Err(comma_after_rest(elem.span));
                        }
                        rest_element(*argument, elem.span, position)?
                    }
                    kind => {
                        let elem = Expr {
                            kind,
                            span: elem.span,
                            parenthesized: elem.parenthesized,
                        };
                        reinterpret_as_pattern(elem, position)?
                    }
                };
                patterns.push(Some(pattern));
            }
            Ok(Pattern::Array(ArrayPattern {
                elements: patterns,
                span,
            }))
        }

        ExprKind::Object {
            properties,
            trailing_comma,
        } => {
            let count = properties.len();
            let mut members = Vec::with_capacity(count);
            for (i, member) in properties.into_iter().enumerate() {
                match member {
                    ObjectMember::Property(prop) => {
                        if prop.kind != PropertyKind::Init {
                            return Err(ParseError::early_at(
                                "Object pattern can't contain getter or setter",
                                prop.key.span,
                            ));
                        }
                        if prop.method {
                            return Err(ParseError::early_at(
                                "Object pattern can't contain methods",
                                prop.key.span,
                            ));
                        }
                        let value = reinterpret_as_pattern(prop.value, position)?;
                        members.push(ObjectPatternMember::Property(AssignmentProperty {
                            key: prop.key,
                            value,
                            kind: PropertyKind::Init,
                            method: false,
                            shorthand: prop.shorthand,
                            computed: prop.computed,
                            span: prop.span,
                        }));
                    }
                    ObjectMember::Spread(spread) => {
                        if i + 1 != count {
                            return Err(ParseError::early_at(
                                "Rest element must be last element",
                                spread.span,
                            ));
                        }
                        if trailing_comma.is_some() {
                            return Err(comma_after_rest(spread.span));
                        }
                        let target = *spread.argument;
                        let valid_target = matches!(target.kind, ExprKind::Ident { .. })
                            || (position == PatternPosition::Assignment
                                && matches!(target.kind, ExprKind::Member { .. }));
                        if !valid_target {
                            return Err(ParseError::early_at(
                                "`...` must be followed by an assignable reference in assignment contexts",
                                target.span,
                            ));
                        }
                        let argument = reinterpret_as_pattern(target, position)?;
                        members.push(ObjectPatternMember::Rest(RestElement {
                            argument: Box::new(argument),
                            span: spread.span,
                        }));
                    }
                }
            }
            Ok(Pattern::Object(ObjectPattern {
                properties: members,
                span,
            }))
        }

        ExprKind::Assign {
            operator: AssignOp::Assign,
            left,
            right,
        } => {
            let left = match position {
                PatternPosition::Assignment => *left,
                PatternPosition::Binding => rebind(*left)?,
            };
            Ok(Pattern::Assign(AssignmentPattern {
                left: Box::new(left),
                right,
                span,
            }))
        }

        ExprKind::Assign { .. } => Err(ParseError::early_at(
            "Only '=' operator can be used for specifying default value.",
            span,
        )),

        _ => Err(ParseError::early_at(
            match position {
                PatternPosition::Assignment => "Invalid left-hand side in assignment",
                PatternPosition::Binding => "Invalid destructuring target",
            },
            span,
        )),
    }
}

fn rest_element(argument: Expr, span: crate::span::Span, position: PatternPosition) -> ParseResult<Pattern> {
    if matches!(argument.kind, ExprKind::Assign { .. }) && !argument.parenthesized {
        return Err(ParseError::early_at(
            "Rest elements cannot have a default value",
            argument.span,
        ));
    }
    let argument = reinterpret_as_pattern(argument, position)?;
    Ok(Pattern::Rest(RestElement {
        argument: Box::new(argument),
        span,
    }))
}

fn comma_after_rest(rest: crate::span::Span) -> ParseError {
    ParseError::early_at("Comma is not permitted after the rest element", rest)
}

/// Re-check a pattern built for assignment so it is valid for binding.
fn rebind(pattern: Pattern) -> ParseResult<Pattern> {
    let mut member = None;
    check_no_member(&pattern, &mut member);
    match member {
        Some(span) => Err(ParseError::early_at("Binding member expression", span)),
        None => Ok(pattern),
    }
}

fn check_no_member(pattern: &Pattern, found: &mut Option<crate::span::Span>) {
    if found.is_some() {
        return;
    }
    match pattern {
        Pattern::Ident(_) => {}
        Pattern::Member(expr) => *found = Some(expr.span),
        Pattern::Array(p) => {
            for elem in p.elements.iter().flatten() {
                check_no_member(elem, found);
            }
        }
        Pattern::Object(p) => {
            for prop in &p.properties {
                match prop {
                    ObjectPatternMember::Property(prop) => check_no_member(&prop.value, found),
                    ObjectPatternMember::Rest(rest) => check_no_member(&rest.argument, found),
                }
            }
        }
        Pattern::Assign(p) => check_no_member(&p.left, found),
        Pattern::Rest(p) => check_no_member(&p.argument, found),
    }
}
