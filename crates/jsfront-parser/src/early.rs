//! Word lists and small predicates behind the early-error rules.

use crate::ast::Pattern;
use crate::token::keyword_from_str;

/// Reserved in every context, `enum` included.
pub fn is_reserved_word(name: &str) -> bool {
    keyword_from_str(name).is_some()
}

/// Additionally reserved in strict mode code.
pub fn is_strict_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "implements"
            | "interface"
            | "let"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "static"
            | "yield"
    )
}

/// Names that strict code may not bind or assign.
pub fn is_restricted_binding(name: &str) -> bool {
    name == "eval" || name == "arguments"
}

/// A parameter list made only of plain identifiers.
pub fn is_simple_parameter_list(params: &[Pattern]) -> bool {
    params.iter().all(|p| matches!(p, Pattern::Ident(_)))
}

/// The first name bound twice by `params`, with its offset.
pub fn duplicate_parameter(params: &[Pattern]) -> Option<(String, u32)> {
    let mut seen = rustc_hash::FxHashSet::default();
    let mut duplicate = None;
    for param in params {
        param.for_each_binding(&mut |id| {
            if duplicate.is_none() && !seen.insert(id.name.as_str()) {
                duplicate = Some((id.name.clone(), id.span.start));
            }
        });
    }
    duplicate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Identifier;
    use crate::span::Span;

    fn ident(name: &str, start: u32) -> Pattern {
        Pattern::Ident(Identifier {
            name: name.into(),
            span: Span {
                start,
                end: start + 1,
                ..Span::default()
            },
        })
    }

    #[test]
    fn test_word_lists() {
        assert!(is_reserved_word("enum"));
        assert!(is_reserved_word("typeof"));
        assert!(!is_reserved_word("let"));
        assert!(is_strict_reserved_word("let"));
        assert!(is_strict_reserved_word("yield"));
        assert!(!is_strict_reserved_word("await"));
        assert!(is_restricted_binding("arguments"));
    }

    #[test]
    fn test_duplicate_parameter() {
        let params = [ident("a", 0), ident("b", 2), ident("a", 4)];
        assert_eq!(duplicate_parameter(&params), Some(("a".to_string(), 4)));
        assert!(is_simple_parameter_list(&params));
        assert_eq!(duplicate_parameter(&params[..2]), None);
    }
}
