//! Rendering parse errors as miette diagnostics.

use jsfront_parser::{ErrorKind, ParseError};
use miette::{LabeledSpan, NamedSource, Report};

/// Build a report pointing at the error's offset in `source`.
pub fn report(err: &ParseError, name: &str, source: String) -> Report {
    let label = LabeledSpan::at_offset(err.offset as usize, label_for(err.kind));
    miette::miette!(
        labels = vec![label],
        help = help_for(err.kind),
        "{} at {}:{}:{}",
        err.message,
        name,
        err.line,
        err.column + 1
    )
    .with_source_code(NamedSource::new(name, source))
}

fn label_for(kind: ErrorKind) -> String {
    kind.to_string()
}

fn help_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Lexical | ErrorKind::Syntax => "the input is not valid ECMAScript",
        ErrorKind::Early => "the code is well formed but breaks a static rule",
        ErrorKind::Unsupported => "enable the feature with the matching option",
        ErrorKind::Resource => "raise --max-depth to accept deeper nesting",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsfront_parser::{parse, ParserOptions};

    #[test]
    fn test_report_carries_message_and_location() {
        let source = "let x = ;";
        let err = parse(source, ParserOptions::default()).unwrap_err();
        let report = report(&err, "input.js", source.to_string());
        let text = report.to_string();
        assert!(text.contains("input.js:1:9"), "{text}");
        assert!(text.starts_with("Unexpected"), "{text}");
    }
}
