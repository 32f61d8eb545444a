//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Goal symbol of the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Script,
    /// Module code: strict, `import`/`export` allowed, top-level `await`.
    Module,
}

/// Parser options.
///
/// Deserializes from camelCase JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    pub source_type: SourceType,
    /// Start in strict mode even without a directive.
    pub strict: bool,
    /// Accept `010` literals and `"\07"` escapes in sloppy code.
    pub allow_legacy_octal: bool,
    /// Accept `with` statements in sloppy code.
    pub allow_with: bool,
    pub allow_async: bool,
    pub allow_generators: bool,
    pub allow_return_outside_function: bool,
    /// Skip a leading `#!` line.
    pub allow_hashbang: bool,
    /// Maximum nesting of statements and expressions.
    pub max_depth: u32,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::Script,
            strict: false,
            allow_legacy_octal: true,
            allow_with: true,
            allow_async: true,
            allow_generators: true,
            allow_return_outside_function: false,
            allow_hashbang: true,
            max_depth: 256,
        }
    }
}

impl ParserOptions {
    /// Options for parsing a script.
    pub fn script() -> Self {
        Self::default()
    }

    /// Options for parsing a module.
    pub fn module() -> Self {
        Self {
            source_type: SourceType::Module,
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn is_module(&self) -> bool {
        self.source_type == SourceType::Module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ParserOptions::default();
        assert_eq!(opts.source_type, SourceType::Script);
        assert!(!opts.strict);
        assert!(opts.allow_legacy_octal);
        assert_eq!(opts.max_depth, 256);
        assert!(ParserOptions::module().is_module());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let opts: ParserOptions =
            serde_json::from_str(r#"{"sourceType":"module","allowWith":false}"#).unwrap();
        assert!(opts.is_module());
        assert!(!opts.allow_with);
        assert!(opts.allow_async);
    }
}
