//! Error types for grammar construction and parsing.
//!
//! Two families of errors leave this crate, both as plain `Result` values:
//!
//! - [`DefinitionError`]: raised once, while a grammar is compiled into
//!   parsing tables. Table conflicts are fatal to the build and carry a
//!   textual dump of the conflicting state.
//! - [`ParseError`]: raised while parsing an input string. The parse aborts
//!   at the first error; the error carries the source span and a rendered
//!   snippet with a caret/tilde underline.
//!
//! With the `diagnostics` feature enabled, both derive [`miette::Diagnostic`]
//! and parse-error spans become labels.

use crate::text::Span;
use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors raised while building a parser from a grammar definition.
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum DefinitionError {
    /// A state both shifts and reduces on the same lookahead, and neither
    /// precedence nor associativity settles the choice.
    #[error(
        "grammar contains an unresolvable shift-reduce conflict in state {state} on lookahead {lookahead}\n  \
         reduce: {rule}\n  \
         shift: to state {shift_target}\n\
         items of state {state}:\n{closure}"
    )]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(takin::shift_reduce)))]
    ShiftReduceConflict {
        state: usize,
        rule: String,
        lookahead: CompactString,
        shift_target: usize,
        closure: String,
    },

    /// Two distinct rules are complete in the same state with the same
    /// lookahead. Never resolvable.
    #[error(
        "grammar contains an irreconcilable reduce-reduce conflict on lookahead {lookahead}\n  \
         between: {rule_a}\n  \
         and:     {rule_b}\n\
         items of state {state}:\n{closure}"
    )]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(takin::reduce_reduce)))]
    ReduceReduceConflict {
        state: usize,
        rule_a: String,
        rule_b: String,
        lookahead: CompactString,
        closure: String,
    },

    /// A terminal's pattern failed to compile.
    #[error("invalid pattern for terminal {name}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(takin::invalid_pattern)))]
    InvalidPattern {
        name: CompactString,
        #[source]
        source: regex_automata::meta::BuildError,
    },

    /// A production with an empty sequence was declared. Epsilon productions
    /// are not supported.
    #[error("empty production for non-terminal {nonterminal}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(takin::empty_rule)))]
    EmptyRule { nonterminal: CompactString },

    /// A non-terminal is reachable from the start symbol but has no
    /// production rules.
    #[error("non-terminal {name} has no production rules")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(takin::undefined_nonterminal)))]
    UndefinedNonTerminal { name: CompactString },
}

/// Errors raised while parsing an input string.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    /// The next token lexed successfully but the current state has no action
    /// for it (this includes running out of input too early).
    #[error("unexpected token: expected one of {expected}\n{snippet}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(takin::unexpected_token)))]
    UnexpectedToken {
        #[cfg_attr(feature = "diagnostics", label("unexpected token"))]
        span: Span,
        expected: String,
        snippet: String,
    },

    /// No terminal legal in the current state matches the input here.
    #[error("unrecognised input\n{snippet}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(takin::unrecognised_input)))]
    UnrecognisedInput {
        #[cfg_attr(feature = "diagnostics", label("no token matches"))]
        span: Span,
        snippet: String,
    },
}

impl ParseError {
    /// The source span the error is anchored at.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } | Self::UnrecognisedInput { span, .. } => *span,
        }
    }

    pub(crate) fn unexpected_token(
        span: Span,
        expected: String,
        source: &str,
        padding: usize,
    ) -> Self {
        Self::UnexpectedToken {
            span,
            expected,
            snippet: span.snippet(source, padding),
        }
    }

    pub(crate) fn unrecognised(span: Span, source: &str, padding: usize) -> Self {
        Self::UnrecognisedInput {
            span,
            snippet: span.snippet(source, padding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_display() {
        let source = "plot 9;";
        let error = ParseError::unexpected_token(
            Span::new(5, 6),
            "identifier".to_string(),
            source,
            10,
        );
        let rendered = error.to_string();
        assert!(rendered.contains("expected one of identifier"));
        assert!(rendered.contains("plot 9;"));
        assert!(rendered.contains('^'));
        assert_eq!(error.span(), Span::new(5, 6));
    }

    #[test]
    fn test_unrecognised_input_display() {
        let error = ParseError::unrecognised(Span::new(2, 3), "1 $ 2", 10);
        assert!(error.to_string().contains("unrecognised input"));
        assert_eq!(error.span(), Span::new(2, 3));
    }

    #[test]
    fn test_definition_error_display() {
        let error = DefinitionError::ReduceReduceConflict {
            state: 4,
            rule_a: "a -> x ·".to_string(),
            rule_b: "b -> x ·".to_string(),
            lookahead: "$".into(),
            closure: "    a -> x ·\n    b -> x ·".to_string(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("irreconcilable"));
        assert!(rendered.contains("a -> x"));
        assert!(rendered.contains("b -> x"));
        assert!(rendered.contains('$'));
    }
}
