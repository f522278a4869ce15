//! # Parser Module
//!
//! The compiled SLR(1) parser: ACTION/GOTO tables over the grammar, the
//! shift-reduce driver and the table introspection surface.
//!
//! A [`SlrParser`] is immutable once built and may be shared across threads;
//! each call to [`parse`](SlrParser::parse) owns its own cursor and value
//! stack.

mod driver;
mod item;
mod table;

pub use table::Action;

pub(crate) use table::{ActionRow, GotoRow};

use crate::error::{DefinitionError, ParseError};
use crate::grammar::{Grammar, NonTerminalId, StateId, TerminalId};
use crate::lexer::TokenStream;

/// Knobs for a compiled parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Characters of context on either side of an error span in rendered
    /// snippets.
    pub snippet_padding: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            snippet_padding: 10,
        }
    }
}

/// A parser compiled from a grammar with the SLR(1) construction.
pub struct SlrParser<V> {
    pub(crate) grammar: Grammar<V>,
    pub(crate) action: Vec<ActionRow>,
    pub(crate) goto: Vec<GotoRow>,
    pub(crate) config: ParserConfig,
}

impl<V> std::fmt::Debug for SlrParser<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlrParser").finish_non_exhaustive()
    }
}

impl<V: Default> SlrParser<V> {
    pub(crate) fn from_grammar(
        grammar: Grammar<V>,
        config: ParserConfig,
    ) -> Result<Self, DefinitionError> {
        let tables = table::compile(&grammar)?;
        Ok(Self {
            grammar,
            action: tables.action,
            goto: tables.goto,
            config,
        })
    }

    /// Parses `input` and returns the semantic value built by the grammar's
    /// reasoners and transducers.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered; there is no recovery.
    pub fn parse(&self, input: &str) -> Result<V, ParseError> {
        driver::parse(self, input)
    }

    /// Tokenises `input` against every declared terminal of the grammar,
    /// independent of any parse state.
    #[must_use]
    pub fn token_stream<'p, 'src>(&'p self, input: &'src str) -> TokenStream<'p, 'src, V> {
        TokenStream::new(&self.grammar, input, self.config.snippet_padding)
    }

    /// The grammar this parser was compiled from.
    #[must_use]
    pub const fn grammar(&self) -> &Grammar<V> {
        &self.grammar
    }

    /// Number of states in the LR(0) automaton.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.action.len()
    }

    /// All state ids in automaton order.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.action.len()).map(StateId::from_index)
    }

    /// The resolved action for a `(state, terminal)` slot; `None` means a
    /// parse error in that configuration.
    #[must_use]
    pub fn action(&self, state: StateId, terminal: TerminalId) -> Option<Action> {
        self.action
            .get(state.index())
            .and_then(|row| row.get(&terminal))
            .copied()
    }

    /// The goto target for a `(state, non-terminal)` slot.
    #[must_use]
    pub fn goto_state(&self, state: StateId, nonterminal: NonTerminalId) -> Option<StateId> {
        self.goto
            .get(state.index())
            .and_then(|row| row.get(&nonterminal))
            .copied()
    }

    /// Terminals with an action in `state`, in precedence (declaration)
    /// order. These are exactly the terminals the tokeniser will try there.
    #[must_use]
    pub fn expected_terminals(&self, state: StateId) -> Vec<TerminalId> {
        let mut terminals: Vec<TerminalId> = self
            .action
            .get(state.index())
            .map(|row| row.keys().copied().collect())
            .unwrap_or_default();
        terminals.sort_unstable_by_key(|&t| self.grammar.terminal(t).precedence);
        terminals
    }

    pub(crate) fn expected_summary(&self, state: StateId) -> String {
        let names: Vec<&str> = self
            .expected_terminals(state)
            .into_iter()
            .map(|t| self.grammar.terminal_name(t))
            .collect();
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[derive(Debug, Default, Clone, PartialEq)]
    enum Value {
        #[default]
        None,
        Number(f64),
    }

    fn additions() -> SlrParser<Value> {
        let mut builder = GrammarBuilder::<Value>::new();
        let number = builder
            .terminal_with("number", r"\d+", crate::grammar::Associativity::None, |t| {
                Value::Number(t.raw.parse().unwrap_or(f64::NAN))
            })
            .unwrap();
        let plus = builder
            .terminal_assoc("+", r"\+", crate::grammar::Associativity::Left)
            .unwrap();
        let expression = builder.nonterminal("expression");
        let program = builder.nonterminal("program");
        builder.rule_with(
            expression,
            [expression.into(), plus.into(), expression.into()],
            |children| match (&children[0].value, &children[2].value) {
                (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                _ => Value::None,
            },
        );
        builder.rule(expression, [number.into()]);
        builder.rule(program, [expression.into()]);
        builder.build(program).unwrap()
    }

    #[test]
    fn test_parse_returns_semantic_value() {
        let parser = additions();
        assert_eq!(parser.parse("1 + 2 + 39").unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_premature_end_is_unexpected_token() {
        let parser = additions();
        let error = parser.parse("1 +").unwrap_err();
        match error {
            ParseError::UnexpectedToken { span, expected, .. } => {
                assert_eq!(span.start, 3);
                assert!(expected.contains("number"));
            }
            other => panic!("expected UnexpectedToken, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let parser = additions();
        assert!(matches!(
            parser.parse(""),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parser.parse("   "),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_compiled_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SlrParser<Value>>();
    }

    #[test]
    fn test_expected_terminals_are_in_declaration_order() {
        let parser = additions();
        let expected = parser.expected_terminals(StateId::START);
        let names: Vec<&str> = expected
            .iter()
            .map(|&t| parser.grammar().terminal_name(t))
            .collect();
        assert_eq!(names, ["number", "$"]);
    }
}
