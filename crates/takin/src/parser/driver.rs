//! The shift-reduce loop over the compiled tables.

use super::{Action, SlrParser};
use crate::error::ParseError;
use crate::grammar::StateId;
use crate::lexer::{Scanner, ValueToken};
use crate::text::Span;
use smallvec::SmallVec;

struct StackEntry<V> {
    state: StateId,
    token: ValueToken<V>,
}

pub(crate) fn parse<V: Default>(parser: &SlrParser<V>, input: &str) -> Result<V, ParseError> {
    let grammar = &parser.grammar;
    let padding = parser.config.snippet_padding;
    let mut scanner = Scanner::new(parser, input);

    // The bottom entry is a sentinel; its value is never consumed.
    let mut stack: Vec<StackEntry<V>> = vec![StackEntry {
        state: StateId::START,
        token: ValueToken::new(V::default(), Span::new(0, 0)),
    }];

    loop {
        let state = stack.last().map_or(StateId::START, |entry| entry.state);
        let token = scanner.peek(state)?;

        let Some(action) = parser.action(state, token.terminal) else {
            return Err(ParseError::unexpected_token(
                token.span,
                parser.expected_summary(state),
                input,
                padding,
            ));
        };

        match action {
            Action::Accept => {
                // Only the sentinel below the result may remain.
                if stack.len() < 2 {
                    return Err(ParseError::unexpected_token(
                        token.span,
                        parser.expected_summary(state),
                        input,
                        padding,
                    ));
                }
                log::trace!("accept");
                return Ok(stack.pop().map(|entry| entry.token.value).unwrap_or_default());
            }

            Action::Shift(next) => {
                let value = grammar.terminal(token.terminal).reason(&token);
                log::trace!(
                    "shift {} -> state {next}",
                    grammar.terminal_name(token.terminal),
                );
                stack.push(StackEntry {
                    state: next,
                    token: ValueToken::new(value, token.span),
                });
                scanner.consume(&token);
            }

            Action::Reduce(rule_id) => {
                let rule = grammar.rule(rule_id);
                let arity = rule.sequence.len();
                let split = stack.len().saturating_sub(arity);
                let mut children: SmallVec<[ValueToken<V>; 4]> =
                    stack.drain(split..).map(|entry| entry.token).collect();

                let span = Span::new(
                    children.first().map_or(0, |child| child.span.start),
                    children.last().map_or(0, |child| child.span.end),
                );
                let value = rule.transduce(&mut children);

                let below = stack.last().map_or(StateId::START, |entry| entry.state);
                let Some(next) = parser.goto_state(below, rule.lhs) else {
                    return Err(ParseError::unexpected_token(
                        token.span,
                        parser.expected_summary(below),
                        input,
                        padding,
                    ));
                };
                log::trace!(
                    "reduce {} -> state {next}",
                    grammar.rule_display(rule_id, None),
                );
                stack.push(StackEntry {
                    state: next,
                    token: ValueToken::new(value, span),
                });
                // The lookahead is not consumed on a reduce.
            }
        }
    }
}
