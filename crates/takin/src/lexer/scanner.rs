//! Longest-match scanning over the declared terminals.
//!
//! The parse driver uses the state-aware [`Scanner`]: only terminals with an
//! ACTION entry in the current state are tried, so the same lexeme can
//! resolve to different terminals in different states. [`TokenStream`] is
//! the grammar-wide variant that matches against every declared terminal,
//! independent of any parse.
//!
//! Both apply the same policy: whitespace between tokens is consumed
//! silently, the longest match wins, and ties go to the terminal declared
//! earliest. Zero-length matches are ignored.

use super::token::Token;
use crate::error::ParseError;
use crate::grammar::{Grammar, StateId, TerminalId};
use crate::parser::SlrParser;
use crate::text::Span;

fn skip_whitespace(input: &str, mut pos: usize) -> usize {
    while let Some(c) = input[pos..].chars().next() {
        if !c.is_whitespace() {
            break;
        }
        pos += c.len_utf8();
    }
    pos
}

/// Longest match among `candidates`, which must arrive in precedence order;
/// the strict comparison then keeps the earliest declared terminal on ties.
fn best_match<V: Default>(
    grammar: &Grammar<V>,
    candidates: impl IntoIterator<Item = TerminalId>,
    rest: &str,
) -> Option<(TerminalId, usize)> {
    let mut best: Option<(TerminalId, usize)> = None;
    for terminal in candidates {
        let Some(pattern) = &grammar.terminal(terminal).pattern else {
            continue;
        };
        if let Some(len) = pattern.match_prefix(rest) {
            if len > 0 && best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((terminal, len));
            }
        }
    }
    best
}

/// State-aware tokeniser driving a single parse. Owns the cursor into the
/// input; the parser asks it for the token at the current position given
/// the state on top of the stack.
pub(crate) struct Scanner<'p, 'src, V> {
    parser: &'p SlrParser<V>,
    input: &'src str,
    pos: usize,
}

impl<'p, 'src, V: Default> Scanner<'p, 'src, V> {
    pub(crate) fn new(parser: &'p SlrParser<V>, input: &'src str) -> Self {
        Self {
            parser,
            input,
            pos: 0,
        }
    }

    /// The next token legal in `state`, without consuming it. At the end of
    /// the buffer this is the zero-width end-of-stream token.
    pub(crate) fn peek(&mut self, state: StateId) -> Result<Token<'src>, ParseError> {
        self.pos = skip_whitespace(self.input, self.pos);
        if self.pos >= self.input.len() {
            return Ok(Token {
                terminal: self.parser.grammar.eos(),
                raw: "",
                span: Span::of(self.pos, self.pos),
            });
        }

        let rest = &self.input[self.pos..];
        match best_match(&self.parser.grammar, self.parser.expected_terminals(state), rest) {
            Some((terminal, len)) => {
                log::trace!(
                    "lexed {} {:?} at {}",
                    self.parser.grammar.terminal_name(terminal),
                    &rest[..len],
                    self.pos,
                );
                Ok(Token {
                    terminal,
                    raw: &rest[..len],
                    span: Span::of(self.pos, self.pos + len),
                })
            }
            None => {
                let width = rest.chars().next().map_or(0, char::len_utf8);
                Err(ParseError::unrecognised(
                    Span::of(self.pos, self.pos + width),
                    self.input,
                    self.parser.config.snippet_padding,
                ))
            }
        }
    }

    pub(crate) fn consume(&mut self, token: &Token<'_>) {
        self.pos = token.span.end as usize;
    }
}

/// Iterator over the tokens of an input, matched against every declared
/// terminal of the grammar. Ends at the end of input without an
/// end-of-stream token; a character no terminal matches yields one `Err`
/// and fuses the iterator.
pub struct TokenStream<'p, 'src, V> {
    grammar: &'p Grammar<V>,
    input: &'src str,
    pos: usize,
    padding: usize,
    failed: bool,
}

impl<'p, 'src, V> TokenStream<'p, 'src, V> {
    pub(crate) fn new(grammar: &'p Grammar<V>, input: &'src str, padding: usize) -> Self {
        Self {
            grammar,
            input,
            pos: 0,
            padding,
            failed: false,
        }
    }
}

impl<'p, 'src, V: Default> Iterator for TokenStream<'p, 'src, V> {
    type Item = Result<Token<'src>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.pos = skip_whitespace(self.input, self.pos);
        if self.pos >= self.input.len() {
            return None;
        }

        let rest = &self.input[self.pos..];
        match best_match(self.grammar, self.grammar.terminal_ids(), rest) {
            Some((terminal, len)) => {
                let token = Token {
                    terminal,
                    raw: &rest[..len],
                    span: Span::of(self.pos, self.pos + len),
                };
                self.pos += len;
                Some(Ok(token))
            }
            None => {
                self.failed = true;
                let width = rest.chars().next().map_or(0, char::len_utf8);
                Some(Err(ParseError::unrecognised(
                    Span::of(self.pos, self.pos + width),
                    self.input,
                    self.padding,
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::GrammarBuilder;

    #[derive(Debug, Default, Clone, PartialEq)]
    enum Value {
        #[default]
        None,
    }

    fn stream_terminals(patterns: &[(&str, &str)], input: &str) -> Vec<String> {
        let mut builder = GrammarBuilder::<Value>::new();
        let mut first_id = None;
        for &(name, pattern) in patterns {
            let id = builder.terminal(name, pattern).unwrap();
            first_id.get_or_insert(id);
        }
        let start = builder.nonterminal("start");
        builder.rule(start, [first_id.unwrap().into()]);
        let grammar = builder.into_grammar(start).unwrap();

        crate::lexer::TokenStream::new(&grammar, input, 10)
            .map(|token| {
                let token = token.unwrap();
                grammar.terminal_name(token.terminal).to_string()
            })
            .collect()
    }

    #[test]
    fn test_longest_match_wins() {
        // "==" declared after "=" still wins on length.
        let tokens = stream_terminals(&[("=", r"="), ("==", r"==")], "== =");
        assert_eq!(tokens, ["==", "="]);
    }

    #[test]
    fn test_ties_go_to_earliest_declared() {
        let tokens = stream_terminals(&[("broad", r"[ab]+"), ("narrow", r"a+")], "aaa");
        assert_eq!(tokens, ["broad"]);
        let tokens = stream_terminals(&[("narrow", r"a+"), ("broad", r"[ab]+")], "aaa");
        assert_eq!(tokens, ["narrow"]);
    }

    #[test]
    fn test_whitespace_is_skipped() {
        let tokens = stream_terminals(&[("x", r"x")], "  x\t\nx  ");
        assert_eq!(tokens, ["x", "x"]);
    }

    #[test]
    fn test_unmatched_character_fuses_stream() {
        let mut builder = GrammarBuilder::<Value>::new();
        let x = builder.terminal("x", r"x").unwrap();
        let start = builder.nonterminal("start");
        builder.rule(start, [x.into()]);
        let grammar = builder.into_grammar(start).unwrap();

        let mut stream = crate::lexer::TokenStream::new(&grammar, "x?x", 10);
        assert!(stream.next().unwrap().is_ok());
        let error = stream.next().unwrap().unwrap_err();
        assert_eq!(error.span().start, 1);
        assert!(stream.next().is_none());
    }
}
