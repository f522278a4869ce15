//! Binding between a terminal and its lexeme pattern.
//!
//! The core never interprets patterns itself; it only needs "match this
//! pattern against the input prefix and report the matched length". That
//! contract is realised here over `regex-automata` with anchored searches.

use regex_automata::meta::{BuildError, Regex};
use regex_automata::{Anchored, Input};

/// A compiled lexeme pattern, matched anchored at the current input
/// position.
#[derive(Debug)]
pub(crate) struct TokenPattern {
    regex: Regex,
}

impl TokenPattern {
    pub(crate) fn new(pattern: &str) -> Result<Self, BuildError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Length in bytes of the match at the start of `haystack`, if any.
    pub(crate) fn match_prefix(&self, haystack: &str) -> Option<usize> {
        let input = Input::new(haystack).anchored(Anchored::Yes);
        self.regex.find(input).map(|m| m.end())
    }
}
