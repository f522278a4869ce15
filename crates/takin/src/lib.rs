//! # Takin
//!
//! Define context-free grammars in host code and parse strings with the
//! SLR(1) method.
//!
//! ## Overview
//!
//! A grammar is assembled through [`GrammarBuilder`]: terminals bind regex
//! patterns to names (with an optional *reasoner* turning the matched lexeme
//! into a semantic value), non-terminals collect production rules (with an
//! optional *transducer* folding child values into the parent's value).
//! Building compiles the grammar into ACTION/GOTO tables; parsing runs a
//! shift-reduce loop over them with a state-aware longest-match tokeniser
//! and yields a single semantic value or a typed error.
//!
//! Operator precedence comes from declaration order (earlier terminals bind
//! tighter) and per-terminal associativity breaks the remaining
//! shift-reduce ties; unresolved conflicts fail the build with a rendered
//! diagnostic of the conflicting state.
//!
//! ## Quick Start
//!
//! ```rust
//! use takin::{Associativity, GrammarBuilder};
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! enum Value {
//!     #[default]
//!     None,
//!     Number(f64),
//! }
//!
//! fn number_of(value: &Value) -> f64 {
//!     match value {
//!         Value::Number(n) => *n,
//!         Value::None => f64::NAN,
//!     }
//! }
//!
//! let mut builder = GrammarBuilder::<Value>::new();
//!
//! let number = builder.terminal_with("number", r"\d+(\.\d+)?", Associativity::None, |token| {
//!     Value::Number(token.raw.parse().unwrap_or(f64::NAN))
//! })?;
//! let plus = builder.terminal_assoc("+", r"\+", Associativity::Left)?;
//!
//! let expression = builder.nonterminal("expression");
//! builder.rule_with(
//!     expression,
//!     [expression.into(), plus.into(), expression.into()],
//!     |children| Value::Number(number_of(&children[0].value) + number_of(&children[2].value)),
//! );
//! builder.rule(expression, [number.into()]);
//!
//! let program = builder.nonterminal("program");
//! builder.rule(program, [expression.into()]);
//!
//! let parser = builder.build(program)?;
//! assert_eq!(parser.parse("1 + 2 + 3")?, Value::Number(6.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - symbol model, grammar assembly, FIRST/FOLLOW analysis
//! - [`lexer`] - pattern binding and the longest-match scanners
//! - [`parser`] - table compilation, conflict resolution, the parse driver
//! - [`error`] - definition and parse errors
//! - [`text`] - spans and diagnostic snippet rendering

pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod text;

pub use error::{DefinitionError, ParseError};
pub use grammar::{
    Associativity, Grammar, GrammarBuilder, NonTerminalId, RuleId, StateId, Symbol, TerminalId,
};
pub use lexer::{Token, TokenStream, ValueToken};
pub use parser::{Action, ParserConfig, SlrParser};
pub use text::Span;
