//! # Grammar Module
//!
//! Symbol model and assembly for context-free grammars.
//!
//! ## Overview
//!
//! A grammar is assembled in host code through [`GrammarBuilder`]:
//!
//! - **Terminals** bind a name to a regex pattern, an optional *reasoner*
//!   (turning a matched lexeme into a semantic value) and an associativity.
//!   Each terminal receives a precedence from a definition-order counter;
//!   terminals declared earlier bind tighter.
//! - **Non-terminals** are declared up front (so recursive references are
//!   expressible) and own an ordered list of production rules.
//! - **Rules** are sequences of [`Symbol`]s with an optional *transducer*
//!   combining child values into the parent value. A rule inherits the
//!   precedence of the last terminal in its sequence.
//!
//! Building walks the symbol graph from the start non-terminal, flattens the
//! reachable productions and computes the FIRST and FOLLOW sets that the
//! table compiler consumes.
//!
//! The semantic value type `V` is supplied by the embedder. It only needs to
//! be default-constructible and movable; the library never inspects it.

pub mod analysis;
pub mod builder;
pub mod ids;

pub use builder::GrammarBuilder;
pub use ids::{NonTerminalId, RuleId, StateId, TerminalId};

use crate::lexer::pattern::TokenPattern;
use crate::lexer::{Token, ValueToken};
use compact_str::CompactString;
use hashbrown::HashSet;
use smallvec::SmallVec;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Per-terminal callback turning a matched lexeme into a semantic value.
pub type Reasoner<V> = Box<dyn Fn(&Token<'_>) -> V + Send + Sync>;

/// Per-rule callback combining child semantic values into the parent value.
/// Children arrive mutably so values can be moved out with [`ValueToken::take`].
pub type Transducer<V> = Box<dyn Fn(&mut [ValueToken<V>]) -> V + Send + Sync>;

pub(crate) type TerminalSet = HashSet<TerminalId, ahash::RandomState>;
pub(crate) type Sequence = SmallVec<[Symbol; 4]>;

/// Tie-breaker for shift-reduce conflicts between equal precedences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Associativity {
    #[default]
    None,
    Left,
    Right,
}

/// A grammar symbol: either a terminal or a non-terminal.
///
/// The derived order (terminals first, then by id) keeps transition maps and
/// state numbering deterministic across builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(TerminalId),
    NonTerminal(NonTerminalId),
}

impl From<TerminalId> for Symbol {
    fn from(id: TerminalId) -> Self {
        Self::Terminal(id)
    }
}

impl From<NonTerminalId> for Symbol {
    fn from(id: NonTerminalId) -> Self {
        Self::NonTerminal(id)
    }
}

pub(crate) struct TerminalData<V> {
    pub(crate) name: CompactString,
    /// `None` only for the synthetic end-of-stream terminal.
    pub(crate) pattern: Option<TokenPattern>,
    pub(crate) reasoner: Option<Reasoner<V>>,
    pub(crate) precedence: usize,
    pub(crate) associativity: Associativity,
}

impl<V: Default> TerminalData<V> {
    /// Runs the reasoner, or default-constructs the value when none is bound.
    pub(crate) fn reason(&self, token: &Token<'_>) -> V {
        match &self.reasoner {
            Some(reasoner) => reasoner(token),
            None => V::default(),
        }
    }
}

pub(crate) struct NonTerminalData {
    pub(crate) name: CompactString,
    pub(crate) rules: Vec<RuleId>,
}

pub(crate) struct RuleData<V> {
    pub(crate) lhs: NonTerminalId,
    pub(crate) sequence: Sequence,
    pub(crate) transducer: Option<Transducer<V>>,
    /// Precedence of the last terminal in the sequence; `None` when the
    /// sequence contains no terminal.
    pub(crate) precedence: Option<usize>,
}

impl<V: Default> RuleData<V> {
    /// Runs the transducer. Without one, a single-symbol alias rule passes
    /// its child's value through; anything else yields the default value.
    pub(crate) fn transduce(&self, children: &mut [ValueToken<V>]) -> V {
        if let Some(transducer) = &self.transducer {
            return transducer(children);
        }
        if children.len() == 1 {
            return std::mem::take(&mut children[0].value);
        }
        V::default()
    }
}

/// A fully assembled grammar: symbol arenas, the flattened reachable rules
/// and the computed FIRST/FOLLOW sets.
///
/// Immutable once built. Obtained through [`GrammarBuilder`] and owned by the
/// compiled parser.
pub struct Grammar<V> {
    pub(crate) terminals: Vec<TerminalData<V>>,
    pub(crate) nonterminals: Vec<NonTerminalData>,
    pub(crate) rules: Vec<RuleData<V>>,
    /// Reachable rules in registration order.
    pub(crate) flat: Vec<RuleId>,
    pub(crate) reachable: HashSet<NonTerminalId, ahash::RandomState>,
    /// Indexed by non-terminal id.
    pub(crate) first: Vec<TerminalSet>,
    pub(crate) follow: Vec<TerminalSet>,
    start: NonTerminalId,
    eos: TerminalId,
}

impl<V> std::fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar").finish_non_exhaustive()
    }
}

impl<V: Default> Grammar<V> {
    pub(crate) fn new(
        terminals: Vec<TerminalData<V>>,
        nonterminals: Vec<NonTerminalData>,
        rules: Vec<RuleData<V>>,
        flat: Vec<RuleId>,
        reachable: HashSet<NonTerminalId, ahash::RandomState>,
        start: NonTerminalId,
        eos: TerminalId,
    ) -> Self {
        let first = analysis::first_sets(&rules, &flat, nonterminals.len());
        let follow = analysis::follow_sets(&rules, &flat, nonterminals.len(), start, eos, &first);
        Self {
            terminals,
            nonterminals,
            rules,
            flat,
            reachable,
            first,
            follow,
            start,
            eos,
        }
    }

    /// The start non-terminal this grammar was built from.
    #[must_use]
    pub const fn start(&self) -> NonTerminalId {
        self.start
    }

    /// The distinguished end-of-stream terminal of this grammar.
    #[must_use]
    pub const fn eos(&self) -> TerminalId {
        self.eos
    }

    #[must_use]
    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.terminals[id.index()].name
    }

    #[must_use]
    pub fn nonterminal_name(&self, id: NonTerminalId) -> &str {
        &self.nonterminals[id.index()].name
    }

    /// Number of declared terminals, including the end-of-stream terminal.
    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    #[must_use]
    pub fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }

    /// All declared terminal ids in declaration (= precedence) order.
    pub fn terminal_ids(&self) -> impl Iterator<Item = TerminalId> {
        (0..self.terminals.len()).map(TerminalId::from_index)
    }

    /// Number of productions reachable from the start symbol.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.flat.len()
    }

    /// Length of a rule's symbol sequence.
    #[must_use]
    pub fn rule_arity(&self, id: RuleId) -> usize {
        self.rules[id.index()].sequence.len()
    }

    /// The non-terminal a rule reduces to.
    #[must_use]
    pub fn rule_lhs(&self, id: RuleId) -> NonTerminalId {
        self.rules[id.index()].lhs
    }

    /// Whether `terminal` can begin a derivation of `nonterminal`.
    #[must_use]
    pub fn first_contains(&self, nonterminal: NonTerminalId, terminal: TerminalId) -> bool {
        self.first[nonterminal.index()].contains(&terminal)
    }

    /// Whether `terminal` can follow a derivation of `nonterminal`.
    #[must_use]
    pub fn follow_contains(&self, nonterminal: NonTerminalId, terminal: TerminalId) -> bool {
        self.follow[nonterminal.index()].contains(&terminal)
    }

    /// Whether the non-terminal is reachable from the start symbol.
    #[must_use]
    pub fn is_reachable(&self, nonterminal: NonTerminalId) -> bool {
        self.reachable.contains(&nonterminal)
    }

    pub(crate) fn terminal(&self, id: TerminalId) -> &TerminalData<V> {
        &self.terminals[id.index()]
    }

    pub(crate) fn rule(&self, id: RuleId) -> &RuleData<V> {
        &self.rules[id.index()]
    }

    pub(crate) fn rules_of(&self, id: NonTerminalId) -> &[RuleId] {
        &self.nonterminals[id.index()].rules
    }

    pub(crate) fn symbol_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Terminal(t) => self.terminal_name(t),
            Symbol::NonTerminal(n) => self.nonterminal_name(n),
        }
    }

    /// Renders a rule as `lhs -> a b c`, with a `·` marker at `dot` when
    /// given. Used by conflict diagnostics.
    pub(crate) fn rule_display(&self, id: RuleId, dot: Option<usize>) -> String {
        let rule = self.rule(id);
        let mut out = String::from(self.nonterminal_name(rule.lhs));
        out.push_str(" ->");
        for (i, &symbol) in rule.sequence.iter().enumerate() {
            if dot == Some(i) {
                out.push_str(" ·");
            }
            out.push(' ');
            out.push_str(self.symbol_name(symbol));
        }
        if dot == Some(rule.sequence.len()) {
            out.push_str(" ·");
        }
        out
    }
}
