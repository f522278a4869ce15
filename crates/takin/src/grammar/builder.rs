//! Host-language surface for assembling grammars.

use super::{
    Associativity, Grammar, NonTerminalData, NonTerminalId, Reasoner, RuleData, RuleId, Symbol,
    TerminalData, TerminalId, Transducer,
};
use crate::error::DefinitionError;
use crate::lexer::pattern::TokenPattern;
use crate::lexer::{Token, ValueToken};
use crate::parser::{ParserConfig, SlrParser};
use hashbrown::HashSet;

/// Builder for grammars and the parsers compiled from them.
///
/// Terminals and non-terminals are declared first and referenced by the
/// returned ids; rules are then attached to their non-terminal. `build`
/// closes the grammar over everything reachable from the start symbol and
/// compiles the SLR(1) tables.
///
/// Terminal declaration order is significant twice over: it fixes the
/// precedence used to resolve shift-reduce conflicts (earlier = binds
/// tighter) and it breaks ties between equal-length lexer matches.
pub struct GrammarBuilder<V> {
    terminals: Vec<TerminalData<V>>,
    nonterminals: Vec<NonTerminalData>,
    rules: Vec<RuleData<V>>,
}

impl<V: Default> Default for GrammarBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Default> GrammarBuilder<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            terminals: Vec::new(),
            nonterminals: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Declares a terminal recognised by `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn terminal(&mut self, name: &str, pattern: &str) -> Result<TerminalId, DefinitionError> {
        self.insert_terminal(name, pattern, Associativity::None, None)
    }

    /// Declares a terminal with an associativity, typically an operator.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn terminal_assoc(
        &mut self,
        name: &str,
        pattern: &str,
        associativity: Associativity,
    ) -> Result<TerminalId, DefinitionError> {
        self.insert_terminal(name, pattern, associativity, None)
    }

    /// Declares a terminal with an associativity and a reasoner producing
    /// its semantic value from the matched lexeme.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn terminal_with(
        &mut self,
        name: &str,
        pattern: &str,
        associativity: Associativity,
        reasoner: impl Fn(&Token<'_>) -> V + Send + Sync + 'static,
    ) -> Result<TerminalId, DefinitionError> {
        self.insert_terminal(name, pattern, associativity, Some(Box::new(reasoner)))
    }

    fn insert_terminal(
        &mut self,
        name: &str,
        pattern: &str,
        associativity: Associativity,
        reasoner: Option<Reasoner<V>>,
    ) -> Result<TerminalId, DefinitionError> {
        let compiled = TokenPattern::new(pattern).map_err(|source| {
            DefinitionError::InvalidPattern {
                name: name.into(),
                source,
            }
        })?;
        let id = TerminalId::from_index(self.terminals.len());
        self.terminals.push(TerminalData {
            name: name.into(),
            pattern: Some(compiled),
            reasoner,
            precedence: id.index(),
            associativity,
        });
        Ok(id)
    }

    /// Declares a non-terminal. Rules are attached afterwards with
    /// [`rule`](Self::rule) and [`rule_with`](Self::rule_with), which keeps
    /// recursive references expressible.
    pub fn nonterminal(&mut self, name: &str) -> NonTerminalId {
        let id = NonTerminalId::from_index(self.nonterminals.len());
        self.nonterminals.push(NonTerminalData {
            name: name.into(),
            rules: Vec::new(),
        });
        id
    }

    /// Appends a production rule without a transducer. A single-symbol rule
    /// passes its child's value through; longer rules yield the default
    /// value.
    pub fn rule(
        &mut self,
        lhs: NonTerminalId,
        sequence: impl IntoIterator<Item = Symbol>,
    ) -> RuleId {
        self.insert_rule(lhs, sequence, None)
    }

    /// Appends a production rule with a transducer combining the child
    /// values into the parent value.
    pub fn rule_with(
        &mut self,
        lhs: NonTerminalId,
        sequence: impl IntoIterator<Item = Symbol>,
        transducer: impl Fn(&mut [ValueToken<V>]) -> V + Send + Sync + 'static,
    ) -> RuleId {
        self.insert_rule(lhs, sequence, Some(Box::new(transducer)))
    }

    fn insert_rule(
        &mut self,
        lhs: NonTerminalId,
        sequence: impl IntoIterator<Item = Symbol>,
        transducer: Option<Transducer<V>>,
    ) -> RuleId {
        let id = RuleId::from_index(self.rules.len());
        self.rules.push(RuleData {
            lhs,
            sequence: sequence.into_iter().collect(),
            transducer,
            precedence: None,
        });
        self.nonterminals[lhs.index()].rules.push(id);
        id
    }

    /// Compiles the grammar into an SLR(1) parser with the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for malformed grammars (empty rules,
    /// reachable non-terminals without rules) and for unresolvable table
    /// conflicts.
    pub fn build(self, start: NonTerminalId) -> Result<SlrParser<V>, DefinitionError> {
        self.build_with(start, ParserConfig::default())
    }

    /// Compiles the grammar into an SLR(1) parser.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub fn build_with(
        self,
        start: NonTerminalId,
        config: ParserConfig,
    ) -> Result<SlrParser<V>, DefinitionError> {
        let grammar = self.into_grammar(start)?;
        SlrParser::from_grammar(grammar, config)
    }

    /// Closes the grammar over everything reachable from `start`: registers
    /// the end-of-stream terminal, flattens the reachable rules, assigns
    /// rule precedences and computes FIRST/FOLLOW.
    pub(crate) fn into_grammar(mut self, start: NonTerminalId) -> Result<Grammar<V>, DefinitionError> {
        let eos = TerminalId::from_index(self.terminals.len());
        self.terminals.push(TerminalData {
            name: "$".into(),
            pattern: None,
            reasoner: None,
            precedence: eos.index(),
            associativity: Associativity::None,
        });

        // Depth-first walk from the start symbol.
        let mut reachable: HashSet<NonTerminalId, ahash::RandomState> = HashSet::default();
        let mut flat = Vec::new();
        let mut worklist = vec![start];
        while let Some(current) = worklist.pop() {
            if !reachable.insert(current) {
                continue;
            }
            for &rule_id in &self.nonterminals[current.index()].rules {
                flat.push(rule_id);
                for &symbol in &self.rules[rule_id.index()].sequence {
                    if let Symbol::NonTerminal(child) = symbol {
                        if !reachable.contains(&child) {
                            worklist.push(child);
                        }
                    }
                }
            }
        }

        for &nonterminal in &reachable {
            if self.nonterminals[nonterminal.index()].rules.is_empty() {
                return Err(DefinitionError::UndefinedNonTerminal {
                    name: self.nonterminals[nonterminal.index()].name.clone(),
                });
            }
        }

        // Rule precedence defaults to the precedence of the last terminal in
        // the sequence.
        for &rule_id in &flat {
            let rule = &self.rules[rule_id.index()];
            if rule.sequence.is_empty() {
                return Err(DefinitionError::EmptyRule {
                    nonterminal: self.nonterminals[rule.lhs.index()].name.clone(),
                });
            }
            let last_terminal = rule.sequence.iter().rev().find_map(|symbol| match symbol {
                Symbol::Terminal(t) => Some(*t),
                Symbol::NonTerminal(_) => None,
            });
            self.rules[rule_id.index()].precedence =
                last_terminal.map(|t| self.terminals[t.index()].precedence);
        }

        log::debug!(
            "grammar closed: {} non-terminals reachable, {} rules, {} terminals declared",
            reachable.len(),
            flat.len(),
            self.terminals.len(),
        );

        Ok(Grammar::new(
            self.terminals,
            self.nonterminals,
            self.rules,
            flat,
            reachable,
            start,
            eos,
        ))
    }
}
