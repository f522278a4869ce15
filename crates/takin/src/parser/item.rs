//! LR(0) items, kernels, closure and transitions.

use crate::grammar::{Grammar, RuleId, Symbol};
use hashbrown::HashSet;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// A production rule with a dot marking how much has been recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Item {
    pub(crate) rule: RuleId,
    pub(crate) dot: usize,
}

impl Item {
    pub(crate) const fn start(rule: RuleId) -> Self {
        Self { rule, dot: 0 }
    }

    pub(crate) const fn advance(self) -> Self {
        Self {
            rule: self.rule,
            dot: self.dot + 1,
        }
    }

    pub(crate) fn complete<V: Default>(self, grammar: &Grammar<V>) -> bool {
        self.dot >= grammar.rule(self.rule).sequence.len()
    }

    pub(crate) fn next_symbol<V: Default>(self, grammar: &Grammar<V>) -> Option<Symbol> {
        grammar.rule(self.rule).sequence.get(self.dot).copied()
    }
}

/// Kernel of a state: its defining items, kept sorted and deduplicated so
/// that kernel equality is plain sequence equality and kernels can key the
/// state map directly.
pub(crate) type Kernel = SmallVec<[Item; 8]>;

/// The closure of a kernel: every non-terminal sitting right after a dot
/// contributes the start items of all its rules, each expanded once.
pub(crate) fn closure<V: Default>(grammar: &Grammar<V>, kernel: &[Item]) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::with_capacity(kernel.len());
    let mut seen: HashSet<Item, ahash::RandomState> = HashSet::default();
    for &item in kernel {
        if seen.insert(item) {
            items.push(item);
        }
    }

    let mut i = 0;
    while i < items.len() {
        if let Some(Symbol::NonTerminal(nonterminal)) = items[i].next_symbol(grammar) {
            for &rule in grammar.rules_of(nonterminal) {
                let item = Item::start(rule);
                if seen.insert(item) {
                    items.push(item);
                }
            }
        }
        i += 1;
    }

    items
}

/// The kernels reachable from a closure in one step: for every symbol after
/// a dot, the advanced items grouped by that symbol. Ordered by `Symbol` so
/// state numbering is deterministic.
pub(crate) fn transitions<V: Default>(
    grammar: &Grammar<V>,
    closure: &[Item],
) -> BTreeMap<Symbol, Kernel> {
    let mut map: BTreeMap<Symbol, Kernel> = BTreeMap::new();
    for &item in closure {
        if let Some(symbol) = item.next_symbol(grammar) {
            map.entry(symbol).or_default().push(item.advance());
        }
    }
    for kernel in map.values_mut() {
        kernel.sort_unstable();
        kernel.dedup();
    }
    map
}
