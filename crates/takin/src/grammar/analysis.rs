//! FIRST and FOLLOW set computation.
//!
//! Both sets are grown by chaotic iteration over the flattened rule list
//! until a full pass changes nothing. The sets are finite and only ever
//! grow, so both loops terminate. Epsilon productions are rejected at build
//! time, so FIRST only needs the head symbol of each sequence.

use super::{NonTerminalId, RuleData, RuleId, Symbol, TerminalId, TerminalSet};
use smallvec::SmallVec;

type Buf = SmallVec<[TerminalId; 8]>;

/// For every non-terminal, the terminals that can begin one of its
/// derivations.
pub(crate) fn first_sets<V>(
    rules: &[RuleData<V>],
    flat: &[RuleId],
    nonterminal_count: usize,
) -> Vec<TerminalSet> {
    let mut first = vec![TerminalSet::default(); nonterminal_count];

    let mut changed = true;
    while changed {
        changed = false;
        for &id in flat {
            let rule = &rules[id.index()];
            let Some(&head) = rule.sequence.first() else {
                continue;
            };
            match head {
                Symbol::Terminal(t) => {
                    changed |= first[rule.lhs.index()].insert(t);
                }
                Symbol::NonTerminal(child) => {
                    if child == rule.lhs {
                        continue;
                    }
                    let inherited: Buf = first[child.index()].iter().copied().collect();
                    let parent = &mut first[rule.lhs.index()];
                    for t in inherited {
                        changed |= parent.insert(t);
                    }
                }
            }
        }
    }

    first
}

/// For every non-terminal, the terminals that can appear immediately after
/// one of its derivations in a sentential form. Seeded with end-of-stream on
/// the start symbol.
pub(crate) fn follow_sets<V>(
    rules: &[RuleData<V>],
    flat: &[RuleId],
    nonterminal_count: usize,
    start: NonTerminalId,
    eos: TerminalId,
    first: &[TerminalSet],
) -> Vec<TerminalSet> {
    let mut follow = vec![TerminalSet::default(); nonterminal_count];
    follow[start.index()].insert(eos);

    let mut changed = true;
    while changed {
        changed = false;
        for &id in flat {
            let rule = &rules[id.index()];
            for (i, &symbol) in rule.sequence.iter().enumerate() {
                let Symbol::NonTerminal(current) = symbol else {
                    continue;
                };

                // Last position inherits the whole FOLLOW of the parent.
                if i + 1 == rule.sequence.len() {
                    let inherited: Buf = follow[rule.lhs.index()].iter().copied().collect();
                    let target = &mut follow[current.index()];
                    for t in inherited {
                        changed |= target.insert(t);
                    }
                    continue;
                }

                match rule.sequence[i + 1] {
                    Symbol::Terminal(t) => {
                        changed |= follow[current.index()].insert(t);
                    }
                    Symbol::NonTerminal(next) => {
                        let inherited: Buf = first[next.index()].iter().copied().collect();
                        let target = &mut follow[current.index()];
                        for t in inherited {
                            changed |= target.insert(t);
                        }
                    }
                }
            }
        }
    }

    follow
}
