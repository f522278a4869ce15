//! ACTION/GOTO table compilation with conflict resolution.
//!
//! States are enumerated breadth-first from the start kernel; shift and
//! goto entries come from the transition function, reduce entries from the
//! complete kernel items over the FOLLOW set of their left-hand side.
//!
//! Shift-reduce conflicts resolve by precedence first (the rule carries the
//! precedence of its last terminal; the smaller value, i.e. the earlier
//! declaration, binds tighter), then by the lookahead's associativity: left
//! reduces, right shifts, none is fatal. Reduce-reduce conflicts are always
//! fatal. The accept entry is written last: state 0 accepts end-of-stream,
//! and the goto of the start symbol from state 0 loops back to state 0,
//! which augments the grammar without a synthetic start rule.

use super::item::{self, Item, Kernel};
use crate::error::DefinitionError;
use crate::grammar::{Grammar, NonTerminalId, RuleId, StateId, Symbol, TerminalId};
use hashbrown::HashMap;
use smallvec::SmallVec;

/// A resolved parse action for one `(state, terminal)` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(StateId),
    Reduce(RuleId),
    Accept,
}

pub(crate) type ActionRow = HashMap<TerminalId, Action, ahash::RandomState>;
pub(crate) type GotoRow = HashMap<NonTerminalId, StateId, ahash::RandomState>;

#[derive(Debug)]
pub(crate) struct Tables {
    pub(crate) action: Vec<ActionRow>,
    pub(crate) goto: Vec<GotoRow>,
}

/// Builds the canonical LR(0) collection and compiles it into ACTION/GOTO.
pub(crate) fn compile<V: Default>(grammar: &Grammar<V>) -> Result<Tables, DefinitionError> {
    let mut start_kernel: Kernel = grammar
        .rules_of(grammar.start())
        .iter()
        .map(|&rule| Item::start(rule))
        .collect();
    start_kernel.sort_unstable();
    start_kernel.dedup();

    let mut states: Vec<Kernel> = vec![start_kernel.clone()];
    let mut index: HashMap<Kernel, StateId, ahash::RandomState> = HashMap::default();
    index.insert(start_kernel, StateId::START);

    let mut action: Vec<ActionRow> = vec![ActionRow::default()];
    let mut goto: Vec<GotoRow> = vec![GotoRow::default()];

    let mut i = 0;
    while i < states.len() {
        let kernel = states[i].clone();
        let closure = item::closure(grammar, &kernel);

        for (symbol, target_kernel) in item::transitions(grammar, &closure) {
            let target = match index.get(&target_kernel) {
                Some(&id) => id,
                None => {
                    let id = StateId::from_index(states.len());
                    states.push(target_kernel.clone());
                    index.insert(target_kernel, id);
                    action.push(ActionRow::default());
                    goto.push(GotoRow::default());
                    id
                }
            };
            match symbol {
                Symbol::Terminal(terminal) => {
                    action[i].insert(terminal, Action::Shift(target));
                }
                Symbol::NonTerminal(nonterminal) => {
                    goto[i].insert(nonterminal, target);
                }
            }
        }

        // Reduce entries come from complete kernel items. Complete items
        // always sit in kernels: the dot can only be at position zero in a
        // start item, and empty sequences are rejected at build time.
        for &complete in kernel.iter().filter(|item| item.complete(grammar)) {
            let rule = grammar.rule(complete.rule);
            let mut lookaheads: SmallVec<[TerminalId; 8]> =
                grammar.follow[rule.lhs.index()].iter().copied().collect();
            lookaheads.sort_unstable();

            for lookahead in lookaheads {
                match action[i].get(&lookahead).copied() {
                    None => {
                        action[i].insert(lookahead, Action::Reduce(complete.rule));
                    }
                    Some(Action::Shift(target)) => {
                        let terminal = grammar.terminal(lookahead);
                        let prefer_reduce = match rule.precedence {
                            Some(p) if p < terminal.precedence => Some(true),
                            Some(p) if p > terminal.precedence => Some(false),
                            _ => match terminal.associativity {
                                crate::grammar::Associativity::Left => Some(true),
                                crate::grammar::Associativity::Right => Some(false),
                                crate::grammar::Associativity::None => None,
                            },
                        };
                        match prefer_reduce {
                            Some(true) => {
                                log::debug!(
                                    "state {i}: reduce {} over shift on {}",
                                    grammar.rule_display(complete.rule, None),
                                    terminal.name,
                                );
                                action[i].insert(lookahead, Action::Reduce(complete.rule));
                            }
                            Some(false) => {
                                log::debug!(
                                    "state {i}: shift {} over reduce {}",
                                    terminal.name,
                                    grammar.rule_display(complete.rule, None),
                                );
                            }
                            None => {
                                return Err(DefinitionError::ShiftReduceConflict {
                                    state: i,
                                    rule: grammar.rule_display(complete.rule, Some(complete.dot)),
                                    lookahead: terminal.name.clone(),
                                    shift_target: target.index(),
                                    closure: render_items(grammar, &closure),
                                });
                            }
                        }
                    }
                    Some(Action::Reduce(other)) => {
                        if other != complete.rule {
                            return Err(DefinitionError::ReduceReduceConflict {
                                state: i,
                                rule_a: grammar.rule_display(other, None),
                                rule_b: grammar.rule_display(complete.rule, None),
                                lookahead: grammar.terminal(lookahead).name.clone(),
                                closure: render_items(grammar, &closure),
                            });
                        }
                    }
                    Some(Action::Accept) => {}
                }
            }
        }

        i += 1;
    }

    // Implicit augmentation: state 0 accepts end-of-stream, and reducing to
    // the start symbol at the bottom of the stack returns to state 0.
    action[0].insert(grammar.eos(), Action::Accept);
    goto[0].insert(grammar.start(), StateId::START);

    log::debug!("compiled {} lr(0) states", states.len());

    Ok(Tables { action, goto })
}

fn render_items<V: Default>(grammar: &Grammar<V>, items: &[Item]) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("    {}", grammar.rule_display(item.rule, Some(item.dot))))
        .collect();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Associativity, GrammarBuilder};

    #[derive(Debug, Default, Clone, PartialEq)]
    enum Value {
        #[default]
        None,
    }

    #[test]
    fn test_accept_and_start_goto_are_augmented() {
        let mut builder = GrammarBuilder::<Value>::new();
        let number = builder.terminal("number", r"\d+").unwrap();
        let expression = builder.nonterminal("expression");
        let program = builder.nonterminal("program");
        builder.rule(expression, [number.into()]);
        builder.rule(program, [expression.into()]);

        let grammar = builder.into_grammar(program).unwrap();
        let tables = compile(&grammar).unwrap();

        assert_eq!(
            tables.action[0].get(&grammar.eos()).copied(),
            Some(Action::Accept)
        );
        assert_eq!(
            tables.goto[0].get(&grammar.start()).copied(),
            Some(StateId::START)
        );
    }

    #[test]
    fn test_left_associativity_prefers_reduce() {
        let mut builder = GrammarBuilder::<Value>::new();
        let number = builder.terminal("number", r"\d+").unwrap();
        let plus = builder.terminal_assoc("+", r"\+", Associativity::Left).unwrap();
        let expression = builder.nonterminal("expression");
        let program = builder.nonterminal("program");
        builder.rule(expression, [expression.into(), plus.into(), expression.into()]);
        builder.rule(expression, [number.into()]);
        builder.rule(program, [expression.into()]);

        let grammar = builder.into_grammar(program).unwrap();
        let tables = compile(&grammar).unwrap();

        // Some state holds `expression -> expression + expression ·`; on
        // lookahead `+` it must reduce, not shift.
        let reduced = tables.action.iter().any(|row| {
            matches!(row.get(&plus), Some(Action::Reduce(_)))
        });
        assert!(reduced);
    }

    #[test]
    fn test_missing_associativity_is_a_conflict() {
        let mut builder = GrammarBuilder::<Value>::new();
        let number = builder.terminal("number", r"\d+").unwrap();
        let plus = builder.terminal("+", r"\+").unwrap();
        let expression = builder.nonterminal("expression");
        let program = builder.nonterminal("program");
        builder.rule(expression, [expression.into(), plus.into(), expression.into()]);
        builder.rule(expression, [number.into()]);
        builder.rule(program, [expression.into()]);

        let grammar = builder.into_grammar(program).unwrap();
        let error = compile(&grammar).unwrap_err();
        assert!(matches!(
            error,
            DefinitionError::ShiftReduceConflict { .. }
        ));
    }
}
