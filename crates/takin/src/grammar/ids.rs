//! Small-integer identities for grammar symbols, rules and parser states.
//!
//! Every symbol is identified by a dense index into its arena, assigned in
//! declaration order and strictly increasing within a single builder. Ids of
//! different kinds are distinct types and never compared with one another.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Identity of a terminal within its grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TerminalId(pub(crate) u32);

/// Identity of a non-terminal within its grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct NonTerminalId(pub(crate) u32);

/// Identity of a production rule within its grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct RuleId(pub(crate) u32);

/// Identity of a state of the compiled LR(0) automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct StateId(pub(crate) u32);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).unwrap_or(u32::MAX))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(TerminalId);
impl_id!(NonTerminalId);
impl_id!(RuleId);
impl_id!(StateId);

impl StateId {
    /// The start state of every automaton.
    pub const START: Self = Self(0);
}
