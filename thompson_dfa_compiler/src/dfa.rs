use std::collections::{HashMap, VecDeque};
use std::fmt;

use bitvec::vec::BitVec;

use crate::{
    alphabet::Alphabet,
    config::DEFAULT_STATE_LIMIT,
    nfa::{StateId, NFA},
    CompileError, CompileResult,
};

/// The reject sink. Every transition out of it leads back to it.
pub const DEAD: StateId = 0;

#[derive(Clone, PartialEq, Eq)]
struct DfaState {
    /// The epsilon-closed set of NFA states this DFA state stands for
    nfa_states: BitVec,
    accepting: bool,
}

/// A deterministic finite automaton
///
/// The transition table is total: one row per state, one column per
/// alphabet class. Missing transitions point at [`DEAD`], which is always
/// state `0`.
#[derive(Clone, PartialEq, Eq)]
pub struct DFA {
    alphabet: Alphabet,
    table: Vec<StateId>,
    states: Vec<DfaState>,
    start: StateId,
}

impl DFA {
    pub fn start_state(&self) -> StateId {
        self.start
    }

    /// The state reached from `state` on `c`
    #[inline]
    pub fn next_state(&self, state: StateId, c: char) -> StateId {
        match self.alphabet.class_of(c) {
            Some(class) => self.table[state * self.alphabet.len() + class],
            None => DEAD,
        }
    }

    /// The state reached from `state` on any member of alphabet `class`
    #[inline]
    pub fn next_state_for_class(&self, state: StateId, class: usize) -> StateId {
        self.table[state * self.alphabet.len() + class]
    }

    #[inline]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.states[state].accepting
    }

    #[inline]
    pub fn is_dead(&self, state: StateId) -> bool {
        state == DEAD
    }

    /// The NFA states that make up `state`, in ascending order
    pub fn nfa_states(&self, state: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.states[state].nfa_states.iter_ones()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of states, including the dead state
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dense::DFA(")?;
        for id in 0..self.len() {
            let status = if self.is_dead(id) {
                'D'
            } else if id == self.start {
                '>'
            } else {
                ' '
            };
            let accept = if self.is_accepting(id) { '*' } else { ' ' };
            write!(f, "{}{}{:06}:", status, accept, id)?;
            for (class, &(lo, hi)) in self.alphabet.classes().iter().enumerate() {
                let next = self.next_state_for_class(id, class);
                if self.is_dead(next) {
                    continue;
                }
                if lo == hi {
                    write!(f, " {:?} => {}", lo, next)?;
                } else {
                    write!(f, " {:?}-{:?} => {}", lo, hi, next)?;
                }
            }
            writeln!(f, " nfa{:?}", self.nfa_states(id).collect::<Vec<_>>())?;
        }
        write!(f, ")")
    }
}

/// Subset construction of a [`DFA`] from an [`NFA`]
#[derive(Clone, Debug)]
pub struct Determinizer {
    state_limit: Option<usize>,
}

impl Determinizer {
    /// A determinizer with the default state limit
    pub fn new() -> Self {
        Self {
            state_limit: Some(DEFAULT_STATE_LIMIT),
        }
    }

    /// Cap the number of DFA states, dead state included. `None` lets
    /// determinization grow without bound.
    pub fn state_limit(mut self, limit: Option<usize>) -> Self {
        self.state_limit = limit;
        self
    }

    /// Build the DFA equivalent to `nfa`.
    ///
    /// Unmarked states are processed in creation order, so the numbering
    /// of states only depends on the NFA.
    pub fn determinize(&self, nfa: &NFA) -> CompileResult<DFA> {
        let alphabet = Alphabet::from_nfa(nfa);
        trace!("determinizing {} NFA states over {:?}", nfa.len(), alphabet);
        let mut builder = Builder {
            dfa: DFA {
                alphabet,
                table: Vec::new(),
                states: Vec::new(),
                start: DEAD,
            },
            cache: HashMap::new(),
            state_limit: self.state_limit,
        };
        let mut worklist = VecDeque::new();

        let dead = builder.add_state(nfa, nfa.empty_set())?;
        debug_assert_eq!(dead, DEAD);

        let mut start = nfa.empty_set();
        start.set(nfa.start, true);
        nfa.epsilon_closure(&mut start);
        let start = builder.add_state(nfa, start)?;
        builder.dfa.start = start;
        worklist.push_back(start);

        let stride = builder.dfa.alphabet.len();
        while let Some(id) = worklist.pop_front() {
            for class in 0..stride {
                let c = builder.dfa.alphabet.representative(class);
                let mut next = nfa.step(&builder.dfa.states[id].nfa_states, c);
                let target = if next.not_any() {
                    DEAD
                } else {
                    nfa.epsilon_closure(&mut next);
                    match builder.cache.get(&next) {
                        Some(&existing) => existing,
                        None => {
                            let created = builder.add_state(nfa, next)?;
                            worklist.push_back(created);
                            created
                        }
                    }
                };
                builder.dfa.table[id * stride + class] = target;
            }
        }

        Ok(builder.dfa)
    }
}

impl Default for Determinizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Determinization state that lives only as long as one `determinize` call
struct Builder {
    dfa: DFA,
    cache: HashMap<BitVec, StateId>,
    state_limit: Option<usize>,
}

impl Builder {
    fn add_state(&mut self, nfa: &NFA, set: BitVec) -> CompileResult<StateId> {
        if let Some(limit) = self.state_limit {
            if self.dfa.states.len() >= limit {
                debug!("DFA state limit of {} exceeded", limit);
                return Err(CompileError::StateLimitExceeded { limit });
            }
        }
        let id = self.dfa.states.len();
        let accepting = nfa.is_accepting(&set);
        self.cache.insert(set.clone(), id);
        self.dfa.states.push(DfaState {
            nfa_states: set,
            accepting,
        });
        self.dfa
            .table
            .extend(std::iter::repeat(DEAD).take(self.dfa.alphabet.len()));
        Ok(id)
    }
}
