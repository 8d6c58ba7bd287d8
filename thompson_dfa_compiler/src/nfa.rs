use std::fmt;

use bitvec::vec::BitVec;

/// A state ID in the NFA
pub type StateId = usize;

/// What a transition consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Exactly this character
    Char(char),
    /// Any character in the inclusive range
    Range(char, char),
}

impl Symbol {
    /// Check if the symbol accepts `c`
    pub fn matches(&self, c: char) -> bool {
        match *self {
            Symbol::Char(s) => s == c,
            Symbol::Range(lo, hi) => lo <= c && c <= hi,
        }
    }

    /// The inclusive `(lo, hi)` bounds of the symbol
    pub fn bounds(&self) -> (char, char) {
        match *self {
            Symbol::Char(c) => (c, c),
            Symbol::Range(lo, hi) => (lo, hi),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Symbol::Char(c) => write!(f, "{:?}", c),
            Symbol::Range(lo, hi) => write!(f, "{:?}-{:?}", lo, hi),
        }
    }
}

/// A transition that consumes one symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub symbol: Symbol,
    pub target: StateId,
}

/// A Thompson NFA state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// Transitions that consume one input symbol
    pub transitions: Vec<Transition>,
    /// Transitions that consume nothing
    pub epsilons: Vec<StateId>,
}

/// Fragment of an NFA with one start and one accept state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub accept: StateId,
}

/// A Thompson NFA
///
/// States live in one arena and refer to each other by index. The NFA has
/// exactly one start and one accept state and the accept state never has
/// outgoing transitions.
#[derive(Clone, PartialEq, Eq)]
pub struct NFA {
    /// All states in the NFA
    pub states: Vec<State>,
    /// Starting state
    pub start: StateId,
    /// Accepting state
    pub accept: StateId,
}

impl NFA {
    /// Create a new empty NFA
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            start: 0,
            accept: 0,
        }
    }

    /// Add a new state without transitions and return its ID
    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(State::default());
        id
    }

    /// Add a transition on `symbol` from `from` to `to`
    pub fn add_transition(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.states[from].transitions.push(Transition { symbol, target: to });
    }

    /// Connect two states with an epsilon transition
    pub fn connect(&mut self, from: StateId, to: StateId) {
        self.states[from].epsilons.push(to);
    }

    /// Create a fragment `start --symbol--> accept`
    pub fn symbol(&mut self, symbol: Symbol) -> Fragment {
        let start = self.add_state();
        let accept = self.add_state();
        self.add_transition(start, symbol, accept);
        Fragment { start, accept }
    }

    /// Number of states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// An empty set sized for this NFA
    pub fn empty_set(&self) -> BitVec {
        BitVec::repeat(false, self.states.len())
    }

    /// Grow `set` into its epsilon closure, in place
    pub fn epsilon_closure(&self, set: &mut BitVec) {
        let mut stack: Vec<StateId> = set.iter_ones().collect();

        while let Some(state_id) = stack.pop() {
            for &next in &self.states[state_id].epsilons {
                if !set[next] {
                    set.set(next, true);
                    stack.push(next);
                }
            }
        }
    }

    /// Targets of every `c` transition leaving a state in `set`
    pub fn step(&self, set: &BitVec, c: char) -> BitVec {
        let mut next = self.empty_set();
        for state_id in set.iter_ones() {
            for transition in &self.states[state_id].transitions {
                if transition.symbol.matches(c) {
                    next.set(transition.target, true);
                }
            }
        }
        next
    }

    /// Check if the set contains the accepting state
    pub fn is_accepting(&self, set: &BitVec) -> bool {
        set[self.accept]
    }

    /// Run the NFA directly against `input`, tracking every live state.
    ///
    /// This is much slower than the DFA and only exists to check the DFA
    /// against.
    pub fn is_match(&self, input: &str) -> bool {
        let mut current = self.empty_set();
        current.set(self.start, true);
        self.epsilon_closure(&mut current);

        for c in input.chars() {
            current = self.step(&current, c);
            if current.not_any() {
                return false;
            }
            self.epsilon_closure(&mut current);
        }
        self.is_accepting(&current)
    }
}

impl Default for NFA {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "thompson::NFA(")?;
        for (id, state) in self.states.iter().enumerate() {
            let status = if id == self.start {
                '>'
            } else if id == self.accept {
                '*'
            } else {
                ' '
            };
            write!(f, "{}{:06}:", status, id)?;
            for transition in &state.transitions {
                write!(f, " {} => {}", transition.symbol, transition.target)?;
            }
            if !state.epsilons.is_empty() {
                write!(f, " eps{:?}", state.epsilons)?;
            }
            writeln!(f)?;
        }
        write!(f, ")")
    }
}
