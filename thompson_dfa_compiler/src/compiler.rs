use crate::{
    expand::Canonical,
    nfa::{Fragment, Symbol, NFA},
    stack::Stack,
    CompileError, CompileResult,
};

/// An operator waiting on the operator stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    /// Implicit concatenation, at the offset of its right operand
    Concat { index: usize },
    /// `|`
    Union { index: usize },
    /// `(`, a barrier that only its `)` removes
    Open { index: usize },
}

impl Operator {
    fn precedence(&self) -> u8 {
        match self {
            Operator::Concat { .. } => 2,
            Operator::Union { .. } => 1,
            Operator::Open { .. } => 0,
        }
    }

    fn index(&self) -> usize {
        match *self {
            Operator::Concat { index } | Operator::Union { index } | Operator::Open { index } => index,
        }
    }
}

/// What the previous token left behind, used to spot missing operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Nothing,
    Operand,
    Union(usize),
    Open(usize),
}

/// Compiler that converts a canonical pattern to a Thompson NFA
///
/// Operands are fragments on one stack and pending operators sit on a
/// second stack. `*` binds tightest and is applied as soon as it is read,
/// concatenation binds tighter than `|`, and `(` holds back every operator
/// pushed after it until its `)` arrives.
pub struct Compiler {
    nfa: NFA,
    operands: Stack<Fragment>,
    operators: Stack<Operator>,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self {
            nfa: NFA::new(),
            operands: Stack::new(),
            operators: Stack::new(),
        }
    }

    /// Compile a canonical pattern to a Thompson NFA
    pub fn compile(mut self, pattern: &Canonical) -> CompileResult<NFA> {
        let symbols: Vec<(usize, char)> = pattern.iter().collect();
        let mut last = Last::Nothing;
        let mut i = 0;

        while i < symbols.len() {
            let (index, c) = symbols[i];
            match c {
                '*' => {
                    if last != Last::Operand {
                        return Err(CompileError::DanglingOperator { index });
                    }
                    let inner = self.pop_operand(index)?;
                    let fragment = self.compile_star(inner);
                    self.operands.push(fragment);
                }
                '|' => {
                    if last != Last::Operand {
                        return Err(CompileError::DanglingOperator { index });
                    }
                    self.push_operator(Operator::Union { index })?;
                    last = Last::Union(index);
                }
                '(' => {
                    if last == Last::Operand {
                        self.push_operator(Operator::Concat { index })?;
                    }
                    self.operators.push(Operator::Open { index });
                    last = Last::Open(index);
                }
                ')' => {
                    match last {
                        Last::Operand => {}
                        Last::Open(open) => return Err(CompileError::EmptyPattern { index: open }),
                        Last::Union(union) => return Err(CompileError::DanglingOperator { index: union }),
                        Last::Nothing => return Err(CompileError::UnbalancedGroup { index }),
                    }
                    self.close_group(index)?;
                    last = Last::Operand;
                }
                '[' | ']' => return Err(CompileError::UnbalancedBracket { index }),
                '-' => return Err(CompileError::MalformedRange { index }),
                _ => {
                    let (symbol, width) = symbol_at(pattern, &symbols, i)?;
                    if last == Last::Operand {
                        self.push_operator(Operator::Concat { index })?;
                    }
                    let fragment = self.nfa.symbol(symbol);
                    self.operands.push(fragment);
                    last = Last::Operand;
                    i += width;
                    continue;
                }
            }
            i += 1;
        }

        match last {
            Last::Operand => {}
            Last::Nothing => return Err(CompileError::EmptyPattern { index: 0 }),
            Last::Union(union) => return Err(CompileError::DanglingOperator { index: union }),
            Last::Open(open) => return Err(CompileError::UnbalancedGroup { index: open }),
        }

        while let Some(op) = self.operators.pop() {
            if let Operator::Open { index } = op {
                return Err(CompileError::UnbalancedGroup { index });
            }
            self.reduce(op)?;
        }

        let end = symbols.last().map_or(0, |&(index, _)| index);
        let fragment = self.pop_operand(end)?;
        if !self.operands.is_empty() {
            return Err(CompileError::DanglingOperator { index: end });
        }

        self.nfa.start = fragment.start;
        self.nfa.accept = fragment.accept;
        trace!(
            "compiled {} canonical symbols into {} NFA states",
            symbols.len(),
            self.nfa.len()
        );
        Ok(self.nfa)
    }

    fn pop_operand(&mut self, index: usize) -> CompileResult<Fragment> {
        self.operands.pop().ok_or(CompileError::DanglingOperator { index })
    }

    /// Reduce every stacked operator that binds at least as tightly as
    /// `op`, then stack `op`.
    fn push_operator(&mut self, op: Operator) -> CompileResult<()> {
        while let Some(&top) = self.operators.peek() {
            if top.precedence() < op.precedence() {
                break;
            }
            self.operators.pop();
            self.reduce(top)?;
        }
        self.operators.push(op);
        Ok(())
    }

    /// Reduce operators down to and including the `(` matching the `)` at
    /// `index`.
    fn close_group(&mut self, index: usize) -> CompileResult<()> {
        loop {
            match self.operators.pop() {
                Some(Operator::Open { .. }) => return Ok(()),
                Some(op) => self.reduce(op)?,
                None => return Err(CompileError::UnbalancedGroup { index }),
            }
        }
    }

    /// Apply a binary operator to the two topmost fragments
    fn reduce(&mut self, op: Operator) -> CompileResult<()> {
        let right = self.pop_operand(op.index())?;
        let left = self.pop_operand(op.index())?;
        let fragment = match op {
            Operator::Concat { .. } => self.compile_concat(left, right),
            Operator::Union { .. } => self.compile_alternation(left, right),
            Operator::Open { index } => return Err(CompileError::UnbalancedGroup { index }),
        };
        self.operands.push(fragment);
        Ok(())
    }

    /// Compile concatenation: `first` then `second`
    fn compile_concat(&mut self, first: Fragment, second: Fragment) -> Fragment {
        self.nfa.connect(first.accept, second.start);
        Fragment {
            start: first.start,
            accept: second.accept,
        }
    }

    /// Compile alternation: fresh start and accept around both branches
    fn compile_alternation(&mut self, left: Fragment, right: Fragment) -> Fragment {
        let start = self.nfa.add_state();
        let accept = self.nfa.add_state();

        self.nfa.connect(start, left.start);
        self.nfa.connect(start, right.start);
        self.nfa.connect(left.accept, accept);
        self.nfa.connect(right.accept, accept);

        Fragment { start, accept }
    }

    /// Compile * quantifier
    fn compile_star(&mut self, expr: Fragment) -> Fragment {
        let start = self.nfa.add_state();
        let accept = self.nfa.add_state();

        self.nfa.connect(start, expr.start);
        self.nfa.connect(start, accept);
        // Loop back for multiple matches, or leave.
        self.nfa.connect(expr.accept, expr.start);
        self.nfa.connect(expr.accept, accept);

        Fragment { start, accept }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the literal or `d-d` range token starting at `symbols[i]`.
///
/// Only a dash the expander marked as a range dash joins two digits; a
/// bare `1-5` in a raw pattern is a malformed range, not a class.
/// Returns the symbol and how many canonical characters it spans.
fn symbol_at(pattern: &Canonical, symbols: &[(usize, char)], i: usize) -> CompileResult<(Symbol, usize)> {
    let (_, c) = symbols[i];
    match symbols.get(i + 1) {
        Some(&(dash, '-')) if !pattern.is_range_dash(i + 1) => Err(CompileError::MalformedRange { index: dash }),
        Some(&(dash, '-')) if c.is_ascii_digit() => match symbols.get(i + 2) {
            Some(&(_, hi)) if hi.is_ascii_digit() && c <= hi => Ok((Symbol::Range(c, hi), 3)),
            _ => Err(CompileError::MalformedRange { index: dash }),
        },
        _ => Ok((Symbol::Char(c), 1)),
    }
}
