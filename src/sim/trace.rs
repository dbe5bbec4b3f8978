// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use crate::automaton::{State, Symbol};
use std::fmt::{Display, Formatter};

/// Copy of the stack at one point in time, bottom first. The floor marker is not included,
/// an empty snapshot means that only the floor is left.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct StackSnapshot(pub Vec<Symbol>);

impl StackSnapshot {
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn top(&self) -> Option<&Symbol> {
        self.0.last()
    }
}

impl Display for StackSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for symbol in self.0.iter() {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// One entry of an execution trace.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Step {
    /// Recorded before looking for a transition on `symbol`.
    Consumed {
        state: State,
        symbol: char,
        stack: StackSnapshot,
    },
    /// No transition applies. Always the last step of a rejected run.
    Rejected {
        state: State,
        symbol: char,
        stack: StackSnapshot,
    },
    /// All input was consumed. Always the last step of a run that was not rejected.
    Final { state: State, stack: StackSnapshot },
}

impl Step {
    pub fn state(&self) -> &State {
        match self {
            Step::Consumed { state, .. } | Step::Rejected { state, .. } | Step::Final { state, .. } => {
                state
            }
        }
    }

    pub fn stack(&self) -> &StackSnapshot {
        match self {
            Step::Consumed { stack, .. } | Step::Rejected { stack, .. } | Step::Final { stack, .. } => {
                stack
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Step::Consumed { .. })
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Consumed {
                state,
                symbol,
                stack,
            } => write!(f, "({state}, {symbol}, {stack})"),
            Step::Rejected {
                state,
                symbol,
                stack,
            } => write!(
                f,
                "Rejected at state {state} with input symbol {symbol} and stack {stack}"
            ),
            Step::Final { state, stack } => write!(f, "({state}, end, {stack})"),
        }
    }
}

/// Renders a trace with one step per line.
pub fn trace_to_str(trace: &[Step]) -> String {
    trace
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let stack = StackSnapshot(vec![Symbol::from('Z'), Symbol::from('P')]);
        let consumed = Step::Consumed {
            state: State::new("q0"),
            symbol: '(',
            stack: stack.clone(),
        };
        assert_eq!(consumed.to_string(), "(q0, (, ZP)");
        let rejected = Step::Rejected {
            state: State::new("q1"),
            symbol: '(',
            stack: StackSnapshot::default(),
        };
        assert_eq!(
            rejected.to_string(),
            "Rejected at state q1 with input symbol ( and stack "
        );
        let fin = Step::Final {
            state: State::new("q2"),
            stack,
        };
        assert_eq!(fin.to_string(), "(q2, end, ZP)");
        assert!(!consumed.is_terminal());
        assert!(rejected.is_terminal() && fin.is_terminal());
    }
}
