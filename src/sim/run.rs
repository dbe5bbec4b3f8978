// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use super::trace::{StackSnapshot, Step};
use crate::automaton::{Automaton, Rule, State, Symbol};

/// Simulates `automaton` on `input`, one character at a time.
///
/// Returns whether the input was accepted together with the execution trace. The first
/// character for which no rule applies rejects the input right away. Otherwise the input
/// is accepted iff the automaton ends up in an accept state; the stack contents do not
/// matter and no epsilon moves are taken after the last character.
pub fn process_string(automaton: &Automaton, input: &str) -> (bool, Vec<Step>) {
    let mut run = Run::new(automaton);
    for c in input.chars() {
        if !run.step(c) {
            break;
        }
    }
    run.finish()
}

/// Convenience wrapper around [`process_string`] that drops the trace.
pub fn accepts(automaton: &Automaton, input: &str) -> bool {
    process_string(automaton, input).0
}

/// A single simulation run. Only borrows the automaton, so any number of runs can
/// proceed side by side.
pub struct Run<'a> {
    automaton: &'a Automaton,
    state: State,
    /// Stack contents above the floor, top is last.
    stack: Vec<Symbol>,
    trace: Vec<Step>,
    rejected: bool,
    step_count: u64,
}

impl<'a> Run<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            state: automaton.start.clone(),
            stack: Vec::new(),
            trace: Vec::new(),
            rejected: false,
            step_count: 0,
        }
    }

    /// Consumes `c`. Returns false if the run has been rejected, in which case all further
    /// calls are ignored.
    pub fn step(&mut self, c: char) -> bool {
        if self.rejected {
            return false;
        }
        self.trace.push(Step::Consumed {
            state: self.state.clone(),
            symbol: c,
            stack: self.snapshot(),
        });
        let automaton = self.automaton;
        match automaton.find_rule(&self.state, c, self.stack.last()) {
            Some(rule) => {
                self.apply(rule);
                self.step_count += 1;
                true
            }
            None => {
                self.trace.push(Step::Rejected {
                    state: self.state.clone(),
                    symbol: c,
                    stack: self.snapshot(),
                });
                self.rejected = true;
                false
            }
        }
    }

    fn apply(&mut self, rule: &Rule) {
        self.state = rule.to.clone();
        if rule.pop.is_some() {
            // the rule only matched if its symbol is on top, the floor is never popped
            self.stack.pop();
        }
        self.stack.extend(rule.push.iter().cloned());
    }

    /// Ends the run. A run that was not rejected gets its `Final` step here.
    pub fn finish(mut self) -> (bool, Vec<Step>) {
        if self.rejected {
            return (false, self.trace);
        }
        self.trace.push(Step::Final {
            state: self.state.clone(),
            stack: self.snapshot(),
        });
        (self.automaton.is_accepting(&self.state), self.trace)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn stack(&self) -> &[Symbol] {
        &self.stack
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    /// Number of transitions taken so far.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    fn snapshot(&self) -> StackSnapshot {
        StackSnapshot(self.stack.clone())
    }
}
