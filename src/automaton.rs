// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use indexmap::IndexSet;
use std::fmt::{Display, Formatter};

/// Token used in configuration files to denote epsilon.
pub const EPSILON: &str = "λ";

/// A control state of the automaton. States are opaque labels.
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub struct State(pub String);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        State(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An input or stack symbol. Epsilon is never a `Symbol`, it is expressed as the absence
/// of one (see [`Rule`]).
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true iff the symbol consists of exactly the character `c`.
    pub fn is_char(&self, c: char) -> bool {
        let mut chars = self.0.chars();
        chars.next() == Some(c) && chars.next().is_none()
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Symbol(value.to_string())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single transition `from read pop -> to push`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Rule {
    pub from: State,
    /// `None` means epsilon: the rule applies to any input character.
    pub read: Option<Symbol>,
    /// `None` means epsilon: the stack top is left alone.
    pub pop: Option<Symbol>,
    pub to: State,
    /// Symbols are pushed left to right, the last one ends up on top. Empty means epsilon.
    pub push: Vec<Symbol>,
}

impl Rule {
    /// Checks whether this rule can fire in `state` on input `c` with `top` on the stack.
    /// `top` is `None` when only the stack floor is left.
    pub fn matches(&self, state: &State, c: char, top: Option<&Symbol>) -> bool {
        if &self.from != state {
            return false;
        }
        let read_ok = match &self.read {
            None => true,
            Some(read) => read.is_char(c),
        };
        let pop_ok = match &self.pop {
            None => true,
            Some(pop) => Some(pop) == top,
        };
        read_ok && pop_ok
    }

    /// Net change of the stack depth when this rule fires.
    pub fn depth_delta(&self) -> isize {
        self.push.len() as isize - self.pop.is_some() as isize
    }
}

/// Immutable definition of a pushdown automaton.
///
/// The order of `rules` is significant: the simulator always applies the first rule that
/// matches, so an earlier rule shadows any later rule with an overlapping left hand side.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Automaton {
    pub states: IndexSet<State>,
    pub input_alphabet: IndexSet<Symbol>,
    pub stack_alphabet: IndexSet<Symbol>,
    pub start: State,
    pub accept: IndexSet<State>,
    pub rules: Vec<Rule>,
}

/// Inconsistency found by [`Automaton::check`]. None of these prevent simulation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Inconsistency {
    UndeclaredStart(State),
    UndeclaredAccept(State),
    /// Rule index and the state it references.
    UndeclaredRuleState(usize, State),
}

impl Display for Inconsistency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Inconsistency::UndeclaredStart(s) => {
                write!(f, "start state `{s}` is not a declared state")
            }
            Inconsistency::UndeclaredAccept(s) => {
                write!(f, "accept state `{s}` is not a declared state")
            }
            Inconsistency::UndeclaredRuleState(ii, s) => {
                write!(f, "rule #{ii} references undeclared state `{s}`")
            }
        }
    }
}

impl Automaton {
    pub fn new(start: State) -> Self {
        Automaton {
            states: IndexSet::default(),
            input_alphabet: IndexSet::default(),
            stack_alphabet: IndexSet::default(),
            start,
            accept: IndexSet::default(),
            rules: Vec::default(),
        }
    }

    pub fn is_accepting(&self, state: &State) -> bool {
        self.accept.contains(state)
    }

    /// Returns the first rule (in declaration order) that can fire.
    pub fn find_rule(&self, state: &State, c: char, top: Option<&Symbol>) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(state, c, top))
    }

    /// Reports states that are referenced but never declared. The loader does not enforce
    /// these, so this is purely informational.
    pub fn check(&self) -> Vec<Inconsistency> {
        let mut out = Vec::new();
        if !self.states.contains(&self.start) {
            out.push(Inconsistency::UndeclaredStart(self.start.clone()));
        }
        for s in self.accept.iter().filter(|s| !self.states.contains(*s)) {
            out.push(Inconsistency::UndeclaredAccept(s.clone()));
        }
        for (ii, rule) in self.rules.iter().enumerate() {
            for s in [&rule.from, &rule.to] {
                if !self.states.contains(s) {
                    out.push(Inconsistency::UndeclaredRuleState(ii, s.clone()));
                }
            }
        }
        out
    }
}
