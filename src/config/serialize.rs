// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use super::LoadOptions;
use crate::automaton::{Automaton, Rule, Symbol};
use std::fmt::Display;
use std::io::Write;

/// Writes `automaton` in the configuration format understood by [`super::parse`].
/// Empty sets are left out since an empty declaration would read back as `{""}`.
pub fn serialize(
    automaton: &Automaton,
    options: &LoadOptions,
    writer: &mut impl Write,
) -> std::io::Result<()> {
    serialize_set(writer, "states", automaton.states.iter())?;
    serialize_set(writer, "input_symbols", automaton.input_alphabet.iter())?;
    serialize_set(writer, "stack_symbols", automaton.stack_alphabet.iter())?;
    writeln!(writer, "start_state:{}", automaton.start)?;
    serialize_set(writer, "accept_states", automaton.accept.iter())?;
    writeln!(writer, "transitions:")?;
    for rule in automaton.rules.iter() {
        serialize_rule(writer, rule, &options.epsilon)?;
    }
    Ok(())
}

pub fn serialize_to_str(automaton: &Automaton, options: &LoadOptions) -> String {
    let mut buf = Vec::new();
    serialize(automaton, options, &mut buf).expect("Failed to write to string!");
    String::from_utf8(buf).expect("Failed to read string we wrote!")
}

fn serialize_set<T: Display>(
    writer: &mut impl Write,
    keyword: &str,
    mut members: impl ExactSizeIterator<Item = T>,
) -> std::io::Result<()> {
    if members.len() == 0 {
        return Ok(());
    }
    write!(writer, "{keyword}:")?;
    if let Some(first) = members.next() {
        write!(writer, "{first}")?;
    }
    for member in members {
        write!(writer, ",{member}")?;
    }
    writeln!(writer)
}

fn serialize_rule(writer: &mut impl Write, rule: &Rule, epsilon: &str) -> std::io::Result<()> {
    write!(
        writer,
        "{} {} {} -> {}",
        rule.from,
        slot(&rule.read, epsilon),
        slot(&rule.pop, epsilon),
        rule.to
    )?;
    if !rule.push.is_empty() {
        write!(writer, " ")?;
        for symbol in rule.push.iter() {
            write!(writer, "{symbol}")?;
        }
    }
    writeln!(writer)
}

fn slot<'a>(symbol: &'a Option<Symbol>, epsilon: &'a str) -> &'a str {
    symbol.as_ref().map(|s| s.as_str()).unwrap_or(epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::State;
    use crate::config::parse;

    #[test]
    fn serialize_small() {
        let src = "states:q0,q1\nstart_state:q0\naccept_states:q1\ntransitions:\nq0 a λ -> q1 XY\nq1 λ X -> q0\n";
        let a = parse(src).unwrap();
        insta::assert_snapshot!(serialize_to_str(&a, &LoadOptions::default()), @r"
        states:q0,q1
        start_state:q0
        accept_states:q1
        transitions:
        q0 a λ -> q1 XY
        q1 λ X -> q0
        ");
    }

    #[test]
    fn empty_sets_round_trip() {
        let mut a = Automaton::new(State::new("s"));
        a.accept.insert(State::new(""));
        let text = serialize_to_str(&a, &LoadOptions::default());
        assert_eq!(text, "start_state:s\naccept_states:\ntransitions:\n");
        assert_eq!(parse(&text).unwrap(), a);
    }
}
