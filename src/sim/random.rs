// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use crate::automaton::Automaton;
use rand::Rng;

/// Generates a string of `len` characters drawn uniformly from the single character
/// members of the input alphabet. `extra` characters (e.g. an end marker) are appended
/// verbatim. Returns `None` if the alphabet has no single character members.
pub fn random_input(
    automaton: &Automaton,
    len: usize,
    extra: &str,
    rng: &mut impl Rng,
) -> Option<String> {
    let letters: Vec<char> = automaton
        .input_alphabet
        .iter()
        .filter_map(|s| {
            let mut chars = s.as_str().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        })
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(len + extra.len());
    for _ in 0..len {
        out.push(letters[rng.gen_range(0..letters.len())]);
    }
    out.push_str(extra);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{State, Symbol};
    use rand::SeedableRng;

    #[test]
    fn only_uses_alphabet() {
        let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(1);
        let mut a = Automaton::new(State::new("s"));
        assert_eq!(random_input(&a, 4, "", &mut rng), None);
        a.input_alphabet.insert(Symbol::new("a"));
        a.input_alphabet.insert(Symbol::new("bc"));
        a.input_alphabet.insert(Symbol::new("d"));
        for _ in 0..10 {
            let s = random_input(&a, 20, "$", &mut rng).unwrap();
            assert_eq!(s.chars().count(), 21);
            assert!(s.ends_with('$'));
            assert!(s[..20].chars().all(|c| c == 'a' || c == 'd'), "{s}");
        }
    }
}
