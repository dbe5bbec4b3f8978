// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use super::error::*;
use crate::automaton::*;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use fuzzy_matcher::FuzzyMatcher;
use indexmap::IndexSet;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;

/// Knobs of the configuration loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Token that denotes epsilon in the `read`, `pop` and `push` slots of a rule.
    pub epsilon: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            epsilon: EPSILON.to_string(),
        }
    }
}

/// A successfully loaded automaton together with anything suspicious the loader noticed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub automaton: Automaton,
    pub warnings: Vec<ConfigWarning>,
}

/// Loads an automaton with the default options, ignoring warnings.
pub fn parse(input: &str) -> Result<Automaton, ConfigErrors> {
    parse_with_options(input, &LoadOptions::default()).map(|p| p.automaton)
}

pub fn parse_with_options(input: &str, options: &LoadOptions) -> Result<Parsed, ConfigErrors> {
    Parser::new(options).parse(input)
}

/// Loads an automaton and prints any diagnostics to stderr.
pub fn parse_str(input: &str, name: &str) -> Option<Automaton> {
    match parse_with_options(input, &LoadOptions::default()) {
        Ok(parsed) => {
            report_warnings(&parsed.warnings, name, input);
            Some(parsed.automaton)
        }
        Err(errors) => {
            report_errors(&errors, name, input);
            None
        }
    }
}

pub fn parse_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Parsed, LoadError> {
    let source_text = std::fs::read_to_string(path)?;
    parse_with_options(&source_text, options).map_err(|errors| LoadError::Config {
        source_text,
        errors,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declaration {
    States,
    InputSymbols,
    StackSymbols,
    StartState,
    AcceptStates,
    Transitions,
}

const DECLARATIONS: [(&str, Declaration); 6] = [
    ("states", Declaration::States),
    ("input_symbols", Declaration::InputSymbols),
    ("stack_symbols", Declaration::StackSymbols),
    ("start_state", Declaration::StartState),
    ("accept_states", Declaration::AcceptStates),
    ("transitions", Declaration::Transitions),
];

lazy_static! {
    static ref DECLARATION_MAP: HashMap<&'static str, Declaration> =
        HashMap::from(DECLARATIONS);
}

const ARROW: &str = "->";

struct Parser<'a> {
    options: &'a LoadOptions,
    errors: Vec<ConfigError>,
    warnings: Vec<ConfigWarning>,
    /// offset of the current line inside the input
    offset: usize,
    /// 1-based number of the current line
    line_no: usize,
    declared: HashSet<&'static str>,
    states: IndexSet<State>,
    input_alphabet: IndexSet<Symbol>,
    stack_alphabet: IndexSet<Symbol>,
    start: Option<State>,
    accept: IndexSet<State>,
    rules: Vec<Rule>,
}

impl<'a> Parser<'a> {
    fn new(options: &'a LoadOptions) -> Self {
        Parser {
            options,
            errors: Vec::new(),
            warnings: Vec::new(),
            offset: 0,
            line_no: 0,
            declared: HashSet::new(),
            states: IndexSet::new(),
            input_alphabet: IndexSet::new(),
            stack_alphabet: IndexSet::new(),
            start: None,
            accept: IndexSet::new(),
            rules: Vec::new(),
        }
    }

    fn parse(mut self, input: &str) -> Result<Parsed, ConfigErrors> {
        for raw in input.split_inclusive('\n') {
            self.line_no += 1;
            let line = raw.trim();
            if !line.is_empty() {
                let line_offset = self.offset + str_offset(line, raw);
                let _ignore_errors = self.parse_line(line, line_offset);
            }
            self.offset += raw.len();
        }

        let start = match self.start.take() {
            Some(start) => start,
            None => {
                self.errors.push(ConfigError::MissingStartState);
                State::new("")
            }
        };

        if !self.errors.is_empty() {
            return Err(ConfigErrors(self.errors));
        }

        let automaton = Automaton {
            states: self.states,
            input_alphabet: self.input_alphabet,
            stack_alphabet: self.stack_alphabet,
            start,
            accept: self.accept,
            rules: self.rules,
        };
        Ok(Parsed {
            automaton,
            warnings: self.warnings,
        })
    }

    /// `line` is trimmed and non-empty, `offset` is its position in the input.
    fn parse_line(&mut self, line: &str, offset: usize) -> ParseLineResult {
        let span = offset..offset + line.len();
        if let Some((head, rest)) = line.split_once(':') {
            if let Some((keyword, decl)) = DECLARATION_MAP.get_key_value(head) {
                // only the text up to the next colon counts as the value
                let value = rest.split(':').next().unwrap_or("");
                self.parse_declaration(*keyword, *decl, value, span);
                return Ok(());
            }
        }

        if line.contains(ARROW) {
            let rule = self.parse_rule(line, offset)?;
            self.rules.push(rule);
        } else {
            self.unrecognized_line(line, span);
        }
        Ok(())
    }

    fn parse_declaration(
        &mut self,
        keyword: &'static str,
        decl: Declaration,
        value: &str,
        span: Range<usize>,
    ) {
        if decl == Declaration::Transitions {
            // header only, rules are recognized by their arrow
            return;
        }
        if !self.declared.insert(keyword) {
            self.warnings.push(ConfigWarning::Redeclared {
                line: self.line_no,
                span,
                keyword,
            });
        }
        match decl {
            Declaration::States => self.states = split_members(value).map(State::new).collect(),
            Declaration::InputSymbols => {
                self.input_alphabet = split_members(value).map(Symbol::new).collect()
            }
            Declaration::StackSymbols => {
                self.stack_alphabet = split_members(value).map(Symbol::new).collect()
            }
            Declaration::StartState => {
                let name = value.trim();
                self.start = if name.is_empty() {
                    None
                } else {
                    Some(State::new(name))
                };
            }
            Declaration::AcceptStates => {
                self.accept = split_members(value).map(State::new).collect()
            }
            Declaration::Transitions => unreachable!("handled above"),
        }
    }

    fn parse_rule(&mut self, line: &str, offset: usize) -> ParseLineResult<Rule> {
        // the caller guarantees that there is an arrow
        let arrow = line.find(ARROW).unwrap_or(0);
        let arrow_span = offset + arrow..offset + arrow + ARROW.len();
        let left = &line[..arrow];
        let right = &line[arrow + ARROW.len()..];

        if let Some(second) = right.find(ARROW) {
            let start = arrow_span.end + second;
            return self.add_error(line, start..start + ARROW.len(), RuleDefect::MultipleArrows);
        }

        let lhs: SmallVec<[&str; 4]> = left.split_whitespace().collect();
        if lhs.len() < 3 {
            let span = match lhs.first() {
                Some(first) => {
                    let start = offset + str_offset(first, line);
                    start..arrow_span.end
                }
                None => arrow_span,
            };
            return self.add_error(line, span, RuleDefect::MissingLeftTokens(lhs.len()));
        }

        let rhs: SmallVec<[&str; 4]> = right.split_whitespace().collect();
        if rhs.is_empty() {
            return self.add_error(line, arrow_span, RuleDefect::EmptyRightSide);
        }

        let push = match rhs.get(1) {
            Some(push) if *push != self.options.epsilon => push.chars().map(Symbol::from).collect(),
            _ => Vec::new(),
        };

        Ok(Rule {
            from: State::new(lhs[0]),
            read: self.symbol_or_epsilon(lhs[1]),
            pop: self.symbol_or_epsilon(lhs[2]),
            to: State::new(rhs[0]),
            push,
        })
    }

    fn symbol_or_epsilon(&self, token: &str) -> Option<Symbol> {
        if token == self.options.epsilon {
            None
        } else {
            Some(Symbol::new(token))
        }
    }

    fn unrecognized_line(&mut self, line: &str, span: Range<usize>) {
        let head = match line.split_once(':') {
            Some((head, _)) => head.trim(),
            None => line.split_whitespace().next().unwrap_or(line),
        };
        let matcher = fuzzy_matcher::skim::SkimMatcherV2::default();
        let mut matches: Vec<(&'static str, i64)> = DECLARATIONS
            .iter()
            .flat_map(|(kw, _)| matcher.fuzzy_match(kw, head).map(|s| (*kw, s)))
            .collect();
        matches.sort_by_key(|(_, s)| -(*s));
        let suggestions = matches.into_iter().take(3).map(|(kw, _)| kw).collect();
        self.warnings.push(ConfigWarning::UnrecognizedLine {
            line: self.line_no,
            span,
            suggestions,
        });
    }

    fn add_error(
        &mut self,
        line: &str,
        span: Range<usize>,
        defect: RuleDefect,
    ) -> ParseLineResult<Rule> {
        self.errors.push(ConfigError::MalformedRule {
            line: self.line_no,
            text: line.to_string(),
            defect,
            span,
        });
        Err(())
    }
}

/// Splits a set-valued declaration. Members are taken verbatim, no trimming.
fn split_members(value: &str) -> impl Iterator<Item = &str> {
    value.split(',')
}

fn str_offset(needle: &str, haystack: &str) -> usize {
    let offset = (needle.as_ptr() as usize) - (haystack.as_ptr() as usize);
    debug_assert!(
        offset + needle.len() <= haystack.len(),
        "{} is not fully contained in {}",
        needle,
        haystack
    );
    offset
}

/// Indicated success or failure. Errors are not returned, but rather collected in the parser.
type ParseLineResult<T = ()> = std::result::Result<T, ()>;

// Diagnostics

pub fn report_errors(errors: &ConfigErrors, name: &str, source: &str) {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    // nothing sensible left to do if stderr is gone
    let _ = emit_errors(&mut writer.lock(), errors, name, source);
}

pub fn report_warnings(warnings: &[ConfigWarning], name: &str, source: &str) {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let _ = emit_warnings(&mut writer.lock(), warnings, name, source);
}

pub fn emit_errors(
    writer: &mut dyn WriteColor,
    errors: &ConfigErrors,
    name: &str,
    source: &str,
) -> Result<(), codespan_reporting::files::Error> {
    let file = SimpleFile::new(name, source);
    let config = term::Config::default();
    for error in errors.iter() {
        term::emit(writer, &config, &file, &error_diagnostic(error))?;
    }
    Ok(())
}

pub fn emit_warnings(
    writer: &mut dyn WriteColor,
    warnings: &[ConfigWarning],
    name: &str,
    source: &str,
) -> Result<(), codespan_reporting::files::Error> {
    let file = SimpleFile::new(name, source);
    let config = term::Config::default();
    for warning in warnings {
        term::emit(writer, &config, &file, &warning_diagnostic(warning))?;
    }
    Ok(())
}

fn error_diagnostic(error: &ConfigError) -> Diagnostic<()> {
    match error {
        ConfigError::MalformedRule { defect, span, .. } => Diagnostic::error()
            .with_message("malformed rule")
            .with_labels(vec![
                Label::primary((), span.clone()).with_message(defect.to_string())
            ])
            .with_notes(vec!["rules have the form `FROM READ POP -> TO [PUSH]`".to_string()]),
        ConfigError::MissingStartState => Diagnostic::error()
            .with_message("missing `start_state:` declaration")
            .with_notes(vec!["add: start_state:<state>".to_string()]),
    }
}

fn warning_diagnostic(warning: &ConfigWarning) -> Diagnostic<()> {
    match warning {
        ConfigWarning::UnrecognizedLine {
            span, suggestions, ..
        } => {
            let d = Diagnostic::warning()
                .with_message("ignoring unrecognized line")
                .with_labels(vec![Label::primary((), span.clone())]);
            if suggestions.is_empty() {
                d
            } else {
                d.with_notes(vec![format!("did you mean: {}?", suggestions.join(", "))])
            }
        }
        ConfigWarning::Redeclared { span, keyword, .. } => Diagnostic::warning()
            .with_message(format!("`{keyword}` redeclared"))
            .with_labels(vec![
                Label::primary((), span.clone()).with_message("this replaces the earlier value")
            ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::NoColor;

    const MINIMAL: &str = "states:q0,q1\nstart_state:q0\naccept_states:q1\ntransitions:\nq0 a λ -> q1\n";

    fn errors_of(code: &str) -> Vec<ConfigError> {
        parse(code).expect_err("expected a malformed configuration").0
    }

    #[test]
    fn parse_minimal() {
        let a = parse(MINIMAL).unwrap();
        assert_eq!(a.start, State::new("q0"));
        assert_eq!(a.states.len(), 2);
        assert!(a.is_accepting(&State::new("q1")));
        assert_eq!(a.rules.len(), 1);
        let r = &a.rules[0];
        assert_eq!(r.read, Some(Symbol::new("a")));
        assert_eq!(r.pop, None);
        assert!(r.push.is_empty());
    }

    #[test]
    fn members_are_not_trimmed() {
        let a = parse("start_state:q0\nstates: q0,q1,,q1\n").unwrap();
        let names: Vec<_> = a.states.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, [" q0", "q1", ""]);
    }

    #[test]
    fn start_state_is_trimmed() {
        let a = parse("start_state:  q7 \n").unwrap();
        assert_eq!(a.start, State::new("q7"));
    }

    #[test]
    fn value_ends_at_next_colon() {
        let a = parse("start_state:q0\ninput_symbols:a,b:c\n").unwrap();
        let names: Vec<_> = a.input_alphabet.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn push_is_split_into_characters() {
        let a = parse("start_state:q0\nq0 ( Z -> q0 ZP\nq0 ) P -> q1 λ\n").unwrap();
        assert_eq!(a.rules[0].push, vec![Symbol::new("Z"), Symbol::new("P")]);
        assert_eq!(a.rules[0].pop, Some(Symbol::new("Z")));
        assert!(a.rules[1].push.is_empty());
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let a = parse("start_state:q0\nq0 a b c d -> q1 X Y\n").unwrap();
        let r = &a.rules[0];
        assert_eq!(r.pop, Some(Symbol::new("b")));
        assert_eq!(r.push, vec![Symbol::new("X")]);
    }

    #[test]
    fn custom_epsilon() {
        let options = LoadOptions {
            epsilon: "~".to_string(),
        };
        let parsed = parse_with_options("start_state:q0\nq0 ~ ~ -> q1 ~\n", &options).unwrap();
        let r = &parsed.automaton.rules[0];
        assert_eq!((&r.read, &r.pop), (&None, &None));
        assert!(r.push.is_empty());
        // λ is an ordinary symbol under these options
        let parsed = parse_with_options("start_state:q0\nq0 λ λ -> q1\n", &options).unwrap();
        assert_eq!(parsed.automaton.rules[0].read, Some(Symbol::new("λ")));
    }

    #[test]
    fn parse_failures() {
        parse("start_state:q0\n").expect("declarations only should be fine");
        parse("start_state:q0\n\n   \n").expect("blank lines should be fine");
        assert_eq!(errors_of(""), vec![ConfigError::MissingStartState]);
        assert_eq!(errors_of("start_state:   "), vec![ConfigError::MissingStartState]);

        let errors = errors_of("start_state:q0\nq0 a -> q1\n");
        assert!(matches!(
            errors[..],
            [ConfigError::MalformedRule {
                line: 2,
                defect: RuleDefect::MissingLeftTokens(2),
                ..
            }]
        ));

        let errors = errors_of("start_state:q0\ntransitions:\nq0 a X ->   \n");
        assert!(matches!(
            errors[..],
            [ConfigError::MalformedRule {
                line: 3,
                defect: RuleDefect::EmptyRightSide,
                ..
            }]
        ));

        let errors = errors_of("start_state:q0\nq0 a X -> q1 -> q2\n");
        assert!(matches!(
            errors[..],
            [ConfigError::MalformedRule {
                defect: RuleDefect::MultipleArrows,
                ..
            }]
        ));
    }

    #[test]
    fn all_errors_are_collected() {
        let errors = errors_of("-> q1\nq0 a X -> q1\nq0 ->\n");
        assert_eq!(errors.len(), 3);
        assert!(matches!(
            errors[0],
            ConfigError::MalformedRule {
                line: 1,
                defect: RuleDefect::MissingLeftTokens(0),
                ..
            }
        ));
        assert!(matches!(errors[1], ConfigError::MalformedRule { line: 3, .. }));
        assert_eq!(errors[2], ConfigError::MissingStartState);
    }

    #[test]
    fn error_spans_point_into_source() {
        let src = "start_state:q0\n  q0 a -> q1\n";
        let errors = errors_of(src);
        let span = errors[0].span().unwrap();
        assert_eq!(&src[span], "q0 a ->");

        let src = "start_state:q0\r\nq0 a X -> q1 -> q2\r\n";
        let span = errors_of(src)[0].span().unwrap();
        assert_eq!(&src[span.clone()], "->");
        assert_eq!(span.start, "start_state:q0\r\nq0 a X -> q1 ".len());
    }

    #[test]
    fn warnings() {
        let parsed = parse_with_options(
            "start_state:q0\nstate:q0,q1\nstart_state:q1\n",
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(parsed.automaton.start, State::new("q1"));
        assert_eq!(parsed.warnings.len(), 2);
        match &parsed.warnings[0] {
            ConfigWarning::UnrecognizedLine {
                line, suggestions, ..
            } => {
                assert_eq!(*line, 2);
                assert!(suggestions.contains(&"states"), "{suggestions:?}");
            }
            other => panic!("unexpected warning {other:?}"),
        }
        assert!(matches!(
            parsed.warnings[1],
            ConfigWarning::Redeclared {
                line: 3,
                keyword: "start_state",
                ..
            }
        ));
    }

    #[test]
    fn render_errors() {
        let src = "start_state:q0\ntransitions:\nq0 a -> q1\n";
        let errors = parse(src).unwrap_err();
        let mut writer = NoColor::new(Vec::new());
        emit_errors(&mut writer, &errors, "broken.pda", src).unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert!(out.contains("error: malformed rule"), "{out}");
        assert!(out.contains("broken.pda:3:1"), "{out}");
        assert!(out.contains("q0 a -> q1"), "{out}");
        assert!(out.contains("only 2 token(s) provided"), "{out}");
    }
}
