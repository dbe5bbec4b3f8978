// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use std::fmt::{Display, Formatter};
use std::ops::Range;
use thiserror::Error;

/// Why a rule line could not be turned into a [`crate::automaton::Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDefect {
    /// Fewer than `from read pop` tokens in front of `->`.
    MissingLeftTokens(usize),
    /// Nothing after `->`.
    EmptyRightSide,
    /// More than one `->` on the same line.
    MultipleArrows,
}

impl Display for RuleDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleDefect::MissingLeftTokens(n) => write!(
                f,
                "expected `FROM READ POP` before `->`, only {n} token(s) provided"
            ),
            RuleDefect::EmptyRightSide => write!(f, "expected `TO [PUSH]` after `->`"),
            RuleDefect::MultipleArrows => write!(f, "a rule may only contain a single `->`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("line {line}: malformed rule `{text}`: {defect}")]
    MalformedRule {
        /// 1-based line number.
        line: usize,
        text: String,
        defect: RuleDefect,
        /// byte range of the offending part inside the source
        span: Range<usize>,
    },
    #[error("missing `start_state:` declaration")]
    MissingStartState,
}

impl ConfigError {
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            ConfigError::MalformedRule { span, .. } => Some(span.clone()),
            ConfigError::MissingStartState => None,
        }
    }
}

/// All errors encountered while loading a single configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl ConfigErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ConfigErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (ii, e) in self.0.iter().enumerate() {
            if ii > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

/// Non-fatal findings of the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    UnrecognizedLine {
        line: usize,
        span: Range<usize>,
        /// closest declaration keywords, best first
        suggestions: Vec<&'static str>,
    },
    Redeclared {
        line: usize,
        span: Range<usize>,
        keyword: &'static str,
    },
}

impl ConfigWarning {
    pub fn span(&self) -> Range<usize> {
        match self {
            ConfigWarning::UnrecognizedLine { span, .. } => span.clone(),
            ConfigWarning::Redeclared { span, .. } => span.clone(),
        }
    }
}

impl Display for ConfigWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::UnrecognizedLine {
                line, suggestions, ..
            } => {
                write!(f, "line {line}: ignoring unrecognized line")?;
                if !suggestions.is_empty() {
                    write!(f, ". Did you mean: {}?", suggestions.join(", "))?;
                }
                Ok(())
            }
            ConfigWarning::Redeclared { line, keyword, .. } => {
                write!(f, "line {line}: `{keyword}` redeclared, replacing earlier value")
            }
        }
    }
}

/// Failure to load a configuration from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{errors}")]
    Config {
        /// file contents, kept around for diagnostics
        source_text: String,
        errors: ConfigErrors,
    },
}
