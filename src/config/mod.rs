// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>
mod error;
mod parse;
mod serialize;

pub use error::{ConfigError, ConfigErrors, ConfigWarning, LoadError, RuleDefect};
pub use parse::{
    emit_errors, emit_warnings, parse, parse_file, parse_str, parse_with_options, report_errors,
    report_warnings, LoadOptions, Parsed,
};
pub use serialize::{serialize, serialize_to_str};
