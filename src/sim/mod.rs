// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>
mod random;
mod run;
mod trace;

pub use random::random_input;
pub use run::{accepts, process_string, Run};
pub use trace::{trace_to_str, StackSnapshot, Step};
