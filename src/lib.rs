// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>
#[macro_use]
extern crate lazy_static;

pub mod automaton;
pub mod config;
pub mod sim;
