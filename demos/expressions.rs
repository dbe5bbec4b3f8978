// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use clap::{arg, Parser};
use pushdown::automaton::Automaton;
use pushdown::config::{self, LoadOptions};
use pushdown::sim::{process_string, random_input, Step};
use rand::{Rng, SeedableRng};

const DEFAULT_INPUTS: [&str; 10] = [
    "1*(4+6)$",
    "4+3$",
    "5*(1+2)$",
    "1+4*7$",
    "(9+1)(2-5)$",
    "4$",
    "*7*(8+9)$",
    "1/(5+5)$",
    "(1+4)/(7+9)$",
    "9+1$",
];

#[derive(Parser, Debug)]
#[command(name = "expressions")]
#[command(author = "Kevin Laeufer <laeufer@berkeley.edu>")]
#[command(version)]
#[command(about = "Runs a pushdown automaton over a list of strings.", long_about = None)]
struct Args {
    #[arg(short, long)]
    verbose: bool,
    #[arg(long, default_value = "λ", help = "Token that denotes epsilon.")]
    epsilon: String,
    #[arg(long, help = "Number of additional random strings to simulate.")]
    random: Option<usize>,
    #[arg(long, default_value_t = 1, help = "Seed for the random strings.")]
    seed: u64,
    #[arg(long, default_value = "$", help = "Appended to every random string.")]
    end_marker: String,
    #[arg(value_name = "CONFIG", index = 1, default_value = "inputs/expressions.pda")]
    config: String,
    #[arg(value_name = "INPUT", index = 2)]
    inputs: Vec<String>,
}

fn main() {
    let args = Args::parse();
    let options = LoadOptions {
        epsilon: args.epsilon.clone(),
    };
    let source = match std::fs::read_to_string(&args.config) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", args.config);
            std::process::exit(1);
        }
    };
    let automaton = match config::parse_with_options(&source, &options) {
        Ok(parsed) => {
            if args.verbose {
                config::report_warnings(&parsed.warnings, &args.config, &source);
            }
            parsed.automaton
        }
        Err(errors) => {
            config::report_errors(&errors, &args.config, &source);
            std::process::exit(1);
        }
    };

    if args.verbose {
        println!("Loaded: {}", args.config);
        print!("{}", config::serialize_to_str(&automaton, &options));
        for issue in automaton.check() {
            println!("note: {issue}");
        }
        println!();
    }

    let mut inputs: Vec<String> = if args.inputs.is_empty() {
        DEFAULT_INPUTS.iter().map(|s| s.to_string()).collect()
    } else {
        args.inputs.clone()
    };
    if let Some(count) = args.random {
        let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(args.seed);
        for _ in 0..count {
            let len = rng.gen_range(1..=8);
            match random_input(&automaton, len, &args.end_marker, &mut rng) {
                Some(input) => inputs.push(input),
                None => {
                    eprintln!("Input alphabet has no single character symbols.");
                    break;
                }
            }
        }
    }

    println!("\nTesting multiple expressions:");
    for input in inputs.iter() {
        run(&automaton, input, args.verbose);
    }
}

fn run(automaton: &Automaton, input: &str, verbose: bool) {
    println!("\nTesting: {input}");
    let (accepted, trace) = process_string(automaton, input);
    println!("Result: {}", if accepted { "Accepted" } else { "Rejected" });
    if accepted || verbose {
        println!("Trace:");
        print_trace(&trace);
    }
}

fn print_trace(trace: &[Step]) {
    for step in trace {
        println!("{step}");
    }
}
