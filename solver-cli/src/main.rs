mod config;

use clap::{App, Arg};
use config::Config;
use dpll::{
    CNF, Deadline, SATSolution, Solver, SolveOutcome, SolverVariant,
    solvers::TimeLimitedSolver,
};
use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

fn make_config() -> Result<Config, Box<dyn std::error::Error>> {
    let matches = App::new("dpll")
        .version("1.0")
        .about("DPLL SAT solver family: reads DIMACS CNF, prints a DIMACS verdict")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .help("Input file"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("File name for output in DIMACS format"),
        )
        .arg(
            Arg::with_name("variant")
                .long("variant")
                .value_name("VARIANT")
                .help("Solver variant, or all of them side by side")
                .takes_value(true)
                .possible_values(&["base", "watched", "preprocessing", "combined", "all"])
                .default_value("combined"),
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .value_name("SECONDS")
                .takes_value(true)
                .help("Give up after this many seconds and report UNKNOWN"),
        )
        .arg(
            Arg::with_name("bve_limit")
                .long("bve-limit")
                .value_name("K")
                .takes_value(true)
                .help("Longest resolvent variable elimination may produce"),
        )
        .arg(
            Arg::with_name("metrics")
                .long("metrics")
                .short("m")
                .help("Print the search counters as DIMACS comments")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("return_code")
                .long("return-code")
                .short("r")
                .help("Will return 1 if satisfiable, 0 if unsatisfiable and 2 on timeout (useful for scripting)")
                .takes_value(false),
        )
        .get_matches();

    let variants = match matches.value_of("variant") {
        Some("all") => SolverVariant::ALL.to_vec(),
        Some(name) => vec![name.parse()?],
        None => unreachable!(), // clap provides the default
    };

    let timeout = match matches.value_of("timeout") {
        Some(seconds) => {
            let seconds: f64 = seconds.parse()?;
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(format!("invalid timeout: {}", seconds).into());
            }
            Some(Duration::from_secs_f64(seconds))
        }
        None => None,
    };

    let bve_limit = matches.value_of("bve_limit")
        .map(|limit| limit.parse::<usize>())
        .transpose()?;

    Ok(Config {
        input: matches.value_of("input").map(PathBuf::from),
        output: matches.value_of("output").map(PathBuf::from),
        return_code: matches.is_present("return_code"),
        metrics: matches.is_present("metrics"),
        timeout,
        bve_limit,
        variants,
    })
}

fn get_input(handle: &mut impl Read) -> io::Result<String> {
    let mut buffer = String::new();
    handle.read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn solve(config: &Config, variant: SolverVariant, formula: &CNF) -> SolveOutcome {
    let solver = config.solver(variant);
    match config.timeout {
        Some(limit) => TimeLimitedSolver::new(solver, limit).solve(formula, Deadline::none()),
        None => solver.solve(formula, Deadline::none()),
    }
}

fn report(config: &Config, variant: SolverVariant, outcome: &SolveOutcome) -> String {
    let mut report = String::new();
    if config.variants.len() > 1 {
        report.push_str(&format!("c variant: {}\n", variant));
    }
    if config.metrics {
        report.push_str(&outcome.metrics.to_dimacs_comment());
    }
    report.push_str(&outcome.solution.to_dimacs());
    report
}

/// Process exit code for the verdict, `None` meaning every variant timed out
fn exit_code(verdict: Option<&SATSolution>, return_code: bool) -> i32 {
    match verdict {
        None => 2,
        Some(SATSolution::Satisfiable(_)) if return_code => 1,
        Some(_) => 0,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = make_config()?;

    let input = match &config.input {
        None => {
            eprintln!("No input file specified. Reading from standard input...");
            get_input(&mut io::stdin())
        }
        Some(file) => get_input(&mut File::open(file)?),
    }?;

    let formula = CNF::from_dimacs(&input)?;
    info!("{} variables, {} clauses; running {}",
        formula.num_variables(), formula.len(), config.variants.iter().join(", "));

    // solves share nothing, so the variants can run side by side
    let outcomes: Vec<(SolverVariant, SolveOutcome)> = config.variants.par_iter()
        .map(|&variant| (variant, solve(&config, variant, &formula)))
        .collect();

    let output = outcomes.iter()
        .map(|(variant, outcome)| report(&config, *variant, outcome))
        .join("");

    match &config.output {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{}", output),
    }

    // the variants agree unless some of them ran out of time
    let verdict = outcomes.iter()
        .map(|(_, outcome)| &outcome.solution)
        .find(|solution| !solution.is_timed_out());

    match exit_code(verdict, config.return_code) {
        0 => Ok(()),
        code => exit(code),
    }
}
