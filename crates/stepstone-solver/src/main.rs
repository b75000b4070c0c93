// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::{io::ErrorKind, process::ExitCode, time::Duration};
use stepstone_model::{
    loading::{ProblemLoader, ProblemLoaderError},
    matrix::BalancePolicy,
};
use stepstone_solver::solver::SolverBuilder;
use tracing_subscriber::EnvFilter;

const EXIT_MISSING_ARGUMENT: u8 = 1;
const EXIT_FILE_NOT_FOUND: u8 = 2;
const EXIT_INVALID_PROBLEM: u8 = 3;
const EXIT_NOT_SOLVED: u8 = 4;

fn parse_max_sweeps() -> Option<u64> {
    std::env::var("STEPSTONE_MAX_SWEEPS")
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}

fn parse_time_limit() -> Option<Duration> {
    std::env::var("STEPSTONE_TIME_LIMIT_MS")
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
}

fn parse_balance_policy() -> BalancePolicy {
    match std::env::var("STEPSTONE_BALANCE")
        .ok()
        .map(|raw| raw.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("dummy") | Some("add_dummy") | Some("adddummy") => BalancePolicy::AddDummy,
        _ => BalancePolicy::Reject,
    }
}

/// Maps a load failure to the process exit code.
fn load_exit_code(error: &ProblemLoaderError) -> u8 {
    match error {
        ProblemLoaderError::Io(e) if e.kind() == ErrorKind::NotFound => EXIT_FILE_NOT_FOUND,
        _ => EXIT_INVALID_PROBLEM,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(file_name) = std::env::args().nth(1) else {
        eprintln!("You must provide a data file name to read the input from.");
        return ExitCode::from(EXIT_MISSING_ARGUMENT);
    };

    let loader = ProblemLoader::<i64>::new().balance_policy(parse_balance_policy());
    let mut matrix = match loader.from_path(&file_name) {
        Ok(matrix) => matrix,
        Err(e) => {
            let code = load_exit_code(&e);
            if code == EXIT_FILE_NOT_FOUND {
                eprintln!("The file {} does not exist.", file_name);
            } else {
                eprintln!("Failed to load {}: {}", file_name, e);
            }
            return ExitCode::from(code);
        }
    };

    println!("Here's the current cost table:");
    println!("{}", matrix);

    let mut builder = SolverBuilder::new().with_progress_logging(1);
    if let Some(max_sweeps) = parse_max_sweeps() {
        builder = builder.with_max_sweeps(max_sweeps);
    }
    if let Some(time_limit) = parse_time_limit() {
        builder = builder.with_time_limit(time_limit);
    }
    let mut solver = builder.build();

    let outcome = match solver.solve(&mut matrix) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_NOT_SOLVED);
        }
    };

    println!("{}", outcome);
    println!("{}", outcome.outcome().statistics());

    if !outcome.converged() {
        eprintln!(
            "The search did not converge ({}); the final solution is feasible but may not be optimal.",
            outcome.outcome().termination_reason()
        );
        return ExitCode::from(EXIT_NOT_SOLVED);
    }

    ExitCode::SUCCESS
}
