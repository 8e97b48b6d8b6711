//! Command-line benchmark driver
//!
//! Generates a synthetic integer sequence, runs the timed scan pipeline
//! under the selected execution model, prints timing in microseconds and
//! the global sum, and verifies the result against the sequential
//! reference. A failed verification is reported in full but still exits 0;
//! only malformed arguments or resource failures exit non-zero.

use clap::error::ErrorKind;
use clap::Parser;

use parscan::{
    create_engine, input, timing, verify_scan, EngineError, ExecutionModel, RunConfig,
};

/// Parallel reduction / prefix-scan benchmark
#[derive(Parser)]
#[command(name = "parscan", version, about = "Parallel reduction and prefix-scan benchmark")]
struct Cli {
    /// Total number of integers in the input sequence
    numints: usize,

    /// Number of timed repetitions of the compute core
    numiterations: usize,

    /// Number of workers (defaults to all available cores)
    workers: Option<usize>,

    /// Also print the input and result sequences
    #[arg(short = 'o')]
    write_outputs: bool,

    /// Execution model: serial, shared or message
    #[arg(long, default_value_t = ExecutionModel::Shared)]
    engine: ExecutionModel,

    /// Seed for the synthetic input (drawn from entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => std::process::exit(0),
                _ => std::process::exit(1),
            }
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), EngineError> {
    let config = RunConfig {
        numints: cli.numints,
        numiterations: cli.numiterations,
        workers: cli.workers.unwrap_or_else(num_cpus::get),
        model: cli.engine,
        write_outputs: cli.write_outputs,
        seed: cli.seed,
    };
    config.validate()?;

    println!(
        "Executing parscan: engine={}, nprocs={}, numints={}, numints_per_proc={}, numiterations={}",
        config.model,
        config.workers,
        config.numints,
        config.numints_per_worker(),
        config.numiterations
    );

    let (data, gen_elapsed) = timing::measure(|| input::generate(config.numints, config.seed));
    println!(
        "Input generated total elapsed time = {} (usec)",
        gen_elapsed.as_micros()
    );

    let engine = create_engine::<i64>(config.model, config.workers)?;

    let (prefix_sums, report) = timing::time_scan(engine.as_ref(), &data, config.numiterations)?;
    let (total_sum, _) = timing::time_reduce(engine.as_ref(), &data, 1)?;

    println!();
    println!("Total elapsed time = {} (usec)", report.mean_micros());
    println!();
    println!("Total sum = {}", total_sum);

    if config.write_outputs {
        println!("Input sequence: {}", join(&data));
        println!("Prefix sums: {}", join(&prefix_sums));
    }

    // The verifier runs after every timed run, never skipped
    let verification = verify_scan(&data, &prefix_sums);
    println!("{}", verification);

    Ok(())
}

fn join(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
