/*!
 * lockbench - Driver Binary
 *
 * Runs one workload with the selected lock and barrier:
 * - sort: bucket fill of an integer file into a sorted, distinct file
 * - counter: shared-counter contention benchmark
 *
 * Elapsed time of the compute phase goes to stdout, logs go to stderr.
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lockbench::core::limits::DEFAULT_PARTICIPANTS;
use lockbench::{
    bucket_fill, init_tracing, io, BarrierKind, CounterBenchmark, CounterMode, LockKind,
    RunConfig, RunOutcome,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "lockbench", version, about = "Lock and barrier contention benchmarks")]
struct Cli {
    /// Lock: tas, ttas, ticket, mcs, pthread, petersonseq, petersonrel
    #[arg(long, global = true, default_value_t = LockKind::default())]
    lock: LockKind,

    /// Barrier: sense, pthread
    #[arg(long = "bar", global = true, default_value_t = BarrierKind::default())]
    barrier: BarrierKind,

    /// Participants, including the main thread
    #[arg(
        short = 't',
        long = "threads",
        env = "LOCKBENCH_THREADS",
        global = true,
        default_value_t = DEFAULT_PARTICIPANTS
    )]
    threads: usize,

    /// Print the run report as JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sort an integer file with the parallel bucket fill
    Sort {
        /// Whitespace-separated integers
        input: PathBuf,

        /// Sorted, duplicate-free output, one value per line
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Increment a shared counter from every participant
    Counter {
        /// Increments per participant
        #[arg(short, long, default_value_t = 1)]
        iterations: u64,

        /// Take turns through the barrier instead of the lock
        #[arg(long)]
        barrier_only: bool,

        /// File receiving the final counter value
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = RunConfig::new(cli.lock, cli.barrier, cli.threads);

    match cli.command {
        Command::Sort { input, output } => {
            let values = io::read_integers(&input)
                .with_context(|| format!("Could not load input {}", input.display()))?;

            let outcome = bucket_fill(&config, &values)?;
            info!(
                input = values.len(),
                output = outcome.value.len(),
                "Sorted"
            );

            io::write_integers(&output, &outcome.value)
                .with_context(|| format!("Could not store output {}", output.display()))?;
            print_report(&outcome, cli.json)
        }

        Command::Counter {
            iterations,
            barrier_only,
            output,
        } => {
            let mode = if barrier_only {
                CounterMode::BarrierTurns
            } else {
                CounterMode::Locked
            };
            let benchmark = CounterBenchmark::new(config)
                .mode(mode)
                .iterations(iterations);

            let outcome = benchmark.run()?;
            let count = outcome.value.value;
            if count == benchmark.expected() {
                info!(count, "Counter complete");
            } else {
                warn!(count, expected = benchmark.expected(), "Counter lost increments");
            }

            if let Some(path) = output {
                io::write_count(&path, count)
                    .with_context(|| format!("Could not store count {}", path.display()))?;
            }
            print_report(&outcome, cli.json)
        }
    }
}

fn print_report<T>(outcome: &RunOutcome<T>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report())?);
    } else {
        println!("Elapsed (ns): {}", outcome.timing.as_nanos());
        println!("Elapsed (s): {:.6}", outcome.timing.as_secs_f64());
    }
    Ok(())
}
