use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use corridor_optimizer::{
    RoutingConfig, RoutingOutcome, RoutingSolver,
    json::types::JsonRoutingScenario,
    problem::routing_scenario::RoutingScenario,
    solver::{sampler_params::Threads, solver_backend::SolverBackendKind},
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::{
    file_utils::{outcome_path, read_scenario_folder},
    parsers, report,
};

#[derive(Args)]
pub struct SolveArgs {
    /// Scenario file, or a folder of scenario files
    #[arg(short, long)]
    input: PathBuf,

    /// Outcome file, or a folder when the input is a folder
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, env = "CORRIDOR_READS")]
    reads: Option<usize>,

    #[arg(long, env = "CORRIDOR_SWEEPS")]
    sweeps: Option<usize>,

    #[arg(long, env = "CORRIDOR_SEED")]
    seed: Option<u64>,

    /// Candidate paths per vehicle
    #[arg(short, long)]
    k_paths: Option<usize>,

    /// Number of threads running reads, all cores when absent
    #[arg(short, long, env = "CORRIDOR_THREADS")]
    threads: Option<usize>,

    /// Stops the solver after this duration (e.g., "30s", "5m", "PT1M")
    #[arg(long, value_parser = parsers::parse_duration, env = "CORRIDOR_TIMEOUT")]
    timeout: Option<jiff::SignedDuration>,

    /// Enumerates every assignment instead of annealing, small scenarios only
    #[arg(long)]
    exact: bool,

    /// Prints the outcome tables
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    tables: bool,
}

impl SolveArgs {
    fn apply(&self, config: &mut RoutingConfig) {
        if let Some(reads) = self.reads {
            config.num_reads = reads;
        }
        if let Some(sweeps) = self.sweeps {
            config.sweeps_per_read = sweeps;
        }
        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        if let Some(k_paths) = self.k_paths {
            config.k_paths = k_paths;
        }
        if let Some(threads) = self.threads {
            config.threads = Threads::Multi(threads);
        }
        if self.timeout.is_some() {
            config.time_limit = self.timeout;
        }
        if self.exact {
            config.backend = SolverBackendKind::Exact;
        }
    }
}

pub fn run(args: SolveArgs) -> Result<(), anyhow::Error> {
    if args.input.is_dir() {
        let paths = read_scenario_folder(&args.input)?;
        info!("Solving {} scenarios from {:?}", paths.len(), args.input);

        for path in paths {
            let output = args
                .output
                .as_deref()
                .map(|output| outcome_path(output, &path));
            solve_file(&args, &path, output.as_deref())?;
        }
    } else {
        solve_file(&args, &args.input, args.output.as_deref())?;
    }

    Ok(())
}

fn load_scenario(path: &Path) -> Result<RoutingScenario, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {path:?}"))?;
    let json: JsonRoutingScenario = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scenario {path:?}"))?;

    Ok(json.build_scenario()?)
}

fn solve_file(args: &SolveArgs, path: &Path, output: Option<&Path>) -> Result<(), anyhow::Error> {
    info!("Solving scenario {:?}", path);

    let mut scenario = load_scenario(path)?;
    args.apply(&mut scenario.config);

    let bar = ProgressBar::new(scenario.config.num_reads as u64);
    bar.set_style(
        ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} reads ({elapsed}) {msg}")?,
    );

    let mut solver = RoutingSolver::new(scenario.config);
    let progress_bar = bar.clone();
    solver.on_read_complete(move |progress| {
        progress_bar.set_position(progress.completed_reads as u64);
        progress_bar.set_message(format!("best energy {:.3}", progress.best_energy));
    });

    let outcome = solver.solve(&scenario.network, &scenario.requests);
    bar.finish_and_clear();
    let outcome = outcome?;

    print_outcome(args, &outcome);

    if let Some(output) = output {
        write_outcome(output, &outcome)?;
    }

    Ok(())
}

fn print_outcome(args: &SolveArgs, outcome: &RoutingOutcome) {
    let summary = outcome.summary();
    info!(
        "Routed {}/{} vehicles ({} emergency) in {}, total travel time {:.2}",
        summary.routed_vehicles,
        summary.total_vehicles,
        summary.emergency_vehicles,
        outcome.timing().duration,
        outcome.total_travel_time()
    );

    if outcome.interrupted() {
        warn!("Solver was interrupted, the outcome may not be optimal");
    }

    if !args.tables {
        return;
    }

    println!("{}", report::assignments_table(outcome));
    println!("{}", report::congestion_table(outcome));
    if let Some(diagnostics) = report::diagnostics_table(outcome) {
        println!("{diagnostics}");
    }
}

fn write_outcome(output: &Path, outcome: &RoutingOutcome) -> Result<(), anyhow::Error> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(output, serde_json::to_string_pretty(outcome)?)?;
    info!("Outcome written to {:?}", output);

    Ok(())
}
