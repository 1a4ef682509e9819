mod viewer;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pendulab_core::{format_scenario_error, run_scenario, RunResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pendulab")]
#[command(about = "Pendulab - double pendulum simulation playground", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario without a window and print the final state
    Run {
        /// Path to the RON scenario file
        file: PathBuf,
        /// Number of host frames to simulate
        #[arg(long, default_value_t = 600)]
        frames: usize,
        /// Wall-clock seconds per host frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        frame_dt: f64,
    },
    /// Open the interactive viewer
    View {
        /// Optional scenario file, reloaded whenever it changes
        file: Option<PathBuf>,
    },
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run {
            file,
            frames,
            frame_dt,
        } => run_file(&file, frames, frame_dt),
        Commands::View { file } => viewer::launch(file),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_file(file: &Path, frames: usize, frame_dt: f64) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let result = run_scenario(&source, frames, frame_dt)
        .map_err(|e| anyhow::anyhow!(format_scenario_error(&e, &source)))?;

    print_result(&result);
    Ok(())
}

fn print_result(result: &RunResult) {
    println!("frames = {}", result.frames);
    println!("substeps = {}", result.substeps);

    for report in &result.pendulums {
        let state = report.snapshot.state;
        let energy = report.snapshot.energy;
        println!(
            "pendulum[{}] {:?}: theta1 = {:.6}, theta2 = {:.6}, omega1 = {:.6}, omega2 = {:.6}",
            report.index, report.lifecycle, state.theta1, state.theta2, state.omega1, state.omega2
        );
        println!(
            "pendulum[{}] energy: kinetic = {:.3}, potential = {:.3}, total = {:.3}",
            report.index,
            energy.kinetic,
            energy.potential,
            energy.total()
        );
    }

    if !result.degenerate.is_empty() {
        println!("degenerate = {:?}", result.degenerate);
    }
}
