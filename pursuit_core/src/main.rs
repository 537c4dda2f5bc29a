//! # Pursuit Control Core Binary
//!
//! Runs one experiment trial: builds the cycle runner from configuration
//! (or defaults), wires the interrupt handler, runs the loop, and prints
//! the task metrics.
//!
//! # Usage
//!
//! ```bash
//! # 10 s of sum-of-sines with the auto-PD operator
//! pursuit_core
//!
//! # A Fitts trial for up to 120 s
//! pursuit_core --task fitts --duration 120
//!
//! # With a config file and verbose logging
//! pursuit_core --config pursuit.toml -v
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pursuit_common::config::{ConfigLoader, ExperimentConfig};
use pursuit_common::types::TaskType;
use pursuit_core::task::TaskMetrics;
use pursuit_core::CycleRunner;

/// Soft-real-time control core for the pursuit 2D tracking platform.
#[derive(Parser, Debug)]
#[command(name = "pursuit_core")]
#[command(version)]
#[command(about = "1 kHz experiment control loop with UDP state emission")]
struct Args {
    /// Run duration in seconds.
    #[arg(long, default_value_t = 10.0)]
    duration: f64,

    /// Task to run: sos, cit, or fitts. Unknown values fall back to sos.
    #[arg(long, default_value = "sos")]
    task: String,

    /// Path to a TOML configuration file. Defaults are used when absent.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("startup failed: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().compact().with_env_filter(filter).init();

    let task_type = match TaskType::from_name(&args.task) {
        Some(t) => t,
        None => {
            warn!("unknown task '{}', falling back to sos", args.task);
            TaskType::Sos
        }
    };

    let config = match &args.config {
        Some(path) => {
            let cfg = ExperimentConfig::load(path)?;
            cfg.validate()?;
            info!("loaded config from {}", path.display());
            cfg
        }
        None => ExperimentConfig::default(),
    };

    info!(
        rate_hz = config.control_rate_hz,
        task = %task_type,
        dest = %config.viewer_dest(),
        "pursuit_core v{} starting",
        env!("CARGO_PKG_VERSION"),
    );

    let mut runner = CycleRunner::new(config, task_type)?;

    let running = runner.running_flag();
    ctrlc::set_handler(move || {
        info!("received interrupt, stopping");
        running.store(false, Ordering::SeqCst);
    })?;

    runner.run(args.duration);

    print_metrics(&runner.task_metrics());
    runner.close();

    Ok(())
}

/// Task metrics go to stdout at run end; everything else is tracing.
fn print_metrics(metrics: &TaskMetrics) {
    match metrics {
        TaskMetrics::Sos(m) => {
            println!("task: sum-of-sines");
            println!("  samples:    {}", m.samples);
            println!("  rmse_x:     {:.6} m", m.rmse_x);
            println!("  rmse_y:     {:.6} m", m.rmse_y);
            println!("  rmse_total: {:.6} m", m.rmse_total);
        }
        TaskMetrics::Cit(m) => {
            println!("task: critical instability");
            println!("  lambda:          {:.2} rad/s", m.lambda);
            println!("  lambda_critical: {:.2} rad/s", m.lambda_critical);
            println!("  divergence_time: {:.3} s", m.divergence_time_s);
            println!("  final_distance:  {:.4} m", m.final_distance);
            println!("  increments:      {}", m.increments);
        }
        TaskMetrics::Fitts(m) => {
            println!("task: fitts");
            println!(
                "  movements:  {}/{}",
                m.movements_completed, m.movements_total
            );
            println!("  amplitude:  {:.4} m", m.amplitude);
            println!("  ID:         {:.3} bits", m.index_of_difficulty);
            println!("  mean MT:    {:.3} s", m.mean_movement_time);
            println!("  throughput: {:.3} bits/s", m.throughput);
            println!("  error rate: {:.1}%", m.error_rate * 100.0);
        }
    }
}
