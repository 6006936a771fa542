use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use watch_factory_sim::analysis::export_dashboard_data;
use watch_factory_sim::core::types::STATION_NAMES;
use watch_factory_sim::{run_batch, AggregatedResults, ConcurrencyMode, SimResult, SimulationConfig};

/// Replicated simulation of the six-station digital watch assembly line
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Simulated time units per replication
    #[arg(long, default_value_t = 5000.0)]
    horizon: f64,

    /// Number of independent replications
    #[arg(long, default_value_t = 100)]
    replications: usize,

    /// Base random seed; replication i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Run replications on a Rayon pool with this many threads
    #[arg(long)]
    threads: Option<usize>,

    /// Write production/station/material CSV tables into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Days represented by one replication in the exported time series
    #[arg(long, default_value_t = 1)]
    days_per_run: u32,

    /// Print every replication snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> SimResult<()> {
    let mut config = SimulationConfig::new()
        .with_horizon(args.horizon)
        .with_replications(args.replications)
        .with_seed(args.seed);
    if let Some(threads) = args.threads {
        config = config
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(threads);
    }

    let snapshots = run_batch(&config)?;

    if args.json {
        for snapshot in &snapshots {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("Could not serialize snapshot: {}", e),
            }
        }
    }

    let results = AggregatedResults::from_snapshots(&snapshots)?;
    print_report(&results);

    if let Some(dir) = args.export_dir {
        export_dashboard_data(&snapshots, args.days_per_run, Local::now().date_naive(), &dir)?;
    }
    Ok(())
}

fn print_report(results: &AggregatedResults) {
    println!("\n=== Simulation Results ({} runs) ===", results.replications);
    println!("\nAverage production: {:.2} watches", results.production.avg_total);
    println!("Production std-dev: {:.2}", results.production.std_total);
    println!("Average faulty: {:.2}", results.production.avg_faulty);
    println!("Average fault rate: {:.2}%", results.production.avg_faulty_rate * 100.0);

    println!("\n=== Stations ===");
    for (i, name) in STATION_NAMES.iter().enumerate() {
        println!("\nStation {} ({}):", i + 1, name);
        println!(
            "  Occupancy: {:.2}%",
            results.station_metrics.avg_occupancy_rates[i] * 100.0
        );
        println!("  Downtime: {:.2} units", results.station_metrics.avg_downtimes[i]);
    }

    println!("\n=== Times ===");
    println!("Average production time: {:.2} units", results.time_metrics.avg_production_time);
    println!("Average repair time: {:.2} units", results.time_metrics.avg_fixing_time);

    println!("\n=== Materials ===");
    for (material, usage) in &results.material_metrics.avg_usage {
        let resupply = results.material_metrics.avg_resupply.get(material).copied().unwrap_or(0.0);
        println!(
            "{}: {:.2} used, {:.2} resupplies",
            material.display_name(),
            usage,
            resupply
        );
    }
}
