use crate::core::errors::SimResult;
use crate::core::execution::config::{ConcurrencyMode, FactoryParams, SimulationConfig};
use crate::core::factory::WatchFactory;
use crate::core::metrics::MetricsSnapshot;
use crate::core::simulation_engine::SimulationEngine;
use crate::core::types::SimTime;
use log::{debug, info};
use rayon::prelude::*;

/// Build an engine with a fresh factory and its first arrival scheduled
pub fn build_engine(params: &FactoryParams, seed: u64) -> SimResult<SimulationEngine<WatchFactory>> {
    let mut engine = SimulationEngine::new(WatchFactory::new(params, seed)?);
    let initial = engine.model_mut().initial_events();
    for (event, delay) in initial {
        engine.schedule_after(delay, event);
    }
    Ok(engine)
}

/// Run one isolated replication up to `horizon` and snapshot its metrics
pub fn run_replication(params: &FactoryParams, seed: u64, horizon: SimTime) -> SimResult<MetricsSnapshot> {
    let mut engine = build_engine(params, seed)?;
    let advances = engine.run_until(horizon);
    debug!(
        "Replication seed={} finished: {} resumptions, {} units in flight dropped",
        seed,
        advances,
        engine.model().in_flight()
    );
    Ok(engine.model().snapshot(horizon))
}

/// Run every replication of `config`, in replication order.
///
/// Sequential and Rayon modes produce identical snapshots since each
/// replication owns its own seed and state.
pub fn run_batch(config: &SimulationConfig) -> SimResult<Vec<MetricsSnapshot>> {
    config.validate()?;
    info!(
        "Running {} replications (horizon={}, seed={}, mode={:?})",
        config.replications, config.horizon, config.seed, config.concurrency_mode
    );

    let run = |index: usize| -> SimResult<MetricsSnapshot> {
        let snapshot = run_replication(&config.params, config.replication_seed(index), config.horizon)?;
        info!(
            "Run {}: produced {} watches ({} faulty)",
            index + 1,
            snapshot.production.total,
            snapshot.production.faulty
        );
        Ok(snapshot)
    };

    match config.concurrency_mode {
        ConcurrencyMode::Sequential => (0..config.replications).map(run).collect(),
        ConcurrencyMode::Rayon => {
            let mut builder = rayon::ThreadPoolBuilder::new();
            if let Some(size) = config.thread_pool_size {
                builder = builder.num_threads(size);
            }
            let pool = builder.build()?;
            pool.install(|| (0..config.replications).into_par_iter().map(run).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_rejects_invalid_config() {
        let config = SimulationConfig::new().with_horizon(0.0);
        assert!(run_batch(&config).is_err());
    }

    #[test]
    fn test_batch_returns_one_snapshot_per_replication() {
        let config = SimulationConfig::new().with_horizon(200.0).with_replications(5);
        let snapshots = run_batch(&config).unwrap();
        assert_eq!(snapshots.len(), 5);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = SimulationConfig::new()
            .with_horizon(300.0)
            .with_replications(6)
            .with_seed(11);
        let parallel = sequential
            .clone()
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(3);

        assert_eq!(run_batch(&sequential).unwrap(), run_batch(&parallel).unwrap());
    }
}
