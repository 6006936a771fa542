//! Configuration for watch factory simulation runs
//!
//! This module provides the model constants (`FactoryParams`) and the batch
//! settings (`SimulationConfig`) that control how many replications run, for how
//! long, and on how many threads.

use crate::core::errors::{SimError, SimResult};
use crate::core::types::{SimTime, STATION_COUNT};

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications are distributed over a Rayon thread pool
    Rayon,
}

/// Stochastic parameters of the assembly line
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryParams {
    /// Mean of the exponential inter-arrival time
    pub arrival_mean: SimTime,
    /// Gaussian work time per station (floored at 0)
    pub work_time_mean: SimTime,
    pub work_time_std_dev: SimTime,
    /// Mean of the exponential repair duration
    pub repair_mean: SimTime,
    /// Failure probability after each work step, indexed by station
    pub failure_probabilities: [f64; STATION_COUNT],
    /// Probability that a finished unit fails the final quality check
    pub defect_probability: f64,
    /// Units per full material container
    pub material_capacity: u32,
    /// Number of resupply agents shared by all materials
    pub resupply_agents: usize,
    /// Gaussian resupply duration (floored at 0)
    pub resupply_time_mean: SimTime,
    pub resupply_time_std_dev: SimTime,
}

impl Default for FactoryParams {
    fn default() -> Self {
        Self {
            arrival_mean: 4.0,
            work_time_mean: 4.0,
            work_time_std_dev: 1.0,
            repair_mean: 3.0,
            failure_probabilities: [0.02, 0.01, 0.05, 0.15, 0.07, 0.06],
            defect_probability: 0.05,
            material_capacity: 25,
            resupply_agents: 3,
            resupply_time_mean: 2.0,
            resupply_time_std_dev: 0.5,
        }
    }
}

impl FactoryParams {
    pub fn validate(&self) -> SimResult<()> {
        positive("arrival_mean", self.arrival_mean)?;
        positive("repair_mean", self.repair_mean)?;
        non_negative("work_time_mean", self.work_time_mean)?;
        non_negative("work_time_std_dev", self.work_time_std_dev)?;
        non_negative("resupply_time_mean", self.resupply_time_mean)?;
        non_negative("resupply_time_std_dev", self.resupply_time_std_dev)?;
        for p in self.failure_probabilities {
            probability("failure_probabilities", p)?;
        }
        probability("defect_probability", self.defect_probability)?;
        if self.material_capacity == 0 {
            return Err(SimError::InvalidParameter { name: "material_capacity", value: 0.0 });
        }
        if self.resupply_agents == 0 {
            return Err(SimError::InvalidParameter { name: "resupply_agents", value: 0.0 });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

fn probability(name: &'static str, value: f64) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

/// Configuration for a batch of replications
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Simulated time at which every replication stops
    pub horizon: SimTime,
    /// Number of independent replications
    pub replications: usize,
    /// Base seed; replication `i` is seeded with `seed + i`
    pub seed: u64,
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
    pub params: FactoryParams,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    ///
    /// Default configuration runs 100 sequential replications of 5000 time units
    pub fn new() -> Self {
        Self {
            horizon: 5000.0,
            replications: 100,
            seed: 42,
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
            params: FactoryParams::default(),
        }
    }

    pub fn with_horizon(mut self, horizon: SimTime) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the concurrency mode for the simulation
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_params(mut self, params: FactoryParams) -> Self {
        self.params = params;
        self
    }

    /// Reject malformed settings before any replication starts
    pub fn validate(&self) -> SimResult<()> {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(SimError::InvalidHorizon(self.horizon));
        }
        if self.replications == 0 {
            return Err(SimError::InvalidReplications);
        }
        if self.thread_pool_size == Some(0) {
            return Err(SimError::InvalidThreadPoolSize);
        }
        self.params.validate()
    }

    /// Seed used by replication `index`
    pub fn replication_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
