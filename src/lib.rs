pub mod analysis;
pub mod core;

// Re-export commonly used types
pub use crate::analysis::AggregatedResults;
pub use crate::core::errors::{SimError, SimResult};
pub use crate::core::execution::{run_batch, run_replication, ConcurrencyMode, FactoryParams, SimulationConfig};
pub use crate::core::factory::WatchFactory;
pub use crate::core::metrics::{MetricsCollector, MetricsSnapshot};
pub use crate::core::simulation_engine::{Reactor, SimulationEngine, SimulationObserver};
pub use crate::core::types::{Material, ProcessId, SimTime, StationId};
