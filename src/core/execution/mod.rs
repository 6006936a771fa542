pub mod config;
pub mod replication;

// Re-export commonly used types
pub use config::{ConcurrencyMode, FactoryParams, SimulationConfig};
pub use replication::{build_engine, run_batch, run_replication};
