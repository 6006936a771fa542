pub mod errors;
pub mod event_scheduler;
pub mod execution;
pub mod factory;
pub mod metrics;
pub mod process;
pub mod resources;
pub mod sampling;
pub mod simulation_engine;
pub mod types;
