pub mod aggregate;
pub mod export;

// Re-export commonly used types
pub use aggregate::AggregatedResults;
pub use export::{export_dashboard_data, material_summary, production_series, station_summary, write_csv};
