pub mod arrivals;
pub mod assembly;

// Re-export commonly used types
pub use arrivals::ArrivalGenerator;
pub use assembly::{AssemblyProcess, AssemblyState, Suspend, ASSEMBLY_STEPS};
