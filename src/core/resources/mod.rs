pub mod inventory;
pub mod station;

// Re-export commonly used types
pub use inventory::{MaterialInventory, ResupplyPool};
pub use station::Station;
