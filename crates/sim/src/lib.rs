//! Simulation scheduler and dashboard aggregation.

pub mod dashboard;
pub mod error;
pub mod scheduler;

pub use dashboard::{Dashboard, DashboardSnapshot};
pub use error::{Result, SimError};
pub use scheduler::SimulationScheduler;
