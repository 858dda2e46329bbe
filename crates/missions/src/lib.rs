//! Delivery missions: the mission entity and the registry that owns it.

pub mod error;
pub mod mission;
pub mod registry;

pub use error::{MissionError, Result};
pub use mission::Mission;
pub use registry::MissionRegistry;
