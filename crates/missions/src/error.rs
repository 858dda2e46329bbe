//! Mission errors
//!
//! Pure domain errors with no infrastructure dependencies

use fleetsim_core::MissionStatus;
use thiserror::Error;

/// Errors raised by the mission registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MissionError {
    /// Operation referenced an unknown mission
    #[error("Mission not found: {0}")]
    NotFound(String),

    /// A transition was requested from a state that does not permit it
    #[error("Invalid transition: {operation} on mission {mission_id} in state {current:?}")]
    InvalidTransition {
        /// Mission identifier
        mission_id: String,
        /// State the mission was in when the operation was attempted
        current: MissionStatus,
        /// Name of the rejected operation
        operation: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, MissionError>;
