//! Fleet errors
//!
//! Pure domain errors with no infrastructure dependencies

use fleetsim_core::RobotStatus;
use thiserror::Error;

/// Errors raised by the robot state machine and the fleet registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    /// Operation referenced an unknown robot
    #[error("Robot not found: {0}")]
    RobotNotFound(String),

    /// A state-machine operation was invoked from a state that does not
    /// permit it
    #[error("Invalid transition: {operation} on robot {robot_id} in state {current:?}")]
    InvalidTransition {
        /// Robot identifier
        robot_id: String,
        /// State the robot was in when the operation was attempted
        current: RobotStatus,
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// The registry was initialized a second time
    #[error("Fleet registry is already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, FleetError>;
