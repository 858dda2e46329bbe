//! Scheduler errors

use fleetsim_fleet::FleetError;
use fleetsim_missions::MissionError;
use thiserror::Error;

/// Errors raised by the simulation scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// `start` was called while the scheduler was running
    #[error("Simulation scheduler is already running")]
    AlreadyRunning,

    /// Reserved for callers that need to distinguish a stopped scheduler;
    /// `stop` itself treats the condition as a warned no-op
    #[error("Simulation scheduler is not running")]
    NotRunning,

    /// An active robot had no bound mission, which means the fleet and
    /// mission registries have desynchronized
    #[error("Robot {robot_id} is active but has no bound mission")]
    MissingBinding {
        /// Robot identifier
        robot_id: String,
    },

    /// A robot-side operation failed inside a sweep
    #[error(transparent)]
    Fleet(#[from] FleetError),

    /// A mission-side operation failed inside a sweep
    #[error(transparent)]
    Mission(#[from] MissionError),
}

pub type Result<T> = std::result::Result<T, SimError>;
