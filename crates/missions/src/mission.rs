//! Delivery mission entity.

use fleetsim_core::{now_ms, Coordinate, MissionStatus};
use serde::{Deserialize, Serialize};

/// A single delivery mission.
///
/// Missions are owned by the
/// [`MissionRegistry`](crate::registry::MissionRegistry) and mutated only
/// through registry-mediated transitions; values handed to external callers
/// are snapshot clones. Each lifecycle timestamp stays `None` until the
/// corresponding state is reached, and a later timestamp is never set before
/// an earlier one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mission {
    /// Stable identifier, unique across the process lifetime
    pub id: String,
    /// Current lifecycle status
    pub status: MissionStatus,
    /// Display hint only; the scheduler's dwell windows drive transitions
    pub estimated_duration_ms: u64,
    /// Robot the mission is assigned to
    pub assigned_robot_id: Option<String>,
    /// Delivery destination (cosmetic)
    pub destination: Coordinate,
    /// Creation timestamp (Unix epoch milliseconds)
    pub created_at_ms: u64,
    /// Set when the mission is bound to a robot
    pub assigned_at_ms: Option<u64>,
    /// Set when the robot departs
    pub started_at_ms: Option<u64>,
    /// Set on successful delivery
    pub completed_at_ms: Option<u64>,
    /// Set on cancellation
    pub cancelled_at_ms: Option<u64>,
}

impl Mission {
    /// Create a pending mission.
    pub fn new(id: impl Into<String>, estimated_duration_ms: u64, destination: Coordinate) -> Self {
        Self {
            id: id.into(),
            status: MissionStatus::Pending,
            estimated_duration_ms,
            assigned_robot_id: None,
            destination,
            created_at_ms: now_ms(),
            assigned_at_ms: None,
            started_at_ms: None,
            completed_at_ms: None,
            cancelled_at_ms: None,
        }
    }

    /// Whether the mission has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the mission is bound to a robot.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
