//! Delivery robot entity and its lifecycle state machine.
//!
//! A robot advances IDLE → ASSIGNED → EN_ROUTE → DELIVERING → COMPLETED and
//! back to IDLE. Assignment is a soft "try" operation because it is the
//! contended entry point; every forward transition is hard and raises
//! [`FleetError::InvalidTransition`] when invoked out of order, since those
//! paths are scheduler-internal and a violation is a logic fault.

use crate::error::{FleetError, Result};
use fleetsim_core::{now_ms, Coordinate, RobotStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single delivery robot.
///
/// Robots are owned by the [`FleetRegistry`](crate::registry::FleetRegistry);
/// values handed to external callers are snapshot clones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Robot {
    /// Stable identifier, immutable after creation
    pub id: String,
    /// Current lifecycle status
    pub status: RobotStatus,
    /// Mission currently bound to this robot
    pub current_mission_id: Option<String>,
    /// Creation timestamp (Unix epoch milliseconds)
    pub created_at_ms: u64,
    /// Timestamp of the last status change (Unix epoch milliseconds)
    pub status_changed_at_ms: u64,
    /// Display position (cosmetic random walk, no physical model)
    pub position: Coordinate,
    /// Display battery level 0-100 (cosmetic)
    pub battery_percent: u8,
}

impl Robot {
    /// Create an idle robot at the given position.
    pub fn new(id: impl Into<String>, position: Coordinate) -> Self {
        let now = now_ms();
        Self {
            id: id.into(),
            status: RobotStatus::Idle,
            current_mission_id: None,
            created_at_ms: now,
            status_changed_at_ms: now,
            position,
            battery_percent: 100,
        }
    }

    /// Whether this robot can accept a mission.
    pub fn is_available(&self) -> bool {
        self.status == RobotStatus::Idle
    }

    /// Whether this robot currently holds a mission.
    pub fn is_active(&self) -> bool {
        self.status != RobotStatus::Idle
    }

    /// Try to bind a mission to this robot.
    ///
    /// Returns `false` without modifying anything unless the robot is idle.
    /// Assignment races are expected under interleaved callers, so this is
    /// a benign failure rather than an error.
    pub fn try_assign(&mut self, mission_id: &str) -> bool {
        if self.status != RobotStatus::Idle {
            return false;
        }
        self.current_mission_id = Some(mission_id.to_string());
        self.set_status(RobotStatus::Assigned);
        true
    }

    /// Depart for the delivery: ASSIGNED → EN_ROUTE.
    pub fn start_mission(&mut self) -> Result<()> {
        self.advance(RobotStatus::Assigned, RobotStatus::EnRoute, "start_mission")
    }

    /// Begin the delivery: EN_ROUTE → DELIVERING.
    pub fn start_delivering(&mut self) -> Result<()> {
        self.advance(
            RobotStatus::EnRoute,
            RobotStatus::Delivering,
            "start_delivering",
        )
    }

    /// Finish the delivery: DELIVERING → COMPLETED.
    pub fn complete_mission(&mut self) -> Result<()> {
        self.advance(
            RobotStatus::Delivering,
            RobotStatus::Completed,
            "complete_mission",
        )
    }

    /// Return to the pool: COMPLETED → IDLE, clearing the mission binding.
    pub fn return_to_idle(&mut self) -> Result<()> {
        self.advance(RobotStatus::Completed, RobotStatus::Idle, "return_to_idle")?;
        self.current_mission_id = None;
        Ok(())
    }

    /// Cancel whatever mission this robot holds, from any non-idle state.
    ///
    /// Returns the unbound mission id, or `None` when the robot was already
    /// idle. Safe to race against forward progression: whichever side runs
    /// first wins and the other observes a consistent state.
    pub fn cancel_current_mission(&mut self) -> Option<String> {
        if self.status == RobotStatus::Idle {
            debug!(robot_id = %self.id, "cancel requested on idle robot, ignoring");
            return None;
        }
        let mission_id = self.current_mission_id.take();
        self.set_status(RobotStatus::Idle);
        mission_id
    }

    fn advance(
        &mut self,
        expected: RobotStatus,
        next: RobotStatus,
        operation: &'static str,
    ) -> Result<()> {
        if self.status != expected {
            return Err(FleetError::InvalidTransition {
                robot_id: self.id.clone(),
                current: self.status,
                operation,
            });
        }
        self.set_status(next);
        Ok(())
    }

    fn set_status(&mut self, status: RobotStatus) {
        self.status = status;
        self.status_changed_at_ms = now_ms();
    }
}
