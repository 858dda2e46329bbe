//! Shared domain types for the fleetsim system.
//!
//! Status enums, timestamps, coordinates, and duration ranges used by the
//! fleet, mission, and simulation crates.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Lifecycle status of a delivery robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    /// Robot is idle and available for assignment
    Idle,
    /// Robot has been bound to a mission but has not departed
    Assigned,
    /// Robot is travelling to the pickup/delivery area
    EnRoute,
    /// Robot is performing the delivery
    Delivering,
    /// Robot finished the delivery and is returning to idle
    Completed,
}

impl RobotStatus {
    /// All robot states, in lifecycle order.
    pub const ALL: [RobotStatus; 5] = [
        RobotStatus::Idle,
        RobotStatus::Assigned,
        RobotStatus::EnRoute,
        RobotStatus::Delivering,
        RobotStatus::Completed,
    ];
}

/// Lifecycle status of a delivery mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// Created, waiting for a robot
    Pending,
    /// Bound to a robot, not yet started
    Assigned,
    /// Robot is executing the mission
    InProgress,
    /// Delivered successfully
    Completed,
    /// Cancelled before completion
    Cancelled,
    /// Reserved terminal state, not produced by the current transitions
    Failed,
}

impl MissionStatus {
    /// Terminal states are never left once entered.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MissionStatus::Completed | MissionStatus::Cancelled | MissionStatus::Failed
        )
    }

    /// Active missions are bound to a robot.
    pub fn is_active(&self) -> bool {
        matches!(self, MissionStatus::Assigned | MissionStatus::InProgress)
    }
}

/// Geographic coordinate for display telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

/// Depot origin all robots and missions are seeded around.
pub const DEPOT: Coordinate = Coordinate {
    lat: 37.7749,
    lon: -122.4194,
};

/// Inclusive range of durations in milliseconds.
///
/// Used for dwell-time and estimated-duration sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    /// Lower bound in milliseconds (inclusive)
    pub min_ms: u64,
    /// Upper bound in milliseconds (inclusive)
    pub max_ms: u64,
}

impl DurationRange {
    /// Create a new range. `min_ms` must not exceed `max_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        debug_assert!(min_ms <= max_ms);
        Self { min_ms, max_ms }
    }

    /// Sample a duration uniformly from the inclusive range.
    pub fn sample(&self) -> u64 {
        if self.min_ms >= self.max_ms {
            return self.min_ms;
        }
        rand::thread_rng().gen_range(self.min_ms..=self.max_ms)
    }
}

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
