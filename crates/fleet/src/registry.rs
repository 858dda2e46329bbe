//! Fleet registry: owns the robot collection, implements the assignment
//! policy, aggregates statistics, and publishes robot notifications.
//!
//! All operations are synchronous and complete their mutation and event
//! publication before returning; there is no suspension point between
//! selecting a robot and binding it, so interleaved assignment attempts can
//! never double-book.

use crate::error::{FleetError, Result};
use crate::robot::Robot;
use fleetsim_core::{now_ms, Coordinate, EventBus, FleetEvent, RobotStatus, DEPOT};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::{debug, info};

/// Initial scatter of robot positions around the depot (decimal degrees).
const SPAWN_JITTER_DEG: f64 = 0.002;

/// Derived per-status robot counts.
///
/// Always satisfies `idle + assigned + en_route + delivering + completed
/// == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FleetStatistics {
    pub idle: usize,
    pub assigned: usize,
    pub en_route: usize,
    pub delivering: usize,
    pub completed: usize,
    pub total: usize,
}

impl FleetStatistics {
    /// Sum of the per-status counts.
    pub fn sum(&self) -> usize {
        self.idle + self.assigned + self.en_route + self.delivering + self.completed
    }
}

/// Result of a cancel request against a robot.
///
/// Unknown ids are a benign outcome, not an error: external callers
/// routinely present stale robot ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Robot id not known to the fleet
    NotFound,
    /// Robot exists but held no mission; nothing changed
    AlreadyIdle,
    /// Mission unbound and robot returned to idle
    Cancelled {
        /// The mission that was cancelled
        mission_id: String,
    },
}

impl CancelOutcome {
    /// Whether the robot lookup succeeded.
    pub fn robot_found(&self) -> bool {
        !matches!(self, CancelOutcome::NotFound)
    }
}

struct FleetState {
    robots: BTreeMap<String, Robot>,
    initialized: bool,
}

/// Owner of the robot collection.
///
/// Iteration order over the backing map is by robot id, which makes the
/// assignment policy deterministic: first available means lowest id.
pub struct FleetRegistry {
    state: RwLock<FleetState>,
    events: EventBus,
}

impl FleetRegistry {
    /// Create an empty registry publishing to the given bus.
    pub fn new(events: EventBus) -> Self {
        Self {
            state: RwLock::new(FleetState {
                robots: BTreeMap::new(),
                initialized: false,
            }),
            events,
        }
    }

    /// Populate the fleet with `count` idle robots (`robot-001` ...),
    /// scattered around the depot.
    ///
    /// One-time operation; a second call raises
    /// [`FleetError::AlreadyInitialized`].
    pub fn initialize(&self, count: usize) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.initialized {
            return Err(FleetError::AlreadyInitialized);
        }

        let mut rng = rand::thread_rng();
        for n in 1..=count {
            let id = format!("robot-{n:03}");
            let position = Coordinate {
                lat: DEPOT.lat + rng.gen_range(-SPAWN_JITTER_DEG..=SPAWN_JITTER_DEG),
                lon: DEPOT.lon + rng.gen_range(-SPAWN_JITTER_DEG..=SPAWN_JITTER_DEG),
            };
            state.robots.insert(id.clone(), Robot::new(id, position));
        }
        state.initialized = true;

        info!(count, "fleet initialized");
        Ok(())
    }

    /// Bind a mission to the first available robot.
    ///
    /// Selection and binding happen under a single write-lock acquisition,
    /// so two interleaved calls can never pick the same robot. Returns a
    /// snapshot of the assigned robot, or `None` when no robot is idle.
    pub fn assign_to_available(&self, mission_id: &str) -> Option<Robot> {
        let mut state = self.state.write().unwrap();
        let mut snapshot = None;
        for robot in state.robots.values_mut() {
            if robot.try_assign(mission_id) {
                snapshot = Some(robot.clone());
                break;
            }
        }
        let snapshot = snapshot?;
        // Publish under the lock so notification order matches mutation order
        self.publish_status(&snapshot);
        drop(state);

        debug!(robot_id = %snapshot.id, mission_id, "robot assigned");
        Some(snapshot)
    }

    /// Cancel whatever mission the robot holds.
    ///
    /// Cancelling an idle robot is a no-op reported as
    /// [`CancelOutcome::AlreadyIdle`].
    pub fn cancel_mission(&self, robot_id: &str) -> CancelOutcome {
        let mut state = self.state.write().unwrap();
        let Some(robot) = state.robots.get_mut(robot_id) else {
            debug!(robot_id, "cancel requested for unknown robot");
            return CancelOutcome::NotFound;
        };

        let Some(mission_id) = robot.cancel_current_mission() else {
            return CancelOutcome::AlreadyIdle;
        };
        let snapshot = robot.clone();
        self.events.publish(FleetEvent::MissionCancelled {
            robot_id: snapshot.id.clone(),
            mission_id: mission_id.clone(),
            timestamp_ms: now_ms(),
        });
        self.publish_status(&snapshot);
        drop(state);

        CancelOutcome::Cancelled { mission_id }
    }

    /// ASSIGNED → EN_ROUTE, mediated by the registry for the scheduler.
    pub fn start_mission(&self, robot_id: &str) -> Result<Robot> {
        self.transition(robot_id, Robot::start_mission)
    }

    /// EN_ROUTE → DELIVERING.
    pub fn start_delivering(&self, robot_id: &str) -> Result<Robot> {
        self.transition(robot_id, Robot::start_delivering)
    }

    /// DELIVERING → COMPLETED.
    pub fn complete_mission(&self, robot_id: &str) -> Result<Robot> {
        self.transition(robot_id, Robot::complete_mission)
    }

    /// COMPLETED → IDLE.
    pub fn return_to_idle(&self, robot_id: &str) -> Result<Robot> {
        self.transition(robot_id, Robot::return_to_idle)
    }

    /// O(n) scan producing the per-status counts.
    pub fn statistics(&self) -> FleetStatistics {
        let state = self.state.read().unwrap();
        let mut stats = FleetStatistics {
            total: state.robots.len(),
            ..Default::default()
        };
        for robot in state.robots.values() {
            match robot.status {
                RobotStatus::Idle => stats.idle += 1,
                RobotStatus::Assigned => stats.assigned += 1,
                RobotStatus::EnRoute => stats.en_route += 1,
                RobotStatus::Delivering => stats.delivering += 1,
                RobotStatus::Completed => stats.completed += 1,
            }
        }
        stats
    }

    /// Snapshot of a single robot.
    pub fn get(&self, robot_id: &str) -> Option<Robot> {
        self.state.read().unwrap().robots.get(robot_id).cloned()
    }

    /// Snapshot of every robot, ordered by id.
    pub fn all(&self) -> Vec<Robot> {
        self.state.read().unwrap().robots.values().cloned().collect()
    }

    /// Snapshot of robots currently in `status`.
    pub fn by_status(&self, status: RobotStatus) -> Vec<Robot> {
        self.state
            .read()
            .unwrap()
            .robots
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    /// Snapshot of idle robots.
    pub fn available(&self) -> Vec<Robot> {
        self.by_status(RobotStatus::Idle)
    }

    /// Snapshot of non-idle robots.
    pub fn active(&self) -> Vec<Robot> {
        self.state
            .read()
            .unwrap()
            .robots
            .values()
            .filter(|r| r.is_active())
            .cloned()
            .collect()
    }

    /// Number of robots in the fleet.
    pub fn len(&self) -> usize {
        self.state.read().unwrap().robots.len()
    }

    /// Whether the fleet is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite a robot's display telemetry. Cosmetic only; no state
    /// transition and no notification.
    pub fn update_telemetry(&self, robot_id: &str, position: Coordinate, battery_percent: u8) -> bool {
        let mut state = self.state.write().unwrap();
        match state.robots.get_mut(robot_id) {
            Some(robot) => {
                robot.position = position;
                robot.battery_percent = battery_percent.min(100);
                true
            }
            None => false,
        }
    }

    fn transition(&self, robot_id: &str, op: fn(&mut Robot) -> Result<()>) -> Result<Robot> {
        let mut state = self.state.write().unwrap();
        let robot = state
            .robots
            .get_mut(robot_id)
            .ok_or_else(|| FleetError::RobotNotFound(robot_id.to_string()))?;
        op(robot)?;
        let snapshot = robot.clone();
        self.publish_status(&snapshot);
        drop(state);

        Ok(snapshot)
    }

    fn publish_status(&self, robot: &Robot) {
        self.events.publish(FleetEvent::RobotStatusChanged {
            robot_id: robot.id.clone(),
            status: robot.status,
            mission_id: robot.current_mission_id.clone(),
            timestamp_ms: now_ms(),
        });
    }
}
