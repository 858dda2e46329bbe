//! Mission registry: creation, registry-mediated transitions, cleanup, and
//! query views.
//!
//! Unlike robot assignment, mission transitions raise hard errors on
//! unknown ids or state mismatches: registry calls are scheduler-initiated
//! after a successful robot-side operation, so a failure here means the two
//! registries have desynchronized and must not be silently swallowed.

use crate::error::{MissionError, Result};
use crate::mission::Mission;
use fleetsim_core::{now_ms, Coordinate, DurationRange, EventBus, FleetEvent, MissionStatus, DEPOT};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// Scatter of generated destinations around the depot (decimal degrees).
const DELIVERY_RADIUS_DEG: f64 = 0.02;

/// Owner of the mission collection.
pub struct MissionRegistry {
    missions: RwLock<BTreeMap<String, Mission>>,
    events: EventBus,
    estimated_duration: DurationRange,
}

impl MissionRegistry {
    /// Create an empty registry.
    ///
    /// `estimated_duration` is the display-only duration window sampled for
    /// each new mission.
    pub fn new(events: EventBus, estimated_duration: DurationRange) -> Self {
        Self {
            missions: RwLock::new(BTreeMap::new()),
            events,
            estimated_duration,
        }
    }

    /// Create a fresh pending mission with a generated id, a sampled
    /// estimated duration, and a destination near the depot.
    pub fn create(&self) -> Mission {
        let id = format!("msn-{}", Uuid::new_v4());
        let mut rng = rand::thread_rng();
        let destination = Coordinate {
            lat: DEPOT.lat + rng.gen_range(-DELIVERY_RADIUS_DEG..=DELIVERY_RADIUS_DEG),
            lon: DEPOT.lon + rng.gen_range(-DELIVERY_RADIUS_DEG..=DELIVERY_RADIUS_DEG),
        };
        let mission = Mission::new(id, self.estimated_duration.sample(), destination);

        {
            let mut missions = self.missions.write().unwrap();
            missions.insert(mission.id.clone(), mission.clone());
            // Publish under the lock so notification order matches mutation
            // order
            self.publish_status(&mission);
        }

        debug!(mission_id = %mission.id, "mission created");
        mission
    }

    /// PENDING → ASSIGNED, recording the robot and the assignment time.
    pub fn assign(&self, mission_id: &str, robot_id: &str) -> Result<()> {
        let robot_id = robot_id.to_string();
        self.transition(mission_id, "assign", MissionStatus::Pending, |mission| {
            mission.status = MissionStatus::Assigned;
            mission.assigned_robot_id = Some(robot_id);
            mission.assigned_at_ms = Some(now_ms());
        })
    }

    /// ASSIGNED → IN_PROGRESS.
    pub fn start(&self, mission_id: &str) -> Result<()> {
        self.transition(mission_id, "start", MissionStatus::Assigned, |mission| {
            mission.status = MissionStatus::InProgress;
            mission.started_at_ms = Some(now_ms());
        })
    }

    /// IN_PROGRESS → COMPLETED.
    pub fn complete(&self, mission_id: &str) -> Result<()> {
        self.transition(mission_id, "complete", MissionStatus::InProgress, |mission| {
            mission.status = MissionStatus::Completed;
            mission.completed_at_ms = Some(now_ms());
        })
    }

    /// Cancel a mission from any non-terminal state.
    ///
    /// Cancelling an already-terminal mission is a warned no-op, not an
    /// error, so cancellation can race safely against forward progression.
    /// Unknown ids still raise [`MissionError::NotFound`].
    pub fn cancel(&self, mission_id: &str) -> Result<()> {
        let mut missions = self.missions.write().unwrap();
        let mission = missions
            .get_mut(mission_id)
            .ok_or_else(|| MissionError::NotFound(mission_id.to_string()))?;

        if mission.is_terminal() {
            warn!(mission_id, status = ?mission.status, "cancel requested on terminal mission, ignoring");
            return Ok(());
        }

        mission.status = MissionStatus::Cancelled;
        mission.cancelled_at_ms = Some(now_ms());
        let snapshot = mission.clone();
        self.publish_status(&snapshot);
        drop(missions);

        Ok(())
    }

    /// Remove terminal missions older than `max_age_ms`.
    ///
    /// A `max_age_ms` of 0 removes every terminal mission immediately.
    /// Returns the number removed.
    pub fn cleanup(&self, max_age_ms: u64) -> usize {
        self.cleanup_at(now_ms(), max_age_ms)
    }

    /// Cleanup against an explicit clock reading, for deterministic tests
    /// and for sweeps that already sampled the time.
    pub fn cleanup_at(&self, now_ms: u64, max_age_ms: u64) -> usize {
        let cutoff = now_ms.saturating_sub(max_age_ms);
        let mut missions = self.missions.write().unwrap();
        let before = missions.len();
        missions.retain(|_, m| !(m.is_terminal() && m.created_at_ms <= cutoff));
        let removed = before - missions.len();
        if removed > 0 {
            debug!(removed, "removed terminal missions");
        }
        removed
    }

    /// Snapshot of a single mission.
    pub fn get(&self, mission_id: &str) -> Option<Mission> {
        self.missions.read().unwrap().get(mission_id).cloned()
    }

    /// Snapshot of every mission.
    pub fn all(&self) -> Vec<Mission> {
        self.missions.read().unwrap().values().cloned().collect()
    }

    /// Snapshot of missions currently in `status`.
    pub fn by_status(&self, status: MissionStatus) -> Vec<Mission> {
        self.missions
            .read()
            .unwrap()
            .values()
            .filter(|m| m.status == status)
            .cloned()
            .collect()
    }

    /// Snapshot of missions bound to a robot (ASSIGNED ∪ IN_PROGRESS).
    pub fn active(&self) -> Vec<Mission> {
        self.missions
            .read()
            .unwrap()
            .values()
            .filter(|m| m.is_active())
            .cloned()
            .collect()
    }

    /// Snapshot of missions still waiting for a robot.
    pub fn pending(&self) -> Vec<Mission> {
        self.by_status(MissionStatus::Pending)
    }

    /// Number of missions currently held.
    pub fn len(&self) -> usize {
        self.missions.read().unwrap().len()
    }

    /// Whether the registry holds no missions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn transition(
        &self,
        mission_id: &str,
        operation: &'static str,
        expected: MissionStatus,
        apply: impl FnOnce(&mut Mission),
    ) -> Result<()> {
        let mut missions = self.missions.write().unwrap();
        let mission = missions
            .get_mut(mission_id)
            .ok_or_else(|| MissionError::NotFound(mission_id.to_string()))?;

        if mission.status != expected {
            return Err(MissionError::InvalidTransition {
                mission_id: mission_id.to_string(),
                current: mission.status,
                operation,
            });
        }

        apply(mission);
        let snapshot = mission.clone();
        self.publish_status(&snapshot);
        drop(missions);

        Ok(())
    }

    fn publish_status(&self, mission: &Mission) {
        self.events.publish(FleetEvent::MissionStatusChanged {
            mission_id: mission.id.clone(),
            status: mission.status,
            robot_id: mission.assigned_robot_id.clone(),
            timestamp_ms: now_ms(),
        });
    }

    #[cfg(test)]
    fn backdate(&self, mission_id: &str, created_at_ms: u64) {
        let mut missions = self.missions.write().unwrap();
        missions.get_mut(mission_id).unwrap().created_at_ms = created_at_ms;
    }
}
