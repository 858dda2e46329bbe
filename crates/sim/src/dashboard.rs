//! Read-only dashboard aggregation.
//!
//! Composes the fleet and mission registries into a single snapshot for
//! external consumers. Snapshots are fresh clones; holding one never
//! observes later mutations.

use fleetsim_core::now_ms;
use fleetsim_fleet::{FleetRegistry, FleetStatistics, Robot};
use fleetsim_missions::{Mission, MissionRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One consistent view of the whole simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Every robot, ordered by id
    pub robots: Vec<Robot>,
    /// Derived per-status fleet counts
    pub statistics: FleetStatistics,
    /// Missions currently bound to a robot
    pub active_missions: Vec<Mission>,
    /// Snapshot timestamp (Unix epoch milliseconds)
    pub generated_at_ms: u64,
}

/// Read-only composition of the two registries.
#[derive(Clone)]
pub struct Dashboard {
    fleet: Arc<FleetRegistry>,
    missions: Arc<MissionRegistry>,
}

impl Dashboard {
    /// Create an aggregator over the given registries.
    pub fn new(fleet: Arc<FleetRegistry>, missions: Arc<MissionRegistry>) -> Self {
        Self { fleet, missions }
    }

    /// Build a fresh snapshot.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            robots: self.fleet.all(),
            statistics: self.fleet.statistics(),
            active_missions: self.missions.active(),
            generated_at_ms: now_ms(),
        }
    }
}
