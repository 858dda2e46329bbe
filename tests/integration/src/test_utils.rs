//! Shared fixtures for the integration suite.

use std::sync::Arc;

use fleetsim_core::{DurationRange, EventBus, SimTiming};
use fleetsim_fleet::FleetRegistry;
use fleetsim_missions::MissionRegistry;
use fleetsim_sim::SimulationScheduler;

/// Everything a scenario needs, wired the way the service binary wires it.
pub struct Harness {
    pub events: EventBus,
    pub fleet: Arc<FleetRegistry>,
    pub missions: Arc<MissionRegistry>,
    pub scheduler: Arc<SimulationScheduler>,
}

/// Timing with zero dwell windows: every transition sweep advances each
/// active robot by exactly one state.
pub fn instant_timing() -> SimTiming {
    SimTiming {
        assigned_dwell: DurationRange::new(0, 0),
        en_route_dwell: DurationRange::new(0, 0),
        delivering_dwell: DurationRange::new(0, 0),
        completed_dwell: DurationRange::new(0, 0),
        ..SimTiming::default()
    }
}

/// Build a harness with `fleet_size` robots and instant timing.
pub fn harness(fleet_size: usize) -> Harness {
    harness_with_timing(fleet_size, instant_timing())
}

/// Build a harness with explicit timing.
pub fn harness_with_timing(fleet_size: usize, timing: SimTiming) -> Harness {
    let events = EventBus::new();
    let fleet = Arc::new(FleetRegistry::new(events.clone()));
    fleet.initialize(fleet_size).expect("fleet init");
    let missions = Arc::new(MissionRegistry::new(
        events.clone(),
        timing.estimated_duration,
    ));
    let scheduler = Arc::new(SimulationScheduler::new(
        Arc::clone(&fleet),
        Arc::clone(&missions),
        timing,
        events.clone(),
    ));

    Harness {
        events,
        fleet,
        missions,
        scheduler,
    }
}

impl Harness {
    /// Create a mission and bind it to the first available robot on both
    /// registries, returning (mission id, robot id).
    pub fn dispatch_one(&self) -> (String, String) {
        let mission = self.missions.create();
        let robot = self
            .fleet
            .assign_to_available(&mission.id)
            .expect("no robot available");
        self.missions
            .assign(&mission.id, &robot.id)
            .expect("mission assign");
        (mission.id, robot.id)
    }
}
