//! Terminal-mission cleanup and retention scenarios.

use crate::test_utils::harness;
use fleetsim_core::{now_ms, MissionStatus};

/// Drive one mission to COMPLETED through the scheduler.
fn complete_one(h: &crate::test_utils::Harness) -> String {
    let (mission_id, robot_id) = h.dispatch_one();
    h.fleet.start_mission(&robot_id).unwrap();
    h.missions.start(&mission_id).unwrap();
    h.fleet.start_delivering(&robot_id).unwrap();
    h.fleet.complete_mission(&robot_id).unwrap();
    h.missions.complete(&mission_id).unwrap();
    h.fleet.return_to_idle(&robot_id).unwrap();
    mission_id
}

#[test]
fn cleanup_removes_only_aged_terminal_missions() {
    let h = harness(1);
    let retention = 3_600_000;

    let mut completed = Vec::new();
    for _ in 0..10 {
        completed.push(complete_one(&h));
    }
    let pending = h.missions.create();

    // Nothing is old enough yet
    assert_eq!(h.missions.cleanup(retention), 0);

    // Same sweep evaluated one retention window into the future removes
    // exactly the ten terminal missions
    let removed = h.missions.cleanup_at(now_ms() + retention + 1, retention);
    assert_eq!(removed, 10);
    for id in &completed {
        assert!(h.missions.get(id).is_none());
    }
    assert!(h.missions.get(&pending.id).is_some());
}

#[test]
fn zero_retention_removes_all_terminal_immediately() {
    let h = harness(1);
    complete_one(&h);
    let cancelled = h.missions.create();
    h.missions.cancel(&cancelled.id).unwrap();
    let (active_mission, _) = h.dispatch_one();

    let removed = h.missions.cleanup(0);

    assert_eq!(removed, 2);
    assert!(h.missions.get(&active_mission).is_some());
    assert_eq!(
        h.missions.get(&active_mission).unwrap().status,
        MissionStatus::Assigned
    );
}

#[test]
fn cleanup_sweep_leaves_fresh_missions_alone() {
    let h = harness(2);
    h.scheduler.run_generation_tick();
    for _ in 0..4 {
        h.scheduler.run_transition_sweep();
    }
    let terminal = h.missions.by_status(MissionStatus::Completed).len();
    assert!(terminal >= 1);

    // Default retention is one hour; a sweep right after completion keeps
    // everything
    h.scheduler.run_cleanup_sweep();
    assert_eq!(
        h.missions.by_status(MissionStatus::Completed).len(),
        terminal
    );
}
