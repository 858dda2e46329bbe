//! End-to-end lifecycle scenarios across both registries.

use crate::test_utils::harness;
use fleetsim_core::{MissionStatus, RobotStatus};

#[test]
fn basic_lifecycle_walks_every_state() {
    let h = harness(5);
    let (mission_id, robot_id) = h.dispatch_one();

    assert_eq!(h.fleet.get(&robot_id).unwrap().status, RobotStatus::Assigned);
    assert_eq!(
        h.missions.get(&mission_id).unwrap().status,
        MissionStatus::Assigned
    );

    h.fleet.start_mission(&robot_id).unwrap();
    h.missions.start(&mission_id).unwrap();
    assert_eq!(h.fleet.get(&robot_id).unwrap().status, RobotStatus::EnRoute);
    assert_eq!(
        h.missions.get(&mission_id).unwrap().status,
        MissionStatus::InProgress
    );

    h.fleet.start_delivering(&robot_id).unwrap();
    assert_eq!(
        h.fleet.get(&robot_id).unwrap().status,
        RobotStatus::Delivering
    );

    h.fleet.complete_mission(&robot_id).unwrap();
    h.missions.complete(&mission_id).unwrap();
    assert_eq!(
        h.fleet.get(&robot_id).unwrap().status,
        RobotStatus::Completed
    );
    assert_eq!(
        h.missions.get(&mission_id).unwrap().status,
        MissionStatus::Completed
    );

    h.fleet.return_to_idle(&robot_id).unwrap();
    let robot = h.fleet.get(&robot_id).unwrap();
    assert_eq!(robot.status, RobotStatus::Idle);
    assert!(robot.current_mission_id.is_none());

    // Mission timestamps are monotonic
    let mission = h.missions.get(&mission_id).unwrap();
    let assigned = mission.assigned_at_ms.unwrap();
    let started = mission.started_at_ms.unwrap();
    let completed = mission.completed_at_ms.unwrap();
    assert!(mission.created_at_ms <= assigned);
    assert!(assigned <= started);
    assert!(started <= completed);
}

#[test]
fn exhaustion_returns_no_robot() {
    let h = harness(2);

    let (_, first) = h.dispatch_one();
    let (_, second) = h.dispatch_one();
    assert_ne!(first, second);

    let third = h.missions.create();
    assert!(h.fleet.assign_to_available(&third.id).is_none());
    assert_eq!(
        h.missions.get(&third.id).unwrap().status,
        MissionStatus::Pending
    );
}

#[test]
fn statistics_sum_invariant_holds_throughout_lifecycle() {
    let h = harness(4);
    h.scheduler.run_generation_tick();

    for _ in 0..6 {
        let stats = h.fleet.statistics();
        assert_eq!(stats.sum(), stats.total);
        assert_eq!(stats.total, 4);
        h.scheduler.run_transition_sweep();
    }
}

#[test]
fn idle_iff_unbound_across_scheduler_progression() {
    let h = harness(3);
    h.scheduler.run_generation_tick();

    for _ in 0..6 {
        for robot in h.fleet.all() {
            assert_eq!(
                robot.status == RobotStatus::Idle,
                robot.current_mission_id.is_none(),
                "robot {} violates the idle/unbound invariant",
                robot.id
            );
        }
        h.scheduler.run_transition_sweep();
    }
}

#[test]
fn scheduler_drives_missions_to_completion() {
    let h = harness(2);
    h.scheduler.run_generation_tick();
    assert_eq!(h.missions.active().len(), 2);

    for _ in 0..4 {
        h.scheduler.run_transition_sweep();
    }

    assert_eq!(h.missions.by_status(MissionStatus::Completed).len(), 2);
    assert_eq!(h.fleet.statistics().idle, 2);
}
