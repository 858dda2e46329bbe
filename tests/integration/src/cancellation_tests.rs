//! Cancellation scenarios, including races with the scheduler.

use crate::test_utils::harness;
use fleetsim_core::{FleetEvent, MissionStatus, RobotStatus};
use fleetsim_fleet::CancelOutcome;

#[test]
fn cancel_mid_flight_frees_robot_and_terminates_mission() {
    let h = harness(1);
    let (mission_id, robot_id) = h.dispatch_one();

    // Advance to DELIVERING
    h.fleet.start_mission(&robot_id).unwrap();
    h.missions.start(&mission_id).unwrap();
    h.fleet.start_delivering(&robot_id).unwrap();

    let outcome = h.fleet.cancel_mission(&robot_id);
    assert_eq!(
        outcome,
        CancelOutcome::Cancelled {
            mission_id: mission_id.clone()
        }
    );
    h.missions.cancel(&mission_id).unwrap();

    let robot = h.fleet.get(&robot_id).unwrap();
    assert_eq!(robot.status, RobotStatus::Idle);
    assert!(robot.current_mission_id.is_none());
    assert_eq!(
        h.missions.get(&mission_id).unwrap().status,
        MissionStatus::Cancelled
    );
}

#[test]
fn cancel_is_idempotent_on_robot_and_mission() {
    let h = harness(1);
    let (mission_id, robot_id) = h.dispatch_one();

    assert!(matches!(
        h.fleet.cancel_mission(&robot_id),
        CancelOutcome::Cancelled { .. }
    ));
    h.missions.cancel(&mission_id).unwrap();

    // Second round: robot already idle, mission already terminal
    assert_eq!(h.fleet.cancel_mission(&robot_id), CancelOutcome::AlreadyIdle);
    h.missions.cancel(&mission_id).unwrap();

    let robot = h.fleet.get(&robot_id).unwrap();
    assert_eq!(robot.status, RobotStatus::Idle);
    assert_eq!(
        h.missions.get(&mission_id).unwrap().status,
        MissionStatus::Cancelled
    );
}

#[test]
fn cancelled_robot_is_reassignable() {
    let h = harness(1);
    let (mission_id, robot_id) = h.dispatch_one();

    h.fleet.cancel_mission(&robot_id);
    h.missions.cancel(&mission_id).unwrap();

    let (second_mission, second_robot) = h.dispatch_one();
    assert_eq!(second_robot, robot_id);
    assert_eq!(
        h.missions.get(&second_mission).unwrap().status,
        MissionStatus::Assigned
    );
}

#[test]
fn cancellation_then_sweep_does_not_corrupt_state() {
    let h = harness(2);
    h.scheduler.run_generation_tick();
    let robot = h.fleet.active().remove(0);
    let mission_id = robot.current_mission_id.clone().unwrap();

    // Cancel between sweeps; the next sweep must not resurrect the pair
    h.fleet.cancel_mission(&robot.id);
    h.missions.cancel(&mission_id).unwrap();
    h.scheduler.run_transition_sweep();

    assert_eq!(
        h.missions.get(&mission_id).unwrap().status,
        MissionStatus::Cancelled
    );
    let stats = h.fleet.statistics();
    assert_eq!(stats.sum(), stats.total);
}

#[test]
fn cancel_emits_typed_events() {
    let h = harness(1);
    let (mission_id, robot_id) = h.dispatch_one();
    let mut rx = h.events.subscribe();

    h.fleet.cancel_mission(&robot_id);

    match rx.try_recv().unwrap() {
        FleetEvent::MissionCancelled {
            robot_id: r,
            mission_id: m,
            ..
        } => {
            assert_eq!(r, robot_id);
            assert_eq!(m, mission_id);
        }
        other => panic!("expected MissionCancelled, got {other:?}"),
    }
    assert!(matches!(
        rx.try_recv().unwrap(),
        FleetEvent::RobotStatusChanged {
            status: RobotStatus::Idle,
            ..
        }
    ));
}
