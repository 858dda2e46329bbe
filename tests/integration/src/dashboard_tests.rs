//! Dashboard composition and live-scheduler behavior.

use crate::test_utils::{harness, harness_with_timing, instant_timing};
use fleetsim_core::{FleetEvent, SimTiming};
use fleetsim_sim::Dashboard;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn dashboard_snapshot_reflects_both_registries() {
    let h = harness(3);
    let dashboard = Dashboard::new(Arc::clone(&h.fleet), Arc::clone(&h.missions));
    h.dispatch_one();

    let snapshot = dashboard.snapshot();

    assert_eq!(snapshot.robots.len(), 3);
    assert_eq!(snapshot.statistics.total, 3);
    assert_eq!(snapshot.statistics.sum(), snapshot.statistics.total);
    assert_eq!(snapshot.statistics.assigned, 1);
    assert_eq!(snapshot.active_missions.len(), 1);

    // Snapshots serialize for the API edge
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"active_missions\""));
}

#[tokio::test]
async fn live_scheduler_generates_and_advances() {
    let timing = SimTiming {
        generation_interval_ms: 20,
        sweep_interval_ms: 10,
        ..instant_timing()
    };
    let h = harness_with_timing(3, timing);
    let mut rx = h.events.subscribe();

    h.scheduler.start().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    h.scheduler.stop();

    assert!(!h.missions.is_empty(), "generation ticks created missions");
    let stats = h.fleet.statistics();
    assert_eq!(stats.sum(), stats.total);

    // The bus carried the start notification and robot activity
    let mut saw_start = false;
    let mut saw_robot_change = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            FleetEvent::SimulationStarted { .. } => saw_start = true,
            FleetEvent::RobotStatusChanged { .. } => saw_robot_change = true,
            _ => {}
        }
    }
    assert!(saw_start);
    assert!(saw_robot_change);
}
