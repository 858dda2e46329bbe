//! Time-driven simulation scheduler.
//!
//! The scheduler is the only component that drives time-based progression.
//! It arms three independent periodic loops:
//!
//! 1. Mission generation: creates a batch of missions each period and
//!    dispatches them to available robots.
//! 2. State-transition sweep: retries pending assignments, advances every
//!    robot whose dwell deadline has expired, and walks display telemetry.
//! 3. Cleanup sweep: removes terminal missions past the retention window.
//!
//! Dwell deadlines are sampled once when a robot enters a state and stored
//! until the transition fires. A fault in one robot/mission pair is logged
//! and contained at the sweep boundary; the rest of the fleet keeps moving.

use crate::error::{Result, SimError};
use fleetsim_core::{now_ms, Coordinate, DurationRange, EventBus, FleetEvent, RobotStatus, SimTiming};
use fleetsim_fleet::{FleetRegistry, Robot};
use fleetsim_missions::MissionRegistry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};

/// Per-sweep random walk applied to an active robot's position (degrees).
const POSITION_WALK_DEG: f64 = 0.0005;

/// Battery percentage recovered per sweep while idle.
const BATTERY_RECHARGE_STEP: u8 = 2;

/// The orchestrating control loop of the simulation.
pub struct SimulationScheduler {
    fleet: Arc<FleetRegistry>,
    missions: Arc<MissionRegistry>,
    timing: SimTiming,
    events: EventBus,
    running: AtomicBool,
    /// robot id → epoch-ms deadline at which its current state expires
    deadlines: Mutex<HashMap<String, u64>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SimulationScheduler {
    /// Create a stopped scheduler over the given registries.
    pub fn new(
        fleet: Arc<FleetRegistry>,
        missions: Arc<MissionRegistry>,
        timing: SimTiming,
        events: EventBus,
    ) -> Self {
        Self {
            fleet,
            missions,
            timing,
            events,
            running: AtomicBool::new(false),
            deadlines: Mutex::new(HashMap::new()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Arm the three periodic loops.
    ///
    /// Starting an already-running scheduler is a caller bug and raises
    /// [`SimError::AlreadyRunning`].
    pub fn start(self: &Arc<Self>) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SimError::AlreadyRunning);
        }

        let mut tasks = self.tasks.lock().unwrap();

        let scheduler = Arc::clone(self);
        tasks.push(tokio::spawn(async move {
            let period = Duration::from_millis(scheduler.timing.generation_interval_ms);
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                scheduler.run_generation_tick();
            }
        }));

        let scheduler = Arc::clone(self);
        tasks.push(tokio::spawn(async move {
            let period = Duration::from_millis(scheduler.timing.sweep_interval_ms);
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                scheduler.run_transition_sweep();
            }
        }));

        let scheduler = Arc::clone(self);
        tasks.push(tokio::spawn(async move {
            let period = Duration::from_millis(scheduler.timing.cleanup_interval_ms);
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                scheduler.run_cleanup_sweep();
            }
        }));

        self.events.publish(FleetEvent::SimulationStarted {
            timestamp_ms: now_ms(),
        });
        info!(
            generation_interval_ms = self.timing.generation_interval_ms,
            sweep_interval_ms = self.timing.sweep_interval_ms,
            cleanup_interval_ms = self.timing.cleanup_interval_ms,
            "simulation started"
        );
        Ok(())
    }

    /// Disarm all loops. Safe to call when not running.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("simulation scheduler is not running, stop ignored");
            return;
        }

        for task in self.tasks.lock().unwrap().drain(..) {
            task.abort();
        }

        self.events.publish(FleetEvent::SimulationStopped {
            timestamp_ms: now_ms(),
        });
        info!("simulation stopped");
    }

    /// Whether the loops are currently armed.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Mission-generation tick body: create a batch of missions and
    /// dispatch each to an available robot. Missions that find no robot
    /// stay pending and are retried by the transition sweep.
    pub fn run_generation_tick(&self) {
        debug!(count = self.timing.missions_per_tick, "mission generation tick");
        for _ in 0..self.timing.missions_per_tick {
            let mission = self.missions.create();
            match self.try_dispatch(&mission.id) {
                Ok(true) => {}
                Ok(false) => debug!(mission_id = %mission.id, "no robot available, mission stays pending"),
                Err(e) => error!(mission_id = %mission.id, error = %e, "dispatch failed"),
            }
        }
    }

    /// State-transition sweep body: retry pending assignments, advance
    /// robots past their dwell deadline, walk display telemetry.
    ///
    /// Errors from a single robot/mission pair are logged and do not abort
    /// the sweep.
    pub fn run_transition_sweep(&self) {
        for mission in self.missions.pending() {
            match self.try_dispatch(&mission.id) {
                Ok(true) => {}
                // Pool exhausted, later pending missions cannot fare better
                Ok(false) => break,
                Err(e) => error!(mission_id = %mission.id, error = %e, "pending retry failed"),
            }
        }

        let now = now_ms();
        for robot in self.fleet.active() {
            if let Err(e) = self.advance_robot(&robot, now) {
                error!(robot_id = %robot.id, error = %e, "transition failed, continuing sweep");
            }
        }

        self.walk_telemetry();
    }

    /// Cleanup sweep body: drop terminal missions past the retention window.
    pub fn run_cleanup_sweep(&self) {
        let removed = self.missions.cleanup(self.timing.retention_ms);
        if removed > 0 {
            info!(removed, retention_ms = self.timing.retention_ms, "cleanup sweep");
        }
    }

    /// Assign a mission to the first available robot and mirror the
    /// assignment on the mission side. Returns `Ok(false)` when no robot
    /// is available.
    fn try_dispatch(&self, mission_id: &str) -> Result<bool> {
        let Some(robot) = self.fleet.assign_to_available(mission_id) else {
            return Ok(false);
        };
        self.missions.assign(mission_id, &robot.id)?;
        self.set_deadline(&robot.id, now_ms() + self.timing.assigned_dwell.sample());
        Ok(true)
    }

    /// Advance one robot if its dwell deadline has expired, mirroring the
    /// mission-side transition where the lifecycle requires it.
    fn advance_robot(&self, robot: &Robot, now: u64) -> Result<()> {
        let deadline = self.deadline_for(robot, now);
        if now < deadline {
            return Ok(());
        }

        match robot.status {
            RobotStatus::Assigned => {
                let mission_id = self.bound_mission(robot)?;
                self.fleet.start_mission(&robot.id)?;
                self.missions.start(&mission_id)?;
                self.set_deadline(&robot.id, now + self.timing.en_route_dwell.sample());
            }
            RobotStatus::EnRoute => {
                self.fleet.start_delivering(&robot.id)?;
                self.set_deadline(&robot.id, now + self.timing.delivering_dwell.sample());
            }
            RobotStatus::Delivering => {
                let mission_id = self.bound_mission(robot)?;
                self.fleet.complete_mission(&robot.id)?;
                self.missions.complete(&mission_id)?;
                self.set_deadline(&robot.id, now + self.timing.completed_dwell.sample());
            }
            RobotStatus::Completed => {
                self.fleet.return_to_idle(&robot.id)?;
                self.deadlines.lock().unwrap().remove(&robot.id);
            }
            RobotStatus::Idle => {
                self.deadlines.lock().unwrap().remove(&robot.id);
            }
        }
        Ok(())
    }

    /// Deadline for the robot's current state, sampling and storing one if
    /// none is recorded yet (covers states entered outside this scheduler).
    fn deadline_for(&self, robot: &Robot, now: u64) -> u64 {
        let mut deadlines = self.deadlines.lock().unwrap();
        *deadlines
            .entry(robot.id.clone())
            .or_insert_with(|| now + self.dwell_for(robot.status).map_or(0, |r| r.sample()))
    }

    fn dwell_for(&self, status: RobotStatus) -> Option<DurationRange> {
        match status {
            RobotStatus::Assigned => Some(self.timing.assigned_dwell),
            RobotStatus::EnRoute => Some(self.timing.en_route_dwell),
            RobotStatus::Delivering => Some(self.timing.delivering_dwell),
            RobotStatus::Completed => Some(self.timing.completed_dwell),
            RobotStatus::Idle => None,
        }
    }

    fn set_deadline(&self, robot_id: &str, deadline_ms: u64) {
        self.deadlines
            .lock()
            .unwrap()
            .insert(robot_id.to_string(), deadline_ms);
    }

    fn bound_mission(&self, robot: &Robot) -> Result<String> {
        robot
            .current_mission_id
            .clone()
            .ok_or_else(|| SimError::MissingBinding {
                robot_id: robot.id.clone(),
            })
    }

    /// Cosmetic per-sweep telemetry walk: active robots drift and drain,
    /// idle robots recharge.
    fn walk_telemetry(&self) {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        for robot in self.fleet.all() {
            let (position, battery) = if robot.is_active() {
                (
                    Coordinate {
                        lat: robot.position.lat + rng.gen_range(-POSITION_WALK_DEG..=POSITION_WALK_DEG),
                        lon: robot.position.lon + rng.gen_range(-POSITION_WALK_DEG..=POSITION_WALK_DEG),
                    },
                    robot.battery_percent.saturating_sub(rng.gen_range(0..=1)),
                )
            } else {
                (
                    robot.position,
                    robot.battery_percent.saturating_add(BATTERY_RECHARGE_STEP).min(100),
                )
            };
            self.fleet.update_telemetry(&robot.id, position, battery);
        }
    }
}

impl Drop for SimulationScheduler {
    fn drop(&mut self) {
        for task in self.tasks.lock().unwrap().drain(..) {
            task.abort();
        }
    }
}
