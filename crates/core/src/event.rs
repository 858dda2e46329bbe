//! Typed notification bus for fleet-wide state changes.
//!
//! Robots and missions do not emit events themselves; the owning registry
//! publishes a [`FleetEvent`] after each successful mutation. Consumers
//! (the WebSocket feed, tests) subscribe through the shared [`EventBus`].

use crate::types::{MissionStatus, RobotStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the broadcast channel backing the event bus.
pub const EVENT_BUS_CAPACITY: usize = 1000;

/// A state-change notification published by a registry or the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FleetEvent {
    /// A robot moved to a new lifecycle state
    RobotStatusChanged {
        /// Robot identifier
        robot_id: String,
        /// New robot status
        status: RobotStatus,
        /// Mission currently bound to the robot, if any
        mission_id: Option<String>,
        /// Event timestamp (Unix epoch milliseconds)
        timestamp_ms: u64,
    },
    /// A robot's mission was cancelled mid-flight
    MissionCancelled {
        /// Robot that was carrying the mission
        robot_id: String,
        /// Cancelled mission identifier
        mission_id: String,
        /// Event timestamp (Unix epoch milliseconds)
        timestamp_ms: u64,
    },
    /// A mission moved to a new lifecycle state
    MissionStatusChanged {
        /// Mission identifier
        mission_id: String,
        /// New mission status
        status: MissionStatus,
        /// Robot the mission is assigned to, if any
        robot_id: Option<String>,
        /// Event timestamp (Unix epoch milliseconds)
        timestamp_ms: u64,
    },
    /// The simulation scheduler started
    SimulationStarted {
        /// Event timestamp (Unix epoch milliseconds)
        timestamp_ms: u64,
    },
    /// The simulation scheduler stopped
    SimulationStopped {
        /// Event timestamp (Unix epoch milliseconds)
        timestamp_ms: u64,
    },
}

/// Broadcast bus carrying [`FleetEvent`]s to any number of subscribers.
///
/// Publishing never blocks and never fails: events sent while no subscriber
/// is attached are dropped, and slow subscribers observe a lag error on
/// their receiver rather than backpressuring publishers.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FleetEvent>,
}

impl EventBus {
    /// Create a bus with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Create a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUS_CAPACITY)
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: FleetEvent) {
        // Send errors only mean there are no receivers right now
        let _ = self.tx.send(event);
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<FleetEvent> {
        self.tx.subscribe()
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
