//! Core functionality for the fleetsim delivery-robot simulation.
//!
//! This crate provides the shared domain types, event bus, timing
//! configuration, and logging bootstrap used across the fleetsim workspace.

pub mod config;
pub mod event;
pub mod logging;
pub mod types;

pub use config::{FleetConfig, SimConfig, SimTiming};
pub use event::{EventBus, FleetEvent, EVENT_BUS_CAPACITY};
pub use types::{now_ms, Coordinate, DurationRange, MissionStatus, RobotStatus, DEPOT};
