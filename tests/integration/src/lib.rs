//! Integration tests for the fleetsim workspace
//!
//! This test suite validates:
//! - The full robot/mission lifecycle across both registries
//! - Fleet exhaustion and pending-mission retry behavior
//! - Cancellation racing against the scheduler's forward progression
//! - Terminal-mission cleanup and retention
//! - Dashboard composition and the event bus

pub mod test_utils;

#[cfg(test)]
mod lifecycle_tests;

#[cfg(test)]
mod cancellation_tests;

#[cfg(test)]
mod cleanup_tests;

#[cfg(test)]
mod dashboard_tests;
