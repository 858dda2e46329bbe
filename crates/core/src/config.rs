//! Simulation configuration.
//!
//! Timing constants default to the production cadence: mission generation
//! every minute, transition sweeps every ten seconds, cleanup every five
//! minutes with a one-hour retention window.

use crate::types::DurationRange;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mission generation cadence (milliseconds).
pub const DEFAULT_GENERATION_INTERVAL_MS: u64 = 60_000;

/// Missions created per generation tick.
pub const DEFAULT_MISSIONS_PER_TICK: usize = 2;

/// State-transition sweep cadence (milliseconds).
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 10_000;

/// Cleanup sweep cadence (milliseconds).
pub const DEFAULT_CLEANUP_INTERVAL_MS: u64 = 300_000;

/// Retention window for terminal missions (milliseconds).
pub const DEFAULT_RETENTION_MS: u64 = 3_600_000;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub fleet: FleetConfig,
    pub timing: SimTiming,
}

/// Fleet sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Number of robots created at initialization
    pub size: usize,
}

/// Timer cadences and dwell-time windows for the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTiming {
    /// Interval between mission-generation ticks
    pub generation_interval_ms: u64,
    /// Missions created per generation tick
    pub missions_per_tick: usize,
    /// Interval between state-transition sweeps
    pub sweep_interval_ms: u64,
    /// Interval between cleanup sweeps
    pub cleanup_interval_ms: u64,
    /// Age beyond which terminal missions are removed
    pub retention_ms: u64,
    /// Dwell window in ASSIGNED before departing
    pub assigned_dwell: DurationRange,
    /// Dwell window in EN_ROUTE before delivering
    pub en_route_dwell: DurationRange,
    /// Dwell window in DELIVERING before completion
    pub delivering_dwell: DurationRange,
    /// Dwell window in COMPLETED before returning to idle
    pub completed_dwell: DurationRange,
    /// Display-only estimated mission duration window
    pub estimated_duration: DurationRange,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self { size: 5 }
    }
}

impl Default for SimTiming {
    fn default() -> Self {
        Self {
            generation_interval_ms: DEFAULT_GENERATION_INTERVAL_MS,
            missions_per_tick: DEFAULT_MISSIONS_PER_TICK,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            cleanup_interval_ms: DEFAULT_CLEANUP_INTERVAL_MS,
            retention_ms: DEFAULT_RETENTION_MS,
            assigned_dwell: DurationRange::new(30_000, 60_000),
            en_route_dwell: DurationRange::new(60_000, 120_000),
            delivering_dwell: DurationRange::new(120_000, 300_000),
            completed_dwell: DurationRange::new(10_000, 30_000),
            estimated_duration: DurationRange::new(180_000, 480_000),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fleet: FleetConfig::default(),
            timing: SimTiming::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file. Missing sections fall back to
    /// the built-in defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}
