use std::sync::Arc;

use fleetsim_core::{EventBus, SimConfig};
use fleetsim_fleet::FleetRegistry;
use fleetsim_missions::MissionRegistry;
use fleetsim_sim::{Dashboard, SimulationScheduler};

use crate::config::Config;

/// Shared application state handed to every handler.
pub struct AppState {
    pub fleet: Arc<FleetRegistry>,
    pub missions: Arc<MissionRegistry>,
    pub scheduler: Arc<SimulationScheduler>,
    pub dashboard: Dashboard,
    pub events: EventBus,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut sim_config = match &config.sim_config_path {
            Some(path) => SimConfig::from_file(path)?,
            None => SimConfig::default(),
        };
        if let Some(size) = config.fleet_size {
            sim_config.fleet.size = size;
        }

        let events = EventBus::new();
        let fleet = Arc::new(FleetRegistry::new(events.clone()));
        fleet.initialize(sim_config.fleet.size)?;
        let missions = Arc::new(MissionRegistry::new(
            events.clone(),
            sim_config.timing.estimated_duration,
        ));
        let scheduler = Arc::new(SimulationScheduler::new(
            Arc::clone(&fleet),
            Arc::clone(&missions),
            sim_config.timing,
            events.clone(),
        ));
        let dashboard = Dashboard::new(Arc::clone(&fleet), Arc::clone(&missions));

        Ok(AppState {
            fleet,
            missions,
            scheduler,
            dashboard,
            events,
        })
    }
}
