use std::env;
use std::str::FromStr;

/// Service-level configuration from the environment.
///
/// Simulation timing comes from the optional TOML file named by
/// `FLEETSIM_CONFIG`; everything here is deployment plumbing.
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub feed_port: u16,
    /// Overrides the fleet size from the TOML file when set
    pub fleet_size: Option<usize>,
    pub sim_config_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            http_port: env_or("FLEETSIM_HTTP_PORT", 8080),
            feed_port: env_or("FLEETSIM_FEED_PORT", 8081),
            fleet_size: env::var("FLEETSIM_FLEET_SIZE")
                .ok()
                .and_then(|v| v.parse().ok()),
            sim_config_path: env::var("FLEETSIM_CONFIG").ok(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
