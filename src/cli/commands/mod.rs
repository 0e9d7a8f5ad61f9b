pub mod cache;
pub mod catalog;
pub mod config;
pub mod courses;
pub mod student;
pub mod version;

use log::debug;

use crate::api::{SwsClient, Tier};
use crate::cli::args::ClientOverrides;
use crate::config::{ClientConfig, Config};
use crate::error::Result;

/// Stored configuration with this run's flags layered on top
pub fn resolve_config(overrides: &ClientOverrides) -> Result<ClientConfig> {
    let mut config = Config::load()?.client;
    overrides.apply(&mut config);
    debug!("Using service root {}", config.base_url);
    Ok(config)
}

pub fn build_client(overrides: &ClientOverrides) -> Result<SwsClient> {
    SwsClient::new(resolve_config(overrides)?)
}

pub fn tier(private: bool) -> Tier {
    if private {
        Tier::Private
    } else {
        Tier::Public
    }
}
