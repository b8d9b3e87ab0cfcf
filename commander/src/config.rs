use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "commander.toml";

/// Commander tunables. Defaults match the firmware constants used by the
/// existing link peers.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct CommanderConfig {
    /// Thrust at or below this value reads as zero.
    pub min_thrust: u16,
    /// Thrust above this value is clamped.
    pub max_thrust: u16,
    /// Ticks of link silence before attitude is forced to neutral.
    pub stabilize_timeout: u64,
    /// Ticks of link silence before thrust is forced to zero.
    pub shutdown_timeout: u64,
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            min_thrust: 10_000,
            max_thrust: 60_000,
            stabilize_timeout: 500,
            shutdown_timeout: 2000,
        }
    }
}

impl CommanderConfig {
    pub fn load() -> Result<Self> {
        let config = std::fs::read_to_string(CONFIG_FILE).context("Cannot open configuration file")?;
        toml::from_str(&config).context("Cannot parse configuration file")
    }

    pub fn update(&self) -> Result<()> {
        let config = toml::to_string_pretty(self)?;
        std::fs::write(CONFIG_FILE, config).context("Cannot write configuration file")
    }
}
