//! Run configuration (data paths, seed, tick rate). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Settings for one headless run. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Data file with the `system` definitions.
    #[serde(default = "default_galaxy_path")]
    pub galaxy_path: PathBuf,
    /// Data file with the `mission` definitions.
    #[serde(default = "default_missions_path")]
    pub missions_path: PathBuf,
    /// Flight plan the flagship follows.
    #[serde(default = "default_scenario_path")]
    pub scenario_path: PathBuf,
    /// Where player and mission state are written when the run ends.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
    /// Continue from `save_path` instead of accepting the missions fresh.
    #[serde(default)]
    pub resume: bool,
    /// Seed for timer durations and landmark picks.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Simulation ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// System the missions are offered in, for `<origin>`.
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub jumps: u32,
    #[serde(default)]
    pub payment: i64,
    /// Extra text substitutions, e.g. `"<npc>": "Kestrel"`.
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
}

fn default_galaxy_path() -> PathBuf {
    PathBuf::from("data/galaxy.txt")
}
fn default_missions_path() -> PathBuf {
    PathBuf::from("data/missions.txt")
}
fn default_scenario_path() -> PathBuf {
    PathBuf::from("data/scenario.txt")
}
fn default_save_path() -> PathBuf {
    PathBuf::from("timer_save.txt")
}
fn default_seed() -> u64 {
    0x5eed
}
fn default_tick_rate() -> f64 {
    60.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            galaxy_path: default_galaxy_path(),
            missions_path: default_missions_path(),
            scenario_path: default_scenario_path(),
            save_path: default_save_path(),
            resume: false,
            seed: default_seed(),
            tick_rate: default_tick_rate(),
            origin: None,
            jumps: 0,
            payment: 0,
            substitutions: BTreeMap::new(),
        }
    }
}

impl RunConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        } else {
            log::info!("No config at {:?}, using defaults", path);
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
