use crate::core::race::{SimConstants, DEFAULT_HORSE_COUNT};
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::Path;
use std::time::Duration;

/// * `horse_count` - Number of horses in the race
/// * `names` - Custom horse names keyed by horse id, missing ids use the default name
/// * `timestep_ms` - (ms) Tick duration
/// * `sim_consts` - Track layout, event probabilities and speed range
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RacePars {
    pub horse_count: u32,
    pub names: HashMap<u32, String>,
    pub timestep_ms: u64,
    pub sim_consts: SimConstants,
}

impl Default for RacePars {
    fn default() -> Self {
        RacePars {
            horse_count: DEFAULT_HORSE_COUNT,
            names: HashMap::new(),
            timestep_ms: 100,
            sim_consts: SimConstants::default(),
        }
    }
}

impl RacePars {
    pub fn get_timestep_size(&self) -> Duration {
        Duration::from_millis(self.timestep_ms)
    }
}

/// read_race_pars reads the JSON file and decodes the JSON string into the race parameters
/// struct. Missing entries fall back to their defaults.
pub fn read_race_pars(filepath: &Path) -> anyhow::Result<RacePars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;
    let pars: RacePars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    pars.sim_consts
        .validate()
        .context(format!("Invalid constants in {}!", filepath.display()))?;
    if pars.timestep_ms == 0 {
        anyhow::bail!("Tick duration in {} must be positive!", filepath.display());
    }
    Ok(pars)
}
