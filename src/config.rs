//! Session configuration, loadable from RON.
//!
//! Every field has a default matching the stock game, so a config file only
//! needs the values it overrides:
//!
//! ```ron
//! (
//!     farm_name: "Hilltop Farm",
//!     starting_coins: 250,
//!     climate_seed: Some(7),
//! )
//! ```

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::*;

/// Shortest accepted tick, climate or notice period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Starting meters for every plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotDefaults {
    pub soil_health: f32,
    pub water_level: f32,
    pub fertility: f32,
}

impl Default for PlotDefaults {
    fn default() -> Self {
        Self {
            soil_health: 70.0,
            water_level: 50.0,
            fertility: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub farm_name: String,
    pub grid_size: u32,
    pub starting_coins: u32,
    pub starting_water: u32,
    pub starting_fertilizer: u32,
    pub starting_sustainability: u32,
    pub starting_streak: u32,
    /// `None` = the session's start date.
    pub last_played_date: Option<NaiveDate>,
    pub plot: PlotDefaults,
    pub tick_secs: f32,
    pub climate_refresh_secs: f32,
    /// Lifetime of the notification line and the level-up banner.
    pub notice_secs: f32,
    /// Fixed seed for the climate feed; `None` seeds from entropy.
    pub climate_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            farm_name: "Green Valley Farm".to_string(),
            grid_size: GRID_SIZE,
            starting_coins: 1_000,
            starting_water: 100,
            starting_fertilizer: 50,
            starting_sustainability: 50,
            starting_streak: 0,
            last_played_date: None,
            plot: PlotDefaults::default(),
            tick_secs: TICK_SECS,
            climate_refresh_secs: CLIMATE_REFRESH_SECS,
            notice_secs: NOTICE_SECS,
            climate_seed: None,
        }
    }
}

impl SimConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::Invalid("grid_size must be at least 1".into()));
        }
        for (name, secs) in [
            ("tick_secs", self.tick_secs),
            ("climate_refresh_secs", self.climate_refresh_secs),
            ("notice_secs", self.notice_secs),
        ] {
            // Simulated time has millisecond resolution.
            let period = Duration::try_from_secs_f32(secs).unwrap_or_default();
            if period < MIN_PERIOD {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be at least 0.001 seconds, got {secs}"
                )));
            }
        }
        if self.starting_sustainability > SUSTAINABILITY_MAX {
            return Err(ConfigError::Invalid(format!(
                "starting_sustainability must be at most {SUSTAINABILITY_MAX}"
            )));
        }
        let PlotDefaults { soil_health, water_level, fertility } = self.plot;
        if [soil_health, water_level, fertility]
            .iter()
            .any(|meter| !(0.0..=METER_MAX).contains(meter))
        {
            return Err(ConfigError::Invalid(
                "plot meters must lie within 0..=100".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f32(self.tick_secs)
    }

    pub fn climate_period(&self) -> Duration {
        Duration::from_secs_f32(self.climate_refresh_secs)
    }
}
