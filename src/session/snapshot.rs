use bevy::prelude::*;
use chrono::NaiveDate;
use serde::Serialize;

use crate::shared::*;

/// Read-only copy of everything a front end shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub now: SimTime,
    pub today: NaiveDate,
    pub farm: Farm,
    pub plots: PlotGrid,
    pub selected_plot: Option<usize>,
    pub livestock: Vec<Livestock>,
    pub climate: ClimateSnapshot,
    pub achievements: Vec<Achievement>,
    pub challenges: Vec<Challenge>,
    /// The notification line, if it has not lapsed yet.
    pub message: Option<String>,
    pub show_level_up: bool,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        let now = world.resource::<SimClock>().now;
        Self {
            now,
            today: world.resource::<Calendar>().today,
            farm: world.resource::<Farm>().clone(),
            plots: world.resource::<PlotGrid>().clone(),
            selected_plot: world.resource::<SelectedPlot>().0,
            livestock: world.resource::<Herd>().animals.clone(),
            climate: world.resource::<ClimateSnapshot>().clone(),
            achievements: world.resource::<Achievements>().entries.clone(),
            challenges: world.resource::<Challenges>().entries.clone(),
            message: world
                .resource::<Notification>()
                .active(now)
                .map(str::to_owned),
            show_level_up: world.resource::<LevelUpBanner>().active(now),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
