//! Data layer: the static catalog.
//!
//! Crop and animal tables, costs, experience constants, level rewards, and
//! the achievement / daily-challenge templates. `DataPlugin` seeds the
//! tracker resources from the templates when the app is built.

pub mod animals;
pub mod crops;
pub mod progression;

use bevy::prelude::*;

pub use animals::{AnimalDef, ANIMALS};
pub use crops::{growth_stage_name, CropDef, CROPS, GROWTH_STAGE_NAMES};
pub use progression::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        let achievements = initial_achievements();
        let challenges = daily_challenges();

        info!(
            "[Data] Catalog: {} crops, {} animals, {} achievements, {} daily challenges",
            CROPS.len(),
            ANIMALS.len(),
            achievements.entries.len(),
            challenges.entries.len()
        );

        app.insert_resource(achievements).insert_resource(challenges);
    }
}
