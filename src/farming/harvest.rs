//! Harvest payout and plot reset.

use bevy::prelude::*;
use crate::data::{CropDef, XP_PER_HARVEST};
use crate::shared::*;

/// Soil health lost per harvest.
const HARVEST_SOIL_COST: f32 = 5.0;

/// What a successful harvest paid out.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestOutcome {
    pub crop: CropKind,
    pub earnings: u32,
    pub level_ups: Vec<LevelUpEvent>,
}

/// 1.2 above 50, 1.0 above 20, 0.8 otherwise.
fn meter_bonus(meter: f32) -> f64 {
    if meter > 50.0 {
        1.2
    } else if meter > 20.0 {
        1.0
    } else {
        0.8
    }
}

/// Coins paid for harvesting `def` from `plot` at farm `level`.
pub fn harvest_earnings(def: &CropDef, plot: &Plot, level: u32) -> u32 {
    let base = (def.yield_amount * def.value) as f64;
    let level_bonus = 1.0 + level as f64 * 0.05;
    (base * meter_bonus(plot.water_level) * meter_bonus(plot.fertility) * level_bonus).round()
        as u32
}

pub fn harvest_crop(farm: &mut Farm, grid: &mut PlotGrid, index: usize) -> ActionResult<HarvestOutcome> {
    let plot = grid.get_mut(index)?;
    let Some(crop) = plot.crop.filter(|_| plot.growth_stage >= READY_STAGE) else {
        return Err(ActionError::NotReady);
    };

    let def = crop.def();
    let earnings = harvest_earnings(def, plot, farm.level);

    farm.credit(earnings);
    farm.adjust_sustainability(def.sustainability_bonus as i32);
    farm.total_harvests += 1;
    let level_ups = farm.add_xp(XP_PER_HARVEST);

    plot.crop = None;
    plot.growth_stage = EMPTY_STAGE;
    plot.planted_at = None;
    plot.soil_health = (plot.soil_health - HARVEST_SOIL_COST).max(SOIL_HEALTH_FLOOR);

    info!(
        "[Farming] Harvested {} from plot {} for {} coins (total harvests: {})",
        def.name, index, earnings, farm.total_harvests
    );
    Ok(HarvestOutcome {
        crop,
        earnings,
        level_ups,
    })
}
