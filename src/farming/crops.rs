//! Planting and time-based crop growth.

use bevy::prelude::*;
use crate::data::SEED_COST;
use crate::shared::*;
use super::soil::evaporate;

/// Stage reached after `elapsed` of a `growth` period: `floor(4 · elapsed / growth)`,
/// capped at ready. Exactly ready once `elapsed >= growth`.
pub fn stage_for(elapsed: std::time::Duration, growth: std::time::Duration) -> u8 {
    let growth_ms = growth.as_millis().max(1);
    let quarters = elapsed.as_millis() * READY_STAGE as u128 / growth_ms;
    quarters.min(READY_STAGE as u128) as u8
}

/// Plants `crop` on an empty plot, paying for the seeds.
pub fn plant_crop(
    farm: &mut Farm,
    grid: &mut PlotGrid,
    index: usize,
    crop: CropKind,
    now: SimTime,
) -> ActionResult<()> {
    let plot = grid.get_mut(index)?;
    farm.ensure_funds(SEED_COST, Purchase::Seeds)?;
    if plot.crop.is_some() {
        return Err(ActionError::PlotOccupied);
    }

    farm.debit(SEED_COST, Purchase::Seeds)?;
    plot.crop = Some(crop);
    plot.growth_stage = SEEDLING_STAGE;
    plot.planted_at = Some(now);

    info!(
        "[Farming] Planted {} on plot {} ({}, {})",
        crop.def().name, index, plot.x, plot.y
    );
    Ok(())
}

/// One simulation tick for a single plot. Empty and harvest-ready plots are
/// left alone. Returns `true` if the plot became ready on this tick.
pub fn tick_plot(plot: &mut Plot, now: SimTime) -> bool {
    let (Some(crop), Some(planted_at)) = (plot.crop, plot.planted_at) else {
        return false;
    };
    if plot.growth_stage >= READY_STAGE {
        return false;
    }

    let stage = stage_for(now.since(planted_at), crop.def().growth_duration);
    plot.growth_stage = plot.growth_stage.max(stage).max(SEEDLING_STAGE);
    evaporate(plot, now);

    plot.growth_stage >= READY_STAGE
}

/// Ticks every plot. Returns the indices that became ready.
pub fn advance_crop_growth(grid: &mut PlotGrid, now: SimTime) -> Vec<usize> {
    grid.plots
        .iter_mut()
        .enumerate()
        .filter_map(|(index, plot)| tick_plot(plot, now).then_some(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlotDefaults, SimConfig};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn setup() -> (Farm, PlotGrid) {
        let farm = Farm::from_config(
            &SimConfig::default(),
            NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
        );
        (farm, PlotGrid::new(GRID_SIZE, GRID_SIZE, PlotDefaults::default()))
    }

    #[test]
    fn test_stage_quarters() {
        let growth = Duration::from_secs(60);
        assert_eq!(stage_for(Duration::ZERO, growth), 0);
        assert_eq!(stage_for(Duration::from_secs(14), growth), 0);
        assert_eq!(stage_for(Duration::from_secs(15), growth), 1);
        assert_eq!(stage_for(Duration::from_secs(44), growth), 2);
        assert_eq!(stage_for(Duration::from_millis(59_999), growth), 3);
        assert_eq!(stage_for(Duration::from_secs(60), growth), 4);
        assert_eq!(stage_for(Duration::from_secs(600), growth), 4);
    }

    #[test]
    fn test_plant_sets_seedling_and_charges_seed_cost() {
        let (mut farm, mut grid) = setup();
        plant_crop(&mut farm, &mut grid, 3, CropKind::Corn, SimTime::from_secs(2)).unwrap();
        let plot = grid.get(3).unwrap();
        assert_eq!(plot.crop, Some(CropKind::Corn));
        assert_eq!(plot.growth_stage, SEEDLING_STAGE);
        assert_eq!(plot.planted_at, Some(SimTime::from_secs(2)));
        assert_eq!(farm.coins, 985);
    }

    #[test]
    fn test_plant_occupied_plot_is_rejected() {
        let (mut farm, mut grid) = setup();
        plant_crop(&mut farm, &mut grid, 0, CropKind::Wheat, SimTime::ZERO).unwrap();
        let before = grid.clone();
        let err = plant_crop(&mut farm, &mut grid, 0, CropKind::Lettuce, SimTime::ZERO);
        assert_eq!(err, Err(ActionError::PlotOccupied));
        assert_eq!(grid, before);
        assert_eq!(farm.coins, 985);
    }

    #[test]
    fn test_funds_are_checked_before_occupancy() {
        let (mut farm, mut grid) = setup();
        plant_crop(&mut farm, &mut grid, 0, CropKind::Wheat, SimTime::ZERO).unwrap();
        farm.coins = 14;
        assert_eq!(
            plant_crop(&mut farm, &mut grid, 0, CropKind::Wheat, SimTime::ZERO),
            Err(ActionError::InsufficientFunds(Purchase::Seeds))
        );
        assert_eq!(farm.coins, 14);
    }

    #[test]
    fn test_growth_is_monotonic_and_ready_at_duration() {
        let (mut farm, mut grid) = setup();
        plant_crop(&mut farm, &mut grid, 0, CropKind::Lettuce, SimTime::ZERO).unwrap();

        let mut last_stage = SEEDLING_STAGE;
        for secs in 1..=44 {
            let ripened = advance_crop_growth(&mut grid, SimTime::from_secs(secs));
            let stage = grid.get(0).unwrap().growth_stage;
            assert!(stage >= last_stage);
            assert!(stage < READY_STAGE);
            assert!(ripened.is_empty());
            last_stage = stage;
        }
        assert_eq!(advance_crop_growth(&mut grid, SimTime::from_secs(45)), vec![0]);
        assert!(grid.get(0).unwrap().is_ready());
    }

    #[test]
    fn test_ready_and_empty_plots_are_untouched() {
        let (mut farm, mut grid) = setup();
        plant_crop(&mut farm, &mut grid, 0, CropKind::Lettuce, SimTime::ZERO).unwrap();
        advance_crop_growth(&mut grid, SimTime::from_secs(45));
        let ready = grid.get(0).unwrap().clone();
        let empty = grid.get(1).unwrap().clone();

        advance_crop_growth(&mut grid, SimTime::from_secs(46));
        assert_eq!(grid.get(0).unwrap(), &ready);
        assert_eq!(grid.get(1).unwrap(), &empty);
    }
}
