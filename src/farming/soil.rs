//! Watering, fertilizing and per-tick soil decay.

use std::time::Duration;

use bevy::prelude::*;
use crate::shared::*;
use super::WATER_RETENTION_SECS;

const WATER_PER_USE: f32 = 25.0;
const FERTILITY_PER_USE: f32 = 30.0;
const EVAPORATION_PER_TICK: f32 = 0.5;
const DAMPED_EVAPORATION_PER_TICK: f32 = 0.1;
const FERTILITY_LOSS_PER_TICK: f32 = 0.3;

/// Sustainability cost of one fertilizer application.
pub const FERTILIZER_SUSTAINABILITY_COST: i32 = 1;

/// Water and fertility loss for one tick, floored at zero. A plot watered in
/// the last 30 s loses at most 0.1 water.
pub fn evaporate(plot: &mut Plot, now: SimTime) {
    let recently_watered = plot
        .last_watered
        .is_some_and(|at| now.since(at) < Duration::from_secs(WATER_RETENTION_SECS));
    let loss = if recently_watered {
        DAMPED_EVAPORATION_PER_TICK
    } else {
        EVAPORATION_PER_TICK
    };
    plot.water_level = (plot.water_level - loss).max(0.0);
    plot.fertility = (plot.fertility - FERTILITY_LOSS_PER_TICK).max(0.0);
}

pub fn water_plot(
    farm: &mut Farm,
    grid: &mut PlotGrid,
    index: usize,
    now: SimTime,
) -> ActionResult<()> {
    let plot = grid.get_mut(index)?;
    if farm.water < 1 {
        return Err(ActionError::InsufficientResource(ResourceKind::Water));
    }
    if plot.crop.is_none() {
        return Err(ActionError::NoCrop(PlotAction::Water));
    }

    farm.consume(ResourceKind::Water)?;
    plot.water_level = (plot.water_level + WATER_PER_USE).min(METER_MAX);
    plot.last_watered = Some(now);

    debug!(
        "[Farming] Watered plot {} → water {:.1}, stock {}",
        index, plot.water_level, farm.water
    );
    Ok(())
}

pub fn fertilize_plot(
    farm: &mut Farm,
    grid: &mut PlotGrid,
    index: usize,
    now: SimTime,
) -> ActionResult<()> {
    let plot = grid.get_mut(index)?;
    if farm.fertilizer < 1 {
        return Err(ActionError::InsufficientResource(ResourceKind::Fertilizer));
    }
    if plot.crop.is_none() {
        return Err(ActionError::NoCrop(PlotAction::Fertilize));
    }

    farm.consume(ResourceKind::Fertilizer)?;
    plot.fertility = (plot.fertility + FERTILITY_PER_USE).min(METER_MAX);
    plot.last_fertilized = Some(now);
    farm.adjust_sustainability(-FERTILIZER_SUSTAINABILITY_COST);

    debug!(
        "[Farming] Fertilized plot {} → fertility {:.1}, sustainability {}",
        index, plot.fertility, farm.sustainability
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlotDefaults, SimConfig};
    use crate::farming::plant_crop;
    use chrono::NaiveDate;

    fn planted() -> (Farm, PlotGrid) {
        let mut farm = Farm::from_config(
            &SimConfig::default(),
            NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
        );
        let mut grid = PlotGrid::new(GRID_SIZE, GRID_SIZE, PlotDefaults::default());
        plant_crop(&mut farm, &mut grid, 0, CropKind::Tomato, SimTime::ZERO).unwrap();
        (farm, grid)
    }

    #[test]
    fn test_water_raises_level_and_caps() {
        let (mut farm, mut grid) = planted();
        water_plot(&mut farm, &mut grid, 0, SimTime::from_secs(1)).unwrap();
        assert_eq!(grid.get(0).unwrap().water_level, 75.0);
        water_plot(&mut farm, &mut grid, 0, SimTime::from_secs(2)).unwrap();
        water_plot(&mut farm, &mut grid, 0, SimTime::from_secs(3)).unwrap();
        let plot = grid.get(0).unwrap();
        assert_eq!(plot.water_level, 100.0);
        assert_eq!(plot.last_watered, Some(SimTime::from_secs(3)));
        assert_eq!(farm.water, 97);
    }

    #[test]
    fn test_water_requires_stock_then_crop() {
        let (mut farm, mut grid) = planted();
        assert_eq!(
            water_plot(&mut farm, &mut grid, 1, SimTime::ZERO),
            Err(ActionError::NoCrop(PlotAction::Water))
        );
        farm.water = 0;
        let before = grid.clone();
        assert_eq!(
            water_plot(&mut farm, &mut grid, 0, SimTime::ZERO),
            Err(ActionError::InsufficientResource(ResourceKind::Water))
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_fertilize_costs_sustainability() {
        let (mut farm, mut grid) = planted();
        fertilize_plot(&mut farm, &mut grid, 0, SimTime::from_secs(4)).unwrap();
        let plot = grid.get(0).unwrap();
        assert_eq!(plot.fertility, 90.0);
        assert_eq!(plot.last_fertilized, Some(SimTime::from_secs(4)));
        assert_eq!(farm.fertilizer, 49);
        assert_eq!(farm.sustainability, 49);

        fertilize_plot(&mut farm, &mut grid, 0, SimTime::from_secs(5)).unwrap();
        assert_eq!(grid.get(0).unwrap().fertility, 100.0);
    }

    #[test]
    fn test_fertilize_never_drives_sustainability_negative() {
        let (mut farm, mut grid) = planted();
        farm.sustainability = 0;
        fertilize_plot(&mut farm, &mut grid, 0, SimTime::ZERO).unwrap();
        assert_eq!(farm.sustainability, 0);
    }

    #[test]
    fn test_evaporation_damped_after_watering() {
        let (_, mut grid) = planted();
        let plot = grid.get_mut(0).unwrap();
        plot.water_level = 60.0;
        plot.last_watered = Some(SimTime::from_secs(10));

        evaporate(plot, SimTime::from_secs(39));
        assert!((plot.water_level - 59.9).abs() < 1e-4);

        evaporate(plot, SimTime::from_secs(40));
        assert!((plot.water_level - 59.4).abs() < 1e-4);
        assert!((plot.fertility - 59.4).abs() < 1e-4);
    }

    #[test]
    fn test_meters_floor_at_zero() {
        let (_, mut grid) = planted();
        let plot = grid.get_mut(0).unwrap();
        plot.water_level = 0.2;
        plot.fertility = 0.1;
        evaporate(plot, SimTime::from_secs(100));
        assert_eq!(plot.water_level, 0.0);
        assert_eq!(plot.fertility, 0.0);
    }
}
