//! Farming domain: the plot grid, planting, watering, fertilizing, growth
//! and harvest.
//!
//! Player actions are plain functions over `Farm` and `PlotGrid` that either
//! apply in full or return an `ActionError` without touching anything. The
//! session calls them; the only system here is the per-tick growth pass.

use bevy::prelude::*;
use crate::config::PlotDefaults;
use crate::shared::*;

pub mod crops;
pub mod harvest;
pub mod soil;

pub use crops::{advance_crop_growth, plant_crop};
pub use harvest::{harvest_crop, harvest_earnings, HarvestOutcome};
pub use soil::{fertilize_plot, water_plot};

/// Seconds after a watering during which evaporation is damped.
pub const WATER_RETENTION_SECS: u64 = 30;

impl PlotGrid {
    /// A `width × height` grid of empty plots with the given meters.
    pub fn new(width: u32, height: u32, defaults: PlotDefaults) -> Self {
        let plots = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| Plot {
                x,
                y,
                soil_health: defaults.soil_health,
                water_level: defaults.water_level,
                fertility: defaults.fertility,
                crop: None,
                growth_stage: EMPTY_STAGE,
                planted_at: None,
                last_watered: None,
                last_fertilized: None,
            })
            .collect();
        Self { width, height, plots }
    }

    pub fn len(&self) -> usize {
        self.plots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    pub fn get(&self, index: usize) -> ActionResult<&Plot> {
        self.plots.get(index).ok_or(ActionError::InvalidPlot(index))
    }

    pub fn get_mut(&mut self, index: usize) -> ActionResult<&mut Plot> {
        self.plots.get_mut(index).ok_or(ActionError::InvalidPlot(index))
    }

    /// Row-major index of `(x, y)`, if it lies on the grid.
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    pub fn ready_count(&self) -> usize {
        self.plots.iter().filter(|p| p.is_ready()).count()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedPlot>()
            .add_systems(Update, grow_crops.in_set(SimSet::Tick));

        info!("[Farming] FarmingPlugin registered.");
    }
}

/// Advances every growing plot once per simulation tick.
pub fn grow_crops(mut ticks: EventReader<SimTickEvent>, mut grid: ResMut<PlotGrid>) {
    for tick in ticks.read() {
        let ripened = advance_crop_growth(&mut grid, tick.now);
        if !ripened.is_empty() {
            debug!(
                "[Farming] Plots {:?} ready to harvest ({} waiting)",
                ripened,
                grid.ready_count()
            );
        }
    }
}
