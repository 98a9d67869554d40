//! Livestock domain: the herd registry, purchases, feeding, production and
//! hunger.
//!
//! Animals are records in the `Herd` resource keyed by a `LivestockId` that
//! is never reused. An animal whose health reaches zero stays in the herd; it
//! simply cannot produce until it is fed back above the production threshold.

use bevy::prelude::*;
use crate::data::ANIMAL_COST;
use crate::shared::*;

mod feeding;
mod products;

pub use feeding::{drain_hunger, feed_animal, HUNGER_GRACE_SECS};
pub use products::{collect_production, CollectOutcome, MIN_PRODUCTIVE_HEALTH};

/// Health of a freshly bought animal.
const STARTING_HEALTH: f32 = 100.0;

impl Herd {
    pub fn get(&self, id: LivestockId) -> ActionResult<&Livestock> {
        self.animals
            .iter()
            .find(|a| a.id == id)
            .ok_or(ActionError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: LivestockId) -> ActionResult<&mut Livestock> {
        self.animals
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ActionError::NotFound(id))
    }

    fn next_id(&mut self) -> LivestockId {
        let id = LivestockId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn count_of(&self, kind: AnimalKind) -> usize {
        self.animals.iter().filter(|a| a.kind == kind).count()
    }
}

/// Buys a new animal at full health.
pub fn buy_animal(farm: &mut Farm, herd: &mut Herd, kind: AnimalKind) -> ActionResult<LivestockId> {
    farm.debit(ANIMAL_COST, Purchase::Livestock)?;

    let id = herd.next_id();
    herd.animals.push(Livestock {
        id,
        kind,
        health: STARTING_HEALTH,
        last_fed: None,
        production_rate: 1,
    });

    info!(
        "[Animals] Bought {} {} ({} animals total)",
        kind.def().name,
        id,
        herd.animals.len()
    );
    Ok(id)
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct AnimalPlugin;

impl Plugin for AnimalPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, hunger_tick.in_set(SimSet::Tick));

        info!("[Animals] AnimalPlugin registered.");
    }
}

/// Applies hunger once per simulation tick.
pub fn hunger_tick(mut ticks: EventReader<SimTickEvent>, mut herd: ResMut<Herd>) {
    for tick in ticks.read() {
        drain_hunger(&mut herd, tick.now);
    }
}
