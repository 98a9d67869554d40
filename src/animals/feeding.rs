use std::time::Duration;

use bevy::prelude::*;
use crate::shared::*;

/// An animal fed within this many seconds does not lose health.
pub const HUNGER_GRACE_SECS: u64 = 60;

const HUNGER_DRAIN_PER_TICK: f32 = 0.5;
const HEALTH_PER_FEEDING: f32 = 20.0;

// ─────────────────────────────────────────────────────────────────────────────
// Feeding
// ─────────────────────────────────────────────────────────────────────────────

/// Feeds one animal: charges its feed cost, restores 20 health and applies
/// its sustainability impact.
pub fn feed_animal(
    farm: &mut Farm,
    herd: &mut Herd,
    id: LivestockId,
    now: SimTime,
) -> ActionResult<AnimalKind> {
    let animal = herd.get_mut(id)?;
    let def = animal.kind.def();
    farm.debit(def.feed_cost, Purchase::Feed)?;

    animal.health = (animal.health + HEALTH_PER_FEEDING).min(METER_MAX);
    animal.last_fed = Some(now);
    farm.adjust_sustainability(def.sustainability_impact);

    debug!(
        "[Animals] Fed {} {} → health {:.1}, sustainability {}",
        def.name, id, animal.health, farm.sustainability
    );
    Ok(animal.kind)
}

// ─────────────────────────────────────────────────────────────────────────────
// Hunger
// ─────────────────────────────────────────────────────────────────────────────

/// One tick of hunger: animals never fed, or last fed more than 60 s ago,
/// lose 0.5 health (floor 0).
pub fn drain_hunger(herd: &mut Herd, now: SimTime) {
    let grace = Duration::from_secs(HUNGER_GRACE_SECS);
    for animal in herd.animals.iter_mut() {
        let hungry = match animal.last_fed {
            Some(at) => now.since(at) > grace,
            None => true,
        };
        if hungry {
            animal.health = (animal.health - HUNGER_DRAIN_PER_TICK).max(0.0);
        }
    }
}
