use bevy::prelude::*;
use crate::data::XP_PER_LIVESTOCK_COLLECTION;
use crate::shared::*;

/// Below this health an animal produces nothing.
pub const MIN_PRODUCTIVE_HEALTH: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CollectOutcome {
    pub kind: AnimalKind,
    pub value: u32,
    pub level_ups: Vec<LevelUpEvent>,
}

/// Collects one animal's produce for coins and 15 XP. There is no cooldown:
/// a healthy animal can be collected from on every call.
pub fn collect_production(
    farm: &mut Farm,
    herd: &Herd,
    id: LivestockId,
) -> ActionResult<CollectOutcome> {
    let animal = herd.get(id)?;
    if animal.health < MIN_PRODUCTIVE_HEALTH {
        return Err(ActionError::NotHealthyEnough);
    }

    let def = animal.kind.def();
    farm.credit(def.production_value);
    let level_ups = farm.add_xp(XP_PER_LIVESTOCK_COLLECTION);

    info!(
        "[Animals] Collected from {} {} for {} coins",
        def.name, id, def.production_value
    );
    Ok(CollectOutcome {
        kind: animal.kind,
        value: def.production_value,
        level_ups,
    })
}
