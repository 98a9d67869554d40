use crate::shared::*;

/// Static definition of a livestock type.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalDef {
    pub kind: AnimalKind,
    pub name: &'static str,
    pub feed_cost: u32,
    pub production_value: u32,
    /// Applied to the sustainability score on every feeding.
    pub sustainability_impact: i32,
}

pub static ANIMALS: [AnimalDef; 3] = [
    AnimalDef {
        kind: AnimalKind::Cow,
        name: "Cow",
        feed_cost: 20,
        production_value: 40,
        sustainability_impact: -2,
    },
    AnimalDef {
        kind: AnimalKind::Chicken,
        name: "Chicken",
        feed_cost: 10,
        production_value: 25,
        sustainability_impact: 1,
    },
    AnimalDef {
        kind: AnimalKind::Sheep,
        name: "Sheep",
        feed_cost: 15,
        production_value: 30,
        sustainability_impact: 0,
    },
];

impl AnimalKind {
    pub fn def(self) -> &'static AnimalDef {
        match self {
            AnimalKind::Cow => &ANIMALS[0],
            AnimalKind::Chicken => &ANIMALS[1],
            AnimalKind::Sheep => &ANIMALS[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_maps_to_its_own_def() {
        for kind in AnimalKind::ALL {
            assert_eq!(kind.def().kind, kind);
        }
    }

    #[test]
    fn test_only_cows_hurt_sustainability() {
        let harmful: Vec<_> = ANIMALS
            .iter()
            .filter(|def| def.sustainability_impact < 0)
            .map(|def| def.kind)
            .collect();
        assert_eq!(harmful, vec![AnimalKind::Cow]);
    }
}
