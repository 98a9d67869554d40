use std::time::Duration;

use crate::shared::*;

/// Static definition of a crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CropDef {
    pub kind: CropKind,
    pub name: &'static str,
    /// Time from planting to harvest-ready.
    pub growth_duration: Duration,
    pub water_need: u32,
    pub fertilizer_need: u32,
    pub yield_amount: u32,
    /// Coins per unit of yield.
    pub value: u32,
    pub sustainability_bonus: u32,
}

/// Crop catalog, in `CropKind::ALL` order.
///
///   wheat   60s  3 × 50
///   corn    90s  2 × 80
///   tomato  75s  4 × 60
///   lettuce 45s  5 × 40
pub static CROPS: [CropDef; 4] = [
    CropDef {
        kind: CropKind::Wheat,
        name: "Wheat",
        growth_duration: Duration::from_secs(60),
        water_need: 30,
        fertilizer_need: 20,
        yield_amount: 3,
        value: 50,
        sustainability_bonus: 5,
    },
    CropDef {
        kind: CropKind::Corn,
        name: "Corn",
        growth_duration: Duration::from_secs(90),
        water_need: 40,
        fertilizer_need: 30,
        yield_amount: 2,
        value: 80,
        sustainability_bonus: 3,
    },
    CropDef {
        kind: CropKind::Tomato,
        name: "Tomato",
        growth_duration: Duration::from_secs(75),
        water_need: 35,
        fertilizer_need: 25,
        yield_amount: 4,
        value: 60,
        sustainability_bonus: 7,
    },
    CropDef {
        kind: CropKind::Lettuce,
        name: "Lettuce",
        growth_duration: Duration::from_secs(45),
        water_need: 25,
        fertilizer_need: 15,
        yield_amount: 5,
        value: 40,
        sustainability_bonus: 8,
    },
];

/// Display names for growth stages 0..=4.
pub const GROWTH_STAGE_NAMES: [&str; 5] = ["Empty", "Seedling", "Growing", "Mature", "Ready"];

impl CropKind {
    pub fn def(self) -> &'static CropDef {
        match self {
            CropKind::Wheat => &CROPS[0],
            CropKind::Corn => &CROPS[1],
            CropKind::Tomato => &CROPS[2],
            CropKind::Lettuce => &CROPS[3],
        }
    }
}

pub fn growth_stage_name(stage: u8) -> &'static str {
    GROWTH_STAGE_NAMES
        .get(stage as usize)
        .copied()
        .unwrap_or("Ready")
}
