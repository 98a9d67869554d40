//! Costs, experience constants, level rewards and tracker templates.

use crate::shared::*;

// ── Costs ────────────────────────────────────────────────────────────────

pub const SEED_COST: u32 = 15;
pub const WATER_COST: u32 = 5;
pub const FERTILIZER_COST: u32 = 10;
pub const ANIMAL_COST: u32 = 200;

/// Coins per unit of a purchasable stock.
pub fn unit_cost(kind: ResourceKind) -> u32 {
    match kind {
        ResourceKind::Water => WATER_COST,
        ResourceKind::Fertilizer => FERTILIZER_COST,
    }
}

// ── Experience ───────────────────────────────────────────────────────────

pub const XP_PER_HARVEST: u32 = 20;
pub const XP_PER_LIVESTOCK_COLLECTION: u32 = 15;
pub const XP_PER_ACHIEVEMENT: u32 = 50;
pub const BASE_XP_TO_LEVEL: f64 = 100.0;
pub const LEVEL_MULTIPLIER: f64 = 1.5;

pub struct LevelReward {
    pub level: u32,
    pub coins: u32,
    pub message: &'static str,
}

pub const LEVEL_REWARDS: &[LevelReward] = &[
    LevelReward { level: 2, coins: 500, message: "Unlocked: Advanced Crops!" },
    LevelReward { level: 3, coins: 750, message: "Unlocked: Livestock Upgrades!" },
    LevelReward { level: 5, coins: 1000, message: "Unlocked: Premium Tools!" },
    LevelReward { level: 7, coins: 1500, message: "Master Farmer Status!" },
    LevelReward { level: 10, coins: 2500, message: "Legendary Farmer!" },
];

pub fn level_reward(level: u32) -> Option<&'static LevelReward> {
    LEVEL_REWARDS.iter().find(|reward| reward.level == level)
}

// ═══════════════════════════════════════════════════════════════════════
// ACHIEVEMENT DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════

/// Static description of a single achievement.
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub metric: AchievementMetric,
    pub target: u32,
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_harvest",
        name: "First Harvest",
        description: "Harvest your first crop",
        metric: AchievementMetric::Harvests,
        target: 1,
    },
    AchievementDef {
        id: "harvest_10",
        name: "Experienced Farmer",
        description: "Harvest 10 crops",
        metric: AchievementMetric::Harvests,
        target: 10,
    },
    AchievementDef {
        id: "harvest_50",
        name: "Master Farmer",
        description: "Harvest 50 crops",
        metric: AchievementMetric::Harvests,
        target: 50,
    },
    AchievementDef {
        id: "harvest_100",
        name: "Legend",
        description: "Harvest 100 crops",
        metric: AchievementMetric::Harvests,
        target: 100,
    },
    AchievementDef {
        id: "eco_warrior",
        name: "Eco Warrior",
        description: "Reach 80% sustainability",
        metric: AchievementMetric::Sustainability,
        target: 80,
    },
    AchievementDef {
        id: "rich_farmer",
        name: "Wealthy Farmer",
        description: "Accumulate 5000 coins",
        metric: AchievementMetric::Coins,
        target: 5_000,
    },
    AchievementDef {
        id: "livestock_master",
        name: "Ranch Manager",
        description: "Own 5 animals",
        metric: AchievementMetric::LivestockOwned,
        target: 5,
    },
    AchievementDef {
        id: "level_5",
        name: "Rising Star",
        description: "Reach Level 5",
        metric: AchievementMetric::Level,
        target: 5,
    },
];

pub fn initial_achievements() -> Achievements {
    Achievements {
        entries: ACHIEVEMENTS
            .iter()
            .map(|def| Achievement {
                id: def.id,
                name: def.name,
                description: def.description,
                metric: def.metric,
                target: def.target,
                progress: 0,
                unlocked: false,
            })
            .collect(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DAILY CHALLENGE TEMPLATES
// ═══════════════════════════════════════════════════════════════════════

pub struct ChallengeTemplate {
    pub id: &'static str,
    pub description: &'static str,
    pub reward: u32,
    pub kind: ChallengeKind,
    pub target: u32,
}

pub const DAILY_CHALLENGES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        id: "daily_harvest",
        description: "Harvest 3 crops",
        reward: 100,
        kind: ChallengeKind::Harvest,
        target: 3,
    },
    ChallengeTemplate {
        id: "daily_sustainability",
        description: "Reach 70% sustainability",
        reward: 150,
        kind: ChallengeKind::Sustainability,
        target: 70,
    },
    ChallengeTemplate {
        id: "daily_water",
        description: "Water crops 5 times",
        reward: 75,
        kind: ChallengeKind::Water,
        target: 5,
    },
];

/// A fresh, zero-progress daily set.
pub fn daily_challenges() -> Challenges {
    Challenges {
        entries: DAILY_CHALLENGES
            .iter()
            .map(|template| Challenge {
                id: template.id,
                description: template.description,
                reward: template.reward,
                kind: template.kind,
                target: template.target,
                progress: 0,
                completed: false,
            })
            .collect(),
    }
}
