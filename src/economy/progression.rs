//! Experience and levels. `Farm::add_xp` is the only place a level changes.

use bevy::prelude::*;

use crate::data::{level_reward, BASE_XP_TO_LEVEL, LEVEL_MULTIPLIER};
use crate::shared::*;

/// XP needed to leave `level`: `round(100 · 1.5^(level − 1))`.
pub fn xp_to_next_level(level: u32) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    (BASE_XP_TO_LEVEL * LEVEL_MULTIPLIER.powi(exponent)).round() as u32
}

impl Farm {
    /// Adds experience and applies every level-up it causes, overflow
    /// carrying into the next level. Level reward coins are credited here.
    pub fn add_xp(&mut self, amount: u32) -> Vec<LevelUpEvent> {
        self.xp = self.xp.saturating_add(amount);

        let mut level_ups = Vec::new();
        while self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            self.level += 1;
            self.xp_to_next_level = xp_to_next_level(self.level);

            let reward = level_reward(self.level);
            let coin_bonus = reward.map_or(0, |r| r.coins);
            self.credit(coin_bonus);

            info!(
                "[Economy] Level up! Now level {} (+{} coins, next level at {} XP)",
                self.level, coin_bonus, self.xp_to_next_level
            );
            level_ups.push(LevelUpEvent {
                level: self.level,
                coin_bonus,
                message: reward.map(|r| r.message),
            });
        }
        level_ups
    }

    /// Fraction of the current level completed, 0.0–1.0.
    pub fn level_progress(&self) -> f32 {
        if self.xp_to_next_level == 0 {
            return 0.0;
        }
        self.xp as f32 / self.xp_to_next_level as f32
    }
}
