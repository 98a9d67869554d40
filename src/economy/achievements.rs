//! Achievement tracker.
//!
//! Each locked achievement mirrors one farm statistic as its progress and
//! unlocks once the progress reaches the target. Unlocking is one-shot: the
//! 50 XP bonus is queued on the locked → unlocked transition only.

use bevy::prelude::*;

use crate::data::XP_PER_ACHIEVEMENT;
use crate::shared::*;

/// The statistics achievements are measured against, read once per pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FarmStats {
    pub harvests: u32,
    pub sustainability: u32,
    pub coins: u32,
    pub livestock_owned: u32,
    pub level: u32,
}

impl FarmStats {
    pub fn read(farm: &Farm, herd: &Herd) -> Self {
        Self {
            harvests: farm.total_harvests,
            sustainability: farm.sustainability,
            coins: farm.coins,
            livestock_owned: herd.animals.len() as u32,
            level: farm.level,
        }
    }

    pub fn metric(&self, metric: AchievementMetric) -> u32 {
        match metric {
            AchievementMetric::Harvests => self.harvests,
            AchievementMetric::Sustainability => self.sustainability,
            AchievementMetric::Coins => self.coins,
            AchievementMetric::LivestockOwned => self.livestock_owned,
            AchievementMetric::Level => self.level,
        }
    }
}

/// Refreshes progress on every locked achievement and returns the ones that
/// unlocked in this call.
pub fn evaluate_achievements(
    achievements: &mut Achievements,
    stats: &FarmStats,
) -> Vec<(&'static str, &'static str)> {
    let mut newly_unlocked = Vec::new();
    for achievement in achievements.entries.iter_mut().filter(|a| !a.unlocked) {
        achievement.progress = stats.metric(achievement.metric);
        if achievement.progress >= achievement.target {
            achievement.unlocked = true;
            newly_unlocked.push((achievement.id, achievement.name));
        }
    }
    newly_unlocked
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEM: check_achievements
// ═══════════════════════════════════════════════════════════════════════

pub fn check_achievements(
    farm: Res<Farm>,
    herd: Res<Herd>,
    mut achievements: ResMut<Achievements>,
    mut pending: ResMut<PendingRewards>,
    mut unlocked_writer: EventWriter<AchievementUnlockedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    let stats = FarmStats::read(&farm, &herd);

    for (id, name) in evaluate_achievements(&mut achievements, &stats) {
        info!("[Achievements] Unlocked: \"{}\" ({})", name, id);

        pending.queue.push(Reward::Xp {
            amount: XP_PER_ACHIEVEMENT,
            reason: format!("achievement {id}"),
        });
        unlocked_writer.send(AchievementUnlockedEvent {
            achievement_id: id,
            name,
        });
        toast_writer.send(ToastEvent::new(format!(
            "🎉 Achievement Unlocked: {name}!"
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::initial_achievements;

    fn find<'a>(achievements: &'a Achievements, id: &str) -> &'a Achievement {
        achievements.entries.iter().find(|a| a.id == id).unwrap()
    }

    #[test]
    fn test_first_harvest_unlocks_once() {
        let mut achievements = initial_achievements();
        let stats = FarmStats {
            harvests: 1,
            sustainability: 50,
            coins: 1_000,
            level: 1,
            ..Default::default()
        };

        let unlocked = evaluate_achievements(&mut achievements, &stats);
        assert_eq!(unlocked, vec![("first_harvest", "First Harvest")]);
        assert!(find(&achievements, "first_harvest").unlocked);
        assert_eq!(find(&achievements, "harvest_10").progress, 1);

        // Same statistics again: nothing new.
        assert!(evaluate_achievements(&mut achievements, &stats).is_empty());
    }

    #[test]
    fn test_unlocked_progress_is_frozen() {
        let mut achievements = initial_achievements();
        let rich = FarmStats { coins: 6_000, level: 1, ..Default::default() };
        evaluate_achievements(&mut achievements, &rich);
        assert!(find(&achievements, "rich_farmer").unlocked);

        let broke = FarmStats { coins: 10, level: 1, ..Default::default() };
        assert!(evaluate_achievements(&mut achievements, &broke).is_empty());
        let rich_farmer = find(&achievements, "rich_farmer");
        assert!(rich_farmer.unlocked);
        assert_eq!(rich_farmer.progress, 6_000);
        assert_eq!(find(&achievements, "eco_warrior").progress, 0);
    }

    #[test]
    fn test_every_metric_is_bound() {
        let mut achievements = initial_achievements();
        let stats = FarmStats {
            harvests: 100,
            sustainability: 80,
            coins: 5_000,
            livestock_owned: 5,
            level: 5,
        };
        let unlocked = evaluate_achievements(&mut achievements, &stats);
        assert_eq!(unlocked.len(), achievements.entries.len());
    }
}
