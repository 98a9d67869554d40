//! Economy domain: ledger, progression, achievements, daily challenges.
//!
//! Trackers never touch the ledger directly. They queue `Reward`s in
//! `PendingRewards`, and `settle_rewards` applies them through `Farm`'s
//! transaction methods. `run_reconcile` repeats the whole pass until a pass
//! settles nothing, so a reward that triggers another unlock is paid out in
//! the same call.

use bevy::prelude::*;
use crate::shared::*;

pub mod achievements;
pub mod challenges;
pub mod ledger;
pub mod progression;

use achievements::check_achievements;
use challenges::{regenerate_daily_challenges, track_challenge_progress};

pub use ledger::DayRoll;
pub use progression::xp_to_next_level;

/// Upper bound on passes per reconcile. Every level up adds a level, so a
/// longer chain would mean a tracker is queueing rewards on its own.
const MAX_RECONCILE_PASSES: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        // ── Resources ──────────────────────────────────────────────────────
        app.init_resource::<PendingRewards>()
            .init_resource::<ReconcileStatus>();

        // ── Reconcile pass ─────────────────────────────────────────────────
        app.init_schedule(ReconcilePass)
            .configure_sets(
                ReconcilePass,
                (
                    ReconcileSet::Track,
                    ReconcileSet::Settle,
                    ReconcileSet::Present,
                )
                    .chain(),
            )
            .add_systems(
                ReconcilePass,
                (
                    // A new day wipes the set before today's activity counts.
                    regenerate_daily_challenges,
                    track_challenge_progress,
                    check_achievements,
                )
                    .chain()
                    .in_set(ReconcileSet::Track),
            )
            .add_systems(ReconcilePass, settle_rewards.in_set(ReconcileSet::Settle));

        // ── Systems: after every tick batch ────────────────────────────────
        app.add_systems(Update, run_reconcile.in_set(SimSet::Reconcile));

        info!("[Economy] EconomyPlugin registered.");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEM: settle_rewards
// ═══════════════════════════════════════════════════════════════════════

/// Applies every queued reward to the ledger and records how many it applied.
pub fn settle_rewards(
    mut pending: ResMut<PendingRewards>,
    mut farm: ResMut<Farm>,
    mut status: ResMut<ReconcileStatus>,
    mut level_writer: EventWriter<LevelUpEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    status.settled = pending.queue.len();

    for reward in pending.queue.drain(..) {
        match reward {
            Reward::Coins { amount, reason } => {
                farm.credit(amount);
                info!(
                    "[Economy] Coins +{}: {}. Balance: {}",
                    amount, reason, farm.coins
                );
            }
            Reward::Xp { amount, reason } => {
                info!("[Economy] XP +{}: {}", amount, reason);
                for level_up in farm.add_xp(amount) {
                    if let Some(message) = level_up.message {
                        toast_writer.send(ToastEvent::new(message));
                    }
                    level_writer.send(level_up);
                }
            }
        }
    }
}

/// Runs `ReconcilePass` until no reward is left to settle.
pub fn run_reconcile(world: &mut World) {
    for _ in 0..MAX_RECONCILE_PASSES {
        world.run_schedule(ReconcilePass);
        if world.resource::<ReconcileStatus>().settled == 0 {
            return;
        }
    }
    warn!(
        "[Economy] Rewards still pending after {} reconcile passes",
        MAX_RECONCILE_PASSES
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::data::{initial_achievements, daily_challenges};
    use chrono::NaiveDate;

    fn build_ledger_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<FarmActivityEvent>()
            .add_event::<DayStartedEvent>()
            .add_event::<LevelUpEvent>()
            .add_event::<AchievementUnlockedEvent>()
            .add_event::<ChallengeCompletedEvent>()
            .add_event::<ToastEvent>()
            .insert_resource(Farm::from_config(
                &SimConfig::default(),
                NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            ))
            .init_resource::<Herd>()
            .insert_resource(initial_achievements())
            .insert_resource(daily_challenges())
            .add_plugins(EconomyPlugin);
        app
    }

    #[test]
    fn test_settle_pays_queued_coins() {
        let mut app = build_ledger_app();
        app.world_mut()
            .resource_mut::<PendingRewards>()
            .queue
            .push(Reward::Coins { amount: 75, reason: "test".into() });

        run_reconcile(app.world_mut());

        assert_eq!(app.world().resource::<Farm>().coins, 1_075);
        assert!(app.world().resource::<PendingRewards>().queue.is_empty());
    }

    #[test]
    fn test_achievement_chain_settles_in_one_call() {
        let mut app = build_ledger_app();
        {
            let mut farm = app.world_mut().resource_mut::<Farm>();
            farm.level = 4;
            farm.xp = 300;
            farm.xp_to_next_level = 338;
            farm.total_harvests = 1;
        }

        // first_harvest pays 50 XP → level 5 → level_5 pays another 50.
        run_reconcile(app.world_mut());

        let world = app.world();
        let farm = world.resource::<Farm>();
        assert_eq!(farm.level, 5);
        assert_eq!(farm.xp, 12 + 50);
        let achievements = world.resource::<Achievements>();
        let unlocked: Vec<&str> = achievements
            .entries
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.id)
            .collect();
        assert_eq!(unlocked, vec!["first_harvest", "level_5"]);
        assert_eq!(world.resource::<ReconcileStatus>().settled, 0);
    }

    fn sustainability_goal(app: &App) -> &Challenge {
        app.world()
            .resource::<Challenges>()
            .entries
            .iter()
            .find(|c| c.id == "daily_sustainability")
            .unwrap()
    }

    #[test]
    fn test_rollover_with_high_score_starts_goal_at_zero() {
        let mut app = build_ledger_app();
        run_reconcile(app.world_mut());
        assert_eq!(sustainability_goal(&app).progress, 50);

        app.world_mut().resource_mut::<Farm>().sustainability = 80;
        app.world_mut().send_event(DayStartedEvent {
            date: NaiveDate::from_ymd_opt(2025, 5, 11).unwrap(),
            streak: 1,
        });
        run_reconcile(app.world_mut());

        let goal = sustainability_goal(&app);
        assert_eq!((goal.progress, goal.completed), (0, false));
        assert_eq!(app.world().resource::<Farm>().coins, 1_000);

        // The next change in score counts again.
        app.world_mut().resource_mut::<Farm>().sustainability = 81;
        run_reconcile(app.world_mut());
        assert!(sustainability_goal(&app).completed);
        assert_eq!(app.world().resource::<Farm>().coins, 1_150);
    }
}
