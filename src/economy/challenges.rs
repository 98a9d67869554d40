//! Daily challenge tracker.
//!
//! Harvest and water goals count activity events. The sustainability goal
//! mirrors the score whenever the score moves. A completed challenge pays
//! its coin reward once; a new calendar day replaces the whole set, and the
//! fresh set starts at zero until the score next changes.

use bevy::prelude::*;

use crate::data::daily_challenges;
use crate::shared::*;

/// Challenge kind a farm activity counts towards, if any.
fn counted_kind(activity: &FarmActivityEvent) -> Option<ChallengeKind> {
    match activity {
        FarmActivityEvent::Harvested { .. } => Some(ChallengeKind::Harvest),
        FarmActivityEvent::Watered { .. } => Some(ChallengeKind::Water),
        _ => None,
    }
}

/// Adds one to every open challenge of `kind`. Returns the ones it completed.
pub fn record_activity(challenges: &mut Challenges, kind: ChallengeKind) -> Vec<(&'static str, u32)> {
    let mut completed = Vec::new();
    for challenge in challenges
        .entries
        .iter_mut()
        .filter(|c| c.kind == kind && !c.completed)
    {
        challenge.progress += 1;
        if challenge.progress >= challenge.target {
            challenge.completed = true;
            completed.push((challenge.id, challenge.reward));
        }
    }
    completed
}

/// Mirrors the sustainability score into every open sustainability goal.
pub fn observe_sustainability(challenges: &mut Challenges, score: u32) -> Vec<(&'static str, u32)> {
    let mut completed = Vec::new();
    for challenge in challenges
        .entries
        .iter_mut()
        .filter(|c| c.kind == ChallengeKind::Sustainability && !c.completed)
    {
        challenge.progress = score;
        if challenge.progress >= challenge.target {
            challenge.completed = true;
            completed.push((challenge.id, challenge.reward));
        }
    }
    completed
}

/// Records `score` as the last one seen. True when it differs from the
/// previous record or nothing was recorded yet.
pub fn score_moved(last: &mut Option<u32>, score: u32) -> bool {
    last.replace(score) != Some(score)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Replaces the daily set when the calendar day changes.
pub fn regenerate_daily_challenges(
    mut day_events: EventReader<DayStartedEvent>,
    mut challenges: ResMut<Challenges>,
) {
    let Some(day) = day_events.read().last() else {
        return;
    };
    *challenges = daily_challenges();
    info!(
        "[Challenges] New daily set for {} (streak {})",
        day.date, day.streak
    );
}

pub fn track_challenge_progress(
    mut activity_events: EventReader<FarmActivityEvent>,
    mut day_events: EventReader<DayStartedEvent>,
    mut last_score: Local<Option<u32>>,
    farm: Res<Farm>,
    mut challenges: ResMut<Challenges>,
    mut pending: ResMut<PendingRewards>,
    mut completed_writer: EventWriter<ChallengeCompletedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    let mut completed = Vec::new();
    for activity in activity_events.read() {
        if let Some(kind) = counted_kind(activity) {
            completed.extend(record_activity(&mut challenges, kind));
        }
    }
    // A rollover only rebases the score; the new set is not credited with it.
    let day_started = day_events.read().count() > 0;
    if score_moved(&mut last_score, farm.sustainability) && !day_started {
        completed.extend(observe_sustainability(&mut challenges, farm.sustainability));
    }

    for (id, reward) in completed {
        info!("[Challenges] Completed \"{}\" (+{} coins)", id, reward);
        pending.queue.push(Reward::Coins {
            amount: reward,
            reason: format!("challenge {id}"),
        });
        completed_writer.send(ChallengeCompletedEvent {
            challenge_id: id,
            reward,
        });
        toast_writer.send(ToastEvent::new(format!(
            "✅ Challenge Complete! +{reward} coins"
        )));
    }
}
