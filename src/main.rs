//! Headless real-time runner.
//!
//! `green_valley [config.ron]` runs the farm on wall-clock time and the local
//! calendar, logging each day rollover, climate reading and milestone.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use chrono::Local;

use green_valley::calendar::RealTimeClockPlugin;
use green_valley::config::SimConfig;
use green_valley::session::FarmSimPlugin;
use green_valley::shared::*;

/// Frames per second of the headless loop.
const FRAME_RATE: f64 = 20.0;

fn main() -> AppExit {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("green_valley: {err}");
                return AppExit::error();
            }
        },
        None => SimConfig::default(),
    };

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / FRAME_RATE,
            ))),
        )
        .add_plugins((LogPlugin::default(), StatesPlugin))
        .add_plugins(FarmSimPlugin {
            config,
            today: Local::now().date_naive(),
        })
        .add_plugins(RealTimeClockPlugin)
        .add_systems(Update, log_milestones.after(SimSet::Reconcile))
        .run()
}

fn log_milestones(
    mut climate: EventReader<ClimateRefreshEvent>,
    snapshot: Res<ClimateSnapshot>,
    mut days: EventReader<DayStartedEvent>,
    mut achievements: EventReader<AchievementUnlockedEvent>,
    mut challenges: EventReader<ChallengeCompletedEvent>,
) {
    if climate.read().count() > 0 {
        info!(
            "[Main] Climate: {}°C, {:.1} mm rain, {}% humidity, {} W/m², soil {:.2}",
            snapshot.temperature,
            snapshot.precipitation,
            snapshot.humidity,
            snapshot.solar_radiation,
            snapshot.soil_moisture
        );
    }
    for day in days.read() {
        info!("[Main] Day {} begins, streak {}", day.date, day.streak);
    }
    for unlocked in achievements.read() {
        info!("[Main] Achievement: {}", unlocked.name);
    }
    for completed in challenges.read() {
        info!("[Main] Challenge {} done (+{} coins)", completed.challenge_id, completed.reward);
    }
}
