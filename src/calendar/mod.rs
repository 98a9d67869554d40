//! Calendar domain: simulated time and the calendar date.
//!
//! Responsible for:
//! - Turning pending time into simulation ticks and climate refreshes at
//!   their exact timestamps
//! - Rolling the play streak when the calendar date changes
//! - Pausing both timers when the session stops
//! - Optionally feeding wall-clock time and the local date (`RealTimeClockPlugin`)

use bevy::prelude::*;
use chrono::Local;

use crate::shared::*;

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_clock.in_set(SimSet::Clock))
            .add_systems(Update, roll_calendar_day.in_set(SimSet::Tick))
            .add_systems(OnEnter(SessionState::Stopped), stop_clock);
    }
}

/// Drives the clock from `Time` and the local calendar instead of
/// `FarmSession::advance`. Used by the binary.
pub struct RealTimeClockPlugin;

impl Plugin for RealTimeClockPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            feed_real_time
                .in_set(SimSet::Clock)
                .before(advance_clock),
        );
    }
}

// ─── Main clock system ────────────────────────────────────────────────────────

/// Consumes `SimClock::pending` in steps that never cross a timer boundary,
/// so every tick and climate refresh carries the exact time it fell due.
///
/// A 2.5 s advance from a fresh clock emits ticks at 1 s and 2 s and leaves
/// the clock at 2.5 s with the next tick 0.5 s away.
pub fn advance_clock(
    mut clock: ResMut<SimClock>,
    mut tick_writer: EventWriter<SimTickEvent>,
    mut climate_writer: EventWriter<ClimateRefreshEvent>,
) {
    while !clock.pending.is_zero() {
        let step = clock
            .pending
            .min(clock.tick.remaining())
            .min(clock.climate.remaining());

        clock.pending -= step;
        clock.advance_by(step);
        clock.tick.tick(step);
        clock.climate.tick(step);

        let now = clock.now;
        if clock.tick.just_finished() {
            tick_writer.send(SimTickEvent { now });
        }
        if clock.climate.just_finished() {
            climate_writer.send(ClimateRefreshEvent { now });
        }
    }
}

// ─── Day rollover ─────────────────────────────────────────────────────────────

/// Checks for a new calendar day on every tick and whenever the date itself
/// changes (session start, `FarmSession::set_date`, the real-time driver).
pub fn roll_calendar_day(
    mut ticks: EventReader<SimTickEvent>,
    calendar: Res<Calendar>,
    mut farm: ResMut<Farm>,
    mut day_writer: EventWriter<DayStartedEvent>,
) {
    let ticked = ticks.read().count() > 0;
    if !ticked && !calendar.is_changed() {
        return;
    }

    if let Some(roll) = farm.roll_day(calendar.today) {
        info!(
            "[Calendar] New day {} (streak {})",
            roll.date, roll.streak
        );
        day_writer.send(DayStartedEvent {
            date: roll.date,
            streak: roll.streak,
        });
    }
}

// ─── State transition hooks ───────────────────────────────────────────────────

fn stop_clock(mut clock: ResMut<SimClock>) {
    clock.tick.pause();
    clock.climate.pause();
    clock.pending = std::time::Duration::ZERO;
    info!("[Calendar] Clock stopped at {} ms", clock.now.millis());
}

// ─── Real-time driver ─────────────────────────────────────────────────────────

fn feed_real_time(time: Res<Time>, mut clock: ResMut<SimClock>, mut calendar: ResMut<Calendar>) {
    clock.pending += time.delta();

    let today = Local::now().date_naive();
    if calendar.today != today {
        calendar.today = today;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn build_clock_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<SimTickEvent>()
            .add_event::<ClimateRefreshEvent>()
            .insert_resource(SimClock::new(
                Duration::from_secs(1),
                Duration::from_secs(30),
            ))
            .add_systems(Update, advance_clock);
        app
    }

    fn drain<E: Event + Clone>(app: &mut App) -> Vec<E> {
        app.world_mut()
            .resource_mut::<Events<E>>()
            .drain()
            .collect()
    }

    #[test]
    fn test_ticks_land_on_exact_boundaries() {
        let mut app = build_clock_app();
        app.world_mut().resource_mut::<SimClock>().pending = Duration::from_millis(2_500);
        app.update();

        let ticks: Vec<SimTime> = drain::<SimTickEvent>(&mut app).iter().map(|t| t.now).collect();
        assert_eq!(ticks, vec![SimTime(1_000), SimTime(2_000)]);

        let clock = app.world().resource::<SimClock>();
        assert_eq!(clock.now, SimTime(2_500));
        assert!(clock.pending.is_zero());
        assert_eq!(clock.tick.remaining(), Duration::from_millis(500));
    }

    #[test]
    fn test_climate_refresh_every_thirty_seconds() {
        let mut app = build_clock_app();
        app.world_mut().resource_mut::<SimClock>().pending = Duration::from_secs(61);
        app.update();

        assert_eq!(drain::<SimTickEvent>(&mut app).len(), 61);
        let refreshes: Vec<SimTime> = drain::<ClimateRefreshEvent>(&mut app)
            .iter()
            .map(|c| c.now)
            .collect();
        assert_eq!(refreshes, vec![SimTime::from_secs(30), SimTime::from_secs(60)]);
    }

    #[test]
    fn test_split_advances_match_single_advance() {
        let mut app = build_clock_app();
        let mut ticks = Vec::new();
        for _ in 0..4 {
            app.world_mut().resource_mut::<SimClock>().pending = Duration::from_millis(750);
            app.update();
            ticks.extend(drain::<SimTickEvent>(&mut app).iter().map(|t| t.now));
        }
        assert_eq!(ticks, vec![SimTime(1_000), SimTime(2_000), SimTime(3_000)]);
        assert_eq!(app.world().resource::<SimClock>().now, SimTime(3_000));
    }
}
