//! Game session controller.
//!
//! `FarmSession` owns a headless `App` and is the only way in for player
//! commands. A command runs the matching domain function against the ledger
//! and the grid or herd, posts its message, then runs the reconcile pass so
//! trackers and rewards have settled by the time it returns.
//!
//! ```no_run
//! use std::time::Duration;
//! use green_valley::session::FarmSession;
//! use green_valley::shared::CropKind;
//!
//! let mut session = FarmSession::new();
//! session.plant_crop(0, CropKind::Lettuce).unwrap();
//! session.advance(Duration::from_secs(45));
//! let earnings = session.harvest_crop(0).unwrap();
//! println!("{earnings} coins, {:?}", session.message());
//! ```

use std::time::Duration;

use bevy::ecs::system::SystemState;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use chrono::{Local, NaiveDate};

use crate::animals::{self, AnimalPlugin};
use crate::calendar::CalendarPlugin;
use crate::climate::ClimatePlugin;
use crate::config::SimConfig;
use crate::data::DataPlugin;
use crate::economy::{run_reconcile, EconomyPlugin};
use crate::farming::{self, FarmingPlugin};
use crate::shared::*;
use crate::ui::UiPlugin;

mod snapshot;

pub use snapshot::WorldSnapshot;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN: everything a session needs, minus the time source
// ═══════════════════════════════════════════════════════════════════════

pub struct FarmSimPlugin {
    pub config: SimConfig,
    pub today: NaiveDate,
}

impl Plugin for FarmSimPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;

        // ── Session State ────────────────────────────────────────────────
        app.init_state::<SessionState>();
        app.configure_sets(
            Update,
            (SimSet::Clock, SimSet::Tick, SimSet::Reconcile, SimSet::Expire)
                .chain()
                .run_if(in_state(SessionState::Running)),
        );

        // ── Shared Resources ─────────────────────────────────────────────
        app.insert_resource(Calendar { today: self.today })
            .insert_resource(SimClock::new(config.tick_period(), config.climate_period()))
            .insert_resource(NoticeSettings {
                lifetime: Duration::from_secs_f32(config.notice_secs),
            })
            .insert_resource(Farm::from_config(config, self.today))
            .insert_resource(PlotGrid::new(config.grid_size, config.grid_size, config.plot))
            .init_resource::<Herd>();

        // ── Shared Events ────────────────────────────────────────────────
        app.add_event::<SimTickEvent>()
            .add_event::<ClimateRefreshEvent>()
            .add_event::<DayStartedEvent>()
            .add_event::<FarmActivityEvent>()
            .add_event::<LevelUpEvent>()
            .add_event::<AchievementUnlockedEvent>()
            .add_event::<ChallengeCompletedEvent>()
            .add_event::<ToastEvent>();

        // ── Domain Plugins ───────────────────────────────────────────────
        app.add_plugins((
            DataPlugin,
            CalendarPlugin,
            ClimatePlugin {
                seed: config.climate_seed,
            },
            FarmingPlugin,
            AnimalPlugin,
            EconomyPlugin,
            UiPlugin,
        ));

        info!(
            "[Session] {} ready: {}×{} plots, {} coins",
            config.farm_name, config.grid_size, config.grid_size, config.starting_coins
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// COMMAND PLUMBING
// ═══════════════════════════════════════════════════════════════════════

/// What a successful command reports besides its return value.
struct Done<T> {
    value: T,
    message: String,
    activity: Option<FarmActivityEvent>,
    level_ups: Vec<LevelUpEvent>,
}

impl<T> Done<T> {
    fn new(value: T, message: String) -> Self {
        Self {
            value,
            message,
            activity: None,
            level_ups: Vec::new(),
        }
    }

    fn with_activity(mut self, activity: FarmActivityEvent) -> Self {
        self.activity = Some(activity);
        self
    }

    fn with_level_ups(mut self, level_ups: Vec<LevelUpEvent>) -> Self {
        self.level_ups = level_ups;
        self
    }
}

type Ledgers<'w> = (
    ResMut<'w, Farm>,
    ResMut<'w, PlotGrid>,
    ResMut<'w, Herd>,
    Res<'w, SimClock>,
);

/// Commands run outside `App::update`, so nothing else would swap the
/// buffers they fill. The reconcile pass has consumed them by the time this
/// runs; a front end that never advances time still holds at most one
/// command's worth of events.
fn rotate_command_events(world: &mut World) {
    world.resource_mut::<Events<FarmActivityEvent>>().update();
    world.resource_mut::<Events<LevelUpEvent>>().update();
    world.resource_mut::<Events<AchievementUnlockedEvent>>().update();
    world.resource_mut::<Events<ChallengeCompletedEvent>>().update();
    world.resource_mut::<Events<ToastEvent>>().update();
}

// ═══════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════

pub struct FarmSession {
    app: App,
}

impl Default for FarmSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FarmSession {
    /// Stock game, dated today.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default(), Local::now().date_naive())
    }

    pub fn with_config(config: SimConfig, today: NaiveDate) -> Self {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .add_plugins(FarmSimPlugin { config, today });
        Self::from_app(app)
    }

    /// Wraps an app that already has `FarmSimPlugin` (and possibly a time
    /// source) installed, and runs its first update.
    pub fn from_app(mut app: App) -> Self {
        app.finish();
        app.cleanup();
        app.update();
        Self { app }
    }

    // ── Time ─────────────────────────────────────────────────────────────

    /// Simulates `duration` more time. Every tick and climate refresh that
    /// falls inside it runs at its own timestamp.
    pub fn advance(&mut self, duration: Duration) {
        self.app.world_mut().resource_mut::<SimClock>().pending += duration;
        self.app.update();
    }

    /// Changes the calendar date. A different date rolls the streak and the
    /// daily challenges immediately.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.app.world_mut().resource_mut::<Calendar>().today = date;
        self.app.update();
    }

    pub fn now(&self) -> SimTime {
        self.app.world().resource::<SimClock>().now
    }

    pub fn today(&self) -> NaiveDate {
        self.app.world().resource::<Calendar>().today
    }

    // ── Commands ─────────────────────────────────────────────────────────

    pub fn select_plot(&mut self, index: usize) -> ActionResult<()> {
        let exists = self.app.world().resource::<PlotGrid>().get(index).map(|_| ());
        if let Err(err) = exists {
            self.reject(err);
            return Err(err);
        }
        self.app.world_mut().resource_mut::<SelectedPlot>().0 = Some(index);
        Ok(())
    }

    pub fn plant_crop(&mut self, index: usize, crop: CropKind) -> ActionResult<()> {
        self.dispatch(|farm, grid, _, now| {
            farming::plant_crop(farm, grid, index, crop, now)?;
            Ok(Done::new((), format!("Planted {}!", crop.def().name))
                .with_activity(FarmActivityEvent::Planted { index, crop }))
        })
    }

    pub fn water_plot(&mut self, index: usize) -> ActionResult<()> {
        self.dispatch(|farm, grid, _, now| {
            farming::water_plot(farm, grid, index, now)?;
            Ok(Done::new((), "Watered crop!".to_string())
                .with_activity(FarmActivityEvent::Watered { index }))
        })
    }

    pub fn fertilize_plot(&mut self, index: usize) -> ActionResult<()> {
        self.dispatch(|farm, grid, _, now| {
            farming::fertilize_plot(farm, grid, index, now)?;
            Ok(Done::new((), "Applied fertilizer! (-1 sustainability)".to_string())
                .with_activity(FarmActivityEvent::Fertilized { index }))
        })
    }

    /// Returns the coins earned.
    pub fn harvest_crop(&mut self, index: usize) -> ActionResult<u32> {
        self.dispatch(|farm, grid, _, _| {
            let outcome = farming::harvest_crop(farm, grid, index)?;
            Ok(Done::new(
                outcome.earnings,
                format!(
                    "Harvested! +{} coins +{} XP",
                    outcome.earnings,
                    crate::data::XP_PER_HARVEST
                ),
            )
            .with_activity(FarmActivityEvent::Harvested {
                index,
                crop: outcome.crop,
                earnings: outcome.earnings,
            })
            .with_level_ups(outcome.level_ups))
        })
    }

    /// Returns the coins spent.
    pub fn buy_resource(&mut self, kind: ResourceKind, amount: u32) -> ActionResult<u32> {
        self.dispatch(|farm, _, _, _| {
            let cost = farm.buy_resource(kind, amount)?;
            Ok(Done::new(cost, format!("Purchased {amount} {kind}!"))
                .with_activity(FarmActivityEvent::ResourceBought { kind, amount }))
        })
    }

    pub fn buy_animal(&mut self, kind: AnimalKind) -> ActionResult<LivestockId> {
        self.dispatch(|farm, _, herd, _| {
            let id = animals::buy_animal(farm, herd, kind)?;
            Ok(Done::new(id, format!("Purchased {}!", kind.def().name))
                .with_activity(FarmActivityEvent::AnimalBought { id, kind }))
        })
    }

    pub fn feed_animal(&mut self, id: LivestockId) -> ActionResult<()> {
        self.dispatch(|farm, _, herd, now| {
            let kind = animals::feed_animal(farm, herd, id, now)?;
            Ok(Done::new((), format!("Fed {}!", kind.def().name))
                .with_activity(FarmActivityEvent::AnimalFed { id }))
        })
    }

    /// Returns the coins earned.
    pub fn collect_production(&mut self, id: LivestockId) -> ActionResult<u32> {
        self.dispatch(|farm, _, herd, _| {
            let outcome = animals::collect_production(farm, herd, id)?;
            Ok(Done::new(
                outcome.value,
                format!(
                    "Collected! +{} coins +{} XP",
                    outcome.value,
                    crate::data::XP_PER_LIVESTOCK_COLLECTION
                ),
            )
            .with_activity(FarmActivityEvent::ProductionCollected {
                id,
                value: outcome.value,
            })
            .with_level_ups(outcome.level_ups))
        })
    }

    /// Runs one command against the ledgers. On success the activity,
    /// level-ups and message are posted; on failure only the error message.
    /// The reconcile pass runs either way.
    fn dispatch<T>(
        &mut self,
        action: impl FnOnce(&mut Farm, &mut PlotGrid, &mut Herd, SimTime) -> ActionResult<Done<T>>,
    ) -> ActionResult<T> {
        let world = self.app.world_mut();
        let mut state: SystemState<Ledgers<'static>> = SystemState::new(world);
        let result = {
            let (mut farm, mut grid, mut herd, clock) = state.get_mut(world);
            action(&mut *farm, &mut *grid, &mut *herd, clock.now)
        };

        let done = match result {
            Ok(done) => done,
            Err(err) => {
                self.reject(err);
                return Err(err);
            }
        };

        let world = self.app.world_mut();
        if let Some(activity) = done.activity {
            world.send_event(activity);
        }
        for level_up in done.level_ups {
            if let Some(message) = level_up.message {
                world.send_event(ToastEvent::new(message));
            }
            world.send_event(level_up);
        }
        world.send_event(ToastEvent::new(done.message));
        run_reconcile(world);
        rotate_command_events(world);
        Ok(done.value)
    }

    fn reject(&mut self, err: ActionError) {
        debug!("[Session] Rejected: {}", err);
        let world = self.app.world_mut();
        world.send_event(ToastEvent::new(err.to_string()));
        run_reconcile(world);
        rotate_command_events(world);
    }

    // ── Read-only views ──────────────────────────────────────────────────

    pub fn farm(&self) -> &Farm {
        self.app.world().resource::<Farm>()
    }

    pub fn plots(&self) -> &[Plot] {
        &self.app.world().resource::<PlotGrid>().plots
    }

    pub fn plot(&self, index: usize) -> Option<&Plot> {
        self.plots().get(index)
    }

    pub fn livestock(&self) -> &[Livestock] {
        &self.app.world().resource::<Herd>().animals
    }

    pub fn animal(&self, id: LivestockId) -> Option<&Livestock> {
        self.app.world().resource::<Herd>().get(id).ok()
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.app.world().resource::<Achievements>().entries
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.app.world().resource::<Challenges>().entries
    }

    pub fn climate(&self) -> &ClimateSnapshot {
        self.app.world().resource::<ClimateSnapshot>()
    }

    pub fn selected_plot(&self) -> Option<usize> {
        self.app.world().resource::<SelectedPlot>().0
    }

    /// The notification line, if it has not lapsed.
    pub fn message(&self) -> Option<&str> {
        self.app.world().resource::<Notification>().active(self.now())
    }

    pub fn show_level_up(&self) -> bool {
        self.app.world().resource::<LevelUpBanner>().active(self.now())
    }

    pub fn is_running(&self) -> bool {
        *self.app.world().resource::<State<SessionState>>().get() == SessionState::Running
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self.app.world())
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Direct world access for front ends and tests. Changes made here skip
    /// the command checks.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    // ── Teardown ─────────────────────────────────────────────────────────

    /// Stops both timers and every simulation system, returning the final
    /// state.
    pub fn shutdown(mut self) -> WorldSnapshot {
        self.app
            .world_mut()
            .resource_mut::<NextState<SessionState>>()
            .set(SessionState::Stopped);
        self.app.update();
        info!("[Session] Stopped at {} ms", self.now().millis());
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> FarmSession {
        let config = SimConfig {
            climate_seed: Some(1),
            ..Default::default()
        };
        FarmSession::with_config(config, NaiveDate::from_ymd_opt(2025, 5, 10).unwrap())
    }

    #[test]
    fn test_command_posts_success_message() {
        let mut session = session();
        session.plant_crop(2, CropKind::Tomato).unwrap();
        assert_eq!(session.message(), Some("Planted Tomato!"));
        assert_eq!(session.farm().coins, 985);
    }

    #[test]
    fn test_failed_command_posts_error_and_changes_nothing() {
        let mut session = session();
        let before = session.snapshot();
        assert_eq!(session.water_plot(0), Err(ActionError::NoCrop(PlotAction::Water)));
        assert_eq!(session.message(), Some("No crop to water!"));
        let after = session.snapshot();
        assert_eq!(after.farm, before.farm);
        assert_eq!(after.plots, before.plots);
    }

    #[test]
    fn test_select_plot() {
        let mut session = session();
        session.select_plot(5).unwrap();
        assert_eq!(session.selected_plot(), Some(5));
        assert_eq!(session.select_plot(36), Err(ActionError::InvalidPlot(36)));
        assert_eq!(session.selected_plot(), Some(5));
    }

    #[test]
    fn test_commands_without_advance_keep_event_buffers_small() {
        let mut session = session();
        session.plant_crop(0, CropKind::Wheat).unwrap();
        for _ in 0..40 {
            session.water_plot(0).unwrap();
            assert!(session.water_plot(99).is_err());
        }
        let world = session.world();
        assert!(world.resource::<Events<FarmActivityEvent>>().len() <= 2);
        assert!(world.resource::<Events<ToastEvent>>().len() <= 2);
        assert_eq!(session.farm().water, 60);
        assert_eq!(session.message(), Some("No plot at index 99"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = session();
        let json = session.snapshot().to_json().unwrap();
        assert!(json.contains("\"Green Valley Farm\""));
        assert!(json.contains("\"daily_harvest\""));
    }
}
