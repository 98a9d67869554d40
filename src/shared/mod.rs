//! Shared resources, events, states, and error types for Green Valley.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly; cross-domain effects
//! travel as events or as queued rewards.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════
// SESSION STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum SessionState {
    #[default]
    Running,
    /// Torn down: timers paused, no simulation system runs.
    Stopped,
}

/// Ordering of the per-frame simulation work inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Consume pending time and emit tick / climate events.
    Clock,
    /// Plot growth, livestock drain, day rollover, climate refresh.
    Tick,
    /// Challenge / achievement tracking and reward settlement.
    Reconcile,
    /// Clear transient UI state whose expiry has passed.
    Expire,
}

/// Ordering inside one `ReconcilePass`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileSet {
    /// Day regeneration, challenge and achievement trackers.
    Track,
    /// Apply queued rewards to the ledger.
    Settle,
    /// Turn toast / level-up events into transient UI state.
    Present,
}

/// Schedule holding one tracker → settlement pass. Run repeatedly by
/// `economy::run_reconcile` until no reward is left to settle.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReconcilePass;

// ═══════════════════════════════════════════════════════════════════════
// SIMULATED TIME
// ═══════════════════════════════════════════════════════════════════════

/// Milliseconds of simulated time since the session started.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_secs(secs: u64) -> Self {
        SimTime(secs * 1_000)
    }

    pub fn millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier` (zero if `earlier` is in the future).
    pub fn since(self, earlier: SimTime) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    pub fn after(self, duration: Duration) -> SimTime {
        SimTime(self.0.saturating_add(duration.as_millis() as u64))
    }
}

/// The simulation clock and its two recurring timers.
#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    /// `elapsed` truncated to whole milliseconds.
    pub now: SimTime,
    pub elapsed: Duration,
    /// Time handed in by the session or the real-time driver, not yet simulated.
    pub pending: Duration,
    /// 1-second simulation tick.
    pub tick: Timer,
    /// 30-second climate refresh.
    pub climate: Timer,
}

impl SimClock {
    pub fn new(tick_period: Duration, climate_period: Duration) -> Self {
        Self {
            now: SimTime::ZERO,
            elapsed: Duration::ZERO,
            pending: Duration::ZERO,
            tick: Timer::new(tick_period, TimerMode::Repeating),
            climate: Timer::new(climate_period, TimerMode::Repeating),
        }
    }

    /// Moves `now` forward by `step`. The timers are ticked separately.
    pub fn advance_by(&mut self, step: Duration) {
        self.elapsed += step;
        self.now = SimTime(self.elapsed.as_millis() as u64);
    }
}

/// Calendar date the session currently considers "today".
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    pub today: NaiveDate,
}

// ═══════════════════════════════════════════════════════════════════════
// CATALOG KEYS: closed sets looked up in `crate::data`
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropKind {
    Wheat,
    Corn,
    Tomato,
    Lettuce,
}

impl CropKind {
    pub const ALL: [CropKind; 4] = [
        CropKind::Wheat,
        CropKind::Corn,
        CropKind::Tomato,
        CropKind::Lettuce,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CropKind::Wheat => "wheat",
            CropKind::Corn => "corn",
            CropKind::Tomato => "tomato",
            CropKind::Lettuce => "lettuce",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalKind {
    Cow,
    Chicken,
    Sheep,
}

impl AnimalKind {
    pub const ALL: [AnimalKind; 3] = [AnimalKind::Cow, AnimalKind::Chicken, AnimalKind::Sheep];

    pub fn key(self) -> &'static str {
        match self {
            AnimalKind::Cow => "cow",
            AnimalKind::Chicken => "chicken",
            AnimalKind::Sheep => "sheep",
        }
    }
}

/// Purchasable farm stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Water,
    Fertilizer,
}

impl ResourceKind {
    pub fn key(self) -> &'static str {
        match self {
            ResourceKind::Water => "water",
            ResourceKind::Fertilizer => "fertilizer",
        }
    }
}

/// Returned by the `FromStr` impls of the catalog keys.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{key}'")]
pub struct UnknownKey {
    pub kind: &'static str,
    pub key: String,
}

macro_rules! impl_from_key {
    ($ty:ty, $label:literal, $all:expr) => {
        impl FromStr for $ty {
            type Err = UnknownKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $all.into_iter()
                    .find(|kind| kind.key() == wanted)
                    .ok_or_else(|| UnknownKey {
                        kind: $label,
                        key: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

impl_from_key!(CropKind, "crop", CropKind::ALL);
impl_from_key!(AnimalKind, "animal", AnimalKind::ALL);
impl_from_key!(
    ResourceKind,
    "resource",
    [ResourceKind::Water, ResourceKind::Fertilizer]
);

// ═══════════════════════════════════════════════════════════════════════
// FARM: the ledger singleton
// ═══════════════════════════════════════════════════════════════════════

/// Coins, stocks, progression and streak. Mutated only through the
/// transaction methods in `economy::ledger` and `economy::progression`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub name: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub coins: u32,
    /// 0–100
    pub sustainability: u32,
    pub water: u32,
    pub fertilizer: u32,
    pub total_harvests: u32,
    pub streak: u32,
    pub last_played_date: NaiveDate,
}

// ═══════════════════════════════════════════════════════════════════════
// PLOTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub x: u32,
    pub y: u32,
    pub soil_health: f32,
    pub water_level: f32,
    pub fertility: f32,
    pub crop: Option<CropKind>,
    /// 0 = empty, 4 = ready to harvest
    pub growth_stage: u8,
    pub planted_at: Option<SimTime>,
    pub last_watered: Option<SimTime>,
    pub last_fertilized: Option<SimTime>,
}

impl Plot {
    pub fn is_ready(&self) -> bool {
        self.crop.is_some() && self.growth_stage >= READY_STAGE
    }
}

/// Fixed grid of plots, stored row-major (`index = y * width + x`).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotGrid {
    pub width: u32,
    pub height: u32,
    pub plots: Vec<Plot>,
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectedPlot(pub Option<usize>);

// ═══════════════════════════════════════════════════════════════════════
// LIVESTOCK
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LivestockId(pub u64);

impl fmt::Display for LivestockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Livestock {
    pub id: LivestockId,
    pub kind: AnimalKind,
    /// 0–100
    pub health: f32,
    pub last_fed: Option<SimTime>,
    pub production_rate: u32,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Herd {
    pub animals: Vec<Livestock>,
    /// Next id to hand out. Ids are never reused.
    pub next_id: u64,
}

impl Default for Herd {
    fn default() -> Self {
        Self {
            animals: Vec::new(),
            next_id: 1,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CLIMATE
// ═══════════════════════════════════════════════════════════════════════

/// Decorative climate feed. Replaced wholesale on every refresh.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateSnapshot {
    /// °C, 15–30
    pub temperature: i32,
    /// mm, 0–10, one decimal
    pub precipitation: f32,
    /// %, 40–80
    pub humidity: i32,
    /// W/m², 300–700
    pub solar_radiation: i32,
    /// fraction, 0.2–0.5, two decimals
    pub soil_moisture: f32,
    pub timestamp: SimTime,
}

// ═══════════════════════════════════════════════════════════════════════
// ACHIEVEMENTS & CHALLENGES
// ═══════════════════════════════════════════════════════════════════════

/// Farm statistic an achievement is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AchievementMetric {
    Harvests,
    Sustainability,
    Coins,
    LivestockOwned,
    Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub metric: AchievementMetric,
    pub target: u32,
    pub progress: u32,
    /// Terminal once true.
    pub unlocked: bool,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Achievements {
    pub entries: Vec<Achievement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Harvest,
    Sustainability,
    /// Reserved: no daily template produces it and nothing tracks it.
    Livestock,
    Water,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    pub id: &'static str,
    pub description: &'static str,
    pub reward: u32,
    pub kind: ChallengeKind,
    pub target: u32,
    pub progress: u32,
    pub completed: bool,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Challenges {
    pub entries: Vec<Challenge>,
}

/// A ledger change requested by a tracker, applied by `settle_rewards`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reward {
    Coins { amount: u32, reason: String },
    Xp { amount: u32, reason: String },
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PendingRewards {
    pub queue: Vec<Reward>,
}

/// Written by `settle_rewards`: whether the last pass applied anything.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ReconcileStatus {
    pub settled: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// TRANSIENT UI STATE
// ═══════════════════════════════════════════════════════════════════════

/// The single user-facing message line.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize)]
pub struct Notification {
    pub text: Option<String>,
    pub expires_at: SimTime,
}

impl Notification {
    pub fn active(&self, now: SimTime) -> Option<&str> {
        match &self.text {
            Some(text) if now < self.expires_at => Some(text.as_str()),
            _ => None,
        }
    }
}

/// How long the notification line and the level-up banner stay up.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct NoticeSettings {
    pub lifetime: Duration,
}

impl Default for NoticeSettings {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_secs_f32(NOTICE_SECS),
        }
    }
}

/// "Level up!" banner flag.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LevelUpBanner {
    pub until: Option<SimTime>,
}

impl LevelUpBanner {
    pub fn active(&self, now: SimTime) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// One fixed-period simulation tick at its exact timestamp.
#[derive(Event, Debug, Clone, Copy)]
pub struct SimTickEvent {
    pub now: SimTime,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ClimateRefreshEvent {
    pub now: SimTime,
}

/// The calendar day changed and the ledger rolled its streak.
#[derive(Event, Debug, Clone, Copy)]
pub struct DayStartedEvent {
    pub date: NaiveDate,
    pub streak: u32,
}

/// Something the player did successfully. Trackers listen to these.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum FarmActivityEvent {
    Planted { index: usize, crop: CropKind },
    Watered { index: usize },
    Fertilized { index: usize },
    Harvested { index: usize, crop: CropKind, earnings: u32 },
    AnimalBought { id: LivestockId, kind: AnimalKind },
    AnimalFed { id: LivestockId },
    ProductionCollected { id: LivestockId, value: u32 },
    ResourceBought { kind: ResourceKind, amount: u32 },
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LevelUpEvent {
    pub level: u32,
    pub coin_bonus: u32,
    pub message: Option<&'static str>,
}

#[derive(Event, Debug, Clone)]
pub struct AchievementUnlockedEvent {
    pub achievement_id: &'static str,
    pub name: &'static str,
}

#[derive(Event, Debug, Clone)]
pub struct ChallengeCompletedEvent {
    pub challenge_id: &'static str,
    pub reward: u32,
}

/// Message for the notification line. Lifetime comes from `NoticeSettings`.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ToastEvent {
    pub message: String,
}

impl ToastEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS: every rejection is a no-op
// ═══════════════════════════════════════════════════════════════════════

/// What the coins were meant for; selects the rejection message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purchase {
    Seeds,
    Resource(ResourceKind),
    Livestock,
    Feed,
}

impl Purchase {
    fn shortfall_message(self) -> &'static str {
        match self {
            Purchase::Seeds => "Not enough coins to buy seeds!",
            Purchase::Resource(_) => "Not enough coins!",
            Purchase::Livestock => "Not enough coins to buy livestock!",
            Purchase::Feed => "Not enough coins to buy feed!",
        }
    }
}

/// Plot action that needs a crop to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotAction {
    Water,
    Fertilize,
}

impl PlotAction {
    fn verb(self) -> &'static str {
        match self {
            PlotAction::Water => "water",
            PlotAction::Fertilize => "fertilize",
        }
    }
}

impl ResourceKind {
    fn shortage_message(self) -> &'static str {
        match self {
            ResourceKind::Water => "Not enough water! Purchase more water.",
            ResourceKind::Fertilizer => "Not enough fertilizer! Purchase more.",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    #[error("{}", .0.shortfall_message())]
    InsufficientFunds(Purchase),
    #[error("{}", .0.shortage_message())]
    InsufficientResource(ResourceKind),
    #[error("Plot already has a crop!")]
    PlotOccupied,
    #[error("No crop to {}!", .0.verb())]
    NoCrop(PlotAction),
    #[error("Crop is not ready to harvest!")]
    NotReady,
    #[error("Animal not found!")]
    NotFound(LivestockId),
    #[error("Animal is not healthy enough to produce!")]
    NotHealthyEnough,
    #[error("No plot at index {0}")]
    InvalidPlot(usize),
}

pub type ActionResult<T> = Result<T, ActionError>;

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const GRID_SIZE: u32 = 6;

pub const METER_MAX: f32 = 100.0;
pub const SOIL_HEALTH_FLOOR: f32 = 30.0;
pub const SUSTAINABILITY_MAX: u32 = 100;

pub const EMPTY_STAGE: u8 = 0;
pub const SEEDLING_STAGE: u8 = 1;
pub const READY_STAGE: u8 = 4;

pub const TICK_SECS: f32 = 1.0;
pub const CLIMATE_REFRESH_SECS: f32 = 30.0;
pub const NOTICE_SECS: f32 = 3.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time_since_saturates() {
        let early = SimTime::from_secs(5);
        let late = SimTime::from_secs(8);
        assert_eq!(late.since(early), Duration::from_secs(3));
        assert_eq!(early.since(late), Duration::ZERO);
        assert_eq!(early.after(Duration::from_millis(250)), SimTime(5_250));
    }

    #[test]
    fn test_catalog_keys_parse_case_insensitively() {
        assert_eq!("Lettuce".parse::<CropKind>(), Ok(CropKind::Lettuce));
        assert_eq!(" cow ".parse::<AnimalKind>(), Ok(AnimalKind::Cow));
        assert_eq!("water".parse::<ResourceKind>(), Ok(ResourceKind::Water));
        let err = "pumpkin".parse::<CropKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown crop 'pumpkin'");
    }

    #[test]
    fn test_action_error_messages() {
        assert_eq!(
            ActionError::InsufficientFunds(Purchase::Seeds).to_string(),
            "Not enough coins to buy seeds!"
        );
        assert_eq!(
            ActionError::InsufficientResource(ResourceKind::Water).to_string(),
            "Not enough water! Purchase more water."
        );
        assert_eq!(
            ActionError::NoCrop(PlotAction::Fertilize).to_string(),
            "No crop to fertilize!"
        );
        assert_eq!(ActionError::InvalidPlot(40).to_string(), "No plot at index 40");
    }

    #[test]
    fn test_notification_expiry() {
        let notice = Notification {
            text: Some("Watered crop!".into()),
            expires_at: SimTime::from_secs(3),
        };
        assert_eq!(notice.active(SimTime::from_secs(2)), Some("Watered crop!"));
        assert_eq!(notice.active(SimTime::from_secs(3)), None);

        let banner = LevelUpBanner { until: Some(SimTime::from_secs(3)) };
        assert!(banner.active(SimTime::ZERO));
        assert!(!banner.active(SimTime::from_secs(4)));
        assert!(!LevelUpBanner::default().active(SimTime::ZERO));
    }
}
