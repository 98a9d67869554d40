//! Climate domain: a synthetic weather feed for flavor.
//!
//! The snapshot is regenerated on every climate-refresh boundary of the
//! clock. Nothing in the simulation reads it; it is display data only.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shared::*;

/// RNG behind the climate feed.
#[derive(Resource, Debug, Clone)]
pub struct ClimateRng(pub StdRng);

impl ClimateRng {
    /// Deterministic with a seed, entropy-seeded without.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// A fresh reading:
///
/// | field | range |
/// |---|---|
/// | temperature | 15–30 °C |
/// | precipitation | 0.0–10.0 mm, one decimal |
/// | humidity | 40–80 % |
/// | solar radiation | 300–700 W/m² |
/// | soil moisture | 0.20–0.50, two decimals |
pub fn generate(rng: &mut impl Rng, now: SimTime) -> ClimateSnapshot {
    ClimateSnapshot {
        temperature: rng.gen_range(15..=30),
        precipitation: rng.gen_range(0..=100) as f32 / 10.0,
        humidity: rng.gen_range(40..=80),
        solar_radiation: rng.gen_range(300..=700),
        soil_moisture: rng.gen_range(20..=50) as f32 / 100.0,
        timestamp: now,
    }
}

pub struct ClimatePlugin {
    pub seed: Option<u64>,
}

impl Plugin for ClimatePlugin {
    fn build(&self, app: &mut App) {
        let mut rng = ClimateRng::new(self.seed);
        let initial = generate(&mut rng.0, SimTime::ZERO);
        info!(
            "[Climate] Initial reading: {}°C, {:.1} mm, {}% humidity",
            initial.temperature, initial.precipitation, initial.humidity
        );

        app.insert_resource(rng)
            .insert_resource(initial)
            .add_systems(Update, refresh_climate.in_set(SimSet::Tick));
    }
}

pub fn refresh_climate(
    mut refreshes: EventReader<ClimateRefreshEvent>,
    mut rng: ResMut<ClimateRng>,
    mut climate: ResMut<ClimateSnapshot>,
) {
    for refresh in refreshes.read() {
        *climate = generate(&mut rng.0, refresh.now);
        debug!(
            "[Climate] Refreshed at {} ms: {}°C, {:.2} soil moisture",
            refresh.now.millis(),
            climate.temperature,
            climate.soil_moisture
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..500 {
            let reading = generate(&mut rng, SimTime::from_secs(i));
            assert!((15..=30).contains(&reading.temperature));
            assert!((0.0..=10.0).contains(&reading.precipitation));
            assert!((40..=80).contains(&reading.humidity));
            assert!((300..=700).contains(&reading.solar_radiation));
            assert!((0.2..=0.5).contains(&reading.soil_moisture));
            assert_eq!(reading.timestamp, SimTime::from_secs(i));
        }
    }

    #[test]
    fn test_precision() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let reading = generate(&mut rng, SimTime::ZERO);
            let tenths = reading.precipitation * 10.0;
            assert!((tenths - tenths.round()).abs() < 1e-3);
            let hundredths = reading.soil_moisture * 100.0;
            assert!((hundredths - hundredths.round()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_seeded_feed_is_reproducible() {
        let mut a = ClimateRng::new(Some(3));
        let mut b = ClimateRng::new(Some(3));
        assert_eq!(
            generate(&mut a.0, SimTime::ZERO),
            generate(&mut b.0, SimTime::ZERO)
        );
    }
}
