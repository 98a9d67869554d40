//! Farm ledger: coins, stocks, sustainability and the play streak.
//!
//! Every coin or stock change goes through these methods. A failed check
//! returns an `ActionError` and leaves the ledger untouched.

use bevy::prelude::*;
use chrono::NaiveDate;

use crate::config::SimConfig;
use crate::data::{unit_cost, BASE_XP_TO_LEVEL};
use crate::shared::*;

/// Outcome of a calendar-day change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRoll {
    pub date: NaiveDate,
    pub streak: u32,
}

impl Farm {
    pub fn from_config(config: &SimConfig, today: NaiveDate) -> Self {
        Self {
            name: config.farm_name.clone(),
            level: 1,
            xp: 0,
            xp_to_next_level: BASE_XP_TO_LEVEL as u32,
            coins: config.starting_coins,
            sustainability: config.starting_sustainability.min(SUSTAINABILITY_MAX),
            water: config.starting_water,
            fertilizer: config.starting_fertilizer,
            total_harvests: 0,
            streak: config.starting_streak,
            last_played_date: config.last_played_date.unwrap_or(today),
        }
    }

    pub fn credit(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn ensure_funds(&self, cost: u32, purchase: Purchase) -> ActionResult<()> {
        if self.coins < cost {
            return Err(ActionError::InsufficientFunds(purchase));
        }
        Ok(())
    }

    /// Never takes the balance below zero.
    pub fn debit(&mut self, cost: u32, purchase: Purchase) -> ActionResult<()> {
        self.ensure_funds(cost, purchase)?;
        self.coins -= cost;
        Ok(())
    }

    /// Clamped to `0..=100`.
    pub fn adjust_sustainability(&mut self, delta: i32) {
        let score = self.sustainability as i64 + delta as i64;
        self.sustainability = score.clamp(0, SUSTAINABILITY_MAX as i64) as u32;
    }

    pub fn stock(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Water => self.water,
            ResourceKind::Fertilizer => self.fertilizer,
        }
    }

    fn stock_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Water => &mut self.water,
            ResourceKind::Fertilizer => &mut self.fertilizer,
        }
    }

    /// Buys `amount` units; returns the coins spent.
    pub fn buy_resource(&mut self, kind: ResourceKind, amount: u32) -> ActionResult<u32> {
        let cost = unit_cost(kind).saturating_mul(amount);
        self.debit(cost, Purchase::Resource(kind))?;
        let stock = self.stock_mut(kind);
        *stock = stock.saturating_add(amount);
        info!(
            "[Economy] Bought {} {} for {} coins. Balance: {}",
            amount, kind, cost, self.coins
        );
        Ok(cost)
    }

    /// Uses one unit of stock.
    pub fn consume(&mut self, kind: ResourceKind) -> ActionResult<()> {
        let stock = self.stock_mut(kind);
        if *stock < 1 {
            return Err(ActionError::InsufficientResource(kind));
        }
        *stock -= 1;
        Ok(())
    }

    /// Streak bookkeeping for a new calendar date. `None` if `today` is
    /// the date already on record.
    pub fn roll_day(&mut self, today: NaiveDate) -> Option<DayRoll> {
        if today == self.last_played_date {
            return None;
        }
        let consecutive = self.last_played_date.succ_opt() == Some(today);
        self.streak = if consecutive { self.streak + 1 } else { 1 };
        self.last_played_date = today;
        Some(DayRoll {
            date: today,
            streak: self.streak,
        })
    }
}
