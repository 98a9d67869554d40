//! Green Valley library crate: a headless farm-management simulation.
//!
//! `session::FarmSession` is the entry point. The domain modules are public
//! so that `tests/` integration tests and other front ends can drive single
//! systems and pure functions directly.

pub mod shared;
pub mod config;
pub mod data;
pub mod calendar;
pub mod climate;
pub mod farming;
pub mod animals;
pub mod economy;
pub mod ui;
pub mod session;
