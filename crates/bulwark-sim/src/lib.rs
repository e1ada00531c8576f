//! Simulation engine for Bulwark.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameSnapshots for the frontend.

pub mod economy;
pub mod engine;
pub mod entities;
pub mod history;
pub mod placement;
pub mod state;
pub mod systems;
pub mod upgrades;
pub mod world_setup;

pub use bulwark_core as core;
pub use engine::{SimConfig, Simulator};
