//! Headless Bulwark runner.
//!
//! Wires the simulator to a game loop thread, an autopilot player, TOML
//! settings and the on-disk run log.

pub mod autopilot;
pub mod error;
pub mod game_loop;
pub mod persistence;
pub mod settings;

pub use bulwark_core as core;
