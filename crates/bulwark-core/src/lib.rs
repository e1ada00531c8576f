//! Core types and definitions for the Bulwark city-defense simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, configuration and
//! constants. It contains no simulation logic and no runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod effects;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
pub mod upgrades;

#[cfg(test)]
mod tests;
