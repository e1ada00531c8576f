//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus whatever slice of the
//! run state they need. They do not own state; entity state lives in
//! components and run-wide state in `SimulationState`.

pub mod cleanup;
pub mod damage;
pub mod defense_missile;
pub mod enemy_missile;
pub mod factory;
pub mod launcher;
pub mod snapshot;
pub mod spawner;
pub mod wave;
