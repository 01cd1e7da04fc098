//! Agent-based simulation of the repeated public goods game.
//!
//! Groups of four agents (unconditional cooperators, conditional
//! cooperators and free riders) repeatedly choose contribution levels, each
//! responding linearly to the average contribution of the other three. The
//! crate samples populations of independent groups from a type
//! distribution, runs the repeated game, and reports the proportion of
//! groups whose final total contribution reaches a success threshold.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod manager;
pub mod model;
pub mod params;
pub mod stats;
pub mod sweep;
