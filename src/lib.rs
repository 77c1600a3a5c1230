//! Nh113: The Bismuth Strike.
//!
//! The simulation (`entities`, `compute`) is headless: it draws through the
//! [`ports::Canvas`] trait and reports side effects as
//! [`entities::GameEvent`]s. The terminal front end lives in the binary.

pub mod autopilot;
pub mod compute;
pub mod config;
pub mod constants;
pub mod entities;
pub mod input;
pub mod leaderboard;
pub mod ports;
pub mod ranking;
pub mod scene;
