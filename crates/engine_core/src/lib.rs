//! Core engine types shared by the simulation and mission layers.
//!
//! This crate provides the foundational types used across the workspace:
//! - Flagship and hardpoint state read by mission logic
//! - Fixed-rate simulation clock

pub mod components;
pub mod time;

pub use components::*;
pub use time::*;

// Re-export commonly used types
pub use glam::DVec2;
