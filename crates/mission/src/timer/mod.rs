//! Mission timers
//!
//! A timer counts simulation ticks while a set of gates hold, then runs its
//! `on timeup` action and records `timer: <name>: complete`.
//!
//! - **Spec**: the immutable template loaded from a mission file, shared by
//!   every mission instance through an `Arc`
//! - **Instance**: the per-mission runtime state, stepped once per tick
//! - **Gates**: location, idle, uncloaked and proximity checks, evaluated in
//!   that order; the first failure decides whether the timer pauses or resets
//!
//! ```text
//! timer "listen" 600 120
//! 	system Sol
//! 	idle
//! 	proximity 2000 close
//! 		Luna
//! 	reset "leave zone"
//! 	on timeup
//! 		dialog "The relay's carrier wave cuts out."
//! ```

mod gate;
mod instance;
mod spec;

pub use gate::{FailureClass, GateResult};
pub use instance::{ResolvedCenter, TimerInstance};
pub use spec::{LocationGate, ProximityCenter, ResetCondition, TimerSpec};

/// Condition set on the player when the named timer finishes.
pub fn completion_condition(name: &str) -> String {
    format!("timer: {}: complete", name)
}
