//! Gate checks. Each gate either passes or names the class of its failure.

use engine_core::Flagship;
use glam::DVec2;

use crate::galaxy::Galaxy;

use super::instance::ResolvedCenter;
use super::spec::{LocationGate, TimerSpec};

/// Scope of a failed gate, narrowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureClass {
    /// Idle or cloak requirement broken; the ship is still in place.
    Pause,
    /// Outside the proximity zone.
    LeaveZone,
    /// Not in the required system.
    LeaveSystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateResult {
    Pass,
    Fail(FailureClass),
}

impl GateResult {
    fn check(holds: bool, class: FailureClass) -> Self {
        if holds {
            Self::Pass
        } else {
            Self::Fail(class)
        }
    }

    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }

    /// Run the next gate only if this one passed.
    pub fn and_then(self, next: impl FnOnce() -> GateResult) -> GateResult {
        match self {
            Self::Pass => next(),
            fail => fail,
        }
    }
}

/// Run every gate in order: location, idle, uncloaked, proximity.
/// Stops at the first failure.
pub(super) fn evaluate<A>(
    spec: &TimerSpec<A>,
    center: &ResolvedCenter,
    ship: &Flagship,
    galaxy: &Galaxy,
) -> GateResult {
    location(&spec.location, ship, galaxy)
        .and_then(|| idle(spec.require_idle, spec.idle_max_speed, ship))
        .and_then(|| uncloaked(spec.require_uncloaked, ship))
        .and_then(|| proximity(spec.proximity, spec.close_to, center, ship, galaxy))
}

pub(super) fn location(gate: &LocationGate, ship: &Flagship, galaxy: &Galaxy) -> GateResult {
    let holds = match gate {
        LocationGate::Anywhere => true,
        LocationGate::System(name) => ship.is_in_system(name),
        LocationGate::Filter(filter) => ship
            .system()
            .is_some_and(|system| filter.matches_system(galaxy, system)),
    };
    GateResult::check(holds, FailureClass::LeaveSystem)
}

pub(super) fn idle(required: bool, max_speed: Option<f64>, ship: &Flagship) -> GateResult {
    if !required {
        return GateResult::Pass;
    }
    let slow_enough = max_speed.map_or(true, |max| ship.speed() <= max);
    GateResult::check(
        !ship.is_maneuvering() && !ship.is_firing() && slow_enough,
        FailureClass::Pause,
    )
}

pub(super) fn uncloaked(required: bool, ship: &Flagship) -> GateResult {
    GateResult::check(!required || !ship.is_cloaked(), FailureClass::Pause)
}

pub(super) fn proximity(
    radius: f64,
    close_to: bool,
    center: &ResolvedCenter,
    ship: &Flagship,
    galaxy: &Galaxy,
) -> GateResult {
    if radius <= 0.0 {
        return GateResult::Pass;
    }
    let position = match center {
        ResolvedCenter::Origin => Some(DVec2::ZERO),
        // The landmark only counts while the ship shares its system.
        ResolvedCenter::Landmark(name) => ship
            .system()
            .and_then(|system| galaxy.landmark(system, name))
            .map(|object| object.position),
    };
    let holds = position.is_some_and(|point| {
        let distance = ship.distance_to(point);
        (close_to && distance <= radius) || (!close_to && distance >= radius)
    });
    GateResult::check(holds, FailureClass::LeaveZone)
}
