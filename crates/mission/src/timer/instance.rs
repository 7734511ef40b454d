//! Runtime timer state, one per accepted mission.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::action::{Action, InstantiateContext, MissionAction};
use crate::data_file::DataNode;
use crate::data_writer::{format_number, DataWriter};
use crate::galaxy::Galaxy;
use crate::location_filter::LocationFilter;
use crate::player::{Interface, PlayerState};

use super::completion_condition;
use super::gate::{self, FailureClass, GateResult};
use super::spec::{LocationGate, ProximityCenter, ResetCondition, TimerSpec};

/// Proximity center after instantiation. Never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCenter {
    Origin,
    Landmark(String),
}

/// A live timer.
///
/// Created by [`TimerSpec::instantiate`] or restored with
/// [`TimerInstance::load`], then advanced with [`TimerInstance::step`] once per
/// simulation tick until it completes.
#[derive(Debug, Clone)]
pub struct TimerInstance<A = MissionAction> {
    spec: Arc<TimerSpec<A>>,
    on_timeup: Option<A>,
    on_reset: Option<A>,
    center: ResolvedCenter,
    time_to_wait: u64,
    time_elapsed: u64,
    is_active: bool,
    is_complete: bool,
    reset_fired: bool,
    /// Re-rolls the duration on reset.
    rng: StdRng,
}

impl<A: Action> TimerSpec<A> {
    /// Create a live timer from this template.
    ///
    /// Rolls the wait time, fills in the action text for this mission and picks
    /// the proximity center. The template itself is left untouched, so one spec
    /// can back any number of missions.
    pub fn instantiate(
        self: &Arc<Self>,
        context: &InstantiateContext<'_>,
        galaxy: &Galaxy,
        rng: &mut impl Rng,
    ) -> TimerInstance<A> {
        let mut timer_rng = StdRng::seed_from_u64(rng.gen());
        let time_to_wait = roll_duration(self, &mut timer_rng);
        let center = resolve_center(&self.name, &self.proximity_center, galaxy, rng);
        log::debug!(
            "Instantiated timer \"{}\": {} ticks, center {:?}",
            self.name,
            time_to_wait,
            center
        );
        TimerInstance {
            spec: Arc::clone(self),
            on_timeup: self.on_timeup.as_ref().map(|a| a.instantiate(context)),
            on_reset: self.on_reset.as_ref().map(|a| a.instantiate(context)),
            center,
            time_to_wait,
            time_elapsed: 0,
            is_active: false,
            is_complete: false,
            reset_fired: false,
            rng: timer_rng,
        }
    }
}

impl<A: Action> TimerInstance<A> {
    /// Restore a timer written by [`TimerInstance::save`].
    ///
    /// The header's number is the time that was remaining; the `duration`
    /// child, when present, is the distribution later resets roll from.
    pub fn load(node: &DataNode, galaxy: &Galaxy, rng: &mut impl Rng) -> Self {
        let spec = Arc::new(TimerSpec::<A>::load(node));
        let reset_fired = node
            .iter()
            .any(|c| c.token(0) == "reset fired" || (c.token(0) == "reset" && c.token(1) == "fired"));
        let center = resolve_center(&spec.name, &spec.proximity_center, galaxy, rng);
        Self {
            on_timeup: spec.on_timeup.clone(),
            on_reset: spec.on_reset.clone(),
            spec,
            center,
            time_to_wait: remaining_ticks(node),
            time_elapsed: 0,
            is_active: false,
            is_complete: false,
            reset_fired,
            rng: StdRng::seed_from_u64(rng.gen()),
        }
    }

    /// Advance the timer by one tick.
    ///
    /// Gates are checked in order and the first failure decides between a
    /// pause and a reset. With every gate passing the count goes up by one;
    /// reaching the wait time runs `on timeup`, sets the completion condition
    /// and ends the timer for good.
    pub fn step(&mut self, player: &mut dyn PlayerState, ui: &mut dyn Interface, galaxy: &Galaxy) {
        if self.is_complete {
            return;
        }
        let result = match player.flagship() {
            Some(ship) => gate::evaluate(&self.spec, &self.center, ship, galaxy),
            None => {
                self.is_active = false;
                return;
            }
        };
        if let GateResult::Fail(class) = result {
            self.reset_on(class, player, ui);
            self.is_active = false;
            return;
        }

        self.is_active = true;
        self.time_elapsed += 1;
        if self.time_elapsed >= self.time_to_wait {
            if let Some(action) = &self.on_timeup {
                action.execute(player, ui);
            }
            player
                .conditions_mut()
                .set(completion_condition(&self.spec.name), 1);
            self.is_complete = true;
            log::info!(
                "Timer \"{}\" complete after {} ticks",
                self.spec.name,
                self.time_elapsed
            );
        }
    }

    /// Handle a gate failure. Returns whether the timer was reset.
    ///
    /// Only a timer that was running can reset; one that was already stopped
    /// just stays stopped.
    fn reset_on(&mut self, failure: FailureClass, player: &mut dyn PlayerState, ui: &mut dyn Interface) -> bool {
        if !self.is_active || !self.spec.reset_condition.resets_on(failure) {
            if self.is_active {
                log::debug!("Timer \"{}\" paused ({:?})", self.spec.name, failure);
            }
            return false;
        }

        self.time_elapsed = 0;
        self.time_to_wait = roll_duration(&self.spec, &mut self.rng);
        log::debug!(
            "Timer \"{}\" reset ({:?}), now waiting {} ticks",
            self.spec.name,
            failure,
            self.time_to_wait
        );

        if self.spec.repeat_reset || !self.reset_fired {
            if let Some(action) = &self.on_reset {
                action.execute(player, ui);
            }
            self.reset_fired = true;
        }
        true
    }

    /// Write this timer so [`TimerInstance::load`] can resume it.
    /// Completed timers are not written at all.
    pub fn save(&self, out: &mut DataWriter) {
        if self.is_complete {
            return;
        }
        let spec = &self.spec;
        out.write(["timer", spec.name.as_str(), &self.remaining().to_string()]);
        out.begin_child();
        out.write([
            "duration",
            &spec.base_duration.to_string(),
            &spec.random_spread.to_string(),
        ]);
        match &spec.location {
            LocationGate::Anywhere => {}
            LocationGate::System(name) => out.write(["system", name.as_str()]),
            LocationGate::Filter(filter) => {
                out.write(["system"]);
                filter.save(out);
            }
        }
        if spec.require_idle {
            match spec.idle_max_speed {
                Some(max) => out.write(["idle", &format_number(max)]),
                None => out.write(["idle"]),
            }
        }
        if spec.require_uncloaked {
            out.write(["uncloaked"]);
        }
        if spec.optional {
            out.write(["optional"]);
        }
        if spec.repeat_reset {
            out.write(["repeat reset"]);
        }
        if self.reset_fired {
            out.write(["reset fired"]);
        }
        if spec.reset_condition != ResetCondition::Pause {
            out.write(["reset", spec.reset_condition.as_str()]);
        }
        if spec.proximity > 0.0 {
            let mode = if spec.close_to { "close" } else { "far" };
            out.write(["proximity", &format_number(spec.proximity), mode]);
            if let ResolvedCenter::Landmark(name) = &self.center {
                out.begin_child();
                out.write([name.as_str()]);
                out.end_child();
            }
        }
        if let Some(action) = &self.on_timeup {
            action.save(out);
        }
        if let Some(action) = &self.on_reset {
            action.save(out);
        }
        out.end_child();
    }

    pub fn spec(&self) -> &Arc<TimerSpec<A>> {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn time_to_wait(&self) -> u64 {
        self.time_to_wait
    }

    pub fn time_elapsed(&self) -> u64 {
        self.time_elapsed
    }

    /// Ticks still needed, as written to saves.
    pub fn remaining(&self) -> u64 {
        self.time_to_wait.saturating_sub(self.time_elapsed)
    }

    /// Whether every gate passed on the last step.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn reset_fired(&self) -> bool {
        self.reset_fired
    }

    pub fn is_optional(&self) -> bool {
        self.spec.optional
    }

    pub fn center(&self) -> &ResolvedCenter {
        &self.center
    }
}

/// Saved remaining time. Read as an integer first so large values stay exact.
fn remaining_ticks(node: &DataNode) -> u64 {
    node.token(2)
        .parse::<u64>()
        .unwrap_or_else(|_| node.value(2).max(0.0) as u64)
}

fn roll_duration<A>(spec: &TimerSpec<A>, rng: &mut impl Rng) -> u64 {
    let extra = if spec.random_spread > 0 {
        rng.gen_range(0..=spec.random_spread)
    } else {
        0
    };
    spec.base_duration.saturating_add(extra)
}

fn resolve_center(
    timer: &str,
    center: &ProximityCenter,
    galaxy: &Galaxy,
    rng: &mut impl Rng,
) -> ResolvedCenter {
    match center {
        ProximityCenter::SystemOrigin => ResolvedCenter::Origin,
        ProximityCenter::Landmark(name) => {
            if galaxy.find_landmark(name).is_none() {
                log::warn!("Timer \"{}\": unknown proximity landmark \"{}\"", timer, name);
            }
            ResolvedCenter::Landmark(name.clone())
        }
        ProximityCenter::Filter(filter) => pick_center(timer, filter, galaxy, rng),
    }
}

fn pick_center(timer: &str, filter: &LocationFilter, galaxy: &Galaxy, rng: &mut impl Rng) -> ResolvedCenter {
    if filter.is_empty() {
        return ResolvedCenter::Origin;
    }
    match filter.pick_landmark(galaxy, rng) {
        Some((_, object)) => ResolvedCenter::Landmark(object.name.clone()),
        None => {
            log::warn!(
                "Timer \"{}\": no landmark matches the proximity filter, using the system center",
                timer
            );
            ResolvedCenter::Origin
        }
    }
}
