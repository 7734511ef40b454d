//! Timer templates as loaded from mission data.

use std::sync::Arc;

use crate::action::{Action, MissionAction};
use crate::data_file::DataNode;
use crate::location_filter::LocationFilter;

use super::gate::FailureClass;

/// How wide a gate failure has to be before the timer starts over.
///
/// Ordered from narrowest to widest: a timer that resets on leaving the
/// system also resets on anything narrower (pausing, leaving the zone).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResetCondition {
    /// Never reset; failures only pause the count.
    None,
    #[default]
    Pause,
    LeaveZone,
    LeaveSystem,
}

impl ResetCondition {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "none" => Some(Self::None),
            "pause" => Some(Self::Pause),
            "leave zone" => Some(Self::LeaveZone),
            "leave system" => Some(Self::LeaveSystem),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pause => "pause",
            Self::LeaveZone => "leave zone",
            Self::LeaveSystem => "leave system",
        }
    }

    /// Whether a gate failure of this class starts the timer over.
    pub fn resets_on(self, failure: FailureClass) -> bool {
        let widest = match self {
            Self::None => return false,
            Self::Pause => FailureClass::Pause,
            Self::LeaveZone => FailureClass::LeaveZone,
            Self::LeaveSystem => FailureClass::LeaveSystem,
        };
        failure <= widest
    }
}

/// Where the flagship has to be for the timer to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LocationGate {
    #[default]
    Anywhere,
    System(String),
    Filter(LocationFilter),
}

/// What the proximity radius is measured from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProximityCenter {
    /// The center of whatever system the flagship is in.
    #[default]
    SystemOrigin,
    Landmark(String),
    /// Chooses one landmark when the timer is instantiated.
    Filter(LocationFilter),
}

/// Immutable timer definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSpec<A = MissionAction> {
    pub name: String,
    /// Ticks to wait before any random extra.
    pub base_duration: u64,
    /// Upper bound of the random extra, inclusive.
    pub random_spread: u64,
    pub location: LocationGate,
    pub require_idle: bool,
    /// When set, the flagship must also be at or below this speed to be idle.
    pub idle_max_speed: Option<f64>,
    pub require_uncloaked: bool,
    /// Proximity radius; zero disables the proximity gate.
    pub proximity: f64,
    /// `true`: be within the radius. `false`: stay beyond it.
    pub close_to: bool,
    pub proximity_center: ProximityCenter,
    pub reset_condition: ResetCondition,
    /// Run `on reset` every time instead of only the first time.
    pub repeat_reset: bool,
    /// The owning mission can finish without this timer.
    pub optional: bool,
    pub on_timeup: Option<A>,
    pub on_reset: Option<A>,
}

impl<A> Default for TimerSpec<A> {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_duration: 0,
            random_spread: 0,
            location: LocationGate::Anywhere,
            require_idle: false,
            idle_max_speed: None,
            require_uncloaked: false,
            proximity: 0.0,
            close_to: true,
            proximity_center: ProximityCenter::SystemOrigin,
            reset_condition: ResetCondition::default(),
            repeat_reset: false,
            optional: false,
            on_timeup: None,
            on_reset: None,
        }
    }
}

impl<A: Action> TimerSpec<A> {
    pub fn new(name: impl Into<String>, base_duration: u64, random_spread: u64) -> Self {
        Self {
            name: name.into(),
            base_duration,
            random_spread,
            ..Default::default()
        }
    }

    /// Parse `timer <name> [<base>] [<rand>]` and its children.
    ///
    /// Missing numbers read as zero and unknown children are skipped. The
    /// random part of the duration is left unresolved until instantiation.
    pub fn load(node: &DataNode) -> Self {
        let mut spec = Self::new(
            node.token(1),
            ticks(node.value(2)),
            ticks(node.value(3)),
        );

        for child in node {
            // Two-word keys may be written as one quoted token or two bare ones.
            match child.token(0) {
                "idle" => {
                    spec.require_idle = true;
                    if child.is_number(1) {
                        spec.idle_max_speed = Some(child.value(1).max(0.0));
                    }
                }
                "uncloaked" => spec.require_uncloaked = true,
                "optional" => spec.optional = true,
                "duration" => {
                    spec.base_duration = ticks(child.value(1));
                    spec.random_spread = ticks(child.value(2));
                }
                "system" if child.size() > 1 => {
                    spec.location = LocationGate::System(child.token(1).to_string());
                }
                "system" if child.has_children() => {
                    let filter = LocationFilter::from_node(child);
                    if !filter.is_empty() {
                        spec.location = LocationGate::Filter(filter);
                    }
                }
                "proximity" => spec.load_proximity(child),
                "on" if child.token(1) == "timeup" => spec.on_timeup = Some(A::load(child)),
                "on" if child.token(1) == "reset" => spec.on_reset = Some(A::load(child)),
                "repeat reset" => spec.repeat_reset = true,
                "repeat" if child.token(1) == "reset" => spec.repeat_reset = true,
                // Runtime state of a saved instance, not part of the template.
                "reset fired" => {}
                "reset" if child.token(1) == "fired" => {}
                "reset" => {
                    let rest = child.tokens()[1..].join(" ");
                    match ResetCondition::parse(&rest) {
                        Some(condition) => spec.reset_condition = condition,
                        None => child.print_trace("Unknown reset condition"),
                    }
                }
                _ => log::debug!("Ignoring timer attribute on line {}: {}", child.line(), child),
            }
        }
        spec
    }

    fn load_proximity(&mut self, node: &DataNode) {
        self.proximity = node.value(1).max(0.0);
        match node.token(2) {
            "close" => self.close_to = true,
            "far" => self.close_to = false,
            "" => {}
            other => node.print_trace(&format!("Unknown proximity mode \"{}\"", other)),
        }
        if let Some(first) = node.children().first() {
            self.proximity_center = if first.token(0) == "center" && first.has_children() {
                ProximityCenter::Filter(LocationFilter::from_node(first))
            } else {
                ProximityCenter::Landmark(first.token(0).to_string())
            };
        }
    }

    /// Wrap for sharing between instances.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Durations in data files are numbers; negative or fractional values clamp.
fn ticks(value: f64) -> u64 {
    value.max(0.0) as u64
}
