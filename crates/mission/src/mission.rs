//! Missions as far as timers are concerned: a named bundle of timers.
//!
//! ```text
//! mission "Relay Watch"
//! 	timer listen 600 120
//! 		system Sol
//! 		idle
//! 	timer "stay dark" 300
//! 		uncloaked
//! 		optional
//! ```

use std::sync::Arc;

use rand::Rng;

use crate::action::{Action, InstantiateContext, MissionAction};
use crate::data_file::{DataFile, DataNode};
use crate::data_writer::DataWriter;
use crate::galaxy::Galaxy;
use crate::player::{Interface, PlayerState};
use crate::timer::{TimerInstance, TimerSpec};

/// A mission as defined in the data files.
#[derive(Debug, Clone)]
pub struct MissionTemplate<A = MissionAction> {
    pub name: String,
    pub timers: Vec<Arc<TimerSpec<A>>>,
}

impl<A: Action> MissionTemplate<A> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timers: Vec::new(),
        }
    }

    pub fn with_timer(mut self, timer: TimerSpec<A>) -> Self {
        self.timers.push(timer.into_shared());
        self
    }

    /// Read a `mission <name>` node. Only the timers are kept.
    pub fn load(node: &DataNode) -> Self {
        let mut mission = Self::new(node.token(1));
        for child in node {
            if child.token(0) == "timer" {
                mission.timers.push(TimerSpec::load(child).into_shared());
            }
        }
        mission
    }

    /// Every `mission` node in a file.
    pub fn load_all(file: &DataFile) -> Vec<Self> {
        file.iter()
            .filter(|node| node.token(0) == "mission")
            .map(Self::load)
            .collect()
    }

    /// Accept the mission: every timer gets its own instance.
    pub fn instantiate(
        &self,
        context: &InstantiateContext<'_>,
        galaxy: &Galaxy,
        rng: &mut impl Rng,
    ) -> Mission<A> {
        log::info!("Accepted mission \"{}\" with {} timers", self.name, self.timers.len());
        Mission {
            name: self.name.clone(),
            timers: self
                .timers
                .iter()
                .map(|spec| spec.instantiate(context, galaxy, rng))
                .collect(),
        }
    }
}

/// An accepted mission.
#[derive(Debug, Clone)]
pub struct Mission<A = MissionAction> {
    name: String,
    timers: Vec<TimerInstance<A>>,
}

impl<A: Action> Mission<A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timers(&self) -> &[TimerInstance<A>] {
        &self.timers
    }

    pub fn timer(&self, name: &str) -> Option<&TimerInstance<A>> {
        self.timers.iter().find(|timer| timer.name() == name)
    }

    /// Step every timer once.
    pub fn step(&mut self, player: &mut dyn PlayerState, ui: &mut dyn Interface, galaxy: &Galaxy) {
        for timer in &mut self.timers {
            timer.step(player, ui, galaxy);
        }
    }

    /// True once every timer not marked `optional` has completed.
    pub fn timers_satisfied(&self) -> bool {
        self.timers
            .iter()
            .all(|timer| timer.is_optional() || timer.is_complete())
    }

    pub fn save(&self, out: &mut DataWriter) {
        out.write(["mission", self.name.as_str()]);
        out.begin_child();
        for timer in &self.timers {
            timer.save(out);
        }
        out.end_child();
    }

    /// Restore a saved mission.
    ///
    /// Completed timers are not saved, so a loaded mission only holds the ones
    /// still running.
    pub fn load(node: &DataNode, galaxy: &Galaxy, rng: &mut impl Rng) -> Self {
        Self {
            name: node.token(1).to_string(),
            timers: node
                .iter()
                .filter(|child| child.token(0) == "timer")
                .map(|child| TimerInstance::load(child, galaxy, rng))
                .collect(),
        }
    }
}
