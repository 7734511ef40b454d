//! Location filters: predicates over systems and the landmarks in them.
//!
//! ```text
//! system
//! 	system Sol "Alpha Centauri"
//! 	attributes core
//! 	near Sol 1 3
//! 	not
//! 		planet Earth
//! ```
//!
//! Every clause present must match. An empty filter matches everything.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data_file::DataNode;
use crate::data_writer::DataWriter;
use crate::galaxy::{Galaxy, StarSystem, StellarObject};

/// Jump-range clause: the system must be `min..=max` jumps from `center`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Near {
    pub center: String,
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilter {
    systems: BTreeSet<String>,
    planets: BTreeSet<String>,
    attributes: BTreeSet<String>,
    near: Option<Near>,
    not: Vec<LocationFilter>,
}

impl LocationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the clauses nested under `node`.
    pub fn from_node(node: &DataNode) -> Self {
        let mut filter = Self::new();
        filter.load(node);
        filter
    }

    pub fn with_system(mut self, name: impl Into<String>) -> Self {
        self.systems.insert(name.into());
        self
    }

    pub fn with_planet(mut self, name: impl Into<String>) -> Self {
        self.planets.insert(name.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.insert(attribute.into());
        self
    }

    pub fn with_near(mut self, center: impl Into<String>, min: usize, max: usize) -> Self {
        self.near = Some(Near {
            center: center.into(),
            min,
            max,
        });
        self
    }

    pub fn with_not(mut self, filter: LocationFilter) -> Self {
        self.not.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
            && self.planets.is_empty()
            && self.attributes.is_empty()
            && self.near.is_none()
            && self.not.is_empty()
    }

    pub fn load(&mut self, node: &DataNode) {
        for child in node {
            let rest = || child.tokens()[1..].iter().cloned();
            match child.token(0) {
                "system" => self.systems.extend(rest()),
                "planet" => self.planets.extend(rest()),
                "attributes" => self.attributes.extend(rest()),
                "near" if child.size() > 2 => {
                    // `near <system> <max>` or `near <system> <min> <max>`
                    let (min, max) = if child.size() > 3 {
                        (child.value(2), child.value(3))
                    } else {
                        (0.0, child.value(2))
                    };
                    self.near = Some(Near {
                        center: child.token(1).to_string(),
                        min: min.max(0.0) as usize,
                        max: max.max(0.0) as usize,
                    });
                }
                "not" => self.not.push(Self::from_node(child)),
                _ => child.print_trace("Skipping unrecognized location filter clause"),
            }
        }
    }

    /// Write the clauses as children of a line the caller already wrote.
    pub fn save(&self, out: &mut DataWriter) {
        out.begin_child();
        if !self.systems.is_empty() {
            out.write(std::iter::once("system").chain(self.systems.iter().map(String::as_str)));
        }
        if !self.planets.is_empty() {
            out.write(std::iter::once("planet").chain(self.planets.iter().map(String::as_str)));
        }
        if !self.attributes.is_empty() {
            out.write(std::iter::once("attributes").chain(self.attributes.iter().map(String::as_str)));
        }
        if let Some(near) = &self.near {
            out.write(["near", &near.center, &near.min.to_string(), &near.max.to_string()]);
        }
        for not in &self.not {
            out.write(["not"]);
            not.save(out);
        }
        out.end_child();
    }

    /// Whether a system satisfies this filter. A `planet` clause matches
    /// systems that contain one of the listed landmarks.
    pub fn matches_system(&self, galaxy: &Galaxy, system: &str) -> bool {
        let Some(found) = galaxy.system(system) else {
            return false;
        };
        if !self.planets.is_empty() && !found.landmarks().any(|o| self.planets.contains(&o.name)) {
            return false;
        }
        if !self.attributes.is_subset(&found.attributes) {
            return false;
        }
        self.matches_location(galaxy, found)
            && !self.not.iter().any(|f| f.matches_system(galaxy, system))
    }

    /// Whether a landmark (and the system it is in) satisfies this filter.
    /// Attributes are checked against the landmark rather than the system.
    pub fn matches_landmark(&self, galaxy: &Galaxy, system: &StarSystem, object: &StellarObject) -> bool {
        if !object.is_landmark() {
            return false;
        }
        if !self.planets.is_empty() && !self.planets.contains(&object.name) {
            return false;
        }
        if !self.attributes.is_subset(&object.attributes) {
            return false;
        }
        self.matches_location(galaxy, system)
            && !self.not.iter().any(|f| f.matches_landmark(galaxy, system, object))
    }

    /// Every landmark in the galaxy that matches, in load order.
    pub fn matching_landmarks<'a>(&self, galaxy: &'a Galaxy) -> Vec<(&'a StarSystem, &'a StellarObject)> {
        galaxy
            .systems()
            .iter()
            .flat_map(|system| system.landmarks().map(move |object| (system, object)))
            .filter(|(system, object)| self.matches_landmark(galaxy, system, object))
            .collect()
    }

    /// Pick one matching landmark uniformly at random.
    pub fn pick_landmark<'a>(
        &self,
        galaxy: &'a Galaxy,
        rng: &mut impl Rng,
    ) -> Option<(&'a StarSystem, &'a StellarObject)> {
        self.matching_landmarks(galaxy).choose(rng).copied()
    }

    fn matches_location(&self, galaxy: &Galaxy, system: &StarSystem) -> bool {
        if !self.systems.is_empty() && !self.systems.contains(&system.name) {
            return false;
        }
        match &self.near {
            Some(near) => galaxy
                .jump_distance(&near.center, &system.name)
                .is_some_and(|jumps| jumps >= near.min && jumps <= near.max),
            None => true,
        }
    }
}
