//! Star systems and the named landmarks inside them.
//!
//! Loaded from `system` nodes:
//!
//! ```text
//! system Sol
//! 	attributes core human
//! 	link "Alpha Centauri"
//! 	object Earth
//! 		pos 1200 -300
//! 		attributes inhabited shipyard
//! ```

use std::collections::{BTreeSet, HashMap, VecDeque};

use glam::DVec2;

use crate::data_file::{DataFile, DataNode};

/// A planet, station or other named body in a system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StellarObject {
    pub name: String,
    /// Position relative to the system center.
    pub position: DVec2,
    pub attributes: BTreeSet<String>,
}

impl StellarObject {
    pub fn new(name: impl Into<String>, position: DVec2) -> Self {
        Self {
            name: name.into(),
            position,
            attributes: BTreeSet::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.insert(attribute.into());
        self
    }

    /// Unnamed objects (stars, asteroid belts) can't be used as landmarks.
    pub fn is_landmark(&self) -> bool {
        !self.name.is_empty()
    }

    fn load(node: &DataNode) -> Self {
        let mut object = Self {
            name: node.token(1).to_string(),
            ..Default::default()
        };
        for child in node {
            match child.token(0) {
                "pos" if child.size() > 2 => {
                    object.position = DVec2::new(child.value(1), child.value(2));
                }
                "attributes" => {
                    object.attributes.extend(child.tokens()[1..].iter().cloned());
                }
                _ => child.print_trace("Skipping unrecognized object attribute"),
            }
        }
        object
    }
}

/// A star system: hyperspace links plus the objects in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarSystem {
    pub name: String,
    pub links: BTreeSet<String>,
    pub attributes: BTreeSet<String>,
    pub objects: Vec<StellarObject>,
}

impl StarSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_link(mut self, other: impl Into<String>) -> Self {
        self.links.insert(other.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.insert(attribute.into());
        self
    }

    pub fn with_object(mut self, object: StellarObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Find a named object in this system.
    pub fn object(&self, name: &str) -> Option<&StellarObject> {
        self.objects.iter().find(|o| o.is_landmark() && o.name == name)
    }

    /// Named objects in this system.
    pub fn landmarks(&self) -> impl Iterator<Item = &StellarObject> {
        self.objects.iter().filter(|o| o.is_landmark())
    }

    fn load(node: &DataNode) -> Self {
        let mut system = Self::new(node.token(1));
        for child in node {
            match child.token(0) {
                "link" if child.size() > 1 => {
                    system.links.insert(child.token(1).to_string());
                }
                "attributes" => {
                    system.attributes.extend(child.tokens()[1..].iter().cloned());
                }
                "object" => system.objects.push(StellarObject::load(child)),
                _ => child.print_trace("Skipping unrecognized system attribute"),
            }
        }
        system
    }
}

/// Every known star system, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct Galaxy {
    systems: Vec<StarSystem>,
    index: HashMap<String, usize>,
}

impl Galaxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a galaxy from every `system` node in a file.
    pub fn from_file(file: &DataFile) -> Self {
        let mut galaxy = Self::new();
        galaxy.load(file);
        galaxy
    }

    /// Add the `system` nodes of a file. Other nodes are ignored.
    pub fn load(&mut self, file: &DataFile) {
        for node in file {
            if node.token(0) == "system" && node.size() > 1 {
                self.add_system(StarSystem::load(node));
            }
        }
    }

    /// Insert or replace a system. Links are made two-way.
    pub fn add_system(&mut self, system: StarSystem) {
        let links: Vec<String> = system.links.iter().cloned().collect();
        let name = system.name.clone();
        let existing = self.index.get(&name).copied();
        match existing {
            Some(i) => self.systems[i] = system,
            None => {
                self.index.insert(name.clone(), self.systems.len());
                self.systems.push(system);
            }
        }
        for other in links {
            if let Some(&j) = self.index.get(&other) {
                self.systems[j].links.insert(name.clone());
            }
        }
        // Systems added earlier may already link to this one.
        let back_links: Vec<String> = self
            .systems
            .iter()
            .filter(|s| s.links.contains(&name))
            .map(|s| s.name.clone())
            .collect();
        if let Some(&i) = self.index.get(&name) {
            self.systems[i].links.extend(back_links);
        }
    }

    pub fn system(&self, name: &str) -> Option<&StarSystem> {
        self.index.get(name).map(|&i| &self.systems[i])
    }

    pub fn systems(&self) -> &[StarSystem] {
        &self.systems
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// A named landmark in a specific system.
    pub fn landmark(&self, system: &str, name: &str) -> Option<&StellarObject> {
        self.system(system)?.object(name)
    }

    /// The system containing a landmark with this name, searched in load order.
    pub fn find_landmark(&self, name: &str) -> Option<(&StarSystem, &StellarObject)> {
        self.systems
            .iter()
            .find_map(|system| system.object(name).map(|object| (system, object)))
    }

    /// Number of hyperspace jumps between two systems, or `None` if unreachable.
    pub fn jump_distance(&self, from: &str, to: &str) -> Option<usize> {
        if self.system(from).is_none() || self.system(to).is_none() {
            return None;
        }
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back((from, 0));
        while let Some((name, jumps)) = queue.pop_front() {
            if name == to {
                return Some(jumps);
            }
            if let Some(system) = self.system(name) {
                for link in &system.links {
                    if visited.insert(link.as_str()) {
                        queue.push_back((link.as_str(), jumps + 1));
                    }
                }
            }
        }
        None
    }
}
