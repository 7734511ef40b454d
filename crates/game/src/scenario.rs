//! Scripted flight plan for the headless runner.
//!
//! ```text
//! flagship Bounder
//! 	system Sol
//! 	hardpoint "Beam Laser"
//! leg 600
//! 	pos 1000 120
//! leg 30
//! 	velocity 40 0
//! 	thrust
//! leg 60
//! 	system Vega
//! 	cloak 1
//! leg 10
//! 	parked
//! ```
//!
//! Each leg holds the flagship in one state for a number of ticks. Fields a
//! leg leaves out carry over from the previous leg, except the control flags
//! (`thrust`, `steer`, `reverse`, `fire`) which only last for their leg.

use engine_core::Flagship;
use glam::DVec2;
use mission::{DataFile, DataNode};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leg {
    pub ticks: u64,
    pub system: Option<String>,
    pub position: Option<DVec2>,
    pub velocity: Option<DVec2>,
    pub cloak: Option<f64>,
    pub thrusting: bool,
    pub steering: bool,
    pub reversing: bool,
    pub firing: bool,
    /// Player has no flagship for this leg (landed, between ships).
    pub parked: bool,
}

impl Leg {
    fn load(node: &DataNode) -> Self {
        let mut leg = Leg {
            ticks: node.value(1).max(0.0) as u64,
            ..Default::default()
        };
        for child in node {
            match child.token(0) {
                "system" => leg.system = Some(child.token(1).to_string()),
                "pos" => leg.position = Some(DVec2::new(child.value(1), child.value(2))),
                "velocity" => leg.velocity = Some(DVec2::new(child.value(1), child.value(2))),
                "cloak" => leg.cloak = Some(child.value(1).clamp(0.0, 1.0)),
                "thrust" => leg.thrusting = true,
                "steer" => leg.steering = true,
                "reverse" => leg.reversing = true,
                "fire" => leg.firing = true,
                "parked" => leg.parked = true,
                _ => child.print_trace("Skipping unrecognized leg attribute"),
            }
        }
        leg
    }

    /// Put the ship into this leg's state.
    pub fn apply(&self, ship: &mut Flagship) {
        if let Some(system) = &self.system {
            ship.system = Some(system.clone());
        }
        if let Some(position) = self.position {
            ship.position = position;
        }
        if let Some(velocity) = self.velocity {
            ship.velocity = velocity;
        }
        if let Some(cloak) = self.cloak {
            ship.cloak = cloak;
        }
        ship.thrusting = self.thrusting;
        ship.steering = self.steering;
        ship.reversing = self.reversing;
        ship.set_firing(self.firing);
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub flagship: Flagship,
    pub legs: Vec<Leg>,
}

impl Scenario {
    pub fn load(file: &DataFile) -> Self {
        let mut flagship = Flagship {
            name: "Flagship".into(),
            ..Default::default()
        };
        let mut legs = Vec::new();
        for node in file {
            match node.token(0) {
                "flagship" => flagship = load_flagship(node),
                "leg" => legs.push(Leg::load(node)),
                _ => node.print_trace("Skipping unrecognized scenario node"),
            }
        }
        Self { flagship, legs }
    }

    pub fn total_ticks(&self) -> u64 {
        self.legs.iter().map(|leg| leg.ticks).sum()
    }
}

fn load_flagship(node: &DataNode) -> Flagship {
    let mut ship = Flagship {
        name: node.token(1).to_string(),
        ..Default::default()
    };
    for child in node {
        match child.token(0) {
            "system" => ship.system = Some(child.token(1).to_string()),
            "pos" => ship.position = DVec2::new(child.value(1), child.value(2)),
            "hardpoint" => ship = ship.with_hardpoint(child.token(1)),
            _ => child.print_trace("Skipping unrecognized flagship attribute"),
        }
    }
    ship
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "\
flagship Bounder
\tsystem Sol
\thardpoint \"Beam Laser\"
leg 600
\tpos 1000 120
leg 30
\tvelocity 40 0
\tthrust
\tfire
leg 10
\tparked
";

    #[test]
    fn loads_flagship_and_legs() {
        let scenario = Scenario::load(&DataFile::parse(PLAN));
        assert_eq!(scenario.flagship.name, "Bounder");
        assert_eq!(scenario.flagship.system(), Some("Sol"));
        assert_eq!(scenario.flagship.hardpoints.len(), 1);
        assert_eq!(scenario.legs.len(), 3);
        assert_eq!(scenario.total_ticks(), 640);
        assert!(scenario.legs[2].parked);
    }

    #[test]
    fn flags_last_one_leg_but_position_carries() {
        let scenario = Scenario::load(&DataFile::parse(PLAN));
        let mut ship = scenario.flagship.clone();
        scenario.legs[0].apply(&mut ship);
        scenario.legs[1].apply(&mut ship);
        assert!(ship.thrusting && ship.is_firing());
        assert_eq!(ship.position, DVec2::new(1000.0, 120.0));

        scenario.legs[2].apply(&mut ship);
        assert!(!ship.thrusting && !ship.is_firing());
        assert_eq!(ship.velocity, DVec2::new(40.0, 0.0));
    }
}
