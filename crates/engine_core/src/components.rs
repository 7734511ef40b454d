//! Ship state components read by mission logic each tick.

use glam::DVec2;

/// A weapon mount on a ship.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hardpoint {
    pub outfit: String,
    /// Set when the weapon fired during the last simulated tick.
    pub was_firing: bool,
}

impl Hardpoint {
    pub fn new(outfit: impl Into<String>) -> Self {
        Self {
            outfit: outfit.into(),
            was_firing: false,
        }
    }
}

/// The ship the player is currently flying.
///
/// Positions are in system coordinates, with the system center at the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flagship {
    pub name: String,
    /// Name of the system the ship is in. `None` while in hyperspace.
    pub system: Option<String>,
    pub position: DVec2,
    pub velocity: DVec2,
    pub thrusting: bool,
    pub steering: bool,
    pub reversing: bool,
    /// Cloak level in `0.0..=1.0`. Any non-zero value counts as cloaked.
    pub cloak: f64,
    pub hardpoints: Vec<Hardpoint>,
}

impl Flagship {
    pub fn new(name: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system: Some(system.into()),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_hardpoint(mut self, outfit: impl Into<String>) -> Self {
        self.hardpoints.push(Hardpoint::new(outfit));
        self
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn is_in_system(&self, name: &str) -> bool {
        self.system() == Some(name)
    }

    /// True while any engine input is applied.
    pub fn is_maneuvering(&self) -> bool {
        self.thrusting || self.steering || self.reversing
    }

    pub fn is_firing(&self) -> bool {
        self.hardpoints.iter().any(|h| h.was_firing)
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn is_cloaked(&self) -> bool {
        self.cloak != 0.0
    }

    /// Distance from the ship to a point in the same system.
    pub fn distance_to(&self, point: DVec2) -> f64 {
        (self.position - point).length()
    }

    /// Mark every weapon as firing or not.
    pub fn set_firing(&mut self, firing: bool) {
        for hardpoint in &mut self.hardpoints {
            hardpoint.was_firing = firing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flagship_maneuvering_flags() {
        let mut ship = Flagship::new("Bounder", "Sol");
        assert!(!ship.is_maneuvering());
        ship.steering = true;
        assert!(ship.is_maneuvering());
    }

    #[test]
    fn flagship_firing_any_hardpoint() {
        let mut ship = Flagship::new("Bounder", "Sol")
            .with_hardpoint("Laser")
            .with_hardpoint("Laser");
        assert!(!ship.is_firing());
        ship.hardpoints[1].was_firing = true;
        assert!(ship.is_firing());
        ship.set_firing(false);
        assert!(!ship.is_firing());
    }

    #[test]
    fn flagship_distance_and_cloak() {
        let mut ship = Flagship::new("Bounder", "Sol").with_position(DVec2::new(3.0, 4.0));
        assert!((ship.distance_to(DVec2::ZERO) - 5.0).abs() < 1e-9);
        assert!(!ship.is_cloaked());
        ship.cloak = 0.01;
        assert!(ship.is_cloaked());
    }
}
