//! Fixed-rate simulation clock for the game loop.

use std::time::Duration;

/// Counts simulation ticks at a fixed rate.
///
/// Mission logic measures time in ticks; the clock converts ticks to game
/// time for log output.
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Ticks simulated since start.
    tick: u64,
    /// Fixed timestep (default 60 Hz).
    fixed_timestep: Duration,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    /// Create a clock running at 60 ticks per second.
    pub fn new() -> Self {
        Self {
            tick: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
        }
    }

    /// Create a clock running at `hz` ticks per second.
    pub fn with_rate(hz: f64) -> Self {
        let mut clock = Self::new();
        clock.set_fixed_rate(hz);
        clock
    }

    /// Set the fixed tick rate in Hz. Rates whose timestep is not a
    /// positive, representable duration are ignored with a warning.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        match Duration::try_from_secs_f64(1.0 / hz) {
            Ok(step) if hz.is_finite() && hz > 0.0 && !step.is_zero() => self.fixed_timestep = step,
            _ => log::warn!("Ignoring tick rate {} Hz", hz),
        }
    }

    /// Record that one tick has been simulated.
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Ticks simulated since start.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.ticks_to_seconds(self.tick)
    }

    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * self.fixed_timestep.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_elapsed_follows_ticks() {
        let mut clock = SimClock::with_rate(4.0);
        for _ in 0..6 {
            clock.advance();
        }
        assert_eq!(clock.tick(), 6);
        assert!((clock.elapsed_seconds() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn clock_ignores_bad_rates() {
        for hz in [0.0, -5.0, 1e-30, f64::INFINITY, f64::NAN, 1e300] {
            let clock = SimClock::with_rate(hz);
            assert!((clock.ticks_to_seconds(60) - 1.0).abs() < 1e-6, "rate {}", hz);
        }
    }

    #[test]
    fn clock_accepts_custom_rate() {
        let clock = SimClock::with_rate(30.0);
        assert!((clock.ticks_to_seconds(90) - 3.0).abs() < 1e-6);
    }
}
