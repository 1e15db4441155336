//! Fixed-timestep pacing
//!
//! Physics always advances in whole unit ticks. Real elapsed time only
//! decides how many ticks a frame runs; the remainder carries over and is
//! exposed as an interpolation factor for rendering.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    /// # Panics
    /// If `step` is not positive.
    pub fn new(step: f32, max_substeps: u32) -> Self {
        assert!(step > 0.0, "timestep must be positive");
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Feed a frame's elapsed seconds; returns how many ticks to run now.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }

        if ticks == self.max_substeps && self.accumulator >= self.step {
            // Drop the backlog rather than spiral
            log::debug!(
                "Dropping {:.1} ms of simulation backlog",
                self.accumulator * 1000.0
            );
            self.accumulator %= self.step;
        }
        ticks
    }

    /// Fraction of a tick carried over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStep::new(0.25, 8);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_caps_substeps() {
        let mut clock = FixedStep::new(0.01, 4);
        assert_eq!(clock.advance(0.1), 4);
        assert!(clock.alpha() < 1.0);
    }

    #[test]
    fn test_clamps_long_frames() {
        let mut clock = FixedStep::new(0.05, 100);
        // A 5 s hitch counts as MAX_FRAME_DT
        assert_eq!(clock.advance(5.0), 2);
    }

    #[test]
    fn test_negative_frame_is_ignored() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.alpha(), 0.0);
    }
}
