//! Frame timestamps to simulation steps

use crate::config::Timestep;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

/// Turns host frame timestamps into a number of updates to run
#[derive(Debug, Clone)]
pub struct FrameClock {
    timestep: Timestep,
    last_ms: Option<f64>,
    /// Unconsumed time in seconds (fixed mode only)
    accumulator: f64,
}

impl FrameClock {
    pub fn new(timestep: Timestep) -> Self {
        Self {
            timestep,
            last_ms: None,
            accumulator: 0.0,
        }
    }

    /// Forget the previous frame, e.g. after a remount
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.accumulator = 0.0;
    }

    /// Updates to run for a frame stamped `time_ms`
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        let last = self.last_ms.replace(time_ms);
        let hz = match self.timestep {
            Timestep::PerFrame => return 1,
            Timestep::Fixed { hz } => hz,
        };

        let step = 1.0 / hz as f64;
        let dt = match last {
            Some(last) => ((time_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT),
            None => step,
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            self.accumulator -= step;
            substeps += 1;
        }
        // Spiral-of-death guard: drop whole steps we could not run
        if substeps == MAX_SUBSTEPS {
            self.accumulator %= step;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_frame_ignores_time() {
        let mut clock = FrameClock::new(Timestep::PerFrame);
        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(clock.advance(500.0), 1);
        assert_eq!(clock.advance(500.0), 1);
    }

    #[test]
    fn test_fixed_first_frame_runs_one_step() {
        let mut clock = FrameClock::new(Timestep::Fixed { hz: 64.0 });
        assert_eq!(clock.advance(1234.0), 1);
    }

    #[test]
    fn test_fixed_accumulates_partial_frames() {
        let mut clock = FrameClock::new(Timestep::Fixed { hz: 64.0 });
        clock.advance(0.0);
        // Half a step per frame at 128 Hz display
        assert_eq!(clock.advance(7.8125), 0);
        assert_eq!(clock.advance(15.625), 1);
        assert_eq!(clock.advance(62.5), 3);
    }

    #[test]
    fn test_fixed_caps_long_gaps() {
        let mut clock = FrameClock::new(Timestep::Fixed { hz: 120.0 });
        clock.advance(0.0);
        // A 5 s stall is clamped to 0.1 s, then capped at MAX_SUBSTEPS
        assert_eq!(clock.advance(5000.0), MAX_SUBSTEPS);
        assert!(clock.advance(5000.0) <= 1);
    }

    #[test]
    fn test_backwards_time_runs_nothing() {
        let mut clock = FrameClock::new(Timestep::Fixed { hz: 64.0 });
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), 0);
    }

    #[test]
    fn test_reset_restarts_first_frame() {
        let mut clock = FrameClock::new(Timestep::Fixed { hz: 64.0 });
        clock.advance(0.0);
        clock.advance(7.8125);
        clock.reset();
        assert_eq!(clock.advance(10_000.0), 1);
    }
}
