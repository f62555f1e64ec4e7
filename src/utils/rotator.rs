// src/utils/rotator.rs
//
// Time-driven generators for the autonomous camera motion: continuous spin
// around any combination of axes, plus an optional slow "wander" drift of
// the whole scene. Both are advanced once per frame and paused while the
// pointer is dragging.

use crate::config::SpinAxes;
use rand::Rng;
use std::f64::consts::TAU;

/// Fraction of a revolution added per frame per unit of spin speed.
const SPIN_RATE: f64 = 0.0004;
/// How hard the per-axis jitter can push the spin speed around.
const ACCEL_RATE: f64 = 1e-4;
/// Wander phase advance per frame per unit of wander speed.
const WANDER_RATE: f64 = 0.05;

// Incommensurate per-axis wander frequencies so the drift never visibly
// loops.
const WANDER_FREQ: [f64; 3] = [1.0, 1.3, 1.7];

#[derive(Debug, Clone, Copy)]
struct SpinAxis {
    enabled: bool,
    frac: f64,
    speed: f64,
    base_speed: f64,
}

impl SpinAxis {
    fn new(enabled: bool, speed: f64) -> Self {
        Self {
            enabled,
            frac: 0.0,
            speed,
            base_speed: speed,
        }
    }

    fn advance(&mut self, accel: f64, rng: &mut impl Rng) {
        if !self.enabled {
            return;
        }
        self.frac = (self.frac + self.speed * SPIN_RATE).rem_euclid(1.0);
        self.speed += rng.random_range(-1.0..1.0) * accel * ACCEL_RATE;
        self.speed = self
            .speed
            .clamp(self.base_speed * 0.25, self.base_speed * 1.75);
    }
}

#[derive(Debug)]
pub struct Rotator {
    axes: [SpinAxis; 3],
    accel: f64,
    wander_speed: Option<f64>,
    wander_t: f64,
}

impl Rotator {
    pub fn new(spin: SpinAxes, spin_speed: f64, accel: f64, wander_speed: Option<f64>) -> Self {
        Self {
            axes: [
                SpinAxis::new(spin.x, spin_speed),
                SpinAxis::new(spin.y, spin_speed),
                SpinAxis::new(spin.z, spin_speed),
            ],
            accel,
            wander_speed,
            wander_t: 0.0,
        }
    }

    pub fn advance(&mut self, rng: &mut impl Rng) {
        for axis in &mut self.axes {
            axis.advance(self.accel, rng);
        }
        if let Some(speed) = self.wander_speed {
            self.wander_t += speed * WANDER_RATE;
        }
    }

    /// Current rotation around each axis as a fraction of a revolution.
    pub fn rotation(&self) -> (f64, f64, f64) {
        (self.axes[0].frac, self.axes[1].frac, self.axes[2].frac)
    }

    /// Current wander position per axis in 0..1; 0.5 is centered and is
    /// returned for all axes when wander is disabled.
    pub fn position(&self) -> (f64, f64, f64) {
        match self.wander_speed {
            None => (0.5, 0.5, 0.5),
            Some(_) => {
                let w = |i: usize| 0.5 + 0.5 * (self.wander_t * WANDER_FREQ[i] * TAU).sin();
                (w(0), w(1), w(2))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn all_axes() -> SpinAxes {
        SpinAxes {
            x: true,
            y: true,
            z: true,
        }
    }

    #[test]
    fn test_disabled_axes_stay_put() {
        let spin = SpinAxes {
            x: true,
            y: false,
            z: false,
        };
        let mut rot = Rotator::new(spin, 0.5, 0.3, None);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            rot.advance(&mut rng);
        }
        let (x, y, z) = rot.rotation();
        assert!(x > 0.0);
        assert_eq!(y, 0.0);
        assert_eq!(z, 0.0);
    }

    #[test]
    fn test_rotation_stays_in_unit_range() {
        let mut rot = Rotator::new(all_axes(), 0.5, 0.3, Some(0.01));
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..20_000 {
            rot.advance(&mut rng);
            let (x, y, z) = rot.rotation();
            for v in [x, y, z] {
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_wander_centered_when_disabled() {
        let mut rot = Rotator::new(all_axes(), 0.5, 0.3, None);
        let mut rng = SmallRng::seed_from_u64(3);
        rot.advance(&mut rng);
        assert_eq!(rot.position(), (0.5, 0.5, 0.5));
    }

    #[test]
    fn test_wander_moves_within_unit_cube() {
        let mut rot = Rotator::new(all_axes(), 0.5, 0.3, Some(0.01));
        let mut rng = SmallRng::seed_from_u64(4);
        let mut moved = false;
        for _ in 0..5_000 {
            rot.advance(&mut rng);
            let (x, y, z) = rot.position();
            for v in [x, y, z] {
                assert!((0.0..=1.0).contains(&v));
            }
            if (x - 0.5).abs() > 0.05 {
                moved = true;
            }
        }
        assert!(moved);
    }
}
