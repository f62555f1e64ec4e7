// src/utils/trackball.rs
//
// Virtual trackball: pointer drags roll the scene as if dragging a ball
// centered in the viewport (Shoemake's formulation, quaternion-based).
// Points inside the ball radius map onto a sphere, points outside onto a
// hyperbolic sheet so the rotation stays continuous at the edge.

use nalgebra::{Matrix4, Unit, UnitQuaternion, Vector3};

const BALL_SIZE: f64 = 0.8;
/// Degrees applied per wheel detent.
const WHEEL_STEP_DEG: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct Trackball {
    q: UnitQuaternion<f64>,
    last: Option<(f64, f64)>,
}

impl Default for Trackball {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(x: f64, y: f64, w: f64, h: f64) -> (f64, f64) {
    ((2.0 * x - w) / w, (h - 2.0 * y) / h)
}

fn to_sphere(x: f64, y: f64) -> Vector3<f64> {
    let d = (x * x + y * y).sqrt();
    let z = if d < BALL_SIZE * std::f64::consts::FRAC_1_SQRT_2 {
        (BALL_SIZE * BALL_SIZE - d * d).sqrt()
    } else {
        // Outside the ball: hyperbola
        (BALL_SIZE * BALL_SIZE / 2.0) / d
    };
    Vector3::new(x, y, z)
}

impl Trackball {
    pub fn new() -> Self {
        Self {
            q: UnitQuaternion::identity(),
            last: None,
        }
    }

    pub fn start(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.last = Some(normalize(x, y, w, h));
    }

    pub fn track(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let Some((lx, ly)) = self.last else {
            return;
        };
        let (nx, ny) = normalize(x, y, w, h);
        if (nx - lx).abs() < f64::EPSILON && (ny - ly).abs() < f64::EPSILON {
            return;
        }

        let v1 = to_sphere(lx, ly);
        let v2 = to_sphere(nx, ny);
        let axis = v2.cross(&v1);
        let t = ((v1 - v2).norm() / (2.0 * BALL_SIZE)).clamp(-1.0, 1.0);
        let phi = 2.0 * t.asin();

        if let Some(axis) = Unit::try_new(axis, 1e-12) {
            self.q = UnitQuaternion::from_axis_angle(&axis, -phi) * self.q;
        }
        self.last = Some((nx, ny));
    }

    pub fn end(&mut self) {
        self.last = None;
    }

    /// Wheel zoom: a fixed-size roll around the horizontal axis, one step
    /// per detent.
    pub fn wheel(&mut self, up: bool) {
        let sign = if up { 1.0 } else { -1.0 };
        let step = UnitQuaternion::from_axis_angle(
            &Vector3::x_axis(),
            sign * WHEEL_STEP_DEG.to_radians(),
        );
        self.q = step * self.q;
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        self.q.to_homogeneous()
    }
}
