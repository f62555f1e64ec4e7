// src/rendering/projection.rs
//
// Viewport and perspective camera. The camera is fixed: eye on the +Z axis
// looking at the origin; only the projection aspect changes with the
// viewport.

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

pub const FOV_Y_DEG: f64 = 30.0;
pub const NEAR: f64 = 20.0;
pub const FAR: f64 = 100.0;
pub const EYE_Z: f64 = 30.0;

/// A view-space point mapped to the raster.
#[derive(Debug, Clone, Copy)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    /// View-space z, used for depth ordering (more negative is farther).
    pub depth: f64,
    /// Pixels per world unit at this depth, for sizing impostors.
    pub px_per_unit: f64,
}

#[derive(Debug)]
pub struct Projection {
    pub width: f64,
    pub height: f64,
    persp: Perspective3<f64>,
    view: Matrix4<f64>,
}

impl Projection {
    pub fn new(width: f64, height: f64) -> Self {
        let mut p = Self {
            width: 0.0,
            height: 0.0,
            persp: Perspective3::new(1.0, FOV_Y_DEG.to_radians(), NEAR, FAR),
            view: Matrix4::look_at_rh(
                &Point3::new(0.0, 0.0, EYE_Z),
                &Point3::origin(),
                &Vector3::y_axis(),
            ),
        };
        p.reshape(width, height);
        p
    }

    pub fn reshape(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        let aspect = self.width / self.height;
        self.persp = Perspective3::new(aspect, FOV_Y_DEG.to_radians(), NEAR, FAR);
    }

    pub fn view(&self) -> &Matrix4<f64> {
        &self.view
    }

    /// Projects a view-space point to pixels. Points at or behind the eye
    /// plane are dropped.
    pub fn to_screen(&self, p: &Point3<f64>) -> Option<ScreenPoint> {
        if p.z >= -1e-6 {
            return None;
        }
        let ndc = self.persp.project_point(p);
        let m22 = self.persp.as_matrix()[(1, 1)];
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * self.width,
            y: (1.0 - ndc.y) * 0.5 * self.height,
            depth: p.z,
            px_per_unit: m22 * (self.height * 0.5) / -p.z,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_in_view_space_maps_to_center() {
        let proj = Projection::new(800.0, 600.0);
        // World origin sits at view-space z = -EYE_Z.
        let s = proj.to_screen(&Point3::new(0.0, 0.0, -EYE_Z)).unwrap();
        assert!((s.x - 400.0).abs() < 1e-6);
        assert!((s.y - 300.0).abs() < 1e-6);
        assert!((s.depth + EYE_Z).abs() < 1e-9);
        assert!(s.px_per_unit > 0.0);
    }

    #[test]
    fn test_axes_orientation() {
        let proj = Projection::new(800.0, 600.0);
        let right = proj.to_screen(&Point3::new(1.0, 0.0, -EYE_Z)).unwrap();
        let up = proj.to_screen(&Point3::new(0.0, 1.0, -EYE_Z)).unwrap();
        assert!(right.x > 400.0);
        assert!(up.y < 300.0);
    }

    #[test]
    fn test_view_matrix_places_world_origin() {
        let proj = Projection::new(640.0, 480.0);
        let v = proj.view().transform_point(&Point3::origin());
        assert!((v.z + EYE_Z).abs() < 1e-9);
    }

    #[test]
    fn test_points_behind_eye_are_culled() {
        let proj = Projection::new(800.0, 600.0);
        assert!(proj.to_screen(&Point3::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_nearer_points_project_larger() {
        let proj = Projection::new(800.0, 600.0);
        let near = proj.to_screen(&Point3::new(0.0, 0.0, -25.0)).unwrap();
        let far = proj.to_screen(&Point3::new(0.0, 0.0, -60.0)).unwrap();
        assert!(near.px_per_unit > far.px_per_unit);
    }
}
