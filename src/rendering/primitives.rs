// src/rendering/primitives.rs
//
// Screen-space impostors for the painter's algorithm: spheres are shaded
// circles with a radial gradient, bond tubes are gradient-filled quads.
// The tessellation constants only feed the polygon accounting; cairo draws
// the shapes smooth regardless of detail level.

use crate::model::elements::Rgb;
use gtk4::cairo::{self, LinearGradient, RadialGradient};
use nalgebra::Point3;
use std::f64::consts::PI;

const SPHERE_SLICES: usize = 24;
const SPHERE_STACKS: usize = 12;
const SPHERE_SLICES_2: usize = 7;
const SPHERE_STACKS_2: usize = 4;
const TUBE_FACES: usize = 12;
const TUBE_FACES_2: usize = 3;

/// Tessellation level a primitive was built at. Large molecules drop to
/// `Reduced` so the per-frame polygon count stays manageable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    Full,
    Reduced,
}

impl Detail {
    pub fn sphere_polygons(self) -> usize {
        match self {
            Detail::Full => SPHERE_SLICES * SPHERE_STACKS,
            Detail::Reduced => SPHERE_SLICES_2 * SPHERE_STACKS_2,
        }
    }

    pub fn tube_faces(self) -> usize {
        match self {
            Detail::Full => TUBE_FACES,
            Detail::Reduced => TUBE_FACES_2,
        }
    }
}

/// One drawable item in molecule-local coordinates. The scene transforms
/// these per frame, depth-sorts them, and hands them to the impostor
/// drawing below.
#[derive(Debug, Clone)]
pub enum ScenePrim {
    Sphere {
        center: Point3<f64>,
        radius: f64,
        color: Rgb,
        detail: Detail,
    },
    Tube {
        from: Point3<f64>,
        to: Point3<f64>,
        radius: f64,
        /// Extra length past each endpoint so tube ends stay hidden inside
        /// the atom spheres.
        cap: f64,
        color: Rgb,
        detail: Detail,
    },
    Line {
        from: Point3<f64>,
        to: Point3<f64>,
        color: Rgb,
    },
    Label {
        anchor: Point3<f64>,
        /// Offset toward the viewer so the text sorts in front of its own
        /// atom sphere.
        lift: f64,
        text: String,
        color: Rgb,
    },
}

impl ScenePrim {
    pub fn polygons(&self) -> usize {
        match self {
            ScenePrim::Sphere { detail, .. } => detail.sphere_polygons(),
            ScenePrim::Tube { detail, .. } => detail.tube_faces(),
            ScenePrim::Line { .. } => 1,
            ScenePrim::Label { .. } => 0,
        }
    }
}

/// A compiled batch of primitives for one rendering mode of one molecule.
/// Rebuilt only when the molecule or the effective mode changes, never per
/// frame.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub prims: Vec<ScenePrim>,
    pub polygons: usize,
    pub alpha: f64,
}

impl DisplayList {
    pub fn push(&mut self, prim: ScenePrim) {
        self.polygons += prim.polygons();
        self.prims.push(prim);
    }
}

pub fn draw_sphere_impostor(cr: &cairo::Context, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64) {
    let (r, g, b) = color;

    // Highlight offset to the upper left, shadow at the rim.
    let gradient = RadialGradient::new(
        x - radius * 0.3,
        y - radius * 0.3,
        radius * 0.1,
        x,
        y,
        radius,
    );
    gradient.add_color_stop_rgba(0.0, 1.0, 1.0, 1.0, alpha);
    gradient.add_color_stop_rgba(0.2, (r + 0.2).min(1.0), (g + 0.2).min(1.0), (b + 0.2).min(1.0), alpha);
    gradient.add_color_stop_rgba(1.0, r * 0.6, g * 0.6, b * 0.6, alpha);

    cr.set_source(&gradient).unwrap();
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    cr.fill().unwrap();
}

pub fn draw_tube_impostor(
    cr: &cairo::Context,
    p1: (f64, f64),
    p2: (f64, f64),
    radius: f64,
    color: Rgb,
    alpha: f64,
) {
    let dx = p2.0 - p1.0;
    let dy = p2.1 - p1.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 0.01 {
        return;
    }

    let nx = -dy / len;
    let ny = dx / len;

    let c1 = (p1.0 + nx * radius, p1.1 + ny * radius);
    let c2 = (p2.0 + nx * radius, p2.1 + ny * radius);
    let c3 = (p2.0 - nx * radius, p2.1 - ny * radius);
    let c4 = (p1.0 - nx * radius, p1.1 - ny * radius);

    let (r, g, b) = color;
    let gradient = LinearGradient::new(c1.0, c1.1, c4.0, c4.1);
    gradient.add_color_stop_rgba(0.0, r * 0.3, g * 0.3, b * 0.3, alpha);
    gradient.add_color_stop_rgba(0.3, r, g, b, alpha);
    gradient.add_color_stop_rgba(0.5, (r + 0.3).min(1.0), (g + 0.3).min(1.0), (b + 0.3).min(1.0), alpha);
    gradient.add_color_stop_rgba(0.7, r, g, b, alpha);
    gradient.add_color_stop_rgba(1.0, r * 0.3, g * 0.3, b * 0.3, alpha);

    cr.set_source(&gradient).unwrap();
    cr.move_to(c1.0, c1.1);
    cr.line_to(c2.0, c2.1);
    cr.line_to(c3.0, c3.1);
    cr.line_to(c4.0, c4.1);
    cr.close_path();
    cr.fill().unwrap();
}

pub fn draw_line(cr: &cairo::Context, p1: (f64, f64), p2: (f64, f64), color: Rgb, alpha: f64) {
    let (r, g, b) = color;
    cr.set_source_rgba(r, g, b, alpha);
    cr.set_line_width(1.0);
    cr.move_to(p1.0, p1.1);
    cr.line_to(p2.0, p2.1);
    cr.stroke().unwrap();
}
