// src/rendering/geometry.rs
//
// Turns a parsed molecule into a display list of scene primitives, centered
// on the origin and shrunk to fit the viewing frustum. The fit transform is
// baked into the primitive coordinates so the per-frame work is a single
// matrix pass over the list.

use crate::model::elements::BOND_STYLE;
use crate::model::{Molecule, StyleTable};
use crate::rendering::primitives::{Detail, DisplayList, ScenePrim};
use nalgebra::Point3;

/// Molecules larger than this (largest bounding-box extent, in angstroms)
/// are scaled down to fit.
pub const TARGET_SIZE: f64 = 10.0;
/// Below this fit scale the molecule is considered huge and tessellation
/// drops to the reduced level.
const SCALE_DOWN_THRESHOLD: f64 = 0.3;

/// Tube radius per unit of bond strength, and its cap.
const BOND_THICKNESS: f64 = 0.07;
const BOND_THICKNESS_MAX: f64 = 0.3;
/// Extra tube length hidden inside each endpoint's sphere.
const BOND_CAP: f64 = 0.03;

const BBOX_COLOR: (f64, f64, f64) = (0.2, 0.2, 0.4);
const AXIS_COLOR: (f64, f64, f64) = (0.5, 0.0, 0.0);

/// What to put in the display list. These are the effective flags after the
/// scene has applied size thresholds, not the raw configuration.
#[derive(Debug, Clone, Copy)]
pub struct BuildFlags {
    pub atoms: bool,
    pub bonds: bool,
    pub labels: bool,
    pub wireframe: bool,
    pub bbox: bool,
}

/// The shrink-to-fit transform for one molecule.
#[derive(Debug, Clone, Copy)]
pub struct FitInfo {
    pub scale: f64,
    pub center: [f64; 3],
    /// Largest bounding-box extent before scaling, used against the label
    /// and wireframe thresholds.
    pub size: f64,
    pub scaled_down: bool,
}

/// Computes the fit for a molecule. Small molecules are only centered,
/// never enlarged.
pub fn fit_transform(m: &Molecule) -> FitInfo {
    let (lo, hi) = m.bounding_box();
    let center = [
        (lo[0] + hi[0]) / 2.0,
        (lo[1] + hi[1]) / 2.0,
        (lo[2] + hi[2]) / 2.0,
    ];
    let size = (hi[0] - lo[0]).max(hi[1] - lo[1]).max(hi[2] - lo[2]);
    let scale = if size > TARGET_SIZE {
        TARGET_SIZE / size
    } else {
        1.0
    };
    FitInfo {
        scale,
        center,
        size,
        scaled_down: scale < SCALE_DOWN_THRESHOLD,
    }
}

pub fn fit_point(fit: &FitInfo, p: [f64; 3]) -> Point3<f64> {
    Point3::new(
        (p[0] - fit.center[0]) * fit.scale,
        (p[1] - fit.center[1]) * fit.scale,
        (p[2] - fit.center[2]) * fit.scale,
    )
}

/// Compiles the molecule into a display list under the given flags. Called
/// when the molecule or the effective rendering mode changes.
pub fn build(
    m: &Molecule,
    styles: &mut StyleTable,
    flags: BuildFlags,
    fit: &FitInfo,
) -> DisplayList {
    let mut list = DisplayList {
        alpha: 1.0,
        ..DisplayList::default()
    };
    let detail = if fit.scaled_down {
        Detail::Reduced
    } else {
        Detail::Full
    };

    if flags.bonds {
        for bond in &m.bonds {
            let from = fit_point(fit, m.atom_by_id(bond.from).position);
            let to = fit_point(fit, m.atom_by_id(bond.to).position);
            let color = styles.solid_color(BOND_STYLE);
            if flags.wireframe {
                list.push(ScenePrim::Line { from, to, color });
            } else {
                let thickness =
                    (BOND_THICKNESS * bond.strength as f64).min(BOND_THICKNESS_MAX);
                list.push(ScenePrim::Tube {
                    from,
                    to,
                    radius: thickness * fit.scale,
                    cap: BOND_CAP * fit.scale,
                    color,
                    detail,
                });
            }
        }
    }

    if flags.atoms && !flags.wireframe {
        for atom in &m.atoms {
            let radius = styles.render_size(atom.style, flags.bonds) * fit.scale;
            list.push(ScenePrim::Sphere {
                center: fit_point(fit, atom.position),
                radius,
                color: styles.solid_color(atom.style),
                detail,
            });
        }
    }

    if flags.labels {
        for atom in &m.atoms {
            let radius = styles.render_size(atom.style, flags.bonds) * fit.scale;
            // Text is the element string as parsed; the style only supplies
            // color and size, so elements outside the style table still show
            // their own symbol.
            list.push(ScenePrim::Label {
                anchor: fit_point(fit, atom.position),
                lift: radius * 1.1,
                text: atom.element.clone(),
                color: styles.text_color(atom.style),
            });
        }
    }

    if flags.bbox {
        push_bounding_box(&mut list, m, fit);
    }

    list
}

/// The padded bounding cage plus the world axes, the latter clamped to the
/// cage so they never poke outside it.
fn push_bounding_box(list: &mut DisplayList, m: &Molecule, fit: &FitInfo) {
    let (lo, hi) = m.bounding_box();
    let lo = fit_point(fit, lo);
    let hi = fit_point(fit, hi);

    let corner = |x: bool, y: bool, z: bool| {
        Point3::new(
            if x { hi.x } else { lo.x },
            if y { hi.y } else { lo.y },
            if z { hi.z } else { lo.z },
        )
    };

    let edges: [((bool, bool, bool), (bool, bool, bool)); 12] = [
        // Bottom face
        ((false, false, false), (true, false, false)),
        ((true, false, false), (true, false, true)),
        ((true, false, true), (false, false, true)),
        ((false, false, true), (false, false, false)),
        // Top face
        ((false, true, false), (true, true, false)),
        ((true, true, false), (true, true, true)),
        ((true, true, true), (false, true, true)),
        ((false, true, true), (false, true, false)),
        // Uprights
        ((false, false, false), (false, true, false)),
        ((true, false, false), (true, true, false)),
        ((true, true, true), (true, false, true)),
        ((false, true, true), (false, false, true)),
    ];
    for (a, b) in edges {
        list.push(ScenePrim::Line {
            from: corner(a.0, a.1, a.2),
            to: corner(b.0, b.1, b.2),
            color: BBOX_COLOR,
        });
    }

    // Axis lines through the origin, drawn only where the origin actually
    // falls inside the cage on the other two coordinates.
    let origin = fit_point(fit, [0.0; 3]);
    if origin.y > lo.y && origin.y < hi.y && origin.z > lo.z && origin.z < hi.z {
        list.push(ScenePrim::Line {
            from: Point3::new(lo.x, origin.y, origin.z),
            to: Point3::new(hi.x, origin.y, origin.z),
            color: AXIS_COLOR,
        });
    }
    if origin.x > lo.x && origin.x < hi.x && origin.z > lo.z && origin.z < hi.z {
        list.push(ScenePrim::Line {
            from: Point3::new(origin.x, lo.y, origin.z),
            to: Point3::new(origin.x, hi.y, origin.z),
            color: AXIS_COLOR,
        });
    }
    if origin.x > lo.x && origin.x < hi.x && origin.y > lo.y && origin.y < hi.y {
        list.push(ScenePrim::Line {
            from: Point3::new(origin.x, origin.y, lo.z),
            to: Point3::new(origin.x, origin.y, hi.z),
            color: AXIS_COLOR,
        });
    }
}
