// src/rendering/scene.rs
//
// The animation controller: owns the molecule set, the current display
// lists, the spin/wander generators and the trackball, and runs the
// shrink-swap-grow transition between molecules. `tick` advances time,
// `draw` paints one frame, `handle_event` feeds pointer and key input in.

use crate::config::Config;
use crate::model::elements::BOND_STYLE;
use crate::model::{Molecule, StyleTable};
use crate::rendering::geometry::{self, BuildFlags, FitInfo};
use crate::rendering::primitives::{
    draw_line, draw_sphere_impostor, draw_tube_impostor, DisplayList, ScenePrim,
};
use crate::rendering::projection::Projection;
use crate::utils::rotator::Rotator;
use crate::utils::trackball::Trackball;
use gtk4::cairo::{self, FontSlant, FontWeight};
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::f64::consts::TAU;
use std::time::Instant;

/// Frames each half of the shrink/grow transition lasts.
const TRANSITION_TICKS: u32 = 40;
/// The idle timeout is only checked every this many frames.
const AUTO_CHECK_INTERVAL: u64 = 10;

/// Base scale applied on top of the fit so molecules slightly overfill the
/// frustum.
const OUTER_SCALE: f64 = 1.1;
/// Full travel of the wander drift, in world units.
const WANDER_RANGE: f64 = 9.0;

const SPIN_SPEED: f64 = 0.5;
const SPIN_ACCEL: f64 = 0.3;
const WANDER_SPEED: f64 = 0.01;

const TITLE_MARGIN: f64 = 10.0;
const TITLE_FONT_SIZE: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Idle,
    Shrinking,
    Growing,
}

/// Input decoupled from the toolkit: the window shell translates GTK events
/// into these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ButtonPress { x: f64, y: f64 },
    ButtonRelease,
    Motion { x: f64, y: f64 },
    Scroll { up: bool },
    KeyPress { ch: Option<char> },
}

/// Picks the next catalog index, never repeating `last` when there is a
/// choice.
pub fn pick_next(n: usize, last: usize, rng: &mut impl Rng) -> usize {
    if n <= 1 {
        return 0;
    }
    loop {
        let i = rng.random_range(0..n);
        if i != last {
            return i;
        }
    }
}

/// One transformed primitive queued for the painter, sorted far to near.
struct DrawItem<'a> {
    depth: f64,
    prim: &'a ScenePrim,
    a: Point3<f64>,
    b: Point3<f64>,
    /// Uniform world scale at this item, for radii.
    scale: f64,
    alpha: f64,
}

pub struct Scene {
    config: Config,
    molecules: Vec<Molecule>,
    which: usize,
    styles: StyleTable,
    rot: Rotator,
    trackball: Trackball,
    button_down: bool,
    projection: Projection,
    transition: Transition,
    mode_tick: u32,
    frame: u64,
    last_switch: Instant,
    fit: FitInfo,
    molecule_list: DisplayList,
    shell_list: Option<DisplayList>,
    rng: SmallRng,
}

impl Scene {
    pub fn new(config: Config, molecules: Vec<Molecule>) -> Result<Self, String> {
        if molecules.is_empty() {
            return Err("no molecules to display".to_string());
        }
        let spin = config.spin_axes()?;
        let wander = config.wander.then_some(WANDER_SPEED);
        let mut rng = SmallRng::from_os_rng();
        let which = rng.random_range(0..molecules.len());

        let mut scene = Self {
            rot: Rotator::new(spin, SPIN_SPEED, SPIN_ACCEL, wander),
            trackball: Trackball::new(),
            button_down: false,
            projection: Projection::new(1.0, 1.0),
            transition: Transition::Idle,
            mode_tick: 0,
            frame: 0,
            last_switch: Instant::now(),
            fit: geometry::fit_transform(&molecules[which]),
            molecule_list: DisplayList::default(),
            shell_list: None,
            styles: StyleTable::new(),
            config,
            molecules,
            which,
            rng,
        };
        scene.rebuild();
        Ok(scene)
    }

    pub fn current(&self) -> &Molecule {
        &self.molecules[self.which]
    }

    pub fn current_index(&self) -> usize {
        self.which
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// Polygons compiled into the current display lists, shell included.
    pub fn polygon_count(&self) -> usize {
        self.molecule_list.polygons
            + self.shell_list.as_ref().map_or(0, |l| l.polygons)
    }

    pub fn reshape(&mut self, width: f64, height: f64) {
        self.projection.reshape(width, height);
    }

    /// The rendering flags actually in effect: the raw configuration after
    /// the size thresholds and consistency rules have been applied.
    fn effective_flags(&self) -> (BuildFlags, bool) {
        let c = &self.config;
        let mut flags = BuildFlags {
            atoms: c.atoms,
            bonds: c.bonds,
            labels: c.labels && self.fit.size <= c.no_label_threshold,
            wireframe: c.wireframe || self.fit.size > c.wireframe_threshold,
            bbox: c.bbox,
        };
        let mut shells = c.shells;

        if flags.wireframe {
            flags.bonds = true;
            shells = false;
        }
        if !flags.bonds {
            shells = false;
        }
        // With neither atoms nor bonds there would be nothing on screen.
        if !flags.atoms && !flags.bonds {
            flags.wireframe = true;
            flags.bonds = true;
        }
        (flags, shells)
    }

    /// Recompiles the display lists for the current molecule.
    fn rebuild(&mut self) {
        self.fit = geometry::fit_transform(&self.molecules[self.which]);
        let (flags, shells) = self.effective_flags();

        self.molecule_list =
            geometry::build(&self.molecules[self.which], &mut self.styles, flags, &self.fit);
        log::debug!(
            "molecule {} (\"{}\"): {} polygons",
            self.which,
            self.molecules[self.which].label.lines().next().unwrap_or(""),
            self.molecule_list.polygons
        );

        self.shell_list = if shells {
            let mut list = geometry::build(
                &self.molecules[self.which],
                &mut self.styles,
                BuildFlags {
                    atoms: true,
                    bonds: false,
                    labels: false,
                    wireframe: false,
                    bbox: false,
                },
                &self.fit,
            );
            list.alpha = self.config.shell_alpha;
            Some(list)
        } else {
            None
        };
    }

    /// Advances the animation by one frame.
    pub fn tick(&mut self) {
        self.frame += 1;
        if !self.button_down {
            self.rot.advance(&mut self.rng);
        }

        match self.transition {
            Transition::Idle => {
                if self.frame % AUTO_CHECK_INTERVAL == 0
                    && !self.button_down
                    && self.molecules.len() > 1
                    && self.last_switch.elapsed().as_secs() >= self.config.timeout_secs
                {
                    self.begin_switch();
                }
            }
            Transition::Shrinking => {
                self.mode_tick -= 1;
                if self.mode_tick == 0 {
                    self.which = pick_next(self.molecules.len(), self.which, &mut self.rng);
                    self.rebuild();
                    self.transition = Transition::Growing;
                    self.mode_tick = TRANSITION_TICKS;
                }
            }
            Transition::Growing => {
                self.mode_tick -= 1;
                if self.mode_tick == 0 {
                    self.transition = Transition::Idle;
                    self.last_switch = Instant::now();
                }
            }
        }
    }

    fn begin_switch(&mut self) {
        self.transition = Transition::Shrinking;
        self.mode_tick = TRANSITION_TICKS;
    }

    fn transition_scale(&self) -> f64 {
        match self.transition {
            Transition::Idle => 1.0,
            Transition::Shrinking => self.mode_tick as f64 / TRANSITION_TICKS as f64,
            Transition::Growing => 1.0 - self.mode_tick as f64 / TRANSITION_TICKS as f64,
        }
    }

    /// Handles one decoupled input event. Returns whether the event was
    /// consumed.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::ButtonPress { x, y } => {
                self.button_down = true;
                self.trackball
                    .start(x, y, self.projection.width, self.projection.height);
                true
            }
            InputEvent::ButtonRelease => {
                self.button_down = false;
                self.trackball.end();
                true
            }
            InputEvent::Motion { x, y } => {
                if self.button_down {
                    self.trackball
                        .track(x, y, self.projection.width, self.projection.height);
                    true
                } else {
                    false
                }
            }
            InputEvent::Scroll { up } => {
                self.trackball.wheel(up);
                true
            }
            InputEvent::KeyPress { ch } => match ch {
                // Advance immediately, even mid-transition or with the
                // timeout not yet elapsed.
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.begin_switch();
                    true
                }
                _ => false,
            },
        }
    }

    fn modelview(&self) -> Matrix4<f64> {
        let (px, py, pz) = self.rot.position();
        let (rx, ry, rz) = self.rot.rotation();
        let s = self.transition_scale();

        let translate = Matrix4::new_translation(&Vector3::new(
            (px - 0.5) * WANDER_RANGE,
            (py - 0.5) * WANDER_RANGE,
            (pz - 0.5) * WANDER_RANGE,
        ));
        let spin = Rotation3::from_euler_angles(rx * TAU, ry * TAU, rz * TAU).to_homogeneous();

        self.projection.view()
            * translate
            * Matrix4::new_scaling(OUTER_SCALE)
            * self.trackball.matrix()
            * spin
            * Matrix4::new_scaling(s)
    }

    /// Paints one frame.
    pub fn draw(&mut self, cr: &cairo::Context) {
        cr.set_source_rgb(0.0, 0.0, 0.0);
        cr.paint().unwrap();

        let mv = self.modelview();
        // Uniform scale baked into the matrix; rotations keep column norms.
        let k = mv.fixed_view::<3, 1>(0, 0).norm();

        let show_labels = self.transition == Transition::Idle;
        let mut queue: Vec<DrawItem> = Vec::with_capacity(
            self.molecule_list.prims.len()
                + self.shell_list.as_ref().map_or(0, |l| l.prims.len()),
        );
        Self::queue_list(&mut queue, &self.molecule_list, &mv, k, show_labels);
        if let Some(shell) = &self.shell_list {
            // Shell spheres join the same global depth sort; their alpha
            // blends them over whatever was filled before them.
            Self::queue_list(&mut queue, shell, &mv, k, false);
        }

        queue.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(Ordering::Equal));

        for item in &queue {
            self.draw_item(cr, item);
        }

        if self.config.titles && self.transition == Transition::Idle {
            self.draw_title(cr);
        }
    }

    fn queue_list<'a>(
        queue: &mut Vec<DrawItem<'a>>,
        list: &'a DisplayList,
        mv: &Matrix4<f64>,
        k: f64,
        show_labels: bool,
    ) {
        for prim in &list.prims {
            let item = match prim {
                ScenePrim::Sphere { center, .. } => {
                    let c = mv.transform_point(center);
                    DrawItem {
                        depth: c.z,
                        prim,
                        a: c,
                        b: c,
                        scale: k,
                        alpha: list.alpha,
                    }
                }
                ScenePrim::Tube { from, to, cap, .. } => {
                    let mut a = mv.transform_point(from);
                    let mut b = mv.transform_point(to);
                    // Stretch past the endpoints so the tube ends stay
                    // buried in the atom spheres.
                    let dir = b - a;
                    if dir.norm() > 1e-9 {
                        let ext = dir.normalize() * (*cap * k);
                        a -= ext;
                        b += ext;
                    }
                    DrawItem {
                        depth: (a.z + b.z) / 2.0,
                        prim,
                        a,
                        b,
                        scale: k,
                        alpha: list.alpha,
                    }
                }
                ScenePrim::Line { from, to, .. } => {
                    let a = mv.transform_point(from);
                    let b = mv.transform_point(to);
                    DrawItem {
                        depth: (a.z + b.z) / 2.0,
                        prim,
                        a,
                        b,
                        scale: k,
                        alpha: list.alpha,
                    }
                }
                ScenePrim::Label { anchor, lift, .. } => {
                    if !show_labels {
                        continue;
                    }
                    let mut p = mv.transform_point(anchor);
                    // Lift toward the viewer so the text wins the depth
                    // sort against its own sphere.
                    p.z += lift * k;
                    DrawItem {
                        depth: p.z,
                        prim,
                        a: p,
                        b: p,
                        scale: k,
                        alpha: list.alpha,
                    }
                }
            };
            queue.push(item);
        }
    }

    fn draw_item(&self, cr: &cairo::Context, item: &DrawItem) {
        match item.prim {
            ScenePrim::Sphere { radius, color, .. } => {
                let Some(s) = self.projection.to_screen(&item.a) else {
                    return;
                };
                draw_sphere_impostor(cr, s.x, s.y, radius * item.scale * s.px_per_unit, *color, item.alpha);
            }
            ScenePrim::Tube { radius, color, .. } => {
                let (Some(s1), Some(s2)) = (
                    self.projection.to_screen(&item.a),
                    self.projection.to_screen(&item.b),
                ) else {
                    return;
                };
                let mid_px = (s1.px_per_unit + s2.px_per_unit) / 2.0;
                draw_tube_impostor(
                    cr,
                    (s1.x, s1.y),
                    (s2.x, s2.y),
                    radius * item.scale * mid_px,
                    *color,
                    item.alpha,
                );
            }
            ScenePrim::Line { color, .. } => {
                let (Some(s1), Some(s2)) = (
                    self.projection.to_screen(&item.a),
                    self.projection.to_screen(&item.b),
                ) else {
                    return;
                };
                draw_line(cr, (s1.x, s1.y), (s2.x, s2.y), *color, item.alpha);
            }
            ScenePrim::Label { text, color, .. } => {
                let Some(s) = self.projection.to_screen(&item.a) else {
                    return;
                };
                let (r, g, b) = *color;
                cr.set_source_rgba(r, g, b, item.alpha);
                cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
                let size = (item.scale * s.px_per_unit * 0.5).clamp(7.0, 20.0);
                cr.set_font_size(size);
                if let Ok(ext) = cr.text_extents(text) {
                    cr.move_to(s.x - ext.width() / 2.0, s.y + ext.height() / 2.0);
                    cr.show_text(text).unwrap();
                }
            }
        }
    }

    fn draw_title(&mut self, cr: &cairo::Context) {
        let label = self.molecules[self.which].label.clone();
        if label.is_empty() {
            return;
        }
        let (r, g, b) = self.styles.text_color(BOND_STYLE);
        cr.set_source_rgb(r, g, b);
        cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
        cr.set_font_size(TITLE_FONT_SIZE);

        // Bottom-left corner, stacking upward.
        let lines: Vec<&str> = label.lines().collect();
        let mut y =
            self.projection.height - TITLE_MARGIN - (lines.len() - 1) as f64 * TITLE_FONT_SIZE * 1.3;
        for line in lines {
            cr.move_to(TITLE_MARGIN, y);
            cr.show_text(line).unwrap();
            y += TITLE_FONT_SIZE * 1.3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_molecules() -> Vec<Molecule> {
        let mut a = Molecule::default();
        a.label = "Water".to_string();
        a.push_atom(1, "O", [0.0; 3]);
        a.push_atom(2, "H", [0.96, 0.0, 0.0]);
        a.push_bond(1, 2);

        let mut b = Molecule::default();
        b.label = "Methane".to_string();
        b.push_atom(1, "C", [0.0; 3]);
        b.push_atom(2, "H", [1.09, 0.0, 0.0]);
        b.push_bond(1, 2);

        vec![a, b]
    }

    fn test_scene(config: Config) -> Scene {
        Scene::new(config, two_molecules()).unwrap()
    }

    #[test]
    fn test_pick_next_never_repeats() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut last = 0;
        for _ in 0..1000 {
            let next = pick_next(5, last, &mut rng);
            assert!(next < 5);
            assert_ne!(next, last);
            last = next;
        }
        // Degenerate catalogs still terminate.
        assert_eq!(pick_next(1, 0, &mut rng), 0);
        assert_eq!(pick_next(0, 0, &mut rng), 0);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(Scene::new(Config::default(), Vec::new()).is_err());
    }

    #[test]
    fn test_bad_spin_rejected() {
        let mut config = Config::default();
        config.spin = "XQ".to_string();
        assert!(Scene::new(config, two_molecules()).is_err());
    }

    #[test]
    fn test_auto_switch_runs_full_transition() {
        let mut config = Config::default();
        config.timeout_secs = 0;
        let mut scene = test_scene(config);
        let start = scene.current_index();

        assert_eq!(scene.transition(), Transition::Idle);
        for _ in 0..AUTO_CHECK_INTERVAL {
            scene.tick();
        }
        assert_eq!(scene.transition(), Transition::Shrinking);

        for _ in 0..TRANSITION_TICKS {
            scene.tick();
        }
        assert_eq!(scene.transition(), Transition::Growing);
        assert_ne!(scene.current_index(), start);

        for _ in 0..TRANSITION_TICKS {
            scene.tick();
        }
        assert_eq!(scene.transition(), Transition::Idle);
    }

    #[test]
    fn test_no_auto_switch_while_dragging() {
        let mut config = Config::default();
        config.timeout_secs = 0;
        let mut scene = test_scene(config);
        scene.reshape(400.0, 400.0);
        scene.handle_event(InputEvent::ButtonPress { x: 10.0, y: 10.0 });
        for _ in 0..100 {
            scene.tick();
        }
        assert_eq!(scene.transition(), Transition::Idle);

        scene.handle_event(InputEvent::ButtonRelease);
        for _ in 0..AUTO_CHECK_INTERVAL {
            scene.tick();
        }
        assert_eq!(scene.transition(), Transition::Shrinking);
    }

    #[test]
    fn test_key_forces_switch_even_mid_transition() {
        let mut scene = test_scene(Config::default());
        assert!(scene.handle_event(InputEvent::KeyPress { ch: Some(' ') }));
        assert_eq!(scene.transition(), Transition::Shrinking);

        // Half-way through, a second press restarts the shrink.
        for _ in 0..20 {
            scene.tick();
        }
        assert!(scene.handle_event(InputEvent::KeyPress { ch: Some('\t') }));
        assert_eq!(scene.transition(), Transition::Shrinking);
        assert_eq!(scene.mode_tick, TRANSITION_TICKS);

        // Unmapped keys are not consumed.
        assert!(!scene.handle_event(InputEvent::KeyPress { ch: Some('q') }));
        assert!(!scene.handle_event(InputEvent::KeyPress { ch: None }));
    }

    #[test]
    fn test_motion_without_press_is_ignored() {
        let mut scene = test_scene(Config::default());
        scene.reshape(400.0, 400.0);
        assert!(!scene.handle_event(InputEvent::Motion { x: 5.0, y: 5.0 }));
        assert!(scene.handle_event(InputEvent::ButtonPress { x: 5.0, y: 5.0 }));
        assert!(scene.handle_event(InputEvent::Motion { x: 50.0, y: 5.0 }));
    }

    #[test]
    fn test_transition_scale_shrinks_then_grows() {
        let mut config = Config::default();
        config.timeout_secs = 0;
        let mut scene = test_scene(config);
        for _ in 0..AUTO_CHECK_INTERVAL {
            scene.tick();
        }

        let mut prev = scene.transition_scale();
        assert!((prev - 1.0).abs() < 1e-9);
        for _ in 0..(TRANSITION_TICKS - 1) {
            scene.tick();
            let s = scene.transition_scale();
            assert!(s < prev);
            prev = s;
        }

        scene.tick(); // swap happens here
        assert_eq!(scene.transition(), Transition::Growing);
        prev = scene.transition_scale();
        for _ in 0..(TRANSITION_TICKS - 1) {
            scene.tick();
            let s = scene.transition_scale();
            assert!(s > prev);
            prev = s;
        }
    }

    #[test]
    fn test_wireframe_forces_bonds_and_no_shells() {
        let mut config = Config::default();
        config.wireframe = true;
        config.shells = true;
        config.bonds = false;
        let scene = test_scene(config);
        let (flags, shells) = scene.effective_flags();
        assert!(flags.wireframe);
        assert!(flags.bonds);
        assert!(!shells);
        assert!(scene.shell_list.is_none());
    }

    #[test]
    fn test_nothing_visible_falls_back_to_wireframe() {
        let mut config = Config::default();
        config.atoms = false;
        config.bonds = false;
        let scene = test_scene(config);
        let (flags, _) = scene.effective_flags();
        assert!(flags.wireframe);
        assert!(flags.bonds);
    }

    #[test]
    fn test_shell_list_uses_configured_alpha() {
        let mut config = Config::default();
        config.shells = true;
        config.shell_alpha = 0.25;
        let scene = test_scene(config);
        let shell = scene.shell_list.as_ref().unwrap();
        assert!((shell.alpha - 0.25).abs() < 1e-9);
        assert!(shell
            .prims
            .iter()
            .all(|p| matches!(p, ScenePrim::Sphere { .. })));
    }

    #[test]
    fn test_size_thresholds_drop_labels_then_detail() {
        let mut huge = Molecule::default();
        huge.label = "Chain".to_string();
        for i in 0..200 {
            huge.push_atom(i + 1, "C", [i as f64 * 1.5, 0.0, 0.0]);
            if i > 0 {
                huge.push_bond(i, i + 1);
            }
        }
        let scene = Scene::new(Config::default(), vec![huge]).unwrap();
        let (flags, _) = scene.effective_flags();
        // ~300 angstroms across: past both thresholds.
        assert!(!flags.labels);
        assert!(flags.wireframe);
    }

    #[test]
    fn test_polygon_count_includes_shell() {
        let mut config = Config::default();
        config.shells = true;
        let scene = test_scene(config);
        assert_eq!(
            scene.polygon_count(),
            scene.molecule_list.polygons + scene.shell_list.as_ref().unwrap().polygons
        );
        assert!(scene.polygon_count() > 0);
    }
}
