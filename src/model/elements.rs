// src/model/elements.rs
//
// The traditional colors used to render these atoms, and their approximate
// sizes in angstroms. Colors are given by name and resolved to RGB lazily,
// per scene instance, the first time each style is drawn.

#[derive(Debug)]
pub struct ElementStyle {
    pub name: &'static str,
    /// Rendered radius when only atoms are shown.
    pub size: f64,
    pub color: &'static str,
    pub text_color: &'static str,
}

pub const ELEMENT_STYLES: [ElementStyle; 9] = [
    ElementStyle { name: "H",    size: 1.17, color: "White",           text_color: "Grey70" },
    ElementStyle { name: "C",    size: 1.75, color: "Grey60",          text_color: "White" },
    ElementStyle { name: "CA",   size: 1.80, color: "Blue",            text_color: "LightBlue" },
    ElementStyle { name: "N",    size: 1.55, color: "LightSteelBlue3", text_color: "SlateBlue1" },
    ElementStyle { name: "O",    size: 1.40, color: "Red",             text_color: "LightPink" },
    ElementStyle { name: "P",    size: 1.28, color: "MediumPurple",    text_color: "PaleVioletRed" },
    ElementStyle { name: "S",    size: 1.80, color: "Yellow4",         text_color: "Yellow1" },
    ElementStyle { name: "bond", size: 0.0,  color: "Grey70",          text_color: "Yellow1" },
    ElementStyle { name: "*",    size: 1.40, color: "Green4",          text_color: "LightGreen" },
];

/// Style used for bond tubes and the molecule title text.
pub const BOND_STYLE: usize = 7;
/// Fallback for element labels that match nothing in the table.
pub const WILDCARD_STYLE: usize = 8;

// Secondary size band used when bond tubes are also drawn: each element's
// natural radius is mapped linearly from SIZE_MIN..SIZE_MAX onto
// SIZE2_LO..SIZE2_HI so the tubes stay visible.
const SIZE2_LO: f64 = 0.4;
const SIZE2_HI: f64 = 0.6;
const SIZE_MIN: f64 = 1.17;
const SIZE_MAX: f64 = 1.80;

/// Strips non-alphabetic junk from both ends of an atom label, leaving the
/// bare element symbol ("1CA2" -> "CA").
fn bare_symbol(label: &str) -> &str {
    label.trim_matches(|c: char| !c.is_alphabetic())
}

/// Resolves an atom label to an index into [`ELEMENT_STYLES`]. The match is
/// case-insensitive on the stripped symbol; anything unknown gets the
/// wildcard entry.
pub fn style_index(label: &str) -> usize {
    let symbol = bare_symbol(label);
    ELEMENT_STYLES
        .iter()
        .position(|e| e.name.eq_ignore_ascii_case(symbol))
        .unwrap_or(WILDCARD_STYLE)
}

pub type Rgb = (f64, f64, f64);

/// The named colors the style table refers to (X11 rgb.txt values).
fn named_color(name: &str) -> Option<Rgb> {
    let c = match name {
        "White" => (1.0, 1.0, 1.0),
        "Grey70" => (0.702, 0.702, 0.702),
        "Grey60" => (0.6, 0.6, 0.6),
        "Blue" => (0.0, 0.0, 1.0),
        "LightBlue" => (0.678, 0.847, 0.902),
        "LightSteelBlue3" => (0.635, 0.710, 0.804),
        "SlateBlue1" => (0.514, 0.435, 1.0),
        "Red" => (1.0, 0.0, 0.0),
        "LightPink" => (1.0, 0.714, 0.757),
        "MediumPurple" => (0.576, 0.439, 0.859),
        "PaleVioletRed" => (0.859, 0.439, 0.576),
        "Yellow4" => (0.545, 0.545, 0.0),
        "Yellow1" => (1.0, 1.0, 0.0),
        "Green4" => (0.0, 0.545, 0.0),
        "LightGreen" => (0.565, 0.933, 0.565),
        _ => return None,
    };
    Some(c)
}

/// Per-scene cache of resolved style values. The static table stays
/// read-only; resolved colors and the scaled-down size band live here so
/// two scenes never share mutable state.
#[derive(Debug, Default)]
pub struct StyleTable {
    solid: [Option<Rgb>; ELEMENT_STYLES.len()],
    text: [Option<Rgb>; ELEMENT_STYLES.len()],
    size2: [Option<f64>; ELEMENT_STYLES.len()],
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(name: &str, owner: &str) -> Rgb {
        match named_color(name) {
            Some(c) => c,
            None => {
                log::warn!("unresolvable color in {}: {}", owner, name);
                (1.0, 0.08, 0.58)
            }
        }
    }

    pub fn solid_color(&mut self, style: usize) -> Rgb {
        let e = &ELEMENT_STYLES[style];
        *self.solid[style].get_or_insert_with(|| Self::resolve(e.color, e.name))
    }

    pub fn text_color(&mut self, style: usize) -> Rgb {
        let e = &ELEMENT_STYLES[style];
        *self.text[style].get_or_insert_with(|| Self::resolve(e.text_color, e.name))
    }

    /// Render radius for an atom. With bonds shown the radius comes from the
    /// secondary band; otherwise it is the element's natural size.
    pub fn render_size(&mut self, style: usize, bonds_shown: bool) -> f64 {
        let size = ELEMENT_STYLES[style].size;
        if !bonds_shown {
            return size;
        }
        *self.size2[style].get_or_insert_with(|| {
            let ratio = (size - SIZE_MIN) / (SIZE_MAX - SIZE_MIN);
            SIZE2_LO + ratio * (SIZE2_HI - SIZE2_LO)
        })
    }
}
