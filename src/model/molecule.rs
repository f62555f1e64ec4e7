// src/model/molecule.rs

use crate::model::elements;

/// One atom as read from a structure file. `id` is the sequence number from
/// the file; it is unique within a molecule but not necessarily contiguous
/// or zero-based, so lookups go through [`Molecule::atom_by_id`].
#[derive(Clone, Debug)]
pub struct Atom {
    pub id: i32,
    pub element: String,
    pub position: [f64; 3],
    /// Index into the fixed element style table, resolved when the atom is
    /// pushed. Unknown elements get the wildcard entry, never an invalid index.
    pub style: usize,
}

/// A bond between two atom ids. `strength` counts how many times the same
/// unordered pair was declared (bond order).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bond {
    pub from: i32,
    pub to: i32,
    pub strength: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Molecule {
    /// Description of the compound, possibly multi-line once the derived
    /// formula has been appended.
    pub label: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

/// Margin added around the extreme atom coordinates, in angstroms.
pub const BBOX_MARGIN: f64 = 1.5;

impl Molecule {
    pub fn push_atom(&mut self, id: i32, element: &str, position: [f64; 3]) {
        self.atoms.push(Atom {
            id,
            element: element.to_string(),
            position,
            style: elements::style_index(element),
        });
    }

    /// Records a bond between `from` and `to`. The pair is unordered: a
    /// second declaration of (to, from) bumps the strength of the existing
    /// record instead of adding a new one.
    pub fn push_bond(&mut self, from: i32, to: i32) {
        for b in &mut self.bonds {
            if (b.from == from && b.to == to) || (b.to == from && b.from == to) {
                b.strength += 1;
                return;
            }
        }
        self.bonds.push(Bond {
            from,
            to,
            strength: 1,
        });
    }

    /// Resolves an atom id to its record. Ids usually arrive in file order,
    /// so try the positional guess first, then fall back to a full scan.
    /// A miss means the connectivity data referenced an atom that was never
    /// declared; earlier validation should have caught that, so it aborts.
    pub fn atom_by_id(&self, id: i32) -> &Atom {
        if id >= 0 {
            let i = id as usize;
            if i < self.atoms.len() && self.atoms[i].id == id {
                return &self.atoms[i];
            }
            if i > 0 && i - 1 < self.atoms.len() && self.atoms[i - 1].id == id {
                return &self.atoms[i - 1];
            }
            if i + 1 < self.atoms.len() && self.atoms[i + 1].id == id {
                return &self.atoms[i + 1];
            }
        }

        match self.atoms.iter().find(|a| a.id == id) {
            Some(a) => a,
            None => panic!("no atom {} in \"{}\"", id, self.label),
        }
    }

    /// Axis-aligned bounding box of all atoms, padded by [`BBOX_MARGIN`].
    /// Returns (min, max); both are zero for an empty molecule.
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        let mut lo = [0.0; 3];
        let mut hi = [0.0; 3];

        if let Some(first) = self.atoms.first() {
            lo = first.position;
            hi = first.position;
        }

        for a in self.atoms.iter().skip(1) {
            for k in 0..3 {
                if a.position[k] < lo[k] {
                    lo[k] = a.position[k];
                }
                if a.position[k] > hi[k] {
                    hi[k] = a.position[k];
                }
            }
        }

        for k in 0..3 {
            lo[k] -= BBOX_MARGIN;
            hi[k] += BBOX_MARGIN;
        }
        (lo, hi)
    }
}
