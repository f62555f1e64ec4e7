// src/model/formula.rs
//
// Derives a conventional chemical formula string from a molecule's atoms.
// The convention puts carbon first, hydrogen second, and everything else
// alphabetically; a few common compounds are customarily written in a
// different order and are special-cased by exact match.

use crate::model::Molecule;
use std::cmp::Ordering;

fn cmp_symbols(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    if a == "C" {
        return Ordering::Less;
    }
    if b == "C" {
        return Ordering::Greater;
    }
    if a == "H" {
        return Ordering::Less;
    }
    if b == "H" {
        return Ordering::Greater;
    }
    a.cmp(b)
}

/// Alphabetic element symbol of an atom label: leading non-letters are
/// skipped, the symbol ends at the first non-letter after that.
fn element_symbol(label: &str) -> &str {
    let start = label
        .find(|c: char| c.is_alphabetic())
        .unwrap_or(label.len());
    let rest = &label[start..];
    let end = rest
        .find(|c: char| !c.is_alphabetic())
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Builds the formula string for a molecule. Pure function of the atom
/// multiset: arrival order never affects the output.
pub fn generate(m: &Molecule) -> String {
    // Count per symbol, preserving nothing about order (sorted below).
    let mut counts: Vec<(String, usize)> = Vec::new();
    for atom in &m.atoms {
        let sym = element_symbol(&atom.element);
        match counts.iter_mut().find(|(s, _)| s == sym) {
            Some((_, n)) => *n += 1,
            None => counts.push((sym.to_string(), 1)),
        }
    }

    counts.sort_by(|(a, _), (b, _)| cmp_symbols(a, b));

    let mut out = String::new();
    for (sym, n) in &counts {
        out.push_str(sym);
        if *n > 1 {
            // Brackets read as subscripts downstream.
            out.push_str(&format!("[{}]", n));
        }
    }

    special_case(&out).unwrap_or(out)
}

/// Conventional-order exceptions, matched by exact formula string.
fn special_case(f: &str) -> Option<String> {
    let fixed = match f {
        "H[2]Be" => "BeH[2]",
        "H[3]B" => "BH[3]",
        "H[3]N" => "NH[3]",
        "CHN" => "HCN",
        "CKN" => "KCN",
        "H[4]N[2]" => "N[2]H[4]",
        "Cl[3]P" => "PCl[3]",
        "Cl[5]P" => "PCl[5]",
        _ => return None,
    };
    Some(fixed.to_string())
}

/// Appends the derived formula to the molecule's label on its own line.
pub fn annotate(m: &mut Molecule) {
    let formula = generate(m);
    if !m.label.is_empty() {
        m.label.push('\n');
    }
    m.label.push_str(&formula);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mol_of(symbols: &[&str]) -> Molecule {
        let mut m = Molecule::default();
        for (i, s) in symbols.iter().enumerate() {
            m.push_atom(i as i32 + 1, s, [0.0; 3]);
        }
        m
    }

    #[test]
    fn test_carbon_hydrogen_ordering() {
        assert_eq!(generate(&mol_of(&["C", "C", "H", "H", "H", "O"])), "C[2]H[3]O");
        assert_eq!(generate(&mol_of(&["C", "O"])), "CO");
        assert_eq!(generate(&mol_of(&["O", "H", "H"])), "H[2]O");
    }

    #[test]
    fn test_order_invariance() {
        let a = generate(&mol_of(&["O", "C", "H", "C", "H", "H"]));
        let b = generate(&mol_of(&["H", "H", "H", "O", "C", "C"]));
        let c = generate(&mol_of(&["C", "H", "O", "H", "C", "H"]));
        assert_eq!(a, "C[2]H[3]O");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_special_cases() {
        assert_eq!(generate(&mol_of(&["H", "H", "Be"])), "BeH[2]");
        assert_eq!(generate(&mol_of(&["N", "H", "H", "H"])), "NH[3]");
        assert_eq!(generate(&mol_of(&["C", "H", "N"])), "HCN");
        // Not in the override table: passes through unchanged.
        assert_eq!(generate(&mol_of(&["H", "H", "S"])), "H[2]S");
    }

    #[test]
    fn test_symbol_extraction_ignores_digits() {
        assert_eq!(generate(&mol_of(&["1H", "H2"])), "H[2]");
    }

    #[test]
    fn test_annotate_appends_line() {
        let mut m = mol_of(&["O", "H", "H"]);
        m.label = "Water".to_string();
        annotate(&mut m);
        assert_eq!(m.label, "Water\nH[2]O");

        let mut unnamed = mol_of(&["C", "O"]);
        annotate(&mut unnamed);
        assert_eq!(unnamed.label, "CO");
    }
}
