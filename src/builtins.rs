// src/builtins.rs
//
// Compiled-in structures used when no external source is configured, so the
// viewer always has something to draw. Same record format as external files.

const WATER: &str = r#"HEADER    Water
ATOM      1 O   UNK     1        0.000   0.000   0.000
ATOM      2 H   UNK     1        0.757   0.586   0.000
ATOM      3 H   UNK     1       -0.757   0.586   0.000
CONECT    1    2    3
END
"#;

const METHANE: &str = r#"HEADER    Methane
ATOM      1 C   UNK     1        0.000   0.000   0.000
ATOM      2 H   UNK     1        0.629   0.629   0.629
ATOM      3 H   UNK     1       -0.629  -0.629   0.629
ATOM      4 H   UNK     1       -0.629   0.629  -0.629
ATOM      5 H   UNK     1        0.629  -0.629  -0.629
CONECT    1    2    3    4    5
END
"#;

const AMMONIA: &str = r#"HEADER    Ammonia
ATOM      1 N   UNK     1        0.000   0.000   0.066
ATOM      2 H   UNK     1        0.000   0.941  -0.268
ATOM      3 H   UNK     1        0.815  -0.470  -0.268
ATOM      4 H   UNK     1       -0.815  -0.470  -0.268
CONECT    1    2    3    4
END
"#;

const BENZENE: &str = r#"HEADER    Benzene
ATOM      1 C   UNK     1        1.390   0.000   0.000
ATOM      2 C   UNK     1        0.695   1.204   0.000
ATOM      3 C   UNK     1       -0.695   1.204   0.000
ATOM      4 C   UNK     1       -1.390   0.000   0.000
ATOM      5 C   UNK     1       -0.695  -1.204   0.000
ATOM      6 C   UNK     1        0.695  -1.204   0.000
ATOM      7 H   UNK     1        2.480   0.000   0.000
ATOM      8 H   UNK     1        1.240   2.148   0.000
ATOM      9 H   UNK     1       -1.240   2.148   0.000
ATOM     10 H   UNK     1       -2.480   0.000   0.000
ATOM     11 H   UNK     1       -1.240  -2.148   0.000
ATOM     12 H   UNK     1        1.240  -2.148   0.000
CONECT    1    2    7
CONECT    2    3    8
CONECT    3    4    9
CONECT    4    5   10
CONECT    5    6   11
CONECT    6    1   12
CONECT    1    2
CONECT    3    4
CONECT    5    6
END
"#;

const ETHANOL: &str = r#"HEADER    Ethanol
ATOM      1 C   UNK     1       -0.748  -0.015   0.024
ATOM      2 C   UNK     1        0.558   0.420  -0.638
ATOM      3 O   UNK     1        1.638  -0.333  -0.122
ATOM      4 H   UNK     1       -1.293  -0.769  -0.556
ATOM      5 H   UNK     1       -1.263   0.857   0.442
ATOM      6 H   UNK     1       -0.699  -0.497   1.005
ATOM      7 H   UNK     1        0.716   1.404   0.141
ATOM      8 H   UNK     1        0.336   0.609  -1.710
ATOM      9 H   UNK     1        2.256  -0.660  -0.784
CONECT    1    2    4    5    6
CONECT    2    3    7    8
CONECT    3    9
END
"#;
/// The built-in structure blobs, in catalog order.
pub const BUILTIN_PDB: [&str; 5] = [WATER, METHANE, AMMONIA, BENZENE, ETHANOL];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io;

    #[test]
    fn test_builtins_all_parse_with_atoms_and_bonds() {
        for (i, blob) in BUILTIN_PDB.iter().enumerate() {
            let m = io::parse_blob(blob, &format!("<builtin-{}>", i)).unwrap();
            assert!(!m.atoms.is_empty(), "builtin {} has no atoms", i);
            assert!(!m.bonds.is_empty(), "builtin {} has no bonds", i);
            assert!(!m.label.is_empty(), "builtin {} has no label", i);
        }
    }

    #[test]
    fn test_benzene_ring_has_double_bonds() {
        let m = io::parse_blob(BENZENE, "<benzene>").unwrap();
        assert_eq!(m.atoms.len(), 12);
        let ring = m
            .bonds
            .iter()
            .filter(|b| b.from <= 6 && b.to <= 6)
            .collect::<Vec<_>>();
        assert_eq!(ring.len(), 6);
        assert_eq!(ring.iter().filter(|b| b.strength == 2).count(), 3);
    }
}
