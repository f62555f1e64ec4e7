// src/io/pdb.rs
//
// Minimal PDB reader: enough of the format to get atoms, bonds and a
// description out of HEADER/COMPND, ATOM, HETATM and CONECT records.
// Fields live at fixed byte offsets per the PDB spec; numeric text that
// fails to parse keeps a sentinel value instead of rejecting the line
// (matching how every PDB consumer of this vintage behaved).

use crate::model::Molecule;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Coordinate value used when a numeric field cannot be parsed.
const COORD_SENTINEL: f64 = -999.0;

/// Record keywords we know about but have no use for.
const SKIP_KEYWORDS: [&str; 31] = [
    "TITLE ", "HEADER", "COMPND", "AUTHOR", "REVDAT", "SOURCE", "EXPDTA",
    "JRNL  ", "REMARK", "SEQRES", "HET   ", "FORMUL", "CRYST1", "ORIGX1",
    "ORIGX2", "ORIGX3", "SCALE1", "SCALE2", "SCALE3", "MASTER", "KEYWDS",
    "DBREF ", "HETNAM", "HETSYN", "HELIX ", "LINK  ", "MTRIX1", "MTRIX2",
    "MTRIX3", "SHEET ", "CISPEP",
];

#[derive(Debug)]
pub enum ParseError {
    /// The source contained no atomic coordinates at all.
    NoAtoms { source: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoAtoms { source } => {
                write!(f, "{}: contains no atomic coordinates", source)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for io::Error {
    fn from(e: ParseError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e.to_string())
    }
}

fn byte_range<'a>(line: &'a str, start: usize, end: usize) -> &'a str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

fn first_int(s: &str) -> Option<i32> {
    s.split_whitespace().next()?.parse().ok()
}

/// Up to three whitespace-separated floats; parsing stops at the first
/// malformed token and the remaining slots keep the sentinel.
fn three_floats(s: &str) -> [f64; 3] {
    let mut out = [COORD_SENTINEL; 3];
    for (slot, tok) in out.iter_mut().zip(s.split_whitespace()) {
        match tok.parse() {
            Ok(v) => *slot = v,
            Err(_) => break,
        }
    }
    out
}

fn title_from(line: &str) -> String {
    let mut t = byte_range(line, 6, line.len()).trim().to_string();
    if t.len() > 4 && t.ends_with(".pdb") {
        t.truncate(t.len() - 4);
    }
    t
}

/// Element substring of an ATOM record, lowercased after the first
/// character ("CA " -> "Ca").
fn atom_element(line: &str) -> String {
    let raw = byte_range(line, 12, 15).trim();
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.chars().enumerate() {
        if i == 0 {
            out.push(c);
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Parses one structure from a raw text blob. `source` only feeds the
/// diagnostics. Fails when the blob yields zero atoms.
pub fn parse_blob(data: &str, source: &str) -> Result<Molecule, ParseError> {
    let mut m = Molecule::default();

    for (lineno, raw) in data.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        let lineno = lineno + 1;

        if line.trim().is_empty() {
            continue;
        }

        if m.label.is_empty()
            && (line.starts_with("HEADER") || line.starts_with("COMPND"))
        {
            m.label = title_from(line);
        } else if SKIP_KEYWORDS.iter().any(|k| line.starts_with(k))
            || line.starts_with("GENERATED BY")
            || line == "TER"
            || line.starts_with("TER ")
            || line == "END"
            || line.starts_with("END ")
        {
            // Known record type, nothing we need from it.
        } else if line.starts_with("ATOM   ") {
            let id = first_int(byte_range(line, 7, line.len())).unwrap_or(0);
            let element = atom_element(line);
            let pos = three_floats(byte_range(line, 32, line.len()));
            m.push_atom(id, &element, pos);
        } else if line.starts_with("HETATM ") {
            let id = first_int(byte_range(line, 7, line.len())).unwrap_or(0);
            let element = byte_range(line, 12, 15).trim().to_string();
            let pos = three_floats(byte_range(line, 30, line.len()));
            m.push_atom(id, &element, pos);
        } else if line.starts_with("CONECT ") {
            let mut ids = byte_range(line, 8, line.len())
                .split_whitespace()
                .map_while(|t| t.parse::<i32>().ok());
            if let Some(base) = ids.next() {
                for partner in ids.take(11) {
                    if partner > 0 {
                        m.push_bond(base, partner);
                    }
                }
            }
        } else {
            log::warn!("{}: {}: unrecognised line: {}", source, lineno, line);
        }
    }

    if m.atoms.is_empty() {
        return Err(ParseError::NoAtoms {
            source: source.to_string(),
        });
    }
    Ok(m)
}

/// Reads and parses a single `.pdb` file.
pub fn parse_file(path: &Path) -> io::Result<Molecule> {
    let data = fs::read_to_string(path)?;
    let source = path.display().to_string();
    parse_blob(&data, &source).map_err(io::Error::from)
}
