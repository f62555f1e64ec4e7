// src/catalog.rs
//
// Builds the molecule collection for one viewer instance: either from an
// external path (file or directory of .pdb files) or from the compiled-in
// set. The catalog owns the only copy of each molecule; the scene refers to
// them by index.

use crate::builtins::BUILTIN_PDB;
use crate::config::Config;
use crate::io;
use crate::model::{formula, Molecule};
use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

/// Loads every molecule for this session. A configured path that cannot be
/// opened is fatal; individual bad files inside a directory are skipped.
/// Mode flags on `config` may be adjusted as a side effect (see
/// [`apply_content_policy`]).
pub fn load(config: &mut Config) -> Result<Vec<Molecule>> {
    let mut molecules = Vec::new();

    if let Some(path_str) = config.molecule.clone() {
        let path = Path::new(&path_str);
        let meta = fs::metadata(path)?;

        if meta.is_dir() {
            if config.verbose {
                log::info!("directory {}", path_str);
            }
            let files = structure_files(path)?;
            if files.is_empty() {
                log::warn!("no .pdb files in directory {}", path_str);
            }
            for file in files {
                if config.verbose {
                    log::info!("reading {}", file.display());
                }
                match io::parse_file(&file) {
                    Ok(m) => {
                        apply_content_policy(&m, &file.display().to_string(), config);
                        molecules.push(m);
                    }
                    Err(e) => log::warn!("skipping {}: {}", file.display(), e),
                }
            }
        } else {
            if config.verbose {
                log::info!("file {}", path_str);
            }
            let m = io::parse_file(path)?;
            apply_content_policy(&m, &path_str, config);
            molecules.push(m);
        }
    }

    if molecules.is_empty() {
        for (i, blob) in BUILTIN_PDB.iter().enumerate() {
            let source = format!("<builtin-{}>", i);
            if config.verbose {
                log::info!("reading {}", source);
            }
            match io::parse_blob(blob, &source) {
                Ok(m) => {
                    apply_content_policy(&m, &source, config);
                    molecules.push(m);
                }
                Err(e) => log::warn!("skipping {}: {}", source, e),
            }
        }
    }

    for m in &mut molecules {
        formula::annotate(m);
        m.label = break_label_lines(&m.label);
    }

    Ok(molecules)
}

/// Directory entries with a `.pdb` suffix, case-insensitive, sorted by name.
fn structure_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let lower = name.to_string_lossy().to_lowercase();
        if lower.len() > 4 && lower.ends_with(".pdb") {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Per-molecule adjustments to the session's mode flags:
/// - a molecule without bond data switches bond rendering off when it was
///   requested (it would fail for this data anyway);
/// - with wireframe-or-no-atoms rendering, no bonds, and labels disabled,
///   labels are forced on so the molecule is not invisible.
fn apply_content_policy(m: &Molecule, source: &str, config: &mut Config) {
    if m.bonds.is_empty() {
        if config.bonds {
            log::warn!("{}: contains no atomic bond info", source);
            config.bonds = false;
        }
        if (config.wireframe || !config.atoms) && !config.labels {
            log::warn!("{}: no bonds: turning labels on", source);
            config.labels = true;
        }
    }
}

/// Splits run-on description text onto separate lines at ", ", "; " and
/// ": " so long titles stack instead of running off screen.
fn break_label_lines(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if matches!(c, ',' | ';' | ':') && chars.peek() == Some(&' ') {
            chars.next();
            out.push(' ');
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    const VALID: &str = "\
HEADER    Test molecule
ATOM      1 C   UNK     1        0.000   0.000   0.000
ATOM      2 O   UNK     1        1.200   0.000   0.000
CONECT    1    2
END
";
    const NO_ATOMS: &str = "CONECT    1    2\n";

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(tag: &str) -> Self {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .subsec_nanos();
            let dir = std::env::temp_dir().join(format!(
                "molview-{}-{}-{}",
                tag,
                std::process::id(),
                nanos
            ));
            fs::create_dir_all(&dir).expect("create scratch dir");
            ScratchDir(dir)
        }

        fn write(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.0.join(name);
            fs::write(&path, contents).expect("write scratch file");
            path
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_directory_load_matches_suffix_only() {
        let dir = ScratchDir::new("suffix");
        dir.write("a.pdb", VALID);
        dir.write("b.pdb", VALID);
        dir.write("c.PDB", VALID);
        dir.write("notes.txt", "not a structure");
        dir.write("backup.xyz", "3\n\nC 0 0 0\n");

        let mut config = Config {
            molecule: Some(dir.0.display().to_string()),
            ..Config::default()
        };
        let mols = load(&mut config).unwrap();
        assert_eq!(mols.len(), 3);
    }

    #[test]
    fn test_directory_skips_bad_entries() {
        let dir = ScratchDir::new("skip");
        dir.write("good.pdb", VALID);
        dir.write("empty.pdb", NO_ATOMS);

        let mut config = Config {
            molecule: Some(dir.0.display().to_string()),
            ..Config::default()
        };
        let mols = load(&mut config).unwrap();
        assert_eq!(mols.len(), 1);
    }

    #[test]
    fn test_single_file_without_atoms_is_fatal() {
        let dir = ScratchDir::new("fatal");
        let path = dir.write("only.pdb", NO_ATOMS);

        let mut config = Config {
            molecule: Some(path.display().to_string()),
            ..Config::default()
        };
        assert!(load(&mut config).is_err());
    }

    #[test]
    fn test_missing_path_is_fatal() {
        let mut config = Config {
            molecule: Some("/no/such/path/anywhere".to_string()),
            ..Config::default()
        };
        assert!(load(&mut config).is_err());
    }

    #[test]
    fn test_builtins_used_when_no_path() {
        let mut config = Config::default();
        let mols = load(&mut config).unwrap();
        assert_eq!(mols.len(), 5);
        // Formula is appended on its own line after loading.
        assert!(mols[0].label.contains("Water"));
        assert!(mols[0].label.ends_with("H[2]O"));
    }

    #[test]
    fn test_bondless_molecule_disables_bond_rendering() {
        let dir = ScratchDir::new("nobonds");
        dir.write(
            "bare.pdb",
            "ATOM      1 C   UNK     1        0.000   0.000   0.000\n",
        );

        let mut config = Config {
            molecule: Some(dir.0.display().to_string()),
            ..Config::default()
        };
        assert!(config.bonds);
        load(&mut config).unwrap();
        assert!(!config.bonds);
    }

    #[test]
    fn test_labels_forced_on_for_blank_wireframe() {
        let dir = ScratchDir::new("force");
        dir.write(
            "bare.pdb",
            "ATOM      1 C   UNK     1        0.000   0.000   0.000\n",
        );

        let mut config = Config {
            molecule: Some(dir.0.display().to_string()),
            wireframe: true,
            labels: false,
            ..Config::default()
        };
        load(&mut config).unwrap();
        assert!(config.labels);
    }

    #[test]
    fn test_break_label_lines() {
        assert_eq!(
            break_label_lines("FORMALDEHYDE, HCHO"),
            "FORMALDEHYDE \nHCHO"
        );
        assert_eq!(break_label_lines("plain title"), "plain title");
        // Punctuation not followed by a space stays untouched.
        assert_eq!(break_label_lines("1,2-dichloroethane"), "1,2-dichloroethane");
    }
}
