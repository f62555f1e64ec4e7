// src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// Which of the three axes the scene spins around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinAxes {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Path to a `.pdb` file or a directory of them. `None` selects the
    /// built-in molecule set.
    #[serde(default)]
    pub molecule: Option<String>,

    /// Seconds each molecule stays on screen before the automatic switch.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Axis letters, any combination of X, Y and Z (case-insensitive).
    #[serde(default = "default_spin")]
    pub spin: String,

    #[serde(default)]
    pub wander: bool,

    #[serde(default = "default_true")]
    pub labels: bool,
    #[serde(default = "default_true")]
    pub titles: bool,
    #[serde(default = "default_true")]
    pub atoms: bool,
    #[serde(default = "default_true")]
    pub bonds: bool,
    #[serde(default)]
    pub shells: bool,
    #[serde(default)]
    pub bbox: bool,
    #[serde(default)]
    pub wireframe: bool,

    #[serde(default = "default_shell_alpha")]
    pub shell_alpha: f64,

    /// Bounding-box size above which per-atom labels switch off.
    #[serde(default = "default_no_label_threshold")]
    pub no_label_threshold: f64,
    /// Bounding-box size above which rendering drops to wireframe.
    #[serde(default = "default_wireframe_threshold")]
    pub wireframe_threshold: f64,

    #[serde(default)]
    pub verbose: bool,
}

fn default_timeout() -> u64 {
    20
}
fn default_spin() -> String {
    "XYZ".to_string()
}
fn default_true() -> bool {
    true
}
fn default_shell_alpha() -> f64 {
    0.3
}
fn default_no_label_threshold() -> f64 {
    30.0
}
fn default_wireframe_threshold() -> f64 {
    150.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            molecule: None,
            timeout_secs: default_timeout(),
            spin: default_spin(),
            wander: false,
            labels: true,
            titles: true,
            atoms: true,
            bonds: true,
            shells: false,
            bbox: false,
            wireframe: false,
            shell_alpha: default_shell_alpha(),
            no_label_threshold: default_no_label_threshold(),
            wireframe_threshold: default_wireframe_threshold(),
            verbose: false,
        }
    }
}

impl Config {
    /// Loads config from the standard OS location
    /// (e.g., ~/.config/molview/settings.json).
    pub fn load() -> Self {
        let path = Self::get_path();
        if path.exists() {
            match File::open(&path) {
                Ok(file) => {
                    let reader = BufReader::new(file);
                    match serde_json::from_reader(reader) {
                        Ok(cfg) => {
                            log::info!("config loaded from {:?}", path);
                            cfg
                        }
                        Err(e) => {
                            log::warn!("error parsing config: {}", e);
                            Self::default()
                        }
                    }
                }
                Err(e) => {
                    log::warn!("error opening config: {}", e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    pub fn save(&self) {
        let path = Self::get_path();
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        match File::create(&path) {
            Ok(file) => {
                let writer = BufWriter::new(file);
                match serde_json::to_writer_pretty(writer, self) {
                    Ok(_) => log::info!("config saved to {:?}", path),
                    Err(e) => log::warn!("failed to save config: {}", e),
                }
            }
            Err(e) => log::warn!("could not create config file: {}", e),
        }
    }

    fn get_path() -> PathBuf {
        if let Some(proj) = ProjectDirs::from("com", "example", "molview") {
            proj.config_dir().join("settings.json")
        } else {
            PathBuf::from("settings.json")
        }
    }

    /// Validates the spin string. Anything other than the letters X, Y and Z
    /// is rejected.
    pub fn spin_axes(&self) -> Result<SpinAxes, String> {
        let mut axes = SpinAxes {
            x: false,
            y: false,
            z: false,
        };
        for c in self.spin.chars() {
            match c {
                'x' | 'X' => axes.x = true,
                'y' | 'Y' => axes.y = true,
                'z' | 'Z' => axes.z = true,
                _ => {
                    return Err(format!(
                        "spin must contain only the characters X, Y, or Z (not \"{}\")",
                        self.spin
                    ))
                }
            }
        }
        Ok(axes)
    }
}
