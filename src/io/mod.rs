// src/io/mod.rs
pub mod pdb;

pub use pdb::{parse_blob, parse_file, ParseError};
