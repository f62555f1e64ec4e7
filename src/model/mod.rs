//src/model/mod.rs
pub mod elements;
pub mod formula;
pub mod molecule;

// Re-exports for cleaner imports
pub use elements::StyleTable;
pub use molecule::{Atom, Bond, Molecule};
