// src/rendering/mod.rs
pub mod geometry;
pub mod primitives;
pub mod projection;
pub mod scene;

pub use scene::{InputEvent, Scene};
