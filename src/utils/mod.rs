// src/utils/mod.rs
pub mod logger;
pub mod rotator;
pub mod trackball;
