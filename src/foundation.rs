//! Shared primitives: error taxonomy, coordinate-space math, colors.

pub mod color;
pub mod error;
pub mod geometry;
