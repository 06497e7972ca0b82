//! Text measurement and shaping.

pub mod layout;
pub mod measure;
