//! Display surface fit: maps a photo's native pixels onto a viewport.

pub mod adapter;
