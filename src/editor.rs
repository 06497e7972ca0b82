//! Editing session: working set of photos, selection and field edits.

pub mod controller;
pub mod session;
