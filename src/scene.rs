//! Scene graph: objects, ordering, hit testing and the persisted document.

pub mod document;
pub mod graph;
pub mod object;
