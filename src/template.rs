//! Template catalog: pure builders that turn a background size and a user
//! profile into placed object trees.

pub mod badges;
pub mod catalog;
pub mod frames;
mod parts;
pub mod watermarks;
