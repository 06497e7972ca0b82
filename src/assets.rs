//! Image decoding and the prepared-image store.

pub mod decode;
pub mod store;
