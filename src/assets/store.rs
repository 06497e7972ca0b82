use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode;
use crate::foundation::error::PhotomarkResult;

/// Prepared raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Session-wide store of decoded images keyed by caller-chosen strings.
///
/// Decoding is front-loaded here so rendering and export stay IO-free.
#[derive(Clone, Debug, Default)]
pub struct ImageStore {
    images: HashMap<String, PreparedImage>,
}

impl ImageStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and store the result under `key`.
    ///
    /// Returns the decoded pixel dimensions.
    pub fn insert_bytes(&mut self, key: impl Into<String>, bytes: &[u8]) -> PhotomarkResult<(u32, u32)> {
        let prepared = decode::decode_image(bytes)?;
        let dims = (prepared.width, prepared.height);
        self.images.insert(key.into(), prepared);
        Ok(dims)
    }

    /// Store an already prepared image under `key`.
    pub fn insert(&mut self, key: impl Into<String>, image: PreparedImage) {
        self.images.insert(key.into(), image);
    }

    /// Look up a prepared image.
    pub fn get(&self, key: &str) -> Option<&PreparedImage> {
        self.images.get(key)
    }

    /// Whether `key` has been decoded into the store.
    pub fn contains(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }
}
