/// Convenience result type used across Photomark.
pub type PhotomarkResult<T> = Result<T, PhotomarkError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PhotomarkError {
    /// Background bounds with a zero or non-finite extent.
    #[error("degenerate bounds: {0}")]
    DegenerateBounds(String),

    /// Source image bytes could not be decoded.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// A template builder could not produce a valid object tree.
    #[error("template build error: {0}")]
    TemplateBuild(String),

    /// Export rendering or encoding failed.
    #[error("export error: {0}")]
    Export(String),

    /// Invalid user-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhotomarkError {
    /// Build a [`PhotomarkError::DegenerateBounds`] value.
    pub fn degenerate_bounds(msg: impl Into<String>) -> Self {
        Self::DegenerateBounds(msg.into())
    }

    /// Build a [`PhotomarkError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`PhotomarkError::TemplateBuild`] value.
    pub fn template_build(msg: impl Into<String>) -> Self {
        Self::TemplateBuild(msg.into())
    }

    /// Build a [`PhotomarkError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`PhotomarkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
