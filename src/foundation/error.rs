/// Convenience result type used across EzID.
pub type EzidResult<T> = Result<T, EzidError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum EzidError {
    /// Invalid geometry or configuration (scales, specs, sizes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Image bytes that could not be decoded into a usable raster.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while locating or preparing external assets (overlays, background removal).
    #[error("asset error: {0}")]
    Asset(String),

    /// Export requested while the photo queue holds no cells.
    #[error("nothing to export: the photo queue is empty")]
    EmptyQueue,

    /// Errors while encoding output rasters.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing job files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EzidError {
    /// Build a [`EzidError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EzidError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`EzidError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`EzidError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`EzidError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
