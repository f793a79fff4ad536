//! Error Types
//!
//! The main error type [`WaltzError`] covers all failure modes of the crate:
//! asset loading and decoding, panel state persistence, and blend controller
//! precondition violations.
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, WaltzError>`.

use thiserror::Error;

/// The main error type for the waltz crate.
#[derive(Error, Debug)]
pub enum WaltzError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// glTF parsing or loading error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    GltfError(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error (panel state persistence).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Blend Controller Errors
    // ========================================================================
    /// An action handle does not belong to the controller's action set.
    #[error("Unknown action handle: {0}")]
    UnknownAction(String),

    /// A crossfade was requested with a negative duration.
    #[error("Invalid crossfade duration: {0}")]
    InvalidDuration(f32),

    /// A crossfade was requested between an action and itself.
    #[error("Crossfade source and target must be distinct actions")]
    DegenerateCrossFade,
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for WaltzError {
    fn from(err: gltf::Error) -> Self {
        WaltzError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, WaltzError>`.
pub type Result<T> = std::result::Result<T, WaltzError>;
