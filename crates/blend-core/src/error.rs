//! Error types for blend-core

use crate::path::KeyPath;

/// Result type for blend-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while blending
///
/// The engine never fails on its own. Every variant either comes from a
/// user-supplied action or from converting values in and out of the
/// engine's value model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A strategy action refused to produce a value
    #[error("Action failed at '{path}': {message}")]
    Action { path: String, message: String },

    /// A value cannot be represented in the requested target model
    #[error("Unsupported conversion: {reason}")]
    UnsupportedConversion { reason: String },

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn action(path: &KeyPath, message: impl Into<String>) -> Self {
        Self::Action {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedConversion {
            reason: reason.into(),
        }
    }
}
