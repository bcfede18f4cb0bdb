//! Error types for blend-rules

/// Result type for blend-rules operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur loading rules or documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Invalid rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: String },

    #[error("Cannot render {format}: {reason}")]
    RenderFailed { format: String, reason: String },

    #[error(transparent)]
    Core(#[from] blend_core::Error),
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl ToString) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.to_string(),
        }
    }

    pub fn render(format: impl Into<String>, reason: impl ToString) -> Self {
        Self::RenderFailed {
            format: format.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_rule(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            index,
            reason: reason.into(),
        }
    }
}
