//! Error types for the gdrive_provider crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::resource_file::FileState;

/// Errors raised by the provider, its schema validation and the Drive client.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read source file {path}: {source}")]
    SourceFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),

    /// Drive created the item but reading it back failed.
    #[error("Created drive item {} but could not read it back: {source}", .state.id)]
    IncompleteCreate {
        state: Box<FileState>,
        source: Box<DriveError>,
    },
}

impl DriveError {
    /// Build a validation error from a message.
    pub fn validation(message: impl Into<String>) -> Self {
        DriveError::ValidationError(message.into())
    }

    /// Whether this error was raised locally, before any remote call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            DriveError::ValidationError(_)
                | DriveError::SourceFileError { .. }
                | DriveError::InvalidUrlOrId(_)
        )
    }

    /// State of an item that exists remotely even though its creation failed.
    pub fn created_state(&self) -> Option<&FileState> {
        match self {
            DriveError::IncompleteCreate { state, .. } => Some(&**state),
            _ => None,
        }
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
