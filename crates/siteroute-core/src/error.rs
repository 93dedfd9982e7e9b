//! Error types for SiteRoute Core

use thiserror::Error;

use crate::{ContentId, Culture};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Content not found: {id} has no published route")]
    ContentNotFound { id: ContentId },

    #[error("No domain matches culture '{culture}' for content {id}")]
    CultureNotFound { id: ContentId, culture: Culture },

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid culture: {0}")]
    InvalidCulture(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found")]
    ConfigNotFound,

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error means "no URL exists" rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ContentNotFound { .. } | Error::CultureNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
