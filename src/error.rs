//! Error taxonomy
//!
//! Only construction can fail. Once a session exists, ticking is infallible:
//! off-mask queries read as non-drivable and a crash is vehicle state.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up a simulation session
#[derive(Debug, Error)]
pub enum SimError {
    /// Image file missing or undecodable
    #[error("failed to load image {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Rejected tunables or dimensions
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Settings file unreadable or malformed
    #[error("failed to read settings {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, SimError>;
