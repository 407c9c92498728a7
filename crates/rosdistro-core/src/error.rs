//! Error types for rosdistro.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistroError {
    #[error("failed to decode manifest: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch manifest from {uri}: {message}")]
    Fetch { uri: String, message: String },

    #[error("distro is missing required '{0}' key")]
    MissingKey(String),

    #[error("invalid distro: {0}")]
    InvalidDistro(String),

    #[error("version string '{0}' not valid")]
    InvalidVersion(String),

    #[error("rule '{rule}' references $REVISION but no revision was supplied")]
    MissingRevision { rule: String },

    #[error("cycle detected in variant extends: {0}")]
    CycleDetected(String),

    #[error("variant '{variant}' exceeds the maximum extends depth of {limit}")]
    ExtendsTooDeep { variant: String, limit: usize },
}

impl DistroError {
    /// Whether this error describes a structurally malformed manifest.
    pub fn is_invalid_distro(&self) -> bool {
        matches!(
            self,
            DistroError::MissingKey(_)
                | DistroError::InvalidDistro(_)
                | DistroError::CycleDetected(_)
                | DistroError::ExtendsTooDeep { .. }
        )
    }

    /// Shorthand for [`DistroError::InvalidDistro`].
    pub fn invalid(message: impl Into<String>) -> Self {
        DistroError::InvalidDistro(message.into())
    }
}

pub type Result<T> = std::result::Result<T, DistroError>;
