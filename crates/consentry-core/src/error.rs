//! Error types for the consent client, the platform boundary and configuration.

use std::path::PathBuf;

/// Errors reported by a consent platform implementation.
///
/// Cloneable so a single failure can be carried by a degraded read and
/// still be logged by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The platform does not implement this capability.
    #[error("platform does not support {op}")]
    Unsupported { op: &'static str },

    /// An operation other than startup was issued before startup succeeded.
    #[error("platform not started")]
    NotStarted,

    /// The native SDK reported a failure.
    #[error("{op} failed: {message}")]
    Native { op: &'static str, message: String },
}

impl PlatformError {
    pub fn native(op: &'static str, message: impl Into<String>) -> Self {
        Self::Native {
            op,
            message: message.into(),
        }
    }
}

/// Result type for platform boundary calls.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Which write step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    SetCategory(crate::types::Purpose),
    Commit,
    ResetModifiedMarker,
    ClearPersistedState,
}

impl std::fmt::Display for WriteStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetCategory(purpose) => write!(f, "set {} consent", purpose.as_str()),
            Self::Commit => f.write_str("commit consent"),
            Self::ResetModifiedMarker => f.write_str("reset modified marker"),
            Self::ClearPersistedState => f.write_str("clear persisted state"),
        }
    }
}

/// Errors surfaced by the lifecycle and write paths of [`crate::ConsentClient`].
///
/// Read paths never produce these; they degrade to safe defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    /// No platform collaborator was supplied at construction.
    #[error("consent platform is not available")]
    CollaboratorUnavailable,

    /// The startup request failed; the client stays uninitialized.
    #[error("consent platform initialization failed: {source}")]
    InitializationFailed {
        #[source]
        source: PlatformError,
    },

    /// A consent update could not be applied or committed.
    #[error("consent update failed at step '{step}': {source}")]
    UpdateFailed {
        step: WriteStep,
        #[source]
        source: UpdateCause,
    },

    /// Resetting stored consent failed.
    #[error("consent reset failed at step '{step}': {source}")]
    ResetFailed {
        step: WriteStep,
        #[source]
        source: PlatformError,
    },
}

/// Underlying reason for [`ConsentError::UpdateFailed`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateCause {
    #[error("consent platform is not available")]
    CollaboratorUnavailable,

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl ConsentError {
    /// Whether the caller should keep showing its previous state.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::UpdateFailed { .. } | Self::ResetFailed { .. })
    }
}

/// Result type for lifecycle and write operations.
pub type ConsentResult<T> = Result<T, ConsentError>;

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Purpose;

    #[test]
    fn test_write_failure_classification() {
        assert!(!ConsentError::CollaboratorUnavailable.is_write_failure());
        let update = ConsentError::UpdateFailed {
            step: WriteStep::Commit,
            source: UpdateCause::CollaboratorUnavailable,
        };
        assert!(update.is_write_failure());
    }

    #[test]
    fn test_display_names_step() {
        let err = ConsentError::UpdateFailed {
            step: WriteStep::SetCategory(Purpose::Marketing),
            source: PlatformError::native("set_category_consent", "boom").into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("set marketing consent"), "{msg}");
        assert!(msg.contains("boom"), "{msg}");
    }
}
