//! Result type for read paths that must always produce a usable value.

use crate::error::PlatformError;

/// Why a read fell back to its safe default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DegradeCause {
    #[error("consent platform is not available")]
    CollaboratorUnavailable,

    #[error("consent platform initialization failed: {0}")]
    InitializationFailed(PlatformError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Outcome of a total read.
///
/// Both variants carry a value the caller can render. `Degraded` also
/// carries the cause so the caller can log it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    Fresh(T),
    Degraded { value: T, cause: DegradeCause },
}

impl<T> ReadOutcome<T> {
    pub fn degraded(value: T, cause: impl Into<DegradeCause>) -> Self {
        Self::Degraded {
            value,
            cause: cause.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Fresh(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Fresh(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn cause(&self) -> Option<&DegradeCause> {
        match self {
            Self::Fresh(_) => None,
            Self::Degraded { cause, .. } => Some(cause),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReadOutcome<U> {
        match self {
            Self::Fresh(value) => ReadOutcome::Fresh(f(value)),
            Self::Degraded { value, cause } => ReadOutcome::Degraded {
                value: f(value),
                cause,
            },
        }
    }

    /// Combine two reads; the result is degraded if either input is, keeping the first cause.
    pub fn zip<U>(self, other: ReadOutcome<U>) -> ReadOutcome<(T, U)> {
        match (self, other) {
            (Self::Fresh(a), ReadOutcome::Fresh(b)) => ReadOutcome::Fresh((a, b)),
            (Self::Degraded { value: a, cause }, other) => ReadOutcome::Degraded {
                value: (a, other.into_value()),
                cause,
            },
            (Self::Fresh(a), ReadOutcome::Degraded { value: b, cause }) => {
                ReadOutcome::Degraded {
                    value: (a, b),
                    cause,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_keeps_first_cause() {
        let a: ReadOutcome<u8> = ReadOutcome::degraded(1, DegradeCause::CollaboratorUnavailable);
        let b: ReadOutcome<u8> = ReadOutcome::degraded(2, PlatformError::NotStarted);
        let zipped = a.zip(b);
        assert_eq!(zipped.value(), &(1, 2));
        assert_eq!(zipped.cause(), Some(&DegradeCause::CollaboratorUnavailable));
    }

    #[test]
    fn test_zip_fresh_with_degraded() {
        let a = ReadOutcome::Fresh("x");
        let b: ReadOutcome<bool> = ReadOutcome::degraded(false, PlatformError::NotStarted);
        let zipped = a.zip(b);
        assert!(zipped.is_degraded());
        assert_eq!(zipped.into_value(), ("x", false));
    }

    #[test]
    fn test_map_preserves_variant() {
        let fresh = ReadOutcome::Fresh(2).map(|v| v * 2);
        assert_eq!(fresh, ReadOutcome::Fresh(4));
        assert!(fresh.cause().is_none());
    }
}
