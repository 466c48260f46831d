//! Exit codes for the `consentry` binary.
//! These codes are part of the public contract; scripts branch on them.

pub const SUCCESS: i32 = 0;
pub const WRITE_FAILED: i32 = 1; // Update or reset was not saved
pub const INTERNAL_ERROR: i32 = 2; // Config error, bad usage or I/O failure
pub const INIT_FAILED: i32 = 3; // Platform missing or startup failed

use consentry_core::ConsentError;

/// Exit code for a lifecycle or write error.
pub fn for_consent_error(err: &ConsentError) -> i32 {
    if err.is_write_failure() {
        WRITE_FAILED
    } else {
        INIT_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consentry_core::{PlatformError, UpdateCause, WriteStep};

    #[test]
    fn test_consent_error_mapping() {
        assert_eq!(
            for_consent_error(&ConsentError::CollaboratorUnavailable),
            INIT_FAILED
        );
        assert_eq!(
            for_consent_error(&ConsentError::InitializationFailed {
                source: PlatformError::NotStarted,
            }),
            INIT_FAILED
        );
        assert_eq!(
            for_consent_error(&ConsentError::UpdateFailed {
                step: WriteStep::Commit,
                source: UpdateCause::CollaboratorUnavailable,
            }),
            WRITE_FAILED
        );
        assert_eq!(
            for_consent_error(&ConsentError::ResetFailed {
                step: WriteStep::ClearPersistedState,
                source: PlatformError::native("clear_persisted_state", "disk full"),
            }),
            WRITE_FAILED
        );
    }
}
