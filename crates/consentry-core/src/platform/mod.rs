//! Boundary to the consent-management platform SDK.
//!
//! The platform owns consent storage, banner rendering and regulatory
//! bookkeeping. This crate only talks to it through [`ConsentPlatform`];
//! wire format and SDK bootstrap belong to the implementation.
//!
//! # Implementations
//!
//! - [`MemoryPlatform`] - in-process simulation with fault injection and
//!   JSON snapshots, used by tests and the CLI
//! - [`TracingPlatform`] - decorator recording one span per boundary call

pub mod memory;
pub mod tracing;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, PlatformResult};
use crate::types::{DiagnosticLevel, InteractionType, StartupParams, UiOptions};

pub use memory::{MemoryPlatform, PlatformCall, PlatformSnapshot};
pub use self::tracing::TracingPlatform;

/// Boundary operation names, used for logging and fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformOp {
    Startup,
    EnableDiagnosticLogging,
    ShouldShowBanner,
    CategoryStatus,
    SetCategoryConsent,
    CommitConsent,
    ShowBanner,
    ShowPreferenceCenter,
    ResetModifiedMarker,
    ClearPersistedState,
}

impl PlatformOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::EnableDiagnosticLogging => "enable_diagnostic_logging",
            Self::ShouldShowBanner => "should_show_banner",
            Self::CategoryStatus => "category_status",
            Self::SetCategoryConsent => "set_category_consent",
            Self::CommitConsent => "commit_consent",
            Self::ShowBanner => "show_banner",
            Self::ShowPreferenceCenter => "show_preference_center",
            Self::ResetModifiedMarker => "reset_modified_marker",
            Self::ClearPersistedState => "clear_persisted_state",
        }
    }
}

/// The consent platform SDK as seen by [`crate::ConsentClient`].
///
/// Every call may suspend until the SDK responds. Timeouts and cancellation
/// are the implementation's concern.
#[async_trait]
pub trait ConsentPlatform: Send + Sync {
    /// Start the SDK for a tenant.
    async fn startup(
        &self,
        domain_id: &str,
        app_id: &str,
        language: &str,
        params: &StartupParams,
        verbose: bool,
    ) -> PlatformResult<()>;

    /// Enable the SDK's own diagnostic log. Optional capability.
    async fn enable_diagnostic_logging(&self, _level: DiagnosticLevel) -> PlatformResult<()> {
        Err(PlatformError::Unsupported {
            op: PlatformOp::EnableDiagnosticLogging.as_str(),
        })
    }

    /// Whether the consent banner is still owed to the user.
    async fn should_show_banner(&self) -> PlatformResult<bool>;

    /// Raw status for a category code. `1` means granted.
    async fn category_status(&self, category_code: &str) -> PlatformResult<i32>;

    /// Stage consent for a category. Takes effect on [`Self::commit_consent`].
    async fn set_category_consent(&self, category_code: &str, granted: bool)
        -> PlatformResult<()>;

    /// Persist staged consent, tagged with how the user decided.
    async fn commit_consent(&self, interaction: InteractionType) -> PlatformResult<()>;

    async fn show_banner(&self, options: &UiOptions) -> PlatformResult<()>;

    async fn show_preference_center(&self, options: &UiOptions) -> PlatformResult<()>;

    /// Discard the "consent modified" marker and any staged changes.
    async fn reset_modified_marker(&self) -> PlatformResult<()>;

    /// Wipe all consent data persisted by the SDK.
    async fn clear_persisted_state(&self) -> PlatformResult<()>;

    fn platform_name(&self) -> &'static str;
}
