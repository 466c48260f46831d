//! Consent client: lifecycle, status reconciliation and consent updates.
//!
//! Read paths (`is_consent_required`, `has_consent`, `consent_preferences`,
//! `consent_status`, `consent_status_for_category`) are total and return a
//! [`ReadOutcome`]. Lifecycle and write paths (`initialize`,
//! `update_consent_preferences`, `reset_consent`) return [`ConsentResult`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ConsentConfig;
use crate::error::{ConsentError, ConsentResult, UpdateCause, WriteStep};
use crate::outcome::{DegradeCause, ReadOutcome};
use crate::platform::ConsentPlatform;
use crate::types::{
    ConsentPreferences, ConsentStatus, DiagnosticLevel, InteractionType, Purpose,
    UiOptions, CATEGORY_GRANTED, CATEGORY_STATUS_UNKNOWN,
};

/// Verbose flag sent with every startup request.
const STARTUP_VERBOSE: bool = true;

/// Resolved once at construction.
enum Backend {
    Live(Arc<dyn ConsentPlatform>),
    Unavailable,
}

/// Application-facing consent client.
///
/// Construct exactly one per process at the composition root and share it
/// (e.g. behind an `Arc`). The configuration is fixed for the client's
/// lifetime and the initialized flag only ever moves from false to true.
pub struct ConsentClient {
    config: ConsentConfig,
    backend: Backend,
    initialized: AtomicBool,
}

impl std::fmt::Debug for ConsentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentClient")
            .field("platform", &self.platform_name())
            .field("domain_id", &self.config.domain_id)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl ConsentClient {
    pub fn new(config: ConsentConfig, platform: Option<Arc<dyn ConsentPlatform>>) -> Self {
        let backend = match platform {
            Some(platform) => Backend::Live(platform),
            None => {
                warn!("consent platform not available; reads will return defaults");
                Backend::Unavailable
            }
        };
        Self {
            config,
            backend,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn live(config: ConsentConfig, platform: Arc<dyn ConsentPlatform>) -> Self {
        Self::new(config, Some(platform))
    }

    pub fn unavailable(config: ConsentConfig) -> Self {
        Self::new(config, None)
    }

    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn is_available(&self) -> bool {
        matches!(self.backend, Backend::Live(_))
    }

    pub fn platform_name(&self) -> &'static str {
        match &self.backend {
            Backend::Live(platform) => platform.platform_name(),
            Backend::Unavailable => "unavailable",
        }
    }

    pub fn category_code(&self, purpose: Purpose) -> &str {
        self.config.category_code(purpose)
    }

    /// Start the platform once. Later calls return immediately.
    ///
    /// Concurrent first calls may each issue a startup request.
    pub async fn initialize(&self) -> ConsentResult<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let platform = match &self.backend {
            Backend::Live(platform) => platform,
            Backend::Unavailable => return Err(ConsentError::CollaboratorUnavailable),
        };

        let cfg = &self.config;
        info!(
            domain_id = %cfg.domain_id,
            region = %cfg.region,
            language = %cfg.language,
            "initializing consent platform"
        );

        platform
            .startup(
                &cfg.domain_id,
                &cfg.app_id,
                &cfg.language,
                &cfg.startup_params(),
                STARTUP_VERBOSE,
            )
            .await
            .map_err(|source| {
                warn!(error = %source, "consent platform initialization failed");
                ConsentError::InitializationFailed { source }
            })?;

        if let Err(e) = platform
            .enable_diagnostic_logging(DiagnosticLevel::DEBUG)
            .await
        {
            debug!(error = %e, "platform diagnostic logging not enabled");
        }

        self.initialized.store(true, Ordering::Release);
        info!(platform = platform.platform_name(), "consent platform initialized");
        Ok(())
    }

    /// Whether the consent banner is still owed. Unknown counts as owed.
    pub async fn is_consent_required(&self) -> ReadOutcome<bool> {
        self.banner_pending().await
    }

    /// Whether the user has already made a consent decision. Unknown counts as no.
    pub async fn has_consent(&self) -> ReadOutcome<bool> {
        match self.banner_pending().await {
            ReadOutcome::Fresh(pending) => ReadOutcome::Fresh(!pending),
            ReadOutcome::Degraded { cause, .. } => ReadOutcome::Degraded {
                value: false,
                cause,
            },
        }
    }

    async fn banner_pending(&self) -> ReadOutcome<bool> {
        let platform = match &self.backend {
            Backend::Live(platform) => platform,
            Backend::Unavailable => {
                debug!("consent platform not available, assuming banner is owed");
                return ReadOutcome::degraded(true, DegradeCause::CollaboratorUnavailable);
            }
        };

        match platform.should_show_banner().await {
            Ok(pending) => ReadOutcome::Fresh(pending),
            Err(e) => {
                warn!(error = %e, "failed to query banner state");
                ReadOutcome::degraded(true, e)
            }
        }
    }

    /// Current per-purpose consent; defaults when anything goes wrong.
    pub async fn consent_preferences(&self) -> ReadOutcome<ConsentPreferences> {
        let platform = match &self.backend {
            Backend::Live(platform) => platform,
            Backend::Unavailable => {
                debug!("consent platform not available, using default preferences");
                return ReadOutcome::degraded(
                    ConsentPreferences::default(),
                    DegradeCause::CollaboratorUnavailable,
                );
            }
        };

        let codes = &self.config.categories;
        let (analytics, marketing, preferences) = tokio::join!(
            platform.category_status(&codes.analytics),
            platform.category_status(&codes.marketing),
            platform.category_status(&codes.preferences),
        );

        match (analytics, marketing, preferences) {
            (Ok(analytics), Ok(marketing), Ok(preferences)) => {
                ReadOutcome::Fresh(ConsentPreferences::new(
                    analytics == CATEGORY_GRANTED,
                    marketing == CATEGORY_GRANTED,
                    preferences == CATEGORY_GRANTED,
                ))
            }
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                warn!(error = %e, "failed to query consent preferences");
                ReadOutcome::degraded(ConsentPreferences::default(), e)
            }
        }
    }

    /// Preferences and consent state in one snapshot.
    pub async fn consent_status(&self) -> ReadOutcome<ConsentStatus> {
        let preferences = self.consent_preferences().await;
        let has_consent = self.has_consent().await;

        preferences
            .zip(has_consent)
            .map(|(consent_preferences, has_consent)| ConsentStatus {
                has_consent,
                consent_preferences,
            })
    }

    /// Ask the platform to show its consent banner. Best effort.
    pub async fn show_consent_banner(&self) {
        self.show_consent_banner_with(&UiOptions::default()).await
    }

    pub async fn show_consent_banner_with(&self, options: &UiOptions) {
        let Backend::Live(platform) = &self.backend else {
            info!("consent platform not available, banner not shown");
            return;
        };
        if let Err(e) = platform.show_banner(options).await {
            warn!(error = %e, "failed to show consent banner");
        }
    }

    /// Ask the platform to show its preference centre. Best effort.
    pub async fn show_consent_preferences(&self) {
        self.show_consent_preferences_with(&UiOptions::default())
            .await
    }

    pub async fn show_consent_preferences_with(&self, options: &UiOptions) {
        let Backend::Live(platform) = &self.backend else {
            info!("consent platform not available, preference center not shown");
            return;
        };
        if let Err(e) = platform.show_preference_center(options).await {
            warn!(error = %e, "failed to show preference center");
        }
    }

    /// Apply the toggleable purposes in order, then commit with the
    /// classified interaction type. `necessary` is ignored.
    pub async fn update_consent_preferences(
        &self,
        preferences: &ConsentPreferences,
    ) -> ConsentResult<InteractionType> {
        let platform = match &self.backend {
            Backend::Live(platform) => platform,
            // Fails at the first step; nothing was issued.
            Backend::Unavailable => {
                return Err(ConsentError::UpdateFailed {
                    step: WriteStep::SetCategory(Purpose::TOGGLEABLE[0]),
                    source: UpdateCause::CollaboratorUnavailable,
                })
            }
        };

        // Sequential: commit must observe every applied category.
        for purpose in Purpose::TOGGLEABLE {
            let code = self.config.category_code(purpose);
            let granted = preferences.get(purpose);
            debug!(purpose = %purpose, code, granted, "applying category consent");

            platform
                .set_category_consent(code, granted)
                .await
                .map_err(|e| update_failed(WriteStep::SetCategory(purpose), e))?;
        }

        let interaction = classify_interaction(preferences);
        platform
            .commit_consent(interaction)
            .await
            .map_err(|e| update_failed(WriteStep::Commit, e))?;

        info!(interaction = %interaction, "consent preferences updated");
        Ok(interaction)
    }

    /// Reset the modified marker, then clear persisted consent.
    ///
    /// A missing platform is a no-op.
    pub async fn reset_consent(&self) -> ConsentResult<()> {
        let Backend::Live(platform) = &self.backend else {
            info!("consent platform not available, nothing to reset");
            return Ok(());
        };

        platform
            .reset_modified_marker()
            .await
            .map_err(|e| reset_failed(WriteStep::ResetModifiedMarker, e))?;
        platform
            .clear_persisted_state()
            .await
            .map_err(|e| reset_failed(WriteStep::ClearPersistedState, e))?;

        info!("consent preferences reset");
        Ok(())
    }

    /// Raw platform status for one category code, `-1` on any failure.
    ///
    /// Initializes the client first if needed.
    pub async fn consent_status_for_category(&self, category_code: &str) -> ReadOutcome<i32> {
        if !self.is_initialized() {
            if let Err(e) = self.initialize().await {
                warn!(category = category_code, error = %e, "cannot query category");
                let cause = match e {
                    ConsentError::InitializationFailed { source } => {
                        DegradeCause::InitializationFailed(source)
                    }
                    _ => DegradeCause::CollaboratorUnavailable,
                };
                return ReadOutcome::degraded(CATEGORY_STATUS_UNKNOWN, cause);
            }
        }

        let Backend::Live(platform) = &self.backend else {
            return ReadOutcome::degraded(
                CATEGORY_STATUS_UNKNOWN,
                DegradeCause::CollaboratorUnavailable,
            );
        };

        match platform.category_status(category_code).await {
            Ok(status) => ReadOutcome::Fresh(status),
            Err(e) => {
                warn!(category = category_code, error = %e, "failed to query category status");
                ReadOutcome::degraded(CATEGORY_STATUS_UNKNOWN, e)
            }
        }
    }
}

/// Interaction type committed for a set of preferences.
pub fn classify_interaction(preferences: &ConsentPreferences) -> InteractionType {
    InteractionType::classify(preferences)
}

fn update_failed(step: WriteStep, e: crate::error::PlatformError) -> ConsentError {
    warn!(step = %step, error = %e, "consent update failed");
    ConsentError::UpdateFailed {
        step,
        source: e.into(),
    }
}

fn reset_failed(step: WriteStep, e: crate::error::PlatformError) -> ConsentError {
    warn!(step = %step, error = %e, "consent reset failed");
    ConsentError::ResetFailed { step, source: e }
}
