//! Span-per-call decorator for any [`ConsentPlatform`].

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info_span, Instrument};

use super::{ConsentPlatform, PlatformOp};
use crate::error::PlatformResult;
use crate::types::{DiagnosticLevel, InteractionType, StartupParams, UiOptions};

/// Wraps a platform and records one `consent.platform.call` span per call.
pub struct TracingPlatform {
    inner: Arc<dyn ConsentPlatform>,
}

impl TracingPlatform {
    pub fn new(inner: Arc<dyn ConsentPlatform>) -> Self {
        Self { inner }
    }

    async fn traced<T, F>(
        &self,
        op: PlatformOp,
        category: Option<&str>,
        call: F,
    ) -> PlatformResult<T>
    where
        F: Future<Output = PlatformResult<T>>,
    {
        let span = info_span!(
            "consent.platform.call",
            "consent.op" = op.as_str(),
            "consent.platform" = self.inner.platform_name(),
            "consent.category" = tracing::field::Empty,
            "error" = tracing::field::Empty,
            "error.message" = tracing::field::Empty
        );
        if let Some(code) = category {
            span.record("consent.category", code);
        }

        async move {
            let result = call.await;
            if let Err(e) = &result {
                let span = tracing::Span::current();
                span.record("error", true);
                span.record("error.message", e.to_string().as_str());
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl ConsentPlatform for TracingPlatform {
    async fn startup(
        &self,
        domain_id: &str,
        app_id: &str,
        language: &str,
        params: &StartupParams,
        verbose: bool,
    ) -> PlatformResult<()> {
        self.traced(
            PlatformOp::Startup,
            None,
            self.inner.startup(domain_id, app_id, language, params, verbose),
        )
        .await
    }

    async fn enable_diagnostic_logging(&self, level: DiagnosticLevel) -> PlatformResult<()> {
        self.traced(
            PlatformOp::EnableDiagnosticLogging,
            None,
            self.inner.enable_diagnostic_logging(level),
        )
        .await
    }

    async fn should_show_banner(&self) -> PlatformResult<bool> {
        self.traced(
            PlatformOp::ShouldShowBanner,
            None,
            self.inner.should_show_banner(),
        )
        .await
    }

    async fn category_status(&self, category_code: &str) -> PlatformResult<i32> {
        self.traced(
            PlatformOp::CategoryStatus,
            Some(category_code),
            self.inner.category_status(category_code),
        )
        .await
    }

    async fn set_category_consent(
        &self,
        category_code: &str,
        granted: bool,
    ) -> PlatformResult<()> {
        self.traced(
            PlatformOp::SetCategoryConsent,
            Some(category_code),
            self.inner.set_category_consent(category_code, granted),
        )
        .await
    }

    async fn commit_consent(&self, interaction: InteractionType) -> PlatformResult<()> {
        self.traced(
            PlatformOp::CommitConsent,
            None,
            self.inner.commit_consent(interaction),
        )
        .await
    }

    async fn show_banner(&self, options: &UiOptions) -> PlatformResult<()> {
        self.traced(PlatformOp::ShowBanner, None, self.inner.show_banner(options))
            .await
    }

    async fn show_preference_center(&self, options: &UiOptions) -> PlatformResult<()> {
        self.traced(
            PlatformOp::ShowPreferenceCenter,
            None,
            self.inner.show_preference_center(options),
        )
        .await
    }

    async fn reset_modified_marker(&self) -> PlatformResult<()> {
        self.traced(
            PlatformOp::ResetModifiedMarker,
            None,
            self.inner.reset_modified_marker(),
        )
        .await
    }

    async fn clear_persisted_state(&self) -> PlatformResult<()> {
        self.traced(
            PlatformOp::ClearPersistedState,
            None,
            self.inner.clear_persisted_state(),
        )
        .await
    }

    fn platform_name(&self) -> &'static str {
        self.inner.platform_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::platform::MemoryPlatform;

    #[tokio::test]
    async fn test_passes_results_through() {
        let inner = Arc::new(MemoryPlatform::new());
        let traced = TracingPlatform::new(inner.clone());

        let params = StartupParams {
            country_code: "EU".into(),
            region_code: "EU".into(),
        };
        traced.startup("d", "a", "en", &params, true).await.unwrap();
        assert!(traced.should_show_banner().await.unwrap());
        assert_eq!(traced.platform_name(), "memory");
        assert_eq!(inner.count(PlatformOp::Startup).await, 1);
    }

    #[tokio::test]
    async fn test_passes_errors_through() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let inner = Arc::new(
            MemoryPlatform::new()
                .fail_on(PlatformOp::CommitConsent)
                .started(),
        );
        let traced = TracingPlatform::new(inner);

        let err = traced
            .commit_consent(InteractionType::RejectAll)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Native { .. }));
    }
}
