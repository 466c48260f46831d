//! In-process consent platform.
//!
//! Behaves like the native SDK closely enough to exercise the client:
//! toggles are staged until committed, the banner is owed until the first
//! commit, and clearing persisted state makes it owed again. Faults and raw
//! status values can be injected, and every call is recorded.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{ConsentPlatform, PlatformOp};
use crate::error::{PlatformError, PlatformResult};
use crate::types::{
    DiagnosticLevel, InteractionType, StartupParams, UiOptions, CATEGORY_GRANTED,
};

const NOT_GRANTED: i32 = 0;

/// A recorded boundary call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Startup {
        domain_id: String,
        app_id: String,
        language: String,
        params: StartupParams,
        verbose: bool,
    },
    EnableDiagnosticLogging(DiagnosticLevel),
    ShouldShowBanner,
    CategoryStatus(String),
    SetCategoryConsent(String, bool),
    CommitConsent(InteractionType),
    ShowBanner,
    ShowPreferenceCenter,
    ResetModifiedMarker,
    ClearPersistedState,
}

impl PlatformCall {
    pub fn op(&self) -> PlatformOp {
        match self {
            Self::Startup { .. } => PlatformOp::Startup,
            Self::EnableDiagnosticLogging(_) => PlatformOp::EnableDiagnosticLogging,
            Self::ShouldShowBanner => PlatformOp::ShouldShowBanner,
            Self::CategoryStatus(_) => PlatformOp::CategoryStatus,
            Self::SetCategoryConsent(..) => PlatformOp::SetCategoryConsent,
            Self::CommitConsent(_) => PlatformOp::CommitConsent,
            Self::ShowBanner => PlatformOp::ShowBanner,
            Self::ShowPreferenceCenter => PlatformOp::ShowPreferenceCenter,
            Self::ResetModifiedMarker => PlatformOp::ResetModifiedMarker,
            Self::ClearPersistedState => PlatformOp::ClearPersistedState,
        }
    }
}

/// Persisted platform state.
///
/// Startup state is not persisted; every process starts the SDK again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSnapshot {
    /// Committed consent per category code.
    #[serde(default)]
    pub consents: BTreeMap<String, bool>,

    #[serde(default = "default_banner_pending")]
    pub banner_pending: bool,

    #[serde(default)]
    pub last_interaction: Option<InteractionType>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub banner_shown: u32,

    #[serde(default)]
    pub preference_center_shown: u32,
}

fn default_banner_pending() -> bool {
    true
}

impl Default for PlatformSnapshot {
    fn default() -> Self {
        Self {
            consents: BTreeMap::new(),
            banner_pending: default_banner_pending(),
            last_interaction: None,
            updated_at: None,
            banner_shown: 0,
            preference_center_shown: 0,
        }
    }
}

#[derive(Debug, Default)]
struct PlatformState {
    started: bool,
    diagnostic_level: Option<DiagnosticLevel>,
    persisted: PlatformSnapshot,
    staged: BTreeMap<String, bool>,
    calls: Vec<PlatformCall>,
}

/// Simulated consent platform.
#[derive(Debug)]
pub struct MemoryPlatform {
    state: Mutex<PlatformState>,
    failing: HashSet<PlatformOp>,
    raw_statuses: HashMap<String, i32>,
    diagnostics_supported: bool,
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::from_snapshot(PlatformSnapshot::default())
    }

    pub fn from_snapshot(snapshot: PlatformSnapshot) -> Self {
        Self {
            state: Mutex::new(PlatformState {
                persisted: snapshot,
                ..PlatformState::default()
            }),
            failing: HashSet::new(),
            raw_statuses: HashMap::new(),
            diagnostics_supported: true,
        }
    }

    /// Load a snapshot file, or start empty if it does not exist.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "no platform snapshot, starting empty");
            return Ok(Self::new());
        }
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read platform snapshot {}", path.display()))?;
        let snapshot: PlatformSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse platform snapshot {}", path.display()))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the snapshot to a temp file, then rename it over `path`.
    pub async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.snapshot().await)?;
        let temp_path = path.with_extension("tmp");

        tokio::fs::write(&temp_path, json)
            .await
            .with_context(|| format!("failed to write temp file {}", temp_path.display()))?;
        tokio::fs::rename(&temp_path, path)
            .await
            .with_context(|| format!("failed to replace platform snapshot {}", path.display()))
    }

    /// Make every call of `op` fail with a native error.
    pub fn fail_on(mut self, op: PlatformOp) -> Self {
        self.failing.insert(op);
        self
    }

    /// Report `status` for `category_code` regardless of stored consent.
    pub fn with_raw_status(mut self, category_code: impl Into<String>, status: i32) -> Self {
        self.raw_statuses.insert(category_code.into(), status);
        self
    }

    /// Behave like an SDK build without diagnostic logging.
    pub fn without_diagnostics(mut self) -> Self {
        self.diagnostics_supported = false;
        self
    }

    /// Treat the SDK as already started.
    pub fn started(mut self) -> Self {
        self.state.get_mut().started = true;
        self
    }

    pub async fn snapshot(&self) -> PlatformSnapshot {
        self.state.lock().await.persisted.clone()
    }

    pub async fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn count(&self, op: PlatformOp) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.op() == op)
            .count()
    }

    pub async fn is_started(&self) -> bool {
        self.state.lock().await.started
    }

    pub async fn diagnostic_level(&self) -> Option<DiagnosticLevel> {
        self.state.lock().await.diagnostic_level
    }

    fn check_fault(&self, op: PlatformOp) -> PlatformResult<()> {
        if self.failing.contains(&op) {
            return Err(PlatformError::native(op.as_str(), "injected failure"));
        }
        Ok(())
    }

    /// Record the call, then apply fault injection and the started check.
    fn enter(
        &self,
        state: &mut PlatformState,
        call: PlatformCall,
        requires_start: bool,
    ) -> PlatformResult<()> {
        let op = call.op();
        state.calls.push(call);
        self.check_fault(op)?;
        if requires_start && !state.started {
            return Err(PlatformError::NotStarted);
        }
        Ok(())
    }
}

#[async_trait]
impl ConsentPlatform for MemoryPlatform {
    async fn startup(
        &self,
        domain_id: &str,
        app_id: &str,
        language: &str,
        params: &StartupParams,
        verbose: bool,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock().await;
        let call = PlatformCall::Startup {
            domain_id: domain_id.to_string(),
            app_id: app_id.to_string(),
            language: language.to_string(),
            params: params.clone(),
            verbose,
        };
        self.enter(&mut state, call, false)?;
        state.started = true;
        Ok(())
    }

    async fn enable_diagnostic_logging(&self, level: DiagnosticLevel) -> PlatformResult<()> {
        let mut state = self.state.lock().await;
        self.enter(&mut state, PlatformCall::EnableDiagnosticLogging(level), false)?;
        if !self.diagnostics_supported {
            return Err(PlatformError::Unsupported {
                op: PlatformOp::EnableDiagnosticLogging.as_str(),
            });
        }
        state.diagnostic_level = Some(level);
        Ok(())
    }

    async fn should_show_banner(&self) -> PlatformResult<bool> {
        let mut state = self.state.lock().await;
        self.enter(&mut state, PlatformCall::ShouldShowBanner, true)?;
        Ok(state.persisted.banner_pending)
    }

    async fn category_status(&self, category_code: &str) -> PlatformResult<i32> {
        let mut state = self.state.lock().await;
        let call = PlatformCall::CategoryStatus(category_code.to_string());
        self.enter(&mut state, call, true)?;

        if let Some(raw) = self.raw_statuses.get(category_code) {
            return Ok(*raw);
        }
        Ok(match state.persisted.consents.get(category_code) {
            Some(true) => CATEGORY_GRANTED,
            _ => NOT_GRANTED,
        })
    }

    async fn set_category_consent(
        &self,
        category_code: &str,
        granted: bool,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock().await;
        let call = PlatformCall::SetCategoryConsent(category_code.to_string(), granted);
        self.enter(&mut state, call, true)?;
        state.staged.insert(category_code.to_string(), granted);
        Ok(())
    }

    async fn commit_consent(&self, interaction: InteractionType) -> PlatformResult<()> {
        let mut state = self.state.lock().await;
        self.enter(&mut state, PlatformCall::CommitConsent(interaction), true)?;

        let staged = std::mem::take(&mut state.staged);
        let persisted = &mut state.persisted;
        persisted.consents.extend(staged);
        persisted.banner_pending = false;
        persisted.last_interaction = Some(interaction);
        persisted.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn show_banner(&self, _options: &UiOptions) -> PlatformResult<()> {
        let mut state = self.state.lock().await;
        self.enter(&mut state, PlatformCall::ShowBanner, true)?;
        state.persisted.banner_shown += 1;
        Ok(())
    }

    async fn show_preference_center(&self, _options: &UiOptions) -> PlatformResult<()> {
        let mut state = self.state.lock().await;
        self.enter(&mut state, PlatformCall::ShowPreferenceCenter, true)?;
        state.persisted.preference_center_shown += 1;
        Ok(())
    }

    async fn reset_modified_marker(&self) -> PlatformResult<()> {
        let mut state = self.state.lock().await;
        self.enter(&mut state, PlatformCall::ResetModifiedMarker, true)?;
        state.staged.clear();
        Ok(())
    }

    async fn clear_persisted_state(&self) -> PlatformResult<()> {
        let mut state = self.state.lock().await;
        self.enter(&mut state, PlatformCall::ClearPersistedState, true)?;
        state.persisted = PlatformSnapshot {
            updated_at: Some(Utc::now()),
            ..PlatformSnapshot::default()
        };
        Ok(())
    }

    fn platform_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StartupParams {
        StartupParams {
            country_code: "EU".into(),
            region_code: "EU".into(),
        }
    }

    #[tokio::test]
    async fn test_requires_startup() {
        let platform = MemoryPlatform::new();
        let err = platform.should_show_banner().await.unwrap_err();
        assert_eq!(err, PlatformError::NotStarted);

        platform.startup("d", "a", "en", &params(), true).await.unwrap();
        assert!(platform.should_show_banner().await.unwrap());
    }

    #[tokio::test]
    async fn test_staged_until_commit() {
        let platform = MemoryPlatform::new().started();
        platform.set_category_consent("C0002", true).await.unwrap();
        assert_eq!(platform.category_status("C0002").await.unwrap(), 0);

        platform
            .commit_consent(InteractionType::Confirm)
            .await
            .unwrap();
        assert_eq!(platform.category_status("C0002").await.unwrap(), 1);
        assert!(!platform.should_show_banner().await.unwrap());

        let snapshot = platform.snapshot().await;
        assert_eq!(snapshot.last_interaction, Some(InteractionType::Confirm));
        assert!(snapshot.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_reset_discards_staged_and_clear_wipes() {
        let platform = MemoryPlatform::new().started();
        platform.set_category_consent("C0002", true).await.unwrap();
        platform
            .commit_consent(InteractionType::AllowAll)
            .await
            .unwrap();
        platform.set_category_consent("C0003", true).await.unwrap();

        platform.reset_modified_marker().await.unwrap();
        platform
            .commit_consent(InteractionType::Confirm)
            .await
            .unwrap();
        assert_eq!(platform.category_status("C0003").await.unwrap(), 0);

        platform.clear_persisted_state().await.unwrap();
        assert_eq!(platform.category_status("C0002").await.unwrap(), 0);
        assert!(platform.should_show_banner().await.unwrap());
    }

    #[tokio::test]
    async fn test_fault_injection_is_recorded() {
        let platform = MemoryPlatform::new()
            .started()
            .fail_on(PlatformOp::CategoryStatus);
        let err = platform.category_status("C0002").await.unwrap_err();
        assert!(matches!(err, PlatformError::Native { op: "category_status", .. }));
        assert_eq!(platform.count(PlatformOp::CategoryStatus).await, 1);
    }

    #[tokio::test]
    async fn test_diagnostics_unsupported() {
        let platform = MemoryPlatform::new().without_diagnostics();
        let err = platform
            .enable_diagnostic_logging(DiagnosticLevel::DEBUG)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Unsupported { .. }));
        assert_eq!(platform.diagnostic_level().await, None);
    }

    #[tokio::test]
    async fn test_snapshot_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let platform = MemoryPlatform::load(&path).await.unwrap().started();
        platform.set_category_consent("C0004", true).await.unwrap();
        platform
            .commit_consent(InteractionType::Confirm)
            .await
            .unwrap();
        platform.save(&path).await.unwrap();

        assert!(!path.with_extension("tmp").exists());

        let reloaded = MemoryPlatform::load(&path).await.unwrap();
        assert!(!reloaded.is_started().await);
        let reloaded = reloaded.started();
        assert_eq!(reloaded.category_status("C0004").await.unwrap(), 1);
        assert!(!reloaded.should_show_banner().await.unwrap());
    }
}
