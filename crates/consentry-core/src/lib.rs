//! Client-side façade over a consent-management platform SDK.
//!
//! This crate provides:
//!
//! - [`ConsentClient`] - one-time initialization, total status reads and
//!   consent updates against a platform
//! - [`ConsentPlatform`] - the platform boundary, implemented by the SDK
//!   binding (or [`MemoryPlatform`] in tests and the CLI)
//! - [`ConsentConfig`] - tenant configuration (YAML file or environment)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use consentry_core::{ConsentClient, ConsentConfig, ConsentPreferences, MemoryPlatform};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ConsentConfig::load("consentry.yaml")?;
//! let client = ConsentClient::live(config, Arc::new(MemoryPlatform::new()));
//!
//! client.initialize().await?;
//! let status = client.consent_status().await.into_value();
//! if !status.has_consent {
//!     client.show_consent_banner().await;
//! }
//!
//! client
//!     .update_consent_preferences(&ConsentPreferences::new(true, false, true))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failure policy
//!
//! Reads never fail: they return a [`ReadOutcome`] whose value is the
//! platform's answer or a privacy-safe default. Initialization, updates and
//! resets return [`ConsentResult`] so a caller never mistakes an unsaved
//! decision for a saved one.

pub mod client;
pub mod config;
pub mod error;
pub mod outcome;
pub mod platform;
pub mod types;

pub use client::{classify_interaction, ConsentClient};
pub use config::{CategoryCodes, ConsentConfig};
pub use error::{
    ConfigError, ConsentError, ConsentResult, PlatformError, PlatformResult, UpdateCause,
    WriteStep,
};
pub use outcome::{DegradeCause, ReadOutcome};
pub use platform::{
    ConsentPlatform, MemoryPlatform, PlatformCall, PlatformOp, PlatformSnapshot,
    TracingPlatform,
};
pub use types::{
    ConsentPreferences, ConsentStatus, DiagnosticLevel, InteractionType, Purpose,
    StartupParams, UiOptions, CATEGORY_GRANTED, CATEGORY_STATUS_UNKNOWN,
};
