//! Tenant configuration for the consent platform.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CONSENTRY_DOMAIN_ID` | Platform domain identifier |
//! | `CONSENTRY_APP_ID` | Platform application identifier |
//! | `CONSENTRY_REGION` | Region, used as both country and region code at startup (default: `EU`) |
//! | `CONSENTRY_LANGUAGE` | UI language (default: `en`) |

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Purpose, StartupParams};

/// Mapping from logical purpose to the platform's category code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCodes {
    #[serde(default = "default_necessary_code")]
    pub necessary: String,

    #[serde(default = "default_analytics_code")]
    pub analytics: String,

    #[serde(default = "default_marketing_code")]
    pub marketing: String,

    #[serde(default = "default_preferences_code")]
    pub preferences: String,
}

fn default_necessary_code() -> String {
    "C0001".to_string()
}

fn default_analytics_code() -> String {
    "C0002".to_string()
}

fn default_marketing_code() -> String {
    "C0003".to_string()
}

fn default_preferences_code() -> String {
    "C0004".to_string()
}

impl Default for CategoryCodes {
    fn default() -> Self {
        Self {
            necessary: default_necessary_code(),
            analytics: default_analytics_code(),
            marketing: default_marketing_code(),
            preferences: default_preferences_code(),
        }
    }
}

impl CategoryCodes {
    pub fn code(&self, purpose: Purpose) -> &str {
        match purpose {
            Purpose::Necessary => &self.necessary,
            Purpose::Analytics => &self.analytics,
            Purpose::Marketing => &self.marketing,
            Purpose::Preferences => &self.preferences,
        }
    }

    /// Reverse lookup from a platform code to its purpose.
    pub fn purpose(&self, code: &str) -> Option<Purpose> {
        Purpose::ALL.into_iter().find(|p| self.code(*p) == code)
    }
}

/// Consent platform tenant configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentConfig {
    /// Platform domain identifier.
    pub domain_id: String,

    /// Platform application identifier.
    pub app_id: String,

    /// Region, e.g. "EU".
    #[serde(default = "default_region")]
    pub region: String,

    /// UI language, e.g. "en".
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub categories: CategoryCodes,
}

fn default_region() -> String {
    "EU".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl ConsentConfig {
    pub fn new(domain_id: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            domain_id: domain_id.into(),
            app_id: app_id.into(),
            region: default_region(),
            language: default_language(),
            categories: CategoryCodes::default(),
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&raw)?;
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Build a config entirely from environment variables.
    ///
    /// `CONSENTRY_DOMAIN_ID` and `CONSENTRY_APP_ID` are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain_id = std::env::var("CONSENTRY_DOMAIN_ID")
            .map_err(|_| ConfigError::invalid("CONSENTRY_DOMAIN_ID is not set"))?;
        let app_id = std::env::var("CONSENTRY_APP_ID")
            .map_err(|_| ConfigError::invalid("CONSENTRY_APP_ID is not set"))?;
        let config = Self::new(domain_id, app_id).with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `CONSENTRY_*` variables when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        if let Some(v) = var("CONSENTRY_DOMAIN_ID") {
            self.domain_id = v;
        }
        if let Some(v) = var("CONSENTRY_APP_ID") {
            self.app_id = v;
        }
        if let Some(v) = var("CONSENTRY_REGION") {
            self.region = v;
        }
        if let Some(v) = var("CONSENTRY_LANGUAGE") {
            self.language = v;
        }
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_categories(mut self, categories: CategoryCodes) -> Self {
        self.categories = categories;
        self
    }

    pub fn category_code(&self, purpose: Purpose) -> &str {
        self.categories.code(purpose)
    }

    /// The region doubles as country and region code.
    pub fn startup_params(&self) -> StartupParams {
        StartupParams {
            country_code: self.region.clone(),
            region_code: self.region.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("domain_id", &self.domain_id),
            ("app_id", &self.app_id),
            ("region", &self.region),
            ("language", &self.language),
        ];
        for (name, value) in fields {
            let value = value.trim();
            if value.is_empty() {
                return Err(ConfigError::invalid(format!("'{}' must not be empty", name)));
            }
            if value.starts_with('<') && value.ends_with('>') {
                return Err(ConfigError::invalid(format!(
                    "'{}' still holds the placeholder {}",
                    name, value
                )));
            }
        }

        let mut seen = HashSet::new();
        for purpose in Purpose::ALL {
            let code = self.category_code(purpose);
            if code.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "category code for '{}' must not be empty",
                    purpose
                )));
            }
            if !seen.insert(code) {
                return Err(ConfigError::invalid(format!(
                    "category code '{}' is assigned to more than one purpose",
                    code
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_yaml_defaults() {
        let cfg = ConsentConfig::from_yaml_str("domain_id: d-123\napp_id: a-456\n").unwrap();
        assert_eq!(cfg.region, "EU");
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.category_code(Purpose::Necessary), "C0001");
        assert_eq!(cfg.category_code(Purpose::Preferences), "C0004");
    }

    #[test]
    fn test_yaml_partial_categories() {
        let yaml = r#"
domain_id: d-123
app_id: a-456
region: US
categories:
  marketing: C0009
"#;
        let cfg = ConsentConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.category_code(Purpose::Marketing), "C0009");
        assert_eq!(cfg.category_code(Purpose::Analytics), "C0002");
        assert_eq!(
            cfg.startup_params(),
            StartupParams {
                country_code: "US".into(),
                region_code: "US".into()
            }
        );
    }

    #[test]
    fn test_rejects_placeholder() {
        let err = ConsentConfig::new("<your-domain-id>", "a").validate().unwrap_err();
        assert!(err.to_string().contains("placeholder"), "{err}");
    }

    #[test]
    fn test_rejects_duplicate_codes() {
        let cfg = ConsentConfig::new("d", "a").with_categories(CategoryCodes {
            analytics: "C0003".into(),
            ..CategoryCodes::default()
        });
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("C0003"), "{err}");
    }

    #[test]
    fn test_builders_feed_startup_params() {
        let cfg = ConsentConfig::new("d", "a")
            .with_region("DE")
            .with_language("de");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.language, "de");
        assert_eq!(cfg.startup_params().country_code, "DE");
        assert_eq!(cfg.startup_params().region_code, "DE");
    }

    #[test]
    fn test_reverse_lookup() {
        let codes = CategoryCodes::default();
        assert_eq!(codes.purpose("C0003"), Some(Purpose::Marketing));
        assert_eq!(codes.purpose("C9999"), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConsentConfig::load("/nonexistent/consentry.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("CONSENTRY_REGION", "CA");
        std::env::set_var("CONSENTRY_LANGUAGE", "");
        let cfg = ConsentConfig::new("d", "a").with_env_overrides();
        std::env::remove_var("CONSENTRY_REGION");
        std::env::remove_var("CONSENTRY_LANGUAGE");

        assert_eq!(cfg.region, "CA");
        assert_eq!(cfg.language, "en");
    }

    #[test]
    #[serial]
    fn test_from_env_requires_ids() {
        std::env::remove_var("CONSENTRY_DOMAIN_ID");
        std::env::remove_var("CONSENTRY_APP_ID");
        assert!(ConsentConfig::from_env().is_err());

        std::env::set_var("CONSENTRY_DOMAIN_ID", "d-env");
        std::env::set_var("CONSENTRY_APP_ID", "a-env");
        let cfg = ConsentConfig::from_env();
        std::env::remove_var("CONSENTRY_DOMAIN_ID");
        std::env::remove_var("CONSENTRY_APP_ID");

        let cfg = cfg.unwrap();
        assert_eq!(cfg.domain_id, "d-env");
        assert_eq!(cfg.app_id, "a-env");
    }
}
