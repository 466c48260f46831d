//! Consent data model shared by the client, the platform boundary and callers.

use serde::{Deserialize, Serialize};

/// Raw category status meaning "granted".
pub const CATEGORY_GRANTED: i32 = 1;

/// Sentinel returned by [`crate::ConsentClient::consent_status_for_category`] on failure.
pub const CATEGORY_STATUS_UNKNOWN: i32 = -1;

/// Logical purpose for data processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Necessary,
    Analytics,
    Marketing,
    Preferences,
}

impl Purpose {
    pub const ALL: [Purpose; 4] = [
        Purpose::Necessary,
        Purpose::Analytics,
        Purpose::Marketing,
        Purpose::Preferences,
    ];

    /// Purposes a user may toggle, in the order updates are applied.
    pub const TOGGLEABLE: [Purpose; 3] =
        [Purpose::Analytics, Purpose::Marketing, Purpose::Preferences];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Necessary => "necessary",
            Self::Analytics => "analytics",
            Self::Marketing => "marketing",
            Self::Preferences => "preferences",
        }
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-purpose consent toggles.
///
/// `necessary` is always `true` on values produced by the client; it is
/// ignored on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentPreferences {
    pub necessary: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub preferences: bool,
}

impl Default for ConsentPreferences {
    /// Privacy-safe fallback: nothing beyond necessary is granted.
    fn default() -> Self {
        Self {
            necessary: true,
            analytics: false,
            marketing: false,
            preferences: false,
        }
    }
}

impl ConsentPreferences {
    pub fn new(analytics: bool, marketing: bool, preferences: bool) -> Self {
        Self {
            necessary: true,
            analytics,
            marketing,
            preferences,
        }
    }

    pub fn allow_all() -> Self {
        Self::new(true, true, true)
    }

    pub fn reject_all() -> Self {
        Self::new(false, false, false)
    }

    pub fn get(&self, purpose: Purpose) -> bool {
        match purpose {
            Purpose::Necessary => true,
            Purpose::Analytics => self.analytics,
            Purpose::Marketing => self.marketing,
            Purpose::Preferences => self.preferences,
        }
    }
}

/// Point-in-time consent snapshot. Recomputed on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentStatus {
    pub has_consent: bool,
    pub consent_preferences: ConsentPreferences,
}

impl Default for ConsentStatus {
    fn default() -> Self {
        Self {
            has_consent: false,
            consent_preferences: ConsentPreferences::default(),
        }
    }
}

/// How the user reached their consent decision, as reported on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    AllowAll,
    RejectAll,
    Confirm,
}

impl InteractionType {
    /// Integer code understood by the platform.
    pub fn code(&self) -> i32 {
        match self {
            Self::AllowAll => 5,
            Self::RejectAll => 6,
            Self::Confirm => 7,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            5 => Some(Self::AllowAll),
            6 => Some(Self::RejectAll),
            7 => Some(Self::Confirm),
            _ => None,
        }
    }

    /// Classify the toggleable purposes. Total over all eight combinations.
    pub fn classify(preferences: &ConsentPreferences) -> Self {
        let ConsentPreferences {
            analytics,
            marketing,
            preferences,
            ..
        } = *preferences;

        if analytics && marketing && preferences {
            Self::AllowAll
        } else if !analytics && !marketing && !preferences {
            Self::RejectAll
        } else {
            Self::Confirm
        }
    }
}

impl std::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AllowAll => "allow_all",
            Self::RejectAll => "reject_all",
            Self::Confirm => "confirm",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Location parameters passed to the platform at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupParams {
    pub country_code: String,
    pub region_code: String,
}

/// Options for banner and preference-centre triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiOptions {
    /// Platform-specific UI overrides, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Verbosity for the platform's own diagnostic log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLevel(pub u8);

impl DiagnosticLevel {
    pub const DEBUG: DiagnosticLevel = DiagnosticLevel(3);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_total() {
        for bits in 0u8..8 {
            let prefs = ConsentPreferences::new(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let expected = match bits {
                7 => InteractionType::AllowAll,
                0 => InteractionType::RejectAll,
                _ => InteractionType::Confirm,
            };
            assert_eq!(InteractionType::classify(&prefs), expected, "bits={bits:03b}");
        }
    }

    #[test]
    fn test_classify_ignores_necessary() {
        let mut prefs = ConsentPreferences::reject_all();
        prefs.necessary = false;
        assert_eq!(InteractionType::classify(&prefs), InteractionType::RejectAll);
    }

    #[test]
    fn test_interaction_codes() {
        assert_eq!(InteractionType::AllowAll.code(), 5);
        assert_eq!(InteractionType::RejectAll.code(), 6);
        assert_eq!(InteractionType::Confirm.code(), 7);
        assert_eq!(InteractionType::from_code(6), Some(InteractionType::RejectAll));
        assert_eq!(InteractionType::from_code(4), None);
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let json = serde_json::to_value(ConsentStatus::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "hasConsent": false,
                "consentPreferences": {
                    "necessary": true,
                    "analytics": false,
                    "marketing": false,
                    "preferences": false
                }
            })
        );
    }

    #[test]
    fn test_ui_options_default_is_empty_object() {
        let json = serde_json::to_string(&UiOptions::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
