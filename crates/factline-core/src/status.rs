//! Service status snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Configuration state of one external provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub configured: bool,
    pub required: bool,
}

impl ProviderStatus {
    pub fn new(name: impl Into<String>, configured: bool, required: bool) -> Self {
        Self {
            name: name.into(),
            configured,
            required,
        }
    }
}

/// Which providers a fact-checker instance can use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub version: String,
    pub model: String,
    pub providers: Vec<ProviderStatus>,
    pub checked_at: DateTime<Utc>,
}

impl ServiceStatus {
    /// Operational when every required provider is configured.
    pub fn is_operational(&self) -> bool {
        self.providers
            .iter()
            .filter(|p| p.required)
            .all(|p| p.configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operational_ignores_optional_providers() {
        let status = ServiceStatus {
            version: "0.1.0".into(),
            model: "gemini-2.5-flash".into(),
            providers: vec![
                ProviderStatus::new("Google Gemini", true, true),
                ProviderStatus::new("NewsAPI", false, false),
            ],
            checked_at: Utc::now(),
        };
        assert!(status.is_operational());
    }

    #[test]
    fn test_missing_required_provider() {
        let status = ServiceStatus {
            version: "0.1.0".into(),
            model: "gemini-2.5-flash".into(),
            providers: vec![ProviderStatus::new("Google Gemini", false, true)],
            checked_at: Utc::now(),
        };
        assert!(!status.is_operational());
    }
}
