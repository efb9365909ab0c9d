//! Client settings for the Systems Manager connection.
//!
//! Every field is optional; anything left unset falls back to the ambient
//! AWS configuration chain (environment, shared config files, IMDS).

use serde::{Deserialize, Serialize};

/// Environment variable prefix for setting overrides.
pub const ENV_PREFIX: &str = "SSM_ASSOCIATION";

/// Connection settings handed to the SDK client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSettings {
    /// AWS region (e.g. `eu-west-1`).
    #[serde(default)]
    pub region: Option<String>,
    /// Named profile from the shared AWS config.
    #[serde(default)]
    pub profile: Option<String>,
    /// Endpoint override, for local emulators or VPC endpoints.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Maximum attempts per remote call, including the first.
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Per-operation timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Creates empty settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            region: None,
            profile: None,
            endpoint_url: None,
            max_attempts: None,
            timeout_secs: None,
        }
    }

    /// Sets the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the endpoint override.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let yaml = r"
region: eu-west-1
max_attempts: 5
timeout_secs: 30
";
        let settings: ClientSettings = serde_yaml::from_str(yaml).expect("valid settings");
        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
        assert_eq!(settings.max_attempts, Some(5));
        assert_eq!(settings.timeout_secs, Some(30));
        assert!(settings.profile.is_none());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<ClientSettings, _> = serde_yaml::from_str("regoin: eu-west-1");
        assert!(result.is_err());
    }

    #[test]
    fn test_builders() {
        let settings = ClientSettings::new()
            .with_region("us-east-1")
            .with_endpoint_url("http://localhost:4566");
        assert_eq!(settings.region.as_deref(), Some("us-east-1"));
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }
}
