//! Configuration for [`NeonLayerSupport`](crate::support::NeonLayerSupport)
//!
//! Read once when the layer-support object is built; queries never consult
//! the environment.

use crate::error::{ForgeResult, NeonForgeError};
use crate::support::BackendAvailability;

/// Environment variable toggling debug events for negative answers
const LOG_UNSUPPORTED_ENV: &str = "NEONFORGE_LOG_UNSUPPORTED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSupportConfig {
    /// Backend availability reported by the gate (defaults to the build)
    pub availability: BackendAvailability,

    /// Emit a `debug` event with the reason for every negative answer
    pub log_unsupported: bool,
}

impl Default for LayerSupportConfig {
    fn default() -> Self {
        LayerSupportConfig {
            availability: BackendAvailability::BUILD,
            log_unsupported: true,
        }
    }
}

impl LayerSupportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the backend as unavailable regardless of the build.
    pub fn with_backend_disabled(mut self) -> Self {
        self.availability = BackendAvailability::Disabled;
        self
    }

    pub fn with_log_unsupported(mut self, log_unsupported: bool) -> Self {
        self.log_unsupported = log_unsupported;
        self
    }

    /// Default configuration overridden by `NEONFORGE_LOG_UNSUPPORTED`.
    pub fn from_env() -> ForgeResult<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(LOG_UNSUPPORTED_ENV) {
            config.log_unsupported = parse_flag(&value).ok_or_else(|| {
                NeonForgeError::InvalidConfiguration(format!(
                    "{} must be a boolean, got '{}'",
                    LOG_UNSUPPORTED_ENV, value
                ))
            })?;
        }
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_follows_build() {
        let config = LayerSupportConfig::default();
        assert_eq!(config.availability, BackendAvailability::BUILD);
        assert!(config.log_unsupported);
    }

    #[test]
    fn test_builder() {
        let config = LayerSupportConfig::new()
            .with_backend_disabled()
            .with_log_unsupported(false);
        assert_eq!(config.availability, BackendAvailability::Disabled);
        assert!(!config.log_unsupported);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(LOG_UNSUPPORTED_ENV, "false");
        let config = LayerSupportConfig::from_env().unwrap();
        assert!(!config.log_unsupported);

        std::env::set_var(LOG_UNSUPPORTED_ENV, "sometimes");
        let err = LayerSupportConfig::from_env().unwrap_err();
        assert!(err.is_user_error());

        std::env::remove_var(LOG_UNSUPPORTED_ENV);
        assert!(LayerSupportConfig::from_env().unwrap().log_unsupported);
    }
}
