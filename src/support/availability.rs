//! Whether the NEON kernel library is linked into this build.

use super::{unsupported, Support};

pub const NEON_UNAVAILABLE_REASON: &str = "The library has been built without NEON support";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendAvailability {
    Enabled,
    Disabled,
}

impl BackendAvailability {
    /// Fixed by the `neon` cargo feature for the lifetime of the process.
    pub const BUILD: BackendAvailability = if cfg!(feature = "neon") {
        BackendAvailability::Enabled
    } else {
        BackendAvailability::Disabled
    };

    pub fn is_enabled(self) -> bool {
        self == BackendAvailability::Enabled
    }

    pub fn check(self) -> Support {
        match self {
            BackendAvailability::Enabled => Ok(()),
            BackendAvailability::Disabled => unsupported(NEON_UNAVAILABLE_REASON),
        }
    }
}

impl Default for BackendAvailability {
    fn default() -> Self {
        Self::BUILD
    }
}

/// Build-time availability of the backend.
pub fn neon_backend_support() -> Support {
    BackendAvailability::BUILD.check()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_reports_standard_reason() {
        let err = BackendAvailability::Disabled.check().unwrap_err();
        assert_eq!(err.reason(), NEON_UNAVAILABLE_REASON);
    }

    #[test]
    fn test_enabled_has_no_reason() {
        assert!(BackendAvailability::Enabled.check().is_ok());
    }

    #[test]
    #[cfg(feature = "neon")]
    fn test_build_availability_with_neon() {
        assert_eq!(BackendAvailability::BUILD, BackendAvailability::Enabled);
        assert!(neon_backend_support().is_ok());
    }

    #[test]
    #[cfg(not(feature = "neon"))]
    fn test_build_availability_without_neon() {
        assert_eq!(BackendAvailability::BUILD, BackendAvailability::Disabled);
        assert_eq!(
            neon_backend_support().unwrap_err().reason(),
            NEON_UNAVAILABLE_REASON
        );
    }
}
