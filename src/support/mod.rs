//! Layer-support queries for the NEON backend.
//!
//! A graph partitioner asks [`NeonLayerSupport`] whether one operator
//! instance can run on this backend. The answer is a [`Support`]: `Ok(())`
//! when supported, otherwise an [`Unsupported`] carrying a human-readable
//! reason. A negative answer is routine (try another backend) and is never
//! raised as a fault.

pub mod algorithm;
pub mod availability;
pub mod datatype;
pub mod layer_support;
#[cfg(feature = "neon")]
pub mod neon_validator;
pub mod status;
pub mod table;
pub mod validator;

pub use algorithm::{is_direct_convolution_preferred, select_convolution_method, ConvolutionMethod};
pub use availability::{neon_backend_support, BackendAvailability, NEON_UNAVAILABLE_REASON};
pub use datatype::{DataTypeMatrix, DataTypeRule};
pub use layer_support::{LstmTensors, NeonLayerSupport};
#[cfg(feature = "neon")]
pub use neon_validator::ComputeKernelValidator;
pub use status::{ErrorCode, KernelStatus};
pub use table::{strategy_for, CapabilityTable, ValidationStrategy};
pub use validator::{default_validator, forward_workload_validate, KernelValidator, UnavailableKernelValidator};

/// Negative capability answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct Unsupported {
    reason: String,
}

impl Unsupported {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn into_reason(self) -> String {
        self.reason
    }
}

/// Answer of a capability query.
pub type Support = Result<(), Unsupported>;

/// Shorthand for a negative answer.
pub(crate) fn unsupported(reason: impl Into<String>) -> Support {
    Err(Unsupported::new(reason))
}
