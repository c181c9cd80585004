//! Bridge between capability queries and the kernel library's validation.
//!
//! The kernel library answers with a [`KernelStatus`]; this module turns it
//! into a [`Support`] without touching the description text.

use std::fmt;
use std::sync::Arc;

use crate::descriptors::OperatorDescriptor;
use crate::tensor::TensorInfo;

use super::availability::NEON_UNAVAILABLE_REASON;
use super::{ErrorCode, KernelStatus, Support};

/// The kernel library's validation entry point.
///
/// `operands` are in the order of the matching `NeonLayerSupport` method
/// (inputs first, then outputs, then parameter tensors).
pub trait KernelValidator: Send + Sync + fmt::Debug {
    /// Identifier used in logs (e.g. "compute", "unavailable").
    fn name(&self) -> &str;

    fn validate(&self, descriptor: &OperatorDescriptor<'_>, operands: &[&TensorInfo]) -> KernelStatus;
}

/// Stand-in for builds without the kernel library.
///
/// Reports the standard unavailable reason for every layer. Capability
/// queries never reach it while the backend is disabled because the
/// availability gate answers first.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableKernelValidator;

impl KernelValidator for UnavailableKernelValidator {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn validate(&self, _descriptor: &OperatorDescriptor<'_>, _operands: &[&TensorInfo]) -> KernelStatus {
        KernelStatus::error(NEON_UNAVAILABLE_REASON)
    }
}

/// Run the kernel library's validation and translate its status.
pub fn forward_workload_validate(
    validator: &dyn KernelValidator,
    descriptor: &OperatorDescriptor<'_>,
    operands: &[&TensorInfo],
) -> Support {
    let status = validator.validate(descriptor, operands);
    if status.error_code() == ErrorCode::RuntimeError {
        tracing::trace!(
            validator = validator.name(),
            kind = %descriptor.kind(),
            description = status.error_description(),
            "kernel validation failed"
        );
    }
    status.into()
}

/// Validator matching this build: the compute library when the `neon`
/// feature is enabled, the unavailable stand-in otherwise.
pub fn default_validator() -> Arc<dyn KernelValidator> {
    #[cfg(feature = "neon")]
    {
        Arc::new(super::ComputeKernelValidator::new())
    }

    #[cfg(not(feature = "neon"))]
    {
        Arc::new(UnavailableKernelValidator)
    }
}
