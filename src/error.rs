//! Unified error handling for neonforge
//!
//! Capability queries never fail: a negative answer is an ordinary value
//! (see [`crate::support::Unsupported`]). This module covers the other error
//! class, faults raised while constructing or configuring workloads:
//! - Contract violations (a workload built from operands that never passed
//!   validation; fatal, never retried)
//! - User errors (invalid configuration)
//! - Internal errors (bugs, logging setup failures)

use std::fmt;

use crate::tensor::DataType;

/// Unified error type for neonforge
#[derive(Debug, thiserror::Error)]
pub enum NeonForgeError {
    // ========== Contract Violations ==========
    /// Workload constructed with the wrong number of inputs or outputs
    #[error("{workload}: expected {expected_inputs} input(s) and {expected_outputs} output(s), got {actual_inputs} and {actual_outputs}")]
    InvalidOperandCount {
        workload: String,
        expected_inputs: usize,
        expected_outputs: usize,
        actual_inputs: usize,
        actual_outputs: usize,
    },

    /// Workload operand has an element type the kernel cannot run
    #[error("{workload}: expected {expected} data, got {actual}")]
    DataTypeMismatch {
        workload: String,
        expected: DataType,
        actual: DataType,
    },

    /// Any other broken precondition of workload construction
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    // ========== Configuration Errors ==========
    /// Invalid layer-support or logging configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // ========== Internal Errors ==========
    /// Internal error (indicates a bug)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl NeonForgeError {
    /// Categorize the error for handling decisions
    pub fn category(&self) -> ErrorCategory {
        match self {
            NeonForgeError::InvalidOperandCount { .. }
            | NeonForgeError::DataTypeMismatch { .. }
            | NeonForgeError::ContractViolation(_) => ErrorCategory::Contract,

            NeonForgeError::InvalidConfiguration(_) => ErrorCategory::User,

            NeonForgeError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Contract violations and internal errors are programmer errors.
    ///
    /// A fatal error must be reported and the operation abandoned; retrying
    /// with the same inputs can only fail the same way.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Contract | ErrorCategory::Internal
        )
    }

    /// Check if this is a user-facing error (actionable by users)
    pub fn is_user_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::User)
    }
}

/// Error category for handling decisions
///
/// - Contract: a caller broke a precondition (e.g. skipped validation)
/// - User: fix the configuration
/// - Internal: log and report as bug
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Contract violation - caller bug, never retried
    Contract,
    /// User error - invalid input or configuration
    User,
    /// Internal error - indicates a bug in this crate
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Contract => write!(f, "Contract"),
            ErrorCategory::User => write!(f, "User"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}

// Helper type alias for Results using NeonForgeError
pub type ForgeResult<T> = std::result::Result<T, NeonForgeError>;

/// Create a contract-violation error with context
///
/// # Examples
/// ```ignore
/// return Err(contract_violation!("{} has no bound output", name));
/// ```
#[macro_export]
macro_rules! contract_violation {
    ($msg:expr) => {
        $crate::error::NeonForgeError::ContractViolation($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NeonForgeError::ContractViolation(format!($fmt, $($arg)*))
    };
}

/// Create an internal error with context
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::NeonForgeError::InternalError($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NeonForgeError::InternalError(format!($fmt, $($arg)*))
    };
}
