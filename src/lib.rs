//! neonforge - NEON backend layer support
//!
//! Answers, per operator instance, whether the NEON backend of a
//! neural-network runtime can execute it, and why not when it cannot.
//! A graph partitioner calls [`NeonLayerSupport`] for each candidate node;
//! positive answers are followed by workload construction and execution.
//!
//! ```ignore
//! use neonforge::{DataType, NeonLayerSupport, TensorInfo};
//!
//! let support = NeonLayerSupport::new();
//! let input = TensorInfo::new(&[1, 16], DataType::Float32);
//! if let Err(unsupported) = support.is_floor_supported(&input, &input) {
//!     tracing::info!(reason = unsupported.reason(), "placing Floor elsewhere");
//! }
//! ```

#[cfg(feature = "neon")]
pub mod compute;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod logging;
pub mod support;
pub mod tensor;
#[cfg(feature = "neon")]
pub mod workloads;

pub use config::LayerSupportConfig;
pub use descriptors::{OperatorDescriptor, OperatorKind};
pub use error::{ErrorCategory, ForgeResult, NeonForgeError};
pub use logging::{init_logging_default, init_logging_from_env, init_with_config, LoggingConfig};
pub use support::{
    is_direct_convolution_preferred, neon_backend_support, BackendAvailability, KernelStatus, KernelValidator,
    LstmTensors, NeonLayerSupport, Support, Unsupported,
};
pub use tensor::{DataType, TensorInfo, TensorShape};
#[cfg(feature = "neon")]
pub use workloads::Workload;
