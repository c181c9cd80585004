//! Capability table: how each operator kind is validated on this backend.

use crate::descriptors::OperatorKind;

use super::DataTypeMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStrategy {
    /// Forward to the kernel library
    Native,
    /// Decided by the element type of the first operand
    DataType(DataTypeMatrix),
    /// QAsymm8 input is rejected, everything else goes to the kernel library
    FullyConnected,
    /// Descriptor pre-check, then the kernel library
    Normalization,
    /// No kernel exists on this backend
    Unimplemented,
    /// Supported for any operands, without consulting backend availability
    AlwaysSupported,
}

impl ValidationStrategy {
    /// Whether the backend availability gate runs before this strategy.
    pub fn is_gated(&self) -> bool {
        !matches!(self, ValidationStrategy::AlwaysSupported)
    }

    /// Whether this strategy may reach the kernel library.
    pub fn uses_kernel_validation(&self) -> bool {
        matches!(
            self,
            ValidationStrategy::Native | ValidationStrategy::FullyConnected | ValidationStrategy::Normalization
        )
    }
}

pub fn strategy_for(kind: OperatorKind) -> ValidationStrategy {
    use ValidationStrategy::*;

    match kind {
        OperatorKind::Activation
        | OperatorKind::Addition
        | OperatorKind::BatchNormalization
        | OperatorKind::Convolution2d
        | OperatorKind::DepthwiseConvolution2d
        | OperatorKind::L2Normalization
        | OperatorKind::Multiplication
        | OperatorKind::Permute
        | OperatorKind::Pooling2d
        | OperatorKind::Softmax => Native,

        OperatorKind::Constant
        | OperatorKind::Input
        | OperatorKind::Output
        | OperatorKind::Reshape
        | OperatorKind::Splitter
        | OperatorKind::Merger => DataType(DataTypeMatrix::FLOAT_OR_QUANTISED),

        OperatorKind::Floor => DataType(DataTypeMatrix::FLOAT32_ONLY),

        OperatorKind::FullyConnected => FullyConnected,
        OperatorKind::Normalization => Normalization,

        OperatorKind::Lstm | OperatorKind::FakeQuantization | OperatorKind::ResizeBilinear => Unimplemented,

        // TODO: confirm whether the conversions should respect backend availability
        OperatorKind::ConvertFp16ToFp32 | OperatorKind::ConvertFp32ToFp16 => AlwaysSupported,
    }
}

/// Read-only view over every (kind, strategy) pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapabilityTable;

impl CapabilityTable {
    pub fn entries() -> impl Iterator<Item = (OperatorKind, ValidationStrategy)> {
        OperatorKind::ALL.iter().map(|&kind| (kind, strategy_for(kind)))
    }

    pub fn kinds_with(strategy: ValidationStrategy) -> Vec<OperatorKind> {
        Self::entries()
            .filter(|(_, s)| *s == strategy)
            .map(|(kind, _)| kind)
            .collect()
    }
}
