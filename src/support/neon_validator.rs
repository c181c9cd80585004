//! Kernel validation backed by the compute library.

use std::ops::RangeInclusive;

use crate::compute::{self, validate, ActivationFunction, AclTensorInfo};
use crate::descriptors::{ActivationDescriptor, OperatorDescriptor, OperatorKind};
use crate::tensor::{DataType, TensorInfo};

use super::validator::KernelValidator;
use super::KernelStatus;

pub const QUANTISED_LOGISTIC_REASON: &str = "Neon: Logistic Activations unsupported with QAsymm8 data type.";

/// Translates operands and descriptors into the compute library's types and
/// runs the matching per-layer `validate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComputeKernelValidator;

impl ComputeKernelValidator {
    pub fn new() -> Self {
        Self
    }
}

/// Operands converted once, in call order.
struct Operands {
    kind: OperatorKind,
    tensors: Vec<AclTensorInfo>,
}

impl Operands {
    fn convert(kind: OperatorKind, operands: &[&TensorInfo], arity: RangeInclusive<usize>) -> Result<Self, KernelStatus> {
        if !arity.contains(&operands.len()) {
            let expected = if arity.start() == arity.end() {
                arity.start().to_string()
            } else {
                format!("{} to {}", arity.start(), arity.end())
            };
            return Err(KernelStatus::error(format!(
                "{}: expected {} operands, got {}",
                kind,
                expected,
                operands.len()
            )));
        }
        Ok(Self {
            kind,
            tensors: operands.iter().map(|info| compute::build_acl_tensor_info(info)).collect(),
        })
    }

    fn get(&self, index: usize) -> &AclTensorInfo {
        &self.tensors[index]
    }

    /// Bias tensor, required when `enabled`.
    fn biases(&self, index: usize, enabled: bool) -> Result<Option<&AclTensorInfo>, KernelStatus> {
        if !enabled {
            return Ok(None);
        }
        self.tensors
            .get(index)
            .map(Some)
            .ok_or_else(|| KernelStatus::error(format!("{}: bias enabled but no bias tensor given", self.kind)))
    }
}

/// Workload-level rule applied before the library's activation validate.
fn validate_activation(input: &AclTensorInfo, output: &AclTensorInfo, descriptor: &ActivationDescriptor) -> KernelStatus {
    let info = compute::build_activation_layer_info(descriptor);
    if input.data_type() == DataType::QuantisedAsymm8 && info.activation() == ActivationFunction::Logistic {
        return KernelStatus::error(QUANTISED_LOGISTIC_REASON);
    }
    validate::activation(input, output, &info)
}

fn run(descriptor: &OperatorDescriptor<'_>, operands: &[&TensorInfo]) -> Result<KernelStatus, KernelStatus> {
    let kind = descriptor.kind();
    let status = match descriptor {
        OperatorDescriptor::Activation(desc) => {
            let ops = Operands::convert(kind, operands, 2..=2)?;
            validate_activation(ops.get(0), ops.get(1), desc)
        }
        OperatorDescriptor::Addition => {
            let ops = Operands::convert(kind, operands, 3..=3)?;
            validate::arithmetic_addition(ops.get(0), ops.get(1), ops.get(2))
        }
        OperatorDescriptor::Multiplication => {
            let ops = Operands::convert(kind, operands, 3..=3)?;
            validate::pixel_wise_multiplication(ops.get(0), ops.get(1), ops.get(2))
        }
        OperatorDescriptor::BatchNormalization(desc) => {
            let ops = Operands::convert(kind, operands, 6..=6)?;
            validate::batch_normalization(
                ops.get(0),
                ops.get(1),
                ops.get(2),
                ops.get(3),
                ops.get(4),
                ops.get(5),
                desc.eps,
            )
        }
        OperatorDescriptor::Convolution2d(desc) => {
            let ops = Operands::convert(kind, operands, 3..=4)?;
            let biases = ops.biases(3, desc.bias_enabled)?;
            let conv_info = compute::build_convolution_pad_stride_info(desc);
            validate::convolution(ops.get(0), ops.get(2), biases, ops.get(1), &conv_info)
        }
        OperatorDescriptor::DepthwiseConvolution2d(desc) => {
            let ops = Operands::convert(kind, operands, 3..=4)?;
            let biases = ops.biases(3, desc.bias_enabled)?;
            let conv_info = compute::build_depthwise_pad_stride_info(desc);
            validate::depthwise_convolution(ops.get(0), ops.get(2), biases, ops.get(1), &conv_info)
        }
        OperatorDescriptor::FullyConnected(desc) => {
            let ops = Operands::convert(kind, operands, 3..=4)?;
            let biases = ops.biases(3, desc.bias_enabled)?;
            let info = compute::build_fully_connected_layer_info(desc);
            validate::fully_connected(ops.get(0), ops.get(2), biases, ops.get(1), &info)
        }
        OperatorDescriptor::L2Normalization => {
            let ops = Operands::convert(kind, operands, 2..=2)?;
            validate::l2_normalize(ops.get(0), ops.get(1))
        }
        OperatorDescriptor::Normalization(desc) => {
            let ops = Operands::convert(kind, operands, 2..=2)?;
            validate::normalization(ops.get(0), ops.get(1), &compute::build_normalization_layer_info(desc))
        }
        OperatorDescriptor::Permute(desc) => {
            let ops = Operands::convert(kind, operands, 2..=2)?;
            validate::permute(ops.get(0), ops.get(1), &compute::build_permutation_vector(desc))
        }
        OperatorDescriptor::Pooling2d(desc) => {
            let ops = Operands::convert(kind, operands, 2..=2)?;
            validate::pooling(ops.get(0), ops.get(1), &compute::build_pooling_layer_info(desc))
        }
        OperatorDescriptor::Softmax(desc) => {
            let ops = Operands::convert(kind, operands, 2..=2)?;
            validate::softmax(ops.get(0), ops.get(1), desc.beta)
        }
        _ => KernelStatus::error(format!("{} has no kernel validation", kind)),
    };
    Ok(status)
}

impl KernelValidator for ComputeKernelValidator {
    fn name(&self) -> &str {
        "compute"
    }

    fn validate(&self, descriptor: &OperatorDescriptor<'_>, operands: &[&TensorInfo]) -> KernelStatus {
        run(descriptor, operands).unwrap_or_else(|status| status)
    }
}
