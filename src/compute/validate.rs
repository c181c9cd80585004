//! Per-layer validation entry points of the kernel library.
//!
//! Each function inspects metadata only and answers with a [`KernelStatus`].
//! Descriptions are prefixed with the layer that rejected the configuration.

use crate::support::KernelStatus;
use crate::tensor::DataType;

use super::layer_info::{
    ActivationFunction, ActivationLayerInfo, FullyConnectedLayerInfo, NormalizationLayerInfo, PadStrideInfo,
    PermutationVector, PoolingLayerInfo, PoolingType,
};
use super::tensor_info::{AclTensorInfo, QuantizationInfo, BATCH_DIM, CHANNEL_DIM};

type Check = Result<(), String>;

/// Output quantization the quantized softmax kernel writes with.
pub const SOFTMAX_QUANTIZED_OUTPUT: QuantizationInfo = QuantizationInfo {
    scale: 1.0 / 256.0,
    offset: 0,
};

const FLOAT_TYPES: &[DataType] = &[DataType::Float16, DataType::Float32];
const FLOAT_OR_QUANTISED_TYPES: &[DataType] = &[DataType::Float16, DataType::Float32, DataType::QuantisedAsymm8];

fn into_status(check: Check) -> KernelStatus {
    match check {
        Ok(()) => KernelStatus::ok(),
        Err(description) => KernelStatus::error(description),
    }
}

fn ensure(condition: bool, description: impl FnOnce() -> String) -> Check {
    if condition {
        Ok(())
    } else {
        Err(description())
    }
}

fn ensure_data_type(layer: &str, tensor: &AclTensorInfo, allowed: &[DataType]) -> Check {
    ensure(allowed.contains(&tensor.data_type()), || {
        format!("{}: data type {} not supported", layer, tensor.data_type())
    })
}

fn ensure_same_data_type(layer: &str, a: &AclTensorInfo, b: &AclTensorInfo) -> Check {
    ensure(a.data_type() == b.data_type(), || {
        format!("{}: data types mismatch ({} vs {})", layer, a.data_type(), b.data_type())
    })
}

fn ensure_same_shape(layer: &str, a: &AclTensorInfo, b: &AclTensorInfo) -> Check {
    ensure(a.same_shape(b), || format!("{}: shapes mismatch ({:?} vs {:?})", layer, a.dims(), b.dims()))
}

fn ensure_max_rank(layer: &str, tensor: &AclTensorInfo, max: usize) -> Check {
    ensure(tensor.num_dimensions() <= max, || {
        format!("{}: tensors with more than {} dimensions are not supported", layer, max)
    })
}

fn ensure_vector_of(layer: &str, name: &str, tensor: &AclTensorInfo, len: u32) -> Check {
    ensure(tensor.num_dimensions() == 1 && tensor.dimension(0) == len, || {
        format!("{}: {} must be a vector of {} elements, got {:?}", layer, name, len, tensor.dims())
    })
}

pub fn activation(input: &AclTensorInfo, output: &AclTensorInfo, info: &ActivationLayerInfo) -> KernelStatus {
    into_status(check_activation(input, output, info))
}

fn check_activation(input: &AclTensorInfo, output: &AclTensorInfo, info: &ActivationLayerInfo) -> Check {
    const LAYER: &str = "NEActivationLayer";
    ensure_data_type(LAYER, input, FLOAT_OR_QUANTISED_TYPES)?;
    if input.data_type() == DataType::QuantisedAsymm8 {
        ensure(
            matches!(info.activation(), ActivationFunction::BoundedRelu | ActivationFunction::LuBoundedRelu),
            || format!("{}: activation function {:?} not supported for QASYMM8", LAYER, info.activation()),
        )?;
    }
    ensure_same_data_type(LAYER, input, output)?;
    ensure_same_shape(LAYER, input, output)
}

/// Shape both inputs broadcast to, or `None` when a dimension pair is
/// neither equal nor 1.
fn broadcast_shape(a: &AclTensorInfo, b: &AclTensorInfo) -> Option<Vec<u32>> {
    let rank = a.num_dimensions().max(b.num_dimensions());
    (0..rank)
        .map(|i| match (a.dimension(i), b.dimension(i)) {
            (x, y) if x == y => Some(x),
            (1, y) => Some(y),
            (x, 1) => Some(x),
            _ => None,
        })
        .collect()
}

fn check_elementwise(layer: &str, input0: &AclTensorInfo, input1: &AclTensorInfo, output: &AclTensorInfo) -> Check {
    ensure_data_type(layer, input0, FLOAT_TYPES)?;
    ensure_same_data_type(layer, input0, input1)?;
    ensure_same_data_type(layer, input0, output)?;

    let broadcast = broadcast_shape(input0, input1)
        .ok_or_else(|| format!("{}: inputs are not broadcast compatible", layer))?;
    ensure(output.same_shape(&AclTensorInfo::new(&broadcast, output.data_type())), || {
        format!("{}: wrong output shape {:?}, expected {:?}", layer, output.dims(), broadcast)
    })
}

pub fn arithmetic_addition(input0: &AclTensorInfo, input1: &AclTensorInfo, output: &AclTensorInfo) -> KernelStatus {
    into_status(check_elementwise("NEArithmeticAddition", input0, input1, output))
}

pub fn pixel_wise_multiplication(
    input0: &AclTensorInfo,
    input1: &AclTensorInfo,
    output: &AclTensorInfo,
) -> KernelStatus {
    into_status(check_elementwise("NEPixelWiseMultiplication", input0, input1, output))
}

pub fn batch_normalization(
    input: &AclTensorInfo,
    output: &AclTensorInfo,
    mean: &AclTensorInfo,
    var: &AclTensorInfo,
    beta: &AclTensorInfo,
    gamma: &AclTensorInfo,
    epsilon: f32,
) -> KernelStatus {
    const LAYER: &str = "NEBatchNormalizationLayer";
    into_status((|| -> Check {
        ensure_data_type(LAYER, input, FLOAT_TYPES)?;
        ensure_same_data_type(LAYER, input, output)?;
        ensure_same_shape(LAYER, input, output)?;
        ensure(epsilon >= 0.0, || format!("{}: epsilon must not be negative", LAYER))?;

        let channels = input.dimension(CHANNEL_DIM);
        for (name, tensor) in [("mean", mean), ("var", var), ("beta", beta), ("gamma", gamma)] {
            ensure_same_data_type(LAYER, input, tensor)?;
            ensure_vector_of(LAYER, name, tensor, channels)?;
        }
        Ok(())
    })())
}

/// Bias element type for a given input type.
fn bias_data_type(input: DataType) -> DataType {
    match input {
        DataType::QuantisedAsymm8 => DataType::Signed32,
        other => other,
    }
}

fn check_convolution_output(
    layer: &str,
    input: &AclTensorInfo,
    weights: &AclTensorInfo,
    output: &AclTensorInfo,
    conv_info: &PadStrideInfo,
    output_channels: u32,
) -> Check {
    let (out_w, out_h) = conv_info
        .scaled_dimensions(input.dimension(0), input.dimension(1), weights.dimension(0), weights.dimension(1))
        .ok_or_else(|| format!("{}: kernel does not fit the padded input, stride is zero or padding overflows", layer))?;

    let expected = [out_w, out_h, output_channels, input.dimension(BATCH_DIM)];
    ensure(
        (0..4).all(|i| output.dimension(i) == expected[i]),
        || format!("{}: wrong output shape {:?}, expected {:?}", layer, output.dims(), expected),
    )
}

fn check_bias(layer: &str, input: &AclTensorInfo, biases: Option<&AclTensorInfo>, channels: u32) -> Check {
    if let Some(biases) = biases {
        let expected = bias_data_type(input.data_type());
        ensure(biases.data_type() == expected, || {
            format!("{}: biases must be {}, got {}", layer, expected, biases.data_type())
        })?;
        ensure_vector_of(layer, "biases", biases, channels)?;
    }
    Ok(())
}

/// Weights are `[w, h, in, out]`.
pub fn convolution(
    input: &AclTensorInfo,
    weights: &AclTensorInfo,
    biases: Option<&AclTensorInfo>,
    output: &AclTensorInfo,
    conv_info: &PadStrideInfo,
) -> KernelStatus {
    const LAYER: &str = "NEConvolutionLayer";
    into_status((|| -> Check {
        ensure_data_type(LAYER, input, FLOAT_OR_QUANTISED_TYPES)?;
        ensure_same_data_type(LAYER, input, weights)?;
        ensure_same_data_type(LAYER, input, output)?;
        ensure_max_rank(LAYER, input, 4)?;
        ensure(weights.num_dimensions() == 4, || format!("{}: weights must have 4 dimensions", LAYER))?;
        ensure(weights.dimension(2) == input.dimension(CHANNEL_DIM), || {
            format!(
                "{}: weights expect {} input channels, input has {}",
                LAYER,
                weights.dimension(2),
                input.dimension(CHANNEL_DIM)
            )
        })?;

        let output_channels = weights.dimension(3);
        check_bias(LAYER, input, biases, output_channels)?;
        check_convolution_output(LAYER, input, weights, output, conv_info, output_channels)
    })())
}

/// Weights are `[w, h, channels, multiplier]`; the output has
/// `channels * multiplier` channels.
pub fn depthwise_convolution(
    input: &AclTensorInfo,
    weights: &AclTensorInfo,
    biases: Option<&AclTensorInfo>,
    output: &AclTensorInfo,
    conv_info: &PadStrideInfo,
) -> KernelStatus {
    const LAYER: &str = "NEDepthwiseConvolutionLayer";
    into_status((|| -> Check {
        ensure_data_type(LAYER, input, FLOAT_OR_QUANTISED_TYPES)?;
        ensure_same_data_type(LAYER, input, weights)?;
        ensure_same_data_type(LAYER, input, output)?;
        ensure_max_rank(LAYER, input, 4)?;
        ensure(weights.num_dimensions() >= 3 && weights.num_dimensions() <= 4, || {
            format!("{}: weights must have 3 or 4 dimensions", LAYER)
        })?;
        ensure(weights.dimension(2) == input.dimension(CHANNEL_DIM), || {
            format!("{}: weights channel count does not match the input", LAYER)
        })?;

        let output_channels = weights
            .dimension(2)
            .checked_mul(weights.dimension(3))
            .ok_or_else(|| format!("{}: channel multiplier overflows the output channel count", LAYER))?;
        check_bias(LAYER, input, biases, output_channels)?;
        check_convolution_output(LAYER, input, weights, output, conv_info, output_channels)
    })())
}

pub fn l2_normalize(input: &AclTensorInfo, output: &AclTensorInfo) -> KernelStatus {
    const LAYER: &str = "NEL2NormalizeLayer";
    into_status((|| -> Check {
        ensure_data_type(LAYER, input, FLOAT_TYPES)?;
        ensure_same_data_type(LAYER, input, output)?;
        ensure_same_shape(LAYER, input, output)
    })())
}

pub fn normalization(input: &AclTensorInfo, output: &AclTensorInfo, info: &NormalizationLayerInfo) -> KernelStatus {
    const LAYER: &str = "NENormalizationLayer";
    into_status((|| -> Check {
        ensure_data_type(LAYER, input, FLOAT_TYPES)?;
        ensure_same_data_type(LAYER, input, output)?;
        ensure_same_shape(LAYER, input, output)?;
        ensure(info.norm_size % 2 == 1, || format!("{}: normalization size must be odd", LAYER))
    })())
}

pub fn permute(input: &AclTensorInfo, output: &AclTensorInfo, perm: &PermutationVector) -> KernelStatus {
    const LAYER: &str = "NEPermute";
    into_status((|| -> Check {
        ensure_same_data_type(LAYER, input, output)?;
        ensure(perm.is_valid() && perm.num_dimensions() == input.num_dimensions(), || {
            format!("{}: invalid permutation vector {:?} for rank {}", LAYER, perm, input.num_dimensions())
        })?;
        for src in 0..input.num_dimensions() {
            let dst = perm.get(src).unwrap_or(0) as usize;
            ensure(output.dimension(dst) == input.dimension(src), || {
                format!("{}: wrong output shape {:?}", LAYER, output.dims())
            })?;
        }
        Ok(())
    })())
}

pub fn pooling(input: &AclTensorInfo, output: &AclTensorInfo, info: &PoolingLayerInfo) -> KernelStatus {
    const LAYER: &str = "NEPoolingLayer";
    into_status((|| -> Check {
        ensure_data_type(LAYER, input, FLOAT_OR_QUANTISED_TYPES)?;
        ensure_same_data_type(LAYER, input, output)?;
        ensure(
            !(input.data_type() == DataType::QuantisedAsymm8 && info.pool_type == PoolingType::L2),
            || format!("{}: L2 pooling is not supported for QASYMM8", LAYER),
        )?;

        let pad = &info.pad_stride_info;
        ensure(
            pad.pad_left < info.pool_size_x
                && pad.pad_right < info.pool_size_x
                && pad.pad_top < info.pool_size_y
                && pad.pad_bottom < info.pool_size_y,
            || format!("{}: padding must be smaller than the pool size", LAYER),
        )?;

        let (out_w, out_h) = pad
            .scaled_dimensions(input.dimension(0), input.dimension(1), info.pool_size_x, info.pool_size_y)
            .ok_or_else(|| format!("{}: pool does not fit the padded input, stride is zero or padding overflows", LAYER))?;
        let expected = [out_w, out_h, input.dimension(CHANNEL_DIM), input.dimension(BATCH_DIM)];
        ensure((0..4).all(|i| output.dimension(i) == expected[i]), || {
            format!("{}: wrong output shape {:?}, expected {:?}", LAYER, output.dims(), expected)
        })
    })())
}

pub fn softmax(input: &AclTensorInfo, output: &AclTensorInfo, beta: f32) -> KernelStatus {
    const LAYER: &str = "NESoftmaxLayer";
    into_status((|| -> Check {
        ensure_data_type(LAYER, input, FLOAT_OR_QUANTISED_TYPES)?;
        ensure_same_data_type(LAYER, input, output)?;
        ensure_same_shape(LAYER, input, output)?;
        ensure(beta > 0.0, || format!("{}: beta must be positive", LAYER))?;
        if input.data_type() == DataType::QuantisedAsymm8 {
            ensure(output.quantization_info() == SOFTMAX_QUANTIZED_OUTPUT, || {
                format!("{}: QASYMM8 output quantization must be scale 1/256 and offset 0", LAYER)
            })?;
        }
        Ok(())
    })())
}

/// The input is flattened to `[batch, features]` with the batch outermost.
pub fn fully_connected(
    input: &AclTensorInfo,
    weights: &AclTensorInfo,
    biases: Option<&AclTensorInfo>,
    output: &AclTensorInfo,
    info: &FullyConnectedLayerInfo,
) -> KernelStatus {
    const LAYER: &str = "NEFullyConnectedLayer";
    into_status((|| -> Check {
        ensure_data_type(LAYER, input, FLOAT_TYPES)?;
        ensure_same_data_type(LAYER, input, weights)?;
        ensure_same_data_type(LAYER, input, output)?;
        ensure(weights.num_dimensions() == 2, || format!("{}: weights must have 2 dimensions", LAYER))?;

        let rank = input.num_dimensions().max(1);
        let batch = input.dimension(rank - 1);
        let features = (0..rank - 1)
            .try_fold(1u32, |acc, i| acc.checked_mul(input.dimension(i)))
            .ok_or_else(|| format!("{}: flattened input feature count overflows", LAYER))?;

        // innermost first: [outputs, inputs] unless transposed
        let (weight_inputs, outputs) = if info.transpose_weights {
            (weights.dimension(0), weights.dimension(1))
        } else {
            (weights.dimension(1), weights.dimension(0))
        };
        ensure(weight_inputs == features, || {
            format!("{}: weights expect {} inputs, input provides {}", LAYER, weight_inputs, features)
        })?;
        if let Some(biases) = biases {
            ensure_same_data_type(LAYER, input, biases)?;
            ensure_vector_of(LAYER, "biases", biases, outputs)?;
        }
        ensure(output.dimension(0) == outputs && output.dimension(1) == batch, || {
            format!("{}: wrong output shape {:?}, expected {:?}", LAYER, output.dims(), [outputs, batch])
        })
    })())
}
