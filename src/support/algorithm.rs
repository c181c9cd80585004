//! Kernel algorithm heuristics, consulted after support is established.

use crate::descriptors::Convolution2dDescriptor;
use crate::tensor::{DataType, TensorInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolutionMethod {
    /// Point-wise kernel without padding and with bias
    Direct,
    /// General (im2col + GEMM) path
    General,
}

/// Whether the direct convolution kernel should run this convolution.
///
/// The direct kernel is only implemented for Float32 1x1 weights with
/// strides in 1..=3, zero padding and a bias tensor.
pub fn is_direct_convolution_preferred(weights: &TensorInfo, descriptor: &Convolution2dDescriptor) -> bool {
    let data_type_supported = weights.data_type() == DataType::Float32;

    let stride_supported = (1..=3).contains(&descriptor.stride_x) && (1..=3).contains(&descriptor.stride_y);

    let padded = descriptor.pad_left > 0
        || descriptor.pad_right > 0
        || descriptor.pad_top > 0
        || descriptor.pad_bottom > 0;

    // [out, in, h, w]
    let shape = weights.shape();
    let size_and_padding_supported = shape.dim(2) == Some(1) && shape.dim(3) == Some(1) && !padded;

    data_type_supported && stride_supported && size_and_padding_supported && descriptor.bias_enabled
}

pub fn select_convolution_method(weights: &TensorInfo, descriptor: &Convolution2dDescriptor) -> ConvolutionMethod {
    let method = if is_direct_convolution_preferred(weights, descriptor) {
        ConvolutionMethod::Direct
    } else {
        ConvolutionMethod::General
    };
    tracing::trace!(?method, weights = %weights.shape(), "selected convolution method");
    method
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointwise_weights() -> TensorInfo {
        TensorInfo::new(&[16, 8, 1, 1], DataType::Float32)
    }

    fn unit_descriptor() -> Convolution2dDescriptor {
        Convolution2dDescriptor::new(1, 1).with_bias(true)
    }

    #[test]
    fn test_pointwise_with_bias_is_direct() {
        assert!(is_direct_convolution_preferred(&pointwise_weights(), &unit_descriptor()));
        assert_eq!(
            select_convolution_method(&pointwise_weights(), &unit_descriptor()),
            ConvolutionMethod::Direct
        );
    }

    #[test]
    fn test_missing_bias_is_not_direct() {
        let desc = unit_descriptor().with_bias(false);
        assert!(!is_direct_convolution_preferred(&pointwise_weights(), &desc));
    }

    #[test]
    fn test_3x3_kernel_is_not_direct() {
        let weights = TensorInfo::new(&[16, 8, 3, 3], DataType::Float32);
        assert!(!is_direct_convolution_preferred(&weights, &unit_descriptor()));
    }

    #[test]
    fn test_stride_limits() {
        for stride in 1..=3 {
            let desc = Convolution2dDescriptor::new(stride, stride).with_bias(true);
            assert!(is_direct_convolution_preferred(&pointwise_weights(), &desc));
        }
        let desc = Convolution2dDescriptor::new(4, 4).with_bias(true);
        assert!(!is_direct_convolution_preferred(&pointwise_weights(), &desc));

        let desc = Convolution2dDescriptor::new(1, 4).with_bias(true);
        assert!(!is_direct_convolution_preferred(&pointwise_weights(), &desc));
    }

    #[test]
    fn test_any_padding_disables_direct() {
        for padding in [(1, 0, 0, 0), (0, 1, 0, 0), (0, 0, 1, 0), (0, 0, 0, 1)] {
            let desc = unit_descriptor().with_padding(padding.0, padding.1, padding.2, padding.3);
            assert!(!is_direct_convolution_preferred(&pointwise_weights(), &desc));
        }
    }

    #[test]
    fn test_non_float32_weights_are_not_direct() {
        let weights = TensorInfo::new(&[16, 8, 1, 1], DataType::Float16);
        assert!(!is_direct_convolution_preferred(&weights, &unit_descriptor()));

        let weights = TensorInfo::new(&[16, 8, 1, 1], DataType::QuantisedAsymm8);
        assert_eq!(
            select_convolution_method(&weights, &unit_descriptor()),
            ConvolutionMethod::General
        );
    }

    #[test]
    fn test_low_rank_weights_are_not_direct() {
        let weights = TensorInfo::new(&[1, 1], DataType::Float32);
        assert!(!is_direct_convolution_preferred(&weights, &unit_descriptor()));
    }
}
