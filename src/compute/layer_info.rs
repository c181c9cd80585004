//! Layer parameters in the kernel library's vocabulary, and their
//! translation from operator descriptors.

use crate::descriptors::{
    ActivationDescriptor, ActivationFunction as DescriptorFunction, Convolution2dDescriptor,
    DepthwiseConvolution2dDescriptor, FullyConnectedDescriptor, NormalizationAlgorithmChannel,
    NormalizationDescriptor, OutputShapeRounding, PaddingMethod, PermuteDescriptor, PoolingAlgorithm,
    Pooling2dDescriptor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationFunction {
    Logistic,
    Tanh,
    Relu,
    /// min(a, max(0, x))
    BoundedRelu,
    /// min(a, max(b, x))
    LuBoundedRelu,
    LeakyRelu,
    SoftRelu,
    Abs,
    Square,
    Sqrt,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationLayerInfo {
    pub function: ActivationFunction,
    pub a: f32,
    pub b: f32,
}

impl ActivationLayerInfo {
    pub fn new(function: ActivationFunction, a: f32, b: f32) -> Self {
        Self { function, a, b }
    }

    pub fn activation(&self) -> ActivationFunction {
        self.function
    }
}

pub fn convert_activation_function(function: DescriptorFunction) -> ActivationFunction {
    match function {
        DescriptorFunction::Sigmoid => ActivationFunction::Logistic,
        DescriptorFunction::TanH => ActivationFunction::Tanh,
        DescriptorFunction::Linear => ActivationFunction::Linear,
        DescriptorFunction::ReLu => ActivationFunction::Relu,
        DescriptorFunction::BoundedReLu => ActivationFunction::LuBoundedRelu,
        DescriptorFunction::SoftReLu => ActivationFunction::SoftRelu,
        DescriptorFunction::LeakyReLu => ActivationFunction::LeakyRelu,
        DescriptorFunction::Abs => ActivationFunction::Abs,
        DescriptorFunction::Sqrt => ActivationFunction::Sqrt,
        DescriptorFunction::Square => ActivationFunction::Square,
    }
}

pub fn build_activation_layer_info(descriptor: &ActivationDescriptor) -> ActivationLayerInfo {
    ActivationLayerInfo::new(convert_activation_function(descriptor.function), descriptor.a, descriptor.b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionRoundingType {
    Floor,
    Ceil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadStrideInfo {
    pub stride_x: u32,
    pub stride_y: u32,
    pub pad_left: u32,
    pub pad_right: u32,
    pub pad_top: u32,
    pub pad_bottom: u32,
    pub round: DimensionRoundingType,
}

impl PadStrideInfo {
    pub fn new(stride_x: u32, stride_y: u32) -> Self {
        Self {
            stride_x,
            stride_y,
            pad_left: 0,
            pad_right: 0,
            pad_top: 0,
            pad_bottom: 0,
            round: DimensionRoundingType::Floor,
        }
    }

    pub fn with_padding(mut self, left: u32, right: u32, top: u32, bottom: u32) -> Self {
        self.pad_left = left;
        self.pad_right = right;
        self.pad_top = top;
        self.pad_bottom = bottom;
        self
    }

    pub fn with_rounding(mut self, round: DimensionRoundingType) -> Self {
        self.round = round;
        self
    }

    /// Output width and height of a `kernel_w` x `kernel_h` window sliding
    /// over a `width` x `height` plane. `None` when the window does not fit
    /// or the padded extent does not fit in `u32`.
    pub fn scaled_dimensions(&self, width: u32, height: u32, kernel_w: u32, kernel_h: u32) -> Option<(u32, u32)> {
        let out_w = scaled(width, self.pad_left, self.pad_right, kernel_w, self.stride_x, self.round)?;
        let out_h = scaled(height, self.pad_top, self.pad_bottom, kernel_h, self.stride_y, self.round)?;
        Some((out_w, out_h))
    }
}

fn scaled(
    size: u32,
    pad_before: u32,
    pad_after: u32,
    kernel: u32,
    stride: u32,
    round: DimensionRoundingType,
) -> Option<u32> {
    if stride == 0 || kernel == 0 {
        return None;
    }
    let span = size.checked_add(pad_before)?.checked_add(pad_after)?.checked_sub(kernel)?;
    let steps = match round {
        DimensionRoundingType::Floor => span / stride,
        DimensionRoundingType::Ceil => span / stride + u32::from(span % stride != 0),
    };
    steps.checked_add(1)
}

pub fn build_convolution_pad_stride_info(descriptor: &Convolution2dDescriptor) -> PadStrideInfo {
    PadStrideInfo::new(descriptor.stride_x, descriptor.stride_y).with_padding(
        descriptor.pad_left,
        descriptor.pad_right,
        descriptor.pad_top,
        descriptor.pad_bottom,
    )
}

pub fn build_depthwise_pad_stride_info(descriptor: &DepthwiseConvolution2dDescriptor) -> PadStrideInfo {
    PadStrideInfo::new(descriptor.stride_x, descriptor.stride_y).with_padding(
        descriptor.pad_left,
        descriptor.pad_right,
        descriptor.pad_top,
        descriptor.pad_bottom,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolingType {
    Max,
    Avg,
    L2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolingLayerInfo {
    pub pool_type: PoolingType,
    pub pool_size_x: u32,
    pub pool_size_y: u32,
    pub pad_stride_info: PadStrideInfo,
    pub exclude_padding: bool,
}

pub fn build_pooling_layer_info(descriptor: &Pooling2dDescriptor) -> PoolingLayerInfo {
    let pool_type = match descriptor.pool_type {
        PoolingAlgorithm::Max => PoolingType::Max,
        PoolingAlgorithm::Average => PoolingType::Avg,
        PoolingAlgorithm::L2 => PoolingType::L2,
    };
    let round = match descriptor.output_shape_rounding {
        OutputShapeRounding::Floor => DimensionRoundingType::Floor,
        OutputShapeRounding::Ceiling => DimensionRoundingType::Ceil,
    };
    let pad_stride_info = PadStrideInfo::new(descriptor.stride_x, descriptor.stride_y)
        .with_padding(
            descriptor.pad_left,
            descriptor.pad_right,
            descriptor.pad_top,
            descriptor.pad_bottom,
        )
        .with_rounding(round);

    PoolingLayerInfo {
        pool_type,
        pool_size_x: descriptor.pool_width,
        pool_size_y: descriptor.pool_height,
        pad_stride_info,
        exclude_padding: descriptor.padding_method == PaddingMethod::Exclude,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormType {
    /// Across channels
    CrossMap,
    /// Within a single channel plane
    InMap2D,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationLayerInfo {
    pub norm_type: NormType,
    pub norm_size: u32,
    pub alpha: f32,
    pub beta: f32,
    pub kappa: f32,
}

pub fn build_normalization_layer_info(descriptor: &NormalizationDescriptor) -> NormalizationLayerInfo {
    let norm_type = match descriptor.channel_type {
        NormalizationAlgorithmChannel::Across => NormType::CrossMap,
        NormalizationAlgorithmChannel::Within => NormType::InMap2D,
    };
    NormalizationLayerInfo {
        norm_type,
        norm_size: descriptor.norm_size,
        alpha: descriptor.alpha,
        beta: descriptor.beta,
        kappa: descriptor.k,
    }
}

/// `perm[j]` is the destination of source dimension `j`, innermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermutationVector(Vec<u32>);

impl PermutationVector {
    pub fn new(perm: &[u32]) -> Self {
        Self(perm.to_vec())
    }

    pub fn num_dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    /// Every index in `0..len` appears exactly once.
    pub fn is_valid(&self) -> bool {
        let mut seen = vec![false; self.0.len()];
        self.0.iter().all(|&d| match seen.get_mut(d as usize) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        })
    }
}

/// Mappings are given outermost first; out-of-range entries are kept as
/// `u32::MAX` so validation rejects them.
pub fn build_permutation_vector(descriptor: &PermuteDescriptor) -> PermutationVector {
    let mappings = &descriptor.dim_mappings;
    let rank = mappings.len() as u32;
    let perm = mappings
        .iter()
        .rev()
        .map(|&dest| {
            dest.checked_add(1)
                .and_then(|d| rank.checked_sub(d))
                .unwrap_or(u32::MAX)
        })
        .collect();
    PermutationVector(perm)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullyConnectedLayerInfo {
    pub transpose_weights: bool,
}

pub fn build_fully_connected_layer_info(descriptor: &FullyConnectedDescriptor) -> FullyConnectedLayerInfo {
    FullyConnectedLayerInfo {
        transpose_weights: descriptor.transpose_weight_matrix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::NormalizationAlgorithmMethod;

    #[test]
    fn test_bounded_relu_uses_lower_bound() {
        let desc = ActivationDescriptor::new(DescriptorFunction::BoundedReLu).with_params(6.0, 0.0);
        let info = build_activation_layer_info(&desc);
        assert_eq!(info.activation(), ActivationFunction::LuBoundedRelu);
        assert_eq!((info.a, info.b), (6.0, 0.0));
    }

    #[test]
    fn test_scaled_dimensions() {
        let info = PadStrideInfo::new(2, 2);
        assert_eq!(info.scaled_dimensions(8, 8, 3, 3), Some((3, 3)));

        let info = info.with_rounding(DimensionRoundingType::Ceil);
        assert_eq!(info.scaled_dimensions(8, 8, 3, 3), Some((4, 4)));

        let info = PadStrideInfo::new(1, 1).with_padding(1, 1, 1, 1);
        assert_eq!(info.scaled_dimensions(8, 8, 3, 3), Some((8, 8)));
    }

    #[test]
    fn test_scaled_dimensions_overflow_is_none() {
        let info = PadStrideInfo::new(1, 1).with_padding(u32::MAX, 1, 0, 0);
        assert_eq!(info.scaled_dimensions(8, 8, 3, 3), None);

        let info = PadStrideInfo::new(1, 1).with_padding(0, 0, 0, 1);
        assert_eq!(info.scaled_dimensions(8, u32::MAX, 1, 1), None);

        // one-element window with unit stride yields span + 1 outputs
        let info = PadStrideInfo::new(1, 1);
        assert_eq!(info.scaled_dimensions(u32::MAX, 1, 1, 1), Some((u32::MAX, 1)));

        let info = PadStrideInfo::new(u32::MAX, u32::MAX).with_rounding(DimensionRoundingType::Ceil);
        assert_eq!(info.scaled_dimensions(u32::MAX, u32::MAX, 1, 1), Some((2, 2)));
    }

    #[test]
    fn test_window_larger_than_input() {
        assert_eq!(PadStrideInfo::new(1, 1).scaled_dimensions(2, 2, 3, 3), None);
        assert_eq!(PadStrideInfo::new(0, 1).scaled_dimensions(8, 8, 3, 3), None);
    }

    #[test]
    fn test_pooling_info_translation() {
        let desc = Pooling2dDescriptor::new(PoolingAlgorithm::Average, 2, 2).with_rounding(OutputShapeRounding::Ceiling);
        let info = build_pooling_layer_info(&desc);
        assert_eq!(info.pool_type, PoolingType::Avg);
        assert_eq!(info.pad_stride_info.round, DimensionRoundingType::Ceil);
        assert!(info.exclude_padding);
    }

    #[test]
    fn test_normalization_info_translation() {
        let desc = NormalizationDescriptor::new(NormalizationAlgorithmMethod::LocalBrightness, 5)
            .with_channel_type(NormalizationAlgorithmChannel::Within);
        let info = build_normalization_layer_info(&desc);
        assert_eq!(info.norm_type, NormType::InMap2D);
        assert_eq!(info.norm_size, 5);
    }

    #[test]
    fn test_permutation_is_mirrored() {
        // NCHW -> NHWC: C moves to 3, H to 1, W to 2
        let perm = build_permutation_vector(&PermuteDescriptor::new(&[0, 3, 1, 2]));
        assert_eq!(perm, PermutationVector::new(&[1, 2, 0, 3]));
        assert!(perm.is_valid());
    }

    #[test]
    fn test_invalid_permutations() {
        assert!(!build_permutation_vector(&PermuteDescriptor::new(&[0, 4, 1, 2])).is_valid());
        assert!(!PermutationVector::new(&[0, 0, 1]).is_valid());
        assert!(PermutationVector::default().is_valid());
    }
}
