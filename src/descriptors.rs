//! Operator descriptors: the parameter set of one operator instance.
//!
//! [`OperatorDescriptor`] borrows one of the parameter structs below and
//! [`OperatorKind`] is its payload-free tag, used to key the capability table.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationFunction {
    Sigmoid,
    TanH,
    Linear,
    ReLu,
    /// min(a, max(b, x))
    BoundedReLu,
    SoftReLu,
    LeakyReLu,
    Abs,
    Sqrt,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationDescriptor {
    pub function: ActivationFunction,
    /// Alpha upper bound value used by some activation functions
    pub a: f32,
    /// Beta lower bound value used by some activation functions
    pub b: f32,
}

impl ActivationDescriptor {
    pub fn new(function: ActivationFunction) -> Self {
        Self { function, a: 0.0, b: 0.0 }
    }

    pub fn with_params(mut self, a: f32, b: f32) -> Self {
        self.a = a;
        self.b = b;
        self
    }
}

impl Default for ActivationDescriptor {
    fn default() -> Self {
        Self::new(ActivationFunction::Sigmoid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Convolution2dDescriptor {
    pub pad_left: u32,
    pub pad_right: u32,
    pub pad_top: u32,
    pub pad_bottom: u32,
    pub stride_x: u32,
    pub stride_y: u32,
    pub bias_enabled: bool,
}

impl Convolution2dDescriptor {
    pub fn new(stride_x: u32, stride_y: u32) -> Self {
        Self {
            stride_x,
            stride_y,
            ..Self::default()
        }
    }

    /// Left, right, top, bottom.
    pub fn with_padding(mut self, left: u32, right: u32, top: u32, bottom: u32) -> Self {
        self.pad_left = left;
        self.pad_right = right;
        self.pad_top = top;
        self.pad_bottom = bottom;
        self
    }

    pub fn with_bias(mut self, bias_enabled: bool) -> Self {
        self.bias_enabled = bias_enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthwiseConvolution2dDescriptor {
    pub pad_left: u32,
    pub pad_right: u32,
    pub pad_top: u32,
    pub pad_bottom: u32,
    pub stride_x: u32,
    pub stride_y: u32,
    pub bias_enabled: bool,
}

impl DepthwiseConvolution2dDescriptor {
    pub fn new(stride_x: u32, stride_y: u32) -> Self {
        Self {
            stride_x,
            stride_y,
            ..Self::default()
        }
    }

    pub fn with_padding(mut self, left: u32, right: u32, top: u32, bottom: u32) -> Self {
        self.pad_left = left;
        self.pad_right = right;
        self.pad_top = top;
        self.pad_bottom = bottom;
        self
    }

    pub fn with_bias(mut self, bias_enabled: bool) -> Self {
        self.bias_enabled = bias_enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchNormalizationDescriptor {
    pub eps: f32,
}

impl Default for BatchNormalizationDescriptor {
    fn default() -> Self {
        Self { eps: 0.0001 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolingAlgorithm {
    Max,
    Average,
    L2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputShapeRounding {
    Floor,
    Ceiling,
}

/// How padded elements take part in average pooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingMethod {
    /// Padding elements count towards the divisor
    IgnoreValue,
    /// Padding elements are excluded from the divisor
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pooling2dDescriptor {
    pub pool_type: PoolingAlgorithm,
    pub pad_left: u32,
    pub pad_right: u32,
    pub pad_top: u32,
    pub pad_bottom: u32,
    pub pool_width: u32,
    pub pool_height: u32,
    pub stride_x: u32,
    pub stride_y: u32,
    pub output_shape_rounding: OutputShapeRounding,
    pub padding_method: PaddingMethod,
}

impl Pooling2dDescriptor {
    pub fn new(pool_type: PoolingAlgorithm, pool_width: u32, pool_height: u32) -> Self {
        Self {
            pool_type,
            pad_left: 0,
            pad_right: 0,
            pad_top: 0,
            pad_bottom: 0,
            pool_width,
            pool_height,
            stride_x: pool_width,
            stride_y: pool_height,
            output_shape_rounding: OutputShapeRounding::Floor,
            padding_method: PaddingMethod::Exclude,
        }
    }

    pub fn with_stride(mut self, stride_x: u32, stride_y: u32) -> Self {
        self.stride_x = stride_x;
        self.stride_y = stride_y;
        self
    }

    pub fn with_padding(mut self, left: u32, right: u32, top: u32, bottom: u32) -> Self {
        self.pad_left = left;
        self.pad_right = right;
        self.pad_top = top;
        self.pad_bottom = bottom;
        self
    }

    pub fn with_rounding(mut self, rounding: OutputShapeRounding) -> Self {
        self.output_shape_rounding = rounding;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftmaxDescriptor {
    pub beta: f32,
}

impl Default for SoftmaxDescriptor {
    fn default() -> Self {
        Self { beta: 1.0 }
    }
}

/// `dim_mappings[i]` is the destination dimension of source dimension `i`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermuteDescriptor {
    pub dim_mappings: Vec<u32>,
}

impl PermuteDescriptor {
    pub fn new(dim_mappings: &[u32]) -> Self {
        Self {
            dim_mappings: dim_mappings.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationAlgorithmChannel {
    Across,
    Within,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationAlgorithmMethod {
    /// Krichevsky 2012: Local Brightness Normalization
    LocalBrightness,
    /// Jarret 2009: Local Contrast Normalization
    LocalContrast,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationDescriptor {
    pub channel_type: NormalizationAlgorithmChannel,
    pub method_type: NormalizationAlgorithmMethod,
    pub norm_size: u32,
    pub alpha: f32,
    pub beta: f32,
    pub k: f32,
}

impl NormalizationDescriptor {
    pub fn new(method_type: NormalizationAlgorithmMethod, norm_size: u32) -> Self {
        Self {
            method_type,
            norm_size,
            ..Self::default()
        }
    }

    pub fn with_channel_type(mut self, channel_type: NormalizationAlgorithmChannel) -> Self {
        self.channel_type = channel_type;
        self
    }
}

impl Default for NormalizationDescriptor {
    fn default() -> Self {
        Self {
            channel_type: NormalizationAlgorithmChannel::Across,
            method_type: NormalizationAlgorithmMethod::LocalBrightness,
            norm_size: 0,
            alpha: 0.0,
            beta: 0.0,
            k: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullyConnectedDescriptor {
    pub bias_enabled: bool,
    /// Weights are stored `[outputs, inputs]` instead of `[inputs, outputs]`
    pub transpose_weight_matrix: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LstmDescriptor {
    pub activation_func: u32,
    pub clipping_thres_cell: f32,
    pub clipping_thres_proj: f32,
    pub cifg_enabled: bool,
    pub peephole_enabled: bool,
    pub projection_enabled: bool,
}

/// Merger (concatenation) descriptor: the origin of each input view inside the output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OriginsDescriptor {
    pub view_origins: Vec<Vec<u32>>,
}

/// Splitter descriptor: origin and size of each output view inside the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewsDescriptor {
    pub origins: OriginsDescriptor,
    pub view_sizes: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeQuantizationDescriptor {
    pub min: f32,
    pub max: f32,
}

impl Default for FakeQuantizationDescriptor {
    fn default() -> Self {
        Self { min: -6.0, max: 6.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeBilinearDescriptor {
    pub target_width: u32,
    pub target_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Activation,
    Addition,
    BatchNormalization,
    Constant,
    ConvertFp16ToFp32,
    ConvertFp32ToFp16,
    Convolution2d,
    DepthwiseConvolution2d,
    FakeQuantization,
    Floor,
    FullyConnected,
    Input,
    L2Normalization,
    Lstm,
    Merger,
    Multiplication,
    Normalization,
    Output,
    Permute,
    Pooling2d,
    Reshape,
    ResizeBilinear,
    Softmax,
    Splitter,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 24] = [
        OperatorKind::Activation,
        OperatorKind::Addition,
        OperatorKind::BatchNormalization,
        OperatorKind::Constant,
        OperatorKind::ConvertFp16ToFp32,
        OperatorKind::ConvertFp32ToFp16,
        OperatorKind::Convolution2d,
        OperatorKind::DepthwiseConvolution2d,
        OperatorKind::FakeQuantization,
        OperatorKind::Floor,
        OperatorKind::FullyConnected,
        OperatorKind::Input,
        OperatorKind::L2Normalization,
        OperatorKind::Lstm,
        OperatorKind::Merger,
        OperatorKind::Multiplication,
        OperatorKind::Normalization,
        OperatorKind::Output,
        OperatorKind::Permute,
        OperatorKind::Pooling2d,
        OperatorKind::Reshape,
        OperatorKind::ResizeBilinear,
        OperatorKind::Softmax,
        OperatorKind::Splitter,
    ];
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The parameters of one operator instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorDescriptor<'a> {
    Activation(&'a ActivationDescriptor),
    Addition,
    BatchNormalization(&'a BatchNormalizationDescriptor),
    Constant,
    ConvertFp16ToFp32,
    ConvertFp32ToFp16,
    Convolution2d(&'a Convolution2dDescriptor),
    DepthwiseConvolution2d(&'a DepthwiseConvolution2dDescriptor),
    FakeQuantization(&'a FakeQuantizationDescriptor),
    Floor,
    FullyConnected(&'a FullyConnectedDescriptor),
    Input,
    L2Normalization,
    Lstm(&'a LstmDescriptor),
    Merger(&'a OriginsDescriptor),
    Multiplication,
    Normalization(&'a NormalizationDescriptor),
    Output,
    Permute(&'a PermuteDescriptor),
    Pooling2d(&'a Pooling2dDescriptor),
    Reshape,
    ResizeBilinear(&'a ResizeBilinearDescriptor),
    Softmax(&'a SoftmaxDescriptor),
    Splitter(&'a ViewsDescriptor),
}

impl OperatorDescriptor<'_> {
    pub fn kind(&self) -> OperatorKind {
        match self {
            OperatorDescriptor::Activation(_) => OperatorKind::Activation,
            OperatorDescriptor::Addition => OperatorKind::Addition,
            OperatorDescriptor::BatchNormalization(_) => OperatorKind::BatchNormalization,
            OperatorDescriptor::Constant => OperatorKind::Constant,
            OperatorDescriptor::ConvertFp16ToFp32 => OperatorKind::ConvertFp16ToFp32,
            OperatorDescriptor::ConvertFp32ToFp16 => OperatorKind::ConvertFp32ToFp16,
            OperatorDescriptor::Convolution2d(_) => OperatorKind::Convolution2d,
            OperatorDescriptor::DepthwiseConvolution2d(_) => OperatorKind::DepthwiseConvolution2d,
            OperatorDescriptor::FakeQuantization(_) => OperatorKind::FakeQuantization,
            OperatorDescriptor::Floor => OperatorKind::Floor,
            OperatorDescriptor::FullyConnected(_) => OperatorKind::FullyConnected,
            OperatorDescriptor::Input => OperatorKind::Input,
            OperatorDescriptor::L2Normalization => OperatorKind::L2Normalization,
            OperatorDescriptor::Lstm(_) => OperatorKind::Lstm,
            OperatorDescriptor::Merger(_) => OperatorKind::Merger,
            OperatorDescriptor::Multiplication => OperatorKind::Multiplication,
            OperatorDescriptor::Normalization(_) => OperatorKind::Normalization,
            OperatorDescriptor::Output => OperatorKind::Output,
            OperatorDescriptor::Permute(_) => OperatorKind::Permute,
            OperatorDescriptor::Pooling2d(_) => OperatorKind::Pooling2d,
            OperatorDescriptor::Reshape => OperatorKind::Reshape,
            OperatorDescriptor::ResizeBilinear(_) => OperatorKind::ResizeBilinear,
            OperatorDescriptor::Softmax(_) => OperatorKind::Softmax,
            OperatorDescriptor::Splitter(_) => OperatorKind::Splitter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_kind_tags() {
        let activation = ActivationDescriptor::new(ActivationFunction::ReLu);
        assert_eq!(
            OperatorDescriptor::Activation(&activation).kind(),
            OperatorKind::Activation
        );
        assert_eq!(OperatorDescriptor::Floor.kind(), OperatorKind::Floor);

        let views = ViewsDescriptor::default();
        assert_eq!(OperatorDescriptor::Splitter(&views).kind(), OperatorKind::Splitter);
    }

    #[test]
    fn test_pooling_defaults_to_non_overlapping_windows() {
        let desc = Pooling2dDescriptor::new(PoolingAlgorithm::Max, 2, 3);
        assert_eq!((desc.stride_x, desc.stride_y), (2, 3));
        assert_eq!(desc.output_shape_rounding, OutputShapeRounding::Floor);
    }

    #[test]
    fn test_all_kinds_are_distinct() {
        let kinds: std::collections::HashSet<_> = OperatorKind::ALL.iter().collect();
        assert_eq!(kinds.len(), 24);
        assert_eq!(OperatorKind::ResizeBilinear.to_string(), "ResizeBilinear");
    }
}
