//! Shared fixtures for layer-support and workload tests
//!
//! - One default descriptor per operator kind, so table-driven tests can
//!   build an `OperatorDescriptor` for any `OperatorKind`
//! - proptest strategies for arbitrary (possibly malformed) operands

#![allow(dead_code)]

use neonforge::descriptors::*;
use neonforge::{DataType, TensorInfo};
use proptest::prelude::*;

/// Owns one parameter value per operator kind.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    pub activation: ActivationDescriptor,
    pub batch_normalization: BatchNormalizationDescriptor,
    pub convolution: Convolution2dDescriptor,
    pub depthwise: DepthwiseConvolution2dDescriptor,
    pub fake_quantization: FakeQuantizationDescriptor,
    pub fully_connected: FullyConnectedDescriptor,
    pub lstm: LstmDescriptor,
    pub merger: OriginsDescriptor,
    pub normalization: NormalizationDescriptor,
    pub permute: PermuteDescriptor,
    pub pooling: Pooling2dDescriptor,
    pub resize_bilinear: ResizeBilinearDescriptor,
    pub softmax: SoftmaxDescriptor,
    pub splitter: ViewsDescriptor,
}

impl Default for DescriptorSet {
    fn default() -> Self {
        Self {
            activation: ActivationDescriptor::new(ActivationFunction::ReLu),
            batch_normalization: BatchNormalizationDescriptor::default(),
            convolution: Convolution2dDescriptor::new(1, 1),
            depthwise: DepthwiseConvolution2dDescriptor::new(1, 1),
            fake_quantization: FakeQuantizationDescriptor::default(),
            fully_connected: FullyConnectedDescriptor::default(),
            lstm: LstmDescriptor::default(),
            merger: OriginsDescriptor::default(),
            normalization: NormalizationDescriptor::new(NormalizationAlgorithmMethod::LocalBrightness, 5),
            permute: PermuteDescriptor::new(&[0, 2, 3, 1]),
            pooling: Pooling2dDescriptor::new(PoolingAlgorithm::Max, 2, 2),
            resize_bilinear: ResizeBilinearDescriptor::default(),
            softmax: SoftmaxDescriptor::default(),
            splitter: ViewsDescriptor::default(),
        }
    }
}

impl DescriptorSet {
    pub fn descriptor(&self, kind: OperatorKind) -> OperatorDescriptor<'_> {
        match kind {
            OperatorKind::Activation => OperatorDescriptor::Activation(&self.activation),
            OperatorKind::Addition => OperatorDescriptor::Addition,
            OperatorKind::BatchNormalization => OperatorDescriptor::BatchNormalization(&self.batch_normalization),
            OperatorKind::Constant => OperatorDescriptor::Constant,
            OperatorKind::ConvertFp16ToFp32 => OperatorDescriptor::ConvertFp16ToFp32,
            OperatorKind::ConvertFp32ToFp16 => OperatorDescriptor::ConvertFp32ToFp16,
            OperatorKind::Convolution2d => OperatorDescriptor::Convolution2d(&self.convolution),
            OperatorKind::DepthwiseConvolution2d => OperatorDescriptor::DepthwiseConvolution2d(&self.depthwise),
            OperatorKind::FakeQuantization => OperatorDescriptor::FakeQuantization(&self.fake_quantization),
            OperatorKind::Floor => OperatorDescriptor::Floor,
            OperatorKind::FullyConnected => OperatorDescriptor::FullyConnected(&self.fully_connected),
            OperatorKind::Input => OperatorDescriptor::Input,
            OperatorKind::L2Normalization => OperatorDescriptor::L2Normalization,
            OperatorKind::Lstm => OperatorDescriptor::Lstm(&self.lstm),
            OperatorKind::Merger => OperatorDescriptor::Merger(&self.merger),
            OperatorKind::Multiplication => OperatorDescriptor::Multiplication,
            OperatorKind::Normalization => OperatorDescriptor::Normalization(&self.normalization),
            OperatorKind::Output => OperatorDescriptor::Output,
            OperatorKind::Permute => OperatorDescriptor::Permute(&self.permute),
            OperatorKind::Pooling2d => OperatorDescriptor::Pooling2d(&self.pooling),
            OperatorKind::Reshape => OperatorDescriptor::Reshape,
            OperatorKind::ResizeBilinear => OperatorDescriptor::ResizeBilinear(&self.resize_bilinear),
            OperatorKind::Softmax => OperatorDescriptor::Softmax(&self.softmax),
            OperatorKind::Splitter => OperatorDescriptor::Splitter(&self.splitter),
        }
    }
}

pub fn is_conversion(kind: OperatorKind) -> bool {
    matches!(kind, OperatorKind::ConvertFp16ToFp32 | OperatorKind::ConvertFp32ToFp16)
}

pub fn data_type_strategy() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Float16),
        Just(DataType::Float32),
        Just(DataType::QuantisedAsymm8),
        Just(DataType::Signed32),
    ]
}

/// Any rank from 0 to 4, including zero-sized dimensions.
pub fn tensor_strategy() -> impl Strategy<Value = TensorInfo> {
    (prop::collection::vec(0u32..9, 0..5), data_type_strategy(), 0.0f32..2.0, -128i32..128)
        .prop_map(|(dims, data_type, scale, offset)| TensorInfo::new(&dims, data_type).with_quantization(scale, offset))
}

pub fn operands_strategy() -> impl Strategy<Value = Vec<TensorInfo>> {
    prop::collection::vec(tensor_strategy(), 0..7)
}

pub fn kind_strategy() -> impl Strategy<Value = OperatorKind> {
    prop::sample::select(OperatorKind::ALL.to_vec())
}
