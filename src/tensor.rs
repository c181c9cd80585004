//! Tensor descriptors consumed by capability queries.
//!
//! These are plain values: capability queries read them and never mutate
//! them. Shapes are stored outermost dimension first (NCHW for activations,
//! `[out_channels, in_channels, height, width]` for convolution weights).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Float16,
    Float32,
    QuantisedAsymm8,
    Signed32,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Float16 => write!(f, "Float16"),
            DataType::Float32 => write!(f, "Float32"),
            DataType::QuantisedAsymm8 => write!(f, "QuantisedAsymm8"),
            DataType::Signed32 => write!(f, "Signed32"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TensorShape(Vec<u32>);

impl TensorShape {
    pub fn new(dims: &[u32]) -> Self {
        Self(dims.to_vec())
    }

    pub fn num_dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn dims(&self) -> &[u32] {
        &self.0
    }

    /// Dimension `index`, outermost first. Out-of-range indices read as `None`.
    pub fn dim(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    /// `None` when the element count does not fit in `usize`.
    pub fn num_elements(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
    }
}

impl From<Vec<u32>> for TensorShape {
    fn from(dims: Vec<u32>) -> Self {
        Self(dims)
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Shape, element type and (for quantized tensors) scale/offset of one operand.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorInfo {
    shape: TensorShape,
    data_type: DataType,
    quantization_scale: f32,
    quantization_offset: i32,
}

impl TensorInfo {
    pub fn new(dims: &[u32], data_type: DataType) -> Self {
        Self {
            shape: TensorShape::new(dims),
            data_type,
            quantization_scale: 0.0,
            quantization_offset: 0,
        }
    }

    pub fn with_quantization(mut self, scale: f32, offset: i32) -> Self {
        self.quantization_scale = scale;
        self.quantization_offset = offset;
        self
    }

    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn quantization_scale(&self) -> f32 {
        self.quantization_scale
    }

    pub fn quantization_offset(&self) -> i32 {
        self.quantization_offset
    }

    pub fn num_dimensions(&self) -> usize {
        self.shape.num_dimensions()
    }

    pub fn num_elements(&self) -> Option<usize> {
        self.shape.num_elements()
    }

    pub fn is_quantized(&self) -> bool {
        self.data_type == DataType::QuantisedAsymm8
    }
}
