//! The kernel library's tensor metadata.
//!
//! Dimensions are stored innermost first: an NCHW activation becomes
//! `[W, H, C, N]` and `[out, in, h, w]` weights become `[w, h, in, out]`.
//! Dimensions beyond the rank read as 1.

use std::fmt;

use crate::tensor::{DataType, TensorInfo};

/// Channel dimension of an activation tensor.
pub const CHANNEL_DIM: usize = 2;
/// Batch dimension of an activation tensor.
pub const BATCH_DIM: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuantizationInfo {
    pub scale: f32,
    pub offset: i32,
}

impl QuantizationInfo {
    pub fn new(scale: f32, offset: i32) -> Self {
        Self { scale, offset }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AclTensorInfo {
    dims: Vec<u32>,
    data_type: DataType,
    quantization: QuantizationInfo,
}

impl AclTensorInfo {
    /// `dims` innermost first.
    pub fn new(dims: &[u32], data_type: DataType) -> Self {
        Self {
            dims: dims.to_vec(),
            data_type,
            quantization: QuantizationInfo::default(),
        }
    }

    pub fn with_quantization(mut self, quantization: QuantizationInfo) -> Self {
        self.quantization = quantization;
        self
    }

    pub fn dimension(&self, index: usize) -> u32 {
        self.dims.get(index).copied().unwrap_or(1)
    }

    pub fn num_dimensions(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[u32] {
        &self.dims
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn quantization_info(&self) -> QuantizationInfo {
        self.quantization
    }

    /// Shapes match when every dimension matches, with missing trailing
    /// dimensions read as 1.
    pub fn same_shape(&self, other: &AclTensorInfo) -> bool {
        let rank = self.num_dimensions().max(other.num_dimensions());
        (0..rank).all(|i| self.dimension(i) == other.dimension(i))
    }
}

impl fmt::Display for AclTensorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.dims, self.data_type)
    }
}

/// Translate a tensor descriptor into the kernel library's representation.
pub fn build_acl_tensor_info(info: &TensorInfo) -> AclTensorInfo {
    let dims: Vec<u32> = info.shape().dims().iter().rev().copied().collect();
    AclTensorInfo::new(&dims, info.data_type()).with_quantization(QuantizationInfo::new(
        info.quantization_scale(),
        info.quantization_offset(),
    ))
}
