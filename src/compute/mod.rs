//! CPU kernel library backing the NEON workloads.
//!
//! Metadata types use the library's own conventions (dimensions innermost
//! first, its own layer-info vocabulary); [`tensor_info`] and
//! [`layer_info`] translate from the crate's descriptors.

pub mod kernels;
pub mod layer_info;
pub mod tensor_info;
pub mod validate;

pub use layer_info::{
    build_activation_layer_info, build_convolution_pad_stride_info, build_depthwise_pad_stride_info,
    build_fully_connected_layer_info, build_normalization_layer_info, build_permutation_vector,
    build_pooling_layer_info, ActivationFunction, ActivationLayerInfo, DimensionRoundingType,
    FullyConnectedLayerInfo, NormType, NormalizationLayerInfo, PadStrideInfo, PermutationVector, PoolingLayerInfo,
    PoolingType,
};
pub use tensor_info::{build_acl_tensor_info, AclTensorInfo, QuantizationInfo};
