//! Per-operator capability queries for the NEON backend.
//!
//! Every query runs the same pipeline:
//! 1. Look up the operator kind in the capability table
//! 2. Consult backend availability (fail closed) unless the strategy is
//!    ungated
//! 3. Apply the strategy: data-type rules, descriptor pre-checks, or the
//!    kernel library's own validation
//!
//! Queries are pure. `NeonLayerSupport` holds no mutable state and is
//! `Send + Sync`, so a partitioner may fan checks out across threads.

use std::fmt;
use std::sync::Arc;

use crate::config::LayerSupportConfig;
use crate::descriptors::{
    ActivationDescriptor, BatchNormalizationDescriptor, Convolution2dDescriptor,
    DepthwiseConvolution2dDescriptor, FakeQuantizationDescriptor, FullyConnectedDescriptor,
    LstmDescriptor, NormalizationAlgorithmMethod, NormalizationDescriptor, OperatorDescriptor,
    OriginsDescriptor, PermuteDescriptor, Pooling2dDescriptor, ResizeBilinearDescriptor,
    SoftmaxDescriptor, ViewsDescriptor,
};
use crate::tensor::TensorInfo;

use super::table::{strategy_for, ValidationStrategy};
use super::validator::{default_validator, forward_workload_validate, KernelValidator, UnavailableKernelValidator};
use super::{unsupported, BackendAvailability, Support};

pub const NORMALIZATION_METHOD_REASON: &str =
    "Unsupported normalisation method type, only LocalBrightness is supported";
pub const NORMALIZATION_SIZE_REASON: &str = "Normalization size must be an odd number.";
pub const FULLY_CONNECTED_QUANTISED_REASON: &str =
    "Fully connected layer is not implemented for QAsymm8 input";

/// Descriptor-only pre-check for Normalization layers.
pub fn normalization_descriptor_support(descriptor: &NormalizationDescriptor) -> Support {
    if descriptor.method_type != NormalizationAlgorithmMethod::LocalBrightness {
        return unsupported(NORMALIZATION_METHOD_REASON);
    }
    if descriptor.norm_size % 2 == 0 {
        return unsupported(NORMALIZATION_SIZE_REASON);
    }
    Ok(())
}

/// Operands of an LSTM layer. Optional tensors depend on the CIFG, peephole
/// and projection switches of the descriptor.
#[derive(Debug, Clone, Copy)]
pub struct LstmTensors<'a> {
    pub input: &'a TensorInfo,
    pub output_state_in: &'a TensorInfo,
    pub cell_state_in: &'a TensorInfo,
    pub scratch_buffer: &'a TensorInfo,
    pub output_state_out: &'a TensorInfo,
    pub cell_state_out: &'a TensorInfo,
    pub output: &'a TensorInfo,
    pub input_to_forget_weights: &'a TensorInfo,
    pub input_to_cell_weights: &'a TensorInfo,
    pub input_to_output_weights: &'a TensorInfo,
    pub recurrent_to_forget_weights: &'a TensorInfo,
    pub recurrent_to_cell_weights: &'a TensorInfo,
    pub recurrent_to_output_weights: &'a TensorInfo,
    pub forget_gate_bias: &'a TensorInfo,
    pub cell_bias: &'a TensorInfo,
    pub output_gate_bias: &'a TensorInfo,
    pub input_to_input_weights: Option<&'a TensorInfo>,
    pub recurrent_to_input_weights: Option<&'a TensorInfo>,
    pub cell_to_input_weights: Option<&'a TensorInfo>,
    pub input_gate_bias: Option<&'a TensorInfo>,
    pub projection_weights: Option<&'a TensorInfo>,
    pub projection_bias: Option<&'a TensorInfo>,
    pub cell_to_forget_weights: Option<&'a TensorInfo>,
    pub cell_to_output_weights: Option<&'a TensorInfo>,
}

impl<'a> LstmTensors<'a> {
    /// Every tensor as one list: required operands first, then the optional
    /// ones that are present.
    pub fn operands(&self) -> Vec<&'a TensorInfo> {
        let mut operands = vec![
            self.input,
            self.output_state_in,
            self.cell_state_in,
            self.scratch_buffer,
            self.output_state_out,
            self.cell_state_out,
            self.output,
            self.input_to_forget_weights,
            self.input_to_cell_weights,
            self.input_to_output_weights,
            self.recurrent_to_forget_weights,
            self.recurrent_to_cell_weights,
            self.recurrent_to_output_weights,
            self.forget_gate_bias,
            self.cell_bias,
            self.output_gate_bias,
        ];
        operands.extend(
            [
                self.input_to_input_weights,
                self.recurrent_to_input_weights,
                self.cell_to_input_weights,
                self.input_gate_bias,
                self.projection_weights,
                self.projection_bias,
                self.cell_to_forget_weights,
                self.cell_to_output_weights,
            ]
            .into_iter()
            .flatten(),
        );
        operands
    }
}

/// Capability queries for the NEON backend.
pub struct NeonLayerSupport {
    config: LayerSupportConfig,
    validator: Arc<dyn KernelValidator>,
}

impl fmt::Debug for NeonLayerSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeonLayerSupport")
            .field("availability", &self.config.availability)
            .field("validator", &self.validator.name())
            .finish()
    }
}

impl Default for NeonLayerSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl NeonLayerSupport {
    /// Layer support for this build: the kernel library when compiled with
    /// the `neon` feature, every gated query negative otherwise.
    pub fn new() -> Self {
        Self::with_config(LayerSupportConfig::default())
    }

    /// A configuration can disable the backend but cannot enable one the
    /// build does not contain.
    pub fn with_config(mut config: LayerSupportConfig) -> Self {
        if !BackendAvailability::BUILD.is_enabled() {
            config.availability = BackendAvailability::Disabled;
        }
        let validator: Arc<dyn KernelValidator> = if config.availability.is_enabled() {
            default_validator()
        } else {
            Arc::new(UnavailableKernelValidator)
        };
        Self { config, validator }
    }

    /// Layer support reporting the backend as unavailable.
    pub fn disabled() -> Self {
        Self::with_config(LayerSupportConfig::default().with_backend_disabled())
    }

    /// Compose with an explicit availability and kernel validator.
    pub fn with_validator(availability: BackendAvailability, validator: Arc<dyn KernelValidator>) -> Self {
        Self {
            config: LayerSupportConfig {
                availability,
                ..LayerSupportConfig::default()
            },
            validator,
        }
    }

    pub fn availability(&self) -> BackendAvailability {
        self.config.availability
    }

    pub fn validator(&self) -> &dyn KernelValidator {
        self.validator.as_ref()
    }

    /// Table-driven entry point. `operands` follow the order of the
    /// matching per-kind method.
    pub fn is_layer_supported(&self, descriptor: OperatorDescriptor<'_>, operands: &[&TensorInfo]) -> Support {
        let kind = descriptor.kind();
        let strategy = strategy_for(kind);
        tracing::trace!(%kind, ?strategy, operands = operands.len(), "layer support query");

        let support = self.evaluate(strategy, &descriptor, operands);
        if let Err(unsupported) = &support {
            if self.config.log_unsupported {
                tracing::debug!(%kind, reason = unsupported.reason(), "layer not supported on NEON");
            }
        }
        support
    }

    fn evaluate(&self, strategy: ValidationStrategy, descriptor: &OperatorDescriptor<'_>, operands: &[&TensorInfo]) -> Support {
        if strategy.is_gated() {
            self.config.availability.check()?;
        }

        match strategy {
            ValidationStrategy::Native => self.forward(descriptor, operands),
            ValidationStrategy::DataType(matrix) => match operands.first() {
                Some(info) => matrix.check(info.data_type()),
                None => unsupported(format!("{} requires at least one input", descriptor.kind())),
            },
            ValidationStrategy::FullyConnected => {
                let quantised_input = operands
                    .first()
                    .map_or(false, |input| input.is_quantized());
                if quantised_input {
                    return unsupported(FULLY_CONNECTED_QUANTISED_REASON);
                }
                self.forward(descriptor, operands)
            }
            ValidationStrategy::Normalization => {
                if let OperatorDescriptor::Normalization(params) = descriptor {
                    normalization_descriptor_support(params)?;
                }
                self.forward(descriptor, operands)
            }
            ValidationStrategy::Unimplemented => {
                unsupported(format!("{} is not implemented for the NEON backend", descriptor.kind()))
            }
            ValidationStrategy::AlwaysSupported => Ok(()),
        }
    }

    fn forward(&self, descriptor: &OperatorDescriptor<'_>, operands: &[&TensorInfo]) -> Support {
        forward_workload_validate(self.validator.as_ref(), descriptor, operands)
    }

    pub fn is_activation_supported(
        &self,
        input: &TensorInfo,
        output: &TensorInfo,
        descriptor: &ActivationDescriptor,
    ) -> Support {
        self.is_layer_supported(OperatorDescriptor::Activation(descriptor), &[input, output])
    }

    pub fn is_addition_supported(&self, input0: &TensorInfo, input1: &TensorInfo, output: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::Addition, &[input0, input1, output])
    }

    #[allow(clippy::too_many_arguments)]
    pub fn is_batch_normalization_supported(
        &self,
        input: &TensorInfo,
        output: &TensorInfo,
        mean: &TensorInfo,
        variance: &TensorInfo,
        beta: &TensorInfo,
        gamma: &TensorInfo,
        descriptor: &BatchNormalizationDescriptor,
    ) -> Support {
        self.is_layer_supported(
            OperatorDescriptor::BatchNormalization(descriptor),
            &[input, output, mean, variance, beta, gamma],
        )
    }

    pub fn is_constant_supported(&self, output: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::Constant, &[output])
    }

    /// `biases` must be present when the descriptor enables bias.
    pub fn is_convolution2d_supported(
        &self,
        input: &TensorInfo,
        output: &TensorInfo,
        descriptor: &Convolution2dDescriptor,
        weights: &TensorInfo,
        biases: Option<&TensorInfo>,
    ) -> Support {
        let mut operands = vec![input, output, weights];
        operands.extend(biases);
        self.is_layer_supported(OperatorDescriptor::Convolution2d(descriptor), &operands)
    }

    pub fn is_depthwise_convolution_supported(
        &self,
        input: &TensorInfo,
        output: &TensorInfo,
        descriptor: &DepthwiseConvolution2dDescriptor,
        weights: &TensorInfo,
        biases: Option<&TensorInfo>,
    ) -> Support {
        let mut operands = vec![input, output, weights];
        operands.extend(biases);
        self.is_layer_supported(OperatorDescriptor::DepthwiseConvolution2d(descriptor), &operands)
    }

    /// QAsymm8 input is always rejected; the quantized kernel does not exist yet.
    pub fn is_fully_connected_supported(
        &self,
        input: &TensorInfo,
        output: &TensorInfo,
        weights: &TensorInfo,
        biases: Option<&TensorInfo>,
        descriptor: &FullyConnectedDescriptor,
    ) -> Support {
        let mut operands = vec![input, output, weights];
        operands.extend(biases);
        self.is_layer_supported(OperatorDescriptor::FullyConnected(descriptor), &operands)
    }

    pub fn is_input_supported(&self, input: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::Input, &[input])
    }

    pub fn is_l2_normalization_supported(&self, input: &TensorInfo, output: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::L2Normalization, &[input, output])
    }

    /// Decided by the data type of the first input.
    pub fn is_merger_supported(&self, inputs: &[&TensorInfo], descriptor: &OriginsDescriptor) -> Support {
        self.is_layer_supported(OperatorDescriptor::Merger(descriptor), inputs)
    }

    pub fn is_multiplication_supported(&self, input0: &TensorInfo, input1: &TensorInfo, output: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::Multiplication, &[input0, input1, output])
    }

    /// Only odd-sized LocalBrightness windows reach the kernel library.
    pub fn is_normalization_supported(
        &self,
        input: &TensorInfo,
        output: &TensorInfo,
        descriptor: &NormalizationDescriptor,
    ) -> Support {
        self.is_layer_supported(OperatorDescriptor::Normalization(descriptor), &[input, output])
    }

    pub fn is_output_supported(&self, output: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::Output, &[output])
    }

    pub fn is_permute_supported(&self, input: &TensorInfo, output: &TensorInfo, descriptor: &PermuteDescriptor) -> Support {
        self.is_layer_supported(OperatorDescriptor::Permute(descriptor), &[input, output])
    }

    pub fn is_pooling2d_supported(&self, input: &TensorInfo, output: &TensorInfo, descriptor: &Pooling2dDescriptor) -> Support {
        self.is_layer_supported(OperatorDescriptor::Pooling2d(descriptor), &[input, output])
    }

    /// Not implemented on this backend.
    pub fn is_resize_bilinear_supported(&self, input: &TensorInfo, descriptor: &ResizeBilinearDescriptor) -> Support {
        self.is_layer_supported(OperatorDescriptor::ResizeBilinear(descriptor), &[input])
    }

    pub fn is_softmax_supported(&self, input: &TensorInfo, output: &TensorInfo, descriptor: &SoftmaxDescriptor) -> Support {
        self.is_layer_supported(OperatorDescriptor::Softmax(descriptor), &[input, output])
    }

    pub fn is_splitter_supported(&self, input: &TensorInfo, descriptor: &ViewsDescriptor) -> Support {
        self.is_layer_supported(OperatorDescriptor::Splitter(descriptor), &[input])
    }

    /// Not implemented on this backend.
    pub fn is_fake_quantization_supported(
        &self,
        input: &TensorInfo,
        descriptor: &FakeQuantizationDescriptor,
    ) -> Support {
        self.is_layer_supported(OperatorDescriptor::FakeQuantization(descriptor), &[input])
    }

    pub fn is_reshape_supported(&self, input: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::Reshape, &[input])
    }

    /// Float32 only.
    pub fn is_floor_supported(&self, input: &TensorInfo, output: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::Floor, &[input, output])
    }

    /// Not implemented on this backend.
    pub fn is_lstm_supported(&self, tensors: &LstmTensors<'_>, descriptor: &LstmDescriptor) -> Support {
        self.is_layer_supported(OperatorDescriptor::Lstm(descriptor), &tensors.operands())
    }

    /// Always supported, even when the backend is unavailable.
    ///
    /// This is the only pair of queries that skips the availability gate.
    /// Kept as-is until it is confirmed whether that is intended.
    pub fn is_convert_fp16_to_fp32_supported(&self, input: &TensorInfo, output: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::ConvertFp16ToFp32, &[input, output])
    }

    /// Always supported, even when the backend is unavailable. See
    /// [`Self::is_convert_fp16_to_fp32_supported`].
    pub fn is_convert_fp32_to_fp16_supported(&self, input: &TensorInfo, output: &TensorInfo) -> Support {
        self.is_layer_supported(OperatorDescriptor::ConvertFp32ToFp16, &[input, output])
    }
}
