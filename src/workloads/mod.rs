//! NEON workloads: construct once from validated operands, execute many times.
//!
//! Construction re-checks what the capability query established (operand
//! counts, element types, shapes). A failure there means the caller skipped
//! validation, so it surfaces as a contract violation rather than an
//! [`Unsupported`](crate::support::Unsupported) answer.

pub mod activation;
pub mod convert;
pub mod floor;

pub use activation::NeonActivationFloat32Workload;
pub use convert::{NeonConvertFp16ToFp32Workload, NeonConvertFp32ToFp16Workload};
pub use floor::NeonFloorFloat32Workload;

use half::f16;

use crate::contract_violation;
use crate::error::{ForgeResult, NeonForgeError};
use crate::tensor::{DataType, TensorInfo};

/// Host-side element storage.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Float32(Vec<f32>),
    Float16(Vec<f16>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            TensorData::Float32(values) => values.len(),
            TensorData::Float16(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            TensorData::Float32(_) => DataType::Float32,
            TensorData::Float16(_) => DataType::Float16,
        }
    }
}

/// A tensor bound to a workload. The element count always matches the info.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor {
    info: TensorInfo,
    data: TensorData,
}

impl CpuTensor {
    pub fn new(info: TensorInfo, data: TensorData) -> ForgeResult<Self> {
        if info.data_type() != data.data_type() {
            return Err(contract_violation!(
                "tensor declared as {} but holds {} data",
                info.data_type(),
                data.data_type()
            ));
        }
        let expected = element_count(&info)?;
        if expected != data.len() {
            return Err(contract_violation!(
                "tensor of shape {} needs {} elements, got {}",
                info.shape(),
                expected,
                data.len()
            ));
        }
        Ok(Self { info, data })
    }

    pub fn from_f32(dims: &[u32], values: Vec<f32>) -> ForgeResult<Self> {
        Self::new(TensorInfo::new(dims, DataType::Float32), TensorData::Float32(values))
    }

    pub fn from_f16(dims: &[u32], values: Vec<f16>) -> ForgeResult<Self> {
        Self::new(TensorInfo::new(dims, DataType::Float16), TensorData::Float16(values))
    }

    /// Zero-filled tensor; only host-representable element types.
    pub fn zeros(info: TensorInfo) -> ForgeResult<Self> {
        let len = element_count(&info)?;
        let data = match info.data_type() {
            DataType::Float32 => TensorData::Float32(vec![0.0; len]),
            DataType::Float16 => TensorData::Float16(vec![f16::ZERO; len]),
            other => return Err(contract_violation!("no host storage for {} tensors", other)),
        };
        Ok(Self { info, data })
    }

    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            TensorData::Float32(values) => Some(values),
            _ => None,
        }
    }

    /// Element values can change; the length cannot.
    pub fn as_f32_mut(&mut self) -> Option<&mut [f32]> {
        match &mut self.data {
            TensorData::Float32(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_f16(&self) -> Option<&[f16]> {
        match &self.data {
            TensorData::Float16(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_f16_mut(&mut self) -> Option<&mut [f16]> {
        match &mut self.data {
            TensorData::Float16(values) => Some(values),
            _ => None,
        }
    }
}

fn element_count(info: &TensorInfo) -> ForgeResult<usize> {
    info.num_elements()
        .ok_or_else(|| contract_violation!("tensor of shape {} has more elements than fit in memory", info.shape()))
}

/// Parameters plus bound operands of one workload.
#[derive(Debug, Clone)]
pub struct QueueDescriptor<P> {
    pub parameters: P,
    pub inputs: Vec<CpuTensor>,
    pub outputs: Vec<CpuTensor>,
}

impl<P> QueueDescriptor<P> {
    pub fn new(parameters: P, inputs: Vec<CpuTensor>, outputs: Vec<CpuTensor>) -> Self {
        Self {
            parameters,
            inputs,
            outputs,
        }
    }

    pub fn validate_inputs_outputs(&self, workload: &str, expected_inputs: usize, expected_outputs: usize) -> ForgeResult<()> {
        validate_inputs_outputs(workload, expected_inputs, expected_outputs, self.inputs.len(), self.outputs.len())
    }
}

pub fn validate_inputs_outputs(
    workload: &str,
    expected_inputs: usize,
    expected_outputs: usize,
    actual_inputs: usize,
    actual_outputs: usize,
) -> ForgeResult<()> {
    if expected_inputs != actual_inputs || expected_outputs != actual_outputs {
        return Err(NeonForgeError::InvalidOperandCount {
            workload: workload.to_string(),
            expected_inputs,
            expected_outputs,
            actual_inputs,
            actual_outputs,
        });
    }
    Ok(())
}

pub(crate) fn expect_data_type(workload: &str, tensor: &CpuTensor, expected: DataType) -> ForgeResult<()> {
    let actual = tensor.info().data_type();
    if actual != expected {
        return Err(NeonForgeError::DataTypeMismatch {
            workload: workload.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn expect_same_shape(workload: &str, input: &CpuTensor, output: &CpuTensor) -> ForgeResult<()> {
    if input.info().shape() != output.info().shape() {
        return Err(contract_violation!(
            "{}: input shape {} does not match output shape {}",
            workload,
            input.info().shape(),
            output.info().shape()
        ));
    }
    Ok(())
}

/// A configured kernel bound to its tensors.
pub trait Workload: Send {
    fn name(&self) -> &'static str;

    /// Run the prepared kernel. Repeatable; fails only if a bound tensor was
    /// replaced with one of another element type or shape.
    fn execute(&mut self) -> ForgeResult<()>;

    fn inputs_mut(&mut self) -> &mut [CpuTensor];

    fn outputs(&self) -> &[CpuTensor];
}

/// Error for a bound tensor whose storage no longer matches construction.
pub(crate) fn rebound_tensor(workload: &str) -> NeonForgeError {
    contract_violation!("{}: bound tensor storage changed since construction", workload)
}

/// Element-wise kernels need the input to cover the output exactly.
pub(crate) fn expect_bound_shapes(workload: &str, input: &CpuTensor, output: &CpuTensor) -> ForgeResult<()> {
    if input.info().shape() != output.info().shape() {
        return Err(rebound_tensor(workload));
    }
    Ok(())
}
