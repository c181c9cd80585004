//! Float16 <-> Float32 conversion workloads.

use crate::compute::kernels;
use crate::error::ForgeResult;
use crate::tensor::DataType;

use super::{
    expect_bound_shapes, expect_data_type, expect_same_shape, rebound_tensor, CpuTensor, QueueDescriptor, Workload,
};

fn validate_conversion(data: &QueueDescriptor<()>, name: &str, from: DataType, to: DataType) -> ForgeResult<()> {
    data.validate_inputs_outputs(name, 1, 1)?;
    expect_data_type(name, &data.inputs[0], from)?;
    expect_data_type(name, &data.outputs[0], to)?;
    expect_same_shape(name, &data.inputs[0], &data.outputs[0])
}

#[derive(Debug)]
pub struct NeonConvertFp16ToFp32Workload {
    data: QueueDescriptor<()>,
}

impl NeonConvertFp16ToFp32Workload {
    const NAME: &'static str = "NeonConvertFp16ToFp32Workload";

    pub fn new(data: QueueDescriptor<()>) -> ForgeResult<Self> {
        validate_conversion(&data, Self::NAME, DataType::Float16, DataType::Float32)?;
        Ok(Self { data })
    }
}

impl Workload for NeonConvertFp16ToFp32Workload {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn execute(&mut self) -> ForgeResult<()> {
        let _span = tracing::trace_span!("NeonConvertFp16ToFp32Workload_Execute").entered();

        let QueueDescriptor { inputs, outputs, .. } = &mut self.data;
        expect_bound_shapes(Self::NAME, &inputs[0], &outputs[0])?;
        let input = inputs[0].as_f16().ok_or_else(|| rebound_tensor(Self::NAME))?;
        let output = outputs[0].as_f32_mut().ok_or_else(|| rebound_tensor(Self::NAME))?;
        kernels::convert_f16_to_f32(input, output);
        Ok(())
    }

    fn inputs_mut(&mut self) -> &mut [CpuTensor] {
        &mut self.data.inputs
    }

    fn outputs(&self) -> &[CpuTensor] {
        &self.data.outputs
    }
}

#[derive(Debug)]
pub struct NeonConvertFp32ToFp16Workload {
    data: QueueDescriptor<()>,
}

impl NeonConvertFp32ToFp16Workload {
    const NAME: &'static str = "NeonConvertFp32ToFp16Workload";

    pub fn new(data: QueueDescriptor<()>) -> ForgeResult<Self> {
        validate_conversion(&data, Self::NAME, DataType::Float32, DataType::Float16)?;
        Ok(Self { data })
    }
}

impl Workload for NeonConvertFp32ToFp16Workload {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn execute(&mut self) -> ForgeResult<()> {
        let _span = tracing::trace_span!("NeonConvertFp32ToFp16Workload_Execute").entered();

        let QueueDescriptor { inputs, outputs, .. } = &mut self.data;
        expect_bound_shapes(Self::NAME, &inputs[0], &outputs[0])?;
        let input = inputs[0].as_f32().ok_or_else(|| rebound_tensor(Self::NAME))?;
        let output = outputs[0].as_f16_mut().ok_or_else(|| rebound_tensor(Self::NAME))?;
        kernels::convert_f32_to_f16(input, output);
        Ok(())
    }

    fn inputs_mut(&mut self) -> &mut [CpuTensor] {
        &mut self.data.inputs
    }

    fn outputs(&self) -> &[CpuTensor] {
        &self.data.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_fp16_to_fp32() {
        let input = CpuTensor::from_f16(&[3], vec![f16::from_f32(1.5), f16::ZERO, f16::NEG_ONE]).unwrap();
        let output = CpuTensor::from_f32(&[3], vec![9.0; 3]).unwrap();
        let mut workload =
            NeonConvertFp16ToFp32Workload::new(QueueDescriptor::new((), vec![input], vec![output])).unwrap();
        workload.execute().unwrap();
        assert_eq!(workload.outputs()[0].as_f32().unwrap(), &[1.5, 0.0, -1.0]);
    }

    #[test]
    fn test_direction_is_checked() {
        let input = CpuTensor::from_f32(&[1], vec![1.0]).unwrap();
        let output = CpuTensor::from_f32(&[1], vec![0.0]).unwrap();
        let queue = QueueDescriptor::new((), vec![input], vec![output]);
        let err = NeonConvertFp32ToFp16Workload::new(queue).unwrap_err();
        assert_eq!(
            err.to_string(),
            "NeonConvertFp32ToFp16Workload: expected Float16 data, got Float32"
        );
    }
}
