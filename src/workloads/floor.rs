use crate::compute::kernels;
use crate::error::ForgeResult;
use crate::tensor::DataType;

use super::{
    expect_bound_shapes, expect_data_type, expect_same_shape, rebound_tensor, CpuTensor, QueueDescriptor, Workload,
};

const NAME: &str = "NeonFloorFloat32Workload";

#[derive(Debug)]
pub struct NeonFloorFloat32Workload {
    data: QueueDescriptor<()>,
}

impl NeonFloorFloat32Workload {
    pub fn new(data: QueueDescriptor<()>) -> ForgeResult<Self> {
        data.validate_inputs_outputs(NAME, 1, 1)?;
        expect_data_type(NAME, &data.inputs[0], DataType::Float32)?;
        expect_data_type(NAME, &data.outputs[0], DataType::Float32)?;
        expect_same_shape(NAME, &data.inputs[0], &data.outputs[0])?;
        Ok(Self { data })
    }
}

impl Workload for NeonFloorFloat32Workload {
    fn name(&self) -> &'static str {
        NAME
    }

    fn execute(&mut self) -> ForgeResult<()> {
        let _span = tracing::trace_span!("NeonFloorFloat32Workload_Execute").entered();

        let QueueDescriptor { inputs, outputs, .. } = &mut self.data;
        expect_bound_shapes(NAME, &inputs[0], &outputs[0])?;
        let input = inputs[0].as_f32().ok_or_else(|| rebound_tensor(NAME))?;
        let output = outputs[0].as_f32_mut().ok_or_else(|| rebound_tensor(NAME))?;
        kernels::floor_f32(input, output);
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

    #[test]
    fn test_floor_requires_one_output() {
        let input = CpuTensor::from_f32(&[2], vec![1.5, -1.5]).unwrap();
        let queue = QueueDescriptor::new((), vec![input], vec![]);
        let err = NeonFloorFloat32Workload::new(queue).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_floor_shape_mismatch() {
        let input = CpuTensor::from_f32(&[2], vec![1.5, -1.5]).unwrap();
        let output = CpuTensor::from_f32(&[1, 2], vec![0.0; 2]).unwrap();
        let queue = QueueDescriptor::new((), vec![input], vec![output]);
        assert!(NeonFloorFloat32Workload::new(queue).is_err());
    }
}
