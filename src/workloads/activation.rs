use crate::compute::{build_activation_layer_info, kernels, ActivationLayerInfo};
use crate::descriptors::ActivationDescriptor;
use crate::error::ForgeResult;
use crate::tensor::DataType;

use super::{
    expect_bound_shapes, expect_data_type, expect_same_shape, rebound_tensor, CpuTensor, QueueDescriptor, Workload,
};

const NAME: &str = "NeonActivationFloat32Workload";

#[derive(Debug)]
pub struct NeonActivationFloat32Workload {
    data: QueueDescriptor<ActivationDescriptor>,
    layer_info: ActivationLayerInfo,
}

impl NeonActivationFloat32Workload {
    pub fn new(data: QueueDescriptor<ActivationDescriptor>) -> ForgeResult<Self> {
        data.validate_inputs_outputs(NAME, 1, 1)?;
        expect_data_type(NAME, &data.inputs[0], DataType::Float32)?;
        expect_data_type(NAME, &data.outputs[0], DataType::Float32)?;
        expect_same_shape(NAME, &data.inputs[0], &data.outputs[0])?;

        let layer_info = build_activation_layer_info(&data.parameters);
        tracing::debug!(function = ?layer_info.activation(), "configured {}", NAME);
        Ok(Self { data, layer_info })
    }
}

impl Workload for NeonActivationFloat32Workload {
    fn name(&self) -> &'static str {
        NAME
    }

    fn execute(&mut self) -> ForgeResult<()> {
        let _span = tracing::trace_span!("NeonActivationFloat32Workload_Execute").entered();

        let QueueDescriptor { inputs, outputs, .. } = &mut self.data;
        expect_bound_shapes(NAME, &inputs[0], &outputs[0])?;
        let input = inputs[0].as_f32().ok_or_else(|| rebound_tensor(NAME))?;
        let output = outputs[0].as_f32_mut().ok_or_else(|| rebound_tensor(NAME))?;
        kernels::activation_f32(&self.layer_info, input, output);
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
    use crate::descriptors::ActivationFunction;

    #[test]
    fn test_relu_execute() {
        let input = CpuTensor::from_f32(&[1, 4], vec![-1.0, 0.5, -0.5, 2.0]).unwrap();
        let output = CpuTensor::from_f32(&[1, 4], vec![0.0; 4]).unwrap();
        let queue = QueueDescriptor::new(
            ActivationDescriptor::new(ActivationFunction::ReLu),
            vec![input],
            vec![output],
        );
        let mut workload = NeonActivationFloat32Workload::new(queue).unwrap();
        workload.execute().unwrap();
        assert_eq!(workload.outputs()[0].as_f32().unwrap(), &[0.0, 0.5, 0.0, 2.0]);
    }

    #[test]
    fn test_rebound_input_of_other_shape_fails() {
        let input = CpuTensor::from_f32(&[1, 4], vec![-1.0, 0.5, -0.5, 2.0]).unwrap();
        let output = CpuTensor::from_f32(&[1, 4], vec![7.0; 4]).unwrap();
        let queue = QueueDescriptor::new(
            ActivationDescriptor::new(ActivationFunction::ReLu),
            vec![input],
            vec![output],
        );
        let mut workload = NeonActivationFloat32Workload::new(queue).unwrap();

        workload.inputs_mut()[0] = CpuTensor::from_f32(&[1, 1], vec![5.0]).unwrap();
        let err = workload.execute().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Contract violation: NeonActivationFloat32Workload: bound tensor storage changed since construction"
        );
        assert_eq!(workload.outputs()[0].as_f32().unwrap(), &[7.0; 4]);
    }

    #[test]
    fn test_rejects_half_input() {
        let input = CpuTensor::from_f16(&[2], vec![half::f16::ONE; 2]).unwrap();
        let output = CpuTensor::from_f32(&[2], vec![0.0; 2]).unwrap();
        let queue = QueueDescriptor::new(ActivationDescriptor::default(), vec![input], vec![output]);
        let err = NeonActivationFloat32Workload::new(queue).unwrap_err();
        assert_eq!(
            err.to_string(),
            "NeonActivationFloat32Workload: expected Float32 data, got Float16"
        );
    }
}
