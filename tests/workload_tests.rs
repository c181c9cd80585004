//! Validate -> construct -> execute lifecycle of the NEON workloads
#![cfg(feature = "neon")]

use half::f16;
use neonforge::compute::{build_activation_layer_info, kernels};
use neonforge::descriptors::{ActivationDescriptor, ActivationFunction};
use neonforge::workloads::{
    CpuTensor, NeonActivationFloat32Workload, NeonConvertFp16ToFp32Workload, NeonConvertFp32ToFp16Workload,
    NeonFloorFloat32Workload, QueueDescriptor, Workload,
};
use neonforge::{ErrorCategory, NeonForgeError, NeonLayerSupport, TensorInfo};
use proptest::prelude::*;
use serial_test::serial;

fn activation_workload(
    function: ActivationFunction,
    values: Vec<f32>,
) -> anyhow::Result<NeonActivationFloat32Workload> {
    let len = values.len() as u32;
    let input = CpuTensor::from_f32(&[1, len], values)?;
    let output = CpuTensor::from_f32(&[1, len], vec![0.0; len as usize])?;
    let descriptor = ActivationDescriptor::new(function).with_params(6.0, -1.0);
    Ok(NeonActivationFloat32Workload::new(QueueDescriptor::new(descriptor, vec![input], vec![output]))?)
}

#[test]
fn test_validate_then_construct_then_execute() -> anyhow::Result<()> {
    let support = NeonLayerSupport::new();
    let input = CpuTensor::from_f32(&[2, 3], vec![-1.5, -0.5, 0.0, 0.5, 1.5, 2.5])?;
    let output = CpuTensor::zeros(input.info().clone())?;

    support.is_floor_supported(input.info(), output.info())?;

    let mut workload = NeonFloorFloat32Workload::new(QueueDescriptor::new((), vec![input], vec![output]))?;
    workload.execute()?;
    assert_eq!(
        workload.outputs()[0].as_f32().unwrap(),
        &[-2.0, -1.0, 0.0, 0.0, 1.0, 2.0]
    );
    Ok(())
}

#[test]
fn test_execute_is_repeatable_with_new_input_values() -> anyhow::Result<()> {
    let mut workload = activation_workload(ActivationFunction::ReLu, vec![-1.0, 1.0])?;
    workload.execute()?;
    assert_eq!(workload.outputs()[0].as_f32().unwrap(), &[0.0, 1.0]);

    workload.inputs_mut()[0].as_f32_mut().unwrap().copy_from_slice(&[3.0, -3.0]);
    workload.execute()?;
    assert_eq!(workload.outputs()[0].as_f32().unwrap(), &[3.0, 0.0]);
    Ok(())
}

#[test]
fn test_wrong_operand_count_is_contract_violation() {
    let input = CpuTensor::from_f32(&[1], vec![0.0]).unwrap();
    let queue = QueueDescriptor::new((), vec![input.clone(), input.clone()], vec![input]);
    let err = NeonFloorFloat32Workload::new(queue).unwrap_err();

    assert!(matches!(
        err,
        NeonForgeError::InvalidOperandCount {
            expected_inputs: 1,
            actual_inputs: 2,
            ..
        }
    ));
    assert_eq!(err.category(), ErrorCategory::Contract);
    assert!(err.is_fatal());
}

#[test]
fn test_rebound_tensor_of_other_type_is_reported() -> anyhow::Result<()> {
    let mut workload = activation_workload(ActivationFunction::Abs, vec![-2.0])?;
    workload.inputs_mut()[0] = CpuTensor::from_f16(&[1, 1], vec![f16::ONE])?;
    let err = workload.execute().unwrap_err();
    assert!(err.is_fatal());
    Ok(())
}

#[test]
fn test_rebound_tensor_of_other_shape_is_reported() -> anyhow::Result<()> {
    let mut relu = activation_workload(ActivationFunction::ReLu, vec![-1.0, 2.0, -3.0, 4.0])?;
    relu.inputs_mut()[0] = CpuTensor::from_f32(&[1, 1], vec![5.0])?;
    assert!(relu.execute().unwrap_err().is_fatal());
    assert_eq!(relu.outputs()[0].as_f32().unwrap(), &[0.0; 4]);

    let mut floor = NeonFloorFloat32Workload::new(QueueDescriptor::new(
        (),
        vec![CpuTensor::from_f32(&[2], vec![0.5, 1.5])?],
        vec![CpuTensor::from_f32(&[2], vec![0.0; 2])?],
    ))?;
    floor.inputs_mut()[0] = CpuTensor::from_f32(&[2, 1], vec![0.5, 1.5])?;
    assert!(floor.execute().is_err());

    let mut up = NeonConvertFp16ToFp32Workload::new(QueueDescriptor::new(
        (),
        vec![CpuTensor::from_f16(&[2], vec![f16::ONE; 2])?],
        vec![CpuTensor::from_f32(&[2], vec![0.0; 2])?],
    ))?;
    up.inputs_mut()[0] = CpuTensor::from_f16(&[3], vec![f16::ONE; 3])?;
    assert!(up.execute().is_err());
    Ok(())
}

#[test]
fn test_conversion_workloads_round_trip() -> anyhow::Result<()> {
    let values = vec![0.0f32, 1.0, -2.5, 0.125, 1024.0, -65504.0];
    let len = values.len() as u32;

    let mut down = NeonConvertFp32ToFp16Workload::new(QueueDescriptor::new(
        (),
        vec![CpuTensor::from_f32(&[len], values.clone())?],
        vec![CpuTensor::zeros(TensorInfo::new(&[len], neonforge::DataType::Float16))?],
    ))?;
    down.execute()?;
    let halves = down.outputs()[0].clone();

    let mut up = NeonConvertFp16ToFp32Workload::new(QueueDescriptor::new(
        (),
        vec![halves],
        vec![CpuTensor::from_f32(&[len], vec![0.0; len as usize])?],
    ))?;
    up.execute()?;
    assert_eq!(up.outputs()[0].as_f32().unwrap(), values.as_slice());
    Ok(())
}

#[test]
#[serial]
fn test_execute_with_logging_installed() -> anyhow::Result<()> {
    neonforge::init_logging_default();
    let mut workload = activation_workload(ActivationFunction::Square, vec![3.0])?;
    workload.execute()?;
    assert_eq!(workload.outputs()[0].as_f32().unwrap(), &[9.0]);
    assert_eq!(workload.name(), "NeonActivationFloat32Workload");
    Ok(())
}

fn activation_function() -> impl Strategy<Value = ActivationFunction> {
    prop_oneof![
        Just(ActivationFunction::Sigmoid),
        Just(ActivationFunction::TanH),
        Just(ActivationFunction::Linear),
        Just(ActivationFunction::ReLu),
        Just(ActivationFunction::BoundedReLu),
        Just(ActivationFunction::SoftReLu),
        Just(ActivationFunction::LeakyReLu),
        Just(ActivationFunction::Abs),
        Just(ActivationFunction::Square),
    ]
}

proptest! {
    #[test]
    fn activation_matches_scalar_reference(
        function in activation_function(),
        values in prop::collection::vec(-50.0f32..50.0, 1..32),
    ) {
        let mut workload = activation_workload(function, values.clone()).unwrap();
        workload.execute().unwrap();

        let info = build_activation_layer_info(&ActivationDescriptor::new(function).with_params(6.0, -1.0));
        let output = workload.outputs()[0].as_f32().unwrap();
        for (x, y) in values.iter().zip(output) {
            prop_assert_eq!(kernels::activate(&info, *x).to_bits(), y.to_bits());
        }
    }
}
