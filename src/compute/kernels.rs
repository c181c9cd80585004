//! CPU kernels for the element-wise layers.
//!
//! Callers size `output` to match `input`; only the common prefix is
//! written otherwise.

use half::f16;

use super::layer_info::{ActivationFunction, ActivationLayerInfo};

/// Scalar reference for one activation.
pub fn activate(info: &ActivationLayerInfo, x: f32) -> f32 {
    let (a, b) = (info.a, info.b);
    match info.function {
        ActivationFunction::Logistic => 1.0 / (1.0 + (-x).exp()),
        ActivationFunction::Tanh => a * (b * x).tanh(),
        ActivationFunction::Relu => x.max(0.0),
        ActivationFunction::BoundedRelu => a.min(x.max(0.0)),
        ActivationFunction::LuBoundedRelu => a.min(x.max(b)),
        ActivationFunction::LeakyRelu => {
            if x > 0.0 {
                x
            } else {
                a * x
            }
        }
        ActivationFunction::SoftRelu => x.exp().ln_1p(),
        ActivationFunction::Abs => x.abs(),
        ActivationFunction::Square => x * x,
        ActivationFunction::Sqrt => x.sqrt(),
        ActivationFunction::Linear => a * x + b,
    }
}

pub fn activation_f32(info: &ActivationLayerInfo, input: &[f32], output: &mut [f32]) {
    for (out, &x) in output.iter_mut().zip(input) {
        *out = activate(info, x);
    }
}

pub fn floor_f32(input: &[f32], output: &mut [f32]) {
    for (out, &x) in output.iter_mut().zip(input) {
        *out = x.floor();
    }
}

pub fn convert_f16_to_f32(input: &[f16], output: &mut [f32]) {
    for (out, &x) in output.iter_mut().zip(input) {
        *out = x.to_f32();
    }
}

/// Rounds to nearest; values beyond the f16 range become infinities.
pub fn convert_f32_to_f16(input: &[f32], output: &mut [f16]) {
    for (out, &x) in output.iter_mut().zip(input) {
        *out = f16::from_f32(x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(function: ActivationFunction, a: f32, b: f32) -> ActivationLayerInfo {
        ActivationLayerInfo::new(function, a, b)
    }

    #[test]
    fn test_activation_reference_values() {
        assert_eq!(activate(&info(ActivationFunction::Relu, 0.0, 0.0), -2.0), 0.0);
        assert_eq!(activate(&info(ActivationFunction::LuBoundedRelu, 6.0, -1.0), -3.0), -1.0);
        assert_eq!(activate(&info(ActivationFunction::LuBoundedRelu, 6.0, -1.0), 9.0), 6.0);
        assert_eq!(activate(&info(ActivationFunction::LeakyRelu, 0.1, 0.0), -10.0), -1.0);
        assert_eq!(activate(&info(ActivationFunction::Linear, 2.0, 1.0), 3.0), 7.0);
        assert_eq!(activate(&info(ActivationFunction::Logistic, 0.0, 0.0), 0.0), 0.5);
        assert!((activate(&info(ActivationFunction::SoftRelu, 0.0, 0.0), 0.0) - 2f32.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_floor_kernel() {
        let input = [1.5, -1.5, 2.0, -0.25];
        let mut output = [0.0; 4];
        floor_f32(&input, &mut output);
        assert_eq!(output, [1.0, -2.0, 2.0, -1.0]);
    }

    #[test]
    fn test_half_conversions() {
        let input = [0.5f32, -2.0, 1024.0, 70000.0];
        let mut halves = [f16::ZERO; 4];
        convert_f32_to_f16(&input, &mut halves);
        assert!(halves[3].is_infinite());

        let mut back = [0.0f32; 4];
        convert_f16_to_f32(&halves, &mut back);
        assert_eq!(&back[..3], &input[..3]);
    }
}
