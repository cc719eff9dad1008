//! Activation Gradient Functions
//!
//! Gradient functions for the rectification, sigmoid and tanh activations.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use advml_tensor::Tensor;

use crate::grad_fn::{GradFn, GradientFunction};

// =============================================================================
// ReLU Backward
// =============================================================================

/// Gradient function for `ReLU`.
///
/// d/dx(relu(x)) = 1 if x > 0, else 0
#[derive(Debug)]
pub struct ReluBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_input: Tensor<f32>,
}

impl ReluBackward {
    /// Creates a new `ReluBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, input: Tensor<f32>) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            saved_input: input,
        }
    }
}

impl GradientFunction for ReluBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let input_data = self.saved_input.to_vec();
        let grad_data = grad_output.to_vec();

        let result: Vec<f32> = input_data
            .iter()
            .zip(grad_data.iter())
            .map(|(&x, &g)| if x > 0.0 { g } else { 0.0 })
            .collect();

        vec![Some(
            Tensor::from_vec(result, self.saved_input.shape()).unwrap(),
        )]
    }

    fn name(&self) -> &'static str {
        "ReluBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// LeakyReLU Backward
// =============================================================================

/// Gradient function for leaky `ReLU`.
///
/// d/dx(leaky_relu(x)) = 1 if x > 0, else slope
#[derive(Debug)]
pub struct LeakyReluBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_input: Tensor<f32>,
    slope: f32,
}

impl LeakyReluBackward {
    /// Creates a new `LeakyReluBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, input: Tensor<f32>, slope: f32) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            saved_input: input,
            slope,
        }
    }
}

impl GradientFunction for LeakyReluBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let input_data = self.saved_input.to_vec();
        let grad_data = grad_output.to_vec();

        let result: Vec<f32> = input_data
            .iter()
            .zip(grad_data.iter())
            .map(|(&x, &g)| if x > 0.0 { g } else { g * self.slope })
            .collect();

        vec![Some(
            Tensor::from_vec(result, self.saved_input.shape()).unwrap(),
        )]
    }

    fn name(&self) -> &'static str {
        "LeakyReluBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Sigmoid Backward
// =============================================================================

/// Gradient function for sigmoid.
///
/// d/dx(sigmoid(x)) = sigmoid(x) * (1 - sigmoid(x))
#[derive(Debug)]
pub struct SigmoidBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_output: Tensor<f32>,
}

impl SigmoidBackward {
    /// Creates a new `SigmoidBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, output: Tensor<f32>) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            saved_output: output,
        }
    }
}

impl GradientFunction for SigmoidBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let output_data = self.saved_output.to_vec();
        let grad_data = grad_output.to_vec();

        let result: Vec<f32> = output_data
            .iter()
            .zip(grad_data.iter())
            .map(|(&o, &g)| g * o * (1.0 - o))
            .collect();

        vec![Some(
            Tensor::from_vec(result, self.saved_output.shape()).unwrap(),
        )]
    }

    fn name(&self) -> &'static str {
        "SigmoidBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Tanh Backward
// =============================================================================

/// Gradient function for tanh.
///
/// d/dx(tanh(x)) = 1 - tanh(x)^2
#[derive(Debug)]
pub struct TanhBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_output: Tensor<f32>,
}

impl TanhBackward {
    /// Creates a new `TanhBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, output: Tensor<f32>) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            saved_output: output,
        }
    }
}

impl GradientFunction for TanhBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let output_data = self.saved_output.to_vec();
        let grad_data = grad_output.to_vec();

        let result: Vec<f32> = output_data
            .iter()
            .zip(grad_data.iter())
            .map(|(&o, &g)| g * (1.0 - o * o))
            .collect();

        vec![Some(
            Tensor::from_vec(result, self.saved_output.shape()).unwrap(),
        )]
    }

    fn name(&self) -> &'static str {
        "TanhBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_backward_masks_negatives() {
        let input = Tensor::from_vec(vec![-1.0, 2.0], &[2]).unwrap();
        let f = ReluBackward::new(None, input);
        let grads = f.apply(&Tensor::from_vec(vec![1.0, 1.0], &[2]).unwrap());
        assert_eq!(grads[0].as_ref().unwrap().to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_leaky_relu_backward_scales_negatives() {
        let input = Tensor::from_vec(vec![-1.0, 2.0], &[2]).unwrap();
        let f = LeakyReluBackward::new(None, input, 0.2);
        let grads = f.apply(&Tensor::from_vec(vec![1.0, 1.0], &[2]).unwrap());
        assert_eq!(grads[0].as_ref().unwrap().to_vec(), vec![0.2, 1.0]);
    }

    #[test]
    fn test_sigmoid_backward_peak_at_half() {
        // sigmoid output 0.5 has the maximum derivative 0.25
        let output = Tensor::from_vec(vec![0.5], &[1]).unwrap();
        let f = SigmoidBackward::new(None, output);
        let grads = f.apply(&Tensor::from_vec(vec![1.0], &[1]).unwrap());
        assert!((grads[0].as_ref().unwrap().to_vec()[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_tanh_backward_at_zero() {
        // tanh output 0 has derivative 1
        let output = Tensor::from_vec(vec![0.0], &[1]).unwrap();
        let f = TanhBackward::new(None, output);
        let grads = f.apply(&Tensor::from_vec(vec![1.0], &[1]).unwrap());
        assert!((grads[0].as_ref().unwrap().to_vec()[0] - 1.0).abs() < 1e-6);
    }
}
