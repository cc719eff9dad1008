//! Basic Gradient Functions - Arithmetic and Reductions
//!
//! Gradient functions for add, sub, mul, div, neg, pow, sum and mean.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use advml_tensor::shape::{linear_index, numel, unravel_index};
use advml_tensor::Tensor;

use crate::grad_fn::{GradFn, GradientFunction};

// =============================================================================
// Broadcast Gradient Reduction
// =============================================================================

/// Reduces a gradient to the shape of a broadcast input.
///
/// When an input was broadcast during the forward pass, the gradient of each
/// replicated element must be summed back into the original position.
#[must_use]
pub fn reduce_grad_for_broadcast(grad: &Tensor<f32>, target_shape: &[usize]) -> Tensor<f32> {
    if grad.shape() == target_shape {
        return grad.clone();
    }

    let grad_shape = grad.shape().to_vec();
    let grad_data = grad.to_vec();
    let offset_dims = grad_shape.len() - target_shape.len();

    let target_strides = advml_tensor::shape::contiguous_strides(target_shape);
    let mut result = vec![0.0f32; numel(target_shape)];

    for (i, &g) in grad_data.iter().enumerate() {
        let indices = unravel_index(i, &grad_shape);
        let target_indices: Vec<usize> = target_shape
            .iter()
            .enumerate()
            .map(|(j, &dim)| indices[j + offset_dims] % dim)
            .collect();
        result[linear_index(&target_indices, &target_strides)] += g;
    }

    Tensor::from_vec(result, target_shape).unwrap()
}

// =============================================================================
// Add Backward
// =============================================================================

/// Gradient function for addition.
///
/// d/dx(x + y) = 1, d/dy(x + y) = 1
#[derive(Debug)]
pub struct AddBackward {
    next_fns: Vec<Option<GradFn>>,
    input_shapes: (Vec<usize>, Vec<usize>),
}

impl AddBackward {
    /// Creates a new `AddBackward`.
    #[must_use]
    pub fn new(
        lhs_grad_fn: Option<GradFn>,
        rhs_grad_fn: Option<GradFn>,
        lhs_shape: Vec<usize>,
        rhs_shape: Vec<usize>,
    ) -> Self {
        Self {
            next_fns: vec![lhs_grad_fn, rhs_grad_fn],
            input_shapes: (lhs_shape, rhs_shape),
        }
    }
}

impl GradientFunction for AddBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let grad_lhs = reduce_grad_for_broadcast(grad_output, &self.input_shapes.0);
        let grad_rhs = reduce_grad_for_broadcast(grad_output, &self.input_shapes.1);
        vec![Some(grad_lhs), Some(grad_rhs)]
    }

    fn name(&self) -> &'static str {
        "AddBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Sub Backward
// =============================================================================

/// Gradient function for subtraction.
///
/// d/dx(x - y) = 1, d/dy(x - y) = -1
#[derive(Debug)]
pub struct SubBackward {
    next_fns: Vec<Option<GradFn>>,
    input_shapes: (Vec<usize>, Vec<usize>),
}

impl SubBackward {
    /// Creates a new `SubBackward`.
    #[must_use]
    pub fn new(
        lhs_grad_fn: Option<GradFn>,
        rhs_grad_fn: Option<GradFn>,
        lhs_shape: Vec<usize>,
        rhs_shape: Vec<usize>,
    ) -> Self {
        Self {
            next_fns: vec![lhs_grad_fn, rhs_grad_fn],
            input_shapes: (lhs_shape, rhs_shape),
        }
    }
}

impl GradientFunction for SubBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let grad_lhs = reduce_grad_for_broadcast(grad_output, &self.input_shapes.0);
        let grad_rhs = reduce_grad_for_broadcast(&grad_output.neg(), &self.input_shapes.1);
        vec![Some(grad_lhs), Some(grad_rhs)]
    }

    fn name(&self) -> &'static str {
        "SubBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Mul Backward
// =============================================================================

/// Gradient function for multiplication.
///
/// d/dx(x * y) = y, d/dy(x * y) = x
#[derive(Debug)]
pub struct MulBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_lhs: Tensor<f32>,
    saved_rhs: Tensor<f32>,
}

impl MulBackward {
    /// Creates a new `MulBackward`.
    #[must_use]
    pub fn new(
        lhs_grad_fn: Option<GradFn>,
        rhs_grad_fn: Option<GradFn>,
        lhs: Tensor<f32>,
        rhs: Tensor<f32>,
    ) -> Self {
        Self {
            next_fns: vec![lhs_grad_fn, rhs_grad_fn],
            saved_lhs: lhs,
            saved_rhs: rhs,
        }
    }
}

impl GradientFunction for MulBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let grad_lhs = grad_output.mul(&self.saved_rhs).unwrap();
        let grad_lhs = reduce_grad_for_broadcast(&grad_lhs, self.saved_lhs.shape());

        let grad_rhs = grad_output.mul(&self.saved_lhs).unwrap();
        let grad_rhs = reduce_grad_for_broadcast(&grad_rhs, self.saved_rhs.shape());

        vec![Some(grad_lhs), Some(grad_rhs)]
    }

    fn name(&self) -> &'static str {
        "MulBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Div Backward
// =============================================================================

/// Gradient function for division.
///
/// d/dx(x / y) = 1/y, d/dy(x / y) = -x/y^2
#[derive(Debug)]
pub struct DivBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_lhs: Tensor<f32>,
    saved_rhs: Tensor<f32>,
}

impl DivBackward {
    /// Creates a new `DivBackward`.
    #[must_use]
    pub fn new(
        lhs_grad_fn: Option<GradFn>,
        rhs_grad_fn: Option<GradFn>,
        lhs: Tensor<f32>,
        rhs: Tensor<f32>,
    ) -> Self {
        Self {
            next_fns: vec![lhs_grad_fn, rhs_grad_fn],
            saved_lhs: lhs,
            saved_rhs: rhs,
        }
    }
}

impl GradientFunction for DivBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let grad_lhs = grad_output.div(&self.saved_rhs).unwrap();
        let grad_lhs = reduce_grad_for_broadcast(&grad_lhs, self.saved_lhs.shape());

        let rhs_sq = self.saved_rhs.mul(&self.saved_rhs).unwrap();
        let grad_rhs = grad_output
            .mul(&self.saved_lhs)
            .unwrap()
            .div(&rhs_sq)
            .unwrap()
            .neg();
        let grad_rhs = reduce_grad_for_broadcast(&grad_rhs, self.saved_rhs.shape());

        vec![Some(grad_lhs), Some(grad_rhs)]
    }

    fn name(&self) -> &'static str {
        "DivBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Neg Backward
// =============================================================================

/// Gradient function for negation.
///
/// d/dx(-x) = -1
#[derive(Debug)]
pub struct NegBackward {
    next_fns: Vec<Option<GradFn>>,
}

impl NegBackward {
    /// Creates a new `NegBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
        }
    }
}

impl GradientFunction for NegBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        vec![Some(grad_output.neg())]
    }

    fn name(&self) -> &'static str {
        "NegBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Pow Backward
// =============================================================================

/// Gradient function for element-wise power.
///
/// d/dx(x^n) = n * x^(n-1)
#[derive(Debug)]
pub struct PowBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_input: Tensor<f32>,
    exponent: f32,
}

impl PowBackward {
    /// Creates a new `PowBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, input: Tensor<f32>, exponent: f32) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            saved_input: input,
            exponent,
        }
    }
}

impl GradientFunction for PowBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let derivative = self
            .saved_input
            .pow(self.exponent - 1.0)
            .mul_scalar(self.exponent);
        let grad = grad_output.mul(&derivative).unwrap();
        vec![Some(grad)]
    }

    fn name(&self) -> &'static str {
        "PowBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Sum Backward
// =============================================================================

/// Gradient function for sum reduction.
///
/// The scalar gradient is broadcast back to the input shape.
#[derive(Debug)]
pub struct SumBackward {
    next_fns: Vec<Option<GradFn>>,
    input_shape: Vec<usize>,
}

impl SumBackward {
    /// Creates a new `SumBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, input_shape: Vec<usize>) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            input_shape,
        }
    }
}

impl GradientFunction for SumBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let g = grad_output.to_vec()[0];
        let total = numel(&self.input_shape);
        let grad = Tensor::from_vec(vec![g; total], &self.input_shape).unwrap();
        vec![Some(grad)]
    }

    fn name(&self) -> &'static str {
        "SumBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Mean Backward
// =============================================================================

/// Gradient function for mean reduction.
///
/// The scalar gradient is divided by the element count and broadcast back.
#[derive(Debug)]
pub struct MeanBackward {
    next_fns: Vec<Option<GradFn>>,
    input_shape: Vec<usize>,
}

impl MeanBackward {
    /// Creates a new `MeanBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, input_shape: Vec<usize>) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            input_shape,
        }
    }
}

impl GradientFunction for MeanBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let total = numel(&self.input_shape);
        let g = grad_output.to_vec()[0] / total as f32;
        let grad = Tensor::from_vec(vec![g; total], &self.input_shape).unwrap();
        vec![Some(grad)]
    }

    fn name(&self) -> &'static str {
        "MeanBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Tests
// =============================================================================
