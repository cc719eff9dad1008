//! Linear Algebra Gradient Functions
//!
//! Gradient functions for matrix multiplication and the shape operations
//! that participate in gradient flow.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use advml_tensor::Tensor;

use crate::grad_fn::{GradFn, GradientFunction};

// =============================================================================
// MatMul Backward
// =============================================================================

/// Gradient function for matrix multiplication C = A @ B.
///
/// dL/dA = dL/dC @ B^T, dL/dB = A^T @ dL/dC
#[derive(Debug)]
pub struct MatMulBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_lhs: Tensor<f32>,
    saved_rhs: Tensor<f32>,
}

impl MatMulBackward {
    /// Creates a new `MatMulBackward`.
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

impl GradientFunction for MatMulBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let ndim = grad_output.ndim() as i64;

        let rhs_t = self.saved_rhs.transpose(ndim - 2, ndim - 1).unwrap();
        let grad_lhs = grad_output.matmul(&rhs_t).unwrap();

        let lhs_t = self.saved_lhs.transpose(ndim - 2, ndim - 1).unwrap();
        let grad_rhs = lhs_t.matmul(grad_output).unwrap();

        vec![Some(grad_lhs), Some(grad_rhs)]
    }

    fn name(&self) -> &'static str {
        "MatMulBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Reshape Backward
// =============================================================================

/// Gradient function for reshape.
///
/// The gradient is reshaped back to the original input shape.
#[derive(Debug)]
pub struct ReshapeBackward {
    next_fns: Vec<Option<GradFn>>,
    input_shape: Vec<usize>,
}

impl ReshapeBackward {
    /// Creates a new `ReshapeBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, input_shape: Vec<usize>) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            input_shape,
        }
    }
}

impl GradientFunction for ReshapeBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let isize_shape: Vec<isize> = self.input_shape.iter().map(|&d| d as isize).collect();
        let grad = grad_output.reshape(&isize_shape).unwrap();
        vec![Some(grad)]
    }

    fn name(&self) -> &'static str {
        "ReshapeBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Transpose Backward
// =============================================================================

/// Gradient function for transpose.
///
/// The gradient is transposed back over the same pair of dimensions.
#[derive(Debug)]
pub struct TransposeBackward {
    next_fns: Vec<Option<GradFn>>,
    dim0: usize,
    dim1: usize,
}

impl TransposeBackward {
    /// Creates a new `TransposeBackward`.
    #[must_use]
    pub fn new(input_grad_fn: Option<GradFn>, dim0: usize, dim1: usize) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            dim0,
            dim1,
        }
    }
}

impl GradientFunction for TransposeBackward {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        let grad = grad_output
            .transpose(self.dim0 as i64, self.dim1 as i64)
            .unwrap();
        vec![Some(grad.contiguous())]
    }

    fn name(&self) -> &'static str {
        "TransposeBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }
}

// =============================================================================
// Tests
// =============================================================================
