//! Gradient Function Traits - Differentiable Operation Interface
//!
//! Each differentiable operation records a gradient function describing how
//! gradients flow backward through it. The backward pass walks these
//! functions from the output toward the leaves.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;

use advml_tensor::Tensor;

// =============================================================================
// Gradient Function Trait
// =============================================================================

/// Trait for gradient computation functions.
///
/// Each differentiable operation creates a `GradFn` that knows how to compute
/// the gradient with respect to its inputs given the gradient of its output.
pub trait GradientFunction: Debug + Send + Sync {
    /// Computes gradients with respect to inputs.
    ///
    /// # Arguments
    /// * `grad_output` - Gradient of the loss with respect to this operation's output
    ///
    /// # Returns
    /// One entry per input, aligned with `next_functions`. None entries
    /// indicate inputs that don't require gradients.
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>>;

    /// Returns the name of this gradient function for debugging.
    fn name(&self) -> &'static str;

    /// Returns the gradient functions of this operation's inputs.
    fn next_functions(&self) -> &[Option<GradFn>];
}

// =============================================================================
// GradFn - Arc Wrapper
// =============================================================================

/// Unique identifier for a `GradFn` that survives cloning.
///
/// Since `GradFn` wraps an Arc, the Arc's data pointer is a stable id.
pub type GradFnId = usize;

/// Reference-counted gradient function.
#[derive(Clone)]
pub struct GradFn {
    inner: Arc<dyn GradientFunction>,
}

impl GradFn {
    /// Creates a new `GradFn` from a gradient function.
    pub fn new<F: GradientFunction + 'static>(func: F) -> Self {
        Self {
            inner: Arc::new(func),
        }
    }

    /// Applies the gradient function.
    #[must_use]
    pub fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        self.inner.apply(grad_output)
    }

    /// Returns the name of the gradient function.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    /// Returns the next functions in the graph.
    #[must_use]
    pub fn next_functions(&self) -> &[Option<GradFn>] {
        self.inner.next_functions()
    }

    /// Returns a stable id for this `GradFn` that survives cloning.
    #[must_use]
    pub fn id(&self) -> GradFnId {
        let ptr = Arc::as_ptr(&self.inner);
        ptr.cast::<()>() as GradFnId
    }
}

impl Debug for GradFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GradFn({})", self.name())
    }
}

// =============================================================================
// Accumulate Grad - Leaf Node Gradient Function
// =============================================================================

/// Shared gradient accumulator for leaf variables.
pub type GradAccumulator = Arc<RwLock<Option<Tensor<f32>>>>;

/// Gradient function for leaf variables (accumulates gradients).
pub struct AccumulateGrad {
    /// Shared gradient storage with the Variable.
    grad_accumulator: GradAccumulator,
}

impl AccumulateGrad {
    /// Creates a new `AccumulateGrad` with a shared gradient accumulator.
    pub fn new(grad_accumulator: GradAccumulator) -> Self {
        Self { grad_accumulator }
    }

    /// Accumulates gradient into the shared storage.
    pub fn accumulate(&self, grad: &Tensor<f32>) {
        let mut guard = self.grad_accumulator.write();
        if let Some(ref existing) = *guard {
            *guard = Some(existing.add(grad).unwrap());
        } else {
            *guard = Some(grad.clone());
        }
    }
}

impl Debug for AccumulateGrad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccumulateGrad").finish()
    }
}

impl GradientFunction for AccumulateGrad {
    fn apply(&self, grad_output: &Tensor<f32>) -> Vec<Option<Tensor<f32>>> {
        self.accumulate(grad_output);
        // Leaf node, nothing to propagate further
        vec![]
    }

    fn name(&self) -> &'static str {
        "AccumulateGrad"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &[]
    }
}

// =============================================================================
// Tests
// =============================================================================
