//! Activation Modules - Non-linear Activation Functions
//!
//! Activation functions as modules, for composition alongside layers.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use advml_autograd::Variable;

use crate::module::Module;

// =============================================================================
// ReLU
// =============================================================================

/// Applies the rectified linear unit function element-wise.
///
/// ReLU(x) = max(0, x)
#[derive(Debug, Clone, Copy, Default)]
pub struct ReLU;

impl ReLU {
    /// Creates a new `ReLU` activation.
    pub fn new() -> Self {
        Self
    }
}

impl Module for ReLU {
    fn forward(&self, input: &Variable) -> Variable {
        input.relu()
    }

    fn name(&self) -> &'static str {
        "ReLU"
    }
}

// =============================================================================
// LeakyReLU
// =============================================================================

/// Applies the leaky rectification function element-wise.
///
/// LeakyReLU(x) = x for x > 0, negative_slope * x otherwise
#[derive(Debug, Clone, Copy)]
pub struct LeakyReLU {
    negative_slope: f32,
}

impl LeakyReLU {
    /// Creates a new `LeakyReLU` with default negative slope (0.01).
    pub fn new() -> Self {
        Self {
            negative_slope: 0.01,
        }
    }

    /// Creates a `LeakyReLU` with a custom negative slope.
    pub fn with_slope(negative_slope: f32) -> Self {
        Self { negative_slope }
    }

    /// Returns the negative slope.
    pub fn negative_slope(&self) -> f32 {
        self.negative_slope
    }
}

impl Default for LeakyReLU {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for LeakyReLU {
    fn forward(&self, input: &Variable) -> Variable {
        input.leaky_relu(self.negative_slope)
    }

    fn name(&self) -> &'static str {
        "LeakyReLU"
    }
}

// =============================================================================
// Sigmoid
// =============================================================================

/// Applies the sigmoid function element-wise.
///
/// Sigmoid(x) = 1 / (1 + exp(-x))
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Sigmoid {
    /// Creates a new `Sigmoid` activation.
    pub fn new() -> Self {
        Self
    }
}

impl Module for Sigmoid {
    fn forward(&self, input: &Variable) -> Variable {
        input.sigmoid()
    }

    fn name(&self) -> &'static str {
        "Sigmoid"
    }
}

// =============================================================================
// Tanh
// =============================================================================

/// Applies the hyperbolic tangent function element-wise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh;

impl Tanh {
    /// Creates a new `Tanh` activation.
    pub fn new() -> Self {
        Self
    }
}

impl Module for Tanh {
    fn forward(&self, input: &Variable) -> Variable {
        input.tanh()
    }

    fn name(&self) -> &'static str {
        "Tanh"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use advml_tensor::Tensor;

    fn var(values: Vec<f32>) -> Variable {
        let len = values.len();
        Variable::new(Tensor::from_vec(values, &[len]).unwrap(), false)
    }

    #[test]
    fn test_relu_module() {
        let out = ReLU::new().forward(&var(vec![-1.0, 2.0]));
        assert_eq!(out.data().to_vec(), vec![0.0, 2.0]);
    }

    #[test]
    fn test_leaky_relu_slope() {
        let act = LeakyReLU::with_slope(0.2);
        let out = act.forward(&var(vec![-1.0, 2.0]));
        assert_eq!(out.data().to_vec(), vec![-0.2, 2.0]);
        assert_eq!(act.negative_slope(), 0.2);
    }

    #[test]
    fn test_sigmoid_module_range() {
        let out = Sigmoid::new().forward(&var(vec![-10.0, 0.0, 10.0]));
        assert!(out.data().to_vec().iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_tanh_module_range() {
        let out = Tanh::new().forward(&var(vec![-10.0, 0.0, 10.0]));
        assert!(out
            .data()
            .to_vec()
            .iter()
            .all(|&v| (-1.0..=1.0).contains(&v)));
    }
}
