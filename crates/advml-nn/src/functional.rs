//! Functional API - Stateless Neural Network Operations
//!
//! Functional versions of operations that don't require module state. The
//! network forward passes use these directly.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use advml_autograd::Variable;

// =============================================================================
// Activation Functions
// =============================================================================

/// `ReLU` activation function.
pub fn relu(input: &Variable) -> Variable {
    input.relu()
}

/// Leaky `ReLU` activation function.
pub fn leaky_relu(input: &Variable, negative_slope: f32) -> Variable {
    input.leaky_relu(negative_slope)
}

/// Sigmoid activation function.
pub fn sigmoid(input: &Variable) -> Variable {
    input.sigmoid()
}

/// Tanh activation function.
pub fn tanh(input: &Variable) -> Variable {
    input.tanh()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use advml_tensor::Tensor;

    #[test]
    fn test_functional_matches_variable_ops() {
        let v = Variable::new(Tensor::from_vec(vec![-2.0, 3.0], &[2]).unwrap(), false);

        assert_eq!(relu(&v).data().to_vec(), v.relu().data().to_vec());
        assert_eq!(
            leaky_relu(&v, 0.2).data().to_vec(),
            v.leaky_relu(0.2).data().to_vec()
        );
        assert_eq!(sigmoid(&v).data().to_vec(), v.sigmoid().data().to_vec());
        assert_eq!(tanh(&v).data().to_vec(), v.tanh().data().to_vec());
    }
}
