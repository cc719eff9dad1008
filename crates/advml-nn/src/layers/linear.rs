//! Linear Layer - Fully Connected Layer
//!
//! Applies a linear transformation: y = xW^T + b
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use std::collections::HashMap;

use advml_autograd::Variable;
use advml_tensor::Tensor;

use crate::context::Context;
use crate::init::{kaiming_uniform, zeros};
use crate::module::Module;
use crate::parameter::Parameter;

// =============================================================================
// Linear
// =============================================================================

/// Applies a linear transformation to the input.
///
/// y = xW^T + b
///
/// # Shape
/// - Input: (*, in_features) where * means any number of leading dimensions
/// - Output: (*, out_features)
///
/// # Example
/// ```rust
/// use advml_nn::{Context, Linear, Module};
/// use advml_autograd::Variable;
/// use advml_tensor::Tensor;
///
/// let mut ctx = Context::new(0);
/// let linear = Linear::new(&mut ctx, 20, 30);
/// let input = Variable::new(Tensor::from_vec(vec![0.0; 20], &[1, 20]).unwrap(), false);
/// assert_eq!(linear.forward(&input).shape(), vec![1, 30]);
/// ```
pub struct Linear {
    /// Weight matrix of shape (out_features, in_features).
    pub weight: Parameter,
    /// Bias vector of shape (out_features).
    pub bias: Option<Parameter>,
    /// Input features.
    in_features: usize,
    /// Output features.
    out_features: usize,
}

impl Linear {
    /// Creates a new Linear layer with bias.
    pub fn new(ctx: &mut Context, in_features: usize, out_features: usize) -> Self {
        Self::with_bias(ctx, in_features, out_features, true)
    }

    /// Creates a new Linear layer with optional bias.
    pub fn with_bias(
        ctx: &mut Context,
        in_features: usize,
        out_features: usize,
        bias: bool,
    ) -> Self {
        let weight_data = kaiming_uniform(ctx.rng(), out_features, in_features);
        let weight = Parameter::named("weight", weight_data, true);

        let bias_param = if bias {
            Some(Parameter::named("bias", zeros(&[out_features]), true))
        } else {
            None
        };

        Self {
            weight,
            bias: bias_param,
            in_features,
            out_features,
        }
    }

    /// Creates a Linear layer from existing weight and bias tensors.
    pub fn from_weights(weight: Tensor<f32>, bias: Option<Tensor<f32>>) -> Self {
        let out_features = weight.shape()[0];
        let in_features = weight.shape()[1];

        Self {
            weight: Parameter::named("weight", weight, true),
            bias: bias.map(|b| Parameter::named("bias", b, true)),
            in_features,
            out_features,
        }
    }

    /// Returns the input feature dimension.
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Returns the output feature dimension.
    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Variable) -> Variable {
        let input_shape = input.shape();
        let batch_dims: Vec<usize> = input_shape[..input_shape.len() - 1].to_vec();

        // Collapse leading dimensions to a single batch axis
        let total_batch: usize = batch_dims.iter().product();
        let input_2d = if input_shape.len() > 2 {
            input.reshape(&[total_batch, self.in_features])
        } else {
            input.clone()
        };

        // y = x @ W^T
        let weight_t = self.weight.variable().transpose(0, 1);
        let mut output = input_2d.matmul(&weight_t);

        if let Some(ref bias) = self.bias {
            output = output.add_var(&bias.variable());
        }

        // Restore leading dimensions
        if input_shape.len() > 2 {
            let mut output_shape = batch_dims;
            output_shape.push(self.out_features);
            output.reshape(&output_shape)
        } else {
            output
        }
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = vec![self.weight.clone()];
        if let Some(ref bias) = self.bias {
            params.push(bias.clone());
        }
        params
    }

    fn named_parameters(&self) -> HashMap<String, Parameter> {
        let mut params = HashMap::new();
        params.insert("weight".to_string(), self.weight.clone());
        if let Some(ref bias) = self.bias {
            params.insert("bias".to_string(), bias.clone());
        }
        params
    }

    fn name(&self) -> &'static str {
        "Linear"
    }
}

impl std::fmt::Debug for Linear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linear")
            .field("in_features", &self.in_features)
            .field("out_features", &self.out_features)
            .field("bias", &self.bias.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_creation() {
        let mut ctx = Context::new(0);
        let linear = Linear::new(&mut ctx, 10, 5);
        assert_eq!(linear.in_features(), 10);
        assert_eq!(linear.out_features(), 5);
        assert!(linear.bias.is_some());
    }

    #[test]
    fn test_linear_no_bias() {
        let mut ctx = Context::new(0);
        let linear = Linear::with_bias(&mut ctx, 10, 5, false);
        assert!(linear.bias.is_none());
        assert_eq!(linear.parameters().len(), 1);
    }

    #[test]
    fn test_linear_forward_shape() {
        let mut ctx = Context::new(0);
        let linear = Linear::new(&mut ctx, 3, 2);

        let input = Variable::new(
            Tensor::from_vec(vec![1.0, 2.0, 3.0], &[1, 3]).unwrap(),
            false,
        );
        assert_eq!(linear.forward(&input).shape(), vec![1, 2]);
    }

    #[test]
    fn test_linear_known_values() {
        // W = [[1, 0], [0, 1], [1, 1]], b = [0.5, -0.5]
        let weight = Tensor::from_vec(vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0], &[3, 2]).unwrap();
        let bias = Tensor::from_vec(vec![0.5, -0.5, 0.0], &[3]).unwrap();
        let linear = Linear::from_weights(weight, Some(bias));

        let input = Variable::new(Tensor::from_vec(vec![2.0, 3.0], &[1, 2]).unwrap(), false);
        let output = linear.forward(&input);

        assert_eq!(output.data().to_vec(), vec![2.5, 2.5, 5.0]);
    }

    #[test]
    fn test_linear_batch_forward() {
        let mut ctx = Context::new(0);
        let linear = Linear::new(&mut ctx, 4, 2);

        let input = Variable::new(Tensor::from_vec(vec![1.0; 12], &[3, 4]).unwrap(), false);
        assert_eq!(linear.forward(&input).shape(), vec![3, 2]);
    }

    #[test]
    fn test_linear_flattens_leading_dims() {
        let mut ctx = Context::new(0);
        let linear = Linear::new(&mut ctx, 4, 2);

        let input = Variable::new(Tensor::from_vec(vec![1.0; 24], &[2, 3, 4]).unwrap(), false);
        assert_eq!(linear.forward(&input).shape(), vec![2, 3, 2]);
    }

    #[test]
    fn test_linear_num_parameters() {
        let mut ctx = Context::new(0);
        let linear = Linear::new(&mut ctx, 10, 5);
        // weight: 10*5 = 50, bias: 5
        assert_eq!(linear.num_parameters(), 55);
    }

    #[test]
    fn test_linear_gradient_flows_to_weight() {
        let mut ctx = Context::new(0);
        let linear = Linear::new(&mut ctx, 3, 2);

        let input = Variable::new(
            Tensor::from_vec(vec![1.0, 2.0, 3.0], &[1, 3]).unwrap(),
            false,
        );
        let loss = linear.forward(&input).sum();
        loss.backward();

        let grad = linear.weight.grad().expect("weight gradient");
        assert_eq!(grad.shape(), &[2, 3]);
        // dL/dW rows are the input
        assert_eq!(grad.to_vec(), vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
    }
}
