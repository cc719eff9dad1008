//! Advml NN - Neural Network Module Library
//!
//! Provides the layer and module abstractions the Advml networks are built
//! from: the `Module` trait, learnable `Parameter`s, an explicit execution
//! `Context`, weight initializers, activations, and the linear, convolution,
//! transposed-convolution and batch-normalization layers.
//!
//! # Key Components
//!
//! - **Module trait**: Core interface for all neural network modules
//! - **Parameter**: Wrapper for learnable parameters
//! - **Context**: Explicit execution context (device, dtype, seeded RNG)
//! - **Layers**: Linear, Conv2d, ConvTranspose2d, BatchNorm2d
//! - **Activations**: ReLU, LeakyReLU, Sigmoid, Tanh
//! - **Functional API**: Stateless activation operations
//!
//! # Example
//!
//! ```rust
//! use advml_nn::{Context, Linear, Module};
//! use advml_autograd::Variable;
//! use advml_tensor::Tensor;
//!
//! let mut ctx = Context::new(42);
//! let layer = Linear::new(&mut ctx, 4, 2);
//!
//! let input = Variable::new(Tensor::from_vec(vec![1.0; 4], &[1, 4]).unwrap(), false);
//! let output = layer.forward(&input);
//! assert_eq!(output.shape(), vec![1, 2]);
//! ```
//!
//! @version 0.1.0
//! @author `Advml` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
// Numeric library allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_arguments)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod activation;
pub mod context;
pub mod functional;
pub mod init;
pub mod layers;
pub mod module;
pub mod parameter;

// =============================================================================
// Re-exports
// =============================================================================

pub use context::Context;
pub use module::{Module, ModuleList};
pub use parameter::Parameter;

pub use layers::{BatchNorm2d, Conv2d, ConvTranspose2d, Linear};

pub use activation::{LeakyReLU, ReLU, Sigmoid, Tanh};

pub use init::{
    constant, kaiming_normal, kaiming_uniform, normal, ones, uniform_range, xavier_normal,
    xavier_uniform, zeros,
};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for neural network development.
pub mod prelude {
    pub use crate::{
        // Functional
        functional,
        BatchNorm2d,
        Conv2d,
        ConvTranspose2d,
        // Core traits and types
        Context,
        LeakyReLU,
        // Layers
        Linear,
        Module,
        ModuleList,
        Parameter,
        // Activations
        ReLU,
        Sigmoid,
        Tanh,
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use advml_autograd::Variable;
    use advml_tensor::Tensor;

    #[test]
    fn test_simple_mlp() {
        let mut ctx = Context::new(0);
        let fc1 = Linear::new(&mut ctx, 10, 5);
        let fc2 = Linear::new(&mut ctx, 5, 2);

        let input = Variable::new(Tensor::from_vec(vec![1.0; 20], &[2, 10]).unwrap(), false);
        let hidden = fc1.forward(&input).relu();
        let output = fc2.forward(&hidden);
        assert_eq!(output.shape(), vec![2, 2]);
    }

    #[test]
    fn test_module_parameters() {
        let mut ctx = Context::new(0);
        let mut list = ModuleList::new();
        list.push(Linear::new(&mut ctx, 10, 5));
        list.push(Linear::new(&mut ctx, 5, 2));

        // 2 Linear layers with weight + bias each = 4 parameters
        assert_eq!(list.parameters().len(), 4);
    }

    #[test]
    fn test_conv_stack() {
        let mut ctx = Context::new(0);
        let conv = Conv2d::with_options(&mut ctx, 1, 4, (4, 4), (2, 2), (1, 1), true);
        let bn = BatchNorm2d::new(4);

        let input = Variable::new(Tensor::from_vec(vec![0.5; 64], &[1, 1, 8, 8]).unwrap(), false);
        let output = bn.forward(&conv.forward(&input));
        assert_eq!(output.shape(), vec![1, 4, 4, 4]);
    }
}
