//! # Advml - Adversarial Autoencoder Networks in Pure Rust
//!
//! Advml provides the forward-computation graphs of an adversarial
//! autoencoder: convolutional encoder/generator/discriminator networks for
//! 32x32 images and fully-connected counterparts for small flattened
//! inputs, built on a compact tensor/autograd substrate.
//!
//! ## Workspace Layout
//!
//! - **core**: devices, dtypes, errors, storage, CPU backend
//! - **tensor**: N-dimensional `Tensor` with broadcasting and views
//! - **autograd**: `Variable` with reverse-mode automatic differentiation
//! - **nn**: `Module` trait, `Parameter`, execution `Context`, layers
//! - **models**: the six adversarial-autoencoder networks
//!
//! The networks hold learnable parameters and compute forward passes;
//! training loops, losses, optimizers and data pipelines live with the
//! caller.
//!
//! # Quick Start
//!
//! ```rust
//! use advml::prelude::*;
//!
//! // Explicit execution context: device, dtype and RNG seed
//! let mut ctx = Context::new(42);
//!
//! // Encoder and generator over 1-channel 32x32 images, hidden width 8
//! let encoder = ConvEncoder::with_width(&mut ctx, 1, 16, 8);
//! let generator = ConvGenerator::with_width(&mut ctx, 1, 16, 8);
//!
//! let image = Variable::new(
//!     Tensor::from_vec(vec![0.5; 32 * 32], &[1, 1, 32, 32]).unwrap(),
//!     false,
//! );
//!
//! let code = encoder.forward(&image);
//! let reconstruction = generator.forward(&code);
//! assert_eq!(reconstruction.shape(), image.shape());
//! ```
//!
//! @version 0.1.0
//! @author `Advml` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

// =============================================================================
// Subcrate Re-exports
// =============================================================================

pub use advml_autograd as autograd;
pub use advml_core as core;
pub use advml_models as models;
pub use advml_nn as nn;
pub use advml_tensor as tensor;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for working with the networks.
pub mod prelude {
    // Core types
    pub use advml_core::{DType, Device, Error, Result};

    // Tensors
    pub use advml_tensor::Tensor;

    // Autograd
    pub use advml_autograd::{no_grad, Variable};

    // Neural network building blocks
    pub use advml_nn::{
        functional, BatchNorm2d, Context, Conv2d, ConvTranspose2d, LeakyReLU, Linear, Module,
        ModuleList, Parameter, ReLU, Sigmoid, Tanh,
    };

    // Network architectures
    pub use advml_models::{
        ConvDiscriminator, ConvEncoder, ConvGenerator, FlatDiscriminator, FlatEncoder,
        FlatGenerator, DEFAULT_WIDTH,
    };
}

// =============================================================================
// Version Information
// =============================================================================

/// Returns the version of the Advml workspace.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// Tests
// =============================================================================
