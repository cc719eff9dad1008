//! Advml Models - Adversarial Autoencoder Network Architectures
//!
//! The network definitions of the workspace: a convolutional
//! encoder/generator/discriminator triple for 32x32 images, and a
//! fully-connected triple for small flattened inputs. Each network is a
//! plain struct of layers implementing the `Module` trait; no component
//! depends on another, and all are composed by an external training driver.
//!
//! # Architectures
//!
//! Convolutional (32x32 images, hidden width `d`, default 128):
//! - [`ConvEncoder`]: image -> latent code in [-1, 1]
//! - [`ConvGenerator`]: latent code -> image in [0, 1]
//! - [`ConvDiscriminator`]: latent vector -> probability in (0, 1)
//!
//! Fully-connected (flattened inputs):
//! - [`FlatEncoder`]: flattened input -> latent vector in [-1, 1]
//! - [`FlatGenerator`]: latent vector -> reconstruction (unbounded)
//! - [`FlatDiscriminator`]: latent vector -> probability in (0, 1)
//!
//! # Example
//!
//! ```rust
//! use advml_models::ConvEncoder;
//! use advml_nn::{Context, Module};
//! use advml_autograd::Variable;
//! use advml_tensor::Tensor;
//!
//! let mut ctx = Context::new(42);
//! let encoder = ConvEncoder::with_width(&mut ctx, 1, 16, 8);
//!
//! let image = Variable::new(Tensor::from_vec(vec![0.5; 32 * 32], &[1, 1, 32, 32]).unwrap(), false);
//! let code = encoder.forward(&image);
//! assert_eq!(code.shape(), vec![1, 16, 1, 1]);
//! ```
//!
//! @version 0.1.0
//! @author `Advml` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
// Numeric library allowances
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]

// =============================================================================
// Modules
// =============================================================================

pub mod conv;
pub mod flat;

// =============================================================================
// Re-exports
// =============================================================================

pub use conv::{ConvDiscriminator, ConvEncoder, ConvGenerator};
pub use flat::{FlatDiscriminator, FlatEncoder, FlatGenerator};

/// Default hidden width multiplier `d` for the convolutional networks.
pub const DEFAULT_WIDTH: usize = 128;
