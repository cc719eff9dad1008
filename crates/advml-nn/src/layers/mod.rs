//! Neural Network Layers
//!
//! The layer vocabulary of the workspace: fully-connected, convolution,
//! transposed convolution and batch normalization.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

pub mod conv;
pub mod linear;
pub mod norm;

pub use conv::{Conv2d, ConvTranspose2d};
pub use linear::Linear;
pub use norm::BatchNorm2d;
