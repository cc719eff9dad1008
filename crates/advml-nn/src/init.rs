//! Weight Initialization - Parameter Initialization Strategies
//!
//! Initializers for layer parameters. Every random initializer draws from
//! the RNG handed to it (normally the execution context's), so construction
//! is reproducible from a seed.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use rand::Rng;

use advml_tensor::Tensor;

// =============================================================================
// Basic Initializers
// =============================================================================

/// Creates a tensor filled with zeros.
pub fn zeros(shape: &[usize]) -> Tensor<f32> {
    advml_tensor::zeros(shape)
}

/// Creates a tensor filled with ones.
pub fn ones(shape: &[usize]) -> Tensor<f32> {
    advml_tensor::ones(shape)
}

/// Creates a tensor filled with a constant value.
pub fn constant(shape: &[usize], value: f32) -> Tensor<f32> {
    advml_tensor::full(shape, value)
}

// =============================================================================
// Random Initializers
// =============================================================================

/// Creates a tensor with uniform random values in [low, high).
pub fn uniform_range<R: Rng + ?Sized>(
    rng: &mut R,
    shape: &[usize],
    low: f32,
    high: f32,
) -> Tensor<f32> {
    advml_tensor::uniform(rng, shape, low, high)
}

/// Creates a tensor with normal random values (specified mean and std).
pub fn normal<R: Rng + ?Sized>(rng: &mut R, shape: &[usize], mean: f32, std: f32) -> Tensor<f32> {
    advml_tensor::normal(rng, shape, mean, std)
}

// =============================================================================
// Xavier/Glorot Initialization
// =============================================================================

/// Xavier uniform initialization.
///
/// Designed for layers feeding tanh or sigmoid activations.
/// Samples from U(-a, a) where a = sqrt(6 / (fan_in + fan_out)).
pub fn xavier_uniform<R: Rng + ?Sized>(rng: &mut R, fan_out: usize, fan_in: usize) -> Tensor<f32> {
    let a = (6.0 / (fan_in + fan_out) as f32).sqrt();
    uniform_range(rng, &[fan_out, fan_in], -a, a)
}

/// Xavier normal initialization.
///
/// Samples from N(0, std) where std = sqrt(2 / (fan_in + fan_out)).
pub fn xavier_normal<R: Rng + ?Sized>(rng: &mut R, fan_out: usize, fan_in: usize) -> Tensor<f32> {
    let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
    normal(rng, &[fan_out, fan_in], 0.0, std)
}

// =============================================================================
// Kaiming/He Initialization
// =============================================================================

/// Kaiming uniform initialization.
///
/// Designed for layers feeding rectified activations.
/// Samples from U(-bound, bound) where bound = sqrt(6 / fan_in).
pub fn kaiming_uniform<R: Rng + ?Sized>(rng: &mut R, fan_out: usize, fan_in: usize) -> Tensor<f32> {
    let bound = (6.0 / fan_in as f32).sqrt();
    uniform_range(rng, &[fan_out, fan_in], -bound, bound)
}

/// Kaiming normal initialization.
///
/// Samples from N(0, std) where std = sqrt(2 / fan_in).
pub fn kaiming_normal<R: Rng + ?Sized>(rng: &mut R, fan_out: usize, fan_in: usize) -> Tensor<f32> {
    let std = (2.0 / fan_in as f32).sqrt();
    normal(rng, &[fan_out, fan_in], 0.0, std)
}

// =============================================================================
// Tests
// =============================================================================
