//! Fully-Connected Adversarial Autoencoder Networks
//!
//! The small, fully-connected counterparts of the convolutional networks,
//! for flattened inputs such as 28x28 digit images (784 values per sample).
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use advml_autograd::Variable;
use advml_nn::{functional, Context, Linear, Module, Parameter};

// =============================================================================
// FlatEncoder
// =============================================================================

/// Fully-connected encoder: flattened input to latent vector.
///
/// Architecture:
/// - Linear(in_channels, latent_size) -> LeakyReLU(0.2)
/// - Linear(latent_size, latent_size) -> Tanh
///
/// # Shape
/// - Input: (N, in_channels) where in_channels is the flattened pixel count
/// - Output: (N, latent_size), values in [-1, 1]
pub struct FlatEncoder {
    fc1: Linear,
    fc2: Linear,
    in_channels: usize,
    latent_size: usize,
}

impl FlatEncoder {
    /// Creates a new encoder.
    pub fn new(ctx: &mut Context, in_channels: usize, latent_size: usize) -> Self {
        Self {
            fc1: Linear::new(ctx, in_channels, latent_size),
            fc2: Linear::new(ctx, latent_size, latent_size),
            in_channels,
            latent_size,
        }
    }

    /// Returns the flattened input width.
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Returns the latent dimensionality.
    pub fn latent_size(&self) -> usize {
        self.latent_size
    }
}

impl Module for FlatEncoder {
    fn forward(&self, input: &Variable) -> Variable {
        let x = functional::leaky_relu(&self.fc1.forward(input), 0.2);
        self.fc2.forward(&x).tanh()
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        params.extend(self.fc1.parameters());
        params.extend(self.fc2.parameters());
        params
    }

    fn name(&self) -> &'static str {
        "FlatEncoder"
    }
}

// =============================================================================
// FlatGenerator
// =============================================================================

/// Fully-connected generator: latent vector to reconstruction.
///
/// Architecture:
/// - Linear(latent_size, out_channels) -> LeakyReLU(0.2)
/// - Linear(out_channels, out_channels) -> LeakyReLU(0.2)
///
/// # Shape
/// - Input: (N, latent_size)
/// - Output: (N, out_channels), unbounded
pub struct FlatGenerator {
    fc1: Linear,
    fc2: Linear,
    out_channels: usize,
    latent_size: usize,
}

impl FlatGenerator {
    /// Creates a new generator.
    pub fn new(ctx: &mut Context, out_channels: usize, latent_size: usize) -> Self {
        Self {
            fc1: Linear::new(ctx, latent_size, out_channels),
            fc2: Linear::new(ctx, out_channels, out_channels),
            out_channels,
            latent_size,
        }
    }

    /// Returns the flattened output width.
    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    /// Returns the latent dimensionality.
    pub fn latent_size(&self) -> usize {
        self.latent_size
    }
}

impl Module for FlatGenerator {
    fn forward(&self, input: &Variable) -> Variable {
        let x = functional::leaky_relu(&self.fc1.forward(input), 0.2);
        functional::leaky_relu(&self.fc2.forward(&x), 0.2)
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        params.extend(self.fc1.parameters());
        params.extend(self.fc2.parameters());
        params
    }

    fn name(&self) -> &'static str {
        "FlatGenerator"
    }
}

// =============================================================================
// FlatDiscriminator
// =============================================================================

/// Fully-connected discriminator over latent vectors.
///
/// Architecture:
/// - Linear(latent_size, latent_size / 2) -> LeakyReLU(0.2)
/// - Linear(latent_size / 2, 1) -> Sigmoid
///
/// The hidden width uses floor division: odd latent sizes narrow to
/// `latent_size / 2` rather than erroring.
///
/// # Shape
/// - Input: (N, latent_size)
/// - Output: (N, 1), values in (0, 1)
pub struct FlatDiscriminator {
    fc1: Linear,
    fc2: Linear,
    latent_size: usize,
}

impl FlatDiscriminator {
    /// Creates a new discriminator.
    pub fn new(ctx: &mut Context, latent_size: usize) -> Self {
        Self {
            fc1: Linear::new(ctx, latent_size, latent_size / 2),
            fc2: Linear::new(ctx, latent_size / 2, 1),
            latent_size,
        }
    }

    /// Returns the latent dimensionality.
    pub fn latent_size(&self) -> usize {
        self.latent_size
    }

    /// Returns the hidden width (`latent_size / 2`, floored).
    pub fn hidden_size(&self) -> usize {
        self.fc1.out_features()
    }
}

impl Module for FlatDiscriminator {
    fn forward(&self, input: &Variable) -> Variable {
        let x = functional::leaky_relu(&self.fc1.forward(input), 0.2);
        self.fc2.forward(&x).sigmoid()
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        params.extend(self.fc1.parameters());
        params.extend(self.fc2.parameters());
        params
    }

    fn name(&self) -> &'static str {
        "FlatDiscriminator"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use advml_tensor::Tensor;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn batch(rows: usize, cols: usize, seed: u64) -> Variable {
        let mut rng = StdRng::seed_from_u64(seed);
        let values: Vec<f32> = (0..rows * cols).map(|_| rng.gen_range(-2.0..2.0)).collect();
        Variable::new(Tensor::from_vec(values, &[rows, cols]).unwrap(), false)
    }

    #[test]
    fn test_flat_encoder_shape_and_range() {
        let mut ctx = Context::new(0);
        let encoder = FlatEncoder::new(&mut ctx, 784, 32);

        let output = encoder.forward(&batch(2, 784, 0));
        assert_eq!(output.shape(), vec![2, 32]);
        assert!(output
            .data()
            .to_vec()
            .iter()
            .all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_flat_generator_shape() {
        let mut ctx = Context::new(0);
        let generator = FlatGenerator::new(&mut ctx, 784, 32);

        let output = generator.forward(&batch(2, 32, 1));
        assert_eq!(output.shape(), vec![2, 784]);
    }

    #[test]
    fn test_flat_round_trip_shape() {
        let mut ctx = Context::new(0);
        let encoder = FlatEncoder::new(&mut ctx, 784, 32);
        let generator = FlatGenerator::new(&mut ctx, 784, 32);

        let input = batch(3, 784, 2);
        let reconstruction = generator.forward(&encoder.forward(&input));
        assert_eq!(reconstruction.shape(), input.shape());
    }

    #[test]
    fn test_flat_discriminator_probability() {
        let mut ctx = Context::new(0);
        let disc = FlatDiscriminator::new(&mut ctx, 32);

        let prob = disc.forward(&batch(4, 32, 3));
        assert_eq!(prob.shape(), vec![4, 1]);
        assert!(prob.data().to_vec().iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_flat_discriminator_odd_latent_narrows() {
        let mut ctx = Context::new(0);
        let disc = FlatDiscriminator::new(&mut ctx, 7);
        assert_eq!(disc.hidden_size(), 3);

        let prob = disc.forward(&batch(2, 7, 4));
        assert_eq!(prob.shape(), vec![2, 1]);
    }

    #[test]
    fn test_flat_forward_deterministic() {
        let mut ctx = Context::new(5);
        let encoder = FlatEncoder::new(&mut ctx, 16, 4);

        let input = batch(2, 16, 6);
        let a = encoder.forward(&input).data().to_vec();
        let b = encoder.forward(&input).data().to_vec();
        assert_eq!(a, b);
    }

    #[test]
    fn test_flat_parameter_counts() {
        let mut ctx = Context::new(0);
        let encoder = FlatEncoder::new(&mut ctx, 784, 32);

        // fc1: 784*32 + 32, fc2: 32*32 + 32
        assert_eq!(encoder.num_parameters(), 784 * 32 + 32 + 32 * 32 + 32);
        assert_eq!(encoder.parameters().len(), 4);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_discriminator_output_in_unit_interval(
            seed in 0u64..1000,
            latent_size in 2usize..24,
        ) {
            let mut ctx = Context::new(seed);
            let disc = FlatDiscriminator::new(&mut ctx, latent_size);

            let prob = disc.forward(&batch(2, latent_size, seed));
            prop_assert!(prob.data().to_vec().iter().all(|&v| v > 0.0 && v < 1.0));
        }

        #[test]
        fn prop_encoder_output_bounded(
            seed in 0u64..1000,
            latent_size in 2usize..16,
        ) {
            let mut ctx = Context::new(seed);
            let encoder = FlatEncoder::new(&mut ctx, 24, latent_size);

            let code = encoder.forward(&batch(2, 24, seed));
            prop_assert!(code.data().to_vec().iter().all(|&v| (-1.0..=1.0).contains(&v)));
        }
    }
}
