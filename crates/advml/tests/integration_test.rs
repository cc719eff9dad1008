//! Cross-crate integration tests for the Advml workspace.
//!
//! Exercises the six networks end-to-end through the facade crate: shape
//! contracts, output ranges, determinism, and gradient flow on the
//! fully-connected paths.

use advml::prelude::*;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic pseudo-image batch of shape (batch, channels, 32, 32).
fn image_batch(batch: usize, channels: usize, seed: u64) -> Variable {
    let mut rng = StdRng::seed_from_u64(seed);
    let tensor = advml::tensor::uniform::<f32, _>(&mut rng, &[batch, channels, 32, 32], 0.0, 1.0);
    Variable::new(tensor, false)
}

/// Deterministic latent batch of shape (batch, latent).
fn latent_batch(batch: usize, latent: usize, seed: u64) -> Variable {
    let mut rng = StdRng::seed_from_u64(seed);
    let tensor = advml::tensor::uniform::<f32, _>(&mut rng, &[batch, latent], -1.0, 1.0);
    Variable::new(tensor, false)
}

// =============================================================================
// Shape and Range Contracts
// =============================================================================

#[test]
fn conv_encoder_maps_image_to_bounded_latent() {
    let mut ctx = Context::new(0);
    let encoder = ConvEncoder::with_width(&mut ctx, 3, 16, 8);

    let code = encoder.forward(&image_batch(2, 3, 0));
    assert_eq!(code.shape(), vec![2, 16, 1, 1]);

    let values = code.data().to_vec();
    assert!(values.iter().all(|&v| (-1.0..=1.0).contains(&v)));
}

#[test]
fn conv_generator_maps_latent_to_unit_interval_image() {
    let mut ctx = Context::new(0);
    let generator = ConvGenerator::with_width(&mut ctx, 3, 16, 8);

    let latent = Variable::new(
        Tensor::from_vec(vec![0.2; 2 * 16], &[2, 16, 1, 1]).unwrap(),
        false,
    );
    let image = generator.forward(&latent);

    assert_eq!(image.shape(), vec![2, 3, 32, 32]);
    assert!(image
        .data()
        .to_vec()
        .iter()
        .all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn encode_generate_round_trip_preserves_shape() {
    let mut ctx = Context::new(7);
    let encoder = ConvEncoder::with_width(&mut ctx, 1, 8, 8);
    let generator = ConvGenerator::with_width(&mut ctx, 1, 8, 8);

    let input = image_batch(2, 1, 7);
    let reconstruction = generator.forward(&encoder.forward(&input));
    assert_eq!(reconstruction.shape(), input.shape());
}

#[test]
fn flat_round_trip_preserves_shape() {
    let mut ctx = Context::new(3);
    let encoder = FlatEncoder::new(&mut ctx, 784, 32);
    let generator = FlatGenerator::new(&mut ctx, 784, 32);

    let input = latent_batch(2, 784, 3);
    let reconstruction = generator.forward(&encoder.forward(&input));
    assert_eq!(reconstruction.shape(), vec![2, 784]);
}

#[test]
fn discriminators_emit_probabilities() {
    let mut ctx = Context::new(1);
    let conv_disc = ConvDiscriminator::with_width(&mut ctx, 16, 8);
    let flat_disc = FlatDiscriminator::new(&mut ctx, 16);

    let latent = latent_batch(4, 16, 1);

    for disc in [
        conv_disc.forward(&latent),
        flat_disc.forward(&latent),
    ] {
        assert_eq!(disc.shape(), vec![4, 1]);
        assert!(disc.data().to_vec().iter().all(|&v| v > 0.0 && v < 1.0));
    }
}

#[test]
fn flat_discriminator_accepts_odd_latent_size() {
    let mut ctx = Context::new(2);
    let disc = FlatDiscriminator::new(&mut ctx, 7);
    assert_eq!(disc.hidden_size(), 3);

    let prob = disc.forward(&latent_batch(2, 7, 2));
    assert_eq!(prob.shape(), vec![2, 1]);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn evaluation_mode_is_bit_deterministic() {
    let mut ctx = Context::new(11);
    let mut encoder = ConvEncoder::with_width(&mut ctx, 1, 8, 8);
    encoder.eval();

    let input = image_batch(1, 1, 11);
    let first = encoder.forward(&input).data().to_vec();
    let second = encoder.forward(&input).data().to_vec();
    assert_eq!(first, second);
}

#[test]
fn same_seed_contexts_build_identical_networks() {
    let build = |seed| {
        let mut ctx = Context::new(seed);
        FlatEncoder::new(&mut ctx, 64, 16)
    };

    let a = build(5);
    let b = build(5);
    let c = build(6);

    let input = latent_batch(2, 64, 5);
    assert_eq!(
        a.forward(&input).data().to_vec(),
        b.forward(&input).data().to_vec()
    );
    assert_ne!(
        a.forward(&input).data().to_vec(),
        c.forward(&input).data().to_vec()
    );
}

#[test]
fn training_mode_moves_running_statistics() {
    let bn = BatchNorm2d::new(2);

    let input = Variable::new(
        Tensor::from_vec(vec![4.0; 2 * 2 * 4], &[2, 2, 2, 2]).unwrap(),
        false,
    );
    let before = bn.running_mean().to_vec();
    bn.forward(&input);
    let after = bn.running_mean().to_vec();
    assert_ne!(before, after);
}

// =============================================================================
// Gradient Flow
// =============================================================================

#[test]
fn flat_discriminator_backward_reaches_all_parameters() {
    let mut ctx = Context::new(4);
    let disc = FlatDiscriminator::new(&mut ctx, 16);

    let latent = latent_batch(2, 16, 4);
    let loss = disc.forward(&latent).sum();
    loss.backward();

    for param in disc.parameters() {
        let grad = param.grad().expect("parameter should receive a gradient");
        assert_eq!(grad.shape(), param.shape().as_slice());
    }
}

#[test]
fn no_grad_forward_skips_tracking() {
    let mut ctx = Context::new(8);
    let disc = FlatDiscriminator::new(&mut ctx, 8);

    let latent = latent_batch(1, 8, 8);
    let prob = no_grad(|| disc.forward(&latent));
    assert!(!prob.requires_grad());
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_encoder_latent_always_bounded(
        seed in 0u64..500,
        latent_size in 2usize..12,
        batch in 1usize..3,
    ) {
        let mut ctx = Context::new(seed);
        let encoder = ConvEncoder::with_width(&mut ctx, 1, latent_size, 8);

        let code = encoder.forward(&image_batch(batch, 1, seed));
        prop_assert_eq!(code.shape(), vec![batch, latent_size, 1, 1]);
        prop_assert!(code.data().to_vec().iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn prop_generator_image_always_in_unit_interval(
        seed in 0u64..500,
        latent_size in 2usize..12,
    ) {
        let mut ctx = Context::new(seed);
        let generator = ConvGenerator::with_width(&mut ctx, 1, latent_size, 8);

        let mut rng = StdRng::seed_from_u64(seed);
        let latent = Variable::new(
            advml::tensor::randn::<f32, _>(&mut rng, &[1, latent_size, 1, 1]),
            false,
        );

        let image = generator.forward(&latent);
        prop_assert_eq!(image.shape(), vec![1, 1, 32, 32]);
        prop_assert!(image.data().to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
