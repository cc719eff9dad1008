//! Convolutional Adversarial Autoencoder Networks
//!
//! Encoder, generator and discriminator for 32x32 images. The encoder
//! compresses an image to a 1x1 latent map through four strided
//! convolutions; the generator mirrors it with four transposed
//! convolutions; the discriminator judges flattened latent vectors.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use advml_autograd::Variable;
use advml_nn::{functional, BatchNorm2d, Context, Conv2d, ConvTranspose2d, Linear, Module, Parameter};

use crate::DEFAULT_WIDTH;

// =============================================================================
// ConvEncoder
// =============================================================================

/// Convolutional encoder: image to latent code.
///
/// Architecture (hidden width `d`):
/// - Conv2d(in_channels, d/2, 4, stride 2, pad 1) -> LeakyReLU(0.2)
/// - Conv2d(d/2, 2d, 4, stride 2, pad 1) -> BatchNorm -> LeakyReLU(0.2)
/// - Conv2d(2d, 4d, 4, stride 2, pad 1) -> BatchNorm -> LeakyReLU(0.2)
/// - Conv2d(4d, latent_size, 4, stride 1, pad 0) -> Tanh
///
/// # Shape
/// - Input: (N, in_channels, 32, 32)
/// - Output: (N, latent_size, 1, 1), values in [-1, 1]
pub struct ConvEncoder {
    conv1: Conv2d,
    conv2: Conv2d,
    bn2: BatchNorm2d,
    conv3: Conv2d,
    bn3: BatchNorm2d,
    conv4: Conv2d,
    in_channels: usize,
    latent_size: usize,
}

impl ConvEncoder {
    /// Creates an encoder with the default hidden width (128).
    pub fn new(ctx: &mut Context, in_channels: usize, latent_size: usize) -> Self {
        Self::with_width(ctx, in_channels, latent_size, DEFAULT_WIDTH)
    }

    /// Creates an encoder with an explicit hidden width `d`.
    pub fn with_width(ctx: &mut Context, in_channels: usize, latent_size: usize, d: usize) -> Self {
        Self {
            conv1: Conv2d::with_options(ctx, in_channels, d / 2, (4, 4), (2, 2), (1, 1), true),
            conv2: Conv2d::with_options(ctx, d / 2, d * 2, (4, 4), (2, 2), (1, 1), true),
            bn2: BatchNorm2d::new(d * 2),
            conv3: Conv2d::with_options(ctx, d * 2, d * 4, (4, 4), (2, 2), (1, 1), true),
            bn3: BatchNorm2d::new(d * 4),
            conv4: Conv2d::with_options(ctx, d * 4, latent_size, (4, 4), (1, 1), (0, 0), true),
            in_channels,
            latent_size,
        }
    }

    /// Returns the number of input channels.
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Returns the latent dimensionality.
    pub fn latent_size(&self) -> usize {
        self.latent_size
    }
}

impl Module for ConvEncoder {
    fn forward(&self, input: &Variable) -> Variable {
        let x = functional::leaky_relu(&self.conv1.forward(input), 0.2);
        let x = functional::leaky_relu(&self.bn2.forward(&self.conv2.forward(&x)), 0.2);
        let x = functional::leaky_relu(&self.bn3.forward(&self.conv3.forward(&x)), 0.2);
        self.conv4.forward(&x).tanh()
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        params.extend(self.conv1.parameters());
        params.extend(self.conv2.parameters());
        params.extend(self.bn2.parameters());
        params.extend(self.conv3.parameters());
        params.extend(self.bn3.parameters());
        params.extend(self.conv4.parameters());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.bn2.set_training(training);
        self.bn3.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.bn2.is_training()
    }

    fn name(&self) -> &'static str {
        "ConvEncoder"
    }
}

// =============================================================================
// ConvGenerator
// =============================================================================

/// Convolutional generator: latent code to image.
///
/// Architecture (hidden width `d`):
/// - ConvTranspose2d(latent_size, 2d, 4, stride 1, pad 0) -> BatchNorm -> ReLU
/// - ConvTranspose2d(2d, 2d, 4, stride 2, pad 1) -> BatchNorm -> ReLU
/// - ConvTranspose2d(2d, d, 4, stride 2, pad 1) -> BatchNorm -> ReLU
/// - ConvTranspose2d(d, in_channels, 4, stride 2, pad 1) -> Tanh * 0.5 + 0.5
///
/// # Shape
/// - Input: (N, latent_size, 1, 1)
/// - Output: (N, in_channels, 32, 32), values in [0, 1]
pub struct ConvGenerator {
    deconv1: ConvTranspose2d,
    bn1: BatchNorm2d,
    deconv2: ConvTranspose2d,
    bn2: BatchNorm2d,
    deconv3: ConvTranspose2d,
    bn3: BatchNorm2d,
    deconv4: ConvTranspose2d,
    in_channels: usize,
    latent_size: usize,
}

impl ConvGenerator {
    /// Creates a generator with the default hidden width (128).
    pub fn new(ctx: &mut Context, in_channels: usize, latent_size: usize) -> Self {
        Self::with_width(ctx, in_channels, latent_size, DEFAULT_WIDTH)
    }

    /// Creates a generator with an explicit hidden width `d`.
    pub fn with_width(ctx: &mut Context, in_channels: usize, latent_size: usize, d: usize) -> Self {
        Self {
            deconv1: ConvTranspose2d::with_options(ctx, latent_size, d * 2, (4, 4), (1, 1), (0, 0), true),
            bn1: BatchNorm2d::new(d * 2),
            deconv2: ConvTranspose2d::with_options(ctx, d * 2, d * 2, (4, 4), (2, 2), (1, 1), true),
            bn2: BatchNorm2d::new(d * 2),
            deconv3: ConvTranspose2d::with_options(ctx, d * 2, d, (4, 4), (2, 2), (1, 1), true),
            bn3: BatchNorm2d::new(d),
            deconv4: ConvTranspose2d::with_options(ctx, d, in_channels, (4, 4), (2, 2), (1, 1), true),
            in_channels,
            latent_size,
        }
    }

    /// Returns the number of output channels.
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Returns the latent dimensionality.
    pub fn latent_size(&self) -> usize {
        self.latent_size
    }
}

impl Module for ConvGenerator {
    fn forward(&self, input: &Variable) -> Variable {
        let x = functional::relu(&self.bn1.forward(&self.deconv1.forward(input)));
        let x = functional::relu(&self.bn2.forward(&self.deconv2.forward(&x)));
        let x = functional::relu(&self.bn3.forward(&self.deconv3.forward(&x)));
        // Rescale tanh output from (-1, 1) to (0, 1)
        self.deconv4.forward(&x).tanh().mul_scalar(0.5).add_scalar(0.5)
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        params.extend(self.deconv1.parameters());
        params.extend(self.bn1.parameters());
        params.extend(self.deconv2.parameters());
        params.extend(self.bn2.parameters());
        params.extend(self.deconv3.parameters());
        params.extend(self.bn3.parameters());
        params.extend(self.deconv4.parameters());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.bn1.set_training(training);
        self.bn2.set_training(training);
        self.bn3.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.bn1.is_training()
    }

    fn name(&self) -> &'static str {
        "ConvGenerator"
    }
}

// =============================================================================
// ConvDiscriminator
// =============================================================================

/// Discriminator over flattened latent vectors.
///
/// Architecture (hidden width `d`):
/// - Linear(latent_size, d) -> LeakyReLU(0.2)
/// - Linear(d, d) -> LeakyReLU(0.2)
/// - Linear(d, 1) -> Sigmoid
///
/// # Shape
/// - Input: (N, latent_size)
/// - Output: (N, 1), values in (0, 1)
pub struct ConvDiscriminator {
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
    latent_size: usize,
}

impl ConvDiscriminator {
    /// Creates a discriminator with the default hidden width (128).
    pub fn new(ctx: &mut Context, latent_size: usize) -> Self {
        Self::with_width(ctx, latent_size, DEFAULT_WIDTH)
    }

    /// Creates a discriminator with an explicit hidden width `d`.
    pub fn with_width(ctx: &mut Context, latent_size: usize, d: usize) -> Self {
        Self {
            fc1: Linear::new(ctx, latent_size, d),
            fc2: Linear::new(ctx, d, d),
            fc3: Linear::new(ctx, d, 1),
            latent_size,
        }
    }

    /// Returns the latent dimensionality.
    pub fn latent_size(&self) -> usize {
        self.latent_size
    }
}

impl Module for ConvDiscriminator {
    fn forward(&self, input: &Variable) -> Variable {
        let x = functional::leaky_relu(&self.fc1.forward(input), 0.2);
        let x = functional::leaky_relu(&self.fc2.forward(&x), 0.2);
        self.fc3.forward(&x).sigmoid()
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        params.extend(self.fc1.parameters());
        params.extend(self.fc2.parameters());
        params.extend(self.fc3.parameters());
        params
    }

    fn name(&self) -> &'static str {
        "ConvDiscriminator"
    }
}

// =============================================================================
// Tests
// =============================================================================
