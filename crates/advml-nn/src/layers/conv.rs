//! Convolutional Layers - 2D Convolution and Transposed Convolution
//!
//! Direct (loop-based) convolution over 4D image tensors. The transposed
//! variant scatters each input element across the output, which is the
//! upsampling operation generators are built from.
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
// Conv2d
// =============================================================================

/// Applies a 2D convolution over an input image.
///
/// # Shape
/// - Input: (N, C_in, H, W)
/// - Output: (N, C_out, H_out, W_out)
///
/// where H_out = (H + 2*padding - kernel_size) / stride + 1
pub struct Conv2d {
    /// Weight tensor of shape (out_channels, in_channels, kernel_h, kernel_w).
    pub weight: Parameter,
    /// Bias tensor of shape (out_channels).
    pub bias: Option<Parameter>,
    /// Number of input channels.
    in_channels: usize,
    /// Number of output channels.
    out_channels: usize,
    /// Size of the convolving kernel (height, width).
    kernel_size: (usize, usize),
    /// Stride of the convolution (height, width).
    stride: (usize, usize),
    /// Zero-padding added to both sides (height, width).
    padding: (usize, usize),
}

impl Conv2d {
    /// Creates a new Conv2d layer with a square kernel, stride 1, no padding.
    pub fn new(
        ctx: &mut Context,
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
    ) -> Self {
        Self::with_options(
            ctx,
            in_channels,
            out_channels,
            (kernel_size, kernel_size),
            (1, 1),
            (0, 0),
            true,
        )
    }

    /// Creates a Conv2d layer with all options.
    pub fn with_options(
        ctx: &mut Context,
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        bias: bool,
    ) -> Self {
        let (kh, kw) = kernel_size;
        let fan_in = in_channels * kh * kw;

        let weight_data = kaiming_uniform(ctx.rng(), out_channels, fan_in)
            .reshape(&[
                out_channels as isize,
                in_channels as isize,
                kh as isize,
                kw as isize,
            ])
            .unwrap();
        let weight = Parameter::named("weight", weight_data, true);

        let bias_param = if bias {
            Some(Parameter::named("bias", zeros(&[out_channels]), true))
        } else {
            None
        };

        Self {
            weight,
            bias: bias_param,
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
        }
    }

    /// Returns the number of input channels.
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Returns the number of output channels.
    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    /// Returns the output spatial size for a given input size.
    pub fn output_size(&self, in_height: usize, in_width: usize) -> (usize, usize) {
        let (kh, kw) = self.kernel_size;
        let (sh, sw) = self.stride;
        let (ph, pw) = self.padding;
        (
            (in_height + 2 * ph - kh) / sh + 1,
            (in_width + 2 * pw - kw) / sw + 1,
        )
    }
}

impl Module for Conv2d {
    fn forward(&self, input: &Variable) -> Variable {
        let input_shape = input.shape();
        let batch_size = input_shape[0];
        let in_height = input_shape[2];
        let in_width = input_shape[3];

        let (kh, kw) = self.kernel_size;
        let (sh, sw) = self.stride;
        let (ph, pw) = self.padding;

        let (out_height, out_width) = self.output_size(in_height, in_width);

        let input_vec = input.data().to_vec();
        let weight_vec = self.weight.data().to_vec();
        let bias_vec = self.bias.as_ref().map(|b| b.data().to_vec());

        let mut output_data = vec![0.0f32; batch_size * self.out_channels * out_height * out_width];

        for b in 0..batch_size {
            for oc in 0..self.out_channels {
                let channel_bias = bias_vec.as_ref().map_or(0.0, |bv| bv[oc]);

                for oh in 0..out_height {
                    for ow in 0..out_width {
                        let mut sum = channel_bias;

                        for ic in 0..self.in_channels {
                            for ki in 0..kh {
                                for kj in 0..kw {
                                    let ih = oh * sh + ki;
                                    let iw = ow * sw + kj;

                                    // Positions inside the zero padding contribute nothing
                                    if ih < ph
                                        || ih >= in_height + ph
                                        || iw < pw
                                        || iw >= in_width + pw
                                    {
                                        continue;
                                    }

                                    let input_idx = b * self.in_channels * in_height * in_width
                                        + ic * in_height * in_width
                                        + (ih - ph) * in_width
                                        + (iw - pw);

                                    let weight_idx = oc * self.in_channels * kh * kw
                                        + ic * kh * kw
                                        + ki * kw
                                        + kj;

                                    sum += input_vec[input_idx] * weight_vec[weight_idx];
                                }
                            }
                        }

                        let output_idx = b * self.out_channels * out_height * out_width
                            + oc * out_height * out_width
                            + oh * out_width
                            + ow;
                        output_data[output_idx] = sum;
                    }
                }
            }
        }

        let output_tensor = Tensor::from_vec(
            output_data,
            &[batch_size, self.out_channels, out_height, out_width],
        )
        .unwrap();

        Variable::new(output_tensor, input.requires_grad())
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
        "Conv2d"
    }
}

// =============================================================================
// ConvTranspose2d
// =============================================================================

/// Applies a 2D transposed convolution over an input image.
///
/// The transpose of `Conv2d`'s forward pass: each input element is scattered
/// across a kernel-sized output window, increasing spatial resolution.
///
/// # Shape
/// - Input: (N, C_in, H, W)
/// - Output: (N, C_out, H_out, W_out)
///
/// where H_out = (H - 1) * stride - 2*padding + kernel_size
pub struct ConvTranspose2d {
    /// Weight tensor of shape (in_channels, out_channels, kernel_h, kernel_w).
    pub weight: Parameter,
    /// Bias tensor of shape (out_channels).
    pub bias: Option<Parameter>,
    /// Number of input channels.
    in_channels: usize,
    /// Number of output channels.
    out_channels: usize,
    /// Size of the kernel (height, width).
    kernel_size: (usize, usize),
    /// Stride of the convolution (height, width).
    stride: (usize, usize),
    /// Padding removed from both sides of the output (height, width).
    padding: (usize, usize),
}

impl ConvTranspose2d {
    /// Creates a new ConvTranspose2d layer with a square kernel, stride 1,
    /// no padding.
    pub fn new(
        ctx: &mut Context,
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
    ) -> Self {
        Self::with_options(
            ctx,
            in_channels,
            out_channels,
            (kernel_size, kernel_size),
            (1, 1),
            (0, 0),
            true,
        )
    }

    /// Creates a ConvTranspose2d layer with all options.
    pub fn with_options(
        ctx: &mut Context,
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        bias: bool,
    ) -> Self {
        let (kh, kw) = kernel_size;

        let weight_data = kaiming_uniform(ctx.rng(), in_channels, out_channels * kh * kw)
            .reshape(&[
                in_channels as isize,
                out_channels as isize,
                kh as isize,
                kw as isize,
            ])
            .unwrap();
        let weight = Parameter::named("weight", weight_data, true);

        let bias_param = if bias {
            Some(Parameter::named("bias", zeros(&[out_channels]), true))
        } else {
            None
        };

        Self {
            weight,
            bias: bias_param,
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
        }
    }

    /// Returns the number of input channels.
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Returns the number of output channels.
    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    /// Returns the output spatial size for a given input size.
    pub fn output_size(&self, in_height: usize, in_width: usize) -> (usize, usize) {
        let (kh, kw) = self.kernel_size;
        let (sh, sw) = self.stride;
        let (ph, pw) = self.padding;
        (
            (in_height - 1) * sh + kh - 2 * ph,
            (in_width - 1) * sw + kw - 2 * pw,
        )
    }
}

impl Module for ConvTranspose2d {
    fn forward(&self, input: &Variable) -> Variable {
        let input_shape = input.shape();
        let batch_size = input_shape[0];
        let in_height = input_shape[2];
        let in_width = input_shape[3];

        let (kh, kw) = self.kernel_size;
        let (sh, sw) = self.stride;
        let (ph, pw) = self.padding;

        let (out_height, out_width) = self.output_size(in_height, in_width);

        let input_vec = input.data().to_vec();
        let weight_vec = self.weight.data().to_vec();

        let mut output_data = vec![0.0f32; batch_size * self.out_channels * out_height * out_width];

        // Scatter each input element over its kernel window
        for b in 0..batch_size {
            for ic in 0..self.in_channels {
                for ih in 0..in_height {
                    for iw in 0..in_width {
                        let input_idx = b * self.in_channels * in_height * in_width
                            + ic * in_height * in_width
                            + ih * in_width
                            + iw;
                        let x = input_vec[input_idx];

                        for oc in 0..self.out_channels {
                            for ki in 0..kh {
                                for kj in 0..kw {
                                    let oh = ih * sh + ki;
                                    let ow = iw * sw + kj;

                                    // Output padding trims the outer border
                                    if oh < ph
                                        || oh >= out_height + ph
                                        || ow < pw
                                        || ow >= out_width + pw
                                    {
                                        continue;
                                    }

                                    let weight_idx = ic * self.out_channels * kh * kw
                                        + oc * kh * kw
                                        + ki * kw
                                        + kj;

                                    let output_idx = b * self.out_channels * out_height * out_width
                                        + oc * out_height * out_width
                                        + (oh - ph) * out_width
                                        + (ow - pw);

                                    output_data[output_idx] += x * weight_vec[weight_idx];
                                }
                            }
                        }
                    }
                }
            }
        }

        if let Some(ref bias) = self.bias {
            let bias_vec = bias.data().to_vec();
            for b in 0..batch_size {
                for oc in 0..self.out_channels {
                    let base = b * self.out_channels * out_height * out_width
                        + oc * out_height * out_width;
                    for s in 0..out_height * out_width {
                        output_data[base + s] += bias_vec[oc];
                    }
                }
            }
        }

        let output_tensor = Tensor::from_vec(
            output_data,
            &[batch_size, self.out_channels, out_height, out_width],
        )
        .unwrap();

        Variable::new(output_tensor, input.requires_grad())
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
        "ConvTranspose2d"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conv2d_creation() {
        let mut ctx = Context::new(0);
        let conv = Conv2d::new(&mut ctx, 3, 64, 3);
        assert_eq!(conv.in_channels(), 3);
        assert_eq!(conv.out_channels(), 64);
        assert_eq!(conv.weight.shape(), vec![64, 3, 3, 3]);
    }

    #[test]
    fn test_conv2d_same_padding_shape() {
        let mut ctx = Context::new(0);
        let conv = Conv2d::with_options(&mut ctx, 1, 1, (3, 3), (1, 1), (1, 1), false);

        let input = Variable::new(
            Tensor::from_vec(vec![1.0; 25], &[1, 1, 5, 5]).unwrap(),
            false,
        );
        assert_eq!(conv.forward(&input).shape(), vec![1, 1, 5, 5]);
    }

    #[test]
    fn test_conv2d_strided_downsample() {
        // Kernel 4, stride 2, padding 1 halves the spatial size
        let mut ctx = Context::new(0);
        let conv = Conv2d::with_options(&mut ctx, 2, 3, (4, 4), (2, 2), (1, 1), true);

        let input = Variable::new(
            Tensor::from_vec(vec![0.5; 2 * 16 * 16], &[1, 2, 16, 16]).unwrap(),
            false,
        );
        assert_eq!(conv.forward(&input).shape(), vec![1, 3, 8, 8]);
    }

    #[test]
    fn test_conv2d_known_values() {
        // Identity-like 1x1 kernel doubles each element
        let mut ctx = Context::new(0);
        let conv = Conv2d::with_options(&mut ctx, 1, 1, (1, 1), (1, 1), (0, 0), false);
        conv.weight
            .update_data(Tensor::from_vec(vec![2.0], &[1, 1, 1, 1]).unwrap());

        let input = Variable::new(
            Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[1, 1, 2, 2]).unwrap(),
            false,
        );
        let output = conv.forward(&input);
        assert_eq!(output.data().to_vec(), vec![2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_conv2d_parameters() {
        let mut ctx = Context::new(0);
        let conv = Conv2d::new(&mut ctx, 3, 64, 3);
        assert_eq!(conv.parameters().len(), 2);
    }

    #[test]
    fn test_deconv_creation() {
        let mut ctx = Context::new(0);
        let deconv = ConvTranspose2d::new(&mut ctx, 8, 4, 4);
        assert_eq!(deconv.in_channels(), 8);
        assert_eq!(deconv.out_channels(), 4);
        assert_eq!(deconv.weight.shape(), vec![8, 4, 4, 4]);
    }

    #[test]
    fn test_deconv_expands_1x1() {
        // Kernel 4, stride 1, no padding: 1x1 -> 4x4
        let mut ctx = Context::new(0);
        let deconv = ConvTranspose2d::with_options(&mut ctx, 2, 3, (4, 4), (1, 1), (0, 0), true);

        let input = Variable::new(Tensor::from_vec(vec![1.0, 2.0], &[1, 2, 1, 1]).unwrap(), false);
        assert_eq!(deconv.forward(&input).shape(), vec![1, 3, 4, 4]);
    }

    #[test]
    fn test_deconv_strided_upsample() {
        // Kernel 4, stride 2, padding 1 doubles the spatial size
        let mut ctx = Context::new(0);
        let deconv = ConvTranspose2d::with_options(&mut ctx, 3, 2, (4, 4), (2, 2), (1, 1), true);

        let input = Variable::new(
            Tensor::from_vec(vec![0.5; 3 * 8 * 8], &[1, 3, 8, 8]).unwrap(),
            false,
        );
        assert_eq!(deconv.forward(&input).shape(), vec![1, 2, 16, 16]);
    }

    #[test]
    fn test_deconv_known_values() {
        // A single input element spreads the kernel over the output
        let mut ctx = Context::new(0);
        let deconv = ConvTranspose2d::with_options(&mut ctx, 1, 1, (2, 2), (1, 1), (0, 0), false);
        deconv
            .weight
            .update_data(Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[1, 1, 2, 2]).unwrap());

        let input = Variable::new(Tensor::from_vec(vec![5.0], &[1, 1, 1, 1]).unwrap(), false);
        let output = deconv.forward(&input);

        assert_eq!(output.shape(), vec![1, 1, 2, 2]);
        assert_eq!(output.data().to_vec(), vec![5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_conv_deconv_shape_inverse() {
        // With matching hyperparameters, the transposed convolution restores
        // the spatial size the convolution reduced
        let mut ctx = Context::new(0);
        let conv = Conv2d::with_options(&mut ctx, 1, 4, (4, 4), (2, 2), (1, 1), true);
        let deconv = ConvTranspose2d::with_options(&mut ctx, 4, 1, (4, 4), (2, 2), (1, 1), true);

        let input = Variable::new(
            Tensor::from_vec(vec![0.1; 12 * 12], &[1, 1, 12, 12]).unwrap(),
            false,
        );
        let down = conv.forward(&input);
        assert_eq!(down.shape(), vec![1, 4, 6, 6]);

        let up = deconv.forward(&down);
        assert_eq!(up.shape(), vec![1, 1, 12, 12]);
    }
}
