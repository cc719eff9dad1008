//! Tensor Creation Functions
//!
//! Factory functions for building tensors: constant fills and random draws.
//! Every random constructor takes the RNG as an argument so that callers
//! control seeding explicitly; there is no ambient thread-local generator
//! anywhere in the workspace.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use rand_distr::StandardNormal;

use advml_core::dtype::{Float, Numeric, Scalar};

use crate::tensor::Tensor;

// =============================================================================
// Constant Initialization
// =============================================================================

/// Creates a tensor filled with zeros.
///
/// # Example
/// ```rust
/// use advml_tensor::zeros;
/// let t = zeros::<f32>(&[2, 3]);
/// assert_eq!(t.numel(), 6);
/// ```
#[must_use]
pub fn zeros<T: Scalar>(shape: &[usize]) -> Tensor<T> {
    let numel: usize = shape.iter().product();
    let data = vec![T::default(); numel];
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor filled with ones.
#[must_use]
pub fn ones<T: Numeric>(shape: &[usize]) -> Tensor<T> {
    full(shape, T::one())
}

/// Creates a tensor filled with a specific value.
pub fn full<T: Scalar>(shape: &[usize], value: T) -> Tensor<T> {
    let numel: usize = shape.iter().product();
    let data = vec![value; numel];
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with the same shape as another, filled with zeros.
#[must_use]
pub fn zeros_like<T: Scalar>(other: &Tensor<T>) -> Tensor<T> {
    zeros(other.shape())
}

/// Creates a tensor with the same shape as another, filled with ones.
#[must_use]
pub fn ones_like<T: Numeric>(other: &Tensor<T>) -> Tensor<T> {
    ones(other.shape())
}

/// Creates a 2D identity matrix.
#[must_use]
pub fn eye<T: Numeric>(n: usize) -> Tensor<T> {
    let mut data = vec![T::zero(); n * n];
    for i in 0..n {
        data[i * n + i] = T::one();
    }
    Tensor::from_vec(data, &[n, n]).unwrap()
}

// =============================================================================
// Random Initialization
// =============================================================================

/// Creates a tensor with uniformly distributed random values in [0, 1).
///
/// # Arguments
/// * `rng` - Random number generator to draw from
/// * `shape` - Shape of the tensor
#[must_use]
pub fn rand<T: Float, R: Rng + ?Sized>(rng: &mut R, shape: &[usize]) -> Tensor<T>
where
    Standard: Distribution<T>,
{
    let numel: usize = shape.iter().product();
    let data: Vec<T> = (0..numel).map(|_| rng.gen()).collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with standard normal random values (mean 0, std 1).
///
/// # Arguments
/// * `rng` - Random number generator to draw from
/// * `shape` - Shape of the tensor
#[must_use]
pub fn randn<T: Float, R: Rng + ?Sized>(rng: &mut R, shape: &[usize]) -> Tensor<T>
where
    StandardNormal: Distribution<T>,
{
    let numel: usize = shape.iter().product();
    let data: Vec<T> = (0..numel).map(|_| StandardNormal.sample(rng)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with uniformly distributed random values in [low, high).
///
/// # Arguments
/// * `rng` - Random number generator to draw from
/// * `shape` - Shape of the tensor
/// * `low` - Lower bound (inclusive)
/// * `high` - Upper bound (exclusive)
pub fn uniform<T: Float, R: Rng + ?Sized>(rng: &mut R, shape: &[usize], low: T, high: T) -> Tensor<T>
where
    T: rand::distributions::uniform::SampleUniform,
{
    let numel: usize = shape.iter().product();
    let data: Vec<T> = (0..numel).map(|_| rng.gen_range(low..high)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with normally distributed random values.
///
/// # Arguments
/// * `rng` - Random number generator to draw from
/// * `shape` - Shape of the tensor
/// * `mean` - Mean of the distribution
/// * `std` - Standard deviation of the distribution
pub fn normal<T: Float, R: Rng + ?Sized>(rng: &mut R, shape: &[usize], mean: T, std: T) -> Tensor<T>
where
    StandardNormal: Distribution<T>,
{
    randn(rng, shape).mul_scalar(std).add_scalar(mean)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zeros_and_ones() {
        let z = zeros::<f32>(&[2, 3]);
        assert!(z.to_vec().iter().all(|&v| v == 0.0));

        let o = ones::<f32>(&[4]);
        assert!(o.to_vec().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_full() {
        let t = full(&[2, 2], 7.0f32);
        assert_eq!(t.to_vec(), vec![7.0; 4]);
    }

    #[test]
    fn test_like_constructors() {
        let t = full(&[2, 3], 5.0f32);
        assert_eq!(zeros_like(&t).shape(), t.shape());
        assert!(ones_like(&t).to_vec().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_eye() {
        let i = eye::<f32>(3);
        assert_eq!(i.get(&[0, 0]).unwrap(), 1.0);
        assert_eq!(i.get(&[0, 1]).unwrap(), 0.0);
        assert_eq!(i.get(&[2, 2]).unwrap(), 1.0);
    }

    #[test]
    fn test_rand_range() {
        let mut rng = StdRng::seed_from_u64(0);
        let t = rand::<f32, _>(&mut rng, &[100]);
        assert!(t.to_vec().iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = StdRng::seed_from_u64(0);
        let t = uniform::<f32, _>(&mut rng, &[100], -2.0, 2.0);
        assert!(t.to_vec().iter().all(|&v| (-2.0..2.0).contains(&v)));
    }

    #[test]
    fn test_seeded_determinism() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let a = randn::<f32, _>(&mut rng1, &[16]);
        let b = randn::<f32, _>(&mut rng2, &[16]);
        assert_eq!(a.to_vec(), b.to_vec());
    }
}
