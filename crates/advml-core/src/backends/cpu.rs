//! CPU Backend - Host Memory Operations
//!
//! Slice-level kernels for tensor operations on host memory. Large inputs
//! are processed with rayon parallel iterators; small inputs fall back to
//! plain loops to avoid scheduling overhead.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use rayon::prelude::*;

use crate::dtype::{Float, Numeric};

/// Threshold for using parallel processing (in elements).
const PARALLEL_THRESHOLD: usize = 4096;

// =============================================================================
// CPU Backend Struct
// =============================================================================

/// CPU backend for tensor operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl CpuBackend {
    /// Creates a new CPU backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

// =============================================================================
// Element-wise Operations
// =============================================================================

impl CpuBackend {
    /// Fills a slice with a value.
    pub fn fill<T: Numeric>(dst: &mut [T], value: T) {
        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().for_each(|d| *d = value);
        } else {
            for d in dst.iter_mut() {
                *d = value;
            }
        }
    }

    /// Adds a scalar to each element.
    pub fn add_scalar<T: Numeric>(dst: &mut [T], a: &[T], scalar: T) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter())
                .for_each(|(d, a_val)| *d = *a_val + scalar);
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i] + scalar;
            }
        }
    }

    /// Multiplies each element by a scalar.
    pub fn mul_scalar<T: Numeric>(dst: &mut [T], a: &[T], scalar: T) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter())
                .for_each(|(d, a_val)| *d = *a_val * scalar);
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i] * scalar;
            }
        }
    }

    /// Negates each element.
    pub fn neg<T: Numeric>(dst: &mut [T], a: &[T]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter())
                .for_each(|(d, a_val)| *d = T::zero() - *a_val);
        } else {
            for i in 0..dst.len() {
                dst[i] = T::zero() - a[i];
            }
        }
    }
}

// =============================================================================
// Activation Functions
// =============================================================================

impl CpuBackend {
    /// Applies `ReLU`: max(0, x).
    pub fn relu<T: Float>(dst: &mut [T], a: &[T]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = if *a_val > T::zero() { *a_val } else { T::zero() };
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = if a[i] > T::zero() { a[i] } else { T::zero() };
            }
        }
    }

    /// Applies leaky `ReLU`: x for positive inputs, slope * x otherwise.
    pub fn leaky_relu<T: Float>(dst: &mut [T], a: &[T], slope: T) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = if *a_val > T::zero() {
                    *a_val
                } else {
                    *a_val * slope
                };
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = if a[i] > T::zero() { a[i] } else { a[i] * slope };
            }
        }
    }

    /// Applies sigmoid: 1 / (1 + exp(-x)).
    pub fn sigmoid<T: Float>(dst: &mut [T], a: &[T]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = T::one() / (T::one() + (-*a_val).exp());
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = T::one() / (T::one() + (-a[i]).exp());
            }
        }
    }

    /// Applies the hyperbolic tangent.
    pub fn tanh<T: Float>(dst: &mut [T], a: &[T]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter())
                .for_each(|(d, a_val)| *d = a_val.tanh());
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i].tanh();
            }
        }
    }

    /// Applies the exponential function.
    pub fn exp<T: Float>(dst: &mut [T], a: &[T]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter())
                .for_each(|(d, a_val)| *d = a_val.exp());
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i].exp();
            }
        }
    }

    /// Applies the square root.
    pub fn sqrt<T: Float>(dst: &mut [T], a: &[T]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter())
                .for_each(|(d, a_val)| *d = a_val.sqrt());
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i].sqrt();
            }
        }
    }
}

// =============================================================================
// Reductions
// =============================================================================

impl CpuBackend {
    /// Sums all elements.
    #[must_use]
    pub fn sum<T: Numeric>(a: &[T]) -> T {
        if a.len() >= PARALLEL_THRESHOLD {
            a.par_iter().copied().sum()
        } else {
            a.iter().copied().sum()
        }
    }

    /// Computes the mean of all elements. Returns None for empty input.
    #[must_use]
    pub fn mean<T: Float>(a: &[T]) -> Option<T> {
        if a.is_empty() {
            return None;
        }
        let total = Self::sum(a);
        Some(total / T::from(a.len())?)
    }

    /// Returns the maximum element. Returns None for empty input.
    #[must_use]
    pub fn max<T: Numeric>(a: &[T]) -> Option<T> {
        a.iter()
            .copied()
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    /// Returns the minimum element. Returns None for empty input.
    #[must_use]
    pub fn min<T: Numeric>(a: &[T]) -> Option<T> {
        a.iter()
            .copied()
            .fold(None, |acc, v| match acc {
                Some(m) if m <= v => Some(m),
                _ => Some(v),
            })
    }

    /// Dot product of two equal-length slices.
    #[must_use]
    pub fn dot<T: Numeric>(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());

        if a.len() >= PARALLEL_THRESHOLD {
            a.par_iter().zip(b.par_iter()).map(|(&x, &y)| x * y).sum()
        } else {
            a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
        }
    }
}

// =============================================================================
// Matrix Multiplication
// =============================================================================

impl CpuBackend {
    /// Computes C = A @ B for row-major matrices.
    ///
    /// # Arguments
    /// * `c` - Output buffer of length m * n
    /// * `a` - Left matrix of shape (m, k)
    /// * `b` - Right matrix of shape (k, n)
    pub fn matmul<T: Numeric>(c: &mut [T], a: &[T], b: &[T], m: usize, n: usize, k: usize) {
        debug_assert_eq!(a.len(), m * k);
        debug_assert_eq!(b.len(), k * n);
        debug_assert_eq!(c.len(), m * n);

        let row = |c_row: &mut [T], i: usize| {
            for j in 0..n {
                let mut acc = T::zero();
                for p in 0..k {
                    acc = acc + a[i * k + p] * b[p * n + j];
                }
                c_row[j] = acc;
            }
        };

        if m * n >= PARALLEL_THRESHOLD {
            c.par_chunks_mut(n)
                .enumerate()
                .for_each(|(i, c_row)| row(c_row, i));
        } else {
            for (i, c_row) in c.chunks_mut(n).enumerate() {
                row(c_row, i);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill() {
        let mut dst = vec![0.0f32; 5];
        CpuBackend::fill(&mut dst, 3.0);
        assert_eq!(dst, vec![3.0; 5]);
    }

    #[test]
    fn test_scalar_ops() {
        let a = [1.0f32, -2.0, 3.0];
        let mut dst = [0.0f32; 3];

        CpuBackend::add_scalar(&mut dst, &a, 1.0);
        assert_eq!(dst, [2.0, -1.0, 4.0]);

        CpuBackend::mul_scalar(&mut dst, &a, 2.0);
        assert_eq!(dst, [2.0, -4.0, 6.0]);

        CpuBackend::neg(&mut dst, &a);
        assert_eq!(dst, [-1.0, 2.0, -3.0]);
    }

    #[test]
    fn test_relu_and_leaky() {
        let a = [-2.0f32, 0.0, 2.0];
        let mut dst = [0.0f32; 3];

        CpuBackend::relu(&mut dst, &a);
        assert_eq!(dst, [0.0, 0.0, 2.0]);

        CpuBackend::leaky_relu(&mut dst, &a, 0.2);
        assert_eq!(dst, [-0.4, 0.0, 2.0]);
    }

    #[test]
    fn test_sigmoid_midpoint() {
        let a = [0.0f32];
        let mut dst = [0.0f32];
        CpuBackend::sigmoid(&mut dst, &a);
        assert!((dst[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_reductions() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        assert_eq!(CpuBackend::sum(&a), 10.0);
        assert_eq!(CpuBackend::mean(&a), Some(2.5));
        assert_eq!(CpuBackend::max(&a), Some(4.0));
        assert_eq!(CpuBackend::min(&a), Some(1.0));
        assert_eq!(CpuBackend::dot(&a, &a), 30.0);
    }

    #[test]
    fn test_matmul_2x2() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [5.0f32, 6.0, 7.0, 8.0];
        let mut c = [0.0f32; 4];

        CpuBackend::matmul(&mut c, &a, &b, 2, 2, 2);
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
    }
}
