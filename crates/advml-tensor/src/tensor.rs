//! Tensor - Core N-Dimensional Array Type
//!
//! The `Tensor` struct is the fundamental data structure of the workspace:
//! an N-dimensional array of numeric values with broadcasting, shared-storage
//! views, and the arithmetic/activation vocabulary the network layers use.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use advml_core::backends::CpuBackend;
use advml_core::dtype::{Float, Numeric, Scalar};
use advml_core::error::{Error, Result};
use advml_core::storage::Storage;
use advml_core::Device;

use crate::shape::{
    broadcast_shape, broadcast_strides, contiguous_strides, is_contiguous, linear_index,
    normalize_dim, numel, reshape, squeeze, transpose_shape, transpose_strides, unravel_index,
    validate_indices, Shape, Strides,
};

// =============================================================================
// Tensor Struct
// =============================================================================

/// An N-dimensional array of numeric values.
///
/// Tensors support arbitrary dimensions, automatic broadcasting in binary
/// operations, and cheap views that share storage.
#[derive(Clone)]
pub struct Tensor<T: Scalar> {
    /// Underlying data storage (reference-counted).
    pub(crate) storage: Storage<T>,
    /// Shape of the tensor (dimensions).
    pub(crate) shape: Shape,
    /// Strides for each dimension.
    pub(crate) strides: Strides,
    /// Offset into storage (for views).
    pub(crate) offset: usize,
}

impl<T: Scalar> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a new tensor from storage with the given shape.
    pub fn from_storage(storage: Storage<T>, shape: &[usize]) -> Result<Self> {
        let total = numel(shape);
        if total != storage.len() {
            return Err(Error::shape_mismatch(&[storage.len()], shape));
        }

        let shape = Shape::from_slice(shape);
        let strides = contiguous_strides(&shape);

        Ok(Self {
            storage,
            shape,
            strides,
            offset: 0,
        })
    }

    /// Creates a new tensor from a vector with the given shape.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let storage = Storage::from_vec(data, Device::Cpu);
        Self::from_storage(storage, shape)
    }

    /// Creates a new tensor from a slice with the given shape.
    pub fn from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        let storage = Storage::from_slice(data, Device::Cpu);
        Self::from_storage(storage, shape)
    }

    /// Creates a scalar tensor (0-dimensional).
    pub fn scalar(value: T) -> Self {
        Self {
            storage: Storage::from_vec(vec![value], Device::Cpu),
            shape: Shape::new(),
            strides: Strides::new(),
            offset: 0,
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the strides of the tensor.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    /// Returns true if the tensor has zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Returns the size of a specific dimension (supports negative indexing).
    pub fn size(&self, dim: i64) -> Result<usize> {
        let idx = normalize_dim(dim, self.ndim())?;
        Ok(self.shape[idx])
    }

    /// Returns the device this tensor is on.
    #[must_use]
    pub fn device(&self) -> Device {
        self.storage.device()
    }

    /// Returns true if the tensor is contiguous in memory.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.shape, &self.strides)
    }

    /// Returns true if this tensor is a scalar (0-dimensional).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Returns the element at the given indices.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        validate_indices(indices, &self.shape)?;
        let offset = self.offset + linear_index(indices, &self.strides);
        Ok(self.storage.as_slice()[offset])
    }

    /// Sets the element at the given indices.
    pub fn set(&self, indices: &[usize], value: T) -> Result<()> {
        validate_indices(indices, &self.shape)?;
        let offset = self.offset + linear_index(indices, &self.strides);
        self.storage.as_slice_mut()[offset] = value;
        Ok(())
    }

    /// Returns the scalar value for a single-element tensor.
    pub fn item(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::invalid_operation(
                "item() only works on single-element tensors",
            ));
        }

        if self.is_scalar() {
            Ok(self.storage.as_slice()[self.offset])
        } else {
            let indices = vec![0; self.ndim()];
            self.get(&indices)
        }
    }

    /// Returns the data as a contiguous vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        if self.is_contiguous() {
            let storage = self.storage.as_slice();
            storage[self.offset..self.offset + self.numel()].to_vec()
        } else {
            let storage = self.storage.as_slice();
            let total = self.numel();
            let mut result = Vec::with_capacity(total);
            for i in 0..total {
                let indices = unravel_index(i, &self.shape);
                let offset = self.offset + linear_index(&indices, &self.strides);
                result.push(storage[offset]);
            }
            result
        }
    }

    // =========================================================================
    // Shape Operations
    // =========================================================================

    /// Returns a new tensor with the specified shape.
    ///
    /// The total number of elements must remain the same. Supports -1 in one
    /// dimension to infer the size.
    pub fn reshape(&self, new_shape: &[isize]) -> Result<Self> {
        let shape = reshape(&self.shape, new_shape)?;

        if self.is_contiguous() {
            Ok(Self {
                storage: self.storage.clone(),
                strides: contiguous_strides(&shape),
                shape,
                offset: self.offset,
            })
        } else {
            let contig = self.contiguous();
            Ok(Self {
                storage: contig.storage,
                strides: contiguous_strides(&shape),
                shape,
                offset: 0,
            })
        }
    }

    /// Returns a new tensor flattened to one dimension.
    #[must_use]
    pub fn flatten(&self) -> Self {
        self.reshape(&[-1]).expect("Flatten should never fail")
    }

    /// Returns a new tensor with dimensions of size 1 removed.
    ///
    /// # Arguments
    /// * `dim` - Optional specific dimension to squeeze
    pub fn squeeze(&self, dim: Option<i64>) -> Result<Self> {
        let dim = match dim {
            Some(d) => Some(normalize_dim(d, self.ndim())?),
            None => None,
        };

        let new_shape = squeeze(&self.shape, dim);
        let new_strides: Strides = match dim {
            Some(d) => {
                let mut s = self.strides.clone();
                if d < self.shape.len() && self.shape[d] == 1 {
                    s.remove(d);
                }
                s
            }
            None => self
                .shape
                .iter()
                .zip(self.strides.iter())
                .filter(|(&dim, _)| dim != 1)
                .map(|(_, &stride)| stride)
                .collect(),
        };

        Ok(Self {
            storage: self.storage.clone(),
            shape: new_shape,
            strides: new_strides,
            offset: self.offset,
        })
    }

    /// Transposes two dimensions.
    pub fn transpose(&self, dim0: i64, dim1: i64) -> Result<Self> {
        let d0 = normalize_dim(dim0, self.ndim())?;
        let d1 = normalize_dim(dim1, self.ndim())?;

        let new_shape = transpose_shape(&self.shape, d0, d1)?;
        let new_strides = transpose_strides(&self.strides, d0, d1);

        Ok(Self {
            storage: self.storage.clone(),
            shape: new_shape,
            strides: new_strides,
            offset: self.offset,
        })
    }

    /// Returns the transpose of a 2D tensor.
    pub fn t(&self) -> Result<Self> {
        if self.ndim() != 2 {
            return Err(Error::invalid_operation("t() only works on 2D tensors"));
        }
        self.transpose(0, 1)
    }

    /// Returns a contiguous copy of the tensor.
    #[must_use]
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() && self.offset == 0 {
            return self.clone();
        }

        let data = self.to_vec();
        Self::from_vec(data, &self.shape).expect("Contiguous should never fail")
    }

    /// Creates a deep copy of this tensor with its own storage.
    #[must_use]
    pub fn clone_deep(&self) -> Self {
        let data = self.to_vec();
        Self::from_vec(data, &self.shape).expect("Deep clone should never fail")
    }
}

// =============================================================================
// Numeric Operations
// =============================================================================

impl<T: Numeric> Tensor<T> {
    /// Fills the tensor with a value in place.
    pub fn fill_(&self, value: T) {
        let mut data = self.storage.as_slice_mut();
        CpuBackend::fill(&mut data, value);
    }

    /// Fills the tensor with zeros in place.
    pub fn zero_(&self) {
        self.fill_(T::zero());
    }

    /// Applies a binary operation with broadcasting.
    fn broadcast_binary(&self, other: &Self, op: impl Fn(T, T) -> T) -> Result<Self> {
        let result_shape = broadcast_shape(&self.shape, &other.shape)?;
        let self_strides = broadcast_strides(&self.shape, &self.strides, &result_shape);
        let other_strides = broadcast_strides(&other.shape, &other.strides, &result_shape);

        let total = numel(&result_shape);
        let mut result_data = Vec::with_capacity(total);

        let self_data = self.storage.as_slice();
        let other_data = other.storage.as_slice();

        for i in 0..total {
            let indices = unravel_index(i, &result_shape);
            let self_idx = self.offset + linear_index(&indices, &self_strides);
            let other_idx = other.offset + linear_index(&indices, &other_strides);
            result_data.push(op(self_data[self_idx], other_data[other_idx]));
        }

        drop(self_data);
        drop(other_data);
        Self::from_vec(result_data, &result_shape)
    }

    /// Element-wise addition with broadcasting.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.broadcast_binary(other, |a, b| a + b)
    }

    /// Element-wise subtraction with broadcasting.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.broadcast_binary(other, |a, b| a - b)
    }

    /// Element-wise multiplication with broadcasting.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.broadcast_binary(other, |a, b| a * b)
    }

    /// Element-wise division with broadcasting.
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.broadcast_binary(other, |a, b| a / b)
    }

    /// Scalar addition.
    #[must_use]
    pub fn add_scalar(&self, scalar: T) -> Self {
        let data = self.to_vec();
        let mut result = vec![T::zero(); data.len()];
        CpuBackend::add_scalar(&mut result, &data, scalar);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Scalar multiplication.
    #[must_use]
    pub fn mul_scalar(&self, scalar: T) -> Self {
        let data = self.to_vec();
        let mut result = vec![T::zero(); data.len()];
        CpuBackend::mul_scalar(&mut result, &data, scalar);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Element-wise negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        let data = self.to_vec();
        let mut result = vec![T::zero(); data.len()];
        CpuBackend::neg(&mut result, &data);
        Self::from_vec(result, &self.shape).unwrap()
    }

    // =========================================================================
    // Reductions
    // =========================================================================

    /// Returns the sum of all elements as a scalar tensor.
    #[must_use]
    pub fn sum(&self) -> Self {
        let data = self.to_vec();
        Self::scalar(CpuBackend::sum(&data))
    }

    /// Returns the maximum element.
    pub fn max(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::EmptyTensor);
        }
        let data = self.to_vec();
        Ok(Self::scalar(CpuBackend::max(&data).unwrap()))
    }

    /// Returns the minimum element.
    pub fn min(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::EmptyTensor);
        }
        let data = self.to_vec();
        Ok(Self::scalar(CpuBackend::min(&data).unwrap()))
    }

    /// Dot product for 1D tensors.
    pub fn dot(&self, other: &Self) -> Result<Self> {
        if self.ndim() != 1 || other.ndim() != 1 {
            return Err(Error::invalid_operation("dot requires 1D tensors"));
        }

        if self.shape[0] != other.shape[0] {
            return Err(Error::shape_mismatch(&self.shape, &other.shape));
        }

        let a_data = self.to_vec();
        let b_data = other.to_vec();
        Ok(Self::scalar(CpuBackend::dot(&a_data, &b_data)))
    }

    // =========================================================================
    // Matrix Multiplication
    // =========================================================================

    /// Matrix multiplication with batching support.
    ///
    /// Supports:
    /// - 2D @ 2D: [m, k] @ [k, n] -> [m, n]
    /// - ND @ ND with equal leading batch dims: [..., m, k] @ [..., k, n]
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.ndim() < 2 || other.ndim() < 2 {
            return Err(Error::invalid_operation(
                "matmul requires at least 2D tensors",
            ));
        }

        let m = self.shape[self.ndim() - 2];
        let k1 = self.shape[self.ndim() - 1];
        let k2 = other.shape[other.ndim() - 2];
        let n = other.shape[other.ndim() - 1];

        if k1 != k2 {
            return Err(Error::invalid_operation(format!(
                "matmul inner dimensions must match: {k1} vs {k2}"
            )));
        }

        if self.ndim() == 2 && other.ndim() == 2 {
            let a_data = self.contiguous().to_vec();
            let b_data = other.contiguous().to_vec();
            let mut c_data = vec![T::zero(); m * n];
            CpuBackend::matmul(&mut c_data, &a_data, &b_data, m, n, k1);
            return Self::from_vec(c_data, &[m, n]);
        }

        let batch_dims_self: Vec<usize> = self.shape[..self.ndim() - 2].to_vec();
        let batch_dims_other: Vec<usize> = other.shape[..other.ndim() - 2].to_vec();

        if batch_dims_self != batch_dims_other {
            return Err(Error::invalid_operation(format!(
                "matmul batch dimensions must match: {batch_dims_self:?} vs {batch_dims_other:?}"
            )));
        }

        let batch_size: usize = batch_dims_self.iter().product();
        let a_stride = m * k1;
        let b_stride = k1 * n;
        let c_stride = m * n;

        let a_data = self.contiguous().to_vec();
        let b_data = other.contiguous().to_vec();
        let mut c_data = vec![T::zero(); batch_size * m * n];

        for batch in 0..batch_size {
            let a_slice = &a_data[batch * a_stride..(batch + 1) * a_stride];
            let b_slice = &b_data[batch * b_stride..(batch + 1) * b_stride];
            let c_slice = &mut c_data[batch * c_stride..(batch + 1) * c_stride];
            CpuBackend::matmul(c_slice, a_slice, b_slice, m, n, k1);
        }

        let mut output_shape = batch_dims_self;
        output_shape.push(m);
        output_shape.push(n);
        Self::from_vec(c_data, &output_shape)
    }
}

// =============================================================================
// Float Operations
// =============================================================================

impl<T: Float> Tensor<T> {
    /// Applies a unary CPU kernel over the flattened data.
    fn map_kernel(&self, kernel: impl Fn(&mut [T], &[T])) -> Self {
        let data = self.to_vec();
        let mut result = vec![T::zero(); data.len()];
        kernel(&mut result, &data);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Returns the mean of all elements as a scalar tensor.
    pub fn mean(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::EmptyTensor);
        }
        let data = self.to_vec();
        Ok(Self::scalar(CpuBackend::mean(&data).unwrap()))
    }

    /// Applies `ReLU` activation: max(0, x).
    #[must_use]
    pub fn relu(&self) -> Self {
        self.map_kernel(|dst, src| CpuBackend::relu(dst, src))
    }

    /// Applies leaky `ReLU` activation with the given negative slope.
    #[must_use]
    pub fn leaky_relu(&self, slope: T) -> Self {
        self.map_kernel(|dst, src| CpuBackend::leaky_relu(dst, src, slope))
    }

    /// Applies sigmoid activation: 1 / (1 + exp(-x)).
    #[must_use]
    pub fn sigmoid(&self) -> Self {
        self.map_kernel(|dst, src| CpuBackend::sigmoid(dst, src))
    }

    /// Applies the hyperbolic tangent.
    #[must_use]
    pub fn tanh(&self) -> Self {
        self.map_kernel(|dst, src| CpuBackend::tanh(dst, src))
    }

    /// Applies the exponential function.
    #[must_use]
    pub fn exp(&self) -> Self {
        self.map_kernel(|dst, src| CpuBackend::exp(dst, src))
    }

    /// Applies the square root.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        self.map_kernel(|dst, src| CpuBackend::sqrt(dst, src))
    }

    /// Computes element-wise power.
    #[must_use]
    pub fn pow(&self, exp: T) -> Self {
        let data = self.to_vec();
        let result: Vec<T> = data.iter().map(|&x| x.powf(exp)).collect();
        Self::from_vec(result, &self.shape).unwrap()
    }
}

// =============================================================================
// Operator Trait Implementations
// =============================================================================

impl<T: Numeric> Add for &Tensor<T> {
    type Output = Tensor<T>;

    fn add(self, other: Self) -> Self::Output {
        self.add(other).expect("Addition failed")
    }
}

impl<T: Numeric> Sub for &Tensor<T> {
    type Output = Tensor<T>;

    fn sub(self, other: Self) -> Self::Output {
        self.sub(other).expect("Subtraction failed")
    }
}

impl<T: Numeric> Mul for &Tensor<T> {
    type Output = Tensor<T>;

    fn mul(self, other: Self) -> Self::Output {
        self.mul(other).expect("Multiplication failed")
    }
}

impl<T: Numeric> Div for &Tensor<T> {
    type Output = Tensor<T>;

    fn div(self, other: Self) -> Self::Output {
        self.div(other).expect("Division failed")
    }
}

impl<T: Numeric> Neg for &Tensor<T> {
    type Output = Tensor<T>;

    fn neg(self) -> Self::Output {
        self.neg()
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl<T: Scalar + fmt::Display> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={:?}, device={}",
            self.shape(),
            self.device()
        )?;
        if self.numel() <= 10 {
            let data = self.to_vec();
            write!(f, ", data=[")?;
            for (i, val) in data.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{val}")?;
            }
            write!(f, "]")?;
        }
        write!(f, ")")
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_scalar() {
            write!(f, "{}", self.storage.as_slice()[self.offset])
        } else if self.ndim() == 1 {
            write!(f, "[")?;
            let data = self.to_vec();
            for (i, val) in data.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{val}")?;
            }
            write!(f, "]")
        } else {
            write!(f, "Tensor(shape={:?})", self.shape())
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
    fn test_from_vec() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.numel(), 6);
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        assert!(Tensor::<f32>::from_vec(vec![1.0, 2.0], &[3]).is_err());
    }

    #[test]
    fn test_get_set() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        assert_eq!(t.get(&[1, 0]).unwrap(), 3.0);

        t.set(&[0, 0], 99.0).unwrap();
        assert_eq!(t.get(&[0, 0]).unwrap(), 99.0);

        assert!(t.get(&[2, 0]).is_err());
    }

    #[test]
    fn test_reshape() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(t.reshape(&[3, 2]).unwrap().shape(), &[3, 2]);
        assert_eq!(t.reshape(&[-1]).unwrap().shape(), &[6]);
        assert_eq!(t.flatten().shape(), &[6]);
        assert_eq!(t.size(-1).unwrap(), 3);
    }

    #[test]
    fn test_dot() {
        let a = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![4.0, 5.0, 6.0], &[3]).unwrap();
        assert_eq!(a.dot(&b).unwrap().item().unwrap(), 32.0);

        let m = Tensor::<f32>::from_vec(vec![1.0; 4], &[2, 2]).unwrap();
        assert!(m.dot(&a).is_err());
    }

    #[test]
    fn test_squeeze() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0], &[2, 1, 1]).unwrap();
        let s = t.squeeze(None).unwrap();
        assert_eq!(s.shape(), &[2]);
        assert_eq!(s.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_transpose() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let r = t.t().unwrap();
        assert_eq!(r.shape(), &[3, 2]);
        assert_eq!(r.get(&[0, 1]).unwrap(), 4.0);
        assert_eq!(r.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_arithmetic() {
        let a = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![4.0, 5.0, 6.0], &[3]).unwrap();

        assert_eq!((&a + &b).to_vec(), vec![5.0, 7.0, 9.0]);
        assert_eq!((&a * &b).to_vec(), vec![4.0, 10.0, 18.0]);
        assert_eq!((&b - &a).to_vec(), vec![3.0, 3.0, 3.0]);
        assert_eq!((-&a).to_vec(), vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_broadcasting() {
        let a = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![10.0, 20.0, 30.0], &[3]).unwrap();

        let c = a.add(&b).unwrap();
        assert_eq!(c.shape(), &[2, 3]);
        assert_eq!(c.to_vec(), vec![11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
    }

    #[test]
    fn test_broadcast_incompatible() {
        let a = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn test_reductions() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[4]).unwrap();
        assert_eq!(t.sum().item().unwrap(), 10.0);
        assert_eq!(t.mean().unwrap().item().unwrap(), 2.5);
        assert_eq!(t.max().unwrap().item().unwrap(), 4.0);
        assert_eq!(t.min().unwrap().item().unwrap(), 1.0);
    }

    #[test]
    fn test_matmul() {
        let a = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
        let c = a.matmul(&b).unwrap();

        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_batched() {
        let a = Tensor::<f32>::from_vec(vec![1.0; 2 * 2 * 3], &[2, 2, 3]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![1.0; 2 * 3 * 4], &[2, 3, 4]).unwrap();
        let c = a.matmul(&b).unwrap();

        assert_eq!(c.shape(), &[2, 2, 4]);
        assert!(c.to_vec().iter().all(|&v| (v - 3.0).abs() < 1e-6));
    }

    #[test]
    fn test_matmul_inner_mismatch() {
        let a = Tensor::<f32>::from_vec(vec![1.0; 6], &[2, 3]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![1.0; 8], &[4, 2]).unwrap();
        assert!(a.matmul(&b).is_err());
    }

    #[test]
    fn test_activations() {
        let t = Tensor::<f32>::from_vec(vec![-1.0, 0.0, 1.0, 2.0], &[4]).unwrap();

        assert_eq!(t.relu().to_vec(), vec![0.0, 0.0, 1.0, 2.0]);
        assert_eq!(t.leaky_relu(0.2).to_vec(), vec![-0.2, 0.0, 1.0, 2.0]);

        let s = t.sigmoid().to_vec();
        assert!(s.iter().all(|&v| v > 0.0 && v < 1.0));

        let th = t.tanh().to_vec();
        assert!(th.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_pow() {
        let t = Tensor::<f32>::from_vec(vec![2.0, 3.0], &[2]).unwrap();
        assert_eq!(t.pow(2.0).to_vec(), vec![4.0, 9.0]);
    }

    #[test]
    fn test_scalar() {
        let s = Tensor::<f32>::scalar(42.0);
        assert!(s.is_scalar());
        assert_eq!(s.numel(), 1);
        assert_eq!(s.item().unwrap(), 42.0);
    }

    #[test]
    fn test_fill_in_place() {
        let t = Tensor::<f64>::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        t.fill_(0.5);
        assert_eq!(t.to_vec(), vec![0.5, 0.5, 0.5]);
        t.zero_();
        assert_eq!(t.to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_transposed_view_shares_storage() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let v = t.t().unwrap();

        t.set(&[0, 1], 9.0).unwrap();
        assert_eq!(v.get(&[1, 0]).unwrap(), 9.0);
    }
}
