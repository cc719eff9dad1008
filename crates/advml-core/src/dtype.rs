//! Data Types - Advml Type System
//!
//! Defines the element types tensors can hold and the trait tiers that make
//! operations generic over them. Runtime dtype information is carried by the
//! `DType` enum; compile-time behavior by the `Scalar`, `Numeric` and `Float`
//! traits.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use core::fmt::Debug;

use num_traits::{Float as NumFloat, Num, NumCast, One, Zero};

// =============================================================================
// DType Enum
// =============================================================================

/// Runtime representation of tensor element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating point (single precision).
    F32,
    /// 64-bit floating point (double precision).
    F64,
}

impl DType {
    /// Returns the size in bytes of this data type.
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns the name of this data type as a string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Returns the default floating point type (f32).
    #[must_use]
    pub const fn default_float() -> Self {
        Self::F32
    }
}

impl Default for DType {
    fn default() -> Self {
        Self::F32
    }
}

impl core::fmt::Display for DType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Scalar Trait
// =============================================================================

/// Trait for all element types that can be stored in a tensor.
pub trait Scalar: Copy + Clone + Debug + Default + PartialOrd + Send + Sync + 'static {
    /// The runtime dtype for this scalar type.
    const DTYPE: DType;

    /// Returns the dtype for this type.
    #[must_use]
    fn dtype() -> DType {
        Self::DTYPE
    }
}

// =============================================================================
// Numeric Trait
// =============================================================================

/// Trait for element types that support arithmetic operations.
pub trait Numeric: Scalar + Num + NumCast + Zero + One + core::iter::Sum {
    /// The zero value for this type.
    const ZERO: Self;

    /// The one value for this type.
    const ONE: Self;
}

// =============================================================================
// Float Trait
// =============================================================================

/// Trait for floating point element types.
///
/// Inherits the full transcendental vocabulary (`exp`, `ln`, `sqrt`, `tanh`,
/// `powf`, ...) from `num_traits::Float`.
pub trait Float: Numeric + NumFloat {
    /// Machine epsilon for this type.
    const EPS: Self;
}

// =============================================================================
// Implementations
// =============================================================================

macro_rules! impl_float_scalar {
    ($ty:ty, $dtype:expr, $eps:expr) => {
        impl Scalar for $ty {
            const DTYPE: DType = $dtype;
        }

        impl Numeric for $ty {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
        }

        impl Float for $ty {
            const EPS: Self = $eps;
        }
    };
}

impl_float_scalar!(f32, DType::F32, f32::EPSILON);
impl_float_scalar!(f64, DType::F64, f64::EPSILON);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_properties() {
        assert_eq!(DType::F32.size_of(), 4);
        assert_eq!(DType::F64.size_of(), 8);
        assert!(DType::F32.is_float());
        assert_eq!(DType::default_float(), DType::F32);
    }

    #[test]
    fn test_scalar_dtype() {
        assert_eq!(f32::dtype(), DType::F32);
        assert_eq!(f64::dtype(), DType::F64);
    }

    #[test]
    fn test_numeric_constants() {
        assert_eq!(<f32 as Numeric>::ZERO, 0.0);
        assert_eq!(<f64 as Numeric>::ONE, 1.0);
    }

    #[test]
    fn test_dtype_display() {
        assert_eq!(DType::F32.to_string(), "f32");
    }
}
