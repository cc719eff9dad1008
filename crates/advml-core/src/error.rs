//! Error Types - Advml Core Error Handling
//!
//! Provides the unified error type shared by every crate in the workspace.
//! Fallible tensor operations return `Result`; shape-mismatched inputs at
//! layer boundaries surface as these errors from the underlying ops.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for Advml operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape mismatch between tensors.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },

    /// Invalid dimension index.
    #[error("Invalid dimension: index {index} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension index.
        index: i64,
        /// Number of dimensions in the tensor.
        ndim: usize,
    },

    /// Index out of bounds.
    #[error("Index out of bounds: index {index} for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index.
        index: usize,
        /// The size of the dimension.
        size: usize,
    },

    /// Broadcasting failed between shapes.
    #[error("Cannot broadcast shapes {shape1:?} and {shape2:?}")]
    BroadcastError {
        /// The first shape.
        shape1: Vec<usize>,
        /// The second shape.
        shape2: Vec<usize>,
    },

    /// Empty tensor error.
    #[error("Operation not supported on empty tensor")]
    EmptyTensor,

    /// Invalid operation for the given tensor.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for Advml operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates a new invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
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
    fn test_error_display() {
        let err = Error::shape_mismatch(&[2, 3], &[2, 4]);
        assert!(err.to_string().contains("Shape mismatch"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::EmptyTensor, Error::EmptyTensor);
    }

    #[test]
    fn test_invalid_operation_message() {
        let err = Error::invalid_operation("bad reshape");
        assert!(err.to_string().contains("bad reshape"));
    }
}
