//! Advml Core - Foundation Types for Adversarial Autoencoder Networks
//!
//! This crate provides the foundation layer shared by every other crate in
//! the Advml workspace: the device and dtype vocabulary, the unified error
//! type, reference-counted storage, and the CPU compute backend.
//!
//! # Key Features
//! - Unified `Error` / `Result` types for all operations
//! - Runtime dtype information via the `DType` enum
//! - Type-safe numeric operations via the `Scalar` / `Numeric` / `Float` traits
//! - Reference-counted storage with zero-copy views
//!
//! @version 0.1.0
//! @author `Advml` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
// Numeric library allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::similar_names)]

// =============================================================================
// Modules
// =============================================================================

pub mod backends;
pub mod device;
pub mod dtype;
pub mod error;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use backends::CpuBackend;
pub use device::Device;
pub use dtype::DType;
pub use error::{Error, Result};
pub use storage::Storage;
