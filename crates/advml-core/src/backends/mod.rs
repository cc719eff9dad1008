//! Compute Backends
//!
//! Kernel implementations for tensor operations. The workspace ships a
//! single CPU backend; all tensor math bottoms out here.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

pub mod cpu;

pub use cpu::CpuBackend;
