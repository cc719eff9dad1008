//! Gradient Functions
//!
//! Backward implementations for every differentiable operation on
//! `Variable`.
//!
//! @version 0.1.0
//! @author `Advml` Development Team

pub mod activation;
pub mod basic;
pub mod linalg;

pub use activation::{LeakyReluBackward, ReluBackward, SigmoidBackward, TanhBackward};
pub use basic::{
    reduce_grad_for_broadcast, AddBackward, DivBackward, MeanBackward, MulBackward, NegBackward,
    PowBackward, SubBackward, SumBackward,
};
pub use linalg::{MatMulBackward, ReshapeBackward, TransposeBackward};
