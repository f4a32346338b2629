//! Finite fields.
//!
//! This module re-exports the two field types implemented by this
//! crate: `GFp254`, the base prime field of the 254-bit BN modulus,
//! and `GFp254x2`, its quadratic extension GF(p^2). Both are defined
//! in the `backend` module.

pub use crate::backend::{GFp254, GFp254x2};
