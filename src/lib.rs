//! Gfpair implements the field arithmetic that sits at the bottom of
//! pairing computations on BN curves.
//!
//! The library provides the base field GF(p) for the 254-bit BN modulus,
//! and the quadratic extension GF(p^2) built on it (elements `a + i*b`
//! with `i^2 = -1`). GF(p^2) is the foundation on which the higher
//! extension degrees (4 and 12) and the curve/pairing layers of a BN
//! pairing stack are constructed; those layers are not part of this
//! crate. The implementations aim at being efficient and portable, with
//! a convenient API so that field elements may be used in
//! straightforward expressions with normal arithmetic operators.
//!
//! Field types are defined in `backend` (64-bit only) and re-exported
//! from the `field` module: `GFp254` for the base field, `GFp254x2` for
//! the extension.
//!
//! # Usage
//!
//! The library is "mostly `no_std`". By default, it compiles against the
//! standard library. It can be compiled in `no_std` mode, in which case
//! all functionality is still available.
//!
//! # Conventions
//!
//! Additive operations keep values in a relaxed internal range and defer
//! full modular reduction; multiplicative operations tolerate relaxed
//! inputs. Comparisons and encodings always canonicalize first, so no
//! caller ever observes a non-canonical value.
//!
//! Except where explicitly documented, functions are constant-time. In
//! order to avoid unwanted side-channel leaks, Booleans are avoided
//! (compilers tend to "optimize" things a bit too eagerly when handling
//! `bool` values). All functions that return or use a potentially secret
//! Boolean value use the `u32` type; the convention is that 0xFFFFFFFF
//! means "true", and 0x00000000 means "false". No other value shall be
//! used, for they would lead to unpredictable results. Similarly, the
//! `Eq` or `PartialEq` traits are not implemented.
//!
//! Algebraic operations on field elements are performed with the usual
//! operators (e.g. `+`); appropriate traits are defined so that
//! structure types and pointers to structure types can be used more or
//! less interchangeably. Throughout the code, functions that modify the
//! object on which they are called tend to have a name in `set_*()`
//! (e.g. for an element `x`, `x.set_square()` modifies the element in
//! place, while `x.square()` leaves `x` unmodified and returns the
//! square as a new instance).

#![no_std]

#[cfg(all(feature = "alloc", not(feature = "std")))]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

pub mod backend;
pub mod field;
