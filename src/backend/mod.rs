//! Architecture-specific implementations of finite fields.
//!
//! This module provides the structures that implement the two fields of
//! this crate. Only a 64-bit backend is provided; building for a target
//! with another pointer width fails at compile time.
//!
//! In general, the following properties apply to field implementations:
//!
//!  - An instance encapsulates a field element.
//!
//!  - The constant values `Self::ZERO` and `Self::ONE` contain the
//!    elements of value 0 and 1, respectively.
//!
//!  - Usual arithmetic operators can be used on field elements (`+`, `-`,
//!    `*`, `/`, and the compound assignments `+=`, `-=`, `*=` and `/=`).
//!    Division by zero is tolerated, and yields zero (regardless of the
//!    dividend). Operators can use both the raw types, and references
//!    thereof.
//!
//!  - Function `set_square(&mut self)` squares a field element (in place).
//!    Corresponding function `square(self) -> Self` returns the result
//!    as a new instance. Sequences of multiple squarings can be performed
//!    with `set_xsquare(&mut self, n: u32)` (and a corresponding
//!    `xsquare()` to get the result as a new instance).
//!
//!  - Function `set_neg(&mut self)` negates the instance on which it is
//!    applied.
//!
//!  - Function `set_cond(&mut self, a: &Self, ctl: u32)` sets the
//!    instance to the value of the other instance `a` if `ctl` is equal
//!    to 0xFFFFFFFF, or leaves the instance value unmodified if `ctl` is
//!    equal to 0x00000000. The same instruction sequence is executed in
//!    both cases.
//!
//!  - Function `select(a0: &Self, a1: &Self, ctl: u32) -> Self` returns
//!    a copy of `a0` if `ctl` is 0x00000000, or a copy of `a1` if
//!    `ctl` is 0xFFFFFFFF.
//!
//!  - Function `cswap(a: &mut Self, b: &mut Self, ctl: u32)`
//!    exchanges the contents of `a` and `b` if `ctl` is 0xFFFFFFFF,
//!    or leaves them unmodified if `ctl` is 0x00000000.
//!
//!  - Function `set_half(&mut self)` (and `half()`) divides the value
//!    by 2; `set_mul_small(&mut self, x: u32)` (and `mul_small()`)
//!    multiplies by a small integer provided at runtime. The base
//!    field also provides `set_mul2()` (and `mul2()`).
//!
//!  - Function `set_normalize(&mut self)` brings the internal
//!    representation to the canonical residue. Arithmetic operations
//!    never require it; comparisons and encodings perform it
//!    internally.
//!
//!  - Function `equals(self, rhs: Self) -> u32` returns 0xFFFFFFFF
//!    if `self` and `rhs` represent the same field element, or
//!    0x00000000 otherwise. Function `iszero(self) -> u32` is a
//!    specialized subcase that compares `self` with zero. Both
//!    canonicalize internal copies first, so they are insensitive to
//!    the operation history of their operands.
//!
//!  - The `legendre(self) -> i32` function returns the Legendre symbol
//!    for an element (0 for zero, +1 for non-zero squares, -1 for
//!    non-squares).
//!
//!  - The `set_sqrt(&mut self) -> u32` function computes the square root
//!    of an element. On success, 0xFFFFFFFF is returned. On failure
//!    (input is not a square), the element is set to zero, and
//!    0x00000000 is returned. The non-in-place variant of this function
//!    is `sqrt(self) -> (Self, u32)`.
//!
//!  - Function `encode32(self) -> [u8; 32]` encodes an element as
//!    exactly 32 bytes (64 bytes and `encode()` for the extension
//!    field). Unsigned little-endian convention is used. Encoding is
//!    always canonical (i.e. the encoding always uses the integer which
//!    is lower than the field modulus).
//!
//!  - Function `decode32(buf: &[u8]) -> (Self, u32)` decodes some bytes
//!    with little-endian convention (`decode(buf)` on the extension
//!    field, expecting 64 bytes). If the source slice does not have the
//!    expected length, or the byte contents yield a non-canonical
//!    value, then decoding fails. On success, the decoded value and
//!    0xFFFFFFFF are returned; on failure, zero and 0x00000000 are
//!    returned.
//!
//!  - Function `decode_reduce(buf: &[u8]) -> Self` decodes some bytes
//!    with unsigned little-endian convention. The obtained integer is
//!    reduced modulo the field order, so the process never fails.
//!
//!  - Function `rand<T: CryptoRng + RngCore>(rng: &mut T) -> Self`
//!    draws a field element from the provided random source, with
//!    negligible bias.

#[cfg(not(target_pointer_width = "64"))]
compile_error!("only the 64-bit backend is implemented");

pub mod w64;

pub use w64::gfp254::GFp254;
pub use w64::gfp254x2::GFp254x2;
