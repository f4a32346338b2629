use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::fmt;

use super::gfp254::GFp254;
use crate::{CryptoRng, RngCore};

/// Element of GF(p^2), the quadratic extension of GF(p).
///
/// Since p = 3 mod 4, the value -1 is not a square in GF(p) and the
/// polynomial x^2 + 1 is irreducible; elements are represented as
/// `a + i*b` with `i^2 = -1`, for two base field components a ("real")
/// and b ("imaginary"). Moreover, 1 + i is neither a square nor a cube
/// in GF(p^2) (p = 3 mod 8), which is what makes this field the base
/// floor of the degree-4 and degree-12 towers used by BN pairings:
/// the next floor is built from x^2 - (1+i) (see `NQR`).
///
/// All mutating operations act in place on the (exclusively owned)
/// element; the type is `Copy`, so deep copies are implicit. Components
/// inherit the relaxed-range representation of `GFp254`: additive
/// operations defer full reduction, and comparisons and encodings
/// canonicalize internally.
#[derive(Clone, Copy, Debug)]
pub struct GFp254x2([GFp254; 2]);

impl GFp254x2 {

    pub const ZERO: Self = Self([ GFp254::ZERO, GFp254::ZERO ]);
    pub const ONE: Self = Self([ GFp254::ONE, GFp254::ZERO ]);

    /// The element i (square root of -1).
    pub const I: Self = Self([ GFp254::ZERO, GFp254::ONE ]);

    /// The quadratic non-residue 1 + i. The degree-4 extension tower is
    /// defined by the irreducible polynomial x^2 - (1+i); multiplication
    /// and division by this element (`set_mul_nonresidue()`,
    /// `set_div_nonresidue()`) are the maps the tower layers use.
    pub const NQR: Self = Self([ GFp254::ONE, GFp254::ONE ]);

    // Element encoding length, in bytes.
    pub const ENC_LEN: usize = 64;

    // Create an element from its two base field components
    // (self = x0 + i*x1).
    #[inline(always)]
    pub const fn from_gfp254(x0: GFp254, x1: GFp254) -> Self {
        Self([ x0, x1 ])
    }

    // Create an element from a single base field component (the
    // imaginary part is set to zero).
    #[inline(always)]
    pub fn from_real(x0: GFp254) -> Self {
        Self([ x0, GFp254::ZERO ])
    }

    // Create an element by converting the provided integer (the
    // imaginary part is set to zero).
    #[inline(always)]
    pub fn from_i32(x: i32) -> Self {
        Self::from_real(GFp254::from_i32(x))
    }

    // Create an element by converting the provided integer (the
    // imaginary part is set to zero).
    #[inline(always)]
    pub fn from_u32(x: u32) -> Self {
        Self::from_real(GFp254::from_u32(x))
    }

    // Create an element by converting the provided integer (the
    // imaginary part is set to zero).
    #[inline(always)]
    pub fn from_i64(x: i64) -> Self {
        Self::from_real(GFp254::from_i64(x))
    }

    // Create an element by converting the provided integer (the
    // imaginary part is set to zero).
    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self::from_real(GFp254::from_u64(x))
    }

    // Get x0 and x1 (both in GFp254) such that self = x0 + i*x1.
    // Canonical integer residues are obtained with the components'
    // `encode32()`.
    #[inline(always)]
    pub fn to_components(self) -> (GFp254, GFp254) {
        (self.0[0], self.0[1])
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        self.0[0] += rhs.0[0];
        self.0[1] += rhs.0[1];
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        self.0[0] -= rhs.0[0];
        self.0[1] -= rhs.0[1];
    }

    // Negate this value (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.0[0].set_neg();
        self.0[1].set_neg();
    }

    // Replace this value with its conjugate a - i*b.
    #[inline(always)]
    pub fn set_conj(&mut self) {
        self.0[1].set_neg();
    }

    // Conjugate of this value (a - i*b).
    #[inline(always)]
    pub fn conj(self) -> Self {
        let mut r = self;
        r.set_conj();
        r
    }

    // Conditionally copy the provided value ('a') into self:
    //  - If ctl == 0xFFFFFFFF, then the value of 'a' is copied into self.
    //  - If ctl == 0, then the value of self is unchanged.
    // ctl MUST be equal to 0 or 0xFFFFFFFF. The same instruction
    // sequence is executed regardless of the value of ctl.
    #[inline(always)]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        self.0[0].set_cond(&a.0[0], ctl);
        self.0[1].set_cond(&a.0[1], ctl);
    }

    // Return a value equal to either a0 (if ctl == 0) or a1 (if
    // ctl == 0xFFFFFFFF). Value ctl MUST be either 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    // Conditionally swap two elements: values a and b are exchanged if
    // ctl == 0xFFFFFFFF, or not exchanged if ctl == 0x00000000. Value
    // ctl MUST be either 0x00000000 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        GFp254::cswap(&mut a.0[0], &mut b.0[0], ctl);
        GFp254::cswap(&mut a.0[1], &mut b.0[1], ctl);
    }

    // Bring both components to their canonical residues. Arithmetic
    // never requires this; comparisons and encodings perform it
    // internally.
    #[inline]
    pub fn set_normalize(&mut self) {
        self.0[0].set_normalize();
        self.0[1].set_normalize();
    }

    // Reduce both components to their canonical residues. With this
    // backend the relaxed range is a single conditional subtraction
    // away from canonical, so this is the same operation as
    // `set_normalize()`.
    #[inline(always)]
    pub fn set_reduce(&mut self) {
        self.set_normalize();
    }

    // Multiply this value by a base field element (both components are
    // scaled).
    #[inline]
    pub fn set_mul_gfp254(&mut self, rhs: &GFp254) {
        self.0[0] *= rhs;
        self.0[1] *= rhs;
    }

    // Multiply this value by a base field element.
    #[inline(always)]
    pub fn mul_gfp254(self, rhs: &GFp254) -> Self {
        let mut r = self;
        r.set_mul_gfp254(rhs);
        r
    }

    // Multiply this value by a small integer (both components are
    // scaled).
    #[inline]
    pub fn set_mul_small(&mut self, x: u32) {
        self.0[0].set_mul_small(x);
        self.0[1].set_mul_small(x);
    }

    // Multiply this value by a small integer.
    #[inline(always)]
    pub fn mul_small(self, x: u32) -> Self {
        let mut r = self;
        r.set_mul_small(x);
        r
    }

    // Divide this value by 2.
    #[inline]
    pub fn set_half(&mut self) {
        self.0[0].set_half();
        self.0[1].set_half();
    }

    // Divide this value by 2.
    #[inline(always)]
    pub fn half(self) -> Self {
        let mut r = self;
        r.set_half();
        r
    }

    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        // Karatsuba: three base field multiplications instead of four.
        //   (a0 + i*a1)*(b0 + i*b1)
        //     = (a0*b0 - a1*b1) + i*((a0 + a1)*(b0 + b1) - a0*b0 - a1*b1)
        // Every intermediate sum goes through the base field addition,
        // which re-establishes the relaxed range, so chained products
        // cannot overflow the limb representation.
        let (a0, a1) = (self.0[0], self.0[1]);
        let (b0, b1) = (rhs.0[0], rhs.0[1]);
        let t1 = a0 * b0;
        let t2 = a1 * b1;
        let t3 = (a0 + a1) * (b0 + b1);
        self.0[0] = t1 - t2;
        self.0[1] = t3 - t1 - t2;
    }

    // Square this value (in place).
    #[inline]
    pub fn set_square(&mut self) {
        // (a + i*b)^2 = (a+b)*(a-b) + i*2ab
        // (two base field multiplications)
        let (a, b) = (self.0[0], self.0[1]);
        let t = a * b;
        self.0[0] = (a + b) * (a - b);
        self.0[1] = t.mul2();
    }

    // Square this value.
    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    // Square this value n times (in place).
    #[inline]
    pub fn set_xsquare(&mut self, n: u32) {
        for _ in 0..n {
            self.set_square();
        }
    }

    // Square this value n times.
    #[inline(always)]
    pub fn xsquare(self, n: u32) -> Self {
        let mut r = self;
        r.set_xsquare(n);
        r
    }

    /// Invert this value; if this value is zero, then it stays at zero.
    pub fn set_invert(&mut self) {
        // 1/(a + i*b) = (a - i*b)/(a^2 + b^2)
        // The norm a^2 + b^2 is zero only for the zero element (since
        // -1 is not a square in GF(p)), and the base field inversion
        // maps zero to zero.
        let (a, b) = (self.0[0], self.0[1]);
        let n = (a.square() + b.square()).invert();
        self.0[0] = a * n;
        self.0[1] = -(b * n);
    }

    /// Invert this value; if this value is zero, then zero is returned.
    #[inline(always)]
    pub fn invert(self) -> Self {
        let mut r = self;
        r.set_invert();
        r
    }

    #[inline(always)]
    fn set_div(&mut self, y: &Self) {
        self.set_mul(&y.invert());
    }

    // Multiply this value by i: (a + i*b)*i = -b + i*a. Only a swap and
    // a negation, no general multiplication.
    #[inline(always)]
    pub fn set_mul_i(&mut self) {
        let (a, b) = (self.0[0], self.0[1]);
        self.0[0] = -b;
        self.0[1] = a;
    }

    // Multiply this value by i.
    #[inline(always)]
    pub fn mul_i(self) -> Self {
        let mut r = self;
        r.set_mul_i();
        r
    }

    // Multiply this value by the non-residue 1 + i (see `NQR`):
    // (a + i*b)*(1 + i) = (a - b) + i*(a + b).
    #[inline(always)]
    pub fn set_mul_nonresidue(&mut self) {
        let (a, b) = (self.0[0], self.0[1]);
        self.0[0] = a - b;
        self.0[1] = a + b;
    }

    // Multiply this value by the non-residue 1 + i (see `NQR`).
    #[inline(always)]
    pub fn mul_nonresidue(self) -> Self {
        let mut r = self;
        r.set_mul_nonresidue();
        r
    }

    // Divide this value by the non-residue 1 + i (see `NQR`):
    // (a + i*b)/(1 + i) = ((a + b) + i*(b - a))/2.
    #[inline(always)]
    pub fn set_div_nonresidue(&mut self) {
        let (a, b) = (self.0[0], self.0[1]);
        self.0[0] = (a + b).half();
        self.0[1] = (b - a).half();
    }

    // Divide this value by the non-residue 1 + i (see `NQR`).
    #[inline(always)]
    pub fn div_nonresidue(self) -> Self {
        let mut r = self;
        r.set_div_nonresidue();
        r
    }

    // 0xFFFFFFFF when l == 1 (quadratic residue), 0 otherwise.
    #[inline(always)]
    fn qr_mask(l: i32) -> u32 {
        ((-(l as i64)) >> 63) as u32
    }

    // Set this value to its square root. Returned value is 0xFFFFFFFF
    // if the operation succeeded (a square root exists), 0 otherwise.
    // On failure, this value is set to zero. The zero element has
    // square root zero.
    //
    // Note: a purely real element whose real part is not a square in
    // the base field is reported as having no root (its norm-derived
    // candidates both fail the residue test).
    pub fn set_sqrt(&mut self) -> u32 {
        // Write self = a + i*b. If s + i*t is a square root, then
        //   s^2 - t^2 = a   and   2*s*t = b,
        // so s^2 and -t^2 are the roots of X^2 - a*X - b^2/4, i.e.
        //   s^2 = (a + r)/2 or (a - r)/2   with r = sqrt(a^2 + b^2).
        // The norm a^2 + b^2 must be a square in GF(p) for a root to
        // exist; s is then the base field root of whichever candidate
        // is itself a square, and t = b/(2*s).
        let (a, b) = (self.0[0], self.0[1]);
        let zz = self.iszero();

        let n = a.square() + b.square();
        let (r, cc_n) = n.sqrt();

        let mut w = (a + r).half();
        let w2 = (a - r).half();
        w.set_cond(&w2, !Self::qr_mask(w.legendre()));
        let cc_w = Self::qr_mask(w.legendre());

        let (s, _) = w.sqrt();
        let t = s.mul2().invert();
        self.0[0] = s;
        self.0[1] = b * t;

        let ok = zz | (cc_n & cc_w);
        self.set_cond(&Self::ZERO, !ok);
        ok
    }

    // Compute the square root of this value. Returned values are
    // (r, cc): on success, r is a square root and cc == 0xFFFFFFFF; on
    // failure, r is zero and cc == 0.
    #[inline(always)]
    pub fn sqrt(self) -> (Self, u32) {
        let mut x = self;
        let r = x.set_sqrt();
        (x, r)
    }

    // Compare this value with the provided one; returned value is
    // 0xFFFFFFFF on equality, 0 otherwise. Comparison canonicalizes
    // internal copies of the components first, so two values that are
    // mathematically equal always compare equal, regardless of the
    // sequence of operations that produced them.
    #[inline(always)]
    pub fn equals(self, rhs: Self) -> u32 {
        self.0[0].equals(rhs.0[0]) & self.0[1].equals(rhs.0[1])
    }

    // Compare this value with zero; returned value is 0xFFFFFFFF if
    // this value is zero, 0 otherwise.
    #[inline(always)]
    pub fn iszero(self) -> u32 {
        self.0[0].iszero() & self.0[1].iszero()
    }

    // Compare this value with one; returned value is 0xFFFFFFFF if
    // this value is the multiplicative identity, 0 otherwise.
    #[inline(always)]
    pub fn isone(self) -> u32 {
        self.0[0].equals(GFp254::ONE) & self.0[1].iszero()
    }

    // Encode this value onto exactly 64 bytes: the canonical residue
    // of the real component (32 bytes, unsigned little-endian), then
    // that of the imaginary component.
    #[inline]
    pub fn encode(self) -> [u8; 64] {
        let mut d = [0u8; 64];
        d[..32].copy_from_slice(&self.0[0].encode32());
        d[32..].copy_from_slice(&self.0[1].encode32());
        d
    }

    // Decode a value from exactly 64 bytes (see `encode()` for the
    // layout). If the provided slice does not have length exactly 64
    // bytes, or if either component is not strictly lower than p, then
    // the decoding fails: this element is set to zero and 0 is
    // returned. Otherwise 0xFFFFFFFF is returned.
    pub fn set_decode(&mut self, buf: &[u8]) -> u32 {
        *self = Self::ZERO;
        if buf.len() != 64 {
            return 0;
        }
        let c0 = self.0[0].set_decode32(&buf[..32]);
        let c1 = self.0[1].set_decode32(&buf[32..]);
        let cc = c0 & c1;
        self.set_cond(&Self::ZERO, !cc);
        cc
    }

    // Decode a value from exactly 64 bytes (see `set_decode()`).
    // Returned values are (r, cc): on success, r is the decoded value
    // and cc == 0xFFFFFFFF; on failure, r is zero and cc == 0.
    #[inline]
    pub fn decode_ct(buf: &[u8]) -> (Self, u32) {
        let mut r = Self::ZERO;
        let cc = r.set_decode(buf);
        (r, cc)
    }

    // Decode a value from exactly 64 bytes. If the slice length is
    // wrong or either component is not canonical then `None` is
    // returned. Side-channel analysis may reveal to outsiders whether
    // the decoding succeeded.
    #[inline]
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (r, cc) = Self::decode_ct(buf);
        if cc != 0 {
            Some(r)
        } else {
            None
        }
    }

    /// Draw a field element from the provided random source.
    pub fn rand<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        let x0 = GFp254::rand(rng);
        let x1 = GFp254::rand(rng);
        Self([ x0, x1 ])
    }

    // Perform a batch inversion of some elements. All elements of
    // the slice are replaced with their respective inverse (elements
    // of value zero are "inverted" into themselves).
    pub fn batch_invert(xx: &mut [Self]) {
        // We use Montgomery's trick:
        //   1/u = v*(1/(u*v))
        //   1/v = u*(1/(u*v))
        // Applied recursively on n elements, this computes an inversion
        // with a single inversion in the field, and 3*(n-1)
        // multiplications. We use batches of 100 elements; a fixed
        // moderate batch size allows stack-based allocation.
        let n = xx.len();
        let mut i = 0;
        while i < n {
            let blen = if (n - i) > 100 { 100 } else { n - i };
            let mut tt = [Self::ZERO; 100];
            tt[0] = xx[i];
            let zz0 = tt[0].iszero();
            tt[0].set_cond(&Self::ONE, zz0);
            for j in 1..blen {
                tt[j] = xx[i + j];
                tt[j].set_cond(&Self::ONE, tt[j].iszero());
                tt[j] *= tt[j - 1];
            }
            let mut k = Self::ONE / tt[blen - 1];
            for j in (1..blen).rev() {
                let mut x = xx[i + j];
                let zz = x.iszero();
                x.set_cond(&Self::ONE, zz);
                xx[i + j].set_cond(&(k * tt[j - 1]), !zz);
                k *= x;
            }
            xx[i].set_cond(&k, !zz0);
            i += blen;
        }
    }
}

// Canonical form "[<real>,<imag>]", both components as hexadecimal
// residues. Diagnostic and test use.
impl fmt::Display for GFp254x2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{},{}]", self.0[0], self.0[1])
    }
}

// ========================================================================
// Implementations of all the traits needed to use the simple operators
// (+, *, /...) on field element instances, with or without references.

impl Add<GFp254x2> for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn add(self, other: GFp254x2) -> GFp254x2 {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp254x2> for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn add(self, other: &GFp254x2) -> GFp254x2 {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<GFp254x2> for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn add(self, other: GFp254x2) -> GFp254x2 {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp254x2> for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn add(self, other: &GFp254x2) -> GFp254x2 {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<GFp254x2> for GFp254x2 {
    #[inline(always)]
    fn add_assign(&mut self, other: GFp254x2) {
        self.set_add(&other);
    }
}

impl AddAssign<&GFp254x2> for GFp254x2 {
    #[inline(always)]
    fn add_assign(&mut self, other: &GFp254x2) {
        self.set_add(other);
    }
}

impl Div<GFp254x2> for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn div(self, other: GFp254x2) -> GFp254x2 {
        let mut r = self;
        r.set_div(&other);
        r
    }
}

impl Div<&GFp254x2> for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn div(self, other: &GFp254x2) -> GFp254x2 {
        let mut r = self;
        r.set_div(other);
        r
    }
}

impl Div<GFp254x2> for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn div(self, other: GFp254x2) -> GFp254x2 {
        let mut r = *self;
        r.set_div(&other);
        r
    }
}

impl Div<&GFp254x2> for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn div(self, other: &GFp254x2) -> GFp254x2 {
        let mut r = *self;
        r.set_div(other);
        r
    }
}

impl DivAssign<GFp254x2> for GFp254x2 {
    #[inline(always)]
    fn div_assign(&mut self, other: GFp254x2) {
        self.set_div(&other);
    }
}

impl DivAssign<&GFp254x2> for GFp254x2 {
    #[inline(always)]
    fn div_assign(&mut self, other: &GFp254x2) {
        self.set_div(other);
    }
}

impl Mul<GFp254x2> for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn mul(self, other: GFp254x2) -> GFp254x2 {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp254x2> for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn mul(self, other: &GFp254x2) -> GFp254x2 {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<GFp254x2> for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn mul(self, other: GFp254x2) -> GFp254x2 {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp254x2> for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn mul(self, other: &GFp254x2) -> GFp254x2 {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<GFp254x2> for GFp254x2 {
    #[inline(always)]
    fn mul_assign(&mut self, other: GFp254x2) {
        self.set_mul(&other);
    }
}

impl MulAssign<&GFp254x2> for GFp254x2 {
    #[inline(always)]
    fn mul_assign(&mut self, other: &GFp254x2) {
        self.set_mul(other);
    }
}

impl Neg for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn neg(self) -> GFp254x2 {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn neg(self) -> GFp254x2 {
        let mut r = *self;
        r.set_neg();
        r
    }
}

impl Sub<GFp254x2> for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn sub(self, other: GFp254x2) -> GFp254x2 {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp254x2> for GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn sub(self, other: &GFp254x2) -> GFp254x2 {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<GFp254x2> for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn sub(self, other: GFp254x2) -> GFp254x2 {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp254x2> for &GFp254x2 {
    type Output = GFp254x2;

    #[inline(always)]
    fn sub(self, other: &GFp254x2) -> GFp254x2 {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<GFp254x2> for GFp254x2 {
    #[inline(always)]
    fn sub_assign(&mut self, other: GFp254x2) {
        self.set_sub(&other);
    }
}

impl SubAssign<&GFp254x2> for GFp254x2 {
    #[inline(always)]
    fn sub_assign(&mut self, other: &GFp254x2) {
        self.set_sub(other);
    }
}

// ========================================================================
