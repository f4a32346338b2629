use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::convert::TryFrom;
use core::fmt;

use super::{addcarry_u64, subborrow_u64, umull_add2, sgnw};
use crate::{CryptoRng, RngCore};

/// Element of GF(p), the base prime field of the 254-bit BN modulus:
///
///    p = 0x2523648240000001BA344D80000000086121000000000013A700000000000013
///
/// (p is prime, p = 3 mod 8.)
///
/// Values are held in Montgomery representation, over four 64-bit
/// limbs. The internal integer is kept in the relaxed 0..2*p-1 range;
/// additive operations perform only a single conditional subtraction,
/// and the Montgomery reduction bound keeps multiplicative outputs in
/// the same range (4*p < 2^256). Canonical residues (0..p-1) are
/// produced by `set_normalize()`, and internally by every encoding and
/// comparison, so the relaxed range is never observable.
#[derive(Clone, Copy, Debug)]
pub struct GFp254([u64; 4]);

impl GFp254 {

    // Modulus p, in base 2^64 (low-to-high order).
    pub const MODULUS: [u64; 4] = [
        0xA700000000000013,
        0x6121000000000013,
        0xBA344D8000000008,
        0x2523648240000001,
    ];

    // 2*p, the exclusive upper bound of the relaxed internal range.
    const TWO_P: [u64; 4] = [
        0x4E00000000000026,
        0xC242000000000027,
        0x74689B0000000010,
        0x4A46C90480000003,
    ];

    // -1/p mod 2^64, for Montgomery reduction.
    const M0I: u64 = 0x08435E50D79435E5;

    // 2^512 mod p (Montgomery representation of 2^256).
    const R2: Self = Self([
        0xB3E886745370473D,
        0x55EFBF6E8C1CC3F1,
        0x281E3A1B7F86954F,
        0x1B0A32FDF6403A3D,
    ]);

    // 2^320 mod p (Montgomery representation of 2^64).
    const T64: Self = Self([
        0x7BA8A33509FF2C04,
        0xCE6C2A12E9A7E0DB,
        0xB119F52B9A3DF6B7,
        0x128A91347D05F46C,
    ]);

    // Exponent (p-1)/2, for the Euler criterion (Legendre symbol).
    const QM1D2: [u64; 4] = [
        0xD380000000000009,
        0x3090800000000009,
        0xDD1A26C000000004,
        0x1291B24120000000,
    ];

    // Exponent (p+1)/4, for square roots (valid since p = 3 mod 4).
    const QP1D4: [u64; 4] = [
        0xE9C0000000000005,
        0x1848400000000004,
        0x6E8D136000000002,
        0x0948D92090000000,
    ];

    // Exponent p-2, for Fermat inversion.
    const PM2: [u64; 4] = [
        0xA700000000000011,
        0x6121000000000013,
        0xBA344D8000000008,
        0x2523648240000001,
    ];

    pub const ZERO: Self = Self([ 0, 0, 0, 0 ]);

    // 2^256 mod p.
    pub const ONE: Self = Self([
        0x15FFFFFFFFFFFF8E,
        0xB939FFFFFFFFFF8A,
        0xA2C62EFFFFFFFFCD,
        0x212BA4F27FFFFFF5,
    ]);

    // p - (2^256 mod p).
    pub const MINUS_ONE: Self = Self([
        0x9100000000000085,
        0xA7E7000000000089,
        0x176E1E800000003A,
        0x03F7BF8FC000000C,
    ]);

    // Element encoding length, in bytes.
    pub const ENC_LEN: usize = 32;

    // Create an element from its four 64-bit limbs, provided in
    // little-endian order (least significant limb first). The 256-bit
    // value is implicitly reduced modulo p.
    #[inline(always)]
    pub fn from_w64le(x0: u64, x1: u64, x2: u64, x3: u64) -> Self {
        let mut r = Self([ x0, x1, x2, x3 ]);
        r.set_mul(&Self::R2);
        r
    }

    // Create an element from its four 64-bit limbs, provided in
    // big-endian order (most significant limb first). The 256-bit
    // value is implicitly reduced modulo p.
    #[inline(always)]
    pub fn from_w64be(x3: u64, x2: u64, x1: u64, x0: u64) -> Self {
        Self::from_w64le(x0, x1, x2, x3)
    }

    // Create an element by converting the provided integer.
    // If the source value is negative, then it is implicitly reduced
    // modulo p.
    #[inline(always)]
    pub fn from_i32(x: i32) -> Self {
        let mut r = Self::from_w64le(x as u64, 0, 0, 0);
        r.set_cond(&(r - Self::T64), (x >> 31) as u32);
        r
    }

    // Create an element by converting the provided integer.
    #[inline(always)]
    pub fn from_u32(x: u32) -> Self {
        Self::from_w64le(x as u64, 0, 0, 0)
    }

    // Create an element by converting the provided integer.
    // If the source value is negative, then it is implicitly reduced
    // modulo p.
    #[inline(always)]
    pub fn from_i64(x: i64) -> Self {
        let mut r = Self::from_w64le(x as u64, 0, 0, 0);
        r.set_cond(&(r - Self::T64), (x >> 63) as u32);
        r
    }

    // Create an element by converting the provided integer.
    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self::from_w64le(x, 0, 0, 0)
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        // Raw addition; since both operands are below 2*p < 2^255,
        // the sum fits on 256 bits.
        let (d0, cc) = addcarry_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = addcarry_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = addcarry_u64(self.0[2], rhs.0[2], cc);
        let (d3, _)  = addcarry_u64(self.0[3], rhs.0[3], cc);

        // Subtract 2*p, add it back if the result would be negative.
        let (e0, cc) = subborrow_u64(d0, Self::TWO_P[0], 0);
        let (e1, cc) = subborrow_u64(d1, Self::TWO_P[1], cc);
        let (e2, cc) = subborrow_u64(d2, Self::TWO_P[2], cc);
        let (e3, cc) = subborrow_u64(d3, Self::TWO_P[3], cc);

        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(e0, w & Self::TWO_P[0], 0);
        let (d1, cc) = addcarry_u64(e1, w & Self::TWO_P[1], cc);
        let (d2, cc) = addcarry_u64(e2, w & Self::TWO_P[2], cc);
        let (d3, _)  = addcarry_u64(e3, w & Self::TWO_P[3], cc);

        self.0[0] = d0;
        self.0[1] = d1;
        self.0[2] = d2;
        self.0[3] = d3;
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        // Raw subtraction.
        let (d0, cc) = subborrow_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = subborrow_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = subborrow_u64(self.0[2], rhs.0[2], cc);
        let (d3, cc) = subborrow_u64(self.0[3], rhs.0[3], cc);

        // Add back 2*p if there was a borrow.
        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(d0, w & Self::TWO_P[0], 0);
        let (d1, cc) = addcarry_u64(d1, w & Self::TWO_P[1], cc);
        let (d2, cc) = addcarry_u64(d2, w & Self::TWO_P[2], cc);
        let (d3, _)  = addcarry_u64(d3, w & Self::TWO_P[3], cc);

        self.0[0] = d0;
        self.0[1] = d1;
        self.0[2] = d2;
        self.0[3] = d3;
    }

    // Negate this value (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        // 2*p - x never borrows (x < 2*p); the conditional subtraction
        // then maps the x == 0 case (raw result 2*p) back to zero.
        let (d0, cc) = subborrow_u64(Self::TWO_P[0], self.0[0], 0);
        let (d1, cc) = subborrow_u64(Self::TWO_P[1], self.0[1], cc);
        let (d2, cc) = subborrow_u64(Self::TWO_P[2], self.0[2], cc);
        let (d3, _)  = subborrow_u64(Self::TWO_P[3], self.0[3], cc);

        let (e0, cc) = subborrow_u64(d0, Self::TWO_P[0], 0);
        let (e1, cc) = subborrow_u64(d1, Self::TWO_P[1], cc);
        let (e2, cc) = subborrow_u64(d2, Self::TWO_P[2], cc);
        let (e3, cc) = subborrow_u64(d3, Self::TWO_P[3], cc);

        let w = (cc as u64).wrapping_neg();
        self.0[0] = e0 ^ (w & (e0 ^ d0));
        self.0[1] = e1 ^ (w & (e1 ^ d1));
        self.0[2] = e2 ^ (w & (e2 ^ d2));
        self.0[3] = e3 ^ (w & (e3 ^ d3));
    }

    // Conditionally copy the provided value ('a') into self:
    //  - If ctl == 0xFFFFFFFF, then the value of 'a' is copied into self.
    //  - If ctl == 0, then the value of self is unchanged.
    // ctl MUST be equal to 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        self.0[0] ^= cw & (self.0[0] ^ a.0[0]);
        self.0[1] ^= cw & (self.0[1] ^ a.0[1]);
        self.0[2] ^= cw & (self.0[2] ^ a.0[2]);
        self.0[3] ^= cw & (self.0[3] ^ a.0[3]);
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
        let cw = ((ctl as i32) as i64) as u64;
        let t = cw & (a.0[0] ^ b.0[0]); a.0[0] ^= t; b.0[0] ^= t;
        let t = cw & (a.0[1] ^ b.0[1]); a.0[1] ^= t; b.0[1] ^= t;
        let t = cw & (a.0[2] ^ b.0[2]); a.0[2] ^= t; b.0[2] ^= t;
        let t = cw & (a.0[3] ^ b.0[3]); a.0[3] ^= t; b.0[3] ^= t;
    }

    // Bring the internal representation to the canonical residue
    // (0..p-1). The relaxed range is below 2*p, so a single conditional
    // subtraction suffices.
    #[inline]
    pub fn set_normalize(&mut self) {
        let (e0, cc) = subborrow_u64(self.0[0], Self::MODULUS[0], 0);
        let (e1, cc) = subborrow_u64(self.0[1], Self::MODULUS[1], cc);
        let (e2, cc) = subborrow_u64(self.0[2], Self::MODULUS[2], cc);
        let (e3, cc) = subborrow_u64(self.0[3], Self::MODULUS[3], cc);

        // Keep the subtracted value unless it went negative.
        let w = (cc as u64).wrapping_neg();
        self.0[0] = e0 ^ (w & (e0 ^ self.0[0]));
        self.0[1] = e1 ^ (w & (e1 ^ self.0[1]));
        self.0[2] = e2 ^ (w & (e2 ^ self.0[2]));
        self.0[3] = e3 ^ (w & (e3 ^ self.0[3]));
    }

    // Montgomery multiplication:
    //    self <- (self * rhs) / 2^256 mod p
    // If both operands are below 2*p, then the output is below 2*p as
    // well (since 4*p < 2^256). The left operand may even range over
    // the full 0..2^256-1 when the right operand is canonical (below
    // p), which still bounds the output below 2*p; the decoding and
    // limb-import paths rely on this with rhs = R2.
    fn set_mul(&mut self, rhs: &Self) {
        let a = self.0;
        let b = rhs.0;

        // Schoolbook product, eight limbs.
        let mut t = [0u64; 8];
        for i in 0..4 {
            let mut hi = 0u64;
            for j in 0..4 {
                let (lo, h) = umull_add2(a[i], b[j], t[i + j], hi);
                t[i + j] = lo;
                hi = h;
            }
            t[i + 4] = hi;
        }

        // Montgomery reduction: at each round, add f*p (with f chosen
        // so that the low limb cancels) and divide by 2^64. The running
        // value stays below 2*p*2^256 < 2^512, so the carry never
        // overflows the eight-limb buffer.
        for i in 0..4 {
            let f = t[i].wrapping_mul(Self::M0I);
            let mut hi = 0u64;
            for j in 0..4 {
                let (lo, h) = umull_add2(f, Self::MODULUS[j], t[i + j], hi);
                t[i + j] = lo;
                hi = h;
            }
            let (lo, mut cc) = addcarry_u64(t[i + 4], hi, 0);
            t[i + 4] = lo;
            for j in (i + 5)..8 {
                let (lo, c) = addcarry_u64(t[j], 0, cc);
                t[j] = lo;
                cc = c;
            }
        }

        self.0[0] = t[4];
        self.0[1] = t[5];
        self.0[2] = t[6];
        self.0[3] = t[7];
    }

    // Montgomery reduction (division by 2^256): converts out of
    // Montgomery representation. Input must be canonical (0..p-1);
    // output is canonical.
    #[inline]
    fn set_montyred(&mut self) {
        let mut t = [0u64; 8];
        t[..4].copy_from_slice(&self.0);
        for i in 0..4 {
            let f = t[i].wrapping_mul(Self::M0I);
            let mut hi = 0u64;
            for j in 0..4 {
                let (lo, h) = umull_add2(f, Self::MODULUS[j], t[i + j], hi);
                t[i + j] = lo;
                hi = h;
            }
            let (lo, mut cc) = addcarry_u64(t[i + 4], hi, 0);
            t[i + 4] = lo;
            for j in (i + 5)..8 {
                let (lo, c) = addcarry_u64(t[j], 0, cc);
                t[j] = lo;
                cc = c;
            }
        }
        self.0[0] = t[4];
        self.0[1] = t[5];
        self.0[2] = t[6];
        self.0[3] = t[7];
    }

    // Square this value (in place). This delegates to the generic
    // Montgomery multiplication.
    #[inline(always)]
    pub fn set_square(&mut self) {
        let r = *self;
        self.set_mul(&r);
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

    // Divide this value by 2.
    #[inline(always)]
    pub fn set_half(&mut self) {
        // If the value is odd, add p (odd) to make it even, then shift.
        // The sum stays below 3*p < 2^256 and the result below 2*p.
        let w = (self.0[0] & 1).wrapping_neg();
        let (d0, cc) = addcarry_u64(self.0[0], w & Self::MODULUS[0], 0);
        let (d1, cc) = addcarry_u64(self.0[1], w & Self::MODULUS[1], cc);
        let (d2, cc) = addcarry_u64(self.0[2], w & Self::MODULUS[2], cc);
        let (d3, _)  = addcarry_u64(self.0[3], w & Self::MODULUS[3], cc);

        self.0[0] = (d0 >> 1) | (d1 << 63);
        self.0[1] = (d1 >> 1) | (d2 << 63);
        self.0[2] = (d2 >> 1) | (d3 << 63);
        self.0[3] = d3 >> 1;
    }

    // Divide this value by 2.
    #[inline(always)]
    pub fn half(self) -> Self {
        let mut r = self;
        r.set_half();
        r
    }

    // Multiply this value by 2.
    #[inline(always)]
    pub fn set_mul2(&mut self) {
        let r = *self;
        self.set_add(&r);
    }

    // Multiply this value by 2.
    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    // Multiply this value by a small integer.
    #[inline(always)]
    pub fn set_mul_small(&mut self, x: u32) {
        self.set_mul(&Self::from_u32(x));
    }

    // Multiply this value by a small integer.
    #[inline(always)]
    pub fn mul_small(self, x: u32) -> Self {
        let mut r = self;
        r.set_mul_small(x);
        r
    }

    // Raise this value to the provided exponent. The exponent is public
    // and is encoded over four 64-bit limbs (little-endian order).
    fn set_modpow_pubexp(&mut self, e: &[u64; 4]) {
        // Make a 4-bit window; win[i] contains x^(i+1).
        let mut win = [Self::ZERO; 15];
        win[0] = *self;
        for i in 1..8 {
            let j = i * 2;
            win[j - 1] = win[i - 1].square();
            win[j] = win[j - 1] * win[0];
        }

        // Explore 4-bit chunks of the exponent, high to low. Skip
        // leading chunks of value 0.
        let mut z = false;
        for i in (0..4).rev() {
            let ew = e[i];
            for j in (0..16).rev() {
                if z {
                    self.set_xsquare(4);
                }
                let c = ((ew >> (j << 2)) & 0x0F) as usize;
                if c != 0 {
                    if z {
                        self.set_mul(&win[c - 1]);
                    } else {
                        z = true;
                        *self = win[c - 1];
                    }
                }
            }
        }
        if !z {
            *self = Self::ONE;
        }
    }

    /// Invert this value; if this value is zero, then it stays at zero.
    pub fn set_invert(&mut self) {
        // Fermat: x^(p-2) = 1/x for x != 0, and 0 maps to 0.
        self.set_modpow_pubexp(&Self::PM2);
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

    // Compute the Legendre symbol on this value. Return value is:
    //   0   if this value is zero
    //  +1   if this value is a non-zero quadratic residue
    //  -1   if this value is not a quadratic residue
    pub fn legendre(self) -> i32 {
        // Euler criterion: x^((p-1)/2) is 1, -1 or 0.
        let mut r = self;
        r.set_modpow_pubexp(&Self::QM1D2);
        let qr = r.equals(Self::ONE);
        let nqr = r.equals(Self::MINUS_ONE);
        ((qr & 1) as i32) - ((nqr & 1) as i32)
    }

    // Set this value to its square root. Returned value is 0xFFFFFFFF
    // if the operation succeeded (value was indeed a quadratic residue),
    // 0 otherwise (value was not a quadratic residue). In the latter
    // case, this value is set to zero as well. When this operation
    // succeeds, the returned square root is the one whose least
    // significant bit is 0 (when normalized in 0..p-1).
    pub fn set_sqrt(&mut self) -> u32 {
        // Keep a copy of the source value, to check the square root
        // afterwards (p = 3 mod 4, so the candidate is x^((p+1)/4)).
        let x = *self;
        self.set_modpow_pubexp(&Self::QP1D4);

        // Choose the square root whose least significant bit is 0.
        self.set_cond(&-(self as &Self),
            ((self.encode32()[0] as u32) & 1).wrapping_neg());

        // Check computed square root; clear this value on mismatch.
        let r = self.square().equals(x);
        self.set_cond(&Self::ZERO, !r);
        r
    }

    // Compute the square root of this value. Returned values are (r, cc):
    // on success, r is the square root (with least significant bit 0)
    // and cc == 0xFFFFFFFF; on failure, r is zero and cc == 0.
    #[inline(always)]
    pub fn sqrt(self) -> (Self, u32) {
        let mut x = self;
        let r = x.set_sqrt();
        (x, r)
    }

    // Compare this value with the provided one; returned value is
    // 0xFFFFFFFF on equality, 0 otherwise. Comparison canonicalizes
    // internal copies first, so it is insensitive to the operation
    // history of either operand.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        let mut a = self;
        let mut b = rhs;
        a.set_normalize();
        b.set_normalize();
        let m = (a.0[0] ^ b.0[0]) | (a.0[1] ^ b.0[1])
              | (a.0[2] ^ b.0[2]) | (a.0[3] ^ b.0[3]);
        !(sgnw(m | m.wrapping_neg()) as u32)
    }

    // Compare this value with zero; returned value is 0xFFFFFFFF if
    // this value is zero, 0 otherwise.
    #[inline]
    pub fn iszero(self) -> u32 {
        let mut a = self;
        a.set_normalize();
        let m = a.0[0] | a.0[1] | a.0[2] | a.0[3];
        !(sgnw(m | m.wrapping_neg()) as u32)
    }

    // Encode this value onto exactly 32 bytes. The canonical residue
    // (0..p-1) is written in unsigned little-endian order.
    #[inline]
    pub fn encode32(self) -> [u8; 32] {
        let mut r = self;
        r.set_normalize();
        r.set_montyred();
        let mut d = [0u8; 32];
        d[ 0.. 8].copy_from_slice(&r.0[0].to_le_bytes());
        d[ 8..16].copy_from_slice(&r.0[1].to_le_bytes());
        d[16..24].copy_from_slice(&r.0[2].to_le_bytes());
        d[24..32].copy_from_slice(&r.0[3].to_le_bytes());
        d
    }

    // Decode a value from exactly 32 bytes, unsigned little-endian
    // convention. If the provided slice does not have length exactly
    // 32 bytes, or if the value is not strictly lower than p, then the
    // decoding fails. On failure, this element is set to zero, and 0 is
    // returned; otherwise, 0xFFFFFFFF is returned. If the source slice
    // has length 32 bytes, then the operation outcome is shielded from
    // side-channel leaks.
    pub fn set_decode32(&mut self, buf: &[u8]) -> u32 {
        *self = Self::ZERO;
        if buf.len() != 32 {
            return 0;
        }

        self.0[0] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[ 0.. 8]).unwrap());
        self.0[1] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[ 8..16]).unwrap());
        self.0[2] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[16..24]).unwrap());
        self.0[3] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[24..32]).unwrap());

        // Clear the value if not canonical.
        let (_, cc) = subborrow_u64(self.0[0], Self::MODULUS[0], 0);
        let (_, cc) = subborrow_u64(self.0[1], Self::MODULUS[1], cc);
        let (_, cc) = subborrow_u64(self.0[2], Self::MODULUS[2], cc);
        let (_, cc) = subborrow_u64(self.0[3], Self::MODULUS[3], cc);
        let cc = (cc as u64).wrapping_neg();
        self.0[0] &= cc;
        self.0[1] &= cc;
        self.0[2] &= cc;
        self.0[3] &= cc;

        self.set_mul(&Self::R2);
        cc as u32
    }

    // Decode a value from exactly 32 bytes (see `set_decode32()`).
    // Returned values are (r, cc): on success, r is the decoded value
    // and cc == 0xFFFFFFFF; on failure, r is zero and cc == 0.
    #[inline]
    pub fn decode32(buf: &[u8]) -> (Self, u32) {
        let mut r = Self::ZERO;
        let cc = r.set_decode32(buf);
        (r, cc)
    }

    // Decode a value from 32 bytes. If the slice length is not 32 bytes
    // or the value is not canonical then `None` is returned.
    // Side-channel analysis may reveal to outsiders whether the
    // decoding succeeded.
    #[inline]
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (r, cc) = Self::decode32(buf);
        if cc != 0 {
            Some(r)
        } else {
            None
        }
    }

    // Set the value by decoding exactly 32 bytes in little-endian
    // convention; the value is implicitly reduced modulo p.
    #[inline]
    fn set_decode32_reduce(&mut self, buf: &[u8]) {
        debug_assert!(buf.len() == 32);
        self.0[0] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[ 0.. 8]).unwrap());
        self.0[1] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[ 8..16]).unwrap());
        self.0[2] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[16..24]).unwrap());
        self.0[3] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[24..32]).unwrap());
        // Montgomery multiplication implies automatic reduction.
        self.set_mul(&Self::R2);
    }

    #[inline(always)]
    fn decode32_reduce(buf: &[u8]) -> Self {
        let mut r = Self::ZERO;
        if buf.len() == 32 {
            r.set_decode32_reduce(buf);
        }
        r
    }

    // Decode an element from some bytes. The bytes are interpreted in
    // unsigned little-endian convention, and the resulting integer is
    // reduced modulo p. This process never fails.
    pub fn set_decode_reduce(&mut self, buf: &[u8]) {
        *self = Self::ZERO;
        let mut n = buf.len();
        if n == 0 {
            return;
        }
        if (n & 31) != 0 {
            let k = n & !(31 as usize);
            let mut tmp = [0u8; 32];
            tmp[..(n - k)].copy_from_slice(&buf[k..]);
            n = k;
            self.set_decode32_reduce(&tmp);
        } else {
            n -= 32;
            self.set_decode32_reduce(&buf[n..]);
        }

        while n > 0 {
            n -= 32;
            let d = Self::decode32_reduce(&buf[n..n + 32]);
            self.set_mul(&Self::R2);
            self.set_add(&d);
        }
    }

    // Decode an element from some bytes (see `set_decode_reduce()`).
    #[inline(always)]
    pub fn decode_reduce(buf: &[u8]) -> Self {
        let mut r = Self::ZERO;
        r.set_decode_reduce(buf);
        r
    }

    /// Draw a field element from the provided random source. The
    /// source is sampled over 48 bytes, so the bias relative to the
    /// uniform distribution is negligible.
    pub fn rand<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        let mut tmp = [0u8; 48];
        rng.fill_bytes(&mut tmp);
        Self::decode_reduce(&tmp)
    }
}

// Canonical residue, as lowercase hexadecimal (64 digits,
// most significant first). Diagnostic and test use.
impl fmt::Display for GFp254 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let d = self.encode32();
        for i in (0..32).rev() {
            write!(f, "{:02x}", d[i])?;
        }
        Ok(())
    }
}

// ========================================================================
// Implementations of all the traits needed to use the simple operators
// (+, *, /...) on field element instances, with or without references.

impl Add<GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn add(self, other: GFp254) -> GFp254 {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn add(self, other: &GFp254) -> GFp254 {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn add(self, other: GFp254) -> GFp254 {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn add(self, other: &GFp254) -> GFp254 {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<GFp254> for GFp254 {
    #[inline(always)]
    fn add_assign(&mut self, other: GFp254) {
        self.set_add(&other);
    }
}

impl AddAssign<&GFp254> for GFp254 {
    #[inline(always)]
    fn add_assign(&mut self, other: &GFp254) {
        self.set_add(other);
    }
}

impl Div<GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn div(self, other: GFp254) -> GFp254 {
        let mut r = self;
        r.set_div(&other);
        r
    }
}

impl Div<&GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn div(self, other: &GFp254) -> GFp254 {
        let mut r = self;
        r.set_div(other);
        r
    }
}

impl Div<GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn div(self, other: GFp254) -> GFp254 {
        let mut r = *self;
        r.set_div(&other);
        r
    }
}

impl Div<&GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn div(self, other: &GFp254) -> GFp254 {
        let mut r = *self;
        r.set_div(other);
        r
    }
}

impl DivAssign<GFp254> for GFp254 {
    #[inline(always)]
    fn div_assign(&mut self, other: GFp254) {
        self.set_div(&other);
    }
}

impl DivAssign<&GFp254> for GFp254 {
    #[inline(always)]
    fn div_assign(&mut self, other: &GFp254) {
        self.set_div(other);
    }
}

impl Mul<GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn mul(self, other: GFp254) -> GFp254 {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn mul(self, other: &GFp254) -> GFp254 {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn mul(self, other: GFp254) -> GFp254 {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn mul(self, other: &GFp254) -> GFp254 {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<GFp254> for GFp254 {
    #[inline(always)]
    fn mul_assign(&mut self, other: GFp254) {
        self.set_mul(&other);
    }
}

impl MulAssign<&GFp254> for GFp254 {
    #[inline(always)]
    fn mul_assign(&mut self, other: &GFp254) {
        self.set_mul(other);
    }
}

impl Neg for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn neg(self) -> GFp254 {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn neg(self) -> GFp254 {
        let mut r = *self;
        r.set_neg();
        r
    }
}

impl Sub<GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn sub(self, other: GFp254) -> GFp254 {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn sub(self, other: &GFp254) -> GFp254 {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn sub(self, other: GFp254) -> GFp254 {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn sub(self, other: &GFp254) -> GFp254 {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<GFp254> for GFp254 {
    #[inline(always)]
    fn sub_assign(&mut self, other: GFp254) {
        self.set_sub(&other);
    }
}

impl SubAssign<&GFp254> for GFp254 {
    #[inline(always)]
    fn sub_assign(&mut self, other: &GFp254) {
        self.set_sub(other);
    }
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::GFp254;
    use num_bigint::{BigInt, Sign};
    use sha2::{Sha256, Digest};

    fn modulus() -> BigInt {
        let mut w = [0u32; 8];
        for i in 0..4 {
            w[2 * i] = GFp254::MODULUS[i] as u32;
            w[2 * i + 1] = (GFp254::MODULUS[i] >> 32) as u32;
        }
        BigInt::from_slice(Sign::Plus, &w)
    }

    // va and vb must be 32 bytes each in length.
    fn check_gfp_ops(va: &[u8], vb: &[u8]) {
        let zp = modulus();
        let zpz = &zp << 64;

        let a = GFp254::decode_reduce(va);
        let b = GFp254::decode_reduce(vb);
        let za = BigInt::from_bytes_le(Sign::Plus, va);
        let zb = BigInt::from_bytes_le(Sign::Plus, vb);

        let vc = a.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd = &za % &zp;
        assert!(zc == zd);

        let c = a + b;
        let vc = c.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd = (&za + &zb) % &zp;
        assert!(zc == zd);

        let c = a - b;
        let vc = c.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd = ((&zpz + &za) - &zb) % &zp;
        assert!(zc == zd);

        let c = -a;
        let vc = c.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd = (&zpz - &za) % &zp;
        assert!(zc == zd);

        let c = a * b;
        let vc = c.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd = (&za * &zb) % &zp;
        assert!(zc == zd);

        let c = a.square();
        let vc = c.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd = (&za * &za) % &zp;
        assert!(zc == zd);

        let c = a.half();
        let vc = c.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd: BigInt = ((&zpz + (&zc << 1)) - &za) % &zp;
        assert!(zd.sign() == Sign::NoSign);

        let c = a.mul2();
        let vc = c.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd = (&za << 1) % &zp;
        assert!(zc == zd);

        let x = b.encode32()[1] as u32;
        let c = a.mul_small(x);
        let vc = c.encode32();
        let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
        let zd = (&za * x) % &zp;
        assert!(zc == zd);

        let (e, cc) = GFp254::decode32(va);
        if cc != 0 {
            assert!(cc == 0xFFFFFFFF);
            assert!(e.encode32() == va);
        } else {
            assert!(e.encode32() == [0u8; 32]);
        }

        let mut tmp = [0u8; 64];
        tmp[0..32].copy_from_slice(va);
        tmp[32..64].copy_from_slice(vb);
        for k in 0..65 {
            let c = GFp254::decode_reduce(&tmp[0..k]);
            let vc = c.encode32();
            let zc = BigInt::from_bytes_le(Sign::Plus, &vc);
            let zd = BigInt::from_bytes_le(Sign::Plus, &tmp[0..k]) % &zp;
            assert!(zc == zd);
        }

        let c = a / b;
        let d = c * b;
        if b.iszero() != 0 {
            assert!(c.iszero() != 0);
        } else {
            assert!(a.equals(d) != 0);
        }
    }

    #[test]
    fn gfp254_ops() {
        let mut va = [0u8; 32];
        let mut vb = [0u8; 32];
        check_gfp_ops(&va, &vb);
        assert!(GFp254::decode_reduce(&va).iszero() == 0xFFFFFFFF);
        assert!(GFp254::decode_reduce(&va)
            .equals(GFp254::decode_reduce(&vb)) == 0xFFFFFFFF);
        assert!(GFp254::decode_reduce(&va).legendre() == 0);
        for i in 0..32 {
            va[i] = 0xFF;
            vb[i] = 0xFF;
        }
        check_gfp_ops(&va, &vb);
        assert!(GFp254::decode_reduce(&va).iszero() == 0);
        va[0..8].copy_from_slice(&GFp254::MODULUS[0].to_le_bytes());
        va[8..16].copy_from_slice(&GFp254::MODULUS[1].to_le_bytes());
        va[16..24].copy_from_slice(&GFp254::MODULUS[2].to_le_bytes());
        va[24..32].copy_from_slice(&GFp254::MODULUS[3].to_le_bytes());
        assert!(GFp254::decode_reduce(&va).iszero() == 0xFFFFFFFF);
        // The encoding of p itself is not canonical.
        let (_, cc) = GFp254::decode32(&va);
        assert!(cc == 0);

        let mut sh = Sha256::new();
        for i in 0..300 {
            sh.update(((2 * i + 0) as u64).to_le_bytes());
            let va = sh.finalize_reset();
            sh.update(((2 * i + 1) as u64).to_le_bytes());
            let vb = sh.finalize_reset();
            check_gfp_ops(&va, &vb);
            assert!(GFp254::decode_reduce(&va).iszero() == 0);
            assert!(GFp254::decode_reduce(&va)
                .equals(GFp254::decode_reduce(&vb)) == 0);
        }
    }

    #[test]
    fn gfp254_sqrt() {
        // 2 is not a square modulo p (p = 3 mod 8).
        let nqr = GFp254::from_u32(2);
        assert!(nqr.legendre() == -1);

        let mut sh = Sha256::new();
        for i in 0..100 {
            sh.update((i as u64).to_le_bytes());
            let v = sh.finalize_reset();
            let s = GFp254::decode_reduce(&v).square();
            let s2 = s * nqr;
            assert!(s.legendre() == 1);
            assert!(s2.legendre() == -1);
            let (t, r) = s.sqrt();
            assert!(r == 0xFFFFFFFF);
            assert!(t.square().equals(s) == 0xFFFFFFFF);
            assert!((t.encode32()[0] & 1) == 0);
            let (t2, r) = s2.sqrt();
            assert!(r == 0);
            assert!(t2.iszero() == 0xFFFFFFFF);
        }
    }

    #[test]
    fn gfp254_small_values() {
        assert!(GFp254::ONE.encode32()[0] == 1);
        assert!((GFp254::ONE + GFp254::MINUS_ONE).iszero() == 0xFFFFFFFF);
        assert!(GFp254::from_i32(-1).equals(GFp254::MINUS_ONE) == 0xFFFFFFFF);
        assert!(GFp254::from_i64(-814).equals(
            -GFp254::from_u64(814)) == 0xFFFFFFFF);
        let x = GFp254::from_u32(1234567);
        assert!(x.half().mul2().equals(x) == 0xFFFFFFFF);
        assert!((x * x.invert()).equals(GFp254::ONE) == 0xFFFFFFFF);
        assert!(GFp254::ZERO.invert().iszero() == 0xFFFFFFFF);
        assert!(format!("{}", GFp254::from_u32(0x1f)).ends_with("1f"));
    }

    #[test]
    fn gfp254_cond_ops() {
        let a = GFp254::from_u32(101);
        let b = GFp254::from_u32(202);
        let mut c = a;
        c.set_cond(&b, 0);
        assert!(c.equals(a) == 0xFFFFFFFF);
        c.set_cond(&b, 0xFFFFFFFF);
        assert!(c.equals(b) == 0xFFFFFFFF);
        assert!(GFp254::select(&a, &b, 0).equals(a) == 0xFFFFFFFF);
        assert!(GFp254::select(&a, &b, 0xFFFFFFFF).equals(b) == 0xFFFFFFFF);
        let (mut d, mut e) = (a, b);
        GFp254::cswap(&mut d, &mut e, 0);
        assert!(d.equals(a) == 0xFFFFFFFF && e.equals(b) == 0xFFFFFFFF);
        GFp254::cswap(&mut d, &mut e, 0xFFFFFFFF);
        assert!(d.equals(b) == 0xFFFFFFFF && e.equals(a) == 0xFFFFFFFF);
    }
}
