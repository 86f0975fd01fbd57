//! Arithmetic in the prime field GF(2^255 - 19).
//!
//! Field elements are kept in a radix-2^25.5 representation: ten signed
//! 32-bit limbs whose nominal widths alternate between 26 and 25 bits,
//!
//! ```text
//! [26, 25, 26, 25, 26, 25, 26, 25, 26, 25]
//! ```
//!
//! so that limb `i` carries the bits starting at offset `ceil(25.5 * i)`.
//! Limbs are allowed to drift above their nominal width between operations;
//! every routine states the bounds it needs and the bounds it restores.
//! Multiplication folds limbs that overflow position ten back into the low
//! half with a factor of 19, using the identity `2^255 = 19 (mod p)`.
//!
//! Only [`FieldElement::to_bytes`] produces the unique canonical
//! representative in `[0, p)`. Everything else trades canonicity for speed.
//!
//! All arithmetic here is branch-free with respect to the operand values.
//! The core operations are `const fn` so that the precomputed point tables
//! can be evaluated at compile time from the same code paths the runtime
//! uses.

use subtle::{Choice, ConditionallySelectable};

/// Nominal bit width of each limb.
const LIMB_BITS: [u32; 10] = [26, 25, 26, 25, 26, 25, 26, 25, 26, 25];

/// Carry-propagation schedule applied after a multiplication.
///
/// The interleaved order keeps every limb within one bit of nominal while
/// touching each limb at most twice. A carry leaving limb 9 re-enters limb 0
/// multiplied by 19.
const CARRY_ORDER: [usize; 12] = [0, 4, 1, 5, 2, 6, 3, 7, 4, 8, 9, 0];

/// An element of GF(2^255 - 19) in ten signed 26/25-bit limbs.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldElement(pub(crate) [i32; 10]);

impl FieldElement {
    pub(crate) const ZERO: Self = FieldElement([0; 10]);
    pub(crate) const ONE: Self = FieldElement([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Decodes 32 little-endian bytes into limb form.
    ///
    /// The top bit of the last byte is discarded, so the input is read as an
    /// integer in `[0, 2^255)`. Values in `[p, 2^255)` are accepted and kept
    /// as non-canonical representatives; later arithmetic treats them
    /// modulo `p`.
    pub(crate) const fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0i32; 10];
        let mut acc: u64 = 0;
        let mut acc_bits: u32 = 0;
        let mut next_byte = 0usize;

        let mut i = 0;
        while i < 10 {
            let width = LIMB_BITS[i];
            while acc_bits < width {
                acc |= (bytes[next_byte] as u64) << acc_bits;
                acc_bits += 8;
                next_byte += 1;
            }
            limbs[i] = (acc & ((1u64 << width) - 1)) as i32;
            acc >>= width;
            acc_bits -= width;
            i += 1;
        }

        FieldElement(limbs)
    }

    /// Encodes the canonical representative as 32 little-endian bytes.
    ///
    /// The limbs are first driven into `[0, p)`: a trial quotient `q` is
    /// computed by pushing a rounding carry through all ten limbs, `19 * q`
    /// is folded into limb 0, and one more carry pass leaves every limb at
    /// its nominal width with the overall value reduced. The final carry out
    /// of limb 9 is the subtraction of `2^255`, already accounted for by the
    /// fold. The canonical limbs are then streamed out bitwise.
    pub(crate) const fn to_bytes(&self) -> [u8; 32] {
        let mut h = [0i64; 10];
        let mut i = 0;
        while i < 10 {
            h[i] = self.0[i] as i64;
            i += 1;
        }

        let mut q = (19 * h[9] + (1i64 << 24)) >> 25;
        i = 0;
        while i < 10 {
            q = (h[i] + q) >> LIMB_BITS[i];
            i += 1;
        }
        h[0] += 19 * q;

        i = 0;
        while i < 10 {
            let carry = h[i] >> LIMB_BITS[i];
            h[i] -= carry << LIMB_BITS[i];
            if i < 9 {
                h[i + 1] += carry;
            }
            i += 1;
        }

        let mut out = [0u8; 32];
        let mut acc: u64 = 0;
        let mut acc_bits: u32 = 0;
        let mut next_byte = 0usize;

        i = 0;
        while i < 10 {
            acc |= (h[i] as u64) << acc_bits;
            acc_bits += LIMB_BITS[i];
            while acc_bits >= 8 {
                out[next_byte] = acc as u8;
                acc >>= 8;
                acc_bits -= 8;
                next_byte += 1;
            }
            i += 1;
        }
        // 255 bits leave seven bits in the accumulator for the last byte.
        out[next_byte] = acc as u8;

        out
    }

    /// Limb-wise addition. No reduction; each limb grows by one bit.
    pub(crate) const fn add(&self, rhs: &Self) -> Self {
        let mut limbs = [0i32; 10];
        let mut i = 0;
        while i < 10 {
            limbs[i] = self.0[i] + rhs.0[i];
            i += 1;
        }
        FieldElement(limbs)
    }

    /// Limb-wise subtraction. Limbs may go negative; the signed
    /// representation absorbs this without an explicit `2p` offset.
    pub(crate) const fn sub(&self, rhs: &Self) -> Self {
        let mut limbs = [0i32; 10];
        let mut i = 0;
        while i < 10 {
            limbs[i] = self.0[i] - rhs.0[i];
            i += 1;
        }
        FieldElement(limbs)
    }

    /// Limb-wise negation.
    pub(crate) const fn neg(&self) -> Self {
        let mut limbs = [0i32; 10];
        let mut i = 0;
        while i < 10 {
            limbs[i] = -self.0[i];
            i += 1;
        }
        FieldElement(limbs)
    }

    /// Folds a 19-limb product accumulator back to ten limbs and runs the
    /// carry schedule.
    ///
    /// Accumulator entries at positions ten and above weigh `2^255` times
    /// their low-half counterparts, so they fold down with a factor of 19.
    /// With operand limbs below 2^27 the folded terms stay under 2^63.
    const fn combine(mut t: [i64; 19]) -> Self {
        let mut k = 18;
        while k >= 10 {
            t[k - 10] += 19 * t[k];
            k -= 1;
        }

        let mut step = 0;
        while step < CARRY_ORDER.len() {
            let k = CARRY_ORDER[step];
            let shift = LIMB_BITS[k];
            let carry = (t[k] + (1i64 << (shift - 1))) >> shift;
            t[k] -= carry << shift;
            if k == 9 {
                t[0] += carry * 19;
            } else {
                t[k + 1] += carry;
            }
            step += 1;
        }

        let mut limbs = [0i32; 10];
        let mut i = 0;
        while i < 10 {
            limbs[i] = t[i] as i32;
            i += 1;
        }
        FieldElement(limbs)
    }

    /// Field multiplication.
    ///
    /// Schoolbook convolution over the limbs. A product of two odd-indexed
    /// limbs sits half a bit high in the mixed radix and picks up a factor
    /// of two; everything else lands exactly on a limb boundary. Requires
    /// both operands' limbs below 2^27 in magnitude, which holds for any
    /// reduced element plus one deferred addition or subtraction.
    pub(crate) const fn mul(&self, rhs: &Self) -> Self {
        let f = &self.0;
        let g = &rhs.0;
        let mut t = [0i64; 19];

        let mut i = 0;
        while i < 10 {
            let mut j = 0;
            while j < 10 {
                let mut term = (f[i] as i64) * (g[j] as i64);
                if (i & j & 1) == 1 {
                    term += term;
                }
                t[i + j] += term;
                j += 1;
            }
            i += 1;
        }

        Self::combine(t)
    }

    /// Field squaring.
    ///
    /// Same convolution as [`mul`](Self::mul) restricted to `i <= j`, with
    /// cross terms doubled. Saves close to half the limb products.
    pub(crate) const fn square(&self) -> Self {
        let f = &self.0;
        let mut t = [0i64; 19];

        let mut i = 0;
        while i < 10 {
            let mut j = i;
            while j < 10 {
                let mut term = (f[i] as i64) * (f[j] as i64);
                if (i & j & 1) == 1 {
                    term += term;
                }
                if i != j {
                    term += term;
                }
                t[i + j] += term;
                j += 1;
            }
            i += 1;
        }

        Self::combine(t)
    }

    /// Computes `2 * self^2` in one reduction pass.
    pub(crate) const fn square2(&self) -> Self {
        let f = &self.0;
        let mut t = [0i64; 19];

        let mut i = 0;
        while i < 10 {
            let mut j = i;
            while j < 10 {
                let mut term = (f[i] as i64) * (f[j] as i64);
                if (i & j & 1) == 1 {
                    term += term;
                }
                if i != j {
                    term += term;
                }
                t[i + j] += term;
                j += 1;
            }
            i += 1;
        }

        i = 0;
        while i < 19 {
            t[i] += t[i];
            i += 1;
        }

        Self::combine(t)
    }

    /// Applies `n` successive squarings, computing `self^(2^n)`.
    pub(crate) const fn square_n(&self, n: u32) -> Self {
        let mut r = *self;
        let mut i = 0;
        while i < n {
            r = r.square();
            i += 1;
        }
        r
    }

    /// Computes `self^(2^252 - 3)`, the exponent `(p - 5) / 8`.
    ///
    /// This is the power used to extract square roots during point
    /// decoding. Fixed addition chain of 252 squarings and 11 products.
    pub(crate) const fn pow22523(&self) -> Self {
        let mut t0 = self.square();
        let mut t1 = t0.square_n(2);
        t1 = self.mul(&t1);
        t0 = t0.mul(&t1);
        t0 = t0.square();
        t0 = t1.mul(&t0);
        t1 = t0.square_n(5);
        t0 = t1.mul(&t0);
        t1 = t0.square_n(10);
        t1 = t1.mul(&t0);
        let mut t2 = t1.square_n(20);
        t1 = t2.mul(&t1);
        t1 = t1.square_n(10);
        t0 = t1.mul(&t0);
        t1 = t0.square_n(50);
        t1 = t1.mul(&t0);
        t2 = t1.square_n(100);
        t1 = t2.mul(&t1);
        t1 = t1.square_n(50);
        t0 = t1.mul(&t0);
        t0 = t0.square_n(2);
        t0.mul(self)
    }

    /// Computes the multiplicative inverse `self^(p - 2) = self^(2^255 - 21)`.
    ///
    /// Fixed addition chain, constant-time in the operand. The inverse of
    /// zero comes out as zero, which the callers rely on nowhere but is the
    /// conventional behaviour.
    pub(crate) const fn invert(&self) -> Self {
        let mut t0 = self.square();
        let mut t1 = t0.square_n(2);
        t1 = self.mul(&t1);
        t0 = t0.mul(&t1);
        let mut t2 = t0.square();
        t1 = t1.mul(&t2);
        t2 = t1.square_n(5);
        t1 = t2.mul(&t1);
        t2 = t1.square_n(10);
        t2 = t2.mul(&t1);
        let mut t3 = t2.square_n(20);
        t2 = t3.mul(&t2);
        t2 = t2.square_n(10);
        t1 = t2.mul(&t1);
        t2 = t1.square_n(50);
        t2 = t2.mul(&t1);
        t3 = t2.square_n(100);
        t2 = t3.mul(&t2);
        t2 = t2.square_n(50);
        t1 = t2.mul(&t1);
        t1 = t1.square_n(5);
        t1.mul(&t0)
    }

    /// True when the canonical form of the element is not zero.
    ///
    /// Folds every output byte together before the comparison, so the
    /// timing does not depend on which byte differs.
    pub(crate) const fn is_nonzero(&self) -> bool {
        let bytes = self.to_bytes();
        let mut acc = 0u8;
        let mut i = 0;
        while i < 32 {
            acc |= bytes[i];
            i += 1;
        }
        acc != 0
    }

    /// The sign of a field element is the low bit of its canonical
    /// encoding.
    pub(crate) const fn is_negative(&self) -> bool {
        (self.to_bytes()[0] & 1) != 0
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0i32; 10];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = i32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        FieldElement(limbs)
    }
}

impl std::ops::Add for FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: Self) -> Self::Output {
        FieldElement::add(&self, &rhs)
    }
}

impl std::ops::Sub for FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: Self) -> Self::Output {
        FieldElement::sub(&self, &rhs)
    }
}

impl std::ops::Mul for FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: Self) -> Self::Output {
        FieldElement::mul(&self, &rhs)
    }
}

impl std::ops::Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> Self::Output {
        FieldElement::neg(&self)
    }
}
