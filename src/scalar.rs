//! Arithmetic modulo the group order L.
//!
//! Scalars are integers modulo
//!
//! ```text
//! L = 2^252 + 27742317777372353535851937790883648493
//! ```
//!
//! held in canonical form as 32 little-endian bytes. Reduction and
//! multiplication unpack the bytes into transient signed 21-bit limbs; the
//! high limbs are folded down with the precomputed coefficients of
//! `2^252 mod L`, and a few interleaved carry passes restore the limb
//! bounds. The byte form is the only representation that crosses a module
//! boundary.
//!
//! Besides ring arithmetic this module owns the two scalar recodings used
//! by the multiplication strategies: the signed radix-16 form consumed by
//! the fixed-base table walk, and the signed sliding-window form consumed
//! by the variable-base loop. Everything except the recodings runs in
//! constant time; the recodings themselves are only applied to scalars that
//! are public (signature components and hash outputs during verification)
//! or feed a constant-time consumer.

use zeroize::Zeroize;

/// Limbs carry 21 bits.
const MASK_21: i64 = (1 << 21) - 1;

/// Little-endian 21-bit limbs of `2^252 mod L`, negated where the sign
/// alternation keeps the folded limbs balanced.
const FOLD: [i64; 6] = [666643, 470296, 654183, -997805, 136657, -683901];

#[inline(always)]
fn load_3(input: &[u8]) -> u64 {
    (input[0] as u64) | ((input[1] as u64) << 8) | ((input[2] as u64) << 16)
}

#[inline(always)]
fn load_4(input: &[u8]) -> u64 {
    (input[0] as u64)
        | ((input[1] as u64) << 8)
        | ((input[2] as u64) << 16)
        | ((input[3] as u64) << 24)
}

/// Splits 32 bytes into twelve 21-bit limbs.
fn load_limbs(data: &[u8; 32]) -> [i64; 12] {
    [
        (load_3(&data[0..]) as i64) & MASK_21,
        ((load_4(&data[2..]) >> 5) as i64) & MASK_21,
        ((load_3(&data[5..]) >> 2) as i64) & MASK_21,
        ((load_4(&data[7..]) >> 7) as i64) & MASK_21,
        ((load_4(&data[10..]) >> 4) as i64) & MASK_21,
        ((load_3(&data[13..]) >> 1) as i64) & MASK_21,
        ((load_4(&data[15..]) >> 6) as i64) & MASK_21,
        ((load_3(&data[18..]) >> 3) as i64) & MASK_21,
        (load_3(&data[21..]) as i64) & MASK_21,
        ((load_4(&data[23..]) >> 5) as i64) & MASK_21,
        ((load_3(&data[26..]) >> 2) as i64) & MASK_21,
        (load_4(&data[28..]) >> 7) as i64,
    ]
}

/// Splits 64 bytes into twenty-four 21-bit limbs.
fn load_wide(data: &[u8; 64]) -> [i64; 24] {
    [
        (load_3(&data[0..]) as i64) & MASK_21,
        ((load_4(&data[2..]) >> 5) as i64) & MASK_21,
        ((load_3(&data[5..]) >> 2) as i64) & MASK_21,
        ((load_4(&data[7..]) >> 7) as i64) & MASK_21,
        ((load_4(&data[10..]) >> 4) as i64) & MASK_21,
        ((load_3(&data[13..]) >> 1) as i64) & MASK_21,
        ((load_4(&data[15..]) >> 6) as i64) & MASK_21,
        ((load_3(&data[18..]) >> 3) as i64) & MASK_21,
        (load_3(&data[21..]) as i64) & MASK_21,
        ((load_4(&data[23..]) >> 5) as i64) & MASK_21,
        ((load_3(&data[26..]) >> 2) as i64) & MASK_21,
        ((load_4(&data[28..]) >> 7) as i64) & MASK_21,
        ((load_4(&data[31..]) >> 4) as i64) & MASK_21,
        ((load_3(&data[34..]) >> 1) as i64) & MASK_21,
        ((load_4(&data[36..]) >> 6) as i64) & MASK_21,
        ((load_3(&data[39..]) >> 3) as i64) & MASK_21,
        (load_3(&data[42..]) as i64) & MASK_21,
        ((load_4(&data[44..]) >> 5) as i64) & MASK_21,
        ((load_3(&data[47..]) >> 2) as i64) & MASK_21,
        ((load_4(&data[49..]) >> 7) as i64) & MASK_21,
        ((load_4(&data[52..]) >> 4) as i64) & MASK_21,
        ((load_3(&data[55..]) >> 1) as i64) & MASK_21,
        ((load_4(&data[57..]) >> 6) as i64) & MASK_21,
        (load_4(&data[60..]) >> 3) as i64,
    ]
}

/// Folds limb `i` down twelve positions using `2^252 = FOLD (mod L)`.
fn fold_limb(s: &mut [i64; 24], i: usize) {
    let v = s[i];
    for (j, &coeff) in FOLD.iter().enumerate() {
        s[i - 12 + j] += v * coeff;
    }
    s[i] = 0;
}

/// Balanced carry pass: each listed limb sheds its overflow upward while
/// staying centred around zero.
fn carry_rounded(s: &mut [i64; 24], indices: &[usize]) {
    for &i in indices {
        let carry = (s[i] + (1 << 20)) >> 21;
        s[i + 1] += carry;
        s[i] -= carry << 21;
    }
}

/// Sequential floor-division carry over limbs `0..=last`, leaving each in
/// `[0, 2^21)`.
fn carry_floor(s: &mut [i64; 24], last: usize) {
    for i in 0..=last {
        let carry = s[i] >> 21;
        s[i + 1] += carry;
        s[i] -= carry << 21;
    }
}

/// Reduces a 24-limb accumulator modulo L and packs the canonical result.
///
/// The schedule alternates folding of the high limbs with carry passes so
/// no limb outgrows an `i64`. The two trailing fold/carry rounds mop up the
/// overflow that the first full carry pass pushes back into limb 12.
fn reduce_and_pack(s: &mut [i64; 24]) -> [u8; 32] {
    for i in (18..=23).rev() {
        fold_limb(s, i);
    }
    carry_rounded(s, &[6, 8, 10, 12, 14, 16]);
    carry_rounded(s, &[7, 9, 11, 13, 15]);

    for i in (12..=17).rev() {
        fold_limb(s, i);
    }
    carry_rounded(s, &[0, 2, 4, 6, 8, 10]);
    carry_rounded(s, &[1, 3, 5, 7, 9, 11]);

    fold_limb(s, 12);
    carry_floor(s, 11);
    fold_limb(s, 12);
    carry_floor(s, 10);

    let mut out = [0u8; 32];
    let mut acc: u64 = 0;
    let mut acc_bits: u32 = 0;
    let mut next_byte = 0usize;
    for &limb in s.iter().take(12) {
        acc |= (limb as u64) << acc_bits;
        acc_bits += 21;
        while acc_bits >= 8 {
            out[next_byte] = acc as u8;
            acc >>= 8;
            acc_bits -= 8;
            next_byte += 1;
        }
    }
    out[next_byte] = acc as u8;

    out
}

/// An element of the scalar ring Z/LZ, canonically encoded as 32
/// little-endian bytes.
///
/// Construction performs no implicit reduction or clamping; the functions
/// that produce scalars state which invariant they establish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Scalar(pub(crate) [u8; 32]);

impl Scalar {
    pub(crate) const ZERO: Self = Scalar([0; 32]);

    pub(crate) const ONE: Self = Scalar([
        1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0,
    ]);

    /// Wraps 32 little-endian bytes without validation.
    pub(crate) const fn from_bytes(bytes: &[u8; 32]) -> Self {
        Scalar(*bytes)
    }

    pub(crate) const fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Reduces a 512-bit little-endian integer modulo L.
    ///
    /// This is the path every hash-derived scalar takes, so the result is
    /// always canonical. Constant-time in the input value.
    pub(crate) fn reduce_wide(wide: &[u8; 64]) -> Self {
        let mut s = load_wide(wide);
        Scalar(reduce_and_pack(&mut s))
    }

    /// Computes `a * b + c (mod L)`.
    ///
    /// The workhorse of the ring: signing uses it for `r + k * a`, batch
    /// verification for the weighted scalar sums. Inputs need not be
    /// reduced; the output always is. Constant-time.
    pub(crate) fn mul_add(a: &Scalar, b: &Scalar, c: &Scalar) -> Self {
        let a = load_limbs(&a.0);
        let b = load_limbs(&b.0);
        let c = load_limbs(&c.0);

        let mut s = [0i64; 24];
        s[..12].copy_from_slice(&c);
        for i in 0..12 {
            for j in 0..12 {
                s[i + j] += a[i] * b[j];
            }
        }

        carry_rounded(
            &mut s,
            &[0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22],
        );
        carry_rounded(&mut s, &[1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21]);

        Scalar(reduce_and_pack(&mut s))
    }

    /// Computes `a * b (mod L)`.
    pub(crate) fn mul(a: &Scalar, b: &Scalar) -> Self {
        Self::mul_add(a, b, &Scalar::ZERO)
    }

    /// Computes `a + b (mod L)`.
    pub(crate) fn add(a: &Scalar, b: &Scalar) -> Self {
        Self::mul_add(a, &Scalar::ONE, b)
    }

    /// Recodes the scalar as 64 signed radix-16 digits in `[-8, 7]`.
    ///
    /// Digit `i` carries weight `16^i`. The carry that normalises the top
    /// nibble may leave digit 63 equal to 8; the fixed-base table covers
    /// multiples up to eight for exactly this reason.
    pub(crate) fn window4(&self) -> [i8; 64] {
        let mut e = [0i8; 64];
        for (i, &byte) in self.0.iter().enumerate() {
            e[2 * i] = (byte & 15) as i8;
            e[2 * i + 1] = (byte >> 4) as i8;
        }

        let mut carry = 0i8;
        for digit in e.iter_mut().take(63) {
            *digit += carry;
            carry = (*digit + 8) >> 4;
            *digit -= carry << 4;
        }
        e[63] += carry;

        e
    }

    /// Recodes the scalar as 256 signed sliding-window digits.
    ///
    /// Non-zero digits are odd with magnitude at most `2^(width - 1) - 1`,
    /// so a table of `2^(width - 2)` odd multiples indexed by `digit / 2`
    /// covers them. The greedy merge walks the bits from the bottom,
    /// absorbing nearby set bits into the current digit and pushing a borrow
    /// upward when subtraction keeps the digit in range.
    ///
    /// Variable-time; only verification-side scalars come through here.
    pub(crate) fn slide(&self, width: u32) -> [i8; 256] {
        let bound: i32 = (1 << (width - 1)) - 1;
        let lookahead = (width + 1) as usize;

        let mut r = [0i8; 256];
        for (i, digit) in r.iter_mut().enumerate() {
            *digit = ((self.0[i >> 3] >> (i & 7)) & 1) as i8;
        }

        for i in 0..256 {
            if r[i] == 0 {
                continue;
            }
            let mut b = 1;
            while b <= lookahead && i + b < 256 {
                if r[i + b] != 0 {
                    let merged = (r[i + b] as i32) << b;
                    let digit = r[i] as i32;
                    if digit + merged <= bound {
                        r[i] = (digit + merged) as i8;
                        r[i + b] = 0;
                    } else if digit - merged >= -bound {
                        r[i] = (digit - merged) as i8;
                        for v in r.iter_mut().skip(i + b) {
                            if *v == 0 {
                                *v = 1;
                                break;
                            }
                            *v = 0;
                        }
                    } else {
                        break;
                    }
                }
                b += 1;
            }
        }

        r
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Little-endian encoding of the group order L.
    const GROUP_ORDER: [u8; 32] = [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7,
        0xa2, 0xde, 0xf9, 0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
    ];

    fn random_scalar(rng: &mut StdRng) -> Scalar {
        let mut wide = [0u8; 64];
        rng.fill_bytes(&mut wide);
        Scalar::reduce_wide(&wide)
    }

    fn small(n: u8) -> Scalar {
        let mut bytes = [0u8; 32];
        bytes[0] = n;
        Scalar::from_bytes(&bytes)
    }

    #[test]
    fn group_order_reduces_to_zero() {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&GROUP_ORDER);
        assert_eq!(Scalar::reduce_wide(&wide), Scalar::ZERO);

        // L + 1 reduces to 1.
        wide[0] += 1;
        assert_eq!(Scalar::reduce_wide(&wide), Scalar::ONE);
    }

    #[test]
    fn reduction_fixes_values_below_order() {
        let mut rng = StdRng::seed_from_u64(0x6a09_e667);
        for _ in 0..64 {
            let a = random_scalar(&mut rng);
            let mut wide = [0u8; 64];
            wide[..32].copy_from_slice(&a.0);
            assert_eq!(Scalar::reduce_wide(&wide), a);
        }
    }

    #[test]
    fn small_mul_add() {
        assert_eq!(Scalar::mul_add(&small(2), &small(3), &small(4)), small(10));
        assert_eq!(Scalar::mul(&small(7), &small(9)), small(63));
        assert_eq!(Scalar::add(&small(200), &small(100)), {
            let mut bytes = [0u8; 32];
            bytes[0] = 0x2c;
            bytes[1] = 0x01;
            Scalar::from_bytes(&bytes)
        });
    }

    #[test]
    fn ring_identities() {
        let mut rng = StdRng::seed_from_u64(0xbb67_ae85);
        for _ in 0..32 {
            let a = random_scalar(&mut rng);
            let b = random_scalar(&mut rng);
            assert_eq!(Scalar::mul(&a, &Scalar::ONE), a);
            assert_eq!(Scalar::add(&a, &Scalar::ZERO), a);
            assert_eq!(Scalar::mul(&a, &b), Scalar::mul(&b, &a));
            assert_eq!(Scalar::add(&a, &b), Scalar::add(&b, &a));
        }
    }

    /// Rebuilds the scalar value from signed digits with the given bit
    /// weight per digit and checks it against the original bytes.
    fn assert_recoding_sums(digits: &[i8], bits_per_digit: usize, expected: &[u8; 32]) {
        let mut bytes = [0i32; 33];
        for (i, &d) in digits.iter().enumerate() {
            let bit = i * bits_per_digit;
            bytes[bit / 8] += (d as i32) << (bit % 8);
        }
        let mut carry = 0i32;
        for b in bytes.iter_mut() {
            *b += carry;
            carry = *b >> 8;
            *b &= 0xff;
        }
        assert_eq!(carry, 0);
        assert_eq!(bytes[32], 0);
        for (i, &b) in expected.iter().enumerate() {
            assert_eq!(bytes[i], b as i32, "byte {i} mismatch");
        }
    }

    #[test]
    fn window4_preserves_value() {
        let mut rng = StdRng::seed_from_u64(0x3c6e_f372);
        for _ in 0..64 {
            let a = random_scalar(&mut rng);
            let digits = a.window4();
            for &d in &digits {
                assert!((-8..=8).contains(&d));
            }
            assert_recoding_sums(&digits, 4, &a.0);
        }
    }

    #[test]
    fn sliding_window_preserves_value() {
        let mut rng = StdRng::seed_from_u64(0xa54f_f53a);
        for width in [5u32, 6, 7] {
            let bound = (1i8 << (width - 1)) - 1;
            for _ in 0..32 {
                let a = random_scalar(&mut rng);
                let digits = a.slide(width);
                for &d in &digits {
                    assert!(d.abs() <= bound);
                    if d != 0 {
                        assert_eq!(d & 1, 1, "digit {d} must be odd");
                    }
                }
                assert_recoding_sums(&digits, 1, &a.0);
            }
        }
    }
}
