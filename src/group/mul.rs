//! Constant-time fixed-base scalar multiplication `[s] * B`.
//!
//! The scalar is recoded into 64 signed radix-16 digits. Digit `2k + 1`
//! weighs `16 * 256^k` and digit `2k` weighs `256^k`, so one pass over the
//! odd positions, four doublings, and one pass over the even positions
//! cover the whole scalar while every table row is reused for two digits.
//!
//! Table lookups scan all eight row entries and keep the match with a
//! masked move, so neither the memory trace nor the instruction trace
//! depends on the digit. Negative digits negate the selected point with a
//! masked swap of the `(y+x, y-x)` pair and a masked sign flip of the
//! `2dxy` term.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::field::FieldElement;
use crate::group::table::BASE;
use crate::group::{Completed, Extended, Niels};
use crate::scalar::Scalar;

/// Selects `digit * 256^pos * B` from the table in constant time.
///
/// `digit` must lie in `[-8, 8]`, the range the radix-16 recoding
/// produces.
fn select(pos: usize, digit: i8) -> Niels {
    let negative = ((digit as u8) >> 7) & 1;
    // Fold the sign away: |digit| without a branch.
    let abs = (digit as i16 - (((-(negative as i16)) & (digit as i16)) << 1)) as u8;

    let mut t = Niels::IDENTITY;
    for (j, entry) in BASE[pos].iter().enumerate() {
        t.conditional_assign(entry, abs.ct_eq(&(j as u8 + 1)));
    }

    let negate = Choice::from(negative);
    FieldElement::conditional_swap(&mut t.yplusx, &mut t.yminusx, negate);
    let negated_xy2d = t.xy2d.neg();
    t.xy2d.conditional_assign(&negated_xy2d, negate);

    t
}

/// Computes `[s] * B` in constant time.
pub(crate) fn scalarmult_base(s: &Scalar) -> Extended {
    let digits = s.window4();

    let mut h = Extended::IDENTITY;
    for i in (1..64).step_by(2) {
        h = Completed::madd(&h, &select(i / 2, digits[i])).to_extended();
    }

    // Multiply the accumulator by 16 before folding in the even digits.
    let mut r = h.double().to_projective();
    r = r.double().to_projective();
    r = r.double().to_projective();
    h = r.double().to_extended();

    for i in (0..64).step_by(2) {
        h = Completed::madd(&h, &select(i / 2, digits[i])).to_extended();
    }

    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::table::{BASEPOINT, SLIDING};
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn random_scalar(rng: &mut StdRng) -> Scalar {
        let mut wide = [0u8; 64];
        rng.fill_bytes(&mut wide);
        Scalar::reduce_wide(&wide)
    }

    /// Bit-at-a-time double-and-add, the obviously correct reference.
    fn naive_scalarmult_base(s: &Scalar) -> Extended {
        let bytes = s.to_bytes();
        let mut r = Extended::IDENTITY;
        for i in (0..256).rev() {
            r = r.double().to_extended();
            if (bytes[i >> 3] >> (i & 7)) & 1 == 1 {
                // SLIDING[0] is B in affine cached form.
                r = Completed::madd(&r, &SLIDING[0]).to_extended();
            }
        }
        r
    }

    #[test]
    fn zero_scalar_gives_identity() {
        let h = scalarmult_base(&Scalar::ZERO);
        assert_eq!(h.to_bytes(), Extended::IDENTITY.to_bytes());
    }

    #[test]
    fn one_scalar_gives_basepoint() {
        let h = scalarmult_base(&Scalar::ONE);
        assert_eq!(h.to_bytes(), BASEPOINT.to_bytes());
    }

    #[test]
    fn select_handles_zero_and_signs() {
        let zero = select(0, 0);
        assert_eq!(zero.yplusx.to_bytes(), FieldElement::ONE.to_bytes());
        assert_eq!(zero.yminusx.to_bytes(), FieldElement::ONE.to_bytes());
        assert_eq!(zero.xy2d.to_bytes(), FieldElement::ZERO.to_bytes());

        let plus = select(3, 5);
        let minus = select(3, -5);
        assert_eq!(plus.yplusx.to_bytes(), minus.yminusx.to_bytes());
        assert_eq!(plus.yminusx.to_bytes(), minus.yplusx.to_bytes());
        assert_eq!(
            plus.xy2d.add(&minus.xy2d).to_bytes(),
            FieldElement::ZERO.to_bytes()
        );
    }

    #[test]
    fn matches_naive_double_and_add() {
        let mut rng = StdRng::seed_from_u64(0x510e_527f);
        for _ in 0..12 {
            let s = random_scalar(&mut rng);
            assert_eq!(
                scalarmult_base(&s).to_bytes(),
                naive_scalarmult_base(&s).to_bytes()
            );
        }
    }

    #[test]
    fn small_multiples_match_repeated_addition() {
        let mut acc = BASEPOINT;
        for n in 2u8..=20 {
            acc = acc.add(&BASEPOINT);
            let mut bytes = [0u8; 32];
            bytes[0] = n;
            let via_mult = scalarmult_base(&Scalar::from_bytes(&bytes));
            assert_eq!(via_mult.to_bytes(), acc.to_bytes(), "multiple {n}");
        }
    }
}
