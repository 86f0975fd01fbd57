//! Curve constants and the precomputed point tables.
//!
//! Nothing here is written down as magic limbs. The constants are derived
//! at compile time from their defining equations, and the tables are built
//! by const evaluation with the same group operations the runtime uses:
//!
//! - `d = -121665 / 121666` and `2d` straight from the curve definition,
//! - `sqrt(-1) = 2^((p-1)/4)`, using that 2 is a non-residue when
//!   `p = 5 (mod 8)`,
//! - the base point from `y = 4/5` with the even square root for `x`,
//! - 32 rows of eight affine multiples `(j+1) * 256^pos * B` feeding the
//!   fixed-base walk, and the 32 odd multiples `1B, 3B, .., 63B` feeding
//!   the sliding-window loop over the base point.
//!
//! Everything lands in immutable statics, so the roughly 10 KiB of table
//! data lives in read-only memory and is shared between threads without
//! ceremony.

use crate::field::FieldElement;
use crate::group::{Completed, Extended, Niels, PNiels};

/// Builds the field element with the small value `n`.
const fn fe_small(n: u32) -> FieldElement {
    let mut limbs = [0i32; 10];
    limbs[0] = n as i32;
    FieldElement(limbs)
}

const TWO: FieldElement = fe_small(2);

/// The curve constant `d = -121665 / 121666 (mod p)`.
pub(crate) const D: FieldElement = fe_small(121_665)
    .neg()
    .mul(&fe_small(121_666).invert());

/// `2d`, as it appears in the cached point forms.
pub(crate) const D2: FieldElement = D.add(&D);

/// A square root of `-1`: `2^((p-1)/4) = (2^(2^252 - 3))^2 * 2`.
pub(crate) const SQRT_M1: FieldElement = TWO.pow22523().square().mul(&TWO);

/// The standard base point, reconstructed from `y = 4/5`.
///
/// `x` is the even square root of `(y^2 - 1) / (d y^2 + 1)`, the same
/// computation point decoding performs, done once at compile time.
pub(crate) const BASEPOINT: Extended = basepoint();

const fn basepoint() -> Extended {
    let y = fe_small(4).mul(&fe_small(5).invert());
    let yy = y.square();
    let u = yy.sub(&FieldElement::ONE);
    let v = yy.mul(&D).add(&FieldElement::ONE);

    let v3 = v.square().mul(&v);
    let uv7 = v3.square().mul(&v).mul(&u);
    let mut x = uv7.pow22523().mul(&v3).mul(&u);

    let vxx = x.square().mul(&v);
    if vxx.sub(&u).is_nonzero() {
        x = x.mul(&SQRT_M1);
    }
    if x.is_negative() {
        x = x.neg();
    }

    Extended {
        x,
        y,
        z: FieldElement::ONE,
        t: x.mul(&y),
    }
}

/// Normalises an extended point into the affine cached form used by the
/// tables.
pub(crate) const fn to_affine_niels(p: &Extended) -> Niels {
    let recip = p.z.invert();
    let x = p.x.mul(&recip);
    let y = p.y.mul(&recip);
    Niels {
        yplusx: y.add(&x),
        yminusx: y.sub(&x),
        xy2d: x.mul(&y).mul(&D2),
    }
}

const fn mul_by_pow2(p: &Extended, k: u32) -> Extended {
    let mut r = *p;
    let mut i = 0;
    while i < k {
        r = r.double().to_extended();
        i += 1;
    }
    r
}

/// `BASE[pos][j]` holds `(j + 1) * 256^pos * B`.
///
/// The fixed-base multiplication splits a scalar into 64 radix-16 digits
/// and walks this table twice, once for the odd digit positions and once
/// for the even ones; each row therefore advances by a factor of 256.
#[allow(long_running_const_eval)]
pub(crate) static BASE: [[Niels; 8]; 32] = base_multiples();

const fn base_multiples() -> [[Niels; 8]; 32] {
    let mut table = [[Niels::IDENTITY; 8]; 32];
    let mut row_base = BASEPOINT;
    let mut pos = 0;
    while pos < 32 {
        let mut q = row_base;
        let mut j = 0;
        while j < 8 {
            table[pos][j] = to_affine_niels(&q);
            if j < 7 {
                q = Completed::add(&q, &PNiels::from_extended(&row_base))
                    .to_extended();
            }
            j += 1;
        }
        row_base = mul_by_pow2(&row_base, 8);
        pos += 1;
    }
    table
}

/// The odd multiples `1B, 3B, 5B, .., 63B` in affine cached form, indexed
/// by `digit / 2` for width-7 sliding-window digits.
pub(crate) static SLIDING: [Niels; 32] = sliding_multiples();

const fn sliding_multiples() -> [Niels; 32] {
    let mut table = [Niels::IDENTITY; 32];
    let b2 = BASEPOINT.double().to_extended();
    let mut q = BASEPOINT;
    let mut i = 0;
    while i < 32 {
        table[i] = to_affine_niels(&q);
        if i < 31 {
            q = Completed::add(&q, &PNiels::from_extended(&b2)).to_extended();
        }
        i += 1;
    }
    table
}
