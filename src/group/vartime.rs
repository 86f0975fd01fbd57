//! Variable-time scalar multiplication for the verification side.
//!
//! Everything in this module branches on scalar digits and must therefore
//! only ever see public data: signature components, public keys, and hash
//! outputs derived from them. The signing and key-generation paths do not
//! import this module.

use crate::group::table::SLIDING;
use crate::group::{Completed, Extended, PNiels, Projective};
use crate::scalar::Scalar;

/// Window width for the variable point; 16 precomputed odd multiples.
const VAR_WINDOW: u32 = 6;
/// Window width for the base point; covered by the 32-entry static table.
const BASE_WINDOW: u32 = 7;

/// Computes `[a] * P + [b] * B`.
///
/// Both scalars are recoded into signed sliding-window digits. The odd
/// multiples `P, 3P, .., 31P` are cached in projective Niels form up
/// front; the base point multiples come from the static table. The main
/// loop doubles once per bit and adds only where a digit is non-zero,
/// keeping the accumulator in the cheapest representation that the next
/// step allows.
pub(crate) fn double_scalarmult(a: &Scalar, p: &Extended, b: &Scalar) -> Projective {
    let aslide = a.slide(VAR_WINDOW);
    let bslide = b.slide(BASE_WINDOW);

    // pre[i] = (2i + 1) * P
    let mut pre = [PNiels::from_extended(p); 16];
    let p2 = p.double().to_extended();
    for i in 1..16 {
        pre[i] =
            PNiels::from_extended(&Completed::add(&p2, &pre[i - 1]).to_extended());
    }

    let mut r = Projective::IDENTITY;
    let mut started = false;

    for i in (0..256).rev() {
        let da = aslide[i];
        let db = bslide[i];
        if !started && da == 0 && db == 0 {
            continue;
        }
        started = true;

        let mut t = r.double();

        if da > 0 {
            t = Completed::add(&t.to_extended(), &pre[(da / 2) as usize]);
        } else if da < 0 {
            t = Completed::sub(&t.to_extended(), &pre[(-da / 2) as usize]);
        }

        if db > 0 {
            t = Completed::madd(&t.to_extended(), &SLIDING[(db / 2) as usize]);
        } else if db < 0 {
            t = Completed::msub(&t.to_extended(), &SLIDING[(-db / 2) as usize]);
        }

        r = t.to_projective();
    }

    r
}
