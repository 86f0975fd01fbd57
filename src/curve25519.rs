//! Curve25519 base-point scalar multiplication.
//!
//! The Montgomery curve `v^2 = u^3 + 486662 u^2 + u` is birationally
//! equivalent to the Edwards curve this crate works on, with
//! `u = (1 + y) / (1 - y)`. Multiplying the shared base point by a clamped
//! scalar can therefore reuse the constant-time fixed-base Edwards
//! machinery and convert the result at the end, instead of running a
//! Montgomery ladder.
//!
//! Only the base-point operation is provided; general Diffie-Hellman
//! against arbitrary public keys is out of scope here.

use zeroize::Zeroize;

use crate::group::mul::scalarmult_base;
use crate::scalar::Scalar;

/// Computes the Curve25519 u-coordinate of `[n] * B` for a clamped `n`.
pub fn scalarmult_basepoint(n: &[u8; 32]) -> [u8; 32] {
    let mut e = *n;
    e[0] &= 248;
    e[31] &= 127;
    e[31] |= 64;

    let mut s = Scalar::from_bytes(&e);
    let p = scalarmult_base(&s);

    // u = (Z + Y) / (Z - Y), the projective form of (1 + y) / (1 - y).
    let u = p.z.add(&p.y).mul(&p.z.sub(&p.y).invert());

    e.zeroize();
    s.zeroize();

    u.to_bytes()
}
