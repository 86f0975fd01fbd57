//! The Ed25519 signature scheme: key derivation, signing, verification.
//!
//! The flow follows the scheme definition directly. A 32-byte secret key
//! is expanded through SHA-512 into a clamped scalar `a` and a 32-byte
//! prefix. Signing derives the nonce `r = H(prefix || m) mod L`, commits
//! to `R = [r]B`, and binds everything with the challenge
//! `k = H(R || A || m) mod L` into `S = r + k * a (mod L)`.
//!
//! Verification recomputes the challenge and checks
//! `[S]B = R + [k]A` by evaluating `[k](-A) + [S]B` with the
//! variable-time double-scalar strategy and comparing the packed result
//! against R with a constant-time byte comparison. Decoding the public key
//! already negates it, so no subtraction appears anywhere.
//!
//! The expanded secret, the clamped scalar and the nonce are wiped before
//! the functions return.

use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::errors::Error;
use crate::group::{Extended, mul, vartime};
use crate::scalar::Scalar;

/// Hashes the secret key and clamps the low half into scalar form:
/// the cofactor bits are cleared, the top bit is cleared, and bit 254 is
/// set.
fn expand_secret(secret_key: &[u8; 32]) -> [u8; 64] {
    let mut h = [0u8; 64];
    h.copy_from_slice(&Sha512::digest(secret_key));
    h[0] &= 248;
    h[31] &= 127;
    h[31] |= 64;
    h
}

/// The challenge scalar `H(R || A || m) mod L`.
pub(crate) fn challenge(r: &[u8], public_key: &[u8; 32], message: &[u8]) -> Scalar {
    let mut hasher = Sha512::new();
    hasher.update(r);
    hasher.update(public_key);
    hasher.update(message);
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&hasher.finalize());
    Scalar::reduce_wide(&wide)
}

/// Derives the public key for a 32-byte secret key.
pub fn publickey(secret_key: &[u8; 32]) -> [u8; 32] {
    let mut h = expand_secret(secret_key);
    let mut a_bytes = [0u8; 32];
    a_bytes.copy_from_slice(&h[..32]);
    let mut a = Scalar::from_bytes(&a_bytes);

    let pk = mul::scalarmult_base(&a).to_bytes();

    h.zeroize();
    a_bytes.zeroize();
    a.zeroize();

    pk
}

/// Signs a message, producing the 64-byte `R || S` signature.
///
/// Deterministic: the nonce is derived from the secret prefix and the
/// message, never from an RNG.
pub fn sign(message: &[u8], secret_key: &[u8; 32], public_key: &[u8; 32]) -> [u8; 64] {
    let mut h = expand_secret(secret_key);
    let mut a_bytes = [0u8; 32];
    a_bytes.copy_from_slice(&h[..32]);
    let mut a = Scalar::from_bytes(&a_bytes);

    // r = H(prefix || m) mod L
    let mut hasher = Sha512::new();
    hasher.update(&h[32..]);
    hasher.update(message);
    let mut r_wide = [0u8; 64];
    r_wide.copy_from_slice(&hasher.finalize());
    let mut r = Scalar::reduce_wide(&r_wide);

    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&mul::scalarmult_base(&r).to_bytes());

    let k = challenge(&signature[..32], public_key, message);
    let s = Scalar::mul_add(&k, &a, &r);
    signature[32..].copy_from_slice(&s.to_bytes());

    h.zeroize();
    a_bytes.zeroize();
    a.zeroize();
    r_wide.zeroize();
    r.zeroize();

    signature
}

/// Verifies a signature over a message for a public key.
///
/// Fails fast on a malformed S scalar or an off-curve public key; the
/// final R comparison runs over all 32 bytes regardless of where the first
/// difference sits.
pub fn open(message: &[u8], public_key: &[u8; 32], signature: &[u8; 64]) -> Result<(), Error> {
    if signature[63] & 224 != 0 {
        return Err(Error::InvalidScalar);
    }

    let neg_a = Extended::from_bytes_negate_vartime(public_key)
        .ok_or(Error::InvalidPoint)?;

    let k = challenge(&signature[..32], public_key, message);

    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&signature[32..]);
    let s = Scalar::from_bytes(&s_bytes);

    let check_r = vartime::double_scalarmult(&k, &neg_a, &s).to_bytes();

    if bool::from(check_r.as_slice().ct_eq(&signature[..32])) {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}
