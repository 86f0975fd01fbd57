//! Failure taxonomy for signature verification.

use thiserror::Error;

/// Everything that can go wrong while checking a signature.
///
/// All failures are reported by value; nothing in the library panics on
/// malformed input. Signing and key derivation are total functions and
/// have no error cases.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The S component of the signature has one of its top three bits set,
    /// placing it outside `[0, 2^253)`. Rejected before any curve work.
    #[error("signature scalar out of range")]
    InvalidScalar,

    /// The public key bytes do not decode to a point on the curve.
    #[error("public key is not a valid curve point")]
    InvalidPoint,

    /// The recomputed commitment does not match the R component.
    #[error("signature verification failed")]
    InvalidSignature,
}
