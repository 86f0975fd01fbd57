//! Ed25519 digital signatures over the Edwards form of Curve25519.
//!
//! This crate implements the EdDSA signature scheme on the twisted Edwards
//! curve birationally equivalent to Curve25519, from the field arithmetic
//! up. The public surface is deliberately small:
//!
//! - [`publickey`] derives the 32-byte public key from a 32-byte secret,
//! - [`sign`] produces a deterministic 64-byte `R || S` signature,
//! - [`open`] checks a single signature,
//! - [`open_batch`] amortises many checks into one multi-scalar equation,
//! - [`curve25519::scalarmult_basepoint`] exposes the shared base-point
//!   multiplication in Montgomery u-coordinates.
//!
//! # Module overview
//!
//! - `field`
//!   The GF(2^255 - 19) engine: ten-limb representation, multiplication
//!   with deferred reduction, fixed inversion and square-root exponent
//!   chains, canonical 32-byte encoding.
//!
//! - `scalar`
//!   The ring Z/LZ for the group order L: 512-bit reduction for
//!   hash-derived scalars, fused multiply-add, and the two signed digit
//!   recodings the multiplication strategies consume.
//!
//! - `group`
//!   Edwards points in four coordinate forms with explicit conversions,
//!   point compression and decompression, the precomputed tables (built by
//!   const evaluation into read-only statics), constant-time fixed-base
//!   multiplication, and the variable-time double-scalar path that only
//!   verification touches.
//!
//! - `batch`
//!   Random-weight aggregation of many verification equations and the
//!   heap-driven multi-scalar multiplication that evaluates them.
//!
//! # Security posture
//!
//! Key derivation and signing are constant-time with respect to all secret
//! material: no secret-dependent branches, no secret-indexed table loads,
//! and secrets are zeroised before the functions return. Verification is
//! variable-time, which is sound because every input it sees is public.
//! Side channels beyond timing (power, EM) are out of scope.
//!
//! The library holds no global mutable state; every function is re-entrant
//! and may be called from any number of threads concurrently.

mod batch;
mod eddsa;
mod errors;
mod field;
mod group;
mod scalar;

pub mod curve25519;

pub use batch::open_batch;
pub use eddsa::{open, publickey, sign};
pub use errors::Error;
