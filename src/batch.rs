//! Batch signature verification.
//!
//! Checking `n` signatures one by one costs `n` double-scalar
//! multiplications. Batching rewrites the `n` equations
//! `[s_i]B = R_i + [k_i]A_i` as a single multi-scalar equation
//!
//! ```text
//! [sum(z_i * s_i)]B + sum([z_i](-R_i)) + sum([z_i * k_i](-A_i)) = O
//! ```
//!
//! where each `z_i` is an independent 128-bit random weight drawn for this
//! batch alone. A forged signature survives the aggregate check only if it
//! hits a relation among the random weights, which happens with
//! probability below `2^-125`.
//!
//! The multi-scalar multiplication itself runs the Bos-Coster reduction: a
//! max-heap keyed on scalar magnitude repeatedly replaces the largest
//! scalar `a` (on point P) and the runner-up `b` (on point Q) with `a - b`
//! on P and `b` on P + Q, shrinking the scalars toward zero while the
//! weighted sum stays fixed. Once a single entry remains its small
//! residual scalar is applied by plain double-and-add.
//!
//! On any failure the batch falls back to verifying every slot
//! individually so the caller learns exactly which indices are bad.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand_core::{CryptoRng, RngCore};

use crate::eddsa::{challenge, open};
use crate::group::table::BASEPOINT;
use crate::group::Extended;
use crate::scalar::Scalar;

/// A pending multi-scalar term. Orders by scalar magnitude so the heap
/// always surfaces the two largest coefficients.
#[derive(Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    scalar: [u64; 4],
    index: usize,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        for k in (0..4).rev() {
            match self.scalar[k].cmp(&other.scalar[k]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.index.cmp(&other.index)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn scalar_words(s: &Scalar) -> [u64; 4] {
    let bytes = s.to_bytes();
    let mut words = [0u64; 4];
    for (k, word) in words.iter_mut().enumerate() {
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(&bytes[8 * k..8 * k + 8]);
        *word = u64::from_le_bytes(chunk);
    }
    words
}

fn words_is_zero(w: &[u64; 4]) -> bool {
    w.iter().all(|&x| x == 0)
}

/// `a - b` for `a >= b`.
fn words_sub(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let mut out = [0u64; 4];
    let mut borrow = 0u64;
    for k in 0..4 {
        let (d, underflow) = a[k].overflowing_sub(b[k]);
        let (d, chained) = d.overflowing_sub(borrow);
        out[k] = d;
        borrow = (underflow | chained) as u64;
    }
    out
}

fn highest_bit(w: &[u64; 4]) -> Option<usize> {
    for k in (0..4).rev() {
        if w[k] != 0 {
            return Some(64 * k + 63 - w[k].leading_zeros() as usize);
        }
    }
    None
}

fn bit(w: &[u64; 4], i: usize) -> bool {
    (w[i / 64] >> (i % 64)) & 1 == 1
}

/// Plain double-and-add for the residual scalar of the last heap entry.
fn scalarmult_vartime(point: &Extended, words: &[u64; 4]) -> Extended {
    let Some(top) = highest_bit(words) else {
        return Extended::IDENTITY;
    };
    let mut r = *point;
    for i in (0..top).rev() {
        r = r.double().to_extended();
        if bit(words, i) {
            r = r.add(point);
        }
    }
    r
}

/// Evaluates `sum([scalars_i] * points_i)` with the Bos-Coster reduction.
fn multi_scalarmult_vartime(scalars: Vec<Scalar>, mut points: Vec<Extended>) -> Extended {
    let mut heap = BinaryHeap::with_capacity(scalars.len());
    for (index, s) in scalars.iter().enumerate() {
        let words = scalar_words(s);
        if !words_is_zero(&words) {
            heap.push(HeapEntry { scalar: words, index });
        }
    }

    loop {
        let Some(largest) = heap.pop() else {
            return Extended::IDENTITY;
        };
        let Some(second) = heap.pop() else {
            return scalarmult_vartime(&points[largest.index], &largest.scalar);
        };

        // a*P + b*Q = (a - b)*P + b*(P + Q)
        let difference = words_sub(&largest.scalar, &second.scalar);
        let merged = points[second.index].add(&points[largest.index]);
        points[second.index] = merged;

        heap.push(second);
        if !words_is_zero(&difference) {
            heap.push(HeapEntry {
                scalar: difference,
                index: largest.index,
            });
        }
    }
}

/// Verifies a batch of signatures at once.
///
/// Returns the overall verdict and one flag per slot. On success every
/// flag is true and no individual verification ran. On failure, whether
/// from a malformed slot or from the aggregate equation, each slot is
/// re-verified on its own to locate the bad indices.
///
/// The random weights are drawn from `rng` once per batch; the caller
/// owns the generator and its thread-safety.
///
/// # Panics
///
/// Panics if the three slices differ in length.
pub fn open_batch<R: RngCore + CryptoRng>(
    messages: &[&[u8]],
    public_keys: &[[u8; 32]],
    signatures: &[[u8; 64]],
    rng: &mut R,
) -> (bool, Vec<bool>) {
    assert_eq!(messages.len(), public_keys.len());
    assert_eq!(messages.len(), signatures.len());

    let n = messages.len();
    let mut valid = vec![true; n];

    let mut scalars = Vec::with_capacity(2 * n + 1);
    let mut points = Vec::with_capacity(2 * n + 1);
    let mut weighted_s = Scalar::ZERO;
    let mut decoded = true;

    for i in 0..n {
        let signature = &signatures[i];
        if signature[63] & 224 != 0 {
            valid[i] = false;
            decoded = false;
            continue;
        }

        let mut r_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&signature[..32]);
        let (Some(neg_r), Some(neg_a)) = (
            Extended::from_bytes_negate_vartime(&r_bytes),
            Extended::from_bytes_negate_vartime(&public_keys[i]),
        ) else {
            valid[i] = false;
            decoded = false;
            continue;
        };

        // 128-bit random weight, zero-extended into the scalar ring.
        let mut z_bytes = [0u8; 32];
        rng.fill_bytes(&mut z_bytes[..16]);
        let z = Scalar::from_bytes(&z_bytes);

        let mut s_bytes = [0u8; 32];
        s_bytes.copy_from_slice(&signature[32..]);
        let s = Scalar::from_bytes(&s_bytes);
        weighted_s = Scalar::add(&weighted_s, &Scalar::mul(&z, &s));

        let k = challenge(&signature[..32], &public_keys[i], messages[i]);

        scalars.push(z);
        points.push(neg_r);
        scalars.push(Scalar::mul(&z, &k));
        points.push(neg_a);
    }

    let mut batch_ok = decoded;
    if batch_ok {
        scalars.push(weighted_s);
        points.push(BASEPOINT);
        let aggregate = multi_scalarmult_vartime(scalars, points);
        batch_ok = aggregate.to_bytes() == Extended::IDENTITY.to_bytes();
    }

    if batch_ok {
        return (true, valid);
    }

    for i in 0..n {
        valid[i] = open(messages[i], &public_keys[i], &signatures[i]).is_ok();
    }
    (false, valid)
}
