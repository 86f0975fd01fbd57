//! Group operations on the twisted Edwards curve
//! `-x^2 + y^2 = 1 + d x^2 y^2` over GF(2^255 - 19).
//!
//! Four point representations cooperate, each tuned for one role:
//!
//! - [`Extended`]: `(X : Y : Z : T)` with `x = X/Z`, `y = Y/Z`,
//!   `T = XY/Z`. The full group element and the only form that can be
//!   encoded or decoded.
//! - [`Completed`]: `(X : Y : Z : T)` with `x = X/Z`, `y = Y/T`. The
//!   natural output of addition and doubling; one multiplication pass
//!   converts it back to [`Extended`] or [`Projective`].
//! - [`Projective`]: `(X : Y : Z)`. What remains of an extended point when
//!   the `T` coordinate is not needed, which is the common case between
//!   consecutive doublings.
//! - [`Niels`] and [`PNiels`]: precomputed forms `(y+x, y-x, 2dxy)`,
//!   affine and projective respectively. Additions against them need no
//!   inversion and fewer multiplications; tables store them.
//!
//! There is deliberately no unifying point trait. Each transition between
//! forms is a distinct function, so every scalar-multiplication loop states
//! exactly which coordinates it keeps alive.
//!
//! Everything except decoding is branch-free in the point data. Decoding is
//! variable-time and must only ever see public input; it returns the
//! negation of the encoded point so that verification can add where the
//! equation subtracts.

pub(crate) mod mul;
pub(crate) mod table;
pub(crate) mod vartime;

use subtle::{Choice, ConditionallySelectable};

use crate::field::FieldElement;
use self::table::{D, D2, SQRT_M1};

/// A point in extended coordinates, the full group element.
#[derive(Clone, Copy)]
pub(crate) struct Extended {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

/// The completed form produced by additions and doublings.
#[derive(Clone, Copy)]
pub(crate) struct Completed {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

/// A point without its `T` coordinate.
#[derive(Clone, Copy)]
pub(crate) struct Projective {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

/// Affine precomputed form `(y+x, y-x, 2dxy)`, implicit `Z = 1`.
#[derive(Clone, Copy)]
pub(crate) struct Niels {
    pub(crate) yplusx: FieldElement,
    pub(crate) yminusx: FieldElement,
    pub(crate) xy2d: FieldElement,
}

/// Projective precomputed form `((y+x)Z, (y-x)Z, Z, 2dxyZ)`.
#[derive(Clone, Copy)]
pub(crate) struct PNiels {
    pub(crate) yplusx: FieldElement,
    pub(crate) yminusx: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t2d: FieldElement,
}

impl Extended {
    /// The neutral element `(0, 1)`.
    pub(crate) const IDENTITY: Self = Extended {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    /// Doubles the point. The result drops through [`Completed`] so the
    /// caller decides which coordinates to rebuild.
    pub(crate) const fn double(&self) -> Completed {
        Projective::from_extended(self).double()
    }

    /// Full point addition by way of the cached form of `rhs`.
    pub(crate) const fn add(&self, rhs: &Extended) -> Extended {
        Completed::add(self, &PNiels::from_extended(rhs)).to_extended()
    }

    /// Encodes the point: 32 bytes of affine `y` with the parity of `x` in
    /// the top bit.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let recip = self.z.invert();
        let x = self.x.mul(&recip);
        let y = self.y.mul(&recip);
        let mut s = y.to_bytes();
        s[31] ^= (x.is_negative() as u8) << 7;
        s
    }

    /// Decodes a compressed point and returns its negation, or `None` when
    /// the 32 bytes name no curve point.
    ///
    /// The candidate `x` is recovered as `(u v^7)^((p-5)/8) * u v^3` for
    /// `u = y^2 - 1`, `v = d y^2 + 1`, which lands on a square root of
    /// `u / v` when one exists. If `x^2 v = -u` instead, multiplying by
    /// `sqrt(-1)` repairs it; anything else means the input is off the
    /// curve. The sign bit then picks the root, inverted, so the returned
    /// point is the negation of the encoded one.
    ///
    /// Variable-time. Must only be called on public input.
    pub(crate) fn from_bytes_negate_vartime(s: &[u8; 32]) -> Option<Extended> {
        let y = FieldElement::from_bytes(s);
        let z = FieldElement::ONE;
        let yy = y.square();
        let u = yy.sub(&z);
        let v = yy.mul(&D).add(&z);

        let v3 = v.square().mul(&v);
        let uv7 = v3.square().mul(&v).mul(&u);
        let mut x = uv7.pow22523().mul(&v3).mul(&u);

        let vxx = x.square().mul(&v);
        if vxx.sub(&u).is_nonzero() {
            if vxx.add(&u).is_nonzero() {
                return None;
            }
            x = x.mul(&SQRT_M1);
        }

        if x.is_negative() == ((s[31] >> 7) != 0) {
            x = x.neg();
        }

        let t = x.mul(&y);
        Some(Extended { x, y, z, t })
    }
}

impl Projective {
    pub(crate) const IDENTITY: Self = Projective {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
    };

    pub(crate) const fn from_extended(p: &Extended) -> Self {
        Projective {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }

    /// Point doubling.
    ///
    /// With `A = X^2`, `B = Y^2`, `C = 2Z^2` and `S = (X + Y)^2`, the
    /// completed result is `(S - A - B, B + A, B - A, C - (B - A))`,
    /// rearranged here to share intermediates.
    pub(crate) const fn double(&self) -> Completed {
        let xx = self.x.square();
        let yy = self.y.square();
        let zz2 = self.z.square2();
        let s = self.x.add(&self.y).square();
        let y = yy.add(&xx);
        let z = yy.sub(&xx);
        Completed {
            x: s.sub(&y),
            y,
            z,
            t: zz2.sub(&z),
        }
    }

    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let recip = self.z.invert();
        let x = self.x.mul(&recip);
        let y = self.y.mul(&recip);
        let mut s = y.to_bytes();
        s[31] ^= (x.is_negative() as u8) << 7;
        s
    }
}

impl Completed {
    /// Addition of an extended point and a projective cached point.
    pub(crate) const fn add(p: &Extended, q: &PNiels) -> Self {
        let a = p.y.add(&p.x).mul(&q.yplusx);
        let b = p.y.sub(&p.x).mul(&q.yminusx);
        let c = q.t2d.mul(&p.t);
        let zz = p.z.mul(&q.z);
        let d = zz.add(&zz);
        Completed {
            x: a.sub(&b),
            y: a.add(&b),
            z: d.add(&c),
            t: d.sub(&c),
        }
    }

    /// Subtraction of a projective cached point: the same formula with the
    /// `(y+x)` and `(y-x)` roles of `q` exchanged and the `2dxy` term
    /// flipped.
    pub(crate) const fn sub(p: &Extended, q: &PNiels) -> Self {
        let a = p.y.add(&p.x).mul(&q.yminusx);
        let b = p.y.sub(&p.x).mul(&q.yplusx);
        let c = q.t2d.mul(&p.t);
        let zz = p.z.mul(&q.z);
        let d = zz.add(&zz);
        Completed {
            x: a.sub(&b),
            y: a.add(&b),
            z: d.sub(&c),
            t: d.add(&c),
        }
    }

    /// Mixed addition of an affine cached point, saving the `Z`
    /// multiplication.
    pub(crate) const fn madd(p: &Extended, q: &Niels) -> Self {
        let a = p.y.add(&p.x).mul(&q.yplusx);
        let b = p.y.sub(&p.x).mul(&q.yminusx);
        let c = q.xy2d.mul(&p.t);
        let d = p.z.add(&p.z);
        Completed {
            x: a.sub(&b),
            y: a.add(&b),
            z: d.add(&c),
            t: d.sub(&c),
        }
    }

    /// Mixed subtraction of an affine cached point.
    pub(crate) const fn msub(p: &Extended, q: &Niels) -> Self {
        let a = p.y.add(&p.x).mul(&q.yminusx);
        let b = p.y.sub(&p.x).mul(&q.yplusx);
        let c = q.xy2d.mul(&p.t);
        let d = p.z.add(&p.z);
        Completed {
            x: a.sub(&b),
            y: a.add(&b),
            z: d.sub(&c),
            t: d.add(&c),
        }
    }

    /// Rebuilds the full extended point, four multiplications.
    pub(crate) const fn to_extended(&self) -> Extended {
        Extended {
            x: self.x.mul(&self.t),
            y: self.y.mul(&self.z),
            z: self.z.mul(&self.t),
            t: self.x.mul(&self.y),
        }
    }

    /// Rebuilds only `(X : Y : Z)`, three multiplications. Used between
    /// doublings where `T` would be dead weight.
    pub(crate) const fn to_projective(&self) -> Projective {
        Projective {
            x: self.x.mul(&self.t),
            y: self.y.mul(&self.z),
            z: self.z.mul(&self.t),
        }
    }
}

impl Niels {
    /// Neutral element in cached affine form: `y + x = y - x = 1`,
    /// `2dxy = 0`.
    pub(crate) const IDENTITY: Self = Niels {
        yplusx: FieldElement::ONE,
        yminusx: FieldElement::ONE,
        xy2d: FieldElement::ZERO,
    };
}

impl ConditionallySelectable for Niels {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Niels {
            yplusx: FieldElement::conditional_select(&a.yplusx, &b.yplusx, choice),
            yminusx: FieldElement::conditional_select(&a.yminusx, &b.yminusx, choice),
            xy2d: FieldElement::conditional_select(&a.xy2d, &b.xy2d, choice),
        }
    }
}

impl PNiels {
    pub(crate) const fn from_extended(p: &Extended) -> Self {
        PNiels {
            yplusx: p.y.add(&p.x),
            yminusx: p.y.sub(&p.x),
            z: p.z,
            t2d: p.t.mul(&D2),
        }
    }
}
