//! Point and scalar helpers for the commitment curve (secp256r1).
//!
//! Dataset and share commitments live in the prime-order group of the
//! NIST P-256 curve.  Generators with unknown discrete logarithms are
//! derived by try-and-increment hashing: a counter buffer is hashed with
//! SHA-256 into an x-coordinate candidate until the curve equation admits a
//! square root.

use crate::error::SealError;
use ark_ec::short_weierstrass::SWCurveConfig;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, Field, PrimeField};
use ark_secp256r1::{Affine, Config, Fq, Fr, Projective};
use num_bigint::{BigInt, BigUint, Sign};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

/// Order of the commitment group as an arbitrary-precision integer.
pub static GROUP_ORDER: Lazy<BigInt> =
    Lazy::new(|| BigInt::from(BigUint::from(Fr::MODULUS)));

/// Converts a signed big integer into a group scalar modulo the order.
pub fn scalar_from_bigint(value: &BigInt) -> Fr {
    let reduced = value.magnitude() % GROUP_ORDER.magnitude();
    let scalar = Fr::from_be_bytes_mod_order(&reduced.to_bytes_be());
    if value.sign() == Sign::Minus {
        -scalar
    } else {
        scalar
    }
}

/// Converts a group scalar back into a non-negative big integer.
pub fn scalar_to_bigint(value: &Fr) -> BigInt {
    BigInt::from(BigUint::from(value.into_bigint()))
}

fn try_point(counter: &[u8; 32]) -> Option<Affine> {
    let digest = Sha256::digest(counter);
    let x = Fq::from_be_bytes_mod_order(&digest);
    let rhs = x * x * x + Config::COEFF_A * x + Config::COEFF_B;
    let y = rhs.sqrt()?;
    let point = Affine::new_unchecked(x, y);
    point.is_on_curve().then_some(point)
}

fn increment(counter: &mut [u8; 32]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Deterministically hashes a seed into a curve point.
///
/// Roughly half of all x candidates are valid, so the counter loop
/// terminates after a handful of iterations in expectation.
pub fn hash_to_point(seed: &[u8]) -> Affine {
    let mut counter = [0u8; 32];
    let take = seed.len().min(32);
    counter[..take].copy_from_slice(&seed[..take]);
    loop {
        if let Some(point) = try_point(&counter) {
            return point;
        }
        increment(&mut counter);
    }
}

/// The per-index generator used for the element at `index`.
pub fn index_generator(index: usize) -> Affine {
    hash_to_point(index.to_string().as_bytes())
}

fn coordinate_bytes(value: &Fq) -> [u8; 32] {
    let raw = value.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - raw.len()..].copy_from_slice(&raw);
    out
}

/// The point's x-coordinate padded big-endian to 32 bytes.
pub fn x_bytes(point: &Affine) -> [u8; 32] {
    match point.xy() {
        Some((x, _)) => coordinate_bytes(x),
        None => [0u8; 32],
    }
}

/// Encodes a point as 64 bytes of big-endian `x || y`.
///
/// The identity encodes as all zeroes; no curve point has x = y = 0.
pub fn point_to_bytes(point: &Affine) -> [u8; 64] {
    let mut out = [0u8; 64];
    if let Some((x, y)) = point.xy() {
        out[..32].copy_from_slice(&coordinate_bytes(x));
        out[32..].copy_from_slice(&coordinate_bytes(y));
    }
    out
}

/// Decodes a point from the 64-byte `x || y` encoding.
pub fn point_from_bytes(bytes: &[u8]) -> Result<Affine, SealError> {
    if bytes.len() != 64 {
        return Err(SealError::Decode(format!(
            "curve point needs 64 bytes, got {}",
            bytes.len()
        )));
    }
    if bytes.iter().all(|b| *b == 0) {
        return Ok(Affine::zero());
    }
    let x = Fq::from_be_bytes_mod_order(&bytes[..32]);
    let y = Fq::from_be_bytes_mod_order(&bytes[32..]);
    let point = Affine::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(SealError::Decode("point is not on the curve".into()));
    }
    Ok(point)
}

/// Hex form of [`point_to_bytes`], used in JSON artifacts.
pub fn point_to_hex(point: &Affine) -> String {
    hex::encode(point_to_bytes(point))
}

/// Parses a point from its hex encoding.
pub fn point_from_hex(input: &str) -> Result<Affine, SealError> {
    let bytes = hex::decode(input).map_err(|err| SealError::Decode(err.to_string()))?;
    point_from_bytes(&bytes)
}

/// Scalar multiplication of the group base point.
pub fn base_mul(scalar: Fr) -> Projective {
    Affine::generator() * scalar
}

/// Normalizes a projective accumulation into an affine commitment point.
pub fn to_affine(point: Projective) -> Affine {
    point.into_affine()
}
