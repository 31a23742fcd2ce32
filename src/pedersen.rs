//! Pedersen commitment to the signing digest, over the embedded Edwards
//! curve.
//!
//! Two independent generators are fixed for the lifetime of the process:
//! the curve's canonical subgroup generator `G`, and a nothing-up-my-sleeve
//! point `H` derived by seeded try-and-increment hashing with cofactor
//! clearing, so nobody knows `log_G(H)`.  The digest itself is the MiMC
//! hash of the column hash, the dataset-commitment x-coordinate and the
//! metadata hash; the Pedersen commitment to that digest is the quantity
//! that ultimately gets signed.

use crate::commit::Commitment;
use crate::curve::x_bytes;
use crate::error::SealError;
use crate::mimc::hash_fields;
use ark_bn254::Fr;
use ark_ec::twisted_edwards::TECurveConfig;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsConfig, Fr as EdFr};
use ark_ff::{BigInteger, Field, PrimeField, UniformRand};
use once_cell::sync::Lazy;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

/// The curve's canonical prime-order generator.
pub static PEDERSEN_G: Lazy<EdwardsAffine> = Lazy::new(EdwardsAffine::generator);

/// Independent generator with unknown discrete logarithm.
pub static PEDERSEN_H: Lazy<EdwardsAffine> =
    Lazy::new(|| derive_generator(b"share_seal/pedersen/h"));

fn edwards_from_y(y: ark_ed_on_bn254::Fq) -> Option<EdwardsAffine> {
    // a*x^2 + y^2 = 1 + d*x^2*y^2  =>  x^2 = (1 - y^2) / (a - d*y^2)
    let y2 = y * y;
    let denom = EdwardsConfig::COEFF_A - EdwardsConfig::COEFF_D * y2;
    let x2 = (ark_ed_on_bn254::Fq::ONE - y2) * denom.inverse()?;
    let x = x2.sqrt()?;
    let point = EdwardsAffine::new_unchecked(x, y);
    point.is_on_curve().then_some(point)
}

/// Deterministically derives a subgroup point nobody knows the discrete
/// logarithm of.
pub fn derive_generator(seed: &[u8]) -> EdwardsAffine {
    let mut counter = [0u8; 32];
    let take = seed.len().min(32);
    counter[..take].copy_from_slice(&seed[..take]);
    loop {
        let digest = Sha256::digest(counter);
        let y = ark_ed_on_bn254::Fq::from_be_bytes_mod_order(&digest);
        if let Some(point) = edwards_from_y(y) {
            let cleared = point.mul_by_cofactor();
            if !cleared.is_zero() {
                return cleared;
            }
        }
        for byte in counter.iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                break;
            }
        }
    }
}

/// A Pedersen commitment `c = x*G + r*H` to a digest `x`.
///
/// The blinding is `None` in public views; redaction strips it before an
/// artifact leaves the signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedersenCommitment {
    /// Blinding scalar; present only on the signer's side.
    pub r: Option<EdFr>,
    /// The committed point.
    pub c: EdwardsAffine,
}

/// Embeds a proof-field digest into the Edwards scalar field.
pub fn digest_scalar(digest: &Fr) -> EdFr {
    EdFr::from_be_bytes_mod_order(&digest.into_bigint().to_bytes_be())
}

/// Commits to a digest under a caller-supplied blinding.
pub fn pedersen_commit_with_blinding(digest: &Fr, r: EdFr) -> PedersenCommitment {
    let c = *PEDERSEN_G * digest_scalar(digest) + *PEDERSEN_H * r;
    PedersenCommitment {
        r: Some(r),
        c: c.into_affine(),
    }
}

/// Commits to a digest, drawing the blinding when absent.
pub fn pedersen_commit<R: RngCore + CryptoRng>(
    digest: &Fr,
    blinding: Option<EdFr>,
    rng: &mut R,
) -> PedersenCommitment {
    let r = blinding.unwrap_or_else(|| EdFr::rand(rng));
    pedersen_commit_with_blinding(digest, r)
}

/// The three digest pieces bound by the signature: column hash, padded
/// dataset-commitment x-coordinate, metadata hash — each reduced into the
/// proof field big-endian.
pub fn digest_pieces(columns: &[String], commitment: &Commitment, metadata: &str) -> [Fr; 3] {
    let columns_hash = Sha256::digest(columns.join(",").as_bytes());
    let metadata_hash = Sha256::digest(metadata.as_bytes());
    [
        Fr::from_be_bytes_mod_order(&columns_hash),
        Fr::from_be_bytes_mod_order(&x_bytes(commitment)),
        Fr::from_be_bytes_mod_order(&metadata_hash),
    ]
}

/// MiMC-hashes the digest pieces and Pedersen-commits to the result.
pub fn commit_digest<R: RngCore + CryptoRng>(
    pieces: &[Fr; 3],
    blinding: Option<EdFr>,
    rng: &mut R,
) -> PedersenCommitment {
    let digest = hash_fields(pieces);
    pedersen_commit(&digest, blinding, rng)
}

/// Recomputes a digest commitment under a stored blinding.
pub fn commit_digest_with_blinding(pieces: &[Fr; 3], r: EdFr) -> PedersenCommitment {
    pedersen_commit_with_blinding(&hash_fields(pieces), r)
}

/// The x-coordinate of the committed point, the value that gets signed.
pub fn committed_x(commitment: &PedersenCommitment) -> Fr {
    commitment.c.x
}

/// Serializes an Edwards point into its 32-byte compressed form.
pub fn edwards_to_bytes(point: &EdwardsAffine) -> Result<Vec<u8>, SealError> {
    use ark_serialize::CanonicalSerialize;
    let mut out = Vec::new();
    point
        .serialize_compressed(&mut out)
        .map_err(|err| SealError::Decode(err.to_string()))?;
    Ok(out)
}

/// Parses an Edwards point from its 32-byte compressed form.
pub fn edwards_from_bytes(bytes: &[u8]) -> Result<EdwardsAffine, SealError> {
    use ark_serialize::CanonicalDeserialize;
    EdwardsAffine::deserialize_compressed(bytes)
        .map_err(|err| SealError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn generators_are_independent_subgroup_points() {
        assert_ne!(*PEDERSEN_H, *PEDERSEN_G);
        assert!(!PEDERSEN_H.is_zero());
        assert!(PEDERSEN_H.is_on_curve());
        assert!(PEDERSEN_H.is_in_correct_subgroup_assuming_on_curve());
    }

    #[test]
    fn commit_deterministic_in_blinding() {
        let mut rng = OsRng;
        let digest = Fr::from(99u64);
        let r = EdFr::from(1234u64);
        let a = pedersen_commit(&digest, Some(r), &mut rng);
        let b = pedersen_commit(&digest, Some(r), &mut rng);
        assert_eq!(a.c, b.c);
    }

    #[test]
    fn commit_hides_and_binds() {
        let mut rng = OsRng;
        let digest = Fr::from(7u64);
        let a = pedersen_commit(&digest, Some(EdFr::from(1u64)), &mut rng);
        let b = pedersen_commit(&digest, Some(EdFr::from(2u64)), &mut rng);
        assert_ne!(a.c, b.c, "different blinding, different commitment");
        let c = pedersen_commit(&Fr::from(8u64), Some(EdFr::from(1u64)), &mut rng);
        assert_ne!(a.c, c.c, "different digest, different commitment");
    }

    #[test]
    fn edwards_bytes_roundtrip() {
        let bytes = edwards_to_bytes(&PEDERSEN_H).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(edwards_from_bytes(&bytes).unwrap(), *PEDERSEN_H);
    }

    #[test]
    fn digest_pieces_depend_on_all_inputs() {
        let commitment = crate::curve::hash_to_point(b"t");
        let cols = vec!["a".to_string(), "b".to_string()];
        let p1 = digest_pieces(&cols, &commitment, "meta");
        let p2 = digest_pieces(&cols, &commitment, "other");
        assert_eq!(p1[0], p2[0]);
        assert_eq!(p1[1], p2[1]);
        assert_ne!(p1[2], p2[2]);
    }
}
