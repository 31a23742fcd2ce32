//! Signatures over the embedded Edwards curve with the MiMC challenge hash.
//!
//! The scheme follows the usual EdDSA shape — deterministic nonce, point
//! `R`, scalar response `S` — but computes the challenge with the same
//! SNARK-friendly MiMC sponge the binding circuit replays, so signature
//! validity can be asserted inside a proof.  Verification clears the
//! cofactor, matching the in-circuit identity check.

use crate::error::SealError;
use crate::mimc::hash_fields;
use crate::pedersen::{digest_scalar, edwards_from_bytes, edwards_to_bytes};
use ark_bn254::Fr;
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective, Fr as EdFr};
use ark_ff::{BigInteger, PrimeField};
use blake2::{Blake2b512, Digest};
use rand::{CryptoRng, RngCore};

/// Length of an encoded signature: compressed `R` plus big-endian `S`.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of an encoded public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Signing key material: secret scalar, nonce prefix, cached public key.
#[derive(Debug, Clone)]
pub struct SigningKey {
    secret: EdFr,
    prefix: [u8; 32],
    public: EdwardsAffine,
}

/// A signature `(R, S)` over a proof-field message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The nonce point.
    pub r: EdwardsAffine,
    /// The response scalar.
    pub s: EdFr,
}

impl SigningKey {
    /// Generates a fresh key from a cryptographically secure source.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Derives a key deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let expanded = Blake2b512::digest(seed);
        let secret = EdFr::from_le_bytes_mod_order(&expanded[..32]);
        let mut prefix = [0u8; 32];
        prefix.copy_from_slice(&expanded[32..]);
        let public = (EdwardsAffine::generator() * secret).into_affine();
        Self {
            secret,
            prefix,
            public,
        }
    }

    /// The public key for this signing key.
    pub fn public(&self) -> EdwardsAffine {
        self.public
    }

    /// Signs a proof-field message.
    pub fn sign(&self, message: &Fr) -> Signature {
        let message_bytes = message.into_bigint().to_bytes_be();
        let mut hasher = Blake2b512::new();
        hasher.update(self.prefix);
        hasher.update(&message_bytes);
        let nonce = EdFr::from_le_bytes_mod_order(&hasher.finalize());

        let r = (EdwardsAffine::generator() * nonce).into_affine();
        let challenge = challenge_scalar(&r, &self.public, message);
        let s = nonce + challenge * self.secret;
        Signature { r, s }
    }
}

/// The MiMC challenge over `(R, A, message)`, reduced into the scalar field.
pub fn challenge_scalar(r: &EdwardsAffine, public: &EdwardsAffine, message: &Fr) -> EdFr {
    let digest = hash_fields(&[r.x, r.y, public.x, public.y, *message]);
    digest_scalar(&digest)
}

/// Verifies a signature, clearing the cofactor as the circuit does.
pub fn verify(public: &EdwardsAffine, message: &Fr, signature: &Signature) -> bool {
    let challenge = challenge_scalar(&signature.r, public, message);
    let lhs: EdwardsProjective = EdwardsAffine::generator() * signature.s;
    let rhs = *public * challenge + signature.r;
    let mut gap = lhs - rhs;
    // Cofactor 8: three doublings.
    gap.double_in_place();
    gap.double_in_place();
    gap.double_in_place();
    gap.into_affine().is_zero()
}

/// Encodes a signature as compressed `R` followed by 32-byte big-endian `S`.
pub fn signature_to_bytes(signature: &Signature) -> Result<Vec<u8>, SealError> {
    let mut out = edwards_to_bytes(&signature.r)?;
    let s_raw = signature.s.into_bigint().to_bytes_be();
    let mut s_bytes = [0u8; 32];
    s_bytes[32 - s_raw.len()..].copy_from_slice(&s_raw);
    out.extend_from_slice(&s_bytes);
    Ok(out)
}

/// Decodes a signature from its 64-byte encoding.
pub fn signature_from_bytes(bytes: &[u8]) -> Result<Signature, SealError> {
    if bytes.len() != SIGNATURE_LENGTH {
        return Err(SealError::Decode(format!(
            "signature needs {SIGNATURE_LENGTH} bytes, got {}",
            bytes.len()
        )));
    }
    let r = edwards_from_bytes(&bytes[..32])?;
    let s = EdFr::from_be_bytes_mod_order(&bytes[32..]);
    Ok(Signature { r, s })
}

/// Encodes a public key in compressed form.
pub fn public_key_to_bytes(public: &EdwardsAffine) -> Result<Vec<u8>, SealError> {
    edwards_to_bytes(public)
}

/// Decodes a public key from compressed form.
pub fn public_key_from_bytes(bytes: &[u8]) -> Result<EdwardsAffine, SealError> {
    if bytes.len() != PUBLIC_KEY_LENGTH {
        return Err(SealError::Decode(format!(
            "public key needs {PUBLIC_KEY_LENGTH} bytes, got {}",
            bytes.len()
        )));
    }
    edwards_from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn sign_verify_roundtrip() {
        let mut rng = OsRng;
        let key = SigningKey::generate(&mut rng);
        let message = Fr::from(42u64);
        let signature = key.sign(&message);
        assert!(verify(&key.public(), &message, &signature));
    }

    #[test]
    fn wrong_key_rejected() {
        let mut rng = OsRng;
        let key = SigningKey::generate(&mut rng);
        let other = SigningKey::generate(&mut rng);
        let message = Fr::from(42u64);
        let signature = key.sign(&message);
        assert!(!verify(&other.public(), &message, &signature));
    }

    #[test]
    fn tampered_message_rejected() {
        let mut rng = OsRng;
        let key = SigningKey::generate(&mut rng);
        let signature = key.sign(&Fr::from(42u64));
        assert!(!verify(&key.public(), &Fr::from(43u64), &signature));
    }

    #[test]
    fn signature_bytes_roundtrip() {
        let key = SigningKey::from_seed(&[9u8; 32]);
        let signature = key.sign(&Fr::from(7u64));
        let bytes = signature_to_bytes(&signature).unwrap();
        assert_eq!(bytes.len(), SIGNATURE_LENGTH);
        assert_eq!(signature_from_bytes(&bytes).unwrap(), signature);

        let pk_bytes = public_key_to_bytes(&key.public()).unwrap();
        assert_eq!(pk_bytes.len(), PUBLIC_KEY_LENGTH);
        assert_eq!(public_key_from_bytes(&pk_bytes).unwrap(), key.public());
    }

    #[test]
    fn deterministic_from_seed() {
        let a = SigningKey::from_seed(&[1u8; 32]);
        let b = SigningKey::from_seed(&[1u8; 32]);
        let sig_a = a.sign(&Fr::from(5u64));
        let sig_b = b.sign(&Fr::from(5u64));
        assert_eq!(sig_a, sig_b);
    }
}
