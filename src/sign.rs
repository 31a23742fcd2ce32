//! The dataset signing protocol.
//!
//! The signer commits to the dataset in the commitment group, binds the
//! commitment into a MiMC digest, Pedersen-commits to the digest and signs
//! the committed point's x-coordinate.  The resulting bundle carries two
//! private blinding values — the dataset-commitment blinding and the
//! Pedersen blinding — which are transmitted once to the share holders and
//! stripped by [`SignatureBundle::redact`] before anything is published.

use crate::commit::{commit_dataset, commit_with_blinding, CommitKey, Commitment};
use crate::curve::{point_from_hex, point_to_hex};
use crate::eddsa::{
    public_key_from_bytes, public_key_to_bytes, signature_from_bytes, signature_to_bytes,
    SigningKey,
};
use crate::error::SealError;
use crate::pedersen::{
    commit_digest, commit_digest_with_blinding, committed_x, digest_pieces, edwards_from_bytes,
    edwards_to_bytes, PedersenCommitment,
};
use crate::sharing::DatasetVector;
use ark_ed_on_bn254::Fr as EdFr;
use ark_ff::{BigInteger, PrimeField};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use num_bigint::BigInt;
use rand::{CryptoRng, RngCore};

/// Everything the signer produces: signature, digest commitment, dataset
/// commitment, and the private blinding values.
#[derive(Debug, Clone)]
pub struct SignatureBundle {
    /// Encoded signature over the digest commitment's x-coordinate.
    pub sig: Vec<u8>,
    /// Pedersen commitment to the digest, blinding included.
    pub commit: PedersenCommitment,
    /// Homomorphic commitment to the dataset vector.
    pub commit_data: Commitment,
    /// Blinding of the dataset commitment; needed to derive extended
    /// shares, then redacted.
    pub r_data: Option<BigInt>,
    /// Encoded signer public key.
    pub pub_key: Vec<u8>,
}

/// The public view of a bundle: no blinding values at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicSignatureBundle {
    /// Encoded signature over the digest commitment's x-coordinate.
    pub sig: Vec<u8>,
    /// The committed digest point, without its blinding.
    pub commit_point: ark_ed_on_bn254::EdwardsAffine,
    /// Homomorphic commitment to the dataset vector.
    pub commit_data: Commitment,
    /// Encoded signer public key.
    pub pub_key: Vec<u8>,
}

impl SignatureBundle {
    /// One-way transition into the public view, dropping every blinding.
    pub fn redact(self) -> PublicSignatureBundle {
        PublicSignatureBundle {
            sig: self.sig,
            commit_point: self.commit.c,
            commit_data: self.commit_data,
            pub_key: self.pub_key,
        }
    }

    /// Serializes the full bundle, blinding values included, as one JSON
    /// line.  Only ever written to the private channel toward the share
    /// holders.
    pub fn to_json_string(&self) -> Result<String, SealError> {
        let r = match &self.commit.r {
            Some(r) => serde_json::Value::String(ed_scalar_to_hex(r)),
            None => serde_json::Value::Null,
        };
        let r_data = match &self.r_data {
            Some(r) => serde_json::Value::String(r.to_str_radix(10)),
            None => serde_json::Value::Null,
        };
        Ok(serde_json::json!({
            "sig": BASE64.encode(&self.sig),
            "commit": { "r": r, "c": hex::encode(edwards_to_bytes(&self.commit.c)?) },
            "commit_data": point_to_hex(&self.commit_data),
            "r_data": r_data,
            "pub_key": BASE64.encode(&self.pub_key),
        })
        .to_string())
    }

    /// Parses a bundle previously emitted by
    /// [`SignatureBundle::to_json_string`].
    pub fn from_json_str(input: &str) -> Result<Self, SealError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|err| SealError::Decode(err.to_string()))?;
        let sig = decode_base64_field(&value, "sig")?;
        let commit = value
            .get("commit")
            .ok_or_else(|| SealError::Decode("missing commit".into()))?;
        let r = match commit.get("r") {
            Some(serde_json::Value::String(hex)) => Some(ed_scalar_from_hex(hex)?),
            _ => None,
        };
        let c = edwards_from_bytes(&decode_hex_field(commit, "c")?)?;
        let commit_data = point_from_hex(
            value
                .get("commit_data")
                .and_then(|v| v.as_str())
                .ok_or_else(|| SealError::Decode("missing commit_data".into()))?,
        )?;
        let r_data = match value.get("r_data") {
            Some(serde_json::Value::String(dec)) => Some(
                BigInt::parse_bytes(dec.as_bytes(), 10)
                    .ok_or_else(|| SealError::Decode("invalid r_data".into()))?,
            ),
            _ => None,
        };
        let pub_key = decode_base64_field(&value, "pub_key")?;
        Ok(Self {
            sig,
            commit: PedersenCommitment { r, c },
            commit_data,
            r_data,
            pub_key,
        })
    }
}

impl PublicSignatureBundle {
    /// Serializes the public view as one JSON line.
    pub fn to_json_string(&self) -> Result<String, SealError> {
        Ok(serde_json::json!({
            "sig": BASE64.encode(&self.sig),
            "commit": hex::encode(edwards_to_bytes(&self.commit_point)?),
            "commit_data": point_to_hex(&self.commit_data),
            "pub_key": BASE64.encode(&self.pub_key),
        })
        .to_string())
    }

    /// Parses a public bundle from its JSON line.
    pub fn from_json_str(input: &str) -> Result<Self, SealError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|err| SealError::Decode(err.to_string()))?;
        let commit_point = edwards_from_bytes(&decode_hex_field(&value, "commit")?)?;
        let commit_data = point_from_hex(
            value
                .get("commit_data")
                .and_then(|v| v.as_str())
                .ok_or_else(|| SealError::Decode("missing commit_data".into()))?,
        )?;
        Ok(Self {
            sig: decode_base64_field(&value, "sig")?,
            commit_point,
            commit_data,
            pub_key: decode_base64_field(&value, "pub_key")?,
        })
    }
}

fn decode_base64_field(value: &serde_json::Value, field: &str) -> Result<Vec<u8>, SealError> {
    let text = value
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| SealError::Decode(format!("missing {field}")))?;
    BASE64
        .decode(text)
        .map_err(|err| SealError::Decode(err.to_string()))
}

fn decode_hex_field(value: &serde_json::Value, field: &str) -> Result<Vec<u8>, SealError> {
    let text = value
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| SealError::Decode(format!("missing {field}")))?;
    hex::decode(text).map_err(|err| SealError::Decode(err.to_string()))
}

fn ed_scalar_to_hex(value: &EdFr) -> String {
    let raw = value.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - raw.len()..].copy_from_slice(&raw);
    hex::encode(out)
}

fn ed_scalar_from_hex(input: &str) -> Result<EdFr, SealError> {
    let bytes = hex::decode(input).map_err(|err| SealError::Decode(err.to_string()))?;
    Ok(EdFr::from_be_bytes_mod_order(&bytes))
}

/// Signs a dataset, producing a bundle with its private blinding values.
///
/// `prior_signature` is whatever signature block the caller found attached
/// to the input; signing refuses to double-sign.
pub fn sign_dataset<R: RngCore + CryptoRng>(
    key: &CommitKey,
    dataset: &DatasetVector,
    metadata: &str,
    prior_signature: Option<&str>,
    signer: &SigningKey,
    rng: &mut R,
) -> Result<SignatureBundle, SealError> {
    if prior_signature.is_some() {
        return Err(SealError::AlreadySigned);
    }
    let (commit_data, r_data) = commit_dataset(key, &dataset.values, None, rng)?;
    let pieces = digest_pieces(&dataset.columns, &commit_data, metadata);
    let commit = commit_digest(&pieces, None, rng);
    let message = committed_x(&commit);
    let signature = signer.sign(&message);
    Ok(SignatureBundle {
        sig: signature_to_bytes(&signature)?,
        commit,
        commit_data,
        r_data: Some(r_data),
        pub_key: public_key_to_bytes(&signer.public())?,
    })
}

/// Verifies a signed dataset against the full (unredacted) bundle.
///
/// Recomputes the dataset commitment under the stored blinding, recomputes
/// the digest commitment, and checks the signature.  Integrity mismatches
/// are typed errors; a signature that simply does not verify is
/// `Ok(false)`.
pub fn verify_dataset(
    key: &CommitKey,
    dataset: &DatasetVector,
    metadata: &str,
    bundle: &SignatureBundle,
    public_key: &[u8],
) -> Result<bool, SealError> {
    if bundle.pub_key != public_key {
        return Err(SealError::KeyMismatch);
    }
    let r_data = bundle.r_data.as_ref().ok_or(SealError::RedactedBundle)?;
    let recomputed = commit_with_blinding(key, &dataset.values, r_data)?;
    if recomputed != bundle.commit_data {
        return Err(SealError::CommitmentMismatch);
    }

    let pedersen_r = bundle.commit.r.ok_or(SealError::RedactedBundle)?;
    let pieces = digest_pieces(&dataset.columns, &recomputed, metadata);
    let recomputed_commit = commit_digest_with_blinding(&pieces, pedersen_r);
    if recomputed_commit.c != bundle.commit.c {
        return Err(SealError::CommitmentMismatch);
    }

    let public = public_key_from_bytes(&bundle.pub_key)?;
    let signature = signature_from_bytes(&bundle.sig)?;
    let message = committed_x(&bundle.commit);
    Ok(crate::eddsa::verify(&public, &message, &signature))
}
