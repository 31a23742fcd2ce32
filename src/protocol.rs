//! End-to-end orchestration: commit, sign, split, prove, verify.
//!
//! The signer runs [`split_and_prove`] once: the dataset is split into
//! extended shares bound to the dataset-commitment blinding, the first
//! party's commitment is computed directly and the other two derived
//! homomorphically from it, and the proving backend turns the signer's
//! witness into an opaque proof.  Each share holder later runs
//! [`verify_with_proof`] independently: the three published commitments
//! must recombine, the proof must verify against the public inputs, and
//! the holder's own share must commit to its published value.

use crate::backend::ProofSystem;
use crate::circuit::BindingCircuit;
use crate::commit::{commit_share, join_commitments, CommitKey, Commitment};
use crate::curve::{point_from_hex, point_to_hex};
use crate::eddsa::{public_key_from_bytes, signature_from_bytes};
use crate::error::SealError;
use crate::hiding::{split_hiding, ExtendedShare};
use crate::pedersen::digest_pieces;
use crate::sharing::DatasetVector;
use crate::sign::{PublicSignatureBundle, SignatureBundle};
use ark_ec::{AffineRepr, CurveGroup};
use ark_secp256r1::{Fr as CurveFr, Projective};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{CryptoRng, RngCore};

/// The artifact published for third-party verification.
#[derive(Debug, Clone)]
pub struct AuthProof {
    /// Opaque proof bytes, passed through to the backend unmodified.
    pub zk_proof: Vec<u8>,
    /// The three per-party share commitments.
    pub commits: [Commitment; 3],
    /// The redacted signature bundle.
    pub sign: PublicSignatureBundle,
}

impl AuthProof {
    /// Serializes the artifact as one JSON line.
    pub fn to_json_string(&self) -> Result<String, SealError> {
        let sign: serde_json::Value = serde_json::from_str(&self.sign.to_json_string()?)
            .map_err(|err| SealError::Decode(err.to_string()))?;
        Ok(serde_json::json!({
            "zk_proof": BASE64.encode(&self.zk_proof),
            "commits": [
                point_to_hex(&self.commits[0]),
                point_to_hex(&self.commits[1]),
                point_to_hex(&self.commits[2]),
            ],
            "sign": sign,
        })
        .to_string())
    }

    /// Parses an artifact previously emitted by
    /// [`AuthProof::to_json_string`].
    pub fn from_json_str(input: &str) -> Result<Self, SealError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|err| SealError::Decode(err.to_string()))?;
        let zk_proof = BASE64
            .decode(
                value
                    .get("zk_proof")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| SealError::Decode("missing zk_proof".into()))?,
            )
            .map_err(|err| SealError::Decode(err.to_string()))?;
        let commits_json = value
            .get("commits")
            .and_then(|v| v.as_array())
            .ok_or_else(|| SealError::Decode("missing commits".into()))?;
        if commits_json.len() != 3 {
            return Err(SealError::Decode("expected exactly 3 commits".into()));
        }
        let mut commits = [Commitment::zero(); 3];
        for (slot, entry) in commits.iter_mut().zip(commits_json) {
            *slot = point_from_hex(
                entry
                    .as_str()
                    .ok_or_else(|| SealError::Decode("commit is not a string".into()))?,
            )?;
        }
        let sign_value = value
            .get("sign")
            .ok_or_else(|| SealError::Decode("missing sign".into()))?;
        let sign = PublicSignatureBundle::from_json_str(&sign_value.to_string())?;
        Ok(Self {
            zk_proof,
            commits,
            sign,
        })
    }
}

/// Derives the second and third party commitments from the first and the
/// dataset commitment, using the share relations in the curve group.
fn derive_commitments(first: Commitment, dataset: Commitment) -> [Commitment; 3] {
    let second = first * CurveFr::from(2u64) - dataset;
    let third = first * CurveFr::from(3u64) - Projective::from(dataset) * CurveFr::from(2u64);
    [first, second.into_affine(), third.into_affine()]
}

/// Splits a signed dataset into extended shares and proves the binding.
///
/// Consumes the full bundle: the dataset-commitment blinding seeds the
/// hidden share channel, the Pedersen blinding feeds the witness, and the
/// returned artifact carries only the redacted public view.
pub fn split_and_prove<B: ProofSystem, R: RngCore + CryptoRng>(
    key: &CommitKey,
    dataset: &DatasetVector,
    metadata: &str,
    bundle: SignatureBundle,
    backend: &B,
    proving_key: &[u8],
    rng: &mut R,
) -> Result<([ExtendedShare; 3], AuthProof), SealError> {
    let r_data = bundle.r_data.as_ref().ok_or(SealError::RedactedBundle)?;
    let shares = split_hiding(&dataset.values, r_data, rng)?;

    let first = commit_share(key, &shares[0])?;
    let commits = derive_commitments(first, bundle.commit_data);

    let pieces = digest_pieces(&dataset.columns, &bundle.commit_data, metadata);
    let pedersen_r = bundle.commit.r.ok_or(SealError::RedactedBundle)?;
    let public_key = public_key_from_bytes(&bundle.pub_key)?;
    let signature = signature_from_bytes(&bundle.sig)?;
    let circuit = BindingCircuit::assemble(&pieces, &pedersen_r, &public_key, &signature);
    let zk_proof = backend.prove(proving_key, circuit, rng)?;

    let auth = AuthProof {
        zk_proof,
        commits,
        sign: bundle.redact(),
    };
    Ok((shares, auth))
}

/// Verifies a proof and one party's own share against the published
/// artifact.
///
/// Joins the three commitments (any inconsistency is
/// [`SealError::CommitmentMismatch`]), verifies the proof against the
/// public inputs, then checks that `share` commits to `commits[id]`
/// ([`SealError::ShareCommitmentMismatch`] otherwise).  Both checks must
/// pass.
#[allow(clippy::too_many_arguments)]
pub fn verify_with_proof<B: ProofSystem>(
    backend: &B,
    verifying_key: &[u8],
    proof: &[u8],
    share: &ExtendedShare,
    id: usize,
    commits: &[Commitment; 3],
    columns: &[String],
    sign: &PublicSignatureBundle,
    public_key: &[u8],
    key: &CommitKey,
) -> Result<bool, SealError> {
    if sign.pub_key != public_key {
        return Err(SealError::KeyMismatch);
    }
    let joined = join_commitments(commits)?;

    // Column hash and joined commitment are the public digest pieces; the
    // metadata hash stays with the prover.
    let pieces = digest_pieces(columns, &joined, "");
    let pk_point = public_key_from_bytes(public_key)?;
    let signature = signature_from_bytes(&sign.sig)?;
    let publics = BindingCircuit::public_inputs(pieces[0], pieces[1], &pk_point, &signature);
    if !backend.verify(verifying_key, proof, &publics)? {
        return Ok(false);
    }

    let own = commit_share(key, share)?;
    if own != commits[id] {
        return Err(SealError::ShareCommitmentMismatch);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Groth16Backend;
    use crate::commit::commit_with_blinding;
    use crate::eddsa::SigningKey;
    use crate::sign::sign_dataset;
    use ark_ec::AffineRepr;
    use rand::rngs::OsRng;

    // The full pipeline from the signed dataset to per-party verification.
    // Groth16 setup dominates the runtime; the dataset is deliberately
    // tiny.
    #[test]
    fn end_to_end_pipeline() {
        let mut rng = OsRng;
        let dataset =
            DatasetVector::from_rows(&[vec![1, 2], vec![3, 4]], &["a", "b"]).unwrap();
        let key = CommitKey::derive(dataset.values.len());
        let signer = SigningKey::generate(&mut rng);
        let bundle =
            sign_dataset(&key, &dataset, "clinical batch 7", None, &signer, &mut rng).unwrap();
        let r_data = bundle.r_data.clone().unwrap();
        let dataset_commit = bundle.commit_data;

        let backend = Groth16Backend;
        let keys = backend.setup(BindingCircuit::blank(), &mut rng).unwrap();
        let (shares, auth) = split_and_prove(
            &key,
            &dataset,
            "clinical batch 7",
            bundle,
            &backend,
            &keys.proving,
            &mut rng,
        )
        .unwrap();

        // The derived per-party commitments recombine into the dataset
        // commitment, which matches a direct recomputation.
        let joined = join_commitments(&auth.commits).unwrap();
        assert_eq!(joined, dataset_commit);
        assert_eq!(
            joined,
            commit_with_blinding(&key, &dataset.values, &r_data).unwrap()
        );

        let pub_key = auth.sign.pub_key.clone();
        for (id, share) in shares.iter().enumerate() {
            let ok = verify_with_proof(
                &backend,
                &keys.verifying,
                &auth.zk_proof,
                share,
                id,
                &auth.commits,
                &dataset.columns,
                &auth.sign,
                &pub_key,
                &key,
            )
            .unwrap();
            assert!(ok, "party {id} verification");
        }

        // Tampering with a published commitment breaks the homomorphic
        // join before the proof is even consulted.
        let mut tampered = auth.commits;
        tampered[0] = (Projective::from(tampered[0])
            + ark_secp256r1::Affine::generator())
        .into_affine();
        assert!(matches!(
            verify_with_proof(
                &backend,
                &keys.verifying,
                &auth.zk_proof,
                &shares[0],
                0,
                &tampered,
                &dataset.columns,
                &auth.sign,
                &pub_key,
                &key,
            ),
            Err(SealError::CommitmentMismatch)
        ));

        // A share swapped between parties trips the share-commitment check.
        assert!(matches!(
            verify_with_proof(
                &backend,
                &keys.verifying,
                &auth.zk_proof,
                &shares[1],
                0,
                &auth.commits,
                &dataset.columns,
                &auth.sign,
                &pub_key,
                &key,
            ),
            Err(SealError::ShareCommitmentMismatch)
        ));

        // The artifact round-trips through its JSON line.
        let json = auth.to_json_string().unwrap();
        let parsed = AuthProof::from_json_str(&json).unwrap();
        assert_eq!(parsed.zk_proof, auth.zk_proof);
        assert_eq!(parsed.commits, auth.commits);
        assert_eq!(parsed.sign, auth.sign);
    }

    #[test]
    fn redacted_bundle_cannot_split() {
        let mut rng = OsRng;
        let dataset = DatasetVector::from_rows(&[vec![1]], &["v"]).unwrap();
        let key = CommitKey::derive(1);
        let signer = SigningKey::generate(&mut rng);
        let bundle = sign_dataset(&key, &dataset, "", None, &signer, &mut rng).unwrap();
        let mut stripped = bundle;
        stripped.r_data = None;
        let backend = Groth16Backend;
        assert!(matches!(
            split_and_prove(&key, &dataset, "", stripped, &backend, &[], &mut rng),
            Err(SealError::RedactedBundle)
        ));
    }
}
