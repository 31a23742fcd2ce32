//! The proving backend as an injected capability.
//!
//! The rest of the crate treats proof and key material as opaque bytes; a
//! [`ProofSystem`] turns an assigned [`BindingCircuit`] into a proof and
//! checks a proof against the ordered public-input vector.  The provided
//! implementation is Groth16 over BN254 with the libsnark reduction;
//! swapping in a different backend never touches the circuit or the
//! protocol layer.

use crate::circuit::BindingCircuit;
use crate::error::SealError;
use ark_bn254::{Bn254, Fr};
use ark_groth16::r1cs_to_qap::LibsnarkReduction;
use ark_groth16::{prepare_verifying_key, Groth16, Proof, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};
use rand::{CryptoRng, RngCore};
use std::io::Cursor;

/// Serialized proving and verifying key material for one circuit shape.
#[derive(Debug, Clone)]
pub struct ProofKeys {
    /// Serialized proving key; stays with the prover.
    pub proving: Vec<u8>,
    /// Serialized verifying key; published alongside proofs.
    pub verifying: Vec<u8>,
}

/// A backend that can set up, prove and verify the binding circuit.
pub trait ProofSystem {
    /// Runs the circuit-specific setup, producing serialized keys.
    fn setup<R: RngCore + CryptoRng>(
        &self,
        circuit: BindingCircuit,
        rng: &mut R,
    ) -> Result<ProofKeys, SealError>;

    /// Produces an opaque proof for an assigned circuit.
    fn prove<R: RngCore + CryptoRng>(
        &self,
        proving_key: &[u8],
        circuit: BindingCircuit,
        rng: &mut R,
    ) -> Result<Vec<u8>, SealError>;

    /// Checks a proof against the ordered public inputs.
    fn verify(
        &self,
        verifying_key: &[u8],
        proof: &[u8],
        public_inputs: &[Fr],
    ) -> Result<bool, SealError>;
}

/// Groth16 over BN254, the default backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Groth16Backend;

type Scheme = Groth16<Bn254, LibsnarkReduction>;

fn backend_err<E: core::fmt::Display>(err: E) -> SealError {
    SealError::Backend(err.to_string())
}

impl ProofSystem for Groth16Backend {
    fn setup<R: RngCore + CryptoRng>(
        &self,
        circuit: BindingCircuit,
        rng: &mut R,
    ) -> Result<ProofKeys, SealError> {
        let pk = Scheme::generate_random_parameters_with_reduction(circuit, rng)
            .map_err(backend_err)?;
        let mut proving = Vec::new();
        pk.serialize_compressed(&mut proving).map_err(backend_err)?;
        let mut verifying = Vec::new();
        pk.vk
            .serialize_compressed(&mut verifying)
            .map_err(backend_err)?;
        Ok(ProofKeys { proving, verifying })
    }

    fn prove<R: RngCore + CryptoRng>(
        &self,
        proving_key: &[u8],
        circuit: BindingCircuit,
        rng: &mut R,
    ) -> Result<Vec<u8>, SealError> {
        // The proving key is produced locally; skip the costly validation.
        let mut cursor = Cursor::new(proving_key);
        let pk: ProvingKey<Bn254> =
            ProvingKey::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::No)
                .map_err(backend_err)?;
        let proof = Scheme::create_random_proof_with_reduction(circuit, &pk, rng)
            .map_err(backend_err)?;
        let mut out = Vec::new();
        proof.serialize_compressed(&mut out).map_err(backend_err)?;
        Ok(out)
    }

    fn verify(
        &self,
        verifying_key: &[u8],
        proof: &[u8],
        public_inputs: &[Fr],
    ) -> Result<bool, SealError> {
        let mut cursor = Cursor::new(verifying_key);
        let vk: VerifyingKey<Bn254> =
            VerifyingKey::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes)
                .map_err(backend_err)?;
        let mut cursor = Cursor::new(proof);
        let proof: Proof<Bn254> =
            Proof::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes)
                .map_err(backend_err)?;
        let pvk = prepare_verifying_key(&vk);
        Scheme::verify_proof(&pvk, &proof, public_inputs).map_err(backend_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::BindingCircuit;
    use crate::eddsa::SigningKey;
    use crate::pedersen::{commit_digest, committed_x};
    use rand::rngs::OsRng;

    // Full Groth16 setup/prove/verify over the binding circuit; slow but
    // exercises the entire backend path.
    #[test]
    fn groth16_roundtrip() {
        let mut rng = OsRng;
        let pieces = [Fr::from(3u64), Fr::from(4u64), Fr::from(5u64)];
        let commitment = commit_digest(&pieces, None, &mut rng);
        let signer = SigningKey::generate(&mut rng);
        let signature = signer.sign(&committed_x(&commitment));

        let backend = Groth16Backend;
        let keys = backend.setup(BindingCircuit::blank(), &mut rng).unwrap();
        let circuit = BindingCircuit::assemble(
            &pieces,
            &commitment.r.unwrap(),
            &signer.public(),
            &signature,
        );
        let proof = backend.prove(&keys.proving, circuit, &mut rng).unwrap();

        let publics =
            BindingCircuit::public_inputs(pieces[0], pieces[1], &signer.public(), &signature);
        assert!(backend.verify(&keys.verifying, &proof, &publics).unwrap());

        // A shifted public input must not verify.
        let mut wrong = publics.clone();
        wrong[0] += Fr::from(1u64);
        assert!(!backend.verify(&keys.verifying, &proof, &wrong).unwrap());
    }
}
