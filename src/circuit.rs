//! The constraint circuit binding shares, commitments and signature.
//!
//! The circuit recomputes, inside the proof field, exactly what the signer
//! computed natively: the MiMC digest over (column hash, dataset-commitment
//! x-coordinate, metadata hash), the Pedersen commitment to that digest,
//! the MiMC signature challenge, and the cofactor-cleared EdDSA identity.
//! The metadata hash and the Pedersen blinding stay private; everything
//! else is a public input.  The circuit is a pure constraint description —
//! any backend that accepts a `ConstraintSynthesizer` can prove it.

use crate::eddsa::Signature;
use crate::mimc::{round_constant, MIMC_ROUNDS};
use crate::pedersen::{PEDERSEN_G, PEDERSEN_H};
use ark_bn254::Fr;
use ark_ec::twisted_edwards::TECurveConfig;
use ark_ec::AffineRepr;
use ark_ed_on_bn254::{constraints::EdwardsVar, EdwardsAffine, EdwardsConfig, EdwardsProjective};
use ark_ff::{BigInteger, PrimeField};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

/// Embeds an Edwards scalar into the proof field.
pub fn embed_scalar(value: &ark_ed_on_bn254::Fr) -> Fr {
    Fr::from_be_bytes_mod_order(&value.into_bigint().to_bytes_be())
}

/// Witness and instance assignment for the binding circuit.
///
/// Public inputs, in allocation order: column hash, dataset commitment,
/// public key x and y, signature nonce point x and y, signature scalar.
/// Private witness: metadata hash, Pedersen blinding.
#[derive(Clone, Default)]
pub struct BindingCircuit {
    /// SHA-256 of the comma-joined column names, reduced into the field.
    pub cols_hash: Option<Fr>,
    /// Dataset-commitment x-coordinate, padded and reduced into the field.
    pub commit: Option<Fr>,
    /// SHA-256 of the free-text metadata; private.
    pub metadata_hash: Option<Fr>,
    /// Pedersen blinding of the digest commitment; private.
    pub blinding: Option<Fr>,
    /// Signer public key coordinates.
    pub public_key: Option<(Fr, Fr)>,
    /// Signature nonce point coordinates.
    pub sig_r: Option<(Fr, Fr)>,
    /// Signature response scalar, embedded into the proof field.
    pub sig_s: Option<Fr>,
}

impl BindingCircuit {
    /// A shape-only circuit with no assignment, for key generation.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Assembles a fully assigned circuit from the signer's values.
    pub fn assemble(
        pieces: &[Fr; 3],
        blinding: &ark_ed_on_bn254::Fr,
        public_key: &EdwardsAffine,
        signature: &Signature,
    ) -> Self {
        Self {
            cols_hash: Some(pieces[0]),
            commit: Some(pieces[1]),
            metadata_hash: Some(pieces[2]),
            blinding: Some(embed_scalar(blinding)),
            public_key: Some((public_key.x, public_key.y)),
            sig_r: Some((signature.r.x, signature.r.y)),
            sig_s: Some(embed_scalar(&signature.s)),
        }
    }

    /// The ordered public-input vector matching the allocation order above.
    pub fn public_inputs(
        cols_hash: Fr,
        commit: Fr,
        public_key: &EdwardsAffine,
        signature: &Signature,
    ) -> Vec<Fr> {
        vec![
            cols_hash,
            commit,
            public_key.x,
            public_key.y,
            signature.r.x,
            signature.r.y,
            embed_scalar(&signature.s),
        ]
    }
}

fn seventh_power_var(t: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let t2 = t.square()?;
    let t4 = t2.square()?;
    Ok(&t4 * &t2 * t)
}

fn permute_var(x: FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let mut state = x;
    for i in 0..MIMC_ROUNDS {
        state = seventh_power_var(&(state + FpVar::constant(round_constant(i))))?;
    }
    Ok(state)
}

/// In-circuit MiMC sponge; replays the native constants exactly.
fn hash_fields_var(inputs: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    let mut state = permute_var(FpVar::constant(Fr::from(inputs.len() as u64)))?;
    for input in inputs {
        state = permute_var(state + input)?;
    }
    Ok(state)
}

/// Asserts that a coordinate-allocated point satisfies the curve equation.
fn enforce_on_curve(point: &EdwardsVar) -> Result<(), SynthesisError> {
    let x2 = point.x.square()?;
    let y2 = point.y.square()?;
    let lhs = FpVar::constant(EdwardsConfig::COEFF_A) * &x2 + &y2;
    let rhs = FpVar::one() + FpVar::constant(EdwardsConfig::COEFF_D) * &x2 * &y2;
    lhs.enforce_equal(&rhs)
}

impl ConstraintSynthesizer<Fr> for BindingCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Public inputs, in the order the verifier rebuilds them.
        let cols_hash = FpVar::new_input(cs.clone(), || {
            self.cols_hash.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let commit = FpVar::new_input(cs.clone(), || {
            self.commit.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let pk = self.public_key;
        let pk_x = FpVar::new_input(cs.clone(), || {
            pk.map(|p| p.0).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let pk_y = FpVar::new_input(cs.clone(), || {
            pk.map(|p| p.1).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let sig_r = self.sig_r;
        let sig_r_x = FpVar::new_input(cs.clone(), || {
            sig_r.map(|p| p.0).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let sig_r_y = FpVar::new_input(cs.clone(), || {
            sig_r.map(|p| p.1).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let sig_s = FpVar::new_input(cs.clone(), || {
            self.sig_s.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // Private witness.
        let metadata_hash = FpVar::new_witness(cs.clone(), || {
            self.metadata_hash.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let blinding = FpVar::new_witness(cs.clone(), || {
            self.blinding.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let public_key = EdwardsVar::new(pk_x, pk_y);
        enforce_on_curve(&public_key)?;
        let nonce_point = EdwardsVar::new(sig_r_x, sig_r_y);
        enforce_on_curve(&nonce_point)?;

        // Digest over (column hash, dataset commitment, metadata hash).
        let digest = hash_fields_var(&[cols_hash, commit, metadata_hash])?;

        // Pedersen commitment to the digest.
        let g = EdwardsVar::new_constant(cs.clone(), EdwardsProjective::from(*PEDERSEN_G))?;
        let h = EdwardsVar::new_constant(cs.clone(), EdwardsProjective::from(*PEDERSEN_H))?;
        let g_digest = g.scalar_mul_le(digest.to_bits_le()?.iter())?;
        let h_blinding = h.scalar_mul_le(blinding.to_bits_le()?.iter())?;
        let committed = g_digest + h_blinding;

        // Signature challenge over (R, A, committed x).
        let challenge = hash_fields_var(&[
            nonce_point.x.clone(),
            nonce_point.y.clone(),
            public_key.x.clone(),
            public_key.y.clone(),
            committed.x.clone(),
        ])?;

        // [S]B - ([challenge]A + R) must vanish after cofactor clearing.
        let base = EdwardsVar::new_constant(
            cs,
            EdwardsProjective::from(EdwardsAffine::generator()),
        )?;
        let lhs = base.scalar_mul_le(sig_s.to_bits_le()?.iter())?;
        let rhs = public_key.scalar_mul_le(challenge.to_bits_le()?.iter())? + nonce_point;
        let mut gap = lhs - rhs;
        // Cofactor 8: three doublings.
        gap.double_in_place()?;
        gap.double_in_place()?;
        gap.double_in_place()?;
        gap.x.enforce_equal(&FpVar::zero())?;
        gap.y.enforce_equal(&FpVar::one())?;
        Ok(())
    }
}
