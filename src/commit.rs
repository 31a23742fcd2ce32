//! Homomorphic vector commitments in the commitment group.
//!
//! A dataset commits as `r*Base + sum(value_i * H_i)` against a pool of
//! generators with unknown discrete logarithms.  Per-party commitments over
//! extended shares combine the hidden carry channel and the field share into
//! one exponent per generator, so the three party commitments recombine —
//! with the same linear relations the sharing layer uses — into the dataset
//! commitment.

use crate::curve::{base_mul, index_generator, scalar_from_bigint, GROUP_ORDER};
use crate::error::SealError;
use crate::field::{check_range, MPC_PRIME};
use crate::hiding::ExtendedShare;
use ark_ec::CurveGroup;
use ark_ff::Field;
use ark_secp256r1::{Affine, Fr, Projective};
use ark_std::Zero;
use num_bigint::BigInt;
use num_integer::Integer;
use rand::{CryptoRng, RngCore};
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// A commitment to a dataset vector or to one party's extended share.
pub type Commitment = Affine;

/// Below this element count the serial path beats thread fan-out.
const PARALLEL_THRESHOLD: usize = 64;

#[cfg(not(target_arch = "wasm32"))]
fn parallel_enabled(size: usize) -> bool {
    size >= PARALLEL_THRESHOLD && rayon::current_num_threads() > 1
}

/// Immutable pool of deterministically derived generators.
///
/// Built once per vector length and passed explicitly to the commitment
/// operations; derivation is pure, so two pools of the same size are
/// interchangeable.
#[derive(Debug, Clone)]
pub struct CommitKey {
    generators: Vec<Affine>,
}

impl CommitKey {
    /// Derives a pool of `n` generators seeded by element index.
    pub fn derive(n: usize) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        if parallel_enabled(n) {
            let generators = (0..n).into_par_iter().map(index_generator).collect();
            return Self { generators };
        }
        let generators = (0..n).map(index_generator).collect();
        Self { generators }
    }

    /// Number of generators in the pool.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    fn require(&self, n: usize) -> Result<&[Affine], SealError> {
        if self.generators.len() < n {
            return Err(SealError::ShapeMismatch(format!(
                "pool of {} generators cannot commit {} elements",
                self.generators.len(),
                n
            )));
        }
        Ok(&self.generators[..n])
    }
}

fn weighted_sum(generators: &[Affine], scalars: &[Fr]) -> Projective {
    #[cfg(not(target_arch = "wasm32"))]
    if parallel_enabled(generators.len()) {
        return generators
            .par_iter()
            .zip(scalars.par_iter())
            .map(|(h, s)| *h * *s)
            .reduce(Projective::zero, |a, b| a + b);
    }
    generators
        .iter()
        .zip(scalars.iter())
        .map(|(h, s)| *h * *s)
        .sum()
}

/// Commits to a dataset vector under a caller-supplied blinding scalar.
pub fn commit_with_blinding(
    key: &CommitKey,
    values: &[BigInt],
    blinding: &BigInt,
) -> Result<Commitment, SealError> {
    let generators = key.require(values.len())?;
    let mut scalars = Vec::with_capacity(values.len());
    for value in values {
        check_range(value)?;
        scalars.push(scalar_from_bigint(value));
    }
    let acc = base_mul(scalar_from_bigint(blinding)) + weighted_sum(generators, &scalars);
    Ok(acc.into_affine())
}

/// Commits to a dataset vector, drawing the blinding scalar if absent.
///
/// Returns the commitment together with the blinding actually used; the
/// caller keeps the blinding private until the shares are distributed.
pub fn commit_dataset<R: RngCore + CryptoRng>(
    key: &CommitKey,
    values: &[BigInt],
    blinding: Option<BigInt>,
    rng: &mut R,
) -> Result<(Commitment, BigInt), SealError> {
    let r = match blinding {
        Some(r) => r,
        None => crate::field::uniform_scalar(&GROUP_ORDER, rng),
    };
    let commitment = commit_with_blinding(key, values, &r)?;
    Ok((commitment, r))
}

/// Commits to one party's extended share.
///
/// Each generator's exponent folds the hidden carry entry and the field
/// share together as `hidden * P + field mod N`; the shared blinding entry
/// rides on the base point.
pub fn commit_share(key: &CommitKey, share: &ExtendedShare) -> Result<Commitment, SealError> {
    let n = share.element_count();
    let generators = key.require(n)?;
    let field = share.field_half();
    let hidden = share.hidden_half();
    let scalars: Vec<Fr> = (0..n)
        .map(|i| {
            let folded = (&hidden[i] * &*MPC_PRIME + &field[i]).mod_floor(&GROUP_ORDER);
            scalar_from_bigint(&folded)
        })
        .collect();
    let acc = base_mul(scalar_from_bigint(share.blinding())) + weighted_sum(generators, &scalars);
    Ok(acc.into_affine())
}

/// Recombines the three per-party commitments into the joint commitment.
///
/// The same linear relations as the sharing layer, lifted into the curve
/// group; both redundancy checks must agree or the result is
/// [`SealError::CommitmentMismatch`].
pub fn join_commitments(commits: &[Commitment; 3]) -> Result<Commitment, SealError> {
    let joined = commits[0] * Fr::from(2u64) - commits[1];
    let check = commits[1] * Fr::from(3u64) - commits[2] * Fr::from(2u64);
    if check != joined {
        return Err(SealError::CommitmentMismatch);
    }
    let half = Fr::from(2u64).inverse().expect("2 is invertible");
    let check2 = (commits[0] * Fr::from(3u64) - commits[2]) * half;
    if check2 != joined {
        return Err(SealError::CommitmentMismatch);
    }
    Ok(joined.into_affine())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{uniform_range_vector, uniform_scalar, MPC_PRIME_HALF};
    use crate::hiding::split_hiding;
    use ark_ec::AffineRepr;
    use num_bigint::BigInt;
    use rand::rngs::OsRng;

    #[test]
    fn share_commitments_join_to_dataset_commitment() {
        let mut rng = OsRng;
        let low = -&*MPC_PRIME_HALF;
        let values = uniform_range_vector(12, &low, &MPC_PRIME_HALF, &mut rng);
        let key = CommitKey::derive(values.len());

        let (direct, r) = commit_dataset(&key, &values, None, &mut rng).unwrap();
        let parts = split_hiding(&values, &r, &mut rng).unwrap();
        let commits = [
            commit_share(&key, &parts[0]).unwrap(),
            commit_share(&key, &parts[1]).unwrap(),
            commit_share(&key, &parts[2]).unwrap(),
        ];
        let joined = join_commitments(&commits).unwrap();
        assert_eq!(joined, direct);
    }

    #[test]
    fn tampered_party_commitment_fails_join() {
        let mut rng = OsRng;
        let values = vec![BigInt::from(3), BigInt::from(-8)];
        let key = CommitKey::derive(values.len());
        let (_, r) = commit_dataset(&key, &values, None, &mut rng).unwrap();
        let parts = split_hiding(&values, &r, &mut rng).unwrap();
        let mut commits = [
            commit_share(&key, &parts[0]).unwrap(),
            commit_share(&key, &parts[1]).unwrap(),
            commit_share(&key, &parts[2]).unwrap(),
        ];
        commits[1] = (Projective::from(commits[1]) + Affine::generator()).into_affine();
        assert!(matches!(
            join_commitments(&commits),
            Err(SealError::CommitmentMismatch)
        ));
    }

    #[test]
    fn commit_is_deterministic_in_blinding() {
        let mut rng = OsRng;
        let values = vec![BigInt::from(1), BigInt::from(2)];
        let key = CommitKey::derive(values.len());
        let r = uniform_scalar(&GROUP_ORDER, &mut rng);
        let (a, _) = commit_dataset(&key, &values, Some(r.clone()), &mut rng).unwrap();
        let (b, _) = commit_dataset(&key, &values, Some(r), &mut rng).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn commit_rejects_oversized_values() {
        let mut rng = OsRng;
        let values = vec![&*MPC_PRIME_HALF + 1];
        let key = CommitKey::derive(1);
        assert!(matches!(
            commit_dataset(&key, &values, None, &mut rng),
            Err(SealError::ValueOutOfRange)
        ));
    }

    #[test]
    fn pool_too_small_is_shape_error() {
        let mut rng = OsRng;
        let values = vec![BigInt::from(1), BigInt::from(2), BigInt::from(3)];
        let key = CommitKey::derive(2);
        assert!(matches!(
            commit_dataset(&key, &values, None, &mut rng),
            Err(SealError::ShapeMismatch(_))
        ));
    }
}
