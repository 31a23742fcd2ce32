//! Three-party secret sharing of dataset vectors.
//!
//! Each element is shared by evaluating an independently random degree-1
//! polynomial `f(x) = a*x + value` at the party indices 1, 2 and 3, so the
//! secret sits at `f(0)`.  Three points over a degree-1 polynomial are
//! over-determined by one equation; [`join`] exploits the redundancy to
//! detect any single corrupted share deterministically.  This is an
//! integrity check, not a fault-tolerance scheme.

use crate::error::SealError;
use crate::field::{
    denormalize, normalize, poly_eval, reduce, uniform_scalar, MPC_PRIME,
};
use num_bigint::BigInt;
use rand::{CryptoRng, RngCore};

/// A flattened numeric dataset: row-major cells plus ordered column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetVector {
    /// Flattened row-major cells in the canonical signed range.
    pub values: Vec<BigInt>,
    /// Ordered column names; the column count divides the value count.
    pub columns: Vec<String>,
}

impl DatasetVector {
    /// Builds a dataset vector, validating shape and value range.
    pub fn new(values: Vec<BigInt>, columns: Vec<String>) -> Result<Self, SealError> {
        if columns.is_empty() {
            return Err(SealError::ShapeMismatch("no columns".into()));
        }
        if values.len() % columns.len() != 0 {
            return Err(SealError::ShapeMismatch(format!(
                "{} values do not fill rows of {} columns",
                values.len(),
                columns.len()
            )));
        }
        for value in &values {
            crate::field::check_range(value)?;
        }
        Ok(Self { values, columns })
    }

    /// Builds a dataset vector from integer rows.
    pub fn from_rows<S: Into<String> + Clone>(
        rows: &[Vec<i64>],
        columns: &[S],
    ) -> Result<Self, SealError> {
        let mut values = Vec::new();
        for row in rows {
            if row.len() != columns.len() {
                return Err(SealError::ShapeMismatch(format!(
                    "row of {} cells in a {}-column dataset",
                    row.len(),
                    columns.len()
                )));
            }
            values.extend(row.iter().map(|v| BigInt::from(*v)));
        }
        let columns = columns.iter().cloned().map(Into::into).collect();
        Self::new(values, columns)
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.values.len() / self.columns.len()
    }
}

/// One party's share of a dataset vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Party index in `1..=3`; also the polynomial evaluation point.
    pub party: u32,
    /// Per-element share residues in `[0, P)`.
    pub values: Vec<BigInt>,
}

/// Splits a vector into three shares of a degree-1 polynomial per element.
///
/// Values outside the signed range are rejected with
/// [`SealError::ValueOutOfRange`] before any share is produced.
pub fn split<R: RngCore + CryptoRng>(
    values: &[BigInt],
    rng: &mut R,
) -> Result<[Share; 3], SealError> {
    let mut parts = [
        Share { party: 1, values: Vec::with_capacity(values.len()) },
        Share { party: 2, values: Vec::with_capacity(values.len()) },
        Share { party: 3, values: Vec::with_capacity(values.len()) },
    ];
    for value in values {
        let secret = normalize(value)?;
        let coeff = uniform_scalar(&MPC_PRIME, rng);
        for share in parts.iter_mut() {
            share.values.push(poly_eval(&secret, &coeff, share.party));
        }
    }
    Ok(parts)
}

fn check_lengths(shares: &[Share; 3]) -> Result<usize, SealError> {
    let n = shares[0].values.len();
    if shares.iter().any(|s| s.values.len() != n) {
        return Err(SealError::ShapeMismatch(
            "shares have differing lengths".into(),
        ));
    }
    Ok(n)
}

/// Reconstructs the secret vector, enforcing all three consistency
/// equations.
///
/// The value is derived as `2*s1 - s2`, then re-derived as `3*s2 - 2*s3`
/// and via `3*s1 - s3`; any disagreement is [`SealError::InconsistentShares`].
pub fn join(shares: &[Share; 3]) -> Result<Vec<BigInt>, SealError> {
    let n = check_lengths(shares)?;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let s1 = &shares[0].values[i];
        let s2 = &shares[1].values[i];
        let s3 = &shares[2].values[i];

        let res = reduce(&(s1 * 2 - s2));
        let check = reduce(&(s2 * 3 - s3 * 2));
        if check != res {
            return Err(SealError::InconsistentShares);
        }
        let check2 = reduce(&(s1 * 3 - s3));
        if check2 != reduce(&(&res * 2)) {
            return Err(SealError::InconsistentShares);
        }
        out.push(denormalize(res));
    }
    Ok(out)
}

/// Reconstructs the secret vector from the first relation only.
///
/// No consistency check is performed; this is the fast approximate path for
/// callers that tolerate downstream rounding.  Use [`join`] whenever
/// integrity matters.
pub fn join_lossy(shares: &[Share; 3]) -> Result<Vec<BigInt>, SealError> {
    let n = check_lengths(shares)?;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let res = reduce(&(&shares[0].values[i] * 2 - &shares[1].values[i]));
        out.push(denormalize(res));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{uniform_range_vector, MPC_PRIME_HALF};
    use num_bigint::BigInt;
    use proptest::prelude::*;
    use rand::rngs::OsRng;

    #[test]
    fn split_join_roundtrip() {
        let mut rng = OsRng;
        let low = -&*MPC_PRIME_HALF;
        let values = uniform_range_vector(100, &low, &MPC_PRIME_HALF, &mut rng);
        let shares = split(&values, &mut rng).unwrap();
        let joined = join(&shares).unwrap();
        assert_eq!(joined, values);
    }

    #[test]
    fn join_detects_single_mutation() {
        let mut rng = OsRng;
        let values = vec![BigInt::from(5), BigInt::from(-9), BigInt::from(0)];
        for victim in 0..3 {
            let mut shares = split(&values, &mut rng).unwrap();
            shares[victim].values[1] += 1;
            assert!(matches!(
                join(&shares),
                Err(SealError::InconsistentShares)
            ));
        }
    }

    #[test]
    fn lossy_join_skips_consistency() {
        let mut rng = OsRng;
        let values = vec![BigInt::from(17), BigInt::from(-3)];
        let mut shares = split(&values, &mut rng).unwrap();
        // Corrupting the third share is invisible to the lossy path.
        shares[2].values[0] += 1;
        let joined = join_lossy(&shares).unwrap();
        assert_eq!(joined, values);
        assert!(join(&shares).is_err());
    }

    #[test]
    fn split_rejects_out_of_range() {
        let mut rng = OsRng;
        let values = vec![&*MPC_PRIME_HALF + 1];
        assert!(matches!(
            split(&values, &mut rng),
            Err(SealError::ValueOutOfRange)
        ));
    }

    #[test]
    fn dataset_vector_shape_checks() {
        let cols = ["a".to_string(), "b".to_string()];
        assert!(DatasetVector::from_rows(&[vec![1, 2], vec![3, 4]], &cols).is_ok());
        assert!(matches!(
            DatasetVector::from_rows(&[vec![1, 2, 3]], &cols),
            Err(SealError::ShapeMismatch(_))
        ));
        assert!(matches!(
            DatasetVector::new(vec![BigInt::from(1)], vec![]),
            Err(SealError::ShapeMismatch(_))
        ));
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_i64(raw in proptest::collection::vec(any::<i64>(), 1..32)) {
            let values: Vec<BigInt> = raw.iter().map(|v| BigInt::from(*v)).collect();
            let mut rng = OsRng;
            let shares = split(&values, &mut rng).unwrap();
            prop_assert_eq!(join(&shares).unwrap(), values);
        }
    }
}
