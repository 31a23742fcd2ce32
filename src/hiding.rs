//! Extended sharing with a hidden verification channel.
//!
//! [`split_hiding`] shares a vector exactly like the standard scheme, then
//! appends two kinds of extra entries per party: for every element, a share
//! of the carry-offset triple selected by the element's carry signature
//! (carried in the commitment group's scalar field), and finally a share of
//! the external blinding scalar `r`.  A verifier can later check,
//! homomorphically and from shares alone, that the original dataset
//! commitment reconstructs — without learning any element or its sign.

use crate::carry::CarrySignature;
use crate::curve::GROUP_ORDER;
use crate::error::SealError;
use crate::field::{check_range, poly_eval, reduce, uniform_scalar, MPC_PRIME};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::ToPrimitive;
use rand::{CryptoRng, RngCore};

/// One party's extended share: `n` field shares, `n` hidden carry-offset
/// shares, and one share of the blinding scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedShare {
    /// Party index in `1..=3`.
    pub party: u32,
    /// Concatenated `field || hidden || blinding` entries, length `2n + 1`.
    pub values: Vec<BigInt>,
}

impl ExtendedShare {
    /// Number of dataset elements covered by this share.
    pub fn element_count(&self) -> usize {
        (self.values.len() - 1) / 2
    }

    /// The standard field-share half.
    pub fn field_half(&self) -> &[BigInt] {
        &self.values[..self.element_count()]
    }

    /// The hidden carry-offset half.
    pub fn hidden_half(&self) -> &[BigInt] {
        let n = self.element_count();
        &self.values[n..2 * n]
    }

    /// This party's share of the blinding scalar.
    pub fn blinding(&self) -> &BigInt {
        &self.values[self.values.len() - 1]
    }
}

fn quotient(numerator: BigInt, negative: bool) -> Result<i64, SealError> {
    let q = numerator.div_floor(&MPC_PRIME);
    let adjusted = if negative { q + 1 } else { q };
    adjusted
        .to_i64()
        .ok_or(SealError::UnexpectedSharingCondition)
}

fn share_in_group<R: RngCore + CryptoRng>(
    secret: &BigInt,
    rng: &mut R,
) -> [BigInt; 3] {
    let coeff = uniform_scalar(&GROUP_ORDER, rng);
    [1u32, 2, 3].map(|party| {
        let v = secret + &coeff * BigInt::from(party);
        v.mod_floor(&GROUP_ORDER)
    })
}

/// Splits a vector into three extended shares bound to the blinding `r`.
///
/// Fails with [`SealError::UnexpectedSharingCondition`] if any element's
/// carry signature falls outside the fixed table; that indicates a value or
/// encoding defect and is fatal for the input.
pub fn split_hiding<R: RngCore + CryptoRng>(
    values: &[BigInt],
    r: &BigInt,
    rng: &mut R,
) -> Result<[ExtendedShare; 3], SealError> {
    let n = values.len();
    let mut parts = [1u32, 2, 3].map(|party| ExtendedShare {
        party,
        values: Vec::with_capacity(2 * n + 1),
    });

    let mut hidden = vec![Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n)];
    for value in values {
        check_range(value)?;
        let coeff = uniform_scalar(&MPC_PRIME, rng);
        // Residues in [0, P); poly_eval reduces the possibly negative value.
        let shares: Vec<BigInt> = (1u32..=3)
            .map(|party| poly_eval(&reduce(value), &coeff, party))
            .collect();

        let negative = value.sign() == Sign::Minus;
        let quotients = [
            quotient(&shares[0] * 2 - &shares[1], negative)?,
            quotient(&shares[1] * 3 - &shares[2] * 2, negative)?,
            quotient(&shares[0] * 3 - &shares[2], negative)?,
        ];
        let signature = CarrySignature::classify(quotients)
            .ok_or(SealError::UnexpectedSharingCondition)?;
        let offsets = signature.offsets();

        let mask = uniform_scalar(&GROUP_ORDER, rng);
        for (i, part) in parts.iter_mut().enumerate() {
            part.values.push(shares[i].clone());
            let entry = &mask * BigInt::from(part.party) + BigInt::from(offsets[i]);
            hidden[i].push(entry.mod_floor(&GROUP_ORDER));
        }
    }

    for (i, part) in parts.iter_mut().enumerate() {
        part.values.append(&mut hidden[i]);
    }
    let blinding_shares = share_in_group(r, rng);
    for (part, entry) in parts.iter_mut().zip(blinding_shares) {
        part.values.push(entry);
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{uniform_range_vector, MPC_PRIME_HALF};
    use crate::sharing::{join, Share};
    use num_bigint::BigInt;
    use rand::rngs::OsRng;

    fn field_shares(parts: &[ExtendedShare; 3]) -> [Share; 3] {
        [0, 1, 2].map(|i| Share {
            party: parts[i].party,
            values: parts[i].field_half().to_vec(),
        })
    }

    #[test]
    fn extended_layout() {
        let mut rng = OsRng;
        let values = vec![BigInt::from(4), BigInt::from(-11), BigInt::from(0)];
        let r = BigInt::from(77);
        let parts = split_hiding(&values, &r, &mut rng).unwrap();
        for part in &parts {
            assert_eq!(part.values.len(), 7);
            assert_eq!(part.element_count(), 3);
        }
    }

    #[test]
    fn field_half_joins_back() {
        let mut rng = OsRng;
        let low = -&*MPC_PRIME_HALF;
        let values = uniform_range_vector(50, &low, &MPC_PRIME_HALF, &mut rng);
        let r = uniform_scalar(&GROUP_ORDER, &mut rng);
        let parts = split_hiding(&values, &r, &mut rng).unwrap();
        assert_eq!(join(&field_shares(&parts)).unwrap(), values);
    }

    #[test]
    fn blinding_share_reconstructs() {
        let mut rng = OsRng;
        let values = vec![BigInt::from(1)];
        let r = uniform_scalar(&GROUP_ORDER, &mut rng);
        let parts = split_hiding(&values, &r, &mut rng).unwrap();
        let b1 = parts[0].blinding();
        let b2 = parts[1].blinding();
        let joined = (b1 * 2i32 - b2).mod_floor(&GROUP_ORDER);
        assert_eq!(joined, r);
    }

    #[test]
    fn boundary_values_classify() {
        let mut rng = OsRng;
        let values = vec![
            MPC_PRIME_HALF.clone(),
            -&*MPC_PRIME_HALF,
            BigInt::from(0),
            BigInt::from(1),
            BigInt::from(-1),
        ];
        let r = BigInt::from(5);
        // Repeat so every randomly drawn coefficient regime is exercised.
        for _ in 0..64 {
            assert!(split_hiding(&values, &r, &mut rng).is_ok());
        }
    }

    #[test]
    fn out_of_range_rejected() {
        let mut rng = OsRng;
        let values = vec![&*MPC_PRIME_HALF + 1];
        assert!(matches!(
            split_hiding(&values, &BigInt::from(0), &mut rng),
            Err(SealError::ValueOutOfRange)
        ));
    }
}
