//! Arithmetic in the fixed MPC prime field.
//!
//! Every dataset value is an integer modulo `P = 2^128 + 51`.  The canonical
//! signed range is `(-P/2, P/2]`: callers hand in signed integers, residues
//! are stored in `[0, P)`, and reconstruction maps residues back to the
//! signed range.  The modulus does not fit a `u128`, so values are carried
//! as arbitrary-precision integers.

use crate::error::SealError;
use num_bigint::{BigInt, RandBigInt, Sign};
use num_traits::Zero;
use once_cell::sync::Lazy;
use rand::{CryptoRng, RngCore};

/// The fixed sharing modulus `P = 2^128 + 51`.
pub static MPC_PRIME: Lazy<BigInt> = Lazy::new(|| {
    BigInt::parse_bytes(b"340282366920938463463374607431768211507", 10)
        .expect("modulus literal parses")
});

/// `P / 2`, the bound of the canonical signed range.
pub static MPC_PRIME_HALF: Lazy<BigInt> = Lazy::new(|| &*MPC_PRIME >> 1);

/// Checks that `value` lies within the signed range `(-P/2, P/2]`.
pub fn check_range(value: &BigInt) -> Result<(), SealError> {
    if value.magnitude() > MPC_PRIME_HALF.magnitude() {
        return Err(SealError::ValueOutOfRange);
    }
    Ok(())
}

/// Maps a signed value into its residue in `[0, P)`.
///
/// Rejects values outside the signed range instead of wrapping them.
pub fn normalize(value: &BigInt) -> Result<BigInt, SealError> {
    check_range(value)?;
    if value.sign() == Sign::Minus {
        Ok(&*MPC_PRIME + value)
    } else {
        Ok(value.clone())
    }
}

/// Maps a residue in `[0, P)` back to the canonical signed range.
pub fn denormalize(residue: BigInt) -> BigInt {
    if residue > *MPC_PRIME_HALF {
        residue - &*MPC_PRIME
    } else {
        residue
    }
}

/// Reduces an arbitrary integer into `[0, P)`.
pub fn reduce(value: &BigInt) -> BigInt {
    let m = value % &*MPC_PRIME;
    if m.sign() == Sign::Minus {
        m + &*MPC_PRIME
    } else {
        m
    }
}

/// Draws `n` uniform integers in `[0, max)` from a cryptographically secure
/// source.
pub fn uniform_vector<R: RngCore + CryptoRng>(n: usize, max: &BigInt, rng: &mut R) -> Vec<BigInt> {
    let zero = BigInt::zero();
    (0..n).map(|_| rng.gen_bigint_range(&zero, max)).collect()
}

/// Draws `n` uniform integers in `[min, max)`.
pub fn uniform_range_vector<R: RngCore + CryptoRng>(
    n: usize,
    min: &BigInt,
    max: &BigInt,
    rng: &mut R,
) -> Vec<BigInt> {
    (0..n).map(|_| rng.gen_bigint_range(min, max)).collect()
}

/// Draws one uniform integer in `[0, max)`.
pub fn uniform_scalar<R: RngCore + CryptoRng>(max: &BigInt, rng: &mut R) -> BigInt {
    rng.gen_bigint_range(&BigInt::zero(), max)
}

/// Evaluates the degree-1 polynomial `secret + coeff * party mod P`.
pub(crate) fn poly_eval(secret: &BigInt, coeff: &BigInt, party: u32) -> BigInt {
    reduce(&(secret + coeff * BigInt::from(party)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_traits::One;

    #[test]
    fn prime_constant_shape() {
        // P = 2^128 + 51.
        let expected = (BigInt::one() << 128) + BigInt::from(51);
        assert_eq!(*MPC_PRIME, expected);
        assert_eq!(*MPC_PRIME_HALF, expected >> 1);
    }

    #[test]
    fn normalize_roundtrip() {
        for v in [-7i64, -1, 0, 1, 42] {
            let value = BigInt::from(v);
            let residue = normalize(&value).unwrap();
            assert!(residue.sign() != Sign::Minus);
            assert_eq!(denormalize(residue), value);
        }
    }

    #[test]
    fn normalize_rejects_oversized() {
        let too_big = &*MPC_PRIME_HALF + 1;
        assert!(matches!(
            normalize(&too_big),
            Err(SealError::ValueOutOfRange)
        ));
        assert!(matches!(
            normalize(&(-&too_big)),
            Err(SealError::ValueOutOfRange)
        ));
    }

    #[test]
    fn bounds_are_legal() {
        assert!(normalize(&MPC_PRIME_HALF.clone()).is_ok());
        assert!(normalize(&(-&*MPC_PRIME_HALF)).is_ok());
    }

    #[test]
    fn reduce_handles_negatives() {
        let reduced = reduce(&BigInt::from(-1));
        assert_eq!(reduced, &*MPC_PRIME - 1);
        assert_eq!(reduce(&MPC_PRIME), BigInt::from(0));
    }
}
