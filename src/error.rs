//! Error taxonomy shared by every layer of the crate.
//!
//! Integrity violations are always surfaced, never silently recovered;
//! signature and proof checks that merely fail return `Ok(false)` from their
//! operations and reserve these variants for hard failures.

use thiserror::Error;

/// Errors reported by sharing, commitment, signing and proving operations.
#[derive(Debug, Error)]
pub enum SealError {
    #[error("input value exceeds the signed field bound")]
    /// An input lies outside (-P/2, P/2]; the caller must not retry with the
    /// same input.
    ValueOutOfRange,
    #[error("vector shape mismatch: {0}")]
    /// Vector lengths or column arity do not line up.
    ShapeMismatch(String),
    #[error("joining failed, inconsistent shares")]
    /// The redundant reconstruction equations disagree; at least one share
    /// is corrupted or mismatched.
    InconsistentShares,
    #[error("commitments do not match")]
    /// Homomorphic reconstruction or recomputation of a commitment
    /// disagrees with the stored value.
    CommitmentMismatch,
    #[error("share commitment does not match the published value")]
    /// A party's own share commitment differs from the published per-party
    /// commitment.
    ShareCommitmentMismatch,
    #[error("unexpected condition while splitting the data")]
    /// The carry signature of an element is outside the fixed table; this
    /// signals a value or encoding defect, not a recoverable condition.
    UnexpectedSharingCondition,
    #[error("data already signed")]
    /// The input carries a signature block; sign a fresh copy instead.
    AlreadySigned,
    #[error("signer public keys do not match")]
    /// The bundle's embedded public key differs from the caller's.
    KeyMismatch,
    #[error("bundle is redacted, private blinding values are unavailable")]
    /// An operation that needs the signer's blinding values was handed a
    /// public view.
    RedactedBundle,
    #[error("decode error: {0}")]
    /// Byte, hex, base64, JSON or curve-point decoding failure.
    Decode(String),
    #[error("io error: {0}")]
    /// Underlying filesystem failure in the file interfaces.
    Io(String),
    #[error("proving backend error: {0}")]
    /// The injected proof system reported a failure.
    Backend(String),
}
