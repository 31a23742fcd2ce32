//! The fixed carry-signature table of the hidden verification channel.
//!
//! When a shared element is reconstructed, each of the three reconstruction
//! equations subtracts some small multiple of the modulus to land on the
//! canonical residue.  The triple of those integer quotients (adjusted by +1
//! for negative secrets) is the element's *carry signature*.  Exactly eight
//! signatures can occur for in-range inputs; each maps to the offset triple
//! that is secret-shared into the hidden half of an extended share.  The
//! mapping is a closed table: a miss signals a value or encoding defect.

/// One of the eight valid carry signatures of a shared element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarrySignature {
    /// Quotients `(0, 0, 0)`: no equation wrapped the modulus.
    Balanced,
    /// Quotients `(1, -1, 1)`.
    WrapOuterBorrowMid,
    /// Quotients `(-1, 1, -1)`.
    BorrowOuterWrapMid,
    /// Quotients `(0, -2, -1)`.
    BorrowMidHeavy,
    /// Quotients `(0, 2, 1)`.
    WrapMidHeavy,
    /// Quotients `(1, 1, 2)`.
    WrapAll,
    /// Quotients `(1, 3, 3)`.
    WrapSteep,
    /// Quotients `(2, 0, 3)`.
    WrapWide,
}

/// All eight table entries, in a fixed audit order.
pub const CARRY_TABLE: [CarrySignature; 8] = [
    CarrySignature::Balanced,
    CarrySignature::WrapOuterBorrowMid,
    CarrySignature::BorrowOuterWrapMid,
    CarrySignature::BorrowMidHeavy,
    CarrySignature::WrapMidHeavy,
    CarrySignature::WrapAll,
    CarrySignature::WrapSteep,
    CarrySignature::WrapWide,
];

impl CarrySignature {
    /// Classifies an adjusted quotient triple, or `None` for a signature
    /// outside the table.
    pub fn classify(quotients: [i64; 3]) -> Option<Self> {
        match quotients {
            [0, 0, 0] => Some(Self::Balanced),
            [1, -1, 1] => Some(Self::WrapOuterBorrowMid),
            [-1, 1, -1] => Some(Self::BorrowOuterWrapMid),
            [0, -2, -1] => Some(Self::BorrowMidHeavy),
            [0, 2, 1] => Some(Self::WrapMidHeavy),
            [1, 1, 2] => Some(Self::WrapAll),
            [1, 3, 3] => Some(Self::WrapSteep),
            [2, 0, 3] => Some(Self::WrapWide),
            _ => None,
        }
    }

    /// The quotient triple this signature stands for.
    pub fn quotients(self) -> [i64; 3] {
        match self {
            Self::Balanced => [0, 0, 0],
            Self::WrapOuterBorrowMid => [1, -1, 1],
            Self::BorrowOuterWrapMid => [-1, 1, -1],
            Self::BorrowMidHeavy => [0, -2, -1],
            Self::WrapMidHeavy => [0, 2, 1],
            Self::WrapAll => [1, 1, 2],
            Self::WrapSteep => [1, 3, 3],
            Self::WrapWide => [2, 0, 3],
        }
    }

    /// The per-party offset triple hidden into the verification channel.
    pub fn offsets(self) -> [i64; 3] {
        match self {
            Self::Balanced => [0, 0, 0],
            Self::WrapOuterBorrowMid => [0, 1, 1],
            Self::BorrowOuterWrapMid => [0, -1, -1],
            Self::BorrowMidHeavy => [0, 0, -1],
            Self::WrapMidHeavy => [0, 0, 1],
            Self::WrapAll => [-1, -1, -1],
            Self::WrapSteep => [-2, -3, -3],
            Self::WrapWide => [-1, 0, 0],
        }
    }
}
