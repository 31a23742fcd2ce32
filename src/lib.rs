#![deny(missing_docs)]

//! # share_seal
//!
//! **share_seal** lets a data owner split a numeric dataset into three
//! secret shares, bind the dataset to a publicly verifiable homomorphic
//! commitment, sign that commitment, and later prove — in zero knowledge —
//! that each party's share is consistent with the signed commitment,
//! without any party learning the full dataset or the signer's private
//! blinding values.
//!
//! ## Features
//!
//! * **Verifiable secret sharing** over a fixed ~128-bit prime: the
//!   [`sharing`](sharing/index.html) module splits a vector into three
//!   shares of a degree-1 polynomial and rejoins them with redundant
//!   consistency checks that deterministically detect any single corrupted
//!   share.
//! * **Hidden verification channel**: the [`hiding`](hiding/index.html)
//!   module shares the carry-offset signatures of every element through the
//!   fixed table in [`carry`](carry/index.html), so commitments over shares
//!   recombine without revealing values or signs.
//! * **Homomorphic commitments** in two curve groups: dataset and
//!   per-share commitments on secp256r1 ([`commit`](commit/index.html))
//!   and a Pedersen digest commitment on the embedded Edwards curve
//!   ([`pedersen`](pedersen/index.html)).
//! * **Signature/proof binding**: a MiMC-challenge EdDSA signature
//!   ([`eddsa`](eddsa/index.html)) over the digest commitment, a
//!   backend-agnostic constraint circuit ([`circuit`](circuit/index.html))
//!   and a Groth16 default backend ([`backend`](backend/index.html)).
//! * **End-to-end orchestration** in [`protocol`](protocol/index.html) and
//!   line-oriented artifact formats in [`files`](files/index.html).
//!
//! ## Usage
//!
//! Splitting and rejoining a vector:
//!
//! ```rust
//! use num_bigint::BigInt;
//! use rand::rngs::OsRng;
//! use share_seal::{join, split};
//!
//! let values = vec![BigInt::from(4), BigInt::from(-17), BigInt::from(0)];
//! let shares = split(&values, &mut OsRng).unwrap();
//! assert_eq!(join(&shares).unwrap(), values);
//! ```
//!
//! The full commit → sign → split → prove → verify pipeline is driven by
//! [`sign_dataset`], [`split_and_prove`] and [`verify_with_proof`], with
//! the proving backend injected through the [`ProofSystem`] trait.

pub mod backend;
pub mod carry;
pub mod circuit;
pub mod commit;
pub mod curve;
mod error;
pub mod eddsa;
pub mod field;
pub mod files;
pub mod hiding;
pub mod mimc;
pub mod pedersen;
pub mod protocol;
pub mod sharing;
pub mod sign;

pub use backend::{Groth16Backend, ProofKeys, ProofSystem};
pub use carry::CarrySignature;
pub use circuit::BindingCircuit;
pub use commit::{
    commit_dataset, commit_share, commit_with_blinding, join_commitments, CommitKey, Commitment,
};
pub use error::SealError;
pub use eddsa::{Signature, SigningKey};
pub use field::{MPC_PRIME, MPC_PRIME_HALF};
pub use files::{
    parse_signed_text, read_auth_text, read_share_text, render_auth_file, render_share_file,
    render_signed_text, EncryptedShareRecord, ShareCipher, SignedBlock,
};
pub use hiding::{split_hiding, ExtendedShare};
pub use pedersen::{pedersen_commit, PedersenCommitment};
pub use protocol::{split_and_prove, verify_with_proof, AuthProof};
pub use sharing::{join, join_lossy, split, DatasetVector, Share};
pub use sign::{sign_dataset, verify_dataset, PublicSignatureBundle, SignatureBundle};
