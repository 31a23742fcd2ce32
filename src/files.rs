//! Line-oriented external interfaces.
//!
//! Three artifacts cross the crate boundary as text: encrypted share files
//! (three JSON records, one per party, then a column-name line), signed
//! dataset blocks (rows, a blank separator, a metadata line, a JSON bundle
//! line), and auth-proof files (a share file plus one JSON artifact line).
//! Share encryption itself belongs to an external collaborator; the
//! [`ShareCipher`] seam carries the record format across that boundary.

use crate::error::SealError;
use crate::protocol::AuthProof;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One encrypted share record: wrapped symmetric key, IV and ciphertext,
/// each base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedShareRecord {
    /// Wrapped symmetric key for the recipient.
    pub key: String,
    /// Symmetric cipher IV.
    pub iv: String,
    /// Ciphertext of the serialized share vector.
    pub val: String,
}

/// Seam to the external share-at-rest encryption.
pub trait ShareCipher {
    /// Encrypts a serialized share vector for one recipient key.
    fn encrypt(
        &self,
        plaintext: &[u8],
        recipient_key: &[u8],
    ) -> Result<EncryptedShareRecord, SealError>;

    /// Decrypts one record with the recipient's key pair.
    fn decrypt(
        &self,
        record: &EncryptedShareRecord,
        public_key: &[u8],
        secret_key: &[u8],
    ) -> Result<Vec<u8>, SealError>;
}

/// Serializes a share vector as a JSON array of decimal strings.
pub fn share_payload(values: &[BigInt]) -> Result<Vec<u8>, SealError> {
    let decimals: Vec<String> = values.iter().map(|v| v.to_str_radix(10)).collect();
    serde_json::to_vec(&decimals).map_err(|err| SealError::Decode(err.to_string()))
}

/// Parses a share vector from its JSON payload.
pub fn share_from_payload(payload: &[u8]) -> Result<Vec<BigInt>, SealError> {
    let decimals: Vec<String> =
        serde_json::from_slice(payload).map_err(|err| SealError::Decode(err.to_string()))?;
    decimals
        .iter()
        .map(|d| {
            BigInt::parse_bytes(d.as_bytes(), 10)
                .ok_or_else(|| SealError::Decode(format!("invalid share value {d}")))
        })
        .collect()
}

/// Renders an encrypted share file: three records, line order = party
/// index, then the comma-joined column names.
pub fn render_share_file<C: ShareCipher>(
    shares: [&[BigInt]; 3],
    columns: &[String],
    recipient_keys: [&[u8]; 3],
    cipher: &C,
) -> Result<String, SealError> {
    let mut out = String::new();
    for (share, recipient) in shares.iter().zip(recipient_keys) {
        let record = cipher.encrypt(&share_payload(share)?, recipient)?;
        let line =
            serde_json::to_string(&record).map_err(|err| SealError::Decode(err.to_string()))?;
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&columns.join(","));
    out.push('\n');
    Ok(out)
}

/// Reads one party's share and the column names out of a share file.
pub fn read_share_text<C: ShareCipher>(
    text: &str,
    party: usize,
    public_key: &[u8],
    secret_key: &[u8],
    cipher: &C,
) -> Result<(Vec<BigInt>, Vec<String>), SealError> {
    if party >= 3 {
        return Err(SealError::ShapeMismatch(format!(
            "party index {party} out of range"
        )));
    }
    let mut lines = text.lines();
    let mut record_line = "";
    for i in 0..3 {
        let line = lines
            .next()
            .ok_or_else(|| SealError::Decode("truncated share file".into()))?;
        if i == party {
            record_line = line;
        }
    }
    let record: EncryptedShareRecord =
        serde_json::from_str(record_line).map_err(|err| SealError::Decode(err.to_string()))?;
    let payload = cipher.decrypt(&record, public_key, secret_key)?;
    let values = share_from_payload(&payload)?;
    let columns = lines
        .next()
        .ok_or_else(|| SealError::Decode("missing column line".into()))?
        .split(',')
        .map(str::to_string)
        .collect();
    Ok((values, columns))
}

/// A dataset text split into its rows, metadata line and signature line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBlock {
    /// The row section, verbatim; parsing cells is the CSV codec's job.
    pub rows: String,
    /// Free-text metadata line; empty when absent.
    pub metadata: String,
    /// JSON signature line, when the text is already signed.
    pub signature: Option<String>,
}

/// Splits a CSV-like text into rows, metadata and signature sections.
pub fn parse_signed_text(text: &str) -> SignedBlock {
    let lines: Vec<&str> = text.split('\n').collect();
    let blank = lines.iter().position(|line| line.is_empty());
    match blank {
        None => SignedBlock {
            rows: text.to_string(),
            metadata: String::new(),
            signature: None,
        },
        Some(i) => SignedBlock {
            rows: lines[..i].join("\n"),
            metadata: lines.get(i + 1).copied().unwrap_or("").to_string(),
            signature: lines
                .get(i + 2)
                .filter(|line| !line.is_empty())
                .map(|line| line.to_string()),
        },
    }
}

/// Renders a signed dataset block back into one text.
pub fn render_signed_text(block: &SignedBlock) -> String {
    let mut out = block.rows.clone();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&block.metadata);
    out.push('\n');
    if let Some(signature) = &block.signature {
        out.push_str(signature);
        out.push('\n');
    }
    out
}

/// Renders an auth-proof file: the encrypted share file followed by one
/// JSON artifact line.
pub fn render_auth_file<C: ShareCipher>(
    shares: [&[BigInt]; 3],
    columns: &[String],
    recipient_keys: [&[u8]; 3],
    cipher: &C,
    auth: &AuthProof,
) -> Result<String, SealError> {
    let mut out = render_share_file(shares, columns, recipient_keys, cipher)?;
    out.push_str(&auth.to_json_string()?);
    out.push('\n');
    Ok(out)
}

/// Extracts the artifact from an auth-proof file, skipping the share
/// records and column line.
pub fn read_auth_text(text: &str) -> Result<AuthProof, SealError> {
    let line = text
        .lines()
        .nth(4)
        .ok_or_else(|| SealError::Decode("truncated auth-proof file".into()))?;
    AuthProof::from_json_str(line)
}

/// Writes a rendered artifact to disk.
pub fn write_text_file<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), SealError> {
    fs::write(path, contents).map_err(|err| SealError::Io(err.to_string()))
}

/// Reads a rendered artifact from disk.
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String, SealError> {
    fs::read_to_string(path).map_err(|err| SealError::Io(err.to_string()))
}
