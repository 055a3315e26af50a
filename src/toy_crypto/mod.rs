//! Illustrative "cryptography" for encrypted ballots.
//!
//! Nothing in this module is secure. The arithmetic is kept exactly as the
//! ballot format defines it so that ciphertexts and proofs produced by other
//! clients keep verifying and combining the same way. Do not reuse any of it
//! behind a real security boundary.

pub mod homomorphic;
pub mod proof;

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of a UTF-8 string.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
