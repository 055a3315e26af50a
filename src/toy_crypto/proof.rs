use super::sha256_hex;

/// Number of hex characters of the digest that make up a proof.
pub const PROOF_LENGTH: usize = 16;

/// The only proof accepted for `ciphertext` submitted by `voter_id`:
/// the first 16 hex characters of `SHA256(voter_id + "|" + ciphertext)`.
pub fn expected_proof(voter_id: &str, ciphertext: &str) -> String {
    let mut digest = sha256_hex(&format!("{voter_id}|{ciphertext}"));
    digest.truncate(PROOF_LENGTH);
    digest
}

/// Check a submitted proof. Comparison is exact, so uppercase hex is rejected.
pub fn verify_proof(voter_id: &str, ciphertext: &str, proof: &str) -> bool {
    proof == expected_proof(voter_id, ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_is_bound_to_voter_and_ciphertext() {
        let proof = expected_proof("v2", "0x10");
        assert_eq!(proof.len(), PROOF_LENGTH);
        assert!(verify_proof("v2", "0x10", &proof));
        assert!(!verify_proof("v1", "0x10", &proof));
        assert!(!verify_proof("v2", "0x11", &proof));
        assert!(!verify_proof("v2", "0x10", &proof.to_uppercase()));
        assert!(!verify_proof("v2", "0x10", ""));
    }
}
