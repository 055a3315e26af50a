use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::sha256_hex;

/// The fixed prime modulus `2^61 - 1`.
pub const MODULUS: u64 = (1 << 61) - 1;

fn modulus() -> BigUint {
    BigUint::from(MODULUS)
}

/// Parse a hex ciphertext, with or without a `0x` prefix.
pub fn parse_hex(input: &str) -> Result<BigUint> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "'{input}' is not a hex ciphertext"
        )));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| Error::InvalidArgument(format!("'{input}' is not a hex ciphertext")))
}

/// Encode as lowercase hex with a `0x` prefix and no padding.
pub fn to_hex(value: &BigUint) -> String {
    format!("{value:#x}")
}

/// Reduce modulo the fixed modulus. The result always fits in a `u64`.
fn reduce(value: &BigUint) -> u64 {
    // Unwrap safe: anything reduced mod a 61-bit modulus fits.
    (value % modulus()).to_u64().unwrap()
}

/// The key offset derived from a shared secret: `int(SHA256(secret)) mod P`.
pub fn keystream(secret: &str) -> u64 {
    // Unwrap safe: a hex digest always parses.
    let digest = BigUint::parse_bytes(sha256_hex(secret).as_bytes(), 16).unwrap();
    reduce(&digest)
}

/// Encrypt one plaintext by adding the keystream.
pub fn encrypt(plaintext: u64, secret: &str) -> String {
    let sum = (u128::from(plaintext) + u128::from(keystream(secret))) % u128::from(MODULUS);
    to_hex(&BigUint::from(sum))
}

/// Add ciphertexts together modulo `P`. The empty sum is `0x0`.
pub fn combine<S: AsRef<str>>(ciphertexts: &[S]) -> Result<String> {
    let mut total = BigUint::zero();
    for ciphertext in ciphertexts {
        total = (total + parse_hex(ciphertext.as_ref())?) % modulus();
    }
    Ok(to_hex(&total))
}

/// Decrypt by subtracting the keystream **once**.
///
/// This only recovers the plaintext sum when exactly one ciphertext was
/// combined, since every encryption adds its own key offset. It is kept this
/// way so existing clients see the same numbers; use [`decrypt_sum`] when the
/// number of combined ciphertexts is known.
pub fn decrypt(combined: &str, secret: &str) -> Result<u64> {
    decrypt_sum(combined, secret, 1)
}

/// Decrypt a sum of `count` ciphertexts by subtracting `count` key offsets.
pub fn decrypt_sum(combined: &str, secret: &str, count: u64) -> Result<u64> {
    let p = u128::from(MODULUS);
    let c = u128::from(reduce(&parse_hex(combined)?));
    let offset = u128::from(keystream(secret)) * u128::from(count % MODULUS) % p;
    Ok(((c + p - offset) % p) as u64)
}

/// A homomorphic tally request: ciphertexts to combine and an optional secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyRequest {
    pub ciphertexts: Vec<String>,
    #[serde(default)]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    pub combined_ciphertext: String,
    pub decrypted_sum_mod_p: Option<u64>,
}

/// Combine the ciphertexts, decrypting the result if a non-empty secret is given.
pub fn tally(request: &TallyRequest) -> Result<TallyResult> {
    let combined_ciphertext = combine(&request.ciphertexts)?;
    let decrypted_sum_mod_p = match request.secret.as_deref() {
        Some(secret) if !secret.is_empty() => Some(decrypt(&combined_ciphertext, secret)?),
        _ => None,
    };
    Ok(TallyResult {
        combined_ciphertext,
        decrypted_sum_mod_p,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "s3cr3t";

    #[test]
    fn combine_adds() {
        assert_eq!(combine(&["0x10", "0x20"]).unwrap(), "0x30");
        assert_eq!(combine(&["10", "0X20"]).unwrap(), "0x30");
        assert_eq!(combine::<&str>(&[]).unwrap(), "0x0");
    }

    #[test]
    fn combine_is_order_independent() {
        let ciphertexts = ["0x1fffffffffffffff", "0xdeadbeef", "0x1", "0xabcdef0123456789abcdef"];
        let forward = combine(&ciphertexts).unwrap();
        let mut reversed = ciphertexts;
        reversed.reverse();
        assert_eq!(forward, combine(&reversed).unwrap());
        assert_eq!(
            combine(&[ciphertexts[0], ciphertexts[3]]).unwrap(),
            combine(&[ciphertexts[3], ciphertexts[0]]).unwrap()
        );
    }

    #[test]
    fn combine_wraps_at_modulus() {
        let p = to_hex(&BigUint::from(MODULUS));
        assert_eq!(combine(&[p.as_str()]).unwrap(), "0x0");
        assert_eq!(combine(&[p.as_str(), "0x5"]).unwrap(), "0x5");
    }

    #[test]
    fn malformed_ciphertext() {
        assert!(matches!(combine(&["0xZZ"]), Err(Error::InvalidArgument(_))));
        assert!(matches!(combine(&["0x"]), Err(Error::InvalidArgument(_))));
        assert!(matches!(decrypt("", SECRET), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn keystream_matches_digest() {
        assert_eq!(keystream(SECRET), 1_312_442_599_838_259_800);
        assert_eq!(encrypt(5, SECRET), "0x1236bb9747731a5d");
    }

    #[test]
    fn single_ciphertext_round_trip() {
        let ciphertext = encrypt(42, SECRET);
        assert_eq!(decrypt(&ciphertext, SECRET).unwrap(), 42);
    }

    #[test]
    fn decrypt_subtracts_keystream_once() {
        let combined = combine(&[encrypt(5, SECRET), encrypt(7, SECRET)]).unwrap();
        assert_eq!(combined, "0x46d772e8ee634bd");
        // One key offset too many remains in the "sum".
        assert_eq!(decrypt(&combined, SECRET).unwrap(), 1_312_442_599_838_259_812);
        assert_eq!(decrypt_sum(&combined, SECRET, 2).unwrap(), 12);
    }

    #[test]
    fn tally_only_decrypts_with_secret() {
        let mut request = TallyRequest {
            ciphertexts: vec!["0x10".to_string(), "0x20".to_string()],
            secret: None,
        };
        let result = tally(&request).unwrap();
        assert_eq!(result.combined_ciphertext, "0x30");
        assert_eq!(result.decrypted_sum_mod_p, None);

        request.secret = Some(String::new());
        assert_eq!(tally(&request).unwrap().decrypted_sum_mod_p, None);

        request.secret = Some(SECRET.to_string());
        let expected = (0x30 + MODULUS - keystream(SECRET)) % MODULUS;
        assert_eq!(tally(&request).unwrap().decrypted_sum_mod_p, Some(expected));
    }
}
