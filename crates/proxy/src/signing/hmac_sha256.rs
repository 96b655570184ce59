use anyhow::Result;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::signer::RequestSigner;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer keyed by the shared API secret.
///
/// The key schedule runs once at construction; each signature starts
/// from a clone of the keyed state.
pub struct HmacSha256Signer {
    mac: HmacSha256,
}

impl HmacSha256Signer {
    pub fn new(secret: &str) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid HMAC key: {e}"))?;
        Ok(Self { mac })
    }
}

impl RequestSigner for HmacSha256Signer {
    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    fn algorithm(&self) -> &str {
        "hmac-sha256"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAY_VECTOR: &str =
        "0cb5afdd83662b32238e41276efc6d6c19c02283de1b473f1d70baa711666db3";

    #[test]
    fn matches_known_vector() {
        let signer = HmacSha256Signer::new("s3cr3t").unwrap();
        let sig = signer.sign_hex(r#"POST/v1/faas/pay000000011700000000{"amount":100}"#);
        assert_eq!(sig, PAY_VECTOR);
    }

    #[test]
    fn deterministic_signing() {
        let signer = HmacSha256Signer::new("test-secret").unwrap();
        let sig1 = signer.sign(b"hello");
        let sig2 = signer.sign(b"hello");
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn different_secrets_produce_different_signatures() {
        let signer_a = HmacSha256Signer::new("secret-a").unwrap();
        let signer_b = HmacSha256Signer::new("secret-b").unwrap();
        assert_ne!(signer_a.sign(b"data"), signer_b.sign(b"data"));
    }

    #[test]
    fn hex_signature_is_64_lowercase_chars() {
        let signer = HmacSha256Signer::new("test-secret").unwrap();
        let sig = signer.sign_hex("data");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn empty_secret_is_accepted() {
        let signer = HmacSha256Signer::new("").unwrap();
        assert_eq!(signer.sign(b"data").len(), 32);
    }

    #[test]
    fn algorithm_is_hmac_sha256() {
        let signer = HmacSha256Signer::new("test-secret").unwrap();
        assert_eq!(signer.algorithm(), "hmac-sha256");
    }
}
