/// Trait for signing canonical request payloads.
///
/// Implementations are sync. Signing is CPU-bound and must not
/// branch on payload content.
pub trait RequestSigner: Send + Sync {
    /// Sign payload bytes. Returns raw MAC bytes.
    fn sign(&self, payload: &[u8]) -> Vec<u8>;

    /// Algorithm identifier string (e.g. "hmac-sha256").
    fn algorithm(&self) -> &str;

    /// Lowercase hex signature, as carried in `BG-API-SIGN` and `sign`.
    fn sign_hex(&self, payload: &str) -> String {
        hex::encode(self.sign(payload.as_bytes()))
    }
}
