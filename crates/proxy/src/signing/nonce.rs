use rand::RngCore;

/// Source of single-use request nonces.
pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> String;
}

/// Random 32-bit nonces drawn from the thread-local CSPRNG.
///
/// `thread_rng` is seeded from the OS once per thread, so requests issued
/// within the same second still get independent values.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn next_nonce(&self) -> String {
        format_nonce(rand::thread_rng().next_u32())
    }
}

/// Always returns the same nonce. Only useful for reproducible signatures.
#[derive(Debug, Clone)]
pub struct FixedNonce(String);

impl FixedNonce {
    pub fn new(nonce: impl Into<String>) -> Self {
        Self(nonce.into())
    }
}

impl NonceSource for FixedNonce {
    fn next_nonce(&self) -> String {
        self.0.clone()
    }
}

/// Zero-padded lowercase hex, always 8 characters.
pub fn format_nonce(value: u32) -> String {
    format!("{value:08x}")
}
