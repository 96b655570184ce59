mod signer;
mod hmac_sha256;
mod nonce;
mod request;

pub use signer::RequestSigner;
pub use hmac_sha256::HmacSha256Signer;
pub use nonce::{NonceSource, RandomNonce, FixedNonce, format_nonce};
pub use request::{
    Endpoint, ProxyMode, SignedRequest, unix_timestamp,
    HEADER_API_KEY, HEADER_API_SIGN, HEADER_API_NONCE, HEADER_API_TIMESTAMP, CONTENT_TYPE_JSON,
};
