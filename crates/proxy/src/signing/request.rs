use axum::http::Method;

use super::signer::RequestSigner;

pub const HEADER_API_KEY: &str = "BG-API-KEY";
pub const HEADER_API_SIGN: &str = "BG-API-SIGN";
pub const HEADER_API_NONCE: &str = "BG-API-NONCE";
pub const HEADER_API_TIMESTAMP: &str = "BG-API-TIMESTAMP";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

/// How a signature reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    /// Signature and body travel as query parameters of a URL handed back
    /// to the caller.
    Redirect,
    /// Signature travels as `BG-API-*` headers on a request this proxy
    /// sends itself.
    Forward,
}

/// A backend operation: the method and path that get signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub mode: ProxyMode,
}

impl Endpoint {
    pub const PAY: Endpoint = Endpoint {
        name: "pay",
        method: Method::POST,
        path: "/v1/faas/pay",
        mode: ProxyMode::Redirect,
    };

    pub const RECEIPT: Endpoint = Endpoint {
        name: "receipt",
        method: Method::GET,
        path: "/v1/faas/receipt",
        mode: ProxyMode::Forward,
    };

    pub const MINE_QUERY: Endpoint = Endpoint {
        name: "mine-query",
        method: Method::POST,
        path: "/v1/mine/query",
        mode: ProxyMode::Forward,
    };

    pub const MINE_SHARE: Endpoint = Endpoint {
        name: "mine-share",
        method: Method::POST,
        path: "/v1/mine/share",
        mode: ProxyMode::Forward,
    };
}

/// One signed outbound call. Built per inbound request and dropped after use.
///
/// Mutating any field after construction leaves `signature` stale; there
/// are no setters for that reason.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    method: Method,
    path: String,
    nonce: String,
    timestamp: String,
    canonical_body: String,
    signature: String,
}

impl SignedRequest {
    pub fn sign(
        signer: &dyn RequestSigner,
        method: Method,
        path: impl Into<String>,
        nonce: impl Into<String>,
        timestamp: impl Into<String>,
        canonical_body: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let nonce = nonce.into();
        let timestamp = timestamp.into();
        let canonical_body = canonical_body.into();
        let payload = signing_payload(&method, &path, &nonce, &timestamp, &canonical_body);
        let signature = signer.sign_hex(&payload);
        Self {
            method,
            path,
            nonce,
            timestamp,
            canonical_body,
            signature,
        }
    }

    /// The exact string the signature covers.
    pub fn payload(&self) -> String {
        signing_payload(
            &self.method,
            &self.path,
            &self.nonce,
            &self.timestamp,
            &self.canonical_body,
        )
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn canonical_body(&self) -> &str {
        &self.canonical_body
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Authentication headers for the forward flow, in send order.
    pub fn headers<'a>(&'a self, api_key: &'a str) -> Vec<(&'static str, &'a str)> {
        vec![
            (HEADER_API_KEY, api_key),
            (HEADER_API_SIGN, &self.signature),
            (HEADER_API_NONCE, &self.nonce),
            (HEADER_API_TIMESTAMP, &self.timestamp),
            ("Content-Type", CONTENT_TYPE_JSON),
        ]
    }
}

fn signing_payload(
    method: &Method,
    path: &str,
    nonce: &str,
    timestamp: &str,
    canonical_body: &str,
) -> String {
    format!("{method}{path}{nonce}{timestamp}{canonical_body}")
}

/// Current Unix time in whole seconds, as a decimal string.
pub fn unix_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}
