use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json,
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::config::ProxyConfig;
use crate::encoding::{canonicalize, canonicalize_raw};
use crate::error::ProxyError;
use crate::model::{
    ApiResponse, MineQueryRequest, MineQueryResponse, MineShareRequest, MineShareResponse,
    PayRequest, PayResponse, ReceiptFilters, ReceiptRequest, ReceiptResponse,
};
use crate::signing::{
    Endpoint, HmacSha256Signer, NonceSource, RandomNonce, RequestSigner, SignedRequest,
    unix_timestamp,
};

/// A decoded backend response, re-emitted with the backend's status code.
#[derive(Debug)]
pub struct Relayed<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T: Serialize> IntoResponse for Relayed<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Signs inbound requests and either turns them into a redirect URL or
/// forwards them to the backend.
pub struct SigningProxy {
    config: ProxyConfig,
    signer: Arc<dyn RequestSigner>,
    nonces: Arc<dyn NonceSource>,
    http: reqwest::Client,
}

impl SigningProxy {
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let signer = HmacSha256Signer::new(config.credentials.secret())?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("building backend HTTP client")?;
        Ok(Self {
            config,
            signer: Arc::new(signer),
            nonces: Arc::new(RandomNonce),
            http,
        })
    }

    pub fn with_nonce_source(mut self, nonces: Arc<dyn NonceSource>) -> Self {
        self.nonces = nonces;
        self
    }

    /// Signs `canonical_body` for `endpoint` with a fresh nonce and the
    /// current time.
    pub fn sign(&self, endpoint: &Endpoint, canonical_body: String) -> SignedRequest {
        let signed = SignedRequest::sign(
            self.signer.as_ref(),
            endpoint.method.clone(),
            endpoint.path,
            self.nonces.next_nonce(),
            unix_timestamp(),
            canonical_body,
        );
        info!(
            endpoint = endpoint.name,
            mode = ?endpoint.mode,
            method = %signed.method(),
            path = signed.path(),
            nonce = signed.nonce(),
            timestamp = signed.timestamp(),
            body_len = signed.canonical_body().len(),
            "signed request"
        );
        debug!(payload = %signed.payload(), signature = signed.signature(), "signing payload");
        signed
    }

    /// Frontend URL carrying the signature and the base64url body.
    pub fn redirect_url(&self, signed: &SignedRequest, serialized: &[u8]) -> Url {
        let mut url = self.config.frontend_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", self.config.credentials.api_key())
            .append_pair("sign", signed.signature())
            .append_pair("nonce", signed.nonce())
            .append_pair("timestamp", signed.timestamp())
            .append_pair("body", &URL_SAFE_NO_PAD.encode(serialized));
        url
    }

    pub fn pay(&self, request: &PayRequest) -> Result<PayResponse, ProxyError> {
        let body = canonicalize(request).map_err(|e| ProxyError::Binding(format!("{e:#}")))?;
        let signed = self.sign(&Endpoint::PAY, body.canonical);
        let url = self.redirect_url(&signed, &body.serialized);
        info!(url = %url, "built pay redirect");
        Ok(PayResponse {
            url: url.to_string(),
        })
    }

    /// Receipt lookups sign and forward the raw inbound body untouched.
    /// Filters bind from `query` first, then from the body, which wins
    /// field by field.
    pub async fn receipt(
        &self,
        query: Option<&str>,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<Relayed<ReceiptResponse>, ProxyError> {
        let mut filters: ReceiptFilters = bind_form(query.unwrap_or_default().as_bytes())?;
        if !body.is_empty() {
            filters = filters.overlay(bind_body(content_type, &body)?);
        }
        let request = ReceiptRequest::from(filters);
        let canonical = canonicalize_raw(&body);
        self.forward(&Endpoint::RECEIPT, canonical, body, request.query_params())
            .await
    }

    pub async fn mine_query(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<Relayed<MineQueryResponse>, ProxyError> {
        let request: MineQueryRequest = bind_body(content_type, body)?;
        self.forward_json(&Endpoint::MINE_QUERY, &request).await
    }

    pub async fn mine_share(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<Relayed<MineShareResponse>, ProxyError> {
        let request: MineShareRequest = bind_body(content_type, body)?;
        self.forward_json(&Endpoint::MINE_SHARE, &request).await
    }

    async fn forward_json<Req, T>(
        &self,
        endpoint: &Endpoint,
        request: &Req,
    ) -> Result<Relayed<ApiResponse<T>>, ProxyError>
    where
        Req: Serialize,
        T: DeserializeOwned,
    {
        let body = canonicalize(request).map_err(|e| ProxyError::Binding(format!("{e:#}")))?;
        self.forward(endpoint, body.canonical, Bytes::from(body.serialized), Vec::new())
            .await
    }

    async fn forward<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        canonical_body: String,
        body: Bytes,
        query: Vec<(&'static str, String)>,
    ) -> Result<Relayed<ApiResponse<T>>, ProxyError> {
        let signed = self.sign(endpoint, canonical_body);
        let url = self.config.backend_url(endpoint.path);

        let mut request = self.http.request(endpoint.method.clone(), &url);
        for (name, value) in signed.headers(self.config.credentials.api_key()) {
            request = request.header(name, value);
        }
        if !query.is_empty() {
            request = request.query(&query);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(endpoint = endpoint.name, error = %e, "backend request failed");
            ProxyError::Transport(e.to_string())
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!(endpoint = endpoint.name, error = %e, "reading backend response failed");
            ProxyError::Transport(e.to_string())
        })?;

        let body = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(endpoint = endpoint.name, %status, error = %e, "undecodable backend response");
            ProxyError::BackendDecode(e.to_string())
        })?;
        info!(endpoint = endpoint.name, %status, "relaying backend response");
        Ok(Relayed { status, body })
    }
}

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decodes an inbound body according to its content type. Form-encoded
/// bodies bind field by field; anything else is read as JSON.
pub fn bind_body<T: DeserializeOwned>(content_type: Option<&str>, body: &[u8]) -> Result<T, ProxyError> {
    let is_form = content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE));
    if is_form {
        bind_form(body)
    } else {
        bind_json(body)
    }
}

/// Decodes an inbound JSON body, mapping failures to a 400.
pub fn bind_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProxyError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "rejecting request body");
        ProxyError::Binding(e.to_string())
    })
}

fn bind_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProxyError> {
    serde_urlencoded::from_bytes(body).map_err(|e| {
        warn!(error = %e, "rejecting form fields");
        ProxyError::Binding(e.to_string())
    })
}
