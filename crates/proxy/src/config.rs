//! Process configuration, built once at startup and shared read-only.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Public API key and shared signing secret.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub credentials: Credentials,
    /// Base URL the forward flow sends signed requests to.
    pub backend_endpoint: Url,
    /// Base URL the pay flow's redirect points at.
    pub frontend_endpoint: Url,
    pub request_timeout: Duration,
}

impl ProxyConfig {
    pub fn new(credentials: Credentials, backend_endpoint: &str, frontend_endpoint: &str) -> Result<Self> {
        let config = Self {
            credentials,
            backend_endpoint: parse_backend_endpoint(backend_endpoint)?,
            frontend_endpoint: parse_endpoint("frontend endpoint", frontend_endpoint)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.credentials.api_key.trim().is_empty() {
            bail!("API key must not be empty");
        }
        if self.credentials.secret.is_empty() {
            bail!("API secret must not be empty");
        }
        if self.request_timeout.is_zero() {
            bail!("request timeout must be greater than zero");
        }
        Ok(())
    }

    /// Full backend URL for `path`, joined by plain concatenation so a base
    /// path prefix is kept.
    pub fn backend_url(&self, path: &str) -> String {
        format!("{}{}", self.backend_endpoint.as_str().trim_end_matches('/'), path)
    }
}

/// Backend paths are appended as text, so the base must end at its path.
fn parse_backend_endpoint(raw: &str) -> Result<Url> {
    let url = parse_endpoint("backend endpoint", raw)?;
    if url.query().is_some() || url.fragment().is_some() {
        bail!("invalid backend endpoint: {raw:?} must not carry a query or fragment");
    }
    Ok(url)
}

fn parse_endpoint(name: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid {name}: {raw:?}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("invalid {name}: unsupported scheme {other:?}"),
    }
}
