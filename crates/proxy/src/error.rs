use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures surfaced to the caller. Backend-reported errors are not here:
/// those are relayed with the backend's own status.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Invalid request body: {0}")]
    Binding(String),
    #[error("Backend request failed: {0}")]
    Transport(String),
    #[error("Invalid backend response: {0}")]
    BackendDecode(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Binding(_) | ProxyError::Transport(_) | ProxyError::BackendDecode(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

/// Trait implementation to convert this error into an axum http response
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
