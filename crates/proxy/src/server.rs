use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::info;

use crate::error::ProxyError;
use crate::model::{MineQueryResponse, MineShareResponse, PayRequest, PayResponse, ReceiptResponse};
use crate::proxy::{Relayed, SigningProxy, bind_body};
use crate::signing::Endpoint;

#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<SigningProxy>,
}

impl AppState {
    pub fn new(proxy: SigningProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(|| async move { (StatusCode::OK, "Ok").into_response() }))
        .route(Endpoint::PAY.path, post(pay_handler))
        .route(Endpoint::RECEIPT.path, get(receipt_handler).post(receipt_handler))
        .route(Endpoint::MINE_QUERY.path, post(mine_query_handler))
        .route(Endpoint::MINE_SHARE.path, post(mine_share_handler))
        .with_state(state)
}

pub async fn run(host: &str, port: u16, state: AppState) -> Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    info!(addr = %listener.local_addr()?, "signing proxy listening");

    axum::serve(listener, router(state))
        .await
        .context("serving HTTP")?;

    Ok(())
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::CONTENT_TYPE).and_then(|value| value.to_str().ok())
}

async fn pay_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PayResponse>, ProxyError> {
    let request: PayRequest = bind_body(content_type(&headers), &body)?;
    Ok(Json(state.proxy.pay(&request)?))
}

async fn receipt_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Relayed<ReceiptResponse>, ProxyError> {
    state
        .proxy
        .receipt(query.as_deref(), content_type(&headers), body)
        .await
}

async fn mine_query_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Relayed<MineQueryResponse>, ProxyError> {
    state.proxy.mine_query(content_type(&headers), &body).await
}

async fn mine_share_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Relayed<MineShareResponse>, ProxyError> {
    state.proxy.mine_share(content_type(&headers), &body).await
}
