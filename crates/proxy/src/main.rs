use std::time::Duration;

use clap::Parser;
use signing_proxy::{AppState, Credentials, ProxyConfig, SigningProxy, run};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
struct Args {
    #[clap(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,
    #[clap(long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Public API key sent as `BG-API-KEY` / `key`.
    #[clap(long, env = "API_KEY")]
    api_key: String,
    /// Shared HMAC secret. Never logged.
    #[clap(long, env = "API_SECRET", hide_env_values = true)]
    api_secret: String,

    #[clap(long, env = "BACKEND_ENDPOINT")]
    backend_endpoint: String,
    #[clap(long, env = "FRONTEND_ENDPOINT")]
    frontend_endpoint: String,

    /// Upper bound for a single backend call.
    #[clap(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    request_timeout_secs: u64,

    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("signing_proxy={},info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProxyConfig::new(
        Credentials::new(args.api_key, args.api_secret),
        &args.backend_endpoint,
        &args.frontend_endpoint,
    )?
    .with_request_timeout(Duration::from_secs(args.request_timeout_secs));
    config.validate()?;

    info!(
        backend = %config.backend_endpoint,
        frontend = %config.frontend_endpoint,
        timeout_secs = args.request_timeout_secs,
        "starting signing proxy"
    );

    let proxy = SigningProxy::new(config)?;
    run(&args.host, args.port, AppState::new(proxy)).await
}
