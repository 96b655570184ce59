pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod proxy;
pub mod server;
pub mod signing;

pub use config::{Credentials, ProxyConfig};
pub use error::ProxyError;
pub use proxy::{Relayed, SigningProxy};
pub use server::{AppState, router, run};
pub use signing::{Endpoint, HmacSha256Signer, ProxyMode, RequestSigner, SignedRequest};
