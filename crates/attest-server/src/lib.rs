//! # Attest Server
//!
//! HTTP binding for signed data attestation. The server loads its key pair
//! once at startup (failure aborts startup), then serves:
//!
//! - `GET /data` - the configured payload with its signature
//! - `GET /public-key` - the public key as PEM text
//! - `POST /validate-signature` - checks a `{ data, signature, publicKey }` bundle
//!
//! Both the data and public key routes read the same [`attest_core::KeyStore`]
//! instance for the lifetime of the process; nothing regenerates keys.
//!
//! The public key is served over the same unauthenticated channel as the
//! data. This does not protect against an on-path adversary that replaces
//! all three consistently.

pub mod commands;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use attest_core::KeyStore;
use tokio::net::TcpListener;
use tracing::info;

pub use commands::{ServeOverrides, Verdict};
pub use config::ServerConfig;
pub use error::{ApiError, Result, ServerError};
pub use routes::{router, AppState};

/// Load keys and bind the listener. Any failure here is fatal to startup.
pub async fn bind(config: &ServerConfig) -> Result<(TcpListener, AppState)> {
    config.validate()?;

    let keys = Arc::new(KeyStore::load(&config.keys)?);
    let state = AppState::new(keys, config.data.clone());

    let listener = TcpListener::bind(config.bind).await?;
    info!(
        addr = %listener.local_addr()?,
        fingerprint = %state.keys().fingerprint(),
        "listening"
    );
    Ok((listener, state))
}

/// Run the server until the shutdown future resolves.
pub async fn serve<F>(config: ServerConfig, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (listener, state) = bind(&config).await?;
    let app = router(state, config.permissive_cors);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}
