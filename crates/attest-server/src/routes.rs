//! HTTP routes: signed data, public key distribution, and verification.
//!
//! | Method | Path                  | Response                                   |
//! |--------|-----------------------|--------------------------------------------|
//! | GET    | `/data`               | `{ data, signature }`                      |
//! | GET    | `/public-key`         | PEM text                                   |
//! | POST   | `/validate-signature` | `{ valid, message }` (400 if malformed)    |
//! | GET    | `/health`             | `{ status, fingerprint }`                  |

use std::sync::Arc;

use attest_core::{
    KeyStore, Payload, SignedPayload, Signer, VerificationOutcome, VerificationRequest,
};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::error::ApiError;

/// State shared by all handlers. Immutable; cloned per request.
#[derive(Clone)]
pub struct AppState {
    keys: Arc<KeyStore>,
    signer: Arc<Signer>,
    data: Arc<Payload>,
}

impl AppState {
    /// Bind the key pair and the served payload.
    pub fn new(keys: Arc<KeyStore>, data: Payload) -> Self {
        let signer = Arc::new(keys.signer());
        Self {
            keys,
            signer,
            data: Arc::new(data),
        }
    }

    /// The key pair every handler uses.
    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }
}

/// Build the router.
pub fn router(state: AppState, permissive_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/data", get(signed_data))
        .route("/public-key", get(public_key))
        .route("/validate-signature", post(validate_signature))
        .route("/health", get(health));

    if permissive_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn signed_data(State(state): State<AppState>) -> Result<Json<SignedPayload>, ApiError> {
    let signed = SignedPayload::sign(state.data.as_ref().clone(), &state.signer)?;
    Ok(Json(signed))
}

async fn public_key(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.keys.export_public().to_owned(),
    )
}

async fn validate_signature(body: Bytes) -> (StatusCode, Json<VerificationOutcome>) {
    match VerificationRequest::from_json(&body) {
        Ok(request) => {
            let valid = request.verify();
            debug!(valid, "verification request");
            (StatusCode::OK, Json(VerificationOutcome::from_verdict(valid)))
        }
        Err(e) => {
            warn!(error = %e, "rejected verification request");
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(VerificationOutcome::rejected(&e)))
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "fingerprint": state.keys.fingerprint(),
    }))
}
