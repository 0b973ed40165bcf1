//! The operations behind the `attest` command line.
//!
//! Exit codes: [`EXIT_AUTHENTIC`] for success, [`EXIT_NOT_AUTHENTIC`] when
//! `verify` rejects the signature, [`EXIT_ERROR`] for any error, including
//! malformed input.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use attest_core::{KeyStore, KeyStoreConfig, Payload, SignedPayload, Verifier};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Success, or a signature that verified.
pub const EXIT_AUTHENTIC: u8 = 0;

/// A well-formed signed document whose signature does not verify.
pub const EXIT_NOT_AUTHENTIC: u8 = 1;

/// Any error.
pub const EXIT_ERROR: u8 = 2;

/// Result of checking a signed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authentic,
    NotAuthentic,
}

impl Verdict {
    /// Process exit code for this verdict.
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Authentic => EXIT_AUTHENTIC,
            Verdict::NotAuthentic => EXIT_NOT_AUTHENTIC,
        }
    }
}

/// Map a command result to a process exit code.
pub fn exit_code(result: &Result<Verdict>) -> u8 {
    match result {
        Ok(verdict) => verdict.exit_code(),
        Err(_) => EXIT_ERROR,
    }
}

/// Generate and persist a key pair. Existing files are kept unless `force`.
pub fn keygen(key_dir: &Path, bits: usize, force: bool) -> Result<KeyStore> {
    let config = KeyStoreConfig::in_dir(key_dir)
        .key_size_bits(bits)
        .overwrite(force);
    Ok(KeyStore::generate(&config)?)
}

/// Sign a payload with the pair in `key_dir`.
pub fn sign(key_dir: &Path, payload: Payload) -> Result<SignedPayload> {
    let keys = KeyStore::load(&KeyStoreConfig::in_dir(key_dir))?;
    Ok(SignedPayload::sign(payload, &keys.signer())?)
}

/// Sign a payload and render the `{ data, signature }` line `attest sign` prints.
pub fn sign_to_json(key_dir: &Path, payload: Payload) -> Result<String> {
    let signed = sign(key_dir, payload)?;
    serde_json::to_string(&signed)
        .map_err(|e| ServerError::Config(format!("could not encode signed payload: {}", e)))
}

/// Check a saved `{ data, signature }` document against a PEM public key file.
///
/// A signature that does not match is `Ok(Verdict::NotAuthentic)`; unreadable
/// files and malformed documents, signatures, or keys are errors.
pub fn verify_signed_file(signed_file: &Path, public_key: &Path) -> Result<Verdict> {
    let text = read_input(signed_file)?;
    let signed: SignedPayload = serde_json::from_str(&text).map_err(|e| ServerError::Input {
        path: signed_file.to_path_buf(),
        reason: e.to_string(),
    })?;

    let pem = read_input(public_key)?;
    let verifier = Verifier::from_pem(&pem)?;

    if signed.verify_with(&verifier) {
        info!("signature is valid");
        Ok(Verdict::Authentic)
    } else {
        warn!("signature is invalid");
        Ok(Verdict::NotAuthentic)
    }
}

/// Payload from either inline JSON text or a JSON file.
pub fn payload_from_args(data: Option<&str>, data_file: Option<&Path>) -> Result<Payload> {
    match (data, data_file) {
        (Some(json), None) => Ok(Payload::from_json(json)?),
        (None, Some(path)) => read_payload_file(path),
        (Some(_), Some(_)) => Err(ServerError::Config(
            "--data and --data-file are mutually exclusive".into(),
        )),
        (None, None) => Err(ServerError::Config("either --data or --data-file is required".into())),
    }
}

/// Read and validate a payload file.
pub fn read_payload_file(path: &Path) -> Result<Payload> {
    let text = read_input(path)?;
    Payload::from_json(&text).map_err(|e| ServerError::Input {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Flags of `attest serve`. Each one that is set overrides the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ServeOverrides {
    pub config: Option<PathBuf>,
    pub key_dir: Option<PathBuf>,
    pub bind: Option<SocketAddr>,
    pub message: Option<String>,
    pub data_file: Option<PathBuf>,
    pub no_cors: bool,
}

impl ServeOverrides {
    /// Load the configuration file (or defaults), then apply the flags.
    pub fn resolve(&self) -> Result<ServerConfig> {
        if self.message.is_some() && self.data_file.is_some() {
            return Err(ServerError::Config(
                "--message and --data-file are mutually exclusive".into(),
            ));
        }

        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(key_dir) = &self.key_dir {
            config.keys.key_dir = key_dir.clone();
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(message) = &self.message {
            config.data = Payload::message(message.as_str());
        }
        if let Some(path) = &self.data_file {
            config.data = read_payload_file(path)?;
        }
        if self.no_cors {
            config.permissive_cors = false;
        }
        Ok(config)
    }
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ServerError::Input {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
