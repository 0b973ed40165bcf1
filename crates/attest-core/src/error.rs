//! Error types for attestation operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while provisioning keys, signing, or verifying.
///
/// A signature that simply does not match is *not* an error: verification
/// reports it as `false`. Everything here is either a misconfiguration or
/// malformed input.
#[derive(Debug, Error)]
pub enum Error {
    /// A key file does not exist at the configured location.
    #[error("key not found: {}", path.display())]
    KeyNotFound { path: PathBuf },

    /// Key material could not be parsed, or the pair is inconsistent.
    #[error("malformed key: {0}")]
    KeyFormat(String),

    /// The signature is not decodable from its transport encoding.
    #[error("malformed signature: {0}")]
    SignatureFormat(String),

    /// The random source failed to produce a key pair.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// The private key failed to produce a signature.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The payload violates the accepted schema.
    #[error("malformed payload: {0}")]
    PayloadFormat(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error while reading or writing key files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by input supplied by the caller
    /// (as opposed to the local configuration or environment).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::KeyFormat(_) | Error::SignatureFormat(_) | Error::PayloadFormat(_)
        )
    }
}

/// Result type for attestation operations.
pub type Result<T> = std::result::Result<T, Error>;
