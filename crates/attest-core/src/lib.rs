//! # Attest Core
//!
//! Signed data attestation: a server signs the data it serves with an RSA
//! private key, and any party holding the matching public key can check that
//! the data is authentic without trusting the transport.
//!
//! This crate contains no networking. Apart from reading and writing the two
//! PEM key files, it is pure computation.
//!
//! ## Key Types
//!
//! - [`KeyStore`] - The immutable key pair, loaded or generated once at startup
//! - [`Payload`] - A validated JSON object to attest
//! - [`CanonicalBytes`] - The deterministic encoding that is actually signed
//! - [`Signer`] / [`Verifier`] - RSASSA-PKCS1-v1_5 over SHA-256
//! - [`SignedPayload`] / [`VerificationRequest`] - The wire protocol
//!
//! ## Canonicalization
//!
//! Payloads are encoded as sorted-key compact JSON. See [`canonical`] module.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use attest_core::{KeyStore, KeyStoreConfig, Payload, SignedPayload, Verifier};
//!
//! let keys = KeyStore::load(&KeyStoreConfig::in_dir("keys")).unwrap();
//! let signed = SignedPayload::sign(Payload::message("hello"), &keys.signer()).unwrap();
//!
//! // On the verifying side, with the distributed PEM text:
//! let verifier = Verifier::from_pem(keys.export_public()).unwrap();
//! assert!(signed.verify_with(&verifier));
//! ```

pub mod canonical;
pub mod config;
pub mod error;
pub mod keys;
pub mod payload;
pub mod protocol;
pub mod signature;
pub mod signer;
pub mod verifier;

#[cfg(test)]
mod test_support;

pub use canonical::{canonicalize, CanonicalBytes};
pub use config::KeyStoreConfig;
pub use error::{Error, Result};
pub use keys::KeyStore;
pub use payload::Payload;
pub use protocol::{
    SignedPayload, VerificationOutcome, VerificationRequest, VerificationRequestBody,
};
pub use signature::Signature;
pub use signer::Signer;
pub use verifier::{verify, Verifier};
