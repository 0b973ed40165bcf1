//! Signature production: SHA-256 digest, then RSASSA-PKCS1-v1_5.
//!
//! PKCS#1 v1.5 signing is deterministic: the same bytes and key always yield
//! the same signature.

use std::fmt;

use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer as _};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use tracing::debug;

use crate::canonical::{canonicalize, CanonicalBytes};
use crate::error::{Error, Result};
use crate::payload::Payload;
use crate::signature::Signature;

/// Signs canonical bytes with a private key.
///
/// Obtained from [`crate::KeyStore::signer`]; the private key never leaves it.
#[derive(Clone)]
pub struct Signer {
    key: SigningKey<Sha256>,
}

impl Signer {
    pub(crate) fn new(private_key: &RsaPrivateKey) -> Self {
        Self {
            key: SigningKey::<Sha256>::new(private_key.clone()),
        }
    }

    /// Sign canonical bytes.
    pub fn sign(&self, bytes: &CanonicalBytes) -> Result<Signature> {
        let signature = self
            .key
            .try_sign(bytes.as_bytes())
            .map_err(|e| Error::Signing(e.to_string()))?;
        let signature = Signature::from_bytes(signature.to_vec());
        debug!(len = bytes.len(), "signed canonical bytes");
        Ok(signature)
    }

    /// Canonicalize a payload and sign the result.
    pub fn sign_payload(&self, payload: &Payload) -> Result<Signature> {
        self.sign(&canonicalize(payload))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Signer(rsa-pkcs1v15-sha256)")
    }
}
