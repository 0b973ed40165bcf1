//! Signature verification against a supplied public key.
//!
//! A mismatch is a normal outcome and returns `false`. Only input that
//! cannot be interpreted at all (a malformed key or signature encoding) is an
//! error, so callers can tell "not authentic" apart from "bad request".

use std::fmt;

use rsa::pkcs1v15::{Signature as RsaSignature, VerifyingKey};
use rsa::signature::Verifier as _;
use rsa::RsaPublicKey;
use sha2::Sha256;
use tracing::debug;

use crate::canonical::CanonicalBytes;
use crate::error::Result;
use crate::keys::parse_public_pem;
use crate::signature::Signature;

/// Verifies signatures with one public key.
#[derive(Clone)]
pub struct Verifier {
    public_key: RsaPublicKey,
    key: VerifyingKey<Sha256>,
}

impl Verifier {
    /// Create a verifier for a public key.
    pub fn new(public_key: RsaPublicKey) -> Self {
        let key = VerifyingKey::<Sha256>::new(public_key.clone());
        Self { public_key, key }
    }

    /// Create a verifier from PEM text (PKCS#1 or SPKI).
    ///
    /// Fails with [`crate::Error::KeyFormat`] if the key is structurally invalid.
    pub fn from_pem(pem: &str) -> Result<Self> {
        parse_public_pem(pem).map(Self::new)
    }

    /// The public key this verifier checks against.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Check a signature over canonical bytes.
    ///
    /// Returns `false` for tampered bytes, a tampered or truncated signature,
    /// or a signature made by a different key.
    pub fn verify(&self, bytes: &CanonicalBytes, signature: &Signature) -> bool {
        let signature = match RsaSignature::try_from(signature.as_bytes()) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        let valid = self.key.verify(bytes.as_bytes(), &signature).is_ok();
        debug!(valid, len = bytes.len(), "verified canonical bytes");
        valid
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::keys::fingerprint(&self.public_key) {
            Ok(fp) => write!(f, "Verifier({}...)", &fp[..16]),
            Err(_) => f.write_str("Verifier(<unencodable key>)"),
        }
    }
}

/// Verify a base64 signature over canonical bytes with a PEM public key.
///
/// Errors with [`crate::Error::KeyFormat`] or [`crate::Error::SignatureFormat`]
/// on malformed input; otherwise returns whether the signature is authentic.
pub fn verify(bytes: &CanonicalBytes, signature_b64: &str, public_key_pem: &str) -> Result<bool> {
    let verifier = Verifier::from_pem(public_key_pem)?;
    let signature = Signature::from_base64(signature_b64)?;
    Ok(verifier.verify(bytes, &signature))
}
