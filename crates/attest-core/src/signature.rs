//! Signature bytes and their base64 transport encoding.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// An RSASSA-PKCS1-v1_5 signature, transported as standard padded base64.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(pub Vec<u8>);

impl Signature {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encode for transport.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Decode from transport encoding.
    ///
    /// Surrounding whitespace is ignored. Anything else that is not strict
    /// padded base64, or that decodes to nothing, is [`Error::SignatureFormat`].
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(Error::SignatureFormat("signature is empty".into()));
        }
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| Error::SignatureFormat(format!("invalid base64: {}", e)))?;
        Ok(Self(bytes))
    }

    /// Length in bytes (equal to the modulus size for a well-formed signature).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the signature has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.to_base64();
        let shown = encoded.get(..16).unwrap_or(&encoded);
        write!(f, "Signature({}...)", shown)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Signature::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip() {
        let sig = Signature::from_bytes(vec![0xde, 0xad, 0xbe, 0xef, 0x00]);
        assert_eq!(sig.to_base64(), "3q2+7wA=");
        assert_eq!(Signature::from_base64("3q2+7wA=").unwrap(), sig);
        assert_eq!(Signature::from_base64("  3q2+7wA=\n").unwrap(), sig);
    }

    #[test]
    fn test_rejects_malformed_base64() {
        for bad in ["", "   ", "not base64!", "3q2+7wA", "3q2-7wA=", "====", "@@@@"] {
            assert!(
                matches!(Signature::from_base64(bad), Err(Error::SignatureFormat(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_serde_as_string() {
        let sig = Signature::from_bytes(vec![1, 2, 3]);
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, "\"AQID\"");
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);

        assert!(serde_json::from_str::<Signature>("\"%%%\"").is_err());
    }
}
