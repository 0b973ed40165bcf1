//! The signed payload protocol: what travels between signer and verifier.
//!
//! Signing side: `payload → canonicalize → sign → SignedPayload { data, signature }`.
//!
//! Verifying side, independent of transport:
//! 1. Obtain the public key (unauthenticated, see below)
//! 2. Obtain `{ data, signature }` as a unit
//! 3. Canonicalize `data` with the same algorithm
//! 4. Verify the signature over those bytes
//! 5. Trust `data` only if step 4 returned `true`
//!
//! The public key is distributed over the same channel as the data. An
//! on-path adversary can substitute data, signature, and key consistently;
//! there is no trust anchor in this protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::canonicalize;
use crate::error::{Error, Result};
use crate::payload::Payload;
use crate::signature::Signature;
use crate::signer::Signer;
use crate::verifier::Verifier;

/// Payload and signature, always transmitted together.
///
/// Wire form: `{ "data": <object>, "signature": <base64> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedPayload {
    pub data: Payload,
    pub signature: Signature,
}

impl SignedPayload {
    /// Canonicalize and sign a payload.
    pub fn sign(data: Payload, signer: &Signer) -> Result<Self> {
        let signature = signer.sign(&canonicalize(&data))?;
        Ok(Self { data, signature })
    }

    /// Run the verifying side of the protocol with a known key.
    pub fn verify_with(&self, verifier: &Verifier) -> bool {
        verifier.verify(&canonicalize(&self.data), &self.signature)
    }
}

/// The unvalidated wire body of a verification request.
///
/// Wire form: `{ "data": <object>, "signature": <base64>, "publicKey": <PEM> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct VerificationRequestBody {
    pub data: Value,
    pub signature: String,
    pub public_key: String,
}

/// A validated, single-use verification request.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    payload: Payload,
    signature: Signature,
    verifier: Verifier,
}

impl VerificationRequest {
    /// Assemble a request from already-validated parts.
    pub fn new(payload: Payload, signature: Signature, verifier: Verifier) -> Self {
        Self {
            payload,
            signature,
            verifier,
        }
    }

    /// Validate a wire body.
    ///
    /// Fails with [`Error::PayloadFormat`], [`Error::SignatureFormat`] or
    /// [`Error::KeyFormat`], checked in that order.
    pub fn from_body(body: VerificationRequestBody) -> Result<Self> {
        let payload = Payload::from_value(body.data)?;
        let signature = Signature::from_base64(&body.signature)?;
        let verifier = Verifier::from_pem(&body.public_key)?;
        Ok(Self::new(payload, signature, verifier))
    }

    /// Parse and validate a JSON request body.
    pub fn from_json(json: &[u8]) -> Result<Self> {
        let body: VerificationRequestBody = serde_json::from_slice(json)
            .map_err(|e| Error::PayloadFormat(format!("invalid request body: {}", e)))?;
        Self::from_body(body)
    }

    /// The payload under verification. Not trustworthy until [`Self::verify`] passes.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Canonicalize the payload and check the signature.
    pub fn verify(&self) -> bool {
        self.verifier
            .verify(&canonicalize(&self.payload), &self.signature)
    }
}

/// The answer to a verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub valid: bool,
    pub message: String,
}

impl VerificationOutcome {
    /// The signature matches.
    pub fn authentic() -> Self {
        Self {
            valid: true,
            message: "signature is valid".to_string(),
        }
    }

    /// Well-formed request, but the signature does not match.
    pub fn not_authentic() -> Self {
        Self {
            valid: false,
            message: "signature is invalid".to_string(),
        }
    }

    /// The request could not be interpreted.
    pub fn rejected(error: &Error) -> Self {
        Self {
            valid: false,
            message: error.to_string(),
        }
    }

    /// Outcome from a boolean verification result.
    pub fn from_verdict(valid: bool) -> Self {
        if valid {
            Self::authentic()
        } else {
            Self::not_authentic()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{foreign_key_store, key_store};
    use serde_json::json;

    fn body_for(signed: &SignedPayload, public_key: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "data": signed.data,
            "signature": signed.signature,
            "publicKey": public_key,
        }))
        .unwrap()
    }

    #[test]
    fn test_signed_payload_wire_form() {
        let signed =
            SignedPayload::sign(Payload::message("secret"), &key_store().signer()).unwrap();
        let value = serde_json::to_value(&signed).unwrap();

        assert_eq!(value["data"], json!({"message": "secret"}));
        assert_eq!(value["signature"], json!(signed.signature.to_base64()));

        let back: SignedPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, signed);
        assert!(back.verify_with(&key_store().verifier()));
    }

    #[test]
    fn test_signed_payload_rejects_unknown_fields() {
        let result: std::result::Result<SignedPayload, _> = serde_json::from_value(json!({
            "data": {"message": "x"},
            "signature": "AQID",
            "extra": 1,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_roundtrip() {
        let keys = key_store();
        let signed = SignedPayload::sign(Payload::message("secret"), &keys.signer()).unwrap();

        let request =
            VerificationRequest::from_json(&body_for(&signed, keys.export_public())).unwrap();
        assert_eq!(request.payload(), &signed.data);
        assert!(request.verify());
    }

    #[test]
    fn test_request_with_foreign_key() {
        let signed =
            SignedPayload::sign(Payload::message("secret"), &key_store().signer()).unwrap();

        let request =
            VerificationRequest::from_json(&body_for(&signed, foreign_key_store().export_public()))
                .unwrap();
        assert!(!request.verify());
    }

    #[test]
    fn test_request_with_tampered_data() {
        let keys = key_store();
        let mut signed = SignedPayload::sign(Payload::message("secret"), &keys.signer()).unwrap();
        signed.data = Payload::message("forged");

        let request =
            VerificationRequest::from_json(&body_for(&signed, keys.export_public())).unwrap();
        assert!(!request.verify());
    }

    #[test]
    fn test_request_reordered_data_still_verifies() {
        let keys = key_store();
        let data = Payload::from_json(r#"{"a": 1, "b": {"c": "d", "e": [true]}}"#).unwrap();
        let signed = SignedPayload::sign(data, &keys.signer()).unwrap();

        let body = format!(
            concat!(
                r#"{{"publicKey": {}, "signature": "{}", "#,
                r#""data": {{"b": {{"e": [true], "c": "d"}}, "a": 1}}}}"#,
            ),
            serde_json::to_string(keys.export_public()).unwrap(),
            signed.signature
        );
        let request = VerificationRequest::from_json(body.as_bytes()).unwrap();
        assert!(request.verify());
    }

    #[test]
    fn test_request_malformed_inputs() {
        let keys = key_store();
        let pem = keys.export_public();

        let bad_signature = serde_json::to_vec(&json!({
            "data": {"message": "x"}, "signature": "not base64!", "publicKey": pem,
        }))
        .unwrap();
        assert!(matches!(
            VerificationRequest::from_json(&bad_signature),
            Err(Error::SignatureFormat(_))
        ));

        let bad_key = serde_json::to_vec(&json!({
            "data": {"message": "x"}, "signature": "AQID", "publicKey": "nope",
        }))
        .unwrap();
        assert!(matches!(
            VerificationRequest::from_json(&bad_key),
            Err(Error::KeyFormat(_))
        ));

        let bad_data = serde_json::to_vec(&json!({
            "data": "just a string", "signature": "AQID", "publicKey": pem,
        }))
        .unwrap();
        assert!(matches!(
            VerificationRequest::from_json(&bad_data),
            Err(Error::PayloadFormat(_))
        ));

        let missing = serde_json::to_vec(&json!({"data": {}, "signature": "AQID"})).unwrap();
        assert!(matches!(
            VerificationRequest::from_json(&missing),
            Err(Error::PayloadFormat(_))
        ));

        let unknown = serde_json::to_vec(&json!({
            "data": {}, "signature": "AQID", "publicKey": pem, "trusted": true,
        }))
        .unwrap();
        assert!(matches!(
            VerificationRequest::from_json(&unknown),
            Err(Error::PayloadFormat(_))
        ));
    }

    #[test]
    fn test_outcomes() {
        assert!(VerificationOutcome::from_verdict(true).valid);
        assert!(!VerificationOutcome::from_verdict(false).valid);

        let rejected = VerificationOutcome::rejected(&Error::SignatureFormat("bad".into()));
        assert!(!rejected.valid);
        assert_eq!(rejected.message, "malformed signature: bad");
    }
}
