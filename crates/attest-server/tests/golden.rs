//! Golden test vectors for cross-implementation verification.
//!
//! Any verifier of this format must produce, for each vector:
//! - the same canonical bytes
//! - the same signature (RSASSA-PKCS1-v1_5 is deterministic)
//! - the same verdict

use attest_core::payload::{MAX_DEPTH, MAX_SAFE_INTEGER};
use attest_core::{canonicalize, verify, Error, Payload, Signature};
use attest_testkit::vectors::{
    all_vectors, canonical_text, golden_key_store, signature_vectors, GOLDEN_FINGERPRINT,
    GOLDEN_PUBLIC_KEY_PEM,
};
use attest_testkit::verify_all_vectors;

#[test]
fn test_vectors_verify() {
    verify_all_vectors().unwrap();
}

#[test]
fn test_canonical_vectors_deterministic() {
    for vector in all_vectors() {
        let first = canonical_text(&vector).unwrap();
        let second = canonical_text(&vector).unwrap();
        assert_eq!(first, second, "vector {} is not deterministic", vector.name);
    }
}

#[test]
fn test_signature_vectors_against_exported_key() {
    let keys = golden_key_store();
    assert_eq!(keys.fingerprint(), GOLDEN_FINGERPRINT);

    for vector in signature_vectors() {
        let payload = Payload::from_json(vector.input).unwrap();
        let bytes = canonicalize(&payload);
        assert!(
            verify(&bytes, vector.signature, keys.export_public()).unwrap(),
            "vector {} failed",
            vector.name
        );
    }
}

#[test]
fn test_signature_vectors_reject_other_payloads() {
    let vectors = signature_vectors();
    for (i, vector) in vectors.iter().enumerate() {
        let other = &vectors[(i + 1) % vectors.len()];
        let payload = Payload::from_json(other.input).unwrap();
        assert!(!verify(&canonicalize(&payload), vector.signature, GOLDEN_PUBLIC_KEY_PEM).unwrap());
    }
}

/// Print signature vectors as JSON for other implementations.
#[test]
#[ignore]
fn print_golden_vectors_json() {
    let vectors: Vec<_> = signature_vectors()
        .into_iter()
        .map(|v| {
            let payload = Payload::from_json(v.input).unwrap();
            let canonical = String::from_utf8(canonicalize(&payload).into_vec()).unwrap();
            serde_json::json!({
                "name": v.name,
                "canonical": canonical,
                "signature": v.signature,
            })
        })
        .collect();

    let doc = serde_json::json!({
        "publicKey": GOLDEN_PUBLIC_KEY_PEM,
        "fingerprint": GOLDEN_FINGERPRINT,
        "vectors": vectors,
    });
    println!("{}", serde_json::to_string_pretty(&doc).unwrap());
}

// ============================================================================
// Rejection Tests
// ============================================================================

#[test]
fn test_reject_non_object_payload() {
    for json in ["[]", "\"text\"", "42", "null"] {
        assert!(matches!(
            Payload::from_json(json),
            Err(Error::PayloadFormat(_))
        ));
    }
}

#[test]
fn test_reject_float() {
    let result = Payload::from_json(r#"{"price": 9.99}"#);
    assert!(matches!(result, Err(Error::PayloadFormat(_))));
}

#[test]
fn test_reject_unsafe_integer() {
    let json = format!(r#"{{"n": {}}}"#, MAX_SAFE_INTEGER + 1);
    assert!(matches!(
        Payload::from_json(&json),
        Err(Error::PayloadFormat(_))
    ));

    let json = format!(r#"{{"n": {}}}"#, MAX_SAFE_INTEGER);
    assert!(Payload::from_json(&json).is_ok());
}

#[test]
fn test_reject_too_deep() {
    let json = format!("{{\"k\": {}{}}}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
    assert!(matches!(
        Payload::from_json(&json),
        Err(Error::PayloadFormat(_))
    ));
}

#[test]
fn test_reject_invalid_base64() {
    for encoded in ["", "   ", "%%%%", "AAA"] {
        assert!(
            matches!(Signature::from_base64(encoded), Err(Error::SignatureFormat(_))),
            "accepted {:?}",
            encoded
        );
    }
}
