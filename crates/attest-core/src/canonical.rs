//! Canonical JSON encoding for deterministic signing input.
//!
//! Payloads are encoded as compact JSON text with deterministic rules:
//! - Object members sorted by key, comparing UTF-16 code units (RFC 8785)
//! - No insignificant whitespace
//! - Strings escaped exactly as ECMAScript `JSON.stringify` escapes them
//! - Integers in plain decimal (floats never reach this module, see [`crate::payload`])
//!
//! A payload whose keys are already in sorted order encodes to the same bytes
//! as `JSON.stringify(payload)`, so verifiers that hash the plain serialized
//! object keep working.
//!
//! **This encoding is frozen.** Any change invalidates every outstanding signature.

use std::fmt;

use serde_json::{Map, Value};

use crate::payload::Payload;

/// The deterministic byte encoding of a [`Payload`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Wrap bytes that were canonicalized elsewhere.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the raw bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CanonicalBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalBytes({})", String::from_utf8_lossy(&self.0))
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encode a payload to its canonical bytes.
pub fn canonicalize(payload: &Payload) -> CanonicalBytes {
    let mut buf = Vec::with_capacity(64);
    encode_object(&mut buf, payload.as_map());
    CanonicalBytes(buf)
}

/// Recursively encode a JSON value.
fn encode_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => buf.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => encode_string(buf, s),
        Value::Array(items) => encode_array(buf, items),
        Value::Object(map) => encode_object(buf, map),
    }
}

fn encode_string(buf: &mut Vec<u8>, s: &str) {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    buf.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\u{08}' => buf.extend_from_slice(b"\\b"),
            '\u{0c}' => buf.extend_from_slice(b"\\f"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                let b = c as u8;
                buf.extend_from_slice(b"\\u00");
                buf.push(HEX[(b >> 4) as usize]);
                buf.push(HEX[(b & 0x0f) as usize]);
            }
            c => {
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

fn encode_array(buf: &mut Vec<u8>, items: &[Value]) {
    buf.push(b'[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_value(buf, item);
    }
    buf.push(b']');
}

fn encode_object(buf: &mut Vec<u8>, map: &Map<String, Value>) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.encode_utf16().cmp(b.0.encode_utf16()));

    buf.push(b'{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_string(buf, key);
        buf.push(b':');
        encode_value(buf, value);
    }
    buf.push(b'}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn canonical_text(value: Value) -> String {
        let payload = Payload::from_value(value).unwrap();
        String::from_utf8(canonicalize(&payload).into_vec()).unwrap()
    }

    #[test]
    fn test_message_payload() {
        assert_eq!(
            canonical_text(json!({"message": "secret"})),
            r#"{"message":"secret"}"#
        );
    }

    #[test]
    fn test_canonical_deterministic() {
        let payload = Payload::from_value(json!({"z": [1, 2, 3], "a": {"y": null, "x": true}}))
            .unwrap();
        assert_eq!(canonicalize(&payload), canonicalize(&payload));
    }

    #[test]
    fn test_key_ordering_nested() {
        assert_eq!(
            canonical_text(json!({"b": 1, "a": {"d": [ {"z": 0, "y": 1} ], "c": "x"}})),
            r#"{"a":{"c":"x","d":[{"y":1,"z":0}]},"b":1}"#
        );
    }

    #[test]
    fn test_reordered_keys_match() {
        let first = Payload::from_json(r#"{"alpha": 1, "beta": "two", "gamma": [3]}"#).unwrap();
        let second = Payload::from_json(r#"{"gamma": [3], "alpha": 1, "beta": "two"}"#).unwrap();
        assert_eq!(canonicalize(&first), canonicalize(&second));
    }

    #[test]
    fn test_utf16_key_order() {
        // U+E000 sorts after the surrogate pair of U+1F600 in UTF-16,
        // although it sorts before it in UTF-8.
        assert_eq!(
            canonical_text(json!({"\u{e000}": 1, "\u{1f600}": 2})),
            "{\"\u{1f600}\":2,\"\u{e000}\":1}"
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            canonical_text(json!({"s": "q\"b\\n\nt\tr\rf\u{0c}b\u{08}"})),
            r#"{"s":"q\"b\\n\nt\tr\rf\fb\b"}"#
        );
        assert_eq!(
            canonical_text(json!({"s": "\u{01}\u{1f}"})),
            r#"{"s":"\u0001\u001f"}"#
        );
        // Non-ASCII, DEL and line separators stay literal.
        assert_eq!(
            canonical_text(json!({"s": "é\u{7f}\u{2028}"})),
            "{\"s\":\"é\u{7f}\u{2028}\"}"
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            canonical_text(json!({"n": -17, "z": 0, "t": true, "f": false, "u": null})),
            r#"{"f":false,"n":-17,"t":true,"u":null,"z":0}"#
        );
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(canonical_text(json!({})), "{}");
    }

    #[test]
    fn test_matches_serde_for_sorted_ascii() {
        // serde_json's default map is ordered, so its output is a second
        // opinion for payloads without exotic keys.
        let value = json!({"list": [1, "two", {"k": "v"}], "msg": "a\"b", "n": 5});
        let payload = Payload::from_value(value.clone()).unwrap();
        assert_eq!(
            canonicalize(&payload).as_bytes(),
            serde_json::to_string(&value).unwrap().as_bytes()
        );
    }

    proptest! {
        #[test]
        fn canonical_text_parses_back(
            entries in prop::collection::btree_map(
                "\\PC{0,6}",
                prop_oneof![
                    any::<String>().prop_map(Value::String),
                    any::<i32>().prop_map(|n| json!(n)),
                    any::<bool>().prop_map(Value::Bool),
                ],
                0..8,
            )
        ) {
            let value = Value::Object(entries.into_iter().collect());
            let payload = Payload::from_value(value.clone()).unwrap();
            let text = canonical_text(value);
            prop_assert_eq!(Payload::from_json(&text).unwrap(), payload);
        }
    }
}
