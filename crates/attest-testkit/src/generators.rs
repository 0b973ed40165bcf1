//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Number, Value};

use attest_core::payload::MAX_SAFE_INTEGER;
use attest_core::Payload;

/// Generate an object key. Includes non-ASCII and astral characters so key
/// ordering is exercised beyond plain ASCII.
pub fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z][a-z0-9_]{0,7}".prop_map(String::from),
        1 => "\\PC{0,4}".prop_map(String::from),
        1 => any::<String>(),
    ]
}

/// Generate a safe integer.
pub fn safe_integer() -> impl Strategy<Value = i64> {
    -MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER
}

/// Generate a scalar JSON value (no floats).
pub fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        safe_integer().prop_map(|n| Value::Number(Number::from(n))),
        any::<String>().prop_map(Value::String),
    ]
}

/// Generate an arbitrary JSON value of bounded depth and size.
pub fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Generate a valid payload.
pub fn payload() -> impl Strategy<Value = Payload> {
    prop::collection::btree_map(key(), json_value(), 0..8).prop_map(|entries| {
        Payload::from_value(Value::Object(entries.into_iter().collect()))
            .expect("generated payload is valid")
    })
}

/// A payload alongside a JSON rendering of it with every object's keys in
/// reverse order.
#[derive(Debug, Clone)]
pub struct ReorderedPayload {
    pub payload: Payload,
    pub reordered_json: String,
}

/// Generate a payload and a key-reordered rendering of it.
pub fn payload_with_reordering() -> impl Strategy<Value = ReorderedPayload> {
    payload().prop_map(|payload| {
        let mut reordered_json = String::new();
        render_reversed(&payload.clone().into_value(), &mut reordered_json);
        ReorderedPayload {
            payload,
            reordered_json,
        }
    })
}

impl Arbitrary for ReorderedPayload {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        payload_with_reordering().boxed()
    }
}

fn render_reversed(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_reversed(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (k, v)) in map.iter().rev().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&serde_json::to_string(k).expect("string serializes"));
                out.push_str(": ");
                render_reversed(v, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reversed() {
        let value = serde_json::json!({"a": 1, "b": {"c": [true, null], "d": "x"}});
        let mut out = String::new();
        render_reversed(&value, &mut out);
        assert_eq!(out, r#"{"b": {"d": "x", "c": [true,null]}, "a": 1}"#);
    }

    proptest! {
        #[test]
        fn reordered_json_parses_to_same_payload(r in any::<ReorderedPayload>()) {
            let reparsed = Payload::from_json(&r.reordered_json).unwrap();
            prop_assert_eq!(reparsed, r.payload);
        }
    }
}
