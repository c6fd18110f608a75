//! JSON ↔ Qdrant payload value mapping.

use qdrant_client::qdrant::{ListValue, Struct, Value as QValue, value::Kind};

/// Wraps a string into Qdrant `Value`.
pub(crate) fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(Kind::StringValue(s.to_string())),
    }
}

/// Converts `serde_json::Value` into Qdrant `Value` (handles arrays/objects).
pub fn json_to_qvalue(v: serde_json::Value) -> QValue {
    let kind = match v {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Kind::BoolValue(b)),
        serde_json::Value::Number(n) => Some(match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => Kind::DoubleValue(n.as_f64().unwrap_or_default()),
        }),
        serde_json::Value::String(s) => Some(Kind::StringValue(s)),
        serde_json::Value::Array(arr) => Some(Kind::ListValue(ListValue {
            values: arr.into_iter().map(json_to_qvalue).collect(),
        })),
        serde_json::Value::Object(map) => Some(Kind::StructValue(Struct {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, json_to_qvalue(v)))
                .collect(),
        })),
    };
    QValue { kind }
}

/// Converts a Qdrant `Value` back into JSON.
pub fn qvalue_to_json(v: QValue) -> serde_json::Value {
    match v.kind {
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(Kind::DoubleValue(f)) => serde_json::json!(f),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(l)) => {
            serde_json::Value::Array(l.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(Kind::StructValue(s)) => serde_json::Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, qvalue_to_json(v)))
                .collect(),
        ),
        // Unset kind and explicit nulls.
        _ => serde_json::Value::Null,
    }
}
