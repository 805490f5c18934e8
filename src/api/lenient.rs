//! Tolerant field decoding for backend documents.
//!
//! The backend serializes Mongo documents as-is, so a field may arrive as a
//! string, a number, or be null/absent depending on how the record was written.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Renders a scalar JSON value as a string. Objects, arrays and null yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "string")]
        seat_no: String,
    }

    #[test]
    fn numbers_and_nulls_decode() {
        let row: Row = serde_json::from_value(json!({"seat_no": 12})).unwrap();
        assert_eq!(row.seat_no, "12");

        let row: Row = serde_json::from_value(json!({"seat_no": null})).unwrap();
        assert_eq!(row.seat_no, "");

        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.seat_no, "");
    }
}
