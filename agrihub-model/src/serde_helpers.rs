//! Lenient deserializers for fields the API does not shape consistently.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Accepts either a single string or a list of strings. `null` becomes an
/// empty list.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}

/// Accepts a reference that is either a bare id (string or number) or a
/// populated object carrying `id`/`_id`.
pub(crate) fn id_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Object(map)) => match map.get("id").or_else(|| map.get("_id")) {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            _ => Err(de::Error::custom("referenced object has no id")),
        },
        Some(other) => Err(de::Error::custom(format!(
            "expected id reference, got {other}"
        ))),
    }
}

/// Accepts an id that the server may send as a number.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected id, got {other}"))),
    }
}
