//! Deserializers for form-style input: the browser client sends numbers as
//! strings and older documents store phone numbers as integers.

use mongodb::bson::Bson;
use serde::Deserialize;

/// Accepts an integer, a numeric string, an empty string or null.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::Null | Bson::Undefined => Ok(None),
        Bson::Int32(n) => Ok(Some(n as i64)),
        Bson::Int64(n) => Ok(Some(n)),
        Bson::Double(f) if f.is_finite() => Ok(Some(f.trunc() as i64)),
        Bson::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("'{}' is not a whole number", trimmed)))
        }
        _ => Err(serde::de::Error::custom("Expected a whole number")),
    }
}

/// Accepts a string or a number and normalises blanks to `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::Null | Bson::Undefined => Ok(None),
        Bson::String(s) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Bson::Int32(n) => Ok(Some(n.to_string())),
        Bson::Int64(n) => Ok(Some(n.to_string())),
        Bson::Double(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(format!("{}", f as i64))),
        _ => Err(serde::de::Error::custom("Expected a string or number")),
    }
}
