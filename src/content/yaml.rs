//! YAML de/serialization with [`serde_yaml`](serde_yaml), and [`decode`] for
//! turning a YAML document into an untyped [`Mapping`].
use thiserror::Error;

use crate::content::mediatypes::ApplicationYaml;
use crate::content::value::{Mapping, Value};
use crate::content::{Deserialize, SerializationError, Serialize};

impl<T> Serialize<ApplicationYaml> for T
where
    T: serde::Serialize,
{
    fn serialize(self) -> Result<Vec<u8>, SerializationError> {
        serde_yaml::to_string(&self)
            .map(String::into_bytes)
            .map_err(|e| SerializationError::new(&e.to_string()))
    }
}

impl<T> Deserialize<T> for ApplicationYaml
where
    T: serde::de::DeserializeOwned,
{
    fn deserialize(bytes: Vec<u8>) -> Result<T, SerializationError> {
        serde_yaml::from_slice(&bytes[..]).map_err(|e| SerializationError::new(&e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid yaml: {0}")]
    Syntax(#[from] serde_yaml::Error),
    #[error("expected a mapping at the document root, found {0}")]
    NotAMapping(&'static str),
}

/// Decode a YAML document into a mapping of dynamically typed values.
///
/// Empty input and a `null` document decode to an empty mapping. Keys must
/// be scalars; non-string scalars are kept in their textual form.
///
/// # Example
/// ```
/// use pingd::content::value::Value;
///
/// let mapping = pingd::decode(b"message: pong\nretries: 3\n").unwrap();
/// assert_eq!(mapping.get("message"), Some(&Value::from("pong")));
/// assert_eq!(mapping.get("retries").and_then(Value::as_i64), Some(3));
///
/// assert!(pingd::decode(b"a:\n  b: 1\n c: 2\n").is_err());
/// ```
pub fn decode(buffer: &[u8]) -> Result<Mapping, DecodeError> {
    if buffer.iter().all(u8::is_ascii_whitespace) {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_slice::<Value>(buffer)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(DecodeError::NotAMapping(other.kind())),
    }
}
