//! Automatic implementation of JSON de/serialization for types that implement
//! [`serde::Serialize`](serde::Serialize) and [`serde::Deserialize`](serde::Deserialize).
//!
//! If for some reason you want to implement custom JSON serialization
//! for some types while using `serde_json` for others, you can define
//! a different media type and implement [`Serialize`](crate::content::Serialize)
//! and [`Deserialize`](crate::content::Deserialize) for it.
//! ```
//! use pingd::media_type;
//! media_type!(CustomApplicationJson, "application", "json");
//! ```
use crate::content::mediatypes::ApplicationJson;
use crate::content::{Deserialize, SerializationError, Serialize};

impl<T> Serialize<ApplicationJson> for T
where
    T: serde::Serialize,
{
    fn serialize(self) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(&self).map_err(|e| SerializationError::new(&e.to_string()))
    }
}

impl<T> Deserialize<T> for ApplicationJson
where
    T: serde::de::DeserializeOwned,
{
    fn deserialize(bytes: Vec<u8>) -> Result<T, SerializationError> {
        serde_json::from_slice(&bytes[..]).map_err(|e| SerializationError::new(&e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_json_roundtrip_map() {
        let mut map = HashMap::new();
        map.insert("message".to_string(), "pong".to_string());
        let bytes = <_ as Serialize<ApplicationJson>>::serialize(map).unwrap();
        assert_eq!(bytes, br#"{"message":"pong"}"#.to_vec());

        let parsed: HashMap<String, String> = ApplicationJson::deserialize(bytes).unwrap();
        assert_eq!(parsed.get("message"), Some(&"pong".to_string()));
    }

    #[test]
    fn test_json_invalid() {
        let parsed: Result<HashMap<String, String>, _> =
            ApplicationJson::deserialize(b"{\"message\":".to_vec());
        assert!(parsed.is_err());
    }
}
