//! Media types known to the crate.
use crate::content::{Deserialize, SerializationError, Serialize};
use crate::media_type;

media_type!(ApplicationJson, "application", "json");
media_type!(ApplicationYaml, "application", "yaml");
media_type!(TextPlain, "text", "plain", "charset=utf-8");

impl Serialize<TextPlain> for String {
    fn serialize(self) -> Result<Vec<u8>, SerializationError> {
        Ok(self.into_bytes())
    }
}

impl Serialize<TextPlain> for &'static str {
    fn serialize(self) -> Result<Vec<u8>, SerializationError> {
        Ok(self.as_bytes().to_vec())
    }
}

impl Deserialize<String> for TextPlain {
    fn deserialize(bytes: Vec<u8>) -> Result<String, SerializationError> {
        String::from_utf8(bytes).map_err(|e| SerializationError::new(&e.to_string()))
    }
}
