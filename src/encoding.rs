// Base64 helpers for captured request and response bodies

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::JournalResult;

/// Encode raw body bytes. An absent body stays absent.
pub fn encode_base64(content: Option<&[u8]>) -> Option<String> {
    content.map(|bytes| STANDARD.encode(bytes))
}

/// Decode a base64 body. An absent body stays absent.
pub fn decode_base64(encoded: Option<&str>) -> JournalResult<Option<Vec<u8>>> {
    match encoded {
        Some(text) => Ok(Some(STANDARD.decode(text)?)),
        None => Ok(None),
    }
}

/// Serde adapter that writes `Vec<u8>` bodies as base64 strings.
pub mod base64_body {
    use super::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
