//! Result message types handed back to the host.

use serde::{Deserialize, Serialize};

/// Host-defined slot key for blobs that carry no concrete file name.
pub const CUSTOM_OUTPUT_SLOT: &str = "custom";

/// Where the host should store a blob message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SaveAs {
    /// A concrete suggested file name (e.g. `report.mp3`).
    Named(String),
    /// The host's custom output slot ([`CUSTOM_OUTPUT_SLOT`]).
    CustomSlot,
}

impl SaveAs {
    /// The key the host stores the blob under.
    pub fn key(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::CustomSlot => CUSTOM_OUTPUT_SLOT,
        }
    }
}

/// A single result produced by a tool invocation.
///
/// Tools return an ordered `Vec<ResultMessage>`; by convention a status
/// message comes before the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultMessage {
    /// Plain text shown to the user or fed back to the model.
    Text {
        /// The message text.
        text: String,
    },
    /// Structured JSON payload.
    Json {
        /// The JSON value, passed through unchanged.
        value: serde_json::Value,
    },
    /// Binary payload with storage hints.
    Blob {
        /// Raw bytes.
        #[serde(with = "blob_bytes")]
        bytes: Vec<u8>,
        /// MIME type of `bytes`.
        mime_type: String,
        /// Suggested storage name.
        save_as: SaveAs,
    },
}

impl ResultMessage {
    /// Build a text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Build a JSON message.
    pub fn json(value: serde_json::Value) -> Self {
        Self::Json { value }
    }

    /// Build a blob message.
    pub fn blob(bytes: Vec<u8>, mime_type: impl Into<String>, save_as: SaveAs) -> Self {
        Self::Blob {
            bytes,
            mime_type: mime_type.into(),
            save_as,
        }
    }

    /// The text content, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Blob bytes travel as base64 when a message is serialized for the host.
mod blob_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
