//! JSON codec for model shapes.
use cirrus_model::SdkModel;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use tracing::debug;

/// Default ceiling for a single payload (1 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

#[cirrus_derive::cirrus_error]
pub enum WireError {
    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Payload too large{}: {size} bytes exceeds the {limit} byte limit", format_context(.context))]
    PayloadTooLarge { size: usize, limit: usize, context: Option<Cow<'static, str>> },

    #[error("Internal wire error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WireSettings {
    /// Pretty-print encoded payloads.
    pub pretty: bool,
    pub max_payload_bytes: usize,
}

impl Default for WireSettings {
    fn default() -> Self {
        Self { pretty: false, max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES }
    }
}

impl WireSettings {
    fn check_size(&self, size: usize) -> Result<(), WireError> {
        if size > self.max_payload_bytes {
            return Err(WireError::PayloadTooLarge {
                size,
                limit: self.max_payload_bytes,
                context: None,
            });
        }
        Ok(())
    }
}

/// Decodes one shape from raw JSON bytes.
///
/// # Errors
/// Returns [`WireError::PayloadTooLarge`] when `bytes` exceeds the configured limit and
/// [`WireError::Json`] when the payload does not match the shape.
pub fn decode<M>(bytes: &[u8], settings: &WireSettings) -> Result<M, WireError>
where
    M: SdkModel + DeserializeOwned,
{
    settings.check_size(bytes.len()).context(M::SHAPE)?;
    let model = serde_json::from_slice::<M>(bytes).context(M::SHAPE)?;
    debug!(shape = M::SHAPE, bytes = bytes.len(), "Decoded payload");
    Ok(model)
}

/// Decodes one shape from a JSON string.
///
/// # Errors
/// Same as [`decode`].
pub fn decode_str<M>(text: &str, settings: &WireSettings) -> Result<M, WireError>
where
    M: SdkModel + DeserializeOwned,
{
    decode(text.as_bytes(), settings)
}

/// Encodes one shape as JSON, compact or pretty per `settings`.
///
/// # Errors
/// Returns [`WireError::Json`] if serialization fails.
pub fn encode<M>(model: &M, settings: &WireSettings) -> Result<String, WireError>
where
    M: SdkModel + Serialize,
{
    let text = if settings.pretty {
        serde_json::to_string_pretty(model)
    } else {
        serde_json::to_string(model)
    };
    text.context(M::SHAPE)
}
