//! Canonical request/response shapes and data URI helpers

use serde_json::Value;

use crate::error::{TryOnError, TryOnResult};

/// Media type used when wrapping raw base64 into a data URI
const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

/// Inbound try-on request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnRequest {
    pub person_image: String,
    pub clothing_image: String,
}

impl TryOnRequest {
    /// Extract the two images from a request body.
    ///
    /// Both fields must be present, be strings and be non-empty.
    pub fn from_body(body: &Value) -> TryOnResult<Self> {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        match (field("personImage"), field("clothingImage")) {
            (Some(person_image), Some(clothing_image)) => Ok(Self {
                person_image,
                clothing_image,
            }),
            _ => Err(TryOnError::InvalidInput(
                "Both personImage and clothingImage are required.".to_string(),
            )),
        }
    }
}

/// Wrap raw base64 image data as a data URI.
///
/// Values that already are data URIs are returned unchanged.
pub fn to_data_uri(image: &str) -> String {
    if image.starts_with("data:") {
        image.to_string()
    } else {
        format!("data:{};base64,{}", DEFAULT_IMAGE_MEDIA_TYPE, image)
    }
}

/// Strip a leading `data:<type>;base64,` prefix, up to and including the
/// first comma, leaving the raw base64 payload.
pub fn strip_data_uri_prefix(value: &str) -> TryOnResult<String> {
    let payload = if value.starts_with("data:") {
        match value.split_once(',') {
            Some((_, rest)) => rest,
            None => {
                return Err(TryOnError::ResponseShape(
                    "data URI without a comma separator".to_string(),
                ))
            }
        }
    } else {
        value
    };

    if payload.is_empty() {
        return Err(TryOnError::ResponseShape("empty image payload".to_string()));
    }

    Ok(payload.to_string())
}

/// Pull the image out of the first element of a provider `data` sequence.
///
/// Only the first element is ever used. It may be a string, or an object
/// carrying the string under `url`.
pub fn first_image(data: &[Value]) -> TryOnResult<String> {
    let first = data
        .first()
        .ok_or_else(|| TryOnError::ResponseShape("empty data sequence".to_string()))?;

    let raw = match first {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("url").and_then(Value::as_str).ok_or_else(|| {
            TryOnError::ResponseShape("first data element has no url".to_string())
        })?,
        other => {
            return Err(TryOnError::ResponseShape(format!(
                "first data element is not an image: {}",
                other
            )))
        }
    };

    strip_data_uri_prefix(raw)
}
