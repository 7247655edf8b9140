/// Card source references
///
/// A card carries its image reference as an opaque JSON value. Three shapes
/// are recognized: a sized descriptor `{ uri, width, height }`, a bare URI
/// string, and a non-negative integer naming a local asset.

use serde_json::Value;

use super::registry::AssetId;
use crate::error::SourceError;
use crate::state::data::IntrinsicSize;

/// Normalized image source
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Remote image whose dimensions are already known
    Sized { uri: String, width: f32, height: f32 },
    /// Remote image whose size is only known once fetched
    Uri(String),
    /// Local asset resolved through the registry
    Asset(AssetId),
}

impl ImageSource {
    /// Normalize an opaque reference, failing fast on unknown shapes
    pub fn normalize(reference: &Value) -> Result<Self, SourceError> {
        match reference {
            Value::Object(map) => {
                let uri = map
                    .get("uri")
                    .and_then(Value::as_str)
                    .filter(|uri| !uri.is_empty());
                let width = map
                    .get("width")
                    .and_then(Value::as_f64)
                    .filter(|w| *w > 0.0);
                let height = map
                    .get("height")
                    .and_then(Value::as_f64)
                    .filter(|h| *h > 0.0);

                match (uri, width, height) {
                    (Some(uri), Some(width), Some(height)) => Ok(ImageSource::Sized {
                        uri: uri.to_string(),
                        width: width as f32,
                        height: height as f32,
                    }),
                    _ => Err(SourceError::InvalidShape(reference.to_string())),
                }
            }
            Value::String(uri) => Ok(ImageSource::Uri(uri.clone())),
            Value::Number(number) => number
                .as_u64()
                .map(|id| ImageSource::Asset(AssetId(id as usize)))
                .ok_or_else(|| SourceError::InvalidShape(reference.to_string())),
            _ => Err(SourceError::InvalidShape(reference.to_string())),
        }
    }

    /// Dimensions carried by the descriptor itself
    pub fn declared_size(&self) -> Option<IntrinsicSize> {
        match self {
            ImageSource::Sized { width, height, .. } => Some(IntrinsicSize::new(*width, *height)),
            _ => None,
        }
    }

    /// URI to fetch pixels from, if the image is remote
    pub fn remote_uri(&self) -> Option<&str> {
        match self {
            ImageSource::Sized { uri, .. } | ImageSource::Uri(uri) => Some(uri),
            ImageSource::Asset(_) => None,
        }
    }
}
