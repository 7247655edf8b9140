/// Error types for the card deck
///
/// None of these are fatal: every failure degrades to "nothing rendered"
/// or "placeholder size" and is reported through `tracing`.

use thiserror::Error;

/// Problems with a card's image source reference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The reference is not a sized descriptor, a bare URI or an asset handle
    #[error("Invalid source type: {0}")]
    InvalidShape(String),

    /// The asset handle does not point into the registry
    #[error("Unknown asset handle: {0}")]
    UnknownAsset(usize),

    /// The asset exists but its header could not be read
    #[error("Failed to read asset {path}: {message}")]
    UnreadableAsset { path: String, message: String },

    /// Intrinsic width or height is zero
    #[error("Image has zero intrinsic size ({width}x{height})")]
    ZeroSize { width: f32, height: f32 },
}

/// Failures fetching or decoding a remote image
///
/// Cloneable because it travels inside a `Message`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection or transfer failed
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server returned status {0}")]
    Status(u16),

    /// The body could not be decoded as an image
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Network(err.to_string()),
        }
    }
}

/// Failures while loading the deck configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::InvalidShape("true".to_string());
        assert_eq!(err.to_string(), "Invalid source type: true");

        let err = FetchError::Status(404);
        assert_eq!(err.to_string(), "Server returned status 404");
    }
}
