/// Remote image loading
///
/// Fetches a remote image once. The body is used twice: its
/// header gives the intrinsic dimensions, and it holds the pixels shown
/// on the card. There is no retry and no timeout.

use iced::widget::image::Handle;
use std::io::Cursor;
use tokio::task;

use crate::error::FetchError;
use crate::state::data::IntrinsicSize;

/// A fetched remote image
#[derive(Debug, Clone)]
pub struct RemoteImage {
    pub handle: Handle,
    pub size: IntrinsicSize,
}

/// Fetch `uri` and decode its dimensions
pub async fn fetch_remote(uri: String) -> Result<RemoteImage, FetchError> {
    tracing::debug!("Fetching remote image {}", uri);

    let response = reqwest::get(&uri).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await?.to_vec();
    let image = decode_remote(bytes).await?;

    tracing::debug!("Fetched {} ({}x{})", uri, image.size.width, image.size.height);

    Ok(image)
}

/// Turn a fetched body into a `RemoteImage`
pub async fn decode_remote(bytes: Vec<u8>) -> Result<RemoteImage, FetchError> {
    // Spawn blocking so format sniffing stays off the UI executor
    task::spawn_blocking(move || -> Result<RemoteImage, FetchError> {
        let size = decode_dimensions(&bytes)?;
        Ok(RemoteImage {
            handle: Handle::from_bytes(bytes),
            size,
        })
    })
    .await
    .map_err(|e| FetchError::Decode(format!("Task join error: {}", e)))?
}

/// Read the intrinsic size from an encoded image without decoding pixels
pub fn decode_dimensions(bytes: &[u8]) -> Result<IntrinsicSize, FetchError> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| FetchError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| FetchError::Decode(e.to_string()))?;

    Ok(IntrinsicSize::new(width as f32, height as f32))
}
