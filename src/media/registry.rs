/// Local asset registry
///
/// Indexes the image files below the assets directory so that cards can
/// refer to them by number. Files are sorted by path, which keeps handles
/// stable between runs as long as the directory doesn't change.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::state::data::IntrinsicSize;

/// Supported image file extensions
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Handle to a local asset (index into the registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub usize);

/// The set of bundled image assets
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: Vec<PathBuf>,
}

impl AssetRegistry {
    /// Scan `root` recursively for image files.
    ///
    /// A missing directory gives an empty registry.
    pub fn scan(root: impl Into<PathBuf>) -> Self {
        let root = root.into();

        if !root.is_dir() {
            tracing::warn!("Assets directory {} not found", root.display());
            return Self::default();
        }

        let mut entries: Vec<PathBuf> = WalkDir::new(&root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && is_image_file(path))
            .collect();
        entries.sort();

        tracing::info!("📁 Indexed {} assets in {}", entries.len(), root.display());

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All handles in registry order
    pub fn ids(&self) -> impl Iterator<Item = AssetId> {
        (0..self.entries.len()).map(AssetId)
    }

    /// File behind a handle
    pub fn path(&self, id: AssetId) -> Option<&Path> {
        self.entries.get(id.0).map(PathBuf::as_path)
    }

    /// Read the intrinsic size of an asset from its header
    pub fn dimensions(&self, id: AssetId) -> Result<IntrinsicSize, SourceError> {
        let path = self.path(id).ok_or(SourceError::UnknownAsset(id.0))?;

        let (width, height) =
            image::image_dimensions(path).map_err(|e| SourceError::UnreadableAsset {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(IntrinsicSize::new(width as f32, height as f32))
    }
}

/// Check if a path has an image extension
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
