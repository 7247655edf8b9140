/// Image handling module
///
/// This module handles:
/// - Normalizing card source references (source.rs)
/// - Contain-fit sizing (fit.rs)
/// - The local asset registry (registry.rs)
/// - Fetching remote images (loader.rs)
/// - Per-card sizing state (dynamic.rs)

pub mod dynamic;
pub mod fit;
pub mod loader;
pub mod registry;
pub mod source;

pub use dynamic::DynamicImage;
pub use registry::AssetRegistry;
