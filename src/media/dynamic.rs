/// Per-card responsive image sizing
///
/// `DynamicImage` owns one card's render size. It resolves the intrinsic
/// size (synchronously for declared sizes and local assets, through a
/// remote fetch otherwise) and recomputes the contain fit whenever the
/// intrinsic size or the container size changes.

use iced::task;
use iced::widget::image::Handle;
use serde_json::Value;

use super::fit::contain_fit;
use super::loader::RemoteImage;
use super::registry::AssetRegistry;
use super::source::ImageSource;
use crate::error::{FetchError, SourceError};
use crate::state::data::{ContainerSize, IntrinsicSize, RenderSize};

/// Progress of the remote fetch
#[derive(Default)]
enum Load {
    /// Nothing to fetch, or not started yet
    #[default]
    Idle,
    /// Fetch running; dropping the handle aborts it
    InFlight { token: u64, _abort: Option<task::Handle> },
    Done,
    Failed,
}

/// Sizing state of one card image
pub struct DynamicImage {
    /// `None` when the reference was invalid; renders nothing
    source: Option<ImageSource>,
    intrinsic: Option<IntrinsicSize>,
    handle: Option<Handle>,
    container: ContainerSize,
    render: RenderSize,
    load: Load,
    next_token: u64,
}

impl DynamicImage {
    /// Normalize `reference` and resolve whatever can be resolved synchronously
    pub fn mount(reference: &Value, registry: &AssetRegistry) -> Self {
        let mut image = Self {
            source: None,
            intrinsic: None,
            handle: None,
            container: ContainerSize::default(),
            render: RenderSize::placeholder(),
            load: Load::Idle,
            next_token: 0,
        };

        let source = match ImageSource::normalize(reference) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("{}", e);
                return image;
            }
        };

        match &source {
            ImageSource::Sized { .. } => {
                image.set_intrinsic(source.declared_size());
            }
            ImageSource::Asset(id) => match registry.dimensions(*id) {
                Ok(size) => {
                    image.handle = registry.path(*id).map(Handle::from_path);
                    image.set_intrinsic(Some(size));
                }
                Err(e) => tracing::error!("Error getting image size: {}", e),
            },
            ImageSource::Uri(_) => {}
        }

        image.source = Some(source);
        image
    }

    /// Whether anything should be drawn for this image
    pub fn is_renderable(&self) -> bool {
        self.source.is_some()
    }

    pub fn render_size(&self) -> RenderSize {
        self.render
    }

    /// Pixels to draw, once available
    pub fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    /// Remote fetch that still has to be started, with its token
    pub fn load_request(&mut self) -> Option<(u64, String)> {
        if !matches!(self.load, Load::Idle) {
            return None;
        }
        let uri = self.source.as_ref()?.remote_uri()?.to_string();

        self.next_token += 1;
        Some((self.next_token, uri))
    }

    /// Record that the fetch for `token` is running
    pub fn begin_load(&mut self, token: u64, abort: Option<task::Handle>) {
        self.load = Load::InFlight { token, _abort: abort };
    }

    /// Apply a fetch result.
    ///
    /// Results for a token that is no longer in flight are dropped silently.
    /// Returns whether the render size changed.
    pub fn finish_load(&mut self, token: u64, result: Result<RemoteImage, FetchError>) -> bool {
        match self.load {
            Load::InFlight { token: current, .. } if current == token => {}
            _ => {
                tracing::debug!("Discarding stale image load {}", token);
                return false;
            }
        }

        match result {
            Ok(remote) => {
                self.load = Load::Done;
                self.handle = Some(remote.handle);
                // A declared size wins over the decoded one
                if self.intrinsic.is_none() {
                    return self.set_intrinsic(Some(remote.size));
                }
                false
            }
            Err(e) => {
                self.load = Load::Failed;
                tracing::error!("Error getting image size: {}", e);
                false
            }
        }
    }

    /// Update the container size. Returns whether the render size changed.
    pub fn set_container(&mut self, container: ContainerSize) -> bool {
        if self.container == container {
            return false;
        }
        self.container = container;
        self.recompute()
    }

    fn set_intrinsic(&mut self, intrinsic: Option<IntrinsicSize>) -> bool {
        self.intrinsic = intrinsic;
        self.recompute()
    }

    /// Recompute the contain fit. Unchanged inputs leave the state untouched.
    fn recompute(&mut self) -> bool {
        let Some(intrinsic) = self.intrinsic else {
            return false;
        };

        let Some((width, height)) = contain_fit(intrinsic, self.container) else {
            tracing::error!(
                "{}",
                SourceError::ZeroSize { width: intrinsic.width, height: intrinsic.height }
            );
            return false;
        };

        let render = RenderSize {
            real_width: intrinsic.width,
            real_height: intrinsic.height,
            render_width: width,
            render_height: height,
            is_resolved: true,
        };

        if render == self.render {
            return false;
        }

        tracing::debug!("New size: {}x{}", width, height);
        self.render = render;
        true
    }
}
