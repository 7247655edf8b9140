/// Shared data structures for the card deck
///
/// These structs represent the data model that flows between
/// the deck, the image sizing logic and the UI layer.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;

/// Key used to route asynchronous results back to a card.
///
/// The card's position in the queue is still its identity for ordering;
/// the key only exists so a late result can find (or miss) its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardKey(pub u64);

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single card in the deck
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub key: CardKey,
    /// Opaque image reference (sized descriptor, bare URI or asset handle)
    pub source: Value,
    /// Opaque payload handed to the detail screen
    pub data: Value,
}

/// Intrinsic pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicSize {
    pub width: f32,
    pub height: f32,
}

impl IntrinsicSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Measured size of the stack's root view
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Size an image is drawn at, derived from intrinsic and container size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSize {
    pub real_width: f32,
    pub real_height: f32,
    pub render_width: f32,
    pub render_height: f32,
    /// False until the intrinsic size is known
    pub is_resolved: bool,
}

impl RenderSize {
    /// Side length drawn while the intrinsic size is still unknown
    pub const PLACEHOLDER_SIDE: f32 = 512.0;

    pub fn placeholder() -> Self {
        Self {
            real_width: 0.0,
            real_height: 0.0,
            render_width: Self::PLACEHOLDER_SIDE,
            render_height: Self::PLACEHOLDER_SIDE,
            is_resolved: false,
        }
    }
}

impl Default for RenderSize {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Direction a card left the stack in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Rejected
    Left,
    /// Accepted
    Right,
}

/// One entry of the swipe history
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub key: CardKey,
    pub direction: SwipeDirection,
    pub at: DateTime<Utc>,
}
