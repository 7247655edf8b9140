/// Swipe gesture state machine
///
/// One `SwipeCard` per stack slot. It owns the slot's drag offset,
/// classifies a release as accept / reject / cancel and runs the settle or
/// fly-off animation. Rendering and pointer capture live in `canvas.rs`.

use cgmath::{InnerSpace, Vector2, Zero};
use std::time::{Duration, Instant};

use super::animation::Animation;
use crate::state::data::SwipeDirection;

/// Movement below this is a tap rather than a drag (logical pixels)
pub const TOUCH_SLOP: f32 = 8.0;

/// A card must travel past `viewport width / SWIPE_THRESHOLD_DIVISOR` to leave
pub const SWIPE_THRESHOLD_DIVISOR: f32 = 3.0;

/// Where the card is in its gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    SettlingBack,
    Exiting(SwipeDirection),
}

/// What a release turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Exit(SwipeDirection),
    SettleBack,
}

/// Durations of the two release animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeTiming {
    pub exit: Duration,
    pub settle: Duration,
}

impl Default for SwipeTiming {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(250),
            settle: Duration::from_millis(200),
        }
    }
}

/// Decide what a release at horizontal offset `dx` means.
///
/// The card must pass strictly beyond a third of the viewport. Before the
/// viewport has been measured every release settles back.
pub fn classify_release(dx: f32, screen_width: f32) -> Release {
    if screen_width.is_nan() || screen_width <= 0.0 {
        return Release::SettleBack;
    }

    let threshold = screen_width / SWIPE_THRESHOLD_DIVISOR;
    if dx > threshold {
        Release::Exit(SwipeDirection::Right)
    } else if dx < -threshold {
        Release::Exit(SwipeDirection::Left)
    } else {
        Release::SettleBack
    }
}

/// Whether a gesture moved so little it counts as a press
pub fn is_tap(delta: Vector2<f32>) -> bool {
    delta.magnitude() < TOUCH_SLOP
}

/// Drag and animation state of one stack slot
#[derive(Debug, Clone)]
pub struct SwipeCard {
    phase: Phase,
    offset: Vector2<f32>,
    animation: Option<Animation>,
    disabled: bool,
    reset_token: u64,
    timing: SwipeTiming,
}

impl SwipeCard {
    pub fn new(timing: SwipeTiming, disabled: bool) -> Self {
        Self {
            phase: Phase::Idle,
            offset: Vector2::zero(),
            animation: None,
            disabled,
            reset_token: 0,
            timing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn offset(&self) -> Vector2<f32> {
        self.offset
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Changes whenever the slot gets a new occupant
    pub fn reset_token(&self) -> u64 {
        self.reset_token
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// A pointer went down on the card. Returns whether the drag started.
    pub fn grant(&mut self) -> bool {
        if self.disabled || self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Dragging;
        true
    }

    /// Track the pointer delta since the press
    pub fn drag(&mut self, delta: Vector2<f32>) {
        if self.disabled || self.phase != Phase::Dragging {
            return;
        }
        self.offset = delta;
    }

    /// The pointer was lifted after travelling `delta`.
    ///
    /// Starts the matching animation; `None` if no drag was active.
    pub fn release(&mut self, delta: Vector2<f32>, screen_width: f32, now: Instant) -> Option<Release> {
        if self.disabled || self.phase != Phase::Dragging {
            return None;
        }
        self.offset = delta;

        let release = classify_release(delta.x, screen_width);
        let (target, duration) = match release {
            Release::Exit(SwipeDirection::Right) => (Vector2::new(screen_width, 0.0), self.timing.exit),
            Release::Exit(SwipeDirection::Left) => (Vector2::new(-screen_width, 0.0), self.timing.exit),
            Release::SettleBack => (Vector2::zero(), self.timing.settle),
        };

        self.phase = match release {
            Release::Exit(direction) => Phase::Exiting(direction),
            Release::SettleBack => Phase::SettlingBack,
        };
        self.animation = Some(Animation::new(self.offset, target, now, duration));

        tracing::debug!("Release at dx={:.2}: {:?}", delta.x, release);
        Some(release)
    }

    /// Advance the running animation to `now`.
    ///
    /// Returns the exit direction exactly once, on the first tick at or past
    /// the end of an exit animation. The offset is back at zero by then.
    pub fn tick(&mut self, now: Instant) -> Option<SwipeDirection> {
        let animation = self.animation?;

        if !animation.is_finished(now) {
            self.offset = animation.value(now);
            return None;
        }

        let exited = match self.phase {
            Phase::Exiting(direction) => Some(direction),
            _ => None,
        };

        self.animation = None;
        self.phase = Phase::Idle;
        self.offset = Vector2::zero();
        if exited.is_some() {
            self.reset_token += 1;
        }

        exited
    }

    /// Drop all drag and animation state for a new occupant
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.offset = Vector2::zero();
        self.animation = None;
        self.reset_token += 1;
    }
}
