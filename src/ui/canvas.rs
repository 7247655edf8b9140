use cgmath::{Vector2, Zero};
use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Path, Program};
use iced::widget::image::Handle;
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::state::data::RenderSize;
use crate::state::deck::LayerStyle;
use crate::Message;

/// Fill drawn while a card's pixels are still loading
const PLACEHOLDER_COLOR: Color = Color::from_rgb(0.2, 0.2, 0.24);

/// Pointer activity reported by a card layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Pointer went down on the card
    Granted,
    /// Pointer moved; delta from the press position
    Moved(Vector2<f32>),
    /// Pointer lifted; total delta from the press position
    Released(Vector2<f32>),
}

/// One rendered slot of the card stack
pub struct CardLayer {
    pub slot: usize,
    pub handle: Option<Handle>,
    pub render: RenderSize,
    /// False when the card's source was invalid
    pub renderable: bool,
    pub offset: Vector2<f32>,
    pub style: LayerStyle,
    /// Non-top layers ignore all input
    pub disabled: bool,
    /// Pointer state from an older token belongs to a previous occupant
    pub reset_token: u64,
}

impl CardLayer {
    /// Where the card is drawn inside a canvas of `size`
    pub fn card_bounds(&self, size: Size) -> Rectangle {
        let (width, height) = if self.render.is_resolved {
            (self.render.render_width, self.render.render_height)
        } else {
            let side = RenderSize::PLACEHOLDER_SIDE.min(size.width).min(size.height).max(0.0);
            (side, side)
        };

        let width = width * self.style.scale;
        let height = height * self.style.scale;

        Rectangle::new(
            Point::new(
                (size.width - width) / 2.0 + self.offset.x,
                (size.height - height) / 2.0 + self.offset.y,
            ),
            Size::new(width, height),
        )
    }

    fn gesture(&self, gesture: Gesture) -> (canvas::event::Status, Option<Message>) {
        (
            canvas::event::Status::Captured,
            Some(Message::Gesture(self.slot, gesture)),
        )
    }
}

fn delta(origin: Point, position: Point) -> Vector2<f32> {
    Vector2::new(position.x - origin.x, position.y - origin.y)
}

impl Program<Message> for CardLayer {
    type State = PointerState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        if !self.renderable {
            return vec![frame.into_geometry()];
        }

        let card = self.card_bounds(bounds.size());

        match &self.handle {
            Some(handle) if self.render.is_resolved => {
                frame.draw_image(
                    card,
                    canvas::Image::new(handle.clone()).opacity(self.style.opacity),
                );
            }
            _ => {
                frame.fill(
                    &Path::rectangle(card.position(), card.size()),
                    Color {
                        a: self.style.opacity,
                        ..PLACEHOLDER_COLOR
                    },
                );
            }
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        // A new occupant starts with a clean pointer
        if state.token != self.reset_token {
            *state = PointerState {
                token: self.reset_token,
                ..PointerState::default()
            };
        }

        if self.disabled {
            return (canvas::event::Status::Ignored, None);
        }

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if state.origin.is_none() {
                    if let Some(position) = cursor.position_over(bounds) {
                        state.origin = Some(position);
                        state.last = Vector2::zero();
                        return self.gesture(Gesture::Granted);
                    }
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if state.finger.is_none() {
                    if let Some(origin) = state.origin {
                        state.last = delta(origin, position);
                        return self.gesture(Gesture::Moved(state.last));
                    }
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.finger.is_none() {
                    if let Some(origin) = state.origin.take() {
                        // Without a cursor the last tracked offset is the release point
                        let released = cursor
                            .position()
                            .map_or(state.last, |position| delta(origin, position));
                        return self.gesture(Gesture::Released(released));
                    }
                }
            }

            // Only the first finger counts
            canvas::Event::Touch(touch::Event::FingerPressed { id, position }) => {
                if state.origin.is_none() && bounds.contains(position) {
                    state.finger = Some(id);
                    state.origin = Some(position);
                    state.last = Vector2::zero();
                    return self.gesture(Gesture::Granted);
                }
            }

            canvas::Event::Touch(touch::Event::FingerMoved { id, position })
                if state.finger == Some(id) =>
            {
                if let Some(origin) = state.origin {
                    state.last = delta(origin, position);
                    return self.gesture(Gesture::Moved(state.last));
                }
            }

            canvas::Event::Touch(
                touch::Event::FingerLifted { id, position } | touch::Event::FingerLost { id, position },
            ) if state.finger == Some(id) => {
                state.finger = None;
                if let Some(origin) = state.origin.take() {
                    return self.gesture(Gesture::Released(delta(origin, position)));
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if self.disabled {
            mouse::Interaction::default()
        } else if state.origin.is_some() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Pointer tracking for a card layer
#[derive(Debug, Clone)]
pub struct PointerState {
    pub token: u64,
    /// Press position of the active pointer
    pub origin: Option<Point>,
    /// Offset reported by the latest move
    pub last: Vector2<f32>,
    /// Set when the active pointer is a finger
    pub finger: Option<touch::Finger>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            token: 0,
            origin: None,
            last: Vector2::zero(),
            finger: None,
        }
    }
}
