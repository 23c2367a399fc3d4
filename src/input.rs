//! Input model: pointer and resize messages and the press/drag state machine.
//!
//! Host listeners translate DOM events into [`InputEvent`] messages and deliver
//! them to the application handle. Nothing in this module reads the DOM, so
//! the state machine runs identically in native tests.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// A point in canvas-relative CSS pixels (`MouseEvent.offsetX` / `offsetY`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single input message delivered to the application handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// `mousedown` on the canvas.
    PointerDown(Point),
    /// `mousemove` on the canvas.
    PointerMove(Point),
    /// `mouseup` on the canvas.
    PointerUp(Point),
    /// `resize` on the window.
    Resize,
}

/// DOM event names forwarded from the canvas as pointer messages.
pub const POINTER_EVENTS: [&str; 3] = ["mousedown", "mousemove", "mouseup"];

impl InputEvent {
    /// Map a canvas pointer event name and its offset position to a message.
    ///
    /// Returns `None` for names outside [`POINTER_EVENTS`].
    #[must_use]
    pub fn pointer(name: &str, offset: Point) -> Option<Self> {
        match name {
            "mousedown" => Some(Self::PointerDown(offset)),
            "mousemove" => Some(Self::PointerMove(offset)),
            "mouseup" => Some(Self::PointerUp(offset)),
            _ => None,
        }
    }
}

/// What the handle must do after an input message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Re-read the window size and resize the drawing surface.
    ResizeNeeded,
}

/// Pointer gesture tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No button held.
    #[default]
    Idle,
    /// A button is held.
    Pressed {
        /// Where the press started.
        origin: Point,
        /// Latest pointer position while held.
        last: Point,
    },
}

impl InputState {
    /// Advance the state machine by one message.
    pub fn apply(&mut self, event: InputEvent) -> Action {
        match (*self, event) {
            (_, InputEvent::Resize) => return Action::ResizeNeeded,
            // A second down without an up (focus lost mid-drag) restarts the gesture.
            (_, InputEvent::PointerDown(pt)) => {
                *self = Self::Pressed { origin: pt, last: pt };
            }
            (Self::Pressed { origin, .. }, InputEvent::PointerMove(pt)) => {
                *self = Self::Pressed { origin, last: pt };
            }
            (_, InputEvent::PointerUp(_)) => *self = Self::Idle,
            (Self::Idle, InputEvent::PointerMove(_)) => {}
        }
        Action::None
    }

    /// Offset from the press origin to the latest position, if pressed.
    #[must_use]
    pub fn drag_delta(&self) -> Option<(f64, f64)> {
        match self {
            Self::Idle => None,
            Self::Pressed { origin, last } => Some((last.x - origin.x, last.y - origin.y)),
        }
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        matches!(self, Self::Pressed { .. })
    }
}

/// Drawing-surface size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Size a surface from the window's inner size in CSS pixels.
    ///
    /// Fractional sizes are floored; non-finite or negative sizes become zero.
    #[must_use]
    pub fn from_inner_size(width: f64, height: f64) -> Self {
        Self { width: css_to_pixels(width), height: css_to_pixels(height) }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// GL viewport arguments, saturated to `i32`.
    #[must_use]
    pub fn gl_size(&self) -> (i32, i32) {
        (
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn css_to_pixels(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX.
    value.floor() as u32
}
