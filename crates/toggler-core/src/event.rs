//! Input events delivered to widgets by the host's event hub.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Tap or click released without a drag
    Click {
        /// Position of release, local to the widget
        position: Point,
    },
    /// Finger or button pressed
    TouchDown {
        /// Touch position
        position: Point,
    },
    /// Finger or button released
    TouchUp {
        /// Final position
        position: Point,
    },
    /// Touch cancelled by the input layer (e.g. gesture conflict)
    TouchCancel,
    /// Mouse entered widget bounds
    MouseEnter,
    /// Mouse left widget bounds
    MouseLeave,
    /// Pan/drag gesture
    Pan {
        /// Translation since the previous pan event
        delta: Point,
        /// Gesture state
        state: GestureState,
        /// Device driving the gesture
        pointer_type: PointerType,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
    /// System-wide focus visibility changed
    FocusActiveChanged {
        /// Whether focus rings are currently shown
        active: bool,
    },
}

/// Type of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PointerType {
    /// Mouse pointer
    #[default]
    Mouse,
    /// Touch pointer
    Touch,
    /// Pen/stylus pointer
    Pen,
}

/// State of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GestureState {
    /// Gesture started
    #[default]
    Started,
    /// Gesture in progress (changed)
    Changed,
    /// Gesture ended
    Ended,
    /// Gesture cancelled
    Cancelled,
}

/// Keyboard key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Fn key
    Function,
    /// Enter/Return key
    Enter,
    /// Space key
    Space,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Any other key, by platform key code
    Other(u32),
}

impl Event {
    /// Check if this is a touch event.
    #[must_use]
    pub const fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::TouchDown { .. } | Self::TouchUp { .. } | Self::TouchCancel
        )
    }

    /// Check if this is a keyboard event.
    #[must_use]
    pub const fn is_keyboard(&self) -> bool {
        matches!(self, Self::KeyDown { .. } | Self::KeyUp { .. })
    }

    /// Check if this is a focus event.
    #[must_use]
    pub const fn is_focus(&self) -> bool {
        matches!(
            self,
            Self::FocusIn | Self::FocusOut | Self::FocusActiveChanged { .. }
        )
    }

    /// Check if this is a mouse hover event.
    #[must_use]
    pub const fn is_hover(&self) -> bool {
        matches!(self, Self::MouseEnter | Self::MouseLeave)
    }

    /// Get the position if this is a positional event.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::Click { position }
            | Self::TouchDown { position }
            | Self::TouchUp { position } => Some(*position),
            _ => None,
        }
    }

    /// Get gesture state if this is a pan event.
    #[must_use]
    pub const fn gesture_state(&self) -> Option<GestureState> {
        match self {
            Self::Pan { state, .. } => Some(*state),
            _ => None,
        }
    }
}

impl PointerType {
    /// Check if this is a mouse pointer.
    #[must_use]
    pub const fn is_mouse(&self) -> bool {
        matches!(self, Self::Mouse)
    }

    /// Check if this is a touch pointer.
    #[must_use]
    pub const fn is_touch(&self) -> bool {
        matches!(self, Self::Touch)
    }
}

impl GestureState {
    /// Check if gesture is starting.
    #[must_use]
    pub const fn is_start(&self) -> bool {
        matches!(self, Self::Started)
    }

    /// Check if gesture is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Started | Self::Changed)
    }

    /// Check if gesture has ended.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}
