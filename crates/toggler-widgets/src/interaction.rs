//! Touch, hover and drag bookkeeping shared by the toggle patterns.

use serde::{Deserialize, Serialize};
use toggler_core::PointerType;

/// Overlay animation requested by the latest touch or hover transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TouchHoverAnimationType {
    /// No overlay
    #[default]
    None,
    /// Pointer hovering
    Hover,
    /// Pressed without hover
    Press,
    /// Pressed while hovering
    HoverToPress,
    /// Released while still hovering
    PressToHover,
}

impl TouchHoverAnimationType {
    /// Whether the overlay shows the press color.
    #[must_use]
    pub const fn is_press(self) -> bool {
        matches!(self, Self::Press | Self::HoverToPress)
    }

    /// Whether the overlay shows the hover color.
    #[must_use]
    pub const fn is_hover(self) -> bool {
        matches!(self, Self::Hover | Self::PressToHover)
    }
}

/// An in-flight thumb drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Movement passed the platform drag distance
    pub active: bool,
    /// Horizontal movement since the pan started
    pub accumulated: f32,
    /// Thumb offset when the pan started
    pub baseline: f32,
    /// State when the pan started
    pub pre_drag_on: bool,
    /// Pointer driving the pan
    pub pointer_type: PointerType,
}

impl DragState {
    /// Start a pending drag.
    #[must_use]
    pub const fn new(baseline: f32, pre_drag_on: bool, pointer_type: PointerType) -> Self {
        Self {
            active: false,
            accumulated: 0.0,
            baseline,
            pre_drag_on,
            pointer_type,
        }
    }

    /// Thumb offset for the current movement, kept within `[0, travel]`.
    #[must_use]
    pub fn offset(&self, travel: f32) -> f32 {
        (self.baseline + self.accumulated).max(0.0).min(travel)
    }

    /// Whether the thumb moved at least half the travel away from where it
    /// started, i.e. toward the opposite end.
    #[must_use]
    pub fn commits(&self, travel: f32) -> bool {
        (self.offset(travel) - self.baseline).abs() >= travel / 2.0
    }
}

/// Per-gesture state of a toggle. Cleared when a gesture ends or cancels.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    /// Current drag, switches only
    pub drag: Option<DragState>,
    /// A touch is down
    pub is_touch: bool,
    /// The pointer is over the widget
    pub is_hover: bool,
    /// The widget holds focus
    pub is_focus: bool,
    /// The system shows focus indicators
    pub focus_visible: bool,
    /// Hover feedback enabled
    pub hover_effect: bool,
    /// Latest overlay animation
    pub animation: TouchHoverAnimationType,
}

impl Default for GestureSession {
    fn default() -> Self {
        Self {
            drag: None,
            is_touch: false,
            is_hover: false,
            is_focus: false,
            focus_visible: false,
            hover_effect: true,
            animation: TouchHoverAnimationType::None,
        }
    }
}

impl GestureSession {
    /// Touch down.
    pub fn touch_down(&mut self) -> TouchHoverAnimationType {
        self.is_touch = true;
        self.animation = if self.is_hover {
            TouchHoverAnimationType::HoverToPress
        } else {
            TouchHoverAnimationType::Press
        };
        self.animation
    }

    /// Touch up.
    pub fn touch_up(&mut self) -> TouchHoverAnimationType {
        self.is_touch = false;
        self.animation = if self.is_hover {
            TouchHoverAnimationType::PressToHover
        } else {
            TouchHoverAnimationType::None
        };
        self.animation
    }

    /// Touch cancelled: back to idle regardless of hover.
    pub fn touch_cancel(&mut self) -> TouchHoverAnimationType {
        self.is_touch = false;
        self.animation = TouchHoverAnimationType::None;
        self.animation
    }

    /// Mouse enter or leave. `None` when hover feedback is off.
    pub fn hover(&mut self, entered: bool) -> Option<TouchHoverAnimationType> {
        if !self.hover_effect {
            return None;
        }
        self.is_hover = entered;
        self.animation = if entered {
            TouchHoverAnimationType::Hover
        } else {
            TouchHoverAnimationType::None
        };
        Some(self.animation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Touch / Hover Tests =====

    #[test]
    fn test_touch_without_hover() {
        let mut session = GestureSession::default();
        assert_eq!(session.touch_down(), TouchHoverAnimationType::Press);
        assert!(session.is_touch);
        assert_eq!(session.touch_up(), TouchHoverAnimationType::None);
        assert!(!session.is_touch);
    }

    #[test]
    fn test_touch_while_hovering() {
        let mut session = GestureSession::default();
        session.hover(true);
        assert_eq!(session.touch_down(), TouchHoverAnimationType::HoverToPress);
        assert_eq!(session.touch_up(), TouchHoverAnimationType::PressToHover);
    }

    #[test]
    fn test_touch_cancel_resets_while_hovering() {
        let mut session = GestureSession::default();
        session.hover(true);
        session.touch_down();
        assert_eq!(session.touch_cancel(), TouchHoverAnimationType::None);
        assert!(!session.is_touch);
        assert!(session.is_hover);
    }

    #[test]
    fn test_hover_disabled_is_ignored() {
        let mut session = GestureSession {
            hover_effect: false,
            ..GestureSession::default()
        };
        assert_eq!(session.hover(true), None);
        assert!(!session.is_hover);
    }

    #[test]
    fn test_animation_type_classes() {
        assert!(TouchHoverAnimationType::HoverToPress.is_press());
        assert!(TouchHoverAnimationType::PressToHover.is_hover());
        assert!(!TouchHoverAnimationType::None.is_hover());
    }

    // ===== Drag Tests =====

    #[test]
    fn test_drag_offset_clamped_to_travel() {
        let mut drag = DragState::new(0.0, false, PointerType::Touch);
        drag.accumulated = 50.0;
        assert_eq!(drag.offset(16.0), 16.0);
        drag.accumulated = -5.0;
        assert_eq!(drag.offset(16.0), 0.0);
    }

    #[test]
    fn test_drag_commits_at_half_travel() {
        let mut drag = DragState::new(0.0, false, PointerType::Mouse);
        drag.accumulated = 7.9;
        assert!(!drag.commits(16.0));
        drag.accumulated = 8.0;
        assert!(drag.commits(16.0));
    }

    #[test]
    fn test_drag_from_on_moves_left() {
        let mut drag = DragState::new(16.0, true, PointerType::Mouse);
        drag.accumulated = -10.0;
        assert_eq!(drag.offset(16.0), 6.0);
        assert!(drag.commits(16.0));
    }

    #[test]
    fn test_drag_negative_travel_does_not_panic() {
        let mut drag = DragState::new(0.0, false, PointerType::Mouse);
        drag.accumulated = 3.0;
        assert_eq!(drag.offset(-4.0), -4.0);
    }
}
