//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle driven by the host:
//!
//! 1. **Measure**: compute a size from a [`LayoutConstraint`]
//! 2. **Layout**: accept the bounds the parent allocated
//! 3. **Paint**: emit draw calls on a [`Canvas`]
//!
//! Events are delivered between frames through [`Widget::event`].
//!
//! # Examples
//!
//! ```
//! use toggler_core::{EventResult, WidgetId};
//!
//! let id = WidgetId::new(42);
//! assert_eq!(id.0, 42);
//! assert!(EventResult::Handled.is_handled());
//! ```

use crate::constraints::LayoutConstraint;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};

/// Unique identifier for a widget instance or host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Create a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Whether an event was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    /// The widget acted on the event
    Handled,
    /// The widget did not act on the event
    #[default]
    Ignored,
}

impl EventResult {
    /// Check whether the event was consumed.
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Core widget trait.
///
/// Widgets live on the single UI thread; nothing here requires `Send`.
pub trait Widget {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute size under the given constraint.
    fn measure(&self, constraint: &LayoutConstraint) -> Size;

    /// Accept allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Emit draw calls.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle an input event.
    fn event(&mut self, event: &Event) -> EventResult;

    /// Check if this widget is interactive (can receive events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Canvas trait for paint operations.
///
/// A minimal abstraction over the rendering backend.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a filled rectangle with uniform corner radius.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    /// Draw a stroked rectangle with uniform corner radius.
    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, width: f32);

    /// Draw a filled circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Draw a stroked circle.
    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32);

    /// Draw a path (polyline) with round caps.
    fn draw_path(&mut self, points: &[Point], color: Color, width: f32);
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Button
    Button,
    /// Toggle button (pressed/unpressed)
    ToggleButton,
    /// Checkbox
    Checkbox,
    /// Switch
    Switch,
}
