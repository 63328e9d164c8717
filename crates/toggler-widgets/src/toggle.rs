//! Toggle widget: one facade over the checkbox, button and switch patterns.

use crate::base::{ChangeCallback, ToggleBase, ToggleContext};
use crate::button::ToggleButtonPattern;
use crate::checkbox::CheckboxPattern;
use crate::content::ContentBuilder;
use crate::interaction::TouchHoverAnimationType;
use crate::paint_property::ToggleColorType;
use crate::switch::SwitchPattern;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use toggler_core::{
    widget::{AccessibleRole, LayoutResult},
    Canvas, Color, DirtyFlags, Event, EventResult, FrameNode, LayoutConstraint, Rect, Size,
    TypeId, Widget, WidgetId,
};
use tracing::debug;

/// Visual variant of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToggleType {
    /// Square box with a tick
    Checkbox,
    /// Button with a latched background
    Button,
    /// Track with a sliding thumb
    #[default]
    Switch,
}

impl ToggleType {
    /// Name used in inspector output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Checkbox => "Checkbox",
            Self::Button => "Button",
            Self::Switch => "Switch",
        }
    }
}

/// Behavior shared by the three toggle patterns.
///
/// A pattern mediates between host events and its paint modifier. State
/// changes driven by the user post a change notification; changes made
/// through [`set_is_on`](Self::set_is_on) or a restore do not.
pub trait TogglePattern: fmt::Debug {
    /// Variant implemented by this pattern.
    fn toggle_type(&self) -> ToggleType;

    /// Shared state.
    fn base(&self) -> &ToggleBase;

    /// Shared state, mutably.
    fn base_mut(&mut self) -> &mut ToggleBase;

    /// Set the state, updating paint property and modifier. Returns whether
    /// the state changed.
    fn apply_state(&mut self, is_on: bool, notify: bool) -> bool;

    /// Synchronize paint property, theme defaults and modifier after the
    /// host finished applying attribute changes.
    fn on_modify_done(&mut self);

    /// Measure into the host geometry. Returns the frame size.
    fn measure(&mut self, constraint: &LayoutConstraint) -> Size;

    /// React to new geometry.
    fn on_layout_done(&mut self);

    /// Paint the default rendering or the custom content.
    fn paint(&mut self, canvas: &mut dyn Canvas);

    /// Advance animations. Returns whether any is still running.
    fn tick(&mut self, dt: f64) -> bool;

    /// Set a color explicitly.
    fn set_color(&mut self, kind: ToggleColorType, color: Color) -> bool;

    /// Set a color with theme provenance.
    fn set_default_color(&mut self, kind: ToggleColorType, color: Color) -> bool;

    /// Inspector output.
    fn to_json_value(&self) -> serde_json::Value;

    /// Accessible role of the variant.
    fn accessible_role(&self) -> AccessibleRole;

    /// Overlay hook for touch and hover transitions.
    fn on_touch_hover(&mut self, kind: TouchHoverAnimationType);

    /// Focus or focus visibility changed.
    fn on_focus_changed(&mut self);

    /// Events only this variant understands.
    fn handle_variant_event(&mut self, _event: &Event) -> EventResult {
        EventResult::Ignored
    }

    /// Switch-specific operations.
    fn as_switch_mut(&mut self) -> Option<&mut SwitchPattern> {
        None
    }

    /// Current state.
    fn is_on(&self) -> bool {
        self.base().is_on
    }

    /// Set the state without notifying.
    fn set_is_on(&mut self, is_on: bool) {
        self.apply_state(is_on, false);
    }

    /// Flip the state as a user action.
    fn toggle(&mut self) -> bool {
        let is_on = !self.is_on();
        self.apply_state(is_on, true)
    }

    /// Accessibility "select" action.
    fn select(&mut self) {
        self.apply_state(true, true);
    }

    /// Accessibility "clear selection" action.
    fn clear_selection(&mut self) {
        self.apply_state(false, true);
    }

    /// Toggles always expose a checked state.
    fn is_checkable(&self) -> bool {
        true
    }

    /// Checked state as reported to accessibility.
    fn is_checked(&self) -> bool {
        self.is_on()
    }

    /// Install or clear the change callback.
    fn set_on_change(&mut self, callback: Option<ChangeCallback>) {
        self.base_mut().set_on_change(callback);
    }

    /// Install or clear custom content.
    fn set_content_builder(&mut self, builder: Option<ContentBuilder>) {
        self.base_mut().set_content_builder(builder);
    }

    /// Enable or disable hover feedback.
    fn set_hover_effect(&mut self, enabled: bool) {
        self.base_mut().session.hover_effect = enabled;
    }

    /// State as a restore payload.
    fn provide_restore_info(&self) -> String {
        self.base().restore_info()
    }

    /// Apply a restore payload. Malformed payloads keep the current state.
    fn on_restore_info(&mut self, json: &str) {
        if let Some(is_on) = self.base().parse_restore(json) {
            self.apply_state(is_on, false);
        }
    }

    /// Dispatch a host event. A disabled host ignores input.
    fn handle_event(&mut self, event: &Event) -> EventResult {
        if !self.base().enabled() {
            debug!(id = ?self.base().id(), ?event, "event on disabled toggle");
            return EventResult::Ignored;
        }
        match self.handle_common_event(event) {
            Some(result) => result,
            None => self.handle_variant_event(event),
        }
    }

    /// Click, touch, hover, key and focus handling every variant shares.
    /// `None` for events it does not cover.
    fn handle_common_event(&mut self, event: &Event) -> Option<EventResult> {
        let handled = match event {
            Event::Click { .. } => {
                self.toggle();
                true
            }
            Event::TouchDown { .. } => {
                let kind = self.base_mut().session.touch_down();
                self.on_touch_hover(kind);
                true
            }
            Event::TouchUp { .. } => {
                let kind = self.base_mut().session.touch_up();
                self.on_touch_hover(kind);
                true
            }
            Event::TouchCancel => {
                let kind = self.base_mut().session.touch_cancel();
                self.on_touch_hover(kind);
                true
            }
            Event::MouseEnter | Event::MouseLeave => {
                let entered = matches!(event, Event::MouseEnter);
                match self.base_mut().session.hover(entered) {
                    Some(kind) => {
                        self.on_touch_hover(kind);
                        true
                    }
                    None => false,
                }
            }
            Event::KeyDown { .. } if self.base().is_activation(event) => {
                self.toggle();
                true
            }
            Event::FocusIn => {
                self.base_mut().focus_in();
                self.on_focus_changed();
                true
            }
            Event::FocusOut => {
                self.base_mut().focus_out();
                self.on_focus_changed();
                true
            }
            Event::FocusActiveChanged { active } => {
                if !self.base().session.is_focus {
                    return Some(EventResult::Ignored);
                }
                self.base_mut().session.focus_visible = *active;
                self.on_focus_changed();
                true
            }
            _ => return None,
        };
        Some(if handled {
            EventResult::Handled
        } else {
            EventResult::Ignored
        })
    }
}

/// Create the pattern for a variant.
#[must_use]
pub fn create_pattern(
    host: &Rc<RefCell<FrameNode>>,
    toggle_type: ToggleType,
    ctx: ToggleContext,
) -> Box<dyn TogglePattern> {
    match toggle_type {
        ToggleType::Checkbox => Box::new(CheckboxPattern::new(host, ctx)),
        ToggleType::Button => Box::new(ToggleButtonPattern::new(host, ctx)),
        ToggleType::Switch => Box::new(SwitchPattern::new(host, ctx)),
    }
}

/// Toggle widget hosting one pattern on a frame node.
pub struct Toggle {
    host: Rc<RefCell<FrameNode>>,
    ctx: ToggleContext,
    pattern: RefCell<Box<dyn TogglePattern>>,
    accessible_name_value: Option<String>,
    bounds: Rect,
}

impl fmt::Debug for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toggle")
            .field("pattern", &self.pattern)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Toggle {
    /// Create a toggle on a fresh host node.
    #[must_use]
    pub fn new(id: WidgetId, toggle_type: ToggleType, ctx: ToggleContext) -> Self {
        Self::with_host(FrameNode::new_shared(id, "Toggle"), toggle_type, ctx)
    }

    /// Create a toggle on an existing host node.
    #[must_use]
    pub fn with_host(
        host: Rc<RefCell<FrameNode>>,
        toggle_type: ToggleType,
        ctx: ToggleContext,
    ) -> Self {
        let mut pattern = create_pattern(&host, toggle_type, ctx.clone());
        pattern.on_modify_done();
        Self {
            host,
            ctx,
            pattern: RefCell::new(pattern),
            accessible_name_value: None,
            bounds: Rect::default(),
        }
    }

    /// Set the initial state.
    #[must_use]
    pub fn on(self, is_on: bool) -> Self {
        self.set_is_on(is_on);
        self
    }

    /// Set the change callback.
    #[must_use]
    pub fn on_change(self, callback: impl Fn(bool) + 'static) -> Self {
        self.set_on_change(callback);
        self
    }

    /// Set the accessible name.
    #[must_use]
    pub fn accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// The host node.
    #[must_use]
    pub const fn host(&self) -> &Rc<RefCell<FrameNode>> {
        &self.host
    }

    /// Current variant.
    #[must_use]
    pub fn toggle_type(&self) -> ToggleType {
        self.pattern.borrow().toggle_type()
    }

    /// Re-create the widget as another variant. State and callback carry
    /// over; custom content does not.
    pub fn set_toggle_type(&mut self, toggle_type: ToggleType, callback: Option<ChangeCallback>) {
        if self.toggle_type() == toggle_type {
            return;
        }
        let is_on = {
            let mut old = self.pattern.borrow_mut();
            old.set_content_builder(None);
            old.is_on()
        };
        let mut pattern = create_pattern(&self.host, toggle_type, self.ctx.clone());
        pattern.set_is_on(is_on);
        pattern.set_on_change(callback);
        pattern.on_modify_done();
        *self.pattern.get_mut() = pattern;
        self.host
            .borrow_mut()
            .mark_dirty(DirtyFlags::MEASURE | DirtyFlags::RENDER);
    }

    /// Run `f` on the pattern.
    pub fn with_pattern<R>(&self, f: impl FnOnce(&mut dyn TogglePattern) -> R) -> R {
        f(self.pattern.borrow_mut().as_mut())
    }

    /// Current state.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.pattern.borrow().is_on()
    }

    /// Set the state without notifying.
    pub fn set_is_on(&self, is_on: bool) {
        self.with_pattern(|pattern| pattern.set_is_on(is_on));
    }

    /// Set the change callback.
    pub fn set_on_change(&self, callback: impl Fn(bool) + 'static) {
        let callback: ChangeCallback = Rc::new(callback);
        self.with_pattern(|pattern| pattern.set_on_change(Some(callback)));
    }

    /// Install or clear custom content.
    pub fn set_content_builder(&self, builder: Option<ContentBuilder>) {
        self.with_pattern(|pattern| pattern.set_content_builder(builder));
    }

    /// Set a color explicitly.
    pub fn set_color(&self, kind: ToggleColorType, color: Color) -> bool {
        self.with_pattern(|pattern| pattern.set_color(kind, color))
    }

    /// Set a color with theme provenance.
    pub fn set_default_color(&self, kind: ToggleColorType, color: Color) -> bool {
        self.with_pattern(|pattern| pattern.set_default_color(kind, color))
    }

    /// Apply pending attribute changes.
    pub fn modify_done(&self) {
        self.with_pattern(|pattern| pattern.on_modify_done());
    }

    /// Advance animations.
    pub fn tick(&self, dt: f64) -> bool {
        self.with_pattern(|pattern| pattern.tick(dt))
    }

    /// State as a restore payload.
    #[must_use]
    pub fn provide_restore_info(&self) -> String {
        self.pattern.borrow().provide_restore_info()
    }

    /// Apply a restore payload.
    pub fn on_restore_info(&self, json: &str) {
        self.with_pattern(|pattern| pattern.on_restore_info(json));
    }

    /// Inspector output.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        self.pattern.borrow().to_json_value()
    }
}

impl Widget for Toggle {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraint: &LayoutConstraint) -> Size {
        self.pattern.borrow_mut().measure(constraint)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.host.borrow_mut().geometry.frame_offset = bounds.origin();
        self.pattern.get_mut().on_layout_done();
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        self.pattern.borrow_mut().paint(canvas);
    }

    fn event(&mut self, event: &Event) -> EventResult {
        self.pattern.get_mut().handle_event(event)
    }

    fn is_interactive(&self) -> bool {
        self.host.borrow().enabled
    }

    fn is_focusable(&self) -> bool {
        self.host.borrow().enabled
    }

    fn accessible_role(&self) -> AccessibleRole {
        self.pattern.borrow().accessible_role()
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
