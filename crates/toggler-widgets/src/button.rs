//! Toggle-button pattern: a pill whose background tracks the state.

use crate::base::{ToggleBase, ToggleContext};
use crate::content::ContentBuilder;
use crate::interaction::TouchHoverAnimationType;
use crate::layout::ToggleButtonLayoutAlgorithm;
use crate::paint_property::{ToggleButtonPaintProperty, ToggleColorType};
use crate::toggle::{TogglePattern, ToggleType};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use toggler_core::theme::ToggleButtonTheme;
use toggler_core::widget::AccessibleRole;
use toggler_core::{
    AnimatableValue, Canvas, Color, DirtyFlags, Easing, FrameNode, LayoutConstraint,
    ListenerKinds, Point, Rect, Size, Transition,
};

/// Paint inputs resolved from theme and paint property.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleButtonStyle {
    /// Background when on
    pub checked_color: Color,
    /// Background when off
    pub background_color: Color,
    /// Corner radius; negative means half the height
    pub border_radius: f32,
    /// Hover overlay
    pub hover_color: Color,
    /// Press overlay
    pub click_effect_color: Color,
    /// Focus ring
    pub focus_color: Color,
    /// Focus ring stroke width
    pub focus_ring_width: f32,
    /// Gap between button and focus ring
    pub focus_padding: f32,
    /// Overlay duration
    pub hover_duration_ms: u32,
    /// Background duration
    pub color_duration_ms: u32,
}

impl ToggleButtonStyle {
    /// Resolve paint inputs. User values win over theme values.
    #[must_use]
    pub fn resolve(theme: &ToggleButtonTheme, property: &ToggleButtonPaintProperty) -> Self {
        Self {
            checked_color: property.resolved_selected_color(theme),
            background_color: property.resolved_background_color(theme),
            border_radius: theme.border_radius,
            hover_color: theme.hover_color,
            click_effect_color: theme.click_effect_color,
            focus_color: theme.focus_color,
            focus_ring_width: theme.focus_ring_width,
            focus_padding: theme.focus_padding,
            hover_duration_ms: theme.hover_duration_ms,
            color_duration_ms: theme.color_duration_ms,
        }
    }
}

/// Animated toggle-button appearance.
#[derive(Debug, Clone)]
pub struct ToggleButtonModifier {
    style: ToggleButtonStyle,
    background: AnimatableValue<Color>,
    overlay_color: AnimatableValue<Color>,
    is_select: bool,
    bounds: Rect,
    is_focused: bool,
    focus_visible: bool,
}

impl ToggleButtonModifier {
    /// Create a modifier at rest.
    #[must_use]
    pub fn new(style: ToggleButtonStyle, is_on: bool, bounds: Rect) -> Self {
        let initial = if is_on {
            style.checked_color
        } else {
            style.background_color
        };
        Self {
            background: AnimatableValue::new(initial).with_transition(Transition::timed_ms(
                style.color_duration_ms,
                Easing::FastOutSlowIn,
            )),
            overlay_color: AnimatableValue::new(style.hover_color.blend_opacity(0.0)),
            style,
            is_select: is_on,
            bounds,
            is_focused: false,
            focus_visible: false,
        }
    }

    fn retarget(&mut self) {
        let target = if self.is_select {
            self.style.checked_color
        } else {
            self.style.background_color
        };
        self.background.set(target);
    }

    /// Replace the resolved style.
    pub fn set_style(&mut self, style: ToggleButtonStyle) {
        if style != self.style {
            self.style = style;
            self.retarget();
        }
    }

    /// Turn on or off.
    pub fn set_is_select(&mut self, is_on: bool) {
        self.is_select = is_on;
        self.retarget();
    }

    /// Button bounds in parent coordinates.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Overlay for a touch or hover transition.
    pub fn set_touch_hover(&mut self, kind: TouchHoverAnimationType) {
        let target = if kind.is_press() {
            self.style.click_effect_color
        } else if kind.is_hover() {
            self.style.hover_color
        } else {
            self.style.hover_color.blend_opacity(0.0)
        };
        self.overlay_color.set_transition(Transition::timed_ms(
            self.style.hover_duration_ms,
            Easing::FastOutSlowIn,
        ));
        self.overlay_color.set(target);
    }

    /// Focus state and visibility.
    pub fn set_focus(&mut self, focused: bool, visible: bool) {
        self.is_focused = focused;
        self.focus_visible = visible;
    }

    /// Advance animations.
    pub fn tick(&mut self, dt: f64) -> bool {
        let running = self.background.tick(dt);
        self.overlay_color.tick(dt) || running
    }

    /// Current background.
    #[must_use]
    pub const fn background(&self) -> Color {
        *self.background.get()
    }

    /// Target background.
    #[must_use]
    pub const fn background_target(&self) -> Color {
        *self.background.target()
    }

    /// Corner radius for the current bounds.
    #[must_use]
    pub fn corner_radius(&self) -> f32 {
        if self.style.border_radius < 0.0 {
            self.bounds.height / 2.0
        } else {
            self.style.border_radius
        }
    }

    /// Focus ring bounds.
    #[must_use]
    pub fn focus_rect(&self) -> Rect {
        let padding = self.style.focus_padding;
        self.bounds.inflate(padding, padding)
    }

    /// Draw focus ring, background and overlay.
    pub fn paint(&self, canvas: &mut dyn Canvas) {
        let radius = self.corner_radius();
        if self.is_focused && self.focus_visible {
            canvas.stroke_rounded_rect(
                self.focus_rect(),
                radius + self.style.focus_padding,
                self.style.focus_color,
                self.style.focus_ring_width,
            );
        }
        canvas.fill_rounded_rect(self.bounds, radius, self.background());
        let overlay = *self.overlay_color.get();
        if overlay.a > 0.0 {
            canvas.fill_rounded_rect(self.bounds, radius, overlay);
        }
    }
}

/// Toggle-button pattern.
#[derive(Debug)]
pub struct ToggleButtonPattern {
    base: ToggleBase,
    modifier: Option<ToggleButtonModifier>,
}

impl ToggleButtonPattern {
    /// Attach a toggle button to a host node.
    pub fn new(host: &Rc<RefCell<FrameNode>>, ctx: ToggleContext) -> Self {
        let listeners = ListenerKinds::all().difference(ListenerKinds::PAN);
        let base = ToggleBase::new(host, ctx, listeners);
        base.update_property::<ToggleButtonPaintProperty>(|_| {});
        Self {
            base,
            modifier: None,
        }
    }

    /// The paint modifier, once the button has painted.
    #[must_use]
    pub const fn modifier(&self) -> Option<&ToggleButtonModifier> {
        self.modifier.as_ref()
    }

    /// Copy of the paint property.
    #[must_use]
    pub fn paint_property(&self) -> ToggleButtonPaintProperty {
        self.base.property()
    }

    fn theme(&self) -> Option<ToggleButtonTheme> {
        self.base.with_theme(|theme| theme.toggle_button.clone())
    }

    fn style(&self) -> Option<ToggleButtonStyle> {
        let theme = self.theme()?;
        Some(ToggleButtonStyle::resolve(&theme, &self.paint_property()))
    }

    fn sync_modifier(&mut self) {
        let Some(style) = self.style() else { return };
        let is_on = self.base.is_on;
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_style(style);
            modifier.set_is_select(is_on);
        }
        self.base.mark_dirty(DirtyFlags::RENDER);
    }

    fn update_focus_rect(&self) {
        let ring = if self.base.session.is_focus {
            let padding = self.theme().map_or(0.0, |theme| theme.focus_padding);
            Some(self.base.content_box().inflate(padding, padding))
        } else {
            None
        };
        self.base.with_host(|node| {
            let origin = node.geometry.frame_offset;
            node.focus_paint_rect = ring.map(|rect| rect.translate(Point::ORIGIN - origin));
        });
    }

    fn edit_property(&mut self, f: impl FnOnce(&mut ToggleButtonPaintProperty)) {
        self.base.update_property(f);
        self.sync_modifier();
    }
}

impl TogglePattern for ToggleButtonPattern {
    fn toggle_type(&self) -> ToggleType {
        ToggleType::Button
    }

    fn base(&self) -> &ToggleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ToggleBase {
        &mut self.base
    }

    fn apply_state(&mut self, is_on: bool, notify: bool) -> bool {
        if !self.base.commit(is_on, notify) {
            return false;
        }
        self.base
            .update_property::<ToggleButtonPaintProperty>(|property| property.is_on = Some(is_on));
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_is_select(is_on);
        }
        self.base.write_inspector(ToggleType::Button.name());
        true
    }

    fn on_modify_done(&mut self) {
        if self.base.take_color_mode_change() {
            if let Some(theme) = self.theme() {
                self.base.update_property::<ToggleButtonPaintProperty>(|property| {
                    property.refresh_from_theme(&theme);
                });
            }
        }
        let is_on = self.base.is_on;
        self.base
            .update_property::<ToggleButtonPaintProperty>(|property| property.is_on = Some(is_on));
        self.sync_modifier();
        self.base.write_inspector(ToggleType::Button.name());
    }

    fn measure(&mut self, constraint: &LayoutConstraint) -> Size {
        let Some(theme) = self.theme() else {
            return Size::ZERO;
        };
        let algorithm = ToggleButtonLayoutAlgorithm::new(self.base.content.node());
        let frame = self
            .base
            .with_host(|node| algorithm.measure(node, constraint, &theme))
            .unwrap_or_default();
        self.on_layout_done();
        frame
    }

    fn on_layout_done(&mut self) {
        if self.base.take_layout_change().is_none() {
            return;
        }
        let bounds = self.base.content_box();
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_bounds(bounds);
        }
        self.update_focus_rect();
    }

    fn paint(&mut self, canvas: &mut dyn Canvas) {
        if self.base.content.is_active() {
            // The background stays under user content.
            if let Some(modifier) = self.modifier.as_ref() {
                modifier.paint(canvas);
            }
            self.base.with_host(|node| {
                for child in &node.children {
                    child.widget.paint(canvas);
                }
            });
            return;
        }
        if self.modifier.is_none() {
            let Some(style) = self.style() else { return };
            let mut modifier =
                ToggleButtonModifier::new(style, self.base.is_on, self.base.content_box());
            let session = &self.base.session;
            modifier.set_focus(session.is_focus, session.focus_visible);
            modifier.set_touch_hover(session.animation);
            self.modifier = Some(modifier);
        }
        if let Some(modifier) = self.modifier.as_ref() {
            modifier.paint(canvas);
        }
    }

    fn tick(&mut self, dt: f64) -> bool {
        let running = self
            .modifier
            .as_mut()
            .is_some_and(|modifier| modifier.tick(dt));
        if running {
            self.base.mark_dirty(DirtyFlags::RENDER);
        }
        running
    }

    fn set_color(&mut self, kind: ToggleColorType, color: Color) -> bool {
        let mut applied = false;
        self.edit_property(|property| applied = property.set_color(kind, color));
        applied
    }

    fn set_default_color(&mut self, kind: ToggleColorType, color: Color) -> bool {
        let mut applied = false;
        self.edit_property(|property| applied = property.set_default_color(kind, color));
        applied
    }

    fn set_content_builder(&mut self, builder: Option<ContentBuilder>) {
        self.base.set_content_builder(builder);
    }

    fn to_json_value(&self) -> serde_json::Value {
        let property = self.paint_property();
        let theme = self.theme().unwrap_or_default();
        json!({
            "type": ToggleType::Button.name(),
            "isOn": self.base.is_on,
            "enabled": self.base.enabled(),
            "selectedColor": property.resolved_selected_color(&theme).to_hex_with_alpha(),
            "backgroundColor": property.resolved_background_color(&theme).to_hex_with_alpha(),
            "customContent": self.base.content.is_active(),
        })
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::ToggleButton
    }

    fn on_touch_hover(&mut self, kind: TouchHoverAnimationType) {
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_touch_hover(kind);
        }
        self.base.mark_dirty(DirtyFlags::RENDER);
    }

    fn on_focus_changed(&mut self) {
        let session = &self.base.session;
        let (focused, visible) = (session.is_focus, session.focus_visible);
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_focus(focused, visible);
        }
        self.update_focus_rect();
        self.base.mark_dirty(DirtyFlags::RENDER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toggler_core::{Event, RecordingCanvas, TaskQueue, Theme, ThemeManager, WidgetId};

    fn setup() -> (Rc<RefCell<FrameNode>>, TaskQueue, ToggleButtonPattern) {
        let host = FrameNode::new_shared(WidgetId::new(4), "Toggle");
        let tasks = TaskQueue::new();
        let mut pattern = ToggleButtonPattern::new(
            &host,
            ToggleContext::new(Rc::new(ThemeManager::default()), tasks.clone()),
        );
        pattern.on_modify_done();
        pattern.measure(&LayoutConstraint::loose(Size::new(200.0, 200.0)));
        (host, tasks, pattern)
    }

    // ===== Layout Tests =====

    #[test]
    fn test_button_default_size_without_hot_zone() {
        let (host, _, _) = setup();
        let node = host.borrow();
        assert_eq!(node.geometry.content_size, Some(Size::new(72.0, 28.0)));
        assert!(node.response_regions.is_empty());
        assert_eq!(node.margin, None);
    }

    // ===== Paint Tests =====

    #[test]
    fn test_pill_radius_and_background() {
        let (_host, _, mut pattern) = setup();
        let mut canvas = RecordingCanvas::new();
        pattern.paint(&mut canvas);
        let theme = Theme::light().toggle_button;
        match &canvas.commands()[0] {
            toggler_core::DrawCommand::Rect { radius, style, .. } => {
                assert_eq!(*radius, 14.0);
                assert_eq!(style.fill, Some(theme.unchecked_color));
            }
            other => panic!("expected background rect, got {other:?}"),
        }
    }

    #[test]
    fn test_toggle_animates_to_checked_color() {
        let (_host, tasks, mut pattern) = setup();
        pattern.paint(&mut RecordingCanvas::new());
        pattern.set_on_change(Some(Rc::new(|_| {})));
        pattern.handle_event(&Event::Click {
            position: Point::new(1.0, 1.0),
        });
        assert_eq!(tasks.len(), 1);
        let modifier = pattern.modifier().unwrap();
        assert_eq!(
            modifier.background_target(),
            Theme::light().toggle_button.checked_color
        );
        assert!(pattern.tick(1.0 / 60.0));
    }

    #[test]
    fn test_explicit_radius_is_kept() {
        let style = ToggleButtonStyle {
            border_radius: 6.0,
            ..ToggleButtonStyle::resolve(
                &ToggleButtonTheme::default(),
                &ToggleButtonPaintProperty::default(),
            )
        };
        let modifier = ToggleButtonModifier::new(style, false, Rect::new(0.0, 0.0, 72.0, 28.0));
        assert_eq!(modifier.corner_radius(), 6.0);
    }

    // ===== Color Tests =====

    #[test]
    fn test_background_color_supported() {
        let (_host, _, mut pattern) = setup();
        assert!(pattern.set_color(ToggleColorType::Background, Color::BLUE));
        assert!(!pattern.set_color(ToggleColorType::Point, Color::BLUE));
        assert_eq!(
            pattern.to_json_value()["backgroundColor"],
            Color::BLUE.to_hex_with_alpha()
        );
    }

    #[test]
    fn test_press_overlay_follows_touch() {
        let (_host, _, mut pattern) = setup();
        pattern.paint(&mut RecordingCanvas::new());
        pattern.handle_event(&Event::TouchDown {
            position: Point::ORIGIN,
        });
        for _ in 0..30 {
            pattern.tick(1.0 / 60.0);
        }
        let mut canvas = RecordingCanvas::new();
        pattern.paint(&mut canvas);
        assert_eq!(canvas.command_count(), 2);
        assert_eq!(
            canvas.commands()[1].fill_color(),
            Some(Theme::light().toggle_button.click_effect_color)
        );
    }

    #[test]
    fn test_role_and_listeners() {
        let (host, _, pattern) = setup();
        assert_eq!(pattern.accessible_role(), AccessibleRole::ToggleButton);
        let listeners = host.borrow().listeners();
        assert!(listeners.contains(ListenerKinds::CLICK | ListenerKinds::KEY));
        assert!(!listeners.contains(ListenerKinds::PAN));
        assert_eq!(host.borrow().inspector.get("type").map(String::as_str), Some("Button"));
    }
}
