//! Checkbox pattern: a square box with an animated tick.

use crate::base::{ToggleBase, ToggleContext};
use crate::content::ContentBuilder;
use crate::interaction::TouchHoverAnimationType;
use crate::layout::CheckboxLayoutAlgorithm;
use crate::paint_property::{CheckboxPaintProperty, ToggleColorType};
use crate::toggle::{TogglePattern, ToggleType};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use toggler_core::theme::CheckboxTheme;
use toggler_core::widget::AccessibleRole;
use toggler_core::{
    AnimatableValue, Canvas, Color, DirtyFlags, Easing, FrameNode, LayoutConstraint,
    ListenerKinds, Point, Rect, Size, Transition,
};

/// Tick mark corners as fractions of the box side.
const CHECK_MARK: [(f32, f32); 3] = [(0.25, 0.5), (0.42, 0.67), (0.75, 0.33)];

/// Paint inputs resolved from theme and paint property.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxStyle {
    /// Box fill and border when checked
    pub selected_color: Color,
    /// Box border when unchecked
    pub unselected_color: Color,
    /// Tick color
    pub check_mark_color: Color,
    /// Box corner radius
    pub border_radius: f32,
    /// Border stroke width
    pub border_width: f32,
    /// Tick stroke width
    pub check_stroke_width: f32,
    /// Hover overlay
    pub hover_color: Color,
    /// Press overlay
    pub click_effect_color: Color,
    /// Focus ring
    pub focus_color: Color,
    /// Focus ring stroke width
    pub focus_ring_width: f32,
    /// Gap between box and focus ring
    pub focus_padding: f32,
    /// Overlay duration
    pub hover_duration_ms: u32,
    /// Fill and tick duration
    pub color_duration_ms: u32,
}

impl CheckboxStyle {
    /// Resolve paint inputs. User values win over theme values.
    #[must_use]
    pub fn resolve(theme: &CheckboxTheme, property: &CheckboxPaintProperty) -> Self {
        Self {
            selected_color: property.resolved_selected_color(theme),
            unselected_color: property.resolved_unselected_color(theme),
            check_mark_color: property.resolved_check_mark_color(theme),
            border_radius: theme.border_radius,
            border_width: theme.border_width,
            check_stroke_width: theme.check_stroke_width,
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

/// Animated checkbox appearance.
#[derive(Debug, Clone)]
pub struct CheckboxModifier {
    style: CheckboxStyle,
    fill_color: AnimatableValue<Color>,
    border_color: AnimatableValue<Color>,
    check_progress: AnimatableValue<f32>,
    overlay_color: AnimatableValue<Color>,
    is_select: bool,
    bounds: Rect,
    is_focused: bool,
    focus_visible: bool,
}

impl CheckboxModifier {
    /// Create a modifier at rest.
    #[must_use]
    pub fn new(style: CheckboxStyle, is_on: bool, bounds: Rect) -> Self {
        let timed = Transition::timed_ms(style.color_duration_ms, Easing::FastOutSlowIn);
        let mut modifier = Self {
            fill_color: AnimatableValue::new(Color::TRANSPARENT).with_transition(timed),
            border_color: AnimatableValue::new(style.unselected_color).with_transition(timed),
            check_progress: AnimatableValue::new(0.0).with_transition(timed),
            overlay_color: AnimatableValue::new(style.hover_color.blend_opacity(0.0)),
            style,
            is_select: is_on,
            bounds,
            is_focused: false,
            focus_visible: false,
        };
        let (fill, border, progress) = modifier.targets();
        modifier.fill_color.set_immediate(fill);
        modifier.border_color.set_immediate(border);
        modifier.check_progress.set_immediate(progress);
        modifier
    }

    fn targets(&self) -> (Color, Color, f32) {
        if self.is_select {
            (self.style.selected_color, self.style.selected_color, 1.0)
        } else {
            (
                self.style.selected_color.blend_opacity(0.0),
                self.style.unselected_color,
                0.0,
            )
        }
    }

    fn retarget(&mut self) {
        let (fill, border, progress) = self.targets();
        self.fill_color.set(fill);
        self.border_color.set(border);
        self.check_progress.set(progress);
    }

    /// Replace the resolved style.
    pub fn set_style(&mut self, style: CheckboxStyle) {
        if style != self.style {
            self.style = style;
            self.retarget();
        }
    }

    /// Check or uncheck.
    pub fn set_is_select(&mut self, is_on: bool) {
        self.is_select = is_on;
        self.retarget();
    }

    /// Box bounds in parent coordinates.
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
        self.overlay_color
            .set_transition(Transition::timed_ms(self.style.hover_duration_ms, Easing::FastOutSlowIn));
        self.overlay_color.set(target);
    }

    /// Focus state and visibility.
    pub fn set_focus(&mut self, focused: bool, visible: bool) {
        self.is_focused = focused;
        self.focus_visible = visible;
    }

    /// Advance animations.
    pub fn tick(&mut self, dt: f64) -> bool {
        let mut running = self.fill_color.tick(dt);
        running |= self.border_color.tick(dt);
        running |= self.check_progress.tick(dt);
        running |= self.overlay_color.tick(dt);
        running
    }

    /// Visible fraction of the tick.
    #[must_use]
    pub const fn check_progress(&self) -> f32 {
        *self.check_progress.get()
    }

    /// Target box fill.
    #[must_use]
    pub const fn fill_color_target(&self) -> Color {
        *self.fill_color.target()
    }

    /// Focus ring bounds.
    #[must_use]
    pub fn focus_rect(&self) -> Rect {
        let padding = self.style.focus_padding;
        self.bounds.inflate(padding, padding)
    }

    /// Tick polyline truncated to the current progress.
    #[must_use]
    pub fn check_mark_points(&self) -> Vec<Point> {
        let side = self.bounds.width.min(self.bounds.height);
        let corners: Vec<Point> = CHECK_MARK
            .iter()
            .map(|&(x, y)| {
                Point::new(
                    side.mul_add(x, self.bounds.x),
                    side.mul_add(y, self.bounds.y),
                )
            })
            .collect();

        let progress = self.check_progress().clamp(0.0, 1.0);
        let first = corners[0].distance(&corners[1]);
        let second = corners[1].distance(&corners[2]);
        let drawn = progress * (first + second);

        if drawn <= first {
            let t = if first > 0.0 { drawn / first } else { 0.0 };
            vec![corners[0], corners[0].lerp(&corners[1], t)]
        } else {
            let t = if second > 0.0 { (drawn - first) / second } else { 1.0 };
            vec![corners[0], corners[1], corners[1].lerp(&corners[2], t)]
        }
    }

    /// Draw focus ring, box fill, overlay, border and tick.
    pub fn paint(&self, canvas: &mut dyn Canvas) {
        let radius = self.style.border_radius;
        if self.is_focused && self.focus_visible {
            canvas.stroke_rounded_rect(
                self.focus_rect(),
                radius + self.style.focus_padding,
                self.style.focus_color,
                self.style.focus_ring_width,
            );
        }

        let fill = *self.fill_color.get();
        if fill.a > 0.0 {
            canvas.fill_rounded_rect(self.bounds, radius, fill);
        }
        let overlay = *self.overlay_color.get();
        if overlay.a > 0.0 {
            canvas.fill_rounded_rect(self.bounds, radius, overlay);
        }

        let inset = self.style.border_width / 2.0;
        canvas.stroke_rounded_rect(
            self.bounds.inflate(-inset, -inset),
            (radius - inset).max(0.0),
            *self.border_color.get(),
            self.style.border_width,
        );

        if self.check_progress() > 0.0 {
            canvas.draw_path(
                &self.check_mark_points(),
                self.style.check_mark_color,
                self.style.check_stroke_width,
            );
        }
    }
}

/// Checkbox pattern.
#[derive(Debug)]
pub struct CheckboxPattern {
    base: ToggleBase,
    modifier: Option<CheckboxModifier>,
}

impl CheckboxPattern {
    /// Attach a checkbox to a host node.
    pub fn new(host: &Rc<RefCell<FrameNode>>, ctx: ToggleContext) -> Self {
        let listeners = ListenerKinds::all().difference(ListenerKinds::PAN);
        let base = ToggleBase::new(host, ctx, listeners);
        base.update_property::<CheckboxPaintProperty>(|_| {});
        Self {
            base,
            modifier: None,
        }
    }

    /// The paint modifier, once the checkbox has painted.
    #[must_use]
    pub const fn modifier(&self) -> Option<&CheckboxModifier> {
        self.modifier.as_ref()
    }

    /// Copy of the paint property.
    #[must_use]
    pub fn paint_property(&self) -> CheckboxPaintProperty {
        self.base.property()
    }

    fn theme(&self) -> Option<CheckboxTheme> {
        self.base.with_theme(|theme| theme.checkbox.clone())
    }

    fn style(&self) -> Option<CheckboxStyle> {
        let theme = self.theme()?;
        Some(CheckboxStyle::resolve(&theme, &self.paint_property()))
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

    fn edit_property(&mut self, f: impl FnOnce(&mut CheckboxPaintProperty)) {
        self.base.update_property(f);
        self.sync_modifier();
    }
}

impl TogglePattern for CheckboxPattern {
    fn toggle_type(&self) -> ToggleType {
        ToggleType::Checkbox
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
            .update_property::<CheckboxPaintProperty>(|property| property.is_on = Some(is_on));
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_is_select(is_on);
        }
        self.base.write_inspector(ToggleType::Checkbox.name());
        true
    }

    fn on_modify_done(&mut self) {
        let theme = self.theme();
        if self.base.take_color_mode_change() {
            if let Some(theme) = theme.as_ref() {
                self.base.update_property::<CheckboxPaintProperty>(|property| {
                    property.refresh_from_theme(theme);
                });
            }
        }
        let is_on = self.base.is_on;
        self.base
            .update_property::<CheckboxPaintProperty>(|property| property.is_on = Some(is_on));
        if let Some(theme) = theme.as_ref() {
            self.base.apply_default_margin(
                theme.hot_zone_horizontal_padding,
                theme.hot_zone_vertical_padding,
            );
        }
        self.sync_modifier();
        self.base.write_inspector(ToggleType::Checkbox.name());
    }

    fn measure(&mut self, constraint: &LayoutConstraint) -> Size {
        let Some(theme) = self.theme() else {
            return Size::ZERO;
        };
        let algorithm = CheckboxLayoutAlgorithm::new(self.base.content.node());
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
        if let Some(theme) = self.theme() {
            self.base.refresh_hot_zone(
                theme.hot_zone_horizontal_padding,
                theme.hot_zone_vertical_padding,
            );
        }
        self.update_focus_rect();
    }

    fn paint(&mut self, canvas: &mut dyn Canvas) {
        if self.base.content.is_active() {
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
                CheckboxModifier::new(style, self.base.is_on, self.base.content_box());
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
        self.modifier = None;
        self.base.set_content_builder(builder);
    }

    fn to_json_value(&self) -> serde_json::Value {
        let property = self.paint_property();
        let theme = self.theme().unwrap_or_default();
        json!({
            "type": ToggleType::Checkbox.name(),
            "isOn": self.base.is_on,
            "enabled": self.base.enabled(),
            "selectedColor": property.resolved_selected_color(&theme).to_hex_with_alpha(),
            "unselectedColor": property.resolved_unselected_color(&theme).to_hex_with_alpha(),
            "checkMarkColor": property.resolved_check_mark_color(&theme).to_hex_with_alpha(),
            "customContent": self.base.content.is_active(),
        })
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Checkbox
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
