//! Switch pattern: a track with a thumb that can be clicked or dragged.

use crate::base::{ToggleBase, ToggleContext};
use crate::content::ContentBuilder;
use crate::interaction::{DragState, TouchHoverAnimationType};
use crate::layout::SwitchLayoutAlgorithm;
use crate::modifier::{SwitchModifier, SwitchStyle};
use crate::paint_property::{SwitchPaintProperty, Themed, ToggleColorType};
use crate::toggle::{TogglePattern, ToggleType};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use toggler_core::theme::SwitchTheme;
use toggler_core::widget::AccessibleRole;
use toggler_core::{
    Canvas, Color, DirtyFlags, Event, EventResult, FrameNode, GestureState, LayoutConstraint,
    ListenerKinds, Point, PointerType, Size,
};
use tracing::{debug, trace};

/// Switch pattern.
#[derive(Debug)]
pub struct SwitchPattern {
    base: ToggleBase,
    modifier: Option<SwitchModifier>,
}

impl SwitchPattern {
    /// Attach a switch to a host node.
    pub fn new(host: &Rc<RefCell<FrameNode>>, ctx: ToggleContext) -> Self {
        let base = ToggleBase::new(host, ctx, ListenerKinds::all());
        base.update_property::<SwitchPaintProperty>(|_| {});
        Self {
            base,
            modifier: None,
        }
    }

    /// The paint modifier, once the switch has painted.
    #[must_use]
    pub const fn modifier(&self) -> Option<&SwitchModifier> {
        self.modifier.as_ref()
    }

    /// Copy of the paint property.
    #[must_use]
    pub fn paint_property(&self) -> SwitchPaintProperty {
        self.base.property()
    }

    fn theme(&self) -> Option<SwitchTheme> {
        self.base.with_theme(|theme| theme.switch.clone())
    }

    fn style(&self) -> Option<SwitchStyle> {
        let theme = self.theme()?;
        Some(SwitchStyle::resolve(&theme, &self.paint_property()))
    }

    /// Push resolved style, state and direction into the modifier.
    fn sync_modifier(&mut self) {
        let Some(style) = self.style() else { return };
        let is_on = self.base.is_on;
        let right_to_left = self.base.ctx.config.right_to_left;
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_style(style);
            modifier.set_is_select(is_on);
            modifier.set_right_to_left(right_to_left);
        }
        self.base.mark_dirty(DirtyFlags::RENDER);
    }

    fn ensure_modifier(&mut self) {
        if self.modifier.is_some() {
            return;
        }
        let Some(style) = self.style() else { return };
        let content = self.base.content_box();
        let session = &self.base.session;
        let mut modifier = SwitchModifier::new(style, self.base.is_on, content.size(), content.origin())
            .with_right_to_left(self.base.ctx.config.right_to_left);
        modifier.set_focused(session.is_focus);
        modifier.set_focus_visible(session.focus_visible);
        modifier.set_touch_hover(session.animation);
        self.modifier = Some(modifier);
    }

    // =========================================================================
    // Thumb geometry
    // =========================================================================

    /// Thumb travel for the last laid-out size: track width minus thumb
    /// diameter.
    #[must_use]
    pub fn thumb_travel(&self) -> f32 {
        let content = self.base.content_box();
        self.style()
            .map_or(0.0, |style| SwitchModifier::travel_for(content.size(), &style))
    }

    fn resting_offset(&self, is_on: bool) -> f32 {
        if is_on == self.base.ctx.config.right_to_left {
            0.0
        } else {
            self.thumb_travel()
        }
    }

    fn update_focus_rect(&self) {
        let focused = self.base.session.is_focus;
        let ring = match (&self.modifier, focused) {
            (_, false) => None,
            (Some(modifier), true) => Some(modifier.focus_rect()),
            (None, true) => {
                let padding = self.theme().map_or(0.0, |theme| theme.focus_padding);
                Some(self.base.content_box().inflate(padding, padding))
            }
        };
        self.base.with_host(|node| {
            let origin = node.geometry.frame_offset;
            node.focus_paint_rect = ring.map(|rect| rect.translate(Point::ORIGIN - origin));
        });
    }

    // =========================================================================
    // Drag
    // =========================================================================

    fn handle_pan(&mut self, delta: Point, state: GestureState, pointer_type: PointerType) -> EventResult {
        let travel = self.thumb_travel();
        match state {
            GestureState::Started => {
                let is_on = self.base.is_on;
                let baseline = self.resting_offset(is_on);
                self.base.session.drag = Some(DragState::new(baseline, is_on, pointer_type));
                trace!(baseline, travel, "switch drag started");
            }
            GestureState::Changed => {
                let threshold = self.base.ctx.config.drag_distance(pointer_type);
                let Some(drag) = self.base.session.drag.as_mut() else {
                    debug!("pan update without a started drag");
                    return EventResult::Ignored;
                };
                drag.accumulated += delta.x;
                if !drag.active && drag.accumulated.abs() >= threshold {
                    drag.active = true;
                }
                if drag.active {
                    let offset = drag.offset(travel);
                    if let Some(modifier) = self.modifier.as_mut() {
                        modifier.set_drag_offset(Some(offset));
                    }
                    self.base.mark_dirty(DirtyFlags::RENDER);
                }
            }
            GestureState::Ended => {
                let Some(drag) = self.base.session.drag.take() else {
                    debug!("pan end without a started drag");
                    return EventResult::Ignored;
                };
                if let Some(modifier) = self.modifier.as_mut() {
                    modifier.set_drag_offset(None);
                }
                if !drag.active {
                    // Never moved far enough to count as a drag.
                    self.toggle();
                } else if drag.commits(travel) {
                    self.apply_state(!drag.pre_drag_on, true);
                } else {
                    trace!(offset = drag.offset(travel), "switch drag reverted");
                    self.base.mark_dirty(DirtyFlags::RENDER);
                }
            }
            GestureState::Cancelled => {
                self.base.session.drag = None;
                if let Some(modifier) = self.modifier.as_mut() {
                    modifier.set_drag_offset(None);
                }
                self.base.mark_dirty(DirtyFlags::RENDER);
            }
        }
        EventResult::Handled
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn edit_property(&mut self, f: impl FnOnce(&mut SwitchPaintProperty)) {
        self.base.update_property(f);
        self.sync_modifier();
    }

    /// Set the thumb radius explicitly.
    pub fn set_point_radius(&mut self, radius: f32) {
        self.edit_property(|property| property.point_radius = Some(Themed::user(radius)));
    }

    /// Return the thumb radius to its derived default.
    pub fn reset_point_radius(&mut self) {
        self.edit_property(|property| property.point_radius = None);
    }

    /// Set the track corner radius explicitly.
    pub fn set_track_border_radius(&mut self, radius: f32) {
        self.edit_property(|property| property.track_border_radius = Some(Themed::user(radius)));
    }

    /// Return the track corner radius to its derived default.
    pub fn reset_track_border_radius(&mut self) {
        self.edit_property(|property| property.track_border_radius = None);
    }

    /// Add the hot-zone rectangle to the host's response regions.
    pub fn add_hot_zone_rect(&mut self) {
        if let Some(theme) = self.theme() {
            self.base.add_hot_zone_rect(
                theme.hot_zone_horizontal_padding,
                theme.hot_zone_vertical_padding,
            );
        }
    }

    /// Remove the last response region.
    pub fn remove_last_hot_zone_rect(&mut self) {
        self.base.remove_last_hot_zone_rect();
    }
}

impl TogglePattern for SwitchPattern {
    fn toggle_type(&self) -> ToggleType {
        ToggleType::Switch
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
            .update_property::<SwitchPaintProperty>(|property| property.is_on = Some(is_on));
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_is_select(is_on);
        }
        self.base.write_inspector(ToggleType::Switch.name());
        true
    }

    fn on_modify_done(&mut self) {
        let theme = self.theme();
        if self.base.take_color_mode_change() {
            if let Some(theme) = theme.as_ref() {
                self.base
                    .update_property::<SwitchPaintProperty>(|property| property.refresh_from_theme(theme));
            }
        }
        let is_on = self.base.is_on;
        self.base
            .update_property::<SwitchPaintProperty>(|property| property.is_on = Some(is_on));
        if let Some(theme) = theme.as_ref() {
            self.base.apply_default_margin(
                theme.hot_zone_horizontal_padding,
                theme.hot_zone_vertical_padding,
            );
        }
        self.base
            .with_host(|node| node.register_listeners(ListenerKinds::all()));
        self.sync_modifier();
        self.base.write_inspector(ToggleType::Switch.name());
    }

    fn measure(&mut self, constraint: &LayoutConstraint) -> Size {
        let Some(theme) = self.theme() else {
            return Size::ZERO;
        };
        let algorithm = SwitchLayoutAlgorithm::new(self.base.content.node());
        let config = self.base.ctx.config.clone();
        let frame = self
            .base
            .with_host(|node| algorithm.measure(node, constraint, &theme, &config))
            .unwrap_or_default();
        self.on_layout_done();
        frame
    }

    fn on_layout_done(&mut self) {
        let Some((size, offset)) = self.base.take_layout_change() else {
            return;
        };
        if let Some(modifier) = self.modifier.as_mut() {
            modifier.set_size(size);
            modifier.set_offset(offset);
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
        self.ensure_modifier();
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
        // Custom content paints itself; the default rendering starts over
        // when it is removed.
        self.modifier = None;
        self.base.set_content_builder(builder);
    }

    fn to_json_value(&self) -> serde_json::Value {
        let property = self.paint_property();
        let theme = self.theme().unwrap_or_default();
        json!({
            "type": ToggleType::Switch.name(),
            "isOn": self.base.is_on,
            "enabled": self.base.enabled(),
            "selectedColor": property.resolved_selected_color(&theme).to_hex_with_alpha(),
            "unselectedColor": property.resolved_unselected_color(&theme).to_hex_with_alpha(),
            "switchPointColor": property.resolved_point_color(&theme).to_hex_with_alpha(),
            "pointRadius": property.point_radius.map(|radius| radius.value()),
            "trackBorderRadius": property.track_border_radius.map(|radius| radius.value()),
            "customContent": self.base.content.is_active(),
        })
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Switch
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
            modifier.set_focused(focused);
            modifier.set_focus_visible(visible);
        }
        self.update_focus_rect();
        self.base.mark_dirty(DirtyFlags::RENDER);
    }

    fn handle_variant_event(&mut self, event: &Event) -> EventResult {
        match event {
            Event::Pan {
                delta,
                state,
                pointer_type,
            } => self.handle_pan(*delta, *state, *pointer_type),
            _ => EventResult::Ignored,
        }
    }

    fn as_switch_mut(&mut self) -> Option<&mut SwitchPattern> {
        Some(self)
    }
}
