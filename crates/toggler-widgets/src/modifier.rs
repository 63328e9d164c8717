//! Switch paint modifier: animated appearance of track, overlay and thumb.
//!
//! The modifier owns every animated property. Patterns retarget it; the host
//! advances it through [`SwitchModifier::tick`] and reads it back by painting.

use crate::interaction::TouchHoverAnimationType;
use crate::paint_property::SwitchPaintProperty;
use toggler_core::theme::SwitchTheme;
use toggler_core::{
    AnimatableValue, Canvas, Color, Easing, Point, Rect, Size, SpringConfig, Transition,
};

/// Paint inputs resolved from theme and paint property.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStyle {
    /// Track color when on
    pub active_color: Color,
    /// Track color when on and showing focus
    pub active_color_focused: Color,
    /// Track color when off
    pub inactive_color: Color,
    /// Thumb color
    pub point_color: Color,
    /// Thumb color the user chose; overrides every other thumb color
    pub user_point_color: Option<Color>,
    /// Thumb color when off
    pub point_color_unchecked: Color,
    /// Thumb color when off and focused
    pub point_color_unchecked_focused: Color,
    /// Use the unchecked thumb colors
    pub use_diff_point_color: bool,
    /// Hover overlay
    pub hover_color: Color,
    /// Press overlay
    pub click_effect_color: Color,
    /// Focus ring
    pub focus_color: Color,
    /// Focus ring stroke width
    pub focus_ring_width: f32,
    /// Gap between content box and focus ring
    pub focus_padding: f32,
    /// Gap between thumb and track edge
    pub point_gap: f32,
    /// Explicit thumb radius
    pub point_radius: Option<f32>,
    /// Explicit track corner radius
    pub track_radius: Option<f32>,
    /// Hover overlay duration
    pub hover_duration_ms: u32,
    /// Press overlay duration
    pub press_duration_ms: u32,
    /// Color change duration
    pub color_duration_ms: u32,
}

impl SwitchStyle {
    /// Resolve paint inputs. User values win over theme values.
    #[must_use]
    pub fn resolve(theme: &SwitchTheme, property: &SwitchPaintProperty) -> Self {
        let active_color = property.resolved_selected_color(theme);
        let selected_by_user = property.selected_color.is_some_and(|c| c.is_user());
        Self {
            active_color,
            active_color_focused: if selected_by_user {
                active_color
            } else {
                theme.active_color_focused
            },
            inactive_color: property.resolved_unselected_color(theme),
            point_color: property.resolved_point_color(theme),
            user_point_color: property.user_point_color(),
            point_color_unchecked: theme.point_color_unchecked,
            point_color_unchecked_focused: theme.point_color_unchecked_focused,
            use_diff_point_color: theme.use_diff_point_color,
            hover_color: theme.hover_color,
            click_effect_color: theme.click_effect_color,
            focus_color: theme.focus_color,
            focus_ring_width: theme.focus_ring_width,
            focus_padding: theme.focus_padding,
            point_gap: theme.point_gap,
            point_radius: property.point_radius.map(|r| r.value()),
            track_radius: property.track_border_radius.map(|r| r.value()),
            hover_duration_ms: theme.hover_duration_ms,
            press_duration_ms: theme.press_duration_ms,
            color_duration_ms: theme.color_duration_ms,
        }
    }
}

impl Default for SwitchStyle {
    fn default() -> Self {
        Self::resolve(&SwitchTheme::default(), &SwitchPaintProperty::default())
    }
}

/// Animated switch appearance.
#[derive(Debug, Clone)]
pub struct SwitchModifier {
    style: SwitchStyle,
    board_color: AnimatableValue<Color>,
    overlay_color: AnimatableValue<Color>,
    point_color: AnimatableValue<Color>,
    point_offset: AnimatableValue<f32>,
    point_radius: AnimatableValue<f32>,
    track_radius: AnimatableValue<f32>,
    drag_offset: AnimatableValue<f32>,
    is_select: AnimatableValue<bool>,
    size: AnimatableValue<Size>,
    offset: AnimatableValue<Point>,
    is_drag: bool,
    is_focused: bool,
    focus_visible: bool,
    right_to_left: bool,
    touch_hover: TouchHoverAnimationType,
}

impl SwitchModifier {
    /// Create a modifier at rest in the given state.
    ///
    /// The thumb starts at its resting position without animating.
    #[must_use]
    pub fn new(style: SwitchStyle, is_on: bool, size: Size, offset: Point) -> Self {
        let color = Transition::timed_ms(style.color_duration_ms, Easing::FastOutSlowIn);
        let mut modifier = Self {
            board_color: AnimatableValue::new(style.inactive_color).with_transition(color),
            overlay_color: AnimatableValue::new(style.hover_color.blend_opacity(0.0)),
            point_color: AnimatableValue::new(style.point_color).with_transition(color),
            point_offset: AnimatableValue::new(0.0)
                .with_transition(Transition::Spring(SpringConfig::THUMB)),
            point_radius: AnimatableValue::new(style.point_radius.unwrap_or_default())
                .with_transition(color),
            track_radius: AnimatableValue::new(style.track_radius.unwrap_or_default())
                .with_transition(color),
            drag_offset: AnimatableValue::new(0.0),
            is_select: AnimatableValue::new(is_on).with_transition(color),
            size: AnimatableValue::new(size),
            offset: AnimatableValue::new(offset),
            style,
            is_drag: false,
            is_focused: false,
            focus_visible: false,
            right_to_left: false,
            touch_hover: TouchHoverAnimationType::None,
        };
        modifier.board_color.set_immediate(modifier.board_target());
        modifier.point_color.set_immediate(modifier.thumb_color_goal());
        modifier.point_offset.set_immediate(modifier.resting_offset());
        modifier
    }

    /// Set the layout direction at creation, keeping the thumb at rest.
    #[must_use]
    pub fn with_right_to_left(mut self, right_to_left: bool) -> Self {
        self.right_to_left = right_to_left;
        self.point_offset.set_immediate(self.resting_offset());
        self
    }

    // =========================================================================
    // Retargeting
    // =========================================================================

    /// Replace the resolved style and retarget colors and radii.
    pub fn set_style(&mut self, style: SwitchStyle) {
        if style == self.style {
            return;
        }
        let color = Transition::timed_ms(style.color_duration_ms, Easing::FastOutSlowIn);
        self.board_color.set_transition(color);
        self.point_color.set_transition(color);
        // A radius animates only between two explicit values.
        match (self.style.point_radius, style.point_radius) {
            (Some(_), Some(radius)) => self.point_radius.set(radius),
            (None, Some(radius)) => self.point_radius.set_immediate(radius),
            _ => {}
        }
        match (self.style.track_radius, style.track_radius) {
            (Some(_), Some(radius)) => self.track_radius.set(radius),
            (None, Some(radius)) => self.track_radius.set_immediate(radius),
            _ => {}
        }
        self.style = style;
        self.retarget_colors();
        // The thumb radius bounds the travel.
        self.retarget_offset();
        self.set_touch_hover(self.touch_hover);
    }

    /// Select or deselect.
    pub fn set_is_select(&mut self, is_on: bool) {
        self.is_select.set(is_on);
        self.retarget_colors();
        self.retarget_offset();
    }

    /// Track size. The thumb snaps to its new resting position.
    pub fn set_size(&mut self, size: Size) {
        if size == *self.size.target() {
            return;
        }
        self.size.set(size);
        if !self.is_drag {
            self.point_offset.set_immediate(self.resting_offset());
        }
    }

    /// Track position in parent coordinates.
    pub fn set_offset(&mut self, offset: Point) {
        self.offset.set(offset);
    }

    /// Layout direction. A change animates the thumb to its mirrored end.
    pub fn set_right_to_left(&mut self, right_to_left: bool) {
        if self.right_to_left != right_to_left {
            self.right_to_left = right_to_left;
            self.retarget_offset();
        }
    }

    /// Follow a drag, or release the thumb with `None`.
    pub fn set_drag_offset(&mut self, offset: Option<f32>) {
        match offset {
            Some(offset) => {
                self.is_drag = true;
                self.drag_offset.set_immediate(offset);
                self.point_offset.set_immediate(offset);
            }
            None => {
                self.is_drag = false;
                self.retarget_offset();
            }
        }
    }

    /// Overlay for a touch or hover transition.
    pub fn set_touch_hover(&mut self, kind: TouchHoverAnimationType) {
        self.touch_hover = kind;
        let (target, millis) = if kind.is_press() {
            (self.style.click_effect_color, self.style.press_duration_ms)
        } else if kind.is_hover() {
            (self.style.hover_color, self.style.hover_duration_ms)
        } else {
            (
                self.style.hover_color.blend_opacity(0.0),
                self.style.hover_duration_ms,
            )
        };
        self.overlay_color
            .set_transition(Transition::timed_ms(millis, Easing::FastOutSlowIn));
        self.overlay_color.set(target);
    }

    /// Focus state.
    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
        self.retarget_colors();
    }

    /// Whether the system currently shows focus.
    pub fn set_focus_visible(&mut self, visible: bool) {
        self.focus_visible = visible;
        self.retarget_colors();
    }

    /// Advance every animation. Returns whether any is still running.
    pub fn tick(&mut self, dt: f64) -> bool {
        let mut running = false;
        running |= self.board_color.tick(dt);
        running |= self.overlay_color.tick(dt);
        running |= self.point_color.tick(dt);
        running |= self.point_offset.tick(dt);
        running |= self.point_radius.tick(dt);
        running |= self.track_radius.tick(dt);
        running |= self.is_select.tick(dt);
        running |= self.size.tick(dt);
        running |= self.offset.tick(dt);
        running
    }

    fn retarget_colors(&mut self) {
        self.board_color.set(self.board_target());
        self.point_color.set(self.thumb_color_goal());
    }

    fn retarget_offset(&mut self) {
        if !self.is_drag {
            self.point_offset.set(self.resting_offset());
        }
    }

    fn board_target(&self) -> Color {
        if !*self.is_select.target() {
            self.style.inactive_color
        } else if self.is_focused && self.focus_visible {
            self.style.active_color_focused
        } else {
            self.style.active_color
        }
    }

    fn thumb_color_goal(&self) -> Color {
        if let Some(color) = self.style.user_point_color {
            return color;
        }
        if !self.style.use_diff_point_color || *self.is_select.target() {
            self.style.point_color
        } else if self.is_focused {
            self.style.point_color_unchecked_focused
        } else {
            self.style.point_color_unchecked
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Thumb radius for a track size: the explicit radius, else half the
    /// height minus the gap.
    #[must_use]
    pub fn thumb_radius_for(size: Size, style: &SwitchStyle) -> f32 {
        style
            .point_radius
            .unwrap_or(size.height / 2.0 - style.point_gap)
    }

    /// Thumb travel for a track size: track width minus thumb diameter.
    #[must_use]
    pub fn travel_for(size: Size, style: &SwitchStyle) -> f32 {
        2.0f32.mul_add(-Self::thumb_radius_for(size, style), size.width)
    }

    /// Thumb travel between its two ends.
    #[must_use]
    pub fn thumb_travel(&self) -> f32 {
        Self::travel_for(*self.size.target(), &self.style)
    }

    /// Thumb offset at rest for the current state and direction.
    #[must_use]
    pub fn resting_offset(&self) -> f32 {
        let at_far_end = *self.is_select.target() != self.right_to_left;
        if at_far_end {
            self.thumb_travel()
        } else {
            0.0
        }
    }

    /// Thumb radius and gap to the track edge.
    #[must_use]
    pub fn thumb_metrics(&self) -> (f32, f32) {
        let half = self.size.get().height / 2.0;
        if self.style.point_radius.is_some() {
            let radius = *self.point_radius.get();
            (radius, half - radius)
        } else {
            (half - self.style.point_gap, self.style.point_gap)
        }
    }

    /// Track corner radius.
    #[must_use]
    pub fn track_corner_radius(&self) -> f32 {
        if self.style.track_radius.is_some() {
            *self.track_radius.get()
        } else {
            self.size.get().height / 2.0
        }
    }

    fn thumb_center(&self, point_offset: f32) -> Point {
        let size = *self.size.get();
        let origin = *self.offset.get();
        let (radius, _) = self.thumb_metrics();
        let x = if size.width >= size.height {
            origin.x + radius + point_offset
        } else {
            origin.x + point_offset
        };
        Point::new(x, origin.y + size.height / 2.0)
    }

    /// Track bounds in parent coordinates.
    #[must_use]
    pub fn track_rect(&self) -> Rect {
        Rect::from_origin_size(*self.offset.get(), *self.size.get())
    }

    /// Track bounds grown to cover the thumb at both ends.
    #[must_use]
    pub fn actual_box(&self) -> Rect {
        let (radius, _) = self.thumb_metrics();
        let thumb_box = |center: Point| {
            Rect::new(center.x - radius, center.y - radius, 2.0 * radius, 2.0 * radius)
        };
        let start = thumb_box(self.thumb_center(0.0));
        let end = thumb_box(self.thumb_center(self.thumb_travel()));
        self.track_rect().union(&start).union(&end)
    }

    /// Focus ring bounds.
    #[must_use]
    pub fn focus_rect(&self) -> Rect {
        let padding = self.style.focus_padding;
        self.actual_box().inflate(padding, padding)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current track color.
    #[must_use]
    pub const fn board_color(&self) -> Color {
        *self.board_color.get()
    }

    /// Target track color.
    #[must_use]
    pub const fn board_color_target(&self) -> Color {
        *self.board_color.target()
    }

    /// Current overlay color.
    #[must_use]
    pub const fn overlay_color(&self) -> Color {
        *self.overlay_color.get()
    }

    /// Target overlay color.
    #[must_use]
    pub const fn overlay_color_target(&self) -> Color {
        *self.overlay_color.target()
    }

    /// Target thumb color.
    #[must_use]
    pub const fn point_color_target(&self) -> Color {
        *self.point_color.target()
    }

    /// Current thumb offset.
    #[must_use]
    pub const fn point_offset(&self) -> f32 {
        *self.point_offset.get()
    }

    /// Target thumb offset.
    #[must_use]
    pub const fn point_offset_target(&self) -> f32 {
        *self.point_offset.target()
    }

    /// Last drag offset.
    #[must_use]
    pub const fn drag_offset(&self) -> f32 {
        *self.drag_offset.get()
    }

    /// Whether the thumb follows a drag.
    #[must_use]
    pub const fn is_drag(&self) -> bool {
        self.is_drag
    }

    /// Latest overlay animation.
    #[must_use]
    pub const fn touch_hover(&self) -> TouchHoverAnimationType {
        self.touch_hover
    }

    /// Whether any property is animating.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.board_color.is_animating()
            || self.overlay_color.is_animating()
            || self.point_color.is_animating()
            || self.point_offset.is_animating()
    }

    // =========================================================================
    // Paint
    // =========================================================================

    /// Draw focus ring, track, overlay and thumb, in that order.
    pub fn paint(&self, canvas: &mut dyn Canvas) {
        let track = self.track_rect();
        let corner = self.track_corner_radius();

        if self.is_focused && self.focus_visible {
            let ring = self.focus_rect();
            // Grow the corner by however far the ring sits outside the track.
            let spread = (track.x - ring.x).max(track.y - ring.y);
            canvas.stroke_rounded_rect(
                ring,
                corner + spread,
                self.style.focus_color,
                self.style.focus_ring_width,
            );
        }

        canvas.fill_rounded_rect(track, corner, self.board_color());

        let overlay = self.overlay_color();
        if overlay.a > 0.0 {
            canvas.fill_rounded_rect(track, corner, overlay);
        }

        let (radius, _) = self.thumb_metrics();
        canvas.fill_circle(
            self.thumb_center(self.point_offset()),
            radius,
            *self.point_color.get(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint_property::Themed;
    use toggler_core::{DrawCommand, RecordingCanvas};

    fn modifier(is_on: bool) -> SwitchModifier {
        SwitchModifier::new(
            SwitchStyle::default(),
            is_on,
            Size::new(36.0, 20.0),
            Point::ORIGIN,
        )
    }

    fn settle(modifier: &mut SwitchModifier) {
        for _ in 0..600 {
            if !modifier.tick(1.0 / 60.0) {
                break;
            }
        }
    }

    // ===== Thumb Position Tests =====

    #[test]
    fn test_first_update_snaps_thumb() {
        let modifier = modifier(true);
        assert_eq!(modifier.thumb_travel(), 20.0);
        assert_eq!(modifier.point_offset(), 20.0);
        assert!(!modifier.is_animating());
    }

    #[test]
    fn test_select_animates_thumb() {
        let mut modifier = modifier(false);
        modifier.set_is_select(true);
        assert_eq!(modifier.point_offset_target(), 20.0);
        assert!(modifier.is_animating());
        settle(&mut modifier);
        assert!((modifier.point_offset() - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_right_to_left_mirrors_resting_offset() {
        let mut modifier = modifier(true);
        modifier.set_right_to_left(true);
        assert_eq!(modifier.point_offset_target(), 0.0);
        modifier.set_is_select(false);
        assert_eq!(modifier.point_offset_target(), 20.0);
    }

    #[test]
    fn test_drag_offset_overrides_resting() {
        let mut modifier = modifier(false);
        modifier.set_drag_offset(Some(5.0));
        assert!(modifier.is_drag());
        assert_eq!(modifier.point_offset(), 5.0);
        assert_eq!(modifier.drag_offset(), 5.0);

        modifier.set_is_select(true);
        assert_eq!(modifier.point_offset(), 5.0);

        modifier.set_drag_offset(None);
        assert_eq!(modifier.point_offset_target(), 20.0);
    }

    #[test]
    fn test_resize_snaps_thumb() {
        let mut modifier = modifier(true);
        modifier.set_size(Size::new(50.0, 20.0));
        assert_eq!(modifier.point_offset(), 34.0);
        assert!(!modifier.is_animating());
    }

    #[test]
    fn test_explicit_radius_widens_travel() {
        let mut modifier = modifier(true);
        modifier.set_style(SwitchStyle {
            point_radius: Some(6.0),
            ..SwitchStyle::default()
        });
        assert_eq!(modifier.thumb_travel(), 24.0);
        assert_eq!(modifier.point_offset_target(), 24.0);
    }

    // ===== Color Tests =====

    #[test]
    fn test_board_color_follows_selection() {
        let style = SwitchStyle::default();
        let mut modifier = modifier(false);
        assert_eq!(modifier.board_color(), style.inactive_color);
        modifier.set_is_select(true);
        assert_eq!(modifier.board_color_target(), style.active_color);
    }

    #[test]
    fn test_overlay_targets_per_animation_type() {
        let style = SwitchStyle::default();
        let mut modifier = modifier(false);
        assert_eq!(modifier.overlay_color().a, 0.0);

        modifier.set_touch_hover(TouchHoverAnimationType::Hover);
        assert_eq!(modifier.overlay_color_target(), style.hover_color);
        modifier.set_touch_hover(TouchHoverAnimationType::HoverToPress);
        assert_eq!(modifier.overlay_color_target(), style.click_effect_color);
        modifier.set_touch_hover(TouchHoverAnimationType::PressToHover);
        assert_eq!(modifier.overlay_color_target(), style.hover_color);
        modifier.set_touch_hover(TouchHoverAnimationType::None);
        assert_eq!(modifier.overlay_color_target().a, 0.0);
    }

    #[test]
    fn test_diff_point_color_tracks_focus() {
        let style = SwitchStyle {
            use_diff_point_color: true,
            point_color_unchecked: Color::RED,
            point_color_unchecked_focused: Color::BLUE,
            ..SwitchStyle::default()
        };
        let mut modifier = SwitchModifier::new(style.clone(), false, Size::new(36.0, 20.0), Point::ORIGIN);
        assert_eq!(modifier.point_color_target(), Color::RED);
        modifier.set_focused(true);
        assert_eq!(modifier.point_color_target(), Color::BLUE);
        modifier.set_is_select(true);
        assert_eq!(modifier.point_color_target(), style.point_color);
    }

    #[test]
    fn test_user_point_color_wins() {
        let style = SwitchStyle {
            use_diff_point_color: true,
            user_point_color: Some(Color::RED),
            ..SwitchStyle::default()
        };
        let mut modifier = SwitchModifier::new(style, false, Size::new(36.0, 20.0), Point::ORIGIN);
        modifier.set_focused(true);
        assert_eq!(modifier.point_color_target(), Color::RED);
    }

    #[test]
    fn test_style_from_property_precedence() {
        let theme = SwitchTheme::default();
        let property = SwitchPaintProperty {
            selected_color: Some(Themed::user(Color::RED)),
            ..SwitchPaintProperty::default()
        };
        let style = SwitchStyle::resolve(&theme, &property);
        assert_eq!(style.active_color, Color::RED);
        assert_eq!(style.active_color_focused, Color::RED);
        assert_eq!(style.inactive_color, theme.inactive_color);
    }

    // ===== Geometry Tests =====

    #[test]
    fn test_default_thumb_metrics() {
        let modifier = modifier(false);
        assert_eq!(modifier.thumb_metrics(), (8.0, 2.0));
        assert_eq!(modifier.track_corner_radius(), 10.0);
        assert_eq!(modifier.actual_box(), Rect::new(0.0, 0.0, 36.0, 20.0));
    }

    #[test]
    fn test_explicit_radius_rederives_gap() {
        let style = SwitchStyle {
            point_radius: Some(12.0),
            track_radius: Some(4.0),
            ..SwitchStyle::default()
        };
        let modifier = SwitchModifier::new(style, false, Size::new(36.0, 20.0), Point::ORIGIN);
        assert_eq!(modifier.thumb_metrics(), (12.0, -2.0));
        assert_eq!(modifier.thumb_travel(), 12.0);
        assert_eq!(modifier.track_corner_radius(), 4.0);
        // A thumb taller than the track overflows it above and below.
        assert_eq!(modifier.actual_box(), Rect::new(0.0, -2.0, 36.0, 24.0));
    }

    #[test]
    fn test_narrow_track_centers_thumb_on_offset() {
        let modifier = SwitchModifier::new(
            SwitchStyle::default(),
            false,
            Size::new(10.0, 20.0),
            Point::new(5.0, 0.0),
        );
        assert_eq!(modifier.thumb_travel(), -6.0);
        assert_eq!(modifier.thumb_center(0.0), Point::new(5.0, 10.0));
    }

    // ===== Paint Tests =====

    #[test]
    fn test_paint_order_without_focus() {
        let mut canvas = RecordingCanvas::new();
        modifier(true).paint(&mut canvas);
        let commands = canvas.commands();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], DrawCommand::Rect { .. }));
        match &commands[1] {
            DrawCommand::Circle { center, radius, .. } => {
                // Far end: the thumb's right edge meets the track's.
                assert_eq!(*center, Point::new(28.0, 10.0));
                assert_eq!(*radius, 8.0);
            }
            other => panic!("expected thumb, got {other:?}"),
        }
    }

    #[test]
    fn test_paint_focus_ring_and_overlay() {
        let mut modifier = modifier(false);
        modifier.set_focused(true);
        modifier.set_focus_visible(true);
        modifier.set_touch_hover(TouchHoverAnimationType::Press);
        settle(&mut modifier);

        let mut canvas = RecordingCanvas::new();
        modifier.paint(&mut canvas);
        let commands = canvas.commands();
        assert_eq!(commands.len(), 4);
        assert!(commands[0].is_stroke());
        assert_eq!(
            commands[0].rect_bounds(),
            Some(modifier.actual_box().inflate(2.0, 2.0))
        );
        assert!(matches!(commands[3], DrawCommand::Circle { .. }));
    }

    #[test]
    fn test_focus_hidden_draws_no_ring() {
        let mut modifier = modifier(false);
        modifier.set_focused(true);
        let mut canvas = RecordingCanvas::new();
        modifier.paint(&mut canvas);
        assert!(!canvas.commands()[0].is_stroke());
    }
}
