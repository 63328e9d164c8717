//! Measure algorithms for the three toggle variants.
//!
//! Each algorithm is a pure function of the constraint, the node's padding
//! and layout policies, the theme metrics and the platform config. Custom
//! content, when present, replaces the default layout entirely.

use toggler_core::theme::{CheckboxTheme, SwitchTheme, ToggleButtonTheme};
use toggler_core::{
    FrameNode, LayoutConstraint, LayoutPolicy, Padding, PlatformConfig, Point, Size, WidgetId,
};
use tracing::trace;

/// Theme metrics one axis resolution needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleMetrics {
    /// Default outer width, hot zone included
    pub width: f32,
    /// Default outer height, hot zone included
    pub height: f32,
    /// Hot-zone padding on the left and right
    pub hot_zone_horizontal: f32,
    /// Hot-zone padding on the top and bottom
    pub hot_zone_vertical: f32,
}

impl From<&SwitchTheme> for ToggleMetrics {
    fn from(theme: &SwitchTheme) -> Self {
        Self {
            width: theme.width,
            height: theme.height,
            hot_zone_horizontal: theme.hot_zone_horizontal_padding,
            hot_zone_vertical: theme.hot_zone_vertical_padding,
        }
    }
}

impl From<&CheckboxTheme> for ToggleMetrics {
    fn from(theme: &CheckboxTheme) -> Self {
        Self {
            width: theme.width,
            height: theme.height,
            hot_zone_horizontal: theme.hot_zone_horizontal_padding,
            hot_zone_vertical: theme.hot_zone_vertical_padding,
        }
    }
}

impl From<&ToggleButtonTheme> for ToggleMetrics {
    fn from(theme: &ToggleButtonTheme) -> Self {
        Self {
            width: theme.width,
            height: theme.height,
            hot_zone_horizontal: 0.0,
            hot_zone_vertical: 0.0,
        }
    }
}

/// Resolve one axis: the explicit ideal size wins, otherwise the theme
/// default shrunk by the hot zone and the layout padding. Both are capped by
/// the max size. A match-parent policy then takes the parent's ideal size.
fn resolve_axis(
    ideal: Option<f32>,
    theme_default: f32,
    hot_zone: f32,
    padding: f32,
    max: f32,
    policy: LayoutPolicy,
    parent_ideal: Option<f32>,
) -> f32 {
    let value = ideal
        .unwrap_or(theme_default - 2.0 * hot_zone - padding)
        .min(max);
    match (policy, parent_ideal) {
        (LayoutPolicy::MatchParent, Some(parent)) => parent,
        _ => value,
    }
}

/// Content size before any variant-specific shaping.
#[must_use]
pub fn resolve_content_size(
    constraint: &LayoutConstraint,
    node: &FrameNode,
    metrics: ToggleMetrics,
) -> Size {
    let width = resolve_axis(
        constraint.self_ideal_size.width,
        metrics.width,
        metrics.hot_zone_horizontal,
        node.padding.horizontal(),
        constraint.max_size.width,
        node.layout_policies.width,
        constraint.parent_ideal_size.width,
    );
    let height = resolve_axis(
        constraint.self_ideal_size.height,
        metrics.height,
        metrics.hot_zone_vertical,
        node.padding.vertical(),
        constraint.max_size.height,
        node.layout_policies.height,
        constraint.parent_ideal_size.height,
    );
    Size::new(width, height)
}

/// Legacy aspect correction: shrink the longer side so the ratio holds.
#[must_use]
pub fn apply_legacy_ratio(size: Size, ratio: f32) -> Size {
    let current = size.width / size.height;
    if current > ratio {
        Size::new(size.height * ratio, size.height)
    } else if current < ratio {
        Size::new(size.width, size.width / ratio)
    } else {
        size
    }
}

/// Write a measured content size into the node.
///
/// Non-custom children collapse. With a custom content node the node takes
/// that child's measured size instead.
fn commit_measure(
    node: &mut FrameNode,
    constraint: &LayoutConstraint,
    custom_content: Option<WidgetId>,
    content: Option<Size>,
) -> Size {
    let content = match custom_content {
        Some(id) => {
            let mut measured = None;
            for child in &mut node.children {
                if child.id == id {
                    measured = Some(child.measure(constraint));
                } else {
                    child.geometry.reset();
                }
            }
            measured
        }
        None => {
            for child in &mut node.children {
                child.geometry.reset();
            }
            content
        }
    };

    let padding = node.padding;
    let content_size = content.unwrap_or_default();
    node.geometry.content_size = content;
    node.geometry.content_offset = Point::new(padding.left, padding.top);
    node.geometry.frame_size = frame_size(content_size, padding);
    trace!(?content, tag = node.tag(), "toggle measured");
    node.geometry.frame_size
}

fn frame_size(content: Size, padding: Padding) -> Size {
    Size::new(
        content.width + padding.horizontal(),
        content.height + padding.vertical(),
    )
}

// =============================================================================
// Switch
// =============================================================================

/// Layout of a switch track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchLayoutAlgorithm {
    custom_content: Option<WidgetId>,
}

impl SwitchLayoutAlgorithm {
    /// Create an algorithm; `custom_content` names the user content node.
    #[must_use]
    pub const fn new(custom_content: Option<WidgetId>) -> Self {
        Self { custom_content }
    }

    /// Content size of the track; `None` when custom content is laid out.
    #[must_use]
    pub fn measure_content(
        &self,
        constraint: &LayoutConstraint,
        node: &FrameNode,
        theme: &SwitchTheme,
        config: &PlatformConfig,
    ) -> Option<Size> {
        if self.custom_content.is_some() {
            return None;
        }
        let size = resolve_content_size(constraint, node, ToggleMetrics::from(theme));
        if config.is_legacy_layout() {
            Some(apply_legacy_ratio(size, theme.aspect_ratio))
        } else {
            Some(size)
        }
    }

    /// Measure into the node's geometry. Returns the frame size.
    pub fn measure(
        &self,
        node: &mut FrameNode,
        constraint: &LayoutConstraint,
        theme: &SwitchTheme,
        config: &PlatformConfig,
    ) -> Size {
        let content = self.measure_content(constraint, node, theme, config);
        commit_measure(node, constraint, self.custom_content, content)
    }
}

// =============================================================================
// Checkbox
// =============================================================================

/// Layout of a checkbox: always square, sized by the shorter side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckboxLayoutAlgorithm {
    custom_content: Option<WidgetId>,
}

impl CheckboxLayoutAlgorithm {
    /// Create an algorithm; `custom_content` names the user content node.
    #[must_use]
    pub const fn new(custom_content: Option<WidgetId>) -> Self {
        Self { custom_content }
    }

    /// Content size of the box; `None` when custom content is laid out.
    #[must_use]
    pub fn measure_content(
        &self,
        constraint: &LayoutConstraint,
        node: &FrameNode,
        theme: &CheckboxTheme,
    ) -> Option<Size> {
        if self.custom_content.is_some() {
            return None;
        }
        let size = resolve_content_size(constraint, node, ToggleMetrics::from(theme));
        let side = size.width.min(size.height);
        Some(Size::new(side, side))
    }

    /// Measure into the node's geometry. Returns the frame size.
    pub fn measure(
        &self,
        node: &mut FrameNode,
        constraint: &LayoutConstraint,
        theme: &CheckboxTheme,
    ) -> Size {
        let content = self.measure_content(constraint, node, theme);
        commit_measure(node, constraint, self.custom_content, content)
    }
}

// =============================================================================
// Toggle button
// =============================================================================

/// Layout of a toggle button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleButtonLayoutAlgorithm {
    custom_content: Option<WidgetId>,
}

impl ToggleButtonLayoutAlgorithm {
    /// Create an algorithm; `custom_content` names the user content node.
    #[must_use]
    pub const fn new(custom_content: Option<WidgetId>) -> Self {
        Self { custom_content }
    }

    /// Content size of the button; `None` when custom content is laid out.
    #[must_use]
    pub fn measure_content(
        &self,
        constraint: &LayoutConstraint,
        node: &FrameNode,
        theme: &ToggleButtonTheme,
    ) -> Option<Size> {
        if self.custom_content.is_some() {
            return None;
        }
        Some(resolve_content_size(
            constraint,
            node,
            ToggleMetrics::from(theme),
        ))
    }

    /// Measure into the node's geometry. Returns the frame size.
    pub fn measure(
        &self,
        node: &mut FrameNode,
        constraint: &LayoutConstraint,
        theme: &ToggleButtonTheme,
    ) -> Size {
        let content = self.measure_content(constraint, node, theme);
        commit_measure(node, constraint, self.custom_content, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toggler_core::{
        Canvas, ChildNode, Event, EventResult, LayoutResult, Rect, TypeId, Widget,
    };

    fn plain_theme(width: f32, height: f32) -> SwitchTheme {
        SwitchTheme {
            width,
            height,
            hot_zone_horizontal_padding: 0.0,
            hot_zone_vertical_padding: 0.0,
            ..SwitchTheme::default()
        }
    }

    fn node() -> FrameNode {
        FrameNode::new(WidgetId::new(1), "Toggle")
    }

    fn unbounded() -> LayoutConstraint {
        LayoutConstraint::loose(Size::new(1000.0, 1000.0))
    }

    fn legacy() -> PlatformConfig {
        PlatformConfig::default().with_api_version(11)
    }

    // ===== Switch Tests =====

    #[test]
    fn test_switch_explicit_ideal_size_wins() {
        let constraint = unbounded().with_ideal_size(Size::new(50.0, 30.0));
        let size = SwitchLayoutAlgorithm::default().measure_content(
            &constraint,
            &node(),
            &SwitchTheme::default(),
            &PlatformConfig::default(),
        );
        assert_eq!(size, Some(Size::new(50.0, 30.0)));
    }

    #[test]
    fn test_switch_theme_default_minus_hot_zone() {
        let theme = SwitchTheme {
            width: 60.0,
            height: 20.0,
            hot_zone_horizontal_padding: 4.0,
            hot_zone_vertical_padding: 2.0,
            ..SwitchTheme::default()
        };
        let size = SwitchLayoutAlgorithm::default().measure_content(
            &unbounded(),
            &node(),
            &theme,
            &PlatformConfig::default(),
        );
        assert_eq!(size, Some(Size::new(52.0, 16.0)));
    }

    #[test]
    fn test_switch_layout_padding_shrinks_default() {
        let mut host = node();
        host.padding = Padding::symmetric(5.0, 1.0);
        let size = SwitchLayoutAlgorithm::default().measure_content(
            &unbounded(),
            &host,
            &plain_theme(60.0, 20.0),
            &PlatformConfig::default(),
        );
        assert_eq!(size, Some(Size::new(50.0, 18.0)));
    }

    #[test]
    fn test_switch_ideal_is_capped_by_max() {
        let constraint =
            LayoutConstraint::loose(Size::new(40.0, 10.0)).with_ideal_size(Size::new(80.0, 30.0));
        let size = SwitchLayoutAlgorithm::default().measure_content(
            &constraint,
            &node(),
            &plain_theme(60.0, 20.0),
            &PlatformConfig::default(),
        );
        assert_eq!(size, Some(Size::new(40.0, 10.0)));
    }

    #[test]
    fn test_switch_legacy_ratio_cases() {
        let algo = SwitchLayoutAlgorithm::default();
        let theme = plain_theme(60.0, 20.0);
        let measure = |constraint: LayoutConstraint| {
            algo.measure_content(&constraint, &node(), &theme, &legacy())
        };

        assert_eq!(measure(unbounded()), Some(Size::new(36.0, 20.0)));
        assert_eq!(
            measure(LayoutConstraint::loose(Size::new(30.0, 10.0))),
            Some(Size::new(18.0, 10.0))
        );
        assert_eq!(
            measure(unbounded().with_ideal_size(Size::new(100.0, 50.0))),
            Some(Size::new(90.0, 50.0))
        );
        let tall = measure(unbounded().with_ideal_size(Size::new(60.0, 40.0))).unwrap();
        assert_eq!(tall.width, 60.0);
        assert!((tall.height - 60.0 / 1.8).abs() < 1e-4);
        assert_eq!(
            measure(unbounded().with_ideal_size(Size::new(180.0, 100.0))),
            Some(Size::new(180.0, 100.0))
        );
    }

    #[test]
    fn test_switch_modern_layout_keeps_free_aspect() {
        let size = SwitchLayoutAlgorithm::default().measure_content(
            &unbounded().with_ideal_size(Size::new(100.0, 50.0)),
            &node(),
            &plain_theme(60.0, 20.0),
            &PlatformConfig::default(),
        );
        assert_eq!(size, Some(Size::new(100.0, 50.0)));
    }

    #[test]
    fn test_switch_match_parent_takes_parent_ideal() {
        let mut host = node();
        host.layout_policies.width = LayoutPolicy::MatchParent;
        let constraint = unbounded().with_parent_ideal_size(Size::new(300.0, 48.0));
        let size = SwitchLayoutAlgorithm::default().measure_content(
            &constraint,
            &host,
            &plain_theme(60.0, 20.0),
            &PlatformConfig::default(),
        );
        assert_eq!(size, Some(Size::new(300.0, 20.0)));
    }

    #[test]
    fn test_switch_negative_dimensions_pass_through() {
        let size = SwitchLayoutAlgorithm::default().measure_content(
            &unbounded().with_ideal_size(Size::new(-4.0, 0.0)),
            &node(),
            &plain_theme(60.0, 20.0),
            &PlatformConfig::default(),
        );
        assert_eq!(size, Some(Size::new(-4.0, 0.0)));
    }

    #[test]
    fn test_switch_measure_writes_geometry() {
        let mut host = node();
        host.padding = Padding::uniform(2.0);
        let frame = SwitchLayoutAlgorithm::default().measure(
            &mut host,
            &unbounded().with_ideal_size(Size::new(40.0, 20.0)),
            &plain_theme(60.0, 20.0),
            &PlatformConfig::default(),
        );
        assert_eq!(frame, Size::new(44.0, 24.0));
        assert_eq!(host.geometry.content_size, Some(Size::new(40.0, 20.0)));
        assert_eq!(host.geometry.content_offset, Point::new(2.0, 2.0));
    }

    // ===== Custom Content Tests =====

    struct Label;

    impl Widget for Label {
        fn type_id(&self) -> TypeId {
            TypeId::of::<Self>()
        }
        fn measure(&self, constraint: &LayoutConstraint) -> Size {
            constraint.clamp_to_max(Size::new(70.0, 12.0))
        }
        fn layout(&mut self, bounds: Rect) -> LayoutResult {
            LayoutResult {
                size: bounds.size(),
            }
        }
        fn paint(&self, _canvas: &mut dyn Canvas) {}
        fn event(&mut self, _event: &Event) -> EventResult {
            EventResult::Ignored
        }
    }

    #[test]
    fn test_custom_content_replaces_default_layout() {
        let mut host = node();
        let stale = host.allocate_child_id();
        let custom = host.allocate_child_id();
        host.children.push(ChildNode::new(stale, Box::new(Label)));
        host.children[0].geometry.content_size = Some(Size::new(9.0, 9.0));
        host.children.push(ChildNode::new(custom, Box::new(Label)));

        let algo = SwitchLayoutAlgorithm::new(Some(custom));
        assert_eq!(
            algo.measure_content(
                &unbounded(),
                &host,
                &SwitchTheme::default(),
                &PlatformConfig::default()
            ),
            None
        );

        algo.measure(
            &mut host,
            &unbounded(),
            &SwitchTheme::default(),
            &PlatformConfig::default(),
        );
        assert_eq!(host.geometry.content_size, Some(Size::new(70.0, 12.0)));
        assert_eq!(host.child(stale).unwrap().geometry.content_size, None);
    }

    // ===== Checkbox Tests =====

    #[test]
    fn test_checkbox_is_square_on_shorter_side() {
        let size = CheckboxLayoutAlgorithm::default().measure_content(
            &unbounded().with_ideal_size(Size::new(40.0, 18.0)),
            &node(),
            &CheckboxTheme::default(),
        );
        assert_eq!(size, Some(Size::new(18.0, 18.0)));
    }

    #[test]
    fn test_checkbox_default_from_theme() {
        let theme = CheckboxTheme::default();
        let size = CheckboxLayoutAlgorithm::default()
            .measure_content(&unbounded(), &node(), &theme)
            .unwrap();
        let expected = (theme.width - 2.0 * theme.hot_zone_horizontal_padding)
            .min(theme.height - 2.0 * theme.hot_zone_vertical_padding);
        assert_eq!(size, Size::new(expected, expected));
    }

    // ===== Toggle Button Tests =====

    #[test]
    fn test_button_uses_theme_size_without_hot_zone() {
        let theme = ToggleButtonTheme::default();
        let size = ToggleButtonLayoutAlgorithm::default()
            .measure_content(&unbounded(), &node(), &theme)
            .unwrap();
        assert_eq!(size, Size::new(theme.width, theme.height));
    }

    // ===== Ratio Helper Tests =====

    #[test]
    fn test_legacy_ratio_zero_height_collapses_width() {
        assert_eq!(
            apply_legacy_ratio(Size::new(10.0, 0.0), 1.8),
            Size::new(0.0, 0.0)
        );
    }
}
