//! Layout constraints handed to a widget by its parent.

use crate::geometry::Size;
use serde::{Deserialize, Serialize};

/// A size whose axes may each be left unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionalSize {
    /// Width, if specified
    pub width: Option<f32>,
    /// Height, if specified
    pub height: Option<f32>,
}

impl OptionalSize {
    /// Both axes unspecified.
    pub const NONE: Self = Self {
        width: None,
        height: None,
    };

    /// Both axes specified.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
        }
    }

    /// Check whether both axes are specified.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// Constraints for a single measure pass.
///
/// `self_ideal_size` carries an explicit size requested by the caller for this
/// node; `parent_ideal_size` carries the parent's own ideal size and is only
/// consulted by match-parent layout policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConstraint {
    /// Minimum size
    pub min_size: Size,
    /// Maximum size
    pub max_size: Size,
    /// Explicit ideal size for this node
    pub self_ideal_size: OptionalSize,
    /// Ideal size of the parent node
    pub parent_ideal_size: OptionalSize,
}

impl LayoutConstraint {
    /// Create constraints that allow any size up to the given maximum.
    #[must_use]
    pub const fn loose(max_size: Size) -> Self {
        Self {
            min_size: Size::ZERO,
            max_size,
            self_ideal_size: OptionalSize::NONE,
            parent_ideal_size: OptionalSize::NONE,
        }
    }

    /// Create unbounded constraints.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::loose(Size::new(f32::INFINITY, f32::INFINITY))
    }

    /// Set an explicit ideal size on both axes.
    #[must_use]
    pub const fn with_ideal_size(mut self, size: Size) -> Self {
        self.self_ideal_size = OptionalSize::from_size(size);
        self
    }

    /// Set an explicit ideal width only.
    #[must_use]
    pub const fn with_ideal_width(mut self, width: f32) -> Self {
        self.self_ideal_size.width = Some(width);
        self
    }

    /// Set an explicit ideal height only.
    #[must_use]
    pub const fn with_ideal_height(mut self, height: f32) -> Self {
        self.self_ideal_size.height = Some(height);
        self
    }

    /// Set the parent's ideal size.
    #[must_use]
    pub const fn with_parent_ideal_size(mut self, size: Size) -> Self {
        self.parent_ideal_size = OptionalSize::from_size(size);
        self
    }

    /// Limit a size to the maximum constraint without enforcing the minimum.
    #[must_use]
    pub fn clamp_to_max(&self, size: Size) -> Size {
        Size::new(
            size.width.min(self.max_size.width),
            size.height.min(self.max_size.height),
        )
    }
}

impl Default for LayoutConstraint {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// How a node sizes itself along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutPolicy {
    /// Size from content, theme and explicit requests
    #[default]
    Content,
    /// Take the parent's ideal size on this axis
    MatchParent,
}

/// Per-axis layout policy of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutPolicies {
    /// Horizontal policy
    pub width: LayoutPolicy,
    /// Vertical policy
    pub height: LayoutPolicy,
}
