//! Binary-state toggle widgets for the Toggler runtime.
//!
//! One [`Toggle`] widget renders as a checkbox, a toggle button or a switch.
//! Each variant is a [`TogglePattern`] made of three parts:
//! - Layout: [`SwitchLayoutAlgorithm`], [`CheckboxLayoutAlgorithm`],
//!   [`ToggleButtonLayoutAlgorithm`]
//! - Paint: [`SwitchModifier`], [`CheckboxModifier`], [`ToggleButtonModifier`]
//!   driven by a paint property and the theme
//! - Interaction: click, key, hover, touch and (switch only) thumb drag
//!
//! Change notifications are posted to a [`toggler_core::TaskQueue`] and run
//! after the current event has been handled.

pub mod base;
pub mod button;
pub mod checkbox;
pub mod content;
pub mod interaction;
pub mod layout;
pub mod modifier;
pub mod paint_property;
pub mod restore;
pub mod switch;
pub mod toggle;

pub use base::{ChangeCallback, ToggleBase, ToggleContext};
pub use button::{ToggleButtonModifier, ToggleButtonPattern, ToggleButtonStyle};
pub use checkbox::{CheckboxModifier, CheckboxPattern, CheckboxStyle};
pub use content::{ContentBuilder, CustomContent, ToggleConfiguration};
pub use interaction::{DragState, GestureSession, TouchHoverAnimationType};
pub use layout::{
    apply_legacy_ratio, resolve_content_size, CheckboxLayoutAlgorithm, SwitchLayoutAlgorithm,
    ToggleButtonLayoutAlgorithm, ToggleMetrics,
};
pub use modifier::{SwitchModifier, SwitchStyle};
pub use paint_property::{
    CheckboxPaintProperty, SwitchPaintProperty, Themed, ToggleButtonPaintProperty,
    ToggleColorType, ValueSource,
};
pub use restore::{RestoreError, RestoreInfo};
pub use switch::SwitchPattern;
pub use toggle::{create_pattern, Toggle, TogglePattern, ToggleType};
