//! Paint properties stored on the host node, with value provenance.
//!
//! Every optional value records whether the caller set it explicitly
//! ([`ValueSource::User`]) or asked for a theme default
//! ([`ValueSource::Theme`]). A color-mode change re-resolves only the latter.

use serde::{Deserialize, Serialize};
use toggler_core::theme::{CheckboxTheme, SwitchTheme, ToggleButtonTheme};
use toggler_core::Color;
use tracing::debug;

/// Where a property value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    /// Set explicitly by the caller; always wins
    User,
    /// Resolved from the theme; refreshed on color-mode change
    Theme,
}

/// A value tagged with its [`ValueSource`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Themed<T> {
    value: T,
    source: ValueSource,
}

impl<T: Copy> Themed<T> {
    /// Value set by the caller.
    #[must_use]
    pub const fn user(value: T) -> Self {
        Self {
            value,
            source: ValueSource::User,
        }
    }

    /// Value taken from the theme.
    #[must_use]
    pub const fn theme(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Theme,
        }
    }

    /// The value.
    #[must_use]
    pub const fn value(&self) -> T {
        self.value
    }

    /// Where the value came from.
    #[must_use]
    pub const fn source(&self) -> ValueSource {
        self.source
    }

    /// Whether the caller set the value.
    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self.source, ValueSource::User)
    }
}

/// Replace a theme-sourced color with the theme's current value.
fn refresh(slot: &mut Option<Themed<Color>>, theme_value: Color) {
    if let Some(themed) = slot {
        if !themed.is_user() {
            *themed = Themed::theme(theme_value);
        }
    }
}

fn resolve(slot: Option<Themed<Color>>, fallback: Color) -> Color {
    slot.map_or(fallback, |themed| themed.value())
}

/// Which color a `set_*_color` call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleColorType {
    /// Color of the "on" state (track, box fill, button background)
    Selected,
    /// Color of the "off" state (track, box border)
    Unselected,
    /// Thumb or check-mark color
    Point,
    /// Button background when off
    Background,
}

// =============================================================================
// Switch
// =============================================================================

/// Paint property of a switch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchPaintProperty {
    /// Mirror of the pattern's state, written at modify-done
    pub is_on: Option<bool>,
    /// Track color when on
    pub selected_color: Option<Themed<Color>>,
    /// Track color when off
    pub unselected_color: Option<Themed<Color>>,
    /// Thumb color
    pub point_color: Option<Themed<Color>>,
    /// Thumb radius
    pub point_radius: Option<Themed<f32>>,
    /// Track corner radius
    pub track_border_radius: Option<Themed<f32>>,
}

impl SwitchPaintProperty {
    /// Set a color explicitly.
    pub fn set_color(&mut self, kind: ToggleColorType, color: Color) -> bool {
        self.store(kind, Themed::user(color))
    }

    /// Set a color with theme provenance.
    ///
    /// Background does not apply to switches and is ignored.
    pub fn set_default_color(&mut self, kind: ToggleColorType, color: Color) -> bool {
        self.store(kind, Themed::theme(color))
    }

    fn store(&mut self, kind: ToggleColorType, value: Themed<Color>) -> bool {
        let slot = match kind {
            ToggleColorType::Selected => &mut self.selected_color,
            ToggleColorType::Unselected => &mut self.unselected_color,
            ToggleColorType::Point => &mut self.point_color,
            ToggleColorType::Background => {
                debug!(?kind, "color kind not supported by switch");
                return false;
            }
        };
        *slot = Some(value);
        true
    }

    /// Re-resolve theme-sourced values after a theme or color-mode change.
    pub fn refresh_from_theme(&mut self, theme: &SwitchTheme) {
        refresh(&mut self.selected_color, theme.active_color);
        refresh(&mut self.unselected_color, theme.inactive_color);
        refresh(&mut self.point_color, theme.point_color);
        // Themes carry no explicit radii; drop theme-sourced ones so
        // geometry derives them again.
        if self.point_radius.is_some_and(|r| !r.is_user()) {
            self.point_radius = None;
        }
        if self.track_border_radius.is_some_and(|r| !r.is_user()) {
            self.track_border_radius = None;
        }
    }

    /// Track color when on.
    #[must_use]
    pub fn resolved_selected_color(&self, theme: &SwitchTheme) -> Color {
        resolve(self.selected_color, theme.active_color)
    }

    /// Track color when off.
    #[must_use]
    pub fn resolved_unselected_color(&self, theme: &SwitchTheme) -> Color {
        resolve(self.unselected_color, theme.inactive_color)
    }

    /// Thumb color chosen by the caller, if any.
    #[must_use]
    pub fn user_point_color(&self) -> Option<Color> {
        self.point_color
            .filter(Themed::is_user)
            .map(|themed| themed.value())
    }

    /// Thumb color when no distinct unchecked color applies.
    #[must_use]
    pub fn resolved_point_color(&self, theme: &SwitchTheme) -> Color {
        resolve(self.point_color, theme.point_color)
    }
}

// =============================================================================
// Checkbox
// =============================================================================

/// Paint property of a checkbox.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckboxPaintProperty {
    /// Mirror of the pattern's state
    pub is_on: Option<bool>,
    /// Box fill when checked
    pub selected_color: Option<Themed<Color>>,
    /// Box border when unchecked
    pub unselected_color: Option<Themed<Color>>,
    /// Tick mark color
    pub check_mark_color: Option<Themed<Color>>,
}

impl CheckboxPaintProperty {
    /// Set a color explicitly.
    pub fn set_color(&mut self, kind: ToggleColorType, color: Color) -> bool {
        self.store(kind, Themed::user(color))
    }

    /// Set a color with theme provenance. Background is ignored.
    pub fn set_default_color(&mut self, kind: ToggleColorType, color: Color) -> bool {
        self.store(kind, Themed::theme(color))
    }

    fn store(&mut self, kind: ToggleColorType, value: Themed<Color>) -> bool {
        let slot = match kind {
            ToggleColorType::Selected => &mut self.selected_color,
            ToggleColorType::Unselected => &mut self.unselected_color,
            ToggleColorType::Point => &mut self.check_mark_color,
            ToggleColorType::Background => {
                debug!(?kind, "color kind not supported by checkbox");
                return false;
            }
        };
        *slot = Some(value);
        true
    }

    /// Re-resolve theme-sourced values.
    pub fn refresh_from_theme(&mut self, theme: &CheckboxTheme) {
        refresh(&mut self.selected_color, theme.selected_color);
        refresh(&mut self.unselected_color, theme.unselected_color);
        refresh(&mut self.check_mark_color, theme.check_mark_color);
    }

    /// Box fill when checked.
    #[must_use]
    pub fn resolved_selected_color(&self, theme: &CheckboxTheme) -> Color {
        resolve(self.selected_color, theme.selected_color)
    }

    /// Box border when unchecked.
    #[must_use]
    pub fn resolved_unselected_color(&self, theme: &CheckboxTheme) -> Color {
        resolve(self.unselected_color, theme.unselected_color)
    }

    /// Tick mark color.
    #[must_use]
    pub fn resolved_check_mark_color(&self, theme: &CheckboxTheme) -> Color {
        resolve(self.check_mark_color, theme.check_mark_color)
    }
}

// =============================================================================
// Toggle button
// =============================================================================

/// Paint property of a toggle button.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToggleButtonPaintProperty {
    /// Mirror of the pattern's state
    pub is_on: Option<bool>,
    /// Background when on
    pub selected_color: Option<Themed<Color>>,
    /// Background when off
    pub background_color: Option<Themed<Color>>,
}

impl ToggleButtonPaintProperty {
    /// Set a color explicitly.
    pub fn set_color(&mut self, kind: ToggleColorType, color: Color) -> bool {
        self.store(kind, Themed::user(color))
    }

    /// Set a color with theme provenance.
    pub fn set_default_color(&mut self, kind: ToggleColorType, color: Color) -> bool {
        self.store(kind, Themed::theme(color))
    }

    fn store(&mut self, kind: ToggleColorType, value: Themed<Color>) -> bool {
        let slot = match kind {
            ToggleColorType::Selected => &mut self.selected_color,
            ToggleColorType::Background => &mut self.background_color,
            ToggleColorType::Unselected | ToggleColorType::Point => {
                debug!(?kind, "color kind not supported by toggle button");
                return false;
            }
        };
        *slot = Some(value);
        true
    }

    /// Re-resolve theme-sourced values.
    pub fn refresh_from_theme(&mut self, theme: &ToggleButtonTheme) {
        refresh(&mut self.selected_color, theme.checked_color);
        refresh(&mut self.background_color, theme.unchecked_color);
    }

    /// Background when on.
    #[must_use]
    pub fn resolved_selected_color(&self, theme: &ToggleButtonTheme) -> Color {
        resolve(self.selected_color, theme.checked_color)
    }

    /// Background when off.
    #[must_use]
    pub fn resolved_background_color(&self, theme: &ToggleButtonTheme) -> Color {
        resolve(self.background_color, theme.unchecked_color)
    }
}
