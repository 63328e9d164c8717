//! Theme system: per-widget metrics and colors for light and dark modes.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// Errors from loading a theme description.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The JSON could not be parsed or did not match the theme shape
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The override document was not a JSON object
    #[error("theme override must be a JSON object")]
    NotAnObject,
}

/// Light or dark appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// Light appearance
    #[default]
    Light,
    /// Dark appearance
    Dark,
}

/// A color palette the widget themes derive from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    /// Primary brand color
    pub primary: Color,
    /// Content drawn on top of primary
    pub on_primary: Color,
    /// Surface/background color
    pub surface: Color,
    /// Content drawn on top of surface
    pub on_surface: Color,
    /// Low-emphasis fill for "off" states
    pub outline: Color,
    /// Translucent overlay shown on hover
    pub hover_overlay: Color,
    /// Translucent overlay shown while pressed
    pub press_overlay: Color,
    /// Focus ring color
    pub focus: Color,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::light()
    }
}

impl ColorPalette {
    /// Create a light color palette.
    #[must_use]
    pub fn light() -> Self {
        Self {
            primary: Color::from_argb(0xFF00_7DFF),
            on_primary: Color::WHITE,
            surface: Color::WHITE,
            on_surface: Color::from_argb(0xE500_0000),
            outline: Color::from_argb(0x3300_0000),
            hover_overlay: Color::from_argb(0x0C00_0000),
            press_overlay: Color::from_argb(0x1900_0000),
            focus: Color::from_argb(0xFF00_7DFF),
        }
    }

    /// Create a dark color palette.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            primary: Color::from_argb(0xFF31_7AF7),
            on_primary: Color::WHITE,
            surface: Color::from_argb(0xFF20_2224),
            on_surface: Color::from_argb(0xDBFF_FFFF),
            outline: Color::from_argb(0x4DFF_FFFF),
            hover_overlay: Color::from_argb(0x19FF_FFFF),
            press_overlay: Color::from_argb(0x26FF_FFFF),
            focus: Color::from_argb(0xFF3F_97E9),
        }
    }
}

/// Switch metrics and colors.
///
/// `width`/`height` include the hot-zone padding on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchTheme {
    /// Default outer width
    pub width: f32,
    /// Default outer height
    pub height: f32,
    /// Hot-zone padding left and right
    pub hot_zone_horizontal_padding: f32,
    /// Hot-zone padding top and bottom
    pub hot_zone_vertical_padding: f32,
    /// Width/height ratio enforced for legacy api versions
    pub aspect_ratio: f32,
    /// Gap between track edge and thumb
    pub point_gap: f32,
    /// Track color when on
    pub active_color: Color,
    /// Track color when off
    pub inactive_color: Color,
    /// Thumb color
    pub point_color: Color,
    /// Thumb color when off and unfocused, with `use_diff_point_color`
    pub point_color_unchecked: Color,
    /// Thumb color when off and focused, with `use_diff_point_color`
    pub point_color_unchecked_focused: Color,
    /// Track color when on and focused
    pub active_color_focused: Color,
    /// Use a distinct thumb color when off
    pub use_diff_point_color: bool,
    /// Hover overlay color
    pub hover_color: Color,
    /// Pressed overlay color
    pub click_effect_color: Color,
    /// Focus ring color
    pub focus_color: Color,
    /// Focus ring stroke width
    pub focus_ring_width: f32,
    /// Distance between the paint box and the focus ring
    pub focus_padding: f32,
    /// Hover overlay transition
    pub hover_duration_ms: u32,
    /// Press overlay transition
    pub press_duration_ms: u32,
    /// Track and thumb color transition
    pub color_duration_ms: u32,
}

impl Default for SwitchTheme {
    fn default() -> Self {
        Self::from_palette(&ColorPalette::light())
    }
}

impl SwitchTheme {
    /// Derive a switch theme from a palette.
    #[must_use]
    pub fn from_palette(palette: &ColorPalette) -> Self {
        Self {
            width: 44.0,
            height: 28.0,
            hot_zone_horizontal_padding: 4.0,
            hot_zone_vertical_padding: 4.0,
            aspect_ratio: 1.8,
            point_gap: 2.0,
            active_color: palette.primary,
            inactive_color: palette.outline,
            point_color: palette.on_primary,
            point_color_unchecked: palette.on_primary,
            point_color_unchecked_focused: palette.primary,
            active_color_focused: palette.primary,
            use_diff_point_color: false,
            hover_color: palette.hover_overlay,
            click_effect_color: palette.press_overlay,
            focus_color: palette.focus,
            focus_ring_width: 2.0,
            focus_padding: 2.0,
            hover_duration_ms: 250,
            press_duration_ms: 100,
            color_duration_ms: 200,
        }
    }
}

/// Checkbox metrics and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckboxTheme {
    /// Default outer width
    pub width: f32,
    /// Default outer height
    pub height: f32,
    /// Hot-zone padding left and right
    pub hot_zone_horizontal_padding: f32,
    /// Hot-zone padding top and bottom
    pub hot_zone_vertical_padding: f32,
    /// Fill when checked
    pub selected_color: Color,
    /// Border when unchecked
    pub unselected_color: Color,
    /// Tick mark color
    pub check_mark_color: Color,
    /// Box corner radius
    pub border_radius: f32,
    /// Unchecked border width
    pub border_width: f32,
    /// Tick mark stroke width
    pub check_stroke_width: f32,
    /// Hover overlay color
    pub hover_color: Color,
    /// Pressed overlay color
    pub click_effect_color: Color,
    /// Focus ring color
    pub focus_color: Color,
    /// Focus ring stroke width
    pub focus_ring_width: f32,
    /// Distance between the box and the focus ring
    pub focus_padding: f32,
    /// Overlay transition
    pub hover_duration_ms: u32,
    /// Fill transition
    pub color_duration_ms: u32,
}

impl Default for CheckboxTheme {
    fn default() -> Self {
        Self::from_palette(&ColorPalette::light())
    }
}

impl CheckboxTheme {
    /// Derive a checkbox theme from a palette.
    #[must_use]
    pub fn from_palette(palette: &ColorPalette) -> Self {
        Self {
            width: 24.0,
            height: 24.0,
            hot_zone_horizontal_padding: 2.0,
            hot_zone_vertical_padding: 2.0,
            selected_color: palette.primary,
            unselected_color: palette.on_surface.blend_opacity(0.6),
            check_mark_color: palette.on_primary,
            border_radius: 4.0,
            border_width: 1.5,
            check_stroke_width: 1.5,
            hover_color: palette.hover_overlay,
            click_effect_color: palette.press_overlay,
            focus_color: palette.focus,
            focus_ring_width: 2.0,
            focus_padding: 2.0,
            hover_duration_ms: 250,
            color_duration_ms: 100,
        }
    }
}

/// Toggle-button metrics and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleButtonTheme {
    /// Default width
    pub width: f32,
    /// Default height
    pub height: f32,
    /// Background when on
    pub checked_color: Color,
    /// Background when off
    pub unchecked_color: Color,
    /// Corner radius; negative means half the height
    pub border_radius: f32,
    /// Hover overlay color
    pub hover_color: Color,
    /// Pressed overlay color
    pub click_effect_color: Color,
    /// Focus ring color
    pub focus_color: Color,
    /// Focus ring stroke width
    pub focus_ring_width: f32,
    /// Distance between the button and the focus ring
    pub focus_padding: f32,
    /// Overlay transition
    pub hover_duration_ms: u32,
    /// Background transition
    pub color_duration_ms: u32,
}

impl Default for ToggleButtonTheme {
    fn default() -> Self {
        Self::from_palette(&ColorPalette::light())
    }
}

impl ToggleButtonTheme {
    /// Derive a toggle-button theme from a palette.
    #[must_use]
    pub fn from_palette(palette: &ColorPalette) -> Self {
        Self {
            width: 72.0,
            height: 28.0,
            checked_color: palette.primary.blend_opacity(0.2),
            unchecked_color: palette.outline,
            border_radius: -1.0,
            hover_color: palette.hover_overlay,
            click_effect_color: palette.press_overlay,
            focus_color: palette.focus,
            focus_ring_width: 2.0,
            focus_padding: 2.0,
            hover_duration_ms: 250,
            color_duration_ms: 200,
        }
    }
}

/// Complete theme definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// Color palette
    pub colors: ColorPalette,
    /// Switch theme
    pub switch: SwitchTheme,
    /// Checkbox theme
    pub checkbox: CheckboxTheme,
    /// Toggle button theme
    pub toggle_button: ToggleButtonTheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Create a light theme.
    #[must_use]
    pub fn light() -> Self {
        Self::from_palette("Light", ColorPalette::light())
    }

    /// Create a dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self::from_palette("Dark", ColorPalette::dark())
    }

    /// Build every widget theme from one palette.
    #[must_use]
    pub fn from_palette(name: impl Into<String>, colors: ColorPalette) -> Self {
        Self {
            name: name.into(),
            switch: SwitchTheme::from_palette(&colors),
            checkbox: CheckboxTheme::from_palette(&colors),
            toggle_button: ToggleButtonTheme::from_palette(&colors),
            colors,
        }
    }

    /// Create a theme with a custom name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Create a theme with custom switch metrics.
    #[must_use]
    pub fn with_switch(mut self, switch: SwitchTheme) -> Self {
        self.switch = switch;
        self
    }

    /// Parse a complete theme. Missing fields take light defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Json`] when the document is not valid JSON or a
    /// field has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply a partial JSON override on top of this theme.
    ///
    /// Objects are merged key by key; any other value replaces the base.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::NotAnObject`] when the override is not an object
    /// and [`ThemeError::Json`] when the merged document does not fit.
    pub fn merged_with_json(&self, json: &str) -> Result<Self, ThemeError> {
        let overlay: serde_json::Value = serde_json::from_str(json)?;
        if !overlay.is_object() {
            return Err(ThemeError::NotAnObject);
        }
        let mut base = serde_json::to_value(self)?;
        merge_json(&mut base, overlay);
        Ok(serde_json::from_value(base)?)
    }
}

fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Identifier of a theme scope (a subtree with its own theme overrides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThemeScope(pub u32);

/// Read-only theme access injected into layout and paint.
pub trait ThemeProvider {
    /// Theme for the current color mode, optionally scoped.
    ///
    /// Returns `None` when no theme is loaded.
    fn theme(&self, scope: Option<ThemeScope>) -> Option<&Theme>;

    /// Current color mode.
    fn color_mode(&self) -> ColorMode;
}

/// Default [`ThemeProvider`]: base light/dark themes plus scoped overrides.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    base: HashMap<ColorMode, Theme>,
    scoped: HashMap<(ThemeScope, ColorMode), Theme>,
    mode: std::cell::Cell<ColorMode>,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::light(), Theme::dark())
    }
}

impl ThemeManager {
    /// Create a manager with light and dark base themes.
    #[must_use]
    pub fn new(light: Theme, dark: Theme) -> Self {
        let mut base = HashMap::new();
        base.insert(ColorMode::Light, light);
        base.insert(ColorMode::Dark, dark);
        Self {
            base,
            scoped: HashMap::new(),
            mode: std::cell::Cell::new(ColorMode::Light),
        }
    }

    /// Create a manager with no themes loaded.
    #[must_use]
    pub fn unloaded() -> Self {
        Self {
            base: HashMap::new(),
            scoped: HashMap::new(),
            mode: std::cell::Cell::new(ColorMode::Light),
        }
    }

    /// Register a scoped override for one color mode.
    #[must_use]
    pub fn with_scope(mut self, scope: ThemeScope, mode: ColorMode, theme: Theme) -> Self {
        self.scoped.insert((scope, mode), theme);
        self
    }

    /// Register a scoped override described as a partial JSON document on
    /// top of the base theme of `mode`. Invalid documents are logged and
    /// skipped.
    #[must_use]
    pub fn with_scope_json(self, scope: ThemeScope, mode: ColorMode, json: &str) -> Self {
        let Some(base) = self.base.get(&mode) else {
            warn!(?scope, ?mode, "no base theme to apply scoped override to");
            return self;
        };
        match base.merged_with_json(json) {
            Ok(theme) => self.with_scope(scope, mode, theme),
            Err(err) => {
                warn!(?scope, ?mode, %err, "ignoring scoped theme override");
                self
            }
        }
    }

    /// Switch between light and dark.
    pub fn set_color_mode(&self, mode: ColorMode) {
        self.mode.set(mode);
    }
}

impl ThemeProvider for ThemeManager {
    fn theme(&self, scope: Option<ThemeScope>) -> Option<&Theme> {
        let mode = self.mode.get();
        scope
            .and_then(|scope| self.scoped.get(&(scope, mode)))
            .or_else(|| self.base.get(&mode))
    }

    fn color_mode(&self) -> ColorMode {
        self.mode.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // ColorPalette Tests
    // =========================================================================

    #[test]
    fn test_color_palette_default_is_light() {
        assert_eq!(ColorPalette::default(), ColorPalette::light());
        assert_ne!(ColorPalette::light(), ColorPalette::dark());
    }

    // =========================================================================
    // Widget Theme Tests
    // =========================================================================

    #[test]
    fn test_switch_theme_defaults() {
        let t = SwitchTheme::default();
        assert_eq!(t.aspect_ratio, 1.8);
        assert_eq!(t.point_gap, 2.0);
        assert_eq!(t.width - 2.0 * t.hot_zone_horizontal_padding, 36.0);
        assert_eq!(t.height - 2.0 * t.hot_zone_vertical_padding, 20.0);
        assert_eq!(t.active_color, ColorPalette::light().primary);
    }

    #[test]
    fn test_checkbox_theme_is_square() {
        let t = CheckboxTheme::default();
        assert_eq!(t.width, t.height);
    }

    #[test]
    fn test_dark_theme_differs() {
        assert_ne!(Theme::light().switch.active_color, Theme::dark().switch.active_color);
        assert_eq!(Theme::dark().name, "Dark");
    }

    // =========================================================================
    // JSON Tests
    // =========================================================================

    #[test]
    fn test_theme_serialization() {
        let theme = Theme::dark();
        let json = serde_json::to_string(&theme).expect("serialize");
        let restored = Theme::from_json(&json).expect("deserialize");
        assert_eq!(theme, restored);
    }

    #[test]
    fn test_theme_from_json_partial_uses_light_defaults() {
        let theme = Theme::from_json(r#"{"name":"Custom","switch":{"width":60.0}}"#).unwrap();
        assert_eq!(theme.name, "Custom");
        assert_eq!(theme.switch.width, 60.0);
        assert_eq!(theme.switch.height, SwitchTheme::default().height);
        assert_eq!(theme.checkbox, CheckboxTheme::default());
    }

    #[test]
    fn test_theme_from_json_invalid() {
        let err = Theme::from_json("{not json").unwrap_err();
        assert!(matches!(err, ThemeError::Json(_)));
    }

    #[test]
    fn test_merged_with_json_keeps_base() {
        let dark = Theme::dark();
        let merged = dark
            .merged_with_json(r#"{"switch":{"height":30.0}}"#)
            .unwrap();
        assert_eq!(merged.switch.height, 30.0);
        assert_eq!(merged.switch.active_color, dark.switch.active_color);
        assert_eq!(merged.name, "Dark");
    }

    #[test]
    fn test_merged_with_json_rejects_non_object() {
        let err = Theme::light().merged_with_json("[1, 2]").unwrap_err();
        assert!(matches!(err, ThemeError::NotAnObject));
        assert_eq!(err.to_string(), "theme override must be a JSON object");
    }

    // =========================================================================
    // ThemeManager Tests
    // =========================================================================

    #[test]
    fn test_manager_follows_color_mode() {
        let manager = ThemeManager::default();
        assert_eq!(manager.theme(None).map(|t| t.name.as_str()), Some("Light"));
        manager.set_color_mode(ColorMode::Dark);
        assert_eq!(manager.color_mode(), ColorMode::Dark);
        assert_eq!(manager.theme(None).map(|t| t.name.as_str()), Some("Dark"));
    }

    #[test]
    fn test_manager_scoped_override() {
        let scope = ThemeScope(7);
        let manager = ThemeManager::default().with_scope_json(
            scope,
            ColorMode::Light,
            r#"{"switch":{"width":80.0}}"#,
        );
        assert_eq!(manager.theme(Some(scope)).unwrap().switch.width, 80.0);
        assert_eq!(manager.theme(None).unwrap().switch.width, 44.0);
        assert_eq!(manager.theme(Some(ThemeScope(8))).unwrap().switch.width, 44.0);

        // No dark override registered: falls back to the dark base.
        manager.set_color_mode(ColorMode::Dark);
        assert_eq!(manager.theme(Some(scope)).unwrap().name, "Dark");
    }

    #[test]
    fn test_manager_invalid_scope_json_is_skipped() {
        let scope = ThemeScope(1);
        let manager =
            ThemeManager::default().with_scope_json(scope, ColorMode::Light, "nope");
        assert_eq!(manager.theme(Some(scope)).unwrap().name, "Light");
    }

    #[test]
    fn test_manager_unloaded() {
        let manager = ThemeManager::unloaded();
        assert!(manager.theme(None).is_none());
    }
}
