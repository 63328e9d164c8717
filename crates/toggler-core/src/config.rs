//! Platform configuration consumed by layout and interaction.

use crate::event::{Key, PointerType};
use serde::{Deserialize, Serialize};

/// First api version that lays out toggles without the legacy aspect ratio.
pub const API_VERSION_FREE_ASPECT: u32 = 12;

/// Host platform settings.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use toggler_core::PlatformConfig;
///
/// let config: PlatformConfig = serde_json::from_str(r#"{"right_to_left":true}"#).unwrap();
/// assert!(config.right_to_left);
/// assert_eq!(config.api_version, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Target api version of the application
    pub api_version: u32,
    /// Layout direction is right-to-left
    pub right_to_left: bool,
    /// Pan distance before a mouse drag activates
    pub mouse_drag_distance: f32,
    /// Pan distance before a touch drag activates
    pub touch_drag_distance: f32,
    /// Key that activates a focused toggle
    pub activation_key: Key,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION_FREE_ASPECT,
            right_to_left: false,
            mouse_drag_distance: 1.0,
            touch_drag_distance: 5.0,
            activation_key: Key::Function,
        }
    }
}

impl PlatformConfig {
    /// Whether the legacy aspect-ratio layout applies.
    #[must_use]
    pub const fn is_legacy_layout(&self) -> bool {
        self.api_version < API_VERSION_FREE_ASPECT
    }

    /// Drag activation distance for a pointer type.
    #[must_use]
    pub const fn drag_distance(&self, pointer_type: PointerType) -> f32 {
        match pointer_type {
            PointerType::Mouse => self.mouse_drag_distance,
            PointerType::Touch | PointerType::Pen => self.touch_drag_distance,
        }
    }

    /// Use an older api version.
    #[must_use]
    pub const fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    /// Use right-to-left layout.
    #[must_use]
    pub const fn with_right_to_left(mut self, right_to_left: bool) -> Self {
        self.right_to_left = right_to_left;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PlatformConfig::default();
        assert_eq!(config.api_version, 12);
        assert!(!config.right_to_left);
        assert_eq!(config.activation_key, Key::Function);
        assert!(!config.is_legacy_layout());
    }

    #[test]
    fn test_config_legacy_layout() {
        assert!(PlatformConfig::default().with_api_version(11).is_legacy_layout());
        assert!(!PlatformConfig::default().with_api_version(13).is_legacy_layout());
    }

    #[test]
    fn test_config_drag_distance_by_pointer() {
        let config = PlatformConfig::default();
        assert_eq!(config.drag_distance(PointerType::Mouse), 1.0);
        assert_eq!(config.drag_distance(PointerType::Touch), 5.0);
        assert_eq!(config.drag_distance(PointerType::Pen), 5.0);
    }

    #[test]
    fn test_config_partial_json() {
        let config: PlatformConfig =
            serde_json::from_str(r#"{"api_version":9,"activation_key":"Enter"}"#).unwrap();
        assert_eq!(config.api_version, 9);
        assert_eq!(config.activation_key, Key::Enter);
        assert_eq!(config.touch_drag_distance, 5.0);
    }
}
