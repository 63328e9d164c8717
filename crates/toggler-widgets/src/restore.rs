//! State restoration payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading a restore payload.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// Not JSON, or the `IsOn` key is missing or not a boolean
    #[error("malformed restore info: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted toggle state, serialized as `{"IsOn":bool}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreInfo {
    /// Whether the toggle was on
    #[serde(rename = "IsOn")]
    pub is_on: bool,
}

impl RestoreInfo {
    /// Payload for the given state.
    #[must_use]
    pub const fn new(is_on: bool) -> Self {
        Self { is_on }
    }

    /// Encode to the JSON payload.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::json!({ "IsOn": self.is_on }).to_string()
    }

    /// Decode a JSON payload.
    pub fn parse(json: &str) -> Result<Self, RestoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_info_wire_format() {
        assert_eq!(RestoreInfo::new(true).to_json(), r#"{"IsOn":true}"#);
        assert_eq!(RestoreInfo::new(false).to_json(), r#"{"IsOn":false}"#);
    }

    #[test]
    fn test_restore_info_parse() {
        assert_eq!(
            RestoreInfo::parse(r#"{"IsOn":true}"#).unwrap(),
            RestoreInfo::new(true)
        );
        // Unknown keys are tolerated.
        assert!(RestoreInfo::parse(r#"{"IsOn":false,"Extra":1}"#).is_ok());
    }

    #[test]
    fn test_restore_info_rejects_malformed() {
        assert!(RestoreInfo::parse("").is_err());
        assert!(RestoreInfo::parse("{}").is_err());
        assert!(RestoreInfo::parse(r#"{"IsOn":"yes"}"#).is_err());
        let err = RestoreInfo::parse("not json").unwrap_err();
        assert!(err.to_string().starts_with("malformed restore info"));
    }
}
