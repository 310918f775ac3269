use serde::{Deserialize, Serialize};

use crate::core::Result;

/// What a write does when the target property has no setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadOnlyPolicy {
    /// Leave the property untouched and report success.
    #[default]
    Skip,
    /// Fail the write with a mapping error.
    Reject,
}

/// Mapper configuration
///
/// The defaults reproduce the classic behavior: `NULL` becomes the member's
/// default value and writes to read-only properties are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Handling of writes to properties without a setter
    pub read_only_policy: ReadOnlyPolicy,

    /// Replace `NULL` with the member's default value.
    ///
    /// When disabled, `NULL` is passed through and only nullable members accept it.
    pub coerce_nulls: bool,
}

impl MapperConfig {
    pub fn new() -> Self {
        Self {
            read_only_policy: ReadOnlyPolicy::Skip,
            coerce_nulls: true,
        }
    }

    /// Set the read-only policy
    pub fn read_only_policy(mut self, policy: ReadOnlyPolicy) -> Self {
        self.read_only_policy = policy;
        self
    }

    /// Shorthand for `read_only_policy(ReadOnlyPolicy::Reject)`
    pub fn strict(self) -> Self {
        self.read_only_policy(ReadOnlyPolicy::Reject)
    }

    /// Enable or disable NULL coercion
    pub fn coerce_nulls(mut self, coerce: bool) -> Self {
        self.coerce_nulls = coerce;
        self
    }

    /// Parse from JSON. Missing keys keep their defaults.
    ///
    /// ```
    /// use rowmap::{MapperConfig, ReadOnlyPolicy};
    ///
    /// let config = MapperConfig::from_json(r#"{ "read_only_policy": "reject" }"#).unwrap();
    /// assert_eq!(config.read_only_policy, ReadOnlyPolicy::Reject);
    /// assert!(config.coerce_nulls);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MapError;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.read_only_policy, ReadOnlyPolicy::Skip);
        assert!(config.coerce_nulls);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MapperConfig::new().strict().coerce_nulls(false);

        assert_eq!(config.read_only_policy, ReadOnlyPolicy::Reject);
        assert!(!config.coerce_nulls);
    }

    #[test]
    fn test_json_round_trip() {
        let config = MapperConfig::new().strict();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"reject\""));
        assert_eq!(MapperConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let err = MapperConfig::from_json(r#"{ "read_only_policy": "explode" }"#).unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
    }
}
