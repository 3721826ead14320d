//! Runtime Configuration

use serde::{Deserialize, Serialize};

/// Runtime configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Prefix of generated child identifiers
    pub part_id_prefix: String,

    /// First number issued for message keys
    pub first_key: u64,

    /// Catch panics raised by handler callbacks
    pub isolate_handlers: bool,
}

impl RuntimeConfig {
    /// Load from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            part_id_prefix: "part-".to_string(),
            first_key: 1,
            isolate_handlers: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let config = RuntimeConfig::from_json(r#"{"part_id_prefix": "w-"}"#).unwrap();
        assert_eq!(config.part_id_prefix, "w-");
        assert_eq!(config.first_key, 1);
        assert!(config.isolate_handlers);
    }

    #[test]
    fn test_bad_json() {
        assert!(RuntimeConfig::from_json(r#"{"first_key": "one"}"#).is_err());
    }
}
