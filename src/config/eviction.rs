use super::traits::ConfigSection;
use crate::error::SeriesCacheError;
use serde::{Deserialize, Serialize};

/// Hysteresis applied before the front of a result buffer is trimmed.
///
/// A trim only fires once the excess over the cap is larger than both
/// `threshold` and `cap / divider`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvictionConfig {
    pub threshold: usize,
    pub divider: usize,
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            threshold: 100,
            divider: 10,
        }
    }
}

impl ConfigSection for EvictionConfig {
    fn section_name() -> &'static str {
        "eviction"
    }

    fn validate(&self) -> Result<(), SeriesCacheError> {
        if self.divider == 0 {
            return Err(SeriesCacheError::Configuration(
                "Eviction divider must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EvictionConfig::default();
        assert_eq!(config.threshold, 100);
        assert_eq!(config.divider, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_divider_rejected() {
        let config = EvictionConfig {
            threshold: 100,
            divider: 0,
        };
        assert!(config.validate().is_err());
    }
}
