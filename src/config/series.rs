use super::traits::ConfigSection;
use crate::error::SeriesCacheError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Maximum bars a series keeps before dropping the oldest. `None` keeps everything.
    pub maximum_bar_count: Option<usize>,
}

impl ConfigSection for SeriesConfig {
    fn section_name() -> &'static str {
        "series"
    }

    fn validate(&self) -> Result<(), SeriesCacheError> {
        if self.maximum_bar_count == Some(0) {
            return Err(SeriesCacheError::Configuration(
                "Maximum bar count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
