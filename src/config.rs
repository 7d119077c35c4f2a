//! Date field settings, typically deserialized from the host form schema.

use serde::Deserialize;

use crate::{DateBounds, IsoDate, RangeError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration parse error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Bounds(#[from] RangeError),
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DateFieldConfig {
    /// Earliest selectable date, inclusive
    pub min_date: Option<IsoDate>,
    /// Latest selectable date, inclusive
    pub max_date: Option<IsoDate>,
    /// Whether a complete but invalid entry clears the host value right away
    /// instead of waiting for blur
    pub clear_on_invalid: bool,
}

impl Default for DateFieldConfig {
    fn default() -> Self {
        Self {
            min_date: None,
            max_date: None,
            clear_on_invalid: true,
        }
    }
}

impl DateFieldConfig {
    /// Reads settings from JSON such as `{"minDate": "2024-01-01", "clearOnInvalid": false}`.
    ///
    /// # Errors
    /// Returns `ConfigError::Json` for malformed JSON or dates and
    /// `ConfigError::Bounds` when `minDate` is after `maxDate`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.bounds()?;
        Ok(config)
    }

    /// Validated selection bounds.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` when `min_date` is after `max_date`.
    pub fn bounds(&self) -> Result<DateBounds, RangeError> {
        DateBounds::new(self.min_date, self.max_date)
    }
}
