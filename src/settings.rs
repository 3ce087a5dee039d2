//! Invoice settings, loadable from TOML

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{InvoiceError, InvoiceResult};

/// Tunables shared by intake, numbering and assembly
///
/// ```toml
/// company_suffix = "EYE"
/// sequence_width = 4
/// drift_tolerance = "0.01"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceSettings {
    /// Inserted between the city prefix and the sequence number
    pub company_suffix: String,
    /// Number of upper-case city letters leading a synthetic invoice number
    pub city_prefix_len: usize,
    /// Zero-padded width of the sequence number
    pub sequence_width: usize,
    /// Customer name used when the order has none
    pub placeholder_customer: String,
    /// Text used for any other missing string field
    pub placeholder_text: String,
    /// Largest tolerated gap between item-level sums and aggregate totals
    pub drift_tolerance: BigDecimal,
    /// Most product groups the synthetic generator will create
    pub max_item_types: u32,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            company_suffix: "EYE".to_string(),
            city_prefix_len: 4,
            sequence_width: 4,
            placeholder_customer: "Customer".to_string(),
            placeholder_text: "N/A".to_string(),
            drift_tolerance: BigDecimal::new(1.into(), 2),
            max_item_types: 5,
        }
    }
}

impl InvoiceSettings {
    /// Parse settings from TOML; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> InvoiceResult<Self> {
        let settings: Self =
            toml::from_str(source).map_err(|e| InvoiceError::Configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> InvoiceResult<()> {
        if self.city_prefix_len == 0 {
            return Err(InvoiceError::Configuration(
                "city_prefix_len must be at least 1".to_string(),
            ));
        }
        if self.sequence_width == 0 || self.sequence_width > 12 {
            return Err(InvoiceError::Configuration(
                "sequence_width must be between 1 and 12".to_string(),
            ));
        }
        if self.max_item_types == 0 {
            return Err(InvoiceError::Configuration(
                "max_item_types must be at least 1".to_string(),
            ));
        }
        if self.drift_tolerance < BigDecimal::from(0) {
            return Err(InvoiceError::Configuration(
                "drift_tolerance cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}
