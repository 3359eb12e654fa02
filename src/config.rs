use crate::core::error::Result;
use crate::core::{DeductionRules, TimeOffsets, REFERENCE_COUNTRY};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Settings shared by both pipelines. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Year whose prices real incomes are expressed in
    pub base_year: i32,
    /// Month offsets placing each income type on the timeline
    pub offsets: TimeOffsets,
    /// Simplified UK deduction model
    pub deductions: DeductionRules,
    /// Currency cost-of-living corrected incomes are shown in
    pub display_currency: String,
    /// Country PPP corrections are relative to
    pub reference_country: String,
    /// Seconds a computed report stays cached
    pub cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_year: 2024,
            offsets: TimeOffsets::default(),
            deductions: DeductionRules::default(),
            display_currency: "GBP".to_string(),
            reference_country: REFERENCE_COUNTRY.to_string(),
            cache_ttl_secs: 60 * 60,
        }
    }
}

impl Config {
    /// Read a JSON config.
    pub fn from_reader<R: Read>(reader: R) -> Result<Config> {
        Ok(serde_json::from_reader(reader)?)
    }
}
