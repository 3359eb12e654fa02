//! Readers for the raw input snapshots. Every table passes through here
//! before reaching a pipeline.

pub mod europe;
pub mod uk;

pub use europe::{read_europe_incomes, read_ppp, read_rates, EuropeRecord, PppCsvRecord};
pub use uk::{
    read_graduate_salaries, read_price_index, read_wages, GraduateSalaryRecord, PriceIndexRecord,
    WageRecord,
};

use crate::core::error::{PipelineError, Result};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

/// Description of one column of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Whether a table starts with a free-text line above its header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preamble {
    None,
    DescriptiveRow,
}

/// Cells that stand for a suppressed or unavailable figure.
const MISSING_MARKERS: [&str; 8] = ["", "x", "c", "z", "..", ":", "nan", "n/a"];

pub(crate) fn read_records<T, R>(reader: R, preamble: Preamble) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = BufReader::new(reader);
    if preamble == Preamble::DescriptiveRow {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        log::debug!("Skipped preamble: {}", line.trim_end());
    }
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let records: std::result::Result<Vec<T>, _> = rdr.deserialize().collect();
    let records = records?;
    log::info!("Read {} csv records", records.len());
    Ok(records)
}

/// Parses a money or index cell, `None` for a missing marker. Thousands
/// separators and a leading currency symbol are accepted.
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['£', '€', '$'])
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if MISSING_MARKERS.contains(&cleaned.to_lowercase().as_str()) {
        return Ok(None);
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(Some)
        .map_err(|_| PipelineError::UnreadableAmount(raw.to_string()))
}

pub(crate) fn optional_amount<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_amount(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn amount<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_amount(&raw)
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| serde::de::Error::custom(format!("missing amount '{raw}'")))
}
