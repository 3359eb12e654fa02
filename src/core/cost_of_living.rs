use super::currency::ExchangeRates;
use super::error::{PipelineError, Result};
use super::warnings::Warning;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Country every cost-of-living correction is made relative to.
pub const REFERENCE_COUNTRY: &str = "United Kingdom";

/// Purchasing power parity of one country, in local currency per USD.
#[derive(Debug, Clone, PartialEq)]
pub struct PppRecord {
    pub country: String,
    /// ISO 3166 alpha-3 code
    pub location: String,
    pub value: Decimal,
    pub unit_currency: String,
    pub year: Option<i32>,
}

/// PPP values keyed by country name, one per country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PppTable {
    by_country: BTreeMap<String, PppRecord>,
}

impl PppTable {
    /// Builds the table. When a country has several years the latest is kept.
    pub fn new<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = PppRecord>,
    {
        let mut by_country: BTreeMap<String, PppRecord> = BTreeMap::new();
        for record in records {
            if record.value <= Decimal::ZERO {
                return Err(PipelineError::invalid("PPP", &record.country, "value", record.value));
            }
            match by_country.get(&record.country) {
                Some(existing) if existing.year == record.year => {
                    return Err(PipelineError::DuplicateEntry {
                        table: "PPP",
                        key: record.country,
                    });
                }
                Some(existing) if existing.year > record.year => continue,
                _ => {
                    by_country.insert(record.country.clone(), record);
                }
            }
        }
        Ok(PppTable { by_country })
    }

    pub fn get(&self, country: &str) -> Option<&PppRecord> {
        self.by_country.get(country)
    }

    /// ISO code recorded for a country.
    pub fn location(&self, country: &str) -> Option<&str> {
        self.get(country).map(|r| r.location.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PppRecord> + '_ {
        self.by_country.values()
    }
}

/// Cost-of-living correction for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub country_code: String,
    /// PPP restated in common-currency units
    pub ppp_common: Decimal,
    /// `ppp(reference) / ppp(country)`
    pub factor: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionFactors {
    reference_country: String,
    by_country: BTreeMap<String, Correction>,
    warnings: Vec<Warning>,
}

impl CorrectionFactors {
    pub fn reference_country(&self) -> &str {
        &self.reference_country
    }

    pub fn get(&self, country: &str) -> Option<&Correction> {
        self.by_country.get(country)
    }

    pub fn factor(&self, country: &str) -> Option<Decimal> {
        self.get(country).map(|c| c.factor)
    }

    /// Countries whose PPP unit currency could not be converted.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// PPP in common-currency terms: local units per USD over local units per
/// common unit.
pub fn ppp_common(record: &PppRecord, rates: &ExchangeRates) -> Result<Decimal> {
    rates
        .to_common(record.value, &record.unit_currency)
        .map_err(|err| match err {
            PipelineError::InvalidValue { .. } => {
                PipelineError::invalid("PPP", &record.country, "value", record.value)
            }
            err => err,
        })
}

/// Correction factor for every country in the PPP table relative to
/// `reference_country`.
///
/// Fails when the reference country is missing or its PPP cannot be
/// converted; other unconvertible countries are left out with a warning.
pub fn correction_factors(
    ppp: &PppTable,
    rates: &ExchangeRates,
    reference_country: &str,
) -> Result<CorrectionFactors> {
    let reference = ppp
        .get(reference_country)
        .ok_or_else(|| PipelineError::MissingReferenceCountry(reference_country.to_string()))?;
    let reference_ppp = ppp_common(reference, rates)?;

    let mut by_country = BTreeMap::new();
    let mut warnings = Vec::new();
    for record in ppp.iter() {
        match ppp_common(record, rates) {
            Ok(ppp_common) => {
                let factor = reference_ppp.checked_div(ppp_common).ok_or_else(|| {
                    PipelineError::invalid("PPP", &record.country, "value", record.value)
                })?;
                log::debug!("{}: ppp={} factor={}", record.country, ppp_common, factor);
                by_country.insert(
                    record.country.clone(),
                    Correction {
                        country_code: record.location.clone(),
                        ppp_common,
                        factor,
                    },
                );
            }
            Err(PipelineError::UnknownCurrency(_)) => warnings.push(Warning::UnknownCurrency {
                country: record.country.clone(),
                currency: record.unit_currency.clone(),
            }),
            Err(err) => return Err(err),
        }
    }

    Ok(CorrectionFactors {
        reference_country: reference_country.to_string(),
        by_country,
        warnings,
    })
}

/// Income with the same purchasing power in the reference country, `None`
/// on overflow.
pub fn apply(net_common: Decimal, factor: Decimal) -> Option<Decimal> {
    net_common.checked_mul(factor)
}
