use super::cost_of_living::{self, correction_factors, PppTable, REFERENCE_COUNTRY};
use super::currency::{net_common, CountryIncome, ExchangeRates};
use super::error::{PipelineError, Result};
use super::warnings::Warning;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

/// Net stipend of a country in the common currency, before any cost-of-living
/// correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsoluteIncome {
    pub country: String,
    pub country_code: Option<String>,
    pub net_common: Decimal,
}

/// Net stipend of a country after the cost-of-living correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquivalentIncome {
    pub country: String,
    pub country_code: String,
    pub net_common: Decimal,
    pub ppp_correction_factor: Decimal,
    /// Income with equal purchasing power in the reference country, common currency
    pub equivalent_common: Decimal,
    /// `equivalent_common` in the display currency
    pub equivalent_display: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct EuropeIncomeReport {
    pub common_currency: String,
    pub display_currency: String,
    pub reference_country: String,
    /// Every country with a resolvable currency and complete figures
    pub absolute: Vec<AbsoluteIncome>,
    /// Countries from `absolute` that also have a PPP correction
    pub corrected: Vec<EquivalentIncome>,
    pub warnings: Vec<Warning>,
}

/// Compares net PhD stipends across countries in one currency, with and
/// without a purchasing power correction.
#[derive(Debug, Clone)]
pub struct EuropePipeline {
    reference_country: String,
    display_currency: String,
}

impl Default for EuropePipeline {
    fn default() -> Self {
        EuropePipeline::new(REFERENCE_COUNTRY, "GBP")
    }
}

impl EuropePipeline {
    pub fn new(reference_country: &str, display_currency: &str) -> Self {
        EuropePipeline {
            reference_country: reference_country.to_string(),
            display_currency: display_currency.to_string(),
        }
    }

    pub fn compute(
        &self,
        incomes: &[CountryIncome],
        ppp: &PppTable,
        rates: &ExchangeRates,
    ) -> Result<EuropeIncomeReport> {
        let mut countries = BTreeSet::new();
        for income in incomes {
            income.validate()?;
            if !countries.insert(income.country.as_str()) {
                return Err(PipelineError::DuplicateEntry {
                    table: "europe incomes",
                    key: income.country.clone(),
                });
            }
        }
        let display_rate = rates.rate(&self.display_currency)?;
        let factors = correction_factors(ppp, rates, &self.reference_country)?;
        let mut warnings = factors.warnings().to_vec();

        let mut absolute = Vec::new();
        let mut corrected = Vec::new();
        for income in incomes {
            let net = match net_common(income, rates) {
                Ok(Some(net)) => net,
                Ok(None) => {
                    warnings.push(Warning::IncompleteCountry {
                        country: income.country.clone(),
                    });
                    continue;
                }
                Err(PipelineError::UnknownCurrency(_)) => {
                    warnings.push(Warning::UnknownCurrency {
                        country: income.country.clone(),
                        currency: income.currency.clone(),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };
            absolute.push(AbsoluteIncome {
                country: income.country.clone(),
                country_code: ppp.location(&income.country).map(str::to_string),
                net_common: net,
            });

            let Some(correction) = factors.get(&income.country) else {
                if ppp.get(&income.country).is_none() {
                    warnings.push(Warning::MissingPpp {
                        country: income.country.clone(),
                    });
                }
                continue;
            };
            let equivalent = cost_of_living::apply(net, correction.factor).ok_or_else(|| {
                PipelineError::invalid("PPP", &income.country, "correction factor", correction.factor)
            })?;
            let equivalent_display = equivalent.checked_mul(display_rate).ok_or_else(|| {
                PipelineError::invalid("exchange rates", &self.display_currency, "rate", display_rate)
            })?;
            corrected.push(EquivalentIncome {
                country: income.country.clone(),
                country_code: correction.country_code.clone(),
                net_common: net,
                ppp_correction_factor: correction.factor,
                equivalent_common: equivalent,
                equivalent_display,
            });
        }

        for warning in &warnings {
            log::warn!("Dropped: {}", warning);
        }
        log::info!(
            "Europe incomes: {} countries, {} with cost-of-living correction",
            absolute.len(),
            corrected.len()
        );

        Ok(EuropeIncomeReport {
            common_currency: rates.base().to_string(),
            display_currency: self.display_currency.to_uppercase(),
            reference_country: factors.reference_country().to_string(),
            absolute,
            corrected,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cost_of_living::PppRecord;
    use crate::core::error::PipelineError;
    use rust_decimal_macros::dec;

    fn income(country: &str, stipend: Decimal, currency: &str) -> CountryIncome {
        CountryIncome {
            country: country.to_string(),
            stipend: Some(stipend),
            tax: Some(dec!(1000)),
            fee: Some(dec!(500)),
            currency: currency.to_string(),
        }
    }

    fn ppp(country: &str, location: &str, value: Decimal) -> PppRecord {
        PppRecord {
            country: country.to_string(),
            location: location.to_string(),
            value,
            unit_currency: "EUR".to_string(),
            year: None,
        }
    }

    fn rates() -> ExchangeRates {
        ExchangeRates::new("EUR", [("GBP", dec!(0.85)), ("CHF", dec!(1.1))]).unwrap()
    }

    fn ppp_table() -> PppTable {
        PppTable::new([
            ppp(REFERENCE_COUNTRY, "GBR", dec!(0.85)),
            ppp("Switzerland", "CHE", dec!(1.20)),
            ppp("Germany", "DEU", dec!(0.75)),
        ])
        .unwrap()
    }

    #[test]
    fn converts_and_corrects() {
        let incomes = vec![income("Switzerland", dec!(12000), "CHF")];
        let report = EuropePipeline::default()
            .compute(&incomes, &ppp_table(), &rates())
            .unwrap();

        assert!(report.warnings.is_empty());
        assert_eq!(report.common_currency, "EUR");
        let row = &report.corrected[0];
        assert_eq!(row.country_code, "CHE");
        assert_eq!(row.net_common.round(), dec!(9545));
        assert_eq!(row.ppp_correction_factor.round_dp(4), dec!(0.7083));
        assert_eq!(row.equivalent_common.round(), dec!(6761));
        assert_eq!(row.equivalent_display, row.equivalent_common * dec!(0.85));
        assert_eq!(report.absolute[0].country_code.as_deref(), Some("CHE"));
    }

    #[test]
    fn unknown_currency_never_reaches_output() {
        let incomes = vec![
            income("Norway", dec!(500000), "NOK"),
            income("Germany", dec!(30000), "EUR"),
        ];
        let report = EuropePipeline::default()
            .compute(&incomes, &ppp_table(), &rates())
            .unwrap();

        assert!(report.absolute.iter().all(|r| r.country != "Norway"));
        assert!(report.corrected.iter().all(|r| r.country != "Norway"));
        assert_eq!(report.corrected.len(), 1);
        assert_eq!(
            report.warnings,
            vec![Warning::UnknownCurrency {
                country: "Norway".to_string(),
                currency: "NOK".to_string()
            }]
        );
    }

    #[test]
    fn missing_ppp_keeps_absolute_only() {
        let incomes = vec![income("Austria", dec!(40000), "EUR")];
        let report = EuropePipeline::default()
            .compute(&incomes, &ppp_table(), &rates())
            .unwrap();

        assert_eq!(report.absolute.len(), 1);
        assert_eq!(report.absolute[0].country_code, None);
        assert_eq!(report.absolute[0].net_common, dec!(38500));
        assert!(report.corrected.is_empty());
        assert_eq!(
            report.warnings,
            vec![Warning::MissingPpp {
                country: "Austria".to_string()
            }]
        );
    }

    #[test]
    fn incomplete_rows_dropped() {
        let mut partial = income("Germany", dec!(30000), "EUR");
        partial.tax = None;
        let report = EuropePipeline::default()
            .compute(&[partial], &ppp_table(), &rates())
            .unwrap();
        assert!(report.absolute.is_empty());
        assert!(report.corrected.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn unknown_display_currency_is_fatal() {
        let pipeline = EuropePipeline::new(REFERENCE_COUNTRY, "USD");
        let err = pipeline.compute(&[], &ppp_table(), &rates()).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCurrency(code) if code == "USD"));
    }

    #[test]
    fn missing_reference_country_is_fatal() {
        let table = PppTable::new([ppp("Germany", "DEU", dec!(0.75))]).unwrap();
        let err = EuropePipeline::default()
            .compute(&[], &table, &rates())
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingReferenceCountry(_)));
    }

    #[test]
    fn negative_fee_rejected() {
        let mut bad = income("Germany", dec!(30000), "EUR");
        bad.fee = Some(dec!(-5));
        let err = EuropePipeline::default()
            .compute(&[bad], &ppp_table(), &rates())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidValue { field: "fee", .. }));
    }

    #[test]
    fn duplicate_country_rejected() {
        let incomes = vec![
            income("Switzerland", dec!(12000), "CHF"),
            income("Switzerland", dec!(13000), "CHF"),
        ];
        let err = EuropePipeline::default()
            .compute(&incomes, &ppp_table(), &rates())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DuplicateEntry { table: "europe incomes", ref key } if key == "Switzerland"
        ));
    }

    #[test]
    fn out_of_range_income_is_fatal() {
        let pipeline = EuropePipeline::default();

        let huge_pounds = vec![income(REFERENCE_COUNTRY, dec!(70000000000000000000000000000), "GBP")];
        let err = pipeline
            .compute(&huge_pounds, &ppp_table(), &rates())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidValue { table: "exchange rates", .. }
        ));

        // fits in EUR, overflows once scaled by Germany's factor of 0.85 / 0.75
        let huge_euros = vec![income("Germany", dec!(75000000000000000000000000000), "EUR")];
        let err = pipeline
            .compute(&huge_euros, &ppp_table(), &rates())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidValue { table: "PPP", .. }));
    }
}
