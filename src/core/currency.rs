use super::error::{PipelineError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Common currency the exchange rate snapshot is quoted against.
pub const COMMON_CURRENCY: &str = "EUR";

/// Point-in-time exchange rates: units of each currency per one unit of the
/// base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    base: String,
    rates: BTreeMap<String, Decimal>,
}

impl ExchangeRates {
    /// Builds the mapping, rejecting non-positive rates. Codes are upper-cased.
    pub fn new<I, S>(base: &str, rates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (code, rate) in rates {
            let code = normalize_code(code.as_ref());
            if rate <= Decimal::ZERO {
                return Err(PipelineError::invalid("exchange rates", code, "rate", rate));
            }
            map.insert(code, rate);
        }
        Ok(ExchangeRates {
            base: normalize_code(base),
            rates: map,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Units of `code` per unit of the base currency.
    pub fn rate(&self, code: &str) -> Result<Decimal> {
        let code = normalize_code(code);
        if code == self.base {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&code)
            .copied()
            .ok_or(PipelineError::UnknownCurrency(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rate(code).is_ok()
    }

    /// Local currency amount to the base currency.
    pub fn to_common(&self, amount: Decimal, code: &str) -> Result<Decimal> {
        let rate = self.rate(code)?;
        amount
            .checked_div(rate)
            .ok_or_else(|| PipelineError::invalid("exchange rates", normalize_code(code), "rate", rate))
    }

    /// Base currency amount to a local currency.
    pub fn from_common(&self, amount: Decimal, code: &str) -> Result<Decimal> {
        let rate = self.rate(code)?;
        amount
            .checked_mul(rate)
            .ok_or_else(|| PipelineError::invalid("exchange rates", normalize_code(code), "rate", rate))
    }
}

/// Exchange rate snapshot as served by exchangerate-api style endpoints, or
/// a flat code to rate map quoted against EUR.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RatesDocument {
    Api {
        #[serde(default = "default_base")]
        base: String,
        rates: BTreeMap<String, Decimal>,
    },
    Flat(BTreeMap<String, Decimal>),
}

fn default_base() -> String {
    COMMON_CURRENCY.to_string()
}

impl TryFrom<RatesDocument> for ExchangeRates {
    type Error = PipelineError;

    fn try_from(doc: RatesDocument) -> Result<Self> {
        match doc {
            RatesDocument::Api { base, rates } => ExchangeRates::new(&base, rates),
            RatesDocument::Flat(rates) => ExchangeRates::new(COMMON_CURRENCY, rates),
        }
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Stipend figures for one country, in its local currency.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryIncome {
    pub country: String,
    pub stipend: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub fee: Option<Decimal>,
    pub currency: String,
}

impl CountryIncome {
    /// Stipend less tax and fees, `None` if any figure is missing.
    pub fn net_local(&self) -> Option<Decimal> {
        Some(self.stipend? - self.tax? - self.fee?)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let fields = [("stipend", self.stipend), ("tax", self.tax), ("fee", self.fee)];
        for (field, value) in fields {
            if let Some(value) = value.filter(|v| *v < Decimal::ZERO) {
                return Err(PipelineError::invalid("europe incomes", &self.country, field, value));
            }
        }
        Ok(())
    }
}

/// Net income of a country record converted to the common currency.
pub fn net_common(record: &CountryIncome, rates: &ExchangeRates) -> Result<Option<Decimal>> {
    match record.net_local() {
        Some(net) => rates.to_common(net, &record.currency).map(Some),
        None => Ok(None),
    }
}
