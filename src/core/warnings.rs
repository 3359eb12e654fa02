use super::income::IncomeType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rows dropped by a pipeline. A dropped row is absent from the output table,
/// never rendered as a null or zero placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Year is before the first year the deduction formula is valid for.
    BeforeDeductionFloor { year: i32 },
    /// Wage table year has no matching graduate salary row.
    UnmatchedYear { year: i32 },
    /// An input cell needed for this income type was empty.
    MissingValue { year: i32, income_type: IncomeType },
    /// A figure for this income type is too large to compute with.
    OutOfRange { year: i32, income_type: IncomeType },
    /// Effective date falls outside the representable calendar.
    NoEffectiveDate { year: i32, income_type: IncomeType },
    /// No price index for the year, so no real value can be derived.
    MissingPriceIndex { year: i32 },
    /// Country's currency (or PPP unit currency) has no exchange rate.
    UnknownCurrency { country: String, currency: String },
    /// Country row has an empty stipend, tax or fee.
    IncompleteCountry { country: String },
    /// Country has no PPP value, so no cost-of-living correction.
    MissingPpp { country: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::BeforeDeductionFloor { year } => {
                write!(f, "{year}: before {}", super::tax::FIRST_VALID_YEAR)
            }
            Warning::UnmatchedYear { year } => write!(f, "{year}: no graduate salary data"),
            Warning::MissingValue { year, income_type } => {
                write!(f, "{year}: missing value for {income_type}")
            }
            Warning::OutOfRange { year, income_type } => {
                write!(f, "{year}: {income_type} out of range")
            }
            Warning::NoEffectiveDate { year, income_type } => {
                write!(f, "{year}: no effective date for {income_type}")
            }
            Warning::MissingPriceIndex { year } => write!(f, "{year}: no price index"),
            Warning::UnknownCurrency { country, currency } => {
                write!(f, "{country}: no exchange rate for {currency}")
            }
            Warning::IncompleteCountry { country } => write!(f, "{country}: incomplete income data"),
            Warning::MissingPpp { country } => write!(f, "{country}: no PPP value"),
        }
    }
}
