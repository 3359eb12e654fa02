pub mod cost_of_living;
pub mod currency;
pub mod error;
pub mod europe;
pub mod income;
pub mod inflation;
pub mod tax;
pub mod timeline;
pub mod uk;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use cost_of_living::{correction_factors, CorrectionFactors, PppRecord, PppTable, REFERENCE_COUNTRY};
pub use currency::{net_common, CountryIncome, ExchangeRates, RatesDocument, COMMON_CURRENCY};
pub use error::PipelineError;
pub use europe::{AbsoluteIncome, EquivalentIncome, EuropeIncomeReport, EuropePipeline};
pub use income::{GrossBasis, IncomeType, IncomeTypeSpec};
pub use inflation::{PriceIndex, RealMultipliers};
pub use tax::{DeductionRules, FIRST_VALID_YEAR};
pub use timeline::{effective_date, TimeOffsets};
pub use uk::{
    GraduateSalaries, GraduateSalary, RealIncome, RealIncomeSeries, UkIncomeReport, UkPipeline,
    WageYear,
};
pub use warnings::Warning;
