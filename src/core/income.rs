use super::timeline::TimeOffsets;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// UK income types compared on the timeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum IncomeType {
    /// UK Government's National Living / Minimum Wage
    #[serde(rename = "NLW")]
    NationalLivingWage,
    /// Living Wage Foundation's Real Living Wage
    #[serde(rename = "RLW")]
    RealLivingWage,
    /// UKRI minimum annual PhD stipend
    #[serde(rename = "Stipend")]
    Stipend,
    /// Median graduate salary, age 21-30
    #[serde(rename = "Graduate")]
    Graduate,
    /// Median non-graduate salary, age 21-30
    #[serde(rename = "Non-Graduate")]
    NonGraduate,
    /// Median postgraduate salary, age 21-30
    #[serde(rename = "Postgraduate")]
    PostGraduate,
}

impl IncomeType {
    pub const ALL: [IncomeType; 6] = [
        IncomeType::NationalLivingWage,
        IncomeType::RealLivingWage,
        IncomeType::Stipend,
        IncomeType::Graduate,
        IncomeType::NonGraduate,
        IncomeType::PostGraduate,
    ];

    /// Name of the raw column holding this income type's rate or gross salary.
    pub fn column(&self) -> &'static str {
        match self {
            IncomeType::NationalLivingWage => "nmw_rate",
            IncomeType::RealLivingWage => "rlw_rate",
            IncomeType::Stipend => "stipend",
            IncomeType::Graduate => "Graduate",
            IncomeType::NonGraduate => "Non-Graduate",
            IncomeType::PostGraduate => "Postgraduate",
        }
    }

    /// Looks up an income type by its raw column name.
    pub fn from_column(column: &str) -> Option<IncomeType> {
        IncomeType::ALL
            .into_iter()
            .find(|income_type| income_type.column() == column)
    }

    pub fn basis(&self) -> GrossBasis {
        match self {
            IncomeType::NationalLivingWage | IncomeType::RealLivingWage => GrossBasis::Hourly,
            IncomeType::Stipend => GrossBasis::Untaxed,
            IncomeType::Graduate | IncomeType::NonGraduate | IncomeType::PostGraduate => {
                GrossBasis::Annual
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncomeType::NationalLivingWage => "NLW",
            IncomeType::RealLivingWage => "RLW",
            IncomeType::Stipend => "Stipend",
            IncomeType::Graduate => "Graduate",
            IncomeType::NonGraduate => "Non-Graduate",
            IncomeType::PostGraduate => "Postgraduate",
        }
    }
}

impl std::fmt::Display for IncomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How the raw figure for an income type turns into gross annual income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrossBasis {
    /// Hourly rate, scaled by the working hours in a year
    Hourly,
    /// Gross annual salary
    Annual,
    /// Already net (UK stipends are tax free), no deductions apply
    Untaxed,
}

/// Everything a pipeline needs to know about one income type, resolved once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeTypeSpec {
    pub income_type: IncomeType,
    pub column: &'static str,
    pub basis: GrossBasis,
    pub offset_months: u32,
}

impl IncomeTypeSpec {
    /// Lookup table for every income type with the configured offsets applied.
    pub fn table(offsets: &TimeOffsets) -> [IncomeTypeSpec; 6] {
        IncomeType::ALL.map(|income_type| IncomeTypeSpec {
            income_type,
            column: income_type.column(),
            basis: income_type.basis(),
            offset_months: offsets.months(income_type),
        })
    }
}
