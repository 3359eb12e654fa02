use super::error::{PipelineError, Result};
use super::income::{IncomeType, IncomeTypeSpec};
use super::inflation::{self, PriceIndex, RealMultipliers};
use super::tax::{DeductionRules, FIRST_VALID_YEAR};
use super::timeline::{effective_date, TimeOffsets};
use super::warnings::Warning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Age band the graduate salary comparison is restricted to.
pub const AGE_BAND: &str = "21-30";

/// Gender rows excluded from the graduate table, leaving the combined row.
const SPLIT_GENDERS: [&str; 2] = ["Male", "Female"];

/// One year of the UK wage and tax table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WageYear {
    pub year: i32,
    pub nmw_rate: Option<Decimal>,
    pub rlw_rate: Option<Decimal>,
    pub stipend: Option<Decimal>,
    pub allowance: Option<Decimal>,
    pub council_tax: Option<Decimal>,
}

impl WageYear {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("nmw_rate", self.nmw_rate),
            ("rlw_rate", self.rlw_rate),
            ("stipend", self.stipend),
            ("allowance", self.allowance),
            ("council tax", self.council_tax),
        ];
        for (field, value) in fields {
            if let Some(value) = value.filter(|v| v.is_sign_negative() && !v.is_zero()) {
                return Err(PipelineError::invalid("wage table", self.year, field, value));
            }
        }
        Ok(())
    }
}

/// A row of the graduate labour market salary table.
#[derive(Debug, Clone, PartialEq)]
pub struct GraduateSalary {
    pub gender: String,
    pub age_group: String,
    pub year: i32,
    pub graduate_type: String,
    pub median: Option<Decimal>,
}

/// Median salaries for one year, one field per graduate type.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalaryBands {
    pub graduate: Option<Decimal>,
    pub non_graduate: Option<Decimal>,
    pub postgraduate: Option<Decimal>,
}

impl SalaryBands {
    fn slot(&mut self, income_type: IncomeType) -> Option<&mut Option<Decimal>> {
        match income_type {
            IncomeType::Graduate => Some(&mut self.graduate),
            IncomeType::NonGraduate => Some(&mut self.non_graduate),
            IncomeType::PostGraduate => Some(&mut self.postgraduate),
            _ => None,
        }
    }
}

/// Graduate salary table pivoted to one row per year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraduateSalaries {
    by_year: BTreeMap<i32, SalaryBands>,
}

impl GraduateSalaries {
    /// Keeps the combined-gender rows of the 21-30 age band and pivots the
    /// graduate type into columns.
    pub fn pivot<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = GraduateSalary>,
    {
        let mut by_year: BTreeMap<i32, SalaryBands> = BTreeMap::new();
        let mut seen = BTreeSet::new();
        for row in rows {
            if SPLIT_GENDERS.contains(&row.gender.as_str()) || row.age_group != AGE_BAND {
                continue;
            }
            let Some(income_type) = IncomeType::from_column(&row.graduate_type) else {
                log::debug!("Ignoring graduate type '{}'", row.graduate_type);
                continue;
            };
            if !seen.insert((row.year, income_type)) {
                return Err(PipelineError::DuplicateEntry {
                    table: "graduate salaries",
                    key: format!("{} {}", row.year, row.graduate_type),
                });
            }
            if let Some(median) = row.median.filter(|m| m.is_sign_negative() && !m.is_zero()) {
                return Err(PipelineError::invalid(
                    "graduate salaries",
                    row.year,
                    "median",
                    median,
                ));
            }
            let bands = by_year.entry(row.year).or_default();
            if let Some(slot) = bands.slot(income_type) {
                *slot = row.median;
            }
        }
        Ok(GraduateSalaries { by_year })
    }

    pub fn get(&self, year: i32) -> Option<&SalaryBands> {
        self.by_year.get(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }
}

impl FromIterator<(i32, SalaryBands)> for GraduateSalaries {
    fn from_iter<T: IntoIterator<Item = (i32, SalaryBands)>>(iter: T) -> Self {
        GraduateSalaries {
            by_year: iter.into_iter().collect(),
        }
    }
}

/// A wage table year joined with that year's graduate salaries.
#[derive(Debug, Clone, PartialEq)]
pub struct UkIncomeRow {
    pub wages: WageYear,
    pub salaries: SalaryBands,
}

impl UkIncomeRow {
    pub fn year(&self) -> i32 {
        self.wages.year
    }

    /// Raw rate, stipend or salary for an income type.
    pub fn raw(&self, income_type: IncomeType) -> Option<Decimal> {
        match income_type {
            IncomeType::NationalLivingWage => self.wages.nmw_rate,
            IncomeType::RealLivingWage => self.wages.rlw_rate,
            IncomeType::Stipend => self.wages.stipend,
            IncomeType::Graduate => self.salaries.graduate,
            IncomeType::NonGraduate => self.salaries.non_graduate,
            IncomeType::PostGraduate => self.salaries.postgraduate,
        }
    }
}

/// Inner join of the wage table and graduate salaries on year. Returns the
/// joined rows and the wage table years that had no salary row.
pub fn join_by_year(wages: &[WageYear], salaries: &GraduateSalaries) -> (Vec<UkIncomeRow>, Vec<i32>) {
    let mut rows = Vec::new();
    let mut unmatched = Vec::new();
    for wage in wages {
        match salaries.get(wage.year) {
            Some(bands) => rows.push(UkIncomeRow {
                wages: wage.clone(),
                salaries: *bands,
            }),
            None => unmatched.push(wage.year),
        }
    }
    rows.sort_by_key(UkIncomeRow::year);
    (rows, unmatched)
}

/// Net annual income for one income type in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetIncome {
    pub year: i32,
    pub income_type: IncomeType,
    pub net_income: Decimal,
}

/// Net income restated in base year prices, placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RealIncome {
    pub year: i32,
    pub income_type: IncomeType,
    pub net_income: Decimal,
    pub real_income: Decimal,
    pub effective_date: NaiveDate,
}

/// Long-form real income series, ordered by year then income type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RealIncomeSeries(Vec<RealIncome>);

impl RealIncomeSeries {
    pub fn rows(&self) -> &[RealIncome] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rows for one income type, in year order.
    pub fn for_type(&self, income_type: IncomeType) -> impl Iterator<Item = &RealIncome> + '_ {
        self.0.iter().filter(move |r| r.income_type == income_type)
    }

    pub fn get(&self, year: i32, income_type: IncomeType) -> Option<&RealIncome> {
        self.0
            .iter()
            .find(|r| r.year == year && r.income_type == income_type)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UkIncomeReport {
    pub base_year: i32,
    pub series: RealIncomeSeries,
    pub warnings: Vec<Warning>,
}

/// Turns the UK wage, salary and price tables into a comparable real income series.
#[derive(Debug, Clone)]
pub struct UkPipeline {
    specs: [IncomeTypeSpec; 6],
    rules: DeductionRules,
}

impl Default for UkPipeline {
    fn default() -> Self {
        UkPipeline::new(&TimeOffsets::default(), DeductionRules::default())
    }
}

impl UkPipeline {
    pub fn new(offsets: &TimeOffsets, rules: DeductionRules) -> Self {
        UkPipeline {
            specs: IncomeTypeSpec::table(offsets),
            rules,
        }
    }

    pub fn compute(
        &self,
        wages: &[WageYear],
        salaries: &GraduateSalaries,
        index: &PriceIndex,
        base_year: i32,
    ) -> Result<UkIncomeReport> {
        let multipliers = RealMultipliers::new(base_year, index)?;
        for wage in wages {
            wage.validate()?;
        }

        let mut warnings = Vec::new();
        let (rows, unmatched) = join_by_year(wages, salaries);
        warnings.extend(unmatched.into_iter().map(|year| Warning::UnmatchedYear { year }));

        let net = self.net_series(&rows, &mut warnings);
        let series = self.real_series(&net, &multipliers, &mut warnings);

        for warning in &warnings {
            log::warn!("Dropped: {}", warning);
        }
        log::info!(
            "UK incomes: {} rows from {} years, base year {}",
            series.len(),
            rows.len(),
            base_year
        );

        Ok(UkIncomeReport {
            base_year,
            series,
            warnings,
        })
    }

    /// Net income per (year, income type). Years before the deduction floor
    /// and rows with a missing input are dropped.
    pub fn net_series(&self, rows: &[UkIncomeRow], warnings: &mut Vec<Warning>) -> Vec<NetIncome> {
        let mut net = Vec::new();
        for row in rows {
            let year = row.year();
            if year < FIRST_VALID_YEAR {
                warnings.push(Warning::BeforeDeductionFloor { year });
                continue;
            }
            for spec in &self.specs {
                let value = self.rules.net_income(
                    spec.basis,
                    row.raw(spec.income_type),
                    row.wages.allowance,
                    row.wages.council_tax,
                );
                match value {
                    Ok(Some(net_income)) => net.push(NetIncome {
                        year,
                        income_type: spec.income_type,
                        net_income,
                    }),
                    Ok(None) => warnings.push(Warning::MissingValue {
                        year,
                        income_type: spec.income_type,
                    }),
                    Err(err) => {
                        log::debug!("{} {}: {}", year, spec.income_type, err);
                        warnings.push(Warning::OutOfRange {
                            year,
                            income_type: spec.income_type,
                        });
                    }
                }
            }
        }
        net
    }

    /// Applies inflation multipliers and effective dates to a net series.
    pub fn real_series(
        &self,
        net: &[NetIncome],
        multipliers: &RealMultipliers,
        warnings: &mut Vec<Warning>,
    ) -> RealIncomeSeries {
        let mut unindexed = BTreeSet::new();
        let mut rows = Vec::with_capacity(net.len());
        for income in net {
            let Some(multiplier) = multipliers.get(income.year) else {
                unindexed.insert(income.year);
                continue;
            };
            let Some(real_income) = inflation::apply(income.net_income, multiplier) else {
                warnings.push(Warning::OutOfRange {
                    year: income.year,
                    income_type: income.income_type,
                });
                continue;
            };
            let Some(effective_date) = effective_date(income.year, self.offset(income.income_type))
            else {
                warnings.push(Warning::NoEffectiveDate {
                    year: income.year,
                    income_type: income.income_type,
                });
                continue;
            };
            rows.push(RealIncome {
                year: income.year,
                income_type: income.income_type,
                net_income: income.net_income,
                real_income,
                effective_date,
            });
        }
        warnings.extend(unindexed.into_iter().map(|year| Warning::MissingPriceIndex { year }));
        rows.sort_by_key(|r| (r.year, r.income_type));
        RealIncomeSeries(rows)
    }

    fn offset(&self, income_type: IncomeType) -> u32 {
        self.specs
            .iter()
            .find(|spec| spec.income_type == income_type)
            .map_or(0, |spec| spec.offset_months)
    }
}
