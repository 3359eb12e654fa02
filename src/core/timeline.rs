use super::income::IncomeType;
use chrono::{Months, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Months after 1 January at which each income type's yearly figure took effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TimeOffsets {
    /// New NLW rate applies from the start of April
    pub national_living_wage: u32,
    /// RLW announced end of October, employers have six months to implement
    pub real_living_wage: u32,
    /// New stipend applies from the start of the academic year in August
    pub stipend: u32,
    /// Salary medians describe the middle of the year
    pub graduate: u32,
    pub non_graduate: u32,
    pub postgraduate: u32,
}

impl Default for TimeOffsets {
    fn default() -> Self {
        TimeOffsets {
            national_living_wage: 3,
            real_living_wage: 10 + 6,
            stipend: 7,
            graduate: 6,
            non_graduate: 6,
            postgraduate: 6,
        }
    }
}

impl TimeOffsets {
    pub fn months(&self, income_type: IncomeType) -> u32 {
        match income_type {
            IncomeType::NationalLivingWage => self.national_living_wage,
            IncomeType::RealLivingWage => self.real_living_wage,
            IncomeType::Stipend => self.stipend,
            IncomeType::Graduate => self.graduate,
            IncomeType::NonGraduate => self.non_graduate,
            IncomeType::PostGraduate => self.postgraduate,
        }
    }

    pub fn effective_date(&self, year: i32, income_type: IncomeType) -> Option<NaiveDate> {
        effective_date(year, self.months(income_type))
    }
}

/// 1 January of `year` shifted forward by `offset_months`.
///
/// `None` only when the date falls outside chrono's representable range.
pub fn effective_date(year: i32, offset_months: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_months(Months::new(offset_months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_offsets() {
        let offsets = TimeOffsets::default();
        assert_eq!(
            offsets.effective_date(2020, IncomeType::NationalLivingWage),
            Some(date(2020, 4, 1))
        );
        assert_eq!(offsets.effective_date(2020, IncomeType::Stipend), Some(date(2020, 8, 1)));
        assert_eq!(offsets.effective_date(2020, IncomeType::Graduate), Some(date(2020, 7, 1)));
    }

    #[test]
    fn offsets_past_a_year_roll_over() {
        let offsets = TimeOffsets::default();
        assert_eq!(
            offsets.effective_date(2020, IncomeType::RealLivingWage),
            Some(date(2021, 5, 1))
        );
    }

    #[test]
    fn alternative_convention_from_config() {
        let offsets: TimeOffsets =
            serde_json::from_str(r#"{"national_living_wage": 4, "stipend": 8}"#).unwrap();
        assert_eq!(offsets.national_living_wage, 4);
        assert_eq!(offsets.stipend, 8);
        assert_eq!(offsets.real_living_wage, 16);
        assert_eq!(offsets.effective_date(2019, IncomeType::Stipend), Some(date(2019, 9, 1)));
    }

    #[test]
    fn zero_offset_is_new_year() {
        assert_eq!(effective_date(2015, 0), Some(date(2015, 1, 1)));
    }
}
