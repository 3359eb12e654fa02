use super::error::{PipelineError, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Consumer price index (CPIH style) value per year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceIndex {
    values: BTreeMap<i32, Decimal>,
}

impl PriceIndex {
    /// Builds the index, rejecting repeated years and non-positive values.
    pub fn new<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, Decimal)>,
    {
        let mut values = BTreeMap::new();
        for (year, value) in records {
            if value <= Decimal::ZERO {
                return Err(PipelineError::invalid("price index", year, "index value", value));
            }
            if values.insert(year, value).is_some() {
                return Err(PipelineError::DuplicateYear {
                    table: "price index",
                    year,
                });
            }
        }
        Ok(PriceIndex { values })
    }

    pub fn get(&self, year: i32) -> Option<Decimal> {
        self.values.get(&year).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Multipliers that restate a year's money in base year prices.
#[derive(Debug, Clone, PartialEq)]
pub struct RealMultipliers {
    base_year: i32,
    by_year: BTreeMap<i32, Decimal>,
}

impl RealMultipliers {
    /// `multiplier(year) = index(base_year) / index(year)` for every indexed year.
    pub fn new(base_year: i32, index: &PriceIndex) -> Result<Self> {
        let base = index
            .get(base_year)
            .ok_or(PipelineError::MissingBaseYear(base_year))?;
        let by_year = index
            .values
            .iter()
            .map(|(&year, &value)| {
                base.checked_div(value)
                    .map(|multiplier| (year, multiplier))
                    .ok_or_else(|| PipelineError::invalid("price index", year, "index value", value))
            })
            .collect::<Result<_>>()?;
        Ok(RealMultipliers { base_year, by_year })
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    /// Multiplier for `year`, `None` if the index has no value for it.
    pub fn get(&self, year: i32) -> Option<Decimal> {
        self.by_year.get(&year).copied()
    }

    /// Real value of `value` earned in `year`, `None` if either is missing
    /// or the result is out of range.
    pub fn real_value(&self, year: i32, value: Option<Decimal>) -> Option<Decimal> {
        apply(value?, self.get(year)?)
    }

    /// Applies the multipliers to a `(year, value)` series. Rows without a
    /// multiplier or value are dropped.
    pub fn apply_series<I>(&self, series: I) -> Vec<(i32, Decimal)>
    where
        I: IntoIterator<Item = (i32, Option<Decimal>)>,
    {
        series
            .into_iter()
            .filter_map(|(year, value)| Some((year, self.real_value(year, value)?)))
            .collect()
    }
}

/// `value * multiplier`, `None` on overflow.
pub fn apply(value: Decimal, multiplier: Decimal) -> Option<Decimal> {
    value.checked_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn index() -> PriceIndex {
        PriceIndex::new([
            (2020, dec!(85)),
            (2021, dec!(80)),
            (2022, dec!(97.3)),
            (2024, dec!(100)),
        ])
        .unwrap()
    }

    #[test]
    fn multiplier_relative_to_base_year() {
        let multipliers = RealMultipliers::new(2024, &index()).unwrap();
        let m2020 = multipliers.get(2020).unwrap();
        assert_eq!(m2020.round_dp(4), dec!(1.1765));

        let real = multipliers.real_value(2020, Some(dec!(15000))).unwrap();
        assert_eq!(real.round_dp(0), dec!(17647));
    }

    #[test]
    fn base_year_multiplier_is_exactly_one() {
        let index = index();
        for year in index.years() {
            let multipliers = RealMultipliers::new(year, &index).unwrap();
            assert_eq!(multipliers.get(year), Some(Decimal::ONE));
            assert_eq!(multipliers.base_year(), year);
        }
    }

    #[test]
    fn missing_base_year_is_fatal() {
        let err = RealMultipliers::new(2023, &index()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingBaseYear(2023)));
    }

    #[test]
    fn unindexed_years_are_dropped() {
        let multipliers = RealMultipliers::new(2024, &index()).unwrap();
        assert_eq!(multipliers.get(2023), None);
        assert_eq!(multipliers.real_value(2023, Some(dec!(15000))), None);

        let series = multipliers.apply_series([
            (2021, Some(dec!(8000))),
            (2023, Some(dec!(9000))),
            (2024, None),
            (2024, Some(dec!(10000))),
        ]);
        assert_eq!(series, vec![(2021, dec!(10000)), (2024, dec!(10000))]);
    }

    #[test]
    fn rejects_bad_index_values() {
        assert!(matches!(
            PriceIndex::new([(2020, dec!(0))]),
            Err(PipelineError::InvalidValue { .. })
        ));
        assert!(matches!(
            PriceIndex::new([(2020, dec!(85)), (2020, dec!(86))]),
            Err(PipelineError::DuplicateYear { year: 2020, .. })
        ));
    }

    #[test]
    fn tiny_index_value_is_rejected() {
        let index = PriceIndex::new([(2020, Decimal::new(1, 27)), (2024, dec!(100))]).unwrap();
        let err = RealMultipliers::new(2024, &index).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidValue { table: "price index", .. }
        ));
    }

    #[test]
    fn overflowing_real_value_is_none() {
        let multipliers = RealMultipliers::new(2024, &index()).unwrap();
        assert_eq!(apply(Decimal::MAX, dec!(2)), None);
        assert_eq!(multipliers.real_value(2021, Some(Decimal::MAX)), None);
    }
}
