use super::error::{PipelineError, Result};
use super::income::GrossBasis;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// First year the simplified deduction model holds for.
pub const FIRST_VALID_YEAR: i32 = 2012;

/// Simplified UK deductions for a low earner: all income tax at the basic
/// rate, national insurance as a flat annual amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeductionRules {
    /// Paid hours in a year (37.5 h/week x 52 weeks)
    #[schemars(with = "f64")]
    pub hours_per_year: Decimal,
    /// Income tax rate applied above the personal allowance
    #[schemars(with = "f64")]
    pub basic_rate: Decimal,
    /// Annual national insurance contribution
    #[schemars(with = "f64")]
    pub national_insurance: Decimal,
}

impl Default for DeductionRules {
    fn default() -> Self {
        DeductionRules {
            hours_per_year: dec!(1950),
            basic_rate: dec!(0.20),
            national_insurance: dec!(600),
        }
    }
}

impl DeductionRules {
    /// Gross annual income for a raw rate (hourly) or salary (annual).
    /// `None` when the result is out of `Decimal` range.
    pub fn gross_annual(&self, basis: GrossBasis, raw: Decimal) -> Option<Decimal> {
        match basis {
            GrossBasis::Hourly => raw.checked_mul(self.hours_per_year),
            GrossBasis::Annual | GrossBasis::Untaxed => Some(raw),
        }
    }

    /// Income tax on the part of gross income above the allowance.
    ///
    /// Never negative: an allowance above gross income means no tax, not a
    /// rebate.
    pub fn income_tax(&self, gross_annual: Decimal, allowance: Decimal) -> Option<Decimal> {
        gross_annual
            .checked_sub(allowance)?
            .max(Decimal::ZERO)
            .checked_mul(self.basic_rate)
    }

    /// Net annual income after income tax, national insurance and council tax.
    ///
    /// A missing input gives `Ok(None)`. Untaxed income is returned as is.
    /// Figures too large to compute with are an `InvalidValue` error.
    pub fn net_income(
        &self,
        basis: GrossBasis,
        raw: Option<Decimal>,
        allowance: Option<Decimal>,
        council_tax: Option<Decimal>,
    ) -> Result<Option<Decimal>> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        if basis == GrossBasis::Untaxed {
            return Ok(Some(raw));
        }
        let (Some(allowance), Some(council_tax)) = (allowance, council_tax) else {
            return Ok(None);
        };
        let out_of_range = || PipelineError::invalid("deductions", format!("{basis:?}"), "gross figure", raw);

        let gross = self.gross_annual(basis, raw).ok_or_else(out_of_range)?;
        let income_tax = self.income_tax(gross, allowance).ok_or_else(out_of_range)?;
        let net = gross
            .checked_sub(income_tax)
            .and_then(|n| n.checked_sub(self.national_insurance))
            .and_then(|n| n.checked_sub(council_tax))
            .ok_or_else(out_of_range)?;
        log::debug!(
            "gross={} income_tax={} ni={} net={}",
            gross,
            income_tax,
            self.national_insurance,
            net
        );
        Ok(Some(net))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hourly_wage_net_income() {
        let rules = DeductionRules::default();
        let net = rules.net_income(
            GrossBasis::Hourly,
            Some(dec!(10.42)),
            Some(dec!(12570)),
            Some(dec!(1800)),
        );
        assert_eq!(rules.gross_annual(GrossBasis::Hourly, dec!(10.42)), Some(dec!(20319)));
        assert_eq!(rules.income_tax(dec!(20319), dec!(12570)), Some(dec!(1549.8)));
        assert_eq!(net.unwrap(), Some(dec!(16369.2)));
    }

    #[test]
    fn annual_salary_used_directly() {
        let rules = DeductionRules::default();
        let net = rules.net_income(
            GrossBasis::Annual,
            Some(dec!(25000)),
            Some(dec!(12500)),
            Some(dec!(1500)),
        );
        // 25000 - 2500 - 600 - 1500
        assert_eq!(net.unwrap(), Some(dec!(20400)));
    }

    #[test]
    fn stipend_bypasses_deductions() {
        let rules = DeductionRules::default();
        let net = rules.net_income(GrossBasis::Untaxed, Some(dec!(18622)), None, None);
        assert_eq!(net.unwrap(), Some(dec!(18622)));
    }

    #[test]
    fn income_tax_floored_at_zero() {
        let rules = DeductionRules::default();
        assert_eq!(rules.income_tax(dec!(9000), dec!(12570)), Some(Decimal::ZERO));

        let net = rules.net_income(
            GrossBasis::Annual,
            Some(dec!(9000)),
            Some(dec!(12570)),
            Some(dec!(1000)),
        );
        assert_eq!(net.unwrap(), Some(dec!(7400)));
    }

    #[test]
    fn missing_inputs_propagate() {
        let rules = DeductionRules::default();
        let allowance = Some(dec!(12570));
        let council_tax = Some(dec!(1800));
        assert_eq!(
            rules.net_income(GrossBasis::Annual, None, allowance, council_tax).unwrap(),
            None
        );
        assert_eq!(
            rules.net_income(GrossBasis::Hourly, Some(dec!(9)), None, council_tax).unwrap(),
            None
        );
        assert_eq!(
            rules.net_income(GrossBasis::Hourly, Some(dec!(9)), allowance, None).unwrap(),
            None
        );
        assert_eq!(rules.net_income(GrossBasis::Untaxed, None, None, None).unwrap(), None);
    }

    #[test]
    fn net_income_non_decreasing_in_rate() {
        let rules = DeductionRules::default();
        let mut previous: Option<Decimal> = None;
        // 0.00 to 30.00 per hour in 25p steps, across the allowance boundary
        for pence in (0..=3000).step_by(25) {
            let rate = Decimal::new(pence, 2);
            let net = rules
                .net_income(
                    GrossBasis::Hourly,
                    Some(rate),
                    Some(dec!(12570)),
                    Some(dec!(1800)),
                )
                .unwrap()
                .unwrap();
            if let Some(prev) = previous {
                assert!(net >= prev, "net fell from {prev} to {net} at rate {rate}");
            }
            previous = Some(net);
        }
    }

    #[test]
    fn out_of_range_rate_is_an_error() {
        let rules = DeductionRules::default();
        assert_eq!(rules.gross_annual(GrossBasis::Hourly, dec!(1e26)), None);

        let err = rules
            .net_income(
                GrossBasis::Hourly,
                Some(dec!(1e26)),
                Some(dec!(12570)),
                Some(dec!(1800)),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidValue { table: "deductions", .. }
        ));
    }
}
