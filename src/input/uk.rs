use super::{amount, optional_amount, read_records, Preamble};
use crate::core::error::{PipelineError, Result};
use crate::core::{GraduateSalaries, GraduateSalary, PriceIndex, WageYear};
use phd_incomes_derive::TableSchema;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;

/// Row of the UK wage and tax table (one descriptive line above the header).
#[derive(Debug, Clone, Deserialize, TableSchema)]
pub struct WageRecord {
    /// Calendar year the figures apply to
    #[serde(alias = "Year")]
    pub year: i32,
    /// National Living / Minimum Wage (£/hour)
    #[serde(default, deserialize_with = "optional_amount")]
    pub nmw_rate: Option<Decimal>,
    /// Real Living Wage (£/hour)
    #[serde(default, deserialize_with = "optional_amount")]
    pub rlw_rate: Option<Decimal>,
    /// UKRI minimum annual PhD stipend (£/year, untaxed)
    #[serde(default, deserialize_with = "optional_amount")]
    pub stipend: Option<Decimal>,
    /// Income tax personal allowance (£/year)
    #[serde(default, deserialize_with = "optional_amount")]
    pub allowance: Option<Decimal>,
    /// Typical annual council tax (£/year)
    #[serde(rename = "counctax", default, deserialize_with = "optional_amount")]
    pub council_tax: Option<Decimal>,
}

impl From<WageRecord> for WageYear {
    fn from(record: WageRecord) -> Self {
        WageYear {
            year: record.year,
            nmw_rate: record.nmw_rate,
            rlw_rate: record.rlw_rate,
            stipend: record.stipend,
            allowance: record.allowance,
            council_tax: record.council_tax,
        }
    }
}

/// Row of the graduate labour market statistics salary table.
#[derive(Debug, Clone, Deserialize, TableSchema)]
pub struct GraduateSalaryRecord {
    /// Male, Female or the combined row
    pub gender: String,
    /// Age band, only 21-30 is used
    pub age_group: String,
    /// Calendar year
    pub time_period: i32,
    /// Graduate, Non-Graduate or Postgraduate
    pub graduate_type: String,
    /// Median annual salary (£), suppressed cells are missing
    #[serde(default, deserialize_with = "optional_amount")]
    pub median: Option<Decimal>,
}

impl From<GraduateSalaryRecord> for GraduateSalary {
    fn from(record: GraduateSalaryRecord) -> Self {
        GraduateSalary {
            gender: record.gender,
            age_group: record.age_group,
            year: record.time_period,
            graduate_type: record.graduate_type,
            median: record.median,
        }
    }
}

/// Row of the CPIH table (one descriptive line above the header).
#[derive(Debug, Clone, Deserialize, TableSchema)]
pub struct PriceIndexRecord {
    /// Calendar year
    #[serde(alias = "Year")]
    pub year: i32,
    /// Annual average CPIH index value
    #[serde(deserialize_with = "amount")]
    pub cpih: Decimal,
}

/// Read the wage and tax table, one row per year.
pub fn read_wages<R: Read>(reader: R) -> Result<Vec<WageYear>> {
    let records: Vec<WageRecord> = read_records(reader, Preamble::DescriptiveRow)?;
    let mut years = BTreeSet::new();
    for record in &records {
        if !years.insert(record.year) {
            return Err(PipelineError::DuplicateYear {
                table: "wage table",
                year: record.year,
            });
        }
    }
    Ok(records.into_iter().map(Into::into).collect())
}

/// Read and pivot the graduate salary table.
pub fn read_graduate_salaries<R: Read>(reader: R) -> Result<GraduateSalaries> {
    let records: Vec<GraduateSalaryRecord> = read_records(reader, Preamble::None)?;
    GraduateSalaries::pivot(records.into_iter().map(Into::into))
}

/// Read the price index table.
pub fn read_price_index<R: Read>(reader: R) -> Result<PriceIndex> {
    let records: Vec<PriceIndexRecord> = read_records(reader, Preamble::DescriptiveRow)?;
    PriceIndex::new(records.into_iter().map(|r| (r.year, r.cpih)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const WAGES: &str = "\
UK wage and tax figures by year
year,nmw_rate,rlw_rate,stipend,allowance,counctax
2022,9.50,9.90,16062,12570,1750
2023,10.42,10.90,18622,12570,1800
2024,11.44,,19237,12570,
";

    #[test]
    fn reads_wage_table_after_preamble() {
        let wages = read_wages(WAGES.as_bytes()).unwrap();
        assert_eq!(wages.len(), 3);
        assert_eq!(wages[1].year, 2023);
        assert_eq!(wages[1].nmw_rate, Some(dec!(10.42)));
        assert_eq!(wages[1].council_tax, Some(dec!(1800)));
        assert_eq!(wages[2].rlw_rate, None);
        assert_eq!(wages[2].council_tax, None);
    }

    #[test]
    fn duplicate_wage_year_rejected() {
        let csv = "preamble\nyear,nmw_rate\n2022,9.5\n2022,9.6\n";
        assert!(matches!(
            read_wages(csv.as_bytes()),
            Err(PipelineError::DuplicateYear { year: 2022, .. })
        ));
    }

    #[test]
    fn reads_and_pivots_graduate_table() {
        let csv = "\
time_period,gender,age_group,graduate_type,median
2022,Total,21-30,Graduate,\"30,000\"
2022,Total,21-30,Non-Graduate,25000
2022,Total,21-30,Postgraduate,c
2022,Male,21-30,Graduate,31000
2022,Total,31-40,Graduate,38000
";
        let salaries = read_graduate_salaries(csv.as_bytes()).unwrap();
        let bands = salaries.get(2022).unwrap();
        assert_eq!(bands.graduate, Some(dec!(30000)));
        assert_eq!(bands.non_graduate, Some(dec!(25000)));
        assert_eq!(bands.postgraduate, None);
    }

    #[test]
    fn reads_price_index() {
        let csv = "CPIH annual average\nyear,cpih\n2020,108.9\n2024,133.9\n";
        let index = read_price_index(csv.as_bytes()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(2024), Some(dec!(133.9)));
    }

    #[test]
    fn missing_index_value_is_an_error() {
        let csv = "CPIH annual average\nyear,cpih\n2020,\n";
        assert!(matches!(read_price_index(csv.as_bytes()), Err(PipelineError::Csv(_))));
    }

    #[test]
    fn wage_schema_lists_columns() {
        assert_eq!(
            WageRecord::header(),
            vec!["year", "nmw_rate", "rlw_rate", "stipend", "allowance", "counctax"]
        );
        let schema = WageRecord::table_schema();
        assert!(schema[0].required);
        assert!(!schema[5].required);
        assert_eq!(schema[5].description, "Typical annual council tax (£/year)");
    }
}
