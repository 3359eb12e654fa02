use super::{amount, optional_amount, read_records, Preamble};
use crate::core::error::Result;
use crate::core::{CountryIncome, ExchangeRates, PppRecord, PppTable, RatesDocument};
use phd_incomes_derive::TableSchema;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// Row of the European PhD income table (one descriptive line above the header).
#[derive(Debug, Clone, Deserialize, TableSchema)]
pub struct EuropeRecord {
    /// Country name, matching the PPP table's Country column
    #[serde(alias = "Country")]
    pub country: String,
    /// Annual PhD stipend or salary in local currency
    #[serde(default, deserialize_with = "optional_amount")]
    pub stip: Option<Decimal>,
    /// Annual income tax and social contributions in local currency
    #[serde(default, deserialize_with = "optional_amount")]
    pub tax: Option<Decimal>,
    /// Annual tuition or registration fees in local currency
    #[serde(default, deserialize_with = "optional_amount")]
    pub fee: Option<Decimal>,
    /// ISO 4217 code of the local currency
    pub curr: String,
}

impl From<EuropeRecord> for CountryIncome {
    fn from(record: EuropeRecord) -> Self {
        CountryIncome {
            country: record.country,
            stipend: record.stip,
            tax: record.tax,
            fee: record.fee,
            currency: record.curr,
        }
    }
}

/// Row of an OECD SNA_TABLE4 PPP export. Other columns are ignored.
#[derive(Debug, Clone, Deserialize, TableSchema)]
pub struct PppCsvRecord {
    /// ISO 3166 alpha-3 country code
    #[serde(rename = "LOCATION")]
    pub location: String,
    /// Country name
    #[serde(rename = "Country")]
    pub country: String,
    /// Currency the PPP is quoted in (local currency per USD)
    #[serde(rename = "Unit Code")]
    pub unit_code: String,
    /// PPP for GDP
    #[serde(rename = "Value", deserialize_with = "amount")]
    pub value: Decimal,
    /// Reference year, the latest year wins when a country repeats
    #[serde(rename = "TIME", default)]
    pub time: Option<i32>,
}

impl From<PppCsvRecord> for PppRecord {
    fn from(record: PppCsvRecord) -> Self {
        PppRecord {
            country: record.country,
            location: record.location,
            value: record.value,
            unit_currency: record.unit_code,
            year: record.time,
        }
    }
}

/// Read the European income table.
pub fn read_europe_incomes<R: Read>(reader: R) -> Result<Vec<CountryIncome>> {
    let records: Vec<EuropeRecord> = read_records(reader, Preamble::DescriptiveRow)?;
    Ok(records.into_iter().map(Into::into).collect())
}

/// Read the PPP table.
pub fn read_ppp<R: Read>(reader: R) -> Result<PppTable> {
    let records: Vec<PppCsvRecord> = read_records(reader, Preamble::None)?;
    PppTable::new(records.into_iter().map(Into::into))
}

/// Read an exchange rate snapshot (JSON).
pub fn read_rates<R: Read>(reader: R) -> Result<ExchangeRates> {
    let doc: RatesDocument = serde_json::from_reader(reader)?;
    ExchangeRates::try_from(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_europe_table() {
        let csv = "\
PhD incomes in local currency
country,stip,tax,fee,curr
Denmark,350000,120000,0,DKK
Italy,16243,,156,EUR
";
        let incomes = read_europe_incomes(csv.as_bytes()).unwrap();
        assert_eq!(incomes.len(), 2);
        assert_eq!(incomes[0].net_local(), Some(dec!(230000)));
        assert_eq!(incomes[0].currency, "DKK");
        assert_eq!(incomes[1].tax, None);
    }

    #[test]
    fn reads_oecd_export() {
        let csv = "\
\"LOCATION\",\"Country\",\"TRANSACT\",\"Transaction\",\"TIME\",\"Year\",\"Unit Code\",\"Unit\",\"Value\"
\"GBR\",\"United Kingdom\",\"PPPGDP\",\"PPPs for GDP\",\"2021\",\"2021\",\"GBP\",\"Pound sterling\",\"0.676\"
\"GBR\",\"United Kingdom\",\"PPPGDP\",\"PPPs for GDP\",\"2022\",\"2022\",\"GBP\",\"Pound sterling\",\"0.683\"
\"DNK\",\"Denmark\",\"PPPGDP\",\"PPPs for GDP\",\"2022\",\"2022\",\"DKK\",\"Danish krone\",\"6.442\"
";
        let table = read_ppp(csv.as_bytes()).unwrap();
        let uk = table.get("United Kingdom").unwrap();
        assert_eq!(uk.value, dec!(0.683));
        assert_eq!(uk.unit_currency, "GBP");
        assert_eq!(table.location("Denmark"), Some("DNK"));
    }

    #[test]
    fn reads_rates_json() {
        let json = r#"{"provider": "exchangerate-api", "base": "EUR", "rates": {"EUR": 1, "GBP": 0.857, "DKK": 7.46}}"#;
        let rates = read_rates(json.as_bytes()).unwrap();
        assert_eq!(rates.rate("DKK").unwrap(), dec!(7.46));
    }

    #[test]
    fn ppp_schema_uses_csv_headers() {
        assert_eq!(
            PppCsvRecord::header(),
            vec!["LOCATION", "Country", "Unit Code", "Value", "TIME"]
        );
        assert!(!PppCsvRecord::table_schema()[4].required);
    }
}
