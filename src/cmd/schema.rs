//! Schema command - print expected input formats

use clap::{Args, ValueEnum};
use phd_incomes::input::{
    Column, EuropeRecord, GraduateSalaryRecord, PppCsvRecord, PriceIndexRecord, WageRecord,
};
use phd_incomes::Config;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Which input to describe
    #[arg(value_enum, default_value = "config")]
    target: SchemaTarget,

    /// Print only the CSV header row
    #[arg(long)]
    header: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaTarget {
    /// JSON Schema for the config file
    Config,
    /// UK wage and tax table
    Wages,
    /// Graduate salary table
    Salaries,
    /// CPIH price index table
    Cpih,
    /// European PhD income table
    Europe,
    /// OECD purchasing power parity table
    Ppp,
}

impl SchemaTarget {
    fn table(&self) -> Option<(&'static [Column], Vec<&'static str>, bool)> {
        match self {
            SchemaTarget::Config => None,
            SchemaTarget::Wages => Some((WageRecord::table_schema(), WageRecord::header(), true)),
            SchemaTarget::Salaries => Some((
                GraduateSalaryRecord::table_schema(),
                GraduateSalaryRecord::header(),
                false,
            )),
            SchemaTarget::Cpih => Some((
                PriceIndexRecord::table_schema(),
                PriceIndexRecord::header(),
                true,
            )),
            SchemaTarget::Europe => Some((
                EuropeRecord::table_schema(),
                EuropeRecord::header(),
                true,
            )),
            SchemaTarget::Ppp => Some((PppCsvRecord::table_schema(), PppCsvRecord::header(), false)),
        }
    }
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.target.table() {
            None => {
                let schema = schema_for!(Config);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            Some((_, header, _)) if self.header => println!("{}", header.join(",")),
            Some((columns, _, descriptive_row)) => print_columns(columns, descriptive_row),
        }
        Ok(())
    }
}

fn print_columns(columns: &[Column], descriptive_row: bool) {
    println!("CSV Input Format");
    println!("================");
    println!();
    for column in columns {
        let req = if column.required { "required" } else { "optional" };
        println!("{:20} ({:8})  {}", column.header, req, column.description);
    }
    if descriptive_row {
        println!();
        println!("The first line is free text and is skipped; the header is on line 2.");
    }
}
