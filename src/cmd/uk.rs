//! UK command - net and real incomes per year and income type

use super::{load_config, print_warnings, read_snapshot, write_csv, OutputArgs, OutputFormat};
use clap::{Args, ValueEnum};
use phd_incomes::core::{IncomeType, RealIncome};
use phd_incomes::money::display_amount;
use phd_incomes::{IncomeService, UkSnapshots};
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct UkCommand {
    /// UK wage and tax table (CSV)
    #[arg(short, long)]
    wages: PathBuf,

    /// Graduate salary table (CSV)
    #[arg(short, long)]
    salaries: PathBuf,

    /// CPIH price index table (CSV)
    #[arg(short = 'p', long)]
    cpih: PathBuf,

    /// Year to express real incomes in (defaults to the config's base year)
    #[arg(short, long)]
    base_year: Option<i32>,

    /// Only show one income type
    #[arg(short = 't', long, value_enum)]
    income_type: Option<IncomeTypeArg>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IncomeTypeArg {
    Nlw,
    Rlw,
    Stipend,
    Graduate,
    NonGraduate,
    Postgraduate,
}

impl From<IncomeTypeArg> for IncomeType {
    fn from(arg: IncomeTypeArg) -> Self {
        match arg {
            IncomeTypeArg::Nlw => IncomeType::NationalLivingWage,
            IncomeTypeArg::Rlw => IncomeType::RealLivingWage,
            IncomeTypeArg::Stipend => IncomeType::Stipend,
            IncomeTypeArg::Graduate => IncomeType::Graduate,
            IncomeTypeArg::NonGraduate => IncomeType::NonGraduate,
            IncomeTypeArg::Postgraduate => IncomeType::PostGraduate,
        }
    }
}

/// Row for the UK incomes table output
#[derive(Debug, Clone, Tabled)]
struct IncomeRow {
    #[tabled(rename = "Year")]
    year: i32,

    #[tabled(rename = "Income")]
    income_type: IncomeType,

    #[tabled(rename = "Effective")]
    effective_date: String,

    #[tabled(rename = "Net")]
    net_income: String,

    #[tabled(rename = "Real")]
    real_income: String,
}

impl From<&RealIncome> for IncomeRow {
    fn from(income: &RealIncome) -> Self {
        IncomeRow {
            year: income.year,
            income_type: income.income_type,
            effective_date: income.effective_date.format("%Y-%m-%d").to_string(),
            net_income: display_amount(income.net_income, "GBP"),
            real_income: display_amount(income.real_income, "GBP"),
        }
    }
}

impl UkCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = load_config(self.config.as_ref())?;
        let snapshots = UkSnapshots {
            wages: read_snapshot(&self.wages)?,
            graduate_salaries: read_snapshot(&self.salaries)?,
            price_index: read_snapshot(&self.cpih)?,
        };

        let mut service = IncomeService::new(config)?;
        let report = service.uk_report(&snapshots, self.base_year)?;

        let filter = self.income_type.map(IncomeType::from);
        let rows: Vec<&RealIncome> = report
            .series
            .rows()
            .iter()
            .filter(|r| filter.map_or(true, |t| r.income_type == t))
            .collect();

        match self.output.format() {
            OutputFormat::Csv => write_csv(rows)?,
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*report)?),
            OutputFormat::Table => {
                println!();
                println!("UK INCOMES (real terms, {} prices)", report.base_year);
                println!();
                if rows.is_empty() {
                    println!("No incomes found");
                } else {
                    let table = Table::new(rows.into_iter().map(IncomeRow::from))
                        .with(Style::rounded())
                        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
                        .to_string();
                    println!("{}", table);
                }
            }
        }
        print_warnings(&report.warnings);
        Ok(())
    }
}
