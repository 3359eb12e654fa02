//! Europe command - net PhD incomes across countries, absolute and cost-of-living corrected

use super::{load_config, print_warnings, read_snapshot, write_csv, OutputArgs, OutputFormat};
use clap::Args;
use phd_incomes::core::{AbsoluteIncome, EquivalentIncome, EuropeIncomeReport};
use phd_incomes::money::display_amount;
use phd_incomes::{EuropeSnapshots, IncomeService};
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct EuropeCommand {
    /// European PhD income table (CSV)
    #[arg(short, long)]
    incomes: PathBuf,

    /// OECD purchasing power parity table (CSV)
    #[arg(short, long)]
    ppp: PathBuf,

    /// Exchange rates (JSON, quoted per unit of the common currency)
    #[arg(short, long)]
    rates: PathBuf,

    /// Show incomes without the cost-of-living correction
    #[arg(short, long)]
    absolute: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Clone, Tabled)]
struct AbsoluteRow {
    #[tabled(rename = "Country")]
    country: String,

    #[tabled(rename = "Code")]
    code: String,

    #[tabled(rename = "Net")]
    net: String,
}

#[derive(Debug, Clone, Tabled)]
struct CorrectedRow {
    #[tabled(rename = "Country")]
    country: String,

    #[tabled(rename = "Code")]
    code: String,

    #[tabled(rename = "Net")]
    net: String,

    #[tabled(rename = "PPP factor")]
    factor: String,

    #[tabled(rename = "Equivalent")]
    equivalent: String,

    #[tabled(rename = "Equivalent (display)")]
    equivalent_display: String,
}

impl AbsoluteRow {
    fn new(income: &AbsoluteIncome, report: &EuropeIncomeReport) -> Self {
        AbsoluteRow {
            country: income.country.clone(),
            code: income.country_code.clone().unwrap_or_default(),
            net: display_amount(income.net_common, &report.common_currency),
        }
    }
}

impl CorrectedRow {
    fn new(income: &EquivalentIncome, report: &EuropeIncomeReport) -> Self {
        CorrectedRow {
            country: income.country.clone(),
            code: income.country_code.clone(),
            net: display_amount(income.net_common, &report.common_currency),
            factor: format!("{:.3}", income.ppp_correction_factor),
            equivalent: display_amount(income.equivalent_common, &report.common_currency),
            equivalent_display: display_amount(
                income.equivalent_display,
                &report.display_currency,
            ),
        }
    }
}

impl EuropeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = load_config(self.config.as_ref())?;
        let snapshots = EuropeSnapshots {
            incomes: read_snapshot(&self.incomes)?,
            ppp: read_snapshot(&self.ppp)?,
            rates: read_snapshot(&self.rates)?,
        };

        let mut service = IncomeService::new(config)?;
        let report = service.europe_report(&snapshots)?;

        match self.output.format() {
            OutputFormat::Csv if self.absolute => write_csv(&report.absolute)?,
            OutputFormat::Csv => write_csv(&report.corrected)?,
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*report)?),
            OutputFormat::Table => self.print_table(&report),
        }
        print_warnings(&report.warnings);
        Ok(())
    }

    fn print_table(&self, report: &EuropeIncomeReport) {
        println!();
        if self.absolute {
            println!("PHD INCOMES ({})", report.common_currency);
        } else {
            println!(
                "PHD INCOMES (cost of living in {}, {})",
                report.reference_country, report.common_currency
            );
        }
        println!();

        let table = if self.absolute {
            if report.absolute.is_empty() {
                None
            } else {
                let rows = report.absolute.iter().map(|i| AbsoluteRow::new(i, report));
                Some(Table::new(rows))
            }
        } else if report.corrected.is_empty() {
            None
        } else {
            let rows = report.corrected.iter().map(|i| CorrectedRow::new(i, report));
            Some(Table::new(rows))
        };

        match table {
            Some(mut table) => {
                let table = table
                    .with(Style::rounded())
                    .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
                    .to_string();
                println!("{}", table);
            }
            None => println!("No incomes found"),
        }
    }
}
