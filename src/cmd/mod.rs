pub mod europe;
pub mod schema;
pub mod uk;

use anyhow::Context;
use clap::Args;
use phd_incomes::Config;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputArgs {
    pub fn format(&self) -> OutputFormat {
        if self.csv {
            OutputFormat::Csv
        } else if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// Config file if given, defaults otherwise.
pub fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config {}", path.display()))?;
            Config::from_reader(file)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

pub fn read_snapshot(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_csv<I, T>(rows: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: serde::Serialize,
{
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_warnings<W: std::fmt::Display>(warnings: &[W]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("\u{26A0} {} row(s) dropped:", warnings.len());
    for warning in warnings {
        eprintln!("  {}", warning);
    }
}
