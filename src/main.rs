mod cmd;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "phd-incomes",
    version,
    about = "Compare PhD stipends with UK wages over time and across Europe"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// UK incomes by year, after tax and adjusted for inflation
    Uk(cmd::uk::UkCommand),
    /// PhD incomes across Europe, with and without a cost-of-living correction
    Europe(cmd::europe::EuropeCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Uk(cmd) => cmd.exec(),
        Command::Europe(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
