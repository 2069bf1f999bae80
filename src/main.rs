use anyhow::Result;
use clap::Parser;
use expensa::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
