use beadalize::cli::{Cli, Commands};
use beadalize::output::Printer;
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => beadalize::cli::build::run(args, &printer)?,
        Commands::Palette(args) => beadalize::cli::palette::run(args, &printer)?,
        Commands::Completions(args) => beadalize::cli::completions::run(args)?,
    }

    Ok(())
}
