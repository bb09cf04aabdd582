use clap::Parser;
use miette::Result;
use pixfx::cli::{Cli, Commands};
use pixfx::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Run(args) => pixfx::cli::run::run(args, &printer)?,
        Commands::Palettes(args) => pixfx::cli::palettes::run(args, &printer)?,
        Commands::Init(args) => pixfx::cli::init::run(args, &printer)?,
        Commands::Completions(args) => pixfx::cli::completions::run(args)?,
    }

    Ok(())
}
