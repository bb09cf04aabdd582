//! Palettes command implementation.
//!
//! Lists the built-in palettes so their names can be passed to `--colours`.
//! Palette lines go to stdout; `--json` emits the same data machine-readable.

use clap::Args;

use crate::error::{FxError, Result};
use crate::output::{plural, Printer};
use crate::types::{NamedPalette, BUILTIN_PALETTES};

/// List the built-in colour palettes
#[derive(Args, Debug)]
pub struct PalettesArgs {
    /// Show a single palette by name
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PalettesArgs, printer: &Printer) -> Result<()> {
    let palettes: Vec<&NamedPalette> = match &args.name {
        Some(name) => {
            let palette = NamedPalette::find(name).ok_or_else(|| FxError::Config {
                message: format!("unknown palette: {}", name),
                help: Some("run `pixfx palettes` to list the available names".to_string()),
            })?;
            vec![palette]
        }
        None => BUILTIN_PALETTES.iter().collect(),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&palettes).map_err(|e| FxError::Build {
            message: format!("Failed to encode palettes: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    for palette in &palettes {
        println!(
            "{} ({})",
            palette.name,
            plural(palette.colours.len(), "colour", "colours")
        );
        println!("  {}", palette.colours.join(" "));
    }

    printer.info("Listed", &plural(palettes.len(), "palette", "palettes"));
    Ok(())
}
