//! Init command implementation.
//!
//! Generates a starter `pixfx.yaml` manifest.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{FxError, Result};
use crate::manifest::MANIFEST_FILE;
use crate::output::{display_path, Printer};

/// Starter manifest written by `pixfx init`.
const TEMPLATE: &str = "\
# pixfx project defaults. Command-line flags override these.
src: src
output: dst
filter: lanczos
# filetype: png
excludes: []
";

/// Initialize a pixfx project by generating a pixfx.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing pixfx.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILE);

    if manifest_path.exists() && !args.force {
        return Err(FxError::Build {
            message: format!("{} already exists", MANIFEST_FILE),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    fs::write(&manifest_path, TEMPLATE).map_err(|e| FxError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.success("Created", &display_path(&manifest_path));
    Ok(())
}
