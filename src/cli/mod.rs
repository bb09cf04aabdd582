pub mod completions;
pub mod init;
pub mod palettes;
pub mod run;

use clap::{Parser, Subcommand};

/// pixfx - Batch image effect processor
#[derive(Parser, Debug)]
#[command(name = "pixfx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a directory of images through an effect pipeline
    Run(run::RunArgs),

    /// List the built-in colour palettes
    Palettes(palettes::PalettesArgs),

    /// Initialize a pixfx project (generates pixfx.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_configuration_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_halftone_flag_without_value_uses_default_spec() {
        let cli = Cli::try_parse_from(["pixfx", "run", "--halftone"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.halftone.as_deref(), Some("#000000,#FFFFFF"));
        assert_eq!(args.htsample, 10);
    }

    #[test]
    fn test_halftone_conflicts_with_quantize_flags() {
        let result = Cli::try_parse_from(["pixfx", "run", "--halftone", "--reduce-colours", "4"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_halftone_allows_dither() {
        assert!(Cli::try_parse_from(["pixfx", "run", "--halftone", "--dither"]).is_ok());
    }

    #[test]
    fn test_posterize_rejects_out_of_range_bits() {
        assert!(Cli::try_parse_from(["pixfx", "run", "--posterize", "12"]).is_err());
        assert!(Cli::try_parse_from(["pixfx", "run", "--posterize", "0"]).is_err());
    }

    #[test]
    fn test_posterize_flag_without_value_defaults_to_one_bit() {
        let cli = Cli::try_parse_from(["pixfx", "run", "--posterize"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.posterize, Some(1));
    }

    #[test]
    fn test_pixelize_flag_without_value_defaults() {
        let cli = Cli::try_parse_from(["pixfx", "run", "--pixelize"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.pixelize, Some(128));
    }

    #[test]
    fn test_htsample_rejects_zero() {
        assert!(Cli::try_parse_from(["pixfx", "run", "--htsample", "0"]).is_err());
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["pixfx", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert!(args.src.is_none());
        assert_eq!(args.opacity, 1.0);
        assert_eq!(args.brightness, 1.0);
        assert_eq!(args.rotate, 0);
        assert!(!args.shuffle_colours);
    }
}
