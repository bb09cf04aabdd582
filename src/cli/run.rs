//! Run command implementation.
//!
//! Builds an effect pipeline from the flags, scans the source directory, and
//! processes every image into the destination directory. Flags override
//! pixfx.yaml, which overrides the built-in `src`/`dst` defaults.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::batch;
use crate::effects::{Effect, Pipeline, ResampleFilter};
use crate::error::{FxError, Result};
use crate::manifest::Manifest;
use crate::output::{display_path, plural, Printer};
use crate::types::{Colour, ColourSpec};

/// Process a directory of images through an effect pipeline
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source directory to read images from (default: src)
    #[arg(short, long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Destination directory for processed images (default: dst)
    #[arg(short, long, value_name = "DIR")]
    pub dst: Option<PathBuf>,

    /// Reduce the image to this many colours
    #[arg(short = 'c', long, value_name = "N")]
    pub reduce_colours: Option<usize>,

    /// Palette name or comma-separated hex colours to quantize with
    #[arg(long, value_name = "SPEC")]
    pub colours: Option<String>,

    /// Shuffle palette colours before they are applied
    #[arg(long)]
    pub shuffle_colours: bool,

    /// Convert to grayscale
    #[arg(short, long)]
    pub grayscale: bool,

    /// Invert colours
    #[arg(short, long)]
    pub invert: bool,

    /// Scale the alpha channel by this factor
    #[arg(short, long, value_name = "FACTOR", default_value_t = 1.0)]
    pub opacity: f32,

    /// Rotate counter-clockwise by this many degrees
    #[arg(short, long, value_name = "DEGREES", default_value_t = 0, allow_negative_numbers = true)]
    pub rotate: i32,

    /// Target width in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 0)]
    pub width: u32,

    /// Target height in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 0)]
    pub height: u32,

    /// Scale to this percentage of the current size
    #[arg(long, value_name = "PERCENT", default_value_t = 0)]
    pub scale: u32,

    /// Resample filter for resizing stages (default: lanczos)
    #[arg(long, value_enum)]
    pub filter: Option<ResampleFilter>,

    /// Force outputs to this file type (png or jpg)
    #[arg(long, value_name = "TYPE")]
    pub filetype: Option<String>,

    /// Pixelize to this many blocks across
    #[arg(
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "128",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub pixelize: Option<u32>,

    /// Halftone with a dot colour spec: first colour draws the dots, the
    /// last is the background (`none` for transparent, `image` to keep a
    /// quantized copy of the source)
    #[arg(
        long,
        value_name = "SPEC",
        num_args = 0..=1,
        default_missing_value = "#000000,#FFFFFF",
        conflicts_with_all = [
            "reduce_colours",
            "colours",
            "posterize",
            "pixelize",
            "grayscale",
            "brightness",
            "saturation",
        ]
    )]
    pub halftone: Option<String>,

    /// Halftone sample block size in pixels
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub htsample: u32,

    /// Bi-level Floyd-Steinberg dither
    #[arg(long)]
    pub dither: bool,

    /// Posterize to this many bits per channel
    #[arg(
        long,
        value_name = "BITS",
        num_args = 0..=1,
        default_missing_value = "1",
        value_parser = clap::value_parser!(u8).range(1..=8)
    )]
    pub posterize: Option<u8>,

    /// Gaussian blur before the other effects
    #[arg(long, value_name = "FACTOR", default_value_t = 0.0)]
    pub blur_before: f32,

    /// Gaussian blur after the other effects
    #[arg(long, value_name = "FACTOR", default_value_t = 0.0)]
    pub blur_after: f32,

    /// Scale colour channels by this factor
    #[arg(long, value_name = "FACTOR", default_value_t = 1.0)]
    pub brightness: f32,

    /// Scale colour saturation by this factor
    #[arg(long, value_name = "FACTOR", default_value_t = 1.0)]
    pub saturation: f32,

    /// Comma-separated hex colours to knock out to transparency
    #[arg(long, value_name = "COLOURS")]
    pub transparent: Option<String>,
}

pub fn run(args: RunArgs, printer: &Printer) -> Result<()> {
    let manifest = Manifest::load_from_dir(Path::new("."))?.unwrap_or_default();

    let src = args
        .src
        .clone()
        .or_else(|| manifest.src.clone())
        .unwrap_or_else(|| PathBuf::from("src"));
    let dst = args
        .dst
        .clone()
        .or_else(|| manifest.output.clone())
        .unwrap_or_else(|| PathBuf::from("dst"));
    let filter = args.filter.or(manifest.filter).unwrap_or_default();
    let filetype = args.filetype.clone().or_else(|| manifest.filetype.clone());

    if let Some(ref forced) = filetype {
        validate_filetype(forced)?;
    }

    if !src.is_dir() {
        return Err(FxError::Config {
            message: format!("source directory not found: {}", src.display()),
            help: Some("pass --src or set src in pixfx.yaml".to_string()),
        });
    }

    let pipeline = build_pipeline(&args, filter, printer)?;

    let files = batch::image_files(&src, &manifest);
    if files.is_empty() {
        printer.warning(
            "Warning",
            &format!("no images found in {}", display_path(&src)),
        );
        return Ok(());
    }

    if !dst.exists() {
        fs::create_dir_all(&dst).map_err(|e| FxError::Io {
            path: dst.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    printer.status("Scanning", &display_path(&src));
    printer.info("Found", &plural(files.len(), "image", "images"));

    let summary = batch::process_all(&files, &pipeline, &dst, filetype.as_deref(), printer);

    printer.success(
        "Finished",
        &format!(
            "{} written to {}",
            plural(summary.processed, "image", "images"),
            display_path(&dst)
        ),
    );

    if summary.failed > 0 {
        return Err(FxError::Build {
            message: format!("{} failed to process", plural(summary.failed, "image", "images")),
            help: Some("see the log above for per-file errors".to_string()),
        });
    }

    Ok(())
}

fn validate_filetype(filetype: &str) -> Result<()> {
    if ["png", "jpg", "jpeg"]
        .iter()
        .any(|known| filetype.eq_ignore_ascii_case(known))
    {
        Ok(())
    } else {
        Err(FxError::Config {
            message: format!("unsupported file type: {}", filetype),
            help: Some("use png, jpg, or jpeg".to_string()),
        })
    }
}

/// Assemble the pipeline in effect order.
///
/// The order is fixed: resize, pre-blur, halftone, dither, quantize,
/// posterize, pixelize, grayscale, brightness, saturation, transparency,
/// rotation, invert, post-blur, opacity. Flags left at their defaults add
/// no stage.
fn build_pipeline(args: &RunArgs, filter: ResampleFilter, printer: &Printer) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new(filter);

    if args.width > 0 || args.height > 0 || args.scale > 0 {
        pipeline.push(Effect::Resize {
            width: args.width,
            height: args.height,
            scale: args.scale,
        });
    }

    if args.blur_before > 0.0 {
        pipeline.push(Effect::Blur {
            factor: args.blur_before,
        });
    }

    if let Some(ref spec) = args.halftone {
        pipeline.push(Effect::Halftone {
            spec: ColourSpec::new(spec.clone()),
            sample: args.htsample,
            shuffle: args.shuffle_colours,
        });
    }

    if args.dither {
        pipeline.push(Effect::Dither);
    }

    if args.reduce_colours.is_some() || args.colours.is_some() {
        let spec = args.colours.as_ref().map(|s| ColourSpec::new(s.clone()));
        let resolved = match spec {
            Some(ref spec) => {
                let (colours, rejected) = spec.resolve_lossy();
                for token in &rejected {
                    printer.warning("Ignoring", &format!("invalid colour token '{}'", token));
                }
                Some(colours)
            }
            None => None,
        };

        let target = match args.reduce_colours {
            Some(n) => n,
            None => resolved.as_ref().map(Vec::len).unwrap_or(0),
        };
        if target == 0 || target > 256 {
            return Err(FxError::Config {
                message: format!("colour count must be between 1 and 256, got {}", target),
                help: Some("pass --reduce-colours or a --colours list with valid entries".to_string()),
            });
        }

        pipeline.push(Effect::Quantize {
            target,
            spec,
            shuffle: args.shuffle_colours,
        });
    }

    if let Some(bits) = args.posterize {
        pipeline.push(Effect::Posterize { bits });
    }

    if let Some(size) = args.pixelize {
        pipeline.push(Effect::Pixelize { size });
    }

    if args.grayscale {
        pipeline.push(Effect::Grayscale);
    }

    if args.brightness != 1.0 {
        pipeline.push(Effect::Brightness {
            factor: args.brightness,
        });
    }

    if args.saturation != 1.0 {
        pipeline.push(Effect::Saturation {
            factor: args.saturation,
        });
    }

    if let Some(ref tokens) = args.transparent {
        let colours = tokens
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Colour::from_hex)
            .collect::<Result<Vec<_>>>()?;
        pipeline.push(Effect::Transparency { colours });
    }

    if args.rotate != 0 {
        pipeline.push(Effect::Rotate {
            degrees: args.rotate,
        });
    }

    if args.invert {
        pipeline.push(Effect::Invert);
    }

    if args.blur_after > 0.0 {
        pipeline.push(Effect::Blur {
            factor: args.blur_after,
        });
    }

    if (0.0..1.0).contains(&args.opacity) {
        pipeline.push(Effect::Opacity {
            factor: args.opacity,
        });
    }

    Ok(pipeline)
}
