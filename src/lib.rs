//! pixfx - Batch image effect processor
//!
//! A library for applying colour, halftone, and geometry effects to raster
//! images. Effects are composed into an ordered [`effects::Pipeline`] and
//! applied over a directory of images by the [`batch`] runner; output file
//! names record the stages that ran.

pub mod batch;
pub mod cli;
pub mod effects;
pub mod error;
pub mod manifest;
pub mod output;
pub mod types;

pub use batch::{image_files, output_name, process_all, process_file, BatchSummary};
pub use effects::{Effect, Pipeline, ResampleFilter, StageContext};
pub use error::{FxError, Result};
pub use manifest::Manifest;
pub use types::{shuffle_colours, Colour, ColourSpec, NamedPalette, BUILTIN_PALETTES};
