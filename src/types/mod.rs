//! Core domain types for pixfx.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - RGB colour values with strict hex parsing
//! - `NamedPalette` / `ColourSpec` - built-in palettes and colour-list
//!   resolution

mod colour;
mod palette;

pub use colour::Colour;
pub use palette::{shuffle_colours, ColourSpec, NamedPalette, BUILTIN_PALETTES};
