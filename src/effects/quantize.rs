//! Adaptive colour quantization with optional forced palettes.
//!
//! Reduction always runs through the NeuQuant adaptive quantizer. When a
//! palette is forced, the adaptive pass is still what assigns each pixel its
//! slot index; only the colour table behind those indices is replaced. That
//! keeps the spatial assignment of an adaptive reduction while painting it
//! with the caller's colours.

use color_quant::NeuQuant;
use image::{DynamicImage, Rgb, RgbImage};

use crate::error::{FxError, Result};
use crate::types::Colour;

/// NeuQuant sample factor: 1 is slowest and highest quality, 30 the fastest.
const SAMPLE_FACTOR: i32 = 10;

/// Reduce an image to `target` colours.
///
/// Without a forced palette the adaptive quantizer picks the colours. With
/// one, the palette is stretched or truncated to exactly `target` entries
/// and substituted for the adaptive table, slot for slot. The image is
/// flattened to RGB first; alpha does not survive quantization.
pub fn quantize(
    image: &DynamicImage,
    target: usize,
    forced: Option<&[Colour]>,
) -> Result<DynamicImage> {
    if target == 0 || target > 256 {
        return Err(FxError::Config {
            message: format!("colour count must be between 1 and 256, got {target}"),
            help: Some("pass a colour count in the 1-256 range".to_string()),
        });
    }

    let rgb = image.to_rgb8();
    let table = match forced {
        Some(colours) if !colours.is_empty() => Some(stretch_palette(colours, target)),
        _ => None,
    };
    Ok(DynamicImage::ImageRgb8(remap(&rgb, target, table.as_deref())))
}

/// Fit a palette to exactly `target` entries.
///
/// A palette at least `target` long is truncated. A shorter one is stretched
/// by grouped repetition: each colour repeated `target / len` times in order,
/// then the first `target % len` colours appended. `colours` must be
/// non-empty.
pub fn stretch_palette(colours: &[Colour], target: usize) -> Vec<Colour> {
    if colours.len() >= target {
        return colours[..target].to_vec();
    }

    let group_size = target / colours.len();
    let mut stretched = Vec::with_capacity(target);
    for &colour in colours {
        for _ in 0..group_size {
            stretched.push(colour);
        }
    }
    let remainder = target - stretched.len();
    stretched.extend_from_slice(&colours[..remainder]);
    stretched
}

/// Run the adaptive quantizer and map pixels through its index assignment,
/// reading colours from `table` when given and from the adaptive palette
/// otherwise.
fn remap(rgb: &RgbImage, target: usize, table: Option<&[Colour]>) -> RgbImage {
    let mut samples = Vec::with_capacity(rgb.pixels().len() * 4);
    for pixel in rgb.pixels() {
        samples.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
    }

    let quantizer = NeuQuant::new(SAMPLE_FACTOR, target, &samples);
    let adaptive = quantizer.color_map_rgb();

    let mut out = RgbImage::new(rgb.width(), rgb.height());
    for (src, dst) in rgb.pixels().zip(out.pixels_mut()) {
        let index = quantizer.index_of(&[src[0], src[1], src[2], 255]);
        *dst = match table {
            Some(t) => Rgb::from(t[index]),
            None => Rgb([
                adaptive[index * 3],
                adaptive[index * 3 + 1],
                adaptive[index * 3 + 2],
            ]),
        };
    }
    out
}
