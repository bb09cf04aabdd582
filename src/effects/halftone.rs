//! Halftone dot-grid synthesis.
//!
//! Renders an image as a grid of filled dots whose radii track local
//! darkness: the luminance is dithered to bi-level, sampled in blocks, and
//! each block draws one dot on an oversampled canvas that is downsampled
//! back at the end. Dark blocks get large dots, light blocks small or no
//! visible ones.

use image::imageops::{self, BiLevel, FilterType};
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::effects::quantize::quantize;
use crate::error::{FxError, Result};
use crate::types::{Colour, ColourSpec};

/// Colour count for the quantized image backdrop.
const BACKDROP_COLOURS: usize = 16;

/// What sits behind the dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    /// Fully transparent canvas.
    Transparent,
    /// The source image, resized to the canvas and reduced to 16 colours.
    Image,
    /// A solid colour.
    Solid(Colour),
}

/// Resolved halftone colouring and sampling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalftoneOptions {
    pub foreground: Option<Colour>,
    pub backdrop: Backdrop,
    pub sample: u32,
}

impl HalftoneOptions {
    /// Build options from a colour spec.
    ///
    /// The first token is the dot colour. With two or more tokens the last
    /// is the background: `none` (any case) leaves the canvas transparent,
    /// `image` keeps a quantized copy of the source behind the dots, and
    /// anything else must parse as a hex colour. A single token means dots
    /// on a transparent canvas. Shuffling happens before the positional
    /// pick, so it reorders which colours land as foreground and background.
    pub fn from_spec<R: Rng>(
        spec: &ColourSpec,
        sample: u32,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<Self> {
        if sample == 0 {
            return Err(FxError::Config {
                message: "halftone sample size must be at least 1".to_string(),
                help: None,
            });
        }

        let mut tokens = spec.tokens();
        if shuffle {
            tokens.shuffle(rng);
        }

        let foreground = match tokens.first() {
            Some(token) => Some(Colour::from_hex(token)?),
            None => None,
        };

        let backdrop = if tokens.len() > 1 {
            let last = &tokens[tokens.len() - 1];
            if last.eq_ignore_ascii_case("none") {
                Backdrop::Transparent
            } else if last.eq_ignore_ascii_case("image") {
                Backdrop::Image
            } else {
                Backdrop::Solid(Colour::from_hex(last)?)
            }
        } else {
            Backdrop::Transparent
        };

        Ok(Self {
            foreground,
            backdrop,
            sample,
        })
    }
}

/// A sampled block: grid origin and floored average brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub x: u32,
    pub y: u32,
    pub average: u8,
}

/// How far the working image has been scaled up from its load-time size.
///
/// The ratio is rounded (ties away from zero) and clamped to at least 1, so
/// images at or below their original size render without oversampling.
pub fn oversample_factor(current: (u32, u32), original: (u32, u32)) -> u32 {
    if original.0 == 0 || original.1 == 0 {
        return 1;
    }
    let ratio = f64::max(
        current.0 as f64 / original.0 as f64,
        current.1 as f64 / original.1 as f64,
    );
    (ratio.round() as u32).max(1)
}

/// Dot radius in canvas pixels for a block's average brightness.
///
/// Radius runs linearly from 0 at full white to 90% of the half-block at
/// full black, scaled by the oversample factor.
pub fn dot_radius(average: f64, sample: u32, oversample: u32) -> f64 {
    (1.0 - average / 255.0) * (sample as f64 / 2.0) * oversample as f64 * 0.9
}

/// Average the image in `sample`-sized blocks, row by row.
///
/// Blocks are clipped to the image bounds and averaged with integer floor
/// division; a block with no pixels is skipped. The nominal block origin is
/// kept even for clipped edge blocks, so their dot centres stay on the
/// `sample` grid. A zero `sample` yields no blocks.
pub fn sample_blocks(gray: &GrayImage, sample: u32) -> Vec<Block> {
    if sample == 0 {
        return Vec::new();
    }

    let (width, height) = gray.dimensions();
    let mut blocks = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let mut total: u64 = 0;
            let mut count: u64 = 0;
            for by in y..(y + sample).min(height) {
                for bx in x..(x + sample).min(width) {
                    total += u64::from(gray.get_pixel(bx, by)[0]);
                    count += 1;
                }
            }
            if count > 0 {
                blocks.push(Block {
                    x,
                    y,
                    average: (total / count) as u8,
                });
            }
            x += sample;
        }
        y += sample;
    }
    blocks
}

/// Render the halftone of an image.
///
/// The canvas is `oversample` times the image size; dots are drawn there and
/// the result is downsampled back to the image size in two resize steps.
/// Dots fill with the foreground colour when set, else with the solid
/// background colour; with no foreground on a transparent or image backdrop
/// no dots are drawn at all.
pub fn render(
    image: &DynamicImage,
    options: &HalftoneOptions,
    oversample: u32,
    filter: FilterType,
) -> Result<DynamicImage> {
    let oversample = oversample.max(1);
    let (width, height) = (image.width(), image.height());
    let canvas_w = width * oversample;
    let canvas_h = height * oversample;

    let mut canvas: RgbaImage = match options.backdrop {
        Backdrop::Transparent => RgbaImage::new(canvas_w, canvas_h),
        Backdrop::Solid(colour) => RgbaImage::from_pixel(canvas_w, canvas_h, colour.into()),
        Backdrop::Image => {
            let resized = image.resize_exact(canvas_w, canvas_h, filter);
            quantize(&resized, BACKDROP_COLOURS, None)?.to_rgba8()
        }
    };

    let mut gray = image.to_luma8();
    imageops::dither(&mut gray, &BiLevel);

    let fill: Option<Rgba<u8>> = match (options.foreground, options.backdrop) {
        (Some(fg), _) => Some(fg.into()),
        (None, Backdrop::Solid(bg)) => Some(bg.into()),
        (None, _) => None,
    };

    if let Some(fill) = fill {
        let half = options.sample as f64 / 2.0;
        for block in sample_blocks(&gray, options.sample) {
            let radius = dot_radius(f64::from(block.average), options.sample, oversample);
            let cx = (block.x as f64 + half) * oversample as f64;
            let cy = (block.y as f64 + half) * oversample as f64;
            draw_filled_circle_mut(&mut canvas, (cx as i32, cy as i32), radius as i32, fill);
        }
    }

    let output = DynamicImage::ImageRgba8(canvas);
    if oversample > 1 {
        // Two-step downsample: once at canvas size, then to the target
        let settled = output.resize_exact(canvas_w, canvas_h, filter);
        Ok(settled.resize_exact(width, height, filter))
    } else {
        Ok(output)
    }
}
