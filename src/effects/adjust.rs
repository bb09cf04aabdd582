//! Point operations: brightness, saturation, posterize, opacity, blur,
//! dithering, and colour knockout.
//!
//! These stages touch pixel values without moving them. All of them keep the
//! alpha channel except where noted.

use image::imageops::{self, BiLevel};
use image::{DynamicImage, Rgba};
use palette::{Hsl, IntoColor, Srgb};

use crate::error::{FxError, Result};
use crate::types::Colour;

/// Scale each colour channel by `factor`, clamped to the channel range.
pub fn brightness(image: &DynamicImage, factor: f32) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = (f32::from(*channel) * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Scale HSL saturation by `factor`, clamped to `[0, 1]`.
///
/// A factor of 0 collapses to grayscale, 1 is identity, above 1 boosts.
pub fn saturation(image: &DynamicImage, factor: f32) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let srgb = Srgb::new(
            f32::from(pixel[0]) / 255.0,
            f32::from(pixel[1]) / 255.0,
            f32::from(pixel[2]) / 255.0,
        );
        let mut hsl: Hsl = srgb.into_color();
        hsl.saturation = (hsl.saturation * factor).clamp(0.0, 1.0);
        let back: Srgb = hsl.into_color();

        pixel[0] = (back.red * 255.0).round() as u8;
        pixel[1] = (back.green * 255.0).round() as u8;
        pixel[2] = (back.blue * 255.0).round() as u8;
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Keep the top `bits` bits of every colour channel.
pub fn posterize(image: &DynamicImage, bits: u8) -> Result<DynamicImage> {
    if !(1..=8).contains(&bits) {
        return Err(FxError::Config {
            message: format!("posterize bits must be between 1 and 8, got {bits}"),
            help: None,
        });
    }

    let mask = 0xFFu8 << (8 - bits);
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel &= mask;
        }
    }
    Ok(DynamicImage::ImageRgba8(rgba))
}

/// Scale the alpha channel by `factor` with truncating conversion.
pub fn opacity(image: &DynamicImage, factor: f32) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        pixel[3] = (f32::from(pixel[3]) * factor) as u8;
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Knock out every pixel whose RGB exactly matches one of `colours`.
///
/// Matching pixels become fully transparent black; near-miss shades are left
/// alone.
pub fn transparent_colours(image: &DynamicImage, colours: &[Colour]) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let rgb = [pixel[0], pixel[1], pixel[2]];
        if colours.iter().any(|c| c.channels() == rgb) {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Gaussian blur with an area-relative sigma.
///
/// The sigma is `factor * sqrt(w * h) / 1000`, so the same factor blurs a
/// large image about as visibly as a small one. Non-positive sigma is a
/// no-op.
pub fn blur(image: &DynamicImage, factor: f32) -> DynamicImage {
    let sigma = blur_sigma(image.width(), image.height(), factor);
    if sigma <= 0.0 {
        return image.clone();
    }
    image.blur(sigma)
}

/// The blur sigma for an image area and blur factor.
pub fn blur_sigma(width: u32, height: u32, factor: f32) -> f32 {
    factor * ((width as f64 * height as f64).sqrt() as f32) / 1000.0
}

/// Reduce to luminance.
pub fn grayscale(image: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageLuma8(image.to_luma8())
}

/// Floyd-Steinberg bi-level dithering of the luminance.
pub fn dither(image: &DynamicImage) -> DynamicImage {
    let mut gray = image.to_luma8();
    imageops::dither(&mut gray, &BiLevel);
    DynamicImage::ImageLuma8(gray)
}
